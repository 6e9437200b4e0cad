//! Events emitted by the entry assembler.

use crate::Span;

/// Events emitted by the parser, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event<'src> {
    /// A `*NAME` header line; every following entry belongs to `name`.
    SectionStart {
        /// Section name, trimmed, in its original case.
        name: &'src str,
        /// Span of the header line.
        span: Span,
    },
    /// A completed logical entry.
    Entry(Entry<'src>),
    /// An indented line with no entry open to attach to. It is dropped.
    OrphanContinuation {
        /// Span of the discarded line.
        span: Span,
    },
}

/// One logical configuration record, possibly spanning several lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<'src> {
    /// The first token of the entry's first line.
    pub name: &'src str,
    /// Name of the enclosing section; empty before the first header.
    pub section: &'src str,
    /// All trimmed lines of the entry joined with single spaces.
    pub raw_text: String,
    /// Span from the first to the last physical line of the entry.
    pub span: Span,
}

impl<'src> Entry<'src> {
    /// The joined text after the entry name, where attributes live.
    pub fn attribute_text(&self) -> &str {
        self.raw_text
            .strip_prefix(self.name)
            .unwrap_or(&self.raw_text)
    }
}
