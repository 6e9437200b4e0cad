//! Classified lines.

use crate::Span;

/// The classification of one physical line.
///
/// Borrowed text is always trimmed; the leading whitespace that decided the
/// classification is not part of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind<'src> {
    /// `*NAME`: opens the section `NAME`.
    SectionHeader(&'src str),
    /// Blank line, `# comment` or `// comment`.
    Ignorable,
    /// Line starting in the first column; carries the entry name.
    EntryStart(&'src str),
    /// Indented line extending the current entry; carries the trimmed text.
    Continuation(&'src str),
}

impl LineKind<'_> {
    /// Short name of the variant, for debug listings.
    pub fn label(&self) -> &'static str {
        match self {
            LineKind::SectionHeader(_) => "section",
            LineKind::Ignorable => "ignorable",
            LineKind::EntryStart(_) => "entry",
            LineKind::Continuation(_) => "continuation",
        }
    }
}

/// A physical line with its classification and location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<'src> {
    /// How the line was classified.
    pub kind: LineKind<'src>,
    /// Span of the line without its terminator.
    pub span: Span,
    /// 1-based line number.
    pub number: u32,
    /// The trimmed line text.
    pub text: &'src str,
}

impl<'src> Line<'src> {
    /// Create a new line.
    pub fn new(kind: LineKind<'src>, span: Span, number: u32, text: &'src str) -> Self {
        Self {
            kind,
            span,
            number,
            text,
        }
    }
}
