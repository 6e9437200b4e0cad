//! Event-based entry assembler.

use tracing::{debug, trace};

use crate::event::{Entry, Event};
use crate::{LineKind, Span, Tokenizer};

/// Groups classified lines into entries.
///
/// Each parser owns its assembly state, so one parser serves one source text.
/// Create a new parser per document; parsers are cheap.
pub struct Parser<'src> {
    lines: Tokenizer<'src>,
    /// Name of the section the next flushed entry belongs to.
    section: &'src str,
    /// The entry currently collecting continuation lines.
    open: Option<OpenEntry<'src>>,
    /// Event held back because a flush had to be emitted first.
    pending: Option<Event<'src>>,
}

/// An entry whose end has not been seen yet.
struct OpenEntry<'src> {
    name: &'src str,
    lines: Vec<&'src str>,
    span: Span,
}

impl<'src> OpenEntry<'src> {
    fn finish(self, section: &'src str) -> Entry<'src> {
        let entry = Entry {
            name: self.name,
            section,
            raw_text: self.lines.join(" "),
            span: self.span,
        };
        trace!(name = entry.name, section, lines = self.lines.len(), "entry complete");
        entry
    }
}

impl<'src> Parser<'src> {
    /// Create a new parser for the given source.
    pub fn new(source: &'src str) -> Self {
        Self {
            lines: Tokenizer::new(source),
            section: "",
            open: None,
            pending: None,
        }
    }

    /// Close the open entry, if any, under the current section.
    fn flush(&mut self) -> Option<Entry<'src>> {
        let section = self.section;
        self.open.take().map(|open| open.finish(section))
    }

    /// Get the next event, or `None` once the input is exhausted.
    pub fn next_event(&mut self) -> Option<Event<'src>> {
        if let Some(event) = self.pending.take() {
            return Some(event);
        }

        while let Some(line) = self.lines.next() {
            match line.kind {
                LineKind::SectionHeader(name) => {
                    let flushed = self.flush();
                    self.section = name;
                    let start = Event::SectionStart {
                        name,
                        span: line.span,
                    };
                    return match flushed {
                        Some(entry) => {
                            self.pending = Some(start);
                            Some(Event::Entry(entry))
                        }
                        None => Some(start),
                    };
                }
                LineKind::Ignorable => {}
                LineKind::EntryStart(name) => {
                    let flushed = self.flush();
                    self.open = Some(OpenEntry {
                        name,
                        lines: vec![line.text],
                        span: line.span,
                    });
                    if let Some(entry) = flushed {
                        return Some(Event::Entry(entry));
                    }
                }
                LineKind::Continuation(text) => match self.open.as_mut() {
                    Some(open) => {
                        open.lines.push(text);
                        open.span = open.span.cover(line.span);
                    }
                    None => {
                        debug!(line = line.number, "continuation line outside of an entry");
                        return Some(Event::OrphanContinuation { span: line.span });
                    }
                },
            }
        }

        self.flush().map(Event::Entry)
    }

    /// Collect all remaining events.
    pub fn parse_to_vec(mut self) -> Vec<Event<'src>> {
        let mut events = Vec::new();
        while let Some(event) = self.next_event() {
            events.push(event);
        }
        events
    }
}

impl<'src> Iterator for Parser<'src> {
    type Item = Event<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event()
    }
}
