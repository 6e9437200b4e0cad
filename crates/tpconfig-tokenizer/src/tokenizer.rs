//! Splits tp_config source text into classified lines.

use crate::{Line, LineKind, Span};
use tracing::trace;

/// Classify one raw line.
///
/// `raw` must still carry its leading whitespace: whether the first column is
/// blank is what separates an entry start from a continuation. The checks run
/// in order: section header, ignorable, entry start, continuation.
pub fn classify(raw: &str) -> LineKind<'_> {
    let trimmed = raw.trim();

    if let Some(name) = trimmed.strip_prefix('*') {
        return LineKind::SectionHeader(name.trim());
    }

    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") {
        return LineKind::Ignorable;
    }

    match raw.chars().next() {
        Some(c) if !c.is_whitespace() => {
            let name = trimmed.split_whitespace().next().unwrap_or(trimmed);
            LineKind::EntryStart(name)
        }
        _ => LineKind::Continuation(trimmed),
    }
}

/// An iterator over the classified lines of a tp_config source text.
#[derive(Clone)]
pub struct Tokenizer<'src> {
    /// The remaining source text.
    remaining: &'src str,
    /// Current byte position in the source.
    pos: u32,
    /// Number of lines produced so far.
    line: u32,
}

impl<'src> Tokenizer<'src> {
    /// Create a new tokenizer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            remaining: source,
            pos: 0,
            line: 0,
        }
    }

    /// Check if we're at the end of input.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Consume the next physical line, returning it without its terminator
    /// together with its span.
    ///
    /// `\n`, `\r\n` and a lone `\r` all end a line.
    fn next_raw_line(&mut self) -> Option<(&'src str, Span)> {
        if self.is_eof() {
            return None;
        }

        let (raw, consumed) = match self.remaining.find(['\n', '\r']) {
            Some(end) if self.remaining[end..].starts_with("\r\n") => {
                (&self.remaining[..end], end + 2)
            }
            Some(end) => (&self.remaining[..end], end + 1),
            None => (self.remaining, self.remaining.len()),
        };

        let start = self.pos;
        let span = Span::new(start, start.saturating_add(offset(raw.len())));

        self.pos = self.pos.saturating_add(offset(consumed));
        self.remaining = &self.remaining[consumed..];
        self.line = self.line.saturating_add(1);

        Some((raw, span))
    }
}

/// Convert a byte length to a span offset.
///
/// Spans are `u32`; offsets past 4 GiB are pinned to `u32::MAX`.
fn offset(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

impl<'src> Iterator for Tokenizer<'src> {
    type Item = Line<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        let (raw, span) = self.next_raw_line()?;
        let kind = classify(raw);
        trace!(line = self.line, ?span, ?kind, "classified line");
        Some(Line::new(kind, span, self.line, raw.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<LineKind<'_>> {
        Tokenizer::new(source).map(|line| line.kind).collect()
    }

    #[test]
    fn section_header_is_trimmed() {
        assert_eq!(classify("*DOMAIN"), LineKind::SectionHeader("DOMAIN"));
        assert_eq!(classify("*  NODE  "), LineKind::SectionHeader("NODE"));
        assert_eq!(classify("   *SERVER"), LineKind::SectionHeader("SERVER"));
        assert_eq!(classify("*"), LineKind::SectionHeader(""));
    }

    #[test]
    fn blank_and_comment_lines_are_ignorable() {
        assert_eq!(classify(""), LineKind::Ignorable);
        assert_eq!(classify("   \t "), LineKind::Ignorable);
        assert_eq!(classify("# comment"), LineKind::Ignorable);
        assert_eq!(classify("    # indented comment"), LineKind::Ignorable);
        assert_eq!(classify("// comment"), LineKind::Ignorable);
        assert_eq!(classify("\t// indented comment"), LineKind::Ignorable);
    }

    #[test]
    fn entry_start_takes_first_token() {
        assert_eq!(
            classify("NODE1 HOSTNAME=\"host1\", TmaxPort=3300"),
            LineKind::EntryStart("NODE1")
        );
        assert_eq!(classify("LONELY"), LineKind::EntryStart("LONELY"));
        assert_eq!(classify("SVC\tSVRNAME=svr"), LineKind::EntryStart("SVC"));
    }

    #[test]
    fn indented_lines_continue() {
        assert_eq!(
            classify("\tMAXSVR = 50,"),
            LineKind::Continuation("MAXSVR = 50,")
        );
        assert_eq!(classify("  MIN=1  "), LineKind::Continuation("MIN=1"));
    }

    #[test]
    fn section_check_wins_over_comment_check() {
        assert_eq!(classify("*#NODE"), LineKind::SectionHeader("#NODE"));
    }

    #[test]
    fn tokenizer_tracks_spans_and_numbers() {
        let source = "*NODE\r\nNODE1 A=1,\n\tB=2\n";
        let lines: Vec<_> = Tokenizer::new(source).collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].kind, LineKind::SectionHeader("NODE"));
        assert_eq!(lines[0].span.slice(source), "*NODE");
        assert_eq!(lines[1].number, 2);
        assert_eq!(lines[1].span.slice(source), "NODE1 A=1,");
        assert_eq!(lines[2].kind, LineKind::Continuation("B=2"));
        assert_eq!(lines[2].text, "B=2");
        assert_eq!(lines[2].span.slice(source), "\tB=2");
    }

    #[test]
    fn carriage_return_alone_ends_a_line() {
        let source = "*NODE\rN1 HOSTNAME=h\r  PORT=1\r\n*SERVER\r";
        let lines: Vec<_> = Tokenizer::new(source).collect();

        assert_eq!(
            lines.iter().map(|line| line.kind).collect::<Vec<_>>(),
            vec![
                LineKind::SectionHeader("NODE"),
                LineKind::EntryStart("N1"),
                LineKind::Continuation("PORT=1"),
                LineKind::SectionHeader("SERVER"),
            ]
        );
        assert_eq!(lines[1].span.slice(source), "N1 HOSTNAME=h");
        assert_eq!(lines[3].number, 4);
    }

    #[test]
    fn blank_lines_between_carriage_returns() {
        assert_eq!(
            kinds("*NODE\r\rN1\r\n\r\n"),
            vec![
                LineKind::SectionHeader("NODE"),
                LineKind::Ignorable,
                LineKind::EntryStart("N1"),
                LineKind::Ignorable,
            ]
        );
    }

    #[test]
    fn oversized_offsets_saturate() {
        assert_eq!(offset(12), 12);
        assert_eq!(offset(u32::MAX as usize), u32::MAX);
        assert_eq!(offset(usize::MAX), u32::MAX);
    }

    #[test]
    fn last_line_without_terminator() {
        assert_eq!(
            kinds("*DOMAIN\nDOM DOMAINID=1"),
            vec![LineKind::SectionHeader("DOMAIN"), LineKind::EntryStart("DOM")]
        );
    }

    #[test]
    fn empty_source_has_no_lines() {
        assert!(kinds("").is_empty());
        assert_eq!(kinds("\n"), vec![LineKind::Ignorable]);
    }

    proptest::proptest! {
        #[test]
        fn every_physical_line_is_classified(source in "[ \\t*#/a-zA-Z=,\"\\n\\r]{0,200}") {
            let expected = source
                .replace("\r\n", "\n")
                .replace('\r', "\n")
                .split_inclusive('\n')
                .count();
            let lines: Vec<_> = Tokenizer::new(&source).collect();
            proptest::prop_assert_eq!(lines.len(), expected);
            for line in &lines {
                proptest::prop_assert!(line.span.end as usize <= source.len());
            }
        }
    }
}
