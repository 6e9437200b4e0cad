//! `KEY = VALUE` scanning of joined entry text.
//!
//! Attributes are separated by commas. The split does not look at quotes: a
//! quoted value containing a comma is cut at that comma, the same way the
//! vendor tooling reads it.

/// One `KEY = VALUE` pair found in an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute<'a> {
    /// The identifier left of `=`.
    pub key: &'a str,
    /// The trimmed value with one layer of bracketing quotes removed.
    /// Never empty.
    pub value: &'a str,
}

/// Scan `text` for attributes, in order of appearance.
///
/// `text` should not contain the entry name; see
/// [`Entry::attribute_text`](crate::Entry::attribute_text). Duplicate keys are
/// all yielded, resolving them is up to the caller.
pub fn scan_attributes(text: &str) -> AttributeScanner<'_> {
    AttributeScanner {
        segments: text.split(','),
    }
}

/// Iterator returned by [`scan_attributes`].
#[derive(Debug, Clone)]
pub struct AttributeScanner<'a> {
    segments: std::str::Split<'a, char>,
}

impl<'a> Iterator for AttributeScanner<'a> {
    type Item = Attribute<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.segments.by_ref().find_map(parse_segment)
    }
}

/// Parse one comma-delimited segment.
///
/// The key is the identifier directly before the first `=` that has one;
/// everything after that `=` is the value.
fn parse_segment(segment: &str) -> Option<Attribute<'_>> {
    let mut search_from = 0;
    while let Some(offset) = segment[search_from..].find('=') {
        let eq = search_from + offset;
        if let Some(key) = trailing_identifier(&segment[..eq]) {
            let value = strip_quotes(segment[eq + 1..].trim());
            if value.is_empty() {
                return None;
            }
            return Some(Attribute { key, value });
        }
        search_from = eq + 1;
    }
    None
}

/// The identifier (`[A-Za-z_][A-Za-z0-9_]*`) that ends `text`, ignoring
/// trailing whitespace.
fn trailing_identifier(text: &str) -> Option<&str> {
    let text = text.trim_end();
    let run_start = text
        .char_indices()
        .rev()
        .take_while(|&(_, c)| c.is_ascii_alphanumeric() || c == '_')
        .last()
        .map_or(text.len(), |(i, _)| i);
    let run = &text[run_start..];
    let ident_start = run.find(|c: char| c.is_ascii_alphabetic() || c == '_')?;
    Some(&run[ident_start..])
}

/// Remove one layer of quotes if a matching pair brackets the whole value.
///
/// `"abc"` and `'abc'` become `abc`; `"abc`, `abc"` and `"abc'` are returned
/// unchanged.
pub fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2
            && let Some(inner) = value
                .strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
