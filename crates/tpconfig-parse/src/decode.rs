//! Permissive decoding of raw configuration bytes.

use std::borrow::Cow;

use tracing::debug;

/// UTF-8 encoded byte order mark.
const BOM_UTF8: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Decode configuration bytes as UTF-8, dropping invalid sequences.
///
/// Files in the wild are mostly ASCII with the occasional legacy-encoded
/// comment. Undecodable bytes are skipped instead of replaced, so they never
/// show up in names or values. A leading byte order mark is removed.
pub fn decode(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(BOM_UTF8).unwrap_or(bytes);

    if let Ok(text) = std::str::from_utf8(bytes) {
        return Cow::Borrowed(text);
    }

    let mut text = String::with_capacity(bytes.len());
    let mut skipped = 0usize;
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
        skipped += chunk.invalid().len();
    }
    debug!(skipped, "dropped undecodable bytes");

    Cow::Owned(text)
}
