//! A line classifier for tp_config files.
//!
//! The format is line oriented: every physical line is one of a section
//! header (`*NODE`), an ignorable line (blank, `#` or `//` comment), the start
//! of an entry (first column is not whitespace) or a continuation of the
//! current entry (first column is whitespace).

mod span;
pub use span::Span;

mod line;
pub use line::{Line, LineKind};

mod tokenizer;
pub use tokenizer::{Tokenizer, classify};
