//! Entry assembly for tp_config files.
//!
//! [`Parser`] groups classified lines into logical entries and emits them as
//! [`Event`]s. [`scan_attributes`] splits an entry's joined text into
//! `KEY = VALUE` pairs. Neither step ever fails: malformed text produces fewer
//! entries or fewer attributes.

pub use tpconfig_tokenizer::{Line, LineKind, Span, Tokenizer};

mod attributes;
pub use attributes::{Attribute, AttributeScanner, scan_attributes, strip_quotes};

mod decode;
pub use decode::decode;

mod event;
pub use event::{Entry, Event};

mod parser;
pub use parser::Parser;
