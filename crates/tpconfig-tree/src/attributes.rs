//! Parsed attributes of one entry.

use indexmap::IndexMap;
use serde::Serialize;
use tpconfig_parse::{Entry, scan_attributes};
use tracing::debug;

/// Key under which every attribute set stores its entry name.
pub const NAME_KEY: &str = "name";

/// The `KEY = VALUE` attributes of one entry, in order of first appearance.
///
/// The set always holds a [`NAME_KEY`] attribute equal to the entry name. An
/// attribute literally called `name` in the entry text cannot replace it and
/// is dropped. Values are never empty: an attribute whose value is empty after
/// quote stripping is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AttributeSet {
    values: IndexMap<String, String>,
}

impl AttributeSet {
    /// Create a set holding only the entry name.
    pub fn new(name: impl Into<String>) -> Self {
        let mut values = IndexMap::new();
        values.insert(NAME_KEY.to_string(), name.into());
        Self { values }
    }

    /// Extract the attributes of an assembled entry.
    pub fn from_entry(entry: &Entry<'_>) -> Self {
        Self::from_text(entry.name, entry.attribute_text())
    }

    /// Build a set for `name` from attribute text (the entry text after its
    /// name). The last occurrence of a duplicate key wins.
    pub fn from_text(name: &str, text: &str) -> Self {
        let mut set = Self::new(name);
        for attribute in scan_attributes(text) {
            if attribute.key == NAME_KEY {
                debug!(entry = name, value = attribute.value, "ignoring `name` attribute");
                continue;
            }
            set.values
                .insert(attribute.key.to_string(), attribute.value.to_string());
        }
        set
    }

    /// The entry name.
    pub fn name(&self) -> &str {
        self.values.get(NAME_KEY).map_or("", String::as_str)
    }

    /// Look up an attribute.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Look up an attribute, falling back to `default` when it is absent.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Look up an attribute with every leading and trailing `"` removed.
    ///
    /// This is how references between sections are compared. Unlike the
    /// extraction rule the quotes need not pair up, so a value cut short at a
    /// quoted comma (`SVGNAME = "G1,x"` is stored as `"G1`) still names `G1`.
    pub fn get_unquoted(&self, key: &str) -> Option<&str> {
        self.get(key).map(|value| value.trim_matches('"'))
    }

    /// [`get_unquoted`](Self::get_unquoted) with a fallback for absent keys.
    pub fn get_unquoted_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get_unquoted(key).unwrap_or(default)
    }

    /// Whether the attribute is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of attributes, including the name.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false: the name attribute is always present.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(key, value)` pairs, name first.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
