use std::fmt;

use serde::{Serialize, Serializer};

/// Trim and lower-case raw item text.
///
/// Every comparison and every stored value goes through this, so two
/// inputs that differ only in case or surrounding whitespace are the
/// same item.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// A normalized, non-empty list entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Item(String);

impl Item {
    /// Normalize `raw`; `None` when nothing is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let text = normalize(raw);
        if text.is_empty() {
            None
        } else {
            Some(Item(text))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive substring test used by the list filter.
    pub fn contains(&self, needle: &str) -> bool {
        self.0.contains(&needle.to_lowercase())
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Item {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for Item {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
