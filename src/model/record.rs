use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::item::Item;

/// The value stored under `<namespace>-shoppingList`.
///
/// `should_show_clear_button` is derivable from `items` but is part of the
/// stored shape and is written on every save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedRecord {
    pub items: Vec<String>,
    #[serde(default)]
    pub should_show_clear_button: bool,
}

impl PersistedRecord {
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a Item>) -> Self {
        let items: Vec<String> = items.into_iter().map(|i| i.as_str().to_string()).collect();
        let should_show_clear_button = !items.is_empty();
        PersistedRecord {
            items,
            should_show_clear_button,
        }
    }

    /// Parse a stored value. `None` when it does not have the record shape.
    pub fn parse(value: &str) -> Option<Self> {
        serde_json::from_str(value).ok()
    }

    /// Items as a duplicate-free list. Entries are normalized again, blanks
    /// are dropped and the first of any duplicates wins.
    pub fn into_items(self) -> IndexSet<Item> {
        self.items.iter().filter_map(|raw| Item::parse(raw)).collect()
    }
}
