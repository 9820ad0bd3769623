use indexmap::IndexSet;

use crate::io::storage::{Storage, StorageError};
use crate::model::item::Item;
use crate::model::record::PersistedRecord;

/// Error type for list operations
#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("item text is empty")]
    EmptyInput,
    #[error("\"{0}\" is already in the list")]
    DuplicateItem(Item),
    #[error("no item at position {}", .0 + 1)]
    NotFound(usize),
    #[error("could not serialize list: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Storage key for a namespace.
pub fn storage_key(namespace: &str) -> String {
    format!("{}-shoppingList", namespace)
}

/// Why the persisted list could not be used at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadWarning {
    /// The value did not have the record shape; it was backed up
    Corrupt,
    /// Storage could not be read at all
    Unreadable,
}

impl LoadWarning {
    pub fn message(self) -> &'static str {
        match self {
            LoadWarning::Corrupt => "Stored list was unreadable and has been backed up; starting empty",
            LoadWarning::Unreadable => "Could not read the stored list; starting empty",
        }
    }
}

/// The shopping list and its write-through mirror in storage.
///
/// Each mutation locks the storage, re-reads the record so writes from
/// other processes are not lost, builds the next list, persists it, and
/// only then replaces the in-memory list. A failed write leaves both sides
/// as they were.
pub struct ListStore<S: Storage> {
    storage: S,
    key: String,
    items: IndexSet<Item>,
    warning: Option<LoadWarning>,
}

impl<S: Storage> ListStore<S> {
    /// Build the store for `namespace` and load whatever is persisted.
    pub fn open(storage: S, namespace: &str) -> Self {
        let mut store = ListStore {
            storage,
            key: storage_key(namespace),
            items: IndexSet::new(),
            warning: None,
        };
        store.load();
        store
    }

    /// Replace the in-memory list with the persisted one.
    ///
    /// An absent key, a read failure, or a value without the record shape
    /// all load as an empty list. Unparsable values are preserved through
    /// the storage before anything can overwrite them.
    pub fn load(&mut self) -> &IndexSet<Item> {
        self.items = match self.read_stored() {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "could not read stored list, starting empty");
                self.warning = Some(LoadWarning::Unreadable);
                IndexSet::new()
            }
        };
        tracing::debug!(key = %self.key, items = self.items.len(), "loaded list");
        &self.items
    }

    /// The most recent load problem, if nobody has asked yet.
    pub fn take_warning(&mut self) -> Option<LoadWarning> {
        self.warning.take()
    }

    fn read_stored(&mut self) -> Result<IndexSet<Item>, StorageError> {
        let Some(value) = self.storage.get_item(&self.key)? else {
            return Ok(IndexSet::new());
        };
        if let Some(record) = PersistedRecord::parse(&value) {
            return Ok(record.into_items());
        }
        tracing::warn!(key = %self.key, "stored list is unreadable, starting empty");
        if let Err(e) = self.storage.preserve_corrupt(&self.key, &value) {
            tracing::warn!(key = %self.key, error = %e, "could not back up unreadable list");
        }
        self.warning = Some(LoadWarning::Corrupt);
        Ok(IndexSet::new())
    }

    /// Append a new item.
    pub fn add(&mut self, raw: &str) -> Result<Item, ListError> {
        let item = Item::parse(raw).ok_or(ListError::EmptyInput)?;
        self.update(move |items| {
            if items.contains(&item) {
                return Err(ListError::DuplicateItem(item));
            }
            let mut next = items.clone();
            next.insert(item.clone());
            Ok((next, item))
        })
    }

    /// Replace the item at `index`, keeping its position.
    pub fn rename(&mut self, index: usize, raw: &str) -> Result<Item, ListError> {
        let item = Item::parse(raw).ok_or(ListError::EmptyInput)?;
        self.update(move |items| {
            if index >= items.len() {
                return Err(ListError::NotFound(index));
            }
            match items.get_index_of(&item) {
                Some(existing) if existing != index => return Err(ListError::DuplicateItem(item)),
                _ => {}
            }
            let mut next = items.clone();
            next.shift_remove_index(index);
            next.shift_insert(index, item.clone());
            Ok((next, item))
        })
    }

    /// Remove the item at `index`, returning it.
    pub fn remove_at(&mut self, index: usize) -> Result<Item, ListError> {
        self.update(move |items| {
            let mut next = items.clone();
            let removed = next.shift_remove_index(index).ok_or(ListError::NotFound(index))?;
            Ok((next, removed))
        })
    }

    /// Remove the item at `index` only if it is still `expected`.
    ///
    /// Used after a confirmation prompt: if another process changed the
    /// list in the meantime, the position may now name a different item.
    pub fn remove_checked(&mut self, index: usize, expected: &Item) -> Result<Item, ListError> {
        self.update(move |items| {
            if items.get_index(index) != Some(expected) {
                return Err(ListError::NotFound(index));
            }
            let mut next = items.clone();
            let removed = next.shift_remove_index(index).ok_or(ListError::NotFound(index))?;
            Ok((next, removed))
        })
    }

    /// Empty the list and erase the record. The key is removed rather than
    /// written as an empty list.
    pub fn clear(&mut self) -> Result<(), ListError> {
        self.storage.lock()?;
        let result = self.storage.remove_item(&self.key);
        self.storage.unlock();
        result?;
        self.items.clear();
        tracing::debug!(key = %self.key, "cleared list");
        Ok(())
    }

    /// Read-modify-write under the storage lock against the latest record.
    fn update<T>(
        &mut self,
        f: impl FnOnce(&IndexSet<Item>) -> Result<(IndexSet<Item>, T), ListError>,
    ) -> Result<T, ListError> {
        self.storage.lock()?;
        let result = self.update_locked(f);
        self.storage.unlock();
        result
    }

    fn update_locked<T>(
        &mut self,
        f: impl FnOnce(&IndexSet<Item>) -> Result<(IndexSet<Item>, T), ListError>,
    ) -> Result<T, ListError> {
        self.refresh();
        let (next, out) = f(&self.items)?;
        self.commit(next)?;
        Ok(out)
    }

    /// Pick up writes made through other handles to the same storage.
    /// On a read error the in-memory list is kept.
    fn refresh(&mut self) {
        match self.read_stored() {
            Ok(items) => {
                if !items.iter().eq(self.items.iter()) {
                    tracing::debug!(key = %self.key, items = items.len(), "stored list changed, reloaded");
                }
                self.items = items;
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "could not re-read stored list");
            }
        }
    }

    fn commit(&mut self, next: IndexSet<Item>) -> Result<(), ListError> {
        let value = serde_json::to_string(&PersistedRecord::from_items(&next))?;
        self.storage.set_item(&self.key, &value)?;
        self.items = next;
        Ok(())
    }

    pub fn items(&self) -> &IndexSet<Item> {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get_index(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the clear-all control should be offered.
    pub fn should_show_clear_button(&self) -> bool {
        !self.items.is_empty()
    }

    /// The record the current list persists as.
    pub fn record(&self) -> PersistedRecord {
        PersistedRecord::from_items(&self.items)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
