use std::collections::HashMap;
use std::path::PathBuf;

use crate::io::lock::LockError;

/// Error type for key-value storage
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Lock(#[from] LockError),
}

/// String key-value storage with `localStorage` semantics.
///
/// A missing key reads as `None`; removing a missing key is not an error.
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;

    /// Set aside a value that could not be parsed before it gets overwritten.
    fn preserve_corrupt(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Ok(())
    }

    /// Take exclusive access for a read-modify-write. Calls nest; access
    /// is released by the matching outermost `unlock`.
    fn lock(&mut self) -> Result<(), StorageError> {
        Ok(())
    }

    fn unlock(&mut self) {}
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }

    fn preserve_corrupt(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).preserve_corrupt(key, value)
    }

    fn lock(&mut self) -> Result<(), StorageError> {
        (**self).lock()
    }

    fn unlock(&mut self) {
        (**self).unlock()
    }
}

/// In-memory storage, used by tests and by callers that want no persistence.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    /// Values handed to `preserve_corrupt`, in call order
    pub preserved: Vec<(String, String)>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with one entry.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut storage = Self::default();
        storage.entries.insert(key.to_string(), value.to_string());
        storage
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }

    fn preserve_corrupt(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.preserved.push((key.to_string(), value.to_string()));
        Ok(())
    }
}
