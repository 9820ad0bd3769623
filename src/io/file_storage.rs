use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tempfile::NamedTempFile;

use crate::io::lock::{DEFAULT_TIMEOUT, DirLock};
use crate::io::storage::{Storage, StorageError};

/// Storage backed by a directory: key `K` lives in `K.json`.
///
/// Writes and removals hold the directory lock and replace the file
/// atomically, so a concurrent reader sees either the old or the new record.
/// [`Storage::lock`] keeps the lock across several calls.
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
    held: Option<DirLock>,
    depth: usize,
}

impl FileStorage {
    /// Open (creating if needed) the storage directory.
    pub fn open(dir: &Path) -> Result<Self, StorageError> {
        fs::create_dir_all(dir).map_err(|e| StorageError::WriteError {
            path: dir.to_path_buf(),
            source: e,
        })?;
        Ok(FileStorage {
            dir: dir.to_path_buf(),
            held: None,
            depth: 0,
        })
    }

    pub fn is_locked(&self) -> bool {
        self.held.is_some()
    }

    /// Lock for a single write unless a caller already holds it.
    fn write_lock(&self) -> Result<Option<DirLock>, StorageError> {
        if self.held.is_some() {
            return Ok(None);
        }
        Ok(Some(DirLock::acquire(&self.dir, DEFAULT_TIMEOUT)?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the value for `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

/// Keys become file names, so they may not escape the directory or hide.
fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() || key.starts_with('.') || key.contains(['/', '\\']) || key.contains('\0') {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::ReadError { path, source: e }),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let _lock = self.write_lock()?;
        atomic_write(&path, value.as_bytes())
            .map_err(|e| StorageError::WriteError { path: path.clone(), source: e })?;
        tracing::debug!(path = %path.display(), bytes = value.len(), "wrote record");
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let _lock = self.write_lock()?;
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "removed record");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::WriteError { path, source: e }),
        }
    }

    fn preserve_corrupt(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let stamp = Utc::now().format("%Y%m%dT%H%M%SZ");
        let bak = self.dir.join(format!("{}.json.{}.bak", key, stamp));
        atomic_write(&bak, value.as_bytes())
            .map_err(|e| StorageError::WriteError { path: bak.clone(), source: e })?;
        tracing::warn!(backup = %bak.display(), "unreadable record backed up");
        Ok(())
    }

    fn lock(&mut self) -> Result<(), StorageError> {
        if self.depth == 0 {
            self.held = Some(DirLock::acquire(&self.dir, DEFAULT_TIMEOUT)?);
        }
        self.depth += 1;
        Ok(())
    }

    fn unlock(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.held = None;
        }
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
