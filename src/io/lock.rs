use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Name of the lock file inside a storage directory.
pub const LOCK_FILE: &str = ".lock";

/// How long writers wait for each other before giving up.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const RETRY_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not open lock file {path}: {source}")]
    Open { path: PathBuf, source: io::Error },
    #[error("could not lock {path}: {source}")]
    Flock { path: PathBuf, source: io::Error },
    #[error("{path} is still locked after {waited:?}; is another shop process writing?")]
    Busy { path: PathBuf, waited: Duration },
}

/// Exclusive advisory lock on a storage directory, held until dropped.
///
/// The lock file stays on disk. Waiters may already hold a handle to it, so
/// unlinking would let a later caller lock a new inode next to them.
#[derive(Debug)]
pub struct DirLock {
    // flock is released when this handle closes
    _file: File,
    path: PathBuf,
}

impl DirLock {
    /// Block until `dir` is locked, or fail with `Busy` after `timeout`.
    pub fn acquire(dir: &Path, timeout: Duration) -> Result<Self, LockError> {
        let path = dir.join(LOCK_FILE);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| LockError::Open {
                path: path.clone(),
                source,
            })?;

        let start = Instant::now();
        while !try_flock(&file).map_err(|source| LockError::Flock {
            path: path.clone(),
            source,
        })? {
            let waited = start.elapsed();
            if waited >= timeout {
                tracing::warn!(path = %path.display(), ?waited, "storage directory busy");
                return Err(LockError::Busy { path, waited });
            }
            std::thread::sleep(RETRY_INTERVAL);
        }

        tracing::trace!(path = %path.display(), "storage directory locked");
        Ok(DirLock { _file: file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `Ok(false)` when someone else holds the lock.
#[cfg(unix)]
fn try_flock(file: &File) -> io::Result<bool> {
    use std::os::unix::io::AsRawFd;
    let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if rc == 0 {
        return Ok(true);
    }
    let err = io::Error::last_os_error();
    match err.raw_os_error() {
        Some(code) if code == libc::EWOULDBLOCK => Ok(false),
        Some(libc::EINTR) => Ok(false),
        _ => Err(err),
    }
}

#[cfg(not(unix))]
fn try_flock(_file: &File) -> io::Result<bool> {
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::thread;
    use tempfile::TempDir;

    #[test]
    fn relock_after_drop() {
        let tmp = TempDir::new().unwrap();
        let first = DirLock::acquire(tmp.path(), DEFAULT_TIMEOUT).unwrap();
        assert_eq!(first.path(), tmp.path().join(LOCK_FILE));
        drop(first);

        // The file is left in place for the next holder
        assert!(tmp.path().join(LOCK_FILE).exists());
        DirLock::acquire(tmp.path(), Duration::from_millis(50)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn contended_lock_is_busy() {
        let tmp = TempDir::new().unwrap();
        let _held = DirLock::acquire(tmp.path(), DEFAULT_TIMEOUT).unwrap();

        let contended = DirLock::acquire(tmp.path(), Duration::from_millis(50));
        assert!(matches!(contended, Err(LockError::Busy { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn waiter_keeps_exclusion_after_handoff() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().to_path_buf();
        let first = DirLock::acquire(&dir, DEFAULT_TIMEOUT).unwrap();

        let (locked_tx, locked_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let waiter_dir = dir.clone();
        let waiter = thread::spawn(move || {
            let lock = DirLock::acquire(&waiter_dir, DEFAULT_TIMEOUT).unwrap();
            locked_tx.send(()).unwrap();
            release_rx.recv().unwrap();
            drop(lock);
        });

        // Let the waiter block on the open lock file, then hand over
        thread::sleep(Duration::from_millis(50));
        drop(first);
        locked_rx.recv().unwrap();

        let third = DirLock::acquire(&dir, Duration::from_millis(100));
        assert!(matches!(third, Err(LockError::Busy { .. })));

        release_tx.send(()).unwrap();
        waiter.join().unwrap();
        DirLock::acquire(&dir, DEFAULT_TIMEOUT).unwrap();
    }

    #[test]
    fn missing_directory_fails_to_open() {
        let tmp = TempDir::new().unwrap();
        let result = DirLock::acquire(&tmp.path().join("nope"), Duration::from_millis(10));
        assert!(matches!(result, Err(LockError::Open { .. })));
    }
}
