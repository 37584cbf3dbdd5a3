//! Advisory file locks on an entry's dedicated lock file.
//!
//! Uses the platform's native shared/exclusive lock (`flock` on Unix,
//! `LockFileEx` on Windows), so exclusion holds across processes as well as
//! across threads that open the lock file independently.

use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::{CacheError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    Shared,
    Exclusive,
}

/// Held lock; released when dropped, including during unwinding.
#[derive(Debug)]
pub(crate) struct LockGuard {
    file: File,
    path: PathBuf,
    mode: LockMode,
}

impl LockGuard {
    /// Blocks until the lock is granted. Creates the lock file (and its
    /// directory) if needed.
    pub(crate) fn acquire(path: &Path, mode: LockMode) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(CacheError::io("create cache dir", parent))?;
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(CacheError::io("open lock file", path))?;
        let locked = match mode {
            LockMode::Shared => FileExt::lock_shared(&file),
            LockMode::Exclusive => FileExt::lock_exclusive(&file),
        };
        locked.map_err(CacheError::io("lock", path))?;
        tracing::trace!(path = %path.display(), ?mode, "lock acquired");
        Ok(Self {
            file,
            path: path.to_path_buf(),
            mode,
        })
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(path = %self.path.display(), "failed to release lock: {}", e);
        } else {
            tracing::trace!(path = %self.path.display(), mode = ?self.mode, "lock released");
        }
    }
}
