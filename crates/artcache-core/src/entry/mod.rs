//! On-disk cache entries.
//!
//! Each URI maps to a fixed set of files in the cache root, all named by the
//! escaped URI:
//! - `<key>.lock`: advisory lock file, never holds data
//! - `<key>.data`: the artifact, present only when complete
//! - `<key>.etag`, `<key>.last-modified`: validators, present only when they
//!   describe the current data
//! - `<key>.data.part`: transient, exists only under the exclusive lock
//!
//! All reads happen under a shared lock and all mutation under an exclusive
//! one; the closures passed to `lock_shared`/`lock_exclusive` run with the
//! lock held and it is released on every exit path.

mod key;
mod lock;
mod view;

pub use key::escape_uri;
pub use lock::LockMode;
pub use view::{ReadView, WriteView};

use std::path::{Path, PathBuf};

use crate::error::Result;
use lock::LockGuard;

/// Paths of every file belonging to one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPaths {
    pub data: PathBuf,
    pub lock: PathBuf,
    pub etag: PathBuf,
    pub last_modified: PathBuf,
    pub part: PathBuf,
}

impl EntryPaths {
    pub fn new(root: &Path, uri: &str) -> Self {
        let key = escape_uri(uri);
        let file = |suffix: &str| root.join(format!("{}{}", key, suffix));
        Self {
            data: file(".data"),
            lock: file(".lock"),
            etag: file(".etag"),
            last_modified: file(".last-modified"),
            part: file(".data.part"),
        }
    }
}

/// One cached URI.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    uri: String,
    paths: EntryPaths,
}

impl CacheEntry {
    pub fn new(root: &Path, uri: &str) -> Self {
        Self {
            uri: uri.to_string(),
            paths: EntryPaths::new(root, uri),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn paths(&self) -> &EntryPaths {
        &self.paths
    }

    /// Runs `f` under a shared lock. Any number of shared holders may coexist.
    pub fn lock_shared<R>(&self, f: impl FnOnce(&ReadView<'_>) -> Result<R>) -> Result<R> {
        let _guard = LockGuard::acquire(&self.paths.lock, LockMode::Shared)?;
        f(&ReadView::new(&self.paths))
    }

    /// Runs `f` under the exclusive lock, the only context in which the entry
    /// may be mutated.
    pub fn lock_exclusive<R>(&self, f: impl FnOnce(&mut WriteView<'_>) -> Result<R>) -> Result<R> {
        let _guard = LockGuard::acquire(&self.paths.lock, LockMode::Exclusive)?;
        f(&mut WriteView::new(&self.paths))
    }

    /// Removes every file of the entry. Takes no lock: a concurrent holder in
    /// another process is not protected from this.
    pub fn destroy(&self) -> Result<()> {
        for path in [
            &self.paths.data,
            &self.paths.etag,
            &self.paths.last_modified,
            &self.paths.part,
            &self.paths.lock,
        ] {
            view::remove_if_exists(path)?;
        }
        tracing::debug!(uri = %self.uri, "cache entry destroyed");
        Ok(())
    }
}
