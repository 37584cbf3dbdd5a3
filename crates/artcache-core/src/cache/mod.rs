//! The download cache: `get` and `evict` over cache entries.
//!
//! `get` alternates between a shared-lock delivery attempt and an
//! exclusive-lock population step (download, or look-aside when the network
//! is unusable) until delivery succeeds or the round cap is hit. An entry
//! found already cached is revalidated when it has validators; one this call
//! just populated is delivered without another request.

mod deliver;
mod populate;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::availability::Availability;
use crate::config::{CacheConfig, RemoteDownloads};
use crate::entry::{CacheEntry, EntryPaths};
use crate::error::{CacheError, Result};
use crate::http::HttpOptions;
use crate::lookaside::LookAside;
use crate::retry::RetryPolicy;

use deliver::Delivery;
use populate::Populated;

/// Deliver/populate rounds before `get` gives up with `DidNotConverge`.
pub const MAX_ROUNDS: u32 = 4;

/// What the shared-lock pass saw when it could not deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Observed {
    Missing,
    Stale,
}

#[derive(Debug, Clone)]
pub struct DownloadCache {
    root: PathBuf,
    mode: RemoteDownloads,
    lookaside: LookAside,
    policy: RetryPolicy,
    http: HttpOptions,
    availability: Arc<Availability>,
}

impl DownloadCache {
    /// A cache rooted at `root` with default retry policy and timeouts and no
    /// look-aside directory.
    pub fn new(root: impl Into<PathBuf>, mode: RemoteDownloads, availability: Arc<Availability>) -> Self {
        Self {
            root: root.into(),
            mode,
            lookaside: LookAside::default(),
            policy: RetryPolicy::default(),
            http: HttpOptions::default(),
            availability,
        }
    }

    /// Builds a cache from loaded configuration. Fails with a configuration
    /// error if `remote_downloads` is neither "enabled" nor "disabled".
    pub fn from_config(cfg: &CacheConfig, availability: Arc<Availability>) -> Result<Self> {
        let mode = cfg.remote_downloads()?;
        Ok(Self::new(cfg.cache_dir(), mode, availability)
            .with_lookaside(cfg.lookaside_dir.clone())
            .with_retry_policy(cfg.retry_policy())
            .with_http_options(cfg.http_options()))
    }

    pub fn with_lookaside(mut self, root: Option<PathBuf>) -> Self {
        self.lookaside = LookAside::new(root);
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_http_options(mut self, http: HttpOptions) -> Self {
        self.http = http;
        self
    }

    pub fn availability(&self) -> &Arc<Availability> {
        &self.availability
    }

    pub fn entry_paths(&self, uri: &str) -> EntryPaths {
        EntryPaths::new(&self.root, uri)
    }

    /// Retrieves `uri` through the cache and calls `f` with the path of the
    /// cached data. `f` runs under the entry's shared lock, so the file cannot
    /// change underneath it.
    pub fn get<R, F>(&self, uri: &str, f: F) -> Result<R>
    where
        F: FnOnce(&Path) -> R,
    {
        let entry = CacheEntry::new(&self.root, uri);
        let mut f = f;
        let mut populated: Option<Populated> = None;
        for round in 1..=MAX_ROUNDS {
            match self.deliver(&entry, populated.is_none(), f)? {
                Delivery::Delivered(r) => return Ok(r),
                Delivery::Pending(observed, back) => {
                    tracing::debug!(uri, round, ?observed, "populating entry");
                    f = back;
                    let outcome = self.populate(&entry, observed)?;
                    tracing::debug!(uri, ?outcome, "entry populated");
                    populated = Some(outcome);
                }
            }
        }
        tracing::error!(uri, rounds = MAX_ROUNDS, "cache entry did not converge");
        Err(CacheError::DidNotConverge {
            uri: uri.to_string(),
            rounds: MAX_ROUNDS,
        })
    }

    /// `get`, copying the artifact to `dest`. Returns the number of bytes copied.
    pub fn copy_to(&self, uri: &str, dest: &Path) -> Result<u64> {
        self.get(uri, |src| fs::copy(src, dest))?
            .map_err(CacheError::io("copy to", dest))
    }

    /// `get`, reading the artifact into memory.
    pub fn read(&self, uri: &str) -> Result<Vec<u8>> {
        let data = self.entry_paths(uri).data;
        self.get(uri, |src| fs::read(src))?
            .map_err(CacheError::io("read", &data))
    }

    /// Unconditionally removes the entry for `uri`.
    pub fn evict(&self, uri: &str) -> Result<()> {
        CacheEntry::new(&self.root, uri).destroy()
    }
}
