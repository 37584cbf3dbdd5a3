//! Error type shared by every cache operation.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::retry::Fault;

pub type Result<T> = std::result::Result<T, CacheError>;

/// Terminal failures surfaced to callers of the cache.
///
/// Retryable faults (`Fault`) never escape on their own: they are retried and,
/// once the budget is spent, either turn into a look-aside fallback or into
/// `NetworkFailure`.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("network failure fetching {uri} after {attempts} attempts: {fault}")]
    NetworkFailure {
        uri: String,
        attempts: u32,
        #[source]
        fault: Fault,
    },

    #[error("cache inconsistency: GET {uri} returned HTTP {status}, expected 200")]
    CacheInconsistency { uri: String, status: u32 },

    #[error("{uri} is not available in the look-aside cache {dir} (contents: {listing})")]
    FallbackExhausted {
        uri: String,
        dir: String,
        listing: String,
    },

    #[error("cache entry for {uri} did not settle after {rounds} rounds")]
    DidNotConverge { uri: String, rounds: u32 },

    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("curl setup failed: {0}")]
    Curl(#[from] curl::Error),
}

impl CacheError {
    /// Builds a closure for `map_err` that tags an I/O failure with its path.
    pub(crate) fn io(action: &'static str, path: &Path) -> impl FnOnce(io::Error) -> CacheError {
        let path = path.to_path_buf();
        move |source| CacheError::Io {
            action,
            path,
            source,
        }
    }
}
