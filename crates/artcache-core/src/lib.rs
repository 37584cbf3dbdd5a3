//! Cross-process artifact download cache.
//!
//! `DownloadCache::get` returns a locally cached copy of a remote artifact,
//! revalidating with conditional HEADs and downloading only when needed.
//! Entries are guarded by advisory file locks so several processes can share
//! one cache directory. When the network is disabled or found unreachable, a
//! read-only look-aside directory is used instead.

pub mod config;
pub mod logging;

pub mod availability;
pub mod cache;
pub mod checksum;
pub mod entry;
pub mod error;
pub mod http;
pub mod lookaside;
pub mod retry;

pub use availability::{Availability, AvailabilityState};
pub use cache::DownloadCache;
pub use config::{CacheConfig, RemoteDownloads};
pub use error::{CacheError, Result};
