//! HTTP side of the cache: conditional HEAD revalidation and full GET.
//!
//! Uses the curl crate (libcurl) in the calling thread. Each function performs
//! exactly one attempt and reports it as an `Attempt`; retrying is the
//! caller's business.

mod download;
mod headers;
mod revalidate;

pub use download::{download, Fetched};
pub use revalidate::{revalidate, Freshness};

use std::time::Duration;

/// Cache validators for one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validators {
    /// `ETag`, verbatim including quotes.
    pub etag: Option<String>,
    /// `Last-Modified`, verbatim.
    pub last_modified: Option<String>,
}

/// Per-attempt timeouts.
#[derive(Debug, Clone, Copy)]
pub struct HttpOptions {
    pub connect_timeout: Duration,
    /// A GET stalling below 1 byte/s for this long is aborted.
    pub low_speed_time: Duration,
    /// Total time allowed for a HEAD.
    pub head_timeout: Duration,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            low_speed_time: Duration::from_secs(30),
            head_timeout: Duration::from_secs(30),
        }
    }
}
