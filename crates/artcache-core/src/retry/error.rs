//! Retryable fault type produced by a single HTTP attempt.

use std::fmt;

use super::classify;
use super::policy::ErrorKind;

/// Why one HTTP attempt failed in a way that may succeed on retry.
///
/// Kept separate from `CacheError` so the retry driver can classify and decide
/// before anything is surfaced to the caller.
#[derive(Debug)]
pub enum Fault {
    /// Curl reported a transport failure (timeout, refused, reset, DNS, protocol).
    Transport(curl::Error),
    /// The server answered with a status outside 2xx/3xx.
    BadStatus(u32),
}

impl Fault {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Fault::Transport(e) => classify::classify_curl_error(e),
            Fault::BadStatus(code) => classify::classify_http_status(*code),
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::Transport(e) => write!(f, "{}", e),
            Fault::BadStatus(code) => write!(f, "HTTP {}", code),
        }
    }
}

impl std::error::Error for Fault {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Fault::Transport(e) => Some(e),
            Fault::BadStatus(_) => None,
        }
    }
}
