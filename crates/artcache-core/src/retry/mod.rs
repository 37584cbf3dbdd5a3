//! Retry and backoff policy.
//!
//! This module encapsulates fault classification (timeouts, throttling,
//! connection failures, bad statuses), attempt budgets and the retry driver
//! that hands budget exhaustion over to the availability circuit breaker.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify_curl_error, classify_http_status};
pub use error::Fault;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::{run_with_retry, Attempt, Resolution};
