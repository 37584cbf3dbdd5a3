//! Retry driver: run attempts until one resolves or the budget runs out, then
//! let the availability circuit breaker decide what exhaustion means.

use tracing::{debug, warn};

use super::error::Fault;
use super::policy::{RetryDecision, RetryPolicy};
use crate::availability::{Availability, AvailabilityState};
use crate::config::RemoteDownloads;
use crate::error::{CacheError, Result};

/// Outcome of a single HTTP attempt.
#[derive(Debug)]
pub enum Attempt<T> {
    /// The server gave a decisive answer.
    Success(T),
    /// Worth trying again within budget.
    Retryable(Fault),
    /// Give up now, regardless of budget or availability.
    Fatal(CacheError),
}

/// What a retried call sequence resolved to.
#[derive(Debug)]
pub enum Resolution<T> {
    Done(T),
    /// The network is not to be used: disabled, latched down, or just found
    /// unreachable while availability was still unchecked.
    NetworkUnusable,
}

/// Runs `attempt` until it succeeds, fails fatally, or the budget is spent.
///
/// No attempt is made at all when `mode` is disabled or availability is
/// already latched down. Budget exhaustion latches availability down (and
/// resolves to `NetworkUnusable`) if nothing was known yet; if the network was
/// known to be up it is a fatal `NetworkFailure`.
pub fn run_with_retry<T, F>(
    policy: &RetryPolicy,
    availability: &Availability,
    mode: RemoteDownloads,
    uri: &str,
    mut attempt: F,
) -> Result<Resolution<T>>
where
    F: FnMut() -> Attempt<T>,
{
    if !availability.admit(mode) {
        debug!(uri, "network unusable, skipping request");
        return Ok(Resolution::NetworkUnusable);
    }

    let mut n = 1u32;
    loop {
        match attempt() {
            Attempt::Success(value) => {
                availability.mark_up();
                return Ok(Resolution::Done(value));
            }
            Attempt::Fatal(e) => return Err(e),
            Attempt::Retryable(fault) => {
                let state = availability.state();
                let budget = policy.budget(state);
                match policy.decide(n, budget, fault.kind()) {
                    RetryDecision::RetryAfter(delay) => {
                        warn!(uri, attempt = n, budget, "attempt failed: {}; retrying", fault);
                        if !delay.is_zero() {
                            std::thread::sleep(delay);
                        }
                        n += 1;
                    }
                    RetryDecision::NoRetry => {
                        return exhausted(availability, state, uri, n, fault);
                    }
                }
            }
        }
    }
}

fn exhausted<T>(
    availability: &Availability,
    state: AvailabilityState,
    uri: &str,
    attempts: u32,
    fault: Fault,
) -> Result<Resolution<T>> {
    match state {
        AvailabilityState::KnownUp => {
            tracing::error!(uri, attempts, "giving up on a previously working network: {}", fault);
            Err(CacheError::NetworkFailure {
                uri: uri.to_string(),
                attempts,
                fault,
            })
        }
        AvailabilityState::Unchecked | AvailabilityState::KnownDown => {
            availability.mark_down();
            warn!(uri, attempts, "network unreachable ({}); using offline fallback", fault);
            Ok(Resolution::NetworkUnusable)
        }
    }
}
