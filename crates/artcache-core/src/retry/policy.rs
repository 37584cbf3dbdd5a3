use std::time::Duration;

use crate::availability::AvailabilityState;

/// High-level classification of a fault for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operation timed out (connect/read).
    Timeout,
    /// Network-level failure (connection refused/reset, DNS, etc.).
    Connection,
    /// The peer spoke something that was not valid HTTP.
    Protocol,
    /// Server asked us to slow down (e.g. 429, 503).
    Throttled,
    /// Server-side failure (5xx other than 503).
    Http5xx(u16),
    /// Any other status outside 2xx/3xx.
    Status(u16),
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Budget exhausted.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Attempt budgets plus exponential backoff with a cap.
///
/// The budget depends on what we know about the network: while availability is
/// unchecked we spend more attempts telling "flaky" from "absent".
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Attempts (including the first) while availability is unchecked.
    pub detection_attempts: u32,
    /// Attempts (including the first) once availability is known.
    pub known_attempts: u32,
    /// Base delay for backoff.
    pub base_delay: Duration,
    /// Upper bound on backoff delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            detection_attempts: 5,
            known_attempts: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(4),
        }
    }
}

impl RetryPolicy {
    /// A policy with no sleeping between attempts.
    pub fn immediate(detection_attempts: u32, known_attempts: u32) -> Self {
        Self {
            detection_attempts,
            known_attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Number of attempts allowed for a call sequence in the given state.
    pub fn budget(&self, state: AvailabilityState) -> u32 {
        let n = match state {
            AvailabilityState::Unchecked => self.detection_attempts,
            AvailabilityState::KnownUp | AvailabilityState::KnownDown => self.known_attempts,
        };
        n.max(1)
    }

    /// Decide what to do after `attempt` (1-based) failed with `kind`.
    pub fn decide(&self, attempt: u32, budget: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= budget {
            return RetryDecision::NoRetry;
        }
        // Throttling starts one step further up the curve.
        let step = match kind {
            ErrorKind::Throttled => attempt,
            _ => attempt.saturating_sub(1),
        };
        let exp = 1u32 << step.min(8);
        let delay = self.base_delay.saturating_mul(exp).min(self.max_delay);
        RetryDecision::RetryAfter(delay)
    }
}
