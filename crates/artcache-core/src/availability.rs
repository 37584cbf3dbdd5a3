//! Process-local network availability circuit breaker.
//!
//! One `Availability` is created per process and shared (by `Arc`) between
//! every cache that should agree on whether the network is usable. The state
//! moves from `Unchecked` to a known state exactly once; only `reset` moves it
//! back.

use std::sync::{Mutex, PoisonError};

use crate::config::RemoteDownloads;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityState {
    Unchecked,
    KnownUp,
    KnownDown,
}

#[derive(Debug)]
pub struct Availability {
    state: Mutex<AvailabilityState>,
}

impl Default for Availability {
    fn default() -> Self {
        Self::new()
    }
}

impl Availability {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(AvailabilityState::Unchecked),
        }
    }

    pub fn state(&self) -> AvailabilityState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Gate checked before every call sequence. Disabled downloads latch the
    /// breaker down; returns whether a network attempt may be made.
    pub fn admit(&self, mode: RemoteDownloads) -> bool {
        if mode == RemoteDownloads::Disabled {
            self.mark_down();
            return false;
        }
        self.state() != AvailabilityState::KnownDown
    }

    /// Latch `KnownUp`. Returns true if this call made the transition.
    pub fn mark_up(&self) -> bool {
        self.latch(AvailabilityState::KnownUp)
    }

    /// Latch `KnownDown`. Returns true if this call made the transition.
    pub fn mark_down(&self) -> bool {
        self.latch(AvailabilityState::KnownDown)
    }

    /// Forget what was learned. Meant for tests and long-lived hosts that
    /// want to check the network again.
    pub fn reset(&self) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = AvailabilityState::Unchecked;
    }

    fn latch(&self, to: AvailabilityState) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state != AvailabilityState::Unchecked {
            return false;
        }
        *state = to;
        tracing::debug!("network availability latched: {:?}", to);
        true
    }
}
