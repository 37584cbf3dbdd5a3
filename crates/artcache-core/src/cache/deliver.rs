//! Shared-lock pass: deliver the cached data if it is present and fresh.

use tracing::{debug, warn};

use super::{DownloadCache, Observed};
use crate::entry::{CacheEntry, ReadView};
use crate::error::Result;
use crate::http::{self, Freshness};
use crate::retry::{run_with_retry, Resolution};

pub(super) enum Delivery<R, F> {
    Delivered(R),
    /// Not delivered; the callback is handed back for the next round.
    Pending(Observed, F),
}

impl DownloadCache {
    /// With `revalidate` false a cached entry is delivered as is, validators
    /// or not.
    pub(super) fn deliver<R, F>(
        &self,
        entry: &CacheEntry,
        revalidate: bool,
        f: F,
    ) -> Result<Delivery<R, F>>
    where
        F: FnOnce(&std::path::Path) -> R,
    {
        entry.lock_shared(|view| {
            if !view.cached() {
                return Ok(Delivery::Pending(Observed::Missing, f));
            }
            if revalidate && view.has_validators() && !self.is_fresh(entry.uri(), view)? {
                return Ok(Delivery::Pending(Observed::Stale, f));
            }
            Ok(Delivery::Delivered(view.data(f)))
        })
    }

    /// Conditional HEAD through the retry driver. If the network turns out to
    /// be unusable the cached copy is served as is.
    fn is_fresh(&self, uri: &str, view: &ReadView<'_>) -> Result<bool> {
        let validators = view.validators()?;
        let resolution = run_with_retry(&self.policy, &self.availability, self.mode, uri, || {
            http::revalidate(uri, &validators, &self.http)
        })?;
        match resolution {
            Resolution::Done(Freshness::Fresh) => {
                debug!(uri, "cached copy is fresh");
                Ok(true)
            }
            Resolution::Done(Freshness::Stale(status)) => {
                debug!(uri, status, "cached copy is stale");
                Ok(false)
            }
            Resolution::NetworkUnusable => {
                warn!(uri, "cannot revalidate; serving cached copy");
                Ok(true)
            }
        }
    }
}
