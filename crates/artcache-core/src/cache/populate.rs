//! Exclusive-lock pass: (re)fill an entry from the network or the look-aside cache.

use tracing::{debug, info};

use super::{DownloadCache, Observed};
use crate::entry::{CacheEntry, WriteView};
use crate::error::Result;
use crate::http::{self, Fetched};
use crate::retry::{run_with_retry, Attempt, Resolution};

/// What an exclusive-lock pass did to the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Populated {
    /// Fresh bytes from a 200 GET.
    Downloaded,
    /// Copied in from the look-aside directory.
    Restored,
    /// Another holder filled the entry while this one waited for the lock.
    AlreadyPresent,
}

impl DownloadCache {
    pub(super) fn populate(&self, entry: &CacheEntry, observed: Observed) -> Result<Populated> {
        let uri = entry.uri();
        entry.lock_exclusive(|view| {
            if observed == Observed::Missing && view.cached() {
                debug!(uri, "entry populated by another holder while waiting");
                return Ok(Populated::AlreadyPresent);
            }
            match self.fetch(uri, view)? {
                Resolution::Done(fetched) => {
                    view.persist_validators(&fetched.validators)?;
                    info!(
                        uri,
                        bytes = fetched.bytes,
                        etag = fetched.validators.etag.is_some(),
                        last_modified = fetched.validators.last_modified.is_some(),
                        "downloaded"
                    );
                    Ok(Populated::Downloaded)
                }
                Resolution::NetworkUnusable => {
                    self.lookaside.restore(uri, view)?;
                    Ok(Populated::Restored)
                }
            }
        })
    }

    /// GET through the retry driver; each attempt writes into a fresh part
    /// file that is only committed on success.
    fn fetch(&self, uri: &str, view: &mut WriteView<'_>) -> Result<Resolution<Fetched>> {
        run_with_retry(&self.policy, &self.availability, self.mode, uri, || {
            let committed = view.persist_data(|file, part| {
                match http::download(uri, file, part, &self.http) {
                    Attempt::Success(fetched) => Ok(fetched),
                    failed => Err(failed),
                }
            });
            match committed {
                Ok(Ok(fetched)) => Attempt::Success(fetched),
                Ok(Err(failed)) => failed,
                Err(e) => Attempt::Fatal(e),
            }
        })
    }
}
