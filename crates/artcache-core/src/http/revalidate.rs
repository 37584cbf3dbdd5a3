//! Conditional HEAD revalidation.

use curl::easy::{Easy, List};
use tracing::debug;

use super::{HttpOptions, Validators};
use crate::retry::{Attempt, Fault};

/// What a conditional HEAD said about the cached copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// 304: the cached data is current.
    Fresh,
    /// Any other 2xx/3xx: the resource changed (or the server ignores validators).
    Stale(u32),
}

/// One conditional HEAD attempt for `uri` using the stored validators.
///
/// Empty validators are not sent (an empty `If-None-Match` means nothing), but
/// their presence on disk still routes the entry through here.
pub fn revalidate(uri: &str, validators: &Validators, opts: &HttpOptions) -> Attempt<Freshness> {
    let mut easy = Easy::new();
    if let Err(e) = configure(&mut easy, uri, validators, opts) {
        return Attempt::Fatal(e.into());
    }

    let performed = {
        let mut transfer = easy.transfer();
        match transfer.write_function(|data| Ok(data.len())) {
            Ok(()) => transfer.perform(),
            Err(e) => return Attempt::Fatal(e.into()),
        }
    };
    if let Err(e) = performed {
        return Attempt::Retryable(Fault::Transport(e));
    }

    let code = match easy.response_code() {
        Ok(code) => code,
        Err(e) => return Attempt::Retryable(Fault::Transport(e)),
    };
    debug!(uri, status = code, "HEAD revalidation");
    match code {
        304 => Attempt::Success(Freshness::Fresh),
        200..=399 => Attempt::Success(Freshness::Stale(code)),
        _ => Attempt::Retryable(Fault::BadStatus(code)),
    }
}

fn configure(
    easy: &mut Easy,
    uri: &str,
    validators: &Validators,
    opts: &HttpOptions,
) -> Result<(), curl::Error> {
    easy.url(uri)?;
    easy.nobody(true)?; // HEAD request
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.head_timeout)?;

    let mut list = List::new();
    let mut any = false;
    if let Some(etag) = validators.etag.as_deref().filter(|v| !v.is_empty()) {
        list.append(&format!("If-None-Match: {}", etag))?;
        any = true;
    }
    if let Some(lm) = validators.last_modified.as_deref().filter(|v| !v.is_empty()) {
        list.append(&format!("If-Modified-Since: {}", lm))?;
        any = true;
    }
    if any {
        easy.http_headers(list)?;
    }
    Ok(())
}
