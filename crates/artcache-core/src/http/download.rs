//! Unconditional GET streamed into an open file.

use curl::easy::Easy;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::str;

use super::headers::parse_validators;
use super::{HttpOptions, Validators};
use crate::error::CacheError;
use crate::retry::{Attempt, Fault};

/// Result of a completed 200 download.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub bytes: u64,
    pub validators: Validators,
}

/// One GET attempt for `uri`, writing the body to `out` (whose path is `out_path`).
///
/// Only 200 is a success. Other 2xx/3xx statuses mean the server is not
/// answering a plain GET the way a cache can trust, so they are fatal
/// `CacheInconsistency`; 4xx/5xx are retryable. A local write failure is fatal.
/// On anything but success the caller must discard what was written.
pub fn download(uri: &str, out: &mut File, out_path: &Path, opts: &HttpOptions) -> Attempt<Fetched> {
    let mut easy = Easy::new();
    if let Err(e) = configure(&mut easy, uri, opts) {
        return Attempt::Fatal(e.into());
    }

    let mut header_lines: Vec<String> = Vec::new();
    let mut written = 0u64;
    let mut write_err: Option<io::Error> = None;

    let performed = {
        let mut transfer = easy.transfer();
        if let Err(e) = transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                header_lines.push(s.trim_end().to_string());
            }
            true
        }) {
            return Attempt::Fatal(e.into());
        }
        if let Err(e) = transfer.write_function(|data| match out.write_all(data) {
            Ok(()) => {
                written += data.len() as u64;
                Ok(data.len())
            }
            Err(e) => {
                write_err = Some(e);
                Ok(0) // abort transfer
            }
        }) {
            return Attempt::Fatal(e.into());
        }
        transfer.perform()
    };

    if let Some(e) = write_err {
        return Attempt::Fatal(CacheError::io("write", out_path)(e));
    }
    if let Err(e) = performed {
        return Attempt::Retryable(Fault::Transport(e));
    }

    let code = match easy.response_code() {
        Ok(code) => code,
        Err(e) => return Attempt::Retryable(Fault::Transport(e)),
    };
    tracing::debug!(uri, status = code, bytes = written, "GET");
    match code {
        200 => Attempt::Success(Fetched {
            bytes: written,
            validators: parse_validators(&header_lines),
        }),
        201..=399 => Attempt::Fatal(CacheError::CacheInconsistency {
            uri: uri.to_string(),
            status: code,
        }),
        _ => Attempt::Retryable(Fault::BadStatus(code)),
    }
}

fn configure(easy: &mut Easy, uri: &str, opts: &HttpOptions) -> Result<(), curl::Error> {
    easy.url(uri)?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.low_speed_limit(1)?;
    easy.low_speed_time(opts.low_speed_time)?;
    Ok(())
}
