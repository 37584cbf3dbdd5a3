//! Logging init for artcache binaries.
//!
//! Several processes commonly share one cache directory and so one log file
//! under the XDG state dir. Lines carry the thread id, and everything logged
//! inside `enter_process_span` carries the pid, so interleaved output from
//! concurrent `get`s can be told apart. The library itself only emits through
//! `tracing`.

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::span::EnteredSpan;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,artcache=debug,artcache_core=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Path of the log file: `~/.local/state/artcache/artcache.log`.
/// Creates the directory if needed.
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("artcache")?;
    Ok(xdg_dirs.place_state_file("artcache.log")?)
}

/// Appends to the shared log file. Returns its path; on error the caller
/// should fall back to `init_logging_stderr`.
pub fn init_logging() -> Result<PathBuf> {
    let path = log_file_path()?;
    let file = fs::OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_thread_ids(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    Ok(path)
}

pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_thread_ids(true)
        .try_init();
}

/// Tags everything logged on this thread with the process id until the
/// returned guard is dropped.
pub fn enter_process_span() -> EnteredSpan {
    tracing::info_span!("artcache", pid = std::process::id()).entered()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }

    #[test]
    fn process_span_without_subscriber_is_harmless() {
        let guard = enter_process_span();
        tracing::info!("no subscriber installed");
        drop(guard);
    }
}
