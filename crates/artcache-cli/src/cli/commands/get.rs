//! `artcache get <uri>` – retrieve through the cache and copy the artifact out.

use anyhow::{Context, Result};
use artcache_core::DownloadCache;
use std::path::{Path, PathBuf};

use super::print_sha256;

/// Default destination: the URI's last non-empty path segment, or `download.bin`.
pub fn default_output(uri: &str) -> PathBuf {
    let name = url::Url::parse(uri)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segs| segs.next_back().map(str::to_string))
        })
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "download.bin".to_string());
    PathBuf::from(name)
}

pub fn run_get(cache: &DownloadCache, uri: &str, output: Option<&Path>, sha256: bool) -> Result<()> {
    let dest = output.map(Path::to_path_buf).unwrap_or_else(|| default_output(uri));
    let bytes = cache
        .copy_to(uri, &dest)
        .with_context(|| format!("retrieving {}", uri))?;
    tracing::info!(uri, dest = %dest.display(), bytes, "artifact copied out of cache");
    println!("{} ({} bytes)", dest.display(), bytes);
    if sha256 {
        print_sha256(&dest)?;
    }
    Ok(())
}
