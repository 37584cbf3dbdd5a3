//! `artcache evict <uri>` – remove a cache entry.

use anyhow::Result;
use artcache_core::DownloadCache;

pub fn run_evict(cache: &DownloadCache, uri: &str) -> Result<()> {
    cache.evict(uri)?;
    println!("Evicted {uri}");
    Ok(())
}
