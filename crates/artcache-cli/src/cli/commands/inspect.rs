//! `artcache path` / `artcache key` – show where a URI lives on disk.

use artcache_core::entry::escape_uri;
use artcache_core::DownloadCache;

pub fn run_path(cache: &DownloadCache, uri: &str) {
    let paths = cache.entry_paths(uri);
    for (label, path) in [
        ("data", &paths.data),
        ("lock", &paths.lock),
        ("etag", &paths.etag),
        ("last-modified", &paths.last_modified),
    ] {
        let state = if path.exists() { "present" } else { "absent" };
        println!("{:<14} {:<8} {}", label, state, path.display());
    }
}

pub fn run_key(uri: &str) {
    println!("{}", escape_uri(uri));
}
