//! SHA-256 output for `artcache get --sha256`.

use anyhow::Result;
use artcache_core::checksum;
use std::path::Path;

/// Compute and print SHA-256 of the given file.
pub fn print_sha256(path: &Path) -> Result<()> {
    let digest = checksum::sha256_path(path)?;
    println!("{}  {}", digest, path.display());
    Ok(())
}
