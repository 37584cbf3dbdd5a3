//! CLI for the artcache download cache.

mod commands;

use anyhow::Result;
use artcache_core::{config, Availability, DownloadCache};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use commands::{run_evict, run_get, run_key, run_path};

/// Top-level CLI for the artcache download cache.
#[derive(Debug, Parser)]
#[command(name = "artcache")]
#[command(about = "artcache: cross-process artifact download cache", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Retrieve an artifact through the cache and copy it out.
    Get {
        /// Absolute HTTP/HTTPS URI of the artifact.
        uri: String,

        /// Destination file (default: last path segment of the URI in the current directory).
        #[arg(long, short, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Print the SHA-256 of the retrieved artifact.
        #[arg(long)]
        sha256: bool,
    },

    /// Remove the cache entry for a URI.
    Evict {
        /// Absolute HTTP/HTTPS URI of the artifact.
        uri: String,
    },

    /// Show the cache files backing a URI.
    Path {
        /// Absolute HTTP/HTTPS URI of the artifact.
        uri: String,
    },

    /// Print the escaped key for a URI (file name stem in cache and look-aside dirs).
    Key {
        /// Absolute HTTP/HTTPS URI of the artifact.
        uri: String,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        let availability = Arc::new(Availability::new());
        let cache = DownloadCache::from_config(&cfg, availability)?;

        match cli.command {
            CliCommand::Get {
                uri,
                output,
                sha256,
            } => run_get(&cache, &uri, output.as_deref(), sha256)?,
            CliCommand::Evict { uri } => run_evict(&cache, &uri)?,
            CliCommand::Path { uri } => run_path(&cache, &uri),
            CliCommand::Key { uri } => run_key(&uri),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
