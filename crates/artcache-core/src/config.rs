use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::CacheError;
use crate::http::HttpOptions;
use crate::retry::RetryPolicy;

/// Environment variable that overrides `remote_downloads` from the config file.
pub const REMOTE_DOWNLOADS_ENV: &str = "ARTCACHE_REMOTE_DOWNLOADS";

/// Whether the cache may touch the network at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteDownloads {
    Enabled,
    Disabled,
}

impl FromStr for RemoteDownloads {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "enabled" => Ok(RemoteDownloads::Enabled),
            "disabled" => Ok(RemoteDownloads::Disabled),
            other => Err(CacheError::Configuration(format!(
                "remote_downloads must be \"enabled\" or \"disabled\", got {:?}",
                other
            ))),
        }
    }
}

impl fmt::Display for RemoteDownloads {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RemoteDownloads::Enabled => "enabled",
            RemoteDownloads::Disabled => "disabled",
        })
    }
}

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Attempts per request while network availability is still unknown.
    pub detection_attempts: u32,
    /// Attempts per request once availability is known.
    pub known_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            detection_attempts: 5,
            known_attempts: 3,
            base_delay_secs: 0.25,
            max_delay_secs: 4,
        }
    }
}

/// HTTP timeouts (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    /// Abort a transfer that stalls below 1 byte/s for this long.
    pub low_speed_time_secs: u64,
    /// Total time allowed for a revalidation HEAD.
    pub head_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            low_speed_time_secs: 30,
            head_timeout_secs: 30,
        }
    }
}

/// Cache configuration loaded from `~/.config/artcache/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache root; defaults to `<temp dir>/artcache`.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// Read-only look-aside root consulted when the network is unusable.
    #[serde(default)]
    pub lookaside_dir: Option<PathBuf>,
    /// "enabled" or "disabled"; validated by `remote_downloads()`.
    #[serde(default = "default_remote_downloads")]
    pub remote_downloads: String,
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    #[serde(default)]
    pub http: Option<HttpConfig>,
}

fn default_remote_downloads() -> String {
    RemoteDownloads::Enabled.to_string()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            lookaside_dir: None,
            remote_downloads: default_remote_downloads(),
            retry: None,
            http: None,
        }
    }
}

impl CacheConfig {
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("artcache"))
    }

    pub fn remote_downloads(&self) -> Result<RemoteDownloads, CacheError> {
        self.remote_downloads.parse()
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        let r = self.retry.clone().unwrap_or_default();
        RetryPolicy {
            detection_attempts: r.detection_attempts,
            known_attempts: r.known_attempts,
            base_delay: Duration::from_secs_f64(r.base_delay_secs.max(0.0)),
            max_delay: Duration::from_secs(r.max_delay_secs),
        }
    }

    pub fn http_options(&self) -> HttpOptions {
        let h = self.http.clone().unwrap_or_default();
        HttpOptions {
            connect_timeout: Duration::from_secs(h.connect_timeout_secs),
            low_speed_time: Duration::from_secs(h.low_speed_time_secs),
            head_timeout: Duration::from_secs(h.head_timeout_secs),
        }
    }

    /// Apply `ARTCACHE_REMOTE_DOWNLOADS` if set.
    pub fn apply_env(&mut self) {
        if let Ok(v) = std::env::var(REMOTE_DOWNLOADS_ENV) {
            tracing::debug!("{} overrides remote_downloads: {:?}", REMOTE_DOWNLOADS_ENV, v);
            self.remote_downloads = v;
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("artcache")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
/// Environment overrides are applied on top.
pub fn load_or_init() -> Result<CacheConfig> {
    let path = config_path()?;
    let mut cfg = if !path.exists() {
        let default_cfg = CacheConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        default_cfg
    } else {
        let data = fs::read_to_string(&path)?;
        toml::from_str(&data)?
    };
    cfg.apply_env();
    Ok(cfg)
}
