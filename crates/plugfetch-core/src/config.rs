use crate::cache::ArchiveCache;
use crate::catalog::{CatalogUrl, CatalogUrlError, DEFAULT_CATALOG_URL};
use crate::fetch::TransferOptions;
use crate::retry::RetryPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per fetch (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_secs: 0.25,
            max_delay_secs: 30,
        }
    }
}

fn default_catalog_url() -> String {
    DEFAULT_CATALOG_URL.to_string()
}

fn default_connect_timeout_secs() -> u64 {
    30
}

fn default_timeout_secs() -> u64 {
    3600
}

/// Global configuration loaded from `~/.config/plugfetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlugfetchConfig {
    /// Base URL of the plugin catalog; `download/<name>/<version>` is appended.
    #[serde(default = "default_catalog_url")]
    pub catalog_url: String,
    /// Archive cache root. None = `$XDG_CACHE_HOME/plugfetch/archives`.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// Connect timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Hard timeout for a whole transfer in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for PlugfetchConfig {
    fn default() -> Self {
        Self {
            catalog_url: default_catalog_url(),
            cache_dir: None,
            connect_timeout_secs: default_connect_timeout_secs(),
            timeout_secs: default_timeout_secs(),
            retry: None,
        }
    }
}

impl PlugfetchConfig {
    pub fn catalog(&self) -> Result<CatalogUrl, CatalogUrlError> {
        CatalogUrl::parse(&self.catalog_url)
    }

    /// Configured cache root, or the XDG default.
    pub fn archive_cache(&self) -> std::io::Result<ArchiveCache> {
        match &self.cache_dir {
            Some(dir) => Ok(ArchiveCache::new(dir)),
            None => ArchiveCache::at_default_root(),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
            .as_ref()
            .map(RetryPolicy::from)
            .unwrap_or_default()
    }

    pub fn transfer_options(&self) -> TransferOptions {
        TransferOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: Duration::from_secs(self.timeout_secs),
            ..TransferOptions::default()
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("plugfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PlugfetchConfig> {
    load_or_init_at(&config_path()?)
}

pub fn load_or_init_at(path: &Path) -> Result<PlugfetchConfig> {
    if !path.exists() {
        let default_cfg = PlugfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: PlugfetchConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
