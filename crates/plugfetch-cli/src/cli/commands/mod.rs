//! CLI command handlers, one file per command.

mod fetch;
mod hash;
mod path;

pub use fetch::run_fetch;
pub use hash::run_hash;
pub use path::run_path;

use plugfetch_core::config::PlugfetchConfig;
use std::path::PathBuf;

/// Per-invocation settings that take precedence over config.toml.
#[derive(Debug, Default)]
pub struct Overrides {
    pub cache_dir: Option<PathBuf>,
    pub catalog_url: Option<String>,
}

impl Overrides {
    pub fn apply(self, cfg: &PlugfetchConfig) -> PlugfetchConfig {
        let mut cfg = cfg.clone();
        if let Some(dir) = self.cache_dir {
            cfg.cache_dir = Some(dir);
        }
        if let Some(url) = self.catalog_url {
            cfg.catalog_url = url;
        }
        cfg
    }
}
