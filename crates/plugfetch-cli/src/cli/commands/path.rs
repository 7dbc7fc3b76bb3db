//! `plugfetch path <name> <version>` – print where the archive is cached.

use super::Overrides;
use anyhow::{Context, Result};
use plugfetch_core::config::PlugfetchConfig;
use plugfetch_core::PluginId;

pub async fn run_path(
    cfg: &PlugfetchConfig,
    name: &str,
    version: &str,
    overrides: Overrides,
) -> Result<()> {
    let id = PluginId::new(name, version)?;
    let cache = overrides
        .apply(cfg)
        .archive_cache()
        .context("resolve archive cache dir")?;
    println!("{}", cache.archive_path(&id).display());
    Ok(())
}
