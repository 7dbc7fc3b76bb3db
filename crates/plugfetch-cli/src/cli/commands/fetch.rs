//! `plugfetch fetch <name> <version>` – conditional download of one archive.
//!
//! The fetch is blocking (curl), so it runs on the blocking pool while the
//! runtime watches for Ctrl-C and trips the cancel token.

use super::Overrides;
use anyhow::{Context, Result};
use plugfetch_core::config::PlugfetchConfig;
use plugfetch_core::{CancelToken, Fetcher, PluginId};

pub async fn run_fetch(
    cfg: &PlugfetchConfig,
    name: &str,
    version: &str,
    overrides: Overrides,
) -> Result<()> {
    let id = PluginId::new(name, version)?;
    let fetcher = Fetcher::from_config(&overrides.apply(cfg))?;
    let path = fetcher.archive_path(&id);
    tracing::info!(plugin = %id, catalog = %fetcher.catalog(), "fetching");

    let cancel = CancelToken::new();
    let mut task = tokio::task::spawn_blocking({
        let cancel = cancel.clone();
        let id = id.clone();
        move || fetcher.fetch(&id, &cancel)
    });

    let result = tokio::select! {
        joined = &mut task => joined?,
        Ok(()) = tokio::signal::ctrl_c() => {
            tracing::info!(plugin = %id, "interrupt received, cancelling fetch");
            cancel.cancel();
            task.await?
        }
    };
    let outcome = result.with_context(|| format!("fetch {}", id))?;

    let verb = if outcome.was_downloaded() {
        "Downloaded"
    } else {
        "Unchanged"
    };
    tracing::info!(plugin = %id, hash = %outcome.hash(), "{}", verb.to_lowercase());
    println!("{} {}", verb, id);
    println!("{}  {}", outcome.hash(), path.display());
    Ok(())
}
