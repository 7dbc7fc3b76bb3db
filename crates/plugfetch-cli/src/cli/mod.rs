//! CLI for plugfetch.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use plugfetch_core::config;
use std::path::PathBuf;

use commands::{run_fetch, run_hash, run_path, Overrides};

/// Top-level CLI for plugfetch.
#[derive(Debug, Parser)]
#[command(name = "plugfetch")]
#[command(about = "plugfetch: keep cached plugin archives in sync with the catalog", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch a plugin archive, keeping the cached copy if the catalog reports it unchanged.
    Fetch {
        /// Plugin name, slash-separated (e.g. github.com/acme/tool).
        name: String,
        /// Plugin version (e.g. v1.0.0).
        version: String,
        /// Archive cache root (overrides config).
        #[arg(long, value_name = "DIR")]
        cache_dir: Option<PathBuf>,
        /// Catalog base URL (overrides config).
        #[arg(long, value_name = "URL")]
        catalog_url: Option<String>,
    },

    /// Print the local archive path for a plugin without contacting the catalog.
    Path {
        /// Plugin name, slash-separated.
        name: String,
        /// Plugin version.
        version: String,
        /// Archive cache root (overrides config).
        #[arg(long, value_name = "DIR")]
        cache_dir: Option<PathBuf>,
    },

    /// Compute SHA-256 of a file (e.g. a cached archive).
    Hash {
        /// Path to the file.
        path: PathBuf,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Fetch {
                name,
                version,
                cache_dir,
                catalog_url,
            } => {
                let overrides = Overrides {
                    cache_dir,
                    catalog_url,
                };
                run_fetch(&cfg, &name, &version, overrides).await?
            }
            CliCommand::Path {
                name,
                version,
                cache_dir,
            } => {
                let overrides = Overrides {
                    cache_dir,
                    catalog_url: None,
                };
                run_path(&cfg, &name, &version, overrides).await?
            }
            CliCommand::Hash { path } => run_hash(&path).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
