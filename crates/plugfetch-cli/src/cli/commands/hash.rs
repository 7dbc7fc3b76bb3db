//! `plugfetch hash <path>` – compute SHA-256 of a file.

use anyhow::{Context, Result};
use plugfetch_core::checksum;
use std::path::Path;

pub async fn run_hash(path: &Path) -> Result<()> {
    let digest = checksum::sha256_path(path).with_context(|| format!("hash {}", path.display()))?;
    println!("{}  {}", digest, path.display());
    Ok(())
}
