//! On-disk archive cache layout.
//!
//! `<root>/<name segments...>/<version>.zip`. The root is always passed in
//! explicitly; `default_root` only supplies the XDG location for the CLI.

use crate::plugin::PluginId;
use std::path::{Path, PathBuf};

/// File extension of cached archives.
pub const ARCHIVE_EXT: &str = "zip";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveCache {
    root: PathBuf,
}

impl ArchiveCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Cache under `$XDG_CACHE_HOME/plugfetch/archives`.
    pub fn at_default_root() -> std::io::Result<Self> {
        Ok(Self::new(default_root()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Local path for `id`. Pure function of the identifier.
    pub fn archive_path(&self, id: &PluginId) -> PathBuf {
        let mut path = self.root.clone();
        path.extend(id.name_segments());
        path.push(format!("{}.{}", id.version(), ARCHIVE_EXT));
        path
    }
}

pub fn default_root() -> std::io::Result<PathBuf> {
    let dir = xdg::BaseDirectories::with_prefix("plugfetch")?.get_cache_home();
    Ok(dir.join("archives"))
}
