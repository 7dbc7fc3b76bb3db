//! Conditional download of plugin archives.
//!
//! `Fetcher::fetch` hashes the cached archive (if any), sends the hash as
//! `X-Plugin-Hash`, and either keeps the cached file on 304 or replaces it
//! on 200 and rehashes what landed on disk.

mod error;
mod sink;
mod status;
mod transfer;

pub use error::FetchError;

use crate::cache::ArchiveCache;
use crate::catalog::CatalogUrl;
use crate::checksum::{self, ContentHash};
use crate::config::PlugfetchConfig;
use crate::control::CancelToken;
use crate::plugin::PluginId;
use crate::retry::{run_with_retry, RetryPolicy};
use anyhow::Context;
use std::cell::Cell;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use transfer::{Attempt, Response};

/// Request header carrying the cached archive's content hash.
pub const HASH_HEADER: &str = "X-Plugin-Hash";

/// curl knobs for a single transfer.
#[derive(Debug, Clone)]
pub struct TransferOptions {
    pub connect_timeout: Duration,
    /// Hard wall-clock limit for one attempt.
    pub timeout: Duration,
    /// Bytes/sec floor; below it for `low_speed_time` aborts the attempt.
    pub low_speed_limit: u32,
    pub low_speed_time: Duration,
    pub max_redirections: u32,
    pub user_agent: String,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(3600),
            low_speed_limit: 1024,
            low_speed_time: Duration::from_secs(60),
            max_redirections: 10,
            user_agent: format!("plugfetch/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// What a successful fetch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Server sent a new archive; hash is of the file now on disk.
    Downloaded(ContentHash),
    /// Server answered 304; hash is of the untouched cached archive.
    Unchanged(ContentHash),
}

impl FetchOutcome {
    pub fn hash(&self) -> &ContentHash {
        match self {
            FetchOutcome::Downloaded(h) | FetchOutcome::Unchanged(h) => h,
        }
    }

    pub fn into_hash(self) -> ContentHash {
        match self {
            FetchOutcome::Downloaded(h) | FetchOutcome::Unchanged(h) => h,
        }
    }

    pub fn was_downloaded(&self) -> bool {
        matches!(self, FetchOutcome::Downloaded(_))
    }
}

#[derive(Debug, Clone)]
pub struct Fetcher {
    cache: ArchiveCache,
    catalog: CatalogUrl,
    retry: RetryPolicy,
    transfer: TransferOptions,
}

impl Fetcher {
    pub fn new(cache: ArchiveCache, catalog: CatalogUrl) -> Self {
        Self {
            cache,
            catalog,
            retry: RetryPolicy::default(),
            transfer: TransferOptions::default(),
        }
    }

    /// Build from the loaded config: catalog URL, cache root, retry and timeouts.
    pub fn from_config(cfg: &PlugfetchConfig) -> anyhow::Result<Self> {
        let catalog = cfg.catalog()?;
        let cache = cfg.archive_cache().context("resolve archive cache dir")?;
        Ok(Self::new(cache, catalog)
            .with_retry(cfg.retry_policy())
            .with_transfer_options(cfg.transfer_options()))
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_transfer_options(mut self, transfer: TransferOptions) -> Self {
        self.transfer = transfer;
        self
    }

    pub fn cache(&self) -> &ArchiveCache {
        &self.cache
    }

    pub fn catalog(&self) -> &CatalogUrl {
        &self.catalog
    }

    pub fn archive_path(&self, id: &PluginId) -> PathBuf {
        self.cache.archive_path(id)
    }

    /// Make the cached archive for `id` match the catalog and return its hash.
    ///
    /// `cancel` bounds the network phase only. After an error the archive
    /// file may be missing, stale, or partially written.
    pub fn fetch(&self, id: &PluginId, cancel: &CancelToken) -> Result<FetchOutcome, FetchError> {
        let dest = self.cache.archive_path(id);
        let local_hash = local_hash(&dest)?;
        match &local_hash {
            Some(h) => tracing::debug!(plugin = %id, hash = %h, "cached archive found"),
            None => tracing::debug!(plugin = %id, "no cached archive"),
        }

        let url = self.catalog.download_url(id)?;
        // Set once an attempt truncates `dest`; from then on `local_hash` is stale.
        let touched = Cell::new(false);
        let response = run_with_retry(&self.retry, cancel, |attempt_no| {
            let sent_hash = local_hash.as_ref().filter(|_| !touched.get());
            tracing::debug!(plugin = %id, url = %url, attempt = attempt_no, conditional = sent_hash.is_some(), "requesting archive");
            transfer::get(&Attempt {
                url: &url,
                local_hash: sent_hash,
                dest: &dest,
                touched: &touched,
                cancel,
                opts: &self.transfer,
            })
        })?;

        match response {
            Response::NotModified => {
                let hash = local_hash
                    .filter(|_| !touched.get())
                    .ok_or(FetchError::NotModifiedWithoutCache)?;
                tracing::debug!(plugin = %id, "archive unchanged");
                Ok(FetchOutcome::Unchanged(hash))
            }
            Response::Stored { bytes } => {
                let hash = checksum::sha256_path(&dest).map_err(|source| FetchError::Hash {
                    path: dest.clone(),
                    source,
                })?;
                tracing::debug!(plugin = %id, bytes, hash = %hash, path = %dest.display(), "archive written");
                Ok(FetchOutcome::Downloaded(hash))
            }
        }
    }
}

/// Hash of the archive at `path`, or None if there is no file yet.
fn local_hash(path: &Path) -> Result<Option<ContentHash>, FetchError> {
    match path.metadata() {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(FetchError::Stat {
                path: path.to_path_buf(),
                source,
            })
        }
    }
    checksum::sha256_path(path)
        .map(Some)
        .map_err(|source| FetchError::Hash {
            path: path.to_path_buf(),
            source,
        })
}
