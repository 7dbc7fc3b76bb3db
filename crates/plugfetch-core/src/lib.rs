//! plugfetch core: keep a local cache of versioned plugin archives in sync
//! with a remote catalog using hash-conditioned downloads.

pub mod cache;
pub mod catalog;
pub mod checksum;
pub mod config;
pub mod control;
pub mod fetch;
pub mod logging;
pub mod plugin;
pub mod retry;

pub use cache::ArchiveCache;
pub use catalog::CatalogUrl;
pub use checksum::ContentHash;
pub use control::CancelToken;
pub use fetch::{FetchError, FetchOutcome, Fetcher};
pub use plugin::PluginId;
