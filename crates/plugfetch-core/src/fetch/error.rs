//! Stage-tagged fetch errors.

use crate::catalog::CatalogUrlError;
use crate::plugin::InvalidPluginId;
use crate::retry::{classify_curl_error, classify_http_status, Classify, ErrorKind};
use std::io;
use std::path::PathBuf;

/// Every way a fetch can fail, one variant per stage.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    InvalidId(#[from] InvalidPluginId),
    #[error("failed to read archive {}", path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to compute hash of {}", path.display())]
    Hash {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to build endpoint URL")]
    Url(#[from] CatalogUrlError),
    #[error("failed to create request")]
    Request(#[source] curl::Error),
    #[error("failed to call service")]
    Transport(#[source] curl::Error),
    #[error("fetch cancelled")]
    Cancelled,
    #[error("failed to create directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to create file {}", path.display())]
    CreateFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write response to {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("server answered not modified but no archive is cached")]
    NotModifiedWithoutCache,
    #[error("error: {code}: {body}")]
    Status { code: u32, body: String },
}

impl FetchError {
    /// HTTP status for `Status` errors.
    pub fn status_code(&self) -> Option<u32> {
        match self {
            FetchError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl Classify for FetchError {
    fn error_kind(&self) -> ErrorKind {
        match self {
            FetchError::Transport(e) => classify_curl_error(e),
            FetchError::Status { code, .. } => classify_http_status(*code),
            _ => ErrorKind::Other,
        }
    }
}
