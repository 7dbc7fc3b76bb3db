//! Catalog endpoint construction.
//!
//! The catalog base URL is parsed and checked once; download endpoints are
//! then built by appending path segments, never by string concatenation.

use crate::plugin::PluginId;
use url::Url;

pub const DEFAULT_CATALOG_URL: &str = "https://plugins.traefik.io/public/";

const DOWNLOAD_SEGMENT: &str = "download";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogUrlError {
    #[error("invalid catalog URL {url:?}: {source}")]
    Parse {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("catalog URL {0:?} must use http or https")]
    UnsupportedScheme(String),
    #[error("catalog URL {0:?} cannot carry path segments")]
    CannotBeABase(String),
}

/// Validated base URL of the plugin catalog service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogUrl(Url);

impl CatalogUrl {
    pub fn parse(input: &str) -> Result<Self, CatalogUrlError> {
        let url = Url::parse(input).map_err(|source| CatalogUrlError::Parse {
            url: input.to_string(),
            source,
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(CatalogUrlError::UnsupportedScheme(input.to_string()));
        }
        if url.cannot_be_a_base() {
            return Err(CatalogUrlError::CannotBeABase(input.to_string()));
        }
        Ok(Self(url))
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// `{base}/download/{name...}/{version}`. Query and fragment of the base
    /// are dropped; each segment is percent-encoded on its own.
    pub fn download_url(&self, id: &PluginId) -> Result<Url, CatalogUrlError> {
        let mut url = self.0.clone();
        url.set_query(None);
        url.set_fragment(None);
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| CatalogUrlError::CannotBeABase(self.0.to_string()))?;
            segments.pop_if_empty();
            segments.push(DOWNLOAD_SEGMENT);
            segments.extend(id.name_segments());
            segments.push(id.version());
        }
        Ok(url)
    }
}

impl Default for CatalogUrl {
    fn default() -> Self {
        Self(Url::parse(DEFAULT_CATALOG_URL).expect("default catalog URL is valid"))
    }
}

impl std::fmt::Display for CatalogUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
