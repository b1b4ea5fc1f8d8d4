//! Metadata providers
//!
//! A provider turns a native title ID plus a facet selection into a raw
//! object graph. Two implementations ship with the crate:
//! - [`HttpProvider`]: JSON metadata service over HTTP, rate limited
//! - [`DirectoryProvider`]: offline mirror of `tt<id>.json` files

use crate::models::{FacetSet, RawObject, WireError};
use async_trait::async_trait;
use thiserror::Error;

pub mod directory;
pub mod http;

pub use directory::DirectoryProvider;
pub use http::HttpProvider;

/// Fetch failures; always non-fatal to a batch
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Title not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<WireError> for FetchError {
    fn from(err: WireError) -> Self {
        FetchError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}

/// Source of raw title metadata
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Short provider name for logs
    fn name(&self) -> &'static str;

    /// Retrieve one title; `facets` always contains the base facet
    async fn fetch(&self, id: &str, facets: &FacetSet) -> Result<RawObject, FetchError>;
}

/// Decode a provider payload into a title graph
pub(crate) fn decode_payload(body: &str) -> Result<RawObject, FetchError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    Ok(RawObject::from_json(value)?)
}
