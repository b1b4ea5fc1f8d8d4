//! Document persistence
//!
//! A sink inserts one flattened document at a time. Unlike fetch failures,
//! sink failures are fatal to the rest of a run.

use crate::models::Document;
use async_trait::async_trait;
use thiserror::Error;

pub mod sqlite;

pub use sqlite::SqliteDocumentStore;

#[derive(Debug, Error)]
pub enum SinkError {
    /// Missing or unusable store configuration; raised before any work starts
    #[error("Invalid store configuration: {0}")]
    InvalidConfig(String),

    #[error("Store connection error: {0}")]
    Connection(String),

    /// Document is not storable (no string `_id`)
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// Store refused the write, e.g. duplicate `_id`
    #[error("Document {id} rejected by store: {reason}")]
    Rejected { id: String, reason: String },
}

/// Target store coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    pub endpoint: String,
    pub namespace: String,
    pub collection: String,
}

impl SinkConfig {
    pub fn new(
        endpoint: impl Into<String>,
        namespace: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            namespace: namespace.into(),
            collection: collection.into(),
        }
    }

    /// All three parts must be non-empty; names must be plain identifiers
    pub fn validate(&self) -> Result<(), SinkError> {
        if self.endpoint.trim().is_empty() {
            return Err(SinkError::InvalidConfig("store endpoint is empty".to_string()));
        }
        validate_name("namespace", &self.namespace)?;
        validate_name("collection", &self.collection)?;
        Ok(())
    }

    /// Backing table: `<namespace>__<collection>`
    pub fn table_name(&self) -> String {
        format!("{}__{}", self.namespace, self.collection)
    }
}

fn validate_name(what: &str, name: &str) -> Result<(), SinkError> {
    if name.is_empty() {
        return Err(SinkError::InvalidConfig(format!("{} is empty", what)));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(SinkError::InvalidConfig(format!(
            "{} '{}' may only contain letters, digits, '_' and '-'",
            what, name
        )));
    }
    Ok(())
}

#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Insert one document; never retried
    async fn insert(&self, document: &Document) -> Result<(), SinkError>;
}
