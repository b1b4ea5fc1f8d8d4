//! Fetch-and-flatten stage
//!
//! Takes one identifier from provider to store-ready document. Every
//! failure is recorded in the error log and the item is dropped; nothing
//! here can fail the batch.

use crate::error_log::ErrorLog;
use crate::flatten::flatten;
use crate::models::{Document, FacetSet};
use crate::provider::MetadataProvider;
use std::sync::Arc;
use tracing::{debug, error, warn};

pub struct FetchStage {
    provider: Arc<dyn MetadataProvider>,
    error_log: Arc<ErrorLog>,
}

impl FetchStage {
    pub fn new(provider: Arc<dyn MetadataProvider>, error_log: Arc<ErrorLog>) -> Self {
        Self { provider, error_log }
    }

    pub fn error_log(&self) -> &ErrorLog {
        &self.error_log
    }

    /// Fetch and flatten one title; `None` if it was dropped
    pub async fn process(&self, id: &str, facets: &FacetSet) -> Option<Document> {
        let raw = match self.provider.fetch(id, facets).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(id = %id, provider = self.provider.name(), error = %e, "Fetch failed, dropping title");
                self.record(format!("Error retrieving movie with title {}: {}", id, e)).await;
                return None;
            }
        };

        match flatten(&raw) {
            Ok(document) => {
                debug!(id = %id, fields = document.len(), "Flattened title");
                Some(document)
            }
            Err(e) => {
                warn!(id = %id, error = %e, "Flatten failed, dropping title");
                self.record(format!("Error flattening movie with title {}: {}", id, e)).await;
                None
            }
        }
    }

    /// Append to the error log on the blocking pool; file I/O and rotation
    /// run under the log's mutex
    async fn record(&self, message: String) {
        let error_log = Arc::clone(&self.error_log);
        let result = tokio::task::spawn_blocking(move || {
            let outcome = error_log.append(&message);
            (outcome, message)
        })
        .await;

        match result {
            Ok((Ok(()), _)) => {}
            Ok((Err(e), message)) => error!(
                path = %self.error_log.path().display(),
                error = %e,
                record = %message,
                "Failed to write error log"
            ),
            Err(e) => error!(
                path = %self.error_log.path().display(),
                error = %e,
                "Error log task failed"
            ),
        }
    }
}
