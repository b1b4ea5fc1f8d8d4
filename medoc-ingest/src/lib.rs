//! medoc-ingest library
//!
//! Fetches title metadata graphs from a provider, flattens each into a
//! document keyed by a kind-tagged `_id`, and stores the documents.
//! Fetch and flatten failures are logged per item and skipped; store
//! failures end the run.

pub mod cli;
pub mod error;
pub mod error_log;
pub mod flatten;
pub mod ids;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod provider;
pub mod settings;
pub mod sink;
pub mod tagger;

pub use crate::error::{IngestError, IngestResult};
pub use crate::pipeline::{IngestPipeline, RunReport};

use crate::error_log::ErrorLog;
use crate::pipeline::{FetchStage, WorkerPool};
use crate::settings::RunSettings;
use crate::sink::SqliteDocumentStore;
use std::sync::Arc;
use tracing::info;

/// Run one ingest batch as configured by `settings`
///
/// Configuration problems (store coordinates, provider, identifier file)
/// are reported before any title is fetched.
pub async fn ingest(settings: &RunSettings) -> IngestResult<RunReport> {
    settings.sink.validate()?;

    let ids = ids::read_id_file(&settings.ids_file).await?;
    let provider = settings.provider.build()?;
    let error_log = ErrorLog::new(
        settings.error_log_dir.join(error_log::ERROR_LOG_FILE),
        settings.error_log_dir.join(error_log::ERROR_LOG_BACKUP_FILE),
        settings.error_log_max_bytes,
    );
    info!(
        provider = provider.name(),
        error_log = %error_log.path().display(),
        "Ingest configured"
    );

    let store = Arc::new(SqliteDocumentStore::connect(&settings.sink).await?);
    let pool = settings
        .workers
        .map(WorkerPool::new)
        .unwrap_or_else(WorkerPool::for_host);

    let pipeline = IngestPipeline::new(
        FetchStage::new(provider, Arc::new(error_log)),
        store.clone(),
        pool,
    );
    let result = pipeline.run(ids, &settings.facets).await;

    store.close().await;
    result
}
