//! Two-pass ingest pipeline
//!
//! Pass 1 fetches and flattens every identifier on the worker pool; failed
//! items are logged and dropped. Pass 2 inserts the surviving documents on
//! the same pool size and stops at the first insert failure. Documents
//! inserted before that failure are kept.

pub mod stage;
pub mod worker_pool;

pub use stage::FetchStage;
pub use worker_pool::{WorkerFailure, WorkerPool};

use crate::error::{IngestError, IngestResult};
use crate::models::{Document, FacetSet};
use crate::sink::DocumentSink;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

const PROGRESS_INTERVAL: usize = 10;

/// Outcome of a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub requested: usize,
    pub fetched: usize,
    pub dropped: usize,
    pub persisted: usize,
}

pub struct IngestPipeline {
    stage: Arc<FetchStage>,
    sink: Arc<dyn DocumentSink>,
    pool: WorkerPool,
}

impl IngestPipeline {
    pub fn new(stage: FetchStage, sink: Arc<dyn DocumentSink>, pool: WorkerPool) -> Self {
        Self {
            stage: Arc::new(stage),
            sink,
            pool,
        }
    }

    pub fn pool(&self) -> WorkerPool {
        self.pool
    }

    /// Pass 1: fetch and flatten; never fails on item errors
    pub async fn fetch_all(&self, ids: Vec<String>, facets: &FacetSet) -> IngestResult<Vec<Document>> {
        let total = ids.len();
        info!(titles = total, workers = self.pool.size(), facets = %facets, "Fetching titles");

        let stage = Arc::clone(&self.stage);
        let facets = Arc::new(facets.clone());
        let processed = Arc::new(AtomicUsize::new(0));

        let results = self
            .pool
            .run(ids, move |id: String| {
                let stage = Arc::clone(&stage);
                let facets = Arc::clone(&facets);
                let processed = Arc::clone(&processed);
                async move {
                    let document = stage.process(&id, &facets).await;

                    let current = processed.fetch_add(1, Ordering::Relaxed) + 1;
                    if current % PROGRESS_INTERVAL == 0 || current == total {
                        info!(progress = format!("{}/{}", current, total), "Fetch progress");
                    }
                    document
                }
            })
            .await?;

        Ok(results.into_iter().flatten().collect())
    }

    /// Pass 2: insert every document, stopping at the first failure
    pub async fn persist_all(&self, documents: Vec<Document>) -> IngestResult<usize> {
        let total = documents.len();
        info!(documents = total, "Persisting documents");

        let sink = Arc::clone(&self.sink);
        let inserted = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&inserted);

        let outcome = self
            .pool
            .try_run(documents, move |document: Document| {
                let sink = Arc::clone(&sink);
                let counter = Arc::clone(&counter);
                async move {
                    sink.insert(&document).await.map_err(IngestError::from)?;
                    let current = counter.fetch_add(1, Ordering::Relaxed) + 1;
                    debug!(id = document.id().unwrap_or_default(), inserted = current, "Persisted document");
                    Ok::<_, IngestError>(())
                }
            })
            .await;

        let persisted = inserted.load(Ordering::Relaxed);
        match outcome {
            Ok(_) => Ok(persisted),
            Err(e) => {
                tracing::error!(persisted, remaining = total - persisted, error = %e, "Persistence aborted");
                Err(e)
            }
        }
    }

    /// Both passes over one batch
    pub async fn run(&self, ids: Vec<String>, facets: &FacetSet) -> IngestResult<RunReport> {
        let requested = ids.len();
        let documents = self.fetch_all(ids, facets).await?;
        let fetched = documents.len();
        let dropped = requested - fetched;
        info!(requested, fetched, dropped, "Fetch pass complete");

        let persisted = self.persist_all(documents).await?;
        info!(persisted, "Persist pass complete");

        Ok(RunReport {
            requested,
            fetched,
            dropped,
            persisted,
        })
    }
}
