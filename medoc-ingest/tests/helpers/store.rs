//! Store fixtures

use async_trait::async_trait;
use medoc_ingest::models::Document;
use medoc_ingest::sink::{DocumentSink, SinkConfig, SinkError, SqliteDocumentStore};
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

/// File-backed store in a temp dir
///
/// Returns (TempDir, SinkConfig, store); the TempDir must outlive the test
pub async fn create_test_store() -> (TempDir, SinkConfig, SqliteDocumentStore) {
    let temp_dir = TempDir::new().unwrap();
    let endpoint = format!("sqlite://{}", temp_dir.path().join("store.db").display());
    let config = SinkConfig::new(endpoint, "imdb", "movies");
    let store = SqliteDocumentStore::connect(&config).await.unwrap();
    (temp_dir, config, store)
}

/// Sink that accepts `capacity` documents and rejects everything after
pub struct FailingSink {
    capacity: usize,
    accepted: AtomicUsize,
    attempts: AtomicUsize,
}

impl FailingSink {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            accepted: AtomicUsize::new(0),
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn accepted(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentSink for FailingSink {
    async fn insert(&self, document: &Document) -> Result<(), SinkError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        let slot = self.accepted.fetch_add(1, Ordering::SeqCst);
        if slot < self.capacity {
            return Ok(());
        }
        self.accepted.fetch_sub(1, Ordering::SeqCst);
        Err(SinkError::Connection(format!(
            "store went away before {}",
            document.id().unwrap_or_default()
        )))
    }
}
