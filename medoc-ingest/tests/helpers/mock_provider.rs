//! In-memory metadata provider

use async_trait::async_trait;
use medoc_ingest::models::{FacetSet, RawObject};
use medoc_ingest::provider::{FetchError, MetadataProvider};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Serves canned titles; unknown IDs are `NotFound`
#[derive(Default)]
pub struct MockProvider {
    titles: HashMap<String, RawObject>,
    offline: HashSet<String>,
    calls: AtomicUsize,
    seen_facets: Mutex<Vec<String>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: RawObject) -> Self {
        self.titles.insert(title.id.clone(), title);
        self
    }

    /// Answer `id` with a network error
    pub fn with_network_error(mut self, id: &str) -> Self {
        self.offline.insert(id.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen_facets(&self) -> Vec<String> {
        self.seen_facets.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetadataProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn fetch(&self, id: &str, facets: &FacetSet) -> Result<RawObject, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_facets.lock().unwrap().push(facets.to_query());

        if self.offline.contains(id) {
            return Err(FetchError::Network("connection reset".to_string()));
        }
        self.titles
            .get(id)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(id.to_string()))
    }
}
