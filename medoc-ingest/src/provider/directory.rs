//! Offline provider reading `tt<id>.json` files from a directory
//!
//! Files hold the same payload the HTTP service returns. The facet
//! selection is ignored; a mirror stores whatever was captured.

use super::{decode_payload, FetchError, MetadataProvider};
use crate::models::{FacetSet, RawObject};
use crate::tagger::MOVIE_PREFIX;
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct DirectoryProvider {
    dir: PathBuf,
}

impl DirectoryProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn title_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}{}.json", MOVIE_PREFIX, id))
    }
}

#[async_trait]
impl MetadataProvider for DirectoryProvider {
    fn name(&self) -> &'static str {
        "directory"
    }

    async fn fetch(&self, id: &str, _facets: &FacetSet) -> Result<RawObject, FetchError> {
        let path = self.title_path(id);
        debug!(id = %id, path = %path.display(), "Reading title from mirror");

        let body = match tokio::fs::read_to_string(&path).await {
            Ok(body) => body,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(FetchError::NotFound(id.to_string()))
            }
            Err(e) => return Err(FetchError::Io(e)),
        };

        decode_payload(&body)
    }
}
