//! Run-level error types for medoc-ingest
//!
//! Item-level failures (fetch, flatten) never reach this type; they are
//! recorded in the error log and the item is dropped. Everything here stops
//! the run.

use crate::pipeline::worker_pool::WorkerFailure;
use crate::sink::SinkError;
use thiserror::Error;

pub type IngestResult<T> = std::result::Result<T, IngestError>;

#[derive(Debug, Error)]
pub enum IngestError {
    /// Unusable store or run configuration, detected before any work
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration, input file or I/O failure from medoc-common
    #[error(transparent)]
    Config(#[from] medoc_common::Error),

    /// Insert failed; documents already written stay written
    #[error("Persistence failure: {0}")]
    Persistence(SinkError),

    /// Worker panicked or was aborted
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SinkError> for IngestError {
    fn from(err: SinkError) -> Self {
        match err {
            SinkError::InvalidConfig(msg) => IngestError::InvalidConfig(msg),
            other => IngestError::Persistence(other),
        }
    }
}

impl From<WorkerFailure> for IngestError {
    fn from(err: WorkerFailure) -> Self {
        IngestError::Internal(err.to_string())
    }
}
