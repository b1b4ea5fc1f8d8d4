//! Test helper utilities
//!
//! Shared fixtures for medoc-ingest integration tests

#![allow(dead_code)]

pub mod fixtures;
pub mod mock_provider;
pub mod store;

pub use fixtures::{sample_movie, write_mirror};
pub use mock_provider::MockProvider;
pub use store::{create_test_store, FailingSink};

use std::path::Path;

/// Lines of a log file, empty if it does not exist
pub fn read_log_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}
