//! # medoc Common Library
//!
//! Shared code for the medoc ingest tools:
//! - Error type used across crates
//! - Configuration loading (TOML file, root folder resolution)
//! - Timestamp helpers

pub mod config;
pub mod error;
pub mod time;

pub use error::{Error, Result};
