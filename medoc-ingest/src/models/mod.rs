//! Data models for medoc-ingest

pub mod document;
pub mod facets;
pub mod raw;

pub use document::{Document, ID_FIELD};
pub use facets::FacetSet;
pub use raw::{EntityKind, Fields, RawObject, RawValue, WireError};
