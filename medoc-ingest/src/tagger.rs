//! Kind-tagged identifiers
//!
//! Native IDs collide across kinds (person `0000001` and title `0000001`
//! are different entities), so every stored key carries a two-letter kind
//! prefix: `nm` for people, `tt` for titles, `co` for companies.

use crate::models::{EntityKind, RawObject};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

pub const PERSON_PREFIX: &str = "nm";
pub const MOVIE_PREFIX: &str = "tt";
pub const COMPANY_PREFIX: &str = "co";

/// Errors raised while tagging or flattening a provider graph
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FlattenError {
    /// Object kind has no identifier prefix
    #[error("Unrecognized object kind: {0}")]
    UnrecognizedKind(String),
}

/// `_id` value: kind prefix followed by the native ID
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaggedId(String);

impl TaggedId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TaggedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<TaggedId> for Value {
    fn from(id: TaggedId) -> Self {
        Value::String(id.0)
    }
}

/// Prefix for a kind; unrecognized kinds are rejected
pub fn kind_prefix(kind: &EntityKind) -> Result<&'static str, FlattenError> {
    match kind {
        EntityKind::Person => Ok(PERSON_PREFIX),
        EntityKind::Movie => Ok(MOVIE_PREFIX),
        EntityKind::Company => Ok(COMPANY_PREFIX),
        EntityKind::Unrecognized(other) => Err(FlattenError::UnrecognizedKind(other.clone())),
    }
}

/// Compute the tagged identifier of an object
pub fn identify(obj: &RawObject) -> Result<TaggedId, FlattenError> {
    let prefix = kind_prefix(&obj.kind)?;
    Ok(TaggedId(format!("{}{}", prefix, obj.id)))
}
