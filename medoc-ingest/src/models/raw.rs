//! Provider-native metadata object graph
//!
//! A fetched title arrives as a tree of [`RawValue`]s. Entities (people,
//! titles, companies) are [`RawObject`]s carrying their kind and native ID;
//! everything else is a plain mapping, a list, or a scalar.
//!
//! # Wire format
//! Providers deliver JSON. An object with a `"$kind"` key is an entity:
//! ```json
//! {"$kind": "movie", "$id": "0133093", "title": "The Matrix", "cast": [...]}
//! ```
//! Any other object is a plain mapping.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// JSON key carrying the entity kind
pub const KIND_KEY: &str = "$kind";
/// JSON key carrying the native identifier
pub const ID_KEY: &str = "$id";

/// Field mapping of an entity or plain mapping
pub type Fields = BTreeMap<String, RawValue>;

/// Errors decoding the provider wire format
#[derive(Debug, Error, PartialEq)]
pub enum WireError {
    /// Entity object without `$id`
    #[error("entity of kind '{0}' has no $id")]
    MissingId(String),

    /// `$id` present but neither string nor number
    #[error("entity of kind '{0}' has a non-scalar $id")]
    InvalidId(String),

    /// `$kind` present but not a string
    #[error("$kind must be a string")]
    InvalidKind,

    /// Top-level payload is not an entity
    #[error("payload is not an entity object")]
    NotAnEntity,
}

/// Entity kind as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Person,
    Movie,
    Company,
    /// Any kind the tagger has no prefix for
    Unrecognized(String),
}

impl EntityKind {
    /// Classify a wire `$kind` value (case-insensitive)
    pub fn from_wire(kind: &str) -> Self {
        match kind.to_ascii_lowercase().as_str() {
            "person" => EntityKind::Person,
            "movie" => EntityKind::Movie,
            "company" => EntityKind::Company,
            _ => EntityKind::Unrecognized(kind.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            EntityKind::Person => "person",
            EntityKind::Movie => "movie",
            EntityKind::Company => "company",
            EntityKind::Unrecognized(kind) => kind,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, EntityKind::Unrecognized(_))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entity in the provider graph
#[derive(Debug, Clone, PartialEq)]
pub struct RawObject {
    pub kind: EntityKind,
    /// Native identifier within the kind's namespace (leading zeros kept)
    pub id: String,
    pub fields: Fields,
}

impl RawObject {
    pub fn new(kind: EntityKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            fields: Fields::new(),
        }
    }

    pub fn person(id: impl Into<String>) -> Self {
        Self::new(EntityKind::Person, id)
    }

    pub fn movie(id: impl Into<String>) -> Self {
        Self::new(EntityKind::Movie, id)
    }

    pub fn company(id: impl Into<String>) -> Self {
        Self::new(EntityKind::Company, id)
    }

    /// Builder-style field insertion
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Decode a top-level provider payload, which must be an entity
    pub fn from_json(value: Value) -> Result<Self, WireError> {
        match RawValue::from_json(value)? {
            RawValue::Object(obj) => Ok(obj),
            _ => Err(WireError::NotAnEntity),
        }
    }
}

/// A value inside the provider graph
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// String, number, bool or null
    Scalar(Value),
    List(Vec<RawValue>),
    Object(RawObject),
    Map(Fields),
}

impl RawValue {
    /// Decode a JSON value, recognizing `$kind` objects as entities
    pub fn from_json(value: Value) -> Result<Self, WireError> {
        match value {
            Value::Array(items) => items
                .into_iter()
                .map(RawValue::from_json)
                .collect::<Result<Vec<_>, _>>()
                .map(RawValue::List),
            Value::Object(mut map) => {
                let Some(kind) = map.remove(KIND_KEY) else {
                    return decode_fields(map).map(RawValue::Map);
                };
                let kind = match kind {
                    Value::String(kind) => EntityKind::from_wire(&kind),
                    _ => return Err(WireError::InvalidKind),
                };
                let id = match map.remove(ID_KEY) {
                    Some(Value::String(id)) => id,
                    Some(Value::Number(id)) => id.to_string(),
                    Some(_) => return Err(WireError::InvalidId(kind.name().to_string())),
                    None => return Err(WireError::MissingId(kind.name().to_string())),
                };
                Ok(RawValue::Object(RawObject {
                    kind,
                    id,
                    fields: decode_fields(map)?,
                }))
            }
            scalar => Ok(RawValue::Scalar(scalar)),
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, RawValue::Scalar(Value::String(_)))
    }

    pub fn as_object(&self) -> Option<&RawObject> {
        match self {
            RawValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Short description used in error messages
    pub fn describe(&self) -> &str {
        match self {
            RawValue::Scalar(_) => "scalar",
            RawValue::List(_) => "list",
            RawValue::Object(obj) => obj.kind.name(),
            RawValue::Map(_) => "mapping",
        }
    }
}

fn decode_fields(map: serde_json::Map<String, Value>) -> Result<Fields, WireError> {
    map.into_iter()
        .map(|(key, value)| RawValue::from_json(value).map(|v| (key, v)))
        .collect()
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Scalar(Value::String(value.to_string()))
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Scalar(Value::String(value))
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Scalar(Value::from(value))
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Scalar(Value::Bool(value))
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Scalar(Value::from(value))
    }
}

impl From<RawObject> for RawValue {
    fn from(value: RawObject) -> Self {
        RawValue::Object(value)
    }
}

impl From<Fields> for RawValue {
    fn from(value: Fields) -> Self {
        RawValue::Map(value)
    }
}

impl<T: Into<RawValue>> From<Vec<T>> for RawValue {
    fn from(values: Vec<T>) -> Self {
        RawValue::List(values.into_iter().map(Into::into).collect())
    }
}
