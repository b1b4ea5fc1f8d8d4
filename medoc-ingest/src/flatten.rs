//! Graph flattening
//!
//! Turns a provider object graph into a [`Document`]: every entity becomes a
//! nested JSON object keyed by its tagged `_id`, plain mappings become nested
//! objects, and list fields follow the list policy below.
//!
//! # List policy
//! 1. Empty list: the field is dropped.
//! 2. Several recognized entities: each element is tagged shallowly (its own
//!    fields are copied as plain data, nested entities are not tagged and nested
//!    lists keep their shape).
//! 3. A single recognized entity: fully flattened and tagged, wrapped in a
//!    one-element list.
//! 4. A single non-entity element: the bare value replaces the list.
//! 5. Several values led by a string: copied verbatim. An entity anywhere in
//!    such a list is an error, since it would lose its `_id`.
//! 6. Anything else (several numbers, mappings or nested lists): dropped.
//!
//! An entity owning a list of entities carries its own `_id` as well; every
//! flattened entity gets its `_id` merged exactly once by [`flatten_entity`],
//! so that stamp needs no separate pass.

use crate::models::{Document, Fields, RawObject, RawValue, ID_FIELD};
use crate::tagger::{identify, FlattenError};
use serde_json::{Map, Value};
use tracing::debug;

type JsonMap = Map<String, Value>;

/// Flatten a fetched entity into a store-ready document
pub fn flatten(obj: &RawObject) -> Result<Document, FlattenError> {
    flatten_entity(obj).map(Document::from)
}

/// Flatten an entity's fields and merge its tagged `_id`
fn flatten_entity(obj: &RawObject) -> Result<JsonMap, FlattenError> {
    let tag = identify(obj)?;
    let mut doc = flatten_fields(&obj.fields)?;
    doc.insert(ID_FIELD.to_string(), tag.into());
    Ok(doc)
}

fn flatten_fields(fields: &Fields) -> Result<JsonMap, FlattenError> {
    let mut doc = JsonMap::new();

    for (key, value) in fields {
        match value {
            RawValue::Scalar(scalar) => {
                doc.insert(key.clone(), scalar.clone());
            }
            RawValue::Map(inner) => {
                doc.insert(key.clone(), Value::Object(flatten_fields(inner)?));
            }
            RawValue::Object(obj) => {
                doc.insert(key.clone(), Value::Object(flatten_entity(obj)?));
            }
            RawValue::List(items) => {
                if let Some(flattened) = flatten_list(key, items)? {
                    doc.insert(key.clone(), flattened);
                }
            }
        }
    }

    Ok(doc)
}

/// Apply the list policy; `None` drops the field
fn flatten_list(key: &str, items: &[RawValue]) -> Result<Option<Value>, FlattenError> {
    let Some(first) = items.first() else {
        return Ok(None);
    };

    if first.as_object().is_some() {
        let entities = items
            .iter()
            .map(|item| match item {
                RawValue::Object(obj) if obj.kind.is_recognized() => Ok(obj),
                other => Err(FlattenError::UnrecognizedKind(other.describe().to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let flattened = match entities.as_slice() {
            [single] => vec![Value::Object(flatten_entity(single)?)],
            many => many
                .iter()
                .map(|obj| shallow_tag(obj).map(Value::Object))
                .collect::<Result<Vec<_>, _>>()?,
        };
        return Ok(Some(Value::Array(flattened)));
    }

    if items.len() == 1 {
        let bare = match first {
            RawValue::Map(inner) => Value::Object(flatten_fields(inner)?),
            other => project(other),
        };
        return Ok(Some(bare));
    }

    if first.is_string() {
        if let Some(entity) = items.iter().find(|item| item.as_object().is_some()) {
            return Err(FlattenError::UnrecognizedKind(entity.describe().to_string()));
        }
        return Ok(Some(Value::Array(items.iter().map(project).collect())));
    }

    debug!(field = key, kind = first.describe(), len = items.len(), "Dropping list not led by a string");
    Ok(None)
}

/// Tag an entity without flattening its nested values
fn shallow_tag(obj: &RawObject) -> Result<JsonMap, FlattenError> {
    let tag = identify(obj)?;
    let mut doc: JsonMap = obj
        .fields
        .iter()
        .map(|(key, value)| (key.clone(), project(value)))
        .collect();
    doc.insert(ID_FIELD.to_string(), tag.into());
    Ok(doc)
}

/// Plain-data view of a raw value: no tagging, no list policy
fn project(value: &RawValue) -> Value {
    match value {
        RawValue::Scalar(scalar) => scalar.clone(),
        RawValue::List(items) => Value::Array(items.iter().map(project).collect()),
        RawValue::Map(fields) => Value::Object(project_fields(fields)),
        RawValue::Object(obj) => Value::Object(project_fields(&obj.fields)),
    }
}

fn project_fields(fields: &Fields) -> JsonMap {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), project(value)))
        .collect()
}
