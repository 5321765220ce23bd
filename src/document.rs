//! The compound document and sideloaded lookup.
//!
//! A `Document` is the decoded root object of a payload. Its top-level
//! arrays hold sideloaded resources; `find` scans them by identifier.
//!
//! ## Limitations
//!
//! - **No index**: every lookup is a linear scan of the relation array.
//! - **Numeric ids only**: identifiers are compared as `f64`, so `"5"` never
//!   matches `5`.

use serde_json::{Map, Value};

use crate::{Error, Result};

/// Default identifier field on sideloaded objects.
pub const DEFAULT_ID_KEY: &str = "id";

/// Root of a compound JSON payload. Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Value,
}

impl Document {
    /// Decode raw bytes. Anything but a JSON object is `MalformedJson`.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let root: Map<String, Value> = serde_json::from_slice(bytes).map_err(Error::MalformedJson)?;
        Ok(Self { root: Value::Object(root) })
    }

    /// Wrap an already decoded tree.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(_) => Ok(Self { root: value }),
            other => Err(Error::NotAnObject(json_kind(&other))),
        }
    }

    /// The root object as a node.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.root.as_object().map_or(0, Map::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Top-level array stored under `relation_key`, if it is one.
    pub fn relation(&self, relation_key: &str) -> Option<&[Value]> {
        self.root.get(relation_key)?.as_array().map(Vec::as_slice)
    }

    /// Find the sideloaded object whose `id` equals `id`.
    pub fn find(&self, relation_key: &str, id: f64) -> Option<&Value> {
        self.find_by(relation_key, DEFAULT_ID_KEY, id)
    }

    /// Find the first object in `document[relation_key]` whose `id_key` field
    /// equals `id`. Non-object elements are skipped.
    pub fn find_by(&self, relation_key: &str, id_key: &str, id: f64) -> Option<&Value> {
        self.relation(relation_key)?
            .iter()
            .filter(|candidate| candidate.is_object())
            .find(|candidate| candidate.get(id_key).and_then(Value::as_f64) == Some(id))
    }
}

/// Short name of a JSON value's kind, for error messages.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
