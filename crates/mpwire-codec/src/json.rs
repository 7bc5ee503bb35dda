//! Conversion between [`Value`] and `serde_json::Value`.
//!
//! JSON has an explicit array/object split, so collection shape maps
//! directly. Going back to JSON is lossy in two places: byte strings that
//! are not UTF-8 are converted with replacement characters, and map keys
//! that are not strings are rendered as their JSON text.

use serde_json::{Map, Number};
use tracing::warn;

use crate::error::{CodecError, Result};
use crate::value::Value;

impl Value {
    /// Build a value from parsed JSON.
    pub fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => from_number(n),
            serde_json::Value::String(s) => Value::from(s.as_str()),
            serde_json::Value::Array(items) => {
                Value::Array(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.iter()
                    .map(|(k, v)| (Value::from(k.as_str()), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Render as JSON.
    ///
    /// Fails only for values JSON cannot hold at all: opaque host values
    /// and non-finite floats.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(match self {
            Value::Nil => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Integer(v) => serde_json::Value::from(*v),
            Value::UnsignedInteger(v) => serde_json::Value::from(*v),
            Value::Float(f) => Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .ok_or_else(|| {
                    CodecError::UnsupportedValueType(format!("non-finite float {f} in JSON"))
                })?,
            Value::Bytes(bytes) => serde_json::Value::String(lossy_string(bytes)),
            Value::Array(items) => serde_json::Value::Array(
                items.iter().map(Value::to_json).collect::<Result<_>>()?,
            ),
            Value::Map(pairs) => {
                let mut map = Map::with_capacity(pairs.len());
                for (key, value) in pairs {
                    map.insert(json_key(key)?, value.to_json()?);
                }
                serde_json::Value::Object(map)
            }
            Value::Opaque(name) => {
                return Err(CodecError::UnsupportedValueType(format!(
                    "opaque host value `{name}`"
                )))
            }
        })
    }
}

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        Value::from_json(json)
    }
}

fn from_number(n: &Number) -> Value {
    if let Some(v) = n.as_i64() {
        Value::Integer(v)
    } else if let Some(v) = n.as_u64() {
        Value::UnsignedInteger(v)
    } else {
        Value::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

fn lossy_string(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            warn!(len = bytes.len(), "non-UTF-8 string converted lossily");
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

fn json_key(key: &Value) -> Result<String> {
    match key {
        Value::Bytes(bytes) => Ok(lossy_string(bytes)),
        other => Ok(other.to_json()?.to_string()),
    }
}
