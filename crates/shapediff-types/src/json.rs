//! Conversion between [`Value`] and `serde_json::Value`.
//!
//! JSON integers become `Int` (or `UInt` above `i64::MAX`) and everything
//! else becomes `Float`, so `1` and `1.0` land in different categories.
//! Object keys keep document order. Arrays become collections
//! keyed `0..n`; collections with list-shaped keys render back as arrays.

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Number};

use crate::collection::Collection;
use crate::key::Key;
use crate::value::Value;

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::Collection(Collection::from_list(items)),
            serde_json::Value::Object(map) => Value::Collection(
                map.into_iter()
                    .map(|(k, v)| (Key::Str(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Value {
    /// Render as JSON. Objects render as `{"@type": name, ..state}`; objects
    /// that refuse capture render only their type. Non-finite floats become
    /// `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => json!(b),
            Value::Int(i) => json!(i),
            Value::UInt(u) => json!(u),
            Value::Float(x) => Number::from_f64(*x)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => json!(s),
            Value::Collection(c) => c.to_json(),
            Value::Object(o) => {
                let mut map = Map::new();
                map.insert("@type".into(), json!(o.type_name()));
                if let Ok(state) = o.capture() {
                    for (k, v) in state.iter() {
                        map.insert(k.to_string(), v.to_json());
                    }
                }
                serde_json::Value::Object(map)
            }
            Value::Other(o) => json!(o.to_string()),
        }
    }
}

impl Collection {
    /// Render as a JSON array when list-shaped, otherwise as a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        if self.is_list() && !self.is_empty() {
            serde_json::Value::Array(self.values().map(Value::to_json).collect())
        } else {
            serde_json::Value::Object(
                self.iter()
                    .map(|(k, v)| (k.to_string(), v.to_json()))
                    .collect(),
            )
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
