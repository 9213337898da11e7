//! Conversion between script values and `serde_json` values.
//!
//! Serialization follows `JSON.stringify`: `undefined` and functions are
//! dropped from objects and become `null` inside arrays, non-finite numbers
//! become `null`, and cycles are an error.

use std::sync::Arc;

use serde_json::{Map, Number};

use crate::Value;

/// Integral values below this magnitude serialize without a fraction.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// The value graph contains a cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CircularStructure;

impl Value {
    /// Convert a JSON document into script values.
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::string(s.as_str()),
            serde_json::Value::Array(items) => {
                Value::array(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => {
                Value::object(map.iter().map(|(k, v)| (k.as_str(), Value::from_json(v))))
            }
        }
    }

    /// Convert to JSON. `None` for values with no JSON form (`undefined`,
    /// functions) and for cyclic structures.
    pub fn to_json(&self) -> Option<serde_json::Value> {
        self.try_to_json().ok().flatten()
    }

    /// Like [`to_json`](Value::to_json), but reports cycles.
    pub fn try_to_json(&self) -> Result<Option<serde_json::Value>, CircularStructure> {
        let mut seen = Vec::new();
        self.to_json_inner(&mut seen)
    }

    fn to_json_inner(
        &self,
        seen: &mut Vec<usize>,
    ) -> Result<Option<serde_json::Value>, CircularStructure> {
        let json = match self {
            Value::Undefined | Value::Function(_) | Value::Native(_) => return Ok(None),
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::Str(s) => serde_json::Value::String(s.to_string()),
            Value::Array(items) => {
                let id = Arc::as_ptr(items) as usize;
                if seen.contains(&id) {
                    return Err(CircularStructure);
                }
                seen.push(id);
                let snapshot = items.read().clone();
                let mut out = Vec::with_capacity(snapshot.len());
                for item in &snapshot {
                    out.push(item.to_json_inner(seen)?.unwrap_or(serde_json::Value::Null));
                }
                seen.pop();
                serde_json::Value::Array(out)
            }
            Value::Object(properties) => {
                let id = Arc::as_ptr(properties) as usize;
                if seen.contains(&id) {
                    return Err(CircularStructure);
                }
                seen.push(id);
                let snapshot = properties.read().clone();
                let mut map = Map::new();
                for (key, value) in snapshot.iter() {
                    if let Some(json) = value.to_json_inner(seen)? {
                        map.insert(key.to_string(), json);
                    }
                }
                seen.pop();
                serde_json::Value::Object(map)
            }
            Value::Host(host) => {
                let mut map = Map::new();
                for key in host.keys() {
                    if let Some(json) = host
                        .get(&key)
                        .map(|value| value.to_json_inner(seen))
                        .transpose()?
                        .flatten()
                    {
                        map.insert(key.to_string(), json);
                    }
                }
                serde_json::Value::Object(map)
            }
            Value::Promise(_) | Value::Error(_) => serde_json::Value::Object(Map::new()),
        };
        Ok(Some(json))
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < MAX_SAFE_INTEGER {
        return serde_json::Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
}
