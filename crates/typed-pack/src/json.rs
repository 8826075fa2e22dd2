//! Conversions between [`Value`] and `serde_json::Value`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::{Int, Value};

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(Int::I64(i))
                } else if let Some(u) = n.as_u64() {
                    Value::Int(Int::U64(u))
                } else {
                    Value::Float64(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(arr) => Value::Array(arr.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(obj) => {
                Value::Map(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        v.to_json()
    }
}

impl Value {
    /// Renders the value as JSON.
    ///
    /// Extension scalars become their canonical text, bytes become a base64
    /// data URI, and non-finite floats become `null`. When a map repeats a
    /// key the last value wins, at the position of the first.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(Int::U64(u)) => serde_json::json!(u),
            Value::Int(i) => match i.as_i64() {
                Some(i) => serde_json::json!(i),
                None => serde_json::Value::Null,
            },
            Value::Float32(f) => serde_json::json!(f),
            Value::Float64(f) => serde_json::json!(f),
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::Bytes(b) => serde_json::Value::String(format!(
                "data:application/octet-stream;base64,{}",
                STANDARD.encode(b)
            )),
            Value::Map(pairs) => serde_json::Value::Object(
                pairs.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            Value::Array(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Decimal(d) => serde_json::Value::String(d.to_string()),
            Value::Date(d) => serde_json::Value::String(d.to_string()),
            Value::DateTime(d) => serde_json::Value::String(d.to_string()),
            Value::Time(t) => serde_json::Value::String(t.to_string()),
        }
    }
}
