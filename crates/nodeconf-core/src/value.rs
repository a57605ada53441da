//! Setting values.
//!
//! A `Value` is the tagged representation of one setting. The schema fixes
//! the `FieldKind` of every field; the store never holds a value whose kind
//! differs from its field.

use std::fmt;

use serde_json::Value as Json;

/// The semantic type of a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// On/off flag, rendered as a checkbox.
    Bool,
    /// 32-bit integer (delays in seconds, attempt counts).
    Int,
    /// 8-bit signed integer (sensor resting state, -1 for auto-detect).
    SmallInt,
    /// Single precision float (temperatures and offsets).
    Float,
    /// Free text.
    Text,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Bool => "bool",
            FieldKind::Int => "int",
            FieldKind::SmallInt => "int8",
            FieldKind::Float => "float",
            FieldKind::Text => "text",
        };
        f.write_str(name)
    }
}

/// A setting value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i32),
    SmallInt(i8),
    Float(f32),
    Text(String),
}

impl Value {
    /// The kind of this value.
    pub fn kind(&self) -> FieldKind {
        match self {
            Value::Bool(_) => FieldKind::Bool,
            Value::Int(_) => FieldKind::Int,
            Value::SmallInt(_) => FieldKind::SmallInt,
            Value::Float(_) => FieldKind::Float,
            Value::Text(_) => FieldKind::Text,
        }
    }

    /// Encode as a JSON value.
    ///
    /// Floats are written in their shortest round-trip form so that `0.1`
    /// is stored as `0.1` and not as the widened `0.10000000149011612`.
    /// Non-finite floats have no JSON form and encode as `null`.
    pub fn to_json(&self) -> Json {
        match self {
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => Json::from(*i),
            Value::SmallInt(i) => Json::from(*i),
            Value::Float(f) => {
                let widened = f.to_string().parse::<f64>().unwrap_or(f64::from(*f));
                serde_json::Number::from_f64(widened)
                    .map(Json::Number)
                    .unwrap_or(Json::Null)
            }
            Value::Text(s) => Json::String(s.clone()),
        }
    }

    /// Decode a JSON value as the given kind.
    ///
    /// Returns `None` when the JSON value is not compatible with the kind:
    /// booleans only from JSON booleans, integers only from JSON integers in
    /// range, floats from any finite JSON number, text only from JSON strings.
    pub fn from_json(kind: FieldKind, json: &Json) -> Option<Value> {
        match kind {
            FieldKind::Bool => json.as_bool().map(Value::Bool),
            FieldKind::Int => json
                .as_i64()
                .and_then(|i| i32::try_from(i).ok())
                .map(Value::Int),
            FieldKind::SmallInt => json
                .as_i64()
                .and_then(|i| i8::try_from(i).ok())
                .map(Value::SmallInt),
            FieldKind::Float => json
                .as_f64()
                .map(|f| f as f32)
                .filter(|f| f.is_finite())
                .map(Value::Float),
            FieldKind::Text => json.as_str().map(|s| Value::Text(s.to_string())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::SmallInt(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// Rust types that map onto exactly one `FieldKind`.
///
/// This is the single typed extractor used by `ConfigStore::get`.
pub trait FieldValue: Sized {
    const KIND: FieldKind;

    fn from_value(value: &Value) -> Option<Self>;

    fn into_value(self) -> Value;
}

impl FieldValue for bool {
    const KIND: FieldKind = FieldKind::Bool;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl FieldValue for i32 {
    const KIND: FieldKind = FieldKind::Int;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Int(self)
    }
}

impl FieldValue for i8 {
    const KIND: FieldKind = FieldKind::SmallInt;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::SmallInt(i) => Some(*i),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::SmallInt(self)
    }
}

impl FieldValue for f32 {
    const KIND: FieldKind = FieldKind::Float;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl FieldValue for String {
    const KIND: FieldKind = FieldKind::Text;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Text(s) => Some(s.clone()),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Text(self)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::SmallInt(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}
