//! Dynamic value operations
//!
//! Templates only declare shapes; this trait is the seam through which they are
//! interpreted against concrete data. [`JsonOps`] is the tree implementation the
//! crate's tooling and tests run on (maps, lists and scalar leaves).

use serde_json::{Map, Value};

use super::Primitive;

/// Coarse kind of a dynamic value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Map,
    List,
    String,
    Number,
    Bool,
    Null,
}

impl ValueKind {
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Map => "map",
            ValueKind::List => "list",
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::Bool => "bool",
            ValueKind::Null => "null",
        }
    }
}

/// Operations on dynamic values.
///
/// Every mutating operation is total: applied to a value of the wrong kind it
/// returns the input unchanged.
pub trait DynamicOps: Send + Sync {
    fn kind(&self, value: &Value) -> ValueKind;

    fn get<'v>(&self, value: &'v Value, name: &str) -> Option<&'v Value>;

    fn set(&self, value: Value, name: &str, member: Value) -> Value;

    fn remove(&self, value: Value, name: &str) -> Value;

    fn as_str<'v>(&self, value: &'v Value) -> Option<&'v str>;

    fn as_list<'v>(&self, value: &'v Value) -> Option<&'v [Value]>;

    fn create_string(&self, s: &str) -> Value;

    fn create_list(&self, items: Vec<Value>) -> Value;

    fn empty_map(&self) -> Value;

    /// Whether `value` is a valid leaf of the given kind
    fn matches(&self, value: &Value, kind: Primitive) -> bool;

    fn create_pair(&self, key: Value, value: Value) -> Value {
        self.create_list(vec![key, value])
    }

    fn as_pair<'v>(&self, value: &'v Value) -> Option<(&'v Value, &'v Value)> {
        match self.as_list(value)? {
            [key, value] => Some((key, value)),
            _ => None,
        }
    }
}

/// [`DynamicOps`] over `serde_json::Value` trees
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonOps;

fn integer_in(value: &Value, min: i64, max: i64) -> bool {
    value.as_i64().map(|n| n >= min && n <= max).unwrap_or(false)
}

fn integer_array_in(value: &Value, min: i64, max: i64) -> bool {
    value
        .as_array()
        .map(|items| items.iter().all(|item| integer_in(item, min, max)))
        .unwrap_or(false)
}

impl DynamicOps for JsonOps {
    fn kind(&self, value: &Value) -> ValueKind {
        match value {
            Value::Object(_) => ValueKind::Map,
            Value::Array(_) => ValueKind::List,
            Value::String(_) => ValueKind::String,
            Value::Number(_) => ValueKind::Number,
            Value::Bool(_) => ValueKind::Bool,
            Value::Null => ValueKind::Null,
        }
    }

    fn get<'v>(&self, value: &'v Value, name: &str) -> Option<&'v Value> {
        value.as_object()?.get(name)
    }

    fn set(&self, mut value: Value, name: &str, member: Value) -> Value {
        if let Value::Object(map) = &mut value {
            map.insert(name.to_string(), member);
        }
        value
    }

    fn remove(&self, mut value: Value, name: &str) -> Value {
        if let Value::Object(map) = &mut value {
            map.remove(name);
        }
        value
    }

    fn as_str<'v>(&self, value: &'v Value) -> Option<&'v str> {
        value.as_str()
    }

    fn as_list<'v>(&self, value: &'v Value) -> Option<&'v [Value]> {
        value.as_array().map(|items| items.as_slice())
    }

    fn create_string(&self, s: &str) -> Value {
        Value::String(s.to_string())
    }

    fn create_list(&self, items: Vec<Value>) -> Value {
        Value::Array(items)
    }

    fn empty_map(&self) -> Value {
        Value::Object(Map::new())
    }

    fn matches(&self, value: &Value, kind: Primitive) -> bool {
        match kind {
            // Booleans are stored as bytes in older data
            Primitive::Bool => value.is_boolean() || integer_in(value, 0, 1),
            Primitive::Byte => value.is_boolean() || integer_in(value, i8::MIN.into(), i8::MAX.into()),
            Primitive::Short => integer_in(value, i16::MIN.into(), i16::MAX.into()),
            Primitive::Int => integer_in(value, i32::MIN.into(), i32::MAX.into()),
            Primitive::Long => value.is_i64(),
            Primitive::Float | Primitive::Double => value.is_number(),
            Primitive::String => value.is_string(),
            Primitive::ByteArray => integer_array_in(value, i8::MIN.into(), i8::MAX.into()),
            Primitive::IntArray => integer_array_in(value, i32::MIN.into(), i32::MAX.into()),
            Primitive::LongArray => integer_array_in(value, i64::MIN, i64::MAX),
            Primitive::Any => true,
        }
    }
}
