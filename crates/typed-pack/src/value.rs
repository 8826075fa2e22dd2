//! [`Value`]: the dynamic value tree the codec reads and writes.

use std::fmt;
use std::ops::Index;

use rust_decimal::Decimal;

use crate::temporal::{Date, DateTime, Time};

/// An integer together with the width it was produced at.
///
/// The encoder picks the narrowest wire form regardless of width; the decoder
/// reports the width natural to the wire tag it read. Equality and hashing
/// are numeric, so `Int::I32(2) == Int::U8(2)`.
#[derive(Debug, Clone, Copy)]
pub enum Int {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
}

impl Int {
    /// Widens to `i128`, which holds every variant exactly.
    pub fn as_i128(self) -> i128 {
        match self {
            Int::I8(v) => v as i128,
            Int::U8(v) => v as i128,
            Int::I16(v) => v as i128,
            Int::U16(v) => v as i128,
            Int::I32(v) => v as i128,
            Int::U32(v) => v as i128,
            Int::I64(v) => v as i128,
            Int::U64(v) => v as i128,
        }
    }

    pub fn as_i64(self) -> Option<i64> {
        i64::try_from(self.as_i128()).ok()
    }

    pub fn as_u64(self) -> Option<u64> {
        u64::try_from(self.as_i128()).ok()
    }

    pub fn is_negative(self) -> bool {
        self.as_i128() < 0
    }

    pub fn type_name(self) -> &'static str {
        match self {
            Int::I8(_) => "i8",
            Int::U8(_) => "u8",
            Int::I16(_) => "i16",
            Int::U16(_) => "u16",
            Int::I32(_) => "i32",
            Int::U32(_) => "u32",
            Int::I64(_) => "i64",
            Int::U64(_) => "u64",
        }
    }
}

impl PartialEq for Int {
    fn eq(&self, other: &Self) -> bool {
        self.as_i128() == other.as_i128()
    }
}

impl Eq for Int {}

impl std::hash::Hash for Int {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_i128().hash(state);
    }
}

impl fmt::Display for Int {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i128())
    }
}

macro_rules! int_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Int {
                fn from(v: $ty) -> Self {
                    Int::$variant(v)
                }
            }

            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Int(Int::$variant(v))
                }
            }
        )*
    };
}

int_from!(
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
);

/// Dynamic value: MessagePack primitives plus the four extension scalars.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(Int),
    Float32(f32),
    Float64(f64),
    Str(String),
    Bytes(Vec<u8>),
    /// Ordered key/value pairs. Keys are not required to be unique.
    Map(Vec<(String, Value)>),
    Array(Vec<Value>),
    Decimal(Decimal),
    Date(Date),
    DateTime(DateTime),
    Time(Time),
}

static NULL: Value = Value::Null;

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "integer",
            Value::Float32(_) => "float32",
            Value::Float64(_) => "float64",
            Value::Str(_) => "string",
            Value::Bytes(_) => "binary",
            Value::Map(_) => "map",
            Value::Array(_) => "array",
            Value::Decimal(_) => "decimal",
            Value::Date(_) => "date",
            Value::DateTime(_) => "datetime",
            Value::Time(_) => "time",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// First value stored under `key`, if this is a map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(pairs) => pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<Int> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Map(pairs) => Some(pairs),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Decimal(d) => Some(*d),
            _ => None,
        }
    }
}

impl Index<&str> for Value {
    type Output = Value;

    /// Returns [`Value::Null`] when the key is absent or `self` is not a map.
    fn index(&self, key: &str) -> &Value {
        self.get(key).unwrap_or(&NULL)
    }
}

impl Index<usize> for Value {
    type Output = Value;

    /// Returns [`Value::Null`] when out of bounds or `self` is not an array.
    fn index(&self, index: usize) -> &Value {
        match self {
            Value::Array(items) => items.get(index).unwrap_or(&NULL),
            _ => &NULL,
        }
    }
}

impl From<Int> for Value {
    fn from(v: Int) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<Vec<(String, Value)>> for Value {
    fn from(v: Vec<(String, Value)>) -> Self {
        Value::Map(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<Date> for Value {
    fn from(v: Date) -> Self {
        Value::Date(v)
    }
}

impl From<DateTime> for Value {
    fn from(v: DateTime) -> Self {
        Value::DateTime(v)
    }
}

impl From<Time> for Value {
    fn from(v: Time) -> Self {
        Value::Time(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
