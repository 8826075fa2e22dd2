//! Serde bridge: any `Serialize` type into a [`Value`].
//!
//! Enums use serde's externally tagged layout, the same one `serde_json`
//! produces. Map keys must serialize as strings (or unit enum variants).
//!
//! `Date`, `DateTime`, `Time` and [`decimal`]-annotated fields serialize as
//! newtype structs with reserved names. [`ValueSerializer`] recognizes those
//! names and rebuilds the extension scalar; every other serializer sees the
//! canonical text.

use std::fmt::Display;

use rust_decimal::Decimal;
use serde::ser::{self, Serialize, SerializeMap as _, SerializeSeq as _};

use crate::msgpack::{encode, EncodeError};
use crate::temporal::{Date, DateTime, Time};
use crate::{Int, Value};

const DECIMAL_TOKEN: &str = "$typed_pack::Decimal";
const DATE_TOKEN: &str = "$typed_pack::Date";
const DATE_TIME_TOKEN: &str = "$typed_pack::DateTime";
const TIME_TOKEN: &str = "$typed_pack::Time";

/// Serializes `value` into a [`Value`] tree.
pub fn to_value<T: ?Sized + Serialize>(value: &T) -> Result<Value, EncodeError> {
    value.serialize(ValueSerializer)
}

/// Serializes `value` straight to MessagePack bytes.
pub fn to_vec<T: ?Sized + Serialize>(value: &T) -> Result<Vec<u8>, EncodeError> {
    encode(&to_value(value)?)
}

impl ser::Error for EncodeError {
    fn custom<T: Display>(msg: T) -> Self {
        EncodeError::Custom(msg.to_string())
    }
}

fn unsupported(type_name: &str) -> EncodeError {
    EncodeError::UnsupportedType {
        type_name: type_name.to_owned(),
    }
}

/// `#[serde(serialize_with = "typed_pack::ser::decimal::serialize")]` keeps a
/// `rust_decimal::Decimal` field as a decimal extension.
pub mod decimal {
    use rust_decimal::Decimal;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(super::DECIMAL_TOKEN, &value.to_string())
    }
}

impl Serialize for Date {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(DATE_TOKEN, &self.to_string())
    }
}

impl Serialize for DateTime {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(DATE_TIME_TOKEN, &self.to_string())
    }
}

impl Serialize for Time {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(TIME_TOKEN, &self.to_string())
    }
}

impl Serialize for Value {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(Int::I8(v)) => serializer.serialize_i8(*v),
            Value::Int(Int::U8(v)) => serializer.serialize_u8(*v),
            Value::Int(Int::I16(v)) => serializer.serialize_i16(*v),
            Value::Int(Int::U16(v)) => serializer.serialize_u16(*v),
            Value::Int(Int::I32(v)) => serializer.serialize_i32(*v),
            Value::Int(Int::U32(v)) => serializer.serialize_u32(*v),
            Value::Int(Int::I64(v)) => serializer.serialize_i64(*v),
            Value::Int(Int::U64(v)) => serializer.serialize_u64(*v),
            Value::Float32(f) => serializer.serialize_f32(*f),
            Value::Float64(f) => serializer.serialize_f64(*f),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Bytes(b) => serializer.serialize_bytes(b),
            Value::Map(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (key, value) in pairs {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Decimal(d) => decimal::serialize(d, serializer),
            Value::Date(d) => d.serialize(serializer),
            Value::DateTime(d) => d.serialize(serializer),
            Value::Time(t) => t.serialize(serializer),
        }
    }
}

/// Turns the text carried by a reserved newtype back into its scalar.
fn rebuild_marker(name: &str, inner: Value) -> Result<Value, EncodeError> {
    let Value::Str(text) = inner else {
        return Err(EncodeError::Custom(format!("{name} must wrap a string")));
    };
    let parsed = match name {
        DECIMAL_TOKEN => Decimal::from_str_exact(&text)
            .map(Value::Decimal)
            .map_err(|e| e.to_string()),
        DATE_TOKEN => text.parse::<Date>().map(Value::Date).map_err(|e| e.to_string()),
        DATE_TIME_TOKEN => text
            .parse::<DateTime>()
            .map(Value::DateTime)
            .map_err(|e| e.to_string()),
        _ => text.parse::<Time>().map(Value::Time).map_err(|e| e.to_string()),
    };
    parsed.map_err(|reason| EncodeError::Custom(format!("invalid {name} text {text:?}: {reason}")))
}

/// Serializer whose output is a [`Value`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = EncodeError;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Value, EncodeError> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, EncodeError> {
        Ok(v.into())
    }

    fn serialize_i16(self, v: i16) -> Result<Value, EncodeError> {
        Ok(v.into())
    }

    fn serialize_i32(self, v: i32) -> Result<Value, EncodeError> {
        Ok(v.into())
    }

    fn serialize_i64(self, v: i64) -> Result<Value, EncodeError> {
        Ok(v.into())
    }

    fn serialize_i128(self, v: i128) -> Result<Value, EncodeError> {
        if let Ok(v) = i64::try_from(v) {
            Ok(v.into())
        } else if let Ok(v) = u64::try_from(v) {
            Ok(v.into())
        } else {
            Err(unsupported("i128"))
        }
    }

    fn serialize_u8(self, v: u8) -> Result<Value, EncodeError> {
        Ok(v.into())
    }

    fn serialize_u16(self, v: u16) -> Result<Value, EncodeError> {
        Ok(v.into())
    }

    fn serialize_u32(self, v: u32) -> Result<Value, EncodeError> {
        Ok(v.into())
    }

    fn serialize_u64(self, v: u64) -> Result<Value, EncodeError> {
        Ok(v.into())
    }

    fn serialize_u128(self, v: u128) -> Result<Value, EncodeError> {
        u64::try_from(v)
            .map(Value::from)
            .map_err(|_| unsupported("u128"))
    }

    fn serialize_f32(self, v: f32) -> Result<Value, EncodeError> {
        Ok(Value::Float32(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Value, EncodeError> {
        Ok(Value::Float64(v))
    }

    fn serialize_char(self, v: char) -> Result<Value, EncodeError> {
        Ok(Value::Str(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value, EncodeError> {
        Ok(Value::Str(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value, EncodeError> {
        Ok(Value::Bytes(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Value, EncodeError> {
        Ok(Value::Null)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Value, EncodeError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value, EncodeError> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value, EncodeError> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value, EncodeError> {
        Ok(Value::Str(variant.to_owned()))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<Value, EncodeError> {
        let inner = value.serialize(self)?;
        match name {
            DECIMAL_TOKEN | DATE_TOKEN | DATE_TIME_TOKEN | TIME_TOKEN => {
                rebuild_marker(name, inner)
            }
            _ => Ok(inner),
        }
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value, EncodeError> {
        Ok(Value::Map(vec![(variant.to_owned(), value.serialize(self)?)]))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec, EncodeError> {
        Ok(SerializeVec {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec, EncodeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SerializeVec, EncodeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant, EncodeError> {
        Ok(SerializeTupleVariant {
            variant,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap, EncodeError> {
        Ok(SerializeMap {
            pairs: Vec::with_capacity(len.unwrap_or(0)),
            next_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap, EncodeError> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeStructVariant, EncodeError> {
        Ok(SerializeStructVariant {
            variant,
            pairs: Vec::with_capacity(len),
        })
    }
}

pub struct SerializeVec {
    items: Vec<Value>,
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        self.items.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(Value::Array(self.items))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, EncodeError> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, EncodeError> {
        ser::SerializeSeq::end(self)
    }
}

pub struct SerializeTupleVariant {
    variant: &'static str,
    items: Vec<Value>,
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        self.items.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(Value::Map(vec![(
            self.variant.to_owned(),
            Value::Array(self.items),
        )]))
    }
}

pub struct SerializeMap {
    pairs: Vec<(String, Value)>,
    next_key: Option<String>,
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), EncodeError> {
        self.next_key = Some(key.serialize(MapKeySerializer)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| EncodeError::Custom("serialize_value called before serialize_key".into()))?;
        self.pairs.push((key, to_value(value)?));
        Ok(())
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(Value::Map(self.pairs))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), EncodeError> {
        self.pairs.push((key.to_owned(), to_value(value)?));
        Ok(())
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(Value::Map(self.pairs))
    }
}

pub struct SerializeStructVariant {
    variant: &'static str,
    pairs: Vec<(String, Value)>,
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), EncodeError> {
        self.pairs.push((key.to_owned(), to_value(value)?));
        Ok(())
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(Value::Map(vec![(
            self.variant.to_owned(),
            Value::Map(self.pairs),
        )]))
    }
}

/// Accepts string-like keys only.
struct MapKeySerializer;

fn key_unsupported(kind: &str) -> EncodeError {
    unsupported(&format!("{kind} map key"))
}

impl ser::Serializer for MapKeySerializer {
    type Ok = String;
    type Error = EncodeError;

    type SerializeSeq = ser::Impossible<String, EncodeError>;
    type SerializeTuple = ser::Impossible<String, EncodeError>;
    type SerializeTupleStruct = ser::Impossible<String, EncodeError>;
    type SerializeTupleVariant = ser::Impossible<String, EncodeError>;
    type SerializeMap = ser::Impossible<String, EncodeError>;
    type SerializeStruct = ser::Impossible<String, EncodeError>;
    type SerializeStructVariant = ser::Impossible<String, EncodeError>;

    fn serialize_str(self, v: &str) -> Result<String, EncodeError> {
        Ok(v.to_owned())
    }

    fn serialize_char(self, v: char) -> Result<String, EncodeError> {
        Ok(v.to_string())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String, EncodeError> {
        Ok(variant.to_owned())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<String, EncodeError> {
        value.serialize(self)
    }

    fn serialize_bool(self, _v: bool) -> Result<String, EncodeError> {
        Err(key_unsupported("bool"))
    }

    fn serialize_i8(self, _v: i8) -> Result<String, EncodeError> {
        Err(key_unsupported("i8"))
    }

    fn serialize_i16(self, _v: i16) -> Result<String, EncodeError> {
        Err(key_unsupported("i16"))
    }

    fn serialize_i32(self, _v: i32) -> Result<String, EncodeError> {
        Err(key_unsupported("i32"))
    }

    fn serialize_i64(self, _v: i64) -> Result<String, EncodeError> {
        Err(key_unsupported("i64"))
    }

    fn serialize_u8(self, _v: u8) -> Result<String, EncodeError> {
        Err(key_unsupported("u8"))
    }

    fn serialize_u16(self, _v: u16) -> Result<String, EncodeError> {
        Err(key_unsupported("u16"))
    }

    fn serialize_u32(self, _v: u32) -> Result<String, EncodeError> {
        Err(key_unsupported("u32"))
    }

    fn serialize_u64(self, _v: u64) -> Result<String, EncodeError> {
        Err(key_unsupported("u64"))
    }

    fn serialize_f32(self, _v: f32) -> Result<String, EncodeError> {
        Err(key_unsupported("f32"))
    }

    fn serialize_f64(self, _v: f64) -> Result<String, EncodeError> {
        Err(key_unsupported("f64"))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String, EncodeError> {
        Err(key_unsupported("bytes"))
    }

    fn serialize_none(self) -> Result<String, EncodeError> {
        Err(key_unsupported("none"))
    }

    fn serialize_some<T: ?Sized + Serialize>(self, _value: &T) -> Result<String, EncodeError> {
        Err(key_unsupported("option"))
    }

    fn serialize_unit(self) -> Result<String, EncodeError> {
        Err(key_unsupported("unit"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<String, EncodeError> {
        Err(key_unsupported(name))
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String, EncodeError> {
        Err(key_unsupported(name))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, EncodeError> {
        Err(key_unsupported("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, EncodeError> {
        Err(key_unsupported("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, EncodeError> {
        Err(key_unsupported(name))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, EncodeError> {
        Err(key_unsupported(name))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, EncodeError> {
        Err(key_unsupported("map"))
    }

    fn serialize_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, EncodeError> {
        Err(key_unsupported(name))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, EncodeError> {
        Err(key_unsupported(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Patient {
        name: String,
        born: Date,
        #[serde(serialize_with = "decimal::serialize")]
        weight: Decimal,
        tags: Vec<&'static str>,
        nickname: Option<String>,
    }

    #[test]
    fn struct_becomes_ordered_map() {
        let patient = Patient {
            name: "Ewout".into(),
            born: "1972-11-30".parse().unwrap(),
            weight: Decimal::new(7250, 2),
            tags: vec!["a"],
            nickname: None,
        };
        let value = to_value(&patient).unwrap();
        let keys: Vec<_> = value.as_map().unwrap().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["name", "born", "weight", "tags", "nickname"]);
        assert!(matches!(value["born"], Value::Date(_)));
        assert_eq!(value["weight"], Value::Decimal(Decimal::new(7250, 2)));
        assert!(value["nickname"].is_null());
    }

    #[test]
    fn markers_are_plain_text_elsewhere() {
        let date: Date = "1972-11".parse().unwrap();
        assert_eq!(serde_json::to_string(&date).unwrap(), "\"1972-11\"");
    }

    #[derive(Serialize)]
    enum Shape {
        Empty,
        Circle(u32),
        Pair(u8, u8),
        Rect { w: u8, h: u8 },
    }

    #[test]
    fn enums_are_externally_tagged() {
        assert_eq!(to_value(&Shape::Empty).unwrap(), Value::from("Empty"));
        assert_eq!(
            to_value(&Shape::Circle(3)).unwrap(),
            Value::Map(vec![("Circle".into(), 3u32.into())])
        );
        assert_eq!(
            to_value(&Shape::Pair(1, 2)).unwrap(),
            Value::Map(vec![(
                "Pair".into(),
                Value::Array(vec![1u8.into(), 2u8.into()])
            )])
        );
        assert_eq!(
            to_value(&Shape::Rect { w: 1, h: 2 }).unwrap(),
            Value::Map(vec![(
                "Rect".into(),
                Value::Map(vec![("w".into(), 1u8.into()), ("h".into(), 2u8.into())])
            )])
        );
    }

    #[test]
    fn wide_integers() {
        assert_eq!(to_value(&-5i128).unwrap(), Value::from(-5i64));
        assert_eq!(to_value(&(u64::MAX as u128)).unwrap(), Value::from(u64::MAX));
        assert_eq!(
            to_value(&u128::MAX),
            Err(EncodeError::UnsupportedType {
                type_name: "u128".into()
            })
        );
        assert_eq!(
            to_value(&i128::MIN),
            Err(EncodeError::UnsupportedType {
                type_name: "i128".into()
            })
        );
    }

    #[test]
    fn non_string_keys_are_unsupported() {
        let mut map = BTreeMap::new();
        map.insert(1u32, "one");
        assert_eq!(
            to_value(&map),
            Err(EncodeError::UnsupportedType {
                type_name: "u32 map key".into()
            })
        );
    }

    #[test]
    fn value_serializes_into_itself() {
        let value = Value::Map(vec![
            ("n".into(), Value::from(-3i16)),
            ("f".into(), Value::Float32(0.5)),
            ("b".into(), Value::Bytes(vec![1])),
            ("t".into(), Value::Time("10:30Z".parse().unwrap())),
            ("d".into(), Value::Decimal(Decimal::new(1, 3))),
        ]);
        assert_eq!(to_value(&value).unwrap(), value);
    }
}
