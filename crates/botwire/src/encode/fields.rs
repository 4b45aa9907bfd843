// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Flattens a top-level parameter object into an ordered list of wire fields.
//!
//! Each field is converted on its own so a serialization failure can be
//! attributed to the field that caused it. Fields skipped by
//! `skip_serializing_if` never reach the collector.

use std::fmt;

use serde::ser::{self, Impossible, Serialize, SerializeMap, SerializeStruct, Serializer};
use serde_json::Value;

use crate::error::BotError;

/// Field name reported when the parameter object itself is not encodable.
pub const TOP_LEVEL: &str = "<parameters>";

/// Wire fields in declaration order.
pub type Fields = Vec<(String, Value)>;

pub fn collect<T: Serialize + ?Sized>(params: &T) -> Result<Fields, BotError> {
    params
        .serialize(FieldCollector)
        .map_err(|e| BotError::encoding(e.field.unwrap_or_else(|| TOP_LEVEL.to_owned()), e.message))
}

/// Render the collected fields as a compact JSON object followed by a newline.
pub fn write_json(fields: &Fields) -> Result<Vec<u8>, BotError> {
    let mut buf = Vec::with_capacity(64);
    buf.push(b'{');
    for (i, (key, value)) in fields.iter().enumerate() {
        if i > 0 {
            buf.push(b',');
        }
        serde_json::to_writer(&mut buf, key).map_err(|e| BotError::encoding(key.as_str(), e))?;
        buf.push(b':');
        serde_json::to_writer(&mut buf, value).map_err(|e| BotError::encoding(key.as_str(), e))?;
    }
    buf.extend_from_slice(b"}\n");
    Ok(buf)
}

#[derive(Debug)]
pub struct CollectError {
    field: Option<String>,
    message: String,
}

impl CollectError {
    fn in_field(field: &str, err: impl fmt::Display) -> Self {
        Self { field: Some(field.to_owned()), message: err.to_string() }
    }

    fn not_an_object() -> Self {
        Self { field: None, message: "parameters must serialize to an object".to_owned() }
    }
}

impl fmt::Display for CollectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CollectError {}

impl ser::Error for CollectError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self { field: None, message: msg.to_string() }
    }
}

struct FieldCollector;

macro_rules! reject_scalars {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method(self, _v: $ty) -> Result<Fields, CollectError> {
                Err(CollectError::not_an_object())
            }
        )*
    };
}

impl Serializer for FieldCollector {
    type Ok = Fields;
    type Error = CollectError;
    type SerializeSeq = Impossible<Fields, CollectError>;
    type SerializeTuple = Impossible<Fields, CollectError>;
    type SerializeTupleStruct = Impossible<Fields, CollectError>;
    type SerializeTupleVariant = Impossible<Fields, CollectError>;
    type SerializeMap = MapFields;
    type SerializeStruct = StructFields;
    type SerializeStructVariant = Impossible<Fields, CollectError>;

    reject_scalars!(
        serialize_bool(bool),
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_u8(u8),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_f32(f32),
        serialize_f64(f64),
        serialize_char(char),
        serialize_str(&str),
        serialize_bytes(&[u8]),
    );

    fn serialize_none(self) -> Result<Fields, CollectError> {
        Ok(Fields::new())
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Fields, CollectError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Fields, CollectError> {
        Ok(Fields::new())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Fields, CollectError> {
        Ok(Fields::new())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
    ) -> Result<Fields, CollectError> {
        Err(CollectError::not_an_object())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Fields, CollectError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Fields, CollectError> {
        Err(CollectError::not_an_object())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, CollectError> {
        Err(CollectError::not_an_object())
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, CollectError> {
        Err(CollectError::not_an_object())
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, CollectError> {
        Err(CollectError::not_an_object())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, CollectError> {
        Err(CollectError::not_an_object())
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap, CollectError> {
        Ok(MapFields { fields: Fields::with_capacity(len.unwrap_or(0)), pending: None })
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStruct, CollectError> {
        Ok(StructFields { fields: Fields::with_capacity(len) })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, CollectError> {
        Err(CollectError::not_an_object())
    }
}

struct StructFields {
    fields: Fields,
}

impl SerializeStruct for StructFields {
    type Ok = Fields;
    type Error = CollectError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), CollectError> {
        let value = serde_json::to_value(value).map_err(|e| CollectError::in_field(key, e))?;
        self.fields.push((key.to_owned(), value));
        Ok(())
    }

    fn end(self) -> Result<Fields, CollectError> {
        Ok(self.fields)
    }
}

/// Maps (including `#[serde(flatten)]` structs) with string keys.
struct MapFields {
    fields: Fields,
    pending: Option<String>,
}

impl SerializeMap for MapFields {
    type Ok = Fields;
    type Error = CollectError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), CollectError> {
        match serde_json::to_value(key) {
            Ok(Value::String(key)) => {
                self.pending = Some(key);
                Ok(())
            }
            Ok(other) => Err(CollectError::in_field(
                &other.to_string(),
                "parameter names must be strings",
            )),
            Err(e) => Err(CollectError { field: None, message: e.to_string() }),
        }
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), CollectError> {
        let key = self.pending.take().unwrap_or_default();
        let value = serde_json::to_value(value).map_err(|e| CollectError::in_field(&key, e))?;
        self.fields.push((key, value));
        Ok(())
    }

    fn end(self) -> Result<Fields, CollectError> {
        Ok(self.fields)
    }
}
