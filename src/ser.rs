//! Row extraction: records into printable cells.
//!
//! This module provides a serde [`ser::Serializer`] that captures a flat
//! struct as an ordered map of field name to cell text. Decimal numbers use
//! Rust's shortest round-trip form (`10`, `2.5`); text is copied as-is.
//!
//! ```rust
//! use serde::Serialize;
//! use serde_mdtable::ser::extract_row;
//!
//! #[derive(Serialize)]
//! #[allow(non_snake_case)]
//! struct Calculation { Operand: String, Number: f64 }
//!
//! let calc = Calculation { Operand: "+".into(), Number: 10.0 };
//! let row = extract_row(&calc, &["Number".to_string(), "Operand".to_string()]).unwrap();
//! assert_eq!(row, vec!["10", "+"]);
//! ```

use crate::{Error, Result};
use indexmap::IndexMap;
use serde::ser::{self, Impossible, Serialize};

/// Field values of one record, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Fields {
    pub record: &'static str,
    pub values: IndexMap<String, String>,
}

impl Fields {
    /// Looks up each requested column.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownField`] for the first column the record lacks.
    pub fn select(&self, columns: &[String]) -> Result<Vec<String>> {
        columns
            .iter()
            .map(|column| {
                self.values
                    .get(column.as_str())
                    .cloned()
                    .ok_or_else(|| Error::unknown_field(column, self.record))
            })
            .collect()
    }
}

/// Captures every field of a record as cell text.
///
/// # Errors
///
/// Returns [`Error::UnsupportedKind`] if the value is not a struct or has a
/// field that is neither text nor a decimal number.
pub fn to_fields<T>(record: &T) -> Result<Fields>
where
    T: ?Sized + Serialize,
{
    record.serialize(RecordSerializer)
}

/// Extracts the given columns of a record, in column order.
///
/// # Errors
///
/// Returns [`Error::UnknownField`] when a column is not a field of the
/// record, or the errors of [`to_fields`].
pub fn extract_row<T>(record: &T, columns: &[String]) -> Result<Vec<String>>
where
    T: ?Sized + Serialize,
{
    to_fields(record)?.select(columns)
}

/// Serializer accepting a single struct.
pub struct RecordSerializer;

/// Collects the fields of a struct.
pub struct FieldCollector {
    fields: Fields,
}

fn not_a_record(kind: &str) -> Error {
    Error::unsupported_kind(kind, "records must be structs with named fields")
}

impl ser::Serializer for RecordSerializer {
    type Ok = Fields;
    type Error = Error;

    type SerializeSeq = Impossible<Fields, Error>;
    type SerializeTuple = Impossible<Fields, Error>;
    type SerializeTupleStruct = Impossible<Fields, Error>;
    type SerializeTupleVariant = Impossible<Fields, Error>;
    type SerializeMap = Impossible<Fields, Error>;
    type SerializeStruct = FieldCollector;
    type SerializeStructVariant = Impossible<Fields, Error>;

    fn serialize_struct(self, name: &'static str, len: usize) -> Result<FieldCollector> {
        Ok(FieldCollector {
            fields: Fields {
                record: name,
                values: IndexMap::with_capacity(len),
            },
        })
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Fields>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_bool(self, _v: bool) -> Result<Fields> {
        Err(not_a_record("bool"))
    }

    fn serialize_i8(self, _v: i8) -> Result<Fields> {
        Err(not_a_record("i8"))
    }

    fn serialize_i16(self, _v: i16) -> Result<Fields> {
        Err(not_a_record("i16"))
    }

    fn serialize_i32(self, _v: i32) -> Result<Fields> {
        Err(not_a_record("i32"))
    }

    fn serialize_i64(self, _v: i64) -> Result<Fields> {
        Err(not_a_record("i64"))
    }

    fn serialize_u8(self, _v: u8) -> Result<Fields> {
        Err(not_a_record("u8"))
    }

    fn serialize_u16(self, _v: u16) -> Result<Fields> {
        Err(not_a_record("u16"))
    }

    fn serialize_u32(self, _v: u32) -> Result<Fields> {
        Err(not_a_record("u32"))
    }

    fn serialize_u64(self, _v: u64) -> Result<Fields> {
        Err(not_a_record("u64"))
    }

    fn serialize_f32(self, _v: f32) -> Result<Fields> {
        Err(not_a_record("f32"))
    }

    fn serialize_f64(self, _v: f64) -> Result<Fields> {
        Err(not_a_record("f64"))
    }

    fn serialize_char(self, _v: char) -> Result<Fields> {
        Err(not_a_record("char"))
    }

    fn serialize_str(self, _v: &str) -> Result<Fields> {
        Err(not_a_record("str"))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Fields> {
        Err(not_a_record("bytes"))
    }

    fn serialize_none(self) -> Result<Fields> {
        Err(not_a_record("option"))
    }

    fn serialize_some<T>(self, _value: &T) -> Result<Fields>
    where
        T: ?Sized + Serialize,
    {
        Err(not_a_record("option"))
    }

    fn serialize_unit(self) -> Result<Fields> {
        Err(not_a_record("unit"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Fields> {
        Err(not_a_record(name))
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<Fields> {
        Err(not_a_record(name))
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Fields>
    where
        T: ?Sized + Serialize,
    {
        Err(not_a_record(name))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(not_a_record("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(not_a_record("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(not_a_record(name))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(not_a_record(name))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(not_a_record("map"))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(not_a_record(name))
    }
}

impl ser::SerializeStruct for FieldCollector {
    type Ok = Fields;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let cell = value.serialize(CellSerializer { field: key })?;
        self.fields.values.insert(key.to_string(), cell);
        Ok(())
    }

    fn end(self) -> Result<Fields> {
        Ok(self.fields)
    }
}

/// Renders one scalar field as cell text.
struct CellSerializer {
    field: &'static str,
}

impl CellSerializer {
    fn unsupported(&self, kind: &str) -> Error {
        Error::unsupported_kind(self.field, kind)
    }
}

impl ser::Serializer for CellSerializer {
    type Ok = String;
    type Error = Error;

    type SerializeSeq = Impossible<String, Error>;
    type SerializeTuple = Impossible<String, Error>;
    type SerializeTupleStruct = Impossible<String, Error>;
    type SerializeTupleVariant = Impossible<String, Error>;
    type SerializeMap = Impossible<String, Error>;
    type SerializeStruct = Impossible<String, Error>;
    type SerializeStructVariant = Impossible<String, Error>;

    fn serialize_f32(self, v: f32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_f64(self, v: f64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_str(self, v: &str) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_bool(self, _v: bool) -> Result<String> {
        Err(self.unsupported("bool"))
    }

    fn serialize_i8(self, _v: i8) -> Result<String> {
        Err(self.unsupported("i8"))
    }

    fn serialize_i16(self, _v: i16) -> Result<String> {
        Err(self.unsupported("i16"))
    }

    fn serialize_i32(self, _v: i32) -> Result<String> {
        Err(self.unsupported("i32"))
    }

    fn serialize_i64(self, _v: i64) -> Result<String> {
        Err(self.unsupported("i64"))
    }

    fn serialize_u8(self, _v: u8) -> Result<String> {
        Err(self.unsupported("u8"))
    }

    fn serialize_u16(self, _v: u16) -> Result<String> {
        Err(self.unsupported("u16"))
    }

    fn serialize_u32(self, _v: u32) -> Result<String> {
        Err(self.unsupported("u32"))
    }

    fn serialize_u64(self, _v: u64) -> Result<String> {
        Err(self.unsupported("u64"))
    }

    fn serialize_char(self, _v: char) -> Result<String> {
        Err(self.unsupported("char"))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String> {
        Err(self.unsupported("bytes"))
    }

    fn serialize_none(self) -> Result<String> {
        Err(self.unsupported("option"))
    }

    fn serialize_some<T>(self, _value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        Err(self.unsupported("option"))
    }

    fn serialize_unit(self) -> Result<String> {
        Err(self.unsupported("unit"))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String> {
        Err(self.unsupported("unit struct"))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<String> {
        Err(self.unsupported("enum"))
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        Err(self.unsupported("enum"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(self.unsupported("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(self.unsupported("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(self.unsupported("tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(self.unsupported("enum"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(self.unsupported("map"))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(self.unsupported("nested struct"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(self.unsupported("enum"))
    }
}
