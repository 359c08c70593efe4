//! Row binding: table cells into records.
//!
//! This module provides a serde [`de::Deserializer`] over a single table row.
//! Columns are matched to struct fields by exact, case-sensitive name. Only
//! text (`String`) and decimal number (`f32`/`f64`) fields can receive a cell;
//! fields without a column get their zero value (`""`, `0.0`, `false`, ...).
//!
//! ## Usage
//!
//! Most users go through [`crate::from_str`] or [`crate::run`]:
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_mdtable::de::bind_row;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! #[allow(non_snake_case)]
//! struct Calculation { Operand: String, Number: f64 }
//!
//! let header = vec!["Number".to_string()];
//! let row = vec!["12.5".to_string()];
//! let calc: Calculation = bind_row(&header, &row).unwrap();
//! assert_eq!(calc, Calculation { Operand: String::new(), Number: 12.5 });
//! ```

use crate::{Error, Result};
use serde::de::{self, DeserializeOwned, IntoDeserializer};
use serde::forward_to_deserialize_any;

/// Binds one row to a record.
///
/// # Errors
///
/// - [`Error::UnknownField`] when a header name is not a field of `T`
/// - [`Error::DuplicateField`] when a header name appears twice
/// - [`Error::UnsupportedKind`] when a bound field is neither text nor a
///   decimal number
/// - [`Error::InvalidNumber`] when a numeric field's cell does not parse
pub fn bind_row<T>(header: &[String], row: &[String]) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(RowDeserializer::new(header, row))
}

/// Binds every body row, stopping at the first failure.
///
/// # Errors
///
/// Same as [`bind_row`].
pub fn bind_rows<T>(header: &[String], rows: &[Vec<String>]) -> Result<Vec<T>>
where
    T: DeserializeOwned,
{
    rows.iter().map(|row| bind_row(header, row)).collect()
}

/// Deserializer over one row, positionally aligned with a header.
pub struct RowDeserializer<'a> {
    header: &'a [String],
    row: &'a [String],
}

impl<'a> RowDeserializer<'a> {
    #[must_use]
    pub fn new(header: &'a [String], row: &'a [String]) -> Self {
        RowDeserializer { header, row }
    }

    fn cell(&self, field: &str) -> Option<&'a str> {
        self.header
            .iter()
            .position(|name| name == field)
            .and_then(|idx| self.row.get(idx))
            .map(String::as_str)
    }
}

impl<'de, 'a> de::Deserializer<'de> for RowDeserializer<'a> {
    type Error = Error;

    fn deserialize_any<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::custom("records must be structs with named fields"))
    }

    fn deserialize_struct<V>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if let Some(unknown) = self
            .header
            .iter()
            .find(|column| !fields.contains(&column.as_str()))
        {
            return Err(Error::unknown_field(unknown, name));
        }
        for (idx, column) in self.header.iter().enumerate() {
            if self.header[..idx].contains(column) {
                return Err(Error::duplicate_field(column, name));
            }
        }

        visitor.visit_map(FieldAccess {
            row: self,
            fields: fields.iter(),
            pending: None,
        })
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct seq tuple
        tuple_struct map enum identifier ignored_any
    }
}

/// Walks the struct's fields in declaration order, pairing each with its
/// cell (or with nothing, for the zero value).
struct FieldAccess<'a> {
    row: RowDeserializer<'a>,
    fields: std::slice::Iter<'static, &'static str>,
    pending: Option<CellDeserializer<'a>>,
}

impl<'de, 'a> de::MapAccess<'de> for FieldAccess<'a> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.fields.next() {
            Some(&field) => {
                self.pending = Some(CellDeserializer {
                    field,
                    cell: self.row.cell(field),
                });
                seed.deserialize(field.into_deserializer()).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.pending.take() {
            Some(cell) => seed.deserialize(cell),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.fields.len())
    }
}

/// Deserializer for one field. `cell` is `None` when the row has no column
/// for the field.
struct CellDeserializer<'a> {
    field: &'static str,
    cell: Option<&'a str>,
}

impl<'a> CellDeserializer<'a> {
    fn unsupported(&self, kind: &str) -> Error {
        Error::unsupported_kind(self.field, kind)
    }
}

/// Kinds that cannot be read from a cell but still have a zero value for
/// fields the table does not mention.
macro_rules! zero_or_unsupported {
    ($($method:ident => $visit:ident($zero:expr), $kind:literal;)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                match self.cell {
                    None => visitor.$visit($zero),
                    Some(_) => Err(self.unsupported($kind)),
                }
            }
        )*
    };
}

/// Kinds that are never valid record fields.
macro_rules! always_unsupported {
    ($($method:ident => $kind:literal;)*) => {
        $(
            fn $method<V>(self, _visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                Err(self.unsupported($kind))
            }
        )*
    };
}

impl<'de, 'a> de::Deserializer<'de> for CellDeserializer<'a> {
    type Error = Error;

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.cell {
            None => visitor.visit_f64(0.0),
            Some(text) => {
                let value = text
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| Error::invalid_number(self.field, text))?;
                visitor.visit_f64(value)
            }
        }
    }

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.cell {
            None => visitor.visit_f32(0.0),
            Some(text) => {
                let value = text
                    .trim()
                    .parse::<f32>()
                    .map_err(|_| Error::invalid_number(self.field, text))?;
                visitor.visit_f32(value)
            }
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_str(self.cell.unwrap_or_default())
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    zero_or_unsupported! {
        deserialize_bool => visit_bool(false), "bool";
        deserialize_i8 => visit_i8(0), "i8";
        deserialize_i16 => visit_i16(0), "i16";
        deserialize_i32 => visit_i32(0), "i32";
        deserialize_i64 => visit_i64(0), "i64";
        deserialize_u8 => visit_u8(0), "u8";
        deserialize_u16 => visit_u16(0), "u16";
        deserialize_u32 => visit_u32(0), "u32";
        deserialize_u64 => visit_u64(0), "u64";
        deserialize_char => visit_char('\0'), "char";
    }

    always_unsupported! {
        deserialize_any => "untyped value";
        deserialize_bytes => "bytes";
        deserialize_byte_buf => "bytes";
        deserialize_seq => "sequence";
        deserialize_map => "map";
        deserialize_identifier => "identifier";
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.cell {
            None => visitor.visit_none(),
            Some(_) => Err(self.unsupported("option")),
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.cell {
            None => visitor.visit_unit(),
            Some(_) => Err(self.unsupported("unit")),
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.unsupported("unit struct"))
    }

    fn deserialize_tuple<V>(self, _len: usize, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.unsupported("tuple"))
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.unsupported("tuple struct"))
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.unsupported("nested struct"))
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(self.unsupported("enum"))
    }
}
