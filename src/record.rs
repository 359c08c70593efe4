//! Record capability: field names and record name from serde.
//!
//! Any `#[derive(Serialize, Deserialize)]` struct with named fields is a
//! [`Record`]. The derive already knows the struct's name and its fields in
//! declaration order; [`describe`] reads them back by driving the derived
//! `Deserialize` impl with a deserializer that stops at `deserialize_struct`.
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_mdtable::Record;
//!
//! #[derive(Serialize, Deserialize)]
//! struct Calculation {
//!     #[serde(rename = "Operand")]
//!     operand: String,
//!     #[serde(rename = "Number")]
//!     number: f64,
//! }
//!
//! assert_eq!(Calculation::field_names().unwrap(), &["Operand", "Number"]);
//! ```

use crate::{Error, Result};
use serde::de::{self, DeserializeOwned};
use serde::{forward_to_deserialize_any, Serialize};

/// Name and ordered field names of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordInfo {
    pub name: &'static str,
    pub fields: &'static [&'static str],
}

/// A flat struct that can be bound from and extracted to table rows.
///
/// Implemented for every `Serialize + DeserializeOwned` type; whether the
/// type is actually a struct is checked when it is described or bound.
pub trait Record: Serialize + DeserializeOwned {
    /// Describes the record type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedKind`] if the type is not a struct with
    /// named fields.
    fn describe() -> Result<RecordInfo> {
        describe::<Self>()
    }

    /// Field names in declaration order (after serde renames).
    ///
    /// # Errors
    ///
    /// Same as [`Record::describe`].
    fn field_names() -> Result<&'static [&'static str]> {
        Ok(Self::describe()?.fields)
    }
}

impl<T> Record for T where T: Serialize + DeserializeOwned {}

/// Reads a type's struct description out of its `Deserialize` impl.
///
/// # Errors
///
/// Returns [`Error::UnsupportedKind`] if `T` does not deserialize as a struct.
pub fn describe<T: DeserializeOwned>() -> Result<RecordInfo> {
    let mut info = None;
    // The probe always fails; only the captured description matters
    let _ = T::deserialize(Probe { info: &mut info });
    info.ok_or_else(|| {
        Error::unsupported_kind(
            std::any::type_name::<T>(),
            "records must be structs with named fields",
        )
    })
}

struct Probe<'a> {
    info: &'a mut Option<RecordInfo>,
}

impl<'de, 'a> de::Deserializer<'de> for Probe<'a> {
    type Error = Error;

    fn deserialize_any<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::custom("not a struct"))
    }

    fn deserialize_struct<V>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        *self.info = Some(RecordInfo { name, fields });
        Err(Error::custom("struct described"))
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize, Deserialize)]
    struct Calculation {
        #[serde(rename = "Operand")]
        operand: String,
        #[serde(rename = "Number")]
        number: f64,
    }

    #[derive(Serialize, Deserialize)]
    #[allow(non_snake_case)]
    struct Outcome {
        Result: f64,
    }

    #[test]
    fn test_describe_struct() {
        let info = Calculation::describe().unwrap();
        assert_eq!(info.name, "Calculation");
        assert_eq!(info.fields, &["Operand", "Number"]);
    }

    #[test]
    fn test_field_names_follow_declaration_order() {
        assert_eq!(Outcome::field_names().unwrap(), &["Result"]);
    }

    #[test]
    fn test_non_struct_is_unsupported() {
        assert!(matches!(
            f64::describe(),
            Err(Error::UnsupportedKind { .. })
        ));
        assert!(matches!(
            Vec::<Calculation>::describe(),
            Err(Error::UnsupportedKind { .. })
        ));
    }
}
