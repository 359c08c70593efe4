//! # serde_mdtable
//!
//! Serde-driven marshaling between markdown pipe tables and typed records,
//! built for example-style functional tests.
//!
//! ## What is it for?
//!
//! A test states its input as a table, the crate binds each row to a record,
//! calls the function under test, and renders whatever the function returns
//! as a table again. The rendered table is compared against the expected one:
//!
//! ```text
//! | Operand | Number |          | Result |
//! |---------|--------|   ==>    |--------|
//! | +       | 10     |          | 10     |
//! | -       | 5      |
//! | *       | 4      |
//! | /       | 2      |
//! ```
//!
//! ## Key Features
//!
//! - **Name-based binding**: columns bind to struct fields by exact name via
//!   `#[derive(Serialize, Deserialize)]`, no reflection involved
//! - **Two call shapes**: per-row or whole-table functions, chosen with
//!   [`Transform`] constructors; collection outputs are flattened
//! - **Aligned output**: deterministic, column-padded rendering
//! - **Column control**: explicit output headers and header-only aliases via
//!   [`RunOptions`]
//! - **Errors, not panics**: every stage returns [`Result`]
//!
//! Record fields are text (`String`) or decimal numbers (`f32`, `f64`).
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_mdtable::{run_to_string, RunOptions, Transform};
//!
//! #[derive(Serialize, Deserialize)]
//! #[allow(non_snake_case)]
//! struct Calculation {
//!     Operand: String,
//!     Number: f64,
//! }
//!
//! #[derive(Serialize, Deserialize)]
//! #[allow(non_snake_case)]
//! struct Outcome {
//!     Result: f64,
//! }
//!
//! fn calculate(steps: Vec<Calculation>) -> Result<Outcome, String> {
//!     let mut result = 0.0;
//!     for step in steps {
//!         match step.Operand.as_str() {
//!             "+" => result += step.Number,
//!             "-" => result -= step.Number,
//!             "*" => result *= step.Number,
//!             "/" => result /= step.Number,
//!             other => return Err(format!("unknown operand {other}")),
//!         }
//!     }
//!     Ok(Outcome { Result: result })
//! }
//!
//! let input = "
//! | Operand | Number |
//! |---------|--------|
//! | +       | 10     |
//! | -       | 5      |
//! | *       | 4      |
//! | /       | 2      |
//! ";
//!
//! let output = run_to_string(Transform::whole_table(calculate), input, &RunOptions::new()).unwrap();
//! assert_eq!(output, "| Result |\n|--------|\n| 10     |\n");
//! ```
//!
//! In a test you would typically call [`run`], which prints the table (or an
//! `error: ...` line) to stdout.
//!
//! ## Working with Tables Directly
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_mdtable::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct Product {
//!     name: String,
//!     price: f64,
//! }
//!
//! let products: Vec<Product> = from_str("| name | price |\n|---|---|\n| Widget | 9.5 |").unwrap();
//! assert_eq!(products, vec![Product { name: "Widget".into(), price: 9.5 }]);
//!
//! let table = to_string(&products).unwrap();
//! assert_eq!(table, "| name   | price |\n|--------|-------|\n| Widget | 9.5   |\n");
//! ```

pub mod de;
pub mod error;
pub mod options;
pub mod record;
pub mod run;
pub mod ser;
pub mod shape;
pub mod table;

pub use error::{Error, ErrorKind, Result};
pub use options::{Headers, RunOptions};
pub use record::{Record, RecordInfo};
pub use run::{render, run, run_to_string, run_to_writer};
pub use shape::{Shape, Transform};
pub use table::Table;

use serde::de::DeserializeOwned;
use std::io;

/// Decodes table text into records, one per body row.
///
/// # Examples
///
/// ```rust
/// use serde_mdtable::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, Debug, PartialEq)]
/// struct Point { x: f64, y: f64 }
///
/// let points: Vec<Point> = from_str("| x | y |\n|---|---|\n| 1 | 2 |").unwrap();
/// assert_eq!(points, vec![Point { x: 1.0, y: 2.0 }]);
/// ```
///
/// # Errors
///
/// Returns a format error for malformed text or a table without a header row,
/// and bind errors for rows that do not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
{
    let (header, body) = Table::parse(s)?.into_parts();
    let header = header.ok_or(Error::MissingHeader)?;
    de::bind_rows(&header, &body)
}

/// Reads table text from an I/O stream and decodes it into records.
///
/// # Errors
///
/// Returns an error if reading fails, or the errors of [`from_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<Vec<T>>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string)
}

/// Renders records as a table with one column per field.
///
/// # Errors
///
/// Returns an error if `U` is not a flat struct of text and decimal fields.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<U>(records: &[U]) -> Result<String>
where
    U: Record,
{
    render(records, &RunOptions::default())
}

/// Renders records as a table with custom output columns and aliases.
///
/// # Examples
///
/// ```rust
/// use serde_mdtable::{to_string_with_options, RunOptions};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Point { x: f64, y: f64 }
///
/// let options = RunOptions::new().with_headers(["y"]).with_alias("Y", "y");
/// let table = to_string_with_options(&[Point { x: 1.0, y: 2.0 }], &options).unwrap();
/// assert_eq!(table, "| Y |\n|---|\n| 2 |\n");
/// ```
///
/// # Errors
///
/// Returns a config error for inconsistent options and bind errors when a
/// column is not a field of `U`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<U>(records: &[U], options: &RunOptions) -> Result<String>
where
    U: Record,
{
    render(records, options)
}

/// Renders records as a table into a writer.
///
/// # Errors
///
/// Returns the errors of [`to_string`], or an IO error if writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, U>(mut writer: W, records: &[U]) -> Result<()>
where
    W: io::Write,
    U: Record,
{
    let table = to_string(records)?;
    writer
        .write_all(table.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
    struct Product {
        sku: String,
        price: f64,
    }

    fn products() -> Vec<Product> {
        vec![
            Product {
                sku: "A-1".to_string(),
                price: 9.99,
            },
            Product {
                sku: "B|2".to_string(),
                price: 14.5,
            },
        ]
    }

    #[test]
    fn test_to_string_from_str_roundtrip() {
        let table = to_string(&products()).unwrap();
        let back: Vec<Product> = from_str(&table).unwrap();
        assert_eq!(back, products());
    }

    #[test]
    fn test_from_str_requires_header() {
        let err = from_str::<Product>("| A-1 | 9.99 |").unwrap_err();
        assert_eq!(err, Error::MissingHeader);
    }

    #[test]
    fn test_from_str_with_deserialize_only_record() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Point {
            x: f64,
        }

        let points: Vec<Point> = from_str("| x |\n|---|\n| 4 |").unwrap();
        assert_eq!(points, vec![Point { x: 4.0 }]);
    }

    #[test]
    fn test_from_reader() {
        let bytes = b"| sku | price |\n|-----|-------|\n| X | 1 |";
        let back: Vec<Product> = from_reader(&bytes[..]).unwrap();
        assert_eq!(back[0].sku, "X");
    }

    #[test]
    fn test_to_writer() {
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &products()[..1]).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "| sku | price |\n|-----|-------|\n| A-1 | 9.99  |\n"
        );
    }

    #[test]
    fn test_to_string_empty_slice_keeps_header() {
        let table = to_string::<Product>(&[]).unwrap();
        assert_eq!(table, "| sku | price |\n|-----|-------|\n");
    }
}
