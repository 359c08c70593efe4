//! Error types for table parsing, field binding and example runs.
//!
//! Every stage of a run reports failures through the single [`Error`] enum so
//! that `?` works across the codec, the binder and the orchestrator.
//!
//! ## Error Categories
//!
//! - **Format errors**: the table text is malformed (ragged rows, stray
//!   content outside the `|` delimiters, missing header)
//! - **Bind errors**: a column has no matching record field, a field has an
//!   unsupported type, or a numeric cell does not parse
//! - **Transform errors**: the function under test reported a failure
//! - **Config errors**: the run options are inconsistent
//!
//! Use [`Error::kind`] to branch on the category without matching every
//! variant.
//!
//! ## Examples
//!
//! ```rust
//! use serde_mdtable::{Error, ErrorKind, Table};
//!
//! let err = Table::parse("| a | b |\n|---|---|\n| 1 |").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Format);
//! assert!(err.to_string().contains("line 3"));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors produced by this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Malformed table text
    #[error("invalid table at line {line}: {msg}")]
    Format { line: usize, msg: String },

    /// The table has no header/separator pair, so columns cannot be named
    #[error("table has no header row (expected a `|---|` separator on line 2)")]
    MissingHeader,

    /// A column name does not correspond to any field of the record
    #[error("unknown field `{field}` for record `{record}`")]
    UnknownField { field: String, record: String },

    /// The same column name appears more than once in the header
    #[error("duplicate column `{field}` for record `{record}`")]
    DuplicateField { field: String, record: String },

    /// The record has a field whose type is neither text nor a decimal number
    #[error("unsupported type for field `{field}`: {kind}")]
    UnsupportedKind { field: String, kind: String },

    /// A numeric field received a cell that is not a decimal number
    #[error("invalid number for field `{field}`: {value:?}")]
    InvalidNumber { field: String, value: String },

    /// The function under test returned an error
    #[error("transform failed: {0}")]
    Transform(String),

    /// Inconsistent run options
    #[error("invalid configuration: {0}")]
    Config(String),

    /// IO error while emitting output
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error raised through serde
    #[error("{0}")]
    Custom(String),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Format,
    Bind,
    Transform,
    Config,
    Io,
}

impl Error {
    /// Creates a format error pointing at a 1-based line of the input.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_mdtable::Error;
    ///
    /// let err = Error::format(4, "row has 3 cells, expected 2");
    /// assert!(err.to_string().contains("line 4"));
    /// ```
    pub fn format(line: usize, msg: &str) -> Self {
        Error::Format {
            line,
            msg: msg.to_string(),
        }
    }

    pub fn unknown_field(field: &str, record: &str) -> Self {
        Error::UnknownField {
            field: field.to_string(),
            record: record.to_string(),
        }
    }

    pub fn duplicate_field(field: &str, record: &str) -> Self {
        Error::DuplicateField {
            field: field.to_string(),
            record: record.to_string(),
        }
    }

    pub fn unsupported_kind(field: &str, kind: &str) -> Self {
        Error::UnsupportedKind {
            field: field.to_string(),
            kind: kind.to_string(),
        }
    }

    pub fn invalid_number(field: &str, value: &str) -> Self {
        Error::InvalidNumber {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// Wraps a failure reported by the function under test.
    pub fn transform<T: fmt::Display>(err: T) -> Self {
        Error::Transform(err.to_string())
    }

    pub fn config(msg: &str) -> Self {
        Error::Config(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns the category this error belongs to.
    ///
    /// Serde-originated [`Error::Custom`] messages only arise while binding
    /// or extracting records, so they count as bind errors.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Format { .. } | Error::MissingHeader => ErrorKind::Format,
            Error::UnknownField { .. }
            | Error::DuplicateField { .. }
            | Error::UnsupportedKind { .. }
            | Error::InvalidNumber { .. }
            | Error::Custom(_) => ErrorKind::Bind,
            Error::Transform(_) => ErrorKind::Transform,
            Error::Config(_) => ErrorKind::Config,
            Error::Io(_) => ErrorKind::Io,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
