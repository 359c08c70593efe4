//! Output column configuration for runs.
//!
//! This module provides [`RunOptions`], which controls which columns the
//! result table shows and how their header labels read:
//!
//! - **Explicit headers** pick and order the output columns. They name record
//!   fields and are also the rendered labels.
//! - **Aliases** rename header labels only (external name ⇐ internal field
//!   name). Data rows are always extracted by field name.
//!
//! Without explicit headers the output record's fields are used in
//! declaration order.
//!
//! ## Examples
//!
//! ```rust
//! use serde_mdtable::RunOptions;
//!
//! // Show only `Result`, labelled `Total`
//! let options = RunOptions::new()
//!     .with_headers(["Result"])
//!     .with_alias("Total", "Result");
//!
//! // The same headers, written as a table
//! let options = RunOptions::new().with_headers_table("| Result |\n|--------|");
//! ```

use crate::{Error, Result, Table};
use indexmap::IndexMap;

/// Source of explicit output headers.
#[derive(Clone, Debug, PartialEq)]
pub enum Headers {
    /// Field names given directly.
    Names(Vec<String>),
    /// Table text whose header row (or first row, when headerless) lists the
    /// field names.
    Table(String),
}

impl Headers {
    /// Resolves the header names.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if the header table does not parse.
    pub fn resolve(&self) -> Result<Vec<String>> {
        match self {
            Headers::Names(names) => Ok(names.clone()),
            Headers::Table(text) => {
                let (header, rows) = Table::parse(text)?.into_parts();
                Ok(header
                    .or_else(|| rows.into_iter().next())
                    .unwrap_or_default())
            }
        }
    }
}

/// Configuration options for a run.
///
/// # Examples
///
/// ```rust
/// use serde_mdtable::RunOptions;
///
/// let options = RunOptions::new().with_alias("Value", "Number");
/// assert_eq!(options.aliases.get("Value").map(String::as_str), Some("Number"));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunOptions {
    /// Explicit output columns; `None` derives them from the output record.
    pub headers: Option<Headers>,
    /// External header label → internal field name.
    pub aliases: IndexMap<String, String>,
}

impl RunOptions {
    /// Creates default options: derived headers, no aliases.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the output columns by field name.
    #[must_use]
    pub fn with_headers<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers = Some(Headers::Names(names.into_iter().map(Into::into).collect()));
        self
    }

    /// Sets the output columns from table text such as `| A | B |\n|---|---|`.
    ///
    /// The text is parsed when the run starts.
    #[must_use]
    pub fn with_headers_table(mut self, table: impl Into<String>) -> Self {
        self.headers = Some(Headers::Table(table.into()));
        self
    }

    /// Renders the header of field `internal` as `external`.
    ///
    /// Registering the same external name twice keeps the later mapping.
    #[must_use]
    pub fn with_alias(mut self, external: impl Into<String>, internal: impl Into<String>) -> Self {
        self.aliases.insert(external.into(), internal.into());
        self
    }

    /// Adds several `(external, internal)` aliases.
    #[must_use]
    pub fn with_aliases<I, E, N>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = (E, N)>,
        E: Into<String>,
        N: Into<String>,
    {
        self.aliases.extend(
            aliases
                .into_iter()
                .map(|(external, internal)| (external.into(), internal.into())),
        );
        self
    }

    /// Inverts the alias map into field name → header label.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if two external names alias the same field.
    pub fn header_labels(&self) -> Result<IndexMap<String, String>> {
        let mut labels: IndexMap<String, String> = IndexMap::with_capacity(self.aliases.len());
        for (external, internal) in &self.aliases {
            if let Some(previous) = labels.insert(internal.clone(), external.clone()) {
                return Err(Error::config(&format!(
                    "field `{}` is aliased by both `{}` and `{}`",
                    internal, previous, external
                )));
            }
        }
        Ok(labels)
    }

    /// Checks the options without running anything.
    ///
    /// # Errors
    ///
    /// Same as [`RunOptions::header_labels`].
    pub fn validate(&self) -> Result<()> {
        self.header_labels().map(|_| ())
    }

    /// Explicit output columns, if configured.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] for unparsable header text and
    /// [`Error::Config`] when the configured header list is empty.
    pub fn output_headers(&self) -> Result<Option<Vec<String>>> {
        match &self.headers {
            None => Ok(None),
            Some(headers) => {
                let names = headers.resolve()?;
                if names.is_empty() {
                    return Err(Error::config("explicit output headers are empty"));
                }
                Ok(Some(names))
            }
        }
    }
}
