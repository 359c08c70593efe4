//! Example runs: table in, function under test, table out.
//!
//! [`run`] decodes an input table, feeds it to a [`Transform`], and prints the
//! results as a table. On any failure it prints a single `error: ...` line
//! instead and never emits a partial table.
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_mdtable::{run_to_string, RunOptions, Transform};
//!
//! #[derive(Serialize, Deserialize)]
//! #[allow(non_snake_case)]
//! struct Number { Number: f64 }
//!
//! fn maximum(numbers: Vec<Number>) -> Result<Number, String> {
//!     numbers
//!         .into_iter()
//!         .reduce(|a, b| if b.Number > a.Number { b } else { a })
//!         .ok_or_else(|| "no numbers provided".to_string())
//! }
//!
//! let input = "
//! | Number |
//! |--------|
//! | 5      |
//! | 6      |
//! | 2      |
//! ";
//!
//! let output = run_to_string(Transform::whole_table(maximum), input, &RunOptions::new()).unwrap();
//! assert_eq!(output, "| Number |\n|--------|\n| 6      |\n");
//! ```

use crate::ser::{to_fields, Fields};
use crate::shape::Transform;
use crate::{Error, Record, Result, RunOptions, Table};
use serde::de::DeserializeOwned;
use std::io::{self, Write};
use tracing::{debug, warn};

/// Runs `transform` over `input` and prints the result table (or an
/// `error: ...` line) to stdout.
///
/// Never panics; a failure to write to stdout is logged and dropped.
pub fn run<T, U>(transform: Transform<'_, T, U>, input: &str, options: &RunOptions)
where
    T: DeserializeOwned,
    U: Record,
{
    let stdout = io::stdout();
    if let Err(err) = run_to_writer(stdout.lock(), transform, input, options) {
        warn!(error = %err, "failed to write run output");
    }
}

/// Runs `transform` over `input` and writes the result table, or a single
/// `error: ...` line, to `writer`.
///
/// # Errors
///
/// Only IO errors from `writer` are returned; run failures are written.
pub fn run_to_writer<W, T, U>(
    mut writer: W,
    transform: Transform<'_, T, U>,
    input: &str,
    options: &RunOptions,
) -> io::Result<()>
where
    W: Write,
    T: DeserializeOwned,
    U: Record,
{
    match run_to_string(transform, input, options) {
        Ok(table) => writer.write_all(table.as_bytes()),
        Err(err) => writeln!(writer, "error: {}", single_line(&err.to_string())),
    }
}

/// Joins the non-blank lines of `message` with a single space.
fn single_line(message: &str) -> String {
    message
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs `transform` over `input` and returns the rendered result table.
///
/// # Errors
///
/// - [`Error::Config`] for inconsistent options (checked before anything runs)
/// - [`Error::Format`] / [`Error::MissingHeader`] for bad input text
/// - bind errors for rows that do not fit `T`, or results that lack a column
/// - [`Error::Transform`] when the function under test fails
pub fn run_to_string<T, U>(
    mut transform: Transform<'_, T, U>,
    input: &str,
    options: &RunOptions,
) -> Result<String>
where
    T: DeserializeOwned,
    U: Record,
{
    options.validate()?;

    let table = Table::parse(input)?;
    let (header, body) = table.into_parts();
    let header = header.ok_or(Error::MissingHeader)?;
    debug!(columns = header.len(), rows = body.len(), "parsed input table");

    let results = transform.apply(&header, &body).map_err(|err| {
        warn!(error = %err, "run failed");
        err
    })?;

    render(&results, options)
}

/// Renders records as a table using the configured output columns.
///
/// # Errors
///
/// [`Error::Config`] for inconsistent options, [`Error::UnknownField`] when a
/// configured column is not a field of `U`, [`Error::UnsupportedKind`] for
/// fields that are neither text nor decimal numbers.
pub fn render<U>(records: &[U], options: &RunOptions) -> Result<String>
where
    U: Record,
{
    let labels = options.header_labels()?;
    let extracted = records
        .iter()
        .map(to_fields)
        .collect::<Result<Vec<Fields>>>()?;
    let columns = resolve_columns::<U>(options, extracted.first())?;

    let mut table = Table::new(columns.clone());
    for fields in &extracted {
        table.push_row(fields.select(&columns)?)?;
    }
    table.relabel(|column| labels.get(column).cloned());

    debug!(
        columns = columns.len(),
        rows = records.len(),
        "rendered output table"
    );
    Ok(table.to_markdown())
}

/// Explicit headers when configured, otherwise the fields of `U`.
///
/// The serialized fields of the first record win over the deserialize-side
/// description, which also lists `#[serde(alias)]` names.
fn resolve_columns<U: Record>(
    options: &RunOptions,
    first: Option<&Fields>,
) -> Result<Vec<String>> {
    if let Some(headers) = options.output_headers()? {
        return Ok(headers);
    }
    if let Some(fields) = first {
        if fields.values.is_empty() {
            return Err(Error::config("output record has no fields"));
        }
        return Ok(fields.values.keys().cloned().collect());
    }
    let fields = U::field_names()?;
    if fields.is_empty() {
        return Err(Error::config("output record has no fields"));
    }
    Ok(fields.iter().map(|field| field.to_string()).collect())
}
