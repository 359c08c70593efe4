//! Markdown pipe-table codec.
//!
//! This module converts between table text and a rectangular grid of string
//! cells. It knows nothing about records; binding cells to fields happens in
//! [`crate::de`] and [`crate::ser`].
//!
//! ## Format
//!
//! ```text
//! | Operand | Number |
//! |---------|--------|
//! | +       | 10     |
//! | a \| b  | 5      |
//! ```
//!
//! - The first line is a header when the second line consists solely of `|`
//!   and `-` characters. Without that separator the table is headerless.
//! - Every row starts and ends with `|`. Cells are split on unescaped `|`,
//!   `\|` is a literal pipe inside a cell, and cells are trimmed.
//! - Every row has as many cells as the header (or the first row of a
//!   headerless table).
//!
//! Rendering pads every cell to the widest cell of its column, surrounds it
//! with one space on each side and inserts a `-` separator under the header.
//! Cells containing `|` are written back as `\|`, so a parsed table renders to
//! text that parses to the same grid.
//!
//! ## Examples
//!
//! ```rust
//! use serde_mdtable::Table;
//!
//! let table = Table::parse("| Number |\n|-|\n| 5 |\n| 12 |").unwrap();
//! assert_eq!(table.header(), Some(&["Number".to_string()][..]));
//! assert_eq!(table.rows().len(), 2);
//!
//! assert_eq!(
//!     table.to_markdown(),
//!     "| Number |\n|--------|\n| 5      |\n| 12     |\n"
//! );
//! ```

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A parsed table: an optional header row followed by body rows.
///
/// All rows share the same cell count.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    header: Option<Vec<String>>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates an empty table with the given header.
    #[must_use]
    pub fn new(header: Vec<String>) -> Self {
        Table {
            header: Some(header),
            rows: Vec::new(),
        }
    }

    /// Creates an empty table without a header row.
    #[must_use]
    pub fn headerless() -> Self {
        Table::default()
    }

    /// Parses table text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] when the text is empty, a row is not enclosed
    /// in `|`, or rows have differing cell counts.
    pub fn parse(text: &str) -> Result<Table> {
        let trimmed = text.trim();
        let leading = &text[..text.len() - text.trim_start().len()];
        let line_offset = leading.matches('\n').count();

        let lines: Vec<&str> = trimmed.lines().map(str::trim).collect();
        if lines.is_empty() {
            return Err(Error::format(line_offset + 1, "table is empty"));
        }

        let has_header = lines.len() >= 2 && is_separator_line(lines[1]);

        let mut table = Table::headerless();
        let mut body_start = 0;
        if has_header {
            table.header = Some(split_row(lines[0], line_offset + 1)?);
            body_start = 2;
        }

        for (idx, line) in lines.iter().enumerate().skip(body_start) {
            let line_no = line_offset + idx + 1;
            let row = split_row(line, line_no)?;
            if let Some(expected) = table.width() {
                if row.len() != expected {
                    return Err(Error::format(
                        line_no,
                        &format!("row has {} cells, expected {}", row.len(), expected),
                    ));
                }
            }
            table.rows.push(row);
        }

        Ok(table)
    }

    #[must_use]
    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of columns, or `None` for a headerless table without rows.
    #[must_use]
    pub fn width(&self) -> Option<usize> {
        self.header
            .as_ref()
            .or_else(|| self.rows.first())
            .map(Vec::len)
    }

    /// Returns `true` if the table has no body rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a body row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if the row's cell count differs from the
    /// table's width. The reported line is where the row would be rendered.
    pub fn push_row(&mut self, row: Vec<String>) -> Result<()> {
        if let Some(expected) = self.width() {
            if row.len() != expected {
                let header_lines = if self.header.is_some() { 2 } else { 0 };
                return Err(Error::format(
                    header_lines + self.rows.len() + 1,
                    &format!("row has {} cells, expected {}", row.len(), expected),
                ));
            }
        }
        self.rows.push(row);
        Ok(())
    }

    /// Replaces the header labels, leaving the body untouched.
    pub(crate) fn relabel<F>(&mut self, mut f: F)
    where
        F: FnMut(&str) -> Option<String>,
    {
        if let Some(header) = self.header.as_mut() {
            for label in header.iter_mut() {
                if let Some(renamed) = f(label) {
                    *label = renamed;
                }
            }
        }
    }

    /// Splits the table into its header and body rows.
    #[must_use]
    pub fn into_parts(self) -> (Option<Vec<String>>, Vec<Vec<String>>) {
        (self.header, self.rows)
    }

    /// Renders the table as aligned markdown. Every line ends with `\n`.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let escape_row = |row: &Vec<String>| -> Vec<String> {
            row.iter().map(|cell| escape_cell(cell)).collect()
        };
        let header = self.header.as_ref().map(escape_row);
        let rows: Vec<Vec<String>> = self.rows.iter().map(escape_row).collect();

        let width = header
            .as_ref()
            .or_else(|| rows.first())
            .map_or(0, Vec::len);
        let mut widths = vec![0usize; width];
        for row in header.iter().chain(rows.iter()) {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }

        // Rough guess: every cell plus its padding and pipe
        let line_len = widths.iter().map(|w| w + 3).sum::<usize>() + 2;
        let mut output = String::with_capacity(line_len * (rows.len() + 2));

        if let Some(header) = &header {
            write_row(&mut output, header, &widths);
            for w in &widths {
                output.push('|');
                output.push_str(&"-".repeat(w + 2));
            }
            output.push_str("|\n");
        }
        for row in &rows {
            write_row(&mut output, row, &widths);
        }

        output
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_markdown())
    }
}

impl FromStr for Table {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Table::parse(s)
    }
}

fn write_row(output: &mut String, cells: &[String], widths: &[usize]) {
    for (cell, width) in cells.iter().zip(widths) {
        output.push_str("| ");
        output.push_str(&format!("{:<1$}", cell, *width));
        output.push(' ');
    }
    output.push_str("|\n");
}

/// Returns `true` for a header separator line such as `|------|---|`.
#[must_use]
pub fn is_separator_line(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && line.chars().all(|c| c == '|' || c == '-')
}

/// Splits one table line into unescaped, trimmed cells.
///
/// `line_no` is only used for error reporting.
///
/// # Examples
///
/// ```rust
/// use serde_mdtable::table::split_row;
///
/// let cells = split_row(r"| a \| b | c |", 1).unwrap();
/// assert_eq!(cells, vec!["a | b", "c"]);
/// ```
///
/// # Errors
///
/// Returns [`Error::Format`] if the line is blank, does not start and end
/// with an unescaped `|`, or has no cells.
pub fn split_row(line: &str, line_no: usize) -> Result<Vec<String>> {
    let line = line.trim();
    if line.is_empty() {
        return Err(Error::format(line_no, "empty row"));
    }
    if !line.starts_with('|') {
        return Err(Error::format(line_no, "row must start with `|`"));
    }

    let mut fragments = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&'|') => {
                // Keep the escape; unescape_cell resolves it per cell
                current.push('\\');
                current.push('|');
                chars.next();
            }
            '|' => fragments.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }

    if !current.is_empty() {
        return Err(Error::format(line_no, "row must end with `|`"));
    }

    // fragments[0] is the text before the leading pipe (always empty here)
    let cells: Vec<String> = fragments
        .iter()
        .skip(1)
        .map(|fragment| unescape_cell(fragment).trim().to_string())
        .collect();

    if cells.is_empty() {
        return Err(Error::format(line_no, "row has no cells"));
    }

    Ok(cells)
}

/// Escapes literal pipes as `\|`.
#[must_use]
pub fn escape_cell(cell: &str) -> String {
    cell.replace('|', r"\|")
}

/// Turns every `\|` into `|`. Other backslashes are kept as written.
#[must_use]
pub fn unescape_cell(cell: &str) -> String {
    cell.replace(r"\|", "|")
}
