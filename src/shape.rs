//! Call shapes for the function under test.
//!
//! A [`Transform`] wraps a function together with the shape of its input and
//! output. The shape is chosen by the constructor, never inspected at run time:
//!
//! | constructor | input | output |
//! |---|---|---|
//! | [`Transform::per_row`] | one record per call | one record |
//! | [`Transform::per_row_many`] | one record per call | `Vec` of records |
//! | [`Transform::whole_table`] | `Vec` of all records, one call | one record |
//! | [`Transform::whole_table_many`] | `Vec` of all records, one call | `Vec` of records |
//!
//! Collection outputs are flattened in order into the result rows.
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_mdtable::Transform;
//!
//! #[derive(Serialize, Deserialize, Clone)]
//! struct Number { n: f64 }
//!
//! let mut double = Transform::per_row(|x: Number| Ok::<_, String>(Number { n: x.n * 2.0 }));
//! let header = vec!["n".to_string()];
//! let body = vec![vec!["1".to_string()], vec!["4".to_string()]];
//! let out = double.apply(&header, &body).unwrap();
//! assert_eq!(out.iter().map(|x| x.n).collect::<Vec<_>>(), vec![2.0, 8.0]);
//! ```

use crate::de::{bind_row, bind_rows};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::fmt;
use tracing::{debug, trace};

/// Whether a transform takes/returns one record or a collection of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Single,
    Collection,
}

type RowFn<'f, T, U> = Box<dyn FnMut(T) -> Result<Vec<U>> + 'f>;
type TableFn<'f, T, U> = Box<dyn FnMut(Vec<T>) -> Result<Vec<U>> + 'f>;

enum Call<'f, T, U> {
    PerRow(RowFn<'f, T, U>),
    WholeTable(TableFn<'f, T, U>),
}

/// A function under test, tagged with its call shape.
///
/// The wrapped function may fail with any `E: Display`; failures surface as
/// [`Error::Transform`].
pub struct Transform<'f, T, U> {
    call: Call<'f, T, U>,
    output: Shape,
}

impl<'f, T: 'f, U: 'f> Transform<'f, T, U> {
    /// Calls `f` once per body row.
    pub fn per_row<F, E>(mut f: F) -> Self
    where
        F: FnMut(T) -> std::result::Result<U, E> + 'f,
        E: fmt::Display + 'f,
    {
        Transform {
            call: Call::PerRow(Box::new(move |input| {
                f(input).map(|output| vec![output]).map_err(Error::transform)
            })),
            output: Shape::Single,
        }
    }

    /// Calls `f` once per body row; each call may yield several records.
    pub fn per_row_many<F, E>(mut f: F) -> Self
    where
        F: FnMut(T) -> std::result::Result<Vec<U>, E> + 'f,
        E: fmt::Display + 'f,
    {
        Transform {
            call: Call::PerRow(Box::new(move |input| f(input).map_err(Error::transform))),
            output: Shape::Collection,
        }
    }

    /// Calls `f` exactly once with every body row.
    pub fn whole_table<F, E>(mut f: F) -> Self
    where
        F: FnMut(Vec<T>) -> std::result::Result<U, E> + 'f,
        E: fmt::Display + 'f,
    {
        Transform {
            call: Call::WholeTable(Box::new(move |input| {
                f(input).map(|output| vec![output]).map_err(Error::transform)
            })),
            output: Shape::Single,
        }
    }

    /// Calls `f` exactly once with every body row; the result may hold
    /// several records.
    pub fn whole_table_many<F, E>(mut f: F) -> Self
    where
        F: FnMut(Vec<T>) -> std::result::Result<Vec<U>, E> + 'f,
        E: fmt::Display + 'f,
    {
        Transform {
            call: Call::WholeTable(Box::new(move |input| f(input).map_err(Error::transform))),
            output: Shape::Collection,
        }
    }

}

impl<'f, T, U> Transform<'f, T, U> {
    #[must_use]
    pub fn input_shape(&self) -> Shape {
        match self.call {
            Call::PerRow(_) => Shape::Single,
            Call::WholeTable(_) => Shape::Collection,
        }
    }

    #[must_use]
    pub fn output_shape(&self) -> Shape {
        self.output
    }

    /// Binds the body rows and invokes the function in its declared shape.
    ///
    /// Per-row transforms are called once per row in row order; whole-table
    /// transforms are called once, even when the body is empty. The first
    /// failure stops processing and no partial results are returned.
    ///
    /// # Errors
    ///
    /// Binding errors from [`crate::de`], or [`Error::Transform`] when the
    /// function fails.
    pub fn apply(&mut self, header: &[String], body: &[Vec<String>]) -> Result<Vec<U>>
    where
        T: DeserializeOwned,
    {
        let input = self.input_shape();
        let output = self.output;
        debug!(rows = body.len(), ?input, ?output, "applying transform");

        let results = match &mut self.call {
            Call::WholeTable(f) => {
                let records = bind_rows::<T>(header, body)?;
                f(records)?
            }
            Call::PerRow(f) => {
                let mut results = Vec::with_capacity(body.len());
                for (idx, row) in body.iter().enumerate() {
                    let record = bind_row::<T>(header, row)?;
                    let produced = f(record).map_err(|err| {
                        debug!(row = idx, error = %err, "transform failed");
                        err
                    })?;
                    trace!(row = idx, produced = produced.len(), "row transformed");
                    results.extend(produced);
                }
                results
            }
        };

        debug!(results = results.len(), "transform finished");
        Ok(results)
    }
}

impl<'f, T, U> fmt::Debug for Transform<'f, T, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transform")
            .field("input", &self.input_shape())
            .field("output", &self.output)
            .finish()
    }
}
