//! Numeric matrix storage and the per-column alignment adapter.
//!
//! `Matrix` is the stripped numeric payload produced by the parser: row-major,
//! `rows × cols`, at least one cell, every value finite. `AlignedMatrix` is the
//! same data with each column's row order reversed, which is what a
//! bottom-origin colour-grid primitive needs to show file row 0 at the top.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from constructing a matrix out of raw values.
#[derive(Debug, Error, PartialEq)]
pub enum ShapeError {
    #[error("matrix must have at least one row and one column")]
    Empty,

    #[error("row {row} has {found} values, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("expected {expected} values for a {rows}x{cols} matrix, got {found}")]
    LengthMismatch {
        rows: usize,
        cols: usize,
        expected: usize,
        found: usize,
    },
}

/// A dense, row-major matrix of `f64` values.
///
/// Deserialization goes through [`Matrix::new`], so a stored matrix with a
/// wrong value count is rejected instead of panicking on access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix")]
pub struct Matrix {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

#[derive(Deserialize)]
struct RawMatrix {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl TryFrom<RawMatrix> for Matrix {
    type Error = ShapeError;

    fn try_from(raw: RawMatrix) -> Result<Self, Self::Error> {
        Matrix::new(raw.rows, raw.cols, raw.values)
    }
}

impl Matrix {
    /// Build a matrix from row-major values.
    pub fn new(rows: usize, cols: usize, values: Vec<f64>) -> Result<Self, ShapeError> {
        if rows == 0 || cols == 0 {
            return Err(ShapeError::Empty);
        }
        let expected = rows * cols;
        if values.len() != expected {
            return Err(ShapeError::LengthMismatch {
                rows,
                cols,
                expected,
                found: values.len(),
            });
        }
        Ok(Self { rows, cols, values })
    }

    /// Build a matrix from nested rows. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, ShapeError> {
        let expected = rows.first().map(Vec::len).unwrap_or(0);
        let n = rows.len();
        let mut values = Vec::with_capacity(n * expected);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != expected {
                return Err(ShapeError::Ragged {
                    row: i,
                    expected,
                    found: row.len(),
                });
            }
            values.extend(row);
        }
        Self::new(n, expected, values)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Value at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.values[row * self.cols + col])
        } else {
            None
        }
    }

    /// One row as a slice.
    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.cols;
        &self.values[start..start + self.cols]
    }

    /// Iterate the values of one column from top to bottom.
    pub fn column(&self, col: usize) -> impl Iterator<Item = f64> + '_ {
        (0..self.rows).map(move |r| self.values[r * self.cols + col])
    }

    /// Row-major view of every value.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Nested-row copy of the matrix.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.values.chunks(self.cols).map(<[f64]>::to_vec).collect()
    }

    /// Smallest value.
    pub fn min(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Largest value.
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// A matrix whose columns have been reversed top-to-bottom.
///
/// Row 0 of an `AlignedMatrix` is the bottom row of the plot. Produced only by
/// [`align`], so holding one proves the flip has been applied exactly once.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AlignedMatrix(Matrix);

impl AlignedMatrix {
    pub fn as_matrix(&self) -> &Matrix {
        &self.0
    }

    pub fn into_inner(self) -> Matrix {
        self.0
    }

    pub fn rows(&self) -> usize {
        self.0.rows
    }

    pub fn cols(&self) -> usize {
        self.0.cols
    }

    pub fn min(&self) -> f64 {
        self.0.min()
    }

    pub fn max(&self) -> f64 {
        self.0.max()
    }
}

/// Reverse the row order of every column independently.
///
/// Adapter for bottom-origin colour-grid primitives; a top-origin renderer can
/// consume the parsed `Matrix` directly and skip this step.
pub fn align(matrix: &Matrix) -> AlignedMatrix {
    let (rows, cols) = matrix.shape();
    let mut values = vec![0.0; rows * cols];
    for c in 0..cols {
        for (r, v) in matrix.column(c).enumerate() {
            values[(rows - 1 - r) * cols + c] = v;
        }
    }
    AlignedMatrix(Matrix { rows, cols, values })
}
