//! Dense 2-D matrix primitives.
//!
//! Every operation works on the row-major [`Matrix`] type. Flat vectors and bare
//! scalars are normalised ("matrified") through the `From` conversions: a scalar
//! becomes a 1×1 matrix and a `Vec<f64>` becomes a single row. Products that
//! collapse to 1×1 can be turned back into a plain number with [`Matrix::flatten`],
//! which is how a unit's dot product of inputs and weights ends up as its
//! weighted sum.

use crate::error::NeuroGraphError;
use crate::unit::{Input, UnitId};

/// A dense, row-major matrix of `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

/// The result of [`Matrix::flatten`]: the smallest shape that holds the data.
#[derive(Debug, Clone, PartialEq)]
pub enum Flat {
    Scalar(f64),
    Row(Vec<f64>),
    Matrix(Matrix),
}

impl Flat {
    /// Returns the value if the flattened result is a scalar.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Flat::Scalar(v) => Some(*v),
            _ => None,
        }
    }
}

impl Matrix {
    /// Builds a matrix from nested rows. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, NeuroGraphError> {
        let cols = rows.first().map_or(0, Vec::len);
        let row_count = rows.len();
        let mut data = Vec::with_capacity(row_count * cols);
        for row in rows {
            if row.len() != cols {
                return Err(NeuroGraphError::DimensionMismatch {
                    expected: cols,
                    actual: row.len(),
                    operation: "Matrix::from_rows".to_string(),
                });
            }
            data.extend(row);
        }
        Ok(Matrix { rows: row_count, cols, data })
    }

    /// `[rows, cols]`.
    pub fn size(&self) -> [usize; 2] {
        [self.rows, self.cols]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Collapses 1×1 to a scalar and a single row to a vector.
    pub fn flatten(self) -> Flat {
        match (self.rows, self.cols) {
            (1, 1) => Flat::Scalar(self.data[0]),
            (1, _) => Flat::Row(self.data),
            _ => Flat::Matrix(self),
        }
    }
}

impl From<f64> for Matrix {
    fn from(value: f64) -> Self {
        Matrix { rows: 1, cols: 1, data: vec![value] }
    }
}

impl From<Vec<f64>> for Matrix {
    fn from(row: Vec<f64>) -> Self {
        Matrix { rows: 1, cols: row.len(), data: row }
    }
}

impl From<&[f64]> for Matrix {
    fn from(row: &[f64]) -> Self {
        Matrix::from(row.to_vec())
    }
}

/// Standard matrix product `a × b`.
///
/// # Errors
/// Returns `IncompatibleShapes` if `a`'s column count differs from `b`'s row count.
pub fn mult(a: &Matrix, b: &Matrix) -> Result<Matrix, NeuroGraphError> {
    if a.cols != b.rows {
        return Err(NeuroGraphError::IncompatibleShapes {
            shape1: a.size(),
            shape2: b.size(),
        });
    }
    let mut out = vec![0.0; a.rows * b.cols];
    for i in 0..a.rows {
        for k in 0..a.cols {
            let lhs = a.data[i * a.cols + k];
            for j in 0..b.cols {
                out[i * b.cols + j] += lhs * b.data[k * b.cols + j];
            }
        }
    }
    Ok(Matrix { rows: a.rows, cols: b.cols, data: out })
}

fn elementwise(
    a: &Matrix,
    b: &Matrix,
    operation: &str,
    f: impl Fn(f64, f64) -> f64,
) -> Result<Matrix, NeuroGraphError> {
    if a.size() != b.size() {
        return Err(NeuroGraphError::ShapeMismatch {
            expected: format!("{:?}", a.size()),
            actual: format!("{:?}", b.size()),
            operation: operation.to_string(),
        });
    }
    let data = a.data.iter().zip(&b.data).map(|(x, y)| f(*x, *y)).collect();
    Ok(Matrix { rows: a.rows, cols: a.cols, data })
}

/// Elementwise `a + b`.
pub fn add(a: &Matrix, b: &Matrix) -> Result<Matrix, NeuroGraphError> {
    elementwise(a, b, "add", |x, y| x + y)
}

/// Elementwise `a - b`.
pub fn subtract(a: &Matrix, b: &Matrix) -> Result<Matrix, NeuroGraphError> {
    elementwise(a, b, "subtract", |x, y| x - y)
}

/// Multiplies every element by `s`.
pub fn scalar(m: &Matrix, s: f64) -> Matrix {
    Matrix {
        rows: m.rows,
        cols: m.cols,
        data: m.data.iter().map(|v| v * s).collect(),
    }
}

/// Swaps rows and columns.
pub fn transpose(m: &Matrix) -> Matrix {
    let mut data = Vec::with_capacity(m.data.len());
    for c in 0..m.cols {
        for r in 0..m.rows {
            data.push(m.data[r * m.cols + c]);
        }
    }
    Matrix { rows: m.cols, cols: m.rows, data }
}

/// A zero-filled row of width `w`, or an `h`×`w` matrix when `h` is given.
pub fn zeros(w: usize, h: Option<usize>) -> Matrix {
    let rows = h.unwrap_or(1);
    Matrix { rows, cols: w, data: vec![0.0; rows * w] }
}

/// Resolves every input to a plain number and returns them as a single row.
///
/// Constants are taken as-is, callbacks are called, and unit references are
/// handed to `resolve` (the arena computes the upstream activation).
pub fn invoke<F>(inputs: &[Input], mut resolve: F) -> Result<Matrix, NeuroGraphError>
where
    F: FnMut(UnitId) -> Result<f64, NeuroGraphError>,
{
    let mut row = Vec::with_capacity(inputs.len());
    for input in inputs {
        let value = match input {
            Input::Constant(v) => *v,
            Input::Callback(f) => f(),
            Input::Unit(id) => resolve(*id)?,
        };
        row.push(value);
    }
    Ok(Matrix::from(row))
}

#[cfg(test)]
#[path = "matrix_test.rs"]
mod tests;
