//! Dense row-major `f64` matrix.
//!
//! [`DenseMatrix`] backs dense assays (features × cells) and reduced
//! dimension embeddings (cells × components). It carries no names; row and
//! column identifiers live in the annotation tables of the owning experiment.

use cyanea_core::{CyaneaError, Dimensioned, Result, Summarizable};

/// A dense, row-major matrix.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DenseMatrix {
    data: Vec<f64>,
    n_rows: usize,
    n_cols: usize,
}

impl DenseMatrix {
    /// Create a matrix from row-major 2D data.
    ///
    /// Every inner `Vec` is one row; all rows must have the same length.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, |r| r.len());

        let mut flat = Vec::with_capacity(n_rows * n_cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_cols {
                return Err(CyaneaError::DimensionMismatch(format!(
                    "row {i} has {} columns, expected {n_cols}",
                    row.len()
                )));
            }
            flat.extend_from_slice(row);
        }

        Ok(Self {
            data: flat,
            n_rows,
            n_cols,
        })
    }

    /// Create a matrix from a flat row-major buffer.
    pub fn from_shape_vec(n_rows: usize, n_cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != n_rows * n_cols {
            return Err(CyaneaError::DimensionMismatch(format!(
                "buffer of length {} cannot hold a {n_rows} x {n_cols} matrix",
                data.len()
            )));
        }
        Ok(Self {
            data,
            n_rows,
            n_cols,
        })
    }

    /// Caller guarantees `data.len() == n_rows * n_cols`.
    pub(crate) fn from_raw(n_rows: usize, n_cols: usize, data: Vec<f64>) -> Self {
        debug_assert_eq!(data.len(), n_rows * n_cols);
        Self {
            data,
            n_rows,
            n_cols,
        }
    }

    /// Create a zero-filled matrix.
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            data: vec![0.0; n_rows * n_cols],
            n_rows,
            n_cols,
        }
    }

    /// Check that the buffer holds exactly `n_rows * n_cols` values.
    ///
    /// Constructors guarantee this; a deserialized matrix may not.
    pub fn validate(&self) -> Result<()> {
        let expected = self.n_rows.checked_mul(self.n_cols);
        if expected != Some(self.data.len()) {
            return Err(CyaneaError::DimensionMismatch(format!(
                "buffer of length {} cannot hold a {} x {} matrix",
                self.data.len(),
                self.n_rows,
                self.n_cols
            )));
        }
        Ok(())
    }

    /// (n_rows, n_cols).
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Get a single value, or `None` if out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.n_rows && col < self.n_cols {
            Some(self.data[row * self.n_cols + col])
        } else {
            None
        }
    }

    /// Set a single value. Returns an error if indices are out of bounds.
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        if row >= self.n_rows || col >= self.n_cols {
            return Err(CyaneaError::InvalidInput(format!(
                "index ({row}, {col}) out of bounds for ({}, {})",
                self.n_rows, self.n_cols
            )));
        }
        self.data[row * self.n_cols + col] = value;
        Ok(())
    }

    /// A slice of one row.
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        if row < self.n_rows {
            let start = row * self.n_cols;
            Some(&self.data[start..start + self.n_cols])
        } else {
            None
        }
    }

    /// All values of one column (copied, since data is row-major).
    pub fn column(&self, col: usize) -> Option<Vec<f64>> {
        if col >= self.n_cols {
            return None;
        }
        Some((0..self.n_rows).map(|r| self.data[r * self.n_cols + col]).collect())
    }

    /// The underlying flat data (row-major).
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Rows as nested vectors.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.n_rows)
            .map(|r| self.data[r * self.n_cols..(r + 1) * self.n_cols].to_vec())
            .collect()
    }

    /// Select rows and columns by position.
    ///
    /// Indices may repeat and appear in any order; the result follows the
    /// order given.
    pub fn select(&self, rows: &[usize], cols: &[usize]) -> Result<DenseMatrix> {
        check_indices("row", rows, self.n_rows)?;
        check_indices("column", cols, self.n_cols)?;

        let mut data = Vec::with_capacity(rows.len() * cols.len());
        for &r in rows {
            let start = r * self.n_cols;
            data.extend(cols.iter().map(|&c| self.data[start + c]));
        }

        Ok(DenseMatrix {
            data,
            n_rows: rows.len(),
            n_cols: cols.len(),
        })
    }

    /// Select rows by position, keeping every column.
    pub fn select_rows(&self, rows: &[usize]) -> Result<DenseMatrix> {
        check_indices("row", rows, self.n_rows)?;

        let mut data = Vec::with_capacity(rows.len() * self.n_cols);
        for &r in rows {
            let start = r * self.n_cols;
            data.extend_from_slice(&self.data[start..start + self.n_cols]);
        }

        Ok(DenseMatrix {
            data,
            n_rows: rows.len(),
            n_cols: self.n_cols,
        })
    }

    /// Select columns by position, keeping every row.
    pub fn select_cols(&self, cols: &[usize]) -> Result<DenseMatrix> {
        let all_rows: Vec<usize> = (0..self.n_rows).collect();
        self.select(&all_rows, cols)
    }
}

impl Dimensioned for DenseMatrix {
    fn dim(&self) -> (usize, usize) {
        self.shape()
    }
}

impl Summarizable for DenseMatrix {
    fn summary(&self) -> String {
        format!("DenseMatrix: {} \u{00d7} {}", self.n_rows, self.n_cols)
    }
}

pub(crate) fn check_indices(axis: &str, indices: &[usize], len: usize) -> Result<()> {
    if let Some(&bad) = indices.iter().find(|&&i| i >= len) {
        return Err(CyaneaError::InvalidInput(format!(
            "{axis} index {bad} out of bounds (length {len})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_matrix() -> DenseMatrix {
        DenseMatrix::new(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap()
    }

    #[test]
    fn construction() {
        let m = sample_matrix();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn validate_catches_short_buffer() {
        assert!(sample_matrix().validate().is_ok());
        let broken = DenseMatrix {
            data: vec![1.0],
            n_rows: 2,
            n_cols: 2,
        };
        assert!(matches!(
            broken.validate(),
            Err(CyaneaError::DimensionMismatch(_))
        ));
        let overflow = DenseMatrix {
            data: Vec::new(),
            n_rows: usize::MAX,
            n_cols: 2,
        };
        assert!(overflow.validate().is_err());
    }

    #[test]
    fn ragged_rows_rejected() {
        let result = DenseMatrix::new(vec![vec![1.0, 2.0], vec![3.0]]);
        assert!(matches!(result, Err(CyaneaError::DimensionMismatch(_))));
    }

    #[test]
    fn from_shape_vec_checks_length() {
        assert!(DenseMatrix::from_shape_vec(2, 2, vec![1.0; 4]).is_ok());
        assert!(matches!(
            DenseMatrix::from_shape_vec(2, 2, vec![1.0; 3]),
            Err(CyaneaError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn empty_matrix() {
        let m = DenseMatrix::new(vec![]).unwrap();
        assert_eq!(m.shape(), (0, 0));
        let z = DenseMatrix::zeros(0, 4);
        assert_eq!(z.shape(), (0, 4));
    }

    #[test]
    fn get_set() {
        let mut m = sample_matrix();
        assert_eq!(m.get(1, 2), Some(6.0));
        assert_eq!(m.get(2, 0), None);
        m.set(0, 0, 9.0).unwrap();
        assert_eq!(m.get(0, 0), Some(9.0));
        assert!(m.set(0, 3, 1.0).is_err());
    }

    #[test]
    fn row_and_column() {
        let m = sample_matrix();
        assert_eq!(m.row(1), Some(&[4.0, 5.0, 6.0][..]));
        assert_eq!(m.column(2), Some(vec![3.0, 6.0]));
        assert_eq!(m.column(3), None);
        assert_eq!(m.to_rows(), vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
    }

    #[test]
    fn select_preserves_order() {
        let m = sample_matrix();
        let s = m.select(&[1, 0], &[2, 0]).unwrap();
        assert_eq!(s.shape(), (2, 2));
        assert_eq!(s.to_rows(), vec![vec![6.0, 4.0], vec![3.0, 1.0]]);
    }

    #[test]
    fn select_repeats_indices() {
        let m = sample_matrix();
        let s = m.select_cols(&[1, 1, 1]).unwrap();
        assert_eq!(s.to_rows(), vec![vec![2.0, 2.0, 2.0], vec![5.0, 5.0, 5.0]]);
        let s = m.select_rows(&[0, 0]).unwrap();
        assert_eq!(s.shape(), (2, 3));
        assert_eq!(s.row(1), Some(&[1.0, 2.0, 3.0][..]));
    }

    #[test]
    fn select_out_of_bounds() {
        let m = sample_matrix();
        assert!(matches!(m.select_rows(&[2]), Err(CyaneaError::InvalidInput(_))));
        assert!(m.select(&[0], &[5]).is_err());
    }

    #[test]
    fn summary() {
        assert_eq!(sample_matrix().summary(), "DenseMatrix: 2 \u{00d7} 3");
    }
}
