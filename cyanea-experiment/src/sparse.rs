//! Coordinate-format (COO) sparse matrix.
//!
//! [`SparseMatrix`] stores non-zero entries as `(row, col, value)` triplets.
//! Single-cell count matrices are mostly zeros, so this is the natural
//! storage for large `counts` assays.

use std::collections::HashMap;

use cyanea_core::{CyaneaError, Dimensioned, Result, Summarizable};

use crate::matrix::{check_indices, DenseMatrix};

/// A sparse matrix in COO (coordinate) format.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SparseMatrix {
    rows: Vec<usize>,
    cols: Vec<usize>,
    values: Vec<f64>,
    n_rows: usize,
    n_cols: usize,
}

impl SparseMatrix {
    /// Create an empty sparse matrix with the given dimensions.
    pub fn new(n_rows: usize, n_cols: usize) -> Self {
        Self {
            rows: Vec::new(),
            cols: Vec::new(),
            values: Vec::new(),
            n_rows,
            n_cols,
        }
    }

    /// Create a sparse matrix from triplet vectors.
    ///
    /// All three vectors must have the same length, and all indices must be
    /// within bounds.
    pub fn from_triplets(
        rows: Vec<usize>,
        cols: Vec<usize>,
        values: Vec<f64>,
        n_rows: usize,
        n_cols: usize,
    ) -> Result<Self> {
        let m = Self {
            rows,
            cols,
            values,
            n_rows,
            n_cols,
        };
        m.validate()?;
        Ok(m)
    }

    /// Check triplet lengths and index bounds.
    ///
    /// Constructors guarantee both; a deserialized matrix may not.
    pub fn validate(&self) -> Result<()> {
        if self.rows.len() != self.cols.len() || self.cols.len() != self.values.len() {
            return Err(CyaneaError::DimensionMismatch(format!(
                "triplet vectors have lengths {}, {} and {}",
                self.rows.len(),
                self.cols.len(),
                self.values.len()
            )));
        }
        let (n_rows, n_cols) = (self.n_rows, self.n_cols);
        for (i, (&r, &c)) in self.rows.iter().zip(self.cols.iter()).enumerate() {
            if r >= n_rows || c >= n_cols {
                return Err(CyaneaError::InvalidInput(format!(
                    "triplet {i} index ({r}, {c}) out of bounds for ({n_rows}, {n_cols})"
                )));
            }
        }
        Ok(())
    }

    /// Build from dense rows, storing only non-zero values.
    pub fn from_dense(dense: &DenseMatrix) -> Self {
        let (n_rows, n_cols) = dense.shape();
        let mut out = Self::new(n_rows, n_cols);
        for (i, &v) in dense.as_slice().iter().enumerate() {
            if v != 0.0 {
                out.rows.push(i / n_cols);
                out.cols.push(i % n_cols);
                out.values.push(v);
            }
        }
        out
    }

    /// Insert a single entry. Returns an error if indices are out of bounds.
    pub fn insert(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        if row >= self.n_rows || col >= self.n_cols {
            return Err(CyaneaError::InvalidInput(format!(
                "index ({row}, {col}) out of bounds for ({}, {})",
                self.n_rows, self.n_cols
            )));
        }
        self.rows.push(row);
        self.cols.push(col);
        self.values.push(value);
        Ok(())
    }

    /// Get the value at `(row, col)`. Returns 0.0 if no entry is stored.
    ///
    /// When a coordinate was inserted more than once the last value wins.
    /// This is an O(nnz) scan.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        (0..self.values.len())
            .rev()
            .find(|&i| self.rows[i] == row && self.cols[i] == col)
            .map_or(0.0, |i| self.values[i])
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Fraction of entries that are stored: `nnz / (n_rows * n_cols)`.
    pub fn density(&self) -> f64 {
        let total = self.n_rows as f64 * self.n_cols as f64;
        if total == 0.0 {
            return 0.0;
        }
        self.values.len() as f64 / total
    }

    /// (n_rows, n_cols).
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Convert to a dense matrix.
    pub fn to_dense(&self) -> DenseMatrix {
        let mut dense = vec![0.0; self.n_rows * self.n_cols];
        for (r, c, v) in self.iter() {
            dense[r * self.n_cols + c] = v;
        }
        DenseMatrix::from_raw(self.n_rows, self.n_cols, dense)
    }

    /// Select rows and columns by position.
    ///
    /// Repeated indices replicate the stored entries of that row/column.
    /// Triplets keep their relative order so last-write-wins still holds.
    pub fn select(&self, rows: &[usize], cols: &[usize]) -> Result<SparseMatrix> {
        check_indices("row", rows, self.n_rows)?;
        check_indices("column", cols, self.n_cols)?;

        let row_map = positions_by_index(rows);
        let col_map = positions_by_index(cols);

        let mut out = SparseMatrix::new(rows.len(), cols.len());
        for (r, c, v) in self.iter() {
            let (Some(new_rows), Some(new_cols)) = (row_map.get(&r), col_map.get(&c)) else {
                continue;
            };
            for &nr in new_rows {
                for &nc in new_cols {
                    out.rows.push(nr);
                    out.cols.push(nc);
                    out.values.push(v);
                }
            }
        }
        Ok(out)
    }

    /// Iterate over stored triplets `(row, col, value)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.rows
            .iter()
            .zip(self.cols.iter())
            .zip(self.values.iter())
            .map(|((&r, &c), &v)| (r, c, v))
    }
}

/// old index -> every output position that selects it.
fn positions_by_index(indices: &[usize]) -> HashMap<usize, Vec<usize>> {
    let mut map: HashMap<usize, Vec<usize>> = HashMap::with_capacity(indices.len());
    for (new, &old) in indices.iter().enumerate() {
        map.entry(old).or_default().push(new);
    }
    map
}

impl Dimensioned for SparseMatrix {
    fn dim(&self) -> (usize, usize) {
        self.shape()
    }
}

impl Summarizable for SparseMatrix {
    fn summary(&self) -> String {
        format!(
            "SparseMatrix: {}\u{00d7}{}, {} nonzeros ({:.2}% density)",
            self.n_rows,
            self.n_cols,
            self.nnz(),
            self.density() * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diag3() -> SparseMatrix {
        SparseMatrix::from_triplets(vec![0, 1, 2], vec![0, 1, 2], vec![1.0, 2.0, 3.0], 3, 3)
            .unwrap()
    }

    #[test]
    fn new_empty() {
        let m = SparseMatrix::new(10, 20);
        assert_eq!(m.shape(), (10, 20));
        assert_eq!(m.nnz(), 0);
        assert_eq!(m.density(), 0.0);
    }

    #[test]
    fn from_triplets() {
        let m = diag3();
        assert_eq!(m.nnz(), 3);
        assert_eq!(m.get(1, 1), 2.0);
        assert_eq!(m.get(0, 1), 0.0);
    }

    #[test]
    fn validate_catches_broken_triplets() {
        assert!(diag3().validate().is_ok());
        let mut uneven = diag3();
        uneven.values.pop();
        assert!(matches!(
            uneven.validate(),
            Err(CyaneaError::DimensionMismatch(_))
        ));
        let mut outside = diag3();
        outside.cols[2] = 7;
        assert!(matches!(
            outside.validate(),
            Err(CyaneaError::InvalidInput(_))
        ));
    }

    #[test]
    fn from_triplets_checks() {
        assert!(matches!(
            SparseMatrix::from_triplets(vec![5], vec![0], vec![1.0], 3, 3),
            Err(CyaneaError::InvalidInput(_))
        ));
        assert!(matches!(
            SparseMatrix::from_triplets(vec![0, 1], vec![0], vec![1.0], 3, 3),
            Err(CyaneaError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn insert_last_write_wins() {
        let mut m = SparseMatrix::new(2, 2);
        m.insert(0, 1, 5.0).unwrap();
        m.insert(0, 1, 7.0).unwrap();
        assert_eq!(m.get(0, 1), 7.0);
        assert!(m.insert(2, 0, 1.0).is_err());
    }

    #[test]
    fn dense_conversion() {
        let dense = DenseMatrix::new(vec![vec![0.0, 3.0], vec![7.0, 0.0]]).unwrap();
        let sparse = SparseMatrix::from_dense(&dense);
        assert_eq!(sparse.nnz(), 2);
        assert_eq!(sparse.to_dense(), dense);
    }

    #[test]
    fn select_reorders_and_replicates() {
        let m = diag3();
        let s = m.select(&[2, 0, 0], &[0, 2]).unwrap();
        assert_eq!(s.shape(), (3, 2));
        assert_eq!(
            s.to_dense().to_rows(),
            vec![vec![0.0, 3.0], vec![1.0, 0.0], vec![1.0, 0.0]]
        );
    }

    #[test]
    fn select_out_of_bounds() {
        assert!(diag3().select(&[3], &[0]).is_err());
        assert!(diag3().select(&[0], &[3]).is_err());
    }

    #[test]
    fn iter_triplets() {
        let triplets: Vec<_> = diag3().iter().collect();
        assert_eq!(triplets, vec![(0, 0, 1.0), (1, 1, 2.0), (2, 2, 3.0)]);
    }

    #[test]
    fn summary() {
        let m = SparseMatrix::from_triplets(vec![0], vec![0], vec![1.0], 100, 50).unwrap();
        assert_eq!(
            m.summary(),
            "SparseMatrix: 100\u{00d7}50, 1 nonzeros (0.02% density)"
        );
    }
}
