//! Assay matrices, dense or sparse.

use cyanea_core::{Dimensioned, Result};

use crate::matrix::DenseMatrix;
use crate::sparse::SparseMatrix;

/// A primary data matrix (features × cells), dense or sparse.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Assay {
    /// Dense row-major matrix.
    Dense(DenseMatrix),
    /// Sparse COO matrix.
    Sparse(SparseMatrix),
}

impl Assay {
    /// (n_rows, n_cols).
    pub fn shape(&self) -> (usize, usize) {
        match self {
            Assay::Dense(m) => m.shape(),
            Assay::Sparse(s) => s.shape(),
        }
    }

    /// Value at `(row, col)`; `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        match self {
            Assay::Dense(m) => m.get(row, col),
            Assay::Sparse(s) => {
                let (n_rows, n_cols) = s.shape();
                (row < n_rows && col < n_cols).then(|| s.get(row, col))
            }
        }
    }

    /// Check the matrix's own storage.
    pub fn validate(&self) -> Result<()> {
        match self {
            Assay::Dense(m) => m.validate(),
            Assay::Sparse(s) => s.validate(),
        }
    }

    /// Whether the assay is stored sparsely.
    pub fn is_sparse(&self) -> bool {
        matches!(self, Assay::Sparse(_))
    }

    /// Slice both axes, keeping the storage kind.
    pub fn select(&self, rows: &[usize], cols: &[usize]) -> Result<Assay> {
        Ok(match self {
            Assay::Dense(m) => Assay::Dense(m.select(rows, cols)?),
            Assay::Sparse(s) => Assay::Sparse(s.select(rows, cols)?),
        })
    }

    /// Dense copy of the assay.
    pub fn to_dense(&self) -> DenseMatrix {
        match self {
            Assay::Dense(m) => m.clone(),
            Assay::Sparse(s) => s.to_dense(),
        }
    }

    /// Storage label used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Assay::Dense(_) => "dense",
            Assay::Sparse(_) => "sparse",
        }
    }
}

impl Dimensioned for Assay {
    fn dim(&self) -> (usize, usize) {
        self.shape()
    }
}

impl From<DenseMatrix> for Assay {
    fn from(m: DenseMatrix) -> Self {
        Assay::Dense(m)
    }
}

impl From<SparseMatrix> for Assay {
    fn from(s: SparseMatrix) -> Self {
        Assay::Sparse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dense() -> Assay {
        DenseMatrix::new(vec![vec![1.0, 0.0, 2.0], vec![0.0, 3.0, 0.0]])
            .unwrap()
            .into()
    }

    #[test]
    fn shape_and_get() {
        let a = dense();
        assert_eq!(a.shape(), (2, 3));
        assert_eq!(a.get(0, 2), Some(2.0));
        assert_eq!(a.get(2, 0), None);
        assert!(!a.is_sparse());
    }

    #[test]
    fn sparse_get_bounds() {
        let a: Assay = SparseMatrix::new(2, 2).into();
        assert_eq!(a.get(1, 1), Some(0.0));
        assert_eq!(a.get(2, 1), None);
        assert_eq!(a.kind(), "sparse");
    }

    #[test]
    fn dense_and_sparse_select_agree() {
        let d = dense();
        let s: Assay = SparseMatrix::from_dense(&d.to_dense()).into();
        let rows = [1, 0, 1];
        let cols = [2, 1];
        let ds = d.select(&rows, &cols).unwrap();
        let ss = s.select(&rows, &cols).unwrap();
        assert!(ss.is_sparse());
        assert_eq!(ds.to_dense(), ss.to_dense());
    }
}
