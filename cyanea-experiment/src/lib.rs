//! Synchronized multi-table experiment containers for the Cyanea
//! bioinformatics ecosystem.
//!
//! An experiment keeps a set of equally-shaped measurement matrices
//! (features × cells) together with the tables that describe each axis, and
//! guarantees they stay aligned through every mutation and subset:
//!
//! - **Matrices** — [`DenseMatrix`], COO [`SparseMatrix`], unified as [`Assay`]
//! - **Annotations** — [`AnnotationTable`] of typed [`ColumnData`] columns
//! - **Genomic ranges** — [`GenomicInterval`] lists per feature ([`RowRanges`])
//! - **Containers** — [`SummarizedExperiment`] and the single-cell extension
//!   [`SingleCellExperiment`] with reduced dimensions and alternative
//!   experiments
//! - **Subsetting** — [`Selector`] by position, mask or identifier, tuned by
//!   [`SubsetConfig`]
//!
//! # Quick start
//!
//! ```
//! use cyanea_experiment::{ColumnData, DenseMatrix, SingleCellExperiment};
//! use cyanea_core::Summarizable;
//!
//! let counts = DenseMatrix::new(vec![
//!     vec![1.0, 0.0, 3.0],
//!     vec![0.0, 2.0, 5.0],
//! ]).unwrap();
//!
//! let mut sce = SingleCellExperiment::builder()
//!     .assay("counts", counts)
//!     .col_names(["c1", "c2", "c3"])
//!     .build()
//!     .unwrap();
//! sce.set_col_data_column("batch", ColumnData::from(vec![1i64, 1, 2])).unwrap();
//!
//! let batch1 = sce.select_cols(vec![true, true, false]).unwrap();
//! assert_eq!(batch1.dim(), (2, 2));
//! assert_eq!(
//!     batch1.summary(),
//!     "SingleCellExperiment: 2 rows \u{00d7} 2 cols, 1 assays, 0 reducedDims, 0 altExps"
//! );
//! ```

pub mod assay;
pub mod column;
pub mod config;
pub mod matrix;
pub mod ranges;
pub mod selector;
pub mod single_cell;
pub mod sparse;
pub mod summarized;
pub mod table;

mod validate;

pub use assay::Assay;
pub use column::ColumnData;
pub use config::{DuplicatePolicy, SubsetConfig};
pub use matrix::DenseMatrix;
pub use ranges::{GenomicInterval, RowRanges, Strand};
pub use selector::{Axis, Selector};
pub use single_cell::{
    ExperimentId, SingleCellExperiment, SingleCellExperimentBuilder, LABEL_COLUMN,
    SIZE_FACTOR_COLUMN,
};
pub use sparse::SparseMatrix;
pub use summarized::{SummarizedExperiment, SummarizedExperimentBuilder};
pub use table::AnnotationTable;

pub use cyanea_core::{CyaneaError, Result};
