//! SingleCellExperiment-style container.
//!
//! [`SingleCellExperiment`] extends a [`SummarizedExperiment`] (features ×
//! cells) by composition with the slots single-cell workflows fill in:
//!
//! - `reducedDims` — per-cell embeddings (PCA, t-SNE, UMAP), one row per cell
//! - `altExps` — nested experiments over the same cells but a different
//!   feature set (spike-ins, antibody tags, CRISPR guides)
//! - size factors and column labels, stored as the reserved `colData`
//!   columns [`SIZE_FACTOR_COLUMN`] and [`LABEL_COLUMN`]
//!
//! Subsetting columns subsets every reduced dimension and every alternative
//! experiment with the same positions, so the cells stay in lockstep.
//!
//! # Example
//!
//! ```
//! use cyanea_experiment::{DenseMatrix, Selector, SingleCellExperiment};
//!
//! let mut sce = SingleCellExperiment::builder()
//!     .assay("counts", DenseMatrix::zeros(10, 3))
//!     .build()
//!     .unwrap();
//! let spike = SingleCellExperiment::builder()
//!     .assay("counts", DenseMatrix::zeros(5, 3))
//!     .build()
//!     .unwrap();
//! sce.set_alt_exp("spike", spike).unwrap();
//!
//! let sub = sce.select_cols(Selector::Positions(vec![0, 1])).unwrap();
//! assert_eq!(sub.alt_exp("spike").unwrap().n_cols(), 2);
//! ```
//!
//! Values are plain owned data. Mutators take `&mut self`, so concurrent
//! writers need their own synchronization.

use std::collections::HashSet;
use std::fmt;
use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use serde_json::Value;

use cyanea_core::{CyaneaError, Dimensioned, Result, Summarizable};

use crate::assay::Assay;
use crate::column::ColumnData;
use crate::config::SubsetConfig;
use crate::matrix::DenseMatrix;
use crate::ranges::RowRanges;
use crate::selector::Selector;
use crate::summarized::{write_names, SummarizedExperiment, SummarizedExperimentBuilder};
use crate::table::AnnotationTable;
use crate::validate::{
    check_column_alignment, check_len, check_new_name, check_reduced_dim, check_reserved_columns,
    check_size_factors,
};

/// `colData` column holding per-cell size factors.
pub const SIZE_FACTOR_COLUMN: &str = "sizeFactor";

/// `colData` column holding per-cell labels (cluster ids, cell types).
pub const LABEL_COLUMN: &str = "label";

static NEXT_EXPERIMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of an experiment value, used to refuse nesting an experiment
/// inside itself.
///
/// Construction, subsetting and swapping allocate a fresh id; `clone()`
/// keeps it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExperimentId(u64);

impl ExperimentId {
    fn fresh() -> Self {
        ExperimentId(NEXT_EXPERIMENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Single-cell experiment: a [`SummarizedExperiment`] plus reduced
/// dimensions, alternative experiments and per-cell convenience columns.
///
/// Read accessors of the wrapped experiment are available through `Deref`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SingleCellExperiment {
    base: SummarizedExperiment,
    reduced_dims: IndexMap<String, DenseMatrix>,
    alt_exps: IndexMap<String, SingleCellExperiment>,
    main_exp_name: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip, default = "ExperimentId::fresh"))]
    id: ExperimentId,
}

/// Equality over contents; the identity is not compared.
impl PartialEq for SingleCellExperiment {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base
            && self.reduced_dims == other.reduced_dims
            && self.alt_exps == other.alt_exps
            && self.main_exp_name == other.main_exp_name
    }
}

/// Builder for [`SingleCellExperiment`]; wraps the summarized builder.
#[derive(Debug, Default)]
pub struct SingleCellExperimentBuilder {
    base: SummarizedExperimentBuilder,
    reduced_dims: Vec<(String, DenseMatrix)>,
    alt_exps: Vec<(String, SingleCellExperiment)>,
    main_exp_name: Option<String>,
}

impl SingleCellExperimentBuilder {
    /// Add a named assay.
    pub fn assay(mut self, name: impl Into<String>, assay: impl Into<Assay>) -> Self {
        self.base = self.base.assay(name, assay);
        self
    }

    /// Per-feature annotations.
    pub fn row_data(mut self, table: AnnotationTable) -> Self {
        self.base = self.base.row_data(table);
        self
    }

    /// Per-cell annotations.
    pub fn col_data(mut self, table: AnnotationTable) -> Self {
        self.base = self.base.col_data(table);
        self
    }

    /// Feature identifiers.
    pub fn row_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base = self.base.row_names(names);
        self
    }

    /// Cell identifiers.
    pub fn col_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base = self.base.col_names(names);
        self
    }

    /// Genomic ranges per feature.
    pub fn row_ranges(mut self, ranges: RowRanges) -> Self {
        self.base = self.base.row_ranges(ranges);
        self
    }

    /// One free-form metadata entry.
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.base = self.base.metadata(key, value);
        self
    }

    /// A per-cell embedding.
    pub fn reduced_dim(mut self, name: impl Into<String>, matrix: DenseMatrix) -> Self {
        self.reduced_dims.push((name.into(), matrix));
        self
    }

    /// A nested experiment over the same cells.
    pub fn alt_exp(mut self, name: impl Into<String>, exp: impl Into<SingleCellExperiment>) -> Self {
        self.alt_exps.push((name.into(), exp.into()));
        self
    }

    /// Name of the main experiment (e.g. "gene").
    pub fn main_exp_name(mut self, name: impl Into<String>) -> Self {
        self.main_exp_name = Some(name.into());
        self
    }

    /// Validate everything and assemble the experiment.
    ///
    /// Errors are those of [`SummarizedExperimentBuilder::build`] plus
    /// `DuplicateName` for repeated reduced-dimension or alt-experiment
    /// names, `InvalidInput` for a non-numeric [`SIZE_FACTOR_COLUMN`], and
    /// the checks of [`SingleCellExperiment::set_reduced_dim`] and
    /// [`SingleCellExperiment::set_alt_exp`].
    pub fn build(self) -> Result<SingleCellExperiment> {
        let base = self.base.build()?;
        check_reserved_columns(base.col_data())?;
        let mut sce = SingleCellExperiment::new(base);
        sce.main_exp_name = self.main_exp_name;

        let mut seen = HashSet::with_capacity(self.reduced_dims.len());
        for (name, _) in &self.reduced_dims {
            check_new_name("reduced dimension", &mut seen, name)?;
        }
        let mut seen = HashSet::with_capacity(self.alt_exps.len());
        for (name, _) in &self.alt_exps {
            check_new_name("alternative experiment", &mut seen, name)?;
        }

        for (name, matrix) in self.reduced_dims {
            sce.set_reduced_dim(name, matrix)?;
        }
        for (name, exp) in self.alt_exps {
            sce.set_alt_exp(name, exp)?;
        }
        Ok(sce)
    }
}

impl SingleCellExperiment {
    /// Wrap a summarized experiment with empty single-cell slots.
    ///
    /// The `colData` is taken as is; [`validate`](Self::validate) reports a
    /// non-numeric [`SIZE_FACTOR_COLUMN`] it may carry.
    pub fn new(base: SummarizedExperiment) -> Self {
        Self {
            base,
            reduced_dims: IndexMap::new(),
            alt_exps: IndexMap::new(),
            main_exp_name: None,
            id: ExperimentId::fresh(),
        }
    }

    /// Start a builder.
    pub fn builder() -> SingleCellExperimentBuilder {
        SingleCellExperimentBuilder::default()
    }

    /// This value's identity.
    pub fn id(&self) -> ExperimentId {
        self.id
    }

    /// The wrapped general container.
    pub fn summarized(&self) -> &SummarizedExperiment {
        &self.base
    }

    /// Drop the single-cell slots.
    pub fn into_summarized(self) -> SummarizedExperiment {
        self.base
    }

    // --- forwarded mutators ------------------------------------------------

    /// See [`SummarizedExperiment::set_assay`].
    pub fn set_assay(&mut self, name: impl Into<String>, assay: impl Into<Assay>) -> Result<()> {
        self.base.set_assay(name, assay)
    }

    /// See [`SummarizedExperiment::remove_assay`].
    pub fn remove_assay(&mut self, name: &str) -> Result<Assay> {
        self.base.remove_assay(name)
    }

    /// See [`SummarizedExperiment::set_assays`].
    pub fn set_assays(&mut self, assays: IndexMap<String, Assay>) -> Result<()> {
        self.base.set_assays(assays)
    }

    /// The `counts` assay.
    pub fn counts(&self) -> Result<&Assay> {
        self.base.assay("counts")
    }

    /// Set the `counts` assay.
    pub fn set_counts(&mut self, assay: impl Into<Assay>) -> Result<()> {
        self.base.set_assay("counts", assay)
    }

    /// The `logcounts` assay.
    pub fn logcounts(&self) -> Result<&Assay> {
        self.base.assay("logcounts")
    }

    /// Set the `logcounts` assay.
    pub fn set_logcounts(&mut self, assay: impl Into<Assay>) -> Result<()> {
        self.base.set_assay("logcounts", assay)
    }

    /// See [`SummarizedExperiment::set_row_data`].
    pub fn set_row_data(&mut self, table: AnnotationTable) -> Result<()> {
        self.base.set_row_data(table)
    }

    /// See [`SummarizedExperiment::set_row_data_column`].
    pub fn set_row_data_column(&mut self, name: impl Into<String>, data: ColumnData) -> Result<()> {
        self.base.set_row_data_column(name, data)
    }

    /// See [`SummarizedExperiment::remove_row_data_column`].
    pub fn remove_row_data_column(&mut self, name: &str) -> Option<ColumnData> {
        self.base.remove_row_data_column(name)
    }

    /// See [`SummarizedExperiment::set_row_names`].
    pub fn set_row_names(&mut self, names: Option<Vec<String>>) -> Result<()> {
        self.base.set_row_names(names)
    }

    /// See [`SummarizedExperiment::set_row_ranges`].
    pub fn set_row_ranges(&mut self, ranges: Option<RowRanges>) -> Result<()> {
        self.base.set_row_ranges(ranges)
    }

    /// Replace the per-cell table. Its record names, or their absence, are
    /// copied to every alternative experiment.
    ///
    /// # Errors
    ///
    /// Those of [`SummarizedExperiment::set_col_data`], or `InvalidInput`
    /// when the table has a non-numeric [`SIZE_FACTOR_COLUMN`].
    pub fn set_col_data(&mut self, table: AnnotationTable) -> Result<()> {
        check_reserved_columns(&table)?;
        let names = table.names().map(<[String]>::to_vec);
        self.base.set_col_data(table)?;
        self.propagate_col_names(names);
        Ok(())
    }

    /// See [`SummarizedExperiment::set_col_data_column`]. Writing
    /// [`SIZE_FACTOR_COLUMN`] requires numeric data (`InvalidInput`).
    pub fn set_col_data_column(&mut self, name: impl Into<String>, data: ColumnData) -> Result<()> {
        let name = name.into();
        if name == SIZE_FACTOR_COLUMN {
            check_size_factors(&data)?;
        }
        self.base.set_col_data_column(name, data)
    }

    /// See [`SummarizedExperiment::remove_col_data_column`].
    pub fn remove_col_data_column(&mut self, name: &str) -> Option<ColumnData> {
        self.base.remove_col_data_column(name)
    }

    /// Set or clear cell identifiers here and in every alternative experiment.
    pub fn set_col_names(&mut self, names: Option<Vec<String>>) -> Result<()> {
        self.base.set_col_names(names.clone())?;
        self.propagate_col_names(names);
        Ok(())
    }

    fn propagate_col_names(&mut self, names: Option<Vec<String>>) {
        for alt in self.alt_exps.values_mut() {
            alt.base.replace_col_names(names.clone());
            alt.propagate_col_names(names.clone());
        }
    }

    /// See [`SummarizedExperiment::set_metadata_value`].
    pub fn set_metadata_value(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.base.set_metadata_value(key, value)
    }

    /// See [`SummarizedExperiment::remove_metadata_value`].
    pub fn remove_metadata_value(&mut self, key: &str) -> Option<Value> {
        self.base.remove_metadata_value(key)
    }

    /// See [`SummarizedExperiment::set_metadata`].
    pub fn set_metadata(&mut self, metadata: IndexMap<String, Value>) {
        self.base.set_metadata(metadata)
    }

    // --- reduced dimensions ------------------------------------------------

    /// A named embedding.
    pub fn reduced_dim(&self, name: &str) -> Result<&DenseMatrix> {
        self.reduced_dims
            .get(name)
            .ok_or_else(|| CyaneaError::NotFound(format!("reduced dimension '{name}'")))
    }

    /// All embeddings in insertion order.
    pub fn reduced_dims(&self) -> &IndexMap<String, DenseMatrix> {
        &self.reduced_dims
    }

    /// Embedding names in insertion order.
    pub fn reduced_dim_names(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.reduced_dims.keys().map(String::as_str)
    }

    /// Add or overwrite an embedding. It must have one row per cell; the
    /// number of components is free.
    pub fn set_reduced_dim(&mut self, name: impl Into<String>, matrix: DenseMatrix) -> Result<()> {
        let name = name.into();
        check_reduced_dim(&name, &matrix, self.n_cols())?;
        tracing::debug!(reduced_dim = %name, components = matrix.shape().1, "set reduced dimension");
        self.reduced_dims.insert(name, matrix);
        Ok(())
    }

    /// Remove an embedding.
    pub fn remove_reduced_dim(&mut self, name: &str) -> Result<DenseMatrix> {
        self.reduced_dims
            .shift_remove(name)
            .ok_or_else(|| CyaneaError::NotFound(format!("reduced dimension '{name}'")))
    }

    /// Replace every embedding at once.
    pub fn set_reduced_dims(&mut self, dims: IndexMap<String, DenseMatrix>) -> Result<()> {
        let n_cols = self.n_cols();
        for (name, matrix) in &dims {
            check_reduced_dim(name, matrix, n_cols)?;
        }
        self.reduced_dims = dims;
        Ok(())
    }

    // --- alternative experiments -------------------------------------------

    /// A named alternative experiment.
    pub fn alt_exp(&self, name: &str) -> Result<&SingleCellExperiment> {
        self.alt_exps
            .get(name)
            .ok_or_else(|| CyaneaError::NotFound(format!("alternative experiment '{name}'")))
    }

    /// All alternative experiments in insertion order.
    pub fn alt_exps(&self) -> &IndexMap<String, SingleCellExperiment> {
        &self.alt_exps
    }

    /// Alternative experiment names in insertion order.
    pub fn alt_exp_names(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.alt_exps.keys().map(String::as_str)
    }

    /// Attach (or overwrite) an alternative experiment. A bare
    /// [`SummarizedExperiment`] is wrapped first.
    ///
    /// It must have the same number of cells. When both sides name their
    /// cells the names must match position by position; when only this
    /// experiment names them, the attached one adopts the names.
    ///
    /// Nesting is checked by identity. A clone shares its original's
    /// [`ExperimentId`], so any value holding a clone of this experiment is
    /// refused even though ownership rules out a real cycle; attach a
    /// subset (which has a fresh id) instead.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch`, `ColumnMisalignment`, `InvalidInput` for a
    /// non-numeric [`SIZE_FACTOR_COLUMN`], or `CyclicReference` when `exp`
    /// contains this experiment or a clone of it.
    pub fn set_alt_exp(
        &mut self,
        name: impl Into<String>,
        exp: impl Into<SingleCellExperiment>,
    ) -> Result<()> {
        let name = name.into();
        let exp = self.prepare_alt_exp(&name, exp.into())?;
        tracing::debug!(
            alt_exp = %name,
            n_rows = exp.n_rows(),
            n_cols = exp.n_cols(),
            "set alternative experiment"
        );
        self.alt_exps.insert(name, exp);
        Ok(())
    }

    /// Remove an alternative experiment.
    pub fn remove_alt_exp(&mut self, name: &str) -> Result<SingleCellExperiment> {
        self.alt_exps
            .shift_remove(name)
            .ok_or_else(|| CyaneaError::NotFound(format!("alternative experiment '{name}'")))
    }

    /// Replace every alternative experiment at once. Nothing changes if any
    /// one fails the checks of [`set_alt_exp`](Self::set_alt_exp).
    pub fn set_alt_exps(&mut self, exps: IndexMap<String, SingleCellExperiment>) -> Result<()> {
        let prepared = exps
            .into_iter()
            .map(|(name, exp)| {
                let exp = self.prepare_alt_exp(&name, exp)?;
                Ok((name, exp))
            })
            .collect::<Result<IndexMap<_, _>>>()?;
        self.alt_exps = prepared;
        Ok(())
    }

    fn prepare_alt_exp(&self, name: &str, mut exp: SingleCellExperiment) -> Result<SingleCellExperiment> {
        if exp.contains_experiment(self.id) {
            tracing::debug!(alt_exp = %name, "refusing to nest experiment inside itself");
            return Err(CyaneaError::CyclicReference(format!(
                "alternative experiment '{name}' contains its parent"
            )));
        }
        check_len(
            &format!("alternative experiment '{name}' columns"),
            self.n_cols(),
            exp.n_cols(),
        )?;
        check_column_alignment(name, self.col_names(), exp.col_names())?;
        check_reserved_columns(exp.base.col_data())?;
        if exp.col_names().is_none() {
            if let Some(names) = self.col_names() {
                let names = names.to_vec();
                exp.base.replace_col_names(Some(names.clone()));
                exp.propagate_col_names(Some(names));
            }
        }
        Ok(exp)
    }

    /// Whether `id` is this experiment or any experiment nested inside it.
    pub fn contains_experiment(&self, id: ExperimentId) -> bool {
        self.id == id || self.alt_exps.values().any(|e| e.contains_experiment(id))
    }

    /// Name of the main experiment, if set.
    pub fn main_exp_name(&self) -> Option<&str> {
        self.main_exp_name.as_deref()
    }

    /// Set or clear the main experiment name.
    pub fn set_main_exp_name(&mut self, name: Option<String>) {
        self.main_exp_name = name;
    }

    /// Promote an alternative experiment to the main one.
    ///
    /// The result is a new experiment built from the alternative `name`
    /// with this experiment's `colData` (plus any columns only the
    /// alternative had) and `main_exp_name` set to `name`. When `saved` is
    /// given, this experiment without its alternative experiments is kept
    /// as the alternative `saved` of the result.
    pub fn swap_alt_exp(&self, name: &str, saved: Option<&str>) -> Result<SingleCellExperiment> {
        let alt = self.alt_exp(name)?;

        let mut col_data = self.base.col_data().clone();
        for (col, data) in alt.base.col_data().columns() {
            if !col_data.contains_column(col) {
                col_data.set_column(col.clone(), data.clone())?;
            }
        }

        let mut replacement = alt.clone();
        replacement.set_col_data(col_data)?;
        replacement.main_exp_name = Some(name.to_string());
        replacement.id = ExperimentId::fresh();

        if let Some(saved) = saved {
            if replacement.alt_exps.contains_key(saved) {
                return Err(CyaneaError::DuplicateName(format!(
                    "alternative experiment '{saved}' already exists in '{name}'"
                )));
            }
            let mut old_main = self.clone();
            old_main.alt_exps.clear();
            old_main.id = ExperimentId::fresh();
            replacement.set_alt_exp(saved, old_main)?;
        }

        tracing::debug!(main = %name, saved = ?saved, "swapped alternative experiment");
        Ok(replacement)
    }

    // --- convenience columns -----------------------------------------------

    /// Per-cell size factors, or `None` when unset (or not numeric).
    pub fn size_factors(&self) -> Option<&[f64]> {
        self.base
            .col_data()
            .get(SIZE_FACTOR_COLUMN)
            .and_then(ColumnData::as_numeric)
    }

    /// Set (one value per cell) or clear the size factors.
    pub fn set_size_factors(&mut self, factors: Option<Vec<f64>>) -> Result<()> {
        match factors {
            Some(f) => self.base.set_col_data_column(SIZE_FACTOR_COLUMN, ColumnData::Numeric(f)),
            None => {
                self.base.remove_col_data_column(SIZE_FACTOR_COLUMN);
                Ok(())
            }
        }
    }

    /// Per-cell labels, or `None` when unset.
    pub fn col_labels(&self) -> Option<&ColumnData> {
        self.base.col_data().get(LABEL_COLUMN)
    }

    /// Set (one label per cell) or clear the labels.
    pub fn set_col_labels(&mut self, labels: Option<ColumnData>) -> Result<()> {
        match labels {
            Some(l) => self.base.set_col_data_column(LABEL_COLUMN, l),
            None => {
                self.base.remove_col_data_column(LABEL_COLUMN);
                Ok(())
            }
        }
    }

    // --- subsetting --------------------------------------------------------

    /// Select features and cells with the default [`SubsetConfig`].
    pub fn subset(&self, rows: impl Into<Selector>, cols: impl Into<Selector>) -> Result<Self> {
        self.subset_with(rows, cols, &SubsetConfig::default())
    }

    /// Select features and cells.
    ///
    /// Reduced dimensions are row-filtered by the cell selection, and every
    /// alternative experiment is subset by the same cells (never by the
    /// feature selection, since it has its own features).
    pub fn subset_with(
        &self,
        rows: impl Into<Selector>,
        cols: impl Into<Selector>,
        config: &SubsetConfig,
    ) -> Result<Self> {
        let (rows, cols) = self.base.resolve(&rows.into(), &cols.into(), config)?;
        self.select(&rows, &cols)
    }

    /// Select features, keeping every cell.
    pub fn select_rows(&self, rows: impl Into<Selector>) -> Result<Self> {
        self.subset(rows, Selector::All)
    }

    /// Select cells, keeping every feature.
    pub fn select_cols(&self, cols: impl Into<Selector>) -> Result<Self> {
        self.subset(Selector::All, cols)
    }

    fn select(&self, rows: &[usize], cols: &[usize]) -> Result<Self> {
        let base = self.base.select(rows, cols)?;
        let reduced_dims = self
            .reduced_dims
            .iter()
            .map(|(name, m)| Ok((name.clone(), m.select_rows(cols)?)))
            .collect::<Result<IndexMap<_, _>>>()?;
        let alt_exps = self
            .alt_exps
            .iter()
            .map(|(name, alt)| {
                let all_rows: Vec<usize> = (0..alt.n_rows()).collect();
                Ok((name.clone(), alt.select(&all_rows, cols)?))
            })
            .collect::<Result<IndexMap<_, _>>>()?;

        Ok(SingleCellExperiment {
            base,
            reduced_dims,
            alt_exps,
            main_exp_name: self.main_exp_name.clone(),
            id: ExperimentId::fresh(),
        })
    }

    /// Re-check every invariant, recursively. Useful after deserializing.
    pub fn validate(&self) -> Result<()> {
        self.base.validate()?;
        let n_cols = self.n_cols();
        for (name, matrix) in &self.reduced_dims {
            check_reduced_dim(name, matrix, n_cols)?;
        }
        check_reserved_columns(self.base.col_data())?;
        for (name, alt) in &self.alt_exps {
            if alt.contains_experiment(self.id) {
                return Err(CyaneaError::CyclicReference(format!(
                    "alternative experiment '{name}' contains its parent"
                )));
            }
            check_len(
                &format!("alternative experiment '{name}' columns"),
                n_cols,
                alt.n_cols(),
            )?;
            check_column_alignment(name, self.col_names(), alt.col_names())?;
            alt.validate()?;
        }
        Ok(())
    }
}

impl Deref for SingleCellExperiment {
    type Target = SummarizedExperiment;

    fn deref(&self) -> &SummarizedExperiment {
        &self.base
    }
}

impl AsRef<SummarizedExperiment> for SingleCellExperiment {
    fn as_ref(&self) -> &SummarizedExperiment {
        &self.base
    }
}

impl From<SummarizedExperiment> for SingleCellExperiment {
    fn from(base: SummarizedExperiment) -> Self {
        SingleCellExperiment::new(base)
    }
}

impl Dimensioned for SingleCellExperiment {
    fn dim(&self) -> (usize, usize) {
        self.base.dim()
    }
}

impl Summarizable for SingleCellExperiment {
    fn summary(&self) -> String {
        format!(
            "SingleCellExperiment: {} rows \u{00d7} {} cols, {} assays, {} reducedDims, {} altExps",
            self.n_rows(),
            self.n_cols(),
            self.assays().len(),
            self.reduced_dims.len(),
            self.alt_exps.len(),
        )
    }
}

impl fmt::Display for SingleCellExperiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "class: SingleCellExperiment")?;
        self.base.fmt_body(f)?;
        write_names(f, "reducedDimNames", self.reduced_dim_names())?;
        writeln!(f, "mainExpName: {}", self.main_exp_name().unwrap_or("NULL"))?;
        write_names(f, "altExpNames", self.alt_exp_names())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn experiment(n_rows: usize, n_cols: usize, alt_rows: usize) -> SingleCellExperiment {
        let data = (0..n_rows * n_cols).map(|v| v as f64).collect();
        let alt_data = (0..alt_rows * n_cols).map(|v| -(v as f64)).collect();
        let alt = SingleCellExperiment::builder()
            .assay("counts", DenseMatrix::from_shape_vec(alt_rows, n_cols, alt_data).unwrap())
            .build()
            .unwrap();
        SingleCellExperiment::builder()
            .assay("counts", DenseMatrix::from_shape_vec(n_rows, n_cols, data).unwrap())
            .col_names((0..n_cols).map(|i| format!("c{i}")))
            .reduced_dim("PCA", DenseMatrix::zeros(n_cols, 2))
            .alt_exp("alt", alt)
            .build()
            .unwrap()
    }

    /// (n_rows, n_cols, row selection, column selection) with repeats allowed.
    fn shape_and_selection() -> impl Strategy<Value = (usize, usize, Vec<usize>, Vec<usize>)> {
        (1usize..8, 1usize..8).prop_flat_map(|(r, c)| {
            (
                Just(r),
                Just(c),
                proptest::collection::vec(0..r, 0..10),
                proptest::collection::vec(0..c, 0..10),
            )
        })
    }

    proptest! {
        #[test]
        fn subset_has_selector_cardinality((r, c, rows, cols) in shape_and_selection()) {
            let sce = experiment(r, c, 3);
            let sub = sce.subset(rows.clone(), cols.clone()).unwrap();
            prop_assert_eq!(sub.dim(), (rows.len(), cols.len()));
            prop_assert_eq!(sub.reduced_dim("PCA").unwrap().shape().0, cols.len());
            prop_assert!(sub.validate().is_ok());
        }

        #[test]
        fn subset_assay_is_slice_of_parent((r, c, rows, cols) in shape_and_selection()) {
            let sce = experiment(r, c, 3);
            let sub = sce.subset(rows.clone(), cols.clone()).unwrap();
            let parent = sce.assay("counts").unwrap();
            let child = sub.assay("counts").unwrap();
            for (i, &pr) in rows.iter().enumerate() {
                for (j, &pc) in cols.iter().enumerate() {
                    prop_assert_eq!(child.get(i, j), parent.get(pr, pc));
                }
            }
        }

        #[test]
        fn alt_exp_stays_synchronized((r, c, rows, cols) in shape_and_selection()) {
            let sce = experiment(r, c, 3);
            let sub = sce.subset(rows, cols.clone()).unwrap();
            let alt = sub.alt_exp("alt").unwrap();
            prop_assert_eq!(alt.dim(), (3, cols.len()));
            prop_assert_eq!(alt.col_names(), sub.col_names());
            let parent_alt = sce.alt_exp("alt").unwrap().assay("counts").unwrap();
            for (j, &pc) in cols.iter().enumerate() {
                prop_assert_eq!(alt.assay("counts").unwrap().get(0, j), parent_alt.get(0, pc));
            }
        }

        #[test]
        fn failed_reduced_dim_changes_nothing(c in 1usize..6, bad in 0usize..12) {
            prop_assume!(bad != c);
            let mut sce = experiment(4, c, 2);
            let before = sce.clone();
            let result = sce.set_reduced_dim("PCA", DenseMatrix::zeros(bad, 3));
            prop_assert!(matches!(result, Err(CyaneaError::DimensionMismatch(_))));
            prop_assert_eq!(sce, before);
        }
    }
}
