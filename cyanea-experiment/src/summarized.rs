//! The general synchronized-table container.
//!
//! A [`SummarizedExperiment`] bundles equally shaped assay matrices
//! (features × samples) with per-feature annotations (`rowData`, optional
//! `rowRanges`), per-sample annotations (`colData`) and free-form metadata.
//! The row axis is defined by `rowData` and the column axis by `colData`;
//! every slot is checked against those two lengths before a mutation is
//! committed, so a rejected call leaves the container untouched.
//!
//! # Example
//!
//! ```
//! use cyanea_experiment::{DenseMatrix, Selector, SummarizedExperiment};
//!
//! let counts = DenseMatrix::new(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
//! let se = SummarizedExperiment::builder()
//!     .assay("counts", counts)
//!     .col_names(["s1", "s2", "s3"])
//!     .build()
//!     .unwrap();
//! assert_eq!(se.dim(), (2, 3));
//!
//! let sub = se.subset(Selector::All, Selector::names(["s3", "s1"])).unwrap();
//! assert_eq!(sub.assay("counts").unwrap().get(0, 0), Some(3.0));
//! ```
//!
//! Mutators take `&mut self`; the type has no interior mutability, so
//! sharing one value across threads for writing needs external locking.

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;

use cyanea_core::{CyaneaError, Dimensioned, Result, Summarizable};

use crate::assay::Assay;
use crate::column::ColumnData;
use crate::config::SubsetConfig;
use crate::ranges::RowRanges;
use crate::selector::{Axis, Selector};
use crate::table::AnnotationTable;
use crate::validate::{check_assay, check_len, check_new_name};

/// Assays plus row/column annotations kept dimensionally consistent.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SummarizedExperiment {
    assays: IndexMap<String, Assay>,
    row_data: AnnotationTable,
    col_data: AnnotationTable,
    row_ranges: Option<RowRanges>,
    metadata: IndexMap<String, Value>,
}

/// Collects the pieces of a [`SummarizedExperiment`] and checks them
/// together in [`build`](Self::build).
#[derive(Debug, Default)]
pub struct SummarizedExperimentBuilder {
    assays: Vec<(String, Assay)>,
    row_data: Option<AnnotationTable>,
    col_data: Option<AnnotationTable>,
    row_names: Option<Vec<String>>,
    col_names: Option<Vec<String>>,
    row_ranges: Option<RowRanges>,
    metadata: IndexMap<String, Value>,
}

impl SummarizedExperimentBuilder {
    /// Add a named assay.
    pub fn assay(mut self, name: impl Into<String>, assay: impl Into<Assay>) -> Self {
        self.assays.push((name.into(), assay.into()));
        self
    }

    /// Per-feature annotations.
    pub fn row_data(mut self, table: AnnotationTable) -> Self {
        self.row_data = Some(table);
        self
    }

    /// Per-sample annotations.
    pub fn col_data(mut self, table: AnnotationTable) -> Self {
        self.col_data = Some(table);
        self
    }

    /// Feature identifiers; override any names carried by `row_data`.
    pub fn row_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.row_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Sample identifiers; override any names carried by `col_data`.
    pub fn col_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.col_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Genomic ranges, one list per feature.
    pub fn row_ranges(mut self, ranges: RowRanges) -> Self {
        self.row_ranges = Some(ranges);
        self
    }

    /// One free-form metadata entry.
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Check every piece against the shape of the first assay.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` when no assay was supplied
    /// - `DuplicateName` when two assays share a name
    /// - `DimensionMismatch` when an assay, table or range list disagrees
    ///   with the inferred `(n_rows, n_cols)`
    /// - `DuplicateIdentifier` when row or column names repeat
    pub fn build(self) -> Result<SummarizedExperiment> {
        let Some((_, first)) = self.assays.first() else {
            return Err(CyaneaError::InvalidInput(
                "an experiment needs at least one assay".into(),
            ));
        };
        let dim = first.shape();

        let mut seen = HashSet::with_capacity(self.assays.len());
        for (name, assay) in &self.assays {
            check_new_name("assay", &mut seen, name)?;
            check_assay(name, assay, dim)?;
        }

        let row_data = axis_table("rowData", self.row_data, self.row_names, dim.0)?;
        let col_data = axis_table("colData", self.col_data, self.col_names, dim.1)?;

        if let Some(ranges) = &self.row_ranges {
            check_len("rowRanges", dim.0, ranges.len())?;
            ranges.validate()?;
        }

        tracing::debug!(
            n_rows = dim.0,
            n_cols = dim.1,
            n_assays = self.assays.len(),
            "built SummarizedExperiment"
        );

        Ok(SummarizedExperiment {
            assays: self.assays.into_iter().collect(),
            row_data,
            col_data,
            row_ranges: self.row_ranges,
            metadata: self.metadata,
        })
    }
}

fn axis_table(
    what: &str,
    table: Option<AnnotationTable>,
    names: Option<Vec<String>>,
    len: usize,
) -> Result<AnnotationTable> {
    let mut table = match table {
        Some(t) => {
            check_len(what, len, t.len())?;
            t.validate()?;
            t
        }
        None => AnnotationTable::new(len),
    };
    if names.is_some() {
        table.set_names(names)?;
    }
    Ok(table)
}

impl SummarizedExperiment {
    /// Start a builder.
    pub fn builder() -> SummarizedExperimentBuilder {
        SummarizedExperimentBuilder::default()
    }

    /// An experiment with a single assay and empty annotations.
    pub fn new(name: impl Into<String>, assay: impl Into<Assay>) -> Result<Self> {
        Self::builder().assay(name, assay).build()
    }

    /// Number of features.
    pub fn n_rows(&self) -> usize {
        self.row_data.len()
    }

    /// Number of samples.
    pub fn n_cols(&self) -> usize {
        self.col_data.len()
    }

    /// `(n_rows, n_cols)`.
    pub fn dim(&self) -> (usize, usize) {
        (self.n_rows(), self.n_cols())
    }

    // --- assays -----------------------------------------------------------

    /// A named assay.
    pub fn assay(&self, name: &str) -> Result<&Assay> {
        self.assays
            .get(name)
            .ok_or_else(|| CyaneaError::NotFound(format!("assay '{name}'")))
    }

    /// All assays in insertion order.
    pub fn assays(&self) -> &IndexMap<String, Assay> {
        &self.assays
    }

    /// Assay names in insertion order.
    pub fn assay_names(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.assays.keys().map(String::as_str)
    }

    /// Add or overwrite an assay. It must be `(n_rows, n_cols)`.
    pub fn set_assay(&mut self, name: impl Into<String>, assay: impl Into<Assay>) -> Result<()> {
        let name = name.into();
        let assay = assay.into();
        check_assay(&name, &assay, self.dim())?;
        tracing::debug!(assay = %name, kind = assay.kind(), "set assay");
        self.assays.insert(name, assay);
        Ok(())
    }

    /// Remove an assay, keeping the order of the rest.
    pub fn remove_assay(&mut self, name: &str) -> Result<Assay> {
        self.assays
            .shift_remove(name)
            .ok_or_else(|| CyaneaError::NotFound(format!("assay '{name}'")))
    }

    /// Replace every assay at once. Nothing changes if the map is empty or
    /// any one is misshapen.
    pub fn set_assays(&mut self, assays: IndexMap<String, Assay>) -> Result<()> {
        if assays.is_empty() {
            return Err(CyaneaError::InvalidInput(
                "an experiment needs at least one assay".into(),
            ));
        }
        let dim = self.dim();
        for (name, assay) in &assays {
            check_assay(name, assay, dim)?;
        }
        self.assays = assays;
        Ok(())
    }

    // --- row / column annotations ------------------------------------------

    /// Per-feature annotations.
    pub fn row_data(&self) -> &AnnotationTable {
        &self.row_data
    }

    /// Per-sample annotations.
    pub fn col_data(&self) -> &AnnotationTable {
        &self.col_data
    }

    /// Replace the per-feature table. It must have `n_rows` records.
    pub fn set_row_data(&mut self, table: AnnotationTable) -> Result<()> {
        check_len("rowData", self.n_rows(), table.len())?;
        table.validate()?;
        self.row_data = table;
        Ok(())
    }

    /// Replace the per-sample table. It must have `n_cols` records.
    pub fn set_col_data(&mut self, table: AnnotationTable) -> Result<()> {
        check_len("colData", self.n_cols(), table.len())?;
        table.validate()?;
        self.col_data = table;
        Ok(())
    }

    /// Add or overwrite one `rowData` column.
    pub fn set_row_data_column(&mut self, name: impl Into<String>, data: ColumnData) -> Result<()> {
        self.row_data.set_column(name, data)
    }

    /// Add or overwrite one `colData` column.
    pub fn set_col_data_column(&mut self, name: impl Into<String>, data: ColumnData) -> Result<()> {
        self.col_data.set_column(name, data)
    }

    /// Remove one `colData` column.
    pub fn remove_col_data_column(&mut self, name: &str) -> Option<ColumnData> {
        self.col_data.remove_column(name)
    }

    /// Remove one `rowData` column.
    pub fn remove_row_data_column(&mut self, name: &str) -> Option<ColumnData> {
        self.row_data.remove_column(name)
    }

    /// Feature identifiers.
    pub fn row_names(&self) -> Option<&[String]> {
        self.row_data.names()
    }

    /// Sample identifiers.
    pub fn col_names(&self) -> Option<&[String]> {
        self.col_data.names()
    }

    /// Set or clear feature identifiers.
    pub fn set_row_names(&mut self, names: Option<Vec<String>>) -> Result<()> {
        self.row_data.set_names(names)
    }

    /// Set or clear sample identifiers.
    pub fn set_col_names(&mut self, names: Option<Vec<String>>) -> Result<()> {
        self.col_data.set_names(names)
    }

    /// Names are already known to be valid for this axis.
    pub(crate) fn replace_col_names(&mut self, names: Option<Vec<String>>) {
        self.col_data.replace_names(names);
    }

    // --- row ranges --------------------------------------------------------

    /// Genomic ranges per feature, if attached.
    pub fn row_ranges(&self) -> Option<&RowRanges> {
        self.row_ranges.as_ref()
    }

    /// Attach or clear genomic ranges. Must have `n_rows` entries.
    pub fn set_row_ranges(&mut self, ranges: Option<RowRanges>) -> Result<()> {
        if let Some(r) = &ranges {
            check_len("rowRanges", self.n_rows(), r.len())?;
            r.validate()?;
        }
        self.row_ranges = ranges;
        Ok(())
    }

    // --- metadata ----------------------------------------------------------

    /// Free-form metadata.
    pub fn metadata(&self) -> &IndexMap<String, Value> {
        &self.metadata
    }

    /// One metadata entry.
    pub fn metadata_value(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    /// Add or overwrite a metadata entry. Never fails.
    pub fn set_metadata_value(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Remove a metadata entry.
    pub fn remove_metadata_value(&mut self, key: &str) -> Option<Value> {
        self.metadata.shift_remove(key)
    }

    /// Replace all metadata.
    pub fn set_metadata(&mut self, metadata: IndexMap<String, Value>) {
        self.metadata = metadata;
    }

    // --- subsetting --------------------------------------------------------

    /// Select rows and columns with the default [`SubsetConfig`].
    pub fn subset(&self, rows: impl Into<Selector>, cols: impl Into<Selector>) -> Result<Self> {
        self.subset_with(rows, cols, &SubsetConfig::default())
    }

    /// Select rows and columns.
    ///
    /// The result is an independent value: assays are sliced on both axes,
    /// `rowData`/`rowRanges` follow the rows, `colData` follows the columns.
    pub fn subset_with(
        &self,
        rows: impl Into<Selector>,
        cols: impl Into<Selector>,
        config: &SubsetConfig,
    ) -> Result<Self> {
        let (rows, cols) = self.resolve(&rows.into(), &cols.into(), config)?;
        self.select(&rows, &cols)
    }

    /// Select rows, keeping every column.
    pub fn select_rows(&self, rows: impl Into<Selector>) -> Result<Self> {
        self.subset(rows, Selector::All)
    }

    /// Select columns, keeping every row.
    pub fn select_cols(&self, cols: impl Into<Selector>) -> Result<Self> {
        self.subset(Selector::All, cols)
    }

    pub(crate) fn resolve(
        &self,
        rows: &Selector,
        cols: &Selector,
        config: &SubsetConfig,
    ) -> Result<(Vec<usize>, Vec<usize>)> {
        let rows = rows.resolve(Axis::Row, self.n_rows(), self.row_names(), config)?;
        let cols = cols.resolve(Axis::Column, self.n_cols(), self.col_names(), config)?;
        Ok((rows, cols))
    }

    /// Slice by already-resolved, in-bounds positions.
    pub(crate) fn select(&self, rows: &[usize], cols: &[usize]) -> Result<Self> {
        let assays = self
            .assays
            .iter()
            .map(|(name, a)| Ok((name.clone(), a.select(rows, cols)?)))
            .collect::<Result<IndexMap<_, _>>>()?;
        let row_ranges = self
            .row_ranges
            .as_ref()
            .map(|r| r.take(rows))
            .transpose()?;

        tracing::debug!(
            from_rows = self.n_rows(),
            from_cols = self.n_cols(),
            n_rows = rows.len(),
            n_cols = cols.len(),
            "subset SummarizedExperiment"
        );

        Ok(SummarizedExperiment {
            assays,
            row_data: self.row_data.take(rows),
            col_data: self.col_data.take(cols),
            row_ranges,
            metadata: self.metadata.clone(),
        })
    }

    /// Re-check every invariant. Useful after deserializing.
    pub fn validate(&self) -> Result<()> {
        self.row_data.validate()?;
        self.col_data.validate()?;
        let dim = self.dim();
        for (name, assay) in &self.assays {
            check_assay(name, assay, dim)?;
        }
        if let Some(r) = &self.row_ranges {
            check_len("rowRanges", dim.0, r.len())?;
            r.validate()?;
        }
        Ok(())
    }

    pub(crate) fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "dim: {} {}", self.n_rows(), self.n_cols())?;
        write_names(f, "metadata", self.metadata.keys().map(String::as_str))?;
        write_names(f, "assays", self.assay_names())?;
        write_axis_names(f, "rownames", self.row_names())?;
        write_names(f, "rowData names", self.row_data.column_names())?;
        write_axis_names(f, "colnames", self.col_names())?;
        write_names(f, "colData names", self.col_data.column_names())
    }
}

impl Dimensioned for SummarizedExperiment {
    fn dim(&self) -> (usize, usize) {
        SummarizedExperiment::dim(self)
    }
}

impl Summarizable for SummarizedExperiment {
    fn summary(&self) -> String {
        format!(
            "SummarizedExperiment: {} rows \u{00d7} {} cols, {} assays",
            self.n_rows(),
            self.n_cols(),
            self.assays.len()
        )
    }
}

impl fmt::Display for SummarizedExperiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "class: SummarizedExperiment")?;
        self.fmt_body(f)
    }
}

/// `label(n): a b ... y z`, eliding the middle of long lists.
pub(crate) fn write_names<'a, I>(f: &mut fmt::Formatter<'_>, label: &str, names: I) -> fmt::Result
where
    I: ExactSizeIterator<Item = &'a str>,
{
    let n = names.len();
    let items: Vec<&str> = names.collect();
    let shown = if n > 4 {
        format!("{} {} ... {} {}", items[0], items[1], items[n - 2], items[n - 1])
    } else {
        items.join(" ")
    };
    writeln!(f, "{label}({n}): {shown}")
}

fn write_axis_names(f: &mut fmt::Formatter<'_>, label: &str, names: Option<&[String]>) -> fmt::Result {
    match names {
        Some(names) => write_names(f, label, names.iter().map(String::as_str)),
        None => writeln!(f, "{label}: NULL"),
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use crate::matrix::DenseMatrix;
    use crate::ranges::GenomicInterval;
    use crate::sparse::SparseMatrix;
    use serde_json::json;

    fn dense_se() -> SummarizedExperiment {
        let counts = DenseMatrix::new(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let mut se = SummarizedExperiment::new("counts", counts).unwrap();
        let ranges = RowRanges::from_intervals(vec![
            GenomicInterval::new("chr1", 0, 10).unwrap(),
            GenomicInterval::new("chr1", 20, 30).unwrap(),
        ]);
        se.set_row_ranges(Some(ranges)).unwrap();
        se
    }

    fn reload(value: Value) -> SummarizedExperiment {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn roundtrip_validates() {
        let se = dense_se();
        let back = reload(serde_json::to_value(&se).unwrap());
        assert_eq!(back, se);
        assert!(back.validate().is_ok());
    }

    #[test]
    fn short_dense_buffer_fails_validation() {
        let mut v = serde_json::to_value(dense_se()).unwrap();
        v["assays"]["counts"]["Dense"]["data"] = json!([1.0]);
        let se = reload(v);
        assert!(matches!(
            se.validate(),
            Err(CyaneaError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn sparse_index_out_of_range_fails_validation() {
        let sparse = SparseMatrix::from_triplets(vec![0, 1], vec![0, 1], vec![1.0, 2.0], 2, 2)
            .unwrap();
        let se = SummarizedExperiment::new("counts", sparse).unwrap();
        let mut v = serde_json::to_value(se).unwrap();
        v["assays"]["counts"]["Sparse"]["cols"][1] = json!(9);
        assert!(matches!(
            reload(v.clone()).validate(),
            Err(CyaneaError::InvalidInput(_))
        ));
        v["assays"]["counts"]["Sparse"]["values"] = json!([1.0]);
        assert!(matches!(
            reload(v).validate(),
            Err(CyaneaError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn inverted_interval_fails_validation() {
        let mut v = serde_json::to_value(dense_se()).unwrap();
        v["row_ranges"]["ranges"][1][0]["start"] = json!(40);
        assert!(matches!(
            reload(v).validate(),
            Err(CyaneaError::InvalidInput(_))
        ));
    }
}
