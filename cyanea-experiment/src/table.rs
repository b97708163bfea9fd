//! Row-aligned annotation tables.
//!
//! [`AnnotationTable`] is the per-feature (`rowData`) and per-cell
//! (`colData`) metadata store: a fixed number of records, optional unique
//! record names, and any number of named [`ColumnData`] columns of that
//! length. Column order is insertion order.

use indexmap::IndexMap;

use cyanea_core::{CyaneaError, Result, Summarizable};

use crate::column::ColumnData;
use crate::validate::{check_len, check_unique_names};

/// A table of `len()` records with typed columns and optional record names.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnotationTable {
    n_rows: usize,
    names: Option<Vec<String>>,
    columns: IndexMap<String, ColumnData>,
}

impl AnnotationTable {
    /// An empty table with `n_rows` records and no names.
    pub fn new(n_rows: usize) -> Self {
        Self {
            n_rows,
            names: None,
            columns: IndexMap::new(),
        }
    }

    /// An empty table whose records are named; the length is `names.len()`.
    ///
    /// # Errors
    ///
    /// `DuplicateIdentifier` if a name repeats.
    pub fn with_names(names: Vec<String>) -> Result<Self> {
        check_unique_names("record", &names)?;
        Ok(Self {
            n_rows: names.len(),
            names: Some(names),
            columns: IndexMap::new(),
        })
    }

    /// Build a table from `(name, column)` pairs, each of length `n_rows`.
    pub fn from_columns<I, S>(n_rows: usize, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, ColumnData)>,
        S: Into<String>,
    {
        let mut table = Self::new(n_rows);
        for (name, data) in columns {
            let name = name.into();
            if table.columns.contains_key(&name) {
                return Err(CyaneaError::DuplicateName(format!(
                    "column '{name}' supplied more than once"
                )));
            }
            table.set_column(name, data)?;
        }
        Ok(table)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.n_rows
    }

    /// Whether the table has no records.
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Record names, if set.
    pub fn names(&self) -> Option<&[String]> {
        self.names.as_deref()
    }

    /// Replace (or clear) the record names.
    pub fn set_names(&mut self, names: Option<Vec<String>>) -> Result<()> {
        if let Some(names) = &names {
            check_len("names", self.n_rows, names.len())?;
            check_unique_names("record", names)?;
        }
        self.names = names;
        Ok(())
    }

    /// Names are already known to have the right length and be unique.
    pub(crate) fn replace_names(&mut self, names: Option<Vec<String>>) {
        debug_assert!(names.as_ref().map_or(true, |n| n.len() == self.n_rows));
        self.names = names;
    }

    /// Position of a named record.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.as_ref()?.iter().position(|n| n == name)
    }

    /// A column by name.
    ///
    /// # Errors
    ///
    /// `NotFound` if the table has no such column.
    pub fn column(&self, name: &str) -> Result<&ColumnData> {
        self.columns
            .get(name)
            .ok_or_else(|| CyaneaError::NotFound(format!("column '{name}'")))
    }

    /// A column by name, or `None`.
    pub fn get(&self, name: &str) -> Option<&ColumnData> {
        self.columns.get(name)
    }

    /// Whether a column exists.
    pub fn contains_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// All columns in insertion order.
    pub fn columns(&self) -> &IndexMap<String, ColumnData> {
        &self.columns
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.columns.keys().map(String::as_str)
    }

    /// Number of columns.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Add or overwrite a column. Its length must equal `len()`.
    pub fn set_column(&mut self, name: impl Into<String>, data: ColumnData) -> Result<()> {
        let name = name.into();
        check_len(&format!("column '{name}'"), self.n_rows, data.len())?;
        self.columns.insert(name, data);
        Ok(())
    }

    /// Remove a column, returning it if present. Remaining order is kept.
    pub fn remove_column(&mut self, name: &str) -> Option<ColumnData> {
        self.columns.shift_remove(name)
    }

    /// Select records by position. Indices may repeat; repeated names are
    /// suffixed to stay unique.
    pub(crate) fn take(&self, indices: &[usize]) -> AnnotationTable {
        let names = self.names.as_ref().map(|names| {
            let picked = indices.iter().map(|&i| names[i].clone()).collect();
            crate::validate::make_unique(picked)
        });
        let columns = self
            .columns
            .iter()
            .map(|(k, c)| (k.clone(), c.take(indices)))
            .collect();
        AnnotationTable {
            n_rows: indices.len(),
            names,
            columns,
        }
    }

    /// Re-check record count, names and column lengths.
    pub fn validate(&self) -> Result<()> {
        if let Some(names) = &self.names {
            check_len("names", self.n_rows, names.len())?;
            check_unique_names("record", names)?;
        }
        for (name, col) in &self.columns {
            check_len(&format!("column '{name}'"), self.n_rows, col.len())?;
        }
        Ok(())
    }
}

impl Summarizable for AnnotationTable {
    fn summary(&self) -> String {
        format!(
            "AnnotationTable: {} records, {} columns",
            self.n_rows,
            self.columns.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells() -> AnnotationTable {
        let mut t =
            AnnotationTable::with_names(vec!["c1".into(), "c2".into(), "c3".into()]).unwrap();
        t.set_column("batch", vec![1i64, 1, 2].into()).unwrap();
        t.set_column("type", vec!["T", "B", "T"].into()).unwrap();
        t
    }

    #[test]
    fn construction() {
        let t = cells();
        assert_eq!(t.len(), 3);
        assert_eq!(t.n_columns(), 2);
        assert_eq!(t.column_names().collect::<Vec<_>>(), vec!["batch", "type"]);
        assert_eq!(t.position("c3"), Some(2));
        assert_eq!(t.position("c9"), None);
    }

    #[test]
    fn duplicate_names_rejected() {
        let result = AnnotationTable::with_names(vec!["a".into(), "a".into()]);
        assert!(matches!(result, Err(CyaneaError::DuplicateIdentifier(_))));
    }

    #[test]
    fn from_columns_checks() {
        let ok = AnnotationTable::from_columns(2, [("x", ColumnData::from(vec![1.0, 2.0]))]);
        assert!(ok.is_ok());
        let short = AnnotationTable::from_columns(3, [("x", ColumnData::from(vec![1.0]))]);
        assert!(matches!(short, Err(CyaneaError::DimensionMismatch(_))));
        let dup = AnnotationTable::from_columns(
            1,
            [
                ("x", ColumnData::from(vec![1.0])),
                ("x", ColumnData::from(vec![2.0])),
            ],
        );
        assert!(matches!(dup, Err(CyaneaError::DuplicateName(_))));
    }

    #[test]
    fn column_lookup() {
        let t = cells();
        assert_eq!(t.column("batch").unwrap().as_integer(), Some(&[1, 1, 2][..]));
        assert!(matches!(t.column("nope"), Err(CyaneaError::NotFound(_))));
        assert!(t.get("nope").is_none());
    }

    #[test]
    fn set_column_length_checked() {
        let mut t = cells();
        let before = t.clone();
        assert!(t.set_column("bad", vec![1.0].into()).is_err());
        assert_eq!(t, before);
    }

    #[test]
    fn set_names_checked() {
        let mut t = cells();
        assert!(t.set_names(Some(vec!["a".into()])).is_err());
        assert!(t
            .set_names(Some(vec!["a".into(), "b".into(), "b".into()]))
            .is_err());
        assert_eq!(t.names().unwrap()[0], "c1");
        t.set_names(None).unwrap();
        assert!(t.names().is_none());
    }

    #[test]
    fn remove_keeps_order() {
        let mut t = cells();
        t.set_column("qc", vec![true, false, true].into()).unwrap();
        assert!(t.remove_column("type").is_some());
        assert_eq!(t.column_names().collect::<Vec<_>>(), vec!["batch", "qc"]);
        assert!(t.remove_column("type").is_none());
    }

    #[test]
    fn take_with_repeats() {
        let t = cells().take(&[2, 0, 2]);
        assert_eq!(t.len(), 3);
        assert_eq!(t.names().unwrap(), &["c3", "c1", "c3.1"]);
        assert_eq!(t.column("batch").unwrap().as_integer(), Some(&[2, 1, 2][..]));
        assert!(t.validate().is_ok());
    }
}
