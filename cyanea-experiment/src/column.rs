//! Typed annotation columns.

use cyanea_core::{CyaneaError, Result};

/// A metadata column with typed data.
///
/// Supports the column kinds found in per-gene and per-cell annotation
/// tables: free text, floating point, integer, boolean and factors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColumnData {
    /// Free-text string values.
    Strings(Vec<String>),
    /// Numeric (f64) values.
    Numeric(Vec<f64>),
    /// Integer values (batch ids, counts).
    Integer(Vec<i64>),
    /// Boolean flags (QC pass/fail).
    Boolean(Vec<bool>),
    /// Categorical data stored as integer codes indexing into a category list.
    Categorical {
        codes: Vec<u32>,
        categories: Vec<String>,
    },
}

impl ColumnData {
    /// Build a categorical column from string values, with categories in
    /// order of first appearance.
    pub fn categorical_from<S: AsRef<str>>(values: &[S]) -> Self {
        let mut categories: Vec<String> = Vec::new();
        let codes = values
            .iter()
            .map(|v| {
                let v = v.as_ref();
                match categories.iter().position(|c| c == v) {
                    Some(i) => i as u32,
                    None => {
                        categories.push(v.to_string());
                        (categories.len() - 1) as u32
                    }
                }
            })
            .collect();
        ColumnData::Categorical { codes, categories }
    }

    /// Build a categorical column from explicit codes, checking every code
    /// indexes into `categories`.
    pub fn categorical(codes: Vec<u32>, categories: Vec<String>) -> Result<Self> {
        if let Some(&bad) = codes.iter().find(|&&c| c as usize >= categories.len()) {
            return Err(CyaneaError::InvalidInput(format!(
                "category code {bad} out of range ({} categories)",
                categories.len()
            )));
        }
        Ok(ColumnData::Categorical { codes, categories })
    }

    /// Number of elements in this column.
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Strings(v) => v.len(),
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Integer(v) => v.len(),
            ColumnData::Boolean(v) => v.len(),
            ColumnData::Categorical { codes, .. } => codes.len(),
        }
    }

    /// Whether the column is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short type label used in reports.
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnData::Strings(_) => "character",
            ColumnData::Numeric(_) => "numeric",
            ColumnData::Integer(_) => "integer",
            ColumnData::Boolean(_) => "logical",
            ColumnData::Categorical { .. } => "factor",
        }
    }

    /// Try to get as strings. Returns `None` if not `Strings` variant.
    pub fn as_strings(&self) -> Option<&[String]> {
        match self {
            ColumnData::Strings(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as numeric values. Returns `None` if not `Numeric` variant.
    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            ColumnData::Numeric(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as integers.
    pub fn as_integer(&self) -> Option<&[i64]> {
        match self {
            ColumnData::Integer(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as booleans.
    pub fn as_boolean(&self) -> Option<&[bool]> {
        match self {
            ColumnData::Boolean(v) => Some(v),
            _ => None,
        }
    }

    /// Category label of element `i`, for categorical columns.
    pub fn category_of(&self, i: usize) -> Option<&str> {
        match self {
            ColumnData::Categorical { codes, categories } => codes
                .get(i)
                .and_then(|&c| categories.get(c as usize))
                .map(String::as_str),
            _ => None,
        }
    }

    /// Subset to the given indices. Indices may repeat.
    ///
    /// Callers validate bounds first.
    pub(crate) fn take(&self, indices: &[usize]) -> Self {
        match self {
            ColumnData::Strings(v) => {
                ColumnData::Strings(indices.iter().map(|&i| v[i].clone()).collect())
            }
            ColumnData::Numeric(v) => ColumnData::Numeric(indices.iter().map(|&i| v[i]).collect()),
            ColumnData::Integer(v) => ColumnData::Integer(indices.iter().map(|&i| v[i]).collect()),
            ColumnData::Boolean(v) => ColumnData::Boolean(indices.iter().map(|&i| v[i]).collect()),
            ColumnData::Categorical { codes, categories } => ColumnData::Categorical {
                codes: indices.iter().map(|&i| codes[i]).collect(),
                categories: categories.clone(),
            },
        }
    }
}

impl From<Vec<String>> for ColumnData {
    fn from(v: Vec<String>) -> Self {
        ColumnData::Strings(v)
    }
}

impl From<Vec<&str>> for ColumnData {
    fn from(v: Vec<&str>) -> Self {
        ColumnData::Strings(v.into_iter().map(String::from).collect())
    }
}

impl From<Vec<f64>> for ColumnData {
    fn from(v: Vec<f64>) -> Self {
        ColumnData::Numeric(v)
    }
}

impl From<Vec<i64>> for ColumnData {
    fn from(v: Vec<i64>) -> Self {
        ColumnData::Integer(v)
    }
}

impl From<Vec<bool>> for ColumnData {
    fn from(v: Vec<bool>) -> Self {
        ColumnData::Boolean(v)
    }
}
