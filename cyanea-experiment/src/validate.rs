//! Shape and identifier checks shared by every mutator.
//!
//! All slot setters run these before committing, and the `validate()`
//! sweeps on the containers are built from the same functions, so a shape
//! rule lives in exactly one place.

use std::collections::{HashMap, HashSet};

use cyanea_core::{CyaneaError, Result};

use crate::assay::Assay;
use crate::column::ColumnData;
use crate::matrix::DenseMatrix;
use crate::ranges::GenomicInterval;
use crate::single_cell::SIZE_FACTOR_COLUMN;
use crate::table::AnnotationTable;

/// Fail with `DimensionMismatch` unless `found == expected`.
pub(crate) fn check_len(what: &str, expected: usize, found: usize) -> Result<()> {
    if found != expected {
        return Err(CyaneaError::DimensionMismatch(format!(
            "{what} has length {found}, expected {expected}"
        )));
    }
    Ok(())
}

/// Invariant 1: every assay is exactly `dim`.
pub(crate) fn check_assay(name: &str, assay: &Assay, dim: (usize, usize)) -> Result<()> {
    assay.validate()?;
    let shape = assay.shape();
    if shape != dim {
        return Err(CyaneaError::DimensionMismatch(format!(
            "assay '{name}' has shape ({}, {}), expected ({}, {})",
            shape.0, shape.1, dim.0, dim.1
        )));
    }
    Ok(())
}

/// Invariant 3: a reduced dimension has one row per column of the parent.
pub(crate) fn check_reduced_dim(name: &str, matrix: &DenseMatrix, n_cols: usize) -> Result<()> {
    matrix.validate()?;
    let (rows, _) = matrix.shape();
    if rows != n_cols {
        return Err(CyaneaError::DimensionMismatch(format!(
            "reduced dimension '{name}' has {rows} rows, expected {n_cols}"
        )));
    }
    Ok(())
}

/// A genomic interval is non-empty: `start < end`.
pub(crate) fn check_interval(interval: &GenomicInterval) -> Result<()> {
    if interval.start >= interval.end {
        return Err(CyaneaError::InvalidInput(format!(
            "interval start ({}) must be less than end ({})",
            interval.start, interval.end
        )));
    }
    Ok(())
}

/// The size-factor column holds numbers.
pub(crate) fn check_size_factors(data: &ColumnData) -> Result<()> {
    if data.as_numeric().is_none() {
        return Err(CyaneaError::InvalidInput(format!(
            "'{SIZE_FACTOR_COLUMN}' column is {}, expected numeric",
            data.type_name()
        )));
    }
    Ok(())
}

/// Reserved `colData` columns of a single-cell experiment have the right type.
pub(crate) fn check_reserved_columns(col_data: &AnnotationTable) -> Result<()> {
    match col_data.get(SIZE_FACTOR_COLUMN) {
        Some(data) => check_size_factors(data),
        None => Ok(()),
    }
}

/// Invariant 5: identifiers are unique within an axis.
pub(crate) fn check_unique_names(axis: &str, names: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(names.len());
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(CyaneaError::DuplicateIdentifier(format!(
                "{axis} identifier '{name}' appears more than once"
            )));
        }
    }
    Ok(())
}

/// Invariant 4: an alternative experiment's column identifiers match the
/// parent's positionally, when both sides define them.
pub(crate) fn check_column_alignment(
    alt: &str,
    parent: Option<&[String]>,
    child: Option<&[String]>,
) -> Result<()> {
    let (Some(parent), Some(child)) = (parent, child) else {
        return Ok(());
    };
    if let Some((i, (p, c))) = parent
        .iter()
        .zip(child.iter())
        .enumerate()
        .find(|(_, (p, c))| p != c)
    {
        return Err(CyaneaError::ColumnMisalignment(format!(
            "alternative experiment '{alt}' column {i} is '{c}', parent has '{p}'"
        )));
    }
    Ok(())
}

/// Reject a name that is already taken in a slot under construction.
pub(crate) fn check_new_name<'a>(
    slot: &str,
    seen: &mut HashSet<&'a str>,
    name: &'a str,
) -> Result<()> {
    if !seen.insert(name) {
        return Err(CyaneaError::DuplicateName(format!(
            "{slot} name '{name}' supplied more than once"
        )));
    }
    Ok(())
}

/// Names for a selection that may repeat positions.
///
/// The first occurrence keeps its identifier and later copies get `.1`,
/// `.2`, ... suffixes, skipping any suffix already used on the axis.
/// The mapping depends only on the input sequence, so two axes with equal
/// names stay equal after selection with the same positions.
pub(crate) fn make_unique(names: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = names.iter().cloned().collect();
    let mut emitted: HashSet<String> = HashSet::with_capacity(names.len());
    let mut next_suffix: HashMap<String, usize> = HashMap::new();

    names
        .into_iter()
        .map(|name| {
            if emitted.insert(name.clone()) {
                return name;
            }
            let counter = next_suffix.entry(name.clone()).or_insert(1);
            loop {
                let candidate = format!("{name}.{counter}");
                *counter += 1;
                if !taken.contains(&candidate) {
                    taken.insert(candidate.clone());
                    emitted.insert(candidate.clone());
                    return candidate;
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn len_check() {
        assert!(check_len("colData", 3, 3).is_ok());
        let err = check_len("colData", 3, 4).unwrap_err();
        assert!(matches!(err, CyaneaError::DimensionMismatch(_)));
        assert!(err.to_string().contains("expected 3"));
    }

    #[test]
    fn unique_names() {
        assert!(check_unique_names("row", &names(&["a", "b"])).is_ok());
        assert!(matches!(
            check_unique_names("row", &names(&["a", "b", "a"])),
            Err(CyaneaError::DuplicateIdentifier(_))
        ));
    }

    #[test]
    fn alignment() {
        let p = names(&["c1", "c2"]);
        let same = names(&["c1", "c2"]);
        let swapped = names(&["c2", "c1"]);
        assert!(check_column_alignment("alt", Some(&p), Some(&same)).is_ok());
        assert!(check_column_alignment("alt", Some(&p), None).is_ok());
        assert!(check_column_alignment("alt", None, Some(&swapped)).is_ok());
        assert!(matches!(
            check_column_alignment("alt", Some(&p), Some(&swapped)),
            Err(CyaneaError::ColumnMisalignment(_))
        ));
    }

    #[test]
    fn new_name_check() {
        let mut seen = HashSet::new();
        assert!(check_new_name("assay", &mut seen, "counts").is_ok());
        assert!(matches!(
            check_new_name("assay", &mut seen, "counts"),
            Err(CyaneaError::DuplicateName(_))
        ));
    }

    #[test]
    fn interval_order() {
        let mut iv = GenomicInterval::new("chr1", 5, 10).unwrap();
        assert!(check_interval(&iv).is_ok());
        iv.start = 10;
        assert!(matches!(
            check_interval(&iv),
            Err(CyaneaError::InvalidInput(_))
        ));
    }

    #[test]
    fn size_factor_column_must_be_numeric() {
        let mut t = AnnotationTable::new(2);
        assert!(check_reserved_columns(&t).is_ok());
        t.set_column(SIZE_FACTOR_COLUMN, vec![1.0, 2.0].into()).unwrap();
        assert!(check_reserved_columns(&t).is_ok());
        t.set_column(SIZE_FACTOR_COLUMN, vec!["a", "b"].into()).unwrap();
        let err = check_reserved_columns(&t).unwrap_err();
        assert!(matches!(err, CyaneaError::InvalidInput(_)));
        assert!(err.to_string().contains("character"));
    }

    #[test]
    fn make_unique_suffixes_repeats() {
        assert_eq!(
            make_unique(names(&["a", "b", "a", "a"])),
            names(&["a", "b", "a.1", "a.2"])
        );
    }

    #[test]
    fn make_unique_skips_taken_suffix() {
        assert_eq!(
            make_unique(names(&["a", "a.1", "a"])),
            names(&["a", "a.1", "a.2"])
        );
    }

    #[test]
    fn make_unique_is_identity_without_repeats() {
        let input = names(&["x", "y", "z"]);
        assert_eq!(make_unique(input.clone()), input);
    }
}
