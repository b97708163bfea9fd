//! Row and column selectors.
//!
//! A [`Selector`] is resolved against one axis of an experiment into an
//! ordered list of positions. Every slot aligned to that axis is then sliced
//! with the same positions.

use std::collections::{HashMap, HashSet};
use std::fmt;

use cyanea_core::{CyaneaError, Result};

use crate::config::{DuplicatePolicy, SubsetConfig};
use crate::matrix::check_indices;
use crate::validate::check_len;

/// Which axis a selector applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Features (assay rows, `rowData` records).
    Row,
    /// Cells/samples (assay columns, `colData` records).
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => write!(f, "row"),
            Axis::Column => write!(f, "column"),
        }
    }
}

/// A selection along one axis.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Selector {
    /// Every position, in order.
    #[default]
    All,
    /// Explicit positions, in the order given.
    Positions(Vec<usize>),
    /// A keep/drop flag per position; must match the axis length.
    Mask(Vec<bool>),
    /// Identifiers, resolved through the axis names.
    Names(Vec<String>),
}

impl Selector {
    /// Select by identifiers.
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selector::Names(names.into_iter().map(Into::into).collect())
    }

    /// Resolve to positions along an axis of length `len`.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for a position `>= len`
    /// - `DimensionMismatch` for a mask whose length is not `len`
    /// - `UnknownIdentifier` for a name the axis does not have (or when the
    ///   axis carries no names)
    /// - `DuplicateIdentifier` for a repeated position under
    ///   [`DuplicatePolicy::Reject`]
    pub fn resolve(
        &self,
        axis: Axis,
        len: usize,
        names: Option<&[String]>,
        config: &SubsetConfig,
    ) -> Result<Vec<usize>> {
        let positions = match self {
            Selector::All => (0..len).collect(),
            Selector::Positions(p) => {
                check_indices(&axis.to_string(), p, len)?;
                p.clone()
            }
            Selector::Mask(mask) => {
                check_len(&format!("{axis} mask"), len, mask.len())?;
                mask.iter()
                    .enumerate()
                    .filter_map(|(i, &keep)| keep.then_some(i))
                    .collect()
            }
            Selector::Names(wanted) => resolve_names(axis, wanted, names)?,
        };

        if config.duplicates == DuplicatePolicy::Reject {
            let mut seen = HashSet::with_capacity(positions.len());
            if let Some(&dup) = positions.iter().find(|&&p| !seen.insert(p)) {
                return Err(CyaneaError::DuplicateIdentifier(format!(
                    "{axis} {dup} selected more than once"
                )));
            }
        }
        Ok(positions)
    }
}

fn resolve_names(axis: Axis, wanted: &[String], names: Option<&[String]>) -> Result<Vec<usize>> {
    let Some(names) = names else {
        return match wanted.first() {
            Some(first) => Err(CyaneaError::UnknownIdentifier(format!(
                "'{first}': {axis}s have no identifiers"
            ))),
            None => Ok(Vec::new()),
        };
    };
    let index: HashMap<&str, usize> = names
        .iter()
        .enumerate()
        .map(|(i, n)| (n.as_str(), i))
        .collect();
    wanted
        .iter()
        .map(|w| {
            index
                .get(w.as_str())
                .copied()
                .ok_or_else(|| CyaneaError::UnknownIdentifier(format!("{axis} '{w}'")))
        })
        .collect()
}

impl From<Vec<usize>> for Selector {
    fn from(p: Vec<usize>) -> Self {
        Selector::Positions(p)
    }
}

impl From<&[usize]> for Selector {
    fn from(p: &[usize]) -> Self {
        Selector::Positions(p.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for Selector {
    fn from(p: [usize; N]) -> Self {
        Selector::Positions(p.to_vec())
    }
}

impl From<std::ops::Range<usize>> for Selector {
    fn from(r: std::ops::Range<usize>) -> Self {
        Selector::Positions(r.collect())
    }
}

impl From<Vec<bool>> for Selector {
    fn from(m: Vec<bool>) -> Self {
        Selector::Mask(m)
    }
}

impl From<Vec<String>> for Selector {
    fn from(n: Vec<String>) -> Self {
        Selector::Names(n)
    }
}

impl From<&[&str]> for Selector {
    fn from(n: &[&str]) -> Self {
        Selector::names(n.iter().copied())
    }
}
