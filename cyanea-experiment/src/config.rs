//! Options controlling subsetting.

/// What to do when a selector names the same row or column twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DuplicatePolicy {
    /// Copy the row/column once per occurrence. Repeated identifiers get
    /// `.1`, `.2`, ... suffixes so each axis stays uniquely named.
    #[default]
    Replicate,
    /// Fail with `DuplicateIdentifier`.
    Reject,
}

/// Configuration for [`subset_with`](crate::SummarizedExperiment::subset_with).
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubsetConfig {
    /// Handling of repeated positions (default: replicate).
    pub duplicates: DuplicatePolicy,
}

impl SubsetConfig {
    /// A config that refuses repeated positions.
    pub fn strict() -> Self {
        Self {
            duplicates: DuplicatePolicy::Reject,
        }
    }
}
