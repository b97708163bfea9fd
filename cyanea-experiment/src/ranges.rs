//! Genomic coordinates attached to features.
//!
//! [`RowRanges`] holds one list of [`GenomicInterval`]s per feature, like a
//! `GRangesList` in Bioconductor. A feature may have no ranges at all (an
//! unplaced transcript, a spike-in). Coordinates are 0-based, half-open
//! `[start, end)`.

use core::fmt;

use cyanea_core::{Result, Summarizable};

use crate::matrix::check_indices;
use crate::validate::check_interval;

/// Strand orientation on a reference genome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strand {
    Forward,
    Reverse,
    #[default]
    Unknown,
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Forward => write!(f, "+"),
            Strand::Reverse => write!(f, "-"),
            Strand::Unknown => write!(f, "*"),
        }
    }
}

/// A half-open interval `[start, end)` on a chromosome (0-based).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenomicInterval {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    pub strand: Strand,
}

impl GenomicInterval {
    /// Create a new interval on the unknown strand.
    ///
    /// Returns an error if `start >= end`.
    pub fn new(chrom: impl Into<String>, start: u64, end: u64) -> Result<Self> {
        Self::with_strand(chrom, start, end, Strand::Unknown)
    }

    /// Create a new interval with an explicit strand.
    pub fn with_strand(
        chrom: impl Into<String>,
        start: u64,
        end: u64,
        strand: Strand,
    ) -> Result<Self> {
        let interval = Self {
            chrom: chrom.into(),
            start,
            end,
            strand,
        };
        check_interval(&interval)?;
        Ok(interval)
    }

    /// Length in bases; zero when `start >= end`.
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Always false for a constructed interval.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Whether this interval overlaps `other` on the same chromosome.
    pub fn overlaps(&self, other: &GenomicInterval) -> bool {
        self.chrom == other.chrom && self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for GenomicInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}:{}", self.chrom, self.start, self.end, self.strand)
    }
}

/// Per-feature genomic ranges.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowRanges {
    ranges: Vec<Vec<GenomicInterval>>,
}

impl RowRanges {
    /// `n` features, none of them placed.
    pub fn empty(n: usize) -> Self {
        Self {
            ranges: vec![Vec::new(); n],
        }
    }

    /// One interval per feature.
    pub fn from_intervals(intervals: Vec<GenomicInterval>) -> Self {
        Self {
            ranges: intervals.into_iter().map(|iv| vec![iv]).collect(),
        }
    }

    /// Arbitrary interval lists per feature (exons of a gene, for example).
    pub fn from_lists(ranges: Vec<Vec<GenomicInterval>>) -> Self {
        Self { ranges }
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Whether there are no features.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Intervals of feature `i`.
    pub fn get(&self, i: usize) -> Option<&[GenomicInterval]> {
        self.ranges.get(i).map(Vec::as_slice)
    }

    /// Iterate over per-feature interval lists.
    pub fn iter(&self) -> impl Iterator<Item = &[GenomicInterval]> + '_ {
        self.ranges.iter().map(Vec::as_slice)
    }

    /// Smallest interval covering every range of feature `i`, if they all
    /// sit on one chromosome.
    pub fn span(&self, i: usize) -> Option<GenomicInterval> {
        let list = self.ranges.get(i)?;
        let first = list.first()?;
        if list.iter().any(|iv| iv.chrom != first.chrom) {
            return None;
        }
        let start = list.iter().map(|iv| iv.start).min()?;
        let end = list.iter().map(|iv| iv.end).max()?;
        let strand = if list.iter().all(|iv| iv.strand == first.strand) {
            first.strand
        } else {
            Strand::Unknown
        };
        Some(GenomicInterval {
            chrom: first.chrom.clone(),
            start,
            end,
            strand,
        })
    }

    /// Features whose ranges overlap `query`.
    pub fn overlapping(&self, query: &GenomicInterval) -> Vec<usize> {
        self.ranges
            .iter()
            .enumerate()
            .filter(|(_, list)| list.iter().any(|iv| iv.overlaps(query)))
            .map(|(i, _)| i)
            .collect()
    }

    /// Check every interval has `start < end`.
    pub fn validate(&self) -> Result<()> {
        self.ranges.iter().flatten().try_for_each(check_interval)
    }

    /// Select features by position. Indices may repeat.
    pub fn take(&self, indices: &[usize]) -> Result<RowRanges> {
        check_indices("row", indices, self.ranges.len())?;
        Ok(RowRanges {
            ranges: indices.iter().map(|&i| self.ranges[i].clone()).collect(),
        })
    }
}

impl Summarizable for RowRanges {
    fn summary(&self) -> String {
        let placed = self.ranges.iter().filter(|l| !l.is_empty()).count();
        format!("RowRanges: {} features, {} placed", self.ranges.len(), placed)
    }
}
