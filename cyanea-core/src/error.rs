//! Structured error types for the Cyanea ecosystem.

use thiserror::Error;

/// Unified error type for all Cyanea operations.
#[derive(Debug, Error)]
pub enum CyaneaError {
    /// Invalid input (bad arguments, out-of-range values)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A matrix, table or vector disagrees with the dimensions it must match.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Named lookup on a required slot found nothing.
    #[error("not found: {0}")]
    NotFound(String),

    /// A selector referenced a row or column identifier that does not exist.
    #[error("unknown identifier: {0}")]
    UnknownIdentifier(String),

    /// Two entries of a named slot share a name.
    #[error("duplicate name: {0}")]
    DuplicateName(String),

    /// Two rows or columns share an identifier.
    #[error("duplicate identifier: {0}")]
    DuplicateIdentifier(String),

    /// A nested experiment's column identifiers disagree with its parent's.
    #[error("column misalignment: {0}")]
    ColumnMisalignment(String),

    /// Nesting an experiment would make it contain itself.
    #[error("cyclic reference: {0}")]
    CyclicReference(String),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the Cyanea ecosystem.
pub type Result<T> = std::result::Result<T, CyaneaError>;
