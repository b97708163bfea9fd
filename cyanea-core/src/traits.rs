//! Core trait definitions for the Cyanea ecosystem.
//!
//! These traits define the contracts that domain types implement across crates.

/// A type that can produce a summary of its contents.
pub trait Summarizable {
    /// A one-line summary suitable for display.
    fn summary(&self) -> String;
}

/// A type with an extent along two axes (rows × columns).
pub trait Dimensioned {
    /// `(n_rows, n_cols)`.
    fn dim(&self) -> (usize, usize);

    /// Number of rows.
    fn n_rows(&self) -> usize {
        self.dim().0
    }

    /// Number of columns.
    fn n_cols(&self) -> usize {
        self.dim().1
    }
}
