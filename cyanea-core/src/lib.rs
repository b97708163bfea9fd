//! Shared primitives and traits for the Cyanea bioinformatics ecosystem.
//!
//! `cyanea-core` provides the foundation that all other Cyanea crates build on:
//!
//! - **Error types** — [`CyaneaError`] and [`Result`] for structured error handling
//! - **Traits** — Core abstractions like [`Summarizable`] and [`Dimensioned`]

pub mod error;
pub mod traits;

pub use error::{CyaneaError, Result};
pub use traits::*;
