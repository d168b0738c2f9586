//! Error types for fixture generation.

use crate::hierarchy::HierarchyError;
use seed_core::SeedTable;

/// Error type for generator operations.
///
/// Generation is pure computation; these only arise from requests that can
/// never be satisfied (too many unique keys, no reference rows).
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// More unique codes requested than the code space holds
    #[error("Cannot generate {requested} unique codes for {table}: only {available} exist")]
    CodeSpaceExhausted {
        table: SeedTable,
        requested: usize,
        available: usize,
    },

    /// A table that must be derived from reference rows got none
    #[error("No reference rows available to generate {table}")]
    EmptyReference { table: SeedTable },

    /// Supervision key is not a leaf of the organizational tree
    #[error("Supervision key {0} is not part of the organizational tree")]
    UnknownSupervision(i32),

    /// Hierarchy error
    #[error("Hierarchy error: {0}")]
    Hierarchy(#[from] HierarchyError),
}
