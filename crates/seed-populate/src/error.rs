//! Error types for the seeding workflow.

use crate::sink::SinkError;
use seed_core::SeedTable;
use seed_generator::GeneratorError;
use thiserror::Error;

/// Errors that abort the seeding of a table.
///
/// Per-row insertion failures never surface here; they are recorded in the
/// load summary.
#[derive(Error, Debug)]
pub enum PopulateError {
    /// Preparing the table failed (connection, DDL).
    #[error("Setup of {table} failed: {source}")]
    Setup {
        table: SeedTable,
        #[source]
        source: SinkError,
    },

    /// A table this one is derived from is missing, unreadable or empty.
    #[error("Cannot populate {table}: {message}")]
    Reference { table: SeedTable, message: String },

    /// Generator error.
    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),

    /// Committing loaded rows failed.
    #[error("Loading {table} failed: {source}")]
    Load {
        table: SeedTable,
        #[source]
        source: SinkError,
    },
}
