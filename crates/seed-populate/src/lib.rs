//! Sink abstraction, bulk loader and seeding workflow.
//!
//! ```text
//! SeedPopulator
//!     │  reset table (drop+create | create-if-missing+truncate)
//!     │  read reference keys            ──► SeedSink::fetch_rows
//!     │  generate records (seed-generator)
//!     │  BulkLoader                     ──► SeedSink::insert_row / insert_batch
//!     │                                     SeedSink::commit every B rows
//!     └─ verify (counts, hierarchy fan-in, cross-field rules)
//! ```
//!
//! Sinks: [`MemorySink`] here, the SQL Server sink in `seed-populate-mssql`.

pub mod args;
pub mod error;
pub mod loader;
pub mod memory;
pub mod populator;
pub mod settings;
pub mod sink;

pub use args::CommonPopulateArgs;
pub use error::PopulateError;
pub use loader::{BulkLoader, LoadMode, LoadSummary, RowFailure, DEFAULT_BATCH_SIZE};
pub use memory::{MemorySink, MemoryTable};
pub use populator::{SeedPopulator, TableReport, FALLBACK_STORE_KEYS};
pub use settings::{PopulateSettings, RowCounts};
pub use sink::{SeedSink, SinkError};
