//! Core types for the biz-seed fixture loader.
//!
//! This crate provides the foundational types shared by the generator and
//! the populators:
//!
//! - [`SqlType`] - Column types of the SQL Server tables being seeded
//! - [`SeedValue`] - Generated values, in insert order
//! - [`SeedRow`] - One generated row bound to a table
//! - [`TableDefinition`] - Fixed column layout of a seeded table
//! - [`SeedTable`] - The catalog of tables this tool knows how to seed
//!
//! # Architecture
//!
//! ```text
//! seed-core (this crate)
//!    │
//!    ├─── seed-generator       (fixtures -> SeedRow)
//!    │
//!    ├─── seed-populate        (SeedSink, bulk loader, workflow)
//!    └─── seed-populate-mssql  (SeedValue -> tiberius parameters)
//! ```

pub mod catalog;
pub mod ddl;
pub mod schema;
pub mod types;
pub mod values;

// Re-exports for convenience
pub use catalog::{ResetMode, SeedTable};
pub use ddl::SqlServerDdl;
pub use schema::{ColumnDefinition, SchemaError, SeedRow, TableDefinition};
pub use types::SqlType;
pub use values::SeedValue;
