//! SQL Server sink for biz-seed.
//!
//! Writes through `tiberius` over a single TCP connection. Row inserts run
//! inside an explicit transaction that [`MssqlSink::commit`](seed_populate::SeedSink::commit)
//! closes; NULL parameters are typed from the column definition.

pub mod args;
pub mod error;
pub mod sink;
pub mod value;

pub use args::{MssqlConnectionArgs, MssqlPopulateArgs};
pub use error::MssqlSinkError;
pub use sink::MssqlSink;
