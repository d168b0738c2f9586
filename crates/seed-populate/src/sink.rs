//! The sink a seeding run writes to.

use async_trait::async_trait;
use seed_core::{ResetMode, SchemaError, SeedRow, SeedValue, TableDefinition};

/// Errors reported by a [`SeedSink`].
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// Could not reach or authenticate to the database.
    #[error("Connection error: {0}")]
    Connection(String),

    /// A statement was rejected.
    #[error("Statement failed: {0}")]
    Statement(String),

    /// The table does not exist.
    #[error("Table '{0}' does not exist")]
    TableNotFound(String),

    /// A row was rejected (constraint violation, conversion failure).
    #[error("Row rejected: {0}")]
    RowRejected(String),

    /// Schema error.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
}

/// A relational destination for generated rows.
///
/// Inserts are implicitly transactional: rows written since the last
/// [`commit`](SeedSink::commit) become durable when it is called. Reads see
/// the sink's own uncommitted rows.
#[async_trait]
pub trait SeedSink: Send {
    /// Drop the table if it exists, then create it.
    async fn recreate_table(&mut self, table: &TableDefinition) -> Result<(), SinkError>;

    /// Create the table only if it does not exist.
    async fn ensure_table(&mut self, table: &TableDefinition) -> Result<(), SinkError>;

    /// Remove every row from the table.
    async fn truncate_table(&mut self, table: &TableDefinition) -> Result<(), SinkError>;

    /// Insert one row.
    async fn insert_row(&mut self, table: &TableDefinition, row: &SeedRow)
        -> Result<(), SinkError>;

    /// Insert many rows as one parameterized batch; all or nothing.
    async fn insert_batch(
        &mut self,
        table: &TableDefinition,
        rows: &[SeedRow],
    ) -> Result<(), SinkError>;

    /// Read the given columns of every row, optionally de-duplicated.
    async fn fetch_rows(
        &mut self,
        table: &str,
        columns: &[&str],
        distinct: bool,
    ) -> Result<Vec<Vec<SeedValue>>, SinkError>;

    /// Number of rows in the table.
    async fn count_rows(&mut self, table: &str) -> Result<u64, SinkError>;

    /// Make every row written since the last commit durable.
    async fn commit(&mut self) -> Result<(), SinkError>;

    /// Release the connection.
    async fn close(&mut self) -> Result<(), SinkError>;

    /// Prepare a table according to its reset mode.
    async fn reset_table(
        &mut self,
        table: &TableDefinition,
        mode: ResetMode,
    ) -> Result<(), SinkError> {
        match mode {
            ResetMode::DropAndCreate => self.recreate_table(table).await,
            ResetMode::CreateIfMissingThenTruncate => {
                self.ensure_table(table).await?;
                self.truncate_table(table).await
            }
        }
    }
}

#[async_trait]
impl<S: SeedSink + ?Sized> SeedSink for Box<S> {
    async fn recreate_table(&mut self, table: &TableDefinition) -> Result<(), SinkError> {
        (**self).recreate_table(table).await
    }

    async fn ensure_table(&mut self, table: &TableDefinition) -> Result<(), SinkError> {
        (**self).ensure_table(table).await
    }

    async fn truncate_table(&mut self, table: &TableDefinition) -> Result<(), SinkError> {
        (**self).truncate_table(table).await
    }

    async fn insert_row(
        &mut self,
        table: &TableDefinition,
        row: &SeedRow,
    ) -> Result<(), SinkError> {
        (**self).insert_row(table, row).await
    }

    async fn insert_batch(
        &mut self,
        table: &TableDefinition,
        rows: &[SeedRow],
    ) -> Result<(), SinkError> {
        (**self).insert_batch(table, rows).await
    }

    async fn fetch_rows(
        &mut self,
        table: &str,
        columns: &[&str],
        distinct: bool,
    ) -> Result<Vec<Vec<SeedValue>>, SinkError> {
        (**self).fetch_rows(table, columns, distinct).await
    }

    async fn count_rows(&mut self, table: &str) -> Result<u64, SinkError> {
        (**self).count_rows(table).await
    }

    async fn commit(&mut self) -> Result<(), SinkError> {
        (**self).commit().await
    }

    async fn close(&mut self) -> Result<(), SinkError> {
        (**self).close().await
    }

    async fn reset_table(
        &mut self,
        table: &TableDefinition,
        mode: ResetMode,
    ) -> Result<(), SinkError> {
        (**self).reset_table(table, mode).await
    }
}
