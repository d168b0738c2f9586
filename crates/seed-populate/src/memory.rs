//! In-memory sink used for `--dry-run`, `generate` and tests.

use crate::sink::{SeedSink, SinkError};
use async_trait::async_trait;
use seed_core::{SchemaError, SeedRow, SeedValue, SqlServerDdl, SqlType, TableDefinition};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;
use uuid::Uuid;

/// Predicate deciding whether the sink rejects a row, with the reason.
pub type RowRejector = Box<dyn Fn(&SeedRow) -> Option<String> + Send + Sync>;

/// Rows of one table, full column layout.
#[derive(Debug, Clone)]
pub struct MemoryTable {
    definition: TableDefinition,
    rows: Vec<Vec<SeedValue>>,
}

impl MemoryTable {
    /// Table layout.
    pub fn definition(&self) -> &TableDefinition {
        &self.definition
    }

    /// Stored rows, one value per column in DDL order.
    pub fn rows(&self) -> &[Vec<SeedValue>] {
        &self.rows
    }

    fn position(&self, column: &str) -> Result<usize, SchemaError> {
        self.definition
            .columns
            .iter()
            .position(|c| c.name == column)
            .ok_or_else(|| SchemaError::ColumnNotFound {
                table: self.definition.name.clone(),
                column: column.to_string(),
            })
    }

    /// Expand an insert-ordered row to the full layout, filling
    /// server-defaulted columns the way SQL Server would.
    fn expand(&self, row: &SeedRow) -> Vec<SeedValue> {
        let mut values = row.values.iter();
        self.definition
            .columns
            .iter()
            .map(|column| {
                if column.is_insertable() {
                    values.next().cloned().unwrap_or(SeedValue::Null)
                } else if column.column_type == SqlType::UniqueIdentifier {
                    SeedValue::Uuid(Uuid::new_v4())
                } else {
                    SeedValue::Null
                }
            })
            .collect()
    }

    fn check_row(&self, row: &SeedRow, pending: &[Vec<SeedValue>]) -> Result<Vec<SeedValue>, SinkError> {
        self.definition.validate_row(row)?;
        let expanded = self.expand(row);
        let key_positions: Vec<usize> = self
            .definition
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.primary_key)
            .map(|(i, _)| i)
            .collect();
        if key_positions.is_empty() {
            return Ok(expanded);
        }
        let same_key = |other: &Vec<SeedValue>| key_positions.iter().all(|&i| other[i] == expanded[i]);
        if self.rows.iter().chain(pending).any(same_key) {
            return Err(SinkError::RowRejected(format!(
                "Violation of PRIMARY KEY constraint on '{}' for row {}",
                self.definition.name, row.index
            )));
        }
        Ok(expanded)
    }
}

/// A sink that keeps tables in memory and records its activity.
///
/// Enforces what the database would: the table must exist, arity and
/// NOT NULL must match, primary keys must be unique.
#[derive(Default)]
pub struct MemorySink {
    tables: BTreeMap<String, MemoryTable>,
    statements: Vec<String>,
    commits: usize,
    rejector: Option<RowRejector>,
    closed: bool,
}

impl std::fmt::Debug for MemorySink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySink")
            .field("tables", &self.tables)
            .field("statements", &self.statements)
            .field("commits", &self.commits)
            .field("rejector", &self.rejector.as_ref().map(|_| ".."))
            .field("closed", &self.closed)
            .finish()
    }
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject rows for which `rejector` returns a reason.
    pub fn with_rejector(
        mut self,
        rejector: impl Fn(&SeedRow) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.rejector = Some(Box::new(rejector));
        self
    }

    /// Stored table by name.
    pub fn table(&self, name: &str) -> Option<&MemoryTable> {
        self.tables.get(name)
    }

    /// DDL statements issued so far.
    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    /// Number of commits issued so far.
    pub fn commit_count(&self) -> usize {
        self.commits
    }

    /// Whether [`SeedSink::close`] was called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn table_mut(&mut self, name: &str) -> Result<&mut MemoryTable, SinkError> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| SinkError::TableNotFound(name.to_string()))
    }

    fn record(&mut self, statement: String) {
        debug!("Memory sink statement: {}", statement);
        self.statements.push(statement);
    }

    fn rejection(&self, row: &SeedRow) -> Option<String> {
        self.rejector.as_ref().and_then(|reject| reject(row))
    }
}

#[async_trait]
impl SeedSink for MemorySink {
    async fn recreate_table(&mut self, table: &TableDefinition) -> Result<(), SinkError> {
        let ddl = SqlServerDdl;
        self.record(ddl.drop_table_if_exists(&table.name));
        self.record(ddl.create_table(table));
        self.tables.insert(
            table.name.clone(),
            MemoryTable {
                definition: table.clone(),
                rows: Vec::new(),
            },
        );
        Ok(())
    }

    async fn ensure_table(&mut self, table: &TableDefinition) -> Result<(), SinkError> {
        self.record(SqlServerDdl.create_table_if_missing(table));
        self.tables
            .entry(table.name.clone())
            .or_insert_with(|| MemoryTable {
                definition: table.clone(),
                rows: Vec::new(),
            });
        Ok(())
    }

    async fn truncate_table(&mut self, table: &TableDefinition) -> Result<(), SinkError> {
        self.record(SqlServerDdl.truncate_table(&table.name));
        self.table_mut(&table.name)?.rows.clear();
        Ok(())
    }

    async fn insert_row(
        &mut self,
        table: &TableDefinition,
        row: &SeedRow,
    ) -> Result<(), SinkError> {
        if let Some(reason) = self.rejection(row) {
            return Err(SinkError::RowRejected(reason));
        }
        let stored = self.table_mut(&table.name)?;
        let expanded = stored.check_row(row, &[])?;
        stored.rows.push(expanded);
        Ok(())
    }

    async fn insert_batch(
        &mut self,
        table: &TableDefinition,
        rows: &[SeedRow],
    ) -> Result<(), SinkError> {
        if let Some(reason) = rows.iter().find_map(|row| self.rejection(row)) {
            return Err(SinkError::RowRejected(reason));
        }
        let stored = self.table_mut(&table.name)?;
        let mut accepted: Vec<Vec<SeedValue>> = Vec::with_capacity(rows.len());
        for row in rows {
            let expanded = stored.check_row(row, &accepted)?;
            accepted.push(expanded);
        }
        stored.rows.extend(accepted);
        Ok(())
    }

    async fn fetch_rows(
        &mut self,
        table: &str,
        columns: &[&str],
        distinct: bool,
    ) -> Result<Vec<Vec<SeedValue>>, SinkError> {
        let stored = self
            .tables
            .get(table)
            .ok_or_else(|| SinkError::TableNotFound(table.to_string()))?;
        let positions = columns
            .iter()
            .map(|c| stored.position(c))
            .collect::<Result<Vec<_>, _>>()?;

        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for row in &stored.rows {
            let projected: Vec<SeedValue> = positions.iter().map(|&i| row[i].clone()).collect();
            if distinct {
                let key: Vec<String> = projected.iter().map(|v| v.to_string()).collect();
                if !seen.insert(key) {
                    continue;
                }
            }
            result.push(projected);
        }
        Ok(result)
    }

    async fn count_rows(&mut self, table: &str) -> Result<u64, SinkError> {
        self.tables
            .get(table)
            .map(|t| t.rows.len() as u64)
            .ok_or_else(|| SinkError::TableNotFound(table.to_string()))
    }

    async fn commit(&mut self) -> Result<(), SinkError> {
        self.commits += 1;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), SinkError> {
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seed_core::{ResetMode, SeedTable};

    fn account_row(index: u64, key: i32) -> SeedRow {
        SeedRow::new(
            "TB_ESTR_CONTAS",
            index,
            vec![
                SeedValue::Int32(key),
                SeedValue::Null,
                SeedValue::Int32(1),
                SeedValue::Int32(2),
                SeedValue::Int32(3),
                SeedValue::Int32(4),
            ],
        )
    }

    #[tokio::test]
    async fn test_insert_requires_table() {
        let mut sink = MemorySink::new();
        let def = SeedTable::Accounts.definition();
        let err = sink.insert_row(&def, &account_row(0, 1)).await.unwrap_err();
        assert!(matches!(err, SinkError::TableNotFound(_)));
    }

    #[tokio::test]
    async fn test_primary_key_enforced() {
        let mut sink = MemorySink::new();
        let def = SeedTable::Accounts.definition();
        sink.recreate_table(&def).await.unwrap();
        sink.insert_row(&def, &account_row(0, 10_000)).await.unwrap();
        let err = sink.insert_row(&def, &account_row(1, 10_000)).await.unwrap_err();
        assert!(matches!(err, SinkError::RowRejected(_)));
        assert_eq!(sink.count_rows("TB_ESTR_CONTAS").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_batch_is_all_or_nothing() {
        let mut sink = MemorySink::new();
        let def = SeedTable::Accounts.definition();
        sink.recreate_table(&def).await.unwrap();
        let rows = vec![account_row(0, 1), account_row(1, 2), account_row(2, 1)];
        assert!(sink.insert_batch(&def, &rows).await.is_err());
        assert_eq!(sink.count_rows("TB_ESTR_CONTAS").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_fetch_distinct() {
        let mut sink = MemorySink::new();
        let def = SeedTable::Accounts.definition();
        sink.recreate_table(&def).await.unwrap();
        for (i, key) in [1, 2, 3].into_iter().enumerate() {
            sink.insert_row(&def, &account_row(i as u64, key)).await.unwrap();
        }
        let all = sink
            .fetch_rows("TB_ESTR_CONTAS", &["MES_M3"], false)
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
        let distinct = sink
            .fetch_rows("TB_ESTR_CONTAS", &["MES_M3"], true)
            .await
            .unwrap();
        assert_eq!(distinct, vec![vec![SeedValue::Int32(1)]]);
    }

    #[tokio::test]
    async fn test_reset_truncates_and_records_ddl() {
        let mut sink = MemorySink::new();
        let def = SeedTable::Municipalities.definition();
        sink.reset_table(&def, ResetMode::CreateIfMissingThenTruncate)
            .await
            .unwrap();
        assert!(sink.statements()[0].starts_with("IF OBJECT_ID('MUNICIPIOS_PRIORITARIOS', 'U') IS NULL"));
        assert_eq!(sink.statements()[1], "TRUNCATE TABLE [MUNICIPIOS_PRIORITARIOS];");
    }

    #[tokio::test]
    async fn test_server_default_uuid_filled() {
        let mut sink = MemorySink::new();
        let def = SeedTable::Treatments.definition();
        sink.recreate_table(&def).await.unwrap();
        let mut values = vec![SeedValue::Null; 12];
        values[2] = SeedValue::Int32(3_500_001);
        sink.insert_row(&def, &SeedRow::new(def.name.clone(), 0, values))
            .await
            .unwrap();
        let ids = sink
            .fetch_rows(&def.name, &["ID_TRATATIVA"], false)
            .await
            .unwrap();
        assert!(matches!(ids[0][0], SeedValue::Uuid(_)));
    }

    #[tokio::test]
    async fn test_rejector() {
        let mut sink = MemorySink::new().with_rejector(|row| {
            (row.index == 1).then(|| "simulated failure".to_string())
        });
        let def = SeedTable::Accounts.definition();
        sink.recreate_table(&def).await.unwrap();
        assert!(sink.insert_row(&def, &account_row(0, 1)).await.is_ok());
        assert!(sink.insert_row(&def, &account_row(1, 2)).await.is_err());
    }
}
