//! SQL Server implementation of [`SeedSink`].

use crate::args::MssqlConnectionArgs;
use crate::error::{MssqlSinkError, INVALID_OBJECT_NAME};
use crate::value::{from_column, to_param};
use async_trait::async_trait;
use seed_core::{SeedRow, SeedValue, SqlServerDdl, TableDefinition};
use seed_populate::{SeedSink, SinkError};
use tiberius::{Client, ToSql};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::{debug, info};

/// Parameters SQL Server accepts in one request.
pub const MAX_PARAMETERS: usize = 2099;

/// Rows a single `INSERT ... VALUES` may carry.
pub const MAX_VALUES_ROWS: usize = 1000;

/// Rows per multi-row `INSERT` for a table with `columns` insert columns.
pub fn rows_per_statement(columns: usize) -> usize {
    (MAX_PARAMETERS / columns.max(1)).clamp(1, MAX_VALUES_ROWS)
}

type TdsClient = Client<Compat<TcpStream>>;

/// A SQL Server connection holding one open transaction at a time.
pub struct MssqlSink {
    client: Option<TdsClient>,
    ddl: SqlServerDdl,
    in_transaction: bool,
}

impl MssqlSink {
    /// Connect and authenticate.
    pub async fn connect(args: &MssqlConnectionArgs) -> Result<Self, SinkError> {
        info!("Connecting to SQL Server at {}", args);
        let config = args.config();

        let tcp = TcpStream::connect(config.get_addr())
            .await
            .map_err(|e| SinkError::Connection(format!("{}: {}", config.get_addr(), e)))?;
        tcp.set_nodelay(true)
            .map_err(|e| SinkError::Connection(e.to_string()))?;

        let mut client = Client::connect(config, tcp.compat_write())
            .await
            .map_err(|e| SinkError::Connection(e.to_string()))?;

        // Statement errors roll back the statement, not the transaction.
        client
            .execute("SET XACT_ABORT OFF", &[])
            .await
            .map_err(|e| SinkError::Connection(e.to_string()))?;

        info!("Connected to SQL Server database '{}'", args.database);
        Ok(Self {
            client: Some(client),
            ddl: SqlServerDdl,
            in_transaction: false,
        })
    }

    fn client(&mut self) -> Result<&mut TdsClient, MssqlSinkError> {
        self.client.as_mut().ok_or(MssqlSinkError::Closed)
    }

    async fn execute(&mut self, sql: &str) -> Result<(), MssqlSinkError> {
        debug!("Executing: {}", sql);
        self.client()?.execute(sql, &[]).await?;
        Ok(())
    }

    async fn begin_if_needed(&mut self) -> Result<(), MssqlSinkError> {
        if !self.in_transaction {
            self.execute("BEGIN TRANSACTION").await?;
            self.in_transaction = true;
        }
        Ok(())
    }

    async fn insert(
        &mut self,
        table: &TableDefinition,
        rows: &[SeedRow],
    ) -> Result<(), MssqlSinkError> {
        let sql = if rows.len() == 1 {
            self.ddl.insert_statement(table)
        } else {
            self.ddl.insert_many_statement(table, rows.len())
        };
        let params: Vec<Box<dyn ToSql>> = rows
            .iter()
            .flat_map(|row| {
                table
                    .insert_columns()
                    .zip(row.values.iter())
                    .map(|(column, value)| to_param(value, &column.column_type))
            })
            .collect();
        let refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
        self.client()?.execute(sql, &refs).await?;
        Ok(())
    }

    fn classify(table: &str, e: MssqlSinkError) -> SinkError {
        if e.server_code() == Some(INVALID_OBJECT_NAME) {
            SinkError::TableNotFound(table.to_string())
        } else {
            e.into()
        }
    }
}

#[async_trait]
impl SeedSink for MssqlSink {
    async fn recreate_table(&mut self, table: &TableDefinition) -> Result<(), SinkError> {
        info!("Dropping table: {}", table.name);
        let drop = self.ddl.drop_table_if_exists(&table.name);
        self.execute(&drop).await?;

        info!("Creating table: {}", table.name);
        let create = self.ddl.create_table(table);
        self.execute(&create).await?;
        Ok(())
    }

    async fn ensure_table(&mut self, table: &TableDefinition) -> Result<(), SinkError> {
        let sql = self.ddl.create_table_if_missing(table);
        self.execute(&sql).await?;
        Ok(())
    }

    async fn truncate_table(&mut self, table: &TableDefinition) -> Result<(), SinkError> {
        info!("Truncating table: {}", table.name);
        let sql = self.ddl.truncate_table(&table.name);
        self.execute(&sql)
            .await
            .map_err(|e| Self::classify(&table.name, e))
    }

    async fn insert_row(
        &mut self,
        table: &TableDefinition,
        row: &SeedRow,
    ) -> Result<(), SinkError> {
        table.validate_row(row)?;
        self.begin_if_needed().await?;
        self.insert(table, std::slice::from_ref(row))
            .await
            .map_err(|e| match e.server_code() {
                Some(INVALID_OBJECT_NAME) => SinkError::TableNotFound(table.name.clone()),
                Some(_) => SinkError::RowRejected(e.to_string()),
                None => e.into(),
            })
    }

    async fn insert_batch(
        &mut self,
        table: &TableDefinition,
        rows: &[SeedRow],
    ) -> Result<(), SinkError> {
        for row in rows {
            table.validate_row(row)?;
        }
        self.begin_if_needed().await?;

        let chunk_size = rows_per_statement(table.insert_columns().count());
        for chunk in rows.chunks(chunk_size) {
            if let Err(e) = self.insert(table, chunk).await {
                // All or nothing: undo the chunks already sent.
                self.execute("IF @@TRANCOUNT > 0 ROLLBACK TRANSACTION").await?;
                self.in_transaction = false;
                return Err(Self::classify(&table.name, e));
            }
        }
        Ok(())
    }

    async fn fetch_rows(
        &mut self,
        table: &str,
        columns: &[&str],
        distinct: bool,
    ) -> Result<Vec<Vec<SeedValue>>, SinkError> {
        let sql = self.ddl.select_columns(table, columns, distinct);
        debug!("Querying: {}", sql);

        let rows = async {
            let client = self.client()?;
            let rows = client.query(sql, &[]).await?.into_first_result().await?;
            Ok::<_, MssqlSinkError>(rows)
        }
        .await
        .map_err(|e| Self::classify(table, e))?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let values = row
                .into_iter()
                .map(|data| from_column(&data))
                .collect::<Result<Vec<_>, _>>()?;
            result.push(values);
        }
        Ok(result)
    }

    async fn count_rows(&mut self, table: &str) -> Result<u64, SinkError> {
        let sql = self.ddl.count_rows(table);
        let count = async {
            let client = self.client()?;
            let row = client.query(sql, &[]).await?.into_row().await?;
            Ok::<_, MssqlSinkError>(row.and_then(|r| r.get::<i32, _>(0)).unwrap_or(0))
        }
        .await
        .map_err(|e| Self::classify(table, e))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn commit(&mut self) -> Result<(), SinkError> {
        if self.in_transaction {
            self.execute("IF @@TRANCOUNT > 0 COMMIT TRANSACTION").await?;
            self.in_transaction = false;
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<(), SinkError> {
        self.commit().await?;
        if let Some(client) = self.client.take() {
            client
                .close()
                .await
                .map_err(|e| SinkError::Connection(e.to_string()))?;
            info!("SQL Server connection closed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seed_core::SeedTable;

    #[test]
    fn test_rows_per_statement_respects_parameter_limit() {
        for table in SeedTable::ALL {
            let columns = table.definition().insert_columns().count();
            let rows = rows_per_statement(columns);
            assert!(rows * columns <= MAX_PARAMETERS, "{table}");
            assert!(rows <= MAX_VALUES_ROWS);
        }
    }

    #[test]
    fn test_rows_per_statement_small_tables() {
        assert_eq!(rows_per_statement(1), MAX_VALUES_ROWS);
        assert_eq!(rows_per_statement(56), 37);
        assert_eq!(rows_per_statement(0), MAX_VALUES_ROWS);
    }
}
