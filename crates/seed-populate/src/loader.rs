//! Batched loading with per-row failure tolerance.

use crate::sink::{SeedSink, SinkError};
use seed_core::{SeedRow, TableDefinition};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Default rows per commit.
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// A row the sink refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    pub index: u64,
    pub message: String,
}

/// Outcome of loading one table.
#[derive(Debug, Clone, Default)]
pub struct LoadSummary {
    /// Rows handed to the sink.
    pub attempted: u64,
    /// Rows the sink accepted.
    pub succeeded: u64,
    /// Rows the sink refused, in order.
    pub failures: Vec<RowFailure>,
    /// Commits issued.
    pub commits: u64,
    /// Time spent loading.
    pub duration: Duration,
}

impl LoadSummary {
    /// Number of refused rows.
    pub fn failed(&self) -> u64 {
        self.failures.len() as u64
    }

    /// Calculate rows per second.
    pub fn rows_per_second(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.succeeded as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// How rows are sent to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// One insert per row, commit every `batch_size` attempted rows.
    Batched,
    /// One parameterized batch for all rows, one commit.
    AllAtOnce,
}

/// Writes rows to a sink, committing on fixed batch boundaries.
#[derive(Debug, Clone, Copy)]
pub struct BulkLoader {
    batch_size: usize,
}

impl Default for BulkLoader {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl BulkLoader {
    /// Create a loader; a batch size of zero is treated as one.
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Load `rows` in the given mode.
    pub async fn load_with<S: SeedSink + ?Sized>(
        &self,
        mode: LoadMode,
        sink: &mut S,
        table: &TableDefinition,
        rows: &[SeedRow],
    ) -> Result<LoadSummary, SinkError> {
        match mode {
            LoadMode::Batched => self.load(sink, table, rows).await,
            LoadMode::AllAtOnce => self.load_all_at_once(sink, table, rows).await,
        }
    }

    /// Insert row by row, committing after every `batch_size` attempted rows
    /// and once more for a trailing partial batch.
    ///
    /// A refused row is logged and skipped. Only a failed commit aborts.
    pub async fn load<S: SeedSink + ?Sized>(
        &self,
        sink: &mut S,
        table: &TableDefinition,
        rows: &[SeedRow],
    ) -> Result<LoadSummary, SinkError> {
        let start = Instant::now();
        let mut summary = LoadSummary::default();

        info!(
            "Loading {} rows into '{}' (batch size: {})",
            rows.len(),
            table.name,
            self.batch_size
        );

        for row in rows {
            summary.attempted += 1;
            match sink.insert_row(table, row).await {
                Ok(()) => summary.succeeded += 1,
                Err(e) => {
                    warn!("Row {} of '{}' failed: {}", row.index, table.name, e);
                    summary.failures.push(RowFailure {
                        index: row.index,
                        message: e.to_string(),
                    });
                }
            }

            if summary.attempted % self.batch_size as u64 == 0 {
                sink.commit().await?;
                summary.commits += 1;
                debug!(
                    "Batch {} committed: {} rows attempted so far",
                    summary.commits, summary.attempted
                );
            }
        }

        if summary.attempted % self.batch_size as u64 != 0 {
            sink.commit().await?;
            summary.commits += 1;
            debug!("Final commit for {} trailing rows", summary.attempted % self.batch_size as u64);
        }

        summary.duration = start.elapsed();
        Ok(summary)
    }

    /// Send every row in one parameterized batch and commit once.
    ///
    /// If the batch is refused, every row is recorded as failed.
    pub async fn load_all_at_once<S: SeedSink + ?Sized>(
        &self,
        sink: &mut S,
        table: &TableDefinition,
        rows: &[SeedRow],
    ) -> Result<LoadSummary, SinkError> {
        let start = Instant::now();
        let mut summary = LoadSummary {
            attempted: rows.len() as u64,
            ..Default::default()
        };
        if rows.is_empty() {
            return Ok(summary);
        }

        info!("Loading {} rows into '{}' in one batch", rows.len(), table.name);

        match sink.insert_batch(table, rows).await {
            Ok(()) => {
                sink.commit().await?;
                summary.commits = 1;
                summary.succeeded = rows.len() as u64;
            }
            Err(e) => {
                warn!("Batch insert into '{}' failed: {}", table.name, e);
                let message = e.to_string();
                summary.failures = rows
                    .iter()
                    .map(|row| RowFailure {
                        index: row.index,
                        message: message.clone(),
                    })
                    .collect();
            }
        }

        summary.duration = start.elapsed();
        Ok(summary)
    }
}
