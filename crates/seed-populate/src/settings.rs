//! Run settings for a seeding workflow.

use crate::loader::DEFAULT_BATCH_SIZE;
use chrono::NaiveDate;
use seed_core::SeedTable;
use seed_generator::{MunicipalityAnchor, TreatmentOptions};
use serde::{Deserialize, Serialize};

fn default_count(table: SeedTable) -> usize {
    table.default_row_count().unwrap_or_default() as usize
}

/// Row counts for the tables whose size is not derived from another table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowCounts {
    pub accounts: usize,
    pub municipalities: usize,
    pub opportunities: usize,
    pub hotlist: usize,
}

impl Default for RowCounts {
    fn default() -> Self {
        Self {
            accounts: default_count(SeedTable::Accounts),
            municipalities: default_count(SeedTable::Municipalities),
            opportunities: default_count(SeedTable::Opportunities),
            hotlist: default_count(SeedTable::Hotlist),
        }
    }
}

/// Everything a [`SeedPopulator`](crate::SeedPopulator) needs besides the
/// sink and the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulateSettings {
    /// Run seed; each table derives its own stream from it.
    pub seed: u64,
    /// Date relative windows end at.
    pub reference_date: NaiveDate,
    /// Rows per commit for row-by-row loads.
    pub batch_size: usize,
    pub counts: RowCounts,
    pub treatments: TreatmentOptions,
    /// Supervision key priority municipalities are filed under.
    pub municipality_supervision: i32,
}

impl PopulateSettings {
    /// Defaults for a run with the given seed and reference date.
    pub fn new(seed: u64, reference_date: NaiveDate) -> Self {
        Self {
            seed,
            reference_date,
            batch_size: DEFAULT_BATCH_SIZE,
            counts: RowCounts::default(),
            treatments: TreatmentOptions::default(),
            municipality_supervision: MunicipalityAnchor::DEFAULT_SUPERVISION,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_counts() {
        let counts = RowCounts::default();
        assert_eq!(counts.accounts, 2500);
        assert_eq!(counts.municipalities, 20);
        assert_eq!(counts.hotlist, 20);
    }
}
