//! Command-line seeding targets.

use clap::ValueEnum;
use seed_core::SeedTable;
use std::fmt;

/// What a `populate` or `generate` run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeedTarget {
    Accounts,
    Activity,
    Stores,
    Municipalities,
    Treatments,
    Opportunities,
    Hotlist,
    /// Every table, in dependency order
    All,
}

impl SeedTarget {
    /// The table this target names, `None` for `all`.
    pub fn table(&self) -> Option<SeedTable> {
        match self {
            Self::Accounts => Some(SeedTable::Accounts),
            Self::Activity => Some(SeedTable::Activity),
            Self::Stores => Some(SeedTable::Stores),
            Self::Municipalities => Some(SeedTable::Municipalities),
            Self::Treatments => Some(SeedTable::Treatments),
            Self::Opportunities => Some(SeedTable::Opportunities),
            Self::Hotlist => Some(SeedTable::Hotlist),
            Self::All => None,
        }
    }

    /// Tables written by `populate`.
    pub fn tables(&self) -> Vec<SeedTable> {
        match self.table() {
            Some(table) => vec![table],
            None => SeedTable::ALL.to_vec(),
        }
    }

    /// Tables `generate` has to seed so every reference read succeeds.
    pub fn tables_with_prerequisites(&self) -> Vec<SeedTable> {
        match self.table() {
            Some(table) => table.with_prerequisites(),
            None => SeedTable::ALL.to_vec(),
        }
    }
}

impl fmt::Display for SeedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.table() {
            Some(table) => write!(f, "{table}"),
            None => write!(f, "all tables"),
        }
    }
}
