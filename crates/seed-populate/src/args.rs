//! Common CLI argument definitions shared by the populate commands.

use crate::loader::DEFAULT_BATCH_SIZE;
use chrono::NaiveDate;
use clap::Args;
use std::path::PathBuf;

/// Common arguments shared by `populate` and `generate`.
#[derive(Args, Clone, Debug)]
pub struct CommonPopulateArgs {
    /// Random seed for deterministic generation (same seed = same data)
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Rows per commit when loading row by row
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Date relative date windows end at (YYYY-MM-DD, default: today)
    #[arg(long)]
    pub reference_date: Option<NaiveDate>,

    /// Path to a seed profile YAML file (row counts, probabilities, tree)
    #[arg(long, short = 'p')]
    pub profile: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        common: CommonPopulateArgs,
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["biz-seed"]).unwrap();
        assert_eq!(cli.common.seed, 42);
        assert_eq!(cli.common.batch_size, DEFAULT_BATCH_SIZE);
        assert!(cli.common.reference_date.is_none());
    }

    #[test]
    fn test_database_flags_are_not_common() {
        assert!(Cli::try_parse_from(["biz-seed", "--dry-run"]).is_err());
    }
}
