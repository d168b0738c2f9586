//! Command-line interface for biz-seed
//!
//! # Usage Examples
//!
//! ```bash
//! # Seed every table into SQL Server
//! MSSQL_PASSWORD=... biz-seed populate all \
//!   --mssql-host localhost --mssql-database estrutura --mssql-trust-cert
//!
//! # Reseed only the stores, against a fixed reference date
//! biz-seed populate stores --seed 7 --reference-date 2025-06-30
//!
//! # Run the whole workflow in memory
//! biz-seed populate all --dry-run
//!
//! # Print generated follow-ups as JSON lines
//! biz-seed generate treatments --profile seed_profile.yaml
//!
//! # Show the organizational tree
//! biz-seed hierarchy
//! ```

use anyhow::Context;
use biz_seed::run::{run_generate, run_hierarchy, run_populate};
use biz_seed::{logging, SeedTarget};
use clap::{Parser, Subcommand};
use seed_populate::CommonPopulateArgs;
use seed_populate_mssql::MssqlPopulateArgs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "biz-seed")]
#[command(about = "Seed synthetic store-network business tables into SQL Server")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the target tables and load generated rows
    Populate {
        /// Table to seed
        #[arg(value_enum)]
        target: SeedTarget,

        #[command(flatten)]
        args: MssqlPopulateArgs,
    },

    /// Print generated rows as JSON lines without touching a database
    Generate {
        /// Table to print
        #[arg(value_enum)]
        target: SeedTarget,

        #[command(flatten)]
        common: CommonPopulateArgs,
    },

    /// Print the organizational hierarchy leaf paths
    Hierarchy {
        /// Path to a seed profile YAML file with a custom tree
        #[arg(long, short = 'p')]
        profile: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    logging::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Populate { target, args } => run_populate(target, args).await,
        Commands::Generate { target, common } => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            let written = run_generate(target, &common, &mut out)
                .await
                .context("Failed to generate rows")?;
            tracing::info!("Generated {} rows for {}", written, target);
            Ok(())
        }
        Commands::Hierarchy { profile } => {
            let stdout = std::io::stdout();
            run_hierarchy(profile.as_deref(), &mut stdout.lock())
        }
    }
}
