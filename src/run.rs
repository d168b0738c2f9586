//! Command runners.

use crate::output::write_json_lines;
use crate::profile::SeedProfile;
use crate::target::SeedTarget;
use anyhow::Context;
use chrono::{Local, NaiveDate};
use seed_core::SeedTable;
use seed_generator::{OrgTree, Tier};
use seed_populate::{
    CommonPopulateArgs, MemorySink, PopulateError, PopulateSettings, SeedPopulator, SeedSink,
    TableReport,
};
use seed_populate_mssql::{MssqlPopulateArgs, MssqlSink};
use std::io::Write;
use std::path::Path;
use tracing::{error, info, warn};

/// Tree and settings for a run.
pub struct RunPlan {
    pub tree: OrgTree,
    pub settings: PopulateSettings,
}

impl RunPlan {
    /// Resolve the common arguments and the optional profile.
    pub fn from_args(common: &CommonPopulateArgs) -> anyhow::Result<Self> {
        let profile = SeedProfile::load(common.profile.as_deref()).with_context(|| {
            format!("Failed to load seed profile from {:?}", common.profile)
        })?;
        let reference_date = common
            .reference_date
            .unwrap_or_else(|| Local::now().date_naive());
        Self::new(&profile, common.seed, reference_date, common.batch_size)
    }

    pub fn new(
        profile: &SeedProfile,
        seed: u64,
        reference_date: NaiveDate,
        batch_size: usize,
    ) -> anyhow::Result<Self> {
        let tree = profile
            .tree()
            .context("Failed to build the organizational hierarchy")?;
        let settings =
            profile.apply(PopulateSettings::new(seed, reference_date).with_batch_size(batch_size));
        Ok(Self { tree, settings })
    }
}

/// Seed `tables` into `sink`, then close it.
///
/// Stops at the first table that cannot be seeded; row failures are only
/// reported.
pub async fn populate_into<S: SeedSink>(
    sink: S,
    plan: RunPlan,
    tables: &[SeedTable],
) -> Result<(Vec<TableReport>, S), PopulateError> {
    let mut populator = SeedPopulator::new(sink, plan.tree, plan.settings);
    let mut reports = Vec::with_capacity(tables.len());
    for &table in tables {
        reports.push(populator.populate(table).await?);
    }

    let mut sink = populator.into_sink();
    if let Err(e) = sink.close().await {
        warn!("Failed to close the sink cleanly: {}", e);
    }
    Ok((reports, sink))
}

/// `biz-seed populate <target>`.
pub async fn run_populate(target: SeedTarget, args: MssqlPopulateArgs) -> anyhow::Result<()> {
    let plan = RunPlan::from_args(&args.common)?;
    let tables = target.tables();

    info!(
        "Populating {} (seed={}, reference date={}, batch size={})",
        target,
        plan.settings.seed,
        plan.settings.reference_date,
        plan.settings.batch_size
    );

    let result = if args.dry_run {
        info!("Dry-run mode: loading into memory, no database connection");
        populate_into(MemorySink::new(), plan, &tables)
            .await
            .map(|(reports, _)| reports)
    } else {
        let sink = MssqlSink::connect(&args.connection)
            .await
            .context("Failed to connect to SQL Server")?;
        populate_into(sink, plan, &tables)
            .await
            .map(|(reports, _)| reports)
    };

    match result {
        Ok(reports) => {
            log_summary(&reports);
            Ok(())
        }
        Err(e) => {
            error!("Seeding aborted: {}", e);
            Err(e).with_context(|| format!("Failed to populate {target}"))
        }
    }
}

/// `biz-seed generate <target>`: seed into memory and print the target's
/// rows as JSON lines.
pub async fn run_generate<W: Write>(
    target: SeedTarget,
    common: &CommonPopulateArgs,
    out: &mut W,
) -> anyhow::Result<usize> {
    let plan = RunPlan::from_args(common)?;
    generate_into(target, plan, out).await
}

/// Seed `target` and its prerequisites into memory and write the target
/// tables to `out`.
pub async fn generate_into<W: Write>(
    target: SeedTarget,
    plan: RunPlan,
    out: &mut W,
) -> anyhow::Result<usize> {
    let (_, sink) = populate_into(MemorySink::new(), plan, &target.tables_with_prerequisites())
        .await
        .with_context(|| format!("Failed to generate {target}"))?;

    let mut written = 0;
    for table in target.tables() {
        let stored = sink
            .table(table.table_name())
            .with_context(|| format!("{table} was not generated"))?;
        written += write_json_lines(out, stored.definition(), stored.rows())?;
    }
    out.flush()?;
    Ok(written)
}

/// `biz-seed hierarchy`: print the leaf paths of the active tree.
pub fn run_hierarchy<W: Write>(profile: Option<&Path>, out: &mut W) -> anyhow::Result<()> {
    let profile = SeedProfile::load(profile).context("Failed to load seed profile")?;
    let tree = profile
        .tree()
        .context("Failed to build the organizational hierarchy")?;

    for tier in Tier::ALL {
        writeln!(out, "{}: {} nodes", tier, tree.nodes_of(tier).count())?;
    }
    for path in tree.leaf_paths() {
        writeln!(out, "{}", tree.describe(path))?;
    }
    Ok(())
}

fn log_summary(reports: &[TableReport]) {
    let attempted: u64 = reports.iter().map(|r| r.load.attempted).sum();
    let succeeded: u64 = reports.iter().map(|r| r.load.succeeded).sum();

    for report in reports {
        if !report.is_clean() {
            warn!(
                "{}: {} rows failed, hierarchy consistent: {}, rule violations: {}",
                report.table,
                report.load.failed(),
                report.hierarchy.as_ref().map_or(true, |h| h.is_consistent()),
                report.rule_violations.unwrap_or(0)
            );
        }
    }

    if reports.iter().all(TableReport::is_clean) {
        info!(
            "Seeding completed: {} tables, {}/{} rows committed",
            reports.len(),
            succeeded,
            attempted
        );
    } else {
        warn!(
            "Seeding completed with problems: {} tables, {}/{} rows committed",
            reports.len(),
            succeeded,
            attempted
        );
    }
}
