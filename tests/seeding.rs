//! End-to-end seeding against the in-memory sink.

use biz_seed::{generate_into, populate_into, RunPlan, SeedProfile, SeedTarget};
use chrono::NaiveDate;
use seed_core::{SeedTable, SeedValue};
use seed_populate::MemorySink;
use std::collections::{BTreeMap, BTreeSet};

fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
}

fn plan(seed: u64) -> RunPlan {
    RunPlan::new(&SeedProfile::default(), seed, reference_date(), 500).unwrap()
}

fn column(sink: &MemorySink, table: SeedTable, name: &str) -> Vec<SeedValue> {
    let stored = sink.table(table.table_name()).unwrap();
    let position = stored
        .definition()
        .columns
        .iter()
        .position(|c| c.name == name)
        .unwrap();
    stored.rows().iter().map(|row| row[position].clone()).collect()
}

#[tokio::test]
async fn test_populate_all_tables() {
    let (reports, sink) = populate_into(MemorySink::new(), plan(42), &SeedTable::ALL)
        .await
        .unwrap();

    assert_eq!(reports.len(), 7);
    for report in &reports {
        assert!(report.is_clean(), "{} not clean: {:?}", report.table, report);
        assert_eq!(report.row_count, Some(report.load.succeeded));
    }
    assert!(sink.is_closed());

    let counts: BTreeMap<SeedTable, u64> = reports
        .iter()
        .map(|r| (r.table, r.row_count.unwrap()))
        .collect();
    assert_eq!(counts[&SeedTable::Accounts], 2500);
    assert_eq!(counts[&SeedTable::Activity], 2500);
    assert_eq!(counts[&SeedTable::Stores], 2500);
    assert_eq!(counts[&SeedTable::Municipalities], 20);
    assert_eq!(counts[&SeedTable::Treatments], 20);
    assert_eq!(counts[&SeedTable::Hotlist], 20);

    let stores = reports
        .iter()
        .find(|r| r.table == SeedTable::Stores)
        .unwrap();
    assert!(stores.hierarchy.as_ref().unwrap().is_consistent());
    // 2500 rows at batch 500
    assert_eq!(stores.load.commits, 5);
}

#[tokio::test]
async fn test_stores_reuse_account_keys() {
    let (_, sink) = populate_into(
        MemorySink::new(),
        plan(7),
        &[SeedTable::Accounts, SeedTable::Stores],
    )
    .await
    .unwrap();

    let accounts: BTreeSet<i32> = column(&sink, SeedTable::Accounts, "CHAVE_LOJA")
        .iter()
        .filter_map(SeedValue::as_i32)
        .collect();
    let stores: BTreeSet<i32> = column(&sink, SeedTable::Stores, "CHAVE_LOJA")
        .iter()
        .filter_map(SeedValue::as_i32)
        .collect();
    assert_eq!(accounts, stores);
}

#[tokio::test]
async fn test_every_supervision_is_used() {
    let (_, sink) = populate_into(MemorySink::new(), plan(42), &[SeedTable::Stores])
        .await
        .unwrap();

    let supervisions: BTreeSet<i32> = column(&sink, SeedTable::Stores, "CHAVE_SUPERVISAO")
        .iter()
        .filter_map(SeedValue::as_i32)
        .collect();
    assert_eq!(
        supervisions,
        BTreeSet::from([40001, 40002, 40003, 40004, 40005, 40006])
    );
}

#[tokio::test]
async fn test_treatment_cnpj_pairing() {
    let (_, sink) = populate_into(
        MemorySink::new(),
        plan(3),
        &[SeedTable::Municipalities, SeedTable::Treatments],
    )
    .await
    .unwrap();

    let sem_cnpj = column(&sink, SeedTable::Treatments, "SEM_CNPJ");
    let cnpj = column(&sink, SeedTable::Treatments, "CNPJ");
    let nome_loja = column(&sink, SeedTable::Treatments, "NOME_LOJA");
    assert_eq!(sem_cnpj.len(), 20);

    for ((sem, cnpj), nome) in sem_cnpj.iter().zip(&cnpj).zip(&nome_loja) {
        let sem = sem.as_bool().unwrap();
        assert_eq!(sem, cnpj.is_null());
        assert_eq!(sem, !nome.is_null());
        assert!(cnpj.is_null() || nome.is_null());
    }
}

#[tokio::test]
async fn test_treatments_reference_loaded_municipalities() {
    let (_, sink) = populate_into(
        MemorySink::new(),
        plan(11),
        &[SeedTable::Municipalities, SeedTable::Treatments],
    )
    .await
    .unwrap();

    let codes: BTreeSet<String> = column(&sink, SeedTable::Municipalities, "CD_MUNIC")
        .iter()
        .map(|v| v.to_string())
        .collect();
    for code in column(&sink, SeedTable::Treatments, "CD_MUNIC") {
        assert!(codes.contains(&code.to_string()), "unknown municipality {code}");
    }
}

#[tokio::test]
async fn test_missing_municipalities_abort_treatments() {
    let err = populate_into(MemorySink::new(), plan(42), &[SeedTable::Treatments])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("MUNICIPIOS_PRIORITARIOS"));
}

#[tokio::test]
async fn test_generate_is_deterministic() {
    let mut first = Vec::new();
    let mut second = Vec::new();
    let mut other_seed = Vec::new();

    let written = generate_into(SeedTarget::Treatments, plan(42), &mut first)
        .await
        .unwrap();
    generate_into(SeedTarget::Treatments, plan(42), &mut second)
        .await
        .unwrap();
    generate_into(SeedTarget::Treatments, plan(43), &mut other_seed)
        .await
        .unwrap();

    assert_eq!(written, 20);
    assert_eq!(first, second);
    assert_ne!(first, other_seed);
}

#[tokio::test]
async fn test_generate_writes_json_lines() {
    let mut out = Vec::new();
    let written = generate_into(SeedTarget::Hotlist, plan(42), &mut out)
        .await
        .unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(text.lines().count(), written);
    for line in text.lines() {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(value.is_object());
    }
}
