//! `TB_ESTR_CONTAS`: account openings per store.

use super::{Fixture, MonthlyVolumes};
use crate::generators::temporal::{date_within, Lookback};
use crate::{FixtureRng, GeneratorError};
use chrono::NaiveDate;
use seed_core::{SeedTable, SeedValue};
use serde::Serialize;
use std::ops::Range;

/// Store keys are drawn from this range (upper bound exclusive).
pub const STORE_KEY_RANGE: Range<i32> = 10_000..999_999;

/// Highest monthly account-opening volume.
pub const MAX_MONTHLY_OPENINGS: i32 = 50;

/// One `TB_ESTR_CONTAS` row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct AccountRecord {
    pub chave_loja: i32,
    pub dt_ult_ab_conta: NaiveDate,
    #[serde(flatten)]
    pub volumes: MonthlyVolumes,
}

impl Fixture for AccountRecord {
    const TABLE: SeedTable = SeedTable::Accounts;

    fn values(&self) -> Vec<SeedValue> {
        let mut values = vec![
            SeedValue::Int32(self.chave_loja),
            SeedValue::Date(self.dt_ult_ab_conta),
        ];
        values.extend(self.volumes.values());
        values
    }
}

/// Draw `count` distinct store keys from [`STORE_KEY_RANGE`].
pub fn sample_store_keys(
    rng: &mut FixtureRng,
    table: SeedTable,
    count: usize,
) -> Result<Vec<i32>, GeneratorError> {
    let available = (STORE_KEY_RANGE.end - STORE_KEY_RANGE.start) as usize;
    if count > available {
        return Err(GeneratorError::CodeSpaceExhausted {
            table,
            requested: count,
            available,
        });
    }
    Ok(rand::seq::index::sample(rng, available, count)
        .into_iter()
        .map(|offset| STORE_KEY_RANGE.start + offset as i32)
        .collect())
}

/// Generate `count` accounts with distinct store keys.
pub fn generate_accounts(
    rng: &mut FixtureRng,
    count: usize,
) -> Result<Vec<AccountRecord>, GeneratorError> {
    let keys = sample_store_keys(rng, SeedTable::Accounts, count)?;
    Ok(keys
        .into_iter()
        .map(|chave_loja| AccountRecord {
            chave_loja,
            dt_ult_ab_conta: date_within(rng, Lookback::Years(1)),
            volumes: MonthlyVolumes::generate(rng, MAX_MONTHLY_OPENINGS),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn rng() -> FixtureRng {
        FixtureRng::new(42, NaiveDate::from_ymd_opt(2025, 6, 30).unwrap())
    }

    #[test]
    fn test_keys_are_distinct_and_in_range() {
        let accounts = generate_accounts(&mut rng(), 2500).unwrap();
        assert_eq!(accounts.len(), 2500);
        let keys: HashSet<i32> = accounts.iter().map(|a| a.chave_loja).collect();
        assert_eq!(keys.len(), 2500);
        assert!(keys.iter().all(|k| STORE_KEY_RANGE.contains(k)));
    }

    #[test]
    fn test_volumes_and_dates_in_bounds() {
        let reference = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        for account in generate_accounts(&mut rng(), 300).unwrap() {
            assert!(account.dt_ult_ab_conta <= reference);
            assert!(account.dt_ult_ab_conta >= Lookback::Years(1).before(reference));
            for v in account.volumes.values() {
                let v = v.as_i32().unwrap();
                assert!((0..=MAX_MONTHLY_OPENINGS).contains(&v));
            }
        }
    }

    #[test]
    fn test_too_many_keys_is_an_error() {
        let err = sample_store_keys(&mut rng(), SeedTable::Accounts, 1_000_000).unwrap_err();
        assert!(matches!(err, GeneratorError::CodeSpaceExhausted { .. }));
    }

    #[test]
    fn test_json_uses_column_names() {
        let accounts = generate_accounts(&mut rng(), 1).unwrap();
        let json = serde_json::to_value(&accounts[0]).unwrap();
        assert!(json.get("CHAVE_LOJA").is_some());
        assert!(json.get("DT_ULT_AB_CONTA").is_some());
        assert!(json.get("MES_M0").is_some());
    }
}
