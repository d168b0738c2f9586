//! `TB_ESTR_ATIVO`: transaction activity flags, one row per account.

use super::{Fixture, MonthlyVolumes};
use crate::generators::temporal::{date_within, Lookback};
use crate::{FixtureRng, GeneratorError};
use chrono::NaiveDate;
use seed_core::{SeedTable, SeedValue};
use serde::Serialize;

/// One `TB_ESTR_ATIVO` row. Monthly columns are 0/1 activity flags.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ActivityRecord {
    pub chave_loja: i32,
    pub dt_ult_transacao: NaiveDate,
    #[serde(flatten)]
    pub volumes: MonthlyVolumes,
}

impl Fixture for ActivityRecord {
    const TABLE: SeedTable = SeedTable::Activity;

    fn values(&self) -> Vec<SeedValue> {
        let mut values = vec![
            SeedValue::Int32(self.chave_loja),
            SeedValue::Date(self.dt_ult_transacao),
        ];
        values.extend(self.volumes.values());
        values
    }
}

/// Generate one activity row per account key.
pub fn generate_activity(
    rng: &mut FixtureRng,
    account_keys: &[i32],
) -> Result<Vec<ActivityRecord>, GeneratorError> {
    if account_keys.is_empty() {
        return Err(GeneratorError::EmptyReference {
            table: SeedTable::Activity,
        });
    }
    Ok(account_keys
        .iter()
        .map(|&chave_loja| ActivityRecord {
            chave_loja,
            dt_ult_transacao: date_within(rng, Lookback::Years(1)),
            volumes: MonthlyVolumes::generate(rng, 1),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng() -> FixtureRng {
        FixtureRng::new(42, NaiveDate::from_ymd_opt(2025, 6, 30).unwrap())
    }

    #[test]
    fn test_one_row_per_account() {
        let keys = vec![10_500, 20_000, 999_998];
        let rows = generate_activity(&mut rng(), &keys).unwrap();
        let got: Vec<i32> = rows.iter().map(|r| r.chave_loja).collect();
        assert_eq!(got, keys);
        for row in &rows {
            assert!(row.volumes.values().iter().all(|v| matches!(v.as_i32(), Some(0 | 1))));
        }
    }

    #[test]
    fn test_empty_accounts_is_an_error() {
        assert!(matches!(
            generate_activity(&mut rng(), &[]),
            Err(GeneratorError::EmptyReference {
                table: SeedTable::Activity
            })
        ));
    }
}
