//! One fixture generator per seeded table.
//!
//! Each generator returns typed records; [`Fixture::values`] flattens a
//! record into the table's insert column order.

pub mod accounts;
pub mod activity;
pub mod hotlist;
pub mod municipalities;
pub mod opportunities;
pub mod stores;
pub mod treatments;

use crate::generators::text::fit;
use crate::FixtureRng;
use seed_core::{SeedRow, SeedTable, SeedValue, TableDefinition};
use serde::Serialize;

/// A generated record bound to one table.
pub trait Fixture: Serialize {
    /// Table the record is inserted into.
    const TABLE: SeedTable;

    /// Values in insert column order (server-defaulted columns excluded).
    fn values(&self) -> Vec<SeedValue>;
}

/// Convert records to rows, fitting text to the declared column lengths.
pub fn to_rows<F: Fixture>(records: &[F]) -> Vec<SeedRow> {
    let definition = F::TABLE.definition();
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let values = fit_to_columns(&definition, record.values());
            SeedRow::new(definition.name.clone(), index as u64, values)
        })
        .collect()
}

fn fit_to_columns(definition: &TableDefinition, values: Vec<SeedValue>) -> Vec<SeedValue> {
    values
        .into_iter()
        .zip(definition.insert_columns())
        .map(|(value, column)| match (value, column.column_type.max_chars()) {
            (SeedValue::Text(text), Some(max)) => SeedValue::Text(fit(text, max)),
            (value, _) => value,
        })
        .collect()
}

/// The four monthly volume columns shared by several tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct MonthlyVolumes {
    pub mes_m3: i32,
    pub mes_m2: i32,
    pub mes_m1: i32,
    pub mes_m0: i32,
}

impl MonthlyVolumes {
    /// Four independent draws from `0..=max`.
    pub fn generate(rng: &mut FixtureRng, max: i32) -> Self {
        Self {
            mes_m3: rng.int(0..=max),
            mes_m2: rng.int(0..=max),
            mes_m1: rng.int(0..=max),
            mes_m0: rng.int(0..=max),
        }
    }

    /// Values in column order `MES_M3, MES_M2, MES_M1, MES_M0`.
    pub fn values(&self) -> [SeedValue; 4] {
        [
            SeedValue::Int32(self.mes_m3),
            SeedValue::Int32(self.mes_m2),
            SeedValue::Int32(self.mes_m1),
            SeedValue::Int32(self.mes_m0),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seed_core::{ColumnDefinition, SqlType};

    #[test]
    fn test_fit_to_columns_truncates_text_only() {
        let definition = TableDefinition::new(
            "T",
            vec![
                ColumnDefinition::new("A", SqlType::VarChar { length: 3 }),
                ColumnDefinition::new("B", SqlType::Int),
            ],
        );
        let values = fit_to_columns(
            &definition,
            vec![SeedValue::text("abcdef"), SeedValue::Int32(123456)],
        );
        assert_eq!(values, vec![SeedValue::text("abc"), SeedValue::Int32(123456)]);
    }
}
