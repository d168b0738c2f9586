//! JSON-lines rendering of seeded rows.

use seed_core::{SeedValue, TableDefinition};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::io::Write;

/// One row as a JSON object keyed by column name, in DDL column order.
pub struct JsonRecord<'a> {
    columns: Vec<&'a str>,
    values: Vec<&'a SeedValue>,
}

impl<'a> JsonRecord<'a> {
    /// Pair the insertable columns of `definition` with a full-layout row.
    ///
    /// Server-assigned columns are left out so the output only depends on
    /// the seed.
    pub fn generated(definition: &'a TableDefinition, row: &'a [SeedValue]) -> Self {
        let (columns, values) = definition
            .columns
            .iter()
            .zip(row)
            .filter(|(column, _)| column.is_insertable())
            .map(|(column, value)| (column.name.as_str(), value))
            .unzip();
        Self { columns, values }
    }
}

impl Serialize for JsonRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in self.columns.iter().zip(&self.values) {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Write every row of a table as one JSON object per line.
pub fn write_json_lines<W: Write>(
    out: &mut W,
    definition: &TableDefinition,
    rows: &[Vec<SeedValue>],
) -> anyhow::Result<usize> {
    for row in rows {
        serde_json::to_writer(&mut *out, &JsonRecord::generated(definition, row))?;
        out.write_all(b"\n")?;
    }
    Ok(rows.len())
}
