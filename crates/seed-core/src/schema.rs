//! Table definitions and generated rows.
//!
//! A [`TableDefinition`] is the persisted layout of one seeded table: the
//! column names, their SQL Server types and nullability, in DDL order.
//! A [`SeedRow`] carries one value per *insertable* column of that table,
//! in the same order.

use crate::types::SqlType;
use crate::values::SeedValue;
use serde::{Deserialize, Serialize};

// ============================================================================
// Error Types
// ============================================================================

/// Error type for schema operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Column not found in table definition
    #[error("Column '{column}' not found in table '{table}'")]
    ColumnNotFound { table: String, column: String },

    /// Row does not have one value per insertable column
    #[error("Row {index} for table '{table}' has {actual} values, expected {expected}")]
    ArityMismatch {
        table: String,
        index: u64,
        expected: usize,
        actual: usize,
    },

    /// Non-null value violates a NOT NULL column
    #[error("Column '{column}' in table '{table}' is NOT NULL but row {index} has NULL")]
    NullViolation {
        table: String,
        column: String,
        index: u64,
    },
}

// ============================================================================
// Definitions
// ============================================================================

/// Column definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnDefinition {
    /// Column name, exactly as persisted
    pub name: String,

    /// Column type
    #[serde(rename = "type")]
    pub column_type: SqlType,

    /// Whether this column is nullable
    #[serde(default)]
    pub nullable: bool,

    /// Whether this column is the primary key
    #[serde(default)]
    pub primary_key: bool,

    /// Server-side default expression (e.g. `NEWID()`); such columns are
    /// filled by the database and skipped on insert.
    #[serde(default)]
    pub default_expr: Option<String>,
}

impl ColumnDefinition {
    /// Create a NOT NULL column.
    pub fn new(name: impl Into<String>, column_type: SqlType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: false,
            primary_key: false,
            default_expr: None,
        }
    }

    /// Create a nullable column.
    pub fn nullable(name: impl Into<String>, column_type: SqlType) -> Self {
        Self {
            nullable: true,
            ..Self::new(name, column_type)
        }
    }

    /// Create a primary key column.
    pub fn primary_key(name: impl Into<String>, column_type: SqlType) -> Self {
        Self {
            primary_key: true,
            ..Self::new(name, column_type)
        }
    }

    /// Attach a server-side default expression.
    pub fn with_default(mut self, expr: impl Into<String>) -> Self {
        self.default_expr = Some(expr.into());
        self
    }

    /// Whether the loader supplies a value for this column.
    pub fn is_insertable(&self) -> bool {
        self.default_expr.is_none()
    }
}

/// Fixed column layout of a seeded table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableDefinition {
    /// Table name
    pub name: String,

    /// Column definitions in DDL order
    pub columns: Vec<ColumnDefinition>,
}

impl TableDefinition {
    /// Create a new table definition.
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDefinition>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Get a column by name.
    pub fn get_column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns the loader supplies values for, in insert order.
    pub fn insert_columns(&self) -> impl Iterator<Item = &ColumnDefinition> {
        self.columns.iter().filter(|c| c.is_insertable())
    }

    /// Names of the insertable columns, in insert order.
    pub fn insert_column_names(&self) -> Vec<&str> {
        self.insert_columns().map(|c| c.name.as_str()).collect()
    }

    /// Position of a column within a [`SeedRow`] of this table.
    pub fn row_position(&self, column: &str) -> Result<usize, SchemaError> {
        self.insert_columns()
            .position(|c| c.name == column)
            .ok_or_else(|| SchemaError::ColumnNotFound {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// Check that a row fits this table: one value per insertable column and
    /// no NULL in a NOT NULL column.
    pub fn validate_row(&self, row: &SeedRow) -> Result<(), SchemaError> {
        let columns: Vec<&ColumnDefinition> = self.insert_columns().collect();
        if columns.len() != row.values.len() {
            return Err(SchemaError::ArityMismatch {
                table: self.name.clone(),
                index: row.index,
                expected: columns.len(),
                actual: row.values.len(),
            });
        }
        for (column, value) in columns.iter().zip(&row.values) {
            if !column.nullable && value.is_null() {
                return Err(SchemaError::NullViolation {
                    table: self.name.clone(),
                    column: column.name.clone(),
                    index: row.index,
                });
            }
        }
        Ok(())
    }
}

/// One generated row, bound to its table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeedRow {
    /// Target table name
    pub table: String,

    /// Position of this row in generation order (zero-based)
    pub index: u64,

    /// One value per insertable column, in insert order
    pub values: Vec<SeedValue>,
}

impl SeedRow {
    /// Create a new row.
    pub fn new(table: impl Into<String>, index: u64, values: Vec<SeedValue>) -> Self {
        Self {
            table: table.into(),
            index,
            values,
        }
    }

    /// Value at a given insert position.
    pub fn get(&self, position: usize) -> Option<&SeedValue> {
        self.values.get(position)
    }
}
