//! Column types of the seeded tables.

use serde::{Deserialize, Serialize};
use std::fmt;

/// SQL Server column type.
///
/// Only the types the seeded tables actually use are modelled. Each variant
/// renders to its exact DDL spelling through [`fmt::Display`], so the
/// persisted layout stays byte-for-byte stable for downstream consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SqlType {
    /// `BIT`
    Bit,

    /// `INT`
    Int,

    /// `DECIMAL(p,s)`
    Decimal {
        /// Total number of digits
        precision: u8,
        /// Number of digits after the decimal point
        scale: u8,
    },

    /// `CHAR(n)`
    Char { length: u32 },

    /// `VARCHAR(n)`
    VarChar { length: u32 },

    /// `NVARCHAR(n)`, or `NVARCHAR(MAX)` when `length` is `None`
    NVarChar { length: Option<u32> },

    /// `DATE`
    Date,

    /// `DATETIME`
    DateTime,

    /// `UNIQUEIDENTIFIER`
    UniqueIdentifier,
}

impl SqlType {
    /// Maximum number of characters a text column accepts, if bounded.
    pub fn max_chars(&self) -> Option<usize> {
        match self {
            Self::Char { length } | Self::VarChar { length } => Some(*length as usize),
            Self::NVarChar { length } => length.map(|l| l as usize),
            _ => None,
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bit => write!(f, "BIT"),
            Self::Int => write!(f, "INT"),
            Self::Decimal { precision, scale } => write!(f, "DECIMAL({precision},{scale})"),
            Self::Char { length } => write!(f, "CHAR({length})"),
            Self::VarChar { length } => write!(f, "VARCHAR({length})"),
            Self::NVarChar { length: Some(length) } => write!(f, "NVARCHAR({length})"),
            Self::NVarChar { length: None } => write!(f, "NVARCHAR(MAX)"),
            Self::Date => write!(f, "DATE"),
            Self::DateTime => write!(f, "DATETIME"),
            Self::UniqueIdentifier => write!(f, "UNIQUEIDENTIFIER"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_ddl_spelling() {
        assert_eq!(SqlType::Int.to_string(), "INT");
        assert_eq!(
            SqlType::Decimal {
                precision: 15,
                scale: 2
            }
            .to_string(),
            "DECIMAL(15,2)"
        );
        assert_eq!(SqlType::Char { length: 2 }.to_string(), "CHAR(2)");
        assert_eq!(
            SqlType::NVarChar { length: None }.to_string(),
            "NVARCHAR(MAX)"
        );
        assert_eq!(
            SqlType::NVarChar { length: Some(100) }.to_string(),
            "NVARCHAR(100)"
        );
    }

    #[test]
    fn test_max_chars() {
        assert_eq!(SqlType::VarChar { length: 18 }.max_chars(), Some(18));
        assert_eq!(SqlType::NVarChar { length: None }.max_chars(), None);
        assert_eq!(SqlType::Int.max_chars(), None);
    }
}
