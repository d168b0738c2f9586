//! Value representation for generated rows.
//!
//! `SeedValue` is the type-agnostic value produced by the fixture generators.
//! Sinks convert it to their native parameter types; the JSON-lines output of
//! `biz-seed generate` serializes it directly.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// A single generated column value.
#[derive(Debug, Clone, PartialEq)]
pub enum SeedValue {
    /// SQL NULL
    Null,

    /// Boolean (`BIT`)
    Bool(bool),

    /// 32-bit signed integer (`INT`)
    Int32(i32),

    /// Exact decimal stored as scaled integer units.
    ///
    /// `Decimal { units: 12345, scale: 2 }` is `123.45`.
    Decimal {
        /// Value multiplied by `10^scale`
        units: i64,
        /// Number of digits after the decimal point
        scale: u8,
    },

    /// Character data
    Text(String),

    /// Calendar date (`DATE`)
    Date(NaiveDate),

    /// Date and time without zone (`DATETIME`)
    DateTime(NaiveDateTime),

    /// `UNIQUEIDENTIFIER`
    Uuid(Uuid),
}

impl SeedValue {
    /// Build a decimal by rounding `value` to `scale` fractional digits.
    pub fn decimal_from_f64(value: f64, scale: u8) -> Self {
        let factor = 10f64.powi(i32::from(scale));
        Self::Decimal {
            units: (value * factor).round() as i64,
            scale,
        }
    }

    /// Text value from anything string-like.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Map an optional value, using `Null` for `None`.
    pub fn from_option<T: Into<SeedValue>>(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get this value as an integer.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int32(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get this value as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

fn format_decimal(units: i64, scale: u8) -> String {
    if scale == 0 {
        return units.to_string();
    }
    let divisor = 10i64.pow(u32::from(scale));
    let sign = if units < 0 { "-" } else { "" };
    let abs = units.unsigned_abs();
    let whole = abs / divisor as u64;
    let frac = abs % divisor as u64;
    format!("{sign}{whole}.{frac:0width$}", width = scale as usize)
}

impl fmt::Display for SeedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Bool(v) => write!(f, "{}", u8::from(*v)),
            Self::Int32(v) => write!(f, "{v}"),
            Self::Decimal { units, scale } => write!(f, "{}", format_decimal(*units, *scale)),
            Self::Text(v) => write!(f, "{v}"),
            Self::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            Self::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%dT%H:%M:%S")),
            Self::Uuid(v) => write!(f, "{}", v.hyphenated().to_string().to_uppercase()),
        }
    }
}

impl Serialize for SeedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Int32(v) => serializer.serialize_i32(*v),
            other => serializer.serialize_str(&other.to_string()),
        }
    }
}

impl From<bool> for SeedValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for SeedValue {
    fn from(value: i32) -> Self {
        Self::Int32(value)
    }
}

impl From<String> for SeedValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for SeedValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<NaiveDate> for SeedValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveDateTime> for SeedValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl From<Uuid> for SeedValue {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_from_f64_rounds() {
        assert_eq!(
            SeedValue::decimal_from_f64(123.456, 2),
            SeedValue::Decimal {
                units: 12346,
                scale: 2
            }
        );
        assert_eq!(SeedValue::decimal_from_f64(-0.5, 2).to_string(), "-0.50");
    }

    #[test]
    fn test_display_decimal_pads_fraction() {
        let value = SeedValue::Decimal {
            units: 100_005,
            scale: 2,
        };
        assert_eq!(value.to_string(), "1000.05");
    }

    #[test]
    fn test_from_option() {
        assert!(SeedValue::from_option::<i32>(None).is_null());
        assert_eq!(SeedValue::from_option(Some(7)), SeedValue::Int32(7));
    }

    #[test]
    fn test_serialize_json() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let values = vec![
            SeedValue::Null,
            SeedValue::Bool(true),
            SeedValue::Int32(5),
            SeedValue::Date(date),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[null,true,5,"2024-03-01"]"#);
    }
}
