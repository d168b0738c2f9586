//! Conversion between [`SeedValue`] and the driver's parameter and column
//! types.

use crate::error::MssqlSinkError;
use chrono::{NaiveDate, NaiveDateTime};
use seed_core::{SeedValue, SqlType};
use tiberius::numeric::Numeric;
use tiberius::{ColumnData, FromSql, ToSql};
use uuid::Uuid;

/// Convert a value to a boxed query parameter.
///
/// NULLs are typed after the target column so the server never has to
/// guess a parameter type.
pub fn to_param(value: &SeedValue, column_type: &SqlType) -> Box<dyn ToSql> {
    match value {
        SeedValue::Null => null_param(column_type),
        SeedValue::Bool(b) => Box::new(*b),
        SeedValue::Int32(i) => Box::new(*i),
        SeedValue::Decimal { units, scale } => {
            Box::new(Numeric::new_with_scale(i128::from(*units), *scale))
        }
        SeedValue::Text(s) => Box::new(s.clone()),
        SeedValue::Date(d) => Box::new(*d),
        SeedValue::DateTime(dt) => Box::new(*dt),
        SeedValue::Uuid(u) => Box::new(*u),
    }
}

fn null_param(column_type: &SqlType) -> Box<dyn ToSql> {
    match column_type {
        SqlType::Bit => Box::new(Option::<bool>::None),
        SqlType::Int => Box::new(Option::<i32>::None),
        SqlType::Decimal { .. } => Box::new(Option::<Numeric>::None),
        SqlType::Char { .. } | SqlType::VarChar { .. } | SqlType::NVarChar { .. } => {
            Box::new(Option::<String>::None)
        }
        SqlType::Date => Box::new(Option::<NaiveDate>::None),
        SqlType::DateTime => Box::new(Option::<NaiveDateTime>::None),
        SqlType::UniqueIdentifier => Box::new(Option::<Uuid>::None),
    }
}

/// Convert a result column back to a [`SeedValue`].
pub fn from_column(data: &ColumnData<'static>) -> Result<SeedValue, MssqlSinkError> {
    let value = match data {
        ColumnData::U8(v) => v.map(|v| SeedValue::Int32(i32::from(v))),
        ColumnData::I16(v) => v.map(|v| SeedValue::Int32(i32::from(v))),
        ColumnData::I32(v) => v.map(SeedValue::Int32),
        ColumnData::I64(v) => v.map(|v| match i32::try_from(v) {
            Ok(i) => SeedValue::Int32(i),
            Err(_) => SeedValue::Decimal { units: v, scale: 0 },
        }),
        ColumnData::F32(v) => v.map(|v| SeedValue::decimal_from_f64(f64::from(v), 4)),
        ColumnData::F64(v) => v.map(|v| SeedValue::decimal_from_f64(v, 4)),
        ColumnData::Bit(v) => v.map(SeedValue::Bool),
        ColumnData::String(v) => v.as_ref().map(|s| SeedValue::Text(s.to_string())),
        ColumnData::Guid(v) => v.map(SeedValue::Uuid),
        ColumnData::Numeric(v) => match v {
            Some(n) => Some(SeedValue::Decimal {
                units: i64::try_from(n.value()).map_err(|_| {
                    MssqlSinkError::UnsupportedColumn(format!("numeric {n:?} out of range"))
                })?,
                scale: n.scale(),
            }),
            None => None,
        },
        ColumnData::Date(_) => NaiveDate::from_sql(data)?.map(SeedValue::Date),
        ColumnData::DateTime(_) | ColumnData::SmallDateTime(_) | ColumnData::DateTime2(_) => {
            NaiveDateTime::from_sql(data)?.map(SeedValue::DateTime)
        }
        other => {
            return Err(MssqlSinkError::UnsupportedColumn(format!("{other:?}")));
        }
    };
    Ok(value.unwrap_or(SeedValue::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    #[test]
    fn test_null_is_typed_by_column() {
        let text = to_param(&SeedValue::Null, &SqlType::VarChar { length: 20 });
        assert!(matches!(text.to_sql(), ColumnData::String(None)));

        let int = to_param(&SeedValue::Null, &SqlType::Int);
        assert!(matches!(int.to_sql(), ColumnData::I32(None)));

        let date = to_param(&SeedValue::Null, &SqlType::Date);
        assert!(matches!(date.to_sql(), ColumnData::Date(None)));
    }

    #[test]
    fn test_decimal_param_keeps_scale() {
        let param = to_param(
            &SeedValue::Decimal {
                units: 12_345,
                scale: 2,
            },
            &SqlType::Decimal {
                precision: 10,
                scale: 2,
            },
        );
        match param.to_sql() {
            ColumnData::Numeric(Some(n)) => {
                assert_eq!(n.value(), 12_345);
                assert_eq!(n.scale(), 2);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_columns_to_values() {
        assert_eq!(
            from_column(&ColumnData::I32(Some(40_002))).unwrap(),
            SeedValue::Int32(40_002)
        );
        assert_eq!(
            from_column(&ColumnData::String(Some(Cow::Owned("SP".to_string())))).unwrap(),
            SeedValue::text("SP")
        );
        assert_eq!(
            from_column(&ColumnData::Bit(None)).unwrap(),
            SeedValue::Null
        );
        assert_eq!(
            from_column(&ColumnData::Numeric(Some(Numeric::new_with_scale(995, 1)))).unwrap(),
            SeedValue::Decimal {
                units: 995,
                scale: 1
            }
        );
    }
}
