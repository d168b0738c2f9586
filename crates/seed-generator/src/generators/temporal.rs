//! Date and datetime generators over windows ending at the reference date.

use crate::FixtureRng;
use chrono::{Days, Months, NaiveDate, NaiveDateTime};

/// How far back from the reference date a window starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookback {
    Days(u32),
    Months(u32),
    Years(u32),
}

impl Lookback {
    /// The date `self` before `reference`, saturating at the calendar minimum.
    pub fn before(&self, reference: NaiveDate) -> NaiveDate {
        let shifted = match self {
            Self::Days(n) => reference.checked_sub_days(Days::new(u64::from(*n))),
            Self::Months(n) => reference.checked_sub_months(Months::new(*n)),
            Self::Years(n) => reference.checked_sub_months(Months::new(n.saturating_mul(12))),
        };
        shifted.unwrap_or(NaiveDate::MIN)
    }
}

/// Uniform date in `[start, end]`. Returns `start` when the window is empty.
pub fn date_between(rng: &mut FixtureRng, start: NaiveDate, end: NaiveDate) -> NaiveDate {
    let span = (end - start).num_days();
    if span <= 0 {
        return start;
    }
    let offset = rng.int(0..=span.min(i64::from(i32::MAX)) as i32);
    start
        .checked_add_days(Days::new(offset as u64))
        .unwrap_or(end)
}

/// Uniform date between `lookback` before the reference date and the
/// reference date itself.
pub fn date_within(rng: &mut FixtureRng, lookback: Lookback) -> NaiveDate {
    let end = rng.reference_date();
    date_between(rng, lookback.before(end), end)
}

/// Uniform date between two lookbacks (`from` further back than `to`).
pub fn date_between_lookbacks(rng: &mut FixtureRng, from: Lookback, to: Lookback) -> NaiveDate {
    let reference = rng.reference_date();
    date_between(rng, from.before(reference), to.before(reference))
}

/// A datetime 0..=`max_days` days before the reference date, during business
/// hours (09:00 to 17:45) on a quarter-hour.
pub fn business_datetime_within(rng: &mut FixtureRng, max_days: u32) -> NaiveDateTime {
    let days_back = rng.int(0..=max_days.min(i32::MAX as u32) as i32);
    let date = Lookback::Days(days_back as u32).before(rng.reference_date());
    let hour = rng.int(9..=17) as u32;
    let minute = *rng.pick(&[0u32, 15, 30, 45]);
    date.and_hms_opt(hour, minute, 0)
        .unwrap_or_else(|| date.and_time(chrono::NaiveTime::MIN))
}

/// The reference date at midnight; used for audit columns such as `CREATED_AT`.
pub fn reference_timestamp(rng: &FixtureRng) -> NaiveDateTime {
    rng.reference_date().and_time(chrono::NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    #[test]
    fn test_lookback_before() {
        assert_eq!(
            Lookback::Days(30).before(reference()),
            NaiveDate::from_ymd_opt(2025, 5, 31).unwrap()
        );
        assert_eq!(
            Lookback::Months(6).before(reference()),
            NaiveDate::from_ymd_opt(2024, 12, 30).unwrap()
        );
        assert_eq!(
            Lookback::Years(3).before(reference()),
            NaiveDate::from_ymd_opt(2022, 6, 30).unwrap()
        );
    }

    #[test]
    fn test_date_within_window() {
        let mut rng = FixtureRng::new(42, reference());
        let start = Lookback::Months(2).before(reference());
        for _ in 0..200 {
            let date = date_within(&mut rng, Lookback::Months(2));
            assert!(date >= start && date <= reference());
        }
    }

    #[test]
    fn test_date_between_empty_window() {
        let mut rng = FixtureRng::new(42, reference());
        assert_eq!(date_between(&mut rng, reference(), reference()), reference());
    }

    #[test]
    fn test_date_between_lookbacks() {
        let mut rng = FixtureRng::new(42, reference());
        for _ in 0..100 {
            let date = date_between_lookbacks(&mut rng, Lookback::Years(5), Lookback::Years(1));
            assert!(date >= Lookback::Years(5).before(reference()));
            assert!(date <= Lookback::Years(1).before(reference()));
        }
    }

    #[test]
    fn test_business_datetime() {
        let mut rng = FixtureRng::new(42, reference());
        for _ in 0..200 {
            let dt = business_datetime_within(&mut rng, 30);
            assert!((9..=17).contains(&dt.hour()));
            assert!([0, 15, 30, 45].contains(&dt.minute()));
            assert_eq!(dt.second(), 0);
            assert!(dt.date() <= reference());
            assert!(dt.date() >= Lookback::Days(30).before(reference()));
        }
    }
}
