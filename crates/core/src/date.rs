//! Calendar-day utilities.
//!
//! Every date the engine works with is a [`NaiveDate`]: a calendar day with no
//! time-of-day and no offset. Arithmetic saturates at chrono's representable
//! range rather than panicking.

use std::cmp::Ordering;

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, TimeZone};

use crate::error::DateError;

/// Naive date-time layouts accepted in addition to RFC 3339.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d/%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Date-only layouts.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Values that can be normalized to a calendar day.
pub trait DateLike {
    /// Convert to the calendar day this value falls on.
    fn to_date(&self) -> Result<NaiveDate, DateError>;
}

impl DateLike for NaiveDate {
    fn to_date(&self) -> Result<NaiveDate, DateError> {
        Ok(*self)
    }
}

impl DateLike for NaiveDateTime {
    fn to_date(&self) -> Result<NaiveDate, DateError> {
        Ok(self.date())
    }
}

/// Offset-aware values land on their UTC calendar day.
impl<Tz: TimeZone> DateLike for DateTime<Tz> {
    fn to_date(&self) -> Result<NaiveDate, DateError> {
        Ok(self.naive_utc().date())
    }
}

impl DateLike for str {
    fn to_date(&self) -> Result<NaiveDate, DateError> {
        parse_date(self)
    }
}

impl DateLike for String {
    fn to_date(&self) -> Result<NaiveDate, DateError> {
        parse_date(self)
    }
}

impl<T: DateLike + ?Sized> DateLike for &T {
    fn to_date(&self) -> Result<NaiveDate, DateError> {
        (**self).to_date()
    }
}

/// Normalize a date or date-time value to its calendar day.
///
/// Idempotent: normalizing an already-normalized date returns the same date.
pub fn normalize_date<D: DateLike + ?Sized>(value: &D) -> Result<NaiveDate, DateError> {
    value.to_date()
}

/// Chronological comparison of two dates.
pub fn compare_dates(a: NaiveDate, b: NaiveDate) -> Ordering {
    a.cmp(&b)
}

/// Shift a date by a whole number of days (negative moves backwards).
pub fn increment_date(date: NaiveDate, days: i64) -> NaiveDate {
    if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
            .unwrap_or(NaiveDate::MAX)
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
            .unwrap_or(NaiveDate::MIN)
    }
}

/// Shift a date by a possibly fractional number of days.
///
/// The fractional part is truncated toward zero. `NaN` leaves the date
/// unchanged and infinities saturate.
pub fn add_days(date: NaiveDate, days: f64) -> NaiveDate {
    // `as` saturates for out-of-range floats and maps NaN to 0
    increment_date(date, days.trunc() as i64)
}

/// Signed number of days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

fn parse_date(value: &str) -> Result<NaiveDate, DateError> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.to_date();
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date);
        }
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt.date());
        }
    }

    Err(DateError::Unparseable(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_increment_date() {
        assert_eq!(increment_date(ymd(2023, 1, 1), 3), ymd(2023, 1, 4));
        assert_eq!(increment_date(ymd(2023, 1, 1), -1), ymd(2022, 12, 31));
        assert_eq!(increment_date(ymd(2024, 2, 28), 1), ymd(2024, 2, 29));
    }

    #[test]
    fn test_increment_date_saturates() {
        assert_eq!(increment_date(ymd(2023, 1, 1), i64::MAX), NaiveDate::MAX);
        assert_eq!(increment_date(ymd(2023, 1, 1), i64::MIN), NaiveDate::MIN);
    }

    #[test]
    fn test_add_days_truncates() {
        assert_eq!(add_days(ymd(2023, 1, 1), 2.9), ymd(2023, 1, 3));
        assert_eq!(add_days(ymd(2023, 1, 1), -1.5), ymd(2022, 12, 31));
        assert_eq!(add_days(ymd(2023, 1, 1), f64::NAN), ymd(2023, 1, 1));
        assert_eq!(add_days(ymd(2023, 1, 1), f64::INFINITY), NaiveDate::MAX);
    }

    #[test]
    fn test_normalize_slash_separated_date_time() {
        let from_str = normalize_date("2023-01-01/00:00:00").unwrap();
        let from_date_time = NaiveDateTime::parse_from_str("2023-01-01/00:00:00", "%Y-%m-%d/%H:%M:%S")
            .unwrap();

        assert_eq!(from_str, normalize_date(&from_date_time).unwrap());
        assert_eq!(from_str, ymd(2023, 1, 1));
    }

    #[test]
    fn test_normalize_strips_time_of_day() {
        assert_eq!(normalize_date("2023-03-05T17:45:12").unwrap(), ymd(2023, 3, 5));
        assert_eq!(normalize_date("2023-03-05 17:45:12.250").unwrap(), ymd(2023, 3, 5));
        assert_eq!(normalize_date(" 2023-03-05 ").unwrap(), ymd(2023, 3, 5));
        assert_eq!(normalize_date("2023/03/05").unwrap(), ymd(2023, 3, 5));
    }

    #[test]
    fn test_normalize_offset_uses_utc_day() {
        assert_eq!(normalize_date("2023-01-01T23:00:00-05:00").unwrap(), ymd(2023, 1, 2));
        assert_eq!(normalize_date("2023-01-01T10:00:00Z").unwrap(), ymd(2023, 1, 1));

        let offset = FixedOffset::east_opt(9 * 3600).unwrap();
        let dt = offset.with_ymd_and_hms(2023, 6, 1, 3, 0, 0).unwrap();
        assert_eq!(normalize_date(&dt).unwrap(), ymd(2023, 5, 31));

        let utc = Utc.with_ymd_and_hms(2023, 6, 1, 3, 0, 0).unwrap();
        assert_eq!(normalize_date(&utc).unwrap(), ymd(2023, 6, 1));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_date("2023-07-14T08:30:00").unwrap();
        assert_eq!(normalize_date(&once).unwrap(), once);
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert_eq!(
            normalize_date("not a date"),
            Err(DateError::Unparseable("not a date".to_string()))
        );
        assert!(normalize_date("2023-02-30").is_err());
        assert!(normalize_date("").is_err());
    }

    #[test]
    fn test_compare_dates() {
        assert_eq!(compare_dates(ymd(2023, 1, 1), ymd(2023, 1, 2)), Ordering::Less);
        assert_eq!(compare_dates(ymd(2023, 1, 2), ymd(2023, 1, 1)), Ordering::Greater);
        assert_eq!(compare_dates(ymd(2023, 1, 1), ymd(2023, 1, 1)), Ordering::Equal);
    }

    #[test]
    fn test_days_between() {
        assert_eq!(days_between(ymd(2023, 1, 1), ymd(2023, 1, 15)), 14);
        assert_eq!(days_between(ymd(2023, 1, 15), ymd(2023, 1, 1)), -14);
    }
}
