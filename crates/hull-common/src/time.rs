//! Day-granularity time handling for perimeter series and cube axes.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Midnight UTC of a calendar day.
pub fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Signed number of days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> f64 {
    (to - from).num_days() as f64
}

/// Fractional days from `from` to `to`.
pub fn fractional_days(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 86_400_000.0
}

/// An inclusive span of whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimeSpan {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// True when the timestamp falls on any day of the span.
    pub fn contains(&self, dt: &DateTime<Utc>) -> bool {
        let day = dt.date_naive();
        day >= self.start && day <= self.end
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midnight() {
        let date = NaiveDate::from_ymd_opt(2024, 8, 3).unwrap();
        assert_eq!(midnight(date), Utc.with_ymd_and_hms(2024, 8, 3, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_span_contains_whole_end_day() {
        let span = TimeSpan::new(
            NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 8, 3).unwrap(),
        );
        assert!(span.contains(&Utc.with_ymd_and_hms(2024, 8, 3, 23, 0, 0).unwrap()));
        assert!(!span.contains(&Utc.with_ymd_and_hms(2024, 8, 4, 0, 0, 0).unwrap()));
        assert!(!span.contains(&Utc.with_ymd_and_hms(2024, 7, 31, 12, 0, 0).unwrap()));
        assert_eq!(span.to_string(), "2024-08-01..2024-08-03");
    }

    #[test]
    fn test_day_counts() {
        let a = Utc.with_ymd_and_hms(2024, 8, 1, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 8, 2, 12, 0, 0).unwrap();
        assert_eq!(fractional_days(a, b), 1.5);
        assert_eq!(days_between(b.date_naive(), a.date_naive()), -1.0);
    }
}
