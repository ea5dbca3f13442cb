//! Calendar handling types
//!
//! Claims are bucketed by the calendar month of their service date. This
//! module provides the year-month value type, inclusive month ranges, and
//! the canonical `YYYY-MM-DD` date format used on the wire and in storage.

use chrono::{DateTime, Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Canonical date format for stored and serialized dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid month {month} in year {year}")]
    InvalidMonth { year: i32, month: u32 },
}

/// A calendar month, e.g. `2024-01`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Creates a year-month, rejecting months outside 1..=12
    pub fn new(year: i32, month: u32) -> Result<Self, TemporalError> {
        if !(1..=12).contains(&month) {
            return Err(TemporalError::InvalidMonth { year, month });
        }
        Ok(Self { year, month })
    }

    /// The month containing the given date
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// First calendar day of the month
    pub fn first_day(&self) -> NaiveDate {
        // month is always 1..=12 and day 1 always exists
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last calendar day of the month (leap-year aware)
    pub fn last_day(&self) -> NaiveDate {
        self.next()
            .first_day()
            .pred_opt()
            .unwrap_or(NaiveDate::MAX)
    }

    /// The following calendar month
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    /// Returns true if the date falls inside this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        Self::from_date(date) == *self
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Inclusive list of calendar months spanning `start..=end`
///
/// Returns an empty list when `start` is after `end`.
pub fn month_range(start: NaiveDate, end: NaiveDate) -> Vec<YearMonth> {
    let last = YearMonth::from_date(end);
    let mut current = YearMonth::from_date(start);
    let mut months = Vec::new();

    while current <= last {
        months.push(current);
        current = current.next();
    }

    months
}

/// Formats a date as `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a `YYYY-MM-DD` date, also accepting RFC 3339 timestamps
///
/// Timestamps are reduced to their UTC calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate, TemporalError> {
    let trimmed = value.trim();

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .or_else(|_| {
            DateTime::parse_from_rfc3339(trimmed).map(|dt| dt.naive_utc().date())
        })
        .map_err(|_| TemporalError::InvalidDate(trimmed.to_string()))
}

/// Subtracts whole calendar months, clamping to the end of shorter months
pub fn months_before(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_year_month_display_is_zero_padded() {
        assert_eq!(YearMonth::new(2024, 3).unwrap().to_string(), "2024-03");
    }

    #[test]
    fn test_last_day_handles_leap_years() {
        assert_eq!(YearMonth::new(2024, 2).unwrap().last_day(), date(2024, 2, 29));
        assert_eq!(YearMonth::new(2023, 2).unwrap().last_day(), date(2023, 2, 28));
        assert_eq!(YearMonth::new(2023, 12).unwrap().last_day(), date(2023, 12, 31));
    }

    #[test]
    fn test_month_range_crosses_year_boundary() {
        let months: Vec<String> = month_range(date(2023, 11, 20), date(2024, 1, 5))
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(months, vec!["2023-11", "2023-12", "2024-01"]);
    }

    #[test]
    fn test_month_range_empty_when_reversed() {
        assert!(month_range(date(2024, 5, 1), date(2024, 4, 30)).is_empty());
    }

    #[test]
    fn test_invalid_month_rejected() {
        assert!(YearMonth::new(2024, 13).is_err());
    }

    #[test]
    fn test_parse_date_accepts_timestamp() {
        assert_eq!(parse_date("2024-01-15T10:30:00Z").unwrap(), date(2024, 1, 15));
        assert!(parse_date("01/15/2024").is_err());
    }

    #[test]
    fn test_months_before_clamps() {
        assert_eq!(months_before(date(2024, 3, 31), 1), date(2024, 2, 29));
        assert_eq!(months_before(date(2024, 10, 19), 12), date(2023, 10, 19));
    }
}
