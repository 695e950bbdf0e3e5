//! Time helpers for the scheduling view.
//!
//! Every timestamp handled here is a wall-clock value in the viewer's local
//! time. Nothing in this module converts between timezones: offsets found in
//! ISO-8601 input are dropped as-is.
//!
//! - [`YearMonth`]: a validated calendar month, the key of an availability page
//! - [`DayPeriod`]: the morning/afternoon bucket of an appointment
//! - formatting helpers for display times and header labels

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// First hour that belongs to the afternoon bucket.
pub const AFTERNOON_START_HOUR: u32 = 12;

/// Format used for appointment display times.
pub const DISPLAY_TIME_FORMAT: &str = "%H:%M";

/// Errors produced when parsing a [`YearMonth`] from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseYearMonthError {
    /// The input is not of the form `YYYY-MM`.
    #[error("expected YYYY-MM, got `{0}`")]
    Format(String),
    /// The year/month pair is not a valid calendar month.
    #[error("invalid calendar month: {year}-{month}")]
    OutOfRange { year: i32, month: u32 },
}

/// A calendar month (year + month), always valid.
///
/// Internally stored as the first day of the month, so ordering follows the
/// calendar. Serializes as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    /// Creates a month from a year and a 1-based month number.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// Returns the month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// The 1-based month number.
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// First day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// Returns the date for a day-of-month, or `None` if the month has no such day.
    pub fn day(&self, day: u32) -> Option<NaiveDate> {
        self.0.with_day(day)
    }

    /// Number of days in the month.
    pub fn num_days(&self) -> u32 {
        (28..=31).rev().find(|d| self.day(*d).is_some()).unwrap_or(28)
    }

    /// Iterates over every date of the month in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let month = self.month();
        self.0.iter_days().take_while(move |d| d.month() == month)
    }

    /// Returns true if `date` falls inside this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// The following month.
    pub fn succ(&self) -> Option<Self> {
        self.0.checked_add_months(Months::new(1)).map(Self)
    }

    /// The preceding month.
    pub fn pred(&self) -> Option<Self> {
        self.0.checked_sub_months(Months::new(1)).map(Self)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = ParseYearMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format_err = || ParseYearMonthError::Format(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(format_err)?;
        let year: i32 = year.parse().map_err(|_| format_err())?;
        let month: u32 = month.parse().map_err(|_| format_err())?;
        Self::new(year, month).ok_or(ParseYearMonthError::OutOfRange { year, month })
    }
}

impl TryFrom<String> for YearMonth {
    type Error = ParseYearMonthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

/// The display bucket an appointment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPeriod {
    /// Before noon.
    Morning,
    /// Noon and later.
    Afternoon,
}

impl DayPeriod {
    /// Buckets a timestamp by its hour.
    pub fn of(dt: NaiveDateTime) -> Self {
        if dt.hour() < AFTERNOON_START_HOUR {
            Self::Morning
        } else {
            Self::Afternoon
        }
    }
}

/// Formats the `HH:MM` display time of a timestamp.
pub fn format_display_time(dt: NaiveDateTime) -> String {
    dt.format(DISPLAY_TIME_FORMAT).to_string()
}

/// Long-form date label used in the view header, e.g. `June 10`.
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %-d").to_string()
}

/// Full weekday name, e.g. `Monday`.
pub fn format_weekday(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

/// Month label for the calendar caption, e.g. `June 2024`.
pub fn format_month(month: YearMonth) -> String {
    month.first_day().format("%B %Y").to_string()
}

/// Returns true if `date` is the calendar day of `now`.
pub fn is_same_day(date: NaiveDate, now: NaiveDateTime) -> bool {
    date == now.date()
}

/// Returns true for Saturday and Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Parses an ISO-8601 timestamp as a local wall-clock value.
///
/// RFC 3339 input keeps the wall-clock time written in the string; its offset
/// is ignored. Offset-less forms with or without seconds are accepted too.
pub fn parse_wall_clock(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}
