//! Calendar and time-of-day helpers.
//!
//! Dates travel as `YYYY-MM-DD`; times are accepted as `HH:MM` or
//! `HH:MM:SS` and always stored as `HH:MM:SS` so that text comparison in
//! `SQLite` agrees with chronological order.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::{AppError, Result};

/// Canonical date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Canonical time-of-day format.
pub const TIME_FORMAT: &str = "%H:%M:%S";

const SHORT_TIME_FORMAT: &str = "%H:%M";

/// Parse a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns `AppError::InvalidInput` if the value is not a calendar date.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|err| AppError::InvalidInput(format!("invalid date '{raw}': {err}")))
}

/// Parse a time of day in `HH:MM:SS` or `HH:MM` form.
///
/// # Errors
///
/// Returns `AppError::InvalidInput` if neither format matches.
pub fn parse_time(raw: &str) -> Result<NaiveTime> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(trimmed, SHORT_TIME_FORMAT))
        .map_err(|err| AppError::InvalidInput(format!("invalid time '{raw}': {err}")))
}

/// Parse a day-of-week name (`Monday`, `mon`, ...), case-insensitive.
///
/// # Errors
///
/// Returns `AppError::InvalidInput` for unknown names.
pub fn parse_weekday(raw: &str) -> Result<Weekday> {
    raw.trim()
        .parse::<Weekday>()
        .map_err(|_| AppError::InvalidInput(format!("invalid day of week '{raw}'")))
}

/// Format a date in canonical form.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Format a time of day in canonical form.
#[must_use]
pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Full English name of a weekday, as stored in the database.
#[must_use]
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Day of the week a calendar date falls on.
#[must_use]
pub fn weekday_of(date: NaiveDate) -> Weekday {
    date.weekday()
}

/// Serde adapter writing weekdays by their full English name.
pub mod weekday_serde {
    use chrono::Weekday;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize as `Monday`, `Tuesday`, ...
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn serialize<S>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(super::weekday_name(*day))
    }

    /// Deserialize from any name accepted by [`super::parse_weekday`].
    ///
    /// # Errors
    ///
    /// Fails on unknown day names.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Weekday, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_weekday(&raw).map_err(serde::de::Error::custom)
    }
}

/// Half-open `[start, end)` interval within a single day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeRange {
    /// Inclusive start.
    pub start: NaiveTime,
    /// Exclusive end.
    pub end: NaiveTime,
}

impl TimeRange {
    /// Build a non-empty range.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` unless `start < end`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self> {
        if start < end {
            Ok(Self { start, end })
        } else {
            Err(AppError::InvalidInput(format!(
                "start time {} must be before end time {}",
                format_time(start),
                format_time(end)
            )))
        }
    }

    /// Parse both ends from form input.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` on malformed times or an empty range.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_time(start)?, parse_time(end)?)
    }

    /// Half-open intersection test: touching ends do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Whether `other` lies entirely inside this range.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        self.start <= other.start && self.end >= other.end
    }
}
