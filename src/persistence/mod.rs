//! Persistence layer modules.

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};

use crate::models::clock::{DATE_FORMAT, TIME_FORMAT};
use crate::{AppError, Result};

pub mod billing_repo;
pub mod class_repo;
pub mod db;
pub mod health_repo;
pub mod member_repo;
pub mod room_repo;
pub mod schema;
pub mod stats_repo;
pub mod trainer_repo;
pub mod training_repo;

/// Re-export the database pool type for convenience.
pub use sqlx::SqlitePool;

/// Parse a stored `YYYY-MM-DD` column.
pub(crate) fn column_date(raw: &str, column: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| AppError::Db(format!("invalid {column}: {e}")))
}

/// Parse a stored `HH:MM:SS` column.
pub(crate) fn column_time(raw: &str, column: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, TIME_FORMAT)
        .map_err(|e| AppError::Db(format!("invalid {column}: {e}")))
}

/// Render a timestamp for storage.
///
/// Fixed microsecond precision keeps text order chronological.
pub(crate) fn timestamp_text(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored RFC 3339 timestamp column.
pub(crate) fn column_timestamp(raw: &str, column: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::Db(format!("invalid {column}: {e}")))
}

/// Parse an optional stored date column.
pub(crate) fn column_opt_date(raw: Option<&str>, column: &str) -> Result<Option<NaiveDate>> {
    raw.map(|s| column_date(s, column)).transpose()
}
