//! Route handlers grouped by caller role.

pub mod admin;
pub mod health;
pub mod member;
pub mod trainer;

use chrono::{NaiveDate, Utc};

/// Today's date in UTC, the reference point for "upcoming" listings.
fn today() -> NaiveDate {
    Utc::now().date_naive()
}
