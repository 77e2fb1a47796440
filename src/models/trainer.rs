//! Trainer and weekly availability models.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use super::clock::{weekday_serde, TimeRange};

/// Trainer primary key.
pub type TrainerId = i64;

/// A personal trainer employed by the club.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Trainer {
    /// Unique record identifier.
    pub id: TrainerId,
    /// Login e-mail; unique across trainers.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Area of expertise shown to members.
    pub specialization: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
}

impl Trainer {
    /// Display name as `First Last`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Payload for hiring a trainer.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct NewTrainer {
    /// Login e-mail.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Area of expertise.
    pub specialization: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
}

/// Recurring weekly interval during which a trainer accepts bookings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct AvailabilityWindow {
    /// Unique record identifier.
    pub id: i64,
    /// Owning trainer.
    pub trainer_id: TrainerId,
    /// Day of the week the window repeats on.
    #[serde(with = "weekday_serde")]
    pub day_of_week: Weekday,
    /// Window start (inclusive).
    pub start_time: NaiveTime,
    /// Window end (exclusive).
    pub end_time: NaiveTime,
}

impl AvailabilityWindow {
    /// The window as a time range.
    #[must_use]
    pub fn range(&self) -> TimeRange {
        TimeRange {
            start: self.start_time,
            end: self.end_time,
        }
    }
}
