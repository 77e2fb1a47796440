//! Personal training session model.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::clock::TimeRange;
use super::member::MemberId;
use super::room::RoomId;
use super::trainer::TrainerId;

/// Session primary key.
pub type SessionId = i64;

/// Lifecycle status for a personal training session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Booked and holding its trainer and room.
    Scheduled,
    /// Cancelled by the member; no longer blocks the slot.
    Cancelled,
    /// Delivered by the trainer.
    Completed,
}

/// A booked one-to-one training session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct TrainingSession {
    /// Unique record identifier.
    pub id: SessionId,
    /// Member who booked the session.
    pub member_id: MemberId,
    /// Trainer running the session.
    pub trainer_id: TrainerId,
    /// Room allocated at booking time.
    pub room_id: RoomId,
    /// Calendar date.
    pub session_date: NaiveDate,
    /// Start (inclusive).
    pub start_time: NaiveTime,
    /// End (exclusive).
    pub end_time: NaiveTime,
    /// Current lifecycle status.
    pub status: SessionStatus,
    /// Free-form notes from the member.
    pub notes: Option<String>,
    /// Booking timestamp.
    pub created_at: DateTime<Utc>,
}

impl TrainingSession {
    /// The session slot as a time range.
    #[must_use]
    pub fn range(&self) -> TimeRange {
        TimeRange {
            start: self.start_time,
            end: self.end_time,
        }
    }

    /// Determine whether a lifecycle transition is permitted.
    #[must_use]
    pub fn can_transition_to(&self, next: SessionStatus) -> bool {
        matches!(
            (self.status, next),
            (
                SessionStatus::Scheduled,
                SessionStatus::Cancelled | SessionStatus::Completed
            )
        )
    }
}

/// A member's request for a session with a trainer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    /// Member booking the session.
    pub member_id: MemberId,
    /// Requested trainer.
    pub trainer_id: TrainerId,
    /// Requested date.
    pub session_date: NaiveDate,
    /// Requested slot.
    pub slot: TimeRange,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Session joined with the names shown on dashboards and schedules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SessionListing {
    /// Session identifier.
    pub id: SessionId,
    /// Calendar date.
    pub session_date: NaiveDate,
    /// Start (inclusive).
    pub start_time: NaiveTime,
    /// End (exclusive).
    pub end_time: NaiveTime,
    /// Current lifecycle status.
    pub status: SessionStatus,
    /// `First Last` of the trainer.
    pub trainer_name: String,
    /// `First Last` of the member.
    pub member_name: String,
    /// Allocated room name.
    pub room_name: String,
    /// Free-form notes.
    pub notes: Option<String>,
}
