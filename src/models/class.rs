//! Group class and registration models.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::member::MemberId;
use super::room::RoomId;
use super::trainer::TrainerId;

/// Class primary key.
pub type ClassId = i64;

/// Lifecycle status for a group class.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClassStatus {
    /// Open on the timetable.
    Scheduled,
    /// Called off.
    Cancelled,
    /// Held.
    Completed,
}

/// A scheduled group class with its enrollment counters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GroupClass {
    /// Unique record identifier.
    pub id: ClassId,
    /// Display name.
    pub name: String,
    /// Instructor.
    pub trainer_id: TrainerId,
    /// Room hosting the class.
    pub room_id: RoomId,
    /// Calendar date.
    pub schedule_date: NaiveDate,
    /// Start (inclusive).
    pub start_time: NaiveTime,
    /// End (exclusive).
    pub end_time: NaiveTime,
    /// Maximum number of registered members.
    pub capacity: i64,
    /// Members currently registered.
    pub current_enrollment: i64,
    /// Current lifecycle status.
    pub status: ClassStatus,
}

impl GroupClass {
    /// Places still open.
    #[must_use]
    pub fn spots_left(&self) -> i64 {
        (self.capacity - self.current_enrollment).max(0)
    }
}

/// Payload for putting a class on the timetable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClass {
    /// Display name.
    pub name: String,
    /// Instructor.
    pub trainer_id: TrainerId,
    /// Room hosting the class.
    pub room_id: RoomId,
    /// Calendar date.
    pub schedule_date: NaiveDate,
    /// Start (inclusive).
    pub start_time: NaiveTime,
    /// End (exclusive).
    pub end_time: NaiveTime,
    /// Maximum number of registered members.
    pub capacity: i64,
}

/// Class joined with instructor and room names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ClassListing {
    /// The class itself.
    #[serde(flatten)]
    pub class: GroupClass,
    /// `First Last` of the instructor.
    pub trainer_name: String,
    /// Hosting room name.
    pub room_name: String,
    /// Places still open when the listing was read.
    pub spots_left: i64,
    /// Registration status of the viewing member, when listed for one.
    pub registration_status: Option<RegistrationStatus>,
}

/// Status of a member's class registration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    /// Holding a place.
    Registered,
    /// Withdrawn.
    Cancelled,
    /// Attended the class.
    Attended,
}

/// A member's place in a class.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ClassRegistration {
    /// Unique record identifier.
    pub id: i64,
    /// Registered member.
    pub member_id: MemberId,
    /// Class registered for.
    pub class_id: ClassId,
    /// Registration timestamp.
    pub registered_at: DateTime<Utc>,
    /// Current status.
    pub status: RegistrationStatus,
}
