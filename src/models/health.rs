//! Health metric and fitness goal models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::member::MemberId;

/// A point-in-time body measurement recorded by a member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct HealthMetric {
    /// Unique record identifier.
    pub id: i64,
    /// Measured member.
    pub member_id: MemberId,
    /// Recording timestamp.
    pub recorded_at: DateTime<Utc>,
    /// Weight in kilograms.
    pub weight: Option<f64>,
    /// Height in centimetres.
    pub height: Option<f64>,
    /// Resting heart rate in beats per minute.
    pub heart_rate: Option<i64>,
    /// Blood pressure as written, e.g. `120/80`.
    pub blood_pressure: Option<String>,
    /// Body fat percentage.
    pub body_fat_percentage: Option<f64>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Measurements submitted by a member; every field is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct NewHealthMetric {
    /// Weight in kilograms.
    pub weight: Option<f64>,
    /// Height in centimetres.
    pub height: Option<f64>,
    /// Resting heart rate.
    pub heart_rate: Option<i64>,
    /// Blood pressure.
    pub blood_pressure: Option<String>,
    /// Body fat percentage.
    pub body_fat_percentage: Option<f64>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Progress state of a fitness goal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    /// Being worked towards.
    Active,
    /// Target reached.
    Achieved,
    /// Given up.
    Abandoned,
}

/// A member's fitness target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct FitnessGoal {
    /// Unique record identifier.
    pub id: i64,
    /// Owning member.
    pub member_id: MemberId,
    /// Kind of goal, e.g. `Weight Loss`.
    pub goal_type: String,
    /// Value to reach.
    pub target_value: Option<f64>,
    /// Value at the time the goal was set.
    pub current_value: Option<f64>,
    /// Deadline.
    pub target_date: Option<NaiveDate>,
    /// Progress state.
    pub status: GoalStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Payload for a new goal.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct NewFitnessGoal {
    /// Kind of goal.
    pub goal_type: String,
    /// Value to reach.
    pub target_value: Option<f64>,
    /// Current value.
    pub current_value: Option<f64>,
    /// Deadline.
    pub target_date: Option<NaiveDate>,
}
