//! Health metric and fitness goal repository for `SQLite` persistence.

use std::sync::Arc;

use chrono::Utc;

use crate::models::clock::format_date;
use crate::models::health::{
    FitnessGoal, GoalStatus, HealthMetric, NewFitnessGoal, NewHealthMetric,
};
use crate::models::member::MemberId;
use crate::{AppError, Result};

use super::db::Database;
use super::member_repo::member_exists;
use super::{column_opt_date, column_timestamp, timestamp_text};

/// Number of metrics returned by [`HealthRepo::recent_metrics`].
pub const RECENT_METRICS: u32 = 10;

/// Repository wrapper around `SQLite` for member health data.
#[derive(Clone)]
pub struct HealthRepo {
    db: Arc<Database>,
}

/// Internal row struct for `SQLite` deserialization.
#[derive(sqlx::FromRow)]
struct MetricRow {
    metric_id: i64,
    member_id: i64,
    recorded_at: String,
    weight: Option<f64>,
    height: Option<f64>,
    heart_rate: Option<i64>,
    blood_pressure: Option<String>,
    body_fat_percentage: Option<f64>,
    notes: Option<String>,
}

impl MetricRow {
    fn into_metric(self) -> Result<HealthMetric> {
        Ok(HealthMetric {
            id: self.metric_id,
            member_id: self.member_id,
            recorded_at: column_timestamp(&self.recorded_at, "recorded_at")?,
            weight: self.weight,
            height: self.height,
            heart_rate: self.heart_rate,
            blood_pressure: self.blood_pressure,
            body_fat_percentage: self.body_fat_percentage,
            notes: self.notes,
        })
    }
}

/// Internal row struct for goals.
#[derive(sqlx::FromRow)]
struct GoalRow {
    goal_id: i64,
    member_id: i64,
    goal_type: String,
    target_value: Option<f64>,
    current_value: Option<f64>,
    target_date: Option<String>,
    status: String,
    created_at: String,
}

impl GoalRow {
    fn into_goal(self) -> Result<FitnessGoal> {
        Ok(FitnessGoal {
            id: self.goal_id,
            member_id: self.member_id,
            goal_type: self.goal_type,
            target_value: self.target_value,
            current_value: self.current_value,
            target_date: column_opt_date(self.target_date.as_deref(), "target_date")?,
            status: parse_goal_status(&self.status)?,
            created_at: column_timestamp(&self.created_at, "created_at")?,
        })
    }
}

fn parse_goal_status(s: &str) -> Result<GoalStatus> {
    match s {
        "active" => Ok(GoalStatus::Active),
        "achieved" => Ok(GoalStatus::Achieved),
        "abandoned" => Ok(GoalStatus::Abandoned),
        other => Err(AppError::Db(format!("invalid goal status: {other}"))),
    }
}

fn goal_status_str(s: GoalStatus) -> &'static str {
    match s {
        GoalStatus::Active => "active",
        GoalStatus::Achieved => "achieved",
        GoalStatus::Abandoned => "abandoned",
    }
}

impl HealthRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    async fn ensure_member(&self, member_id: MemberId) -> Result<()> {
        if member_exists(self.db.as_ref(), member_id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("member {member_id} not found")))
        }
    }

    /// Record a measurement stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown member, or `AppError::Db`
    /// if the insert fails.
    pub async fn add_metric(
        &self,
        member_id: MemberId,
        new: &NewHealthMetric,
    ) -> Result<HealthMetric> {
        self.ensure_member(member_id).await?;

        let recorded_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO health_metric (member_id, recorded_at, weight, height, heart_rate,
                                        blood_pressure, body_fat_percentage, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(member_id)
        .bind(timestamp_text(recorded_at))
        .bind(new.weight)
        .bind(new.height)
        .bind(new.heart_rate)
        .bind(&new.blood_pressure)
        .bind(new.body_fat_percentage)
        .bind(&new.notes)
        .execute(self.db.as_ref())
        .await?;

        Ok(HealthMetric {
            id: result.last_insert_rowid(),
            member_id,
            recorded_at,
            weight: new.weight,
            height: new.height,
            heart_rate: new.heart_rate,
            blood_pressure: new.blood_pressure.clone(),
            body_fat_percentage: new.body_fat_percentage,
            notes: new.notes.clone(),
        })
    }

    /// The member's last [`RECENT_METRICS`] measurements, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn recent_metrics(&self, member_id: MemberId) -> Result<Vec<HealthMetric>> {
        let rows: Vec<MetricRow> = sqlx::query_as(
            "SELECT * FROM health_metric WHERE member_id = ?1
             ORDER BY recorded_at DESC, metric_id DESC
             LIMIT ?2",
        )
        .bind(member_id)
        .bind(i64::from(RECENT_METRICS))
        .fetch_all(self.db.as_ref())
        .await?;

        rows.into_iter().map(MetricRow::into_metric).collect()
    }

    /// The member's newest measurement, if any.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn latest_metric(&self, member_id: MemberId) -> Result<Option<HealthMetric>> {
        let row: Option<MetricRow> = sqlx::query_as(
            "SELECT * FROM health_metric WHERE member_id = ?1
             ORDER BY recorded_at DESC, metric_id DESC
             LIMIT 1",
        )
        .bind(member_id)
        .fetch_optional(self.db.as_ref())
        .await?;

        row.map(MetricRow::into_metric).transpose()
    }

    /// Set a new active goal.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` for an empty goal type,
    /// `AppError::NotFound` for an unknown member, or `AppError::Db` if the
    /// insert fails.
    pub async fn add_goal(&self, member_id: MemberId, new: &NewFitnessGoal) -> Result<FitnessGoal> {
        let goal_type = new.goal_type.trim();
        if goal_type.is_empty() {
            return Err(AppError::InvalidInput("goal type must not be empty".into()));
        }
        self.ensure_member(member_id).await?;

        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO fitness_goal (member_id, goal_type, target_value, current_value,
                                       target_date, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(member_id)
        .bind(goal_type)
        .bind(new.target_value)
        .bind(new.current_value)
        .bind(new.target_date.map(format_date))
        .bind(goal_status_str(GoalStatus::Active))
        .bind(timestamp_text(created_at))
        .execute(self.db.as_ref())
        .await?;

        Ok(FitnessGoal {
            id: result.last_insert_rowid(),
            member_id,
            goal_type: goal_type.to_owned(),
            target_value: new.target_value,
            current_value: new.current_value,
            target_date: new.target_date,
            status: GoalStatus::Active,
            created_at,
        })
    }

    /// Every goal of the member, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn list_goals(&self, member_id: MemberId) -> Result<Vec<FitnessGoal>> {
        let rows: Vec<GoalRow> = sqlx::query_as(
            "SELECT * FROM fitness_goal WHERE member_id = ?1
             ORDER BY created_at DESC, goal_id DESC",
        )
        .bind(member_id)
        .fetch_all(self.db.as_ref())
        .await?;

        rows.into_iter().map(GoalRow::into_goal).collect()
    }

    /// Active goals of the member, nearest deadline first; undated goals last.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn active_goals(&self, member_id: MemberId) -> Result<Vec<FitnessGoal>> {
        let rows: Vec<GoalRow> = sqlx::query_as(
            "SELECT * FROM fitness_goal WHERE member_id = ?1 AND status = 'active'
             ORDER BY target_date IS NULL, target_date, goal_id",
        )
        .bind(member_id)
        .fetch_all(self.db.as_ref())
        .await?;

        rows.into_iter().map(GoalRow::into_goal).collect()
    }
}
