//! Trainer and weekly availability repository for `SQLite` persistence.

use std::sync::Arc;

use chrono::Weekday;
use sqlx::SqliteExecutor;

use crate::models::clock::{format_time, parse_weekday, weekday_name, TimeRange};
use crate::models::trainer::{AvailabilityWindow, NewTrainer, Trainer, TrainerId};
use crate::{AppError, Result};

use super::column_time;
use super::db::Database;

/// Repository wrapper around `SQLite` for trainers and their availability.
#[derive(Clone)]
pub struct TrainerRepo {
    db: Arc<Database>,
}

/// Internal row struct for `SQLite` deserialization.
#[derive(sqlx::FromRow)]
struct TrainerRow {
    trainer_id: i64,
    email: String,
    first_name: String,
    last_name: String,
    specialization: Option<String>,
    phone: Option<String>,
}

impl From<TrainerRow> for Trainer {
    fn from(row: TrainerRow) -> Self {
        Self {
            id: row.trainer_id,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            specialization: row.specialization,
            phone: row.phone,
        }
    }
}

/// Internal row struct for availability windows.
#[derive(sqlx::FromRow)]
struct AvailabilityRow {
    availability_id: i64,
    trainer_id: i64,
    day_of_week: String,
    start_time: String,
    end_time: String,
}

impl AvailabilityRow {
    fn into_window(self) -> Result<AvailabilityWindow> {
        let day_of_week = parse_weekday(&self.day_of_week)
            .map_err(|_| AppError::Db(format!("invalid day_of_week: {}", self.day_of_week)))?;

        Ok(AvailabilityWindow {
            id: self.availability_id,
            trainer_id: self.trainer_id,
            day_of_week,
            start_time: column_time(&self.start_time, "start_time")?,
            end_time: column_time(&self.end_time, "end_time")?,
        })
    }
}

/// Availability windows of `trainer_id` on `day`, usable inside a transaction.
///
/// # Errors
///
/// Returns `AppError::Db` if the query fails or a stored row is malformed.
pub(crate) async fn windows_on_day<'e, E>(
    executor: E,
    trainer_id: TrainerId,
    day: Weekday,
) -> Result<Vec<TimeRange>>
where
    E: SqliteExecutor<'e>,
{
    let rows: Vec<AvailabilityRow> = sqlx::query_as(
        "SELECT availability_id, trainer_id, day_of_week, start_time, end_time
         FROM trainer_availability
         WHERE trainer_id = ?1 AND day_of_week = ?2
         ORDER BY start_time",
    )
    .bind(trainer_id)
    .bind(weekday_name(day))
    .fetch_all(executor)
    .await?;

    rows.into_iter()
        .map(|row| row.into_window().map(|w| w.range()))
        .collect()
}

/// Whether a trainer row exists, usable inside a transaction.
///
/// # Errors
///
/// Returns `AppError::Db` if the query fails.
pub(crate) async fn trainer_exists<'e, E>(executor: E, trainer_id: TrainerId) -> Result<bool>
where
    E: SqliteExecutor<'e>,
{
    let row: Option<(i64,)> = sqlx::query_as("SELECT trainer_id FROM trainer WHERE trainer_id = ?1")
        .bind(trainer_id)
        .fetch_optional(executor)
        .await?;
    Ok(row.is_some())
}

impl TrainerRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Insert a new trainer record.
    ///
    /// # Errors
    ///
    /// Returns `AppError::AlreadyExists` if the e-mail is taken, or
    /// `AppError::Db` if the insert fails.
    pub async fn create(&self, new: &NewTrainer) -> Result<Trainer> {
        let result = sqlx::query(
            "INSERT INTO trainer (email, first_name, last_name, specialization, phone)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(new.email.trim())
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.specialization)
        .bind(&new.phone)
        .execute(self.db.as_ref())
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::AlreadyExists(format!("trainer {} already exists", new.email))
            }
            other => AppError::from(other),
        })?;

        self.get_by_id(result.last_insert_rowid()).await
    }

    /// Retrieve a trainer by identifier.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the trainer does not exist.
    pub async fn get_by_id(&self, id: TrainerId) -> Result<Trainer> {
        let row: Option<TrainerRow> = sqlx::query_as(
            "SELECT trainer_id, email, first_name, last_name, specialization, phone
             FROM trainer WHERE trainer_id = ?1",
        )
        .bind(id)
        .fetch_optional(self.db.as_ref())
        .await?;

        row.map(Trainer::from)
            .ok_or_else(|| AppError::NotFound(format!("trainer {id} not found")))
    }

    /// All trainers ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn list(&self) -> Result<Vec<Trainer>> {
        let rows: Vec<TrainerRow> = sqlx::query_as(
            "SELECT trainer_id, email, first_name, last_name, specialization, phone
             FROM trainer ORDER BY trainer_id",
        )
        .fetch_all(self.db.as_ref())
        .await?;

        Ok(rows.into_iter().map(Trainer::from).collect())
    }

    /// Add a weekly availability window for a trainer.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the trainer does not exist, or
    /// `AppError::Db` if the insert fails.
    pub async fn add_availability(
        &self,
        trainer_id: TrainerId,
        day: Weekday,
        range: TimeRange,
    ) -> Result<AvailabilityWindow> {
        if !trainer_exists(self.db.as_ref(), trainer_id).await? {
            return Err(AppError::NotFound(format!("trainer {trainer_id} not found")));
        }

        let result = sqlx::query(
            "INSERT INTO trainer_availability (trainer_id, day_of_week, start_time, end_time)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(trainer_id)
        .bind(weekday_name(day))
        .bind(format_time(range.start))
        .bind(format_time(range.end))
        .execute(self.db.as_ref())
        .await?;

        Ok(AvailabilityWindow {
            id: result.last_insert_rowid(),
            trainer_id,
            day_of_week: day,
            start_time: range.start,
            end_time: range.end,
        })
    }

    /// Weekly availability of a trainer, Monday first, then by start time.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn list_availability(
        &self,
        trainer_id: TrainerId,
    ) -> Result<Vec<AvailabilityWindow>> {
        let rows: Vec<AvailabilityRow> = sqlx::query_as(
            "SELECT availability_id, trainer_id, day_of_week, start_time, end_time
             FROM trainer_availability
             WHERE trainer_id = ?1
             ORDER BY
                CASE day_of_week
                    WHEN 'Monday' THEN 1
                    WHEN 'Tuesday' THEN 2
                    WHEN 'Wednesday' THEN 3
                    WHEN 'Thursday' THEN 4
                    WHEN 'Friday' THEN 5
                    WHEN 'Saturday' THEN 6
                    WHEN 'Sunday' THEN 7
                END,
                start_time",
        )
        .bind(trainer_id)
        .fetch_all(self.db.as_ref())
        .await?;

        rows.into_iter().map(AvailabilityRow::into_window).collect()
    }
}
