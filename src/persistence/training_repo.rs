//! Personal training session repository for `SQLite` persistence.
//!
//! The free functions taking a [`SqliteExecutor`] are the reads and the
//! insert the scheduler runs inside its booking transaction; the
//! [`TrainingRepo`] methods serve everything else from the pool.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqliteExecutor;

use crate::models::clock::{format_date, format_time, TimeRange};
use crate::models::member::MemberId;
use crate::models::room::RoomId;
use crate::models::trainer::TrainerId;
use crate::models::training::{
    BookingRequest, SessionId, SessionListing, SessionStatus, TrainingSession,
};
use crate::{AppError, Result};

use super::db::Database;
use super::{column_date, column_time, column_timestamp, timestamp_text};

/// Repository wrapper around `SQLite` for training session records.
#[derive(Clone)]
pub struct TrainingRepo {
    db: Arc<Database>,
}

/// Internal row struct for `SQLite` deserialization.
#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: i64,
    member_id: i64,
    trainer_id: i64,
    room_id: i64,
    session_date: String,
    start_time: String,
    end_time: String,
    status: String,
    notes: Option<String>,
    created_at: String,
}

impl SessionRow {
    /// Convert a database row into the domain model.
    fn into_session(self) -> Result<TrainingSession> {
        Ok(TrainingSession {
            id: self.session_id,
            member_id: self.member_id,
            trainer_id: self.trainer_id,
            room_id: self.room_id,
            session_date: column_date(&self.session_date, "session_date")?,
            start_time: column_time(&self.start_time, "start_time")?,
            end_time: column_time(&self.end_time, "end_time")?,
            status: parse_session_status(&self.status)?,
            notes: self.notes,
            created_at: column_timestamp(&self.created_at, "created_at")?,
        })
    }
}

/// Internal row struct for joined session listings.
#[derive(sqlx::FromRow)]
struct ListingRow {
    session_id: i64,
    session_date: String,
    start_time: String,
    end_time: String,
    status: String,
    trainer_name: String,
    member_name: String,
    room_name: String,
    notes: Option<String>,
}

impl ListingRow {
    fn into_listing(self) -> Result<SessionListing> {
        Ok(SessionListing {
            id: self.session_id,
            session_date: column_date(&self.session_date, "session_date")?,
            start_time: column_time(&self.start_time, "start_time")?,
            end_time: column_time(&self.end_time, "end_time")?,
            status: parse_session_status(&self.status)?,
            trainer_name: self.trainer_name,
            member_name: self.member_name,
            room_name: self.room_name,
            notes: self.notes,
        })
    }
}

/// Internal row struct for interval-only reads.
#[derive(sqlx::FromRow)]
struct SlotRow {
    room_id: i64,
    start_time: String,
    end_time: String,
}

impl SlotRow {
    fn range(&self) -> Result<TimeRange> {
        Ok(TimeRange {
            start: column_time(&self.start_time, "start_time")?,
            end: column_time(&self.end_time, "end_time")?,
        })
    }
}

fn parse_session_status(s: &str) -> Result<SessionStatus> {
    match s {
        "scheduled" => Ok(SessionStatus::Scheduled),
        "cancelled" => Ok(SessionStatus::Cancelled),
        "completed" => Ok(SessionStatus::Completed),
        other => Err(AppError::Db(format!("invalid session status: {other}"))),
    }
}

fn session_status_str(s: SessionStatus) -> &'static str {
    match s {
        SessionStatus::Scheduled => "scheduled",
        SessionStatus::Cancelled => "cancelled",
        SessionStatus::Completed => "completed",
    }
}

/// Map an abort raised by the overlap triggers to its booking rejection.
fn overlap_rejection(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db_err) = err {
        let message = db_err.message();
        if message.contains("trainer already booked") {
            return AppError::Conflict(message.to_owned());
        }
        if message.contains("room already booked") {
            return AppError::NoRoomAvailable(message.to_owned());
        }
    }
    AppError::from(err)
}

const LISTING_SELECT: &str = "SELECT pts.session_id, pts.session_date, pts.start_time, pts.end_time,
            pts.status, pts.notes,
            t.first_name || ' ' || t.last_name AS trainer_name,
            m.first_name || ' ' || m.last_name AS member_name,
            r.room_name
     FROM personal_training_session pts
     JOIN trainer t ON pts.trainer_id = t.trainer_id
     JOIN member m ON pts.member_id = m.member_id
     JOIN room r ON pts.room_id = r.room_id";

/// Slots of the trainer's scheduled sessions on `date`.
///
/// # Errors
///
/// Returns `AppError::Db` if the query fails or a stored row is malformed.
pub(crate) async fn trainer_bookings<'e, E>(
    executor: E,
    trainer_id: TrainerId,
    date: NaiveDate,
) -> Result<Vec<TimeRange>>
where
    E: SqliteExecutor<'e>,
{
    let rows: Vec<SlotRow> = sqlx::query_as(
        "SELECT room_id, start_time, end_time FROM personal_training_session
         WHERE trainer_id = ?1 AND session_date = ?2 AND status = 'scheduled'
         ORDER BY start_time",
    )
    .bind(trainer_id)
    .bind(format_date(date))
    .fetch_all(executor)
    .await?;

    rows.iter().map(SlotRow::range).collect()
}

/// `(room, slot)` pairs of every scheduled session on `date`.
///
/// # Errors
///
/// Returns `AppError::Db` if the query fails or a stored row is malformed.
pub(crate) async fn room_bookings<'e, E>(
    executor: E,
    date: NaiveDate,
) -> Result<Vec<(RoomId, TimeRange)>>
where
    E: SqliteExecutor<'e>,
{
    let rows: Vec<SlotRow> = sqlx::query_as(
        "SELECT room_id, start_time, end_time FROM personal_training_session
         WHERE session_date = ?1 AND status = 'scheduled'
         ORDER BY room_id, start_time",
    )
    .bind(format_date(date))
    .fetch_all(executor)
    .await?;

    rows.iter()
        .map(|row| row.range().map(|range| (row.room_id, range)))
        .collect()
}

/// Insert a scheduled session in `room_id` and return the stored record.
///
/// # Errors
///
/// Returns `AppError::Conflict` or `AppError::NoRoomAvailable` when an
/// overlap trigger aborts the insert, `AppError::Db` for other failures.
pub(crate) async fn insert_scheduled<'e, E>(
    executor: E,
    request: &BookingRequest,
    room_id: RoomId,
    created_at: DateTime<Utc>,
) -> Result<TrainingSession>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        "INSERT INTO personal_training_session
            (member_id, trainer_id, room_id, session_date, start_time, end_time,
             status, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )
    .bind(request.member_id)
    .bind(request.trainer_id)
    .bind(room_id)
    .bind(format_date(request.session_date))
    .bind(format_time(request.slot.start))
    .bind(format_time(request.slot.end))
    .bind(session_status_str(SessionStatus::Scheduled))
    .bind(&request.notes)
    .bind(timestamp_text(created_at))
    .execute(executor)
    .await
    .map_err(overlap_rejection)?;

    Ok(TrainingSession {
        id: result.last_insert_rowid(),
        member_id: request.member_id,
        trainer_id: request.trainer_id,
        room_id,
        session_date: request.session_date,
        start_time: request.slot.start,
        end_time: request.slot.end,
        status: SessionStatus::Scheduled,
        notes: request.notes.clone(),
        created_at,
    })
}

impl TrainingRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Retrieve a session by identifier.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the session does not exist.
    pub async fn get_by_id(&self, id: SessionId) -> Result<TrainingSession> {
        let row: Option<SessionRow> =
            sqlx::query_as("SELECT * FROM personal_training_session WHERE session_id = ?1")
                .bind(id)
                .fetch_optional(self.db.as_ref())
                .await?;

        row.ok_or_else(|| AppError::NotFound(format!("session {id} not found")))?
            .into_session()
    }

    /// Move a session to `next`, respecting the lifecycle.
    ///
    /// The update is conditional on the status read, so a concurrent
    /// transition makes this call fail instead of overwriting it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for unknown sessions and
    /// `AppError::InvalidInput` if the transition is not permitted.
    pub async fn update_status(
        &self,
        id: SessionId,
        next: SessionStatus,
    ) -> Result<TrainingSession> {
        let mut current = self.get_by_id(id).await?;
        if !current.can_transition_to(next) {
            return Err(AppError::InvalidInput(format!(
                "session {id} cannot move from {} to {}",
                session_status_str(current.status),
                session_status_str(next)
            )));
        }

        let result = sqlx::query(
            "UPDATE personal_training_session SET status = ?1
             WHERE session_id = ?2 AND status = ?3",
        )
        .bind(session_status_str(next))
        .bind(id)
        .bind(session_status_str(current.status))
        .execute(self.db.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::InvalidInput(format!(
                "session {id} changed status concurrently"
            )));
        }

        current.status = next;
        Ok(current)
    }

    /// Next scheduled sessions of a member from `today`, earliest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn upcoming_for_member(
        &self,
        member_id: MemberId,
        today: NaiveDate,
        limit: u32,
    ) -> Result<Vec<SessionListing>> {
        let query = format!(
            "{LISTING_SELECT}
             WHERE pts.member_id = ?1 AND pts.session_date >= ?2 AND pts.status = 'scheduled'
             ORDER BY pts.session_date, pts.start_time
             LIMIT ?3"
        );
        let rows: Vec<ListingRow> = sqlx::query_as(&query)
            .bind(member_id)
            .bind(format_date(today))
            .bind(i64::from(limit))
            .fetch_all(self.db.as_ref())
            .await?;

        rows.into_iter().map(ListingRow::into_listing).collect()
    }

    /// All scheduled sessions of a trainer from `today`, earliest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn upcoming_for_trainer(
        &self,
        trainer_id: TrainerId,
        today: NaiveDate,
    ) -> Result<Vec<SessionListing>> {
        let query = format!(
            "{LISTING_SELECT}
             WHERE pts.trainer_id = ?1 AND pts.session_date >= ?2 AND pts.status = 'scheduled'
             ORDER BY pts.session_date, pts.start_time"
        );
        let rows: Vec<ListingRow> = sqlx::query_as(&query)
            .bind(trainer_id)
            .bind(format_date(today))
            .fetch_all(self.db.as_ref())
            .await?;

        rows.into_iter().map(ListingRow::into_listing).collect()
    }
}
