//! Transactional booking of personal training sessions.
//!
//! [`Scheduler::book`] opens a `BEGIN IMMEDIATE` transaction, loads the
//! state the planner needs, asks [`planner::plan`] for a room and inserts
//! the session before committing. Returning early drops the transaction,
//! which rolls it back, so a rejected or failed booking writes nothing.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{info, info_span, warn, Instrument};

use crate::models::clock::{format_date, weekday_of, TimeRange};
use crate::models::member::MemberId;
use crate::models::room::Room;
use crate::models::trainer::TrainerId;
use crate::models::training::{BookingRequest, SessionId, SessionStatus, TrainingSession};
use crate::persistence::db::Database;
use crate::persistence::member_repo::member_exists;
use crate::persistence::room_repo::{room_ids_of_type, RoomRepo};
use crate::persistence::trainer_repo::{trainer_exists, windows_on_day};
use crate::persistence::training_repo::{
    insert_scheduled, room_bookings, trainer_bookings, TrainingRepo,
};
use crate::{AppError, Result};

use super::planner::{self, PlanInput};

/// Books, cancels and completes personal training sessions.
#[derive(Clone)]
pub struct Scheduler {
    db: Arc<Database>,
    eligible_room_type: String,
}

impl Scheduler {
    /// Create a scheduler allocating rooms of `eligible_room_type`.
    #[must_use]
    pub fn new(db: Arc<Database>, eligible_room_type: impl Into<String>) -> Self {
        Self {
            db,
            eligible_room_type: eligible_room_type.into(),
        }
    }

    /// Room type sessions are allocated to.
    #[must_use]
    pub fn eligible_room_type(&self) -> &str {
        &self.eligible_room_type
    }

    /// Book a session, allocating the lowest-id free eligible room.
    ///
    /// # Errors
    ///
    /// - `AppError::InvalidInput` if the slot is empty or inverted.
    /// - `AppError::NotFound` for an unknown member or trainer.
    /// - `AppError::NotAvailable`, `AppError::Conflict` or
    ///   `AppError::NoRoomAvailable` when the booking is rejected.
    /// - `AppError::Db` on storage failure; nothing is written.
    pub async fn book(&self, request: &BookingRequest) -> Result<TrainingSession> {
        let span = info_span!(
            "book_session",
            member_id = request.member_id,
            trainer_id = request.trainer_id,
            session_date = %format_date(request.session_date),
        );
        self.book_in_transaction(request).instrument(span).await
    }

    async fn book_in_transaction(&self, request: &BookingRequest) -> Result<TrainingSession> {
        if request.slot.start >= request.slot.end {
            return Err(AppError::InvalidInput(
                "start time must be before end time".into(),
            ));
        }

        let mut tx = self.db.begin_with("BEGIN IMMEDIATE").await?;

        if !member_exists(&mut *tx, request.member_id).await? {
            return Err(AppError::NotFound(format!(
                "member {} not found",
                request.member_id
            )));
        }
        if !trainer_exists(&mut *tx, request.trainer_id).await? {
            return Err(AppError::NotFound(format!(
                "trainer {} not found",
                request.trainer_id
            )));
        }

        let day = weekday_of(request.session_date);
        let windows = windows_on_day(&mut *tx, request.trainer_id, day).await?;
        let trainer_busy =
            trainer_bookings(&mut *tx, request.trainer_id, request.session_date).await?;
        let eligible_rooms = room_ids_of_type(&mut *tx, &self.eligible_room_type).await?;
        let room_busy = room_bookings(&mut *tx, request.session_date).await?;

        let booked = match planner::plan(&PlanInput {
            slot: request.slot,
            windows: &windows,
            trainer_busy: &trainer_busy,
            eligible_rooms: &eligible_rooms,
            room_busy: &room_busy,
        }) {
            Ok(room_id) => insert_scheduled(&mut *tx, request, room_id, Utc::now()).await,
            Err(err) => Err(err),
        };
        let session = match booked {
            Ok(session) => session,
            Err(err) => {
                // Trigger aborts at insert land here too.
                if err.is_booking_rejection() {
                    warn!(%err, "booking rejected");
                }
                return Err(err);
            }
        };
        tx.commit().await?;

        info!(
            session_id = session.id,
            room_id = session.room_id,
            "session booked"
        );
        Ok(session)
    }

    /// Cancel a member's scheduled session, freeing its trainer and room.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the session does not exist or belongs
    /// to another member, and `AppError::InvalidInput` unless it is
    /// scheduled.
    pub async fn cancel(
        &self,
        member_id: MemberId,
        session_id: SessionId,
    ) -> Result<TrainingSession> {
        let span = info_span!("cancel_session", member_id, session_id);
        self.transition(session_id, SessionStatus::Cancelled, move |s| s.member_id == member_id)
            .instrument(span)
            .await
    }

    /// Mark a trainer's scheduled session as delivered.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the session does not exist or belongs
    /// to another trainer, and `AppError::InvalidInput` unless it is
    /// scheduled.
    pub async fn complete(
        &self,
        trainer_id: TrainerId,
        session_id: SessionId,
    ) -> Result<TrainingSession> {
        let span = info_span!("complete_session", trainer_id, session_id);
        self.transition(session_id, SessionStatus::Completed, move |s| s.trainer_id == trainer_id)
            .instrument(span)
            .await
    }

    /// Apply a lifecycle transition to a session the caller owns.
    async fn transition(
        &self,
        session_id: SessionId,
        next: SessionStatus,
        owns: impl Fn(&TrainingSession) -> bool,
    ) -> Result<TrainingSession> {
        let repo = TrainingRepo::new(Arc::clone(&self.db));
        let session = repo.get_by_id(session_id).await?;
        // Someone else's session is reported as missing.
        if !owns(&session) {
            return Err(AppError::NotFound(format!("session {session_id} not found")));
        }

        let session = repo.update_status(session_id, next).await?;
        info!(status = ?session.status, "session status updated");
        Ok(session)
    }

    /// Eligible rooms with no scheduled session overlapping `slot` on `date`.
    ///
    /// Read-only preview; a later booking may still lose the room.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` for an empty slot, `AppError::Db` on
    /// storage failure.
    pub async fn free_rooms(&self, date: NaiveDate, slot: TimeRange) -> Result<Vec<Room>> {
        if slot.start >= slot.end {
            return Err(AppError::InvalidInput(
                "start time must be before end time".into(),
            ));
        }

        let rooms = RoomRepo::new(Arc::clone(&self.db))
            .list_of_type(&self.eligible_room_type)
            .await?;
        let busy = room_bookings(self.db.as_ref(), date).await?;
        let ids: Vec<_> = rooms.iter().map(|room| room.id).collect();
        let free = planner::free_rooms(slot, &ids, &busy);

        Ok(rooms
            .into_iter()
            .filter(|room| free.contains(&room.id))
            .collect())
    }
}
