//! Group class and registration repository for `SQLite` persistence.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::models::class::{
    ClassId, ClassListing, ClassRegistration, ClassStatus, GroupClass, NewClass,
    RegistrationStatus,
};
use crate::models::clock::{format_date, format_time};
use crate::models::member::MemberId;
use crate::models::trainer::TrainerId;
use crate::{AppError, Result};

use super::db::Database;
use super::member_repo::member_exists;
use super::trainer_repo::trainer_exists;
use super::{column_date, column_time, timestamp_text};

/// Repository wrapper around `SQLite` for group classes.
#[derive(Clone)]
pub struct ClassRepo {
    db: Arc<Database>,
}

/// Internal row struct for classes joined with display names.
#[derive(sqlx::FromRow)]
struct ClassRow {
    class_id: i64,
    class_name: String,
    trainer_id: i64,
    room_id: i64,
    schedule_date: String,
    start_time: String,
    end_time: String,
    capacity: i64,
    current_enrollment: i64,
    status: String,
    trainer_name: String,
    room_name: String,
    registration_status: Option<String>,
}

impl ClassRow {
    fn into_listing(self) -> Result<ClassListing> {
        let registration_status = self
            .registration_status
            .as_deref()
            .map(parse_registration_status)
            .transpose()?;

        let class = GroupClass {
            id: self.class_id,
            name: self.class_name,
            trainer_id: self.trainer_id,
            room_id: self.room_id,
            schedule_date: column_date(&self.schedule_date, "schedule_date")?,
            start_time: column_time(&self.start_time, "start_time")?,
            end_time: column_time(&self.end_time, "end_time")?,
            capacity: self.capacity,
            current_enrollment: self.current_enrollment,
            status: parse_class_status(&self.status)?,
        };

        Ok(ClassListing {
            spots_left: class.spots_left(),
            class,
            trainer_name: self.trainer_name,
            room_name: self.room_name,
            registration_status,
        })
    }
}

fn parse_class_status(s: &str) -> Result<ClassStatus> {
    match s {
        "scheduled" => Ok(ClassStatus::Scheduled),
        "cancelled" => Ok(ClassStatus::Cancelled),
        "completed" => Ok(ClassStatus::Completed),
        other => Err(AppError::Db(format!("invalid class status: {other}"))),
    }
}

fn class_status_str(s: ClassStatus) -> &'static str {
    match s {
        ClassStatus::Scheduled => "scheduled",
        ClassStatus::Cancelled => "cancelled",
        ClassStatus::Completed => "completed",
    }
}

fn parse_registration_status(s: &str) -> Result<RegistrationStatus> {
    match s {
        "registered" => Ok(RegistrationStatus::Registered),
        "cancelled" => Ok(RegistrationStatus::Cancelled),
        "attended" => Ok(RegistrationStatus::Attended),
        other => Err(AppError::Db(format!("invalid registration status: {other}"))),
    }
}

fn registration_status_str(s: RegistrationStatus) -> &'static str {
    match s {
        RegistrationStatus::Registered => "registered",
        RegistrationStatus::Cancelled => "cancelled",
        RegistrationStatus::Attended => "attended",
    }
}

/// Class columns plus names; `?1` binds the viewing member (or NULL).
const LISTING_SELECT: &str = "SELECT c.class_id, c.class_name, c.trainer_id, c.room_id,
            c.schedule_date, c.start_time, c.end_time, c.capacity,
            c.current_enrollment, c.status,
            t.first_name || ' ' || t.last_name AS trainer_name,
            r.room_name,
            cr.status AS registration_status
     FROM class c
     JOIN trainer t ON c.trainer_id = t.trainer_id
     JOIN room r ON c.room_id = r.room_id
     LEFT JOIN class_registration cr ON cr.class_id = c.class_id AND cr.member_id = ?1";

impl ClassRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Put a class on the timetable with no registrations.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` for an empty interval or a
    /// non-positive capacity, `AppError::NotFound` for an unknown trainer or
    /// room, or `AppError::Db` if the insert fails.
    pub async fn create(&self, new: &NewClass) -> Result<ClassListing> {
        if new.start_time >= new.end_time {
            return Err(AppError::InvalidInput(
                "class start time must be before end time".into(),
            ));
        }
        if new.capacity <= 0 {
            return Err(AppError::InvalidInput(
                "class capacity must be greater than zero".into(),
            ));
        }
        if !trainer_exists(self.db.as_ref(), new.trainer_id).await? {
            return Err(AppError::NotFound(format!(
                "trainer {} not found",
                new.trainer_id
            )));
        }
        let room: Option<(i64,)> = sqlx::query_as("SELECT room_id FROM room WHERE room_id = ?1")
            .bind(new.room_id)
            .fetch_optional(self.db.as_ref())
            .await?;
        if room.is_none() {
            return Err(AppError::NotFound(format!("room {} not found", new.room_id)));
        }

        let result = sqlx::query(
            "INSERT INTO class (class_name, trainer_id, room_id, schedule_date, start_time,
                                end_time, capacity, current_enrollment, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8)",
        )
        .bind(&new.name)
        .bind(new.trainer_id)
        .bind(new.room_id)
        .bind(format_date(new.schedule_date))
        .bind(format_time(new.start_time))
        .bind(format_time(new.end_time))
        .bind(new.capacity)
        .bind(class_status_str(ClassStatus::Scheduled))
        .execute(self.db.as_ref())
        .await?;

        self.get_listing(result.last_insert_rowid(), None).await
    }

    /// Retrieve one class with names, optionally annotated for a member.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the class does not exist.
    pub async fn get_listing(
        &self,
        id: ClassId,
        member_id: Option<MemberId>,
    ) -> Result<ClassListing> {
        let query = format!("{LISTING_SELECT} WHERE c.class_id = ?2");
        let row: Option<ClassRow> = sqlx::query_as(&query)
            .bind(member_id)
            .bind(id)
            .fetch_optional(self.db.as_ref())
            .await?;

        row.ok_or_else(|| AppError::NotFound(format!("class {id} not found")))?
            .into_listing()
    }

    /// Scheduled classes from `today` with places left, annotated with the
    /// member's registration status.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn list_open(
        &self,
        member_id: MemberId,
        today: NaiveDate,
    ) -> Result<Vec<ClassListing>> {
        let query = format!(
            "{LISTING_SELECT}
             WHERE c.schedule_date >= ?2 AND c.status = 'scheduled'
               AND c.current_enrollment < c.capacity
             ORDER BY c.schedule_date, c.start_time"
        );
        let rows: Vec<ClassRow> = sqlx::query_as(&query)
            .bind(member_id)
            .bind(format_date(today))
            .fetch_all(self.db.as_ref())
            .await?;

        rows.into_iter().map(ClassRow::into_listing).collect()
    }

    /// Upcoming classes the member holds a registration for.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn registered_for_member(
        &self,
        member_id: MemberId,
        today: NaiveDate,
    ) -> Result<Vec<ClassListing>> {
        let query = format!(
            "{LISTING_SELECT}
             WHERE cr.status = 'registered' AND c.schedule_date >= ?2
             ORDER BY c.schedule_date, c.start_time"
        );
        let rows: Vec<ClassRow> = sqlx::query_as(&query)
            .bind(member_id)
            .bind(format_date(today))
            .fetch_all(self.db.as_ref())
            .await?;

        rows.into_iter().map(ClassRow::into_listing).collect()
    }

    /// Scheduled classes the trainer teaches from `today` on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn upcoming_for_trainer(
        &self,
        trainer_id: TrainerId,
        today: NaiveDate,
    ) -> Result<Vec<ClassListing>> {
        let query = format!(
            "{LISTING_SELECT}
             WHERE c.trainer_id = ?2 AND c.schedule_date >= ?3 AND c.status = 'scheduled'
             ORDER BY c.schedule_date, c.start_time"
        );
        let rows: Vec<ClassRow> = sqlx::query_as(&query)
            .bind(None::<MemberId>)
            .bind(trainer_id)
            .bind(format_date(today))
            .fetch_all(self.db.as_ref())
            .await?;

        rows.into_iter().map(ClassRow::into_listing).collect()
    }

    /// Register a member for a class and bump its enrollment.
    ///
    /// Runs in one write transaction so two members cannot take the last
    /// place together.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown member or class,
    /// `AppError::AlreadyExists` if the member already holds a registration,
    /// `AppError::InvalidInput` if the class is full, not scheduled or dated
    /// before `today`, or `AppError::Db` on storage failure.
    pub async fn register(
        &self,
        member_id: MemberId,
        class_id: ClassId,
        today: NaiveDate,
    ) -> Result<ClassRegistration> {
        let mut tx = self.db.begin_with("BEGIN IMMEDIATE").await?;

        if !member_exists(&mut *tx, member_id).await? {
            return Err(AppError::NotFound(format!("member {member_id} not found")));
        }

        let class: Option<(i64, i64, String, String)> = sqlx::query_as(
            "SELECT capacity, current_enrollment, status, schedule_date
             FROM class WHERE class_id = ?1",
        )
        .bind(class_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((capacity, enrolled, status, schedule_date)) = class else {
            return Err(AppError::NotFound(format!("class {class_id} not found")));
        };
        if parse_class_status(&status)? != ClassStatus::Scheduled {
            return Err(AppError::InvalidInput(format!(
                "class {class_id} is not open for registration"
            )));
        }
        if column_date(&schedule_date, "schedule_date")? < today {
            return Err(AppError::InvalidInput(format!(
                "class {class_id} has already taken place"
            )));
        }

        let existing: Option<(i64,)> = sqlx::query_as(
            "SELECT registration_id FROM class_registration WHERE member_id = ?1 AND class_id = ?2",
        )
        .bind(member_id)
        .bind(class_id)
        .fetch_optional(&mut *tx)
        .await?;
        if existing.is_some() {
            return Err(AppError::AlreadyExists(format!(
                "member {member_id} is already registered for class {class_id}"
            )));
        }
        if enrolled >= capacity {
            return Err(AppError::InvalidInput(format!("class {class_id} is full")));
        }

        let registered_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO class_registration (member_id, class_id, registered_at, status)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(member_id)
        .bind(class_id)
        .bind(timestamp_text(registered_at))
        .bind(registration_status_str(RegistrationStatus::Registered))
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE class SET current_enrollment = current_enrollment + 1 WHERE class_id = ?1",
        )
        .bind(class_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ClassRegistration {
            id: result.last_insert_rowid(),
            member_id,
            class_id,
            registered_at,
            status: RegistrationStatus::Registered,
        })
    }
}
