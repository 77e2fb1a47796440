//! Member repository for `SQLite` persistence.

use std::sync::Arc;

use chrono::Utc;
use sqlx::SqliteExecutor;

use crate::models::clock::format_date;
use crate::models::member::{ContactUpdate, Member, MemberId, NewMember};
use crate::models::trainer::TrainerId;
use crate::{AppError, Result};

use super::db::Database;
use super::{column_date, column_opt_date};

/// Repository wrapper around `SQLite` for member records.
#[derive(Clone)]
pub struct MemberRepo {
    db: Arc<Database>,
}

/// Internal row struct for `SQLite` deserialization.
#[derive(sqlx::FromRow)]
struct MemberRow {
    member_id: i64,
    email: String,
    first_name: String,
    last_name: String,
    date_of_birth: Option<String>,
    gender: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    join_date: String,
}

impl MemberRow {
    /// Convert a database row into the domain model.
    fn into_member(self) -> Result<Member> {
        Ok(Member {
            id: self.member_id,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            date_of_birth: column_opt_date(self.date_of_birth.as_deref(), "date_of_birth")?,
            gender: self.gender,
            phone: self.phone,
            address: self.address,
            join_date: column_date(&self.join_date, "join_date")?,
        })
    }
}

const MEMBER_COLUMNS: &str = "member_id, email, first_name, last_name, date_of_birth, \
                              gender, phone, address, join_date";

impl MemberRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Register a new member with today's join date.
    ///
    /// # Errors
    ///
    /// Returns `AppError::AlreadyExists` if the e-mail is taken, or
    /// `AppError::Db` if the insert fails.
    pub async fn create(&self, new: &NewMember) -> Result<Member> {
        let join_date = Utc::now().date_naive();

        let result = sqlx::query(
            "INSERT INTO member (email, first_name, last_name, date_of_birth, gender,
             phone, address, join_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(new.email.trim())
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(new.date_of_birth.map(format_date))
        .bind(&new.gender)
        .bind(&new.phone)
        .bind(&new.address)
        .bind(format_date(join_date))
        .execute(self.db.as_ref())
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::AlreadyExists(format!("email {} is already registered", new.email))
            }
            other => AppError::from(other),
        })?;

        self.get_by_id(result.last_insert_rowid()).await
    }

    /// Retrieve a member by identifier.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the member does not exist.
    pub async fn get_by_id(&self, id: MemberId) -> Result<Member> {
        let query = format!("SELECT {MEMBER_COLUMNS} FROM member WHERE member_id = ?1");
        let row: Option<MemberRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(self.db.as_ref())
            .await?;

        row.ok_or_else(|| AppError::NotFound(format!("member {id} not found")))?
            .into_member()
    }

    /// Replace the member's phone and address.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the member does not exist.
    pub async fn update_contact(&self, id: MemberId, update: &ContactUpdate) -> Result<Member> {
        let result = sqlx::query("UPDATE member SET phone = ?1, address = ?2 WHERE member_id = ?3")
            .bind(&update.phone)
            .bind(&update.address)
            .bind(id)
            .execute(self.db.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("member {id} not found")));
        }
        self.get_by_id(id).await
    }

    /// Distinct members who have ever booked the trainer, by last then first name.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn list_for_trainer(&self, trainer_id: TrainerId) -> Result<Vec<Member>> {
        let rows: Vec<MemberRow> = sqlx::query_as(
            "SELECT DISTINCT m.member_id, m.email, m.first_name, m.last_name, m.date_of_birth,
                    m.gender, m.phone, m.address, m.join_date
             FROM member m
             JOIN personal_training_session pts ON m.member_id = pts.member_id
             WHERE pts.trainer_id = ?1
             ORDER BY m.last_name, m.first_name",
        )
        .bind(trainer_id)
        .fetch_all(self.db.as_ref())
        .await?;

        rows.into_iter().map(MemberRow::into_member).collect()
    }

    /// Whether the trainer has ever had a session with the member.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn has_trained_with(
        &self,
        member_id: MemberId,
        trainer_id: TrainerId,
    ) -> Result<bool> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM personal_training_session
             WHERE member_id = ?1 AND trainer_id = ?2",
        )
        .bind(member_id)
        .bind(trainer_id)
        .fetch_one(self.db.as_ref())
        .await?;

        Ok(row.0 > 0)
    }
}

/// Whether a member row exists, usable inside a transaction.
///
/// # Errors
///
/// Returns `AppError::Db` if the query fails.
pub(crate) async fn member_exists<'e, E>(executor: E, member_id: MemberId) -> Result<bool>
where
    E: SqliteExecutor<'e>,
{
    let row: Option<(i64,)> = sqlx::query_as("SELECT member_id FROM member WHERE member_id = ?1")
        .bind(member_id)
        .fetch_optional(executor)
        .await?;
    Ok(row.is_some())
}
