//! Club-wide aggregate queries for the admin dashboard.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::models::billing::Money;
use crate::models::clock::format_date;
use crate::models::dashboard::ClubStats;
use crate::Result;

use super::db::Database;

/// Read-only aggregate queries.
#[derive(Clone)]
pub struct StatsRepo {
    db: Arc<Database>,
}

impl StatsRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Member, trainer and upcoming class counts plus pending revenue.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if any query fails.
    pub async fn club_stats(&self, today: NaiveDate) -> Result<ClubStats> {
        let (total_members,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM member")
            .fetch_one(self.db.as_ref())
            .await?;
        let (total_trainers,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM trainer")
            .fetch_one(self.db.as_ref())
            .await?;
        let (upcoming_classes,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM class WHERE schedule_date >= ?1 AND status = 'scheduled'",
        )
        .bind(format_date(today))
        .fetch_one(self.db.as_ref())
        .await?;
        let (pending,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(total_amount - amount_paid), 0)
             FROM bill WHERE status = 'pending'",
        )
        .fetch_one(self.db.as_ref())
        .await?;

        Ok(ClubStats {
            total_members,
            total_trainers,
            upcoming_classes,
            pending_revenue: Money::from_cents(pending),
        })
    }
}
