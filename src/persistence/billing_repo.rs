//! Bill and payment repository for `SQLite` persistence.

use std::sync::Arc;

use chrono::{Days, NaiveDate, Utc};

use crate::models::billing::{
    Bill, BillId, BillStatus, Money, NewBill, NewPayment, Payment, PaymentMethod,
};
use crate::models::clock::format_date;
use crate::models::member::MemberId;
use crate::{AppError, Result};

use super::{column_date, timestamp_text};
use super::db::Database;
use super::member_repo::member_exists;

/// Number of bills returned by [`BillingRepo::list_recent`].
pub const RECENT_BILLS: u32 = 50;

/// Repository wrapper around `SQLite` for bills and payments.
#[derive(Clone)]
pub struct BillingRepo {
    db: Arc<Database>,
}

/// Internal row struct for `SQLite` deserialization.
#[derive(sqlx::FromRow)]
struct BillRow {
    bill_id: i64,
    member_id: i64,
    member_name: Option<String>,
    bill_date: String,
    due_date: String,
    total_amount: i64,
    amount_paid: i64,
    status: String,
    description: Option<String>,
}

impl BillRow {
    fn into_bill(self) -> Result<Bill> {
        Ok(Bill {
            id: self.bill_id,
            member_id: self.member_id,
            member_name: self.member_name,
            bill_date: column_date(&self.bill_date, "bill_date")?,
            due_date: column_date(&self.due_date, "due_date")?,
            total_amount: Money::from_cents(self.total_amount),
            amount_paid: Money::from_cents(self.amount_paid),
            status: parse_bill_status(&self.status)?,
            description: self.description,
        })
    }
}

fn parse_bill_status(s: &str) -> Result<BillStatus> {
    match s {
        "pending" => Ok(BillStatus::Pending),
        "paid" => Ok(BillStatus::Paid),
        other => Err(AppError::Db(format!("invalid bill status: {other}"))),
    }
}

fn bill_status_str(s: BillStatus) -> &'static str {
    match s {
        BillStatus::Pending => "pending",
        BillStatus::Paid => "paid",
    }
}

fn payment_method_str(m: PaymentMethod) -> &'static str {
    match m {
        PaymentMethod::Cash => "cash",
        PaymentMethod::Card => "card",
        PaymentMethod::Transfer => "transfer",
    }
}

const BILL_SELECT: &str = "SELECT b.bill_id, b.member_id,
            m.first_name || ' ' || m.last_name AS member_name,
            b.bill_date, b.due_date, b.total_amount, b.amount_paid, b.status, b.description
     FROM bill b
     JOIN member m ON b.member_id = m.member_id";

impl BillingRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Issue a pending bill dated today and due `due_days` later.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` for a non-positive amount,
    /// `AppError::NotFound` for an unknown member, or `AppError::Db` if the
    /// insert fails.
    pub async fn create_bill(&self, new: &NewBill) -> Result<Bill> {
        if !new.amount.is_positive() {
            return Err(AppError::InvalidInput(
                "bill amount must be greater than zero".into(),
            ));
        }
        if !member_exists(self.db.as_ref(), new.member_id).await? {
            return Err(AppError::NotFound(format!(
                "member {} not found",
                new.member_id
            )));
        }

        let bill_date = Utc::now().date_naive();
        let due_date = due_after(bill_date, new.due_days)?;

        let result = sqlx::query(
            "INSERT INTO bill (member_id, bill_date, due_date, total_amount, amount_paid,
                               status, description)
             VALUES (?1, ?2, ?3, ?4, 0, ?5, ?6)",
        )
        .bind(new.member_id)
        .bind(format_date(bill_date))
        .bind(format_date(due_date))
        .bind(new.amount.cents())
        .bind(bill_status_str(BillStatus::Pending))
        .bind(&new.description)
        .execute(self.db.as_ref())
        .await?;

        self.get_by_id(result.last_insert_rowid()).await
    }

    /// Retrieve a bill with the member's name.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the bill does not exist.
    pub async fn get_by_id(&self, id: BillId) -> Result<Bill> {
        let query = format!("{BILL_SELECT} WHERE b.bill_id = ?1");
        let row: Option<BillRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(self.db.as_ref())
            .await?;

        row.ok_or_else(|| AppError::NotFound(format!("bill {id} not found")))?
            .into_bill()
    }

    /// The [`RECENT_BILLS`] most recently issued bills.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn list_recent(&self) -> Result<Vec<Bill>> {
        let query = format!("{BILL_SELECT} ORDER BY b.bill_date DESC, b.bill_id DESC LIMIT ?1");
        let rows: Vec<BillRow> = sqlx::query_as(&query)
            .bind(i64::from(RECENT_BILLS))
            .fetch_all(self.db.as_ref())
            .await?;

        rows.into_iter().map(BillRow::into_bill).collect()
    }

    /// Record a payment and settle the bill once fully paid.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` for a non-positive amount, a bill
    /// already paid, or an amount above what is still owed;
    /// `AppError::NotFound` for an unknown bill; `AppError::Db` on storage
    /// failure.
    pub async fn record_payment(&self, new: &NewPayment) -> Result<(Payment, Bill)> {
        if !new.amount.is_positive() {
            return Err(AppError::InvalidInput(
                "payment amount must be greater than zero".into(),
            ));
        }

        let mut tx = self.db.begin_with("BEGIN IMMEDIATE").await?;

        let query = format!("{BILL_SELECT} WHERE b.bill_id = ?1");
        let row: Option<BillRow> = sqlx::query_as(&query)
            .bind(new.bill_id)
            .fetch_optional(&mut *tx)
            .await?;
        let bill = row
            .ok_or_else(|| AppError::NotFound(format!("bill {} not found", new.bill_id)))?
            .into_bill()?;

        if bill.status == BillStatus::Paid {
            return Err(AppError::InvalidInput(format!(
                "bill {} is already paid",
                bill.id
            )));
        }
        if new.amount > bill.outstanding() {
            return Err(AppError::InvalidInput(format!(
                "payment {} exceeds outstanding {}",
                new.amount,
                bill.outstanding()
            )));
        }

        let paid_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO payment (bill_id, amount, payment_method, transaction_reference, paid_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(new.bill_id)
        .bind(new.amount.cents())
        .bind(payment_method_str(new.method))
        .bind(&new.transaction_reference)
        .bind(timestamp_text(paid_at))
        .execute(&mut *tx)
        .await?;

        let amount_paid = Money::from_cents(bill.amount_paid.cents() + new.amount.cents());
        let status = if amount_paid >= bill.total_amount {
            BillStatus::Paid
        } else {
            BillStatus::Pending
        };
        sqlx::query("UPDATE bill SET amount_paid = ?1, status = ?2 WHERE bill_id = ?3")
            .bind(amount_paid.cents())
            .bind(bill_status_str(status))
            .bind(bill.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let payment = Payment {
            id: result.last_insert_rowid(),
            bill_id: new.bill_id,
            amount: new.amount,
            method: new.method,
            transaction_reference: new.transaction_reference.clone(),
            paid_at,
        };
        Ok((
            payment,
            Bill {
                amount_paid,
                status,
                ..bill
            },
        ))
    }

    /// Amount the member still owes across pending bills.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn pending_balance(&self, member_id: MemberId) -> Result<Money> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(total_amount - amount_paid), 0) FROM bill
             WHERE member_id = ?1 AND status = 'pending'",
        )
        .bind(member_id)
        .fetch_one(self.db.as_ref())
        .await?;

        Ok(Money::from_cents(row.0))
    }
}

fn due_after(bill_date: NaiveDate, due_days: u32) -> Result<NaiveDate> {
    bill_date
        .checked_add_days(Days::new(u64::from(due_days)))
        .ok_or_else(|| AppError::InvalidInput(format!("due in {due_days} days is out of range")))
}
