//! Bills, payments and the money type they share.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::member::MemberId;
use crate::AppError;

/// Bill primary key.
pub type BillId = i64;

/// Amount of money in integer cents.
///
/// Parsed from and rendered as a decimal string with at most two fraction
/// digits (`"49.90"`).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Build from a cent count.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Cent count.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Whether the amount is strictly positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl FromStr for Money {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::InvalidInput(format!("invalid amount '{raw}'"));
        let trimmed = raw.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty()
            || fraction.len() > 2
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let whole: i64 = whole.parse().map_err(|_| invalid())?;
        let fraction: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };
        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(fraction))
            .ok_or_else(invalid)?;
        Ok(Self(if negative { -cents } else { cents }))
    }
}

impl TryFrom<String> for Money {
    type Error = AppError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<Money> for String {
    fn from(money: Money) -> Self {
        money.to_string()
    }
}

/// Settlement state of a bill.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    /// Not fully paid.
    Pending,
    /// Settled in full.
    Paid,
}

/// An invoice issued to a member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Bill {
    /// Unique record identifier.
    pub id: BillId,
    /// Billed member.
    pub member_id: MemberId,
    /// `First Last` of the billed member, joined for listings.
    pub member_name: Option<String>,
    /// Issue date.
    pub bill_date: NaiveDate,
    /// Payment deadline.
    pub due_date: NaiveDate,
    /// Invoiced amount.
    pub total_amount: Money,
    /// Amount received so far.
    pub amount_paid: Money,
    /// Settlement state.
    pub status: BillStatus,
    /// What the bill is for.
    pub description: Option<String>,
}

impl Bill {
    /// Amount still owed.
    #[must_use]
    pub fn outstanding(&self) -> Money {
        Money::from_cents((self.total_amount.cents() - self.amount_paid.cents()).max(0))
    }
}

/// Payload for issuing a bill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBill {
    /// Billed member.
    pub member_id: MemberId,
    /// What the bill is for.
    pub description: Option<String>,
    /// Invoiced amount.
    pub amount: Money,
    /// Days from today until the bill is due.
    pub due_days: u32,
}

/// How a payment was made.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash at the front desk.
    Cash,
    /// Debit or credit card.
    Card,
    /// Bank transfer.
    Transfer,
}

/// Money received against a bill.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Payment {
    /// Unique record identifier.
    pub id: i64,
    /// Bill the payment settles.
    pub bill_id: BillId,
    /// Amount received.
    pub amount: Money,
    /// Payment channel.
    pub method: PaymentMethod,
    /// External transaction reference.
    pub transaction_reference: Option<String>,
    /// Receipt timestamp.
    pub paid_at: DateTime<Utc>,
}

/// Payload for recording a payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    /// Bill the payment settles.
    pub bill_id: BillId,
    /// Amount received.
    pub amount: Money,
    /// Payment channel.
    pub method: PaymentMethod,
    /// External transaction reference.
    pub transaction_reference: Option<String>,
}
