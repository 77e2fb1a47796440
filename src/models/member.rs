//! Club member model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Member primary key.
pub type MemberId = i64;

/// A registered club member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Member {
    /// Unique record identifier.
    pub id: MemberId,
    /// Login e-mail; unique across members.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Date of birth, if provided at registration.
    pub date_of_birth: Option<NaiveDate>,
    /// Free-form gender field.
    pub gender: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Day the member joined the club.
    pub join_date: NaiveDate,
}

impl Member {
    /// Display name as `First Last`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Registration payload for a new member.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct NewMember {
    /// Login e-mail.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Date of birth.
    pub date_of_birth: Option<NaiveDate>,
    /// Free-form gender field.
    pub gender: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
}

/// Contact details a member may change on their own.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ContactUpdate {
    /// New phone number; `None` clears it.
    pub phone: Option<String>,
    /// New address; `None` clears it.
    pub address: Option<String>,
}
