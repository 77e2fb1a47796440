//! Form and query payloads accepted by the HTTP routes.
//!
//! Every field arrives as text and defaults to empty, so a missing or
//! malformed value surfaces as `AppError::InvalidInput` naming the field
//! instead of a framework rejection.

use chrono::{NaiveDate, Weekday};
use serde::Deserialize;

use crate::models::billing::{Money, NewBill, NewPayment, PaymentMethod};
use crate::models::class::{ClassId, NewClass};
use crate::models::clock::{parse_date, parse_weekday, TimeRange};
use crate::models::health::{NewFitnessGoal, NewHealthMetric};
use crate::models::member::{ContactUpdate, MemberId, NewMember};
use crate::models::room::{EquipmentStatus, NewRoom, RoomId};
use crate::models::trainer::NewTrainer;
use crate::models::training::BookingRequest;
use crate::{AppError, Result};

/// Days until a generated bill falls due when the form leaves it blank.
pub const DEFAULT_DUE_DAYS: u32 = 30;

fn required<'a>(raw: &'a str, field: &str) -> Result<&'a str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err(AppError::InvalidInput(format!("{field} is required")))
    } else {
        Ok(trimmed)
    }
}

/// Trimmed value, with blank input treated as absent.
fn optional(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}

fn parse_id(raw: &str, field: &str) -> Result<i64> {
    required(raw, field)?
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("{field} must be an integer id")))
}

fn parse_opt_id(raw: Option<String>, field: &str) -> Result<Option<i64>> {
    optional(raw).map(|s| parse_id(&s, field)).transpose()
}

fn parse_opt_f64(raw: Option<String>, field: &str) -> Result<Option<f64>> {
    optional(raw)
        .map(|s| {
            s.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| AppError::InvalidInput(format!("{field} must be a number")))
        })
        .transpose()
}

fn parse_opt_i64(raw: Option<String>, field: &str) -> Result<Option<i64>> {
    optional(raw)
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| AppError::InvalidInput(format!("{field} must be an integer")))
        })
        .transpose()
}

fn parse_opt_date(raw: Option<String>) -> Result<Option<NaiveDate>> {
    optional(raw).map(|s| parse_date(&s)).transpose()
}

fn parse_amount(raw: &str) -> Result<Money> {
    required(raw, "amount")?.parse()
}

/// `POST /members/{id}/sessions`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BookingForm {
    /// Requested trainer.
    pub trainer_id: String,
    /// `YYYY-MM-DD`.
    pub session_date: String,
    /// `HH:MM` or `HH:MM:SS`.
    pub start_time: String,
    /// `HH:MM` or `HH:MM:SS`.
    pub end_time: String,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl BookingForm {
    /// Validate into a booking request for `member_id`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` for missing or malformed fields or
    /// an empty slot.
    pub fn into_request(self, member_id: MemberId) -> Result<BookingRequest> {
        let trainer_id = parse_id(&self.trainer_id, "trainer_id")?;
        let session_date = parse_date(required(&self.session_date, "session_date")?)?;
        let slot = TimeRange::parse(
            required(&self.start_time, "start_time")?,
            required(&self.end_time, "end_time")?,
        )?;

        Ok(BookingRequest {
            member_id,
            trainer_id,
            session_date,
            slot,
            notes: optional(self.notes),
        })
    }
}

/// `GET /rooms/free` query string.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SlotQuery {
    /// `YYYY-MM-DD`.
    pub session_date: String,
    /// Start of the slot.
    pub start_time: String,
    /// End of the slot.
    pub end_time: String,
}

impl SlotQuery {
    /// Validate into a date and slot.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` for missing or malformed fields.
    pub fn parse(&self) -> Result<(NaiveDate, TimeRange)> {
        let date = parse_date(required(&self.session_date, "session_date")?)?;
        let slot = TimeRange::parse(
            required(&self.start_time, "start_time")?,
            required(&self.end_time, "end_time")?,
        )?;
        Ok((date, slot))
    }
}

/// `POST /members`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    /// Login e-mail.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// `YYYY-MM-DD`, optional.
    pub date_of_birth: Option<String>,
    /// Free-form.
    pub gender: Option<String>,
    /// Phone.
    pub phone: Option<String>,
    /// Address.
    pub address: Option<String>,
}

impl RegisterForm {
    /// Validate into a registration payload.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` for a missing name or a malformed
    /// e-mail or date of birth.
    pub fn into_new_member(self) -> Result<NewMember> {
        let email = required(&self.email, "email")?;
        if !email.contains('@') {
            return Err(AppError::InvalidInput(format!("invalid email '{email}'")));
        }

        Ok(NewMember {
            email: email.to_owned(),
            first_name: required(&self.first_name, "first_name")?.to_owned(),
            last_name: required(&self.last_name, "last_name")?.to_owned(),
            date_of_birth: parse_opt_date(self.date_of_birth)?,
            gender: optional(self.gender),
            phone: optional(self.phone),
            address: optional(self.address),
        })
    }
}

/// `POST /members/{id}/profile`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    /// Phone; blank clears it.
    pub phone: Option<String>,
    /// Address; blank clears it.
    pub address: Option<String>,
}

impl From<ContactForm> for ContactUpdate {
    fn from(form: ContactForm) -> Self {
        Self {
            phone: optional(form.phone),
            address: optional(form.address),
        }
    }
}

/// `POST /members/{id}/goals`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GoalForm {
    /// Kind of goal.
    pub goal_type: String,
    /// Value to reach.
    pub target_value: Option<String>,
    /// Current value.
    pub current_value: Option<String>,
    /// Deadline, `YYYY-MM-DD`.
    pub target_date: Option<String>,
}

impl GoalForm {
    /// Validate into a goal payload.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` for malformed fields.
    pub fn into_new_goal(self) -> Result<NewFitnessGoal> {
        Ok(NewFitnessGoal {
            goal_type: required(&self.goal_type, "goal_type")?.to_owned(),
            target_value: parse_opt_f64(self.target_value, "target_value")?,
            current_value: parse_opt_f64(self.current_value, "current_value")?,
            target_date: parse_opt_date(self.target_date)?,
        })
    }
}

/// `POST /members/{id}/metrics`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MetricForm {
    /// Kilograms.
    pub weight: Option<String>,
    /// Centimetres.
    pub height: Option<String>,
    /// Beats per minute.
    pub heart_rate: Option<String>,
    /// e.g. `120/80`.
    pub blood_pressure: Option<String>,
    /// Body fat percentage.
    pub body_fat: Option<String>,
    /// Free-form.
    pub notes: Option<String>,
}

impl MetricForm {
    /// Validate into a metric payload.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` for malformed numbers or when no
    /// measurement is given at all.
    pub fn into_new_metric(self) -> Result<NewHealthMetric> {
        let metric = NewHealthMetric {
            weight: parse_opt_f64(self.weight, "weight")?,
            height: parse_opt_f64(self.height, "height")?,
            heart_rate: parse_opt_i64(self.heart_rate, "heart_rate")?,
            blood_pressure: optional(self.blood_pressure),
            body_fat_percentage: parse_opt_f64(self.body_fat, "body_fat")?,
            notes: optional(self.notes),
        };
        if metric == NewHealthMetric::default() {
            return Err(AppError::InvalidInput("no measurement given".into()));
        }
        Ok(metric)
    }
}

/// `POST /members/{id}/classes`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ClassRegistrationForm {
    /// Class to join.
    pub class_id: String,
}

impl ClassRegistrationForm {
    /// Parsed class id.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` for a malformed id.
    pub fn class_id(&self) -> Result<ClassId> {
        parse_id(&self.class_id, "class_id")
    }
}

/// `POST /trainers/{id}/availability`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AvailabilityForm {
    /// Day name, e.g. `Monday`.
    pub day_of_week: String,
    /// Window start.
    pub start_time: String,
    /// Window end.
    pub end_time: String,
}

impl AvailabilityForm {
    /// Validate into a weekday and window.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` for malformed fields or an empty
    /// window.
    pub fn parse(&self) -> Result<(Weekday, TimeRange)> {
        let day = parse_weekday(required(&self.day_of_week, "day_of_week")?)?;
        let range = TimeRange::parse(
            required(&self.start_time, "start_time")?,
            required(&self.end_time, "end_time")?,
        )?;
        Ok((day, range))
    }
}

/// `POST /admin/rooms`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RoomForm {
    /// Display name.
    pub room_name: String,
    /// Purpose, e.g. `Personal Training`.
    pub room_type: String,
    /// Maximum occupancy.
    pub capacity: String,
}

impl RoomForm {
    /// Validate into a room payload.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` for missing or malformed fields.
    pub fn into_new_room(self) -> Result<NewRoom> {
        Ok(NewRoom {
            name: required(&self.room_name, "room_name")?.to_owned(),
            room_type: required(&self.room_type, "room_type")?.to_owned(),
            capacity: parse_opt_i64(Some(self.capacity), "capacity")?
                .ok_or_else(|| AppError::InvalidInput("capacity is required".into()))?,
        })
    }
}

/// `POST /admin/trainers`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TrainerForm {
    /// Login e-mail.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Area of expertise.
    pub specialization: Option<String>,
    /// Phone.
    pub phone: Option<String>,
}

impl TrainerForm {
    /// Validate into a trainer payload.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` for missing fields.
    pub fn into_new_trainer(self) -> Result<NewTrainer> {
        let email = required(&self.email, "email")?;
        if !email.contains('@') {
            return Err(AppError::InvalidInput(format!("invalid email '{email}'")));
        }

        Ok(NewTrainer {
            email: email.to_owned(),
            first_name: required(&self.first_name, "first_name")?.to_owned(),
            last_name: required(&self.last_name, "last_name")?.to_owned(),
            specialization: optional(self.specialization),
            phone: optional(self.phone),
        })
    }
}

/// `POST /admin/classes`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ClassForm {
    /// Display name.
    pub class_name: String,
    /// Instructor.
    pub trainer_id: String,
    /// Hosting room.
    pub room_id: String,
    /// `YYYY-MM-DD`.
    pub schedule_date: String,
    /// Start.
    pub start_time: String,
    /// End.
    pub end_time: String,
    /// Places.
    pub capacity: String,
}

impl ClassForm {
    /// Validate into a class payload.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` for missing or malformed fields.
    pub fn into_new_class(self) -> Result<NewClass> {
        let slot = TimeRange::parse(
            required(&self.start_time, "start_time")?,
            required(&self.end_time, "end_time")?,
        )?;

        Ok(NewClass {
            name: required(&self.class_name, "class_name")?.to_owned(),
            trainer_id: parse_id(&self.trainer_id, "trainer_id")?,
            room_id: parse_id(&self.room_id, "room_id")?,
            schedule_date: parse_date(required(&self.schedule_date, "schedule_date")?)?,
            start_time: slot.start,
            end_time: slot.end,
            capacity: parse_opt_i64(Some(self.capacity), "capacity")?
                .ok_or_else(|| AppError::InvalidInput("capacity is required".into()))?,
        })
    }
}

/// `POST /admin/equipment`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EquipmentForm {
    /// Display name.
    pub equipment_name: String,
    /// Room the item lives in, optional.
    pub room_id: Option<String>,
}

impl EquipmentForm {
    /// Validate into a name and optional room.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` for a missing name or malformed room.
    pub fn parse(self) -> Result<(String, Option<RoomId>)> {
        let name = required(&self.equipment_name, "equipment_name")?.to_owned();
        Ok((name, parse_opt_id(self.room_id, "room_id")?))
    }
}

/// `POST /admin/equipment/{id}/status`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EquipmentStatusForm {
    /// `operational`, `maintenance` or `out_of_service`.
    pub status: String,
    /// Maintenance notes.
    pub notes: Option<String>,
}

impl EquipmentStatusForm {
    /// Validate into a status and notes.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` for an unknown status.
    pub fn parse(self) -> Result<(EquipmentStatus, Option<String>)> {
        let raw = required(&self.status, "status")?;
        let status = match raw.to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "operational" => EquipmentStatus::Operational,
            "maintenance" => EquipmentStatus::Maintenance,
            "out_of_service" => EquipmentStatus::OutOfService,
            _ => {
                return Err(AppError::InvalidInput(format!(
                    "invalid equipment status '{raw}'"
                )))
            }
        };
        Ok((status, optional(self.notes)))
    }
}

/// `POST /admin/bills`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BillForm {
    /// Billed member.
    pub member_id: String,
    /// Decimal amount, e.g. `49.90`.
    pub amount: String,
    /// What the bill is for.
    pub description: Option<String>,
    /// Days until due; blank means [`DEFAULT_DUE_DAYS`].
    pub due_days: Option<String>,
}

impl BillForm {
    /// Validate into a bill payload.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` for missing or malformed fields.
    pub fn into_new_bill(self) -> Result<NewBill> {
        let due_days = match optional(self.due_days) {
            Some(raw) => raw.parse::<u32>().map_err(|_| {
                AppError::InvalidInput("due_days must be a non-negative integer".into())
            })?,
            None => DEFAULT_DUE_DAYS,
        };

        Ok(NewBill {
            member_id: parse_id(&self.member_id, "member_id")?,
            description: optional(self.description),
            amount: parse_amount(&self.amount)?,
            due_days,
        })
    }
}

/// `POST /admin/payments`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PaymentForm {
    /// Bill being paid.
    pub bill_id: String,
    /// Decimal amount.
    pub amount: String,
    /// `cash`, `card` or `transfer`.
    pub payment_method: String,
    /// External transaction reference.
    pub reference: Option<String>,
}

impl PaymentForm {
    /// Validate into a payment payload.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` for missing or malformed fields.
    pub fn into_new_payment(self) -> Result<NewPayment> {
        let raw_method = required(&self.payment_method, "payment_method")?;
        let method = match raw_method.to_ascii_lowercase().as_str() {
            "cash" => PaymentMethod::Cash,
            "card" => PaymentMethod::Card,
            "transfer" => PaymentMethod::Transfer,
            _ => {
                return Err(AppError::InvalidInput(format!(
                    "invalid payment method '{raw_method}'"
                )))
            }
        };

        Ok(NewPayment {
            bill_id: parse_id(&self.bill_id, "bill_id")?,
            amount: parse_amount(&self.amount)?,
            method,
            transaction_reference: optional(self.reference),
        })
    }
}
