//! Room catalog and equipment repository for `SQLite` persistence.

use std::sync::Arc;

use chrono::Utc;
use sqlx::SqliteExecutor;

use crate::models::clock::format_date;
use crate::models::room::{Equipment, EquipmentStatus, NewRoom, Room, RoomId};
use crate::{AppError, Result};

use super::column_opt_date;
use super::db::Database;

/// Repository wrapper around `SQLite` for rooms and equipment.
#[derive(Clone)]
pub struct RoomRepo {
    db: Arc<Database>,
}

/// Internal row struct for `SQLite` deserialization.
#[derive(sqlx::FromRow)]
struct RoomRow {
    room_id: i64,
    room_name: String,
    room_type: String,
    capacity: i64,
}

impl From<RoomRow> for Room {
    fn from(row: RoomRow) -> Self {
        Self {
            id: row.room_id,
            name: row.room_name,
            room_type: row.room_type,
            capacity: row.capacity,
        }
    }
}

/// Internal row struct for equipment listings.
#[derive(sqlx::FromRow)]
struct EquipmentRow {
    equipment_id: i64,
    equipment_name: String,
    room_id: Option<i64>,
    room_name: Option<String>,
    status: String,
    last_maintenance_date: Option<String>,
    maintenance_notes: Option<String>,
}

impl EquipmentRow {
    fn into_equipment(self) -> Result<Equipment> {
        Ok(Equipment {
            id: self.equipment_id,
            name: self.equipment_name,
            room_id: self.room_id,
            room_name: self.room_name,
            status: parse_equipment_status(&self.status)?,
            last_maintenance_date: column_opt_date(
                self.last_maintenance_date.as_deref(),
                "last_maintenance_date",
            )?,
            maintenance_notes: self.maintenance_notes,
        })
    }
}

fn parse_equipment_status(s: &str) -> Result<EquipmentStatus> {
    match s {
        "operational" => Ok(EquipmentStatus::Operational),
        "maintenance" => Ok(EquipmentStatus::Maintenance),
        "out_of_service" => Ok(EquipmentStatus::OutOfService),
        other => Err(AppError::Db(format!("invalid equipment status: {other}"))),
    }
}

fn equipment_status_str(s: EquipmentStatus) -> &'static str {
    match s {
        EquipmentStatus::Operational => "operational",
        EquipmentStatus::Maintenance => "maintenance",
        EquipmentStatus::OutOfService => "out_of_service",
    }
}

/// Ids of rooms of `room_type`, lowest first, usable inside a transaction.
///
/// # Errors
///
/// Returns `AppError::Db` if the query fails.
pub(crate) async fn room_ids_of_type<'e, E>(executor: E, room_type: &str) -> Result<Vec<RoomId>>
where
    E: SqliteExecutor<'e>,
{
    let rows: Vec<(i64,)> =
        sqlx::query_as("SELECT room_id FROM room WHERE room_type = ?1 ORDER BY room_id")
            .bind(room_type)
            .fetch_all(executor)
            .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

const EQUIPMENT_SELECT: &str = "SELECT e.equipment_id, e.equipment_name, e.room_id, r.room_name,
            e.status, e.last_maintenance_date, e.maintenance_notes
     FROM equipment e
     LEFT JOIN room r ON e.room_id = r.room_id";

impl RoomRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Add a room to the catalog.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` for a non-positive capacity, or
    /// `AppError::Db` if the insert fails.
    pub async fn create(&self, new: &NewRoom) -> Result<Room> {
        if new.capacity <= 0 {
            return Err(AppError::InvalidInput(
                "room capacity must be greater than zero".into(),
            ));
        }

        let result =
            sqlx::query("INSERT INTO room (room_name, room_type, capacity) VALUES (?1, ?2, ?3)")
                .bind(&new.name)
                .bind(&new.room_type)
                .bind(new.capacity)
                .execute(self.db.as_ref())
                .await?;

        Ok(Room {
            id: result.last_insert_rowid(),
            name: new.name.clone(),
            room_type: new.room_type.clone(),
            capacity: new.capacity,
        })
    }

    /// Retrieve a room by identifier.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the room does not exist.
    pub async fn get_by_id(&self, id: RoomId) -> Result<Room> {
        let row: Option<RoomRow> = sqlx::query_as(
            "SELECT room_id, room_name, room_type, capacity FROM room WHERE room_id = ?1",
        )
        .bind(id)
        .fetch_optional(self.db.as_ref())
        .await?;

        row.map(Room::from)
            .ok_or_else(|| AppError::NotFound(format!("room {id} not found")))
    }

    /// Every room ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn list(&self) -> Result<Vec<Room>> {
        let rows: Vec<RoomRow> = sqlx::query_as(
            "SELECT room_id, room_name, room_type, capacity FROM room ORDER BY room_id",
        )
        .fetch_all(self.db.as_ref())
        .await?;

        Ok(rows.into_iter().map(Room::from).collect())
    }

    /// Rooms of one type ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn list_of_type(&self, room_type: &str) -> Result<Vec<Room>> {
        let rows: Vec<RoomRow> = sqlx::query_as(
            "SELECT room_id, room_name, room_type, capacity FROM room
             WHERE room_type = ?1 ORDER BY room_id",
        )
        .bind(room_type)
        .fetch_all(self.db.as_ref())
        .await?;

        Ok(rows.into_iter().map(Room::from).collect())
    }

    /// Register a piece of equipment as operational.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if `room_id` names an unknown room, or
    /// `AppError::Db` if the insert fails.
    pub async fn add_equipment(&self, name: &str, room_id: Option<RoomId>) -> Result<Equipment> {
        if let Some(room_id) = room_id {
            self.get_by_id(room_id).await?;
        }

        let result = sqlx::query(
            "INSERT INTO equipment (equipment_name, room_id, status) VALUES (?1, ?2, ?3)",
        )
        .bind(name)
        .bind(room_id)
        .bind(equipment_status_str(EquipmentStatus::Operational))
        .execute(self.db.as_ref())
        .await?;

        self.get_equipment(result.last_insert_rowid()).await
    }

    /// Retrieve one piece of equipment with its room name.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the equipment does not exist.
    pub async fn get_equipment(&self, id: i64) -> Result<Equipment> {
        let query = format!("{EQUIPMENT_SELECT} WHERE e.equipment_id = ?1");
        let row: Option<EquipmentRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(self.db.as_ref())
            .await?;

        row.ok_or_else(|| AppError::NotFound(format!("equipment {id} not found")))?
            .into_equipment()
    }

    /// All equipment, status descending then name.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn list_equipment(&self) -> Result<Vec<Equipment>> {
        let query = format!("{EQUIPMENT_SELECT} ORDER BY e.status DESC, e.equipment_name");
        let rows: Vec<EquipmentRow> = sqlx::query_as(&query)
            .fetch_all(self.db.as_ref())
            .await?;

        rows.into_iter().map(EquipmentRow::into_equipment).collect()
    }

    /// Record a status change; stamps today's date as the maintenance date.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the equipment does not exist.
    pub async fn update_equipment_status(
        &self,
        id: i64,
        status: EquipmentStatus,
        notes: Option<&str>,
    ) -> Result<Equipment> {
        let today = format_date(Utc::now().date_naive());
        let result = sqlx::query(
            "UPDATE equipment
             SET status = ?1, maintenance_notes = ?2, last_maintenance_date = ?3
             WHERE equipment_id = ?4",
        )
        .bind(equipment_status_str(status))
        .bind(notes)
        .bind(&today)
        .bind(id)
        .execute(self.db.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("equipment {id} not found")));
        }
        self.get_equipment(id).await
    }
}
