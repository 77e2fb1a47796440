//! Room catalog and equipment models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Room primary key.
pub type RoomId = i64;

/// A bookable room of the club.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Room {
    /// Unique record identifier; lower ids win booking tie-breaks.
    pub id: RoomId,
    /// Human-readable name.
    pub name: String,
    /// Purpose of the room, e.g. `Personal Training` or `Studio`.
    pub room_type: String,
    /// Maximum occupancy.
    pub capacity: i64,
}

/// Payload for adding a room to the catalog.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct NewRoom {
    /// Human-readable name.
    pub name: String,
    /// Purpose of the room.
    pub room_type: String,
    /// Maximum occupancy.
    pub capacity: i64,
}

/// Operating state of a piece of equipment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentStatus {
    /// In service.
    Operational,
    /// Temporarily withdrawn for servicing.
    Maintenance,
    /// Broken or retired.
    OutOfService,
}

/// A tracked piece of equipment, optionally placed in a room.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Equipment {
    /// Unique record identifier.
    pub id: i64,
    /// Equipment name.
    pub name: String,
    /// Room the equipment lives in.
    pub room_id: Option<RoomId>,
    /// Name of that room, joined for listings.
    pub room_name: Option<String>,
    /// Current operating state.
    pub status: EquipmentStatus,
    /// Last time the status was updated by staff.
    pub last_maintenance_date: Option<NaiveDate>,
    /// Notes recorded with the last status update.
    pub maintenance_notes: Option<String>,
}
