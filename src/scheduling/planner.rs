//! Booking decision over already-loaded state.
//!
//! [`plan`] takes no I/O: the scheduler loads the trainer's windows for the
//! weekday, the trainer's scheduled slots and every room booking for the
//! date, and asks the planner which room (if any) the session gets.

use crate::models::clock::{format_time, TimeRange};
use crate::models::room::RoomId;
use crate::{AppError, Result};

/// Everything the booking decision depends on.
#[derive(Debug, Clone, Copy)]
pub struct PlanInput<'a> {
    /// Requested slot.
    pub slot: TimeRange,
    /// Trainer availability windows on the requested weekday.
    pub windows: &'a [TimeRange],
    /// Scheduled slots of the trainer on the requested date.
    pub trainer_busy: &'a [TimeRange],
    /// Eligible rooms, lowest id first.
    pub eligible_rooms: &'a [RoomId],
    /// Scheduled `(room, slot)` pairs on the requested date.
    pub room_busy: &'a [(RoomId, TimeRange)],
}

/// Decide which room a requested session gets.
///
/// Checks run in a fixed order so the rejection is deterministic:
/// availability, then trainer conflicts, then rooms.
///
/// # Errors
///
/// - `AppError::NotAvailable` if no window contains the slot.
/// - `AppError::Conflict` if a trainer slot overlaps it.
/// - `AppError::NoRoomAvailable` if every eligible room is taken.
pub fn plan(input: &PlanInput<'_>) -> Result<RoomId> {
    let slot = input.slot;

    if !input.windows.iter().any(|window| window.contains(&slot)) {
        return Err(AppError::NotAvailable(format!(
            "trainer is not available from {} to {}",
            format_time(slot.start),
            format_time(slot.end)
        )));
    }

    if let Some(clash) = input.trainer_busy.iter().find(|busy| busy.overlaps(&slot)) {
        return Err(AppError::Conflict(format!(
            "trainer already has a session from {} to {}",
            format_time(clash.start),
            format_time(clash.end)
        )));
    }

    free_rooms(slot, input.eligible_rooms, input.room_busy)
        .first()
        .copied()
        .ok_or_else(|| {
            AppError::NoRoomAvailable(format!(
                "every eligible room is booked between {} and {}",
                format_time(slot.start),
                format_time(slot.end)
            ))
        })
}

/// Eligible rooms with no booking overlapping `slot`, in ascending id order.
#[must_use]
pub fn free_rooms(
    slot: TimeRange,
    eligible_rooms: &[RoomId],
    room_busy: &[(RoomId, TimeRange)],
) -> Vec<RoomId> {
    let mut free: Vec<RoomId> = eligible_rooms
        .iter()
        .copied()
        .filter(|room| {
            !room_busy
                .iter()
                .any(|(busy_room, busy)| busy_room == room && busy.overlaps(&slot))
        })
        .collect();
    free.sort_unstable();
    free.dedup();
    free
}
