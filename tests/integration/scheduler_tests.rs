//! Booking, cancellation and completion through the transactional scheduler.

use std::sync::Arc;

use chrono::{Days, Weekday};

use fitclub::models::clock::TimeRange;
use fitclub::models::room::NewRoom;
use fitclub::models::training::SessionStatus;
use fitclub::persistence::db::{self, Database};
use fitclub::persistence::room_repo::RoomRepo;
use fitclub::persistence::trainer_repo::TrainerRepo;
use fitclub::persistence::training_repo::TrainingRepo;
use fitclub::scheduling::Scheduler;
use fitclub::AppError;

use super::test_helpers::{
    booking, seed_club, session_count, slot, upcoming_monday, Club, PT_ROOM,
};

async fn setup() -> (Arc<Database>, Scheduler, Club) {
    let db = Arc::new(db::connect_memory().await.expect("in-memory connect"));
    let club = seed_club(&db).await;
    let scheduler = Scheduler::new(Arc::clone(&db), PT_ROOM);
    (db, scheduler, club)
}

// ── Room allocation ──────────────────────────────────────────

#[tokio::test]
async fn booking_takes_lowest_free_eligible_room() {
    let (_db, scheduler, club) = setup().await;
    let date = upcoming_monday();

    let first = scheduler
        .book(&booking(club.member_id, club.trainer_id, date, "09:00", "10:00"))
        .await
        .expect("first booking");
    assert_eq!(first.room_id, club.room_ids[0]);
    assert_ne!(first.room_id, club.studio_id, "studio is not eligible");
    assert_eq!(first.status, SessionStatus::Scheduled);

    let second = scheduler
        .book(&booking(
            club.second_member_id,
            club.second_trainer_id,
            date,
            "09:30",
            "10:30",
        ))
        .await
        .expect("second booking");
    assert_eq!(second.room_id, club.room_ids[1]);
}

#[tokio::test]
async fn all_eligible_rooms_taken_is_no_room_available() {
    let (db, scheduler, club) = setup().await;
    let date = upcoming_monday();
    let third_trainer = TrainerRepo::new(Arc::clone(&db))
        .create(&fitclub::models::trainer::NewTrainer {
            email: "lee@club.test".into(),
            first_name: "Lee".into(),
            last_name: "Coach".into(),
            specialization: None,
            phone: None,
        })
        .await
        .expect("trainer");
    TrainerRepo::new(Arc::clone(&db))
        .add_availability(third_trainer.id, Weekday::Mon, slot("08:00", "18:00"))
        .await
        .expect("availability");

    for trainer_id in [club.trainer_id, club.second_trainer_id] {
        scheduler
            .book(&booking(club.member_id, trainer_id, date, "12:00", "13:00"))
            .await
            .expect("fill a room");
    }

    let result = scheduler
        .book(&booking(club.member_id, third_trainer.id, date, "12:30", "13:30"))
        .await;
    assert!(matches!(result, Err(AppError::NoRoomAvailable(_))));

    // The next hour is free again.
    let later = scheduler
        .book(&booking(club.member_id, third_trainer.id, date, "13:00", "14:00"))
        .await
        .expect("adjacent slot");
    assert_eq!(later.room_id, club.room_ids[0]);
}

#[tokio::test]
async fn configured_room_type_controls_eligibility() {
    let (db, _, club) = setup().await;
    let scheduler = Scheduler::new(Arc::clone(&db), "Studio");
    assert_eq!(scheduler.eligible_room_type(), "Studio");

    let session = scheduler
        .book(&booking(
            club.member_id,
            club.trainer_id,
            upcoming_monday(),
            "09:00",
            "10:00",
        ))
        .await
        .expect("book");
    assert_eq!(session.room_id, club.studio_id);
}

#[tokio::test]
async fn no_eligible_rooms_is_no_room_available() {
    let (db, _, club) = setup().await;
    let scheduler = Scheduler::new(Arc::clone(&db), "Sauna");

    let result = scheduler
        .book(&booking(
            club.member_id,
            club.trainer_id,
            upcoming_monday(),
            "09:00",
            "10:00",
        ))
        .await;
    assert!(matches!(result, Err(AppError::NoRoomAvailable(_))));
}

// ── Availability and conflicts ───────────────────────────────

#[tokio::test]
async fn outside_availability_is_not_available() {
    let (_db, scheduler, club) = setup().await;
    let monday = upcoming_monday();
    let tuesday = monday.checked_add_days(Days::new(1)).expect("date");

    for (date, start, end) in [
        (monday, "07:00", "08:30"),
        (monday, "17:30", "18:30"),
        (monday, "06:00", "07:00"),
        (tuesday, "09:00", "10:00"),
    ] {
        let result = scheduler
            .book(&booking(club.member_id, club.trainer_id, date, start, end))
            .await;
        assert!(
            matches!(result, Err(AppError::NotAvailable(_))),
            "{date} {start}-{end} should be outside availability"
        );
    }
}

#[tokio::test]
async fn window_edges_are_bookable() {
    let (_db, scheduler, club) = setup().await;
    let date = upcoming_monday();

    scheduler
        .book(&booking(club.member_id, club.trainer_id, date, "08:00", "09:00"))
        .await
        .expect("window start");
    scheduler
        .book(&booking(club.member_id, club.trainer_id, date, "17:00", "18:00"))
        .await
        .expect("window end");
}

#[tokio::test]
async fn booking_spanning_two_windows_is_not_available() {
    let (db, scheduler, club) = setup().await;
    let trainers = TrainerRepo::new(Arc::clone(&db));
    let split = trainers
        .create(&fitclub::models::trainer::NewTrainer {
            email: "split@club.test".into(),
            first_name: "Split".into(),
            last_name: "Shift".into(),
            specialization: None,
            phone: None,
        })
        .await
        .expect("trainer");
    for (start, end) in [("08:00", "10:00"), ("10:00", "12:00")] {
        trainers
            .add_availability(split.id, Weekday::Mon, slot(start, end))
            .await
            .expect("window");
    }

    let result = scheduler
        .book(&booking(club.member_id, split.id, upcoming_monday(), "09:30", "10:30"))
        .await;
    assert!(matches!(result, Err(AppError::NotAvailable(_))));
}

#[tokio::test]
async fn trainer_overlap_is_conflict_but_adjacent_is_fine() {
    let (_db, scheduler, club) = setup().await;
    let date = upcoming_monday();

    scheduler
        .book(&booking(club.member_id, club.trainer_id, date, "10:00", "11:00"))
        .await
        .expect("first");

    for (start, end) in [
        ("10:30", "11:30"),
        ("09:30", "10:30"),
        ("10:15", "10:45"),
        ("09:00", "12:00"),
    ] {
        let result = scheduler
            .book(&booking(club.second_member_id, club.trainer_id, date, start, end))
            .await;
        assert!(
            matches!(result, Err(AppError::Conflict(_))),
            "{start}-{end} overlaps 10:00-11:00"
        );
    }

    scheduler
        .book(&booking(club.second_member_id, club.trainer_id, date, "11:00", "12:00"))
        .await
        .expect("touching after");
    scheduler
        .book(&booking(club.second_member_id, club.trainer_id, date, "09:00", "10:00"))
        .await
        .expect("touching before");
}

#[tokio::test]
async fn availability_is_checked_before_conflicts() {
    let (_db, scheduler, club) = setup().await;
    let date = upcoming_monday();

    scheduler
        .book(&booking(club.member_id, club.trainer_id, date, "17:00", "18:00"))
        .await
        .expect("first");
    let result = scheduler
        .book(&booking(club.member_id, club.trainer_id, date, "17:30", "18:30"))
        .await;
    assert!(matches!(result, Err(AppError::NotAvailable(_))));
}

// ── Validation and atomicity ─────────────────────────────────

#[tokio::test]
async fn invalid_requests_are_rejected_before_planning() {
    let (_db, scheduler, club) = setup().await;
    let date = upcoming_monday();

    let mut inverted = booking(club.member_id, club.trainer_id, date, "09:00", "10:00");
    inverted.slot = TimeRange {
        start: inverted.slot.end,
        end: inverted.slot.start,
    };
    assert!(matches!(
        scheduler.book(&inverted).await,
        Err(AppError::InvalidInput(_))
    ));

    assert!(matches!(
        scheduler
            .book(&booking(999, club.trainer_id, date, "09:00", "10:00"))
            .await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        scheduler
            .book(&booking(club.member_id, 999, date, "09:00", "10:00"))
            .await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn failed_bookings_leave_session_table_unchanged() {
    let (db, scheduler, club) = setup().await;
    let date = upcoming_monday();

    scheduler
        .book(&booking(club.member_id, club.trainer_id, date, "10:00", "11:00"))
        .await
        .expect("first");
    let before = session_count(&db).await;

    let _ = scheduler
        .book(&booking(club.member_id, club.trainer_id, date, "10:30", "11:30"))
        .await;
    let _ = scheduler
        .book(&booking(club.member_id, club.trainer_id, date, "06:00", "07:00"))
        .await;
    let _ = scheduler
        .book(&booking(404, club.trainer_id, date, "12:00", "13:00"))
        .await;

    assert_eq!(session_count(&db).await, before);
}

// ── Cancellation and completion ──────────────────────────────

#[tokio::test]
async fn cancelled_session_frees_trainer_and_room() {
    let (db, scheduler, club) = setup().await;
    let date = upcoming_monday();

    let session = scheduler
        .book(&booking(club.member_id, club.trainer_id, date, "10:00", "11:00"))
        .await
        .expect("book");
    let cancelled = scheduler
        .cancel(club.member_id, session.id)
        .await
        .expect("cancel");
    assert_eq!(cancelled.status, SessionStatus::Cancelled);

    let rebooked = scheduler
        .book(&booking(club.second_member_id, club.trainer_id, date, "10:00", "11:00"))
        .await
        .expect("slot is free again");
    assert_eq!(rebooked.room_id, session.room_id);

    let stored = TrainingRepo::new(Arc::clone(&db))
        .get_by_id(session.id)
        .await
        .expect("get");
    assert_eq!(stored.status, SessionStatus::Cancelled);
}

#[tokio::test]
async fn cancel_requires_owner_and_scheduled_status() {
    let (_db, scheduler, club) = setup().await;
    let session = scheduler
        .book(&booking(
            club.member_id,
            club.trainer_id,
            upcoming_monday(),
            "10:00",
            "11:00",
        ))
        .await
        .expect("book");

    assert!(matches!(
        scheduler.cancel(club.second_member_id, session.id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        scheduler.cancel(club.member_id, 9_999).await,
        Err(AppError::NotFound(_))
    ));

    scheduler
        .cancel(club.member_id, session.id)
        .await
        .expect("cancel");
    assert!(matches!(
        scheduler.cancel(club.member_id, session.id).await,
        Err(AppError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn trainer_completes_own_session_only() {
    let (_db, scheduler, club) = setup().await;
    let session = scheduler
        .book(&booking(
            club.member_id,
            club.trainer_id,
            upcoming_monday(),
            "14:00",
            "15:00",
        ))
        .await
        .expect("book");

    assert!(matches!(
        scheduler.complete(club.second_trainer_id, session.id).await,
        Err(AppError::NotFound(_))
    ));

    let completed = scheduler
        .complete(club.trainer_id, session.id)
        .await
        .expect("complete");
    assert_eq!(completed.status, SessionStatus::Completed);

    assert!(matches!(
        scheduler.cancel(club.member_id, session.id).await,
        Err(AppError::InvalidInput(_))
    ));
}

// ── Free-room preview ────────────────────────────────────────

#[tokio::test]
async fn free_rooms_lists_unbooked_eligible_rooms() {
    let (db, scheduler, club) = setup().await;
    let date = upcoming_monday();

    let all_free: Vec<_> = scheduler
        .free_rooms(date, slot("10:00", "11:00"))
        .await
        .expect("free rooms")
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(all_free, club.room_ids);

    scheduler
        .book(&booking(club.member_id, club.trainer_id, date, "10:00", "11:00"))
        .await
        .expect("book");

    let during: Vec<_> = scheduler
        .free_rooms(date, slot("10:30", "11:30"))
        .await
        .expect("free rooms")
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(during, vec![club.room_ids[1]]);

    let after = scheduler
        .free_rooms(date, slot("11:00", "12:00"))
        .await
        .expect("free rooms");
    assert_eq!(after.len(), 2, "adjacent slot sees both rooms free");

    // A newly added eligible room shows up too.
    let extra = RoomRepo::new(Arc::clone(&db))
        .create(&NewRoom {
            name: "PT 3".into(),
            room_type: PT_ROOM.into(),
            capacity: 2,
        })
        .await
        .expect("room");
    let with_extra: Vec<_> = scheduler
        .free_rooms(date, slot("10:00", "11:00"))
        .await
        .expect("free rooms")
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(with_extra, vec![club.room_ids[1], extra.id]);
}
