//! Domain model behaviour and wire format tests.

use chrono::{NaiveDate, Utc, Weekday};

use fitclub::models::billing::{BillStatus, Money, PaymentMethod};
use fitclub::models::class::{ClassStatus, GroupClass};
use fitclub::models::room::EquipmentStatus;
use fitclub::models::trainer::AvailabilityWindow;
use fitclub::models::training::{SessionStatus, TrainingSession};

use super::fixtures::time;

fn session(status: SessionStatus) -> TrainingSession {
    TrainingSession {
        id: 1,
        member_id: 1,
        trainer_id: 1,
        room_id: 1,
        session_date: NaiveDate::from_ymd_opt(2024, 3, 18).expect("date"),
        start_time: time("10:00"),
        end_time: time("11:00"),
        status,
        notes: None,
        created_at: Utc::now(),
    }
}

// ── Session lifecycle ────────────────────────────────────────

#[test]
fn scheduled_session_can_be_cancelled_or_completed() {
    let scheduled = session(SessionStatus::Scheduled);
    assert!(scheduled.can_transition_to(SessionStatus::Cancelled));
    assert!(scheduled.can_transition_to(SessionStatus::Completed));
    assert!(!scheduled.can_transition_to(SessionStatus::Scheduled));
}

#[test]
fn terminal_sessions_never_transition() {
    for status in [SessionStatus::Cancelled, SessionStatus::Completed] {
        let terminal = session(status);
        for next in [
            SessionStatus::Scheduled,
            SessionStatus::Cancelled,
            SessionStatus::Completed,
        ] {
            assert!(
                !terminal.can_transition_to(next),
                "{status:?} -> {next:?} must be refused"
            );
        }
    }
}

#[test]
fn session_range_matches_its_times() {
    let scheduled = session(SessionStatus::Scheduled);
    let range = scheduled.range();
    assert_eq!(range.start, time("10:00"));
    assert_eq!(range.end, time("11:00"));
}

// ── Classes ──────────────────────────────────────────────────

#[test]
fn spots_left_counts_down_and_floors_at_zero() {
    let mut class = GroupClass {
        id: 1,
        name: "Spin".into(),
        trainer_id: 1,
        room_id: 1,
        schedule_date: NaiveDate::from_ymd_opt(2024, 3, 18).expect("date"),
        start_time: time("18:00"),
        end_time: time("19:00"),
        capacity: 10,
        current_enrollment: 7,
        status: ClassStatus::Scheduled,
    };
    assert_eq!(class.spots_left(), 3);

    class.current_enrollment = 12;
    assert_eq!(class.spots_left(), 0);
}

// ── Wire formats ─────────────────────────────────────────────

#[test]
fn money_serializes_as_decimal_string() {
    let json = serde_json::to_string(&Money::from_cents(4990)).expect("serialize");
    assert_eq!(json, "\"49.90\"");

    let parsed: Money = serde_json::from_str("\"12.5\"").expect("deserialize");
    assert_eq!(parsed.cents(), 1250);

    assert!(serde_json::from_str::<Money>("\"twelve\"").is_err());
}

#[test]
fn statuses_serialize_in_snake_case() {
    let to_json = |value: serde_json::Value| value.as_str().map(str::to_owned);

    assert_eq!(
        to_json(serde_json::to_value(SessionStatus::Scheduled).expect("json")),
        Some("scheduled".into())
    );
    assert_eq!(
        to_json(serde_json::to_value(EquipmentStatus::OutOfService).expect("json")),
        Some("out_of_service".into())
    );
    assert_eq!(
        to_json(serde_json::to_value(BillStatus::Paid).expect("json")),
        Some("paid".into())
    );
    assert_eq!(
        to_json(serde_json::to_value(PaymentMethod::Transfer).expect("json")),
        Some("transfer".into())
    );
}

#[test]
fn availability_window_uses_english_day_names() {
    let window = AvailabilityWindow {
        id: 3,
        trainer_id: 2,
        day_of_week: Weekday::Wed,
        start_time: time("08:00"),
        end_time: time("12:00"),
    };

    let json = serde_json::to_value(window).expect("serialize");
    assert_eq!(json["day_of_week"], "Wednesday");

    let back: AvailabilityWindow = serde_json::from_value(json).expect("deserialize");
    assert_eq!(back.day_of_week, Weekday::Wed);
    assert_eq!(back.range().start, time("08:00"));
}
