use std::sync::Arc;

use chrono::Utc;

use fitclub::models::member::ContactUpdate;
use fitclub::persistence::member_repo::MemberRepo;
use fitclub::scheduling::Scheduler;
use fitclub::AppError;

use super::fixtures::{
    booking, memory_db, new_member, seed_available_trainer, seed_member, seed_room,
    upcoming_monday, PT_ROOM,
};

#[tokio::test]
async fn create_stamps_join_date_and_round_trips() {
    let db = memory_db().await;
    let repo = MemberRepo::new(Arc::clone(&db));

    let created = repo
        .create(&new_member("ada@club.test"))
        .await
        .expect("create");
    assert_eq!(created.join_date, Utc::now().date_naive());
    assert_eq!(created.phone.as_deref(), Some("555-0100"));

    let fetched = repo.get_by_id(created.id).await.expect("get");
    assert_eq!(fetched, created);
    assert_eq!(fetched.full_name(), "Ada ada");
}

#[tokio::test]
async fn duplicate_email_is_already_exists() {
    let db = memory_db().await;
    let repo = MemberRepo::new(Arc::clone(&db));

    repo.create(&new_member("dup@club.test")).await.expect("first");
    let result = repo.create(&new_member("dup@club.test")).await;
    assert!(matches!(result, Err(AppError::AlreadyExists(_))));
}

#[tokio::test]
async fn unknown_member_is_not_found() {
    let db = memory_db().await;
    let repo = MemberRepo::new(db);

    assert!(matches!(repo.get_by_id(99).await, Err(AppError::NotFound(_))));
    let update = ContactUpdate {
        phone: None,
        address: None,
    };
    assert!(matches!(
        repo.update_contact(99, &update).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn update_contact_replaces_phone_and_address() {
    let db = memory_db().await;
    let member = seed_member(&db, "move@club.test").await;
    let repo = MemberRepo::new(Arc::clone(&db));

    let updated = repo
        .update_contact(
            member.id,
            &ContactUpdate {
                phone: None,
                address: Some("1 Gym Street".into()),
            },
        )
        .await
        .expect("update");

    assert_eq!(updated.phone, None);
    assert_eq!(updated.address.as_deref(), Some("1 Gym Street"));
    assert_eq!(updated.email, member.email);
}

#[tokio::test]
async fn trainer_members_come_from_booked_sessions() {
    let db = memory_db().await;
    let booked = seed_member(&db, "booked@club.test").await;
    let other = seed_member(&db, "other@club.test").await;
    let trainer = seed_available_trainer(&db, "coach@club.test", "08:00", "12:00").await;
    seed_room(&db, "PT 1", PT_ROOM).await;

    let scheduler = Scheduler::new(Arc::clone(&db), PT_ROOM);
    let date = upcoming_monday();
    scheduler
        .book(&booking(booked.id, trainer.id, date, "09:00", "10:00"))
        .await
        .expect("first booking");
    scheduler
        .book(&booking(booked.id, trainer.id, date, "10:00", "11:00"))
        .await
        .expect("second booking");

    let repo = MemberRepo::new(Arc::clone(&db));
    let members = repo.list_for_trainer(trainer.id).await.expect("list");
    assert_eq!(members.len(), 1, "members are listed once");
    assert_eq!(members[0].id, booked.id);

    assert!(repo.has_trained_with(booked.id, trainer.id).await.expect("check"));
    assert!(!repo.has_trained_with(other.id, trainer.id).await.expect("check"));
}
