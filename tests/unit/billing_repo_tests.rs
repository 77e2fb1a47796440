use std::sync::Arc;

use chrono::{Days, Utc};

use fitclub::models::billing::{BillStatus, Money, NewBill, NewPayment, PaymentMethod};
use fitclub::persistence::billing_repo::BillingRepo;
use fitclub::AppError;

use super::fixtures::{memory_db, seed_member};

fn bill_for(member_id: i64, cents: i64) -> NewBill {
    NewBill {
        member_id,
        description: Some("Monthly membership".into()),
        amount: Money::from_cents(cents),
        due_days: 30,
    }
}

fn payment(bill_id: i64, cents: i64) -> NewPayment {
    NewPayment {
        bill_id,
        amount: Money::from_cents(cents),
        method: PaymentMethod::Card,
        transaction_reference: None,
    }
}

#[tokio::test]
async fn new_bill_is_pending_and_due_later() {
    let db = memory_db().await;
    let member = seed_member(&db, "payer@club.test").await;

    let bill = BillingRepo::new(Arc::clone(&db))
        .create_bill(&bill_for(member.id, 4990))
        .await
        .expect("create");

    let today = Utc::now().date_naive();
    assert_eq!(bill.status, BillStatus::Pending);
    assert_eq!(bill.total_amount, Money::from_cents(4990));
    assert_eq!(bill.amount_paid, Money::ZERO);
    assert_eq!(bill.bill_date, today);
    assert_eq!(bill.due_date, today.checked_add_days(Days::new(30)).expect("date"));
    assert_eq!(bill.member_name.as_deref(), Some("Ada payer"));
}

#[tokio::test]
async fn bill_validation() {
    let db = memory_db().await;
    let member = seed_member(&db, "payer@club.test").await;
    let repo = BillingRepo::new(Arc::clone(&db));

    assert!(matches!(
        repo.create_bill(&bill_for(member.id, 0)).await,
        Err(AppError::InvalidInput(_))
    ));
    assert!(matches!(
        repo.create_bill(&bill_for(member.id + 10, 1000)).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(repo.get_by_id(3).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn partial_then_final_payment_settles_bill() {
    let db = memory_db().await;
    let member = seed_member(&db, "payer@club.test").await;
    let repo = BillingRepo::new(Arc::clone(&db));
    let bill = repo
        .create_bill(&bill_for(member.id, 10_000))
        .await
        .expect("create");

    let (first, after_first) = repo
        .record_payment(&payment(bill.id, 4_000))
        .await
        .expect("partial");
    assert_eq!(first.amount, Money::from_cents(4_000));
    assert_eq!(after_first.status, BillStatus::Pending);
    assert_eq!(after_first.outstanding(), Money::from_cents(6_000));
    assert_eq!(
        repo.pending_balance(member.id).await.expect("balance"),
        Money::from_cents(6_000)
    );

    let (_, settled) = repo
        .record_payment(&payment(bill.id, 6_000))
        .await
        .expect("final");
    assert_eq!(settled.status, BillStatus::Paid);

    let stored = repo.get_by_id(bill.id).await.expect("get");
    assert_eq!(stored.status, BillStatus::Paid);
    assert_eq!(stored.amount_paid, Money::from_cents(10_000));
    assert_eq!(repo.pending_balance(member.id).await.expect("balance"), Money::ZERO);
}

#[tokio::test]
async fn payment_rejections_leave_bill_untouched() {
    let db = memory_db().await;
    let member = seed_member(&db, "payer@club.test").await;
    let repo = BillingRepo::new(Arc::clone(&db));
    let bill = repo
        .create_bill(&bill_for(member.id, 2_500))
        .await
        .expect("create");

    assert!(matches!(
        repo.record_payment(&payment(bill.id, 0)).await,
        Err(AppError::InvalidInput(_))
    ));
    assert!(matches!(
        repo.record_payment(&payment(bill.id, 2_501)).await,
        Err(AppError::InvalidInput(ref msg)) if msg.contains("exceeds")
    ));
    assert!(matches!(
        repo.record_payment(&payment(bill.id + 1, 100)).await,
        Err(AppError::NotFound(_))
    ));

    let stored = repo.get_by_id(bill.id).await.expect("get");
    assert_eq!(stored.amount_paid, Money::ZERO);

    repo.record_payment(&payment(bill.id, 2_500))
        .await
        .expect("pay in full");
    assert!(matches!(
        repo.record_payment(&payment(bill.id, 1)).await,
        Err(AppError::InvalidInput(ref msg)) if msg.contains("already paid")
    ));

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM payment")
        .fetch_one(db.as_ref())
        .await
        .expect("count");
    assert_eq!(count, 1, "only the accepted payment is stored");
}

#[tokio::test]
async fn recent_bills_are_newest_first() {
    let db = memory_db().await;
    let member = seed_member(&db, "payer@club.test").await;
    let repo = BillingRepo::new(Arc::clone(&db));

    let older = repo.create_bill(&bill_for(member.id, 100)).await.expect("create");
    let newer = repo.create_bill(&bill_for(member.id, 200)).await.expect("create");

    let ids: Vec<_> = repo
        .list_recent()
        .await
        .expect("list")
        .iter()
        .map(|b| b.id)
        .collect();
    assert_eq!(ids, vec![newer.id, older.id]);
}
