//! Administrator routes: catalog, staff, timetable, equipment and billing.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tracing::info;

use crate::models::billing::{Bill, Payment};
use crate::models::class::ClassListing;
use crate::models::dashboard::ClubStats;
use crate::models::room::{Equipment, Room};
use crate::models::trainer::Trainer;
use crate::persistence::billing_repo::BillingRepo;
use crate::persistence::class_repo::ClassRepo;
use crate::persistence::room_repo::RoomRepo;
use crate::persistence::stats_repo::StatsRepo;
use crate::persistence::trainer_repo::TrainerRepo;
use crate::web::extract::{Form, Path};
use crate::web::forms::{
    BillForm, ClassForm, EquipmentForm, EquipmentStatusForm, PaymentForm, RoomForm, TrainerForm,
};
use crate::web::AppState;
use crate::Result;

use super::today;

/// Response of `POST /admin/payments`.
#[derive(Debug, Serialize)]
struct PaymentReceipt {
    payment: Payment,
    bill: Bill,
}

pub(crate) fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/dashboard", get(dashboard))
        .route("/admin/rooms", get(list_rooms).post(add_room))
        .route("/admin/trainers", post(add_trainer))
        .route("/admin/classes", post(schedule_class))
        .route("/admin/equipment", get(list_equipment).post(add_equipment))
        .route("/admin/equipment/{id}/status", post(update_equipment_status))
        .route("/admin/billing", get(list_bills))
        .route("/admin/bills", post(generate_bill))
        .route("/admin/payments", post(record_payment))
}

async fn dashboard(State(state): State<Arc<AppState>>) -> Result<Json<ClubStats>> {
    let stats = StatsRepo::new(Arc::clone(&state.db))
        .club_stats(today())
        .await?;
    Ok(Json(stats))
}

async fn list_rooms(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Room>>> {
    let rooms = RoomRepo::new(Arc::clone(&state.db)).list().await?;
    Ok(Json(rooms))
}

async fn add_room(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RoomForm>,
) -> Result<(StatusCode, Json<Room>)> {
    let new = form.into_new_room()?;
    let room = RoomRepo::new(Arc::clone(&state.db)).create(&new).await?;
    info!(room_id = room.id, room_type = %room.room_type, "room added");
    Ok((StatusCode::CREATED, Json(room)))
}

async fn add_trainer(
    State(state): State<Arc<AppState>>,
    Form(form): Form<TrainerForm>,
) -> Result<(StatusCode, Json<Trainer>)> {
    let new = form.into_new_trainer()?;
    let trainer = TrainerRepo::new(Arc::clone(&state.db)).create(&new).await?;
    info!(trainer_id = trainer.id, name = %trainer.full_name(), "trainer added");
    Ok((StatusCode::CREATED, Json(trainer)))
}

async fn schedule_class(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ClassForm>,
) -> Result<(StatusCode, Json<ClassListing>)> {
    let new = form.into_new_class()?;
    let class = ClassRepo::new(Arc::clone(&state.db)).create(&new).await?;
    info!(class_id = class.class.id, "class scheduled");
    Ok((StatusCode::CREATED, Json(class)))
}

async fn list_equipment(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Equipment>>> {
    let equipment = RoomRepo::new(Arc::clone(&state.db)).list_equipment().await?;
    Ok(Json(equipment))
}

async fn add_equipment(
    State(state): State<Arc<AppState>>,
    Form(form): Form<EquipmentForm>,
) -> Result<(StatusCode, Json<Equipment>)> {
    let (name, room_id) = form.parse()?;
    let equipment = RoomRepo::new(Arc::clone(&state.db))
        .add_equipment(&name, room_id)
        .await?;
    Ok((StatusCode::CREATED, Json(equipment)))
}

async fn update_equipment_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Form(form): Form<EquipmentStatusForm>,
) -> Result<Json<Equipment>> {
    let (status, notes) = form.parse()?;
    let equipment = RoomRepo::new(Arc::clone(&state.db))
        .update_equipment_status(id, status, notes.as_deref())
        .await?;
    info!(equipment_id = id, ?status, "equipment status updated");
    Ok(Json(equipment))
}

async fn list_bills(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Bill>>> {
    let bills = BillingRepo::new(Arc::clone(&state.db)).list_recent().await?;
    Ok(Json(bills))
}

async fn generate_bill(
    State(state): State<Arc<AppState>>,
    Form(form): Form<BillForm>,
) -> Result<(StatusCode, Json<Bill>)> {
    let new = form.into_new_bill()?;
    let bill = BillingRepo::new(Arc::clone(&state.db))
        .create_bill(&new)
        .await?;
    info!(
        bill_id = bill.id,
        member_id = bill.member_id,
        amount = %bill.total_amount,
        "bill generated"
    );
    Ok((StatusCode::CREATED, Json(bill)))
}

async fn record_payment(
    State(state): State<Arc<AppState>>,
    Form(form): Form<PaymentForm>,
) -> Result<(StatusCode, Json<PaymentReceipt>)> {
    let new = form.into_new_payment()?;
    let (payment, bill) = BillingRepo::new(Arc::clone(&state.db))
        .record_payment(&new)
        .await?;
    info!(
        bill_id = bill.id,
        amount = %payment.amount,
        status = ?bill.status,
        "payment recorded"
    );
    Ok((StatusCode::CREATED, Json(PaymentReceipt { payment, bill })))
}
