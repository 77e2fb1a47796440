//! Member-facing routes: registration, profile, bookings and classes.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::info;

use crate::models::class::{ClassListing, ClassRegistration};
use crate::models::dashboard::{MemberDashboard, MemberProfile};
use crate::models::health::{FitnessGoal, HealthMetric};
use crate::models::member::{ContactUpdate, Member, MemberId};
use crate::models::room::Room;
use crate::models::training::{SessionId, TrainingSession};
use crate::persistence::billing_repo::BillingRepo;
use crate::persistence::class_repo::ClassRepo;
use crate::persistence::health_repo::HealthRepo;
use crate::persistence::member_repo::MemberRepo;
use crate::persistence::training_repo::TrainingRepo;
use crate::web::extract::{Form, Path, Query};
use crate::web::forms::{
    BookingForm, ClassRegistrationForm, ContactForm, GoalForm, MetricForm, RegisterForm,
    SlotQuery,
};
use crate::web::AppState;
use crate::Result;

use super::today;

/// Upcoming sessions shown on the member dashboard.
const DASHBOARD_SESSIONS: u32 = 5;

pub(crate) fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/members", post(register))
        .route("/members/{id}", get(profile))
        .route("/members/{id}/profile", post(update_contact))
        .route("/members/{id}/goals", post(add_goal))
        .route("/members/{id}/metrics", post(add_metric))
        .route("/members/{id}/dashboard", get(dashboard))
        .route("/members/{id}/sessions", post(book_session))
        .route(
            "/members/{id}/sessions/{session_id}/cancel",
            post(cancel_session),
        )
        .route("/members/{id}/classes", get(open_classes).post(join_class))
        .route("/rooms/free", get(free_rooms))
}

async fn register(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RegisterForm>,
) -> Result<(StatusCode, Json<Member>)> {
    let new = form.into_new_member()?;
    let member = MemberRepo::new(Arc::clone(&state.db)).create(&new).await?;
    info!(member_id = member.id, name = %member.full_name(), "member registered");
    Ok((StatusCode::CREATED, Json(member)))
}

async fn profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<MemberId>,
) -> Result<Json<MemberProfile>> {
    let member = MemberRepo::new(Arc::clone(&state.db)).get_by_id(id).await?;
    let health = HealthRepo::new(Arc::clone(&state.db));
    let metrics = health.recent_metrics(id).await?;
    let goals = health.list_goals(id).await?;

    Ok(Json(MemberProfile {
        member,
        metrics,
        goals,
    }))
}

async fn update_contact(
    State(state): State<Arc<AppState>>,
    Path(id): Path<MemberId>,
    Form(form): Form<ContactForm>,
) -> Result<Json<Member>> {
    let update = ContactUpdate::from(form);
    let member = MemberRepo::new(Arc::clone(&state.db))
        .update_contact(id, &update)
        .await?;
    Ok(Json(member))
}

async fn add_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<MemberId>,
    Form(form): Form<GoalForm>,
) -> Result<(StatusCode, Json<FitnessGoal>)> {
    let new = form.into_new_goal()?;
    let goal = HealthRepo::new(Arc::clone(&state.db)).add_goal(id, &new).await?;
    Ok((StatusCode::CREATED, Json(goal)))
}

async fn add_metric(
    State(state): State<Arc<AppState>>,
    Path(id): Path<MemberId>,
    Form(form): Form<MetricForm>,
) -> Result<(StatusCode, Json<HealthMetric>)> {
    let new = form.into_new_metric()?;
    let metric = HealthRepo::new(Arc::clone(&state.db))
        .add_metric(id, &new)
        .await?;
    Ok((StatusCode::CREATED, Json(metric)))
}

async fn dashboard(
    State(state): State<Arc<AppState>>,
    Path(id): Path<MemberId>,
) -> Result<Json<MemberDashboard>> {
    let today = today();
    let member = MemberRepo::new(Arc::clone(&state.db)).get_by_id(id).await?;
    let health = HealthRepo::new(Arc::clone(&state.db));

    Ok(Json(MemberDashboard {
        member,
        latest_metric: health.latest_metric(id).await?,
        active_goals: health.active_goals(id).await?,
        upcoming_sessions: TrainingRepo::new(Arc::clone(&state.db))
            .upcoming_for_member(id, today, DASHBOARD_SESSIONS)
            .await?,
        registered_classes: ClassRepo::new(Arc::clone(&state.db))
            .registered_for_member(id, today)
            .await?,
        pending_balance: BillingRepo::new(Arc::clone(&state.db))
            .pending_balance(id)
            .await?,
    }))
}

async fn book_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<MemberId>,
    Form(form): Form<BookingForm>,
) -> Result<(StatusCode, Json<TrainingSession>)> {
    let request = form.into_request(id)?;
    let session = state.scheduler.book(&request).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

async fn cancel_session(
    State(state): State<Arc<AppState>>,
    Path((id, session_id)): Path<(MemberId, SessionId)>,
) -> Result<Json<TrainingSession>> {
    let session = state.scheduler.cancel(id, session_id).await?;
    Ok(Json(session))
}

async fn open_classes(
    State(state): State<Arc<AppState>>,
    Path(id): Path<MemberId>,
) -> Result<Json<Vec<ClassListing>>> {
    MemberRepo::new(Arc::clone(&state.db)).get_by_id(id).await?;
    let classes = ClassRepo::new(Arc::clone(&state.db))
        .list_open(id, today())
        .await?;
    Ok(Json(classes))
}

async fn join_class(
    State(state): State<Arc<AppState>>,
    Path(id): Path<MemberId>,
    Form(form): Form<ClassRegistrationForm>,
) -> Result<(StatusCode, Json<ClassRegistration>)> {
    let class_id = form.class_id()?;
    let registration = ClassRepo::new(Arc::clone(&state.db))
        .register(id, class_id, today())
        .await?;
    Ok((StatusCode::CREATED, Json(registration)))
}

async fn free_rooms(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<Vec<Room>>> {
    let (date, slot) = query.parse()?;
    let rooms = state.scheduler.free_rooms(date, slot).await?;
    Ok(Json(rooms))
}
