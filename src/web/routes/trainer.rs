//! Trainer-facing routes: schedule, availability and members.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::models::dashboard::{MemberDetail, TrainerSchedule};
use crate::models::member::{Member, MemberId};
use crate::models::trainer::{AvailabilityWindow, Trainer, TrainerId};
use crate::models::training::{SessionId, TrainingSession};
use crate::persistence::class_repo::ClassRepo;
use crate::persistence::health_repo::HealthRepo;
use crate::persistence::member_repo::MemberRepo;
use crate::persistence::trainer_repo::TrainerRepo;
use crate::persistence::training_repo::TrainingRepo;
use crate::web::extract::{Form, Path};
use crate::web::forms::AvailabilityForm;
use crate::web::AppState;
use crate::{AppError, Result};

use super::today;

pub(crate) fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/trainers", get(list_trainers))
        .route("/trainers/{id}/schedule", get(schedule))
        .route("/trainers/{id}/availability", post(add_availability))
        .route("/trainers/{id}/members", get(members))
        .route("/trainers/{id}/members/{member_id}", get(member_detail))
        .route(
            "/trainers/{id}/sessions/{session_id}/complete",
            post(complete_session),
        )
}

async fn list_trainers(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Trainer>>> {
    let trainers = TrainerRepo::new(Arc::clone(&state.db)).list().await?;
    Ok(Json(trainers))
}

async fn schedule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TrainerId>,
) -> Result<Json<TrainerSchedule>> {
    let trainers = TrainerRepo::new(Arc::clone(&state.db));
    trainers.get_by_id(id).await?;
    let today = today();

    Ok(Json(TrainerSchedule {
        sessions: TrainingRepo::new(Arc::clone(&state.db))
            .upcoming_for_trainer(id, today)
            .await?,
        classes: ClassRepo::new(Arc::clone(&state.db))
            .upcoming_for_trainer(id, today)
            .await?,
        availability: trainers.list_availability(id).await?,
    }))
}

async fn add_availability(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TrainerId>,
    Form(form): Form<AvailabilityForm>,
) -> Result<(StatusCode, Json<AvailabilityWindow>)> {
    let (day, range) = form.parse()?;
    let window = TrainerRepo::new(Arc::clone(&state.db))
        .add_availability(id, day, range)
        .await?;
    Ok((StatusCode::CREATED, Json(window)))
}

async fn members(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TrainerId>,
) -> Result<Json<Vec<Member>>> {
    TrainerRepo::new(Arc::clone(&state.db)).get_by_id(id).await?;
    let members = MemberRepo::new(Arc::clone(&state.db))
        .list_for_trainer(id)
        .await?;
    Ok(Json(members))
}

async fn member_detail(
    State(state): State<Arc<AppState>>,
    Path((id, member_id)): Path<(TrainerId, MemberId)>,
) -> Result<Json<MemberDetail>> {
    let members = MemberRepo::new(Arc::clone(&state.db));
    if !members.has_trained_with(member_id, id).await? {
        return Err(AppError::NotFound(format!(
            "member {member_id} has no sessions with trainer {id}"
        )));
    }

    let member = members.get_by_id(member_id).await?;
    let health = HealthRepo::new(Arc::clone(&state.db));
    Ok(Json(MemberDetail {
        member,
        latest_metric: health.latest_metric(member_id).await?,
        active_goals: health.active_goals(member_id).await?,
    }))
}

async fn complete_session(
    State(state): State<Arc<AppState>>,
    Path((id, session_id)): Path<(TrainerId, SessionId)>,
) -> Result<Json<TrainingSession>> {
    let session = state.scheduler.complete(id, session_id).await?;
    Ok(Json(session))
}
