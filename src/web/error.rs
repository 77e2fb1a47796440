//! HTTP rendering of [`AppError`].

use axum::extract::rejection::{FormRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::AppError;

/// JSON body returned for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Stable machine-readable kind, e.g. `conflict`.
    pub error: &'static str,
    /// Human-readable explanation.
    pub message: String,
}

impl AppError {
    /// HTTP status and stable kind string for this error.
    #[must_use]
    pub fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotAvailable(_) => (StatusCode::CONFLICT, "not_available"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            Self::NoRoomAvailable(_) => (StatusCode::CONFLICT, "no_room_available"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            Self::AlreadyExists(_) => (StatusCode::CONFLICT, "already_exists"),
            Self::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
            Self::Db(_) | Self::Config(_) | Self::Io(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        let message = match &self {
            Self::NotAvailable(msg)
            | Self::Conflict(msg)
            | Self::NoRoomAvailable(msg)
            | Self::NotFound(msg)
            | Self::AlreadyExists(msg)
            | Self::InvalidInput(msg) => msg.clone(),
            Self::Db(_) | Self::Config(_) | Self::Io(_) => {
                error!(err = %self, "request failed");
                "the operation could not be completed".to_owned()
            }
        };

        (status, Json(ErrorBody { error: kind, message })).into_response()
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidInput(rejection.body_text())
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        Self::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidInput(rejection.body_text())
    }
}
