//! HTTP interface: axum router, shared state and server lifecycle.

pub mod error;
pub mod extract;
pub mod forms;
pub mod routes;

use std::sync::Arc;

use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::config::GlobalConfig;
use crate::persistence::db::Database;
use crate::scheduling::Scheduler;
use crate::{AppError, Result};

/// Response header carrying the per-request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Shared state handed to every route.
pub struct AppState {
    /// Global configuration.
    pub config: Arc<GlobalConfig>,
    /// `SQLite` connection pool.
    pub db: Arc<Database>,
    /// Session booking service.
    pub scheduler: Scheduler,
}

impl AppState {
    /// Build state around an open pool.
    #[must_use]
    pub fn new(config: Arc<GlobalConfig>, db: Arc<Database>) -> Self {
        let scheduler = Scheduler::new(
            Arc::clone(&db),
            config.scheduling.eligible_room_type.clone(),
        );
        Self {
            config,
            db,
            scheduler,
        }
    }
}

/// Build the full application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::health::routes())
        .merge(routes::member::routes())
        .merge(routes::trainer::routes())
        .merge(routes::admin::routes())
        .layer(middleware::from_fn(request_span))
        .with_state(state)
}

/// Wrap each request in a span keyed by a fresh request id.
async fn request_span(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let span = info_span!(
        "http_request",
        %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    );

    async move {
        let mut response = next.run(request).await;
        info!(status = response.status().as_u16(), "request handled");
        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response
                .headers_mut()
                .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
        }
        response
    }
    .instrument(span)
    .await
}

/// Bind `config.bind_addr()` and serve until `ct` is cancelled.
///
/// # Errors
///
/// Returns `AppError::Config` if the address cannot be bound or the server
/// fails.
pub async fn serve(state: Arc<AppState>, ct: CancellationToken) -> Result<()> {
    let bind = state.config.bind_addr();
    let listener = TcpListener::bind(bind)
        .await
        .map_err(|err| AppError::Config(format!("failed to bind HTTP on {bind}: {err}")))?;
    serve_on(listener, state, ct).await
}

/// Serve on an already-bound listener until `ct` is cancelled.
///
/// # Errors
///
/// Returns `AppError::Config` if the server fails.
pub async fn serve_on(
    listener: TcpListener,
    state: Arc<AppState>,
    ct: CancellationToken,
) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "starting HTTP server");
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { ct.cancelled().await })
        .await
        .map_err(|err| AppError::Config(format!("HTTP server error: {err}")))?;

    info!("HTTP server shut down");
    Ok(())
}
