//! Liveness route, mounted at the root rather than under `/api/v1`.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use helpdesk_events::RunnerStatus;
use serde::Serialize;

use crate::state::AppState;

/// Health of the service and of the notification path.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database is unreachable or the
    /// notification runner has stopped accepting work.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    pub notifications: RunnerStatus,
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = helpdesk_db::health_check(&state.pool).await.is_ok();
    let notifications = state.dispatcher.runner_status();

    if !notifications.accepting {
        tracing::warn!("Health check: notification runner is not accepting work");
    }
    let status = if db_healthy && notifications.accepting {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        notifications,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
