use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub database: ComponentStatus,
}

#[derive(Serialize)]
pub struct ComponentStatus {
    pub status: &'static str,
}

pub async fn check(State(state): State<AppState>) -> impl IntoResponse {
    let (status, code) = match state.store.ping().await {
        Ok(()) => ("ok", StatusCode::OK),
        Err(e) => {
            tracing::warn!(error = %e, "health check: storage unreachable");
            ("error", StatusCode::SERVICE_UNAVAILABLE)
        }
    };

    (
        code,
        Json(HealthResponse {
            status,
            timestamp: Utc::now(),
            database: ComponentStatus { status },
        }),
    )
}
