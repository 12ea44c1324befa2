//! Health check handler

use axum::{extract::State, response::Json};

use crate::{models::HealthResponse, server::AppState};

/// Liveness plus the age of the held snapshot
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.store.read();

    Json(HealthResponse {
        status: if state.store.is_empty() { "waiting" } else { "ok" },
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        last_update: snapshot.last_update,
    })
}
