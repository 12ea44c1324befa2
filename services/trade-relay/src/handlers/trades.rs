//! Snapshot ingest and query handlers

use axum::{
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    response::{IntoResponse, Json, Response},
};
use tracing::{debug, info, warn};

use crate::{
    error::RelayError,
    models::{IngestRequest, IngestResponse, StatsResponse},
    server::AppState,
    stats::compute_stats,
};

/// Replace the held snapshot with the terminal's payload.
///
/// The body is parsed in full before the store is touched, so a rejected
/// payload leaves the previous snapshot in place.
pub async fn ingest_trades(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<IngestResponse>, RelayError> {
    let body = body.map_err(|rejection| {
        warn!("Rejected ingest body: {}", rejection.body_text());
        RelayError::from(rejection)
    })?;

    let request: IngestRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!("Rejected ingest payload: {}", e);
        RelayError::Validation(e.to_string())
    })?;

    if let Some(terminal_time) = &request.timestamp {
        debug!(terminal_time = %terminal_time, "Terminal timestamp");
    }

    let trades_count = request.trades.len();
    let positions_count = request.positions.len();

    let last_update = state
        .store
        .replace(request.account, request.trades, request.positions);

    info!(
        trades = trades_count,
        positions = positions_count,
        last_update = %last_update,
        "Snapshot received"
    );

    Ok(Json(IngestResponse {
        success: true,
        message: "Data received".to_string(),
        trades_count,
        positions_count,
    }))
}

/// Current snapshot, verbatim
pub async fn get_data(State(state): State<AppState>) -> Response {
    let snapshot = state.store.read();
    Json(snapshot.as_ref()).into_response()
}

/// Account, freshly computed statistics and last update time
pub async fn get_stats(State(state): State<AppState>) -> Response {
    let snapshot = state.store.read();
    let stats = compute_stats(&snapshot.trades);

    Json(StatsResponse {
        account: snapshot.account.as_ref(),
        stats: stats.summary(),
        last_update: snapshot.last_update,
    })
    .into_response()
}
