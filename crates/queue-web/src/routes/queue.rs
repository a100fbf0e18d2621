//! Queue management routes.

use axum::extract::State;
use axum::Json;
use queue_core::QueueStatus;
use serde::Serialize;

use crate::error::Result;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ResetResponse {
    pub message: String,
}

/// Snapshot of today's pool.
pub async fn status(State(state): State<AppState>) -> Result<Json<QueueStatus>> {
    Ok(Json(state.service.queue_status().await?))
}

/// Reset the pool and clear every window.
pub async fn reset(State(state): State<AppState>) -> Result<Json<ResetResponse>> {
    state.service.reset_queue().await?;
    Ok(Json(ResetResponse {
        message: "queue reset".to_string(),
    }))
}
