//! Window routes: queries, administration and operator actions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use queue_core::{Window, WindowColor};
use serde::Deserialize;

use crate::error::Result;
use crate::state::AppState;

/// Request to register a new window.
#[derive(Deserialize)]
pub struct CreateWindowRequest {
    pub number: i64,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub operator: String,
}

/// Request to replace a window's announcement.
#[derive(Deserialize)]
pub struct AnnouncementRequest {
    #[serde(default)]
    pub announcement: String,
}

/// List all windows, sorted by number.
pub async fn list(State(state): State<AppState>) -> Json<Vec<Window>> {
    Json(state.service.list_windows().await)
}

/// List active windows, for the public display.
pub async fn list_active(State(state): State<AppState>) -> Json<Vec<Window>> {
    Json(state.service.list_active_windows().await)
}

/// Get one window by id.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Window>> {
    Ok(Json(state.service.get_window(&id).await?))
}

/// Register a new window.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateWindowRequest>,
) -> Result<(StatusCode, Json<Window>)> {
    let color = match req.color.as_deref() {
        Some(value) => WindowColor::parse(value)?,
        None => WindowColor::default(),
    };

    let window = state
        .service
        .create_window(req.number, color, &req.operator)
        .await?;
    Ok((StatusCode::CREATED, Json(window)))
}

/// Delete a window.
pub async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    state.service.delete_window(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Flip a window's active flag.
pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Window>> {
    Ok(Json(state.service.toggle_window(&id).await?))
}

/// Pull the next ticket for this window.
pub async fn call_next(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Window>> {
    Ok(Json(state.service.call_next(&id).await?))
}

/// Re-broadcast the window's current ticket.
pub async fn reannounce(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Window>> {
    state.service.reannounce(&id).await?;
    Ok(Json(state.service.get_window(&id).await?))
}

/// Replace the window's announcement text.
pub async fn update_announcement(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AnnouncementRequest>,
) -> Result<Json<Window>> {
    Ok(Json(
        state
            .service
            .update_announcement(&id, &req.announcement)
            .await?,
    ))
}

/// Reset this window to its empty state.
pub async fn clear(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Window>> {
    Ok(Json(state.service.clear_window(&id).await?))
}
