//! Route handlers for the queue web interface.

pub mod health;
pub mod queue;
pub mod windows;

use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // Window queries
        .route("/api/windows", get(windows::list).post(windows::create))
        .route("/api/windows/active", get(windows::list_active))
        .route("/api/windows/:id", get(windows::get).delete(windows::remove))
        // Operator actions
        .route("/api/windows/:id/call-next", post(windows::call_next))
        .route("/api/windows/:id/reannounce", post(windows::reannounce))
        .route("/api/windows/:id/announcement", patch(windows::update_announcement))
        .route("/api/windows/:id/clear", delete(windows::clear))
        .route("/api/windows/:id/toggle", patch(windows::toggle))
        // Queue management
        .route("/api/queue/status", get(queue::status))
        .route("/api/queue/reset", post(queue::reset))
        // Event delivery
        .route("/ws", get(ws::ws_handler))
}
