//! Error types for the queue web interface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use queue_core::QueueError;
use thiserror::Error;

/// Errors that can occur in the queue web interface.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Domain error from the queue service.
    #[error(transparent)]
    Queue(#[from] QueueError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Queue(err) => (status_for(err), err.to_string()),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", message);
        }

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}

fn status_for(err: &QueueError) -> StatusCode {
    match err {
        QueueError::WindowNotFound { .. } => StatusCode::NOT_FOUND,
        QueueError::DuplicateNumber { .. } => StatusCode::CONFLICT,
        // The original surface reports an empty pool as a plain bad request.
        QueueError::Exhausted => StatusCode::BAD_REQUEST,
        QueueError::InvalidNumber { .. }
        | QueueError::AnnouncementTooLong { .. }
        | QueueError::UnknownColor { .. } => StatusCode::BAD_REQUEST,
        QueueError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Result type for handler operations.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_client_statuses() {
        let cases = [
            (
                QueueError::WindowNotFound { id: "x".into() },
                StatusCode::NOT_FOUND,
            ),
            (
                QueueError::DuplicateNumber { number: 3 },
                StatusCode::CONFLICT,
            ),
            (QueueError::Exhausted, StatusCode::BAD_REQUEST),
            (
                QueueError::InvalidNumber { number: -1 },
                StatusCode::BAD_REQUEST,
            ),
            (
                QueueError::Storage("io".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(status_for(&err), expected);
        }
    }
}
