//! Error types for the Observer API server.
//!
//! [`ObserverError`] unifies all failure modes into a single enum that
//! can be converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pocketpet_core::runner::RunnerError;
use pocketpet_types::UnknownItem;

/// Errors that can occur in the Observer API layer.
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    /// The action name in the path is not a known action.
    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// The purchase body named an item the shop does not sell.
    #[error("{0}")]
    UnknownItem(#[from] UnknownItem),

    /// The session runner failed or has stopped.
    #[error("session error: {0}")]
    Runner(#[from] RunnerError),
}

impl IntoResponse for ObserverError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::UnknownAction(_) | Self::UnknownItem(_) => StatusCode::BAD_REQUEST,
            Self::Runner(RunnerError::Closed) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Runner(RunnerError::Session { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
