//! Shared application state for the Observer server.

use chrono::{DateTime, Utc};
use pocketpet_core::runner::SessionHandle;

/// State shared across all Axum handlers.
///
/// Wrapped in [`Arc`](std::sync::Arc) and injected via Axum's `State`
/// extractor. Every read and write goes through the session handle, so
/// the observer never touches the record directly.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Handle to the running session.
    pub session: SessionHandle,
    /// When the server state was created.
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Create application state around a running session.
    pub fn new(session: SessionHandle) -> Self {
        Self {
            session,
            started_at: Utc::now(),
        }
    }
}
