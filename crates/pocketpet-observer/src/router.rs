//! Axum router construction for the Observer API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS middleware enabled for cross-origin UI access.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the Observer server.
///
/// The router includes:
/// - `GET /api/health` -- liveness
/// - `GET /api/pet` -- current pet snapshot
/// - `POST /api/pet/actions/{action}` -- care actions
/// - `POST /api/pet/purchase` -- shop purchases
/// - `POST /api/pet/reset` -- hatch a new pet
/// - `GET /ws/pet` -- `WebSocket` snapshot stream
///
/// CORS is configured to allow any origin for development. In
/// production this should be restricted.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // WebSocket
        .route("/ws/pet", get(ws::ws_pet))
        // REST API
        .route("/api/health", get(handlers::health))
        .route("/api/pet", get(handlers::get_pet))
        .route("/api/pet/actions/{action}", post(handlers::perform_action))
        .route("/api/pet/purchase", post(handlers::purchase))
        .route("/api/pet/reset", post(handlers::reset))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
