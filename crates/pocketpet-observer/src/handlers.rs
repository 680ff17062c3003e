//! REST API endpoint handlers for the Observer server.
//!
//! Reads come from the session's latest published snapshot; writes are
//! forwarded to the session runner and answered once the action has been
//! resolved.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/health` | Liveness |
//! | `GET` | `/api/pet` | Current pet snapshot |
//! | `POST` | `/api/pet/actions/{action}` | Perform a care action |
//! | `POST` | `/api/pet/purchase` | Buy a shop item |
//! | `POST` | `/api/pet/reset` | Hatch a new pet |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use chrono::Utc;
use pocketpet_types::{ActionOutcome, PetAction, PetSnapshot, ShopItem};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ObserverError;
use crate::state::AppState;

/// Body of `POST /api/pet/purchase`.
#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    /// Shop item identifier, e.g. `premium_meat` or `flower_pot`.
    pub item: String,
}

/// Response to an action or purchase.
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    /// Whether the action applied or why it was refused.
    pub outcome: ActionOutcome,
    /// The pet after the action.
    pub pet: PetSnapshot,
}

/// Response to `GET /api/health`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Always `ok` while the server answers.
    pub status: &'static str,
    /// Seconds since the server state was created.
    pub uptime_seconds: i64,
}

// ---------------------------------------------------------------------------
// GET /api/health
// ---------------------------------------------------------------------------

/// Report liveness.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_seconds: Utc::now()
            .signed_duration_since(state.started_at)
            .num_seconds(),
    })
}

// ---------------------------------------------------------------------------
// GET /api/pet
// ---------------------------------------------------------------------------

/// Return the latest snapshot.
pub async fn get_pet(State(state): State<Arc<AppState>>) -> Json<PetSnapshot> {
    Json(state.session.snapshot())
}

// ---------------------------------------------------------------------------
// POST /api/pet/actions/{action}
// ---------------------------------------------------------------------------

/// Perform the named care action.
///
/// Accepted names: `feed`, `play`, `sleep`, `clean`, `heal`, `medicine`,
/// `hospital`, `vacation`, `work`. A rejected action is still a `200`;
/// the outcome says why.
pub async fn perform_action(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<ActionResponse>, ObserverError> {
    let action = PetAction::from_name(&name).ok_or(ObserverError::UnknownAction(name))?;
    run(&state, action).await
}

// ---------------------------------------------------------------------------
// POST /api/pet/purchase
// ---------------------------------------------------------------------------

/// Buy one shop item.
pub async fn purchase(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PurchaseRequest>,
) -> Result<Json<ActionResponse>, ObserverError> {
    let item: ShopItem = request.item.parse()?;
    run(&state, PetAction::Purchase { item }).await
}

// ---------------------------------------------------------------------------
// POST /api/pet/reset
// ---------------------------------------------------------------------------

/// Replace the pet with a freshly hatched one.
pub async fn reset(State(state): State<Arc<AppState>>) -> Result<Json<PetSnapshot>, ObserverError> {
    let snapshot = state.session.reset().await?;
    Ok(Json(snapshot))
}

async fn run(state: &AppState, action: PetAction) -> Result<Json<ActionResponse>, ObserverError> {
    let reply = state.session.perform(action).await?;
    debug!(action = action.name(), outcome = ?reply.outcome, "Action via API");
    Ok(Json(ActionResponse {
        outcome: reply.outcome,
        pet: reply.snapshot,
    }))
}
