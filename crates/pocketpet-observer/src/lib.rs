//! Observer API server for `PocketPet`.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws/pet`) streaming every published pet
//!   snapshot
//! - **REST endpoints** for reading the pet and performing care actions,
//!   shop purchases and resets
//!
//! # Architecture
//!
//! The observer holds a [`SessionHandle`] and nothing else. Reads take
//! the latest snapshot from the handle's `watch` channel; writes are
//! commands to the session runner, so the observer never races the
//! simulation.
//!
//! [`SessionHandle`]: pocketpet_core::runner::SessionHandle

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use error::ObserverError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
