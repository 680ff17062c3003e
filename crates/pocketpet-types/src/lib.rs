//! Shared type definitions for the `PocketPet` simulation.
//!
//! This crate is the single source of truth for the pet record and every
//! value that crosses a crate boundary. Types defined here flow downstream
//! to `TypeScript` via `ts-rs` for the UI collaborators.
//!
//! # Modules
//!
//! - [`enums`] -- Species, activity states, sickness, life stages, shop ids
//! - [`record`] -- The pet record, its nested structures, and the snapshot
//! - [`actions`] -- Player actions and their outcomes
//! - [`time`] -- Elapsed-minute arithmetic

pub mod actions;
pub mod enums;
pub mod record;
pub mod time;

// Re-export all public types at crate root for convenience.
pub use actions::{ActionOutcome, PetAction};
pub use enums::{
    Appliance, EvolutionStage, FoodItem, PetState, PetType, RejectionReason,
    ShopItem, SicknessType, TimeOfDay, UnknownItem,
};
pub use record::{
    ActivityStatus, Evolution, HospitalStay, Inventory, PetRecord, PetSnapshot, Sickness,
    Vacation, clamp_vital,
};
pub use time::elapsed_minutes;
