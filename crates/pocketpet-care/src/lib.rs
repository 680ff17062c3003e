//! Pet care logic for the `PocketPet` simulation.
//!
//! This crate contains everything that operates on the pet record without
//! touching I/O or owning time. It sits between `pocketpet-types` (the data
//! structures) and `pocketpet-core` (the session that schedules effects and
//! drives the clock).
//!
//! # Modules
//!
//! - [`actions`] -- Action validation, execution, timed plans, shop catalog
//! - [`condition`] -- The condition resolver run after every mutation
//! - [`config`] -- Every care tunable ([`CareConfig`])
//! - [`decay`] -- Periodic baseline attrition
//! - [`error`] -- Error types ([`CareError`])
//! - [`lifecycle`] -- Hatching new pets
//! - [`offline`] -- One-shot catch-up for time spent offline
//! - [`vitals`] -- Clamped vital deltas

pub mod actions;
pub mod condition;
pub mod config;
pub mod decay;
pub mod error;
pub mod lifecycle;
pub mod offline;
pub mod vitals;

// Re-export primary types at crate root for convenience.
pub use actions::timed::TimedEffectPlan;
pub use actions::{ActionResult, perform};
pub use condition::{ResolveContext, ResolveReport, Transition, resolve};
pub use config::{
    ActionTuning, CareConfig, DecayRates, EvolutionConfig, OfflineRates, SicknessConfig,
    TimedActionConfig,
};
pub use decay::apply_decay_tick;
pub use error::CareError;
pub use lifecycle::{DEFAULT_PET_NAME, hatch, random_pet_type};
pub use offline::{OfflineReport, apply_offline_decay};
pub use vitals::VitalDelta;
