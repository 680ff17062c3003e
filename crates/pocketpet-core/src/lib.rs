//! Simulation core for `PocketPet`.
//!
//! This crate owns time. The care rules in `pocketpet-care` are pure
//! functions of a record and an instant; this crate supplies the instant,
//! schedules the effects that land later, and serializes every mutation
//! through a single owner.
//!
//! # Modules
//!
//! - [`clock`] -- [`Clock`] trait, system and manual clocks, and the
//!   in-game day/night cycle.
//! - [`config`] -- Configuration loading from `pocketpet-config.yaml` into
//!   strongly-typed structs.
//! - [`session`] -- [`PetSession`], the owned simulation context with its
//!   timeline of scheduled effects.
//! - [`runner`] -- [`SessionRunner`], the async actor that drives a session
//!   and persists it through a [`PetSink`].
//!
//! [`Clock`]: clock::Clock
//! [`PetSession`]: session::PetSession
//! [`SessionRunner`]: runner::SessionRunner
//! [`PetSink`]: runner::PetSink

pub mod clock;
pub mod config;
pub mod runner;
pub mod session;
