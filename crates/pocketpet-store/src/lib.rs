//! Persistence adapter for `PocketPet`.
//!
//! The pet is a single JSON document in a single slot. This crate provides
//! the slot (three interchangeable backends behind [`PetStore`]) and the
//! rules for reading and writing the document ([`load_pet`], [`save_pet`]).
//!
//! # Architecture
//!
//! ```text
//! Session runner writer task
//!     |
//!     +-- save_pet ----> PetStore::save_raw  (record + lastSaved)
//!
//! Engine startup
//!     |
//!     +-- load_pet <---- PetStore::load_raw
//!         |-- deep merge over a fresh record
//!         +-- offline catch-up for minutes away
//! ```
//!
//! # Modules
//!
//! - [`store`] -- The [`PetStore`] trait
//! - [`file`] -- JSON file on disk (atomic replace)
//! - [`memory`] -- In-process slot
//! - [`dragonfly`] -- `Dragonfly` (Redis-compatible) single key
//! - [`persistence`] -- Load with merge and catch-up, save with `lastSaved`
//! - [`error`] -- Shared error types

pub mod dragonfly;
pub mod error;
pub mod file;
pub mod memory;
pub mod persistence;
pub mod store;

// Re-export primary types for convenience.
pub use dragonfly::DragonflyStore;
pub use error::StoreError;
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use persistence::{LoadSource, LoadedPet, load_pet, save_pet};
pub use store::PetStore;
