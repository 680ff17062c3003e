//! The raw persistence contract.
//!
//! A [`PetStore`] holds exactly one JSON document: the saved pet. It knows
//! nothing about the record's shape; merging, catch-up and `lastSaved`
//! stamping live in [`crate::persistence`].

use std::future::Future;

use crate::error::StoreError;

/// A single-slot store for the serialized pet.
pub trait PetStore: Send + Sync {
    /// Read the stored document, or `None` if nothing has been saved.
    fn load_raw(&self) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Replace the stored document.
    fn save_raw(&self, json: String) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Remove the stored document. Clearing an empty store is not an error.
    fn clear(&self) -> impl Future<Output = Result<(), StoreError>> + Send;
}
