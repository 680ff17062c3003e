//! Sink that bridges the session runner's writer to a [`PetStore`].
//!
//! The runner hands each queued record to [`StoreSink::save`], which
//! stamps `lastSaved` and writes it through the configured backend.

use chrono::{DateTime, Utc};
use pocketpet_core::runner::PetSink;
use pocketpet_store::{PetStore, StoreError, save_pet};
use pocketpet_types::PetRecord;

/// Persists session records to a store.
#[derive(Debug, Clone)]
pub struct StoreSink<S> {
    store: S,
}

impl<S> StoreSink<S> {
    /// Create a sink writing to `store`.
    pub const fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: PetStore + 'static> PetSink for StoreSink<S> {
    type Error = StoreError;

    async fn save(&self, record: &PetRecord, saved_at: DateTime<Utc>) -> Result<(), StoreError> {
        save_pet(&self.store, record, saved_at).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pocketpet_store::MemoryStore;
    use pocketpet_types::PetType;

    use super::*;

    #[tokio::test]
    async fn sink_writes_through_store() {
        let store = MemoryStore::new();
        let sink = StoreSink::new(store.clone());
        let now = Utc::now();
        let pet = PetRecord::new("Pixel", PetType::Bird, now);

        sink.save(&pet, now).await.unwrap();

        let raw = store.load_raw().await.unwrap().unwrap();
        assert!(raw.contains("\"name\":\"Pixel\""));
        assert!(raw.contains("\"lastSaved\""));
    }
}
