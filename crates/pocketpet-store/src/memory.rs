//! In-process store. Nothing survives a restart.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::store::PetStore;

/// A [`PetStore`] backed by process memory. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<RwLock<Option<String>>>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-loaded with `json`.
    pub fn with_contents(json: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Some(json.into()))),
        }
    }
}

impl PetStore for MemoryStore {
    async fn load_raw(&self) -> Result<Option<String>, StoreError> {
        Ok(self.slot.read().await.clone())
    }

    async fn save_raw(&self, json: String) -> Result<(), StoreError> {
        *self.slot.write().await = Some(json);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.slot.write().await = None;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clones_share_the_slot() {
        let store = MemoryStore::new();
        let other = store.clone();
        assert_eq!(store.load_raw().await.unwrap(), None);

        other.save_raw(String::from("{}")).await.unwrap();
        assert_eq!(store.load_raw().await.unwrap().as_deref(), Some("{}"));

        store.clear().await.unwrap();
        assert_eq!(other.load_raw().await.unwrap(), None);
    }
}
