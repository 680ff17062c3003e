//! `Dragonfly` (Redis-compatible) backend.
//!
//! The whole pet lives under one string key holding the JSON document.
//!
//! # Key Patterns
//!
//! | Pattern | Type | Description |
//! |---------|------|-------------|
//! | `tamagotchi-pet` (configurable) | JSON | Pet record plus `lastSaved` |

use fred::prelude::*;

use crate::error::StoreError;
use crate::store::PetStore;

/// A [`PetStore`] holding the pet under a single `Dragonfly` key.
#[derive(Clone)]
pub struct DragonflyStore {
    client: Client,
    key: String,
}

impl std::fmt::Debug for DragonflyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragonflyStore")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl DragonflyStore {
    /// Connect to `Dragonfly` at the given URL and use `key` for the pet.
    ///
    /// The URL should follow the Redis URL scheme:
    /// `redis://host:port` or `redis://host:port/db`
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if the URL cannot be parsed.
    /// Returns [`StoreError::Dragonfly`] if the connection fails.
    pub async fn connect(url: &str, key: impl Into<String>) -> Result<Self, StoreError> {
        let config = Config::from_url(url)
            .map_err(|e| StoreError::Config(format!("Invalid Dragonfly URL: {e}")))?;

        let client = Builder::from_config(config).build()?;
        client.init().await?;

        let key = key.into();
        tracing::info!(key = %key, "Connected to Dragonfly");
        Ok(Self { client, key })
    }

    /// The key the pet is stored under.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PetStore for DragonflyStore {
    async fn load_raw(&self) -> Result<Option<String>, StoreError> {
        let value: Option<String> = self.client.get(self.key.as_str()).await?;
        Ok(value)
    }

    async fn save_raw(&self, json: String) -> Result<(), StoreError> {
        let _: () = self
            .client
            .set(self.key.as_str(), json.as_str(), None, None, false)
            .await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let _: u32 = self.client.del(self.key.as_str()).await?;
        Ok(())
    }
}
