//! JSON file on local disk.
//!
//! Writes go to a sibling temp file first and are then renamed over the
//! save file, so a crash mid-write leaves the previous save intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::StoreError;
use crate::store::PetStore;

/// A [`PetStore`] that keeps the pet in a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// A store writing to `path`. Nothing touches the disk until the first
    /// save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The save file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl PetStore for JsonFileStore {
    async fn load_raw(&self) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn save_raw(&self, json: String) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let temp = self.temp_path();
        tokio::fs::write(&temp, json.as_bytes()).await?;
        tokio::fs::rename(&temp, &self.path).await?;
        debug!(path = %self.path.display(), bytes = json.len(), "Wrote save file");
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("pocketpet-store-{}", std::process::id()))
            .join(name)
    }

    #[tokio::test]
    async fn missing_file_loads_as_none() {
        let store = JsonFileStore::new(scratch("missing.json"));
        assert_eq!(store.load_raw().await.unwrap(), None);
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn save_replaces_contents() {
        let path = scratch("pet.json");
        let store = JsonFileStore::new(&path);
        store.save_raw(String::from(r#"{"hunger":1}"#)).await.unwrap();
        store.save_raw(String::from(r#"{"hunger":2}"#)).await.unwrap();

        assert_eq!(
            store.load_raw().await.unwrap().as_deref(),
            Some(r#"{"hunger":2}"#)
        );
        assert!(!store.temp_path().exists());

        store.clear().await.unwrap();
        assert_eq!(store.load_raw().await.unwrap(), None);
    }

    #[test]
    fn temp_file_sits_beside_save_file() {
        let store = JsonFileStore::new("/var/lib/pocketpet/pet.json");
        assert_eq!(store.temp_path(), PathBuf::from("/var/lib/pocketpet/pet.json.tmp"));
    }
}
