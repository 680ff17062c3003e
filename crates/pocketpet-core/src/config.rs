//! Configuration loading and typed config structures for `PocketPet`.
//!
//! The canonical configuration lives in `pocketpet-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror the
//! YAML structure, and provides a loader that reads the file and applies
//! environment overrides. Every section and field has a default, so an
//! empty file is a valid configuration.

use std::path::{Path, PathBuf};

use pocketpet_care::CareConfig;
use serde::Deserialize;
use tracing::warn;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `pocketpet-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PocketPetConfig {
    /// Pet identity settings.
    #[serde(default)]
    pub pet: PetConfig,

    /// Decay and autosave periods.
    #[serde(default)]
    pub timing: TimingConfig,

    /// Where the pet record is persisted.
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP/WebSocket observer API.
    #[serde(default)]
    pub observer: ObserverConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Care balance (rates, thresholds, timed plans).
    #[serde(default)]
    pub care: CareConfig,
}

impl PocketPetConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `POCKETPET_SAVE_PATH` overrides `storage.path`
    /// - `DRAGONFLY_URL` overrides `storage.dragonfly_url`
    /// - `POCKETPET_PORT` overrides `observer.port`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string and apply env overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("POCKETPET_SAVE_PATH") {
            self.storage.path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("DRAGONFLY_URL") {
            self.storage.dragonfly_url = val;
        }
        if let Ok(val) = std::env::var("POCKETPET_PORT") {
            match val.parse::<u16>() {
                Ok(port) => self.observer.port = port,
                Err(err) => warn!(value = %val, error = %err, "Ignoring invalid POCKETPET_PORT"),
            }
        }
    }
}

/// Pet identity configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PetConfig {
    /// Name given to a freshly hatched pet.
    #[serde(default = "default_pet_name")]
    pub name: String,

    /// Seed for the session RNG. `None` seeds from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for PetConfig {
    fn default() -> Self {
        Self {
            name: default_pet_name(),
            seed: None,
        }
    }
}

/// Timing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimingConfig {
    /// Seconds between decay ticks.
    #[serde(default = "default_decay_interval_secs")]
    pub decay_interval_secs: u64,

    /// Seconds between autosaves.
    #[serde(default = "default_autosave_interval_secs")]
    pub autosave_interval_secs: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            decay_interval_secs: default_decay_interval_secs(),
            autosave_interval_secs: default_autosave_interval_secs(),
        }
    }
}

/// Which persistence backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// A JSON file on local disk.
    #[default]
    File,
    /// Process memory only. Nothing survives a restart.
    Memory,
    /// A single key in Dragonfly (or any Redis-compatible server).
    Dragonfly,
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Which backend to use.
    #[serde(default)]
    pub backend: StorageBackend,

    /// Save file path for the `file` backend.
    #[serde(default = "default_save_path")]
    pub path: PathBuf,

    /// Dragonfly URL for the `dragonfly` backend.
    #[serde(default = "default_dragonfly_url")]
    pub dragonfly_url: String,

    /// Key the record is stored under.
    #[serde(default = "default_storage_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_save_path(),
            dragonfly_url: default_dragonfly_url(),
            key: default_storage_key(),
        }
    }
}

/// Observer API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObserverConfig {
    /// Whether to serve the API at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Bind address.
    #[serde(default = "default_observer_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_observer_port")]
    pub port: u16,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: default_observer_host(),
            port: default_observer_port(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_pet_name() -> String {
    String::from(pocketpet_care::DEFAULT_PET_NAME)
}

const fn default_decay_interval_secs() -> u64 {
    30
}

const fn default_autosave_interval_secs() -> u64 {
    30
}

fn default_save_path() -> PathBuf {
    PathBuf::from("pocketpet-save.json")
}

fn default_dragonfly_url() -> String {
    String::from("redis://localhost:6379")
}

fn default_storage_key() -> String {
    String::from("tamagotchi-pet")
}

fn default_observer_host() -> String {
    String::from("0.0.0.0")
}

const fn default_observer_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    String::from("info")
}

const fn default_true() -> bool {
    true
}
