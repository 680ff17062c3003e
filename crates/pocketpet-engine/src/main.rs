//! PocketPet engine binary.
//!
//! Loads the pet from the configured store, catches it up for the time
//! it spent offline, and runs its session until Ctrl-C. While running,
//! the observer API serves the pet over HTTP and WebSocket.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `pocketpet-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Open the storage backend
//! 4. Load (or hatch) the pet and open a session
//! 5. Start the session runner
//! 6. Start the observer API server
//! 7. Wait for Ctrl-C, then stop the runner and flush the final save

mod error;
mod store_sink;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use pocketpet_core::clock::{Clock, SystemClock};
use pocketpet_core::config::{LoggingConfig, PocketPetConfig, StorageBackend};
use pocketpet_core::runner::{RunnerOptions, SessionRunner};
use pocketpet_core::session::{PetSession, SessionConfig};
use pocketpet_observer::{AppState, ServerConfig, ServerError, start_server};
use pocketpet_store::{
    DragonflyStore, JsonFileStore, LoadSource, MemoryStore, PetStore, load_pet,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::store_sink::StoreSink;

/// Environment variable naming an alternative config file.
const CONFIG_ENV: &str = "POCKETPET_CONFIG";

/// Config file used when [`CONFIG_ENV`] is unset.
const DEFAULT_CONFIG_PATH: &str = "pocketpet-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if any initialization step or the shutdown fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config_path = config_path();
    let config = load_config(&config_path)?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!(
        path = %config_path.display(),
        pet = config.pet.name,
        backend = ?config.storage.backend,
        "pocketpet-engine starting"
    );

    // 3. Open the storage backend.
    match config.storage.backend {
        StorageBackend::File => {
            let store = JsonFileStore::new(&config.storage.path);
            info!(path = %store.path().display(), "Using file store");
            run(&config, store).await?;
        }
        StorageBackend::Memory => {
            warn!("Using in-memory store, the pet will not survive a restart");
            run(&config, MemoryStore::new()).await?;
        }
        StorageBackend::Dragonfly => {
            let store =
                DragonflyStore::connect(&config.storage.dragonfly_url, config.storage.key.as_str())
                    .await
                    .map_err(EngineError::from)?;
            info!(key = store.key(), "Using Dragonfly store");
            run(&config, store).await?;
        }
    }

    info!("pocketpet-engine shutdown complete");
    Ok(())
}

/// Run one session against `store` until Ctrl-C.
async fn run<S: PetStore + 'static>(config: &PocketPetConfig, store: S) -> Result<(), EngineError> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let mut rng = config
        .pet
        .seed
        .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);

    // 4. Load the pet and open a session.
    let loaded = load_pet(
        &store,
        &config.pet.name,
        clock.now(),
        &config.care.offline,
        &mut rng,
    )
    .await;
    match loaded.source {
        LoadSource::Fresh => info!(name = %loaded.record.name, "A new pet hatched"),
        LoadSource::Restored(report) => info!(
            name = %loaded.record.name,
            minutes_away = report.minutes_away,
            neglected = report.neglected,
            "Welcome back"
        ),
        LoadSource::Reset => warn!(name = %loaded.record.name, "Save was unusable, a new pet hatched"),
    }

    let session = PetSession::new(
        loaded.record,
        SessionConfig::from_config(config),
        clock,
        rng,
    )?;

    // 5. Start the session runner.
    let options = RunnerOptions::from_config(config);
    info!(
        autosave_secs = options.autosave_interval.as_secs(),
        decay_secs = config.timing.decay_interval_secs,
        "Session runner starting"
    );
    let handle = SessionRunner::new(options).start(session, StoreSink::new(store));

    // 6. Start the observer API server.
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let mut server = config.observer.enabled.then(|| {
        let server_config = ServerConfig::from(&config.observer);
        let state = Arc::new(AppState::new(handle.clone()));
        tokio::spawn(async move {
            start_server(&server_config, state, async move {
                let _ = shutdown_rx.await;
            })
            .await
        })
    });
    if server.is_none() {
        info!("Observer API disabled");
    }

    // 7. Wait for Ctrl-C or an observer failure.
    let observer_exited = tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal.map_err(|source| EngineError::Signal { source })?;
            info!("Ctrl-C received, shutting down");
            false
        }
        reason = observer_exit(server.as_mut()) => {
            warn!(reason = %reason, "Observer API exited early, shutting down");
            true
        }
    };
    if observer_exited {
        server = None;
    }

    let _ = shutdown_tx.send(());
    if let Some(task) = server {
        match task.await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!(error = %err, "Observer API stopped with an error"),
            Err(err) => warn!(error = %err, "Observer API task failed"),
        }
    }

    let summary = handle.stop().await?;
    info!(
        name = %summary.pet.name,
        state = ?summary.pet.state,
        actions_applied = summary.actions_applied,
        actions_rejected = summary.actions_rejected,
        effects_fired = summary.effects_fired,
        saves = summary.saves,
        "Session ended"
    );
    Ok(())
}

/// Resolve when the observer task finishes, or never if it is disabled.
async fn observer_exit(task: Option<&mut JoinHandle<Result<(), ServerError>>>) -> String {
    match task {
        Some(task) => match task.await {
            Ok(Ok(())) => String::from("stopped"),
            Ok(Err(err)) => err.to_string(),
            Err(err) => err.to_string(),
        },
        None => std::future::pending().await,
    }
}

/// Config file location: `$POCKETPET_CONFIG` or `pocketpet-config.yaml`.
fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV).map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
}

/// Load the configuration, falling back to defaults when the file is absent.
fn load_config(path: &Path) -> Result<PocketPetConfig, EngineError> {
    if path.exists() {
        Ok(PocketPetConfig::from_file(path)?)
    } else {
        Ok(PocketPetConfig::default())
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}
