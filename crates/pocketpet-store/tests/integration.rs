//! Integration tests for the `pocketpet-store` persistence layer.
//!
//! The file-backed tests run everywhere. The `Dragonfly` tests require a
//! live instance and are marked `#[ignore]`. Run them with:
//!
//! ```bash
//! docker run -d -p 6379:6379 docker.dragonflydb.io/dragonflydb/dragonfly
//! cargo test -p pocketpet-store -- --ignored
//! ```

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::arithmetic_side_effects
)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use pocketpet_care::OfflineRates;
use pocketpet_types::{Appliance, PetRecord, PetType};
use pocketpet_store::{
    DragonflyStore, JsonFileStore, LoadSource, PetStore, load_pet, save_pet,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Dragonfly connection URL for a local instance.
const DRAGONFLY_URL: &str = "redis://localhost:6379";

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn sample_pet() -> PetRecord {
    let mut pet = PetRecord::new("Pixel", PetType::Cat, t0());
    pet.hunger = 50.0;
    pet.money = 60;
    pet.inventory.appliances.insert(Appliance::GardenSet);
    pet
}

async fn exercise<S: PetStore>(store: &S) {
    store.clear().await.expect("clear");
    save_pet(store, &sample_pet(), t0()).await.expect("save");

    let mut rng = StdRng::seed_from_u64(3);
    let loaded = load_pet(
        store,
        "Ignored",
        t0() + Duration::minutes(20),
        &OfflineRates::default(),
        &mut rng,
    )
    .await;

    assert!(matches!(loaded.source, LoadSource::Restored(report) if report.minutes_away == 20));
    assert_eq!(loaded.record.name, "Pixel");
    assert_eq!(loaded.record.money, 60);
    assert!(loaded.record.inventory.owns(Appliance::GardenSet));
    assert!((loaded.record.hunger - 40.0).abs() < 1e-9);

    store.clear().await.expect("clear");
    assert_eq!(store.load_raw().await.expect("load"), None);
}

// =============================================================================
// File store
// =============================================================================

#[tokio::test]
async fn file_store_save_load_cycle() {
    let path = std::env::temp_dir()
        .join(format!("pocketpet-it-{}", std::process::id()))
        .join("save.json");
    let store = JsonFileStore::new(path);
    exercise(&store).await;
}

// =============================================================================
// Dragonfly store
// =============================================================================

#[tokio::test]
#[ignore = "requires live Dragonfly instance"]
async fn dragonfly_save_load_cycle() {
    let store = DragonflyStore::connect(DRAGONFLY_URL, "pocketpet-it")
        .await
        .expect("Failed to connect to Dragonfly -- is it running?");
    exercise(&store).await;
}

#[tokio::test]
#[ignore = "requires live Dragonfly instance"]
async fn dragonfly_missing_key_is_none() {
    let store = DragonflyStore::connect(DRAGONFLY_URL, "pocketpet-it-missing")
        .await
        .expect("Failed to connect to Dragonfly -- is it running?");
    store.clear().await.expect("clear");
    assert_eq!(store.load_raw().await.expect("load"), None);
}
