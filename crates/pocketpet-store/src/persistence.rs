//! Loading and saving the pet record.
//!
//! Saved documents are merged over a freshly constructed record before
//! they are decoded, so a save written by an older build (missing fields,
//! missing sections) still loads. After a successful load the pet is aged
//! by the minutes it spent offline.
//!
//! Load never fails: any read or decode error is logged, a fresh pet is
//! hatched, and that pet is written back over the broken save.

use chrono::{DateTime, Utc};
use pocketpet_care::{OfflineRates, OfflineReport, apply_offline_decay, hatch, random_pet_type};
use pocketpet_types::{PetRecord, elapsed_minutes};
use rand::Rng;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::StoreError;
use crate::store::PetStore;

/// JSON key holding the save instant.
pub const LAST_SAVED_KEY: &str = "lastSaved";

/// Where a loaded record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Nothing was saved; a new pet hatched.
    Fresh,
    /// A save was found and caught up for the time offline.
    Restored(OfflineReport),
    /// The save was unreadable; a new pet hatched and replaced it.
    Reset,
}

/// A record ready to hand to a session.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedPet {
    /// The record.
    pub record: PetRecord,
    /// How it was obtained.
    pub source: LoadSource,
}

#[derive(Serialize)]
struct SavedPet<'a> {
    #[serde(flatten)]
    pet: &'a PetRecord,
    #[serde(rename = "lastSaved")]
    last_saved: DateTime<Utc>,
}

/// Serialize `record` with a `lastSaved` stamp of `now` and store it.
///
/// # Errors
///
/// Returns [`StoreError::Serialization`] if encoding fails, or the
/// backend's error if the write fails.
pub async fn save_pet<S: PetStore>(
    store: &S,
    record: &PetRecord,
    now: DateTime<Utc>,
) -> Result<(), StoreError> {
    let json = serde_json::to_string(&SavedPet {
        pet: record,
        last_saved: now,
    })?;
    store.save_raw(json).await
}

/// Load the pet, hatching a new one named `name` if there is no usable
/// save.
pub async fn load_pet<S: PetStore>(
    store: &S,
    name: &str,
    now: DateTime<Utc>,
    rates: &OfflineRates,
    rng: &mut impl Rng,
) -> LoadedPet {
    let raw = match store.load_raw().await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            info!("No saved pet found");
            return LoadedPet {
                record: hatch(name, now, rng),
                source: LoadSource::Fresh,
            };
        }
        Err(err) => {
            warn!(error = %err, "Failed to read saved pet, starting over");
            return reset(store, name, now, rng).await;
        }
    };

    // Merge base only; a save without `petType` keeps this random species.
    let defaults = PetRecord::new(name, random_pet_type(rng), now);
    match decode(&raw, &defaults) {
        Ok((mut record, last_saved)) => {
            let since = last_saved.unwrap_or(record.birth_time);
            let minutes_away = elapsed_minutes(since, now);
            let report = apply_offline_decay(&mut record, minutes_away, rates);
            info!(
                name = %record.name,
                minutes_away,
                neglected = report.neglected,
                "Restored saved pet"
            );
            LoadedPet {
                record,
                source: LoadSource::Restored(report),
            }
        }
        Err(err) => {
            warn!(error = %err, "Saved pet is unreadable, starting over");
            reset(store, name, now, rng).await
        }
    }
}

async fn reset<S: PetStore>(
    store: &S,
    name: &str,
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> LoadedPet {
    let record = hatch(name, now, rng);
    if let Err(err) = save_pet(store, &record, now).await {
        warn!(error = %err, "Failed to overwrite broken save");
    }
    LoadedPet {
        record,
        source: LoadSource::Reset,
    }
}

/// Merge `raw` over `defaults` and decode, returning the record and its
/// `lastSaved` stamp if it had a valid one.
fn decode(
    raw: &str,
    defaults: &PetRecord,
) -> Result<(PetRecord, Option<DateTime<Utc>>), StoreError> {
    let saved: Value = serde_json::from_str(raw)?;
    if !saved.is_object() {
        return Err(StoreError::Malformed(String::from("not a JSON object")));
    }
    let mut merged = serde_json::to_value(defaults)?;
    deep_merge(&mut merged, saved);

    let last_saved = merged
        .as_object_mut()
        .and_then(|fields| fields.remove(LAST_SAVED_KEY))
        .and_then(|value| serde_json::from_value::<DateTime<Utc>>(value).ok());
    let mut record: PetRecord = serde_json::from_value(merged)?;
    record.clamp_vitals();
    Ok((record, last_saved))
}

/// Recursively overlay `overlay` onto `base`. Objects merge key by key;
/// any other value replaces what was there.
fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing
)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use chrono::{Duration, TimeZone};
    use pocketpet_types::{PetState, PetType};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;
    use tracing_subscriber::fmt::MakeWriter;

    use super::*;
    use crate::memory::MemoryStore;

    /// Collects formatted log lines for assertions.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single().unwrap()
    }

    async fn load(store: &MemoryStore, now: DateTime<Utc>) -> LoadedPet {
        let mut rng = StdRng::seed_from_u64(1);
        load_pet(store, "Buddy", now, &OfflineRates::default(), &mut rng).await
    }

    #[tokio::test]
    async fn empty_store_hatches_fresh_pet() {
        let store = MemoryStore::new();
        let loaded = load(&store, t0()).await;
        assert_eq!(loaded.source, LoadSource::Fresh);
        assert_eq!(loaded.record.name, "Buddy");
        assert_eq!(loaded.record.birth_time, t0());
        assert_eq!(store.load_raw().await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let store = MemoryStore::new();
        let mut pet = PetRecord::new("Mochi", PetType::Bird, t0());
        pet.money = 42;
        pet.state = PetState::Sick;
        save_pet(&store, &pet, t0()).await.unwrap();

        let loaded = load(&store, t0() + Duration::seconds(30)).await;
        assert_eq!(
            loaded.source,
            LoadSource::Restored(OfflineReport {
                minutes_away: 0,
                neglected: false
            })
        );
        assert_eq!(loaded.record, pet);
    }

    #[tokio::test]
    async fn save_stamps_last_saved() {
        let store = MemoryStore::new();
        let pet = PetRecord::new("Mochi", PetType::Cat, t0());
        save_pet(&store, &pet, t0() + Duration::minutes(3)).await.unwrap();

        let raw: Value = serde_json::from_str(&store.load_raw().await.unwrap().unwrap()).unwrap();
        let stamp: DateTime<Utc> = serde_json::from_value(raw[LAST_SAVED_KEY].clone()).unwrap();
        assert_eq!(stamp, t0() + Duration::minutes(3));
        assert_eq!(raw["name"], "Mochi");
    }

    #[tokio::test]
    async fn restoring_a_save_does_not_hatch() {
        let logs = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let store = MemoryStore::new();
        let pet = PetRecord::new("Mochi", PetType::Cat, t0());
        save_pet(&store, &pet, t0()).await.unwrap();
        let loaded = load(&store, t0() + Duration::minutes(1)).await;

        assert!(matches!(loaded.source, LoadSource::Restored(_)));
        assert_eq!(loaded.record.pet_type, PetType::Cat);
        let output = logs.contents();
        assert!(output.contains("Restored saved pet"));
        assert!(!output.contains("Hatched new pet"));
    }

    #[tokio::test]
    async fn offline_minutes_are_caught_up() {
        let store = MemoryStore::new();
        let mut pet = PetRecord::new("Mochi", PetType::Dog, t0());
        pet.hunger = 50.0;
        save_pet(&store, &pet, t0()).await.unwrap();

        let loaded = load(&store, t0() + Duration::minutes(20)).await;
        let record = loaded.record;
        assert!((record.hunger - 40.0).abs() < 1e-9);
        assert!((record.happiness - 74.0).abs() < 1e-9);
        assert!((record.energy - 76.0).abs() < 1e-9);
        assert!((record.cleanliness - 98.0).abs() < 1e-9);
        assert!((record.health - 100.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn neglect_costs_health() {
        let store = MemoryStore::new();
        let mut pet = PetRecord::new("Mochi", PetType::Dog, t0());
        pet.hunger = 25.0;
        save_pet(&store, &pet, t0()).await.unwrap();

        let loaded = load(&store, t0() + Duration::minutes(20)).await;
        assert!((loaded.record.hunger - 15.0).abs() < 1e-9);
        assert!((loaded.record.health - 90.0).abs() < 1e-9);
        assert_eq!(
            loaded.source,
            LoadSource::Restored(OfflineReport {
                minutes_away: 20,
                neglected: true
            })
        );
    }

    #[tokio::test]
    async fn partial_save_is_merged_over_defaults() {
        let saved = json!({
            "name": "Old Timer",
            "petType": "rabbit",
            "hunger": 12.5,
            "sickness": { "isSick": true },
            "birthTime": "2026-03-01T12:00:00Z"
        });
        let store = MemoryStore::with_contents(saved.to_string());

        let loaded = load(&store, t0()).await;
        let record = loaded.record;
        assert!(matches!(loaded.source, LoadSource::Restored(_)));
        assert_eq!(record.name, "Old Timer");
        assert_eq!(record.pet_type, PetType::Rabbit);
        assert!((record.hunger - 12.5).abs() < f64::EPSILON);
        assert!(record.sickness.is_sick);
        assert!(record.sickness.severity.abs() < f64::EPSILON);
        assert_eq!(record.money, 100);
    }

    #[tokio::test]
    async fn corrupt_save_is_replaced() {
        let store = MemoryStore::with_contents("{not json");
        let loaded = load(&store, t0()).await;
        assert_eq!(loaded.source, LoadSource::Reset);

        let raw = store.load_raw().await.unwrap().unwrap();
        let rewritten: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(rewritten["name"], "Buddy");
    }

    #[tokio::test]
    async fn non_object_save_is_replaced() {
        let store = MemoryStore::with_contents("[1, 2, 3]");
        assert_eq!(load(&store, t0()).await.source, LoadSource::Reset);
    }

    #[tokio::test]
    async fn mistyped_field_is_replaced() {
        let store = MemoryStore::with_contents(r#"{"hunger":"very"}"#);
        assert_eq!(load(&store, t0()).await.source, LoadSource::Reset);
    }

    #[test]
    fn deep_merge_overlays_nested_objects() {
        let mut base = json!({ "a": 1, "b": { "c": 2, "d": 3 } });
        deep_merge(&mut base, json!({ "b": { "d": 4 }, "e": 5 }));
        assert_eq!(base, json!({ "a": 1, "b": { "c": 2, "d": 4 }, "e": 5 }));
    }
}
