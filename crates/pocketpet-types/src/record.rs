//! The pet record and its nested structures.
//!
//! [`PetRecord`] is the single mutable entity of a session. Every nested
//! structure is always present: [`PetRecord::new`] is the one canonical
//! constructor, and loaders merge saved data onto a freshly constructed
//! record instead of patching missing pieces at each call site.
//!
//! Field names serialize in camelCase because the record is read as-is by
//! the UI collaborators and stored verbatim by the persistence layer.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{
    Appliance, EvolutionStage, FoodItem, PetState, PetType, SicknessType, TimeOfDay,
};

/// Upper bound of every vital.
pub const VITAL_MAX: f64 = 100.0;

/// Lower bound of every vital.
pub const VITAL_MIN: f64 = 0.0;

/// Starting balance of a freshly hatched pet.
pub const STARTING_MONEY: u32 = 100;

/// Age in minutes at which a baby first evolves.
pub const FIRST_EVOLUTION_MINUTES: u64 = 30;

// ---------------------------------------------------------------------------
// Nested structures
// ---------------------------------------------------------------------------

/// Current illness, if any.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Sickness {
    /// Whether the pet is currently ill.
    pub is_sick: bool,
    /// Which illness.
    #[serde(rename = "type")]
    pub kind: SicknessType,
    /// How bad it is (0--100). Medicine wears this down.
    pub severity: f64,
    /// Resolve passes spent sick so far.
    #[ts(type = "number")]
    pub duration: u64,
}

impl Sickness {
    /// A healthy pet's sickness record.
    pub fn healthy() -> Self {
        Self::default()
    }
}

/// Life-stage progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Evolution {
    /// Current stage.
    pub stage: EvolutionStage,
    /// Age in minutes at which the next stage is reached. `None` once adult.
    #[ts(type = "number | null")]
    pub next_evolution: Option<u64>,
}

impl Default for Evolution {
    fn default() -> Self {
        Self {
            stage: EvolutionStage::Baby,
            next_evolution: Some(FIRST_EVOLUTION_MINUTES),
        }
    }
}

/// Hospital admission.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct HospitalStay {
    /// Whether the pet is admitted.
    pub is_in_hospital: bool,
    /// When the pet was admitted.
    pub admission_time: Option<DateTime<Utc>>,
    /// Minutes of treatment required before discharge.
    #[ts(type = "number")]
    pub treatment_duration: u64,
}

/// Vacation trip.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Vacation {
    /// Whether the pet is away.
    pub is_on_vacation: bool,
    /// When the trip started.
    pub start_time: Option<DateTime<Utc>>,
    /// Trip length in minutes.
    #[ts(type = "number")]
    pub duration: u64,
    /// Where the pet went.
    pub destination: String,
}

/// Everything bought from the shop. Entries are never removed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Inventory {
    /// Foods bought at least once.
    pub foods: BTreeSet<FoodItem>,
    /// Appliances owned.
    pub appliances: BTreeSet<Appliance>,
}

impl Inventory {
    /// Whether the appliance is already owned.
    pub fn owns(&self, appliance: Appliance) -> bool {
        self.appliances.contains(&appliance)
    }
}

// ---------------------------------------------------------------------------
// Pet record
// ---------------------------------------------------------------------------

/// The simulated pet.
///
/// Vitals are real numbers in `[0, 100]`. `hunger` is a satiety gauge:
/// 100 is full and it falls over time. `age` and `loneliness` are derived
/// from timestamps by the condition resolver and are overwritten on every
/// resolve pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PetRecord {
    /// Display name.
    pub name: String,
    /// Species, fixed at hatching.
    pub pet_type: PetType,

    /// Satiety (100 = full).
    pub hunger: f64,
    /// Mood.
    pub happiness: f64,
    /// Physical health.
    pub health: f64,
    /// Stamina.
    pub energy: f64,
    /// Hygiene.
    pub cleanliness: f64,
    /// Grows with time since the last interaction.
    pub loneliness: f64,

    /// Whole minutes since `birth_time`.
    #[ts(type = "number")]
    pub age: u64,
    /// When the pet hatched.
    pub birth_time: DateTime<Utc>,
    /// Last time the player did anything with the pet.
    pub last_interaction: Option<DateTime<Utc>>,
    /// Start of the last feeding.
    pub last_fed: Option<DateTime<Utc>>,
    /// Start of the last play session.
    pub last_played: Option<DateTime<Utc>>,
    /// Start of the last nap.
    pub last_slept: Option<DateTime<Utc>>,
    /// Last bath.
    pub last_cleaned: Option<DateTime<Utc>>,
    /// Last dose of medicine.
    pub last_medicine: Option<DateTime<Utc>>,

    /// Coins available for the shop and services.
    pub money: u32,
    /// Current activity state.
    pub state: PetState,
    /// Current illness.
    pub sickness: Sickness,
    /// Life stage.
    pub evolution: Evolution,
    /// Hospital admission.
    pub hospital: HospitalStay,
    /// Vacation trip.
    pub vacation: Vacation,
    /// Shop purchases.
    pub inventory: Inventory,
}

impl PetRecord {
    /// Hatch a new pet at `now` with default vitals.
    ///
    /// hunger/happiness/energy start at 80, health and cleanliness at 100,
    /// loneliness at 0, with [`STARTING_MONEY`] coins. The first evolution
    /// is due at [`FIRST_EVOLUTION_MINUTES`].
    pub fn new(name: impl Into<String>, pet_type: PetType, now: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            pet_type,
            hunger: 80.0,
            happiness: 80.0,
            health: VITAL_MAX,
            energy: 80.0,
            cleanliness: VITAL_MAX,
            loneliness: VITAL_MIN,
            age: 0,
            birth_time: now,
            last_interaction: Some(now),
            last_fed: None,
            last_played: None,
            last_slept: None,
            last_cleaned: None,
            last_medicine: None,
            money: STARTING_MONEY,
            state: PetState::Idle,
            sickness: Sickness::healthy(),
            evolution: Evolution::default(),
            hospital: HospitalStay::default(),
            vacation: Vacation::default(),
            inventory: Inventory::default(),
        }
    }

    /// Whether the pet is away (hospital or vacation).
    pub const fn is_away(&self) -> bool {
        self.hospital.is_in_hospital || self.vacation.is_on_vacation
    }

    /// Snap every vital into `[0, 100]`. NaN collapses to 0.
    pub fn clamp_vitals(&mut self) {
        for vital in [
            &mut self.hunger,
            &mut self.happiness,
            &mut self.health,
            &mut self.energy,
            &mut self.cleanliness,
            &mut self.loneliness,
        ] {
            *vital = clamp_vital(*vital);
        }
    }

    /// All six vitals, in declaration order.
    pub const fn vitals(&self) -> [f64; 6] {
        [
            self.hunger,
            self.happiness,
            self.health,
            self.energy,
            self.cleanliness,
            self.loneliness,
        ]
    }
}

/// Clamp a single vital into `[0, 100]`, mapping NaN to 0.
pub const fn clamp_vital(value: f64) -> f64 {
    if value.is_nan() {
        VITAL_MIN
    } else {
        value.clamp(VITAL_MIN, VITAL_MAX)
    }
}

// ---------------------------------------------------------------------------
// Published snapshot
// ---------------------------------------------------------------------------

/// A timed care action currently running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ActivityStatus {
    /// The state the action holds the pet in.
    pub state: PetState,
    /// When the action started.
    pub started_at: DateTime<Utc>,
    /// When its finalizer is due.
    pub ends_at: DateTime<Utc>,
}

/// Read model published to UI collaborators after every resolve pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PetSnapshot {
    /// The resolved record.
    pub pet: PetRecord,
    /// The running timed action, if any.
    pub activity: Option<ActivityStatus>,
    /// Day or night in game time.
    pub time_of_day: TimeOfDay,
    /// When the snapshot was taken.
    pub taken_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn hatch() -> PetRecord {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single().unwrap_or_default();
        PetRecord::new("Buddy", PetType::Cat, now)
    }

    #[test]
    fn new_pet_has_default_vitals() {
        let pet = hatch();
        assert!((pet.hunger - 80.0).abs() < f64::EPSILON);
        assert!((pet.health - 100.0).abs() < f64::EPSILON);
        assert!((pet.cleanliness - 100.0).abs() < f64::EPSILON);
        assert_eq!(pet.money, 100);
        assert_eq!(pet.state, PetState::Idle);
        assert_eq!(pet.evolution.next_evolution, Some(30));
        assert!(!pet.sickness.is_sick);
        assert!(pet.inventory.appliances.is_empty());
    }

    #[test]
    fn clamp_vitals_snaps_into_range() {
        let mut pet = hatch();
        pet.hunger = 140.0;
        pet.energy = -12.5;
        pet.happiness = f64::NAN;
        pet.clamp_vitals();
        assert!((pet.hunger - 100.0).abs() < f64::EPSILON);
        assert!(pet.energy.abs() < f64::EPSILON);
        assert!(pet.happiness.abs() < f64::EPSILON);
    }

    #[test]
    fn record_serializes_with_camel_case_keys() {
        let pet = hatch();
        let value = serde_json::to_value(&pet).unwrap_or_default();
        assert!(value.get("petType").is_some());
        assert!(value.get("lastInteraction").is_some());
        assert_eq!(
            value.pointer("/sickness/type").and_then(serde_json::Value::as_str),
            Some("none")
        );
        assert_eq!(
            value.pointer("/evolution/nextEvolution").and_then(serde_json::Value::as_u64),
            Some(30)
        );
    }
}
