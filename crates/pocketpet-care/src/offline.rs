//! Offline catch-up: one-shot attrition for the minutes the process was down.

use pocketpet_types::PetRecord;
use tracing::debug;

use crate::config::OfflineRates;
use crate::vitals::{VitalDelta, minutes_as_f64};

/// What the catch-up did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfflineReport {
    /// Whole minutes the pet was left alone.
    pub minutes_away: u64,
    /// Whether neglect also cost health.
    pub neglected: bool,
}

/// Apply `minutes_away` of offline decay to `pet`.
///
/// Hunger, happiness, energy and cleanliness fall linearly. If hunger or
/// happiness ends up below the neglect threshold, health falls too. Zero
/// minutes changes nothing.
pub fn apply_offline_decay(
    pet: &mut PetRecord,
    minutes_away: u64,
    rates: &OfflineRates,
) -> OfflineReport {
    if minutes_away == 0 {
        return OfflineReport {
            minutes_away,
            neglected: false,
        };
    }
    let minutes = minutes_as_f64(minutes_away);
    VitalDelta {
        hunger: -minutes * rates.hunger_per_minute,
        happiness: -minutes * rates.happiness_per_minute,
        energy: -minutes * rates.energy_per_minute,
        cleanliness: -minutes * rates.cleanliness_per_minute,
        ..VitalDelta::ZERO
    }
    .apply(pet);

    let neglected = pet.hunger < rates.neglect_threshold || pet.happiness < rates.neglect_threshold;
    if neglected {
        VitalDelta {
            health: -minutes * rates.health_per_minute,
            ..VitalDelta::ZERO
        }
        .apply(pet);
    }

    debug!(minutes_away, neglected, hunger = pet.hunger, "Applied offline decay");
    OfflineReport {
        minutes_away,
        neglected,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pocketpet_types::PetType;

    use super::*;

    fn pet() -> PetRecord {
        PetRecord::new("Buddy", PetType::Rabbit, Utc::now())
    }

    #[test]
    fn twenty_minutes_costs_ten_hunger() {
        let mut pet = pet();
        pet.hunger = 50.0;
        let report = apply_offline_decay(&mut pet, 20, &OfflineRates::default());
        assert!((pet.hunger - 40.0).abs() < 1e-9);
        assert!((pet.happiness - 74.0).abs() < 1e-9);
        assert!((pet.energy - 76.0).abs() < 1e-9);
        assert!((pet.cleanliness - 98.0).abs() < 1e-9);
        assert!(!report.neglected);
        assert!((pet.health - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn neglect_is_checked_after_decay() {
        let mut pet = pet();
        pet.hunger = 25.0;
        let report = apply_offline_decay(&mut pet, 20, &OfflineRates::default());
        assert!(report.neglected);
        assert!((pet.health - 90.0).abs() < 1e-9);
    }

    #[test]
    fn zero_minutes_is_a_no_op() {
        let mut pet = pet();
        let before = pet.clone();
        apply_offline_decay(&mut pet, 0, &OfflineRates::default());
        assert_eq!(pet, before);
    }

    #[test]
    fn long_absence_floors_vitals() {
        let mut pet = pet();
        apply_offline_decay(&mut pet, 10_000, &OfflineRates::default());
        assert!(pet.hunger.abs() < f64::EPSILON);
        assert!(pet.health.abs() < f64::EPSILON);
    }
}
