//! Vital adjustments.
//!
//! Every change to the six vitals goes through a [`VitalDelta`]. Applying a
//! delta clamps each touched vital back into `[0, 100]`, so no caller can
//! leave the record out of bounds.

use pocketpet_types::{PetRecord, clamp_vital};
use serde::{Deserialize, Serialize};

/// A signed change to each of the six vitals. Zero means "leave alone".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VitalDelta {
    /// Change to satiety.
    pub hunger: f64,
    /// Change to mood.
    pub happiness: f64,
    /// Change to health.
    pub health: f64,
    /// Change to stamina.
    pub energy: f64,
    /// Change to hygiene.
    pub cleanliness: f64,
    /// Change to loneliness.
    pub loneliness: f64,
}

impl VitalDelta {
    /// A delta that changes nothing.
    pub const ZERO: Self = Self {
        hunger: 0.0,
        happiness: 0.0,
        health: 0.0,
        energy: 0.0,
        cleanliness: 0.0,
        loneliness: 0.0,
    };

    /// Apply the delta to `pet`, clamping every vital into range.
    pub fn apply(&self, pet: &mut PetRecord) {
        pet.hunger = clamp_vital(pet.hunger + self.hunger);
        pet.happiness = clamp_vital(pet.happiness + self.happiness);
        pet.health = clamp_vital(pet.health + self.health);
        pet.energy = clamp_vital(pet.energy + self.energy);
        pet.cleanliness = clamp_vital(pet.cleanliness + self.cleanliness);
        pet.loneliness = clamp_vital(pet.loneliness + self.loneliness);
    }
}

/// Convert a minute count to `f64` for vital arithmetic.
///
/// Counts beyond `u32::MAX` saturate; every vital rate is large enough that
/// the result clamps to a bound long before that.
pub fn minutes_as_f64(minutes: u64) -> f64 {
    f64::from(u32::try_from(minutes).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pocketpet_types::PetType;

    use super::*;

    #[test]
    fn apply_clamps_both_bounds() {
        let mut pet = PetRecord::new("Buddy", PetType::Dog, Utc::now());
        let delta = VitalDelta {
            hunger: 50.0,
            energy: -500.0,
            happiness: 5.0,
            ..VitalDelta::ZERO
        };
        delta.apply(&mut pet);
        assert!((pet.hunger - 100.0).abs() < f64::EPSILON);
        assert!(pet.energy.abs() < f64::EPSILON);
        assert!((pet.happiness - 85.0).abs() < f64::EPSILON);
        assert!((pet.health - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_delta_is_identity() {
        let mut pet = PetRecord::new("Buddy", PetType::Dog, Utc::now());
        let before = pet.clone();
        VitalDelta::ZERO.apply(&mut pet);
        assert_eq!(pet, before);
    }

    #[test]
    fn minutes_saturate() {
        assert!((minutes_as_f64(20) - 20.0).abs() < f64::EPSILON);
        assert!(minutes_as_f64(u64::MAX) > 1.0e9);
    }
}
