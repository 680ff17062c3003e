//! Baseline attrition applied by the periodic decay tick.
//!
//! Decay only touches idle and sick pets. Pets that are eating, playing,
//! sleeping, hospitalized or on vacation are left alone; their timed
//! effects or away-completion handle the vitals instead.

use pocketpet_types::PetRecord;

use crate::config::DecayRates;
use crate::vitals::VitalDelta;

/// Apply one decay tick to `pet`. Returns `true` if anything was applied.
///
/// The caller runs the condition resolver afterwards.
pub fn apply_decay_tick(pet: &mut PetRecord, rates: &DecayRates) -> bool {
    if !pet.state.decays() {
        return false;
    }
    let health = if pet.sickness.is_sick {
        rates.health_while_sick
    } else {
        rates.health
    };
    VitalDelta {
        hunger: -rates.hunger,
        happiness: -rates.happiness,
        health: -health,
        energy: -rates.energy,
        cleanliness: -rates.cleanliness,
        loneliness: rates.loneliness,
    }
    .apply(pet);
    true
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pocketpet_types::{PetState, PetType};

    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
    }

    #[test]
    fn idle_pet_decays() {
        let mut pet = PetRecord::new("Buddy", PetType::Cat, Utc::now());
        assert!(apply_decay_tick(&mut pet, &DecayRates::default()));
        assert_close(pet.hunger, 78.0);
        assert_close(pet.happiness, 78.5);
        assert_close(pet.health, 99.5);
        assert_close(pet.energy, 79.0);
        assert_close(pet.cleanliness, 99.2);
    }

    #[test]
    fn sick_pet_loses_health_three_times_faster() {
        let mut pet = PetRecord::new("Buddy", PetType::Cat, Utc::now());
        pet.state = PetState::Sick;
        pet.sickness.is_sick = true;
        assert!(apply_decay_tick(&mut pet, &DecayRates::default()));
        assert_close(pet.health, 98.5);
    }

    #[test]
    fn busy_pets_do_not_decay() {
        for state in [
            PetState::Eating,
            PetState::Playing,
            PetState::Sleeping,
            PetState::Hospital,
            PetState::Vacation,
        ] {
            let mut pet = PetRecord::new("Buddy", PetType::Cat, Utc::now());
            pet.state = state;
            let before = pet.clone();
            assert!(!apply_decay_tick(&mut pet, &DecayRates::default()));
            assert_eq!(pet, before);
        }
    }

    #[test]
    fn decay_floors_at_zero() {
        let mut pet = PetRecord::new("Buddy", PetType::Cat, Utc::now());
        pet.hunger = 1.0;
        apply_decay_tick(&mut pet, &DecayRates::default());
        assert_close(pet.hunger, 0.0);
    }
}
