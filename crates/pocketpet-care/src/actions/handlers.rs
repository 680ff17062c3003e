//! Execution handlers for player actions.
//!
//! Each handler assumes the action has already passed
//! [`super::validation::validate`]. Instant actions apply their whole
//! effect here; timed actions set the activity state, stamp their
//! timestamps and hand back a [`TimedEffectPlan`] for the session to
//! schedule.

use chrono::{DateTime, Utc};
use pocketpet_types::{HospitalStay, PetAction, PetRecord, PetState, ShopItem, Vacation};
use rand::Rng;
use tracing::debug;

use crate::config::{ActionTuning, TimedActionConfig};
use crate::error::CareError;

use super::catalog;
use super::timed::TimedEffectPlan;

/// Execute a validated action against `pet`.
///
/// Returns the timed-effect plan for feed, play and sleep, `None` for
/// everything else.
pub fn execute(
    action: PetAction,
    pet: &mut PetRecord,
    now: DateTime<Utc>,
    tuning: &ActionTuning,
    rng: &mut impl Rng,
) -> Result<Option<TimedEffectPlan>, CareError> {
    match action {
        PetAction::Feed => {
            pet.last_fed = Some(now);
            start_timed(pet, now, PetState::Eating, &tuning.feed).map(Some)
        }
        PetAction::Play => {
            pet.last_played = Some(now);
            start_timed(pet, now, PetState::Playing, &tuning.play).map(Some)
        }
        PetAction::Sleep => {
            pet.last_slept = Some(now);
            start_timed(pet, now, PetState::Sleeping, &tuning.sleep).map(Some)
        }
        PetAction::Clean => {
            tuning.clean.apply(pet);
            pet.last_cleaned = Some(now);
            pet.last_interaction = Some(now);
            Ok(None)
        }
        PetAction::Heal => {
            tuning.heal.apply(pet);
            Ok(None)
        }
        PetAction::GiveMedicine => {
            charge(pet, tuning.medicine_price)?;
            tuning.medicine.apply(pet);
            pet.last_medicine = Some(now);
            pet.last_interaction = Some(now);
            Ok(None)
        }
        PetAction::SendToHospital => {
            charge(pet, tuning.hospital_price)?;
            pet.hospital = HospitalStay {
                is_in_hospital: true,
                admission_time: Some(now),
                treatment_duration: treatment_minutes(pet.sickness.severity),
            };
            pet.state = PetState::Hospital;
            pet.last_interaction = Some(now);
            debug!(
                treatment_minutes = pet.hospital.treatment_duration,
                "Admitted to hospital"
            );
            Ok(None)
        }
        PetAction::SendOnVacation => {
            charge(pet, tuning.vacation_price)?;
            let idx = rng.random_range(0..catalog::VACATION_DESTINATIONS.len());
            let destination = catalog::VACATION_DESTINATIONS
                .get(idx)
                .copied()
                .unwrap_or("Beach Resort");
            pet.vacation = Vacation {
                is_on_vacation: true,
                start_time: Some(now),
                duration: tuning.vacation_minutes,
                destination: String::from(destination),
            };
            pet.state = PetState::Vacation;
            pet.last_interaction = Some(now);
            debug!(destination, "Left on vacation");
            Ok(None)
        }
        PetAction::EarnMoney => {
            let wage = if tuning.wage_min < tuning.wage_max {
                rng.random_range(tuning.wage_min..=tuning.wage_max)
            } else {
                tuning.wage_min
            };
            pet.money = pet
                .money
                .checked_add(wage)
                .ok_or_else(|| CareError::overflow("wage"))?;
            tuning.work.apply(pet);
            pet.last_interaction = Some(now);
            debug!(wage, money = pet.money, "Earned money");
            Ok(None)
        }
        PetAction::Purchase { item } => {
            charge(pet, catalog::price(item))?;
            match item {
                ShopItem::Food(food) => {
                    pet.inventory.foods.insert(food);
                    catalog::food_effect(food).apply(pet);
                }
                ShopItem::Appliance(appliance) => {
                    pet.inventory.appliances.insert(appliance);
                }
            }
            pet.last_interaction = Some(now);
            debug!(item = %item, money = pet.money, "Purchased item");
            Ok(None)
        }
    }
}

fn start_timed(
    pet: &mut PetRecord,
    now: DateTime<Utc>,
    state: PetState,
    cfg: &TimedActionConfig,
) -> Result<TimedEffectPlan, CareError> {
    let plan = TimedEffectPlan::from_config(state, cfg)?;
    pet.state = state;
    pet.last_interaction = Some(now);
    Ok(plan)
}

fn charge(pet: &mut PetRecord, amount: u32) -> Result<(), CareError> {
    pet.money = pet
        .money
        .checked_sub(amount)
        .ok_or_else(|| CareError::overflow("charge exceeds balance"))?;
    Ok(())
}

/// Treatment length in minutes: one minute per ten points of severity,
/// rounded up.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // severity is clamped to 0..=100, so the result is 0..=10.
fn treatment_minutes(severity: f64) -> u64 {
    let severity = pocketpet_types::clamp_vital(severity);
    (severity / 10.0).ceil() as u64
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pocketpet_types::{Appliance, FoodItem, PetType};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn run(action: PetAction, pet: &mut PetRecord) -> Option<TimedEffectPlan> {
        let mut rng = StdRng::seed_from_u64(3);
        execute(action, pet, Utc::now(), &ActionTuning::default(), &mut rng).unwrap()
    }

    fn pet() -> PetRecord {
        PetRecord::new("Buddy", PetType::Dog, Utc::now())
    }

    #[test]
    fn feed_starts_eating() {
        let mut pet = pet();
        let plan = run(PetAction::Feed, &mut pet).unwrap();
        assert_eq!(plan.state, PetState::Eating);
        assert_eq!(plan.steps, 6);
        assert_eq!(pet.state, PetState::Eating);
        assert!(pet.last_fed.is_some());
        assert!((pet.hunger - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn clean_is_instant() {
        let mut pet = pet();
        pet.cleanliness = 50.0;
        pet.happiness = 50.0;
        pet.health = 50.0;
        assert!(run(PetAction::Clean, &mut pet).is_none());
        assert!((pet.cleanliness - 80.0).abs() < f64::EPSILON);
        assert!((pet.happiness - 60.0).abs() < f64::EPSILON);
        assert!((pet.health - 55.0).abs() < f64::EPSILON);
        assert!(pet.last_cleaned.is_some());
        assert_eq!(pet.state, PetState::Idle);
    }

    #[test]
    fn heal_restores_health_without_touching_interaction() {
        let mut pet = pet();
        pet.health = 30.0;
        let before = pet.last_interaction;
        run(PetAction::Heal, &mut pet);
        assert!((pet.health - 80.0).abs() < f64::EPSILON);
        assert!((pet.happiness - 95.0).abs() < f64::EPSILON);
        assert_eq!(pet.last_interaction, before);
    }

    #[test]
    fn medicine_costs_twenty() {
        let mut pet = pet();
        pet.sickness.is_sick = true;
        pet.health = 50.0;
        run(PetAction::GiveMedicine, &mut pet);
        assert_eq!(pet.money, 80);
        assert!((pet.health - 60.0).abs() < f64::EPSILON);
        assert!(pet.last_medicine.is_some());
    }

    #[test]
    fn hospital_treatment_scales_with_severity() {
        let mut pet = pet();
        pet.sickness.is_sick = true;
        pet.sickness.severity = 55.0;
        run(PetAction::SendToHospital, &mut pet);
        assert_eq!(pet.hospital.treatment_duration, 6);
        assert!(pet.hospital.is_in_hospital);
        assert_eq!(pet.state, PetState::Hospital);
        assert_eq!(pet.money, 50);
    }

    #[test]
    fn vacation_picks_a_known_destination() {
        let mut pet = pet();
        run(PetAction::SendOnVacation, &mut pet);
        assert!(pet.vacation.is_on_vacation);
        assert_eq!(pet.vacation.duration, 15);
        assert!(catalog::VACATION_DESTINATIONS.contains(&pet.vacation.destination.as_str()));
        assert_eq!(pet.money, 0);
        assert_eq!(pet.state, PetState::Vacation);
    }

    #[test]
    fn work_pays_within_wage_range() {
        let mut pet = pet();
        run(PetAction::EarnMoney, &mut pet);
        assert!((110..=130).contains(&pet.money));
        assert!((pet.energy - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn food_purchase_is_eaten() {
        let mut pet = pet();
        pet.hunger = 40.0;
        let item = ShopItem::Food(FoodItem::PremiumMeat);
        run(PetAction::Purchase { item }, &mut pet);
        assert_eq!(pet.money, 70);
        assert!((pet.hunger - 80.0).abs() < f64::EPSILON);
        assert!(pet.inventory.foods.contains(&FoodItem::PremiumMeat));
    }

    #[test]
    fn appliance_purchase_is_kept() {
        let mut pet = pet();
        let item = ShopItem::Appliance(Appliance::FlowerPot);
        run(PetAction::Purchase { item }, &mut pet);
        assert_eq!(pet.money, 60);
        assert!(pet.inventory.owns(Appliance::FlowerPot));
    }

    #[test]
    fn treatment_rounds_up() {
        assert_eq!(treatment_minutes(20.1), 3);
        assert_eq!(treatment_minutes(80.0), 8);
        assert_eq!(treatment_minutes(0.0), 0);
    }
}
