//! Action preconditions.
//!
//! Each check returns `Ok(())` or the first [`RejectionReason`] that
//! applies. A rejected action must leave the record untouched, so nothing
//! here mutates.
//!
//! While the pet is in the hospital or on vacation, actions that would
//! take over its state (feed, play, sleep, another hospital stay or
//! vacation) are refused. Instant actions still go through.

use pocketpet_types::{PetAction, PetRecord, RejectionReason, ShopItem};

use crate::config::ActionTuning;

use super::catalog;

/// Validate `action` against the current record.
pub fn validate(
    action: PetAction,
    pet: &PetRecord,
    tuning: &ActionTuning,
) -> Result<(), RejectionReason> {
    if pet.is_away() && needs_pet_home(action) {
        return Err(RejectionReason::Unavailable);
    }
    match action {
        PetAction::Feed => require(pet.hunger <= tuning.feed_max_hunger, RejectionReason::NotHungry),
        PetAction::Play => {
            require(pet.energy >= tuning.play_min_energy, RejectionReason::TooTired)?;
            require(
                pet.happiness <= tuning.play_max_happiness,
                RejectionReason::AlreadyHappy,
            )
        }
        PetAction::Sleep => require(pet.energy <= tuning.sleep_max_energy, RejectionReason::NotSleepy),
        PetAction::Clean => require(
            pet.cleanliness <= tuning.clean_max_cleanliness,
            RejectionReason::AlreadyClean,
        ),
        PetAction::Heal => require(pet.health <= tuning.heal_max_health, RejectionReason::AlreadyHealthy),
        PetAction::GiveMedicine => {
            require(pet.sickness.is_sick, RejectionReason::NotSick)?;
            require(pet.money >= tuning.medicine_price, RejectionReason::InsufficientFunds)
        }
        PetAction::SendToHospital => {
            require(pet.sickness.is_sick, RejectionReason::NotSick)?;
            require(pet.money >= tuning.hospital_price, RejectionReason::InsufficientFunds)
        }
        PetAction::SendOnVacation => {
            require(pet.money >= tuning.vacation_price, RejectionReason::InsufficientFunds)?;
            require(
                pet.loneliness >= tuning.vacation_min_loneliness,
                RejectionReason::NotLonely,
            )
        }
        PetAction::EarnMoney => require(pet.energy >= tuning.work_min_energy, RejectionReason::TooTired),
        PetAction::Purchase { item } => validate_purchase(item, pet),
    }
}

const fn needs_pet_home(action: PetAction) -> bool {
    matches!(
        action,
        PetAction::Feed
            | PetAction::Play
            | PetAction::Sleep
            | PetAction::SendToHospital
            | PetAction::SendOnVacation
    )
}

fn validate_purchase(item: ShopItem, pet: &PetRecord) -> Result<(), RejectionReason> {
    require(pet.money >= catalog::price(item), RejectionReason::InsufficientFunds)?;
    if let ShopItem::Appliance(appliance) = item {
        require(!pet.inventory.owns(appliance), RejectionReason::AlreadyOwned)?;
    }
    Ok(())
}

const fn require(condition: bool, reason: RejectionReason) -> Result<(), RejectionReason> {
    if condition { Ok(()) } else { Err(reason) }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pocketpet_types::{Appliance, FoodItem, PetType};

    use super::*;

    fn pet() -> PetRecord {
        PetRecord::new("Buddy", PetType::Bird, Utc::now())
    }

    fn check(action: PetAction, pet: &PetRecord) -> Result<(), RejectionReason> {
        validate(action, pet, &ActionTuning::default())
    }

    #[test]
    fn feed_needs_appetite() {
        let mut pet = pet();
        pet.hunger = 95.0;
        assert_eq!(check(PetAction::Feed, &pet), Err(RejectionReason::NotHungry));
        pet.hunger = 90.0;
        assert_eq!(check(PetAction::Feed, &pet), Ok(()));
    }

    #[test]
    fn play_checks_energy_then_happiness() {
        let mut pet = pet();
        pet.energy = 19.0;
        pet.happiness = 95.0;
        assert_eq!(check(PetAction::Play, &pet), Err(RejectionReason::TooTired));
        pet.energy = 50.0;
        assert_eq!(check(PetAction::Play, &pet), Err(RejectionReason::AlreadyHappy));
        pet.happiness = 60.0;
        assert_eq!(check(PetAction::Play, &pet), Ok(()));
    }

    #[test]
    fn sleep_clean_heal_ceilings() {
        let pet = pet();
        assert_eq!(check(PetAction::Sleep, &pet), Ok(()));
        assert_eq!(check(PetAction::Clean, &pet), Err(RejectionReason::AlreadyClean));
        assert_eq!(check(PetAction::Heal, &pet), Err(RejectionReason::AlreadyHealthy));
    }

    #[test]
    fn medicine_and_hospital_need_a_sick_pet_and_money() {
        let mut pet = pet();
        assert_eq!(check(PetAction::GiveMedicine, &pet), Err(RejectionReason::NotSick));
        assert_eq!(check(PetAction::SendToHospital, &pet), Err(RejectionReason::NotSick));
        pet.sickness.is_sick = true;
        pet.money = 30;
        assert_eq!(check(PetAction::GiveMedicine, &pet), Ok(()));
        assert_eq!(
            check(PetAction::SendToHospital, &pet),
            Err(RejectionReason::InsufficientFunds)
        );
    }

    #[test]
    fn vacation_needs_money_and_loneliness() {
        let mut pet = pet();
        assert_eq!(check(PetAction::SendOnVacation, &pet), Err(RejectionReason::NotLonely));
        pet.loneliness = 60.0;
        pet.money = 99;
        assert_eq!(
            check(PetAction::SendOnVacation, &pet),
            Err(RejectionReason::InsufficientFunds)
        );
        pet.money = 100;
        assert_eq!(check(PetAction::SendOnVacation, &pet), Ok(()));
    }

    #[test]
    fn away_pet_refuses_state_changing_actions() {
        let mut pet = pet();
        pet.hospital.is_in_hospital = true;
        pet.sickness.is_sick = true;
        pet.energy = 50.0;
        pet.loneliness = 60.0;
        for action in [
            PetAction::Feed,
            PetAction::Play,
            PetAction::Sleep,
            PetAction::SendToHospital,
            PetAction::SendOnVacation,
        ] {
            assert_eq!(check(action, &pet), Err(RejectionReason::Unavailable));
        }
    }

    #[test]
    fn away_pet_still_takes_instant_actions() {
        let mut pet = pet();
        pet.vacation.is_on_vacation = true;
        pet.cleanliness = 50.0;
        pet.health = 50.0;
        pet.sickness.is_sick = true;
        assert_eq!(check(PetAction::Clean, &pet), Ok(()));
        assert_eq!(check(PetAction::Heal, &pet), Ok(()));
        assert_eq!(check(PetAction::GiveMedicine, &pet), Ok(()));
        assert_eq!(check(PetAction::EarnMoney, &pet), Ok(()));
        let candy = PetAction::Purchase {
            item: ShopItem::Food(FoodItem::HappyCandy),
        };
        assert_eq!(check(candy, &pet), Ok(()));
    }

    #[test]
    fn appliance_can_only_be_owned_once() {
        let mut pet = pet();
        let ball = PetAction::Purchase {
            item: ShopItem::Appliance(Appliance::SuperBall),
        };
        assert_eq!(check(ball, &pet), Ok(()));
        pet.inventory.appliances.insert(Appliance::SuperBall);
        assert_eq!(check(ball, &pet), Err(RejectionReason::AlreadyOwned));
    }

    #[test]
    fn purchase_needs_funds() {
        let mut pet = pet();
        pet.money = 10;
        let mansion = PetAction::Purchase {
            item: ShopItem::Appliance(Appliance::PetMansion),
        };
        assert_eq!(check(mansion, &pet), Err(RejectionReason::InsufficientFunds));
    }
}
