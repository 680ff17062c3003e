//! Shop prices, food effects and vacation destinations.
//!
//! Foods are eaten on purchase and give a fixed stat bundle. Appliances
//! are owned forever and have no effect on the vitals.

use pocketpet_types::{Appliance, FoodItem, ShopItem};

use crate::vitals::VitalDelta;

/// Places a pet can be sent on vacation.
pub const VACATION_DESTINATIONS: [&str; 5] = [
    "Beach Resort",
    "Mountain Retreat",
    "City Adventure",
    "Forest Camp",
    "Spa Retreat",
];

/// Price of a food item.
pub const fn food_price(food: FoodItem) -> u32 {
    match food {
        FoodItem::PremiumMeat => 30,
        FoodItem::BirthdayCake => 50,
        FoodItem::HealthMilk => 25,
        FoodItem::HappyCandy => 20,
        FoodItem::PizzaSlice => 35,
        FoodItem::MagicApple => 40,
    }
}

/// Price of an appliance.
pub const fn appliance_price(appliance: Appliance) -> u32 {
    match appliance {
        Appliance::SuperBall => 60,
        Appliance::ComfortChair => 80,
        Appliance::FlowerPot => 40,
        Appliance::MiniPlayground => 120,
        Appliance::GardenSet => 70,
        Appliance::PetMansion => 150,
    }
}

/// Price of any shop item.
pub const fn price(item: ShopItem) -> u32 {
    match item {
        ShopItem::Food(food) => food_price(food),
        ShopItem::Appliance(appliance) => appliance_price(appliance),
    }
}

/// Stat bundle applied when a food is bought.
pub const fn food_effect(food: FoodItem) -> VitalDelta {
    let (hunger, happiness, health) = match food {
        FoodItem::PremiumMeat => (40.0, 0.0, 10.0),
        FoodItem::BirthdayCake => (20.0, 30.0, 0.0),
        FoodItem::HealthMilk => (15.0, 0.0, 20.0),
        FoodItem::HappyCandy => (10.0, 25.0, 0.0),
        FoodItem::PizzaSlice => (30.0, 15.0, 0.0),
        FoodItem::MagicApple => (25.0, 0.0, 25.0),
    };
    VitalDelta {
        hunger,
        happiness,
        health,
        ..VitalDelta::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prices_match_catalog() {
        assert_eq!(price(ShopItem::Food(FoodItem::BirthdayCake)), 50);
        assert_eq!(price(ShopItem::Appliance(Appliance::PetMansion)), 150);
        assert_eq!(price(ShopItem::Appliance(Appliance::FlowerPot)), 40);
    }

    #[test]
    fn every_food_fills_the_stomach() {
        for food in FoodItem::ALL {
            assert!(food_effect(food).hunger > 0.0);
            assert!(food_price(food) > 0);
        }
    }
}
