//! Enumeration types for the `PocketPet` simulation.
//!
//! Everything the pet can *be* (species, activity state, sickness kind,
//! life stage) plus the shop catalog identifiers and the reasons an action
//! can be turned down.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Species
// ---------------------------------------------------------------------------

/// The species of a pet. Chosen once at hatching and never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum PetType {
    /// A cat.
    Cat,
    /// A dog.
    Dog,
    /// A bird.
    Bird,
    /// A rabbit.
    Rabbit,
}

impl PetType {
    /// Every species, in declaration order.
    pub const ALL: [Self; 4] = [Self::Cat, Self::Dog, Self::Bird, Self::Rabbit];
}

// ---------------------------------------------------------------------------
// Activity state
// ---------------------------------------------------------------------------

/// What the pet is doing right now.
///
/// States are mutually exclusive. Renderers pick animations from this
/// value; the engine uses it to decide whether decay applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum PetState {
    /// Nothing in particular. Baseline decay applies.
    #[default]
    Idle,
    /// A feeding session is in progress.
    Eating,
    /// A play session is in progress.
    Playing,
    /// Asleep, either put to bed or collapsed from exhaustion.
    Sleeping,
    /// Unwell. Baseline decay applies, health decays faster.
    Sick,
    /// Admitted to the hospital.
    Hospital,
    /// Away on vacation.
    Vacation,
}

impl PetState {
    /// Whether baseline decay ticks apply in this state.
    pub const fn decays(self) -> bool {
        matches!(self, Self::Idle | Self::Sick)
    }

    /// Whether this state belongs to a timed care action.
    pub const fn is_timed_activity(self) -> bool {
        matches!(self, Self::Eating | Self::Playing | Self::Sleeping)
    }
}

impl fmt::Display for PetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Eating => "eating",
            Self::Playing => "playing",
            Self::Sleeping => "sleeping",
            Self::Sick => "sick",
            Self::Hospital => "hospital",
            Self::Vacation => "vacation",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Sickness
// ---------------------------------------------------------------------------

/// The kind of illness a pet has. Each kind drains a different vital.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum SicknessType {
    /// Healthy.
    #[default]
    None,
    /// Drains energy slowly.
    Cold,
    /// Drains hunger.
    Stomach,
    /// Drains happiness.
    Sadness,
    /// Drains energy.
    Fatigue,
}

impl SicknessType {
    /// The illnesses a pet can actually catch (everything except `None`).
    pub const AILMENTS: [Self; 4] = [Self::Cold, Self::Stomach, Self::Sadness, Self::Fatigue];
}

// ---------------------------------------------------------------------------
// Life stage
// ---------------------------------------------------------------------------

/// Life stage of the pet. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EvolutionStage {
    /// Freshly hatched.
    #[default]
    Baby,
    /// Second stage.
    Child,
    /// Third stage.
    Teen,
    /// Final stage.
    Adult,
}

impl EvolutionStage {
    /// The stage that follows this one, or `None` for [`Self::Adult`].
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Baby => Some(Self::Child),
            Self::Child => Some(Self::Teen),
            Self::Teen => Some(Self::Adult),
            Self::Adult => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Day / night
// ---------------------------------------------------------------------------

/// Phase of the in-game day, used by renderers for lighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum TimeOfDay {
    /// Daylight.
    #[default]
    Day,
    /// Night.
    Night,
}

// ---------------------------------------------------------------------------
// Shop catalog identifiers
// ---------------------------------------------------------------------------

/// Error returned when a string does not name a known shop item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownItem(pub String);

impl fmt::Display for UnknownItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown shop item: {}", self.0)
    }
}

impl std::error::Error for UnknownItem {}

/// Premium food sold in the shop. Eaten on purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum FoodItem {
    /// Filling and wholesome.
    PremiumMeat,
    /// A treat that mostly lifts the mood.
    BirthdayCake,
    /// Light on the stomach, good for health.
    HealthMilk,
    /// Pure joy, not much nutrition.
    HappyCandy,
    /// Filling and fun.
    PizzaSlice,
    /// Filling and restorative.
    MagicApple,
}

impl FoodItem {
    /// Every food item, in catalog order.
    pub const ALL: [Self; 6] = [
        Self::PremiumMeat,
        Self::BirthdayCake,
        Self::HealthMilk,
        Self::HappyCandy,
        Self::PizzaSlice,
        Self::MagicApple,
    ];

    /// The catalog identifier (`premium_meat`, ...).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PremiumMeat => "premium_meat",
            Self::BirthdayCake => "birthday_cake",
            Self::HealthMilk => "health_milk",
            Self::HappyCandy => "happy_candy",
            Self::PizzaSlice => "pizza_slice",
            Self::MagicApple => "magic_apple",
        }
    }
}

/// Furniture and toys. Bought once, kept forever, purely environmental.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Appliance {
    /// A bouncy ball.
    SuperBall,
    /// A comfy chair.
    ComfortChair,
    /// A potted flower.
    FlowerPot,
    /// A small playground.
    MiniPlayground,
    /// Garden decorations.
    GardenSet,
    /// The luxury house upgrade.
    PetMansion,
}

impl Appliance {
    /// Every appliance, in catalog order.
    pub const ALL: [Self; 6] = [
        Self::SuperBall,
        Self::ComfortChair,
        Self::FlowerPot,
        Self::MiniPlayground,
        Self::GardenSet,
        Self::PetMansion,
    ];

    /// The catalog identifier (`super_ball`, ...).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuperBall => "super_ball",
            Self::ComfortChair => "comfort_chair",
            Self::FlowerPot => "flower_pot",
            Self::MiniPlayground => "mini_playground",
            Self::GardenSet => "garden_set",
            Self::PetMansion => "pet_mansion",
        }
    }
}

/// Any item the shop sells.
///
/// Serializes as the bare catalog identifier, so `"pizza_slice"` and
/// `"pet_mansion"` are both valid JSON for this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export, export_to = "bindings/")]
pub enum ShopItem {
    /// A food item.
    Food(FoodItem),
    /// An appliance.
    Appliance(Appliance),
}

impl ShopItem {
    /// The catalog identifier.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Food(food) => food.as_str(),
            Self::Appliance(appliance) => appliance.as_str(),
        }
    }
}

impl fmt::Display for ShopItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShopItem {
    type Err = UnknownItem;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if let Some(food) = FoodItem::ALL.into_iter().find(|f| f.as_str() == wanted) {
            return Ok(Self::Food(food));
        }
        Appliance::ALL
            .into_iter()
            .find(|a| a.as_str() == wanted)
            .map(Self::Appliance)
            .ok_or_else(|| UnknownItem(wanted.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Rejections
// ---------------------------------------------------------------------------

/// Why an action was turned down.
///
/// Rejection is the normal soft-fail path: the record is left untouched
/// and the UI simply does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum RejectionReason {
    /// Hunger is already above the feeding ceiling.
    NotHungry,
    /// Happiness is already above the play ceiling.
    AlreadyHappy,
    /// Not enough energy for the action.
    TooTired,
    /// Energy is already above the sleep ceiling.
    NotSleepy,
    /// Cleanliness is already above the bathing ceiling.
    AlreadyClean,
    /// Health is already above the healing ceiling.
    AlreadyHealthy,
    /// The action needs a sick pet.
    NotSick,
    /// The pet is not lonely enough to want a vacation.
    NotLonely,
    /// Not enough money.
    InsufficientFunds,
    /// The appliance is already owned.
    AlreadyOwned,
    /// The pet is in the hospital or on vacation.
    Unavailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shop_item_parses_both_shelves() {
        assert_eq!(
            "pizza_slice".parse::<ShopItem>(),
            Ok(ShopItem::Food(FoodItem::PizzaSlice))
        );
        assert_eq!(
            "pet_mansion".parse::<ShopItem>(),
            Ok(ShopItem::Appliance(Appliance::PetMansion))
        );
        assert!("golden_bone".parse::<ShopItem>().is_err());
    }

    #[test]
    fn shop_item_serializes_as_bare_id() {
        let json = serde_json::to_string(&ShopItem::Appliance(Appliance::FlowerPot));
        assert_eq!(json.ok().as_deref(), Some("\"flower_pot\""));
        let back: Result<ShopItem, _> = serde_json::from_str("\"happy_candy\"");
        assert_eq!(back.ok(), Some(ShopItem::Food(FoodItem::HappyCandy)));
    }

    #[test]
    fn evolution_stages_advance_to_adult() {
        assert_eq!(EvolutionStage::Baby.next(), Some(EvolutionStage::Child));
        assert_eq!(EvolutionStage::Teen.next(), Some(EvolutionStage::Adult));
        assert_eq!(EvolutionStage::Adult.next(), None);
        assert!(EvolutionStage::Baby < EvolutionStage::Adult);
    }

    #[test]
    fn only_idle_and_sick_decay() {
        assert!(PetState::Idle.decays());
        assert!(PetState::Sick.decays());
        assert!(!PetState::Eating.decays());
        assert!(!PetState::Hospital.decays());
    }
}
