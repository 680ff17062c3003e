//! Player actions and their outcomes.
//!
//! A [`PetAction`] is what a UI collaborator asks for; an [`ActionOutcome`]
//! is what it gets back. Rejections are ordinary values, not errors.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{RejectionReason, ShopItem};

/// A player-initiated action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(tag = "action", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum PetAction {
    /// Timed feeding session (30 s).
    Feed,
    /// Timed play session (90 s).
    Play,
    /// Timed nap (180 s).
    Sleep,
    /// Instant bath.
    Clean,
    /// Instant heal.
    Heal,
    /// Buy a dose of medicine for a sick pet.
    GiveMedicine,
    /// Admit a sick pet to the hospital.
    SendToHospital,
    /// Send a lonely pet on vacation.
    SendOnVacation,
    /// Do a shift of work for coins.
    EarnMoney,
    /// Buy something from the shop.
    Purchase {
        /// What to buy.
        item: ShopItem,
    },
}

impl PetAction {
    /// Short name used in logs and in the observer routes.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Feed => "feed",
            Self::Play => "play",
            Self::Sleep => "sleep",
            Self::Clean => "clean",
            Self::Heal => "heal",
            Self::GiveMedicine => "medicine",
            Self::SendToHospital => "hospital",
            Self::SendOnVacation => "vacation",
            Self::EarnMoney => "work",
            Self::Purchase { .. } => "purchase",
        }
    }

    /// Parse a route name (`feed`, `medicine`, `work`, ...).
    ///
    /// `purchase` is not accepted here because it needs an item.
    pub fn from_name(name: &str) -> Option<Self> {
        let action = match name {
            "feed" => Self::Feed,
            "play" => Self::Play,
            "sleep" => Self::Sleep,
            "clean" => Self::Clean,
            "heal" => Self::Heal,
            "medicine" => Self::GiveMedicine,
            "hospital" => Self::SendToHospital,
            "vacation" => Self::SendOnVacation,
            "work" => Self::EarnMoney,
            _ => return None,
        };
        Some(action)
    }
}

/// Result of asking the engine to perform a [`PetAction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "status", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ActionOutcome {
    /// The action took effect.
    Applied,
    /// Preconditions failed; nothing changed.
    Rejected {
        /// Which precondition failed.
        reason: RejectionReason,
    },
}

impl ActionOutcome {
    /// Whether the action took effect.
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::Appliance;

    #[test]
    fn route_names_round_trip() {
        for name in [
            "feed", "play", "sleep", "clean", "heal", "medicine", "hospital", "vacation", "work",
        ] {
            let action = PetAction::from_name(name);
            assert_eq!(action.map(PetAction::name), Some(name));
        }
        assert_eq!(PetAction::from_name("purchase"), None);
        assert_eq!(PetAction::from_name("dance"), None);
    }

    #[test]
    fn purchase_serializes_with_item() {
        let action = PetAction::Purchase {
            item: ShopItem::Appliance(Appliance::SuperBall),
        };
        let json = serde_json::to_string(&action).unwrap_or_default();
        assert_eq!(json, r#"{"action":"purchase","item":"super_ball"}"#);
    }

    #[test]
    fn rejection_serializes_reason() {
        let outcome = ActionOutcome::Rejected {
            reason: RejectionReason::NotHungry,
        };
        let json = serde_json::to_string(&outcome).unwrap_or_default();
        assert_eq!(json, r#"{"status":"rejected","reason":"not_hungry"}"#);
        assert!(!outcome.is_applied());
    }
}
