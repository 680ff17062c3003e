//! Player action pipeline: validate, then execute.
//!
//! # Submodules
//!
//! - [`catalog`] -- Shop prices, food effects, vacation destinations.
//! - [`handlers`] -- Execution logic for each action.
//! - [`timed`] -- Timed-effect plans for eating, playing and sleeping.
//! - [`validation`] -- Action preconditions.

pub mod catalog;
pub mod handlers;
pub mod timed;
pub mod validation;

use chrono::{DateTime, Utc};
use pocketpet_types::{ActionOutcome, PetAction, PetRecord};
use rand::Rng;

use crate::config::ActionTuning;
use crate::error::CareError;

use timed::TimedEffectPlan;

/// Outcome of running an action through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionResult {
    /// Whether the action applied or why it was refused.
    pub outcome: ActionOutcome,
    /// The timed effect to schedule, for feed, play and sleep.
    pub plan: Option<TimedEffectPlan>,
}

/// Validate `action` and, if it passes, execute it.
///
/// A rejected action leaves `pet` untouched.
pub fn perform(
    action: PetAction,
    pet: &mut PetRecord,
    now: DateTime<Utc>,
    tuning: &ActionTuning,
    rng: &mut impl Rng,
) -> Result<ActionResult, CareError> {
    if let Err(reason) = validation::validate(action, pet, tuning) {
        return Ok(ActionResult {
            outcome: ActionOutcome::Rejected { reason },
            plan: None,
        });
    }
    let plan = handlers::execute(action, pet, now, tuning, rng)?;
    Ok(ActionResult {
        outcome: ActionOutcome::Applied,
        plan,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pocketpet_types::{PetType, RejectionReason};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn rejected_action_changes_nothing() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut pet = PetRecord::new("Buddy", PetType::Cat, Utc::now());
        pet.hunger = 95.0;
        let before = pet.clone();
        let result = perform(
            PetAction::Feed,
            &mut pet,
            Utc::now(),
            &ActionTuning::default(),
            &mut rng,
        )
        .unwrap();
        assert_eq!(
            result.outcome,
            ActionOutcome::Rejected {
                reason: RejectionReason::NotHungry
            }
        );
        assert!(result.plan.is_none());
        assert_eq!(pet, before);
    }
}
