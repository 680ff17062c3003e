//! Timed care actions: eating, playing, sleeping.
//!
//! A timed action holds the pet in one activity state while `steps`
//! increments land `interval` apart, then a finalizer returns the pet to
//! idle. The plan is data; scheduling it and guarding each step against
//! interruption is the session's job.

use chrono::{DateTime, Duration, Utc};
use pocketpet_types::{PetRecord, PetState};

use crate::config::TimedActionConfig;
use crate::error::CareError;
use crate::vitals::VitalDelta;

/// Schedule and effects of one timed action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedEffectPlan {
    /// State the pet holds while the action runs.
    pub state: PetState,
    /// Number of increments before the finalizer.
    pub steps: u32,
    /// Spacing between increments.
    pub interval: Duration,
    /// Delta applied by each increment.
    pub step: VitalDelta,
    /// Delta applied by the finalizer.
    pub finish: VitalDelta,
}

impl TimedEffectPlan {
    /// Build a plan for `state` from its tuning.
    pub fn from_config(state: PetState, cfg: &TimedActionConfig) -> Result<Self, CareError> {
        let interval = i64::try_from(cfg.interval_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| CareError::TimeOutOfRange {
                context: format!("{state} interval of {} s", cfg.interval_secs),
            })?;
        Ok(Self {
            state,
            steps: cfg.steps,
            interval,
            step: cfg.step,
            finish: cfg.finish,
        })
    }

    /// When increment `index` (0-based) is due for an action started at
    /// `started`.
    pub fn step_due(&self, started: DateTime<Utc>, index: u32) -> Result<DateTime<Utc>, CareError> {
        let n = index
            .checked_add(1)
            .ok_or_else(|| CareError::overflow("timed step index"))?;
        self.offset(started, n)
    }

    /// When the finalizer is due for an action started at `started`.
    pub fn finish_due(&self, started: DateTime<Utc>) -> Result<DateTime<Utc>, CareError> {
        self.offset(started, self.steps)
    }

    fn offset(&self, started: DateTime<Utc>, intervals: u32) -> Result<DateTime<Utc>, CareError> {
        i32::try_from(intervals)
            .ok()
            .and_then(|n| self.interval.checked_mul(n))
            .and_then(|span| started.checked_add_signed(span))
            .ok_or_else(|| CareError::TimeOutOfRange {
                context: format!("{} step {intervals}", self.state),
            })
    }

    /// Apply one increment.
    pub fn apply_step(&self, pet: &mut PetRecord) {
        self.step.apply(pet);
    }

    /// Apply the finalizer: back to idle, then the closing adjustment.
    pub fn apply_finish(&self, pet: &mut PetRecord) {
        pet.state = PetState::Idle;
        self.finish.apply(pet);
    }
}
