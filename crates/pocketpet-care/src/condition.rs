//! The condition resolver.
//!
//! [`resolve`] is the reconciliation pass run after every mutation of the
//! pet record, whether it came from an action, a timed-effect step, a decay
//! tick, or a load. It is the only place derived fields (`age`,
//! `loneliness`, `state`) are written and the only place sickness,
//! hospital, vacation and evolution progress.
//!
//! # Order of operations
//!
//! 1. Clamp every vital into `[0, 100]`
//! 2. Derive `age` from `birthTime`
//! 3. Derive `loneliness` from `lastInteraction`
//! 4. Discharge from hospital once treatment time has elapsed
//! 5. Return from vacation once the trip is over
//! 6. Progress an existing sickness (drain, medicine, recovery)
//! 7. Roll for a new sickness
//! 8. Advance one evolution stage if due
//! 9. Derive `state`
//! 10. Clamp again

use chrono::{DateTime, Duration, Utc};
use pocketpet_types::{
    EvolutionStage, PetRecord, PetState, Sickness, SicknessType, clamp_vital, elapsed_minutes,
};
use rand::Rng;

use crate::config::{CareConfig, EvolutionConfig, SicknessConfig};
use crate::vitals::{VitalDelta, minutes_as_f64};

/// Loneliness gained per minute without interaction.
pub const LONELINESS_PER_MINUTE: f64 = 0.5;

/// Health restored on hospital discharge.
pub const DISCHARGE_HEALTH: f64 = 50.0;

/// Health below which a pet is considered sick regardless of illness.
pub const CRITICAL_HEALTH: f64 = 20.0;

/// Energy below which a pet collapses asleep.
pub const EXHAUSTED_ENERGY: f64 = 20.0;

/// Health above which a sick-state pet without illness returns to idle.
pub const RECOVERED_HEALTH: f64 = 50.0;

/// Energy above which a sleeping pet wakes up by itself.
pub const RESTED_ENERGY: f64 = 50.0;

/// Happiness, energy and loneliness adjustment on returning from vacation.
const VACATION_RETURN: VitalDelta = VitalDelta {
    happiness: 30.0,
    energy: 20.0,
    loneliness: -20.0,
    hunger: 0.0,
    health: 0.0,
    cleanliness: 0.0,
};

/// Facts about the session the record alone does not carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolveContext {
    /// A timed care action (eat, play, sleep) is running and owns `state`.
    pub activity_in_progress: bool,
}

/// A notable change made by a resolve pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Hospital treatment finished.
    Discharged,
    /// Vacation finished.
    ReturnedFromVacation {
        /// Where the pet had gone.
        destination: String,
    },
    /// Medicine cured the illness.
    Recovered,
    /// The pet caught something.
    FellSick {
        /// Which illness.
        kind: SicknessType,
        /// Onset severity.
        severity: f64,
    },
    /// The pet reached a new life stage.
    Evolved {
        /// The stage reached.
        stage: EvolutionStage,
    },
    /// The derived state changed.
    StateChanged {
        /// State before the pass.
        from: PetState,
        /// State after the pass.
        to: PetState,
    },
}

/// Result of a resolve pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolveReport {
    /// Notable changes, in the order they happened.
    pub transitions: Vec<Transition>,
    /// The record changed and should be persisted.
    pub dirty: bool,
}

impl ResolveReport {
    /// Whether the derived state changed during the pass.
    pub fn state_changed(&self) -> bool {
        self.transitions
            .iter()
            .any(|t| matches!(t, Transition::StateChanged { .. }))
    }
}

/// Run the condition resolver over `pet` at instant `now`.
pub fn resolve(
    pet: &mut PetRecord,
    now: DateTime<Utc>,
    ctx: ResolveContext,
    config: &CareConfig,
    rng: &mut impl Rng,
) -> ResolveReport {
    let mut report = ResolveReport {
        transitions: Vec::new(),
        dirty: true,
    };
    let state_before = pet.state;

    // 1. Bounds
    pet.clamp_vitals();

    // 2-3. Time-derived fields
    pet.age = elapsed_minutes(pet.birth_time, now);
    let idle_minutes = pet
        .last_interaction
        .map_or(0, |at| elapsed_minutes(at, now));
    pet.loneliness = clamp_vital(minutes_as_f64(idle_minutes) * LONELINESS_PER_MINUTE);

    // 4-5. Away completion
    if discharge_if_done(pet, now) {
        report.transitions.push(Transition::Discharged);
    }
    if let Some(destination) = return_if_done(pet, now) {
        report
            .transitions
            .push(Transition::ReturnedFromVacation { destination });
    }

    // 6-7. Sickness. Progression pauses while away; onset does not.
    if pet.sickness.is_sick {
        if !pet.is_away() && progress_sickness(pet, now, &config.sickness) {
            report.transitions.push(Transition::Recovered);
        }
    } else if let Some(sickness) = roll_onset(pet, &config.sickness, rng) {
        report.transitions.push(Transition::FellSick {
            kind: sickness.kind,
            severity: sickness.severity,
        });
        pet.sickness = sickness;
    }

    // 8. Evolution
    if let Some(stage) = evolve_if_due(pet, &config.evolution) {
        report.transitions.push(Transition::Evolved { stage });
    }

    // 9. State
    if !pet.is_away() {
        pet.state = derive_state(pet, ctx);
    }

    // 10. Bounds again
    pet.clamp_vitals();

    if pet.state != state_before {
        report.transitions.push(Transition::StateChanged {
            from: state_before,
            to: pet.state,
        });
    }
    report
}

/// Whole minutes elapsed since `since`, or `None` when the timestamp is
/// missing (treated as already complete).
fn minutes_since(since: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<u64> {
    since.map(|at| elapsed_minutes(at, now))
}

fn discharge_if_done(pet: &mut PetRecord, now: DateTime<Utc>) -> bool {
    if !pet.hospital.is_in_hospital {
        return false;
    }
    let treated = minutes_since(pet.hospital.admission_time, now);
    if treated.is_some_and(|m| m < pet.hospital.treatment_duration) {
        return false;
    }
    pet.hospital.is_in_hospital = false;
    pet.hospital.admission_time = None;
    pet.sickness = Sickness::healthy();
    pet.health = clamp_vital(pet.health + DISCHARGE_HEALTH);
    pet.state = PetState::Idle;
    true
}

fn return_if_done(pet: &mut PetRecord, now: DateTime<Utc>) -> Option<String> {
    if !pet.vacation.is_on_vacation {
        return None;
    }
    let away = minutes_since(pet.vacation.start_time, now);
    if away.is_some_and(|m| m < pet.vacation.duration) {
        return None;
    }
    pet.vacation.is_on_vacation = false;
    pet.vacation.start_time = None;
    VACATION_RETURN.apply(pet);
    pet.state = PetState::Idle;
    Some(pet.vacation.destination.clone())
}

/// Drain, count and treat an existing illness. Returns `true` on recovery.
fn progress_sickness(pet: &mut PetRecord, now: DateTime<Utc>, cfg: &SicknessConfig) -> bool {
    pet.sickness.duration = pet.sickness.duration.saturating_add(1);
    let drain = match pet.sickness.kind {
        SicknessType::Cold => VitalDelta {
            energy: -cfg.cold_energy_drain,
            ..VitalDelta::ZERO
        },
        SicknessType::Stomach => VitalDelta {
            hunger: -cfg.stomach_hunger_drain,
            ..VitalDelta::ZERO
        },
        SicknessType::Sadness => VitalDelta {
            happiness: -cfg.sadness_happiness_drain,
            ..VitalDelta::ZERO
        },
        SicknessType::Fatigue => VitalDelta {
            energy: -cfg.fatigue_energy_drain,
            ..VitalDelta::ZERO
        },
        SicknessType::None => VitalDelta::ZERO,
    };
    drain.apply(pet);

    let window = i64::try_from(cfg.medicine_window_minutes)
        .ok()
        .and_then(Duration::try_minutes)
        .unwrap_or(Duration::MAX);
    let medicated = pet
        .last_medicine
        .is_some_and(|at| now.signed_duration_since(at) < window);
    if !medicated {
        return false;
    }
    pet.sickness.severity = (pet.sickness.severity - cfg.medicine_recovery).max(0.0);
    if pet.sickness.severity <= 0.0 {
        pet.sickness = Sickness::healthy();
        return true;
    }
    false
}

/// Probability check that tolerates out-of-range and NaN inputs.
fn chance(rng: &mut impl Rng, p: f64) -> bool {
    if p.is_nan() || p <= 0.0 {
        false
    } else if p >= 1.0 {
        true
    } else {
        rng.random_bool(p)
    }
}

fn roll_onset(pet: &PetRecord, cfg: &SicknessConfig, rng: &mut impl Rng) -> Option<Sickness> {
    if !chance(rng, cfg.onset_chance) {
        return None;
    }
    let risk = (100.0 - pet.health) + (100.0 - pet.cleanliness);
    if risk <= cfg.risk_threshold || !chance(rng, cfg.onset_gate) {
        return None;
    }
    let idx = rng.random_range(0..SicknessType::AILMENTS.len());
    let kind = SicknessType::AILMENTS
        .get(idx)
        .copied()
        .unwrap_or(SicknessType::Cold);
    let severity = if cfg.min_severity < cfg.max_severity {
        rng.random_range(cfg.min_severity..cfg.max_severity)
    } else {
        cfg.min_severity
    };
    Some(Sickness {
        is_sick: true,
        kind,
        severity: clamp_vital(severity),
        duration: 0,
    })
}

fn evolve_if_due(pet: &mut PetRecord, cfg: &EvolutionConfig) -> Option<EvolutionStage> {
    let due = pet.evolution.next_evolution?;
    if pet.age < due {
        return None;
    }
    let stage = pet.evolution.stage.next()?;
    pet.evolution.stage = stage;
    pet.evolution.next_evolution = match stage {
        EvolutionStage::Child => Some(pet.age.saturating_add(cfg.child_minutes)),
        EvolutionStage::Teen => Some(pet.age.saturating_add(cfg.teen_minutes)),
        EvolutionStage::Baby | EvolutionStage::Adult => None,
    };
    Some(stage)
}

/// Derive the activity state from the vitals.
///
/// Illness and critical health force `sick`; exhaustion forces `sleeping`.
/// The relaxing rules (waking up, getting better) only apply when no timed
/// action owns the state.
fn derive_state(pet: &PetRecord, ctx: ResolveContext) -> PetState {
    if pet.sickness.is_sick || pet.health < CRITICAL_HEALTH {
        return PetState::Sick;
    }
    if pet.energy < EXHAUSTED_ENERGY {
        return PetState::Sleeping;
    }
    if ctx.activity_in_progress {
        return pet.state;
    }
    match pet.state {
        PetState::Sick if pet.health > RECOVERED_HEALTH => PetState::Idle,
        PetState::Sleeping if pet.energy > RESTED_ENERGY => PetState::Idle,
        // Away states with no away record left behind.
        PetState::Hospital | PetState::Vacation => PetState::Idle,
        other => other,
    }
}
