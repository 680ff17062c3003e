//! Tunable parameters for pet care.
//!
//! [`CareConfig`] bundles every rate, threshold and price-independent
//! number the care logic uses, so the engine can load overrides from the
//! `care` section of `pocketpet-config.yaml` and tests can switch off
//! randomness (e.g. `sickness.onset_chance = 0.0`). Every field defaults,
//! so an empty section yields the stock game balance.

use serde::{Deserialize, Serialize};

use crate::vitals::VitalDelta;

/// Every care tunable, grouped by concern.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CareConfig {
    /// Baseline attrition applied by the periodic decay tick.
    #[serde(default)]
    pub decay: DecayRates,

    /// Attrition applied once on load for the time the process was down.
    #[serde(default)]
    pub offline: OfflineRates,

    /// Sickness onset and progression.
    #[serde(default)]
    pub sickness: SicknessConfig,

    /// Evolution spans.
    #[serde(default)]
    pub evolution: EvolutionConfig,

    /// Action thresholds, effects and timed plans.
    #[serde(default)]
    pub actions: ActionTuning,
}

/// Per-tick decay for idle and sick pets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayRates {
    /// Satiety lost per tick.
    pub hunger: f64,
    /// Mood lost per tick.
    pub happiness: f64,
    /// Health lost per tick while well.
    pub health: f64,
    /// Health lost per tick while sick.
    pub health_while_sick: f64,
    /// Stamina lost per tick.
    pub energy: f64,
    /// Hygiene lost per tick.
    pub cleanliness: f64,
    /// Loneliness gained per tick. The resolver re-derives loneliness from
    /// `lastInteraction` right after, so this only matters between the two.
    pub loneliness: f64,
}

impl Default for DecayRates {
    fn default() -> Self {
        Self {
            hunger: 2.0,
            happiness: 1.5,
            health: 0.5,
            health_while_sick: 1.5,
            energy: 1.0,
            cleanliness: 0.8,
            loneliness: 1.2,
        }
    }
}

/// Per-minute attrition for time spent offline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfflineRates {
    /// Satiety lost per minute away.
    pub hunger_per_minute: f64,
    /// Mood lost per minute away.
    pub happiness_per_minute: f64,
    /// Stamina lost per minute away.
    pub energy_per_minute: f64,
    /// Hygiene lost per minute away.
    pub cleanliness_per_minute: f64,
    /// Health lost per minute away when neglected.
    pub health_per_minute: f64,
    /// Hunger or happiness below this after decay counts as neglected.
    pub neglect_threshold: f64,
}

impl Default for OfflineRates {
    fn default() -> Self {
        Self {
            hunger_per_minute: 0.5,
            happiness_per_minute: 0.3,
            energy_per_minute: 0.2,
            cleanliness_per_minute: 0.1,
            health_per_minute: 0.5,
            neglect_threshold: 20.0,
        }
    }
}

/// Sickness onset, progression, and medicine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SicknessConfig {
    /// Probability of rolling for sickness on a resolve pass.
    pub onset_chance: f64,
    /// `(100 - health) + (100 - cleanliness)` must exceed this to fall ill.
    pub risk_threshold: f64,
    /// Second probability gate once the risk threshold is met.
    pub onset_gate: f64,
    /// Lowest onset severity (inclusive).
    pub min_severity: f64,
    /// Highest onset severity (exclusive).
    pub max_severity: f64,
    /// Minutes a dose of medicine keeps working.
    pub medicine_window_minutes: u64,
    /// Severity removed per resolve pass while medicine works.
    pub medicine_recovery: f64,
    /// Energy drained per pass by a cold.
    pub cold_energy_drain: f64,
    /// Satiety drained per pass by a stomach bug.
    pub stomach_hunger_drain: f64,
    /// Mood drained per pass by sadness.
    pub sadness_happiness_drain: f64,
    /// Energy drained per pass by fatigue.
    pub fatigue_energy_drain: f64,
}

impl Default for SicknessConfig {
    fn default() -> Self {
        Self {
            onset_chance: 0.001,
            risk_threshold: 50.0,
            onset_gate: 0.1,
            min_severity: 20.0,
            max_severity: 80.0,
            medicine_window_minutes: 10,
            medicine_recovery: 2.0,
            cold_energy_drain: 0.5,
            stomach_hunger_drain: 1.0,
            sadness_happiness_drain: 1.0,
            fatigue_energy_drain: 1.0,
        }
    }
}

/// Minutes from one evolution to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Minutes spent as a child before becoming a teen.
    pub child_minutes: u64,
    /// Minutes spent as a teen before becoming an adult.
    pub teen_minutes: u64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            child_minutes: 60,
            teen_minutes: 120,
        }
    }
}

/// Shape of a timed care action: `steps` increments spaced `interval_secs`
/// apart, then a finalizer at `steps * interval_secs`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedActionConfig {
    /// Number of increments.
    pub steps: u32,
    /// Seconds between increments.
    pub interval_secs: u64,
    /// Delta applied by each increment.
    #[serde(default)]
    pub step: VitalDelta,
    /// Delta applied by the finalizer.
    #[serde(default)]
    pub finish: VitalDelta,
}

/// Thresholds, costs and effects for every action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionTuning {
    /// Feeding is refused above this satiety.
    pub feed_max_hunger: f64,
    /// Playing needs at least this much energy.
    pub play_min_energy: f64,
    /// Playing is refused above this happiness.
    pub play_max_happiness: f64,
    /// Sleeping is refused above this energy.
    pub sleep_max_energy: f64,
    /// Bathing is refused above this cleanliness.
    pub clean_max_cleanliness: f64,
    /// Healing is refused above this health.
    pub heal_max_health: f64,
    /// Work needs at least this much energy.
    pub work_min_energy: f64,
    /// Vacation needs at least this much loneliness.
    pub vacation_min_loneliness: f64,

    /// Price of one dose of medicine.
    pub medicine_price: u32,
    /// Price of a hospital admission.
    pub hospital_price: u32,
    /// Price of a vacation.
    pub vacation_price: u32,
    /// Vacation length in minutes.
    pub vacation_minutes: u64,
    /// Smallest wage for a shift of work.
    pub wage_min: u32,
    /// Largest wage for a shift of work (inclusive).
    pub wage_max: u32,

    /// Effect of a bath.
    pub clean: VitalDelta,
    /// Effect of healing.
    pub heal: VitalDelta,
    /// Effect of a dose of medicine.
    pub medicine: VitalDelta,
    /// Effect of a shift of work.
    pub work: VitalDelta,

    /// Timed feeding session.
    pub feed: TimedActionConfig,
    /// Timed play session.
    pub play: TimedActionConfig,
    /// Timed nap.
    pub sleep: TimedActionConfig,
}

impl Default for ActionTuning {
    fn default() -> Self {
        Self {
            feed_max_hunger: 90.0,
            play_min_energy: 20.0,
            play_max_happiness: 90.0,
            sleep_max_energy: 80.0,
            clean_max_cleanliness: 90.0,
            heal_max_health: 90.0,
            work_min_energy: 30.0,
            vacation_min_loneliness: 50.0,
            medicine_price: 20,
            hospital_price: 50,
            vacation_price: 100,
            vacation_minutes: 15,
            wage_min: 10,
            wage_max: 30,
            clean: VitalDelta {
                cleanliness: 30.0,
                happiness: 10.0,
                health: 5.0,
                ..VitalDelta::ZERO
            },
            heal: VitalDelta {
                health: 50.0,
                happiness: 15.0,
                ..VitalDelta::ZERO
            },
            medicine: VitalDelta {
                health: 10.0,
                ..VitalDelta::ZERO
            },
            work: VitalDelta {
                energy: -20.0,
                ..VitalDelta::ZERO
            },
            feed: TimedActionConfig {
                steps: 6,
                interval_secs: 5,
                step: VitalDelta {
                    hunger: 25.0 / 6.0,
                    happiness: 1.0,
                    health: 0.5,
                    energy: -1.0,
                    ..VitalDelta::ZERO
                },
                finish: VitalDelta {
                    hunger: 5.0,
                    happiness: 3.0,
                    ..VitalDelta::ZERO
                },
            },
            play: TimedActionConfig {
                steps: 9,
                interval_secs: 10,
                step: VitalDelta {
                    happiness: 20.0 / 9.0,
                    energy: -2.0,
                    cleanliness: -1.0,
                    hunger: -1.0,
                    health: 0.5,
                    ..VitalDelta::ZERO
                },
                finish: VitalDelta {
                    happiness: 5.0,
                    energy: -5.0,
                    ..VitalDelta::ZERO
                },
            },
            sleep: TimedActionConfig {
                steps: 18,
                interval_secs: 10,
                step: VitalDelta {
                    energy: 70.0 / 18.0,
                    health: 1.0,
                    hunger: -2.0,
                    ..VitalDelta::ZERO
                },
                finish: VitalDelta {
                    energy: 10.0,
                    health: 5.0,
                    ..VitalDelta::ZERO
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = CareConfig::default();
        assert!((cfg.decay.hunger - 2.0).abs() < f64::EPSILON);
        assert!((cfg.decay.health_while_sick - 1.5).abs() < f64::EPSILON);
        assert!((cfg.offline.hunger_per_minute - 0.5).abs() < f64::EPSILON);
        assert!((cfg.sickness.onset_chance - 0.001).abs() < f64::EPSILON);
        assert_eq!(cfg.evolution.child_minutes, 60);
        assert_eq!(cfg.actions.feed.steps, 6);
        assert_eq!(cfg.actions.sleep.interval_secs, 10);
        assert_eq!(cfg.actions.vacation_price, 100);
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let yaml = "sickness:\n  onset_chance: 0.0\nactions:\n  wage_max: 40\n";
        let cfg: CareConfig = serde_yml::from_str(yaml).unwrap_or_default();
        assert!(cfg.sickness.onset_chance.abs() < f64::EPSILON);
        assert!((cfg.sickness.risk_threshold - 50.0).abs() < f64::EPSILON);
        assert_eq!(cfg.actions.wage_max, 40);
        assert_eq!(cfg.actions.wage_min, 10);
        assert_eq!(cfg.actions.play.steps, 9);
    }
}
