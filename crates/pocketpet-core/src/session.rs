//! The owned simulation context for one pet.
//!
//! A [`PetSession`] holds the pet record together with everything that
//! mutates it over time: a timeline of scheduled effects (timed-action
//! increments, finalizers, decay ticks), the care configuration, a clock,
//! and a seeded RNG. Every mutation is followed by a resolve pass.
//!
//! The session is synchronous and single-owner. The async
//! [`crate::runner`] owns one and drives [`PetSession::advance`] from
//! timers; tests drive it directly with a [`crate::clock::ManualClock`].
//!
//! # Timed actions
//!
//! Starting a timed action bumps the activity generation and schedules its
//! increments and finalizer tagged with that generation. When an entry
//! fires it re-checks the live activity: if the generation moved on or the
//! pet's state no longer matches, the entry is dropped and every remaining
//! entry of that action is cancelled.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use pocketpet_care::{
    CareConfig, CareError, ResolveContext, ResolveReport, TimedEffectPlan, Transition,
};
use pocketpet_types::{ActionOutcome, ActivityStatus, PetAction, PetRecord, PetSnapshot};
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::clock::{Clock, DayCycle};
use crate::config::PocketPetConfig;

/// Shortest allowed decay period.
const MIN_DECAY_INTERVAL_SECS: i64 = 1;

/// Errors that can occur while driving a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Care logic failed.
    #[error("care error: {source}")]
    Care {
        /// The underlying care error.
        #[from]
        source: CareError,
    },

    /// A scheduled instant fell outside the representable range.
    #[error("cannot schedule {what}: time out of range")]
    Schedule {
        /// What was being scheduled.
        what: &'static str,
    },
}

/// Settings a session needs beyond the record itself.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Name given to a pet hatched by [`PetSession::reset`].
    pub pet_name: String,
    /// Care balance.
    pub care: CareConfig,
    /// Period of the decay tick.
    pub decay_interval: Duration,
}

impl SessionConfig {
    /// Build session settings from the top-level configuration.
    pub fn from_config(config: &PocketPetConfig) -> Self {
        Self {
            pet_name: config.pet.name.clone(),
            care: config.care.clone(),
            decay_interval: seconds(config.timing.decay_interval_secs),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from_config(&PocketPetConfig::default())
    }
}

/// Convert a configured second count to a [`Duration`], never below one
/// second.
fn seconds(secs: u64) -> Duration {
    let secs = i64::try_from(secs)
        .unwrap_or(i64::MAX)
        .max(MIN_DECAY_INTERVAL_SECS);
    Duration::try_seconds(secs).unwrap_or(Duration::MAX)
}

/// An entry on the session timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScheduledEvent {
    /// Increment `index` of the timed action with `generation`.
    ActivityStep { generation: u64, index: u32 },
    /// Finalizer of the timed action with `generation`.
    ActivityFinish { generation: u64 },
    /// Baseline decay.
    DecayTick,
}

impl ScheduledEvent {
    const fn generation(self) -> Option<u64> {
        match self {
            Self::ActivityStep { generation, .. } | Self::ActivityFinish { generation } => {
                Some(generation)
            }
            Self::DecayTick => None,
        }
    }
}

/// The timed action currently holding the pet's state.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Activity {
    generation: u64,
    plan: TimedEffectPlan,
    started_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
}

/// One pet, its timeline, and the means to advance it.
#[derive(Debug)]
pub struct PetSession {
    pet: PetRecord,
    config: SessionConfig,
    clock: Arc<dyn Clock>,
    rng: StdRng,
    day_cycle: DayCycle,
    /// Keyed by due instant, then insertion order.
    timeline: BTreeMap<(DateTime<Utc>, u64), ScheduledEvent>,
    next_seq: u64,
    generation: u64,
    activity: Option<Activity>,
    dirty: bool,
}

impl PetSession {
    /// Take ownership of `record` and start its timeline.
    ///
    /// A record saved mid-action (eating, playing, sleeping) has lost its
    /// timers, so its state is settled to idle before the first resolve.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Schedule`] if the first decay tick cannot
    /// be scheduled.
    pub fn new(
        mut record: PetRecord,
        config: SessionConfig,
        clock: Arc<dyn Clock>,
        rng: StdRng,
    ) -> Result<Self, SessionError> {
        let now = clock.now();
        if record.state.is_timed_activity() {
            info!(state = %record.state, "Settling interrupted activity to idle");
            record.state = pocketpet_types::PetState::Idle;
        }
        let mut session = Self {
            pet: record,
            config,
            clock,
            rng,
            day_cycle: DayCycle::new(now),
            timeline: BTreeMap::new(),
            next_seq: 0,
            generation: 0,
            activity: None,
            dirty: false,
        };
        session.schedule_decay_after(now)?;
        session.resolve_at(now);
        Ok(session)
    }

    /// The current record.
    pub const fn record(&self) -> &PetRecord {
        &self.pet
    }

    /// The session's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// When the next scheduled effect is due.
    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.timeline.keys().next().map(|(due, _)| *due)
    }

    /// Read model for UI collaborators.
    pub fn snapshot(&self) -> PetSnapshot {
        let now = self.clock.now();
        PetSnapshot {
            pet: self.pet.clone(),
            activity: self.activity.map(|a| ActivityStatus {
                state: a.plan.state,
                started_at: a.started_at,
                ends_at: a.ends_at,
            }),
            time_of_day: self.day_cycle.time_of_day(now),
            taken_at: now,
        }
    }

    /// Whether the record changed since the last call. Clears the flag.
    pub const fn take_dirty(&mut self) -> bool {
        let dirty = self.dirty;
        self.dirty = false;
        dirty
    }

    /// Perform a player action now.
    ///
    /// Due effects fire and a resolve pass runs first, so preconditions
    /// see current time-derived fields (age, loneliness, finished hospital
    /// stays and vacations). Rejected actions change nothing and are not
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the care logic or scheduling fails.
    pub fn perform(&mut self, action: PetAction) -> Result<ActionOutcome, SessionError> {
        let now = self.clock.now();
        self.advance_to(now)?;
        self.resolve_at(now);

        let state_before = self.pet.state;
        let result = pocketpet_care::perform(
            action,
            &mut self.pet,
            now,
            &self.config.care.actions,
            &mut self.rng,
        )?;
        if let ActionOutcome::Rejected { reason } = result.outcome {
            debug!(action = action.name(), reason = ?reason, "Action rejected");
            return Ok(result.outcome);
        }
        info!(action = action.name(), "Action applied");

        if let Some(plan) = result.plan {
            self.start_activity(plan, now)?;
        } else if self.pet.state != state_before {
            self.cancel_activity();
        }
        self.resolve_at(now);
        Ok(result.outcome)
    }

    /// Fire every effect due by the clock's current instant.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if rescheduling fails.
    pub fn advance(&mut self) -> Result<usize, SessionError> {
        let now = self.clock.now();
        self.advance_to(now)
    }

    /// Fire every effect due at or before `now`, in due order. Each effect
    /// is resolved at its own due instant. Returns how many fired.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if rescheduling fails.
    pub fn advance_to(&mut self, now: DateTime<Utc>) -> Result<usize, SessionError> {
        let mut fired: usize = 0;
        while let Some(entry) = self.timeline.first_entry() {
            let (due, _) = *entry.key();
            if due > now {
                break;
            }
            let event = entry.remove();
            self.fire(event, due, now)?;
            fired = fired.saturating_add(1);
        }
        Ok(fired)
    }

    /// Replace the pet with a freshly hatched one and drop every timer.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Schedule`] if the decay tick cannot be
    /// rescheduled.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        let now = self.clock.now();
        self.pet = pocketpet_care::hatch(&self.config.pet_name, now, &mut self.rng);
        self.timeline.clear();
        self.activity = None;
        self.generation = self.generation.wrapping_add(1);
        self.schedule_decay_after(now)?;
        self.resolve_at(now);
        info!(pet_type = ?self.pet.pet_type, "Pet reset");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn fire(
        &mut self,
        event: ScheduledEvent,
        due: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        match event {
            ScheduledEvent::DecayTick => {
                let applied = pocketpet_care::apply_decay_tick(&mut self.pet, &self.config.care.decay);
                debug!(applied, state = %self.pet.state, "Decay tick");
                self.resolve_at(due);
                let next = due
                    .checked_add_signed(self.config.decay_interval)
                    .ok_or(SessionError::Schedule { what: "decay tick" })?;
                if next >= now {
                    self.schedule(next, ScheduledEvent::DecayTick);
                } else {
                    // Missed ticks are coalesced into this one.
                    self.schedule_decay_after(now)?;
                }
            }
            ScheduledEvent::ActivityStep { generation, index } => {
                let Some(activity) = self.live_activity(generation) else {
                    self.drop_generation(generation);
                    return Ok(());
                };
                activity.plan.apply_step(&mut self.pet);
                debug!(state = %activity.plan.state, step = index, "Activity step");
                self.resolve_at(due);
            }
            ScheduledEvent::ActivityFinish { generation } => {
                let Some(activity) = self.live_activity(generation) else {
                    self.drop_generation(generation);
                    return Ok(());
                };
                activity.plan.apply_finish(&mut self.pet);
                self.activity = None;
                info!(state = %activity.plan.state, "Activity finished");
                self.resolve_at(due);
            }
        }
        Ok(())
    }

    /// The running activity if it still owns the pet under `generation`.
    fn live_activity(&self, generation: u64) -> Option<Activity> {
        self.activity
            .filter(|a| a.generation == generation && self.pet.state == a.plan.state)
    }

    fn start_activity(&mut self, plan: TimedEffectPlan, now: DateTime<Utc>) -> Result<(), SessionError> {
        self.cancel_activity();
        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;
        for index in 0..plan.steps {
            let due = plan.step_due(now, index)?;
            self.schedule(due, ScheduledEvent::ActivityStep { generation, index });
        }
        let ends_at = plan.finish_due(now)?;
        self.schedule(ends_at, ScheduledEvent::ActivityFinish { generation });
        self.activity = Some(Activity {
            generation,
            plan,
            started_at: now,
            ends_at,
        });
        debug!(state = %plan.state, generation, steps = plan.steps, "Activity started");
        Ok(())
    }

    fn cancel_activity(&mut self) {
        if let Some(activity) = self.activity.take() {
            self.drop_generation(activity.generation);
            info!(state = %activity.plan.state, "Activity interrupted");
        }
    }

    fn drop_generation(&mut self, generation: u64) {
        self.timeline
            .retain(|_, event| event.generation() != Some(generation));
        if self.activity.is_some_and(|a| a.generation == generation) {
            self.activity = None;
        }
    }

    fn schedule(&mut self, due: DateTime<Utc>, event: ScheduledEvent) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.timeline.insert((due, seq), event);
    }

    fn schedule_decay_after(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        let due = now
            .checked_add_signed(self.config.decay_interval)
            .ok_or(SessionError::Schedule { what: "decay tick" })?;
        self.schedule(due, ScheduledEvent::DecayTick);
        Ok(())
    }

    fn resolve_at(&mut self, at: DateTime<Utc>) {
        let ctx = ResolveContext {
            activity_in_progress: self.activity.is_some(),
        };
        let report = pocketpet_care::resolve(&mut self.pet, at, ctx, &self.config.care, &mut self.rng);
        log_transitions(&report);
        self.dirty |= report.dirty;

        // A forced state change (illness, exhaustion) ends the activity.
        if self.activity.is_some_and(|a| a.plan.state != self.pet.state) {
            self.cancel_activity();
        }
    }
}

fn log_transitions(report: &ResolveReport) {
    for transition in &report.transitions {
        match transition {
            Transition::Discharged => info!("Discharged from hospital"),
            Transition::ReturnedFromVacation { destination } => {
                info!(destination = %destination, "Returned from vacation");
            }
            Transition::Recovered => info!("Recovered from sickness"),
            Transition::FellSick { kind, severity } => {
                info!(kind = ?kind, severity, "Fell sick");
            }
            Transition::Evolved { stage } => info!(stage = ?stage, "Evolved"),
            Transition::StateChanged { from, to } => {
                debug!(from = %from, to = %to, "State changed");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use chrono::TimeZone;
    use pocketpet_types::{PetState, PetType};
    use rand::SeedableRng;

    use super::*;
    use crate::clock::ManualClock;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single().unwrap()
    }

    fn session_with(pet: PetRecord) -> (PetSession, ManualClock) {
        let clock = ManualClock::new(t0());
        let mut config = SessionConfig::default();
        config.care.sickness.onset_chance = 0.0;
        let session = PetSession::new(
            pet,
            config,
            Arc::new(clock.clone()),
            StdRng::seed_from_u64(11),
        )
        .unwrap();
        (session, clock)
    }

    #[test]
    fn decay_tick_fires_on_schedule() {
        let (mut session, clock) = session_with(PetRecord::new("Buddy", PetType::Cat, t0()));
        assert_eq!(session.next_due(), Some(t0() + Duration::seconds(30)));
        clock.advance(Duration::seconds(29)).unwrap();
        assert_eq!(session.advance().unwrap(), 0);
        clock.advance(Duration::seconds(1)).unwrap();
        assert_eq!(session.advance().unwrap(), 1);
        assert!((session.record().hunger - 78.0).abs() < 1e-9);
        assert_eq!(session.next_due(), Some(t0() + Duration::seconds(60)));
    }

    #[test]
    fn missed_decay_ticks_are_coalesced() {
        let (mut session, clock) = session_with(PetRecord::new("Buddy", PetType::Cat, t0()));
        clock.advance(Duration::seconds(300)).unwrap();
        assert_eq!(session.advance().unwrap(), 1);
        assert!((session.record().hunger - 78.0).abs() < 1e-9);
        assert_eq!(session.next_due(), Some(t0() + Duration::seconds(330)));
    }

    #[test]
    fn orphaned_activity_is_settled() {
        let mut pet = PetRecord::new("Buddy", PetType::Cat, t0());
        pet.state = PetState::Playing;
        let (session, _clock) = session_with(pet);
        assert_eq!(session.record().state, PetState::Idle);
        assert!(session.snapshot().activity.is_none());
    }

    #[test]
    fn take_dirty_clears_flag() {
        let (mut session, _clock) = session_with(PetRecord::new("Buddy", PetType::Cat, t0()));
        assert!(session.take_dirty());
        assert!(!session.take_dirty());
    }

    #[test]
    fn snapshot_reports_activity() {
        let mut pet = PetRecord::new("Buddy", PetType::Cat, t0());
        pet.hunger = 50.0;
        let (mut session, _clock) = session_with(pet);
        session.perform(PetAction::Feed).unwrap();
        let snapshot = session.snapshot();
        let activity = snapshot.activity.unwrap();
        assert_eq!(activity.state, PetState::Eating);
        assert_eq!(activity.ends_at, t0() + Duration::seconds(30));
    }

    #[test]
    fn reset_hatches_a_new_pet() {
        let mut pet = PetRecord::new("Old", PetType::Cat, t0());
        pet.money = 5;
        pet.hunger = 50.0;
        let (mut session, clock) = session_with(pet);
        session.perform(PetAction::Feed).unwrap();
        clock.advance(Duration::seconds(5)).unwrap();
        session.reset().unwrap();
        assert_eq!(session.record().name, "Buddy");
        assert_eq!(session.record().money, 100);
        assert_eq!(session.record().birth_time, t0() + Duration::seconds(5));
        assert!(session.snapshot().activity.is_none());
        assert_eq!(session.next_due(), Some(t0() + Duration::seconds(35)));
    }
}
