//! Async runner that owns a [`PetSession`] and serializes every mutation.
//!
//! [`SessionRunner::start`] spawns two tasks:
//!
//! - **the session actor**, which receives commands over an `mpsc`
//!   channel, sleeps until the session's next due effect, and publishes a
//!   fresh [`PetSnapshot`] on a `watch` channel after every change;
//! - **the writer**, which persists the latest queued record through a
//!   [`PetSink`]. Queued saves are latest-wins: if the sink is slow, only
//!   the newest record is written.
//!
//! Callers interact through a cloneable [`SessionHandle`].
//! [`SessionHandle::stop`] performs a final save, waits for the writer to
//! drain, and returns a [`SessionSummary`].

use std::future::Future;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Utc};
use pocketpet_types::{ActionOutcome, PetAction, PetRecord, PetSnapshot};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::PocketPetConfig;
use crate::session::{PetSession, SessionError};

/// Pending commands before callers wait for the actor.
const COMMAND_BUFFER: usize = 32;

/// How long the actor sleeps when nothing is scheduled.
const IDLE_WAKE: StdDuration = StdDuration::from_secs(60);

/// Errors returned to callers of a [`SessionHandle`].
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The session failed while handling the command.
    #[error("session error: {source}")]
    Session {
        /// The underlying session error.
        #[from]
        source: SessionError,
    },

    /// The runner has stopped and no longer accepts commands.
    #[error("session runner is not running")]
    Closed,
}

/// Destination for persisted records.
pub trait PetSink: Send + Sync + 'static {
    /// Error reported by a failed save. Failures are logged, never raised.
    type Error: std::fmt::Display + Send;

    /// Persist `record` as of `saved_at`.
    fn save(
        &self,
        record: &PetRecord,
        saved_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Runner tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerOptions {
    /// Period of the unconditional autosave.
    pub autosave_interval: StdDuration,
}

impl RunnerOptions {
    /// Build runner options from the top-level configuration.
    pub const fn from_config(config: &PocketPetConfig) -> Self {
        let secs = if config.timing.autosave_interval_secs == 0 {
            1
        } else {
            config.timing.autosave_interval_secs
        };
        Self {
            autosave_interval: StdDuration::from_secs(secs),
        }
    }
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self::from_config(&PocketPetConfig::default())
    }
}

/// Reply to an accepted [`SessionHandle::perform`].
#[derive(Debug, Clone)]
pub struct ActionReply {
    /// Whether the action applied or why it was refused.
    pub outcome: ActionOutcome,
    /// The pet right after the action resolved.
    pub snapshot: PetSnapshot,
}

/// What the runner did over its lifetime.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    /// The record at shutdown.
    pub pet: PetRecord,
    /// Actions that applied.
    pub actions_applied: u64,
    /// Actions that were rejected.
    pub actions_rejected: u64,
    /// Scheduled effects that fired (steps, finalizers, decay ticks).
    pub effects_fired: u64,
    /// Successful saves, including the final one.
    pub saves: u64,
}

#[derive(Debug)]
enum Command {
    Perform {
        action: PetAction,
        reply: oneshot::Sender<Result<ActionReply, RunnerError>>,
    },
    Reset {
        reply: oneshot::Sender<Result<PetSnapshot, RunnerError>>,
    },
    Stop {
        reply: oneshot::Sender<SessionSummary>,
    },
}

#[derive(Debug, Clone)]
struct PendingSave {
    record: PetRecord,
    at: DateTime<Utc>,
}

/// Spawns the session actor and its writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionRunner {
    options: RunnerOptions,
}

impl SessionRunner {
    /// A runner with the given options.
    pub const fn new(options: RunnerOptions) -> Self {
        Self { options }
    }

    /// Move `session` into a spawned actor and return a handle to it.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start<S: PetSink>(self, session: PetSession, sink: S) -> SessionHandle {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(session.snapshot());
        let (save_tx, save_rx) = watch::channel(None);

        let writer = tokio::spawn(write_saves(sink, save_rx));
        let actor = SessionActor {
            session,
            snapshots: snapshot_tx,
            saves: save_tx,
            counters: Counters::default(),
        };
        tokio::spawn(actor.run(command_rx, writer, self.options));

        info!(
            autosave_secs = self.options.autosave_interval.as_secs(),
            "Session runner started"
        );
        SessionHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
        }
    }
}

/// Cloneable handle to a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<PetSnapshot>,
}

impl SessionHandle {
    /// Perform a player action.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Closed`] if the runner has stopped, or
    /// [`RunnerError::Session`] if the session failed.
    pub async fn perform(&self, action: PetAction) -> Result<ActionReply, RunnerError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Perform { action, reply }).await?;
        rx.await.map_err(|_closed| RunnerError::Closed)?
    }

    /// Replace the pet with a freshly hatched one.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Closed`] if the runner has stopped, or
    /// [`RunnerError::Session`] if the session failed.
    pub async fn reset(&self) -> Result<PetSnapshot, RunnerError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Reset { reply }).await?;
        rx.await.map_err(|_closed| RunnerError::Closed)?
    }

    /// Stop the runner: final save, drain the writer, report.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Closed`] if the runner already stopped.
    pub async fn stop(&self) -> Result<SessionSummary, RunnerError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Stop { reply }).await?;
        rx.await.map_err(|_closed| RunnerError::Closed)
    }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> PetSnapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver that is notified on every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<PetSnapshot> {
        self.snapshots.clone()
    }

    async fn send(&self, command: Command) -> Result<(), RunnerError> {
        self.commands
            .send(command)
            .await
            .map_err(|_closed| RunnerError::Closed)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Counters {
    applied: u64,
    rejected: u64,
    fired: u64,
}

struct SessionActor {
    session: PetSession,
    snapshots: watch::Sender<PetSnapshot>,
    saves: watch::Sender<Option<PendingSave>>,
    counters: Counters,
}

impl SessionActor {
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        writer: JoinHandle<u64>,
        options: RunnerOptions,
    ) {
        let start = Instant::now()
            .checked_add(options.autosave_interval)
            .unwrap_or_else(Instant::now);
        let mut autosave = tokio::time::interval_at(start, options.autosave_interval);
        autosave.set_missed_tick_behavior(MissedTickBehavior::Delay);

        self.publish();

        let stop_reply = loop {
            let wake = self.wake_at();
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Perform { action, reply }) => {
                        let result = self.perform(action);
                        if reply.send(result).is_err() {
                            debug!(action = action.name(), "Caller dropped before reply");
                        }
                    }
                    Some(Command::Reset { reply }) => {
                        let result = self.reset();
                        if reply.send(result).is_err() {
                            debug!("Caller dropped before reset reply");
                        }
                    }
                    Some(Command::Stop { reply }) => break Some(reply),
                    None => break None,
                },
                () = tokio::time::sleep_until(wake) => self.advance(),
                _ = autosave.tick() => {
                    debug!("Autosave");
                    self.queue_save();
                }
            }
        };

        // Final save, then let the writer drain and exit.
        if let Err(err) = self.session.advance() {
            warn!(error = %err, "Final advance failed");
        }
        self.queue_save();
        let Self {
            session,
            saves,
            counters,
            ..
        } = self;
        drop(saves);
        let saved = match writer.await {
            Ok(saved) => saved,
            Err(err) => {
                warn!(error = %err, "Writer task failed");
                0
            }
        };

        let summary = SessionSummary {
            pet: session.record().clone(),
            actions_applied: counters.applied,
            actions_rejected: counters.rejected,
            effects_fired: counters.fired,
            saves: saved,
        };
        info!(
            applied = summary.actions_applied,
            rejected = summary.actions_rejected,
            effects = summary.effects_fired,
            saves = summary.saves,
            "Session runner stopped"
        );
        if let Some(reply) = stop_reply {
            if reply.send(summary).is_err() {
                debug!("Caller dropped before stop reply");
            }
        }
    }

    fn perform(&mut self, action: PetAction) -> Result<ActionReply, RunnerError> {
        let outcome = self.session.perform(action)?;
        if outcome.is_applied() {
            self.counters.applied = self.counters.applied.saturating_add(1);
        } else {
            self.counters.rejected = self.counters.rejected.saturating_add(1);
        }
        self.publish();
        Ok(ActionReply {
            outcome,
            snapshot: self.snapshots.borrow().clone(),
        })
    }

    fn reset(&mut self) -> Result<PetSnapshot, RunnerError> {
        self.session.reset()?;
        self.publish();
        Ok(self.snapshots.borrow().clone())
    }

    fn advance(&mut self) {
        match self.session.advance() {
            Ok(fired) => {
                let fired = u64::try_from(fired).unwrap_or(u64::MAX);
                self.counters.fired = self.counters.fired.saturating_add(fired);
            }
            Err(err) => warn!(error = %err, "Failed to advance session"),
        }
        self.publish();
    }

    /// Publish a snapshot and queue a save if the record changed.
    fn publish(&mut self) {
        self.snapshots.send_replace(self.session.snapshot());
        if self.session.take_dirty() {
            self.queue_save();
        }
    }

    fn queue_save(&self) {
        self.saves.send_replace(Some(PendingSave {
            record: self.session.record().clone(),
            at: self.session.now(),
        }));
    }

    /// Real instant at which the next scheduled effect falls due.
    fn wake_at(&self) -> Instant {
        let now = Instant::now();
        let wait = self.session.next_due().map_or(IDLE_WAKE, |due| {
            due.signed_duration_since(self.session.now())
                .to_std()
                .unwrap_or(StdDuration::ZERO)
        });
        now.checked_add(wait)
            .or_else(|| now.checked_add(IDLE_WAKE))
            .unwrap_or(now)
    }
}

/// Persist queued records until the actor drops its sender.
async fn write_saves<S: PetSink>(sink: S, mut pending: watch::Receiver<Option<PendingSave>>) -> u64 {
    let mut saved: u64 = 0;
    while pending.changed().await.is_ok() {
        let Some(save) = pending.borrow_and_update().clone() else {
            continue;
        };
        match sink.save(&save.record, save.at).await {
            Ok(()) => {
                saved = saved.saturating_add(1);
                debug!(state = %save.record.state, "Pet saved");
            }
            Err(err) => warn!(error = %err, "Failed to save pet"),
        }
    }
    saved
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::convert::Infallible;
    use std::sync::{Arc, Mutex};

    use chrono::TimeZone;
    use pocketpet_types::{PetState, PetType, RejectionReason};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::clock::ManualClock;
    use crate::session::SessionConfig;

    #[derive(Debug, Clone, Default)]
    struct RecordingSink {
        saved: Arc<Mutex<Vec<PetRecord>>>,
    }

    impl PetSink for RecordingSink {
        type Error = Infallible;

        async fn save(&self, record: &PetRecord, _saved_at: DateTime<Utc>) -> Result<(), Infallible> {
            self.saved.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    fn start(pet: PetRecord) -> (SessionHandle, RecordingSink) {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single().unwrap();
        let clock = ManualClock::new(t0);
        let mut config = SessionConfig::default();
        config.care.sickness.onset_chance = 0.0;
        let session =
            PetSession::new(pet, config, Arc::new(clock), StdRng::seed_from_u64(9)).unwrap();
        let sink = RecordingSink::default();
        let handle = SessionRunner::default().start(session, sink.clone());
        (handle, sink)
    }

    fn hungry_pet() -> PetRecord {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single().unwrap();
        let mut pet = PetRecord::new("Buddy", PetType::Rabbit, t0);
        pet.hunger = 40.0;
        pet
    }

    #[tokio::test]
    async fn perform_publishes_snapshot() {
        let (handle, _sink) = start(hungry_pet());
        let mut updates = handle.subscribe();

        let reply = handle.perform(PetAction::Feed).await.unwrap();
        assert_eq!(reply.outcome, ActionOutcome::Applied);
        assert_eq!(reply.snapshot.pet.state, PetState::Eating);
        assert!(reply.snapshot.activity.is_some());

        updates.changed().await.unwrap();
        assert_eq!(updates.borrow_and_update().pet.state, PetState::Eating);
        assert_eq!(handle.snapshot().pet.state, PetState::Eating);
        handle.stop().await.unwrap();
    }

    #[tokio::test]
    async fn stop_saves_and_summarizes() {
        let (handle, sink) = start(hungry_pet());
        handle.perform(PetAction::Feed).await.unwrap();
        let reply = handle.perform(PetAction::Heal).await.unwrap();
        assert_eq!(
            reply.outcome,
            ActionOutcome::Rejected {
                reason: RejectionReason::AlreadyHealthy
            }
        );

        let summary = handle.stop().await.unwrap();
        assert_eq!(summary.actions_applied, 1);
        assert_eq!(summary.actions_rejected, 1);
        assert!(summary.saves >= 1);

        let saved = sink.saved.lock().unwrap();
        assert_eq!(saved.last().unwrap(), &summary.pet);
        assert_eq!(summary.pet.state, PetState::Eating);
    }

    #[tokio::test]
    async fn reset_replaces_pet() {
        let mut pet = hungry_pet();
        pet.money = 3;
        let (handle, _sink) = start(pet);
        let snapshot = handle.reset().await.unwrap();
        assert_eq!(snapshot.pet.money, 100);
        assert!((snapshot.pet.hunger - 80.0).abs() < f64::EPSILON);
        handle.stop().await.unwrap();
    }

    #[tokio::test]
    async fn commands_after_stop_are_refused() {
        let (handle, _sink) = start(hungry_pet());
        handle.stop().await.unwrap();
        assert!(matches!(
            handle.perform(PetAction::Feed).await,
            Err(RunnerError::Closed)
        ));
        assert!(matches!(handle.stop().await, Err(RunnerError::Closed)));
    }
}
