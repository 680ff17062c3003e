//! Time sources and the in-game day/night cycle.
//!
//! The session never calls `Utc::now()` directly: it asks a [`Clock`].
//! [`SystemClock`] reads the wall clock; [`ManualClock`] is advanced by hand
//! so tests can step through a 180-second nap without waiting for it.
//!
//! # Design Principles
//!
//! - All time arithmetic is checked (no silent overflow).
//! - Day/night is derived from elapsed real time, never stored.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Duration, Utc};
use pocketpet_types::TimeOfDay;

/// Game minutes in one full day/night cycle.
pub const GAME_MINUTES_PER_DAY: u64 = 24;

/// Game minute at which night begins.
pub const NIGHT_STARTS_AT: u64 = 18;

/// Game minute at which night ends.
pub const NIGHT_ENDS_AT: u64 = 6;

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// The clock would move outside the representable range.
    #[error("clock overflow: cannot advance by {by}")]
    Overflow {
        /// The requested step.
        by: Duration,
    },
}

/// A source of "now".
pub trait Clock: Send + Sync + fmt::Debug {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same instant, so a test can keep one handle and give
/// another to the session.
#[derive(Debug, Clone)]
pub struct ManualClock {
    millis: Arc<AtomicI64>,
}

impl ManualClock {
    /// A manual clock frozen at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(start.timestamp_millis())),
        }
    }

    /// Move the clock forward (or backward, for a negative step).
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::Overflow`] if the new instant is out of range.
    pub fn advance(&self, by: Duration) -> Result<DateTime<Utc>, ClockError> {
        let step = by.num_milliseconds();
        let previous = self
            .millis
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |ms| {
                ms.checked_add(step)
                    .filter(|next| DateTime::from_timestamp_millis(*next).is_some())
            })
            .map_err(|_current| ClockError::Overflow { by })?;
        let next = previous.saturating_add(step);
        DateTime::from_timestamp_millis(next).ok_or(ClockError::Overflow { by })
    }

    /// Jump the clock to `at`.
    pub fn set(&self, at: DateTime<Utc>) {
        self.millis.store(at.timestamp_millis(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst)).unwrap_or_default()
    }
}

/// In-game day/night cycle: one game minute per real second, starting at
/// game minute 0 when the cycle starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCycle {
    started_at: DateTime<Utc>,
}

impl DayCycle {
    /// A cycle whose game minute 0 is `started_at`.
    pub const fn new(started_at: DateTime<Utc>) -> Self {
        Self { started_at }
    }

    /// Game minutes elapsed since the cycle started (0 before it starts).
    pub fn game_minutes(&self, now: DateTime<Utc>) -> u64 {
        u64::try_from(now.signed_duration_since(self.started_at).num_seconds()).unwrap_or(0)
    }

    /// Position within the current day, `0..24`.
    pub fn position(&self, now: DateTime<Utc>) -> u64 {
        self.game_minutes(now)
            .checked_rem(GAME_MINUTES_PER_DAY)
            .unwrap_or(0)
    }

    /// Day or night at `now`.
    pub fn time_of_day(&self, now: DateTime<Utc>) -> TimeOfDay {
        let position = self.position(now);
        if position >= NIGHT_STARTS_AT || position < NIGHT_ENDS_AT {
            TimeOfDay::Night
        } else {
            TimeOfDay::Day
        }
    }
}
