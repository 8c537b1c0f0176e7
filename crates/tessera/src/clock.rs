//! Wall-clock sources and deadlines.
//!
//! Layout is cooperative: long-running loops poll a [`Deadline`] at iteration
//! block boundaries and stop once it has passed. The time source behind a
//! deadline is a [`Clock`], so tests can substitute a [`ManualClock`] and get
//! deterministic budget behavior.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};

/// A source of the current instant.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

/// The real monotonic clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A controllable clock for tests.
///
/// Time only moves when [`ManualClock::advance`] is called, or by a fixed
/// step on every reading when created with [`ManualClock::with_auto_advance`].
///
/// # Examples
///
/// ```
/// # use std::time::Duration;
/// # use tessera::clock::{Clock, ManualClock};
/// let clock = ManualClock::new();
/// let start = clock.now();
/// clock.advance(Duration::from_millis(25));
/// assert_eq!(clock.now() - start, Duration::from_millis(25));
/// ```
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset_nanos: AtomicU64,
    step_nanos: u64,
}

impl ManualClock {
    /// Creates a clock frozen at the current instant.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_nanos: AtomicU64::new(0),
            step_nanos: 0,
        }
    }

    /// Creates a clock that moves forward by `step` after every reading.
    pub fn with_auto_advance(step: Duration) -> Self {
        Self {
            step_nanos: duration_nanos(step),
            ..Self::new()
        }
    }

    /// Moves the clock forward by `duration`.
    pub fn advance(&self, duration: Duration) {
        self.offset_nanos
            .fetch_add(duration_nanos(duration), Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = self.offset_nanos.fetch_add(self.step_nanos, Ordering::SeqCst);
        self.origin + Duration::from_nanos(offset)
    }
}

fn duration_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

/// A point in time after which cooperative work should stop.
#[derive(Clone, Copy)]
pub struct Deadline<'a> {
    clock: &'a dyn Clock,
    at: Option<Instant>,
}

impl<'a> Deadline<'a> {
    /// Creates a deadline `budget` from now.
    pub fn after(clock: &'a dyn Clock, budget: Duration) -> Self {
        let at = clock.now().checked_add(budget);
        Self { clock, at }
    }

    /// Creates a deadline that never expires.
    pub fn unbounded(clock: &'a dyn Clock) -> Self {
        Self { clock, at: None }
    }

    /// Returns true once the deadline has passed.
    pub fn expired(&self) -> bool {
        self.at.is_some_and(|at| self.clock.now() >= at)
    }

    /// Returns the time left, or `None` for an unbounded deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.at
            .map(|at| at.saturating_duration_since(self.clock.now()))
    }

    /// Returns the clock this deadline is measured against.
    pub fn clock(&self) -> &'a dyn Clock {
        self.clock
    }
}

impl std::fmt::Debug for Deadline<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deadline").field("at", &self.at).finish()
    }
}
