//! Re-evaluation trigger scheduling.
//!
//! Decides *when* [`FanControl::process`](crate::control::FanControl::process)
//! runs and with which policy.  Nothing here knows about humidity or relays.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Trigger Sources                          │
//! │                                                              │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────┐  │
//! │  │ Periodic timer │  │ Mode watcher   │  │ First reading  │  │
//! │  │ (every N secs) │  │ (every loop)   │  │ (sensor feed)  │  │
//! │  └───────┬────────┘  └───────┬────────┘  └───────┬────────┘  │
//! │          │ respect min       │ bypass min        │ bypass min│
//! │          ▼                   ▼                   ▼           │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │               FanControl::process()                    │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use std::time::{Duration, Instant};

use log::debug;

use crate::control::Mode;

// ═══════════════════════════════════════════════════════════════
//  Trigger kinds
// ═══════════════════════════════════════════════════════════════

/// Why an evaluation is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The operator mode changed since the last loop tick.
    ModeChanged,
    /// The fixed-interval safety net fired.
    Periodic,
    /// The first valid humidity reading arrived.
    FirstReading,
}

impl Trigger {
    /// Only the periodic safety net honours minimum dwell times.
    pub const fn respect_min_times(self) -> bool {
        matches!(self, Self::Periodic)
    }
}

// ═══════════════════════════════════════════════════════════════
//  Building blocks
// ═══════════════════════════════════════════════════════════════

/// Fixed-interval timer polled from the main loop.
#[derive(Debug, Clone)]
pub struct PeriodicTimer {
    interval: Duration,
    last_fire: Instant,
}

impl PeriodicTimer {
    /// First fire happens one `interval` after `now`.
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last_fire: now,
        }
    }

    /// Returns `true` (once) when at least `interval` has passed since the
    /// last fire.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_fire) >= self.interval {
            self.last_fire = now;
            true
        } else {
            false
        }
    }

    /// Change the interval without restarting the current period.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// Sample-and-compare change detector.
#[derive(Debug, Clone)]
pub struct Watch<T> {
    last: T,
}

impl<T: Copy + PartialEq> Watch<T> {
    pub fn new(initial: T) -> Self {
        Self { last: initial }
    }

    /// Returns the new value if it differs from the last observed one.
    pub fn poll(&mut self, current: T) -> Option<T> {
        if current == self.last {
            None
        } else {
            self.last = current;
            Some(current)
        }
    }

    pub fn last(&self) -> T {
        self.last
    }
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler
// ═══════════════════════════════════════════════════════════════

/// Combines the periodic timer and the mode watcher.
#[derive(Debug, Clone)]
pub struct Scheduler {
    periodic: PeriodicTimer,
    mode_watch: Watch<Mode>,
}

impl Scheduler {
    pub fn new(process_interval: Duration, initial_mode: Mode, now: Instant) -> Self {
        Self {
            periodic: PeriodicTimer::new(process_interval, now),
            mode_watch: Watch::new(initial_mode),
        }
    }

    /// Poll both triggers for one loop tick.
    ///
    /// A mode change is reported before a periodic fire so the operator's
    /// action is reflected first.
    pub fn due(&mut self, now: Instant, mode: Mode) -> impl Iterator<Item = Trigger> + use<> {
        let changed = self.mode_watch.poll(mode).map(|m| {
            debug!("Scheduler: mode changed to {}", m);
            Trigger::ModeChanged
        });
        let periodic = self.periodic.poll(now).then_some(Trigger::Periodic);
        [changed, periodic].into_iter().flatten()
    }

    /// Record a mode the caller has already evaluated, so the watcher does
    /// not report it again.
    pub fn observe_mode(&mut self, mode: Mode) {
        let _ = self.mode_watch.poll(mode);
    }

    pub fn set_process_interval(&mut self, interval: Duration) {
        self.periodic.set_interval(interval);
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
