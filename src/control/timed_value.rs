//! Value cell that remembers when it was last written.
//!
//! Every age-sensitive quantity in the controller (operator mode, relay
//! state, humidity reading) lives in a [`TimedValue`].  Time is passed in
//! explicitly by the caller, so the same code runs against the ESP32
//! monotonic timer on the device and against synthetic instants in tests.

use std::time::{Duration, Instant};

/// A value paired with the instant of its last write.
#[derive(Debug, Clone, Copy)]
pub struct TimedValue<T> {
    value: T,
    last_write: Instant,
}

impl<T: Copy> TimedValue<T> {
    /// Create a cell holding `value`, written at `now`.
    pub fn new(value: T, now: Instant) -> Self {
        Self {
            value,
            last_write: now,
        }
    }

    pub fn get(&self) -> T {
        self.value
    }

    /// Overwrite the value and restart the age clock.
    ///
    /// The clock restarts even when `value` equals the current value.
    pub fn set(&mut self, value: T, now: Instant) {
        self.value = value;
        self.last_write = now;
    }

    /// Time since the last write.  Saturates at zero if `now` precedes it.
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_write)
    }

    /// Instant of the last write.
    pub fn last_write(&self) -> Instant {
        self.last_write
    }
}
