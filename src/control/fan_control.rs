//! Hysteresis fan controller.
//!
//! ```text
//!                 ┌──────────── force_timeout elapsed ───────────┐
//!                 │                                              ▼
//!   ┌─────┐   ┌───┴──┐                                      ┌────────┐
//!   │ OFF │   │  ON  │   operator may set any mode, any time │  AUTO  │
//!   └──┬──┘   └──────┘                                      └────────┘
//!      └──────────────── force_timeout elapsed ─────────────────▲
//! ```
//!
//! In `ON`/`OFF` the relay simply follows the mode.  In `AUTO` the relay
//! follows the humidity band, subject to minimum and maximum dwell times
//! measured from the last relay change.  [`FanControl::process`] is the
//! single place where the relay state is decided; it never fails and
//! never blocks.

use core::fmt;
use core::str::FromStr;
use std::time::{Duration, Instant};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::timed_value::TimedValue;
use crate::app::ports::RelayPort;
use crate::config::ControlSettings;

// ---------------------------------------------------------------------------
// Operator mode
// ---------------------------------------------------------------------------

/// Operator-facing target state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Off,
    On,
    Auto,
}

impl Mode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
            Self::Auto => "auto",
        }
    }

    /// Next mode in the push-button cycle: on → off → auto → on.
    pub const fn next(self) -> Self {
        match self {
            Self::On => Self::Off,
            Self::Off => Self::Auto,
            Self::Auto => Self::On,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a command payload names no known mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseModeError;

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected one of: on, off, auto")
    }
}

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("on") {
            Ok(Self::On)
        } else if s.eq_ignore_ascii_case("off") {
            Ok(Self::Off)
        } else if s.eq_ignore_ascii_case("auto") {
            Ok(Self::Auto)
        } else {
            Err(ParseModeError)
        }
    }
}

// ---------------------------------------------------------------------------
// Humidity band
// ---------------------------------------------------------------------------

/// Band edges derived from target and hysteresis.
///
/// Exactly at `auto_off` counts as dry; exactly at `auto_on` does not count
/// as wet.  An absent reading is neither.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HumidityBand {
    pub auto_off: f32,
    pub auto_on: f32,
}

impl HumidityBand {
    pub fn new(settings: &ControlSettings) -> Self {
        Self {
            auto_off: settings.auto_off_humidity(),
            auto_on: settings.auto_on_humidity(),
        }
    }

    pub fn is_wet(&self, humidity: Option<f32>) -> bool {
        humidity.is_some_and(|h| h > self.auto_on)
    }

    pub fn is_dry(&self, humidity: Option<f32>) -> bool {
        humidity.is_some_and(|h| h <= self.auto_off)
    }
}

/// Map a raw sensor value to a usable reading.
///
/// Non-finite values and values outside 0–100 %RH are treated as absent.
pub fn normalize_reading(raw: f32) -> Option<f32> {
    (raw.is_finite() && (0.0..=100.0).contains(&raw)).then_some(raw)
}

// ---------------------------------------------------------------------------
// Status snapshot
// ---------------------------------------------------------------------------

/// Read-only view of the controller for reporting collaborators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlStatus {
    pub mode: Mode,
    pub mode_age_secs: u64,
    /// Time left before a forced mode reverts to auto; `None` in auto.
    pub force_remaining_secs: Option<u64>,
    pub fan_running: bool,
    pub fan_state_age_secs: u64,
    pub humidity: Option<f32>,
    pub humidity_age_secs: u64,
    pub auto_on_humidity: f32,
    pub auto_off_humidity: f32,
}

impl ControlStatus {
    pub fn to_json(&self) -> String {
        // Serialising plain fields cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// FanControl
// ---------------------------------------------------------------------------

/// Owns the operator mode, the commanded relay state and the last reading.
#[derive(Debug, Clone)]
pub struct FanControl {
    mode: TimedValue<Mode>,
    fan_running: TimedValue<bool>,
    humidity: TimedValue<Option<f32>>,
}

impl FanControl {
    /// Start in `AUTO` with the fan stopped and no reading.
    pub fn new(now: Instant) -> Self {
        Self::with_state(Mode::Auto, false, now)
    }

    /// Start from an explicit mode and relay state (e.g. restored after reboot).
    pub fn with_state(mode: Mode, fan_running: bool, now: Instant) -> Self {
        Self {
            mode: TimedValue::new(mode, now),
            fan_running: TimedValue::new(fan_running, now),
            humidity: TimedValue::new(None, now),
        }
    }

    // ── Inputs ────────────────────────────────────────────────

    /// Apply an operator command.  Always restarts the mode clock, so
    /// re-sending the current forced mode re-arms its timeout.
    pub fn set_mode(&mut self, mode: Mode, now: Instant) {
        if mode != self.mode.get() {
            info!("Mode set to {}", mode);
        } else {
            debug!("Mode {} re-armed", mode);
        }
        self.mode.set(mode, now);
    }

    /// Advance to the next mode in the button cycle and return it.
    pub fn cycle_mode(&mut self, now: Instant) -> Mode {
        let next = self.mode.get().next();
        self.set_mode(next, now);
        next
    }

    /// Store a sensor value.  Returns `true` when the previously stored
    /// reading was absent and this one is valid.
    pub fn update_humidity(&mut self, raw: f32, now: Instant) -> bool {
        let was_unknown = self.humidity.get().is_none();
        let reading = normalize_reading(raw);
        if reading.is_none() {
            debug!("Discarding invalid humidity reading {}", raw);
        }
        self.humidity.set(reading, now);
        was_unknown && reading.is_some()
    }

    // ── Evaluation ────────────────────────────────────────────

    /// Decide the relay state and write it to `relay`.
    ///
    /// `respect_min_times` selects whether minimum dwell times may block a
    /// change on this evaluation.  Maximum dwell times always apply.
    /// Returns the commanded relay state.
    pub fn process(
        &mut self,
        respect_min_times: bool,
        now: Instant,
        settings: &ControlSettings,
        relay: &mut impl RelayPort,
    ) -> bool {
        let mode = self.mode.get();
        if mode != Mode::Auto {
            self.fan_running.set(mode == Mode::On, now);
            if self.mode.elapsed(now) >= settings.force_timeout() {
                info!(
                    "Forced {} expired after {} min, switching back to auto",
                    mode, settings.force_timeout_mins
                );
                self.mode.set(Mode::Auto, now);
            }
        }

        if self.mode.get() == Mode::Auto {
            self.evaluate_auto(respect_min_times, now, settings);
        }

        let running = self.fan_running.get();
        relay.set_relay(running);
        running
    }

    fn evaluate_auto(&mut self, respect_min_times: bool, now: Instant, settings: &ControlSettings) {
        let band = HumidityBand::new(settings);
        let humidity = self.humidity.get();
        let elapsed = self.fan_running.elapsed(now);

        debug!(
            "auto: humidity={:?} band={:.1}..{:.1} running={} for {}s (respect_min={})",
            humidity,
            band.auto_off,
            band.auto_on,
            self.fan_running.get(),
            elapsed.as_secs(),
            respect_min_times
        );

        if self.fan_running.get() {
            let min_ok = elapsed >= settings.min_auto_on_time();
            let max_ok = settings.max_auto_on_time().is_some_and(|max| elapsed >= max);
            if max_ok {
                self.switch_fan(false, now, "maximum run time reached");
            }
            if respect_min_times && !min_ok {
                return;
            }
            if band.is_dry(humidity) {
                self.switch_fan(false, now, "humidity dropped");
            }
        } else {
            let min_ok = elapsed >= settings.min_auto_off_time();
            let max_ok = settings.max_auto_off_time().is_some_and(|max| elapsed >= max);
            if max_ok {
                self.switch_fan(true, now, "maximum rest time reached");
            }
            if respect_min_times && !min_ok {
                return;
            }
            if band.is_wet(humidity) {
                self.switch_fan(true, now, "humidity raised");
            }
        }
    }

    fn switch_fan(&mut self, on: bool, now: Instant, reason: &str) {
        if self.fan_running.get() != on {
            info!("{}, {} fan", reason, if on { "starting" } else { "stopping" });
        }
        self.fan_running.set(on, now);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode.get()
    }

    pub fn mode_age(&self, now: Instant) -> Duration {
        self.mode.elapsed(now)
    }

    pub fn is_fan_running(&self) -> bool {
        self.fan_running.get()
    }

    pub fn fan_state_age(&self, now: Instant) -> Duration {
        self.fan_running.elapsed(now)
    }

    pub fn humidity(&self) -> Option<f32> {
        self.humidity.get()
    }

    pub fn humidity_age(&self, now: Instant) -> Duration {
        self.humidity.elapsed(now)
    }

    /// Snapshot for telemetry.  No side effects.
    pub fn status(&self, now: Instant, settings: &ControlSettings) -> ControlStatus {
        let band = HumidityBand::new(settings);
        let mode_age = self.mode.elapsed(now);
        let force_remaining_secs = (self.mode.get() != Mode::Auto)
            .then(|| settings.force_timeout().saturating_sub(mode_age).as_secs());

        ControlStatus {
            mode: self.mode.get(),
            mode_age_secs: mode_age.as_secs(),
            force_remaining_secs,
            fan_running: self.fan_running.get(),
            fan_state_age_secs: self.fan_running.elapsed(now).as_secs(),
            humidity: self.humidity.get(),
            humidity_age_secs: self.humidity.elapsed(now).as_secs(),
            auto_on_humidity: band.auto_on,
            auto_off_humidity: band.auto_off,
        }
    }
}
