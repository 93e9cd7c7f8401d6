//! System configuration parameters
//!
//! All tunable parameters for the ventilation controller.
//! Values can be overridden via NVS (non-volatile storage) or a runtime
//! `UpdateConfig` command.  The control engine only ever reads them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Humidity band and dwell-time settings consumed by every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlSettings {
    /// Target relative humidity (%RH, 0-100)
    pub target_humidity: f32,
    /// Width of the hysteresis band centred on the target (%RH)
    pub hysteresis: f32,
    /// How long a forced ON/OFF holds before reverting to automatic (minutes)
    pub force_timeout_mins: u16,
    /// Minimum run time once started automatically (minutes)
    pub min_auto_on_mins: u16,
    /// Maximum run time in automatic mode, 0 = unlimited (minutes)
    pub max_auto_on_mins: u16,
    /// Minimum rest time once stopped automatically (minutes)
    pub min_auto_off_mins: u16,
    /// Maximum rest time in automatic mode, 0 = unlimited (minutes)
    pub max_auto_off_mins: u16,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            target_humidity: 60.0,
            hysteresis: 10.0,
            force_timeout_mins: 15,
            min_auto_on_mins: 20,
            max_auto_on_mins: 0,
            min_auto_off_mins: 20,
            max_auto_off_mins: 0,
        }
    }
}

const fn minutes(m: u16) -> Duration {
    Duration::from_secs(m as u64 * 60)
}

impl ControlSettings {
    /// Humidity at or below which the air counts as dry.
    pub fn auto_off_humidity(&self) -> f32 {
        self.target_humidity - self.hysteresis / 2.0
    }

    /// Humidity strictly above which the air counts as wet.
    pub fn auto_on_humidity(&self) -> f32 {
        self.target_humidity + self.hysteresis / 2.0
    }

    pub fn force_timeout(&self) -> Duration {
        minutes(self.force_timeout_mins)
    }

    pub fn min_auto_on_time(&self) -> Duration {
        minutes(self.min_auto_on_mins)
    }

    /// `None` when no maximum is configured.
    pub fn max_auto_on_time(&self) -> Option<Duration> {
        (self.max_auto_on_mins > 0).then(|| minutes(self.max_auto_on_mins))
    }

    pub fn min_auto_off_time(&self) -> Duration {
        minutes(self.min_auto_off_mins)
    }

    /// `None` when no maximum is configured.
    pub fn max_auto_off_time(&self) -> Option<Duration> {
        (self.max_auto_off_mins > 0).then(|| minutes(self.max_auto_off_mins))
    }

    /// Range-check every field.  The engine never calls this; the config
    /// store and the `UpdateConfig` path do.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=100.0).contains(&self.target_humidity) {
            return Err(ConfigError::ValidationFailed(
                "target_humidity must be 0–100",
            ));
        }
        if !(0.0..=100.0).contains(&self.hysteresis) {
            return Err(ConfigError::ValidationFailed("hysteresis must be 0–100"));
        }
        if self.force_timeout_mins == 0 {
            return Err(ConfigError::ValidationFailed(
                "force_timeout_mins must be at least 1",
            ));
        }
        if self.max_auto_on_mins != 0 && self.max_auto_on_mins <= self.min_auto_on_mins {
            return Err(ConfigError::ValidationFailed(
                "max_auto_on_mins must exceed min_auto_on_mins",
            ));
        }
        if self.max_auto_off_mins != 0 && self.max_auto_off_mins <= self.min_auto_off_mins {
            return Err(ConfigError::ValidationFailed(
                "max_auto_off_mins must exceed min_auto_off_mins",
            ));
        }
        Ok(())
    }
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Control ---
    pub control: ControlSettings,

    // --- Timing ---
    /// Periodic re-evaluation interval (milliseconds)
    pub process_interval_ms: u32,
    /// Outer loop tick (milliseconds); the mode watcher samples at this rate
    pub loop_interval_ms: u32,
    /// Humidity sensor read interval (milliseconds)
    pub sensor_read_interval_ms: u32,
    /// Telemetry report interval (seconds)
    pub telemetry_interval_secs: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            control: ControlSettings::default(),

            // Timing
            process_interval_ms: 5000,     // 0.2 Hz
            loop_interval_ms: 100,         // 10 Hz
            sensor_read_interval_ms: 2000, // 0.5 Hz
            telemetry_interval_secs: 60,   // 1/min
        }
    }
}

impl SystemConfig {
    pub fn process_interval(&self) -> Duration {
        Duration::from_millis(self.process_interval_ms as u64)
    }

    pub fn loop_interval(&self) -> Duration {
        Duration::from_millis(self.loop_interval_ms as u64)
    }

    pub fn sensor_read_interval(&self) -> Duration {
        Duration::from_millis(self.sensor_read_interval_ms as u64)
    }

    pub fn telemetry_interval(&self) -> Duration {
        Duration::from_secs(self.telemetry_interval_secs as u64)
    }

    /// Validate every field; rejects rather than clamps.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.control.validate()?;
        if !(10..=1000).contains(&self.loop_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "loop_interval_ms must be 10–1000",
            ));
        }
        if !(1000..=60_000).contains(&self.process_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "process_interval_ms must be 1000–60000",
            ));
        }
        if self.process_interval_ms < self.loop_interval_ms {
            return Err(ConfigError::ValidationFailed(
                "process_interval_ms must not be shorter than loop_interval_ms",
            ));
        }
        if !(500..=60_000).contains(&self.sensor_read_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "sensor_read_interval_ms must be 500–60000",
            ));
        }
        if !(5..=3600).contains(&self.telemetry_interval_secs) {
            return Err(ConfigError::ValidationFailed(
                "telemetry_interval_secs must be 5–3600",
            ));
        }
        Ok(())
    }
}
