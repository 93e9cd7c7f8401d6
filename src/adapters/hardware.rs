//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the humidity sensor and the relay driver, exposing them through
//! [`HumiditySensorPort`] and [`RelayPort`].  This is the only module in
//! the system that touches actual hardware.  On non-espidf targets the
//! sensor reads a simulated ADC value and the relay drives whatever
//! `OutputPin` the caller supplies.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::ports::{HumiditySensorPort, RelayPort};
use crate::drivers::relay::RelayDriver;
use crate::error::SensorError;
use crate::sensors::humidity::HumiditySensor;

/// Consecutive sensor failures before a warning is logged.
const FAILURE_WARN_THRESHOLD: u32 = 5;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<P> {
    sensor: HumiditySensor,
    relay: RelayDriver<P>,
    consecutive_failures: u32,
}

impl<P: OutputPin> HardwareAdapter<P> {
    pub fn new(sensor: HumiditySensor, relay: RelayDriver<P>) -> Self {
        Self {
            sensor,
            relay,
            consecutive_failures: 0,
        }
    }

    pub fn sensor_mut(&mut self) -> &mut HumiditySensor {
        &mut self.sensor
    }
}

// ── HumiditySensorPort implementation ─────────────────────────

impl<P: OutputPin> HumiditySensorPort for HardwareAdapter<P> {
    fn read_humidity(&mut self) -> Option<f32> {
        match self.sensor.read() {
            Ok(reading) => {
                self.consecutive_failures = 0;
                Some(reading.avg_rh)
            }
            Err(SensorError::WarmingUp) => None,
            Err(e) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                if self.consecutive_failures == FAILURE_WARN_THRESHOLD {
                    warn!(
                        "Humidity sensor: {} consecutive failures ({})",
                        self.consecutive_failures, e
                    );
                }
                None
            }
        }
    }
}

// ── RelayPort implementation ──────────────────────────────────

impl<P: OutputPin> RelayPort for HardwareAdapter<P> {
    fn set_relay(&mut self, energize: bool) {
        self.relay.set(energize);
    }

    fn is_energized(&self) -> bool {
        self.relay.is_energized()
    }
}
