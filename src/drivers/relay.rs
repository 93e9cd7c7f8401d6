//! Fan relay driver.
//!
//! Wraps any `embedded_hal` output pin.  On ESP-IDF this is a
//! `PinDriver<Output>` on [`pins::RELAY_GPIO`](crate::pins::RELAY_GPIO);
//! host tests pass an in-memory pin.
//!
//! The relay is written on every evaluation, so the pin is driven
//! unconditionally and only *transitions* are logged.

use embedded_hal::digital::OutputPin;
use log::{info, warn};

use crate::app::ports::RelayPort;
use crate::error::ActuatorError;

/// Which pin level closes the relay contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveLevel {
    High,
    Low,
}

pub struct RelayDriver<P> {
    pin: P,
    active: ActiveLevel,
    energized: bool,
}

impl<P: OutputPin> RelayDriver<P> {
    /// Take ownership of `pin` and drive it to the de-energised level.
    pub fn new(pin: P, active: ActiveLevel) -> Self {
        let mut relay = Self {
            pin,
            active,
            energized: true,
        };
        relay.set(false);
        relay
    }

    /// Drive the contact.  Pin errors are logged and the previous state is
    /// kept, so [`is_energized`](RelayPort::is_energized) reflects what the
    /// hardware last accepted.
    pub fn set(&mut self, energize: bool) {
        match self.write_pin(energize) {
            Ok(()) => {
                if energize != self.energized {
                    info!("Relay {}", if energize { "closed" } else { "open" });
                }
                self.energized = energize;
            }
            Err(e) => warn!("Relay write failed: {}", e),
        }
    }

    fn write_pin(&mut self, energize: bool) -> Result<(), ActuatorError> {
        let high = match self.active {
            ActiveLevel::High => energize,
            ActiveLevel::Low => !energize,
        };
        let res = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        res.map_err(|_| ActuatorError::GpioWriteFailed)
    }

    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> RelayPort for RelayDriver<P> {
    fn set_relay(&mut self, energize: bool) {
        self.set(energize);
    }

    fn is_energized(&self) -> bool {
        self.energized
    }
}
