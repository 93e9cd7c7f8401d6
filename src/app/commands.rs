//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (push button,
//! serial console, MQTT command topic) that the
//! [`AppService`](super::service::AppService) interprets and acts upon.

use crate::config::SystemConfig;
use crate::control::Mode;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Operator override: force on, force off, or back to automatic.
    SetMode(Mode),

    /// Advance to the next mode (on → off → auto → on), bound to the button.
    CycleMode,

    /// Hot-reload configuration.  Rejected if it fails validation.
    UpdateConfig(SystemConfig),

    /// Persist the current config on the next auto-save check.
    SaveConfig,
}
