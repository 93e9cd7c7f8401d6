//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log to serial, publish over MQTT,
//! refresh a display, etc.

use crate::control::{ControlStatus, Mode};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Periodic telemetry snapshot.
    Telemetry(ControlStatus),

    /// The operator mode changed (by command or by force-mode expiry).
    ModeChanged { from: Mode, to: Mode },

    /// The relay was switched.
    FanStateChanged { running: bool },

    /// A runtime configuration update was rejected.
    ConfigRejected(&'static str),

    /// The application service has started (carries initial mode).
    Started(Mode),
}
