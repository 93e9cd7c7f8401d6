//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC in production).  An MQTT adapter would
//! implement the same trait and publish `ControlStatus::to_json()`.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(s) => {
                info!(
                    "TELEM | mode={} ({}s) | fan={} ({}s) | RH={} ({}s ago) | band={:.1}..{:.1}",
                    s.mode,
                    s.mode_age_secs,
                    if s.fan_running { "ON" } else { "OFF" },
                    s.fan_state_age_secs,
                    s.humidity
                        .map_or_else(|| "--".to_string(), |h| format!("{:.1}%", h)),
                    s.humidity_age_secs,
                    s.auto_off_humidity,
                    s.auto_on_humidity,
                );
            }
            AppEvent::ModeChanged { from, to } => {
                info!("MODE  | {} -> {}", from, to);
            }
            AppEvent::FanStateChanged { running } => {
                info!("FAN   | {}", if *running { "ON" } else { "OFF" });
            }
            AppEvent::ConfigRejected(reason) => {
                info!("CONFIG| rejected: {}", reason);
            }
            AppEvent::Started(mode) => {
                info!("START | initial_mode={}", mode);
            }
        }
    }
}
