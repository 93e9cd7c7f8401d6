//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the fan controller, the trigger scheduler and the
//! live configuration.  It exposes a clean, hardware-agnostic API.  All
//! I/O flows through port traits injected at call sites, and the current
//! time is always passed in, making the entire service testable with mock
//! adapters and synthetic clocks.
//!
//! ```text
//!  humidity ──▶ ┌────────────────────────┐ ──▶ EventSink
//!  commands ──▶ │       AppService        │
//!               │ FanControl · Scheduler  │ ──▶ RelayPort
//!               └────────────────────────┘
//! ```

use std::time::{Duration, Instant};

use log::{info, warn};

use crate::config::SystemConfig;
use crate::control::{ControlStatus, FanControl, Mode};
use crate::scheduler::{PeriodicTimer, Scheduler, Trigger, Watch};

use super::commands::AppCommand;
use super::events::AppEvent;
use super::ports::{ConfigPort, EventSink, RelayPort};

/// Quiet period after the last config change before it is persisted.
const AUTO_SAVE_DELAY: Duration = Duration::from_secs(5);

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    fan: FanControl,
    config: SystemConfig,
    scheduler: Scheduler,
    telemetry: PeriodicTimer,
    /// Report-side watchers; independent of the scheduler's mode watcher.
    fan_report: Watch<bool>,
    mode_report: Watch<Mode>,
    tick_count: u64,
    dirty_since: Option<Instant>,
    save_requested: bool,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch the relay; call [`start`](Self::start) next.
    pub fn new(config: SystemConfig, now: Instant) -> Self {
        let fan = FanControl::new(now);
        Self::with_controller(config, fan, now)
    }

    /// Construct around an existing controller (e.g. a restored mode).
    pub fn with_controller(config: SystemConfig, fan: FanControl, now: Instant) -> Self {
        let scheduler = Scheduler::new(config.process_interval(), fan.mode(), now);
        let telemetry = PeriodicTimer::new(config.telemetry_interval(), now);
        Self {
            fan_report: Watch::new(fan.is_fan_running()),
            mode_report: Watch::new(fan.mode()),
            fan,
            config,
            scheduler,
            telemetry,
            tick_count: 0,
            dirty_since: None,
            save_requested: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive the relay to a defined state and announce the start.
    pub fn start(&mut self, now: Instant, relay: &mut impl RelayPort, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started(self.fan.mode()));
        info!("AppService started in {} mode", self.fan.mode());
        self.evaluate(Trigger::ModeChanged, now, relay);
        self.scheduler.observe_mode(self.fan.mode());
        self.report_changes(sink);
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one outer-loop tick: mode watcher → periodic timer → reporting.
    pub fn tick(&mut self, now: Instant, relay: &mut impl RelayPort, sink: &mut impl EventSink) {
        self.tick_count += 1;

        for trigger in self.scheduler.due(now, self.fan.mode()) {
            self.evaluate(trigger, now, relay);
        }

        self.report_changes(sink);

        if self.telemetry.poll(now) {
            sink.emit(&AppEvent::Telemetry(self.status(now)));
        }
    }

    /// Feed a humidity sample from the sensor transport.
    ///
    /// The first valid sample after an absent reading is evaluated
    /// immediately instead of waiting for the periodic timer.
    pub fn on_humidity(
        &mut self,
        raw: f32,
        now: Instant,
        relay: &mut impl RelayPort,
        sink: &mut impl EventSink,
    ) {
        if self.fan.update_humidity(raw, now) {
            info!("First humidity reading {:.1}%, evaluating now", raw);
            self.evaluate(Trigger::FirstReading, now, relay);
            self.report_changes(sink);
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (button, serial, MQTT, etc.).
    ///
    /// Mode changes take effect on the next [`tick`](Self::tick), when the
    /// mode watcher notices them.
    pub fn handle_command(&mut self, cmd: AppCommand, now: Instant, sink: &mut impl EventSink) {
        match cmd {
            AppCommand::SetMode(mode) => self.fan.set_mode(mode, now),
            AppCommand::CycleMode => {
                let mode = self.fan.cycle_mode(now);
                info!("Button: cycled to {}", mode);
            }
            AppCommand::UpdateConfig(new_config) => {
                if let Err(e) = new_config.validate() {
                    warn!("Rejected config update: {}", e);
                    let reason = match e {
                        super::ports::ConfigError::ValidationFailed(msg) => msg,
                        _ => "invalid configuration",
                    };
                    sink.emit(&AppEvent::ConfigRejected(reason));
                    return;
                }
                self.scheduler
                    .set_process_interval(new_config.process_interval());
                self.telemetry
                    .set_interval(new_config.telemetry_interval());
                self.config = new_config;
                self.mark_config_dirty(now);
                info!("Configuration updated at runtime");
            }
            AppCommand::SaveConfig => {
                self.mark_config_dirty(now);
                self.save_requested = true;
                info!("Explicit config save requested (will flush on next auto-save check)");
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Read-only snapshot for telemetry collaborators.
    pub fn status(&self, now: Instant) -> ControlStatus {
        self.fan.status(now, &self.config.control)
    }

    pub fn mode(&self) -> Mode {
        self.fan.mode()
    }

    pub fn is_fan_running(&self) -> bool {
        self.fan.is_fan_running()
    }

    /// Total loop ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    /// Clone of the live configuration (for read-back or delta updates).
    pub fn current_config(&self) -> SystemConfig {
        self.config.clone()
    }

    // ── Internal ──────────────────────────────────────────────

    fn evaluate(&mut self, trigger: Trigger, now: Instant, relay: &mut impl RelayPort) {
        log::debug!("Evaluating ({:?})", trigger);
        self.fan.process(
            trigger.respect_min_times(),
            now,
            &self.config.control,
            relay,
        );
    }

    fn report_changes(&mut self, sink: &mut impl EventSink) {
        let from = self.mode_report.last();
        if let Some(to) = self.mode_report.poll(self.fan.mode()) {
            sink.emit(&AppEvent::ModeChanged { from, to });
        }
        if let Some(running) = self.fan_report.poll(self.fan.is_fan_running()) {
            sink.emit(&AppEvent::FanStateChanged { running });
        }
    }

    // ── Config dirty-flag management ──────────────────────────

    /// Mark the config as modified.  Restarts the auto-save delay.
    pub fn mark_config_dirty(&mut self, now: Instant) {
        self.dirty_since = Some(now);
    }

    /// Save if the config has been dirty for [`AUTO_SAVE_DELAY`], or
    /// immediately after an explicit `SaveConfig`.
    /// Returns `true` if the config was saved.
    pub fn auto_save_if_needed(&mut self, now: Instant, storage: &impl ConfigPort) -> bool {
        let Some(since) = self.dirty_since else {
            return false;
        };
        if !self.save_requested && now.saturating_duration_since(since) < AUTO_SAVE_DELAY {
            return false;
        }
        match storage.save(&self.config) {
            Ok(()) => {
                self.dirty_since = None;
                self.save_requested = false;
                info!("Config auto-saved to NVS");
                true
            }
            Err(e) => {
                warn!("Config auto-save failed: {}", e);
                false
            }
        }
    }

    /// Force-save if dirty (call before restart).
    pub fn force_save_if_dirty(&mut self, storage: &impl ConfigPort) {
        if self.dirty_since.is_none() {
            return;
        }
        match storage.save(&self.config) {
            Ok(()) => {
                self.dirty_since = None;
                self.save_requested = false;
                info!("Config force-saved before restart");
            }
            Err(e) => {
                warn!("Config force-save failed: {}", e);
            }
        }
    }

    /// Whether the config has unsaved changes.
    pub fn is_config_dirty(&self) -> bool {
        self.dirty_since.is_some()
    }
}
