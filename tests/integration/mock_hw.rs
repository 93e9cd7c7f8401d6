//! Mock adapters for integration tests.
//!
//! Records every relay write and emitted event so tests can assert on the
//! full history without touching real GPIO registers.  Time is a manually
//! advanced clock; nothing here sleeps.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ventilator::app::events::AppEvent;
use ventilator::app::ports::{
    ConfigError, ConfigPort, EventSink, HumiditySensorPort, RelayPort, TimePort,
};
use ventilator::app::service::AppService;
use ventilator::config::SystemConfig;

// ── MockRelay ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockRelay {
    pub writes: Vec<bool>,
}

#[allow(dead_code)]
impl MockRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of on/off transitions in the write history.
    pub fn transitions(&self) -> usize {
        self.writes.windows(2).filter(|w| w[0] != w[1]).count()
    }
}

impl RelayPort for MockRelay {
    fn set_relay(&mut self, energize: bool) {
        self.writes.push(energize);
    }

    fn is_energized(&self) -> bool {
        self.writes.last().copied().unwrap_or(false)
    }
}

// ── Scripted humidity sensor ──────────────────────────────────

#[derive(Default)]
pub struct ScriptedSensor {
    samples: VecDeque<Option<f32>>,
}

#[allow(dead_code)]
impl ScriptedSensor {
    pub fn new(samples: impl IntoIterator<Item = Option<f32>>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
        }
    }
}

impl HumiditySensorPort for ScriptedSensor {
    fn read_humidity(&mut self) -> Option<f32> {
        self.samples.pop_front().flatten()
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fan_changes(&self) -> Vec<bool> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::FanStateChanged { running } => Some(*running),
                _ => None,
            })
            .collect()
    }

    pub fn mode_changes(&self) -> Vec<AppEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::ModeChanged { .. }))
            .cloned()
            .collect()
    }

    pub fn telemetry_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::Telemetry(_)))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── In-memory config store ────────────────────────────────────

#[derive(Default)]
pub struct MemConfigStore {
    pub stored: RefCell<Option<SystemConfig>>,
    pub saves: Cell<u32>,
    pub fail_writes: Cell<bool>,
}

#[allow(dead_code)]
impl MemConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigPort for MemConfigStore {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        Ok(self.stored.borrow().clone().unwrap_or_default())
    }

    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError> {
        config.validate()?;
        if self.fail_writes.get() {
            return Err(ConfigError::IoError);
        }
        *self.stored.borrow_mut() = Some(config.clone());
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

// ── Manual clock ──────────────────────────────────────────────

pub struct ManualClock {
    now: Cell<Instant>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Cell::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) -> Instant {
        self.now.set(self.now.get() + by);
        self.now.get()
    }
}

impl TimePort for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

// ── Harness ───────────────────────────────────────────────────

/// Service plus mocks, stepped in loop-tick increments.
pub struct Rig {
    pub app: AppService,
    pub relay: MockRelay,
    pub sink: RecordingSink,
    pub clock: ManualClock,
    pub loop_interval: Duration,
}

#[allow(dead_code)]
impl Rig {
    pub fn new(config: SystemConfig) -> Self {
        let clock = ManualClock::new();
        let loop_interval = config.loop_interval();
        let mut relay = MockRelay::new();
        let mut sink = RecordingSink::new();
        let mut app = AppService::new(config, clock.now());
        app.start(clock.now(), &mut relay, &mut sink);
        Self {
            app,
            relay,
            sink,
            clock,
            loop_interval,
        }
    }

    /// Advance the clock by one loop tick without running the service.
    pub fn clock_advance(&self) -> Instant {
        self.clock.advance(self.loop_interval)
    }

    /// Advance one loop tick and run the service.
    pub fn step(&mut self) {
        let now = self.clock_advance();
        self.app.tick(now, &mut self.relay, &mut self.sink);
    }

    /// Run loop ticks until `d` of simulated time has passed.
    pub fn run_for(&mut self, d: Duration) {
        let ticks = d.as_millis() / self.loop_interval.as_millis();
        for _ in 0..ticks {
            self.step();
        }
    }

    pub fn humidity(&mut self, rh: f32) {
        let now = self.clock.now();
        self.app
            .on_humidity(rh, now, &mut self.relay, &mut self.sink);
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }
}
