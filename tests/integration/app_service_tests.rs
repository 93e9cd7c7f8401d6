//! AppService command handling, reporting and telemetry against mocks.

use std::time::Duration;

use ventilator::adapters::log_sink::LogEventSink;
use ventilator::app::commands::AppCommand;
use ventilator::app::events::AppEvent;
use ventilator::app::ports::{EventSink, HumiditySensorPort, RelayPort};
use ventilator::config::SystemConfig;
use ventilator::control::Mode;
use ventilator::scheduler::PeriodicTimer;

use crate::mock_hw::{Rig, ScriptedSensor};

fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

fn mins(m: u64) -> Duration {
    Duration::from_secs(m * 60)
}

#[test]
fn button_cycles_through_all_modes() {
    let mut rig = Rig::new(SystemConfig::default());
    let mut seen = Vec::new();
    for _ in 0..3 {
        let now = rig.now();
        rig.app.handle_command(AppCommand::CycleMode, now, &mut rig.sink);
        rig.step();
        seen.push((rig.app.mode(), rig.relay.is_energized()));
    }
    assert_eq!(
        seen,
        vec![(Mode::On, true), (Mode::Off, false), (Mode::Auto, false)]
    );
}

#[test]
fn long_press_returns_to_auto_before_timeout() {
    let mut rig = Rig::new(SystemConfig::default());
    let now = rig.now();
    rig.app
        .handle_command(AppCommand::SetMode(Mode::Off), now, &mut rig.sink);
    rig.run_for(mins(3));

    let now = rig.now();
    rig.app
        .handle_command(AppCommand::SetMode(Mode::Auto), now, &mut rig.sink);
    rig.step();
    assert_eq!(rig.app.mode(), Mode::Auto);
    assert_eq!(rig.app.status(rig.now()).force_remaining_secs, None);
}

#[test]
fn fan_state_reported_once_per_change() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.humidity(80.0);
    rig.run_for(mins(5));
    assert_eq!(rig.sink.fan_changes(), vec![true]);
}

#[test]
fn telemetry_every_interval() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.run_for(mins(3));
    assert_eq!(rig.sink.telemetry_count(), 3);
}

#[test]
fn status_reports_forced_countdown() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.humidity(58.5);
    let now = rig.now();
    rig.app
        .handle_command(AppCommand::SetMode(Mode::On), now, &mut rig.sink);
    rig.run_for(mins(4));

    let status = rig.app.status(rig.now());
    assert_eq!(status.mode, Mode::On);
    assert_eq!(status.mode_age_secs, 240);
    assert_eq!(status.force_remaining_secs, Some(660));
    assert!(status.fan_running);
    assert_eq!(status.humidity, Some(58.5));
    assert_eq!(status.humidity_age_secs, 240);

    let json = status.to_json();
    assert!(json.contains("\"mode\":\"on\""));
    assert!(json.contains("\"force_remaining_secs\":660"));
}

#[test]
fn process_interval_update_applies_immediately() {
    let mut cfg = SystemConfig::default();
    cfg.process_interval_ms = 10_000;
    let mut rig = Rig::new(SystemConfig::default());
    let now = rig.now();
    rig.app
        .handle_command(AppCommand::UpdateConfig(cfg), now, &mut rig.sink);

    rig.run_for(secs(60));
    assert_eq!(rig.relay.writes.len(), 1 + 6);
}

#[test]
fn raised_target_stops_running_fan_at_next_evaluation() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.humidity(68.0);
    assert!(rig.relay.is_energized());
    rig.run_for(mins(25));
    assert!(rig.relay.is_energized());

    let mut cfg = rig.app.current_config();
    cfg.control.target_humidity = 80.0;
    let now = rig.now();
    rig.app
        .handle_command(AppCommand::UpdateConfig(cfg), now, &mut rig.sink);
    rig.run_for(secs(5));
    assert!(!rig.relay.is_energized());
}

#[test]
fn sensor_loop_feeds_service_like_firmware() {
    let mut rig = Rig::new(SystemConfig::default());
    let mut sensor = ScriptedSensor::new([None, None, Some(70.0), Some(69.0)]);
    let mut sensor_timer = PeriodicTimer::new(rig.app.config().sensor_read_interval(), rig.now());

    for _ in 0..100 {
        let now = rig.clock_advance();
        if sensor_timer.poll(now) {
            if let Some(rh) = sensor.read_humidity() {
                rig.app.on_humidity(rh, now, &mut rig.relay, &mut rig.sink);
            }
        }
        rig.app.tick(now, &mut rig.relay, &mut rig.sink);
    }

    assert_eq!(rig.app.status(rig.now()).humidity, Some(69.0));
    assert_eq!(rig.sink.fan_changes(), vec![true]);
}

#[test]
fn log_sink_accepts_every_event() {
    let mut sink = LogEventSink::new();
    let rig = Rig::new(SystemConfig::default());
    let events = [
        AppEvent::Started(Mode::Auto),
        AppEvent::Telemetry(rig.app.status(rig.now())),
        AppEvent::ModeChanged {
            from: Mode::Auto,
            to: Mode::On,
        },
        AppEvent::FanStateChanged { running: true },
        AppEvent::ConfigRejected("hysteresis must be 0–100"),
    ];
    for e in &events {
        sink.emit(e);
    }
}
