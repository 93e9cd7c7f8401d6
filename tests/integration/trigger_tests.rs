//! Trigger scheduling through `AppService`: periodic, mode-change and
//! first-reading evaluations, and how they interact with dwell times.

use std::time::Duration;

use ventilator::app::commands::AppCommand;
use ventilator::app::events::AppEvent;
use ventilator::app::ports::RelayPort;
use ventilator::config::SystemConfig;
use ventilator::control::Mode;

use crate::mock_hw::Rig;

fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

fn mins(m: u64) -> Duration {
    Duration::from_secs(m * 60)
}

#[test]
fn start_writes_relay_once() {
    let rig = Rig::new(SystemConfig::default());
    assert_eq!(rig.relay.writes, vec![false]);
    assert_eq!(rig.sink.events, vec![AppEvent::Started(Mode::Auto)]);
}

#[test]
fn periodic_evaluation_every_process_interval() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.run_for(secs(60));
    // start + one write per 5 s
    assert_eq!(rig.relay.writes.len(), 1 + 12);
}

#[test]
fn mode_change_evaluated_on_next_tick() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.run_for(secs(2));
    let writes_before = rig.relay.writes.len();

    let now = rig.now();
    rig.app
        .handle_command(AppCommand::SetMode(Mode::On), now, &mut rig.sink);
    assert!(!rig.relay.is_energized(), "commands never touch the relay");

    rig.step();
    assert_eq!(rig.relay.writes.len(), writes_before + 1);
    assert!(rig.relay.is_energized());
    assert_eq!(rig.sink.fan_changes(), vec![true]);
}

#[test]
fn mode_flipped_back_between_samples_is_not_seen() {
    let mut rig = Rig::new(SystemConfig::default());
    let now = rig.now();
    rig.app
        .handle_command(AppCommand::SetMode(Mode::On), now, &mut rig.sink);
    rig.app
        .handle_command(AppCommand::SetMode(Mode::Auto), now, &mut rig.sink);
    rig.step();
    assert_eq!(rig.relay.writes, vec![false]);
    assert!(rig.sink.mode_changes().is_empty());
}

#[test]
fn first_reading_bypasses_min_off() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.run_for(secs(1));

    rig.humidity(80.0);
    assert!(rig.relay.is_energized(), "first reading evaluated at once");

    // A second reading is just stored.
    let writes = rig.relay.writes.len();
    rig.humidity(90.0);
    assert_eq!(rig.relay.writes.len(), writes);
}

#[test]
fn periodic_honours_min_off_after_first_reading() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.humidity(40.0);
    assert!(!rig.relay.is_energized());

    // Wet air now, but min-off (20 min from start) still holds.
    rig.humidity(80.0);
    rig.run_for(mins(19));
    assert!(!rig.relay.is_energized());

    rig.run_for(mins(1));
    assert!(rig.relay.is_energized());
}

#[test]
fn invalid_reading_then_valid_is_a_first_reading() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.humidity(f32::NAN);
    assert_eq!(rig.relay.writes.len(), 1);
    rig.humidity(75.0);
    assert!(rig.relay.is_energized());
}

#[test]
fn force_revert_then_watcher_stops_fan_without_min_on() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.humidity(40.0);
    let now = rig.now();
    rig.app
        .handle_command(AppCommand::SetMode(Mode::On), now, &mut rig.sink);

    rig.run_for(mins(15));
    assert_eq!(rig.app.mode(), Mode::Auto);
    assert!(rig.relay.is_energized(), "revert tick respects min-on");

    rig.step();
    assert!(!rig.relay.is_energized(), "watcher tick skips min-on");
    assert_eq!(rig.sink.fan_changes(), vec![true, false]);
    assert_eq!(
        rig.sink.mode_changes(),
        vec![
            AppEvent::ModeChanged {
                from: Mode::Auto,
                to: Mode::On
            },
            AppEvent::ModeChanged {
                from: Mode::On,
                to: Mode::Auto
            },
        ]
    );
}
