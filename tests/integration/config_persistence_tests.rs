//! Runtime config updates and debounced persistence.

use std::time::Duration;

use ventilator::app::commands::AppCommand;
use ventilator::app::events::AppEvent;
use ventilator::app::ports::ConfigPort;
use ventilator::config::SystemConfig;

use crate::mock_hw::{MemConfigStore, Rig};

fn millis(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

fn tweaked(target: f32) -> SystemConfig {
    let mut cfg = SystemConfig::default();
    cfg.control.target_humidity = target;
    cfg
}

#[test]
fn update_saved_after_quiet_period() {
    let store = MemConfigStore::new();
    let mut rig = Rig::new(SystemConfig::default());
    let now = rig.now();
    rig.app
        .handle_command(AppCommand::UpdateConfig(tweaked(55.0)), now, &mut rig.sink);
    assert!(rig.app.is_config_dirty());

    rig.run_for(millis(4_900));
    assert!(!rig.app.auto_save_if_needed(rig.now(), &store));

    rig.run_for(millis(100));
    assert!(rig.app.auto_save_if_needed(rig.now(), &store));
    assert!(!rig.app.is_config_dirty());
    assert_eq!(store.load().unwrap(), tweaked(55.0));
}

#[test]
fn each_change_restarts_quiet_period() {
    let store = MemConfigStore::new();
    let mut rig = Rig::new(SystemConfig::default());
    for target in [50.0, 52.0, 54.0] {
        let now = rig.now();
        rig.app
            .handle_command(AppCommand::UpdateConfig(tweaked(target)), now, &mut rig.sink);
        rig.run_for(millis(3_000));
        assert!(!rig.app.auto_save_if_needed(rig.now(), &store));
    }
    rig.run_for(millis(2_000));
    assert!(rig.app.auto_save_if_needed(rig.now(), &store));
    assert_eq!(store.saves.get(), 1);
    assert_eq!(store.load().unwrap(), tweaked(54.0));
}

#[test]
fn explicit_save_flushes_on_next_check() {
    let store = MemConfigStore::new();
    let mut rig = Rig::new(SystemConfig::default());
    let now = rig.now();
    rig.app
        .handle_command(AppCommand::SaveConfig, now, &mut rig.sink);
    assert!(rig.app.auto_save_if_needed(now, &store));
    assert_eq!(store.saves.get(), 1);
}

#[test]
fn failed_save_stays_dirty_and_retries() {
    let store = MemConfigStore::new();
    store.fail_writes.set(true);
    let mut rig = Rig::new(SystemConfig::default());
    let now = rig.now();
    rig.app
        .handle_command(AppCommand::UpdateConfig(tweaked(65.0)), now, &mut rig.sink);
    rig.run_for(millis(6_000));

    assert!(!rig.app.auto_save_if_needed(rig.now(), &store));
    assert!(rig.app.is_config_dirty());

    store.fail_writes.set(false);
    assert!(rig.app.auto_save_if_needed(rig.now(), &store));
}

#[test]
fn force_save_only_when_dirty() {
    let store = MemConfigStore::new();
    let mut rig = Rig::new(SystemConfig::default());
    rig.app.force_save_if_dirty(&store);
    assert_eq!(store.saves.get(), 0);

    let now = rig.now();
    rig.app
        .handle_command(AppCommand::UpdateConfig(tweaked(45.0)), now, &mut rig.sink);
    rig.app.force_save_if_dirty(&store);
    assert_eq!(store.saves.get(), 1);
    assert!(!rig.app.is_config_dirty());
}

#[test]
fn invalid_update_rejected_with_reason() {
    let mut rig = Rig::new(SystemConfig::default());
    let mut cfg = SystemConfig::default();
    cfg.control.min_auto_on_mins = 30;
    cfg.control.max_auto_on_mins = 10;

    let now = rig.now();
    rig.app
        .handle_command(AppCommand::UpdateConfig(cfg), now, &mut rig.sink);

    assert!(!rig.app.is_config_dirty());
    assert_eq!(rig.app.current_config(), SystemConfig::default());
    assert_eq!(
        rig.sink.events.last(),
        Some(&AppEvent::ConfigRejected(
            "max_auto_on_mins must exceed min_auto_on_mins"
        ))
    );
}
