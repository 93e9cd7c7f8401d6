//! Fuzz target: AppService under arbitrary input sequences
//!
//! Each input byte pair is decoded into one step: a time advance plus a
//! mode command, a humidity sample (possibly invalid) or a plain tick.
//! Verifies:
//! - No panics
//! - The relay always mirrors the controller's commanded state
//! - A forced mode never outlives the force timeout by more than one
//!   process interval
//!
//! cargo fuzz run fuzz_process_sequence

#![no_main]

use std::time::{Duration, Instant};

use libfuzzer_sys::fuzz_target;
use ventilator::app::commands::AppCommand;
use ventilator::app::events::AppEvent;
use ventilator::app::ports::{EventSink, RelayPort};
use ventilator::app::service::AppService;
use ventilator::config::SystemConfig;
use ventilator::control::Mode;

#[derive(Default)]
struct Relay(bool);

impl RelayPort for Relay {
    fn set_relay(&mut self, energize: bool) {
        self.0 = energize;
    }

    fn is_energized(&self) -> bool {
        self.0
    }
}

struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let config = SystemConfig::default();
    let force_limit = config.control.force_timeout() + config.process_interval();
    let t0 = Instant::now();
    let mut now = t0;
    let mut relay = Relay::default();
    let mut sink = NullSink;
    let mut app = AppService::new(config, t0);
    app.start(now, &mut relay, &mut sink);

    for pair in data.chunks_exact(2) {
        let (op, arg) = (pair[0], pair[1]);
        now += Duration::from_millis(u64::from(op >> 2) * 100);

        match op & 0b11 {
            0 => {
                let mode = match arg % 3 {
                    0 => Mode::Off,
                    1 => Mode::On,
                    _ => Mode::Auto,
                };
                app.handle_command(AppCommand::SetMode(mode), now, &mut sink);
            }
            1 => {
                let rh = match arg {
                    250 => f32::NAN,
                    251 => f32::INFINITY,
                    252 => -1.0,
                    _ => f32::from(arg) / 2.0,
                };
                app.on_humidity(rh, now, &mut relay, &mut sink);
            }
            2 => app.handle_command(AppCommand::CycleMode, now, &mut sink),
            _ => {}
        }

        app.tick(now, &mut relay, &mut sink);

        assert_eq!(relay.is_energized(), app.is_fan_running());
        let status = app.status(now);
        if status.mode != Mode::Auto {
            assert!(Duration::from_secs(status.mode_age_secs) <= force_limit);
        }
    }
});
