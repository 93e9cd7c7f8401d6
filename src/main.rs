//! Ventilator Firmware: Main Entry Point
//!
//! Hexagonal architecture with a fixed-rate outer loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LogEventSink   NvsAdapter   Esp32Time       │
//! │  (Sensor+Relay)    (EventSink)    (Config)     (TimePort)      │
//! │  ButtonDriver                                                  │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  FanControl · Scheduler · Watchers                     │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::gpio::PinDriver;
use esp_idf_svc::hal::peripherals::Peripherals;
use log::{info, warn};

use ventilator::adapters::hardware::HardwareAdapter;
use ventilator::adapters::log_sink::LogEventSink;
use ventilator::adapters::nvs::NvsAdapter;
use ventilator::adapters::time::Esp32TimeAdapter;
use ventilator::app::ports::{ConfigPort, HumiditySensorPort, TimePort};
use ventilator::app::service::AppService;
use ventilator::config::SystemConfig;
use ventilator::drivers::button::ButtonDriver;
use ventilator::drivers::hw_init;
use ventilator::drivers::relay::{ActiveLevel, RelayDriver};
use ventilator::pins;
use ventilator::scheduler::PeriodicTimer;
use ventilator::sensors::humidity::HumiditySensor;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Ventilator v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Initialise hardware peripherals ────────────────────
    hw_init::init_peripherals()?;
    if let Err(e) = hw_init::init_isr_service() {
        log::error!("ISR service init failed: {}; button disabled", e);
    }
    let peripherals = Peripherals::take()?;
    let relay_pin = PinDriver::output(peripherals.pins.gpio3)?;
    let active = if pins::RELAY_ACTIVE_HIGH {
        ActiveLevel::High
    } else {
        ActiveLevel::Low
    };
    let relay = RelayDriver::new(relay_pin, active);
    let mut hw = HardwareAdapter::new(HumiditySensor::new(pins::HUMIDITY_ADC_GPIO), relay);
    let mut button = ButtonDriver::new(pins::BUTTON_GPIO);

    // ── 3. Load config from NVS (or defaults) ─────────────────
    let nvs = NvsAdapter::new()?;
    let config = match nvs.load() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("NVS config load failed ({}), using defaults", e);
            SystemConfig::default()
        }
    };

    // ── 4. Application core ───────────────────────────────────
    let clock = Esp32TimeAdapter::new();
    let mut log_sink = LogEventSink::new();
    let now = clock.now();
    let mut app = AppService::new(config.clone(), now);
    app.start(now, &mut hw, &mut log_sink);

    let mut sensor_timer = PeriodicTimer::new(config.sensor_read_interval(), now);

    info!("System ready. Entering main loop.");

    // ── 5. Main loop ──────────────────────────────────────────
    loop {
        let now = clock.now();

        // Reading first so a first-reading evaluation lands this tick.
        if sensor_timer.poll(now) {
            if let Some(rh) = hw.read_humidity() {
                app.on_humidity(rh, now, &mut hw, &mut log_sink);
            }
        }

        if let Some(gesture) = button.tick(clock.uptime_ms()) {
            info!("Button: {:?}", gesture);
            app.handle_command(gesture.command(), now, &mut log_sink);
        }

        app.tick(now, &mut hw, &mut log_sink);

        // Config auto-save (5s debounce after last change).
        app.auto_save_if_needed(now, &nvs);

        sensor_timer.set_interval(app.config().sensor_read_interval());
        FreeRtos::delay_ms(app.config().loop_interval_ms);
    }
}
