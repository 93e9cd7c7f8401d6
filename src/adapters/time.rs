//! ESP32 time adapter.
//!
//! Provides monotonic time queries for the ventilator.
//!
//! - **`target_os = "espidf"`**: millisecond uptime comes from
//!   `esp_timer_get_time()`, the same counter the button ISR stamps.
//! - **`not(target_os = "espidf")`**: uses `std::time::Instant` for
//!   host-side testing and simulation.
//!
//! [`TimePort::now`] is `std::time::Instant` on both targets (ESP-IDF
//! backs it with the same high-resolution timer).

use std::time::Instant;

use crate::app::ports::TimePort;

/// Time adapter for the ESP32 platform.
pub struct Esp32TimeAdapter {
    #[cfg(not(target_os = "espidf"))]
    start: Instant,
}

impl Default for Esp32TimeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Esp32TimeAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: Instant::now(),
        }
    }

    /// Milliseconds since boot, truncated to `u32` (wraps after ~49 days).
    #[cfg(target_os = "espidf")]
    pub fn uptime_ms(&self) -> u32 {
        // SAFETY: esp_timer_get_time reads a free-running counter.
        ((unsafe { esp_idf_svc::sys::esp_timer_get_time() }) / 1_000) as u32
    }

    /// Milliseconds since boot, truncated to `u32` (wraps after ~49 days).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_ms(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }

    /// Seconds since boot (monotonic).
    pub fn uptime_secs(&self) -> u64 {
        u64::from(self.uptime_ms()) / 1_000
    }
}

impl TimePort for Esp32TimeAdapter {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
