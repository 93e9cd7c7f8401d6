//! Fuzz target: stored config blob
//!
//! Feeds arbitrary bytes to the NVS adapter as if they had been read from
//! flash and verifies:
//! - No panics under arbitrary byte inputs
//! - A successful load always yields a config that passes validation
//!
//! cargo fuzz run fuzz_config_decode

#![no_main]

use libfuzzer_sys::fuzz_target;
use ventilator::adapters::nvs::NvsAdapter;
use ventilator::app::ports::ConfigPort;

fuzz_target!(|data: &[u8]| {
    let Ok(nvs) = NvsAdapter::new() else {
        return;
    };
    nvs.sim_put_raw(data);
    if let Ok(cfg) = nvs.load() {
        assert!(cfg.validate().is_ok(), "load() returned an invalid config");
    }
});
