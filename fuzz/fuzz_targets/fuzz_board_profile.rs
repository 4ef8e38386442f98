//! Fuzz target: `GeneratorConfig::from_json`
//!
//! Feeds arbitrary bytes to the board profile parser and checks that every
//! profile it accepts is one the firmware can run with.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - Accepted profiles pass `validate()` again
//! - Accepted profiles keep the overload scroll no slower than standard
//!
//! cargo fuzz run fuzz_board_profile

#![no_main]

use libfuzzer_sys::fuzz_target;
use naquadah::config::GeneratorConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };

    if let Ok(config) = GeneratorConfig::from_json(text) {
        assert!(config.validate().is_ok(), "accepted profile must validate");
        assert!(config.blue_light_overload_delay_ms <= config.blue_light_standard_delay_ms);
        assert!(config.battery_min_reading < config.battery_max_reading);
    }
});
