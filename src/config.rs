//! Generator configuration parameters
//!
//! All tunable parameters for the generator prop.  Fixed at boot: the
//! firmware embeds a board profile (`config/generator.json`) and falls back
//! to [`GeneratorConfig::default`] when the profile is missing or invalid.
//! Pin assignments live in [`crate::pins`].

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fsm::modes::SpecialMode;

/// Verbosity of the debug log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebugLevel {
    /// Only warnings and errors.
    Off,
    /// State transitions, mode changes, startup.
    #[default]
    Standard,
    /// Everything, including per-poll readings and every scroll step.
    Verbose,
}

impl DebugLevel {
    /// Filter to hand to `log::set_max_level`.
    pub fn level_filter(self) -> LevelFilter {
        match self {
            Self::Off => LevelFilter::Warn,
            Self::Standard => LevelFilter::Info,
            Self::Verbose => LevelFilter::Debug,
        }
    }
}

/// Behaviour of the battery-meter activation button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeterButtonKind {
    /// Meter shows while the button is held.
    #[default]
    Momentary,
    /// Each press latches the meter on or off.
    Toggle,
}

/// Core generator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    // --- Blue-light scroll ---
    /// Step period of the blue scroll in the ON state (ms)
    pub blue_light_standard_delay_ms: u32,
    /// Step period while the overload input is held (ms)
    pub blue_light_overload_delay_ms: u32,
    /// Whether the dedicated overload input is fitted
    pub overload_input_enabled: bool,

    // --- Startup show ---
    /// Play the blocking light ramp at boot
    pub run_startup_sequence: bool,
    /// Delay between ramp steps (ms)
    pub startup_step_delay_ms: u32,
    /// Hold with all lights on, in ramp steps
    pub startup_hold_steps: u32,

    // --- Special modes ---
    /// Highest mode the cycle button reaches before wrapping to OFF
    pub max_special_mode: u8,

    // --- Charger key ---
    /// Pulse the power-bank keep-alive relay
    pub use_charger_key: bool,
    /// Time the relay stays released between pulses (ms)
    pub charger_idle_ms: u32,
    /// Time the relay stays pressed (ms)
    pub charger_pulse_ms: u32,
    /// Delay before the first pulse after boot (ms)
    pub startup_charger_delay_ms: u32,

    // --- Battery meter ---
    /// Raw reading of an empty battery (10-bit counts)
    pub battery_min_reading: u16,
    /// Raw reading of a full battery (10-bit counts)
    pub battery_max_reading: u16,
    /// Re-read interval while the meter is shown (ms)
    pub battery_refresh_ms: u32,
    /// Activation button behaviour
    pub meter_button: MeterButtonKind,

    // --- Inputs ---
    /// Button debounce window (ms)
    pub debounce_ms: u32,

    // --- Diagnostics / loop ---
    /// Log verbosity
    pub debug_level: DebugLevel,
    /// Poll loop period (ms)
    pub poll_interval_ms: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let standard = 130;
        Self {
            // Scroll
            blue_light_standard_delay_ms: standard,
            blue_light_overload_delay_ms: standard / 2,
            overload_input_enabled: true,

            // Startup show
            run_startup_sequence: true,
            startup_step_delay_ms: standard * 3 / 2,
            startup_hold_steps: 12,

            // Special modes
            max_special_mode: 5,

            // Charger key
            use_charger_key: true,
            charger_idle_ms: 10_000,
            charger_pulse_ms: 400,
            startup_charger_delay_ms: 400,

            // Battery meter
            battery_min_reading: 646,
            battery_max_reading: 865,
            battery_refresh_ms: 500,
            meter_button: MeterButtonKind::Momentary,

            // Inputs
            debounce_ms: 50,

            // Diagnostics / loop
            debug_level: DebugLevel::Standard,
            poll_interval_ms: 5,
        }
    }
}

impl GeneratorConfig {
    /// Reject values the generator cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.blue_light_standard_delay_ms == 0 {
            return Err(Error::Config("blue_light_standard_delay_ms must be non-zero"));
        }
        if self.blue_light_overload_delay_ms == 0 {
            return Err(Error::Config("blue_light_overload_delay_ms must be non-zero"));
        }
        if self.blue_light_overload_delay_ms > self.blue_light_standard_delay_ms {
            return Err(Error::Config(
                "overload scroll must not be slower than standard scroll",
            ));
        }
        if self.run_startup_sequence && self.startup_step_delay_ms == 0 {
            return Err(Error::Config("startup_step_delay_ms must be non-zero"));
        }
        if self.max_special_mode > SpecialMode::MAX {
            return Err(Error::Config("max_special_mode exceeds the last special mode"));
        }
        if self.use_charger_key && (self.charger_idle_ms == 0 || self.charger_pulse_ms == 0) {
            return Err(Error::Config("charger key timings must be non-zero"));
        }
        if self.battery_max_reading <= self.battery_min_reading {
            return Err(Error::Config("battery_max_reading must exceed battery_min_reading"));
        }
        if self.poll_interval_ms >= self.blue_light_overload_delay_ms {
            return Err(Error::Config("poll interval must be shorter than the fastest scroll"));
        }
        Ok(())
    }

    /// Parse a JSON board profile.  Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("malformed board profile"))?;
        config.validate()?;
        Ok(config)
    }

    /// Duration of the pause with every light on during the startup show.
    pub fn startup_hold_ms(&self) -> u32 {
        self.startup_step_delay_ms
            .saturating_mul(self.startup_hold_steps)
    }
}
