//! GPIO / peripheral pin assignments for the generator main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

use crate::fsm::GeneratorState;

// ---------------------------------------------------------------------------
// Arm position sensors (A3144 Hall effect, open-drain, active LOW)
// ---------------------------------------------------------------------------

/// Arm at rest.
pub const SENSOR_OFF_GPIO: i32 = 4;
/// First primed position.
pub const SENSOR_PRIMED0_GPIO: i32 = 5;
/// Second primed position.
pub const SENSOR_PRIMED1_GPIO: i32 = 6;
/// Arm fully engaged.
pub const SENSOR_ON_GPIO: i32 = 7;

/// Position sensors in scan order, matching [`GeneratorState::POSITIONS`].
pub const POSITION_SENSOR_GPIOS: [i32; 4] = [
    SENSOR_OFF_GPIO,
    SENSOR_PRIMED0_GPIO,
    SENSOR_PRIMED1_GPIO,
    SENSOR_ON_GPIO,
];

/// Sensor pin for a position state.  `Overload` shares the ON position and
/// has no pin of its own.
pub fn position_sensor_gpio(state: GeneratorState) -> Option<i32> {
    match state {
        GeneratorState::Off => Some(SENSOR_OFF_GPIO),
        GeneratorState::Primed0 => Some(SENSOR_PRIMED0_GPIO),
        GeneratorState::Primed1 => Some(SENSOR_PRIMED1_GPIO),
        GeneratorState::On => Some(SENSOR_ON_GPIO),
        GeneratorState::Overload => None,
    }
}

// ---------------------------------------------------------------------------
// Operator controls (momentary switches to GND, internal pull-up)
// ---------------------------------------------------------------------------

/// Dedicated overload input.  LOW = overload held.
pub const OVERLOAD_GPIO: i32 = 15;
/// Special-mode cycle button.
pub const MODE_BUTTON_GPIO: i32 = 16;
/// Battery meter activation button.
pub const METER_BUTTON_GPIO: i32 = 17;

// ---------------------------------------------------------------------------
// 74HC595 output chain (two registers, 16 outputs)
// ---------------------------------------------------------------------------

/// Serial data (DS).
pub const SHIFT_DATA_GPIO: i32 = 11;
/// Shift clock (SHCP).
pub const SHIFT_CLOCK_GPIO: i32 = 12;
/// Storage latch (STCP).
pub const SHIFT_LATCH_GPIO: i32 = 13;
/// Number of chained registers.
pub const SHIFT_REGISTER_COUNT: usize = 2;

// ---------------------------------------------------------------------------
// Battery sense (1:1 resistive divider to ADC1)
// ---------------------------------------------------------------------------

/// ADC1 channel 0 (GPIO 1 on ESP32-S3).
pub const BATTERY_ADC_GPIO: i32 = 1;
pub const BATTERY_ADC_CHANNEL: u32 = 0;
