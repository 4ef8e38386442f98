//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the shift-register chain, the position sensors, the buttons, the
//! battery ADC channel and the clock, exposing them through every port the
//! [`Generator`](crate::app::service::Generator) needs.  This is the only
//! module in the system that touches actual hardware.  On non-espidf
//! targets, the underlying drivers use cfg-gated simulation stubs.

use embedded_hal::digital::InputPin;

use crate::app::ports::{BatteryPort, ClockPort, ControlPort, OutputPort, SensorPort};
use crate::config::GeneratorConfig;
use crate::drivers::button::{CycleButton, CycleInput, MeterButton, SwitchInput};
use crate::drivers::hw_init::{self, GpioPin};
use crate::drivers::shift_register::ShiftRegister;
use crate::fsm::GeneratorState;
use crate::lights::{Level, Line};
use crate::pins;

use super::time::Esp32TimeAdapter;

/// The 74HC595 chain on its three GPIOs.
pub type OutputChain = ShiftRegister<GpioPin, GpioPin, GpioPin, { pins::SHIFT_REGISTER_COUNT }>;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    outputs: OutputChain,
    overload: GpioPin,
    mode_button: CycleButton<GpioPin>,
    meter_button: MeterButton<GpioPin>,
    clock: Esp32TimeAdapter,
}

impl HardwareAdapter {
    /// Build the adapter over pins already configured by
    /// [`hw_init::init_peripherals`].  Clears every output.
    pub fn new(config: &GeneratorConfig, clock: Esp32TimeAdapter) -> Self {
        let outputs = ShiftRegister::new(
            GpioPin::new(pins::SHIFT_DATA_GPIO),
            GpioPin::new(pins::SHIFT_CLOCK_GPIO),
            GpioPin::new(pins::SHIFT_LATCH_GPIO),
        );

        Self {
            outputs,
            overload: GpioPin::new(pins::OVERLOAD_GPIO),
            mode_button: CycleButton::new(
                GpioPin::new(pins::MODE_BUTTON_GPIO),
                config.debounce_ms,
                config.max_special_mode,
            ),
            meter_button: MeterButton::new(
                config.meter_button,
                GpioPin::new(pins::METER_BUTTON_GPIO),
                config.debounce_ms,
            ),
            clock,
        }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn position_pin_low(&mut self, state: GeneratorState) -> bool {
        pins::position_sensor_gpio(state).is_some_and(|gpio| !hw_init::gpio_read(gpio))
    }

    fn overload_pin_low(&mut self) -> bool {
        self.overload.is_low().unwrap_or(false)
    }
}

// ── OutputPort implementation ─────────────────────────────────

impl OutputPort for HardwareAdapter {
    fn set_no_update(&mut self, line: Line, level: Level) {
        self.outputs.set_no_update(line, level);
    }

    fn flush(&mut self) {
        self.outputs.flush();
    }
}

// ── ControlPort implementation ────────────────────────────────

impl ControlPort for HardwareAdapter {
    fn mode_value(&mut self, now_ms: u32) -> u8 {
        self.mode_button.value(now_ms)
    }

    fn reset_mode(&mut self) {
        self.mode_button.reset();
    }

    fn meter_requested(&mut self, now_ms: u32) -> bool {
        self.meter_button.state(now_ms)
    }
}

// ── BatteryPort implementation ────────────────────────────────

impl BatteryPort for HardwareAdapter {
    /// The ADC converts at 12 bits; calibration is in 10-bit counts.
    fn read_battery_raw(&mut self) -> u16 {
        hw_init::adc1_read(pins::BATTERY_ADC_CHANNEL) >> 2
    }
}

// ── ClockPort implementation ──────────────────────────────────

impl ClockPort for HardwareAdapter {
    fn now_ms(&self) -> u32 {
        self.clock.now_ms()
    }
}
