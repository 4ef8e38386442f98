//! Fuzz target: `Generator::update` over arbitrary input sequences
//!
//! Each fuzz byte is one poll cycle:
//!
//! | Bits | Meaning                                   |
//! |------|-------------------------------------------|
//! | 0-2  | active position sensor (0-3), else none   |
//! | 3    | overload input held                       |
//! | 4-5  | mode button value                         |
//! | 6    | meter button held                         |
//! | 7    | long gap (1 s) before the poll            |
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - While energised exactly one blue segment is lit, with red and white
//! - The latched frame matches what the generator believes is shown
//!
//! cargo fuzz run fuzz_poll_sequence

#![no_main]

use libfuzzer_sys::fuzz_target;
use naquadah::app::events::GeneratorEvent;
use naquadah::app::ports::{BatteryPort, ClockPort, ControlPort, EventSink, OutputPort, SensorPort};
use naquadah::app::service::Generator;
use naquadah::config::GeneratorConfig;
use naquadah::fsm::GeneratorState;
use naquadah::lights::{Level, Line, LightFrame};

// ── In-memory hardware for fuzz testing ───────────────────────

#[derive(Default)]
struct FuzzHw {
    sensed: Option<GeneratorState>,
    overload: bool,
    mode: u8,
    meter: bool,
    now_ms: u32,
    staged: u16,
    shown: u16,
}

impl SensorPort for FuzzHw {
    fn position_pin_low(&mut self, state: GeneratorState) -> bool {
        self.sensed == Some(state)
    }

    fn overload_pin_low(&mut self) -> bool {
        self.overload
    }
}

impl OutputPort for FuzzHw {
    fn set_no_update(&mut self, line: Line, level: Level) {
        match level {
            Level::On => self.staged |= line.mask(),
            Level::Off => self.staged &= !line.mask(),
        }
    }

    fn flush(&mut self) {
        self.shown = self.staged;
    }
}

impl ControlPort for FuzzHw {
    fn mode_value(&mut self, _now_ms: u32) -> u8 {
        self.mode
    }

    fn reset_mode(&mut self) {
        self.mode = 0;
    }

    fn meter_requested(&mut self, _now_ms: u32) -> bool {
        self.meter
    }
}

impl BatteryPort for FuzzHw {
    fn read_battery_raw(&mut self) -> u16 {
        (self.now_ms % 1024) as u16
    }
}

impl ClockPort for FuzzHw {
    fn now_ms(&self) -> u32 {
        self.now_ms
    }
}

struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &GeneratorEvent) {}
}

struct NoDelay;

impl embedded_hal::delay::DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

fuzz_target!(|data: &[u8]| {
    let mut generator = Generator::new(GeneratorConfig {
        run_startup_sequence: false,
        ..GeneratorConfig::default()
    });
    let mut hw = FuzzHw::default();
    generator.begin(&mut hw, &mut NoDelay, &mut NullSink);

    for &byte in data {
        let sensor = usize::from(byte & 0x07);
        hw.sensed = GeneratorState::POSITIONS.get(sensor).copied();
        hw.overload = byte & 0x08 != 0;
        hw.mode = (byte >> 4) & 0x03;
        hw.meter = byte & 0x40 != 0;
        let gap = if byte & 0x80 != 0 { 1_000 } else { 5 };
        hw.now_ms = hw.now_ms.wrapping_add(gap);

        generator.update(&mut hw, &mut NullSink);

        let shown = LightFrame::from_bits(hw.shown);
        assert_eq!(shown, generator.lights(), "latched frame out of sync");
        if matches!(generator.state(), GeneratorState::On | GeneratorState::Overload) {
            assert_eq!(shown.lit_blue().count(), 1);
            assert!(shown.is_on(Line::Red) && shown.is_on(Line::White));
        }
    }
});
