//! Mock hardware adapter for integration tests.
//!
//! Records every output call so tests can assert on the full command
//! history without touching real GPIO registers.  Inputs are plain public
//! fields the test sets before each poll.

use embedded_hal::delay::DelayNs;
use naquadah::app::events::GeneratorEvent;
use naquadah::app::ports::{BatteryPort, ClockPort, ControlPort, EventSink, OutputPort, SensorPort};
use naquadah::fsm::GeneratorState;
use naquadah::lights::{Level, Line, LightFrame};

// ── Output call record ────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputCall {
    Stage(Line, Level),
    Flush,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    /// Position sensors currently pulled low.
    pub low_sensors: Vec<GeneratorState>,
    pub overload: bool,
    pub mode_value: u8,
    pub mode_resets: u32,
    pub meter_pressed: bool,
    pub battery_raw: u16,
    pub battery_reads: u32,
    pub now_ms: u32,
    pub calls: Vec<OutputCall>,
    /// Latched output bits after each flush.
    pub frames: Vec<u16>,
    staged: u16,
    shown: u16,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            low_sensors: Vec::new(),
            overload: false,
            mode_value: 0,
            mode_resets: 0,
            meter_pressed: false,
            battery_raw: 0,
            battery_reads: 0,
            now_ms: 0,
            calls: Vec::new(),
            frames: Vec::new(),
            staged: 0,
            shown: 0,
        }
    }

    /// Only the sensor for `state` reads active.
    pub fn hold(&mut self, state: GeneratorState) {
        self.low_sensors = vec![state];
    }

    /// Arm in transit: no sensor reads active.
    pub fn release_all(&mut self) {
        self.low_sensors.clear();
    }

    /// Lights currently latched (charger relay excluded).
    pub fn lights(&self) -> LightFrame {
        LightFrame::from_bits(self.shown)
    }

    pub fn is_lit(&self, line: Line) -> bool {
        self.shown & line.mask() != 0
    }

    pub fn charger_pressed(&self) -> bool {
        self.shown & Line::ChargerKey.mask() != 0
    }

    pub fn flushes(&self) -> usize {
        self.calls.iter().filter(|c| **c == OutputCall::Flush).count()
    }

    /// Staged levels written for `line`, in order.
    pub fn staged_levels(&self, line: Line) -> Vec<Level> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                OutputCall::Stage(l, level) if *l == line => Some(*level),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
        self.frames.clear();
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn position_pin_low(&mut self, state: GeneratorState) -> bool {
        self.low_sensors.contains(&state)
    }

    fn overload_pin_low(&mut self) -> bool {
        self.overload
    }
}

impl OutputPort for MockHardware {
    fn set_no_update(&mut self, line: Line, level: Level) {
        self.calls.push(OutputCall::Stage(line, level));
        match level {
            Level::On => self.staged |= line.mask(),
            Level::Off => self.staged &= !line.mask(),
        }
    }

    fn flush(&mut self) {
        self.calls.push(OutputCall::Flush);
        self.shown = self.staged;
        self.frames.push(self.shown);
    }
}

impl ControlPort for MockHardware {
    fn mode_value(&mut self, _now_ms: u32) -> u8 {
        self.mode_value
    }

    fn reset_mode(&mut self) {
        self.mode_value = 0;
        self.mode_resets += 1;
    }

    fn meter_requested(&mut self, _now_ms: u32) -> bool {
        self.meter_pressed
    }
}

impl BatteryPort for MockHardware {
    fn read_battery_raw(&mut self) -> u16 {
        self.battery_reads += 1;
        self.battery_raw
    }
}

impl ClockPort for MockHardware {
    fn now_ms(&self) -> u32 {
        self.now_ms
    }
}

// ── MockDelay ─────────────────────────────────────────────────

/// Counts blocking delay instead of sleeping.
#[derive(Default)]
pub struct MockDelay {
    pub total_ns: u64,
    pub calls: usize,
}

#[allow(dead_code)]
impl MockDelay {
    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
        self.calls += 1;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ns += u64::from(ms) * 1_000_000;
        self.calls += 1;
    }
}

// ── RecordingSink ─────────────────────────────────────────────

/// Event sink that keeps every event for inspection.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<GeneratorEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state_changes(&self) -> Vec<(GeneratorState, GeneratorState)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                GeneratorEvent::StateChanged { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &GeneratorEvent) {
        self.events.push(*event);
    }
}
