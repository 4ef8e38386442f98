//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Generator (domain)
//! ```
//!
//! Driven adapters (position sensors, buttons, the output chain, the battery
//! ADC, the clock and event sinks) implement these traits.  The
//! [`Generator`](super::service::Generator) consumes them via generics, so
//! the domain core never touches hardware directly.
//!
//! None of the per-poll port calls can fail: a broken pin reads as
//! inactive and a failed write is retried on the next flush.

use crate::fsm::GeneratorState;
use crate::lights::{Level, Line};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Raw digital inputs.  Sensors pull their pin low when triggered.
pub trait SensorPort {
    /// Whether the position sensor for `state` currently reads low.
    /// `Overload` has no position sensor and always reads `false`.
    fn position_pin_low(&mut self, state: GeneratorState) -> bool;

    /// Whether the dedicated overload input reads low.  Boards without the
    /// input keep the default.
    fn overload_pin_low(&mut self) -> bool {
        false
    }
}

// ───────────────────────────────────────────────────────────────
// Output port (driven adapter: domain → shift register)
// ───────────────────────────────────────────────────────────────

/// The output surface: one bit per [`Line`].
pub trait OutputPort {
    /// Set one line and commit immediately.
    fn set(&mut self, line: Line, level: Level) {
        self.set_no_update(line, level);
        self.flush();
    }

    /// Stage one line without committing.
    fn set_no_update(&mut self, line: Line, level: Level);

    /// Commit every staged line in a single transfer.
    fn flush(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Control port (driven adapter: debounced buttons → domain)
// ───────────────────────────────────────────────────────────────

/// Debounced operator controls.
pub trait ControlPort {
    /// Current value of the special-mode cycle button.
    fn mode_value(&mut self, now_ms: u32) -> u8;

    /// Return the cycle button to zero.
    fn reset_mode(&mut self);

    /// Whether the battery meter's activation button is active.
    fn meter_requested(&mut self, now_ms: u32) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Battery port
// ───────────────────────────────────────────────────────────────

pub trait BatteryPort {
    /// Raw battery reading in 10-bit counts.
    fn read_battery_raw(&mut self) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Free-running millisecond tick.  Wraps at `u32::MAX`.
pub trait ClockPort {
    fn now_ms(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`GeneratorEvent`](super::events::GeneratorEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::GeneratorEvent);
}

// ───────────────────────────────────────────────────────────────
// Combined hardware bound
// ───────────────────────────────────────────────────────────────

/// Everything the generator needs from the board, in one bound.
pub trait GeneratorHardware: SensorPort + OutputPort + ControlPort + BatteryPort + ClockPort {}

impl<T> GeneratorHardware for T where T: SensorPort + OutputPort + ControlPort + BatteryPort + ClockPort {}
