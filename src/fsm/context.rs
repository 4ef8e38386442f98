//! Shared mutable context threaded through every FSM handler.
//!
//! `GeneratorContext` is the single struct that state handlers read from and
//! write to.  It contains the latest input snapshot, the light frame and
//! service requests they produce, the scroll cursor and its timer, the
//! active special mode and the configuration.  Think of it as the
//! "blackboard" in a blackboard architecture.

use log::debug;

use super::GeneratorState;
use super::modes::SpecialMode;
use crate::config::GeneratorConfig;
use crate::drivers::light_show::ShowPlayer;
use crate::lights::{Level, Line, LightFrame};
use crate::timer::SoftTimer;

// ---------------------------------------------------------------------------
// Input snapshot (read-only to state handlers; written by the service)
// ---------------------------------------------------------------------------

/// A point-in-time snapshot of every input, taken once per poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    /// First position sensor found active, if any.
    pub sensed: Option<GeneratorState>,
    /// Overload input held.
    pub overload: bool,
    /// Current value of the special-mode cycle button.
    pub mode_value: u8,
    /// Free-running tick at the time of the poll (ms).
    pub now_ms: u32,
}

// ---------------------------------------------------------------------------
// Output commands (written by state handlers; consumed by the service)
// ---------------------------------------------------------------------------

/// What the handlers want done after the tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputCommands {
    /// Desired level of every light.  Flushed as a diff in one transfer.
    pub lights: LightFrame,
    /// Put the mode cycle button back to zero.
    pub reset_mode_input: bool,
    /// Let the battery meter read and display this poll.
    pub run_battery_meter: bool,
    /// Forget the meter's displayed level.
    pub reset_battery_meter: bool,
}

impl OutputCommands {
    /// Clear the one-shot requests, keeping the light frame.
    pub fn clear_requests(&mut self) {
        self.reset_mode_input = false;
        self.run_battery_meter = false;
        self.reset_battery_meter = false;
    }
}

// ---------------------------------------------------------------------------
// GeneratorContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct GeneratorContext {
    // -- Timing --
    /// Ticks elapsed since the current state was entered.
    pub ticks_in_state: u64,
    /// Monotonic total tick count.
    pub total_ticks: u64,

    // -- Inputs --
    pub inputs: InputSnapshot,

    // -- Outputs --
    pub commands: OutputCommands,

    // -- Configuration --
    pub config: GeneratorConfig,

    // -- Transition bookkeeping --
    /// State that was current before the last transition.
    pub entered_from: GeneratorState,

    // -- Blue-light scroll --
    /// Blue segment currently lit; always one of `Line::BLUE`.
    pub current_blue: Line,
    /// Step period used the next time the scroll timer is re-armed.
    pub light_delay_ms: u32,
    pub light_timer: SoftTimer,

    // -- Special modes --
    /// Mode value last applied (0 = OFF).
    pub mode_value: u8,
    /// Timed display owned by the active special mode.
    pub show: Option<ShowPlayer>,
}

impl GeneratorContext {
    /// Create a new context with the given configuration.
    pub fn new(config: GeneratorConfig) -> Self {
        let standard = config.blue_light_standard_delay_ms;
        Self {
            ticks_in_state: 0,
            total_ticks: 0,
            inputs: InputSnapshot::default(),
            commands: OutputCommands::default(),
            config,
            entered_from: GeneratorState::Off,
            current_blue: Line::Blue5,
            light_delay_ms: standard,
            light_timer: SoftTimer::new(standard),
            mode_value: 0,
            show: None,
        }
    }

    /// State the inputs call for, given the state the machine is in now.
    ///
    /// A missing position reading keeps the current arm position.  The ON
    /// position becomes OVERLOAD while the overload input is held.
    pub fn resolve_state(&self, current: GeneratorState) -> GeneratorState {
        let position = self.inputs.sensed.unwrap_or(match current {
            GeneratorState::Overload => GeneratorState::On,
            other => other,
        });

        if position == GeneratorState::On && self.config.overload_input_enabled && self.inputs.overload {
            GeneratorState::Overload
        } else {
            position
        }
    }

    /// `Some(next)` when the inputs call for a different state.
    pub fn requested_state(&self, current: GeneratorState) -> Option<GeneratorState> {
        let next = self.resolve_state(current);
        (next != current).then_some(next)
    }

    /// Every light off except READY.
    pub fn reset_lights(&mut self) {
        self.commands.lights = LightFrame::DARK;
        self.commands.lights.set(Line::Ready, Level::On);
    }

    /// Scroll back to standard speed, cursor parked on the last segment,
    /// special mode and battery meter cleared.
    pub fn reset_controls(&mut self) {
        self.light_delay_ms = self.config.blue_light_standard_delay_ms;
        self.current_blue = Line::Blue5;
        self.mode_value = 0;
        self.inputs.mode_value = 0;
        self.show = None;
        self.commands.reset_mode_input = true;
        self.commands.reset_battery_meter = true;
    }

    pub fn reset(&mut self) {
        self.reset_lights();
        self.reset_controls();
    }

    /// Move the lit blue segment one step and re-arm the scroll timer with
    /// the current delay.
    pub fn increment_blue_light(&mut self) {
        self.commands.lights.set(self.current_blue, Level::Off);
        self.current_blue = self.current_blue.next_blue();
        self.commands.lights.set(self.current_blue, Level::On);
        self.light_timer
            .restart(self.light_delay_ms, self.inputs.now_ms);
        debug!(
            "scroll: {} lit, next step in {} ms",
            self.current_blue.name(),
            self.light_delay_ms
        );
    }

    /// Special mode last applied, if the value names one.
    pub fn special_mode(&self) -> Option<SpecialMode> {
        SpecialMode::from_value(self.mode_value)
    }
}
