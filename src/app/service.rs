//! Application service — the hexagonal core.
//!
//! [`Generator`] owns the FSM, its shared context, the battery meter and the
//! charger key.  It exposes a clean, hardware-agnostic API.  All I/O flows
//! through port traits injected at call sites, making the entire service
//! testable with mock adapters.
//!
//! ```text
//!  SensorPort  ──▶ ┌─────────────────────────────┐ ──▶ EventSink
//!  ControlPort ──▶ │          Generator          │
//!  BatteryPort ──▶ │  FSM · meter · charger key  │ ──▶ OutputPort
//!  ClockPort   ──▶ └─────────────────────────────┘
//! ```
//!
//! ## Poll cycle
//!
//! 1. Snapshot inputs: first active position sensor, overload input, mode
//!    button value, current tick.
//! 2. FSM tick: transition if the arm moved, then the state's steady-state
//!    work (mode dispatch, battery meter, blue scroll).
//! 3. Apply commands: button resets, meter, then flush the light frame
//!    diff in one transfer.
//! 4. Pulse the charger key if its timer has run out.
//!
//! Nothing in the cycle blocks.  The only blocking work is the startup show
//! in [`Generator::begin`].

use embedded_hal::delay::DelayNs;
use log::{debug, info};

use crate::config::GeneratorConfig;
use crate::drivers::battery_meter::BatteryMeter;
use crate::drivers::charger_key::ChargerKey;
use crate::drivers::light_show;
use crate::fsm::context::{GeneratorContext, InputSnapshot};
use crate::fsm::modes::SpecialMode;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, GeneratorState};
use crate::lights::{Level, Line, LightFrame};

use super::events::GeneratorEvent;
use super::ports::{EventSink, GeneratorHardware, OutputPort, SensorPort};

// ───────────────────────────────────────────────────────────────
// Generator
// ───────────────────────────────────────────────────────────────

/// The generator state machine and everything it drives.
pub struct Generator {
    fsm: Fsm,
    ctx: GeneratorContext,
    meter: BatteryMeter,
    charger: ChargerKey,
    /// Frame currently latched on the output chain.
    shown: LightFrame,
    polls: u64,
}

impl Generator {
    /// Construct the generator from configuration.
    ///
    /// Does **not** touch hardware; call [`begin`](Self::begin) next.
    pub fn new(config: GeneratorConfig) -> Self {
        let meter = BatteryMeter::from_config(&config);
        let charger = ChargerKey::from_config(&config);
        let ctx = GeneratorContext::new(config);
        let fsm = Fsm::new(build_state_table(), GeneratorState::Off);

        Self {
            fsm,
            ctx,
            meter,
            charger,
            shown: LightFrame::DARK,
            polls: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Boot: play the startup show (blocking), enter OFF and arm the
    /// charger key.
    pub fn begin(
        &mut self,
        hw: &mut impl GeneratorHardware,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) {
        if self.charger.is_enabled() {
            hw.set(Line::ChargerKey, Level::Off);
        }

        if self.ctx.config.run_startup_sequence {
            self.run_startup_sequence(hw, delay);
        }

        let now = hw.now_ms();
        self.ctx.inputs.now_ms = now;
        self.fsm.start(&mut self.ctx);
        self.apply_commands(hw, sink);
        self.charger.arm(now);

        sink.emit(&GeneratorEvent::Started(self.fsm.current_state()));
        info!("Generator started in {}", self.fsm.current_state().name());
    }

    /// Play the boot light show.  Blocks for its whole duration; never
    /// called from [`update`](Self::update).
    pub fn run_startup_sequence(&mut self, hw: &mut impl OutputPort, delay: &mut impl DelayNs) {
        let step_ms = self.ctx.config.startup_step_delay_ms;
        let show = light_show::startup(step_ms, self.ctx.config.startup_hold_ms());
        info!(
            "startup sequence: {} steps over {} ms",
            show.len(),
            light_show::duration_ms(&show)
        );

        for step in &show {
            delay.delay_ms(step.delay_ms);
            step.apply(&mut self.ctx.commands.lights);
            self.flush_lights(hw);
        }
    }

    // ── Per-poll orchestration ────────────────────────────────

    /// Run one poll cycle.  Cheap and non-blocking; call it in a loop.
    pub fn update(&mut self, hw: &mut impl GeneratorHardware, sink: &mut impl EventSink) {
        self.polls += 1;
        let now = hw.now_ms();
        let prev_state = self.fsm.current_state();
        let prev_mode = self.ctx.mode_value;

        // 1. Inputs
        self.ctx.inputs = InputSnapshot {
            sensed: Self::sense_position(hw),
            overload: self.ctx.config.overload_input_enabled && hw.overload_pin_low(),
            mode_value: hw.mode_value(now),
            now_ms: now,
        };
        debug!(
            "poll {}: sensed {:?}, overload {}, mode {}",
            self.polls,
            self.ctx.inputs.sensed.map(GeneratorState::name),
            self.ctx.inputs.overload,
            self.ctx.inputs.mode_value
        );

        // 2. State logic
        self.fsm.tick(&mut self.ctx);

        // 3. Outputs
        self.apply_commands(hw, sink);

        let new_state = self.fsm.current_state();
        if new_state != prev_state {
            sink.emit(&GeneratorEvent::StateChanged {
                from: prev_state,
                to: new_state,
            });
        }
        if self.ctx.mode_value != prev_mode {
            sink.emit(&GeneratorEvent::SpecialModeChanged {
                from: prev_mode,
                to: self.ctx.mode_value,
            });
        }

        // 4. Charger key runs on its own timer, whatever the state.
        if self.charger.is_due(now) {
            self.pulse_charger_key(hw, sink);
        }
    }

    /// The state the arm position calls for: the first position sensor
    /// reading low, or the current state when none does.  Pure read.
    pub fn poll_state(&self, hw: &mut impl SensorPort) -> GeneratorState {
        Self::sense_position(hw).unwrap_or(self.fsm.current_state())
    }

    /// Enter `state` now, running its transition effects and flushing the
    /// lights.  Applying the current state is a no-op.  The next
    /// [`update`](Self::update) still follows the sensors.
    pub fn apply_state(
        &mut self,
        state: GeneratorState,
        hw: &mut impl GeneratorHardware,
        sink: &mut impl EventSink,
    ) {
        let prev_state = self.fsm.current_state();
        if state == prev_state {
            return;
        }
        self.ctx.inputs.now_ms = hw.now_ms();
        self.fsm.force_transition(state, &mut self.ctx);
        self.apply_commands(hw, sink);
        sink.emit(&GeneratorEvent::StateChanged {
            from: prev_state,
            to: state,
        });
    }

    /// Flip the charger key relay and re-arm its timer.
    pub fn pulse_charger_key(&mut self, hw: &mut impl GeneratorHardware, sink: &mut impl EventSink) {
        let now = hw.now_ms();
        let level = self.charger.pulse(now);
        hw.set(Line::ChargerKey, level);
        debug!(
            "charger key {} for {} ms",
            if level.is_on() { "pressed" } else { "released" },
            self.charger.period_ms()
        );
        sink.emit(&GeneratorEvent::ChargerKey {
            pressed: level.is_on(),
        });
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current FSM state.
    pub fn state(&self) -> GeneratorState {
        self.fsm.current_state()
    }

    /// Remembered special mode; `None` if the button produced a value no
    /// mode is defined for.
    pub fn special_mode(&self) -> Option<SpecialMode> {
        self.ctx.special_mode()
    }

    /// Blue segment the scroll cursor points at.
    pub fn current_blue(&self) -> Line {
        self.ctx.current_blue
    }

    /// Scroll step period that applies from the next re-arm.
    pub fn light_delay_ms(&self) -> u32 {
        self.ctx.light_delay_ms
    }

    pub fn charger_key_active(&self) -> bool {
        self.charger.is_active()
    }

    /// Frame latched on the output chain.
    pub fn lights(&self) -> LightFrame {
        self.shown
    }

    pub fn battery_meter_showing(&self) -> bool {
        self.meter.is_showing()
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.ctx.config
    }

    /// Poll cycles run since boot.
    pub fn polls(&self) -> u64 {
        self.polls
    }

    // ── Internal ──────────────────────────────────────────────

    fn sense_position(hw: &mut impl SensorPort) -> Option<GeneratorState> {
        GeneratorState::POSITIONS
            .into_iter()
            .find(|state| hw.position_pin_low(*state))
    }

    /// Carry out the handlers' requests, then flush the light frame.
    fn apply_commands(&mut self, hw: &mut impl GeneratorHardware, sink: &mut impl EventSink) {
        let now = self.ctx.inputs.now_ms;
        let cmds = self.ctx.commands;

        if cmds.reset_mode_input {
            hw.reset_mode();
        }
        if cmds.reset_battery_meter {
            self.meter.reset();
        }
        if cmds.run_battery_meter {
            let requested = hw.meter_requested(now);
            let reading = self.meter.update(
                requested,
                now,
                || hw.read_battery_raw(),
                &mut self.ctx.commands.lights,
            );
            if let Some(reading) = reading {
                sink.emit(&GeneratorEvent::BatteryLevel {
                    raw: reading.raw,
                    level: reading.level,
                });
            }
        }
        self.ctx.commands.clear_requests();

        self.flush_lights(hw);
    }

    /// Stage every changed light and commit them in one transfer.
    fn flush_lights(&mut self, hw: &mut impl OutputPort) {
        let wanted = self.ctx.commands.lights;
        let mut staged = false;
        for (line, level) in wanted.changes_from(self.shown) {
            hw.set_no_update(line, level);
            staged = true;
        }
        if staged {
            hw.flush();
            self.shown = wanted;
        }
    }
}
