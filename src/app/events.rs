//! Outbound application events.
//!
//! The [`Generator`](super::service::Generator) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (serial log, audio trigger, etc.).

use crate::fsm::GeneratorState;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorEvent {
    /// The generator has finished booting (carries initial state).
    Started(GeneratorState),

    /// The FSM transitioned between states.
    StateChanged {
        from: GeneratorState,
        to: GeneratorState,
    },

    /// A different special-mode value was applied.
    SpecialModeChanged { from: u8, to: u8 },

    /// The charger key relay changed.
    ChargerKey { pressed: bool },

    /// The battery meter displayed a new reading.
    BatteryLevel { raw: u16, level: u8 },
}
