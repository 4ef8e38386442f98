//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured generator events to the
//! ESP-IDF logger (UART / USB-CDC in production).  An audio-trigger
//! adapter would implement the same trait.

use log::{debug, info};

use crate::app::events::GeneratorEvent;
use crate::app::ports::EventSink;
use crate::fsm::modes::SpecialMode;

/// Adapter that logs every [`GeneratorEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

fn mode_name(value: u8) -> &'static str {
    SpecialMode::from_value(value).map_or("UNKNOWN", SpecialMode::name)
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &GeneratorEvent) {
        match event {
            GeneratorEvent::Started(state) => {
                info!("START | initial_state={}", state.name());
            }
            GeneratorEvent::StateChanged { from, to } => {
                info!("STATE | {} -> {}", from.name(), to.name());
            }
            GeneratorEvent::SpecialModeChanged { from, to } => {
                info!("MODE  | {} -> {}", mode_name(*from), mode_name(*to));
            }
            GeneratorEvent::ChargerKey { pressed } => {
                debug!("CHRG  | {}", if *pressed { "pressed" } else { "released" });
            }
            GeneratorEvent::BatteryLevel { raw, level } => {
                debug!("BATT  | raw={} level={}/5", raw, level);
            }
        }
    }
}
