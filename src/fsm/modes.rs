//! Special modes: alternate displays selectable while the arm is at OFF.
//!
//! | Value | Mode   | Display                                   | Idle behaviour          |
//! |-------|--------|-------------------------------------------|-------------------------|
//! | 0     | OFF    | ready light                               | battery meter           |
//! | 1     | MODE01 | ramp every light up, then ready back on   | advance the display     |
//! | 2     | MODE02 | green + red diagnostic                    | —                       |
//! | 3–6   | MODE03..MODE06 | none (reserved slots)             | —                       |
//!
//! Values above the last mode are logged and ignored.

use log::info;

use super::context::GeneratorContext;
use crate::drivers::light_show::{self, ShowPlayer};
use crate::lights::{Level, Line};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SpecialMode {
    Off = 0,
    Mode01 = 1,
    Mode02 = 2,
    Mode03 = 3,
    Mode04 = 4,
    Mode05 = 5,
    Mode06 = 6,
}

impl SpecialMode {
    /// Highest mode value.
    pub const MAX: u8 = 6;

    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Off),
            1 => Some(Self::Mode01),
            2 => Some(Self::Mode02),
            3 => Some(Self::Mode03),
            4 => Some(Self::Mode04),
            5 => Some(Self::Mode05),
            6 => Some(Self::Mode06),
            _ => None,
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Off => "SPECIALMODEOFF",
            Self::Mode01 => "MODE01",
            Self::Mode02 => "MODE02",
            Self::Mode03 => "MODE03",
            Self::Mode04 => "MODE04",
            Self::Mode05 => "MODE05",
            Self::Mode06 => "MODE06",
        }
    }
}

/// Switch to the mode selected by `value`: remember it, reset the lights
/// and start that mode's display.
pub fn apply_mode(ctx: &mut GeneratorContext, value: u8) {
    ctx.mode_value = value;
    ctx.show = None;
    ctx.commands.reset_battery_meter = true;
    ctx.reset_lights();

    match SpecialMode::from_value(value) {
        Some(SpecialMode::Off) => info!("special mode: {}", SpecialMode::Off.name()),
        Some(SpecialMode::Mode01) => {
            ctx.commands.lights.set(Line::Ready, Level::Off);
            let mut player =
                ShowPlayer::new(light_show::ramp_up_all(ctx.config.startup_step_delay_ms));
            player.start(ctx.inputs.now_ms);
            ctx.show = Some(player);
            info!("special mode: MODE01, light ramp");
        }
        Some(SpecialMode::Mode02) => {
            ctx.commands.lights.set(Line::Green, Level::On);
            ctx.commands.lights.set(Line::Red, Level::On);
            info!("special mode: MODE02, green + red");
        }
        Some(mode) => info!("special mode: {} has no display", mode.name()),
        None => info!("special mode: unknown value {value}, ignored"),
    }
}

/// Per-poll behaviour of the remembered mode.
pub fn run_mode(ctx: &mut GeneratorContext) {
    match SpecialMode::from_value(ctx.mode_value) {
        Some(SpecialMode::Off) => ctx.commands.run_battery_meter = true,
        Some(SpecialMode::Mode01) => {
            let now = ctx.inputs.now_ms;
            if let Some(player) = ctx.show.as_mut() {
                if player.advance(now, &mut ctx.commands.lights) {
                    ctx.show = None;
                    ctx.commands.lights.set(Line::Ready, Level::On);
                    info!("special mode: MODE01 display complete");
                }
            }
        }
        _ => {}
    }
}
