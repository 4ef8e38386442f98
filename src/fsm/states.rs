//! Concrete state handler functions and table builder.
//!
//! Each state is defined by three plain `fn` pointers — no closures, no
//! dynamic dispatch, no heap.  Entry handlers configure the lights for the
//! destination only, so a light that stays lit across a transition (red
//! from PRIMED1 into ON) is never toggled.
//!
//! ```text
//!  OFF ◀──▶ PRIMED0 ◀──▶ PRIMED1 ◀──▶ ON ◀──[overload held]──▶ OVERLOAD
//!   │                                  ▲
//!   └──────────[arm jumps]─────────────┘
//!
//!  Any position can be reached from any other; the arm is sampled, not
//!  stepped.  No sensor active ──▶ stay put.
//! ```

use super::context::GeneratorContext;
use super::modes::{apply_mode, run_mode};
use super::{GeneratorState, StateDescriptor};
use crate::lights::{Level, Line};
use log::info;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; GeneratorState::COUNT] {
    [
        // Index 0 — Off
        StateDescriptor {
            id: GeneratorState::Off,
            name: GeneratorState::Off.name(),
            on_enter: Some(off_enter),
            on_exit: Some(off_exit),
            on_update: off_update,
        },
        // Index 1 — Primed0
        StateDescriptor {
            id: GeneratorState::Primed0,
            name: GeneratorState::Primed0.name(),
            on_enter: Some(primed0_enter),
            on_exit: None,
            on_update: primed0_update,
        },
        // Index 2 — Primed1
        StateDescriptor {
            id: GeneratorState::Primed1,
            name: GeneratorState::Primed1.name(),
            on_enter: Some(primed1_enter),
            on_exit: None,
            on_update: primed1_update,
        },
        // Index 3 — On
        StateDescriptor {
            id: GeneratorState::On,
            name: GeneratorState::On.name(),
            on_enter: Some(on_enter),
            on_exit: None,
            on_update: on_update,
        },
        // Index 4 — Overload
        StateDescriptor {
            id: GeneratorState::Overload,
            name: GeneratorState::Overload.name(),
            on_enter: Some(overload_enter),
            on_exit: None,
            on_update: overload_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  OFF state — special modes and battery meter live here
// ═══════════════════════════════════════════════════════════════════════════

fn off_enter(ctx: &mut GeneratorContext) {
    ctx.reset();
    info!("OFF: lights dark, controls reset");
}

fn off_exit(ctx: &mut GeneratorContext) {
    // Displays and the meter belong to OFF; the meter's blue lights are
    // cleared by whichever entry handler runs next.
    ctx.show = None;
    ctx.commands.reset_battery_meter = true;
}

fn off_update(ctx: &mut GeneratorContext) -> Option<GeneratorState> {
    if let Some(next) = ctx.requested_state(GeneratorState::Off) {
        return Some(next);
    }

    let selected = ctx.inputs.mode_value;
    if selected != ctx.mode_value {
        apply_mode(ctx, selected);
    } else {
        run_mode(ctx);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  PRIMED0 state — first arm position, green
// ═══════════════════════════════════════════════════════════════════════════

fn primed0_enter(ctx: &mut GeneratorContext) {
    ctx.reset();
    ctx.commands.lights.set(Line::Green, Level::On);
    info!("PRIMED0: green");
}

fn primed0_update(ctx: &mut GeneratorContext) -> Option<GeneratorState> {
    ctx.requested_state(GeneratorState::Primed0)
}

// ═══════════════════════════════════════════════════════════════════════════
//  PRIMED1 state — second arm position, red
// ═══════════════════════════════════════════════════════════════════════════

fn primed1_enter(ctx: &mut GeneratorContext) {
    let lights = &mut ctx.commands.lights;
    lights.set(Line::Green, Level::Off);
    lights.set(Line::White, Level::Off);
    lights.blue_off();
    lights.set(Line::Red, Level::On);
    info!("PRIMED1: red");
}

fn primed1_update(ctx: &mut GeneratorContext) -> Option<GeneratorState> {
    ctx.requested_state(GeneratorState::Primed1)
}

// ═══════════════════════════════════════════════════════════════════════════
//  ON state — blue scroll at standard speed
// ═══════════════════════════════════════════════════════════════════════════

fn on_enter(ctx: &mut GeneratorContext) {
    let delay = ctx.config.blue_light_standard_delay_ms;
    if ctx.entered_from == GeneratorState::Overload {
        // Scroll continues; the slower period applies from the next step.
        ctx.light_delay_ms = delay;
        info!("ON: overload released, scroll back to {delay} ms");
    } else {
        energise(ctx, delay);
        info!("ON: scrolling every {delay} ms");
    }
}

fn on_update(ctx: &mut GeneratorContext) -> Option<GeneratorState> {
    if let Some(next) = ctx.requested_state(GeneratorState::On) {
        return Some(next);
    }
    scroll(ctx);
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  OVERLOAD state — ON position with the overload input held
// ═══════════════════════════════════════════════════════════════════════════

fn overload_enter(ctx: &mut GeneratorContext) {
    let delay = ctx.config.blue_light_overload_delay_ms;
    if ctx.entered_from == GeneratorState::On {
        ctx.light_delay_ms = delay;
        info!("OVERLOAD: scroll speeding up to {delay} ms");
    } else {
        energise(ctx, delay);
        info!("OVERLOAD: scrolling every {delay} ms");
    }
}

fn overload_update(ctx: &mut GeneratorContext) -> Option<GeneratorState> {
    if let Some(next) = ctx.requested_state(GeneratorState::Overload) {
        return Some(next);
    }
    scroll(ctx);
    None
}

// ───────────────────────────────────────────────────────────────────────────
//  Shared helpers
// ───────────────────────────────────────────────────────────────────────────

/// ON-family lights from a non-scrolling state: red and white lit, the
/// first blue segment lit and the scroll timer armed.
fn energise(ctx: &mut GeneratorContext, delay_ms: u32) {
    let lights = &mut ctx.commands.lights;
    lights.set(Line::Green, Level::Off);
    lights.set(Line::Red, Level::On);
    lights.set(Line::White, Level::On);
    lights.blue_off();

    ctx.reset_controls();
    ctx.light_delay_ms = delay_ms;
    ctx.increment_blue_light();
}

fn scroll(ctx: &mut GeneratorContext) {
    if ctx.light_timer.has_timed_out(ctx.inputs.now_ms) {
        ctx.increment_blue_light();
    }
}
