//! Timed light shows: ramps over the generator's lights.
//!
//! A show is a fixed-capacity list of steps.  Each step waits its delay and
//! then drives a set of lines to one level.  Shows can be played two ways:
//!
//! | Player                          | Used by           | Blocks polling |
//! |---------------------------------|-------------------|----------------|
//! | `Generator::run_startup_sequence` | boot only       | yes            |
//! | [`ShowPlayer`]                  | special mode 01   | no             |
//!
//! ## Sequences (`d` = step delay)
//!
//! ```text
//! ramp_blue_on   d:B1  d:B2  d:B3  d:B4  d:B5
//! ramp_blue_off  d:B5  d:B4  d:B3  d:B2  d:B1
//! ramp_up_all    ramp_blue_on, 2d: green+red, 2d: white
//! ramp_down_all  0: white, 2d: green+red, d, ramp_blue_off
//! startup        ramp_up_all, hold, ramp_down_all
//! ```

use heapless::Vec;
use log::warn;

use crate::lights::{Level, Line, LightFrame};
use crate::timer::SoftTimer;

/// Longest show: the startup sequence.
pub const MAX_SHOW_STEPS: usize = 16;

/// Wait `delay_ms`, then drive every line in `mask` to `level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowStep {
    pub delay_ms: u32,
    pub mask: u16,
    pub level: Level,
}

impl ShowStep {
    pub fn new(delay_ms: u32, lines: &[Line], level: Level) -> Self {
        let mask = lines.iter().fold(0, |m, l| m | l.mask());
        Self {
            delay_ms,
            mask,
            level,
        }
    }

    pub fn apply(&self, frame: &mut LightFrame) {
        for line in Line::LIGHTS {
            if self.mask & line.mask() != 0 {
                frame.set(line, self.level);
            }
        }
    }
}

pub type Show = Vec<ShowStep, MAX_SHOW_STEPS>;

fn push(show: &mut Show, step: ShowStep) {
    if show.push(step).is_err() {
        warn!("light show full, step dropped");
    }
}

fn append(show: &mut Show, steps: &Show) {
    for step in steps {
        push(show, *step);
    }
}

// ── Sequences ─────────────────────────────────────────────────

pub fn ramp_blue_on(step_ms: u32) -> Show {
    let mut show = Show::new();
    for line in Line::BLUE {
        push(&mut show, ShowStep::new(step_ms, &[line], Level::On));
    }
    show
}

pub fn ramp_blue_off(step_ms: u32) -> Show {
    let mut show = Show::new();
    for line in Line::BLUE.into_iter().rev() {
        push(&mut show, ShowStep::new(step_ms, &[line], Level::Off));
    }
    show
}

pub fn ramp_up_all(step_ms: u32) -> Show {
    let mut show = ramp_blue_on(step_ms);
    let pause = step_ms.saturating_mul(2);
    push(&mut show, ShowStep::new(pause, &[Line::Green, Line::Red], Level::On));
    push(&mut show, ShowStep::new(pause, &[Line::White], Level::On));
    show
}

pub fn ramp_down_all(step_ms: u32) -> Show {
    let mut show = Show::new();
    push(&mut show, ShowStep::new(0, &[Line::White], Level::Off));
    push(
        &mut show,
        ShowStep::new(step_ms.saturating_mul(2), &[Line::Green, Line::Red], Level::Off),
    );
    let mut blue = ramp_blue_off(step_ms);
    // One extra step of pause before the blue ramp.
    if let Some(first) = blue.first_mut() {
        first.delay_ms = step_ms.saturating_mul(2);
    }
    append(&mut show, &blue);
    show
}

/// Boot show: everything ramps up, holds for `hold_ms`, then ramps down.
pub fn startup(step_ms: u32, hold_ms: u32) -> Show {
    let mut show = ramp_up_all(step_ms);
    let mut down = ramp_down_all(step_ms);
    if let Some(first) = down.first_mut() {
        first.delay_ms = hold_ms;
    }
    append(&mut show, &down);
    show
}

/// Sum of every step delay.
pub fn duration_ms(show: &Show) -> u32 {
    show.iter().fold(0u32, |acc, s| acc.saturating_add(s.delay_ms))
}

// ── Non-blocking player ───────────────────────────────────────

/// Plays a show one step per timeout, driven from the poll loop.
#[derive(Debug, Clone)]
pub struct ShowPlayer {
    steps: Show,
    next: usize,
    timer: SoftTimer,
}

impl ShowPlayer {
    pub fn new(steps: Show) -> Self {
        Self {
            steps,
            next: 0,
            timer: SoftTimer::new(0),
        }
    }

    /// Rewind and arm the first step's delay from `now_ms`.
    pub fn start(&mut self, now_ms: u32) {
        self.next = 0;
        let first = self.steps.first().map_or(0, |s| s.delay_ms);
        self.timer.restart(first, now_ms);
    }

    /// Apply every step that has come due.  Returns `true` once the last
    /// step has been applied.
    pub fn advance(&mut self, now_ms: u32, frame: &mut LightFrame) -> bool {
        while let Some(step) = self.steps.get(self.next).copied() {
            if !self.timer.has_timed_out(now_ms) {
                return false;
            }
            step.apply(frame);
            self.next += 1;
            // Re-arm from when the step was due so a late poll catches up.
            let late = self.timer.elapsed(now_ms) - self.timer.timeout();
            let delay = self.steps.get(self.next).map_or(0, |s| s.delay_ms);
            self.timer.restart(delay, now_ms.wrapping_sub(late));
        }
        true
    }

    pub fn is_finished(&self) -> bool {
        self.next >= self.steps.len()
    }
}
