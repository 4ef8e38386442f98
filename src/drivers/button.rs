//! Debounced button drivers.
//!
//! ## Hardware
//!
//! Active-low momentary switches with pull-ups.  The buttons are sampled
//! from the poll loop (no interrupts); a time-based debouncer turns the raw
//! level into stable press and release edges.
//!
//! ## Button shapes
//!
//! | Driver            | Capability     | Reads as                            |
//! |-------------------|----------------|-------------------------------------|
//! | `MomentaryButton` | `SwitchInput`  | `true` while held                   |
//! | `ToggleButton`    | `SwitchInput`  | flips on every press                |
//! | `CycleButton`     | `CycleInput`   | 0, 1, … max, 0, … one step per press |
//!
//! A pin read error counts as "not pressed" and is logged.

use embedded_hal::digital::InputPin;
use log::warn;

use crate::config::MeterButtonKind;
use crate::error::GpioError;

// ── Capabilities ──────────────────────────────────────────────

/// A button read as a stable on/off value.
pub trait SwitchInput {
    fn state(&mut self, now_ms: u32) -> bool;
    fn reset(&mut self);
}

/// A button read as a counter that wraps at a maximum.
pub trait CycleInput {
    fn value(&mut self, now_ms: u32) -> u8;
    fn reset(&mut self);
}

// ── Debouncer ─────────────────────────────────────────────────

/// Stable edge reported by [`Debouncer::sample`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Pressed,
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DebounceState {
    Released,
    MaybePressed { since_ms: u32 },
    Pressed,
    MaybeReleased { since_ms: u32 },
}

/// A raw level must hold for the whole window before it is believed.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    state: DebounceState,
    window_ms: u32,
}

impl Debouncer {
    pub fn new(window_ms: u32) -> Self {
        Self {
            state: DebounceState::Released,
            window_ms,
        }
    }

    /// Feed one raw sample.  Returns an edge when the stable level changes.
    pub fn sample(&mut self, raw_pressed: bool, now_ms: u32) -> Option<Edge> {
        match self.state {
            DebounceState::Released => {
                if raw_pressed {
                    self.state = DebounceState::MaybePressed { since_ms: now_ms };
                    return self.settle(now_ms);
                }
                None
            }
            DebounceState::MaybePressed { .. } => {
                if raw_pressed {
                    self.settle(now_ms)
                } else {
                    self.state = DebounceState::Released;
                    None
                }
            }
            DebounceState::Pressed => {
                if !raw_pressed {
                    self.state = DebounceState::MaybeReleased { since_ms: now_ms };
                    return self.settle(now_ms);
                }
                None
            }
            DebounceState::MaybeReleased { .. } => {
                if raw_pressed {
                    self.state = DebounceState::Pressed;
                    None
                } else {
                    self.settle(now_ms)
                }
            }
        }
    }

    /// Stable level after the last sample.
    pub fn is_pressed(&self) -> bool {
        matches!(
            self.state,
            DebounceState::Pressed | DebounceState::MaybeReleased { .. }
        )
    }

    fn settle(&mut self, now_ms: u32) -> Option<Edge> {
        match self.state {
            DebounceState::MaybePressed { since_ms }
                if now_ms.wrapping_sub(since_ms) >= self.window_ms =>
            {
                self.state = DebounceState::Pressed;
                Some(Edge::Pressed)
            }
            DebounceState::MaybeReleased { since_ms }
                if now_ms.wrapping_sub(since_ms) >= self.window_ms =>
            {
                self.state = DebounceState::Released;
                Some(Edge::Released)
            }
            _ => None,
        }
    }
}

fn read_pressed<P: InputPin>(pin: &mut P) -> bool {
    match pin.is_low() {
        Ok(low) => low,
        Err(_) => {
            warn!("button: {}", GpioError::ReadFailed);
            false
        }
    }
}

// ── Momentary ─────────────────────────────────────────────────

pub struct MomentaryButton<P> {
    pin: P,
    debouncer: Debouncer,
}

impl<P: InputPin> MomentaryButton<P> {
    pub fn new(pin: P, debounce_ms: u32) -> Self {
        Self {
            pin,
            debouncer: Debouncer::new(debounce_ms),
        }
    }
}

impl<P: InputPin> SwitchInput for MomentaryButton<P> {
    fn state(&mut self, now_ms: u32) -> bool {
        let raw = read_pressed(&mut self.pin);
        self.debouncer.sample(raw, now_ms);
        self.debouncer.is_pressed()
    }

    /// Nothing latched; the state always follows the switch.
    fn reset(&mut self) {}
}

// ── Toggle ────────────────────────────────────────────────────

pub struct ToggleButton<P> {
    pin: P,
    debouncer: Debouncer,
    latched: bool,
}

impl<P: InputPin> ToggleButton<P> {
    pub fn new(pin: P, debounce_ms: u32) -> Self {
        Self {
            pin,
            debouncer: Debouncer::new(debounce_ms),
            latched: false,
        }
    }
}

impl<P: InputPin> SwitchInput for ToggleButton<P> {
    fn state(&mut self, now_ms: u32) -> bool {
        let raw = read_pressed(&mut self.pin);
        if self.debouncer.sample(raw, now_ms) == Some(Edge::Pressed) {
            self.latched = !self.latched;
        }
        self.latched
    }

    fn reset(&mut self) {
        self.latched = false;
    }
}

// ── Cycle ─────────────────────────────────────────────────────

pub struct CycleButton<P> {
    pin: P,
    debouncer: Debouncer,
    value: u8,
    max: u8,
}

impl<P: InputPin> CycleButton<P> {
    /// `max` is the last value before wrapping back to 0.
    pub fn new(pin: P, debounce_ms: u32, max: u8) -> Self {
        Self {
            pin,
            debouncer: Debouncer::new(debounce_ms),
            value: 0,
            max,
        }
    }
}

impl<P: InputPin> CycleInput for CycleButton<P> {
    fn value(&mut self, now_ms: u32) -> u8 {
        let raw = read_pressed(&mut self.pin);
        if self.debouncer.sample(raw, now_ms) == Some(Edge::Pressed) {
            self.value = if self.value >= self.max { 0 } else { self.value + 1 };
        }
        self.value
    }

    fn reset(&mut self) {
        self.value = 0;
    }
}

// ── Battery meter activation ──────────────────────────────────

/// The meter button, momentary or toggle per board profile.
pub enum MeterButton<P> {
    Momentary(MomentaryButton<P>),
    Toggle(ToggleButton<P>),
}

impl<P: InputPin> MeterButton<P> {
    pub fn new(kind: MeterButtonKind, pin: P, debounce_ms: u32) -> Self {
        match kind {
            MeterButtonKind::Momentary => Self::Momentary(MomentaryButton::new(pin, debounce_ms)),
            MeterButtonKind::Toggle => Self::Toggle(ToggleButton::new(pin, debounce_ms)),
        }
    }
}

impl<P: InputPin> SwitchInput for MeterButton<P> {
    fn state(&mut self, now_ms: u32) -> bool {
        match self {
            Self::Momentary(b) => b.state(now_ms),
            Self::Toggle(b) => b.state(now_ms),
        }
    }

    fn reset(&mut self) {
        match self {
            Self::Momentary(b) => b.reset(),
            Self::Toggle(b) => b.reset(),
        }
    }
}
