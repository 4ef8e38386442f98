//! 74HC595 output chain driver.
//!
//! ## Hardware
//!
//! `N` serial-in/parallel-out registers daisy-chained on three GPIOs:
//!
//! ```text
//!  MCU DS ──▶ [595 #0] ──Q7'──▶ [595 #1] ──▶ …
//!  SHCP ─────────┴───────────────────┴──── shift on rising edge
//!  STCP ─────────┴───────────────────┴──── latch on rising edge
//! ```
//!
//! Line `i` is bit `i % 8` of register `i / 8`.  Bits for the last register
//! are shifted first, MSB first, so that after `8 × N` clocks every bit sits
//! in its own register.  One latch pulse then updates every output at once,
//! which is what makes multi-light changes look atomic.
//!
//! A failed pin write is logged and the transfer carries on; the next
//! flush rewrites the whole chain.

use embedded_hal::digital::{OutputPin, PinState};
use log::warn;

use crate::app::ports::OutputPort;
use crate::error::GpioError;
use crate::lights::{Level, Line};

pub struct ShiftRegister<D, C, L, const N: usize> {
    data: D,
    clock: C,
    latch: L,
    staged: [u8; N],
}

impl<D, C, L, const N: usize> ShiftRegister<D, C, L, N>
where
    D: OutputPin,
    C: OutputPin,
    L: OutputPin,
{
    /// Take the three pins and drive every output low.
    pub fn new(data: D, clock: C, latch: L) -> Self {
        let mut sr = Self {
            data,
            clock,
            latch,
            staged: [0; N],
        };
        sr.flush();
        sr
    }

    /// Staged register contents, register 0 first.
    pub fn staged(&self) -> &[u8; N] {
        &self.staged
    }

    fn write_bits(&mut self) -> bool {
        let mut ok = true;
        self.latch_set(PinState::Low, &mut ok);
        for byte in self.staged.iter().rev() {
            for bit in (0..8).rev() {
                let state = PinState::from(byte & (1 << bit) != 0);
                ok &= self.data.set_state(state).is_ok();
                ok &= self.clock.set_high().is_ok();
                ok &= self.clock.set_low().is_ok();
            }
        }
        self.latch_set(PinState::High, &mut ok);
        self.latch_set(PinState::Low, &mut ok);
        ok
    }

    fn latch_set(&mut self, state: PinState, ok: &mut bool) {
        *ok &= self.latch.set_state(state).is_ok();
    }
}

impl<D, C, L, const N: usize> OutputPort for ShiftRegister<D, C, L, N>
where
    D: OutputPin,
    C: OutputPin,
    L: OutputPin,
{
    fn set_no_update(&mut self, line: Line, level: Level) {
        let index = line.index();
        let Some(byte) = self.staged.get_mut(index / 8) else {
            warn!("shift register: {} is beyond a {N}-register chain", line.name());
            return;
        };
        let mask = 1u8 << (index % 8);
        match level {
            Level::On => *byte |= mask,
            Level::Off => *byte &= !mask,
        }
    }

    fn flush(&mut self) {
        if !self.write_bits() {
            warn!("shift register: {}", GpioError::WriteFailed);
        }
    }
}
