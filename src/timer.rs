//! Non-blocking software timer.
//!
//! A [`SoftTimer`] is a restartable countdown measured against a free-running
//! millisecond tick.  It never sleeps: the poll loop asks
//! [`has_timed_out`](SoftTimer::has_timed_out) once per iteration and re-arms
//! the timer when it acts on the timeout.
//!
//! Elapsed time is computed with `wrapping_sub`, so a tick counter rolling
//! over `u32::MAX` (about 49.7 days of uptime) does not produce a spurious
//! or missed timeout.  The only requirement is that a timer is checked at
//! least once per half-range (~24.8 days) after it is reset.

/// Restartable countdown: a duration plus the tick at which it was last reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoftTimer {
    timeout_ms: u32,
    started_ms: u32,
}

impl SoftTimer {
    /// Create a timer with the given duration, epoch at tick 0.
    pub const fn new(timeout_ms: u32) -> Self {
        Self {
            timeout_ms,
            started_ms: 0,
        }
    }

    /// Change the duration.  Does not move the epoch; call [`reset`](Self::reset)
    /// to restart the countdown.
    pub fn set_timeout(&mut self, timeout_ms: u32) {
        self.timeout_ms = timeout_ms;
    }

    /// Current duration in milliseconds.
    pub fn timeout(&self) -> u32 {
        self.timeout_ms
    }

    /// Restart the countdown from `now_ms`.
    pub fn reset(&mut self, now_ms: u32) {
        self.started_ms = now_ms;
    }

    /// Arm with a new duration and restart from `now_ms` in one step.
    pub fn restart(&mut self, timeout_ms: u32, now_ms: u32) {
        self.timeout_ms = timeout_ms;
        self.started_ms = now_ms;
    }

    /// Milliseconds since the last reset (modular).
    pub fn elapsed(&self, now_ms: u32) -> u32 {
        now_ms.wrapping_sub(self.started_ms)
    }

    /// Milliseconds left before the timeout, zero once expired.
    pub fn remaining(&self, now_ms: u32) -> u32 {
        self.timeout_ms.saturating_sub(self.elapsed(now_ms))
    }

    /// `true` once the duration has elapsed.  Pure query: keeps returning
    /// `true` until the timer is reset.
    pub fn has_timed_out(&self, now_ms: u32) -> bool {
        self.elapsed(now_ms) >= self.timeout_ms
    }
}
