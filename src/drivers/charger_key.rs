//! Power-bank keep-alive relay.
//!
//! Some USB power banks switch off when the load is too small.  The relay
//! on the last output bit is wired across the bank's button; pressing it
//! briefly at a fixed interval keeps the bank awake.
//!
//! ```text
//!  begin ─[startup delay]─▶ press ─[pulse]─▶ release ─[idle]─▶ press ...
//! ```

use crate::config::GeneratorConfig;
use crate::lights::Level;
use crate::timer::SoftTimer;

pub struct ChargerKey {
    enabled: bool,
    active: bool,
    timer: SoftTimer,
    pulse_ms: u32,
    idle_ms: u32,
    startup_delay_ms: u32,
}

impl ChargerKey {
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self {
            enabled: config.use_charger_key,
            active: false,
            timer: SoftTimer::new(config.startup_charger_delay_ms),
            pulse_ms: config.charger_pulse_ms,
            idle_ms: config.charger_idle_ms,
            startup_delay_ms: config.startup_charger_delay_ms,
        }
    }

    /// Release the key and schedule the first press.
    pub fn arm(&mut self, now_ms: u32) {
        self.active = false;
        self.timer.restart(self.startup_delay_ms, now_ms);
    }

    pub fn is_due(&self, now_ms: u32) -> bool {
        self.enabled && self.timer.has_timed_out(now_ms)
    }

    /// Flip the key and re-arm: the short pulse period after a press, the
    /// long idle period after a release.  Returns the new relay level.
    pub fn pulse(&mut self, now_ms: u32) -> Level {
        self.active = !self.active;
        let period = if self.active { self.pulse_ms } else { self.idle_ms };
        self.timer.restart(period, now_ms);
        Level::from(self.active)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Period until the next flip.
    pub fn period_ms(&self) -> u32 {
        self.timer.timeout()
    }
}
