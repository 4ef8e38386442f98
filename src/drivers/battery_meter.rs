//! Battery level meter on the blue lights.
//!
//! The battery voltage is read through a divider on an ADC pin and scaled
//! to 10-bit counts.  Between the calibrated empty and full readings the
//! span is split into five bands, one per blue segment:
//!
//! ```text
//!  raw:   ≤min ─────────────────────────────────────────── ≥max
//!  level:  0   │  1  │  2  │  3  │  4  │  5
//! ```
//!
//! Any reading above `min` lights at least one segment.  The meter only
//! runs while the generator is OFF with no special mode selected, and only
//! while its activation button is active.

use log::debug;

use crate::config::GeneratorConfig;
use crate::lights::{BLUE_LIGHT_COUNT, LightFrame};
use crate::timer::SoftTimer;

/// A displayed battery reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryReading {
    pub raw: u16,
    /// Lit blue segments, 0..=5.
    pub level: u8,
}

pub struct BatteryMeter {
    min_reading: u16,
    max_reading: u16,
    refresh: SoftTimer,
    showing: bool,
}

impl BatteryMeter {
    pub fn new(min_reading: u16, max_reading: u16, refresh_ms: u32) -> Self {
        Self {
            min_reading,
            max_reading,
            refresh: SoftTimer::new(refresh_ms),
            showing: false,
        }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(
            config.battery_min_reading,
            config.battery_max_reading,
            config.battery_refresh_ms,
        )
    }

    /// Number of segments for a raw reading, rounded up and clamped.
    pub fn level_for(&self, raw: u16) -> u8 {
        let span = u32::from(self.max_reading.saturating_sub(self.min_reading));
        if span == 0 {
            return if raw > self.min_reading { BLUE_LIGHT_COUNT as u8 } else { 0 };
        }
        let above = u32::from(raw.saturating_sub(self.min_reading)).min(span);
        let bands = BLUE_LIGHT_COUNT as u32;
        ((bands * above).div_ceil(span)) as u8
    }

    /// Per-poll update.  While `requested`, the level is shown and
    /// refreshed every refresh period; once released, the blue lights are
    /// cleared.  Returns the reading when a new one was displayed.
    pub fn update(
        &mut self,
        requested: bool,
        now_ms: u32,
        read_raw: impl FnOnce() -> u16,
        frame: &mut LightFrame,
    ) -> Option<BatteryReading> {
        if requested {
            if !self.showing || self.refresh.has_timed_out(now_ms) {
                return Some(self.update_now(read_raw(), now_ms, frame));
            }
        } else if self.showing {
            frame.blue_off();
            self.showing = false;
            debug!("battery meter: hidden");
        }
        None
    }

    /// Show `raw` immediately and restart the refresh period.
    pub fn update_now(&mut self, raw: u16, now_ms: u32, frame: &mut LightFrame) -> BatteryReading {
        let level = self.level_for(raw);
        frame.show_blue_level(level);
        self.refresh.reset(now_ms);
        self.showing = true;
        debug!("battery meter: raw {raw}, level {level}");
        BatteryReading { raw, level }
    }

    /// Forget the displayed level.  The lights are left to the caller.
    pub fn reset(&mut self) {
        self.showing = false;
    }

    pub fn is_showing(&self) -> bool {
        self.showing
    }
}
