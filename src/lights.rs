//! Logical output lines of the generator and the light frame model.
//!
//! Every light hangs off the 74HC595 chain; the enum value is the bit
//! position on that chain.  The blue segments must stay contiguous and
//! ascending because the scroll cursor walks them by index.
//!
//! ```text
//!  bit:   0    1     2     3     4     5     6      7      8      9
//!        RED BLUE1 BLUE2 BLUE3 BLUE4 BLUE5 WHITE GREEN  READY  CHARGER
//! ```
//!
//! State handlers never talk to the shift register directly.  They edit a
//! [`LightFrame`] (the desired level of every light) and the service flushes
//! the difference against what is currently shown in a single transfer.

/// Number of blue scroll segments.
pub const BLUE_LIGHT_COUNT: usize = 5;

/// A bit position on the output chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Line {
    Red = 0,
    Blue1 = 1,
    Blue2 = 2,
    Blue3 = 3,
    Blue4 = 4,
    Blue5 = 5,
    White = 6,
    Green = 7,
    Ready = 8,
    /// Relay that simulates a power-bank button press.
    ChargerKey = 9,
}

impl Line {
    /// Total number of lines, used to size output buffers.
    pub const COUNT: usize = 10;

    /// Blue segments in scroll order.
    pub const BLUE: [Line; BLUE_LIGHT_COUNT] = [
        Line::Blue1,
        Line::Blue2,
        Line::Blue3,
        Line::Blue4,
        Line::Blue5,
    ];

    /// Lines that belong to the light frame (everything except the relay).
    pub const LIGHTS: [Line; 9] = [
        Line::Red,
        Line::Blue1,
        Line::Blue2,
        Line::Blue3,
        Line::Blue4,
        Line::Blue5,
        Line::White,
        Line::Green,
        Line::Ready,
    ];

    /// Bit position on the shift-register chain.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Single-bit mask for this line.
    pub const fn mask(self) -> u16 {
        1 << (self as u16)
    }

    pub fn is_blue(self) -> bool {
        matches!(
            self,
            Line::Blue1 | Line::Blue2 | Line::Blue3 | Line::Blue4 | Line::Blue5
        )
    }

    /// The blue segment after `self`, wrapping BLUE5 back to BLUE1.
    /// A non-blue line maps to BLUE1 so the cursor can never leave the range.
    pub fn next_blue(self) -> Line {
        match self {
            Line::Blue1 => Line::Blue2,
            Line::Blue2 => Line::Blue3,
            Line::Blue3 => Line::Blue4,
            Line::Blue4 => Line::Blue5,
            _ => Line::Blue1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Line::Red => "red",
            Line::Blue1 => "blue1",
            Line::Blue2 => "blue2",
            Line::Blue3 => "blue3",
            Line::Blue4 => "blue4",
            Line::Blue5 => "blue5",
            Line::White => "white",
            Line::Green => "green",
            Line::Ready => "ready",
            Line::ChargerKey => "charger-key",
        }
    }
}

/// Electrical level of an output line.  `On` drives the bit high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Off,
    On,
}

impl Level {
    pub fn is_on(self) -> bool {
        self == Level::On
    }
}

impl From<bool> for Level {
    fn from(on: bool) -> Self {
        if on { Level::On } else { Level::Off }
    }
}

// ---------------------------------------------------------------------------
// LightFrame
// ---------------------------------------------------------------------------

/// Desired level of every light, one bit per [`Line`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LightFrame(u16);

impl LightFrame {
    /// Every light off.
    pub const DARK: LightFrame = LightFrame(0);

    const LIGHT_MASK: u16 = (1 << 9) - 1;
    const BLUE_MASK: u16 = 0b0011_1110;

    pub fn from_bits(bits: u16) -> Self {
        Self(bits & Self::LIGHT_MASK)
    }

    pub fn bits(self) -> u16 {
        self.0
    }

    /// Set a single light.  The charger relay is not part of the frame and
    /// is ignored here.
    pub fn set(&mut self, line: Line, level: Level) {
        if line == Line::ChargerKey {
            return;
        }
        match level {
            Level::On => self.0 |= line.mask(),
            Level::Off => self.0 &= !line.mask(),
        }
    }

    pub fn level(self, line: Line) -> Level {
        Level::from(self.0 & line.mask() != 0)
    }

    pub fn is_on(self, line: Line) -> bool {
        self.level(line).is_on()
    }

    pub fn blue_off(&mut self) {
        self.0 &= !Self::BLUE_MASK;
    }

    /// Light the first `count` blue segments and clear the rest.
    pub fn show_blue_level(&mut self, count: u8) {
        self.blue_off();
        for line in Line::BLUE.iter().take(count as usize) {
            self.set(*line, Level::On);
        }
    }

    /// Blue segments currently lit, in scroll order.
    pub fn lit_blue(self) -> impl Iterator<Item = Line> {
        Line::BLUE.into_iter().filter(move |l| self.is_on(*l))
    }

    /// Lines whose level in `self` differs from `shown`, paired with the
    /// level `self` wants.
    pub fn changes_from(self, shown: LightFrame) -> impl Iterator<Item = (Line, Level)> {
        let diff = self.0 ^ shown.0;
        Line::LIGHTS
            .into_iter()
            .filter(move |l| diff & l.mask() != 0)
            .map(move |l| (l, self.level(l)))
    }
}
