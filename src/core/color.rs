//! Color slots and color pairs
//!
//! Color components are stored on the curses 0..=1000 scale. Slots start out
//! with the standard xterm palette; a slot counts as redefined once a program
//! changes it, so renderers can emit it as truecolor.

use serde::{Deserialize, Serialize};

use crate::error::{CursesError, CursesResult};

/// Number of color pairs addressable through the 8-bit color field of an attribute
pub const COLOR_PAIRS: usize = 256;

/// Largest value of a color component
pub const MAX_COMPONENT: i16 = 1000;

/// RGB color on the 0..=1000 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: i16,
    pub g: i16,
    pub b: i16,
}

impl Rgb {
    /// Scale an 8-bit RGB triple to the 0..=1000 range
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        let scale = |v: u8| ((v as i32 * 1000 + 127) / 255) as i16;
        Self {
            r: scale(r),
            g: scale(g),
            b: scale(b),
        }
    }

    /// Scale back to 8-bit components
    pub fn to_rgb8(self) -> (u8, u8, u8) {
        let scale = |v: i16| ((v.clamp(0, MAX_COMPONENT) as i32 * 255 + 500) / 1000) as u8;
        (scale(self.r), scale(self.g), scale(self.b))
    }
}

/// Convert a 256-color index to RGB
/// This implements the standard xterm 256-color palette
pub fn indexed_to_rgb(index: u8) -> (u8, u8, u8) {
    match index {
        // Standard colors (0-15) - using typical xterm defaults
        0 => (0, 0, 0),
        1 => (205, 0, 0),
        2 => (0, 205, 0),
        3 => (205, 205, 0),
        4 => (0, 0, 238),
        5 => (205, 0, 205),
        6 => (0, 205, 205),
        7 => (229, 229, 229),
        8 => (127, 127, 127),
        9 => (255, 0, 0),
        10 => (0, 255, 0),
        11 => (255, 255, 0),
        12 => (92, 92, 255),
        13 => (255, 0, 255),
        14 => (0, 255, 255),
        15 => (255, 255, 255),
        // 216 color cube (16-231)
        16..=231 => {
            let n = index - 16;
            let r = n / 36;
            let g = (n % 36) / 6;
            let b = n % 6;
            let to_rgb = |v: u8| if v == 0 { 0 } else { 55 + v * 40 };
            (to_rgb(r), to_rgb(g), to_rgb(b))
        }
        // Grayscale (232-255)
        232..=255 => {
            let gray = 8 + (index - 232) * 10;
            (gray, gray, gray)
        }
    }
}

/// Foreground/background slot numbers of a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    pub fg: i16,
    pub bg: i16,
}

/// The color subsystem state of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorTable {
    /// Number of color slots the terminal offers (0 = no color support)
    colors: usize,
    /// Whether slots may be redefined
    can_change: bool,
    /// Set by `start`
    started: bool,
    palette: Vec<Rgb>,
    redefined: Vec<bool>,
    pairs: Vec<Pair>,
}

impl ColorTable {
    pub fn new(colors: usize, can_change: bool) -> Self {
        let palette = (0..colors)
            .map(|i| {
                let (r, g, b) = indexed_to_rgb(i.min(255) as u8);
                Rgb::from_rgb8(r, g, b)
            })
            .collect();
        Self {
            colors,
            can_change,
            started: false,
            palette,
            redefined: vec![false; colors],
            pairs: vec![Pair { fg: 7, bg: 0 }; COLOR_PAIRS],
        }
    }

    pub fn has_colors(&self) -> bool {
        self.colors > 0
    }

    pub fn can_change_color(&self) -> bool {
        self.colors > 0 && self.can_change
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn colors(&self) -> usize {
        if self.started {
            self.colors
        } else {
            0
        }
    }

    /// Enable the color subsystem
    pub fn start(&mut self) -> CursesResult<()> {
        if !self.has_colors() {
            return Err(CursesError::ColorsUnsupported);
        }
        self.started = true;
        Ok(())
    }

    /// Redefine slot `slot` to the given 0..=1000 components
    pub fn define_color(&mut self, slot: i16, r: i16, g: i16, b: i16) -> CursesResult<()> {
        self.ensure_started()?;
        if !self.can_change {
            return Err(CursesError::ColorRedefinitionUnsupported);
        }
        let index = self.slot_index(slot)?;
        for component in [r, g, b] {
            if !(0..=MAX_COMPONENT).contains(&component) {
                return Err(CursesError::ComponentOutOfRange(component));
            }
        }
        self.palette[index] = Rgb { r, g, b };
        self.redefined[index] = true;
        Ok(())
    }

    /// Associate pair `pair` with a foreground/background slot combination.
    /// Pair 0 is fixed to the terminal defaults.
    pub fn define_pair(&mut self, pair: i16, fg: i16, bg: i16) -> CursesResult<()> {
        self.ensure_started()?;
        if pair < 1 || pair as usize >= COLOR_PAIRS {
            return Err(CursesError::PairOutOfRange(pair));
        }
        self.slot_index(fg)?;
        self.slot_index(bg)?;
        self.pairs[pair as usize] = Pair { fg, bg };
        Ok(())
    }

    pub fn pair(&self, pair: i16) -> Option<Pair> {
        if pair < 0 {
            return None;
        }
        self.pairs.get(pair as usize).copied()
    }

    pub fn color(&self, slot: i16) -> Option<Rgb> {
        if slot < 0 {
            return None;
        }
        self.palette.get(slot as usize).copied()
    }

    pub fn is_redefined(&self, slot: i16) -> bool {
        slot >= 0 && self.redefined.get(slot as usize).copied().unwrap_or(false)
    }

    fn ensure_started(&self) -> CursesResult<()> {
        if self.started {
            Ok(())
        } else {
            Err(CursesError::ColorsNotStarted)
        }
    }

    fn slot_index(&self, slot: i16) -> CursesResult<usize> {
        if slot < 0 || slot as usize >= self.colors {
            return Err(CursesError::ColorOutOfRange {
                color: slot,
                colors: self.colors,
            });
        }
        Ok(slot as usize)
    }
}
