//! Screen Cell
//!
//! Represents a single cell of a window or screen grid: one character and
//! the attribute word (style bits plus color pair) it was written with.

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthChar;

use crate::attr::{Attr, A_CHARTEXT};

/// A single cell in a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// The character in this cell. Blank cells hold a space.
    pub ch: char,
    /// Attribute word (style flags and color pair), never carrying character bits
    pub attr: Attr,
    /// This cell is the second half of a double-width character
    pub wide_continuation: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            attr: 0,
            wide_continuation: false,
        }
    }
}

impl Cell {
    /// Create a new cell with a single character and no attributes
    pub fn new(ch: char) -> Self {
        Self {
            ch,
            ..Default::default()
        }
    }

    /// Create a new cell with a character and an attribute word
    pub fn with_attr(ch: char, attr: Attr) -> Self {
        Self {
            ch,
            attr: attr & !A_CHARTEXT,
            wide_continuation: false,
        }
    }

    /// Placeholder occupying the right half of a wide character
    pub fn continuation(attr: Attr) -> Self {
        Self {
            ch: ' ',
            attr: attr & !A_CHARTEXT,
            wide_continuation: true,
        }
    }

    /// Check if this cell shows nothing (a plain space)
    pub fn is_blank(&self) -> bool {
        self.ch == ' ' && !self.wide_continuation
    }

    /// Display width of the cell content (0 for continuation cells)
    pub fn width(&self) -> usize {
        if self.wide_continuation {
            return 0;
        }
        self.ch.width().unwrap_or(0)
    }

    /// Blank the cell but keep the given attribute word (used by erase operations)
    pub fn erase(&mut self, attr: Attr) {
        self.ch = ' ';
        self.attr = attr & !A_CHARTEXT;
        self.wide_continuation = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::{color_pair, A_BOLD};

    #[test]
    fn test_cell_default() {
        let cell = Cell::default();
        assert!(cell.is_blank());
        assert_eq!(cell.attr, 0);
    }

    #[test]
    fn test_cell_with_attr_strips_character_bits() {
        let cell = Cell::with_attr('A', A_BOLD | 0x41);
        assert_eq!(cell.ch, 'A');
        assert_eq!(cell.attr, A_BOLD);
    }

    #[test]
    fn test_cell_erase_keeps_color() {
        let mut cell = Cell::with_attr('x', A_BOLD | color_pair(2));
        cell.erase(color_pair(2));
        assert!(cell.is_blank());
        assert_eq!(cell.attr, color_pair(2));
    }

    #[test]
    fn test_cell_width() {
        assert_eq!(Cell::new('A').width(), 1);
        assert_eq!(Cell::new('中').width(), 2);
        assert_eq!(Cell::continuation(0).width(), 0);
    }
}
