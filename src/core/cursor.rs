//! Cursor state management
//!
//! Each window tracks its own cursor in window-relative (row, col) order.

use serde::{Deserialize, Serialize};

/// Cursor position inside a window or screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// Column position (0-indexed)
    pub col: usize,
    /// Row position (0-indexed)
    pub row: usize,
    /// Set after a character landed in the bottom-right cell; the next
    /// character has nowhere to go
    pub pending_wrap: bool,
}

impl Cursor {
    /// Create a new cursor at the home position
    pub fn new() -> Self {
        Self::default()
    }

    /// Move cursor to absolute position, clamping to bounds
    pub fn move_to(&mut self, col: usize, row: usize, cols: usize, rows: usize) {
        self.col = col.min(cols.saturating_sub(1));
        self.row = row.min(rows.saturating_sub(1));
        self.pending_wrap = false;
    }

    /// Move cursor left by n columns, stopping at column 0
    pub fn move_left(&mut self, n: usize) {
        self.col = self.col.saturating_sub(n);
        self.pending_wrap = false;
    }

    /// Carriage return - move to column 0
    pub fn carriage_return(&mut self) {
        self.col = 0;
        self.pending_wrap = false;
    }

    /// Advance past a cell of the given width. Wraps onto the next row at the
    /// right edge; returns false when the bottom-right cell was just filled.
    pub fn advance(&mut self, width: usize, cols: usize, rows: usize) -> bool {
        if self.col + width < cols {
            self.col += width;
            return true;
        }
        if self.row + 1 < rows {
            self.row += 1;
            self.col = 0;
            return true;
        }
        self.col = cols.saturating_sub(1);
        self.pending_wrap = true;
        false
    }

    /// Move to the start of the next row; returns false on the last row
    pub fn next_line(&mut self, rows: usize) -> bool {
        if self.row + 1 < rows {
            self.row += 1;
            self.col = 0;
            self.pending_wrap = false;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_default() {
        let cursor = Cursor::default();
        assert_eq!(cursor.col, 0);
        assert_eq!(cursor.row, 0);
        assert!(!cursor.pending_wrap);
    }

    #[test]
    fn test_cursor_move_to() {
        let mut cursor = Cursor::new();
        cursor.move_to(5, 10, 80, 24);
        assert_eq!(cursor.col, 5);
        assert_eq!(cursor.row, 10);

        // Test clamping
        cursor.move_to(100, 50, 80, 24);
        assert_eq!(cursor.col, 79);
        assert_eq!(cursor.row, 23);
    }

    #[test]
    fn test_cursor_advance_wraps() {
        let mut cursor = Cursor::new();
        cursor.move_to(9, 0, 10, 2);
        assert!(cursor.advance(1, 10, 2));
        assert_eq!((cursor.col, cursor.row), (0, 1));
    }

    #[test]
    fn test_cursor_advance_stops_at_bottom_right() {
        let mut cursor = Cursor::new();
        cursor.move_to(9, 1, 10, 2);
        assert!(!cursor.advance(1, 10, 2));
        assert_eq!((cursor.col, cursor.row), (9, 1));
        assert!(cursor.pending_wrap);

        cursor.carriage_return();
        assert!(!cursor.pending_wrap);
    }

    #[test]
    fn test_cursor_next_line() {
        let mut cursor = Cursor::new();
        cursor.move_to(4, 0, 10, 2);
        assert!(cursor.next_line(2));
        assert_eq!((cursor.col, cursor.row), (0, 1));
        assert!(!cursor.next_line(2));
    }

    #[test]
    fn test_cursor_move_left() {
        let mut cursor = Cursor::new();
        cursor.move_to(3, 0, 10, 2);
        cursor.move_left(10);
        assert_eq!(cursor.col, 0);
    }
}
