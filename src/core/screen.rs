//! Screen frame
//!
//! A screen-sized grid with per-line dirty tracking and a cursor. The engine
//! keeps two of them: the staged frame that window refreshes copy into, and
//! the frame last committed to the device.

use serde::{Deserialize, Serialize};

use super::cursor::Cursor;
use super::grid::Grid;
use super::line::Line;

/// A full-screen frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Screen {
    /// Frame contents
    grid: Grid,
    /// Cursor position on the frame
    cursor: Cursor,
    /// Dirty lines bitmap (lines staged since the last commit)
    dirty_lines: Vec<bool>,
}

impl Screen {
    /// Create a new blank screen with the given dimensions
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            grid: Grid::new(cols, rows),
            cursor: Cursor::new(),
            dirty_lines: vec![false; rows],
        }
    }

    /// Get the number of columns
    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    /// Get the number of rows
    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn line(&self, row: usize) -> Option<&Line> {
        self.grid.line(row)
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Place the cursor, clamped to the frame
    pub fn set_cursor(&mut self, col: usize, row: usize) {
        let (cols, rows) = (self.cols(), self.rows());
        self.cursor.move_to(col, row, cols, rows);
    }

    /// Copy `len` cells of `src` (from `src_col`) onto row `row` at `col`.
    /// The row turns dirty only if a cell changed.
    pub fn stage_cells(&mut self, row: usize, col: usize, src: &Line, src_col: usize, len: usize) {
        if let Some(line) = self.grid.line_mut(row) {
            if line.copy_from(col, src, src_col, len) {
                self.dirty_lines[row] = true;
            }
        }
    }

    /// Overwrite a whole row
    pub fn replace_line(&mut self, row: usize, line: &Line) {
        if let Some(dst) = self.grid.line_mut(row) {
            dst.copy_from(0, line, 0, line.cols());
        }
    }

    pub fn is_dirty(&self, row: usize) -> bool {
        self.dirty_lines.get(row).copied().unwrap_or(false)
    }

    /// Check if any line was staged since the last commit
    pub fn has_dirty_lines(&self) -> bool {
        self.dirty_lines.iter().any(|&d| d)
    }

    pub fn clear_dirty(&mut self) {
        self.dirty_lines.fill(false);
    }

    /// Text of a single row, trailing blanks trimmed
    pub fn row_text(&self, row: usize) -> String {
        self.grid.line(row).map(Line::text).unwrap_or_default()
    }

    /// Full screen text, one line per row
    pub fn text(&self) -> String {
        self.grid.text().join("\n")
    }
}
