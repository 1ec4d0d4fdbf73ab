//! Grid line representation
//!
//! A line is one row of cells in a window buffer or screen frame.

use serde::{Deserialize, Serialize};

use super::cell::Cell;
use crate::attr::Attr;

/// A row of cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// The cells in this line
    cells: Vec<Cell>,
}

impl Line {
    /// Create a new blank line with the specified number of columns
    pub fn new(cols: usize) -> Self {
        Self {
            cells: vec![Cell::default(); cols],
        }
    }

    /// Get the number of columns in this line
    pub fn cols(&self) -> usize {
        self.cells.len()
    }

    /// Get a reference to a cell at the given column
    pub fn cell(&self, col: usize) -> Option<&Cell> {
        self.cells.get(col)
    }

    /// Get a mutable reference to a cell at the given column
    pub fn cell_mut(&mut self, col: usize) -> Option<&mut Cell> {
        self.cells.get_mut(col)
    }

    /// Get all cells
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Erase cells in `start..end` (end exclusive, clamped to the line),
    /// keeping the given attribute word on the blanks
    pub fn erase_range(&mut self, start: usize, end: usize, attr: Attr) {
        let end = end.min(self.cells.len());
        for cell in self.cells.iter_mut().take(end).skip(start) {
            cell.erase(attr);
        }
    }

    /// Copy `len` cells from `src` starting at `src_col` into this line at `dst_col`.
    /// Returns true if any cell changed.
    pub fn copy_from(&mut self, dst_col: usize, src: &Line, src_col: usize, len: usize) -> bool {
        let mut changed = false;
        for i in 0..len {
            let (Some(from), Some(to)) = (src.cell(src_col + i), self.cells.get_mut(dst_col + i))
            else {
                break;
            };
            if to != from {
                *to = *from;
                changed = true;
            }
        }
        changed
    }

    /// Get the text content of this line, trailing blanks trimmed
    pub fn text(&self) -> String {
        let mut result: String = self
            .cells
            .iter()
            .filter(|cell| !cell.wide_continuation)
            .map(|cell| cell.ch)
            .collect();
        let trimmed = result.trim_end().len();
        result.truncate(trimmed);
        result
    }

    /// Text of the cells in `start..end`, untrimmed
    pub fn text_range(&self, start: usize, end: usize) -> String {
        let end = end.min(self.cells.len());
        self.cells
            .iter()
            .take(end)
            .skip(start)
            .filter(|cell| !cell.wide_continuation)
            .map(|cell| cell.ch)
            .collect()
    }

    /// Check if every cell is blank
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Cell::is_blank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alphabet_line(cols: usize) -> Line {
        let mut line = Line::new(cols);
        for i in 0..cols {
            *line.cell_mut(i).unwrap() = Cell::new((b'A' + i as u8) as char);
        }
        line
    }

    #[test]
    fn test_line_new() {
        let line = Line::new(80);
        assert_eq!(line.cols(), 80);
        assert!(line.is_blank());
    }

    #[test]
    fn test_line_cell_access() {
        let mut line = Line::new(10);
        line.cell_mut(5).unwrap().ch = 'X';
        assert_eq!(line.cell(5).unwrap().ch, 'X');
        assert!(line.cell(10).is_none());
    }

    #[test]
    fn test_line_erase_range() {
        let mut line = alphabet_line(10);
        line.erase_range(5, 100, 0);
        assert_eq!(line.text(), "ABCDE");
        assert!(line.cell(9).unwrap().is_blank());
    }

    #[test]
    fn test_line_copy_from_reports_changes() {
        let src = alphabet_line(10);
        let mut dst = Line::new(10);
        assert!(dst.copy_from(2, &src, 0, 3));
        assert_eq!(dst.text(), "  ABC");
        assert!(!dst.copy_from(2, &src, 0, 3));
    }

    #[test]
    fn test_line_text_skips_continuations() {
        let mut line = Line::new(6);
        *line.cell_mut(0).unwrap() = Cell::new('中');
        *line.cell_mut(1).unwrap() = Cell::continuation(0);
        *line.cell_mut(2).unwrap() = Cell::new('x');
        assert_eq!(line.text(), "中x");
    }

    #[test]
    fn test_line_text_range() {
        let line = alphabet_line(10);
        assert_eq!(line.text_range(2, 5), "CDE");
    }
}
