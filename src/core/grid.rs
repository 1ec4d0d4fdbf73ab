//! Cell Grid
//!
//! A 2D grid of cells. Top-level windows own one grid each; derived windows
//! address a rectangle inside their ancestor's grid.

use serde::{Deserialize, Serialize};

use super::cell::Cell;
use super::line::Line;

/// A 2D array of cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    /// The lines in the grid
    lines: Vec<Line>,
    /// Number of columns
    cols: usize,
}

impl Grid {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            lines: (0..rows).map(|_| Line::new(cols)).collect(),
            cols,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, row: usize) -> Option<&Line> {
        self.lines.get(row)
    }

    pub fn line_mut(&mut self, row: usize) -> Option<&mut Line> {
        self.lines.get_mut(row)
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<&Cell> {
        self.lines.get(row).and_then(|line| line.cell(col))
    }

    pub fn cell_mut(&mut self, col: usize, row: usize) -> Option<&mut Cell> {
        self.lines.get_mut(row).and_then(|line| line.cell_mut(col))
    }

    /// Replace the cell at (col, row). Out-of-range writes are ignored.
    pub fn set_cell(&mut self, col: usize, row: usize, cell: Cell) {
        if let Some(slot) = self.cell_mut(col, row) {
            *slot = cell;
        }
    }

    /// Text of every line, trailing blanks trimmed
    pub fn text(&self) -> Vec<String> {
        self.lines.iter().map(Line::text).collect()
    }
}
