//! Deterministic snapshot generation
//!
//! Snapshots capture what a screen frame shows in a serializable format for
//! testing and debugging. Given the same drawing calls, a headless session
//! must produce identical snapshots.

use serde::{Deserialize, Serialize};

use super::cell::Cell;
use super::screen::Screen;
use crate::attr::Attr;

/// A complete snapshot of a screen frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Screen dimensions
    pub cols: usize,
    pub rows: usize,
    /// Row text, trailing blanks trimmed
    pub lines: Vec<String>,
    /// Visible grid content (row-major)
    pub grid: Vec<Vec<CellSnapshot>>,
    /// Cursor position
    pub cursor: CursorSnapshot,
}

/// Snapshot of a single cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSnapshot {
    /// Character content
    pub ch: char,
    /// Attribute word
    pub attr: Attr,
    /// Cell width (0 for continuation, 1 normal, 2 wide)
    pub width: u8,
}

/// Snapshot of the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorSnapshot {
    pub row: usize,
    pub col: usize,
}

impl From<&Cell> for CellSnapshot {
    fn from(cell: &Cell) -> Self {
        Self {
            ch: cell.ch,
            attr: cell.attr,
            width: cell.width() as u8,
        }
    }
}

impl Snapshot {
    /// Create a snapshot from a screen frame
    pub fn from_screen(screen: &Screen) -> Self {
        let rows = screen.rows();
        let grid = (0..rows)
            .map(|row| {
                screen
                    .line(row)
                    .map(|line| line.cells().iter().map(CellSnapshot::from).collect())
                    .unwrap_or_default()
            })
            .collect();
        let lines = (0..rows).map(|row| screen.row_text(row)).collect();

        Self {
            cols: screen.cols(),
            rows,
            lines,
            grid,
            cursor: CursorSnapshot {
                row: screen.cursor().row,
                col: screen.cursor().col,
            },
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Plain text of the whole frame
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }

    /// The cell at (col, row), if in range
    pub fn cell(&self, col: usize, row: usize) -> Option<&CellSnapshot> {
        self.grid.get(row).and_then(|line| line.get(col))
    }

    /// Compare content with another snapshot, ignoring the cursor
    pub fn content_equals(&self, other: &Snapshot) -> bool {
        self.cols == other.cols && self.rows == other.rows && self.grid == other.grid
    }
}
