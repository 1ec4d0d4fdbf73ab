//! Screen Core Module
//!
//! Platform-independent character-cell model shared by the engine and the
//! devices. This module contains:
//! - Cell representation with attribute words
//! - Lines and grids backing window contents
//! - Cursor state and positioning
//! - Screen frames with dirty-line tracking
//! - Color slots and pairs
//! - Deterministic snapshot generation
//!
//! The core is completely deterministic: the same sequence of drawing calls
//! always produces the same frames.

mod cell;
mod color;
mod cursor;
mod grid;
mod line;
mod screen;
mod snapshot;

pub use cell::Cell;
pub use color::{indexed_to_rgb, ColorTable, Pair, Rgb, COLOR_PAIRS, MAX_COMPONENT};
pub use cursor::Cursor;
pub use grid::Grid;
pub use line::Line;
pub use screen::Screen;
pub use snapshot::{CellSnapshot, CursorSnapshot, Snapshot};
