//! Output/input devices
//!
//! The engine draws into frames and talks to the outside world only through
//! the [`Device`] trait. Two implementations exist:
//! - [`TtyDevice`]: the controlling terminal (termios + escape sequences)
//! - [`HeadlessDevice`]: an in-memory screen with scripted input, used for
//!   tests and for running sessions without a terminal

mod headless;
#[cfg(unix)]
mod tty;

pub use headless::{HeadlessDevice, HeadlessHandle};
#[cfg(unix)]
pub use tty::TtyDevice;

use std::time::Duration;

use crate::config::InputMode;
use crate::core::{ColorTable, Line};
use crate::error::CursesResult;
use crate::mouse::MouseMask;

/// What a device can do, queried once at session start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Number of color slots (0 = no color support)
    pub colors: usize,
    /// Whether color slots may be redefined
    pub can_change_color: bool,
    /// Mouse event categories the device can report
    pub mouse_events: MouseMask,
}

/// Which mouse reports the device should ask the terminal for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseTracking {
    /// No reports
    #[default]
    Off,
    /// Button presses and releases
    Buttons,
    /// Buttons plus motion with or without a button held
    AllMotion,
}

/// A terminal the engine can draw on and read from
pub trait Device {
    /// Terminal size as (columns, rows)
    fn size(&self) -> CursesResult<(usize, usize)>;

    fn capabilities(&self) -> Capabilities;

    /// Apply a line-discipline mode
    fn set_input_mode(&mut self, mode: InputMode) -> CursesResult<()>;

    /// Read one byte, waiting at most `timeout` (`None` waits forever).
    /// Returns `Ok(None)` when nothing arrived in time.
    fn read_byte(&mut self, timeout: Option<Duration>) -> CursesResult<Option<u8>>;

    /// Replace row `row` of the terminal with `line`
    fn write_line(&mut self, row: usize, line: &Line, colors: &ColorTable) -> CursesResult<()>;

    fn move_cursor(&mut self, col: usize, row: usize) -> CursesResult<()>;

    fn set_mouse_tracking(&mut self, tracking: MouseTracking) -> CursesResult<()>;

    /// Push buffered output to the terminal
    fn flush(&mut self) -> CursesResult<()>;

    /// Put the terminal back the way it was found
    fn restore(&mut self) -> CursesResult<()>;
}
