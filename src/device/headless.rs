//! In-memory device
//!
//! Committed lines land in a [`Screen`] instead of a terminal, and input is
//! whatever the test pushed through the [`HeadlessHandle`]. Reads never
//! block: an empty queue reads as "nothing arrived in time".

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use super::{Capabilities, Device, MouseTracking};
use crate::config::{HeadlessConfig, InputMode};
use crate::core::{ColorTable, Line, Screen, Snapshot};
use crate::error::CursesResult;

#[derive(Debug)]
struct HeadlessState {
    screen: Screen,
    capabilities: Capabilities,
    input: VecDeque<u8>,
    input_mode: InputMode,
    mouse_tracking: MouseTracking,
    lines_written: usize,
    flush_count: usize,
    restored: bool,
}

/// Device half, owned by the engine
#[derive(Debug)]
pub struct HeadlessDevice {
    state: Rc<RefCell<HeadlessState>>,
}

/// Observer half, kept by the caller to feed input and inspect output
#[derive(Debug, Clone)]
pub struct HeadlessHandle {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessDevice {
    /// Create a device and the handle observing it
    pub fn new(config: &HeadlessConfig) -> (Self, HeadlessHandle) {
        let state = Rc::new(RefCell::new(HeadlessState {
            screen: Screen::new(config.cols, config.rows),
            capabilities: Capabilities {
                colors: config.colors,
                can_change_color: config.can_change_color,
                mouse_events: config.mouse_events,
            },
            input: VecDeque::new(),
            input_mode: InputMode::default(),
            mouse_tracking: MouseTracking::Off,
            lines_written: 0,
            flush_count: 0,
            restored: false,
        }));
        let handle = HeadlessHandle {
            state: Rc::clone(&state),
        };
        (Self { state }, handle)
    }
}

impl Device for HeadlessDevice {
    fn size(&self) -> CursesResult<(usize, usize)> {
        let state = self.state.borrow();
        Ok((state.screen.cols(), state.screen.rows()))
    }

    fn capabilities(&self) -> Capabilities {
        self.state.borrow().capabilities
    }

    fn set_input_mode(&mut self, mode: InputMode) -> CursesResult<()> {
        self.state.borrow_mut().input_mode = mode;
        Ok(())
    }

    fn read_byte(&mut self, _timeout: Option<Duration>) -> CursesResult<Option<u8>> {
        Ok(self.state.borrow_mut().input.pop_front())
    }

    fn write_line(&mut self, row: usize, line: &Line, _colors: &ColorTable) -> CursesResult<()> {
        let mut state = self.state.borrow_mut();
        state.screen.replace_line(row, line);
        state.lines_written += 1;
        Ok(())
    }

    fn move_cursor(&mut self, col: usize, row: usize) -> CursesResult<()> {
        self.state.borrow_mut().screen.set_cursor(col, row);
        Ok(())
    }

    fn set_mouse_tracking(&mut self, tracking: MouseTracking) -> CursesResult<()> {
        self.state.borrow_mut().mouse_tracking = tracking;
        Ok(())
    }

    fn flush(&mut self) -> CursesResult<()> {
        self.state.borrow_mut().flush_count += 1;
        Ok(())
    }

    fn restore(&mut self) -> CursesResult<()> {
        let mut state = self.state.borrow_mut();
        state.restored = true;
        state.mouse_tracking = MouseTracking::Off;
        Ok(())
    }
}

impl HeadlessHandle {
    /// Queue raw input bytes
    pub fn push_input(&self, bytes: &[u8]) {
        self.state.borrow_mut().input.extend(bytes.iter().copied());
    }

    /// Queue a string as input
    pub fn push_str(&self, text: &str) {
        self.push_input(text.as_bytes());
    }

    /// Number of queued bytes not yet read
    pub fn pending_input(&self) -> usize {
        self.state.borrow().input.len()
    }

    /// Snapshot of what has been committed so far
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_screen(&self.state.borrow().screen)
    }

    /// Committed text of one row, trailing blanks trimmed
    pub fn row_text(&self, row: usize) -> String {
        self.state.borrow().screen.row_text(row)
    }

    /// Committed cursor position as (column, row)
    pub fn cursor(&self) -> (usize, usize) {
        let state = self.state.borrow();
        let cursor = state.screen.cursor();
        (cursor.col, cursor.row)
    }

    pub fn input_mode(&self) -> InputMode {
        self.state.borrow().input_mode
    }

    pub fn mouse_tracking(&self) -> MouseTracking {
        self.state.borrow().mouse_tracking
    }

    /// Total rows written by commits
    pub fn lines_written(&self) -> usize {
        self.state.borrow().lines_written
    }

    pub fn flush_count(&self) -> usize {
        self.state.borrow().flush_count
    }

    /// Whether the session restored the device on shutdown
    pub fn is_restored(&self) -> bool {
        self.state.borrow().restored
    }
}
