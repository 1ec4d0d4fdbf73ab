//! Window handles
//!
//! A [`Window`] is a move-only handle to a rectangular surface in the
//! engine's window table. Coordinates are always (x, y): x counts columns to
//! the right and y counts rows down from the window's top-left corner.
//!
//! Dropping a window releases it. [`Window::destroy`] blanks the window first
//! and consumes the handle, so a destroyed window cannot be used again.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::attr::{self, Attr};
use crate::engine::Engine;
use crate::error::CursesResult;

/// Identifier of a window in the engine's live-window table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(u64);

impl WindowId {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A character-cell window
pub struct Window {
    engine: Rc<RefCell<Engine>>,
    id: WindowId,
    released: bool,
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.id)
            .field("released", &self.released)
            .finish()
    }
}

impl Window {
    pub(crate) fn new(engine: Rc<RefCell<Engine>>, id: WindowId) -> Self {
        Self {
            engine,
            id,
            released: false,
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    /// Create a window of `height` rows and `width` columns whose top-left
    /// corner is at (x, y) inside this one. The child shares this window's
    /// cells. A zero size extends the child to this window's edge.
    ///
    /// This window is marked for a full redraw first, so its next refresh
    /// restages everything around the new child.
    pub fn create_child(&self, height: usize, width: usize, x: usize, y: usize) -> CursesResult<Window> {
        let id = self
            .engine
            .borrow_mut()
            .derive_window(self.id, height, width, x, y)?;
        Ok(Window::new(Rc::clone(&self.engine), id))
    }

    /// Blank the window, then release it
    pub fn destroy(mut self) -> CursesResult<()> {
        let mut engine = self.engine.borrow_mut();
        let result = engine.erase(self.id).and_then(|()| engine.delete_window(self.id));
        drop(engine);
        self.released = true;
        result
    }

    /// Mark every line changed so the next refresh restages the whole window
    pub fn mark_dirty(&self) -> CursesResult<()> {
        self.engine.borrow_mut().touch_window(self.id)
    }

    /// Whether the window has changes its next refresh would stage
    pub fn is_touched(&self) -> CursesResult<bool> {
        Ok(self.engine.borrow().window(self.id)?.is_touched())
    }

    pub fn is_line_touched(&self, y: usize) -> CursesResult<bool> {
        Ok(self.engine.borrow().window(self.id)?.is_line_touched(y))
    }

    /// Stage pending changes for the next [`Session::commit_all`](crate::Session::commit_all)
    pub fn refresh(&self) -> CursesResult<()> {
        self.engine.borrow_mut().stage(self.id)
    }

    /// Move the cursor, clamped to the window
    pub fn move_to(&self, x: usize, y: usize) -> CursesResult<()> {
        self.engine.borrow_mut().move_cursor(self.id, x, y)
    }

    /// Write text at the cursor. Text wraps at the right edge; anything past
    /// the bottom-right cell is dropped with a `WriteOverflow` error.
    pub fn write(&self, text: &str) -> CursesResult<()> {
        self.engine.borrow_mut().write_str(self.id, text)
    }

    pub fn write_at(&self, x: usize, y: usize, text: &str) -> CursesResult<()> {
        let mut engine = self.engine.borrow_mut();
        engine.move_cursor(self.id, x, y)?;
        engine.write_str(self.id, text)
    }

    /// Write text, then clear to the end of the line
    pub fn write_line(&self, text: &str) -> CursesResult<()> {
        let mut engine = self.engine.borrow_mut();
        engine.write_str(self.id, text)?;
        engine.clear_to_eol(self.id)
    }

    pub fn write_line_at(&self, x: usize, y: usize, text: &str) -> CursesResult<()> {
        let mut engine = self.engine.borrow_mut();
        engine.move_cursor(self.id, x, y)?;
        engine.write_str(self.id, text)?;
        engine.clear_to_eol(self.id)
    }

    /// Clear the cursor's whole row, leaving the cursor at its start
    pub fn clear_line(&self) -> CursesResult<()> {
        let mut engine = self.engine.borrow_mut();
        let row = engine.window(self.id)?.cursor().row;
        engine.move_cursor(self.id, 0, row)?;
        engine.clear_to_eol(self.id)
    }

    pub fn clear_to_end_of_line(&self) -> CursesResult<()> {
        self.engine.borrow_mut().clear_to_eol(self.id)
    }

    /// Blank the window. The cursor and attributes are unchanged, and the
    /// next refresh repaints the whole screen.
    pub fn clear(&self) -> CursesResult<()> {
        self.engine.borrow_mut().clear(self.id)
    }

    /// Read one character or key code. Returns [`ERR`](crate::key::ERR)
    /// when a half-delay read times out or the input ends.
    pub fn read_char(&self) -> CursesResult<i32> {
        self.engine.borrow_mut().read_char(self.id)
    }

    /// Read a line, without its terminator. A half-delay timeout or the end
    /// of input also ends the line, so the text read so far is returned
    /// (possibly empty). Callers that need to tell the two apart should read
    /// with [`read_char`](Self::read_char) and watch for `ERR`.
    pub fn read_line(&self) -> CursesResult<String> {
        self.engine.borrow_mut().read_line(self.id)
    }

    /// Cursor position as (x, y)
    pub fn cursor_position(&self) -> CursesResult<(usize, usize)> {
        let engine = self.engine.borrow();
        let cursor = engine.window(self.id)?.cursor();
        Ok((cursor.col, cursor.row))
    }

    /// Size as (width, height)
    pub fn bounds(&self) -> CursesResult<(usize, usize)> {
        let engine = self.engine.borrow();
        let win = engine.window(self.id)?;
        Ok((win.cols(), win.rows()))
    }

    /// Screen position of the top-left corner as (x, y)
    pub fn origin(&self) -> CursesResult<(usize, usize)> {
        Ok(self.engine.borrow().window(self.id)?.origin())
    }

    /// Whether the screen cell (x, y) lies inside this window (ncurses `wenclose`)
    pub fn encloses(&self, x: usize, y: usize) -> CursesResult<bool> {
        Ok(self.to_local(x, y)?.is_some())
    }

    /// Convert screen coordinates to window coordinates, `None` when the
    /// cell is outside the window (ncurses `wmouse_trafo`)
    pub fn to_local(&self, x: usize, y: usize) -> CursesResult<Option<(usize, usize)>> {
        let engine = self.engine.borrow();
        let win = engine.window(self.id)?;
        let (ox, oy) = win.origin();
        if x < ox || y < oy || x - ox >= win.cols() || y - oy >= win.rows() {
            return Ok(None);
        }
        Ok(Some((x - ox, y - oy)))
    }

    /// Replace the attribute word applied to text written from now on
    pub fn set_attribute(&self, flags: Attr) -> CursesResult<()> {
        self.engine.borrow_mut().set_attr(self.id, flags & !attr::A_CHARTEXT)
    }

    /// Add attributes. A color pair in `flags` replaces the current pair.
    pub fn enable_attribute(&self, flags: Attr) -> CursesResult<()> {
        let mut engine = self.engine.borrow_mut();
        let current = engine.window(self.id)?.attr();
        engine.set_attr(self.id, attr::enable(current, flags))
    }

    /// Remove attributes. Color bits in `flags` reset the pair.
    pub fn disable_attribute(&self, flags: Attr) -> CursesResult<()> {
        let mut engine = self.engine.borrow_mut();
        let current = engine.window(self.id)?.attr();
        engine.set_attr(self.id, attr::disable(current, flags))
    }

    pub fn attributes(&self) -> CursesResult<Attr> {
        Ok(self.engine.borrow().window(self.id)?.attr())
    }

    /// Draw a one-cell border with `+` corners. The cursor does not move.
    pub fn draw_border(&self, vertical: char, horizontal: char) -> CursesResult<()> {
        self.engine.borrow_mut().border(self.id, vertical, horizontal)
    }

    /// Decode special-key sequences on reads from this window (ncurses `keypad`)
    pub fn set_special_keys(&self, enabled: bool) -> CursesResult<()> {
        self.engine.borrow_mut().set_keypad(self.id, enabled)
    }

    pub fn special_keys(&self) -> CursesResult<bool> {
        Ok(self.engine.borrow().window(self.id)?.keypad())
    }

    /// Text of row `y` as stored in the window, trailing blanks included
    pub fn row_text(&self, y: usize) -> CursesResult<String> {
        self.engine.borrow().row_text(self.id, y)
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Ok(mut engine) = self.engine.try_borrow_mut() {
            if let Err(e) = engine.delete_window(self.id) {
                tracing::warn!(id = %self.id, "failed to release window: {e}");
            }
        }
    }
}
