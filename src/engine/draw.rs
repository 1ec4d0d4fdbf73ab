//! Drawing into window buffers
//!
//! Every drawing call works on a [`Surface`]: a window's state paired with
//! the buffer it shares with its ancestors. Cell writes land in the shared
//! buffer but only touch lines of the window doing the writing.

use unicode_width::UnicodeWidthChar;

use super::{Engine, WindowState};
use crate::attr::A_NORMAL;
use crate::core::{Cell, Grid};
use crate::error::{CursesError, CursesResult};
use crate::window::WindowId;

/// Width of a tab stop
const TAB_WIDTH: usize = 8;

/// Ran past the bottom-right cell
struct Overflow;

/// A window and its backing cells
struct Surface<'a> {
    win: &'a mut WindowState,
    grid: &'a mut Grid,
}

impl Surface<'_> {
    fn cell(&self, col: usize, row: usize) -> Option<&Cell> {
        self.grid.cell(self.win.org_x + col, self.win.org_y + row)
    }

    /// Store a cell at window coordinates, repairing any wide character it
    /// splits
    fn set(&mut self, col: usize, row: usize, cell: Cell) {
        if col >= self.win.cols || row >= self.win.rows {
            return;
        }
        let (gx, gy) = (self.win.org_x + col, self.win.org_y + row);
        let old = self.grid.cell(gx, gy).copied().unwrap_or_default();
        if old.wide_continuation && col > 0 {
            self.grid.set_cell(gx - 1, gy, Cell::default());
        }
        if old.width() == 2 && cell.width() != 2 {
            if let Some(next) = self.grid.cell(gx + 1, gy) {
                if next.wide_continuation {
                    self.grid.set_cell(gx + 1, gy, Cell::default());
                }
            }
        }
        self.grid.set_cell(gx, gy, cell);
        self.win.touched[row] = true;
    }

    /// Write one character at the cursor and advance (ncurses `waddch`)
    fn put_char(&mut self, ch: char) -> Result<(), Overflow> {
        match ch {
            '\n' => {
                self.erase_to_eol();
                if !self.win.cursor.next_line(self.win.rows) {
                    return Err(Overflow);
                }
                Ok(())
            }
            '\r' => {
                self.win.cursor.carriage_return();
                Ok(())
            }
            '\t' => {
                let spaces = TAB_WIDTH - self.win.cursor.col % TAB_WIDTH;
                (0..spaces).try_for_each(|_| self.put_printable(' '))
            }
            '\x08' => {
                self.win.cursor.move_left(1);
                Ok(())
            }
            c if (c as u32) < 0x20 || c == '\x7f' => {
                self.put_printable('^')?;
                self.put_printable(((c as u8) ^ 0x40) as char)
            }
            c => self.put_printable(c),
        }
    }

    fn put_printable(&mut self, ch: char) -> Result<(), Overflow> {
        let width = ch.width().unwrap_or(0);
        if width == 0 || width > self.win.cols {
            return Ok(());
        }
        if self.win.cursor.pending_wrap {
            return Err(Overflow);
        }
        let (cols, rows) = (self.win.cols, self.win.rows);
        if self.win.cursor.col + width > cols {
            // No room left on this row for a wide character
            let (col, row) = (self.win.cursor.col, self.win.cursor.row);
            for c in col..cols {
                self.set(c, row, Cell::with_attr(' ', self.win.attr));
            }
            if !self.win.cursor.next_line(rows) {
                return Err(Overflow);
            }
        }
        let (col, row) = (self.win.cursor.col, self.win.cursor.row);
        let attr = self.win.attr;
        self.set(col, row, Cell::with_attr(ch, attr));
        if width == 2 {
            self.set(col + 1, row, Cell::continuation(attr));
        }
        self.win.cursor.advance(width, cols, rows);
        Ok(())
    }

    /// Blank from the cursor to the end of its row (ncurses `wclrtoeol`)
    fn erase_to_eol(&mut self) {
        let (col, row) = (self.win.cursor.col, self.win.cursor.row);
        if col > 0 {
            if let Some(cell) = self.cell(col, row) {
                if cell.wide_continuation {
                    self.set(col - 1, row, Cell::default());
                }
            }
        }
        if let Some(line) = self.grid.line_mut(self.win.org_y + row) {
            let start = self.win.org_x + col;
            line.erase_range(start, self.win.org_x + self.win.cols, A_NORMAL);
            self.win.touched[row] = true;
        }
        self.win.cursor.pending_wrap = false;
    }

    /// Blank every cell of the window
    fn erase(&mut self) {
        for row in 0..self.win.rows {
            if let Some(line) = self.grid.line_mut(self.win.org_y + row) {
                line.erase_range(self.win.org_x, self.win.org_x + self.win.cols, A_NORMAL);
            }
        }
        self.win.touched.fill(true);
    }

    fn border(&mut self, vertical: char, horizontal: char) {
        let (cols, rows, attr) = (self.win.cols, self.win.rows, self.win.attr);
        let (right, bottom) = (cols - 1, rows - 1);
        for col in 1..right {
            self.set(col, 0, Cell::with_attr(horizontal, attr));
            self.set(col, bottom, Cell::with_attr(horizontal, attr));
        }
        for row in 1..bottom {
            self.set(0, row, Cell::with_attr(vertical, attr));
            self.set(right, row, Cell::with_attr(vertical, attr));
        }
        for (col, row) in [(0, 0), (right, 0), (0, bottom), (right, bottom)] {
            self.set(col, row, Cell::with_attr('+', attr));
        }
    }
}

impl Engine {
    fn surface(&mut self, id: WindowId) -> CursesResult<Surface<'_>> {
        let win = self
            .windows
            .get_mut(&id)
            .ok_or(CursesError::UnknownWindow(id))?;
        let grid = self
            .buffers
            .get_mut(&win.root)
            .ok_or(CursesError::UnknownWindow(id))?;
        Ok(Surface { win, grid })
    }

    /// Move the cursor, clamped to the window
    pub fn move_cursor(&mut self, id: WindowId, x: usize, y: usize) -> CursesResult<()> {
        let win = self.window_mut(id)?;
        let (cols, rows) = (win.cols, win.rows);
        win.cursor.move_to(x, y, cols, rows);
        Ok(())
    }

    /// Write text at the cursor (ncurses `waddstr`). Text running past the
    /// bottom-right cell is dropped and reported as `WriteOverflow`.
    pub fn write_str(&mut self, id: WindowId, text: &str) -> CursesResult<()> {
        let mut surface = self.surface(id)?;
        for ch in text.chars() {
            if surface.put_char(ch).is_err() {
                tracing::trace!(%id, "write overflow");
                return Err(CursesError::WriteOverflow(id));
            }
        }
        Ok(())
    }

    pub fn clear_to_eol(&mut self, id: WindowId) -> CursesResult<()> {
        self.surface(id)?.erase_to_eol();
        Ok(())
    }

    /// Blank the window and repaint the whole screen on its next refresh
    /// (ncurses `wclear`). The cursor stays where it is.
    pub fn clear(&mut self, id: WindowId) -> CursesResult<()> {
        let mut surface = self.surface(id)?;
        surface.erase();
        surface.win.clear_on_stage = true;
        Ok(())
    }

    /// Blank the window without forcing a repaint (ncurses `werase`)
    pub fn erase(&mut self, id: WindowId) -> CursesResult<()> {
        self.surface(id)?.erase();
        Ok(())
    }

    /// Box the window with `+` corners. The cursor does not move.
    pub fn border(&mut self, id: WindowId, vertical: char, horizontal: char) -> CursesResult<()> {
        self.surface(id)?.border(vertical, horizontal);
        Ok(())
    }

    /// Text of one window row as stored in its buffer
    pub fn row_text(&self, id: WindowId, row: usize) -> CursesResult<String> {
        let win = self.window(id)?;
        let grid = self
            .buffers
            .get(&win.root)
            .ok_or(CursesError::UnknownWindow(id))?;
        Ok(grid
            .line(win.org_y + row)
            .filter(|_| row < win.rows)
            .map(|line| line.text_range(win.org_x, win.org_x + win.cols))
            .unwrap_or_default())
    }

    /// Cell at window coordinates
    #[cfg(test)]
    pub fn cell_at(&self, id: WindowId, x: usize, y: usize) -> CursesResult<Option<Cell>> {
        let win = self.window(id)?;
        if x >= win.cols || y >= win.rows {
            return Ok(None);
        }
        let grid = self
            .buffers
            .get(&win.root)
            .ok_or(CursesError::UnknownWindow(id))?;
        Ok(grid.cell(win.org_x + x, win.org_y + y).copied())
    }

    /// Echo a typed character into a window and show it right away
    pub(super) fn echo_char(&mut self, id: WindowId, ch: char) -> CursesResult<()> {
        // A full window just stops echoing
        let _ = self.write_str(id, ch.encode_utf8(&mut [0u8; 4]));
        self.refresh(id)
    }

    /// Remove the echoed character left of the cursor
    pub(super) fn echo_erase(&mut self, id: WindowId) -> CursesResult<()> {
        let mut surface = self.surface(id)?;
        let (col, row) = (surface.win.cursor.col, surface.win.cursor.row);
        if col > 0 {
            surface.set(col - 1, row, Cell::default());
            surface.win.cursor.move_left(1);
        }
        self.refresh(id)
    }
}
