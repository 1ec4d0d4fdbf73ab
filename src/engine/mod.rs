//! Window engine
//!
//! Owns everything a curses library keeps behind its window pointers:
//! - the live window table and the cell buffers windows draw into
//! - the staged frame that window refreshes copy into and the frame last
//!   committed to the device
//! - input mode, echo, pending input bytes and the mouse event queue
//! - the color table
//!
//! Session, window and mouse handles share one engine through
//! `Rc<RefCell<Engine>>`.

mod draw;
mod read;

use std::collections::{HashMap, VecDeque};

use crate::attr::{Attr, A_NORMAL};
use crate::config::{InputMode, SessionConfig};
use crate::core::{ColorTable, Cursor, Grid, Screen};
use crate::device::{Capabilities, Device, MouseTracking};
use crate::error::{CursesError, CursesResult};
use crate::mouse::{MouseEvent, MouseMask, MouseTracker, REPORT_MOUSE_POSITION};
use crate::window::WindowId;

/// Most mouse events kept before the oldest is dropped
const MOUSE_QUEUE_LIMIT: usize = 8;

/// State of one live window
#[derive(Debug, Clone)]
pub(crate) struct WindowState {
    /// Window this one was derived from
    parent: Option<WindowId>,
    /// Top-level window whose buffer this window draws into
    root: WindowId,
    /// Offset of this window inside the root buffer
    org_x: usize,
    org_y: usize,
    /// Position on the screen
    abs_x: usize,
    abs_y: usize,
    cols: usize,
    rows: usize,
    cursor: Cursor,
    attr: Attr,
    keypad: bool,
    /// Lines changed since the window was last staged
    touched: Vec<bool>,
    /// Repaint the whole screen when this window is next staged
    clear_on_stage: bool,
    /// Number of live windows derived from this one
    children: usize,
    /// Released by its owner but kept alive for its children
    detached: bool,
}

impl WindowState {
    fn new(root: WindowId, parent: Option<WindowId>, cols: usize, rows: usize) -> Self {
        Self {
            parent,
            root,
            org_x: 0,
            org_y: 0,
            abs_x: 0,
            abs_y: 0,
            cols,
            rows,
            cursor: Cursor::new(),
            attr: A_NORMAL,
            keypad: false,
            touched: vec![true; rows],
            clear_on_stage: false,
            children: 0,
            detached: false,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn attr(&self) -> Attr {
        self.attr
    }

    pub fn keypad(&self) -> bool {
        self.keypad
    }

    /// Screen position as (x, y)
    pub fn origin(&self) -> (usize, usize) {
        (self.abs_x, self.abs_y)
    }

    pub fn is_touched(&self) -> bool {
        self.touched.iter().any(|&t| t)
    }

    pub fn is_line_touched(&self, row: usize) -> bool {
        self.touched.get(row).copied().unwrap_or(false)
    }
}

/// The engine behind a session
pub(crate) struct Engine {
    device: Box<dyn Device>,
    config: SessionConfig,
    capabilities: Capabilities,
    windows: HashMap<WindowId, WindowState>,
    /// Cell buffers of top-level windows, shared by the windows derived from them
    buffers: HashMap<WindowId, Grid>,
    next_id: u64,
    staged: Screen,
    physical: Screen,
    /// Rewrite every row on the next commit
    force_repaint: bool,
    input_mode: InputMode,
    echo: bool,
    colors: ColorTable,
    mouse_mask: MouseMask,
    mouse: MouseTracker,
    mouse_queue: VecDeque<MouseEvent>,
    /// Bytes read from the device but not consumed yet
    pending: VecDeque<u8>,
    ended: bool,
}

impl Engine {
    /// Start an engine on `device` and create the full-screen root window
    pub fn new(mut device: Box<dyn Device>, mut config: SessionConfig) -> CursesResult<(Self, WindowId)> {
        config.input_mode = config.input_mode.clamped();
        let (cols, rows) = device.size()?;
        let capabilities = device.capabilities();
        device.set_input_mode(config.input_mode)?;

        let mut engine = Self {
            device,
            capabilities,
            windows: HashMap::new(),
            buffers: HashMap::new(),
            next_id: 0,
            staged: Screen::new(cols, rows),
            physical: Screen::new(cols, rows),
            force_repaint: true,
            input_mode: config.input_mode,
            echo: config.echo,
            colors: ColorTable::new(capabilities.colors, capabilities.can_change_color),
            mouse_mask: 0,
            mouse: MouseTracker::default(),
            mouse_queue: VecDeque::new(),
            pending: VecDeque::new(),
            ended: false,
            config,
        };
        let root = engine.new_window(0, 0, 0, 0)?;
        tracing::debug!(cols, rows, ?capabilities, "engine started");
        Ok((engine, root))
    }

    pub fn ensure_active(&self) -> CursesResult<()> {
        if self.ended {
            Err(CursesError::SessionEnded)
        } else {
            Ok(())
        }
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Restore the device. Later calls do nothing.
    pub fn end(&mut self) -> CursesResult<()> {
        if self.ended {
            return Ok(());
        }
        self.ended = true;
        self.mouse_queue.clear();
        self.device.restore()?;
        tracing::debug!(live_windows = self.windows.len(), "engine ended");
        Ok(())
    }

    /// Screen size as (columns, rows)
    pub fn screen_size(&self) -> (usize, usize) {
        (self.staged.cols(), self.staged.rows())
    }

    pub fn window(&self, id: WindowId) -> CursesResult<&WindowState> {
        self.windows.get(&id).ok_or(CursesError::UnknownWindow(id))
    }

    fn window_mut(&mut self, id: WindowId) -> CursesResult<&mut WindowState> {
        self.windows
            .get_mut(&id)
            .ok_or(CursesError::UnknownWindow(id))
    }

    fn allocate_id(&mut self) -> WindowId {
        self.next_id += 1;
        WindowId::new(self.next_id)
    }

    /// Create a top-level window with its own buffer (ncurses `newwin`).
    /// A zero size extends the window to the screen edge.
    pub fn new_window(&mut self, rows: usize, cols: usize, x: usize, y: usize) -> CursesResult<WindowId> {
        let (screen_cols, screen_rows) = self.screen_size();
        let (cols, rows) = fit(cols, rows, x, y, screen_cols, screen_rows)?;

        let id = self.allocate_id();
        let mut state = WindowState::new(id, None, cols, rows);
        state.abs_x = x;
        state.abs_y = y;
        state.keypad = self.config.keypad;
        self.windows.insert(id, state);
        self.buffers.insert(id, Grid::new(cols, rows));
        tracing::debug!(%id, cols, rows, x, y, "window created");
        Ok(id)
    }

    /// Create a window sharing the cells of `parent` (ncurses `derwin`).
    /// The parent is touched first so the next refresh restages all of it.
    pub fn derive_window(
        &mut self,
        parent: WindowId,
        rows: usize,
        cols: usize,
        x: usize,
        y: usize,
    ) -> CursesResult<WindowId> {
        self.touch_window(parent)?;
        let p = self.window(parent)?;
        let (cols, rows) = fit(cols, rows, x, y, p.cols, p.rows)?;

        let mut state = WindowState::new(p.root, Some(parent), cols, rows);
        state.org_x = p.org_x + x;
        state.org_y = p.org_y + y;
        state.abs_x = p.abs_x + x;
        state.abs_y = p.abs_y + y;
        state.attr = p.attr;
        state.keypad = p.keypad;

        let id = self.allocate_id();
        self.windows.insert(id, state);
        self.window_mut(parent)?.children += 1;
        tracing::debug!(%id, %parent, cols, rows, x, y, "child window created");
        Ok(id)
    }

    /// Release a window (ncurses `delwin`). A window that still has live
    /// children is only marked detached and goes away with its last child.
    pub fn delete_window(&mut self, id: WindowId) -> CursesResult<()> {
        let state = self.window_mut(id)?;
        if state.children > 0 {
            state.detached = true;
            tracing::debug!(%id, children = state.children, "window detached");
            return Ok(());
        }
        let Some(state) = self.windows.remove(&id) else {
            return Err(CursesError::UnknownWindow(id));
        };
        tracing::debug!(%id, "window released");

        match state.parent {
            None => {
                self.buffers.remove(&id);
            }
            Some(parent) => {
                if let Some(p) = self.windows.get_mut(&parent) {
                    p.children -= 1;
                    if p.children == 0 && p.detached {
                        self.delete_window(parent)?;
                    }
                }
            }
        }
        Ok(())
    }

    pub fn live_windows(&self) -> usize {
        self.windows.len()
    }

    /// Mark every line of a window changed (ncurses `touchwin`)
    pub fn touch_window(&mut self, id: WindowId) -> CursesResult<()> {
        self.window_mut(id)?.touched.fill(true);
        Ok(())
    }

    pub fn set_keypad(&mut self, id: WindowId, enabled: bool) -> CursesResult<()> {
        self.window_mut(id)?.keypad = enabled;
        Ok(())
    }

    pub fn set_attr(&mut self, id: WindowId, attr: Attr) -> CursesResult<()> {
        self.window_mut(id)?.attr = attr;
        Ok(())
    }

    /// Copy a window's touched lines into the staged frame (ncurses `wnoutrefresh`)
    pub fn stage(&mut self, id: WindowId) -> CursesResult<()> {
        let win = self
            .windows
            .get_mut(&id)
            .ok_or(CursesError::UnknownWindow(id))?;
        let grid = self
            .buffers
            .get(&win.root)
            .ok_or(CursesError::UnknownWindow(id))?;

        for row in 0..win.rows {
            if !std::mem::replace(&mut win.touched[row], false) {
                continue;
            }
            if let Some(src) = grid.line(win.org_y + row) {
                self.staged
                    .stage_cells(win.abs_y + row, win.abs_x, src, win.org_x, win.cols);
            }
        }
        self.staged
            .set_cursor(win.abs_x + win.cursor.col, win.abs_y + win.cursor.row);
        if std::mem::take(&mut win.clear_on_stage) {
            self.force_repaint = true;
        }
        Ok(())
    }

    /// Push staged rows that differ from the device to the device (ncurses `doupdate`)
    pub fn commit(&mut self) -> CursesResult<()> {
        self.ensure_active()?;
        let mut written = 0;
        for row in 0..self.staged.rows() {
            let Some(line) = self.staged.line(row) else {
                continue;
            };
            let changed = self.staged.is_dirty(row) && self.physical.line(row) != Some(line);
            if self.force_repaint || changed {
                self.device.write_line(row, line, &self.colors)?;
                self.physical.replace_line(row, line);
                written += 1;
            }
        }
        self.staged.clear_dirty();
        self.force_repaint = false;

        let cursor = *self.staged.cursor();
        self.physical.set_cursor(cursor.col, cursor.row);
        self.device.move_cursor(cursor.col, cursor.row)?;
        self.device.flush()?;
        tracing::trace!(written, "frame committed");
        Ok(())
    }

    /// Stage and commit one window (ncurses `wrefresh`)
    pub fn refresh(&mut self, id: WindowId) -> CursesResult<()> {
        self.stage(id)?;
        self.commit()
    }

    /// The frame as last committed to the device
    pub fn physical(&self) -> &Screen {
        &self.physical
    }

    pub fn set_input_mode(&mut self, mode: InputMode) -> CursesResult<()> {
        self.ensure_active()?;
        let mode = mode.clamped();
        self.device.set_input_mode(mode)?;
        self.input_mode = mode;
        tracing::debug!(?mode, "input mode changed");
        Ok(())
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn set_echo(&mut self, echo: bool) {
        self.echo = echo;
    }

    pub fn echo(&self) -> bool {
        self.echo
    }

    pub fn colors(&self) -> &ColorTable {
        &self.colors
    }

    pub fn colors_mut(&mut self) -> CursesResult<&mut ColorTable> {
        self.ensure_active()?;
        Ok(&mut self.colors)
    }

    /// Set the active mouse mask (ncurses `mousemask`); returns the subset
    /// the device can report
    pub fn set_mouse_mask(&mut self, requested: MouseMask) -> CursesResult<MouseMask> {
        self.ensure_active()?;
        let effective = requested & self.capabilities.mouse_events;
        let tracking = if effective == 0 {
            MouseTracking::Off
        } else if effective & REPORT_MOUSE_POSITION != 0 {
            MouseTracking::AllMotion
        } else {
            MouseTracking::Buttons
        };
        self.device.set_mouse_tracking(tracking)?;
        self.mouse_mask = effective;
        tracing::debug!(requested, effective, ?tracking, "mouse mask changed");
        Ok(effective)
    }

    /// Oldest queued mouse event (ncurses `getmouse`)
    pub fn pop_mouse_event(&mut self) -> Option<MouseEvent> {
        self.mouse_queue.pop_front()
    }

    fn push_mouse_event(&mut self, event: MouseEvent) {
        if self.mouse_queue.len() == MOUSE_QUEUE_LIMIT {
            self.mouse_queue.pop_front();
        }
        self.mouse_queue.push_back(event);
    }
}

/// Resolve a requested size against the space left in a `avail_cols` x
/// `avail_rows` area from (x, y). Zero extends to the edge.
fn fit(
    cols: usize,
    rows: usize,
    x: usize,
    y: usize,
    avail_cols: usize,
    avail_rows: usize,
) -> CursesResult<(usize, usize)> {
    let width = if cols == 0 {
        avail_cols.saturating_sub(x)
    } else {
        cols
    };
    let height = if rows == 0 {
        avail_rows.saturating_sub(y)
    } else {
        rows
    };
    if width == 0
        || height == 0
        || width > avail_cols.saturating_sub(x)
        || height > avail_rows.saturating_sub(y)
    {
        return Err(CursesError::Placement {
            width: cols,
            height: rows,
            x,
            y,
            parent_width: avail_cols,
            parent_height: avail_rows,
        });
    }
    Ok((width, height))
}
