//! Session lifecycle
//!
//! A [`Session`] is the terminal-control context between initialization and
//! teardown. It owns the process-wide modes (input mode, echo, colors) and
//! hands out the root window and the mouse.
//!
//! ```no_run
//! use mochi_curses::Session;
//!
//! let (session, root) = Session::init()?;
//! let child = root.create_child(5, 10, 2, 3)?;
//! child.write("hi")?;
//! child.refresh()?;
//! session.commit_all()?;
//! child.destroy()?;
//! session.end()?;
//! # Ok::<(), mochi_curses::CursesError>(())
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use crate::attr::{color_pair, Attr, ColorId};
use crate::config::{InputMode, SessionConfig};
use crate::core::{Rgb, Snapshot};
use crate::device::{Device, HeadlessDevice, HeadlessHandle};
use crate::engine::Engine;
use crate::error::CursesResult;
use crate::mouse::{Mouse, MouseMask};
use crate::window::Window;

/// The terminal-control session
pub struct Session {
    engine: Rc<RefCell<Engine>>,
    ended: bool,
}

impl Session {
    /// Take over the controlling terminal with the default configuration
    /// (plus `ESCDELAY` from the environment) and return the root window
    #[cfg(unix)]
    pub fn init() -> CursesResult<(Session, Window)> {
        Self::init_with(SessionConfig::default().with_env_overrides())
    }

    /// Take over the controlling terminal with `config`
    #[cfg(unix)]
    pub fn init_with(config: SessionConfig) -> CursesResult<(Session, Window)> {
        let device = crate::device::TtyDevice::open()?;
        Self::with_device(Box::new(device), config)
    }

    /// Start a session on any device
    pub fn with_device(device: Box<dyn Device>, config: SessionConfig) -> CursesResult<(Session, Window)> {
        let (engine, root) = Engine::new(device, config)?;
        let engine = Rc::new(RefCell::new(engine));
        let root = Window::new(Rc::clone(&engine), root);
        tracing::info!("session started");
        Ok((
            Session {
                engine,
                ended: false,
            },
            root,
        ))
    }

    /// Start a session on an in-memory device sized by `config.headless`
    pub fn headless(config: SessionConfig) -> CursesResult<(Session, Window, HeadlessHandle)> {
        let (device, handle) = HeadlessDevice::new(&config.headless);
        let (session, root) = Self::with_device(Box::new(device), config)?;
        Ok((session, root, handle))
    }

    /// Restore the terminal. Windows still alive become inert for drawing
    /// to the device.
    pub fn end(mut self) -> CursesResult<()> {
        self.ended = true;
        let result = self.engine.borrow_mut().end();
        tracing::info!("session ended");
        result
    }

    pub fn is_ended(&self) -> bool {
        self.engine.borrow().is_ended()
    }

    /// Disable line buffering and signal/flow-control interpretation
    pub fn raw(&self) -> CursesResult<()> {
        self.engine.borrow_mut().set_input_mode(InputMode::Raw)
    }

    /// Back to line-buffered input
    pub fn no_raw(&self) -> CursesResult<()> {
        self.engine.borrow_mut().set_input_mode(InputMode::Cooked)
    }

    /// Disable line buffering, keep signal interpretation (the default)
    pub fn cbreak(&self) -> CursesResult<()> {
        self.engine.borrow_mut().set_input_mode(InputMode::CBreak)
    }

    pub fn no_cbreak(&self) -> CursesResult<()> {
        self.engine.borrow_mut().set_input_mode(InputMode::Cooked)
    }

    /// cbreak mode where reads give up after `tenths` of a second,
    /// clamped into 1..=255
    pub fn half_delay(&self, tenths: i32) -> CursesResult<()> {
        self.engine
            .borrow_mut()
            .set_input_mode(InputMode::half_delay(tenths))
    }

    pub fn input_mode(&self) -> InputMode {
        self.engine.borrow().input_mode()
    }

    /// Echo typed characters into the window being read
    pub fn echo(&self) {
        self.engine.borrow_mut().set_echo(true);
    }

    pub fn no_echo(&self) {
        self.engine.borrow_mut().set_echo(false);
    }

    pub fn echo_enabled(&self) -> bool {
        self.engine.borrow().echo()
    }

    /// Push every staged change to the terminal in one update
    pub fn commit_all(&self) -> CursesResult<()> {
        self.engine.borrow_mut().commit()
    }

    /// Toggle special-key decoding on `window`'s reads
    pub fn enable_special_keys(&self, window: &Window, enabled: bool) -> CursesResult<()> {
        window.set_special_keys(enabled)
    }

    /// Create an independent top-level window with its own cells. A zero
    /// size extends it to the screen edge.
    pub fn new_window(&self, height: usize, width: usize, x: usize, y: usize) -> CursesResult<Window> {
        let id = self
            .engine
            .borrow_mut()
            .new_window(height, width, x, y)?;
        Ok(Window::new(Rc::clone(&self.engine), id))
    }

    /// Screen size as (width, height)
    pub fn screen_size(&self) -> (usize, usize) {
        self.engine.borrow().screen_size()
    }

    /// Number of windows in the live-window table
    pub fn live_windows(&self) -> usize {
        self.engine.borrow().live_windows()
    }

    /// What the terminal was last told to show
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_screen(self.engine.borrow().physical())
    }

    pub fn supports_color(&self) -> bool {
        self.engine.borrow().colors().has_colors()
    }

    pub fn supports_color_redefinition(&self) -> bool {
        self.engine.borrow().colors().can_change_color()
    }

    /// Start the color subsystem; required before defining colors or pairs
    pub fn enable_colors(&self) -> CursesResult<()> {
        self.engine.borrow_mut().colors_mut()?.start()?;
        tracing::debug!("colors enabled");
        Ok(())
    }

    /// Number of usable color slots (0 before [`enable_colors`](Self::enable_colors))
    pub fn colors(&self) -> usize {
        self.engine.borrow().colors().colors()
    }

    /// Redefine slot `slot` with components in 0..=1000
    pub fn define_color(&self, slot: ColorId, r: i16, g: i16, b: i16) -> CursesResult<()> {
        self.engine
            .borrow_mut()
            .colors_mut()?
            .define_color(slot, r, g, b)
    }

    pub fn define_pair(&self, pair: i16, fg: ColorId, bg: ColorId) -> CursesResult<()> {
        self.engine.borrow_mut().colors_mut()?.define_pair(pair, fg, bg)
    }

    /// Attribute selecting color pair `pair`
    pub fn pair_attribute(&self, pair: i16) -> Attr {
        color_pair(pair)
    }

    /// Foreground and background slots of `pair`
    pub fn pair_content(&self, pair: i16) -> Option<(ColorId, ColorId)> {
        self.engine
            .borrow()
            .colors()
            .pair(pair)
            .map(|p| (p.fg, p.bg))
    }

    /// Components of slot `slot` on the 0..=1000 scale
    pub fn color_content(&self, slot: ColorId) -> Option<Rgb> {
        self.engine.borrow().colors().color(slot)
    }

    /// Enable mouse reporting for `mask`. The returned mouse holds the
    /// subset the terminal accepted.
    pub fn init_mouse(&self, mask: MouseMask) -> CursesResult<Mouse> {
        Mouse::new(Rc::clone(&self.engine), mask)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.ended {
            return;
        }
        if let Ok(mut engine) = self.engine.try_borrow_mut() {
            if let Err(e) = engine.end() {
                tracing::warn!("failed to restore terminal: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::COLOR_RED;
    use crate::error::CursesError;

    fn session() -> (Session, Window, HeadlessHandle) {
        Session::headless(SessionConfig::default().headless_size(30, 10)).unwrap()
    }

    #[test]
    fn test_input_modes_last_call_wins() {
        let (session, _root, handle) = session();
        assert_eq!(session.input_mode(), InputMode::CBreak);

        session.raw().unwrap();
        session.half_delay(0).unwrap();
        assert_eq!(session.input_mode(), InputMode::HalfDelay(1));
        assert_eq!(handle.input_mode(), InputMode::HalfDelay(1));

        session.no_cbreak().unwrap();
        assert_eq!(session.input_mode(), InputMode::Cooked);
        session.cbreak().unwrap();
        session.no_raw().unwrap();
        assert_eq!(session.input_mode(), InputMode::Cooked);
    }

    #[test]
    fn test_echo_toggle() {
        let (session, _root, _) = session();
        assert!(session.echo_enabled());
        session.no_echo();
        assert!(!session.echo_enabled());
        session.echo();
        assert!(session.echo_enabled());
    }

    #[test]
    fn test_colors_require_enable() {
        let (session, _root, _) = session();
        assert!(session.supports_color());
        assert_eq!(session.colors(), 0);
        assert!(matches!(
            session.define_pair(1, COLOR_RED, 0),
            Err(CursesError::ColorsNotStarted)
        ));

        session.enable_colors().unwrap();
        assert_eq!(session.colors(), 256);
        session.define_pair(1, COLOR_RED, 0).unwrap();
        assert_eq!(session.pair_content(1), Some((COLOR_RED, 0)));
        session.define_color(COLOR_RED, 1000, 500, 0).unwrap();
        assert_eq!(
            session.color_content(COLOR_RED),
            Some(Rgb {
                r: 1000,
                g: 500,
                b: 0
            })
        );
        assert_eq!(session.pair_attribute(1), 0x100);
    }

    #[test]
    fn test_no_color_terminal() {
        let mut config = SessionConfig::default();
        config.headless.colors = 0;
        let (session, _root, _) = Session::headless(config).unwrap();
        assert!(!session.supports_color());
        assert!(!session.supports_color_redefinition());
        assert!(matches!(
            session.enable_colors(),
            Err(CursesError::ColorsUnsupported)
        ));
    }

    #[test]
    fn test_new_window_is_independent() {
        let (session, root, _) = session();
        let popup = session.new_window(3, 10, 5, 2).unwrap();
        popup.write("popup").unwrap();
        assert_eq!(root.row_text(0).unwrap().trim_end(), "");
        assert_eq!(popup.origin().unwrap(), (5, 2));

        popup.refresh().unwrap();
        session.commit_all().unwrap();
        assert_eq!(session.snapshot().lines[2], "     popup");
    }

    #[test]
    fn test_end_restores_device() {
        let (session, root, handle) = session();
        session.end().unwrap();
        assert!(handle.is_restored());
        assert!(matches!(root.read_char(), Err(CursesError::SessionEnded)));
    }

    #[test]
    fn test_drop_restores_device() {
        let (session, _root, handle) = session();
        drop(session);
        assert!(handle.is_restored());
    }

    #[test]
    fn test_enable_special_keys() {
        let (session, root, handle) = session();
        session.enable_special_keys(&root, true).unwrap();
        handle.push_input(b"\x1b[B");
        assert_eq!(root.read_char().unwrap(), crate::key::KEY_DOWN);
    }
}
