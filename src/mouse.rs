//! Mouse events
//!
//! Event categories are bits of a [`MouseMask`] using the ncurses mouse
//! version 1 layout: six bits per button (released, pressed, clicked,
//! double-clicked, triple-clicked, reserved) for buttons 1 to 4, followed by
//! the modifier bits and `REPORT_MOUSE_POSITION`.
//!
//! A [`Mouse`] owns the active [`Mask`] and the last event it polled. Reports
//! arrive through window reads: a read returns [`KEY_MOUSE`](crate::key::KEY_MOUSE)
//! once a report matching the mask has been queued, and [`Mouse::poll`] then
//! takes it off the queue.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::engine::Engine;
use crate::error::CursesResult;
use crate::input::MouseReport;

/// Bitmask of mouse event categories (ncurses `mmask_t`)
pub type MouseMask = u32;

pub const BUTTON1_RELEASED: MouseMask = 1 << 0;
pub const BUTTON1_PRESSED: MouseMask = 1 << 1;
pub const BUTTON1_CLICKED: MouseMask = 1 << 2;
pub const BUTTON1_DOUBLE_CLICKED: MouseMask = 1 << 3;
pub const BUTTON1_TRIPLE_CLICKED: MouseMask = 1 << 4;
pub const BUTTON2_RELEASED: MouseMask = 1 << 6;
pub const BUTTON2_PRESSED: MouseMask = 1 << 7;
pub const BUTTON2_CLICKED: MouseMask = 1 << 8;
pub const BUTTON2_DOUBLE_CLICKED: MouseMask = 1 << 9;
pub const BUTTON2_TRIPLE_CLICKED: MouseMask = 1 << 10;
pub const BUTTON3_RELEASED: MouseMask = 1 << 12;
pub const BUTTON3_PRESSED: MouseMask = 1 << 13;
pub const BUTTON3_CLICKED: MouseMask = 1 << 14;
pub const BUTTON3_DOUBLE_CLICKED: MouseMask = 1 << 15;
pub const BUTTON3_TRIPLE_CLICKED: MouseMask = 1 << 16;
pub const BUTTON4_RELEASED: MouseMask = 1 << 18;
pub const BUTTON4_PRESSED: MouseMask = 1 << 19;
pub const BUTTON4_CLICKED: MouseMask = 1 << 20;
pub const BUTTON4_DOUBLE_CLICKED: MouseMask = 1 << 21;
pub const BUTTON4_TRIPLE_CLICKED: MouseMask = 1 << 22;
pub const BUTTON_CTRL: MouseMask = 1 << 24;
pub const BUTTON_SHIFT: MouseMask = 1 << 25;
pub const BUTTON_ALT: MouseMask = 1 << 26;
pub const REPORT_MOUSE_POSITION: MouseMask = 1 << 27;
pub const ALL_MOUSE_EVENTS: MouseMask = REPORT_MOUSE_POSITION - 1;

const MODIFIER_BITS: MouseMask = BUTTON_CTRL | BUTTON_SHIFT | BUTTON_ALT;

/// Bit of `button` (1..=4) for the event at `offset` within its six-bit group
const fn button_bit(button: usize, offset: usize) -> MouseMask {
    1 << ((button - 1) * 6 + offset)
}

const RELEASED: usize = 0;
const PRESSED: usize = 1;
const CLICKED: usize = 2;

/// One mouse event: the button-state bits and the screen cell it happened on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MouseEvent {
    /// Button-state bits (one event category plus any modifier bits)
    pub state: MouseMask,
    /// Screen column
    pub x: usize,
    /// Screen row
    pub y: usize,
}

/// Outcome of [`Mouse::poll`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MousePoll {
    /// A fresh event was taken off the queue and is now the mouse's last event
    Event(MouseEvent),
    /// Nothing was queued; the mouse's last event is unchanged and may be stale
    NoEvent,
}

impl MousePoll {
    pub fn is_event(&self) -> bool {
        matches!(self, MousePoll::Event(_))
    }

    pub fn event(self) -> Option<MouseEvent> {
        match self {
            MousePoll::Event(event) => Some(event),
            MousePoll::NoEvent => None,
        }
    }
}

/// The set of enabled mouse event categories.
///
/// Both mutations go through the engine's single "set active mask" call and
/// store what the engine accepted, which may be less than what was asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mask(MouseMask);

impl Mask {
    pub fn bits(self) -> MouseMask {
        self.0
    }

    pub fn contains(self, categories: MouseMask) -> bool {
        self.0 & categories == categories
    }

    fn activate(engine: &mut Engine, requested: MouseMask) -> CursesResult<Self> {
        Ok(Self(engine.set_mouse_mask(requested)?))
    }

    fn add_events(&mut self, engine: &mut Engine, categories: MouseMask) -> CursesResult<MouseMask> {
        self.0 = engine.set_mouse_mask(self.0 | categories)?;
        Ok(self.0)
    }

    fn remove_events(
        &mut self,
        engine: &mut Engine,
        categories: MouseMask,
    ) -> CursesResult<MouseMask> {
        self.0 = engine.set_mouse_mask(self.0 & !categories)?;
        Ok(self.0)
    }
}

/// Mouse handle: the active mask plus the last successfully polled event
pub struct Mouse {
    engine: Rc<RefCell<Engine>>,
    mask: Mask,
    event: MouseEvent,
}

impl Mouse {
    pub(crate) fn new(engine: Rc<RefCell<Engine>>, mask: MouseMask) -> CursesResult<Self> {
        let mask = Mask::activate(&mut engine.borrow_mut(), mask)?;
        tracing::debug!(requested = mask.bits(), "mouse initialized");
        Ok(Self {
            engine,
            mask,
            event: MouseEvent::default(),
        })
    }

    /// Enable more event categories; returns the effective mask
    pub fn add_events(&mut self, categories: MouseMask) -> CursesResult<MouseMask> {
        self.mask
            .add_events(&mut self.engine.borrow_mut(), categories)
    }

    /// Disable event categories; returns the effective mask
    pub fn remove_events(&mut self, categories: MouseMask) -> CursesResult<MouseMask> {
        self.mask
            .remove_events(&mut self.engine.borrow_mut(), categories)
    }

    /// The effective mask
    pub fn mask(&self) -> Mask {
        self.mask
    }

    /// Take the next queued event. On [`MousePoll::NoEvent`] the stored event
    /// is left exactly as it was.
    pub fn poll(&mut self) -> MousePoll {
        match self.engine.borrow_mut().pop_mouse_event() {
            Some(event) => {
                self.event = event;
                MousePoll::Event(event)
            }
            None => MousePoll::NoEvent,
        }
    }

    /// The last successfully polled event (all zero before the first one)
    pub fn last_event(&self) -> MouseEvent {
        self.event
    }

    pub fn state(&self) -> MouseMask {
        self.event.state
    }

    pub fn x(&self) -> usize {
        self.event.x
    }

    pub fn y(&self) -> usize {
        self.event.y
    }
}

/// Turns raw terminal reports into events, tracking held buttons so a
/// press followed by a release can be reported as a click.
#[derive(Debug, Clone, Default)]
pub(crate) struct MouseTracker {
    held: [bool; 4],
    last_pressed: Option<usize>,
}

impl MouseTracker {
    /// Translate a report under `mask`. Returns `None` when the report has no
    /// category in the mask or cannot be expressed in the mask layout.
    pub fn translate(&mut self, report: MouseReport, mask: MouseMask) -> Option<MouseEvent> {
        let code = report.code;
        let mut modifiers = 0;
        if code & 4 != 0 {
            modifiers |= BUTTON_SHIFT;
        }
        if code & 8 != 0 {
            modifiers |= BUTTON_ALT;
        }
        if code & 16 != 0 {
            modifiers |= BUTTON_CTRL;
        }
        let low = (code & 3) as usize;

        let state = if code & 64 != 0 {
            // Wheel up is button 4; wheel down has no bit in this layout
            if low != 0 {
                return None;
            }
            button_bit(4, PRESSED)
        } else if code & 32 != 0 {
            REPORT_MOUSE_POSITION
        } else if report.release || low == 3 {
            let button = if low == 3 {
                self.last_pressed?
            } else {
                low + 1
            };
            let was_held = std::mem::replace(&mut self.held[button - 1], false);
            let clicked = button_bit(button, CLICKED);
            let released = button_bit(button, RELEASED);
            if was_held && mask & clicked != 0 && mask & released == 0 {
                clicked
            } else {
                released
            }
        } else {
            let button = low + 1;
            self.held[button - 1] = true;
            self.last_pressed = Some(button);
            button_bit(button, PRESSED)
        };

        if state & mask & !MODIFIER_BITS == 0 {
            return None;
        }
        Some(MouseEvent {
            state: state | modifiers,
            x: report.x,
            y: report.y,
        })
    }
}
