//! Mochi Curses Library
//!
//! Curses-style windows on a character-cell screen model, written from
//! scratch without linking a curses library. This crate provides:
//!
//! - `session`: terminal takeover and teardown, input modes, echo, colors
//! - `window`: move-only window handles with (x, y) coordinates, child
//!   windows sharing their parent's cells, staged refresh and batched commit
//! - `mouse`: mouse masks and polled mouse events
//! - `core`: cells, lines, frames and snapshots
//! - `device`: the terminal seam, with a termios device and a headless one
//!
//! Constants (`attr`, `key`, `mouse`) keep the ncurses values.

pub mod attr;
pub mod config;
pub mod core;
pub mod device;
mod engine;
pub mod error;
pub mod input;
pub mod key;
pub mod mouse;
pub mod session;
pub mod window;

pub use attr::{color_pair, pair_number, Attr, ColorId};
pub use config::{HeadlessConfig, InputMode, SessionConfig};
pub use core::{Rgb, Snapshot};
pub use device::{Capabilities, Device, HeadlessDevice, HeadlessHandle, MouseTracking};
pub use error::{CursesError, CursesResult};
pub use key::{key_name, ERR, KEY_MOUSE, OK};
pub use mouse::{Mask, Mouse, MouseEvent, MouseMask, MousePoll};
pub use session::Session;
pub use window::{Window, WindowId};
