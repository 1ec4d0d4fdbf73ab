//! Error type for session, window, color and device operations
//!
//! Expected input conditions are not errors: a read with no input returns
//! `ERR` and a mouse poll with nothing queued returns `MousePoll::NoEvent`.

use crate::window::WindowId;

/// Error type for curses operations
#[derive(Debug, thiserror::Error)]
pub enum CursesError {
    #[error("Window {0} does not exist")]
    UnknownWindow(WindowId),

    #[error(
        "Child window {width}x{height} at ({x}, {y}) does not fit inside a {parent_width}x{parent_height} parent"
    )]
    Placement {
        width: usize,
        height: usize,
        x: usize,
        y: usize,
        parent_width: usize,
        parent_height: usize,
    },

    #[error("Write ran past the last cell of window {0}")]
    WriteOverflow(WindowId),

    #[error("Terminal does not support colors")]
    ColorsUnsupported,

    #[error("Terminal cannot redefine colors")]
    ColorRedefinitionUnsupported,

    #[error("Color subsystem has not been started")]
    ColorsNotStarted,

    #[error("Color {color} out of range (terminal has {colors} colors)")]
    ColorOutOfRange { color: i16, colors: usize },

    #[error("Color pair {0} out of range")]
    PairOutOfRange(i16),

    #[error("Color component {0} outside 0..=1000")]
    ComponentOutOfRange(i16),

    #[error("Session has already ended")]
    SessionEnded,

    #[error("Failed to access terminal attributes: {0}")]
    Termios(#[source] nix::Error),

    #[error("Failed to poll terminal input: {0}")]
    Poll(#[source] nix::Error),

    #[error("Failed to read terminal input: {0}")]
    Read(#[source] nix::Error),

    #[error("Failed to query terminal size: {0}")]
    WindowSize(#[source] nix::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for curses operations
pub type CursesResult<T> = Result<T, CursesError>;
