//! Session configuration

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CursesResult;
use crate::mouse::{MouseMask, ALL_MOUSE_EVENTS, REPORT_MOUSE_POSITION};

/// Process-wide input mode. Selecting a mode replaces the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InputMode {
    /// Line buffered, signals interpreted (after `no_raw`/`no_cbreak`)
    Cooked,
    /// No line buffering, signals interpreted
    #[default]
    CBreak,
    /// No line buffering, no signal or flow-control interpretation
    Raw,
    /// cbreak with reads giving up after the given tenths of a second (1..=255)
    HalfDelay(u8),
}

impl InputMode {
    /// Half-delay mode with `tenths` clamped into 1..=255
    pub fn half_delay(tenths: i32) -> Self {
        InputMode::HalfDelay(tenths.clamp(1, 255) as u8)
    }

    /// The same mode with a half-delay moved into 1..=255 tenths
    pub fn clamped(self) -> Self {
        match self {
            InputMode::HalfDelay(tenths) => InputMode::half_delay(tenths as i32),
            mode => mode,
        }
    }

    /// How long a read may wait for the first byte (`None` blocks)
    pub fn read_timeout(self) -> Option<Duration> {
        match self {
            InputMode::HalfDelay(tenths) => Some(Duration::from_millis(tenths as u64 * 100)),
            _ => None,
        }
    }

    /// Whether the terminal line discipline buffers input until newline
    pub fn is_line_buffered(self) -> bool {
        self == InputMode::Cooked
    }
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Input mode applied when the session starts
    pub input_mode: InputMode,
    /// Whether typed characters are echoed into the reading window
    pub echo: bool,
    /// Whether new windows decode special-key sequences
    pub keypad: bool,
    /// How long to wait for the rest of an escape sequence (ncurses `ESCDELAY`)
    pub escape_delay_ms: u64,
    /// Settings of the in-memory device used by headless sessions
    pub headless: HeadlessConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            input_mode: InputMode::CBreak,
            echo: true,
            keypad: false,
            escape_delay_ms: 1000,
            headless: HeadlessConfig::default(),
        }
    }
}

/// Headless device settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlessConfig {
    /// Terminal columns
    pub cols: usize,
    /// Terminal rows
    pub rows: usize,
    /// Number of color slots (0 = no color support)
    pub colors: usize,
    /// Whether color slots may be redefined
    pub can_change_color: bool,
    /// Mouse event categories the device can report
    pub mouse_events: MouseMask,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            cols: 80,
            rows: 24,
            colors: 256,
            can_change_color: true,
            mouse_events: ALL_MOUSE_EVENTS | REPORT_MOUSE_POSITION,
        }
    }
}

impl SessionConfig {
    /// Parse a JSON configuration; missing fields take their defaults
    pub fn from_json(json: &str) -> CursesResult<Self> {
        let mut config: Self = serde_json::from_str(json)?;
        config.input_mode = config.input_mode.clamped();
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> CursesResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&contents)?;
        tracing::debug!(path = %path.as_ref().display(), "loaded session config");
        Ok(config)
    }

    /// Apply overrides from the environment (`ESCDELAY`)
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(value) = std::env::var("ESCDELAY") {
            match value.trim().parse::<u64>() {
                Ok(ms) => self.escape_delay_ms = ms,
                Err(_) => tracing::warn!(value = %value, "ignoring invalid ESCDELAY"),
            }
        }
        self
    }

    pub fn escape_delay(&self) -> Duration {
        Duration::from_millis(self.escape_delay_ms)
    }

    /// Convenience for headless sessions of a given size
    pub fn headless_size(mut self, cols: usize, rows: usize) -> Self {
        self.headless.cols = cols;
        self.headless.rows = rows;
        self
    }
}
