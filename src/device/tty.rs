//! Controlling-terminal device
//!
//! Puts stdin into the requested line discipline with termios, switches
//! to the alternate screen and renders committed lines as escape sequences
//! on stdout. Terminal echo is always off; echoing is done by the engine
//! so it lands in the window being read.

use std::io::{self, Write};
use std::os::fd::AsFd;
use std::time::Duration;

use nix::errno::Errno;
use nix::libc;
use nix::poll::{poll, PollFd, PollFlags};
use nix::sys::termios::{
    self, InputFlags, LocalFlags, SetArg, SpecialCharacterIndices, Termios,
};

use super::{Capabilities, Device, MouseTracking};
use crate::attr::{
    pair_number, A_BLINK, A_BOLD, A_DIM, A_INVIS, A_REVERSE, A_STANDOUT, A_UNDERLINE,
};
use crate::config::InputMode;
use crate::core::{ColorTable, Line};
use crate::error::{CursesError, CursesResult};
use crate::mouse::{ALL_MOUSE_EVENTS, REPORT_MOUSE_POSITION};

const ENTER_SCREEN: &[u8] = b"\x1b[?1049h\x1b[H\x1b[2J";
const LEAVE_SCREEN: &[u8] = b"\x1b[0m\x1b[?1000l\x1b[?1003l\x1b[?1006l\x1b[?25h\x1b[?1049l";

/// The terminal on stdin/stdout
pub struct TtyDevice {
    original: Termios,
    output: Vec<u8>,
    restored: bool,
}

impl TtyDevice {
    /// Take over the terminal: save its attributes and enter the alternate screen
    pub fn open() -> CursesResult<Self> {
        let original = termios::tcgetattr(io::stdin()).map_err(CursesError::Termios)?;
        let mut device = Self {
            original,
            output: ENTER_SCREEN.to_vec(),
            restored: false,
        };
        device.set_input_mode(InputMode::default())?;
        device.flush()?;
        tracing::info!("terminal opened");
        Ok(device)
    }

    /// Append the SGR sequence for `attr` to the output buffer
    fn push_sgr(&mut self, attr: u32, colors: &ColorTable) {
        let mut params: Vec<String> = vec!["0".to_string()];
        if attr & A_BOLD != 0 {
            params.push("1".into());
        }
        if attr & A_DIM != 0 {
            params.push("2".into());
        }
        if attr & A_UNDERLINE != 0 {
            params.push("4".into());
        }
        if attr & A_BLINK != 0 {
            params.push("5".into());
        }
        if attr & (A_REVERSE | A_STANDOUT) != 0 {
            params.push("7".into());
        }
        if attr & A_INVIS != 0 {
            params.push("8".into());
        }
        let pair = pair_number(attr);
        if pair != 0 && colors.is_started() {
            if let Some(p) = colors.pair(pair) {
                params.push(color_param(colors, p.fg, 30));
                params.push(color_param(colors, p.bg, 40));
            }
        }
        self.output.extend_from_slice(b"\x1b[");
        self.output.extend_from_slice(params.join(";").as_bytes());
        self.output.push(b'm');
    }
}

/// SGR parameter selecting slot `slot` as foreground (`base` 30) or
/// background (`base` 40)
fn color_param(colors: &ColorTable, slot: i16, base: u16) -> String {
    let extended = base + 8;
    match colors.color(slot) {
        Some(rgb) if colors.is_redefined(slot) => {
            let (r, g, b) = rgb.to_rgb8();
            format!("{extended};2;{r};{g};{b}")
        }
        _ if (0..8).contains(&slot) => format!("{}", base + slot as u16),
        _ => format!("{extended};5;{}", slot.max(0)),
    }
}

impl Device for TtyDevice {
    fn size(&self) -> CursesResult<(usize, usize)> {
        let mut ws = libc::winsize {
            ws_row: 0,
            ws_col: 0,
            ws_xpixel: 0,
            ws_ypixel: 0,
        };
        // SAFETY: TIOCGWINSZ is a valid ioctl for getting window size
        let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };
        if result < 0 {
            return Err(CursesError::WindowSize(Errno::last()));
        }
        if ws.ws_col == 0 || ws.ws_row == 0 {
            return Ok((80, 24));
        }
        Ok((ws.ws_col as usize, ws.ws_row as usize))
    }

    fn capabilities(&self) -> Capabilities {
        let term = std::env::var("TERM").unwrap_or_default();
        let colorterm = std::env::var("COLORTERM").unwrap_or_default();
        if term.is_empty() || term == "dumb" {
            return Capabilities {
                colors: 0,
                can_change_color: false,
                mouse_events: 0,
            };
        }
        let colors = if term.contains("256color") || !colorterm.is_empty() {
            256
        } else {
            8
        };
        Capabilities {
            colors,
            can_change_color: colorterm == "truecolor" || colorterm == "24bit",
            mouse_events: ALL_MOUSE_EVENTS | REPORT_MOUSE_POSITION,
        }
    }

    fn set_input_mode(&mut self, mode: InputMode) -> CursesResult<()> {
        let mut attrs = self.original.clone();
        attrs.local_flags.remove(LocalFlags::ECHO);
        match mode {
            InputMode::Raw => {
                attrs
                    .local_flags
                    .remove(LocalFlags::ICANON | LocalFlags::ISIG | LocalFlags::IEXTEN);
                attrs.input_flags.remove(InputFlags::IXON);
            }
            _ if mode.is_line_buffered() => {
                attrs.local_flags.insert(LocalFlags::ICANON | LocalFlags::ISIG);
            }
            _ => {
                attrs.local_flags.remove(LocalFlags::ICANON);
                attrs.local_flags.insert(LocalFlags::ISIG);
            }
        }
        attrs.control_chars[SpecialCharacterIndices::VMIN as usize] = 1;
        attrs.control_chars[SpecialCharacterIndices::VTIME as usize] = 0;
        termios::tcsetattr(io::stdin(), SetArg::TCSANOW, &attrs).map_err(CursesError::Termios)?;
        tracing::debug!(?mode, "input mode applied");
        Ok(())
    }

    fn read_byte(&mut self, timeout: Option<Duration>) -> CursesResult<Option<u8>> {
        let stdin = io::stdin();
        let fd = stdin.as_fd();
        let timeout_ms = timeout
            .map(|t| t.as_millis().min(i32::MAX as u128) as i32)
            .unwrap_or(-1);
        let mut fds = [PollFd::new(&fd, PollFlags::POLLIN)];
        match poll(&mut fds, timeout_ms) {
            Ok(0) | Err(Errno::EINTR) => return Ok(None),
            Ok(_) => {}
            Err(e) => return Err(CursesError::Poll(e)),
        }
        let mut buf = [0u8; 1];
        match nix::unistd::read(libc::STDIN_FILENO, &mut buf) {
            Ok(0) | Err(Errno::EINTR) | Err(Errno::EAGAIN) => Ok(None),
            Ok(_) => Ok(Some(buf[0])),
            Err(e) => Err(CursesError::Read(e)),
        }
    }

    fn write_line(&mut self, row: usize, line: &Line, colors: &ColorTable) -> CursesResult<()> {
        write!(self.output, "\x1b[{};1H", row + 1)?;
        let mut current = None;
        let mut buf = [0u8; 4];
        for cell in line.cells() {
            if cell.wide_continuation {
                continue;
            }
            if current != Some(cell.attr) {
                self.push_sgr(cell.attr, colors);
                current = Some(cell.attr);
            }
            self.output
                .extend_from_slice(cell.ch.encode_utf8(&mut buf).as_bytes());
        }
        self.output.extend_from_slice(b"\x1b[0m");
        Ok(())
    }

    fn move_cursor(&mut self, col: usize, row: usize) -> CursesResult<()> {
        write!(self.output, "\x1b[{};{}H", row + 1, col + 1)?;
        Ok(())
    }

    fn set_mouse_tracking(&mut self, tracking: MouseTracking) -> CursesResult<()> {
        let sequence: &[u8] = match tracking {
            MouseTracking::Off => b"\x1b[?1003l\x1b[?1000l\x1b[?1006l",
            MouseTracking::Buttons => b"\x1b[?1003l\x1b[?1000h\x1b[?1006h",
            MouseTracking::AllMotion => b"\x1b[?1000h\x1b[?1003h\x1b[?1006h",
        };
        self.output.extend_from_slice(sequence);
        self.flush()
    }

    fn flush(&mut self) -> CursesResult<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(&self.output)?;
        stdout.flush()?;
        self.output.clear();
        Ok(())
    }

    fn restore(&mut self) -> CursesResult<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        self.output.extend_from_slice(LEAVE_SCREEN);
        self.flush()?;
        termios::tcsetattr(io::stdin(), SetArg::TCSANOW, &self.original)
            .map_err(CursesError::Termios)?;
        tracing::info!("terminal restored");
        Ok(())
    }
}

impl Drop for TtyDevice {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_param_basic_and_extended() {
        let mut colors = ColorTable::new(256, true);
        colors.start().unwrap();
        assert_eq!(color_param(&colors, 1, 30), "31");
        assert_eq!(color_param(&colors, 4, 40), "44");
        assert_eq!(color_param(&colors, 100, 30), "38;5;100");
        assert_eq!(color_param(&colors, 100, 40), "48;5;100");
    }

    #[test]
    fn test_color_param_redefined() {
        let mut colors = ColorTable::new(256, true);
        colors.start().unwrap();
        colors.define_color(1, 1000, 0, 0).unwrap();
        assert_eq!(color_param(&colors, 1, 30), "38;2;255;0;0");
    }
}
