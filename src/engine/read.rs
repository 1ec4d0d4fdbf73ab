//! Reading input through a window
//!
//! Bytes come from the device one at a time. With special keys enabled on
//! the reading window, escape sequences are decoded into key codes and
//! mouse reports are turned into queued mouse events.

use std::time::Duration;

use super::Engine;
use crate::error::CursesResult;
use crate::input::{decode, Decode, Decoded, ESC};
use crate::key::{ERR, KEY_BACKSPACE, KEY_ENTER, KEY_MOUSE};
use crate::window::WindowId;

const DEL: u8 = 0x7f;
const BACKSPACE: u8 = 0x08;

impl Engine {
    /// Next unconsumed byte, waiting up to `timeout` for the device
    fn next_byte(&mut self, timeout: Option<Duration>) -> CursesResult<Option<u8>> {
        if let Some(byte) = self.pending.pop_front() {
            return Ok(Some(byte));
        }
        self.device.read_byte(timeout)
    }

    /// Put bytes back in front of the pending input
    fn unread(&mut self, bytes: &[u8]) {
        for &byte in bytes.iter().rev() {
            self.pending.push_front(byte);
        }
    }

    /// Collect the rest of an escape sequence. `None` means the escape
    /// stands on its own; whatever followed it stays pending.
    fn read_sequence(&mut self) -> CursesResult<Option<Decoded>> {
        let delay = Some(self.config.escape_delay());
        let mut seq = vec![ESC];
        loop {
            match decode(&seq) {
                Decode::Complete(decoded, len) => {
                    self.unread(&seq[len..]);
                    return Ok(Some(decoded));
                }
                Decode::Unknown => {
                    tracing::trace!(bytes = ?seq, "unrecognized escape sequence");
                    self.unread(&seq[1..]);
                    return Ok(None);
                }
                Decode::Incomplete => match self.next_byte(delay)? {
                    Some(byte) => seq.push(byte),
                    None => {
                        self.unread(&seq[1..]);
                        return Ok(None);
                    }
                },
            }
        }
    }

    /// Read one key without echo. Returns `ERR` when the input mode's
    /// timeout expires or the input ends.
    fn read_key(&mut self, id: WindowId) -> CursesResult<i32> {
        let keypad = self.window(id)?.keypad;
        let timeout = self.input_mode.read_timeout();
        loop {
            let Some(byte) = self.next_byte(timeout)? else {
                return Ok(ERR);
            };
            if !keypad {
                return Ok(byte as i32);
            }
            match byte {
                DEL => return Ok(KEY_BACKSPACE),
                ESC => match self.read_sequence()? {
                    Some(Decoded::Key(key)) => return Ok(key),
                    Some(Decoded::Mouse(report)) => {
                        match self.mouse.translate(report, self.mouse_mask) {
                            Some(event) => {
                                self.push_mouse_event(event);
                                return Ok(KEY_MOUSE);
                            }
                            // Filtered out by the mask; keep reading
                            None => continue,
                        }
                    }
                    None => return Ok(ESC as i32),
                },
                _ => return Ok(byte as i32),
            }
        }
    }

    /// Show pending changes of the window before blocking on input
    fn refresh_before_read(&mut self, id: WindowId) -> CursesResult<()> {
        if self.window(id)?.is_touched() {
            self.refresh(id)?;
        }
        Ok(())
    }

    /// Read one key or character (ncurses `wgetch`)
    pub fn read_char(&mut self, id: WindowId) -> CursesResult<i32> {
        self.ensure_active()?;
        self.refresh_before_read(id)?;
        let key = self.read_key(id)?;
        if self.echo && (0x20..0x7f).contains(&key) {
            self.echo_char(id, key as u8 as char)?;
        }
        Ok(key)
    }

    /// Read a line (ncurses `wgetstr`). Stops at newline, carriage return,
    /// keypad Enter, a half-delay timeout or the end of input; the
    /// terminator is not included.
    /// Backspace and DEL remove the previous character.
    pub fn read_line(&mut self, id: WindowId) -> CursesResult<String> {
        self.ensure_active()?;
        self.refresh_before_read(id)?;
        let mut bytes: Vec<u8> = Vec::new();
        loop {
            let key = self.read_key(id)?;
            match key {
                ERR | KEY_ENTER => break,
                k if k == b'\n' as i32 || k == b'\r' as i32 => break,
                k if k == KEY_BACKSPACE || k == DEL as i32 || k == BACKSPACE as i32 => {
                    if pop_char(&mut bytes) && self.echo {
                        self.echo_erase(id)?;
                    }
                }
                k if (0..=0xff).contains(&k) => {
                    let byte = k as u8;
                    bytes.push(byte);
                    if self.echo && (0x20..0x7f).contains(&byte) {
                        self.echo_char(id, byte as char)?;
                    }
                }
                // Other special keys do not edit the line
                _ => {}
            }
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Drop the last UTF-8 character from `bytes`; false if it was empty
fn pop_char(bytes: &mut Vec<u8>) -> bool {
    let Some(mut byte) = bytes.pop() else {
        return false;
    };
    while byte & 0xc0 == 0x80 {
        match bytes.pop() {
            Some(b) => byte = b,
            None => break,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::super::tests::engine;
    use super::*;
    use crate::config::InputMode;
    use crate::key::{key_f, KEY_DC, KEY_LEFT, KEY_UP};
    use crate::mouse::{BUTTON1_PRESSED, BUTTON1_RELEASED};

    #[test]
    fn test_empty_input_returns_err() {
        let (mut engine, root, _) = engine(10, 3);
        engine.set_input_mode(InputMode::half_delay(1)).unwrap();
        assert_eq!(engine.read_char(root).unwrap(), ERR);
    }

    #[test]
    fn test_plain_bytes_without_keypad() {
        let (mut engine, root, handle) = engine(10, 3);
        handle.push_input(b"\x1b[A");
        assert_eq!(engine.read_char(root).unwrap(), 0x1b);
        assert_eq!(engine.read_char(root).unwrap(), b'[' as i32);
        assert_eq!(engine.read_char(root).unwrap(), b'A' as i32);
    }

    #[test]
    fn test_keypad_decoding() {
        let (mut engine, root, handle) = engine(10, 3);
        engine.set_keypad(root, true).unwrap();
        handle.push_input(b"\x1b[A\x1bOP\x1b[3~\x1b[1;5Dx\x7f");
        assert_eq!(engine.read_char(root).unwrap(), KEY_UP);
        assert_eq!(engine.read_char(root).unwrap(), key_f(1));
        assert_eq!(engine.read_char(root).unwrap(), KEY_DC);
        assert_eq!(engine.read_char(root).unwrap(), KEY_LEFT);
        assert_eq!(engine.read_char(root).unwrap(), b'x' as i32);
        assert_eq!(engine.read_char(root).unwrap(), KEY_BACKSPACE);
    }

    #[test]
    fn test_lone_and_unknown_escape() {
        let (mut engine, root, handle) = engine(10, 3);
        engine.set_keypad(root, true).unwrap();

        handle.push_input(b"\x1b");
        assert_eq!(engine.read_char(root).unwrap(), ESC as i32);

        handle.push_input(b"\x1bq");
        assert_eq!(engine.read_char(root).unwrap(), ESC as i32);
        assert_eq!(engine.read_char(root).unwrap(), b'q' as i32);

        handle.push_input(b"\x1b\x1b[B");
        assert_eq!(engine.read_char(root).unwrap(), ESC as i32);
        assert_eq!(engine.read_char(root).unwrap(), crate::key::KEY_DOWN);
    }

    #[test]
    fn test_truncated_sequence_is_replayed() {
        let (mut engine, root, handle) = engine(10, 3);
        engine.set_keypad(root, true).unwrap();
        engine.set_echo(false);
        handle.push_input(b"\x1b[1;");
        assert_eq!(engine.read_char(root).unwrap(), ESC as i32);
        assert_eq!(engine.read_char(root).unwrap(), b'[' as i32);
        assert_eq!(engine.read_char(root).unwrap(), b'1' as i32);
        assert_eq!(engine.read_char(root).unwrap(), b';' as i32);
    }

    #[test]
    fn test_mouse_report_queues_event() {
        let (mut engine, root, handle) = engine(40, 10);
        engine.set_keypad(root, true).unwrap();
        engine
            .set_mouse_mask(BUTTON1_PRESSED | BUTTON1_RELEASED)
            .unwrap();

        handle.push_input(b"\x1b[<0;5;3M\x1b[<0;5;3m");
        assert_eq!(engine.read_char(root).unwrap(), KEY_MOUSE);
        assert_eq!(engine.read_char(root).unwrap(), KEY_MOUSE);

        let press = engine.pop_mouse_event().unwrap();
        assert_eq!((press.state, press.x, press.y), (BUTTON1_PRESSED, 4, 2));
        let release = engine.pop_mouse_event().unwrap();
        assert_eq!(release.state, BUTTON1_RELEASED);
        assert!(engine.pop_mouse_event().is_none());
    }

    #[test]
    fn test_filtered_mouse_report_is_skipped() {
        let (mut engine, root, handle) = engine(40, 10);
        engine.set_keypad(root, true).unwrap();
        engine.set_mouse_mask(BUTTON1_PRESSED).unwrap();

        handle.push_input(b"\x1b[<2;1;1Mz");
        assert_eq!(engine.read_char(root).unwrap(), b'z' as i32);
        assert!(engine.pop_mouse_event().is_none());
    }

    #[test]
    fn test_echo_writes_into_window() {
        let (mut engine, root, handle) = engine(10, 3);
        handle.push_str("ok");
        engine.read_char(root).unwrap();
        engine.read_char(root).unwrap();
        assert_eq!(handle.row_text(0), "ok");

        engine.set_echo(false);
        handle.push_str("!");
        engine.read_char(root).unwrap();
        assert_eq!(engine.row_text(root, 0).unwrap().trim_end(), "ok");
    }

    #[test]
    fn test_read_line() {
        let (mut engine, root, handle) = engine(20, 3);
        handle.push_str("helo\x7flo\nrest");
        assert_eq!(engine.read_line(root).unwrap(), "hello");
        assert_eq!(handle.row_text(0), "hello");
        assert_eq!(engine.read_line(root).unwrap(), "rest");
    }

    #[test]
    fn test_read_line_multibyte_backspace() {
        let (mut engine, root, handle) = engine(20, 3);
        engine.set_echo(false);
        handle.push_input("añ\x08b\r".as_bytes());
        assert_eq!(engine.read_line(root).unwrap(), "ab");
    }

    #[test]
    fn test_read_line_keypad_enter() {
        let (mut engine, root, handle) = engine(20, 3);
        engine.set_keypad(root, true).unwrap();
        handle.push_input(b"ab\x1b[Dc\x1bOM");
        assert_eq!(engine.read_line(root).unwrap(), "abc");
    }

    #[test]
    fn test_read_refreshes_touched_window() {
        let (mut engine, root, handle) = engine(10, 3);
        engine.write_str(root, "prompt").unwrap();
        engine.set_input_mode(InputMode::half_delay(1)).unwrap();
        engine.read_char(root).unwrap();
        assert_eq!(handle.row_text(0), "prompt");
    }

    #[test]
    fn test_pop_char() {
        let mut bytes = "aé".as_bytes().to_vec();
        assert!(pop_char(&mut bytes));
        assert_eq!(bytes, b"a");
        assert!(pop_char(&mut bytes));
        assert!(!pop_char(&mut bytes));
    }
}
