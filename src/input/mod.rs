//! Input Decoding Module
//!
//! Turns the byte sequences a terminal sends for special keys and mouse
//! reports back into key codes. This is the inverse of what a terminal
//! emulator does when it encodes key presses:
//!
//! - Cursor keys arrive as `CSI A`..`CSI D` (normal mode) or `SS3 A`..`SS3 D`
//!   (application mode)
//! - Navigation and F5-F12 keys arrive as `CSI n ~`
//! - F1-F4 arrive as `SS3 P`..`SS3 S`
//! - Mouse reports arrive in the X10 encoding (`CSI M Cb Cx Cy`) or the SGR
//!   encoding (`CSI < Pb ; Px ; Py M/m`)
//!
//! Modifier parameters (`CSI 1 ; 5 A`) are accepted and ignored.

use crate::key::{
    key_f, KEY_BTAB, KEY_DC, KEY_DOWN, KEY_END, KEY_ENTER, KEY_HOME, KEY_IC, KEY_LEFT, KEY_NPAGE,
    KEY_PPAGE, KEY_RIGHT, KEY_UP,
};

/// Escape byte that starts every sequence
pub const ESC: u8 = 0x1b;

/// Longest sequence the decoder waits for before giving up
pub const MAX_SEQUENCE: usize = 32;

/// A raw mouse report as sent by the terminal, with 0-based coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseReport {
    /// Button code: low two bits select the button (3 = release in X10),
    /// 4/8/16 are shift/alt/ctrl, 32 is motion, 64 is the wheel
    pub code: u16,
    pub x: usize,
    pub y: usize,
    /// SGR release (`m` final byte)
    pub release: bool,
}

/// A decoded sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    Key(i32),
    Mouse(MouseReport),
}

/// Result of feeding the bytes collected so far to [`decode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decode {
    /// A sequence was recognized in the first `n` bytes
    Complete(Decoded, usize),
    /// The bytes are a valid prefix; more are needed
    Incomplete,
    /// The bytes do not start a known sequence; the escape should be
    /// delivered on its own and the rest as plain input
    Unknown,
}

/// Decode an escape sequence. `bytes` must start with [`ESC`].
pub fn decode(bytes: &[u8]) -> Decode {
    if bytes.first() != Some(&ESC) {
        return Decode::Unknown;
    }
    match bytes.get(1) {
        None => Decode::Incomplete,
        Some(b'O') => match bytes.get(2) {
            None => Decode::Incomplete,
            Some(&code) => ss3_key(code)
                .map(|key| Decode::Complete(Decoded::Key(key), 3))
                .unwrap_or(Decode::Unknown),
        },
        Some(b'[') => match bytes.get(2) {
            None => Decode::Incomplete,
            Some(b'M') => decode_x10_mouse(bytes),
            Some(b'<') => decode_sgr_mouse(bytes),
            Some(_) => decode_csi(bytes),
        },
        Some(_) => Decode::Unknown,
    }
}

/// `SS3 x` keys
fn ss3_key(code: u8) -> Option<i32> {
    Some(match code {
        b'A' => KEY_UP,
        b'B' => KEY_DOWN,
        b'C' => KEY_RIGHT,
        b'D' => KEY_LEFT,
        b'H' => KEY_HOME,
        b'F' => KEY_END,
        b'M' => KEY_ENTER,
        b'P' => key_f(1),
        b'Q' => key_f(2),
        b'R' => key_f(3),
        b'S' => key_f(4),
        _ => return None,
    })
}

/// `CSI n ~` keys
fn tilde_key(number: u16) -> Option<i32> {
    Some(match number {
        1 | 7 => KEY_HOME,
        2 => KEY_IC,
        3 => KEY_DC,
        4 | 8 => KEY_END,
        5 => KEY_PPAGE,
        6 => KEY_NPAGE,
        11..=15 => key_f((number - 10) as i32),
        17..=21 => key_f((number - 11) as i32),
        23 | 24 => key_f((number - 12) as i32),
        _ => return None,
    })
}

/// Parse `;`-separated decimal parameters. Empty parameters read as 0.
fn params(bytes: &[u8]) -> Option<Vec<u16>> {
    bytes
        .split(|&b| b == b';')
        .map(|p| {
            p.iter().try_fold(0u16, |acc, &d| {
                acc.checked_mul(10)?.checked_add((d - b'0') as u16)
            })
        })
        .collect()
}

fn decode_csi(bytes: &[u8]) -> Decode {
    for (i, &b) in bytes.iter().enumerate().skip(2) {
        if b.is_ascii_digit() || b == b';' {
            continue;
        }
        if !(0x40..=0x7e).contains(&b) {
            return Decode::Unknown;
        }
        let Some(args) = params(&bytes[2..i]) else {
            return Decode::Unknown;
        };
        let key = match b {
            b'~' => args.first().copied().and_then(tilde_key),
            b'Z' => Some(KEY_BTAB),
            b'P'..=b'S' | b'A'..=b'D' | b'H' | b'F' => ss3_key(b),
            _ => None,
        };
        return key
            .map(|key| Decode::Complete(Decoded::Key(key), i + 1))
            .unwrap_or(Decode::Unknown);
    }
    if bytes.len() >= MAX_SEQUENCE {
        Decode::Unknown
    } else {
        Decode::Incomplete
    }
}

fn decode_x10_mouse(bytes: &[u8]) -> Decode {
    if bytes.len() < 6 {
        return Decode::Incomplete;
    }
    let report = MouseReport {
        code: bytes[3].saturating_sub(32) as u16,
        x: bytes[4].saturating_sub(33) as usize,
        y: bytes[5].saturating_sub(33) as usize,
        release: false,
    };
    Decode::Complete(Decoded::Mouse(report), 6)
}

fn decode_sgr_mouse(bytes: &[u8]) -> Decode {
    for (i, &b) in bytes.iter().enumerate().skip(3) {
        if b.is_ascii_digit() || b == b';' {
            continue;
        }
        if b != b'M' && b != b'm' {
            return Decode::Unknown;
        }
        return match params(&bytes[3..i]).as_deref() {
            Some(&[code, x, y]) => Decode::Complete(
                Decoded::Mouse(MouseReport {
                    code,
                    x: x.saturating_sub(1) as usize,
                    y: y.saturating_sub(1) as usize,
                    release: b == b'm',
                }),
                i + 1,
            ),
            _ => Decode::Unknown,
        };
    }
    if bytes.len() >= MAX_SEQUENCE {
        Decode::Unknown
    } else {
        Decode::Incomplete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(bytes: &[u8]) -> Option<i32> {
        match decode(bytes) {
            Decode::Complete(Decoded::Key(k), n) if n == bytes.len() => Some(k),
            _ => None,
        }
    }

    #[test]
    fn test_cursor_keys_normal() {
        assert_eq!(key(b"\x1b[A"), Some(KEY_UP));
        assert_eq!(key(b"\x1b[B"), Some(KEY_DOWN));
        assert_eq!(key(b"\x1b[C"), Some(KEY_RIGHT));
        assert_eq!(key(b"\x1b[D"), Some(KEY_LEFT));
    }

    #[test]
    fn test_cursor_keys_application() {
        assert_eq!(key(b"\x1bOA"), Some(KEY_UP));
        assert_eq!(key(b"\x1bOB"), Some(KEY_DOWN));
    }

    #[test]
    fn test_cursor_keys_with_modifiers() {
        assert_eq!(key(b"\x1b[1;2A"), Some(KEY_UP));
        assert_eq!(key(b"\x1b[1;5D"), Some(KEY_LEFT));
    }

    #[test]
    fn test_navigation_keys() {
        assert_eq!(key(b"\x1b[1~"), Some(KEY_HOME));
        assert_eq!(key(b"\x1b[2~"), Some(KEY_IC));
        assert_eq!(key(b"\x1b[3~"), Some(KEY_DC));
        assert_eq!(key(b"\x1b[4~"), Some(KEY_END));
        assert_eq!(key(b"\x1b[5~"), Some(KEY_PPAGE));
        assert_eq!(key(b"\x1b[6~"), Some(KEY_NPAGE));
        assert_eq!(key(b"\x1b[H"), Some(KEY_HOME));
        assert_eq!(key(b"\x1b[F"), Some(KEY_END));
        assert_eq!(key(b"\x1b[Z"), Some(KEY_BTAB));
    }

    #[test]
    fn test_function_keys() {
        assert_eq!(key(b"\x1bOP"), Some(key_f(1)));
        assert_eq!(key(b"\x1bOS"), Some(key_f(4)));
        assert_eq!(key(b"\x1b[15~"), Some(key_f(5)));
        assert_eq!(key(b"\x1b[17~"), Some(key_f(6)));
        assert_eq!(key(b"\x1b[21~"), Some(key_f(10)));
        assert_eq!(key(b"\x1b[23~"), Some(key_f(11)));
        assert_eq!(key(b"\x1b[24~"), Some(key_f(12)));
        assert_eq!(key(b"\x1b[1;2P"), Some(key_f(1)));
    }

    #[test]
    fn test_keypad_enter() {
        assert_eq!(key(b"\x1bOM"), Some(KEY_ENTER));
    }

    #[test]
    fn test_incomplete_prefixes() {
        assert_eq!(decode(b"\x1b"), Decode::Incomplete);
        assert_eq!(decode(b"\x1b["), Decode::Incomplete);
        assert_eq!(decode(b"\x1bO"), Decode::Incomplete);
        assert_eq!(decode(b"\x1b[1;5"), Decode::Incomplete);
        assert_eq!(decode(b"\x1b[M !"), Decode::Incomplete);
        assert_eq!(decode(b"\x1b[<0;1"), Decode::Incomplete);
    }

    #[test]
    fn test_unknown_sequences() {
        assert_eq!(decode(b"\x1bx"), Decode::Unknown);
        assert_eq!(decode(b"\x1b[99~"), Decode::Unknown);
        assert_eq!(decode(b"\x1b[q"), Decode::Unknown);
        assert_eq!(decode(b"\x1bOz"), Decode::Unknown);
        assert_eq!(decode(b"\x1b[1\x01"), Decode::Unknown);
    }

    #[test]
    fn test_overlong_sequence() {
        let mut bytes = b"\x1b[".to_vec();
        bytes.extend(std::iter::repeat(b'1').take(MAX_SEQUENCE));
        assert_eq!(decode(&bytes), Decode::Unknown);
    }

    #[test]
    fn test_x10_mouse() {
        // Left press at column 10, row 5 (1-based), offset by 32
        let bytes = [0x1b, b'[', b'M', 32, 32 + 10, 32 + 5];
        assert_eq!(
            decode(&bytes),
            Decode::Complete(
                Decoded::Mouse(MouseReport {
                    code: 0,
                    x: 9,
                    y: 4,
                    release: false,
                }),
                6
            )
        );
    }

    #[test]
    fn test_sgr_mouse() {
        assert_eq!(
            decode(b"\x1b[<0;10;5M"),
            Decode::Complete(
                Decoded::Mouse(MouseReport {
                    code: 0,
                    x: 9,
                    y: 4,
                    release: false,
                }),
                10
            )
        );
        assert_eq!(
            decode(b"\x1b[<2;300;200m"),
            Decode::Complete(
                Decoded::Mouse(MouseReport {
                    code: 2,
                    x: 299,
                    y: 199,
                    release: true,
                }),
                13
            )
        );
    }

    #[test]
    fn test_sgr_mouse_wrong_arity() {
        assert_eq!(decode(b"\x1b[<0;10M"), Decode::Unknown);
    }
}
