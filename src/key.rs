//! Input key codes
//!
//! Codes returned by `Window::read_char`. Values below 0x100 are raw input
//! bytes; special keys decoded in keypad mode use the ncurses numbering and
//! must not be renumbered.

/// Returned by reads when no input is available
pub const ERR: i32 = -1;
/// Success return value of the ncurses ABI
pub const OK: i32 = 0;

pub const KEY_BREAK: i32 = 0x101;
pub const KEY_DOWN: i32 = 0x102;
pub const KEY_UP: i32 = 0x103;
pub const KEY_LEFT: i32 = 0x104;
pub const KEY_RIGHT: i32 = 0x105;
pub const KEY_HOME: i32 = 0x106;
pub const KEY_BACKSPACE: i32 = 0x107;
/// Function key 0; function key `n` is `KEY_F0 + n`
pub const KEY_F0: i32 = 0x108;
pub const KEY_DL: i32 = 0x148;
pub const KEY_IL: i32 = 0x149;
pub const KEY_DC: i32 = 0x14a;
pub const KEY_IC: i32 = 0x14b;
pub const KEY_EIC: i32 = 0x14c;
pub const KEY_CLEAR: i32 = 0x14d;
pub const KEY_EOS: i32 = 0x14e;
pub const KEY_EOL: i32 = 0x14f;
pub const KEY_SF: i32 = 0x150;
pub const KEY_SR: i32 = 0x151;
pub const KEY_NPAGE: i32 = 0x152;
pub const KEY_PPAGE: i32 = 0x153;
pub const KEY_STAB: i32 = 0x154;
pub const KEY_CTAB: i32 = 0x155;
pub const KEY_CATAB: i32 = 0x156;
pub const KEY_ENTER: i32 = 0x157;
pub const KEY_SRESET: i32 = 0x158;
pub const KEY_RESET: i32 = 0x159;
pub const KEY_PRINT: i32 = 0x15a;
pub const KEY_LL: i32 = 0x15b;
pub const KEY_A1: i32 = 0x15c;
pub const KEY_A3: i32 = 0x15d;
pub const KEY_B2: i32 = 0x15e;
pub const KEY_C1: i32 = 0x15f;
pub const KEY_C3: i32 = 0x160;
pub const KEY_BTAB: i32 = 0x161;
pub const KEY_BEG: i32 = 0x162;
pub const KEY_CANCEL: i32 = 0x163;
pub const KEY_CLOSE: i32 = 0x164;
pub const KEY_COMMAND: i32 = 0x165;
pub const KEY_COPY: i32 = 0x166;
pub const KEY_CREATE: i32 = 0x167;
pub const KEY_END: i32 = 0x168;
pub const KEY_EXIT: i32 = 0x169;
pub const KEY_FIND: i32 = 0x16a;
pub const KEY_HELP: i32 = 0x16b;
pub const KEY_MARK: i32 = 0x16c;
pub const KEY_MESSAGE: i32 = 0x16d;
pub const KEY_MOVE: i32 = 0x16e;
pub const KEY_NEXT: i32 = 0x16f;
pub const KEY_OPEN: i32 = 0x170;
pub const KEY_OPTIONS: i32 = 0x171;
pub const KEY_PREVIOUS: i32 = 0x172;
pub const KEY_REDO: i32 = 0x173;
pub const KEY_REFERENCE: i32 = 0x174;
pub const KEY_REFRESH: i32 = 0x175;
pub const KEY_REPLACE: i32 = 0x176;
pub const KEY_RESTART: i32 = 0x177;
pub const KEY_RESUME: i32 = 0x178;
pub const KEY_SAVE: i32 = 0x179;
pub const KEY_SBEG: i32 = 0x17a;
pub const KEY_SCANCEL: i32 = 0x17b;
pub const KEY_SCOMMAND: i32 = 0x17c;
pub const KEY_SCOPY: i32 = 0x17d;
pub const KEY_SCREATE: i32 = 0x17e;
pub const KEY_SDC: i32 = 0x17f;
pub const KEY_SDL: i32 = 0x180;
pub const KEY_SELECT: i32 = 0x181;
pub const KEY_SEND: i32 = 0x182;
pub const KEY_SEOL: i32 = 0x183;
pub const KEY_SEXIT: i32 = 0x184;
pub const KEY_SFIND: i32 = 0x185;
pub const KEY_SHELP: i32 = 0x186;
pub const KEY_SHOME: i32 = 0x187;
pub const KEY_SIC: i32 = 0x188;
pub const KEY_SLEFT: i32 = 0x189;
pub const KEY_SMESSAGE: i32 = 0x18a;
pub const KEY_SMOVE: i32 = 0x18b;
pub const KEY_SNEXT: i32 = 0x18c;
pub const KEY_SOPTIONS: i32 = 0x18d;
pub const KEY_SPREVIOUS: i32 = 0x18e;
pub const KEY_SPRINT: i32 = 0x18f;
pub const KEY_SREDO: i32 = 0x190;
pub const KEY_SREPLACE: i32 = 0x191;
pub const KEY_SRIGHT: i32 = 0x192;
pub const KEY_SRSUME: i32 = 0x193;
pub const KEY_SSAVE: i32 = 0x194;
pub const KEY_SSUSPEND: i32 = 0x195;
pub const KEY_SUNDO: i32 = 0x196;
pub const KEY_SUSPEND: i32 = 0x197;
pub const KEY_UNDO: i32 = 0x198;
/// A mouse report was queued; fetch it with `Mouse::poll`
pub const KEY_MOUSE: i32 = 0o631;

/// Code of function key `n` (ncurses `KEY_F(n)`)
pub const fn key_f(n: i32) -> i32 {
    KEY_F0 + n
}

/// Check whether a read result is a decoded special key rather than a byte
pub fn is_special_key(code: i32) -> bool {
    code >= KEY_BREAK
}

/// Human-readable name of a key code, in the style of ncurses `keyname`
pub fn key_name(code: i32) -> String {
    match code {
        ERR => "ERR".to_string(),
        KEY_DOWN => "KEY_DOWN".to_string(),
        KEY_UP => "KEY_UP".to_string(),
        KEY_LEFT => "KEY_LEFT".to_string(),
        KEY_RIGHT => "KEY_RIGHT".to_string(),
        KEY_HOME => "KEY_HOME".to_string(),
        KEY_END => "KEY_END".to_string(),
        KEY_BACKSPACE => "KEY_BACKSPACE".to_string(),
        KEY_DC => "KEY_DC".to_string(),
        KEY_IC => "KEY_IC".to_string(),
        KEY_NPAGE => "KEY_NPAGE".to_string(),
        KEY_PPAGE => "KEY_PPAGE".to_string(),
        KEY_ENTER => "KEY_ENTER".to_string(),
        KEY_BTAB => "KEY_BTAB".to_string(),
        KEY_MOUSE => "KEY_MOUSE".to_string(),
        c if (KEY_F0..=key_f(63)).contains(&c) => format!("KEY_F({})", c - KEY_F0),
        c @ 0..=0x1f => format!("^{}", ((c as u8) ^ 0x40) as char),
        0x7f => "^?".to_string(),
        c @ 0x20..=0x7e => ((c as u8) as char).to_string(),
        c => format!("0x{:x}", c),
    }
}
