//! Rendering attributes and base colors
//!
//! Attribute words use the ncurses `chtype` layout: the low byte carries a
//! character, bits 8-15 a color pair number, and the bits above that style
//! flags. Values are bit-exact with the ncurses ABI and must not be renumbered.

/// Attribute word (ncurses `attr_t`/`chtype`)
pub type Attr = u32;

/// Color slot number (ncurses `short`)
pub type ColorId = i16;

pub const A_NORMAL: Attr = 0;
pub const A_ATTRIBUTES: Attr = 0xffff_ff00;
pub const A_CHARTEXT: Attr = 0xff;
pub const A_COLOR: Attr = 0xff00;
pub const A_STANDOUT: Attr = 0x10000;
pub const A_UNDERLINE: Attr = 0x20000;
pub const A_REVERSE: Attr = 0x40000;
pub const A_BLINK: Attr = 0x80000;
pub const A_DIM: Attr = 0x100000;
pub const A_BOLD: Attr = 0x200000;
pub const A_ALTCHARSET: Attr = 0x400000;
pub const A_INVIS: Attr = 0x800000;
pub const A_PROTECT: Attr = 0x1000000;

pub const WA_NORMAL: Attr = A_NORMAL;
pub const WA_STANDOUT: Attr = A_STANDOUT;
pub const WA_UNDERLINE: Attr = A_UNDERLINE;
pub const WA_REVERSE: Attr = A_REVERSE;
pub const WA_BLINK: Attr = A_BLINK;
pub const WA_DIM: Attr = A_DIM;
pub const WA_BOLD: Attr = A_BOLD;
pub const WA_ALTCHARSET: Attr = A_ALTCHARSET;
pub const WA_INVIS: Attr = A_INVIS;
pub const WA_PROTECT: Attr = A_PROTECT;
pub const WA_LEFT: Attr = 0x4000000;
pub const WA_RIGHT: Attr = 0x10000000;

pub const COLOR_BLACK: ColorId = 0;
pub const COLOR_RED: ColorId = 1;
pub const COLOR_GREEN: ColorId = 2;
pub const COLOR_YELLOW: ColorId = 3;
pub const COLOR_BLUE: ColorId = 4;
pub const COLOR_MAGENTA: ColorId = 5;
pub const COLOR_CYAN: ColorId = 6;
pub const COLOR_WHITE: ColorId = 7;

/// Attribute selecting color pair `pair` (ncurses `COLOR_PAIR`)
pub const fn color_pair(pair: i16) -> Attr {
    ((pair as Attr) << 8) & A_COLOR
}

/// Color pair number stored in an attribute word (ncurses `PAIR_NUMBER`)
pub const fn pair_number(attr: Attr) -> i16 {
    ((attr & A_COLOR) >> 8) as i16
}

/// Combine the current attribute word with newly enabled flags. A color pair
/// in `flags` replaces the current pair instead of being OR'd into it.
pub(crate) fn enable(current: Attr, flags: Attr) -> Attr {
    let flags = flags & !A_CHARTEXT;
    if flags & A_COLOR != 0 {
        (current & !A_COLOR) | flags
    } else {
        current | flags
    }
}

/// Remove flags from the current attribute word. Any color bits in `flags`
/// reset the pair to 0.
pub(crate) fn disable(current: Attr, flags: Attr) -> Attr {
    let flags = flags & !A_CHARTEXT;
    if flags & A_COLOR != 0 {
        current & !(flags | A_COLOR)
    } else {
        current & !flags
    }
}
