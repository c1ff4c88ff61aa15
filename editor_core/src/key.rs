//! Logical key events.

/// Escape byte.
pub const ESC: u8 = 0x1b;
/// Byte sent by the Backspace key.
pub const BACKSPACE: u8 = 127;
/// Byte sent by the Enter key in raw mode.
pub const ENTER: u8 = b'\r';

/// Returns the byte produced by Ctrl plus `c`.
pub const fn ctrl(c: u8) -> u8 {
    c & 0x1f
}

/// A decoded key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A literal byte, control bytes included.
    Char(u8),
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
}

impl Key {
    pub const ESCAPE: Key = Key::Char(ESC);
    pub const ENTER: Key = Key::Char(ENTER);
    pub const BACKSPACE: Key = Key::Char(BACKSPACE);

    /// Returns the key for Ctrl plus `c`.
    pub const fn ctrl(c: u8) -> Key {
        Key::Char(ctrl(c))
    }

    /// Returns true for printable ASCII (space through `~`).
    pub fn is_printable(self) -> bool {
        matches!(self, Key::Char(b) if (32..127).contains(&b))
    }
}
