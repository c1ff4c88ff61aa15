//! Escape sequence decoding.
//!
//! Turns raw terminal bytes into [`Key`]s. A lone ESC, or an ESC followed
//! by bytes that do not form a known sequence, decodes as the Escape key.

use crate::terminal::ByteSource;
use kestrel_core::key::ESC;
use kestrel_core::Key;
use std::io;

/// Blocks until a key is available and decodes it.
///
/// Only the first byte waits indefinitely; the bytes following an ESC get
/// a single timed read each, so a bare Escape press is not held up.
pub fn read_key<S: ByteSource + ?Sized>(source: &mut S) -> io::Result<Key> {
    let byte = loop {
        if let Some(b) = source.read_byte()? {
            break b;
        }
    };
    if byte != ESC {
        return Ok(Key::Char(byte));
    }

    let Some(first) = source.read_byte()? else {
        return Ok(Key::ESCAPE);
    };
    let Some(second) = source.read_byte()? else {
        return Ok(Key::ESCAPE);
    };

    let key = match (first, second) {
        (b'[', digit @ b'0'..=b'9') => match source.read_byte()? {
            Some(b'~') => tilde_key(digit),
            _ => None,
        },
        (b'[', b'A') => Some(Key::ArrowUp),
        (b'[', b'B') => Some(Key::ArrowDown),
        (b'[', b'C') => Some(Key::ArrowRight),
        (b'[', b'D') => Some(Key::ArrowLeft),
        (b'[', b'H') | (b'O', b'H') => Some(Key::Home),
        (b'[', b'F') | (b'O', b'F') => Some(Key::End),
        _ => None,
    };
    Ok(key.unwrap_or(Key::ESCAPE))
}

/// Maps `ESC [ <digit> ~` sequences.
fn tilde_key(digit: u8) -> Option<Key> {
    match digit {
        b'1' | b'7' => Some(Key::Home),
        b'3' => Some(Key::Delete),
        b'4' | b'8' => Some(Key::End),
        b'5' => Some(Key::PageUp),
        b'6' => Some(Key::PageDown),
        _ => None,
    }
}
