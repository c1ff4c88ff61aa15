//! Terminal adapter: raw mode, timed byte reads and window size.

use crossterm::terminal;
use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, Read, Write};
use std::os::fd::AsFd;
use std::time::Duration;

/// Clears the screen and homes the cursor.
pub const CLEAR_SCREEN: &[u8] = b"\x1b[2J\x1b[H";

/// A source of raw input bytes.
pub trait ByteSource {
    /// Reads one byte. `Ok(None)` means the read timed out.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

/// Puts the terminal in raw mode and restores it when dropped.
///
/// Dropping also clears the screen, so the shell gets a clean terminal
/// back on every exit path, panics included.
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    pub fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        log::debug!("Raw mode enabled");
        Ok(Self { _private: () })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(CLEAR_SCREEN);
        let _ = stdout.flush();
        if let Err(e) = terminal::disable_raw_mode() {
            log::error!("Failed to restore terminal mode: {}", e);
        }
    }
}

/// Unbuffered reads from the controlling terminal's stdin.
///
/// Reads go straight to a duplicate of the stdin descriptor so that bytes
/// of an escape sequence are never hidden in a userspace buffer while
/// `poll` reports the descriptor idle.
pub struct StdinSource {
    tty: File,
    timeout: PollTimeout,
}

impl StdinSource {
    pub fn new(timeout: Duration) -> io::Result<Self> {
        let fd = io::stdin().as_fd().try_clone_to_owned()?;
        let millis = u16::try_from(timeout.as_millis()).unwrap_or(u16::MAX);
        Ok(Self {
            tty: File::from(fd),
            timeout: PollTimeout::from(millis),
        })
    }
}

impl ByteSource for StdinSource {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut fds = [PollFd::new(self.tty.as_fd(), PollFlags::POLLIN)];
        match poll(&mut fds, self.timeout) {
            Ok(0) => return Ok(None),
            Ok(_) => {}
            Err(Errno::EINTR) | Err(Errno::EAGAIN) => return Ok(None),
            Err(e) => return Err(io::Error::from(e)),
        }

        let mut buf = [0u8; 1];
        match self.tty.read(&mut buf) {
            Ok(0) => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "terminal input closed",
            )),
            Ok(_) => Ok(Some(buf[0])),
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted) => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// In-memory byte source. `None` entries are delivered as read timeouts,
/// and an exhausted script reports end of input.
#[derive(Debug, Default, Clone)]
pub struct ScriptedSource {
    script: VecDeque<Option<u8>>,
}

impl ScriptedSource {
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            script: bytes.iter().copied().map(Some).collect(),
        }
    }

    /// Appends bytes to the script.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.script.extend(bytes.iter().copied().map(Some));
    }

    /// Appends a read timeout to the script.
    pub fn push_timeout(&mut self) {
        self.script.push_back(None);
    }

    pub fn is_empty(&self) -> bool {
        self.script.is_empty()
    }
}

impl ByteSource for ScriptedSource {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        self.script.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted")
        })
    }
}

/// Returns the terminal size as (rows, cols).
///
/// Asks the terminal driver first. When that fails, moves the cursor to
/// the bottom-right corner and asks the terminal where it ended up.
pub fn window_size<S, W>(input: &mut S, output: &mut W) -> io::Result<(usize, usize)>
where
    S: ByteSource + ?Sized,
    W: Write + ?Sized,
{
    match terminal::size() {
        Ok((cols, rows)) if cols > 0 && rows > 0 => return Ok((rows as usize, cols as usize)),
        Ok(_) => log::debug!("Terminal reported zero size, probing"),
        Err(e) => log::debug!("Window size query failed ({}), probing", e),
    }

    output.write_all(b"\x1b[999C\x1b[999B")?;
    cursor_position(input, output)
}

/// Requests a cursor position report and parses the reply.
pub fn cursor_position<S, W>(input: &mut S, output: &mut W) -> io::Result<(usize, usize)>
where
    S: ByteSource + ?Sized,
    W: Write + ?Sized,
{
    output.write_all(b"\x1b[6n")?;
    output.flush()?;

    let mut reply = Vec::with_capacity(32);
    while reply.len() < 32 {
        match input.read_byte()? {
            Some(b'R') | None => break,
            Some(b) => reply.push(b),
        }
    }

    parse_cursor_report(&reply).ok_or_else(|| {
        io::Error::new(io::ErrorKind::Other, "unable to determine window size")
    })
}

/// Parses `ESC [ rows ; cols` with an optional trailing `R`.
pub fn parse_cursor_report(reply: &[u8]) -> Option<(usize, usize)> {
    let body = reply.strip_prefix(b"\x1b[")?;
    let body = body.strip_suffix(b"R").unwrap_or(body);
    let text = std::str::from_utf8(body).ok()?;
    let (rows, cols) = text.split_once(';')?;
    let rows: usize = rows.parse().ok()?;
    let cols: usize = cols.parse().ok()?;
    if rows == 0 || cols == 0 {
        return None;
    }
    Some((rows, cols))
}
