//! Editor UI - Terminal front end.
//!
//! This crate decodes key presses from raw terminal input, composes
//! frames of VT100 escape sequences and runs the main editor loop.

pub mod app;
pub mod compositor;
pub mod decoder;
pub mod input;
pub mod terminal;

pub use app::{App, HELP_MESSAGE};
pub use compositor::Compositor;
pub use decoder::read_key;
pub use input::{command_for_key, execute_command, EditorCommand};
pub use terminal::{window_size, ByteSource, RawModeGuard, ScriptedSource, StdinSource};
