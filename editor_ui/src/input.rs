//! Key mapping and command execution.

use kestrel_core::{Direction, Editor, Key};

/// Represents an editor command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    // File operations
    Save,
    Quit,
    Find,

    // Text input
    InsertChar(u8),
    InsertNewline,

    // Deletion
    DeleteBackward,
    DeleteForward,

    // Cursor movement
    Move(Direction),
    MoveToLineStart,
    MoveToLineEnd,
    MovePageUp,
    MovePageDown,

    /// Keys that only trigger a redraw.
    Refresh,
}

/// Maps a decoded key to the command it triggers.
pub fn command_for_key(key: Key) -> EditorCommand {
    const QUIT: Key = Key::ctrl(b'q');
    const SAVE: Key = Key::ctrl(b's');
    const FIND: Key = Key::ctrl(b'f');
    const BACKSPACE_ALT: Key = Key::ctrl(b'h');
    const REDRAW: Key = Key::ctrl(b'l');

    match key {
        Key::ENTER => EditorCommand::InsertNewline,
        QUIT => EditorCommand::Quit,
        SAVE => EditorCommand::Save,
        FIND => EditorCommand::Find,
        Key::BACKSPACE | BACKSPACE_ALT => EditorCommand::DeleteBackward,
        Key::Delete => EditorCommand::DeleteForward,
        Key::Home => EditorCommand::MoveToLineStart,
        Key::End => EditorCommand::MoveToLineEnd,
        Key::PageUp => EditorCommand::MovePageUp,
        Key::PageDown => EditorCommand::MovePageDown,
        Key::ArrowLeft => EditorCommand::Move(Direction::Left),
        Key::ArrowRight => EditorCommand::Move(Direction::Right),
        Key::ArrowUp => EditorCommand::Move(Direction::Up),
        Key::ArrowDown => EditorCommand::Move(Direction::Down),
        REDRAW | Key::ESCAPE => EditorCommand::Refresh,
        Key::Char(c) => EditorCommand::InsertChar(c),
    }
}

/// Applies a command that needs nothing but the editor.
///
/// Returns false for commands that must be handled by the front end
/// (save, quit and find), which are left untouched.
pub fn execute_command(editor: &mut Editor, command: EditorCommand) -> bool {
    match command {
        EditorCommand::Save | EditorCommand::Quit | EditorCommand::Find => return false,

        EditorCommand::InsertChar(c) => editor.insert_char(c),
        EditorCommand::InsertNewline => editor.insert_newline(),

        EditorCommand::DeleteBackward => editor.delete_char(),
        EditorCommand::DeleteForward => editor.delete_forward(),

        EditorCommand::Move(direction) => editor.move_cursor(direction),
        EditorCommand::MoveToLineStart => editor.move_to_line_start(),
        EditorCommand::MoveToLineEnd => editor.move_to_line_end(),
        EditorCommand::MovePageUp => editor.page_up(),
        EditorCommand::MovePageDown => editor.page_down(),

        EditorCommand::Refresh => {}
    }
    true
}
