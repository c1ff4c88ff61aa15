//! Main editor logic.
//!
//! [`Editor`] is the single session object: the document, the cursor, the
//! viewport, the file name and the status message. Front ends drive it one
//! key at a time and render it between keys.

use crate::config::EditorConfig;
use crate::cursor::{move_position, Direction, Position};
use crate::document::Document;
use crate::error::{EditorError, Result};
use crate::status::StatusMessage;
use crate::syntax::{Highlight, SyntaxDef};
use std::path::{Path, PathBuf};

/// Cursor and viewport snapshot, restored when a prompt is cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub cursor: Position,
    pub row_offset: usize,
    pub col_offset: usize,
}

/// The editor session.
#[derive(Debug, Clone)]
pub struct Editor {
    /// The text document.
    document: Document,
    /// Cursor as (row, byte column).
    cursor: Position,
    /// Cursor column in render space, refreshed by `scroll_to_cursor`.
    render_x: usize,
    /// First visible row.
    row_offset: usize,
    /// First visible render column.
    col_offset: usize,
    /// Number of text rows on screen.
    screen_rows: usize,
    /// Number of columns on screen.
    screen_cols: usize,
    /// Current file path, if any.
    file_path: Option<PathBuf>,
    status: StatusMessage,
    config: EditorConfig,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Creates an empty, untitled editor.
    pub fn new(config: EditorConfig) -> Self {
        Self {
            document: Document::new(config.tab_stop),
            cursor: Position::default(),
            render_x: 0,
            row_offset: 0,
            col_offset: 0,
            screen_rows: 24,
            screen_cols: 80,
            file_path: None,
            status: StatusMessage::default(),
            config,
        }
    }

    /// Opens a file, replacing the current document.
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let document = Document::from_file(path, self.config.tab_stop)?;
        log::info!("Opened {} ({} rows)", path.display(), document.len());
        self.replace_document(document);
        self.set_file_path(path);
        Ok(())
    }

    /// Replaces the document and resets cursor and viewport.
    /// The active syntax carries over to the new document.
    pub fn replace_document(&mut self, mut document: Document) {
        document.set_syntax(self.document.syntax());
        self.document = document;
        self.cursor = Position::default();
        self.render_x = 0;
        self.row_offset = 0;
        self.col_offset = 0;
    }

    /// Sets the file path and re-selects the syntax from its name.
    pub fn set_file_path<P: AsRef<Path>>(&mut self, path: P) {
        let path = path.as_ref();
        let syntax = SyntaxDef::for_path(path);
        log::debug!(
            "Syntax for {}: {}",
            path.display(),
            syntax.map_or("none", |s| s.id)
        );
        self.file_path = Some(path.to_path_buf());
        self.document.set_syntax(syntax);
    }

    /// Saves the document to the current file path and returns the number
    /// of bytes written. The dirty counter is reset only on success.
    pub fn save(&mut self) -> Result<usize> {
        let path = self.file_path.as_ref().ok_or(EditorError::NoFileName)?;
        let written = self.document.save_to_file(path)?;
        log::info!("Saved {} bytes to {}", written, path.display());
        self.document.mark_clean();
        Ok(written)
    }

    /// Returns the current file path.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Returns the file path as shown to the user.
    pub fn file_name(&self) -> Option<String> {
        self.file_path
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned())
    }

    /// Returns a reference to the document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub(crate) fn highlight_mut(&mut self, line: usize) -> Option<&mut Vec<Highlight>> {
        self.document.highlight_mut(line)
    }

    /// Returns whether the document has unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.document.is_dirty()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Returns the cursor position.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Returns the cursor column in render space.
    pub fn render_x(&self) -> usize {
        self.render_x
    }

    /// Returns the first visible row.
    pub fn row_offset(&self) -> usize {
        self.row_offset
    }

    /// Returns the first visible render column.
    pub fn col_offset(&self) -> usize {
        self.col_offset
    }

    pub fn screen_rows(&self) -> usize {
        self.screen_rows
    }

    pub fn screen_cols(&self) -> usize {
        self.screen_cols
    }

    /// Sets the text area size (excluding status and message bars).
    pub fn set_screen_size(&mut self, rows: usize, cols: usize) {
        self.screen_rows = rows.max(1);
        self.screen_cols = cols.max(1);
        self.scroll_to_cursor();
    }

    /// Sets the status message.
    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = StatusMessage::new(text);
    }

    pub fn status(&self) -> &StatusMessage {
        &self.status
    }

    /// Returns the status text if it has not timed out.
    pub fn visible_status(&self) -> Option<&str> {
        self.status.visible_text(self.config.message_timeout)
    }

    /// Captures cursor and viewport.
    pub fn view_state(&self) -> ViewState {
        ViewState {
            cursor: self.cursor,
            row_offset: self.row_offset,
            col_offset: self.col_offset,
        }
    }

    /// Restores a captured cursor and viewport.
    pub fn restore_view(&mut self, state: ViewState) {
        self.cursor = state.cursor;
        self.row_offset = state.row_offset;
        self.col_offset = state.col_offset;
        self.clamp_cursor();
        self.scroll_to_cursor();
    }

    /// Places the cursor and centers the viewport vertically on its row.
    pub fn center_on(&mut self, pos: Position) {
        self.cursor = pos;
        self.clamp_cursor();
        self.row_offset = self.cursor.line.saturating_sub(self.screen_rows / 2);
        self.scroll_to_cursor();
    }

    /// Adjusts the viewport so the cursor is visible.
    pub fn scroll_to_cursor(&mut self) {
        let tab_stop = self.document.tab_stop();
        self.render_x = self
            .document
            .row(self.cursor.line)
            .map_or(0, |row| row.char_to_render_index(self.cursor.col, tab_stop));

        // Vertical scrolling
        if self.cursor.line < self.row_offset {
            self.row_offset = self.cursor.line;
        } else if self.cursor.line >= self.row_offset + self.screen_rows {
            self.row_offset = self.cursor.line + 1 - self.screen_rows;
        }

        // Horizontal scrolling
        if self.render_x < self.col_offset {
            self.col_offset = self.render_x;
        } else if self.render_x >= self.col_offset + self.screen_cols {
            self.col_offset = self.render_x + 1 - self.screen_cols;
        }
    }

    fn clamp_cursor(&mut self) {
        self.cursor.line = self.cursor.line.min(self.document.len());
        let max_col = self.document.row(self.cursor.line).map_or(0, |r| r.size());
        self.cursor.col = self.cursor.col.min(max_col);
    }

    // ==================== Text Editing ====================

    /// Inserts a byte at the cursor. On the line past the end, a new row
    /// is appended first.
    pub fn insert_char(&mut self, c: u8) {
        if self.cursor.line == self.document.len() {
            self.document.append_row(Vec::new());
        }
        self.document.insert_char(self.cursor.line, self.cursor.col, c);
        self.cursor.col += 1;
        self.scroll_to_cursor();
    }

    /// Breaks the line at the cursor.
    pub fn insert_newline(&mut self) {
        if self.cursor.col == 0 {
            let at = self.cursor.line.min(self.document.len());
            if let Err(e) = self.document.insert_row(at, b"") {
                log::error!("Failed to insert row: {}", e);
            }
        } else {
            self.document.split_row(self.cursor.line, self.cursor.col);
        }
        self.cursor.line += 1;
        self.cursor.col = 0;
        self.scroll_to_cursor();
    }

    /// Deletes the byte before the cursor (backspace). At column 0 the
    /// current line is joined onto the previous one.
    pub fn delete_char(&mut self) {
        if self.cursor.line >= self.document.len() {
            return;
        }
        if self.cursor.col == 0 && self.cursor.line == 0 {
            return;
        }

        if self.cursor.col > 0 {
            self.document.delete_char(self.cursor.line, self.cursor.col - 1);
            self.cursor.col -= 1;
        } else if let Some(join_at) = self.document.merge_into_previous(self.cursor.line) {
            self.cursor.line -= 1;
            self.cursor.col = join_at;
        }
        self.scroll_to_cursor();
    }

    /// Deletes the byte under the cursor (delete key). At the end of a
    /// line the next line is joined onto it.
    pub fn delete_forward(&mut self) {
        let Some(len) = self.document.row(self.cursor.line).map(|r| r.size()) else {
            return;
        };
        if self.cursor.col < len {
            self.document.delete_char(self.cursor.line, self.cursor.col);
        } else {
            self.document.merge_into_previous(self.cursor.line + 1);
        }
        self.scroll_to_cursor();
    }

    // ==================== Cursor Movement ====================

    /// Moves the cursor one step, wrapping at line boundaries.
    pub fn move_cursor(&mut self, direction: Direction) {
        self.cursor = move_position(&self.document, self.cursor, direction);
        self.scroll_to_cursor();
    }

    /// Moves cursor to the start of the line.
    pub fn move_to_line_start(&mut self) {
        self.cursor.col = 0;
        self.scroll_to_cursor();
    }

    /// Moves cursor to the end of the line.
    pub fn move_to_line_end(&mut self) {
        if let Some(row) = self.document.row(self.cursor.line) {
            self.cursor.col = row.size();
        }
        self.scroll_to_cursor();
    }

    /// Moves the cursor to the top of the screen, then up one screen.
    pub fn page_up(&mut self) {
        self.cursor.line = self.row_offset;
        for _ in 0..self.screen_rows {
            self.cursor = move_position(&self.document, self.cursor, Direction::Up);
        }
        self.scroll_to_cursor();
    }

    /// Moves the cursor to the bottom of the screen, then down one screen.
    pub fn page_down(&mut self) {
        self.cursor.line = (self.row_offset + self.screen_rows - 1).min(self.document.len());
        for _ in 0..self.screen_rows {
            self.cursor = move_position(&self.document, self.cursor, Direction::Down);
        }
        self.scroll_to_cursor();
    }
}
