//! Main application loop.
//!
//! Owns the editor together with a byte source and an output sink, and
//! drives the refresh, read key, process key cycle until the user quits.

use crate::compositor::Compositor;
use crate::decoder::read_key;
use crate::input::{command_for_key, execute_command, EditorCommand};
use crate::terminal::{ByteSource, CLEAR_SCREEN};
use kestrel_core::{Editor, EditorError, Key, PromptCallback, SearchSession};
use std::io::{self, Write};
use std::path::Path;

/// Shown on the message bar at startup.
pub const HELP_MESSAGE: &str = "HELP: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find";

const SAVE_AS_PROMPT: &str = "Save as: {} (ESC to cancel)";
const SEARCH_PROMPT: &str = "Search: {} (Use ESC/Arrows/Enter)";

/// Rows taken by the status bar and the message bar.
const BAR_ROWS: usize = 2;

/// The terminal editor application.
pub struct App<S: ByteSource, W: Write> {
    /// The editor state.
    pub editor: Editor,
    input: S,
    output: W,
    compositor: Compositor,
    /// Reused frame buffer.
    frame: Vec<u8>,
    /// Ctrl-Q presses still needed to discard unsaved changes.
    quit_remaining: u8,
}

impl<S: ByteSource, W: Write> App<S, W> {
    pub fn new(editor: Editor, input: S, output: W) -> Self {
        let quit_remaining = editor.config().quit_times;
        Self {
            editor,
            input,
            output,
            compositor: Compositor::default(),
            frame: Vec::new(),
            quit_remaining,
        }
    }

    /// Returns the output sink.
    pub fn output(&self) -> &W {
        &self.output
    }

    /// Sizes the text area for a terminal of `rows` x `cols`, leaving
    /// room for the two bars.
    pub fn set_window_size(&mut self, rows: usize, cols: usize) {
        self.editor
            .set_screen_size(rows.saturating_sub(BAR_ROWS), cols);
    }

    /// Opens a file. A missing file starts an empty document with that
    /// name; any other failure is reported on the message bar.
    pub fn open(&mut self, path: &Path) {
        match self.editor.open(path) {
            Ok(()) => log::info!("Opened file: {}", path.display()),
            Err(EditorError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("New file: {}", path.display());
                self.editor.set_file_path(path);
            }
            Err(e) => {
                log::error!("Failed to open {}: {}", path.display(), e);
                self.editor
                    .set_status(format!("Can't open {}: {}", path.display(), e));
            }
        }
    }

    /// Runs until the user quits.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.refresh_screen()?;
            let key = read_key(&mut self.input)?;
            if !self.process_key(key)? {
                return Ok(());
            }
        }
    }

    /// Composes a frame and writes it in one go.
    pub fn refresh_screen(&mut self) -> io::Result<()> {
        self.editor.scroll_to_cursor();
        self.frame.clear();
        self.compositor.render(&self.editor, &mut self.frame);
        self.output.write_all(&self.frame)?;
        self.output.flush()
    }

    /// Handles one key. Returns false when the editor should exit.
    pub fn process_key(&mut self, key: Key) -> io::Result<bool> {
        match command_for_key(key) {
            EditorCommand::Quit => {
                if self.editor.is_dirty() && self.quit_remaining > 1 {
                    self.quit_remaining -= 1;
                    let n = self.quit_remaining;
                    self.editor.set_status(format!(
                        "WARNING!!! File has unsaved changes. Press Ctrl-Q {} more time{} to quit.",
                        n,
                        if n == 1 { "" } else { "s" }
                    ));
                    return Ok(true);
                }
                self.output.write_all(CLEAR_SCREEN)?;
                self.output.flush()?;
                log::info!("Quit");
                return Ok(false);
            }
            EditorCommand::Save => self.save()?,
            EditorCommand::Find => self.find()?,
            command => {
                execute_command(&mut self.editor, command);
            }
        }
        self.quit_remaining = self.editor.config().quit_times;
        Ok(true)
    }

    /// Saves the document, asking for a file name first if there is none.
    fn save(&mut self) -> io::Result<()> {
        if self.editor.file_path().is_none() {
            match self.prompt(SAVE_AS_PROMPT, None)? {
                Some(name) => self.editor.set_file_path(name),
                None => {
                    self.editor.set_status("Save aborted");
                    return Ok(());
                }
            }
        }

        match self.editor.save() {
            Ok(written) => {
                self.editor
                    .set_status(format!("{} bytes written to disk", written));
            }
            Err(e) => {
                log::error!("Failed to save: {}", e);
                self.editor
                    .set_status(format!("Can't save! I/O error: {}", e));
            }
        }
        Ok(())
    }

    /// Runs the incremental search prompt. Escape puts the cursor and
    /// viewport back where the search started.
    fn find(&mut self) -> io::Result<()> {
        let saved = self.editor.view_state();
        let mut session = SearchSession::new();
        if self.prompt(SEARCH_PROMPT, Some(&mut session))?.is_none() {
            self.editor.restore_view(saved);
        }
        Ok(())
    }

    /// Reads a line on the message bar. `{}` in `template` is replaced by
    /// the input so far.
    ///
    /// Returns `None` when cancelled with Escape. Enter only accepts a
    /// non-empty input. The callback sees every key, the final one
    /// included.
    pub fn prompt(
        &mut self,
        template: &str,
        mut callback: Option<&mut dyn PromptCallback>,
    ) -> io::Result<Option<String>> {
        let mut input = String::new();
        loop {
            self.editor.set_status(template.replacen("{}", &input, 1));
            self.refresh_screen()?;

            let key = read_key(&mut self.input)?;
            match key {
                Key::Delete | Key::BACKSPACE => {
                    input.pop();
                }
                Key::Char(c) if c == kestrel_core::key::ctrl(b'h') => {
                    input.pop();
                }
                Key::ESCAPE => {
                    self.editor.set_status("");
                    if let Some(cb) = callback.as_deref_mut() {
                        cb.on_key(&mut self.editor, &input, key);
                    }
                    return Ok(None);
                }
                Key::ENTER if !input.is_empty() => {
                    self.editor.set_status("");
                    if let Some(cb) = callback.as_deref_mut() {
                        cb.on_key(&mut self.editor, &input, key);
                    }
                    return Ok(Some(input));
                }
                Key::Char(c) if key.is_printable() => input.push(char::from(c)),
                _ => {}
            }

            if let Some(cb) = callback.as_deref_mut() {
                cb.on_key(&mut self.editor, &input, key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::ScriptedSource;
    use kestrel_core::{Document, EditorConfig, Highlight, Position};
    use pretty_assertions::assert_eq;
    use std::fs;

    fn app_with(text: &str, input: &[u8]) -> App<ScriptedSource, Vec<u8>> {
        let mut editor = Editor::new(EditorConfig::default());
        editor.replace_document(Document::from_reader(text.as_bytes(), 8).unwrap());
        let mut app = App::new(editor, ScriptedSource::new(input), Vec::new());
        app.set_window_size(24, 80);
        app
    }

    fn status(app: &App<ScriptedSource, Vec<u8>>) -> &str {
        app.editor.status().text()
    }

    #[test]
    fn test_window_size_reserves_bars() {
        let app = app_with("", b"");
        assert_eq!(app.editor.screen_rows(), 22);
        assert_eq!(app.editor.screen_cols(), 80);
    }

    #[test]
    fn test_quit_clean_document() {
        let mut app = app_with("hello\n", b"");
        assert!(!app.process_key(Key::ctrl(b'q')).unwrap());
        assert!(app.output().ends_with(CLEAR_SCREEN));
    }

    #[test]
    fn test_quit_dirty_needs_confirmation() {
        let mut app = app_with("", b"");
        app.process_key(Key::Char(b'x')).unwrap();
        assert!(app.editor.is_dirty());

        assert!(app.process_key(Key::ctrl(b'q')).unwrap());
        assert!(status(&app).contains("Press Ctrl-Q 1 more time to quit"));

        assert!(!app.process_key(Key::ctrl(b'q')).unwrap());
    }

    #[test]
    fn test_other_key_resets_quit_counter() {
        let mut app = app_with("", b"");
        app.process_key(Key::Char(b'x')).unwrap();
        assert!(app.process_key(Key::ctrl(b'q')).unwrap());
        app.process_key(Key::ArrowLeft).unwrap();
        // the warning is shown again instead of quitting
        assert!(app.process_key(Key::ctrl(b'q')).unwrap());
        assert!(!app.process_key(Key::ctrl(b'q')).unwrap());
    }

    #[test]
    fn test_run_until_quit() {
        let mut app = app_with("", b"hi\x11\x11");
        app.run().unwrap();
        assert_eq!(app.editor.document().serialize(), b"hi\n");
        assert!(app.output().ends_with(CLEAR_SCREEN));
    }

    #[test]
    fn test_run_reports_input_error() {
        let mut app = app_with("", b"a");
        let err = app.run().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_prompt_editing() {
        let mut app = app_with("", b"ab\x7fc\x1b[3~d\x01\r");
        let result = app.prompt("Name: {}", None).unwrap();
        assert_eq!(result.as_deref(), Some("ad"));
        assert_eq!(status(&app), "");
    }

    #[test]
    fn test_prompt_enter_requires_input() {
        let mut app = app_with("", b"\rx\r");
        assert_eq!(app.prompt("Name: {}", None).unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn test_prompt_escape_cancels() {
        let mut app = app_with("", b"");
        let mut input = ScriptedSource::new(b"abc\x1b");
        input.push_timeout();
        app.input = input;
        assert_eq!(app.prompt("Name: {}", None).unwrap(), None);
    }

    #[test]
    fn test_prompt_callback_sees_every_key() {
        let mut app = app_with("", b"ab\r");
        let mut seen = Vec::new();
        let mut record = |_: &mut Editor, input: &str, key: Key| {
            seen.push((input.to_string(), key));
        };
        app.prompt("Name: {}", Some(&mut record)).unwrap();
        assert_eq!(
            seen,
            vec![
                ("a".to_string(), Key::Char(b'a')),
                ("ab".to_string(), Key::Char(b'b')),
                ("ab".to_string(), Key::ENTER),
            ]
        );
    }

    #[test]
    fn test_prompt_shows_template() {
        let mut app = app_with("", b"q\r");
        app.prompt("Search: {} (Use ESC/Arrows/Enter)", None).unwrap();
        let frame = String::from_utf8_lossy(app.output());
        assert!(frame.contains("Search: q (Use ESC/Arrows/Enter)"));
    }

    #[test]
    fn test_save_as_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut input = path.to_string_lossy().into_owned().into_bytes();
        input.push(b'\r');

        let mut app = app_with("", &input);
        app.process_key(Key::Char(b'h')).unwrap();
        app.process_key(Key::Char(b'i')).unwrap();
        app.process_key(Key::ctrl(b's')).unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"hi\n");
        assert_eq!(status(&app), "3 bytes written to disk");
        assert!(!app.editor.is_dirty());
        assert_eq!(app.editor.file_path(), Some(path.as_path()));
    }

    #[test]
    fn test_save_as_cancelled() {
        let mut app = app_with("", b"");
        let mut input = ScriptedSource::new(b"name\x1b");
        input.push_timeout();
        app.input = input;
        app.process_key(Key::Char(b'x')).unwrap();
        app.process_key(Key::ctrl(b's')).unwrap();
        assert_eq!(status(&app), "Save aborted");
        assert!(app.editor.file_path().is_none());
        assert!(app.editor.is_dirty());
    }

    #[test]
    fn test_save_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with("x\n", b"");
        app.editor.set_file_path(dir.path().join("missing").join("f.txt"));
        app.process_key(Key::ctrl(b's')).unwrap();
        assert!(status(&app).starts_with("Can't save! I/O error: "));
    }

    #[test]
    fn test_open_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.rs");
        let mut app = app_with("", b"");
        app.open(&path);
        assert!(app.editor.document().is_empty());
        assert_eq!(app.editor.file_path(), Some(path.as_path()));
        assert_eq!(app.editor.document().syntax().map(|s| s.id), Some("rust"));
    }

    #[test]
    fn test_open_directory_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with("", b"");
        app.open(dir.path());
        assert!(status(&app).starts_with("Can't open "));
    }

    #[test]
    fn test_find_moves_to_match_and_clears_overlay() {
        let mut app = app_with("alpha\nbeta\ngamma\n", b"gam\r");
        app.process_key(Key::ctrl(b'f')).unwrap();
        assert_eq!(app.editor.cursor(), Position::new(2, 0));
        let row = app.editor.document().row(2).unwrap();
        assert!(row.highlight().iter().all(|&h| h != Highlight::SearchResult));
    }

    #[test]
    fn test_find_escape_restores_view() {
        let mut app = app_with("alpha\nbeta\ngamma\n", b"");
        app.process_key(Key::ArrowRight).unwrap();
        let mut input = ScriptedSource::new(b"gam\x1b");
        input.push_timeout();
        app.input = input;

        app.process_key(Key::ctrl(b'f')).unwrap();
        assert_eq!(app.editor.cursor(), Position::new(0, 1));
        assert_eq!(app.editor.row_offset(), 0);
    }

    #[test]
    fn test_find_arrows_step_through_matches() {
        let mut app = app_with("ab\nx\nab\nab\n", b"ab\x1b[B\x1b[B\r");
        app.process_key(Key::ctrl(b'f')).unwrap();
        assert_eq!(app.editor.cursor(), Position::new(3, 0));
    }
}
