//! Incremental search.
//!
//! A [`SearchSession`] lives for the duration of one find prompt. Each
//! query change searches row by row from the last match, wrapping around
//! the document, and overlays the hit with [`Highlight::SearchResult`].
//! Only one row carries the overlay at a time; its original highlight is
//! restored before the next search and when the prompt ends.

use crate::cursor::Position;
use crate::editor::Editor;
use crate::key::Key;
use crate::prompt::PromptCallback;
use crate::syntax::Highlight;
use memchr::memmem;

/// Direction the next match is searched in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchDirection {
    #[default]
    Forward,
    Backward,
}

/// Highlight bytes saved before an overlay was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SavedHighlight {
    line: usize,
    highlight: Vec<Highlight>,
}

/// State of one find prompt.
#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    /// Row of the last match, if any.
    last_match: Option<usize>,
    direction: SearchDirection,
    saved: Option<SavedHighlight>,
}

impl SearchSession {
    /// Creates a session with no match and forward direction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the row of the last match.
    pub fn last_match(&self) -> Option<usize> {
        self.last_match
    }

    /// Returns the current search direction.
    pub fn direction(&self) -> SearchDirection {
        self.direction
    }

    /// Returns true while a row carries the match overlay.
    pub fn has_overlay(&self) -> bool {
        self.saved.is_some()
    }

    /// Handles one prompt update.
    ///
    /// Enter and Escape end the search. Arrow keys step to the next match
    /// (right/down forward, left/up backward); any other key restarts the
    /// search from the top of the document.
    pub fn on_query_change(&mut self, editor: &mut Editor, query: &str, key: Key) {
        self.restore_overlay(editor);

        match key {
            Key::ENTER | Key::ESCAPE => {
                self.last_match = None;
                self.direction = SearchDirection::Forward;
                return;
            }
            Key::ArrowRight | Key::ArrowDown => self.direction = SearchDirection::Forward,
            Key::ArrowLeft | Key::ArrowUp => self.direction = SearchDirection::Backward,
            _ => {
                self.last_match = None;
                self.direction = SearchDirection::Forward;
            }
        }

        if query.is_empty() {
            return;
        }
        if self.last_match.is_none() {
            self.direction = SearchDirection::Forward;
        }

        let Some((line, offset)) = self.find_next(editor, query.as_bytes()) else {
            return;
        };
        self.last_match = Some(line);

        let Some(row) = editor.document().row(line) else {
            return;
        };
        let col = row.render_to_char_index(offset, editor.document().tab_stop());
        editor.center_on(Position::new(line, col));

        if let Some(highlight) = editor.highlight_mut(line) {
            self.saved = Some(SavedHighlight {
                line,
                highlight: highlight.clone(),
            });
            let end = (offset + query.len()).min(highlight.len());
            highlight[offset..end].fill(Highlight::SearchResult);
        }
    }

    /// Scans at most one full lap of the document, starting after the last
    /// match in the current direction. Returns (row, render offset).
    fn find_next(&self, editor: &Editor, query: &[u8]) -> Option<(usize, usize)> {
        let rows = editor.document().rows();
        let len = rows.len();
        if len == 0 {
            return None;
        }

        let finder = memmem::Finder::new(query);
        let mut current = self.last_match;
        for _ in 0..len {
            let next = match (current, self.direction) {
                (None, SearchDirection::Forward) => 0,
                (None, SearchDirection::Backward) => len - 1,
                (Some(at), SearchDirection::Forward) => (at + 1) % len,
                (Some(at), SearchDirection::Backward) => at.checked_sub(1).unwrap_or(len - 1),
            };
            current = Some(next);
            if let Some(offset) = finder.find(rows[next].render()) {
                return Some((next, offset));
            }
        }
        None
    }

    /// Puts back the highlight saved before the last overlay.
    pub fn restore_overlay(&mut self, editor: &mut Editor) {
        if let Some(saved) = self.saved.take() {
            if let Some(highlight) = editor.highlight_mut(saved.line) {
                if highlight.len() == saved.highlight.len() {
                    *highlight = saved.highlight;
                }
            }
        }
    }
}

impl PromptCallback for SearchSession {
    fn on_key(&mut self, editor: &mut Editor, input: &str, key: Key) {
        self.on_query_change(editor, input, key);
    }
}
