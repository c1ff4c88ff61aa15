//! Row-based text document.
//!
//! The document is an ordered list of [`Row`]s. Every mutation keeps row
//! indices contiguous, rebuilds the touched row's render cache, runs the
//! highlighter from that row, and bumps the dirty counter.

use crate::error::{EditorError, Result};
use crate::row::Row;
use crate::syntax::{Highlight, SyntaxDef, SyntaxHighlighter};
use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

/// An ordered collection of rows plus the state derived from them.
#[derive(Debug, Clone)]
pub struct Document {
    rows: Vec<Row>,
    tab_stop: usize,
    highlighter: SyntaxHighlighter,
    dirty: usize,
}

impl Document {
    /// Creates an empty document.
    pub fn new(tab_stop: usize) -> Self {
        Self {
            rows: Vec::new(),
            tab_stop: tab_stop.max(1),
            highlighter: SyntaxHighlighter::default(),
            dirty: 0,
        }
    }

    /// Reads a document line by line. Trailing `\n`/`\r` bytes are stripped
    /// from each line. The result starts clean.
    pub fn from_reader<R: BufRead>(reader: R, tab_stop: usize) -> io::Result<Self> {
        let mut doc = Self::new(tab_stop);
        for line in reader.split(b'\n') {
            let mut line = line?;
            while matches!(line.last(), Some(b'\n' | b'\r')) {
                line.pop();
            }
            doc.append_row(line);
        }
        doc.dirty = 0;
        Ok(doc)
    }

    /// Loads a document from a file.
    pub fn from_file<P: AsRef<Path>>(path: P, tab_stop: usize) -> io::Result<Self> {
        let file = fs::File::open(path)?;
        Self::from_reader(BufReader::new(file), tab_stop)
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the document has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns all rows in order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the row at `at`, if it exists.
    pub fn row(&self, at: usize) -> Option<&Row> {
        self.rows.get(at)
    }

    /// Returns the tab stop used for render expansion.
    pub fn tab_stop(&self) -> usize {
        self.tab_stop
    }

    /// Returns the number of unsaved mutations.
    pub fn dirty(&self) -> usize {
        self.dirty
    }

    /// Returns true if there are unsaved mutations.
    pub fn is_dirty(&self) -> bool {
        self.dirty > 0
    }

    /// Resets the dirty counter after a successful save.
    pub fn mark_clean(&mut self) {
        self.dirty = 0;
    }

    /// Returns the active syntax.
    pub fn syntax(&self) -> Option<&'static SyntaxDef> {
        self.highlighter.syntax()
    }

    /// Switches syntax and reclassifies every row.
    pub fn set_syntax(&mut self, syntax: Option<&'static SyntaxDef>) {
        self.highlighter.set_syntax(syntax);
        self.highlighter.update_all(&mut self.rows);
    }

    /// Inserts a row before `at`. `at == len()` appends.
    pub fn insert_row(&mut self, at: usize, text: &[u8]) -> Result<()> {
        if at > self.rows.len() {
            return Err(EditorError::OutOfRange {
                index: at,
                len: self.rows.len(),
            });
        }
        self.insert_row_at(at, text.to_vec());
        Ok(())
    }

    /// Appends a row at the end of the document.
    pub fn append_row(&mut self, text: Vec<u8>) {
        self.insert_row_at(self.rows.len(), text);
    }

    fn insert_row_at(&mut self, at: usize, text: Vec<u8>) {
        let mut row = Row::new(at, text, self.tab_stop);
        // Seed with the carry the following row currently sees, so the
        // cascade runs only if the insert actually changes it.
        row.open_comment = at > 0 && self.rows[at - 1].open_comment;
        self.rows.insert(at, row);
        self.reindex_from(at + 1);
        self.highlighter.update_from(&mut self.rows, at);
        self.dirty += 1;
    }

    /// Removes the row at `at`. Out-of-range indices are ignored.
    pub fn delete_row(&mut self, at: usize) {
        if at >= self.rows.len() {
            return;
        }
        self.rows.remove(at);
        self.reindex_from(at);
        // The row now at `at` lost its predecessor's carry.
        self.highlighter.update_from(&mut self.rows, at);
        self.dirty += 1;
    }

    /// Inserts a byte into row `at` at column `col` (clamped to the row).
    pub fn insert_char(&mut self, at: usize, col: usize, c: u8) {
        let tab_stop = self.tab_stop;
        if let Some(row) = self.rows.get_mut(at) {
            row.insert_char(col, c, tab_stop);
            self.highlighter.update_from(&mut self.rows, at);
            self.dirty += 1;
        }
    }

    /// Deletes the byte at column `col` of row `at`, if there is one.
    pub fn delete_char(&mut self, at: usize, col: usize) {
        let tab_stop = self.tab_stop;
        if let Some(row) = self.rows.get_mut(at) {
            if row.delete_char(col, tab_stop) {
                self.highlighter.update_from(&mut self.rows, at);
                self.dirty += 1;
            }
        }
    }

    /// Splits row `at` at column `col`; the tail becomes a new row below.
    pub fn split_row(&mut self, at: usize, col: usize) {
        let tab_stop = self.tab_stop;
        let Some(row) = self.rows.get_mut(at) else {
            return;
        };
        let tail = row.split_off(col, tab_stop);
        self.highlighter.update_from(&mut self.rows, at);
        self.dirty += 1;
        self.insert_row_at(at + 1, tail);
    }

    /// Appends row `at` onto the end of row `at - 1` and removes it.
    /// Returns the previous row's length before the merge.
    pub fn merge_into_previous(&mut self, at: usize) -> Option<usize> {
        if at == 0 || at >= self.rows.len() {
            return None;
        }
        let tab_stop = self.tab_stop;
        let moved = std::mem::take(&mut self.rows[at].chars);
        let prev = &mut self.rows[at - 1];
        let join_at = prev.size();
        prev.append(&moved, tab_stop);
        self.highlighter.update_from(&mut self.rows, at - 1);
        self.dirty += 1;
        self.delete_row(at);
        Some(join_at)
    }

    /// Mutable access to one row's highlight, for temporary overlays.
    pub(crate) fn highlight_mut(&mut self, at: usize) -> Option<&mut Vec<Highlight>> {
        self.rows.get_mut(at).map(|row| &mut row.highlight)
    }

    /// Returns the document as bytes: every row followed by `\n`.
    pub fn serialize(&self) -> Vec<u8> {
        let total = self.rows.iter().map(|r| r.size() + 1).sum();
        let mut out = Vec::with_capacity(total);
        for row in &self.rows {
            out.extend_from_slice(row.chars());
            out.push(b'\n');
        }
        out
    }

    /// Writes the serialized document to `path` through a temporary file
    /// in the same directory, then renames it into place. Returns the
    /// number of bytes written. Does not touch the dirty counter.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> io::Result<usize> {
        let path = path.as_ref();
        let bytes = self.serialize();

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;

        match fs::metadata(path) {
            Ok(meta) => tmp.as_file().set_permissions(meta.permissions())?,
            Err(_) => set_new_file_mode(tmp.as_file())?,
        }

        tmp.persist(path).map_err(|e| e.error)?;
        Ok(bytes.len())
    }

    fn reindex_from(&mut self, start: usize) {
        for (i, row) in self.rows.iter_mut().enumerate().skip(start) {
            row.index = i;
        }
    }
}

#[cfg(unix)]
fn set_new_file_mode(file: &fs::File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_new_file_mode(_file: &fs::File) -> io::Result<()> {
    Ok(())
}
