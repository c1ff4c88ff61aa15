//! Row-based syntax highlighter.
//!
//! Classifies each rendered byte in a single left-to-right pass. The only
//! state carried between rows is whether the previous row ended inside a
//! block comment; when that changes, the following rows are reclassified
//! until the carry settles.

use super::language::SyntaxDef;
use super::theme::Highlight;
use crate::row::Row;
use std::collections::VecDeque;

/// Bytes that bound keywords and numbers.
const SEPARATORS: &[u8] = b",.()+-/*=~%<>[];";

/// Returns true for whitespace, NUL, or one of `,.()+-/*=~%<>[];`.
pub fn is_separator(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c | b'\0') || SEPARATORS.contains(&b)
}

/// Highlighter bound to the active syntax (or none, for plain text).
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntaxHighlighter {
    syntax: Option<&'static SyntaxDef>,
}

impl SyntaxHighlighter {
    /// Creates a highlighter for the given syntax.
    pub fn new(syntax: Option<&'static SyntaxDef>) -> Self {
        Self { syntax }
    }

    /// Returns the active syntax.
    pub fn syntax(&self) -> Option<&'static SyntaxDef> {
        self.syntax
    }

    /// Sets the active syntax. Callers must reclassify rows afterwards.
    pub fn set_syntax(&mut self, syntax: Option<&'static SyntaxDef>) {
        self.syntax = syntax;
    }

    /// Classifies `render` into `out`, starting inside a block comment if
    /// `starts_in_comment` is set. Returns whether the line ends inside one.
    pub fn highlight_line(
        &self,
        render: &[u8],
        starts_in_comment: bool,
        out: &mut Vec<Highlight>,
    ) -> bool {
        out.clear();
        out.resize(render.len(), Highlight::Normal);

        let Some(syntax) = self.syntax else {
            return false;
        };

        let line_comment = syntax
            .line_comment
            .filter(|prefix| !prefix.is_empty())
            .map(str::as_bytes);
        let block_comment = syntax
            .block_comment
            .filter(|_| syntax.has_block_comments())
            .map(|(start, end)| (start.as_bytes(), end.as_bytes()));

        let mut prev_sep = true;
        let mut in_string: Option<u8> = None;
        let mut in_comment = starts_in_comment && block_comment.is_some();

        let mut i = 0;
        while i < render.len() {
            let c = render[i];
            let rest = &render[i..];
            let prev_hl = if i > 0 { out[i - 1] } else { Highlight::Normal };

            if let Some(prefix) = line_comment {
                if in_string.is_none() && !in_comment && rest.starts_with(prefix) {
                    out[i..].fill(Highlight::LineComment);
                    break;
                }
            }

            if let Some((start, end)) = block_comment {
                if in_string.is_none() {
                    if in_comment {
                        out[i] = Highlight::BlockComment;
                        if rest.starts_with(end) {
                            out[i..i + end.len()].fill(Highlight::BlockComment);
                            i += end.len();
                            in_comment = false;
                            prev_sep = true;
                        } else {
                            i += 1;
                        }
                        continue;
                    } else if rest.starts_with(start) {
                        out[i..i + start.len()].fill(Highlight::BlockComment);
                        i += start.len();
                        in_comment = true;
                        continue;
                    }
                }
            }

            if syntax.flags.strings {
                if let Some(quote) = in_string {
                    out[i] = Highlight::String;
                    if c == b'\\' && i + 1 < render.len() {
                        out[i + 1] = Highlight::String;
                        i += 2;
                        continue;
                    }
                    if c == quote {
                        in_string = None;
                    }
                    i += 1;
                    prev_sep = true;
                    continue;
                } else if c == b'"' || c == b'\'' {
                    in_string = Some(c);
                    out[i] = Highlight::String;
                    i += 1;
                    continue;
                }
            }

            if syntax.flags.numbers
                && ((c.is_ascii_digit() && (prev_sep || prev_hl == Highlight::Number))
                    || (c == b'.' && prev_hl == Highlight::Number))
            {
                out[i] = Highlight::Number;
                i += 1;
                prev_sep = false;
                continue;
            }

            if prev_sep {
                if let Some((len, class)) = match_keyword(syntax, rest) {
                    out[i..i + len].fill(class);
                    i += len;
                    prev_sep = false;
                    continue;
                }
            }

            prev_sep = is_separator(c);
            i += 1;
        }

        in_comment
    }

    /// Reclassifies `rows[start]`, then keeps going forward while a row's
    /// open-comment state changes. Returns the number of rows classified.
    pub fn update_from(&self, rows: &mut [Row], start: usize) -> usize {
        let mut queue = VecDeque::from([start]);
        let mut updated = 0;

        while let Some(at) = queue.pop_front() {
            if at >= rows.len() {
                break;
            }
            let starts_in_comment = at > 0 && rows[at - 1].open_comment;
            let row = &mut rows[at];
            let open = self.highlight_line(&row.render, starts_in_comment, &mut row.highlight);
            let changed = row.open_comment != open;
            row.open_comment = open;
            updated += 1;

            if changed && at + 1 < rows.len() {
                queue.push_back(at + 1);
            }
        }

        if updated > 1 {
            log::trace!("Re-highlight cascaded over {} rows from row {}", updated, start);
        }
        updated
    }

    /// Reclassifies every row in order.
    pub fn update_all(&self, rows: &mut [Row]) {
        let mut carry = false;
        for row in rows.iter_mut() {
            carry = self.highlight_line(&row.render, carry, &mut row.highlight);
            row.open_comment = carry;
        }
    }
}

/// Finds the longest keyword at the start of `rest` that is followed by a
/// separator or the end of the row.
fn match_keyword(syntax: &SyntaxDef, rest: &[u8]) -> Option<(usize, Highlight)> {
    let primary = syntax
        .keywords_primary
        .iter()
        .map(|kw| (kw.as_bytes(), Highlight::KeywordPrimary));
    let secondary = syntax
        .keywords_secondary
        .iter()
        .map(|kw| (kw.as_bytes(), Highlight::KeywordSecondary));

    primary
        .chain(secondary)
        .filter(|(kw, _)| !kw.is_empty() && rest.starts_with(kw))
        .filter(|(kw, _)| rest.get(kw.len()).map_or(true, |&b| is_separator(b)))
        .max_by_key(|(kw, _)| kw.len())
        .map(|(kw, class)| (kw.len(), class))
}
