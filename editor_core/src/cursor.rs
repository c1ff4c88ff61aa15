//! Cursor positions and arrow-key movement.

use crate::document::Document;

/// A position in the document as (line, column).
/// Both are 0-indexed; `col` is a byte index into the row's characters.
/// `line` may equal the row count (the empty line past the end).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// Arrow-key direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Moves `pos` one step in `direction`.
///
/// Left and right wrap across line boundaries. Up and down keep the
/// column but clamp it to the destination row's length.
pub fn move_position(doc: &Document, pos: Position, direction: Direction) -> Position {
    let mut line = pos.line;
    let mut col = pos.col;
    let row_len = doc.row(line).map(|r| r.size());

    match direction {
        Direction::Left => {
            if col > 0 {
                col -= 1;
            } else if line > 0 {
                line -= 1;
                col = doc.row(line).map_or(0, |r| r.size());
            }
        }
        Direction::Right => match row_len {
            Some(len) if col < len => col += 1,
            Some(_) => {
                line += 1;
                col = 0;
            }
            None => {}
        },
        Direction::Up => line = line.saturating_sub(1),
        Direction::Down => {
            if line < doc.len() {
                line += 1;
            }
        }
    }

    let max_col = doc.row(line).map_or(0, |r| r.size());
    Position::new(line, col.min(max_col))
}
