//! Error types for the editing engine.

use std::io;
use thiserror::Error;

/// Errors raised by document and session operations.
#[derive(Debug, Error)]
pub enum EditorError {
    /// A row insert position outside `[0, len]`.
    #[error("row index {index} out of range (document has {len} rows)")]
    OutOfRange { index: usize, len: usize },

    /// Save was requested before the document had a file name.
    #[error("no file name set")]
    NoFileName,

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, EditorError>;
