//! Editor Core - Pure text editor logic.
//!
//! This crate contains the document model, render cache, syntax
//! highlighter and search engine without any dependency on a terminal.

pub mod config;
pub mod cursor;
pub mod document;
pub mod editor;
pub mod error;
pub mod key;
pub mod prompt;
pub mod row;
pub mod search;
pub mod status;
pub mod syntax;

pub use config::EditorConfig;
pub use cursor::{Direction, Position};
pub use document::Document;
pub use editor::{Editor, ViewState};
pub use error::{EditorError, Result};
pub use key::Key;
pub use prompt::PromptCallback;
pub use row::Row;
pub use search::{SearchDirection, SearchSession};
pub use status::StatusMessage;
pub use syntax::{Highlight, SyntaxDef, Theme};
