//! Syntax highlighting module.
//!
//! Provides a static syntax table and a row-based incremental classifier.

mod highlighter;
mod language;
mod theme;

pub use highlighter::{is_separator, SyntaxHighlighter};
pub use language::{SyntaxDef, SyntaxFlags, SYNTAXES};
pub use theme::{Highlight, Theme, DEFAULT_FOREGROUND};
