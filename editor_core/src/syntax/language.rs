//! Built-in syntax definitions and file type detection.
//!
//! The table is static: one entry is selected per opened file by
//! matching its name against each entry's patterns.

use std::path::Path;

/// Which literal classes a syntax highlights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyntaxFlags {
    pub numbers: bool,
    pub strings: bool,
}

/// A static syntax description.
#[derive(Debug, PartialEq, Eq)]
pub struct SyntaxDef {
    /// File type shown in the status bar.
    pub id: &'static str,
    /// `.ext` patterns match the extension exactly; anything else
    /// matches as a substring of the file name.
    pub file_match: &'static [&'static str],
    pub keywords_primary: &'static [&'static str],
    pub keywords_secondary: &'static [&'static str],
    pub line_comment: Option<&'static str>,
    /// Block comment start and end tokens.
    pub block_comment: Option<(&'static str, &'static str)>,
    pub flags: SyntaxFlags,
}

const ALL_LITERALS: SyntaxFlags = SyntaxFlags {
    numbers: true,
    strings: true,
};

pub static C: SyntaxDef = SyntaxDef {
    id: "c",
    file_match: &[".c", ".h", ".cpp", ".cc", ".hpp"],
    keywords_primary: &[
        "switch", "if", "while", "for", "break", "continue", "return", "else", "struct",
        "union", "typedef", "static", "enum", "class", "case", "default", "do", "goto",
        "sizeof", "const", "extern", "volatile",
    ],
    keywords_secondary: &[
        "int", "long", "double", "float", "char", "unsigned", "signed", "void", "short",
        "bool", "size_t",
    ],
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    flags: ALL_LITERALS,
};

pub static RUST: SyntaxDef = SyntaxDef {
    id: "rust",
    file_match: &[".rs"],
    keywords_primary: &[
        "as", "break", "const", "continue", "crate", "else", "enum", "extern", "fn", "for",
        "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref",
        "return", "self", "Self", "static", "struct", "super", "trait", "type", "unsafe",
        "use", "where", "while", "async", "await", "dyn",
    ],
    keywords_secondary: &[
        "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128",
        "usize", "f32", "f64", "bool", "char", "str", "String", "Vec", "Option", "Result",
        "Box", "true", "false",
    ],
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    flags: ALL_LITERALS,
};

pub static PYTHON: SyntaxDef = SyntaxDef {
    id: "python",
    file_match: &[".py"],
    keywords_primary: &[
        "and", "as", "assert", "break", "class", "continue", "def", "del", "elif", "else",
        "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda",
        "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
    ],
    keywords_secondary: &[
        "None", "True", "False", "int", "float", "str", "bytes", "list", "dict", "set",
        "tuple", "self",
    ],
    line_comment: Some("#"),
    block_comment: None,
    flags: ALL_LITERALS,
};

pub static JAVASCRIPT: SyntaxDef = SyntaxDef {
    id: "javascript",
    file_match: &[".js", ".jsx", ".mjs"],
    keywords_primary: &[
        "break", "case", "catch", "class", "const", "continue", "default", "delete", "do",
        "else", "export", "extends", "finally", "for", "function", "if", "import", "in",
        "instanceof", "let", "new", "return", "switch", "throw", "try", "typeof", "var",
        "while", "yield", "async", "await",
    ],
    keywords_secondary: &["true", "false", "null", "undefined", "this", "NaN"],
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    flags: ALL_LITERALS,
};

/// Every built-in syntax, in match priority order.
pub static SYNTAXES: &[&SyntaxDef] = &[&C, &RUST, &PYTHON, &JAVASCRIPT];

impl SyntaxDef {
    /// Returns all built-in syntaxes.
    pub fn all() -> &'static [&'static SyntaxDef] {
        SYNTAXES
    }

    /// Selects a syntax for a path based on its file name.
    pub fn for_path(path: &Path) -> Option<&'static SyntaxDef> {
        path.file_name()
            .and_then(|name| name.to_str())
            .and_then(Self::for_file_name)
    }

    /// Selects a syntax for a bare file name. First matching entry wins.
    pub fn for_file_name(name: &str) -> Option<&'static SyntaxDef> {
        let extension = name.rfind('.').map(|dot| &name[dot..]);

        SYNTAXES.iter().copied().find(|syntax| {
            syntax.file_match.iter().any(|pattern| {
                if pattern.starts_with('.') {
                    extension == Some(*pattern)
                } else {
                    name.contains(pattern)
                }
            })
        })
    }

    /// Returns true if the syntax defines block comment tokens.
    pub fn has_block_comments(&self) -> bool {
        matches!(self.block_comment, Some((start, end)) if !start.is_empty() && !end.is_empty())
    }
}
