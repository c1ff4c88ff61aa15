//! Highlight categories and their terminal colors.

/// Classification of a single rendered byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Highlight {
    /// Default text (no special highlighting)
    #[default]
    Normal,
    /// Numeric literals, including a decimal point inside one
    Number,
    /// Temporary overlay for the current search match
    SearchResult,
    /// String literals
    String,
    /// Single-line comments
    LineComment,
    /// Block comments, possibly spanning rows
    BlockComment,
    /// First keyword list (control flow, declarations)
    KeywordPrimary,
    /// Second keyword list (types)
    KeywordSecondary,
}

impl Highlight {
    /// Number of categories, for table-driven themes.
    pub const COUNT: usize = 8;

    fn slot(self) -> usize {
        match self {
            Highlight::Normal => 0,
            Highlight::Number => 1,
            Highlight::SearchResult => 2,
            Highlight::String => 3,
            Highlight::LineComment => 4,
            Highlight::BlockComment => 5,
            Highlight::KeywordPrimary => 6,
            Highlight::KeywordSecondary => 7,
        }
    }
}

/// SGR foreground code that restores the terminal's default color.
pub const DEFAULT_FOREGROUND: u8 = 39;

/// Maps highlight categories to SGR foreground color codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Theme name.
    pub name: &'static str,
    colors: [u8; Highlight::COUNT],
}

impl Theme {
    /// Creates a theme where every category uses the default foreground.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            colors: [DEFAULT_FOREGROUND; Highlight::COUNT],
        }
    }

    /// Sets the color code for a category.
    pub fn set_color(&mut self, highlight: Highlight, code: u8) {
        self.colors[highlight.slot()] = code;
    }

    /// Gets the SGR color code for a category.
    pub fn color(&self, highlight: Highlight) -> u8 {
        self.colors[highlight.slot()]
    }

    /// The classic 8-color palette.
    pub fn ansi() -> Self {
        let mut theme = Self::new("ansi");

        theme.set_color(Highlight::Number, 31); // red
        theme.set_color(Highlight::KeywordSecondary, 32); // green
        theme.set_color(Highlight::KeywordPrimary, 33); // yellow
        theme.set_color(Highlight::SearchResult, 34); // blue
        theme.set_color(Highlight::String, 35); // magenta
        theme.set_color(Highlight::LineComment, 36); // cyan
        theme.set_color(Highlight::BlockComment, 36);

        theme
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::ansi()
    }
}
