//! Screen compositor.
//!
//! Builds one complete frame (text area, status bar, message bar and
//! cursor placement) as a byte buffer of VT100 sequences, so the caller
//! can hand it to the terminal in a single write.

use kestrel_core::syntax::DEFAULT_FOREGROUND;
use kestrel_core::{Editor, Highlight, Theme};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HIDE_CURSOR: &[u8] = b"\x1b[?25l";
const SHOW_CURSOR: &[u8] = b"\x1b[?25h";
const CURSOR_HOME: &[u8] = b"\x1b[H";
const CLEAR_LINE: &[u8] = b"\x1b[K";
const INVERT: &[u8] = b"\x1b[7m";
const RESET: &[u8] = b"\x1b[0m";

/// File name width on the status bar.
const STATUS_NAME_WIDTH: usize = 20;

/// Composes frames for an [`Editor`].
#[derive(Debug, Clone, Default)]
pub struct Compositor {
    /// Colors for highlight categories.
    pub theme: Theme,
}

impl Compositor {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Appends a full frame for `editor` to `out`.
    ///
    /// The editor's viewport must already contain the cursor.
    pub fn render(&self, editor: &Editor, out: &mut Vec<u8>) {
        out.extend_from_slice(HIDE_CURSOR);
        out.extend_from_slice(CURSOR_HOME);

        self.draw_rows(editor, out);
        self.draw_status_bar(editor, out);
        self.draw_message_bar(editor, out);

        let row = editor.cursor().line.saturating_sub(editor.row_offset()) + 1;
        let col = editor.render_x().saturating_sub(editor.col_offset()) + 1;
        out.extend_from_slice(format!("\x1b[{};{}H", row, col).as_bytes());
        out.extend_from_slice(SHOW_CURSOR);
    }

    fn draw_rows(&self, editor: &Editor, out: &mut Vec<u8>) {
        let document = editor.document();
        let rows = editor.screen_rows();
        let cols = editor.screen_cols();

        for y in 0..rows {
            match document.row(y + editor.row_offset()) {
                Some(row) => {
                    let render = row.render();
                    let start = editor.col_offset().min(render.len());
                    let end = (editor.col_offset() + cols).min(render.len());
                    let highlight = row.highlight().get(start..).unwrap_or(&[]);
                    self.draw_line(&render[start..end], highlight, out);
                }
                None if document.is_empty() && y == rows / 2 => draw_welcome(cols, out),
                None => out.push(b'~'),
            }
            out.extend_from_slice(CLEAR_LINE);
            out.extend_from_slice(b"\r\n");
        }
    }

    /// Draws visible bytes, switching color only when the class changes.
    fn draw_line(&self, bytes: &[u8], highlight: &[Highlight], out: &mut Vec<u8>) {
        let mut current: Option<u8> = None;

        for (i, &c) in bytes.iter().enumerate() {
            let class = highlight.get(i).copied().unwrap_or_default();
            if c.is_ascii_control() {
                let symbol = if c <= 26 { b'@' + c } else { b'?' };
                out.extend_from_slice(INVERT);
                out.push(symbol);
                out.extend_from_slice(RESET);
                if let Some(color) = current {
                    push_color(color, out);
                }
            } else if class == Highlight::Normal {
                if current.take().is_some() {
                    push_color(DEFAULT_FOREGROUND, out);
                }
                out.push(c);
            } else {
                let color = self.theme.color(class);
                if current != Some(color) {
                    current = Some(color);
                    push_color(color, out);
                }
                out.push(c);
            }
        }
        push_color(DEFAULT_FOREGROUND, out);
    }

    fn draw_status_bar(&self, editor: &Editor, out: &mut Vec<u8>) {
        let document = editor.document();
        let cols = editor.screen_cols();

        let name: String = editor
            .file_name()
            .unwrap_or_else(|| "[No Name]".to_string())
            .chars()
            .take(STATUS_NAME_WIDTH)
            .collect();
        let left = format!(
            "{} - {} lines {}",
            name,
            document.len(),
            if editor.is_dirty() { "(modified)" } else { "" }
        );
        let right = format!(
            "{} | {}/{}",
            document.syntax().map_or("no ft", |s| s.id),
            editor.cursor().line + 1,
            document.len()
        );

        out.extend_from_slice(INVERT);
        let mut len = left.len().min(cols);
        out.extend_from_slice(&left.as_bytes()[..len]);
        while len < cols {
            if cols - len == right.len() {
                out.extend_from_slice(right.as_bytes());
                break;
            }
            out.push(b' ');
            len += 1;
        }
        out.extend_from_slice(RESET);
        out.extend_from_slice(b"\r\n");
    }

    fn draw_message_bar(&self, editor: &Editor, out: &mut Vec<u8>) {
        out.extend_from_slice(CLEAR_LINE);
        if let Some(text) = editor.visible_status() {
            let len = text.len().min(editor.screen_cols());
            out.extend_from_slice(&text.as_bytes()[..len]);
        }
    }
}

fn push_color(code: u8, out: &mut Vec<u8>) {
    out.extend_from_slice(format!("\x1b[{}m", code).as_bytes());
}

/// Centered welcome banner, prefixed by the empty-row tilde.
fn draw_welcome(cols: usize, out: &mut Vec<u8>) {
    let welcome = format!("Kestrel editor -- version {}", VERSION);
    let len = welcome.len().min(cols);
    let mut padding = (cols - len) / 2;
    if padding > 0 {
        out.push(b'~');
        padding -= 1;
    }
    out.resize(out.len() + padding, b' ');
    out.extend_from_slice(&welcome.as_bytes()[..len]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_core::Document;
    use pretty_assertions::assert_eq;

    fn frame(editor: &mut Editor) -> String {
        editor.scroll_to_cursor();
        let mut out = Vec::new();
        Compositor::default().render(editor, &mut out);
        String::from_utf8(out).unwrap()
    }

    fn editor_with(text: &str, name: &str) -> Editor {
        let mut editor = Editor::default();
        editor.replace_document(Document::from_reader(text.as_bytes(), 8).unwrap());
        editor.set_file_path(name);
        editor
    }

    /// Splits a frame into its text rows, status bar and message bar.
    fn screen_lines(frame: &str) -> Vec<&str> {
        let body = frame.strip_prefix("\x1b[?25l\x1b[H").unwrap();
        body.split("\r\n").collect()
    }

    #[test]
    fn test_empty_document_welcome_screen() {
        let mut editor = Editor::default();
        editor.set_screen_size(24, 80);
        let frame = frame(&mut editor);
        let lines = screen_lines(&frame);

        // 24 text rows, the status bar and the message bar
        assert_eq!(lines.len(), 26);
        for (y, line) in lines[..24].iter().enumerate() {
            if y == 12 {
                let welcome = format!("Kestrel editor -- version {}", VERSION);
                let padding = (80 - welcome.len()) / 2;
                let expected = format!("~{}{}\x1b[K", " ".repeat(padding - 1), welcome);
                assert_eq!(*line, expected);
            } else {
                assert_eq!(*line, "~\x1b[K");
            }
        }
        assert!(frame.ends_with("\x1b[1;1H\x1b[?25h"));
    }

    #[test]
    fn test_welcome_truncated_to_width() {
        let mut editor = Editor::default();
        editor.set_screen_size(4, 10);
        let frame = frame(&mut editor);
        let lines = screen_lines(&frame);
        assert_eq!(lines[2], "Kestrel ed\x1b[K");
    }

    #[test]
    fn test_no_welcome_when_document_has_rows() {
        let mut editor = editor_with("hello\n", "notes.txt");
        editor.set_screen_size(4, 40);
        let frame = frame(&mut editor);
        let lines = screen_lines(&frame);
        assert_eq!(lines[0], "hello\x1b[39m\x1b[K");
        assert_eq!(lines[1], "~\x1b[K");
        assert_eq!(lines[2], "~\x1b[K");
        assert!(!frame.contains("Kestrel editor"));
    }

    #[test]
    fn test_color_changes_are_minimal() {
        let mut editor = editor_with("int 42;\n", "main.c");
        editor.set_screen_size(3, 40);
        let frame = frame(&mut editor);
        let lines = screen_lines(&frame);
        // keyword, normal space, number run, normal semicolon
        assert_eq!(
            lines[0],
            "\x1b[32mint\x1b[39m \x1b[31m42\x1b[39m;\x1b[39m\x1b[K"
        );
    }

    #[test]
    fn test_control_bytes_render_inverted() {
        let mut editor = editor_with("a\x01b\x7f\n", "x.txt");
        editor.set_screen_size(3, 40);
        let frame = frame(&mut editor);
        let lines = screen_lines(&frame);
        assert_eq!(
            lines[0],
            "a\x1b[7mA\x1b[0mb\x1b[7m?\x1b[0m\x1b[39m\x1b[K"
        );
    }

    #[test]
    fn test_control_byte_restores_active_color() {
        let mut editor = editor_with("\"a\x02b\"\n", "x.c");
        editor.set_screen_size(3, 40);
        let frame = frame(&mut editor);
        let lines = screen_lines(&frame);
        assert_eq!(
            lines[0],
            "\x1b[35m\"a\x1b[7mB\x1b[0m\x1b[35mb\"\x1b[39m\x1b[K"
        );
    }

    #[test]
    fn test_horizontal_scroll_clips_render() {
        let mut editor = editor_with("0123456789abcdef\n", "x.txt");
        editor.set_screen_size(3, 4);
        for _ in 0..10 {
            editor.move_cursor(kestrel_core::Direction::Right);
        }
        let frame = frame(&mut editor);
        let lines = screen_lines(&frame);
        assert_eq!(lines[0], "789a\x1b[39m\x1b[K");
        assert!(frame.ends_with("\x1b[1;4H\x1b[?25h"));
    }

    #[test]
    fn test_status_bar_layout() {
        let mut editor = editor_with("a\nb\nc\n", "main.c");
        editor.set_screen_size(2, 40);
        editor.insert_char(b'x');
        let frame = frame(&mut editor);
        let lines = screen_lines(&frame);

        let left = "main.c - 3 lines (modified)";
        let right = "c | 1/3";
        let expected = format!(
            "\x1b[7m{}{}{}\x1b[0m",
            left,
            " ".repeat(40 - left.len() - right.len()),
            right
        );
        assert_eq!(lines[2], expected);
    }

    #[test]
    fn test_status_bar_without_file() {
        let mut editor = Editor::default();
        editor.set_screen_size(2, 40);
        let frame = frame(&mut editor);
        let lines = screen_lines(&frame);
        assert!(lines[2].starts_with("\x1b[7m[No Name] - 0 lines "));
        assert!(lines[2].ends_with("no ft | 1/0\x1b[0m"));
    }

    #[test]
    fn test_status_bar_truncates_long_name() {
        let mut editor = editor_with("a\n", "abcdefghijklmnopqrstuvwxyz.txt");
        editor.set_screen_size(2, 80);
        let frame = frame(&mut editor);
        let lines = screen_lines(&frame);
        assert!(lines[2].starts_with("\x1b[7mabcdefghijklmnopqrst - 1 lines"));
    }

    #[test]
    fn test_message_bar() {
        let mut editor = Editor::default();
        editor.set_screen_size(2, 10);
        editor.set_status("HELP: Ctrl-S = save");
        let frame = frame(&mut editor);
        let lines = screen_lines(&frame);
        assert!(lines[3].starts_with("\x1b[KHELP: Ctrl"));
        assert!(!lines[3].contains("save"));
    }
}
