//! A single document line and its render cache.
//!
//! Each row owns its raw bytes plus two derived buffers: the render form
//! (tabs expanded to spaces) and one highlight class per rendered byte.
//! The derived buffers are rebuilt whenever the raw bytes change.

use crate::syntax::Highlight;

/// One line of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Position of the row in the document.
    pub(crate) index: usize,
    /// Raw bytes, without the line terminator.
    pub(crate) chars: Vec<u8>,
    /// `chars` with tabs expanded.
    pub(crate) render: Vec<u8>,
    /// One entry per byte of `render`.
    pub(crate) highlight: Vec<Highlight>,
    /// Whether the row ends inside an unterminated block comment.
    pub(crate) open_comment: bool,
}

impl Row {
    /// Creates a row and builds its render form.
    pub(crate) fn new(index: usize, chars: Vec<u8>, tab_stop: usize) -> Self {
        let mut row = Self {
            index,
            chars,
            render: Vec::new(),
            highlight: Vec::new(),
            open_comment: false,
        };
        row.update_render(tab_stop);
        row
    }

    /// Returns the row's position in the document.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the raw bytes.
    pub fn chars(&self) -> &[u8] {
        &self.chars
    }

    /// Returns the number of raw bytes.
    pub fn size(&self) -> usize {
        self.chars.len()
    }

    /// Returns the tab-expanded bytes.
    pub fn render(&self) -> &[u8] {
        &self.render
    }

    /// Returns the number of rendered bytes.
    pub fn rsize(&self) -> usize {
        self.render.len()
    }

    /// Returns the highlight class of each rendered byte.
    pub fn highlight(&self) -> &[Highlight] {
        &self.highlight
    }

    /// Returns true if the row ends inside a block comment.
    pub fn open_comment(&self) -> bool {
        self.open_comment
    }

    /// Converts a character index to a render column.
    ///
    /// Indices past the end are clamped to the row size.
    pub fn char_to_render_index(&self, cx: usize, tab_stop: usize) -> usize {
        let tab_stop = tab_stop.max(1);
        self.chars[..cx.min(self.chars.len())]
            .iter()
            .fold(0, |rx, &b| {
                if b == b'\t' {
                    rx + tab_stop - (rx % tab_stop)
                } else {
                    rx + 1
                }
            })
    }

    /// Converts a render column back to a character index.
    ///
    /// Every column covered by a tab's expansion maps to that tab's index.
    /// Columns past the end return the row size.
    pub fn render_to_char_index(&self, rx: usize, tab_stop: usize) -> usize {
        let tab_stop = tab_stop.max(1);
        let mut cur_rx = 0;
        for (cx, &b) in self.chars.iter().enumerate() {
            if b == b'\t' {
                cur_rx += tab_stop - 1 - (cur_rx % tab_stop);
            }
            cur_rx += 1;
            if cur_rx > rx {
                return cx;
            }
        }
        self.chars.len()
    }

    /// Rebuilds `render` from `chars` and resets `highlight` to the
    /// rendered length. Classification is left to the highlighter.
    pub(crate) fn update_render(&mut self, tab_stop: usize) {
        let tab_stop = tab_stop.max(1);
        let tabs = self.chars.iter().filter(|&&b| b == b'\t').count();

        self.render.clear();
        self.render.reserve(self.chars.len() + tabs * (tab_stop - 1));
        for &b in &self.chars {
            if b == b'\t' {
                self.render.push(b' ');
                while self.render.len() % tab_stop != 0 {
                    self.render.push(b' ');
                }
            } else {
                self.render.push(b);
            }
        }

        self.highlight.clear();
        self.highlight.resize(self.render.len(), Highlight::Normal);
    }

    /// Inserts a byte at `at`, clamped to the row size.
    pub(crate) fn insert_char(&mut self, at: usize, c: u8, tab_stop: usize) {
        let at = at.min(self.chars.len());
        self.chars.insert(at, c);
        self.update_render(tab_stop);
    }

    /// Removes the byte at `at`. Returns false if `at` is past the end.
    pub(crate) fn delete_char(&mut self, at: usize, tab_stop: usize) -> bool {
        if at >= self.chars.len() {
            return false;
        }
        self.chars.remove(at);
        self.update_render(tab_stop);
        true
    }

    /// Appends bytes to the end of the row.
    pub(crate) fn append(&mut self, bytes: &[u8], tab_stop: usize) {
        self.chars.extend_from_slice(bytes);
        self.update_render(tab_stop);
    }

    /// Splits the row at `at`, keeping the head and returning the tail.
    pub(crate) fn split_off(&mut self, at: usize, tab_stop: usize) -> Vec<u8> {
        let tail = self.chars.split_off(at.min(self.chars.len()));
        self.update_render(tab_stop);
        tail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAB: usize = 8;

    fn row(text: &[u8]) -> Row {
        Row::new(0, text.to_vec(), TAB)
    }

    #[test]
    fn test_plain_row() {
        let r = row(b"hello");
        assert_eq!(r.size(), 5);
        assert_eq!(r.render(), b"hello");
        assert_eq!(r.rsize(), 5);
        assert_eq!(r.highlight().len(), 5);
    }

    #[test]
    fn test_tab_after_char() {
        let r = row(b"a\tb");
        assert_eq!(r.render(), b"a       b");
        assert_eq!(r.rsize(), 9);
        assert_eq!(r.char_to_render_index(0, TAB), 0);
        assert_eq!(r.char_to_render_index(1, TAB), 1);
        assert_eq!(r.char_to_render_index(2, TAB), 8);
    }

    #[test]
    fn test_aligned_tabs_expand_fully() {
        let r = row(b"\t\tx");
        assert_eq!(r.rsize(), r.size() + 7 * 2);
        assert_eq!(r.highlight().len(), r.rsize());
    }

    #[test]
    fn test_tab_expansion_bounded() {
        for text in [&b"\tab\tc"[..], b"abcdefg\th", b"abcdefgh\t", b"\t"] {
            let r = row(text);
            let tabs = text.iter().filter(|&&b| b == b'\t').count();
            assert!(r.rsize() <= r.size() + 7 * tabs);
            assert!(r.rsize() >= r.size());
            assert_eq!(r.render().len(), r.rsize());
            assert_eq!(r.highlight().len(), r.rsize());
        }
    }

    #[test]
    fn test_round_trip_char_render_index() {
        let r = row(b"\tif (x)\t{ y\t= 1; }\t");
        for cx in 0..=r.size() {
            let rx = r.char_to_render_index(cx, TAB);
            assert_eq!(r.render_to_char_index(rx, TAB), cx, "cx = {}", cx);
        }
    }

    #[test]
    fn test_render_columns_inside_tab_map_to_tab() {
        let r = row(b"a\tb");
        for rx in 1..8 {
            assert_eq!(r.render_to_char_index(rx, TAB), 1);
        }
        assert_eq!(r.render_to_char_index(8, TAB), 2);
        assert_eq!(r.render_to_char_index(100, TAB), 3);
    }

    #[test]
    fn test_custom_tab_stop() {
        let r = Row::new(0, b"a\tb".to_vec(), 4);
        assert_eq!(r.render(), b"a   b");
        assert_eq!(r.char_to_render_index(2, 4), 4);
    }

    #[test]
    fn test_mutations_rebuild_render() {
        let mut r = row(b"ab");
        r.insert_char(1, b'\t', TAB);
        assert_eq!(r.chars(), b"a\tb");
        assert_eq!(r.rsize(), 9);

        assert!(r.delete_char(1, TAB));
        assert_eq!(r.render(), b"ab");
        assert!(!r.delete_char(2, TAB));

        r.append(b"cd", TAB);
        assert_eq!(r.chars(), b"abcd");

        let tail = r.split_off(1, TAB);
        assert_eq!(tail, b"bcd");
        assert_eq!(r.chars(), b"a");
        assert_eq!(r.highlight().len(), 1);
    }

    #[test]
    fn test_insert_past_end_appends() {
        let mut r = row(b"ab");
        r.insert_char(10, b'c', TAB);
        assert_eq!(r.chars(), b"abc");
    }
}
