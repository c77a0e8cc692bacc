//! Text buffer with a byte-offset cursor that always sits on a char boundary.

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(super) struct Editor {
    buffer: String,
    cursor: usize,
}

impl Editor {
    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor(&mut self, pos: usize) {
        debug_assert!(self.buffer.is_char_boundary(pos));
        self.cursor = pos.min(self.buffer.len());
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    pub fn insert_char(&mut self, c: char) {
        self.buffer.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn insert_str(&mut self, text: &str) {
        // Pasted CRLF would otherwise leave stray carriage returns in the buffer
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        self.buffer.insert_str(self.cursor, &normalized);
        self.cursor += normalized.len();
    }

    pub fn backspace(&mut self) -> bool {
        let Some(prev) = self.prev_boundary() else {
            return false;
        };
        self.buffer.drain(prev..self.cursor);
        self.cursor = prev;
        true
    }

    pub fn delete(&mut self) -> bool {
        let Some(next) = self.next_boundary() else {
            return false;
        };
        self.buffer.drain(self.cursor..next);
        true
    }

    pub fn left(&mut self) -> bool {
        self.prev_boundary().map(|p| self.cursor = p).is_some()
    }

    pub fn right(&mut self) -> bool {
        self.next_boundary().map(|n| self.cursor = n).is_some()
    }

    /// Start of the current logical line.
    pub fn home(&mut self) -> bool {
        let start = self.buffer[..self.cursor].rfind('\n').map_or(0, |i| i + 1);
        let moved = start != self.cursor;
        self.cursor = start;
        moved
    }

    /// End of the current logical line.
    pub fn end(&mut self) -> bool {
        let end = self.buffer[self.cursor..]
            .find('\n')
            .map_or(self.buffer.len(), |i| self.cursor + i);
        let moved = end != self.cursor;
        self.cursor = end;
        moved
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.buffer[..self.cursor].char_indices().next_back().map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.buffer[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor(text: &str) -> Editor {
        let mut e = Editor::default();
        e.insert_str(text);
        e
    }

    #[test]
    fn inserts_at_cursor() {
        let mut e = editor("ac");
        e.left();
        e.insert_char('b');
        assert_eq!(e.text(), "abc");
        assert_eq!(e.cursor(), 2);
    }

    #[test]
    fn multibyte_chars_edit_cleanly() {
        let mut e = editor("añb");
        assert!(e.left());
        assert!(e.backspace());
        assert_eq!(e.text(), "ab");
        assert_eq!(e.cursor(), 1);
        assert!(e.delete());
        assert_eq!(e.text(), "a");
        assert!(!e.delete());
    }

    #[test]
    fn boundaries_do_not_move() {
        let mut e = Editor::default();
        assert!(!e.backspace());
        assert!(!e.left());
        assert!(!e.right());
    }

    #[test]
    fn home_and_end_stay_on_logical_line() {
        let mut e = editor("first\nsecond");
        e.set_cursor(9);
        assert!(e.home());
        assert_eq!(e.cursor(), 6);
        assert!(e.end());
        assert_eq!(e.cursor(), 12);
        assert!(!e.end());
    }

    #[test]
    fn paste_normalizes_line_endings() {
        let e = editor("a\r\nb\rc");
        assert_eq!(e.text(), "a\nb\nc");
    }
}
