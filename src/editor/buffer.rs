use ropey::Rope;

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Text buffer for the editing pane.
///
/// The cursor is a char index into the rope. Vertical movement remembers the
/// column it started from so moving through a short line does not lose it.
pub struct EditorBuffer {
    rope: Rope,
    cursor: usize,
    goal_col: Option<usize>,
}

impl EditorBuffer {
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: 0,
            goal_col: None,
        }
    }

    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// Replace the whole content and put the cursor at the start.
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.cursor = 0;
        self.goal_col = None;
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Line content without its line ending.
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(line_idx).to_string();
        Some(line.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Cursor as (line, char column).
    pub fn cursor(&self) -> (usize, usize) {
        let line = self.rope.char_to_line(self.cursor);
        (line, self.cursor - self.rope.line_to_char(line))
    }

    pub fn insert_char(&mut self, ch: char) {
        self.rope.insert_char(self.cursor, ch);
        self.cursor += 1;
        self.goal_col = None;
    }

    pub fn insert_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.rope.insert(self.cursor, text);
        self.cursor += text.chars().count();
        self.goal_col = None;
    }

    /// Insert a line break at the cursor.
    pub fn split_line(&mut self) {
        self.insert_char('\n');
    }

    /// Delete the char before the cursor. Returns `false` at the start.
    pub fn delete_back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.rope.remove(self.cursor - 1..self.cursor);
        self.cursor -= 1;
        self.goal_col = None;
        true
    }

    /// Delete the char under the cursor. Returns `false` at the end.
    pub fn delete_forward(&mut self) -> bool {
        if self.cursor >= self.rope.len_chars() {
            return false;
        }
        self.rope.remove(self.cursor..=self.cursor);
        self.goal_col = None;
        true
    }

    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                self.goal_col = None;
            }
            Direction::Right => {
                self.cursor = (self.cursor + 1).min(self.rope.len_chars());
                self.goal_col = None;
            }
            Direction::Up => {
                let (line, _) = self.cursor();
                if line > 0 {
                    self.move_vertically(line - 1);
                }
            }
            Direction::Down => {
                let (line, _) = self.cursor();
                if line + 1 < self.line_count() {
                    self.move_vertically(line + 1);
                }
            }
        }
    }

    pub fn move_home(&mut self) {
        let (line, _) = self.cursor();
        self.cursor = self.rope.line_to_char(line);
        self.goal_col = None;
    }

    pub fn move_end(&mut self) {
        let (line, _) = self.cursor();
        self.cursor = self.rope.line_to_char(line) + self.line_chars(line);
        self.goal_col = None;
    }

    /// Place the cursor at `line`/`col` (char column), clamped to the text.
    pub fn move_to(&mut self, line: usize, col: usize) {
        let line = line.min(self.line_count().saturating_sub(1));
        self.cursor = self.rope.line_to_char(line) + col.min(self.line_chars(line));
        self.goal_col = None;
    }

    fn move_vertically(&mut self, target_line: usize) {
        let (_, col) = self.cursor();
        let goal = *self.goal_col.get_or_insert(col);
        self.cursor = self.rope.line_to_char(target_line) + goal.min(self.line_chars(target_line));
    }

    /// Chars on `line` excluding the line ending.
    fn line_chars(&self, line: usize) -> usize {
        let slice = self.rope.line(line);
        let mut len = slice.len_chars();
        while len > 0 && matches!(slice.char(len - 1), '\n' | '\r') {
            len -= 1;
        }
        len
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field("lines", &self.rope.len_lines())
            .field("cursor", &self.cursor())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buf = EditorBuffer::empty();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some(String::new()));
        assert_eq!(buf.cursor(), (0, 0));
    }

    #[test]
    fn test_text_roundtrip_keeps_crlf() {
        let content = "one\r\ntwo\nthree";
        let buf = EditorBuffer::from_text(content);
        assert_eq!(buf.text(), content);
        assert_eq!(buf.line_at(0), Some("one".to_string()));
        assert_eq!(buf.line_at(3), None);
    }

    #[test]
    fn test_insert_and_split() {
        let mut buf = EditorBuffer::empty();
        buf.insert_str("# Title");
        buf.split_line();
        buf.insert_char('x');
        assert_eq!(buf.text(), "# Title\nx");
        assert_eq!(buf.cursor(), (1, 1));
    }

    #[test]
    fn test_multibyte_chars_move_as_one() {
        let mut buf = EditorBuffer::from_text("caf\u{e9}!");
        buf.move_end();
        assert_eq!(buf.cursor(), (0, 5));
        buf.move_cursor(Direction::Left);
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "caf!");
    }

    #[test]
    fn test_delete_at_edges_is_noop() {
        let mut buf = EditorBuffer::from_text("ab");
        assert!(!buf.delete_back());
        buf.move_end();
        assert!(!buf.delete_forward());
        assert_eq!(buf.text(), "ab");
    }

    #[test]
    fn test_delete_back_joins_lines() {
        let mut buf = EditorBuffer::from_text("ab\ncd");
        buf.move_to(1, 0);
        buf.delete_back();
        assert_eq!(buf.text(), "abcd");
        assert_eq!(buf.cursor(), (0, 2));
    }

    #[test]
    fn test_delete_forward_removes_char() {
        let mut buf = EditorBuffer::from_text("abc");
        buf.move_to(0, 1);
        assert!(buf.delete_forward());
        assert_eq!(buf.text(), "ac");
    }

    #[test]
    fn test_vertical_movement_remembers_column() {
        let mut buf = EditorBuffer::from_text("long line\nab\nanother line");
        buf.move_to(0, 7);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor(), (1, 2));
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor(), (2, 7));
        buf.move_cursor(Direction::Up);
        buf.move_cursor(Direction::Up);
        assert_eq!(buf.cursor(), (0, 7));
    }

    #[test]
    fn test_move_up_on_first_line_is_noop() {
        let mut buf = EditorBuffer::from_text("abc\ndef");
        buf.move_to(0, 2);
        buf.move_cursor(Direction::Up);
        assert_eq!(buf.cursor(), (0, 2));
    }

    #[test]
    fn test_move_to_clamps() {
        let mut buf = EditorBuffer::from_text("abc\nde");
        buf.move_to(10, 10);
        assert_eq!(buf.cursor(), (1, 2));
        buf.move_to(0, 99);
        assert_eq!(buf.cursor(), (0, 3));
    }

    #[test]
    fn test_home_and_end_ignore_crlf() {
        let mut buf = EditorBuffer::from_text("abc\r\ndef");
        buf.move_to(0, 1);
        buf.move_end();
        assert_eq!(buf.cursor(), (0, 3));
        buf.move_home();
        assert_eq!(buf.cursor(), (0, 0));
    }

    #[test]
    fn test_set_text_resets_cursor() {
        let mut buf = EditorBuffer::from_text("abc");
        buf.move_end();
        buf.set_text("xyz\nw");
        assert_eq!(buf.cursor(), (0, 0));
        assert_eq!(buf.line_count(), 2);
    }
}
