use ropey::Rope;

/// Cursor position in the editor buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column, counted in chars.
    pub col: usize,
    /// Column to return to when moving vertically through shorter lines.
    sticky_col: usize,
}

impl Cursor {
    pub const fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            sticky_col: col,
        }
    }

    const fn place(&mut self, line: usize, col: usize) {
        self.line = line;
        self.col = col;
        self.sticky_col = col;
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Rope-backed text of one open document.
///
/// Mutating methods return whether the text actually changed, which is what
/// the host turns into an "editor changed" notification.
pub struct EditorBuffer {
    rope: Rope,
    cursor: Cursor,
    dirty: bool,
}

impl EditorBuffer {
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Cursor::default(),
            dirty: false,
        }
    }

    pub fn empty() -> Self {
        Self::from_text("")
    }

    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Whether the buffer changed since load or the last save.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Text of a line without its line ending.
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let text = self.rope.line(line_idx).to_string();
        Some(text.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Length of a line in chars, excluding its line ending.
    pub fn line_len(&self, line_idx: usize) -> usize {
        self.line_at(line_idx).map_or(0, |s| s.chars().count())
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn insert_char(&mut self, ch: char) -> bool {
        if ch == '\n' {
            return self.split_line();
        }
        let idx = self.cursor_char_idx();
        self.rope.insert_char(idx, ch);
        self.cursor.place(self.cursor.line, self.cursor.col + 1);
        self.dirty = true;
        true
    }

    /// Break the line at the cursor (Enter).
    pub fn split_line(&mut self) -> bool {
        let idx = self.cursor_char_idx();
        self.rope.insert_char(idx, '\n');
        self.cursor.place(self.cursor.line + 1, 0);
        self.dirty = true;
        true
    }

    /// Remove the char before the cursor, joining lines at column 0.
    pub fn delete_back(&mut self) -> bool {
        let idx = self.cursor_char_idx();
        if idx == 0 {
            return false;
        }
        if self.cursor.col == 0 {
            let prev = self.cursor.line - 1;
            let prev_len = self.line_len(prev);
            let join_start = self.rope.line_to_char(prev) + prev_len;
            self.rope.remove(join_start..idx);
            self.cursor.place(prev, prev_len);
        } else {
            self.rope.remove(idx - 1..idx);
            self.cursor.place(self.cursor.line, self.cursor.col - 1);
        }
        self.dirty = true;
        true
    }

    /// Remove the char under the cursor, joining with the next line at EOL.
    pub fn delete_forward(&mut self) -> bool {
        let idx = self.cursor_char_idx();
        if self.cursor.col < self.line_len(self.cursor.line) {
            self.rope.remove(idx..=idx);
        } else if self.cursor.line + 1 < self.line_count() {
            let next_start = self.rope.line_to_char(self.cursor.line + 1);
            self.rope.remove(idx..next_start);
        } else {
            return false;
        }
        self.dirty = true;
        true
    }

    pub fn move_cursor(&mut self, direction: Direction) {
        let Cursor {
            line,
            col,
            sticky_col,
        } = self.cursor;
        match direction {
            Direction::Left if col > 0 => self.cursor.place(line, col - 1),
            Direction::Left if line > 0 => {
                let prev_len = self.line_len(line - 1);
                self.cursor.place(line - 1, prev_len);
            }
            Direction::Right if col < self.line_len(line) => self.cursor.place(line, col + 1),
            Direction::Right if line + 1 < self.line_count() => self.cursor.place(line + 1, 0),
            Direction::Up if line > 0 => {
                let max_col = self.line_len(line - 1);
                self.cursor.line = line - 1;
                self.cursor.col = sticky_col.min(max_col);
            }
            Direction::Down if line + 1 < self.line_count() => {
                let max_col = self.line_len(line + 1);
                self.cursor.line = line + 1;
                self.cursor.col = sticky_col.min(max_col);
            }
            _ => {}
        }
    }

    pub const fn move_home(&mut self) {
        self.cursor.place(self.cursor.line, 0);
    }

    pub fn move_end(&mut self) {
        let len = self.line_len(self.cursor.line);
        self.cursor.place(self.cursor.line, len);
    }

    /// Move to a position, clamped to the buffer.
    pub fn move_to(&mut self, line: usize, col: usize) {
        let line = line.min(self.line_count().saturating_sub(1));
        let col = col.min(self.line_len(line));
        self.cursor.place(line, col);
    }

    fn cursor_char_idx(&self) -> usize {
        let col = self.cursor.col.min(self.line_len(self.cursor.line));
        self.rope.line_to_char(self.cursor.line) + col
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field("rope", &format_args!("Rope({} lines)", self.rope.len_lines()))
            .field("cursor", &self.cursor)
            .field("dirty", &self.dirty)
            .finish()
    }
}
