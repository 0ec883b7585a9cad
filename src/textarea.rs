//! Multi-line text buffer with a cursor, shared by the composer and the
//! per-item editors.

/// A single editing operation, as produced by key input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextEdit {
    Insert(char),
    InsertStr(String),
    Newline,
    Backspace,
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    Home,
    End,
    WordLeft,
    WordRight,
    DeleteWord,
    ClearLine,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextArea {
    /// Lines of text (always at least one)
    lines: Vec<String>,
    /// Cursor row (0-indexed into lines)
    cursor_row: usize,
    /// Cursor column (character position in the current line)
    cursor_col: usize,
}

impl Default for TextArea {
    fn default() -> Self {
        Self::new()
    }
}

impl TextArea {
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor_row: 0,
            cursor_col: 0,
        }
    }

    /// Buffer holding `text`, cursor placed at the end.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut area = Self::new();
        area.set_text(text);
        area
    }

    /// Replace the whole buffer and move the cursor to the end.
    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(str::to_string).collect();
        self.cursor_row = self.lines.len() - 1;
        self.cursor_col = self.lines[self.cursor_row].chars().count();
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Full text, lines joined with `\n`, exactly as typed.
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    /// Only whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[must_use]
    pub const fn cursor(&self) -> (usize, usize) {
        (self.cursor_row, self.cursor_col)
    }

    /// First line of a `rows`-tall window that keeps the cursor visible.
    #[must_use]
    pub const fn window_start(&self, rows: usize) -> usize {
        if rows == 0 {
            return 0;
        }
        self.cursor_row.saturating_sub(rows - 1)
    }

    pub fn apply(&mut self, edit: TextEdit) {
        match edit {
            TextEdit::Insert(c) => self.insert_char(c),
            TextEdit::InsertStr(s) => self.insert_str(&s),
            TextEdit::Newline => self.newline(),
            TextEdit::Backspace => self.backspace(),
            TextEdit::CursorUp => self.cursor_up(),
            TextEdit::CursorDown => self.cursor_down(),
            TextEdit::CursorLeft => self.cursor_left(),
            TextEdit::CursorRight => self.cursor_right(),
            TextEdit::Home => self.cursor_col = 0,
            TextEdit::End => self.end(),
            TextEdit::WordLeft => self.word_left(),
            TextEdit::WordRight => self.word_right(),
            TextEdit::DeleteWord => self.delete_word(),
            TextEdit::ClearLine => self.clear_line(),
        }
    }

    fn insert_char(&mut self, c: char) {
        if c == '\n' {
            self.newline();
            return;
        }
        let line = &mut self.lines[self.cursor_row];
        let byte_idx = char_to_byte_index(line, self.cursor_col);
        line.insert(byte_idx, c);
        self.cursor_col += 1;
    }

    fn insert_str(&mut self, s: &str) {
        for c in s.chars().filter(|c| *c != '\r') {
            self.insert_char(c);
        }
    }

    /// Split the current line at the cursor.
    fn newline(&mut self) {
        let line = &self.lines[self.cursor_row];
        let byte_idx = char_to_byte_index(line, self.cursor_col);
        let rest = self.lines[self.cursor_row][byte_idx..].to_string();
        self.lines[self.cursor_row].truncate(byte_idx);
        self.cursor_row += 1;
        self.lines.insert(self.cursor_row, rest);
        self.cursor_col = 0;
    }

    fn backspace(&mut self) {
        if self.cursor_col > 0 {
            let line = &mut self.lines[self.cursor_row];
            let byte_idx = char_to_byte_index(line, self.cursor_col - 1);
            let end_byte = char_to_byte_index(line, self.cursor_col);
            line.drain(byte_idx..end_byte);
            self.cursor_col -= 1;
        } else if self.cursor_row > 0 {
            // Merge with previous line
            let current = self.lines.remove(self.cursor_row);
            self.cursor_row -= 1;
            self.cursor_col = self.lines[self.cursor_row].chars().count();
            self.lines[self.cursor_row].push_str(&current);
        }
    }

    fn cursor_up(&mut self) {
        if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.clamp_col();
        }
    }

    fn cursor_down(&mut self) {
        if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.clamp_col();
        }
    }

    fn cursor_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = self.lines[self.cursor_row].chars().count();
        }
    }

    fn cursor_right(&mut self) {
        let line_len = self.lines[self.cursor_row].chars().count();
        if self.cursor_col < line_len {
            self.cursor_col += 1;
        } else if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.cursor_col = 0;
        }
    }

    fn end(&mut self) {
        self.cursor_col = self.lines[self.cursor_row].chars().count();
    }

    fn word_left(&mut self) {
        if self.cursor_col == 0 {
            return;
        }
        let line = &self.lines[self.cursor_row];
        let byte_idx = char_to_byte_index(line, self.cursor_col);
        self.cursor_col = line[..word_start(&line[..byte_idx])].chars().count();
    }

    fn word_right(&mut self) {
        let line = &self.lines[self.cursor_row];
        if self.cursor_col >= line.chars().count() {
            return;
        }
        let byte_idx = char_to_byte_index(line, self.cursor_col);
        let after = &line[byte_idx..];
        // Skip non-whitespace, then skip whitespace
        let skip_word = after
            .find(|c: char| c.is_whitespace())
            .unwrap_or(after.len());
        let rest = &after[skip_word..];
        let skip_space = rest
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(rest.len());
        self.cursor_col += after[..skip_word + skip_space].chars().count();
    }

    /// Delete the word before the cursor (Ctrl+W).
    fn delete_word(&mut self) {
        if self.cursor_col == 0 {
            return;
        }
        let line = &self.lines[self.cursor_row];
        let byte_idx = char_to_byte_index(line, self.cursor_col);
        let start_byte = word_start(&line[..byte_idx]);
        let new_col = line[..start_byte].chars().count();
        self.lines[self.cursor_row].drain(start_byte..byte_idx);
        self.cursor_col = new_col;
    }

    /// Clear from cursor to start of line (Ctrl+U).
    fn clear_line(&mut self) {
        let line = &self.lines[self.cursor_row];
        let byte_idx = char_to_byte_index(line, self.cursor_col);
        self.lines[self.cursor_row].drain(..byte_idx);
        self.cursor_col = 0;
    }

    fn clamp_col(&mut self) {
        let line_len = self.lines[self.cursor_row].chars().count();
        if self.cursor_col > line_len {
            self.cursor_col = line_len;
        }
    }
}

/// Byte offset where the last word of `before` starts.
fn word_start(before: &str) -> usize {
    before
        .trim_end()
        .rfind(char::is_whitespace)
        .map_or(0, |i| i + 1)
}

/// Convert a character index to a byte index in a string.
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map_or(s.len(), |(byte_idx, _)| byte_idx)
}
