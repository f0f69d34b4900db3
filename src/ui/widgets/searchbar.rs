//! Search/filter bar widget

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::events::TextEdit;

/// Search bar state. The cursor counts characters, not bytes.
pub struct SearchBar {
    pub query: String,
    pub active: bool,
    pub cursor_pos: usize,
    title: String,
    placeholder: String,
}

impl SearchBar {
    pub fn new(title: &str, placeholder: &str) -> Self {
        Self {
            query: String::new(),
            active: false,
            cursor_pos: 0,
            title: title.to_string(),
            placeholder: placeholder.to_string(),
        }
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    pub fn activate(&mut self) {
        self.active = true;
        self.cursor_pos = self.len();
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Replace the text, moving the cursor to the end
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.cursor_pos = self.len();
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.cursor_pos = 0;
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_offset(self.cursor_pos);
        self.query.insert(at, c);
        self.cursor_pos += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor_pos > 0 {
            self.cursor_pos -= 1;
            let at = self.byte_offset(self.cursor_pos);
            self.query.remove(at);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor_pos < self.len() {
            let at = self.byte_offset(self.cursor_pos);
            self.query.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor_pos < self.len() {
            self.cursor_pos += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor_pos = self.len();
    }

    /// Apply an editing key. Returns true when the text changed.
    pub fn apply(&mut self, edit: &TextEdit) -> bool {
        let before = self.query.len();
        match edit {
            TextEdit::Insert(c) => self.insert(*c),
            TextEdit::Backspace => self.backspace(),
            TextEdit::Delete => self.delete(),
            TextEdit::Left => self.move_left(),
            TextEdit::Right => self.move_right(),
            TextEdit::Home => self.move_home(),
            TextEdit::End => self.move_end(),
            TextEdit::Submit | TextEdit::Cancel => {}
        }
        self.query.len() != before
    }

    fn len(&self) -> usize {
        self.query.chars().count()
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.query
            .char_indices()
            .nth(chars)
            .map(|(i, _)| i)
            .unwrap_or(self.query.len())
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, style: Style, focused_style: Style) {
        let border_style = if self.active { focused_style } else { style };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(" {} ", self.title));

        let display_text = if self.query.is_empty() && !self.active {
            self.placeholder.clone()
        } else {
            self.query.clone()
        };

        let paragraph = Paragraph::new(display_text)
            .block(block)
            .style(style);

        frame.render_widget(paragraph, area);

        // Show cursor if active
        if self.active {
            frame.set_cursor_position((
                area.x + 1 + self.cursor_pos as u16,
                area.y + 1,
            ));
        }
    }
}

impl Default for SearchBar {
    fn default() -> Self {
        Self::new("Search", "Type / to search...")
    }
}
