//! Record details dialog

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    text::{Line, Span},
    Frame,
};

use crate::ui::layout::DialogLayout;
use crate::ui::theme::Theme;
use crate::ui::widgets::popup::Popup;

/// Label and display text of every column of one record
pub struct RecordDetailsDialog {
    title: String,
    fields: Vec<(String, String)>,
    selected: bool,
    scroll_offset: u16,
}

impl RecordDetailsDialog {
    pub fn new(title: &str, fields: Vec<(String, String)>, selected: bool) -> Self {
        Self {
            title: title.to_string(),
            fields,
            selected,
            scroll_offset: 0,
        }
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Returns true when the dialog should close
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => return true,
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let max = self.fields.len().saturating_sub(1) as u16;
                self.scroll_offset = (self.scroll_offset + 1).min(max);
            }
            _ => {}
        }
        false
    }

    pub fn render(&self, frame: &mut Frame, theme: &Theme) {
        let area = DialogLayout::new(frame.area(), 60, 60).dialog;
        let label_width = self
            .fields
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);

        let mut lines: Vec<Line> = self
            .fields
            .iter()
            .map(|(label, value)| {
                let value = if value.is_empty() { "-" } else { value.as_str() };
                Line::from(vec![
                    Span::styled(format!(" {:<width$}  ", label, width = label_width), theme.accent()),
                    Span::styled(value.to_string(), theme.normal()),
                ])
            })
            .collect();

        lines.push(Line::from(""));
        let selection = if self.selected { "Selected" } else { "Not selected" };
        lines.push(Line::from(Span::styled(format!(" {}", selection), theme.highlight())));
        lines.push(Line::from(Span::styled(" Esc/Enter to close", theme.dim())));

        Popup::new(&self.title, lines)
            .with_style(theme.normal())
            .with_border_style(theme.border_focused())
            .with_scroll(self.scroll_offset)
            .render(frame, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn closes_and_scrolls() {
        let mut dialog = RecordDetailsDialog::new(
            "Consents #1",
            vec![("Reference".into(), "BC240120".into()), ("Officer".into(), String::new())],
            false,
        );
        assert!(!dialog.handle_key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE)));
        assert!(!dialog.handle_key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE)));
        assert_eq!(dialog.scroll_offset, 1);
        assert!(dialog.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
        assert_eq!(dialog.fields().len(), 2);
    }
}
