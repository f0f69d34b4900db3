pub mod consents;
pub mod inspections;
pub mod records;

use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use crate::app::actions::{ActionResult, UserAction};
use crate::grid::Record;
use crate::ui::dialogs::record_details::RecordDetailsDialog;
use crate::ui::theme::Theme;
use crate::ui::widgets::table::GridTable;

/// A dashboard shown as one tab
pub trait Dashboard {
    fn title(&self) -> &str;

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);

    fn handle_action(&mut self, action: UserAction) -> ActionResult;

    /// Keys typed while a text field has focus
    fn handle_input(&mut self, key: KeyEvent);

    fn is_editing(&self) -> bool;

    /// Called once per event loop iteration
    fn tick(&mut self);

    fn details(&self) -> Option<RecordDetailsDialog>;

    fn summary(&self) -> String;
}

impl<R: Record + 'static> Dashboard for GridTable<R> {
    fn title(&self) -> &str {
        self.name()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        GridTable::render(self, frame, area, theme);
    }

    fn handle_action(&mut self, action: UserAction) -> ActionResult {
        GridTable::handle_action(self, action)
    }

    fn handle_input(&mut self, key: KeyEvent) {
        GridTable::handle_input(self, key);
    }

    fn is_editing(&self) -> bool {
        GridTable::is_editing(self)
    }

    fn tick(&mut self) {
        GridTable::tick(self);
    }

    fn details(&self) -> Option<RecordDetailsDialog> {
        GridTable::details(self)
    }

    fn summary(&self) -> String {
        GridTable::summary(self)
    }
}
