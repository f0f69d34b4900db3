//! Sortable, filterable, paginated and selectable table widget
//!
//! `GridTable` renders a [`TableView`] and turns user actions into view
//! operations. View callbacks are forwarded as [`GridEvent`]s.

use std::time::Instant;

use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Alignment, Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::actions::{ActionResult, DialogType, UserAction};
use crate::app::events::{text_edit, TextEdit};
use crate::app::state::{GridEvent, GridEventSender};
use crate::config::settings::TableOptions;
use crate::grid::{ColumnWidth, Record, TableView, ViewRow};
use crate::ui::dialogs::record_details::RecordDetailsDialog;
use crate::ui::layout::TableLayout;
use crate::ui::theme::Theme;
use crate::ui::widgets::searchbar::SearchBar;
use crate::ui::widgets::statusbar::{build_status_line, showing_range, StatusItem};

const CHECKBOX_WIDTH: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    Search,
    ColumnFilter,
}

/// Interactive table over one record set
pub struct GridTable<R> {
    name: &'static str,
    view: TableView<R>,
    options: TableOptions,
    table_state: TableState,
    column_cursor: usize,
    mode: InputMode,
    search_bar: SearchBar,
    filter_input: SearchBar,
    /// Time of the last unapplied search keystroke
    pending_search: Option<Instant>,
    status_columns: Vec<&'static str>,
    notice: Option<String>,
}

impl<R: Record + 'static> GridTable<R> {
    pub fn new(
        name: &'static str,
        view: TableView<R>,
        options: TableOptions,
        events: GridEventSender,
    ) -> Self {
        let view = attach_events(view, name, events)
            .with_page_size(options.page_size)
            .with_select_scope(options.select_scope);

        let mut table = Self {
            name,
            view,
            options,
            table_state: TableState::default(),
            column_cursor: 0,
            mode: InputMode::Normal,
            search_bar: SearchBar::new("Search (/ to edit, Esc to clear)", "Type / to search..."),
            filter_input: SearchBar::new("Filter", ""),
            pending_search: None,
            status_columns: Vec::new(),
            notice: None,
        };
        table.clamp_cursor();
        table
    }

    /// Color these columns by their status text
    pub fn with_status_columns(mut self, keys: &[&'static str]) -> Self {
        self.status_columns = keys.to_vec();
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn view(&self) -> &TableView<R> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut TableView<R> {
        &mut self.view
    }

    pub fn is_editing(&self) -> bool {
        self.mode != InputMode::Normal
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Row under the cursor
    pub fn cursor_row(&self) -> Option<ViewRow<'_, R>> {
        let index = self.table_state.selected()?;
        self.view.page().items.get(index).copied()
    }

    pub fn current_record(&self) -> Option<&R> {
        self.cursor_row().map(|row| row.record)
    }

    fn cursor_column_key(&self) -> Option<String> {
        self.view
            .columns()
            .at(self.column_cursor)
            .map(|column| column.key.clone())
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    pub fn handle_action(&mut self, action: UserAction) -> ActionResult {
        self.notice = None;

        match action {
            UserAction::RowUp => self.move_cursor(-1),
            UserAction::RowDown => self.move_cursor(1),
            UserAction::ColumnLeft => {
                self.column_cursor = self.column_cursor.saturating_sub(1);
            }
            UserAction::ColumnRight => {
                let last = self.view.columns().len().saturating_sub(1);
                self.column_cursor = (self.column_cursor + 1).min(last);
            }

            UserAction::CycleSort => {
                if let Some(key) = self.cursor_column_key() {
                    if self.view.columns().is_sortable(&key) {
                        self.view.toggle_sort(&key);
                        self.clamp_cursor();
                    } else {
                        self.notice = Some(format!("{} is not sortable", self.column_label(&key)));
                    }
                }
            }

            UserAction::NextPage => {
                self.view.next_page();
                self.reset_cursor();
            }
            UserAction::PrevPage => {
                self.view.previous_page();
                self.reset_cursor();
            }
            UserAction::FirstPage => {
                self.view.first_page();
                self.reset_cursor();
            }
            UserAction::LastPage => {
                self.view.last_page();
                self.reset_cursor();
            }
            UserAction::CyclePageSize => {
                let next = self
                    .options
                    .next_page_size(self.view.pagination().page_size());
                self.view.set_page_size(next);
                self.reset_cursor();
            }

            UserAction::ToggleRow => {
                let id = self.cursor_row().map(|row| row.id.to_string());
                if let Some(id) = id {
                    self.view.toggle(&id);
                }
            }
            UserAction::ToggleAll => self.view.toggle_all(),
            UserAction::ClearSelection => self.view.clear_selection(),

            UserAction::EditSearch => {
                self.mode = InputMode::Search;
                self.search_bar.activate();
            }
            UserAction::EditColumnFilter => {
                if let Some(key) = self.cursor_column_key() {
                    if self.view.columns().is_filterable(&key) {
                        let label = self.column_label(&key);
                        let current = self
                            .view
                            .filter_state()
                            .column(&key)
                            .unwrap_or("")
                            .to_string();
                        self.filter_input
                            .set_title(&format!("Filter {} (Enter to apply)", label));
                        self.filter_input.set_query(&current);
                        self.filter_input.activate();
                        self.mode = InputMode::ColumnFilter;
                    } else {
                        self.notice =
                            Some(format!("{} is not filterable", self.column_label(&key)));
                    }
                }
            }
            UserAction::ClearFilters => {
                self.pending_search = None;
                self.search_bar.clear();
                self.view.clear_filters();
                self.clamp_cursor();
            }

            UserAction::ShowDetails => {
                if self.current_record().is_some() {
                    return ActionResult::ShowDialog(DialogType::RecordDetails);
                }
            }

            UserAction::Help => return ActionResult::ShowDialog(DialogType::Help),
            UserAction::Quit => return ActionResult::Quit,
            UserAction::NextTab | UserAction::PrevTab | UserAction::GoToTab(_) => {}
        }

        ActionResult::Continue
    }

    /// Keys typed while the search bar or a column filter has focus
    pub fn handle_input(&mut self, key: KeyEvent) {
        let Some(edit) = text_edit(&key) else {
            return;
        };

        match self.mode {
            InputMode::Normal => {}

            InputMode::Search => match edit {
                TextEdit::Submit => {
                    self.apply_search();
                    self.search_bar.deactivate();
                    self.mode = InputMode::Normal;
                }
                TextEdit::Cancel => {
                    let committed = self.view.filter_state().query.clone();
                    self.search_bar.set_query(&committed);
                    self.search_bar.deactivate();
                    self.pending_search = None;
                    self.mode = InputMode::Normal;
                }
                edit => {
                    if self.search_bar.apply(&edit) {
                        self.pending_search = Some(Instant::now());
                    }
                }
            },

            InputMode::ColumnFilter => match edit {
                TextEdit::Submit => {
                    if let Some(key) = self.cursor_column_key() {
                        let value = self.filter_input.query.clone();
                        self.view.set_column_filter(&key, &value);
                        self.clamp_cursor();
                    }
                    self.filter_input.deactivate();
                    self.mode = InputMode::Normal;
                }
                TextEdit::Cancel => {
                    self.filter_input.deactivate();
                    self.mode = InputMode::Normal;
                }
                edit => {
                    self.filter_input.apply(&edit);
                }
            },
        }
    }

    /// Apply a typed query once the debounce delay has passed
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub fn tick_at(&mut self, now: Instant) {
        if let Some(since) = self.pending_search {
            if now.saturating_duration_since(since) >= self.options.search_debounce {
                self.apply_search();
            }
        }
    }

    fn apply_search(&mut self) {
        self.pending_search = None;
        let query = self.search_bar.query.clone();
        self.view.set_query(&query);
        self.clamp_cursor();
    }

    fn move_cursor(&mut self, delta: i64) {
        let len = self.view.page().items.len();
        if len == 0 {
            self.table_state.select(None);
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as i64;
        let next = (current + delta).clamp(0, len as i64 - 1) as usize;
        self.table_state.select(Some(next));
    }

    fn reset_cursor(&mut self) {
        self.table_state.select(None);
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        let len = self.view.page().items.len();
        if len == 0 {
            self.table_state.select(None);
        } else {
            let index = self.table_state.selected().unwrap_or(0).min(len - 1);
            self.table_state.select(Some(index));
        }
    }

    fn column_label(&self, key: &str) -> String {
        self.view
            .column(key)
            .map(|column| column.label.clone())
            .unwrap_or_else(|| key.to_string())
    }

    // -------------------------------------------------------------------------
    // Dialogs and status
    // -------------------------------------------------------------------------

    /// Every column of the record under the cursor
    pub fn details(&self) -> Option<RecordDetailsDialog> {
        let row = self.cursor_row()?;
        let fields = self
            .view
            .columns()
            .iter()
            .map(|column| (column.label.clone(), column.display(row.record)))
            .collect();
        let title = format!("{} #{}", self.name, row.index + 1);
        Some(RecordDetailsDialog::new(&title, fields, self.view.is_selected(row.id)))
    }

    /// Short summary for the application status bar
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{}: {} of {} records",
            self.name,
            self.view.filtered_count(),
            self.view.total_count()
        );
        if self.view.selected_count() > 0 {
            summary.push_str(&format!(", {} selected", self.view.selected_count()));
        }
        summary
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let layout = TableLayout::new(area);

        if self.mode == InputMode::ColumnFilter {
            self.filter_input
                .render(frame, layout.search, theme.normal(), theme.border_focused());
        } else {
            self.search_bar
                .render(frame, layout.search, theme.normal(), theme.border_focused());
        }

        let columns = self.view.columns();
        let sort = self.view.sort_state();
        let filter = self.view.filter_state();

        // Header
        let mut header_cells =
            vec![Cell::from(self.view.select_all_state().checkbox()).style(theme.header())];
        for (i, column) in columns.iter().enumerate() {
            let mut label = column.label.clone();
            if let Some(sort) = sort.filter(|s| s.key == column.key) {
                label = format!("{} {}", label, sort.direction.arrow());
            }
            if filter.column(&column.key).is_some() {
                label.push_str(" ≡");
            }
            let style = if i == self.column_cursor {
                theme.header_focused()
            } else {
                theme.header()
            };
            header_cells.push(Cell::from(aligned(label, column.align_right)).style(style));
        }
        let header = Row::new(header_cells).height(1);

        // Rows
        let page = self.view.page();
        let rows: Vec<Row> = if page.items.is_empty() {
            vec![Row::new(vec![
                Cell::from(""),
                Cell::from("No matching records"),
            ])
            .style(theme.dim())]
        } else {
            page.items
                .iter()
                .map(|row| {
                    let selected = self.view.is_selected(row.id);
                    let mut cells = vec![Cell::from(if selected { "[x]" } else { "[ ]" })];
                    for column in columns {
                        let text = column.display(row.record);
                        let style = if self.status_columns.contains(&column.key.as_str()) {
                            theme.status_style(&text)
                        } else {
                            theme.normal()
                        };
                        cells.push(Cell::from(aligned(text, column.align_right)).style(style));
                    }
                    let line = Row::new(cells);
                    if selected {
                        line.style(theme.selected())
                    } else {
                        line
                    }
                })
                .collect()
        };

        let mut widths = vec![Constraint::Length(CHECKBOX_WIDTH)];
        widths.extend(columns.iter().map(|column| match column.width {
            Some(ColumnWidth::Fixed(n)) => Constraint::Length(n),
            Some(ColumnWidth::Percent(p)) => Constraint::Percentage(p),
            Some(ColumnWidth::Min(n)) => Constraint::Min(n),
            None => Constraint::Fill(1),
        }));

        let title = if filter.is_empty() {
            format!(" {} ({}) ", self.name, self.view.total_count())
        } else {
            format!(
                " {} ({}/{}) ",
                self.name,
                self.view.filtered_count(),
                self.view.total_count()
            )
        };

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::NONE)
                    .title(Span::styled(title, theme.accent())),
            )
            .row_highlight_style(theme.cursor())
            .highlight_symbol("▶ ");

        // Pager
        let mut items = vec![
            StatusItem::new(
                "",
                &showing_range(
                    page.first_item_number(),
                    page.last_item_number(),
                    page.total_items,
                ),
            ),
            StatusItem::new("Page", &format!("{}/{}", page.page_index, page.total_pages))
                .with_style(theme.bright()),
            StatusItem::new("Size", &page.page_size.to_string()),
        ];
        if self.view.selected_count() > 0 {
            items.push(
                StatusItem::new("Selected", &self.view.selected_count().to_string())
                    .with_style(theme.highlight()),
            );
        }
        if filter.active_count() > 0 {
            items.push(
                StatusItem::new("Filters", &filter.active_count().to_string())
                    .with_style(theme.warning()),
            );
        }
        if let Some(notice) = &self.notice {
            items.push(StatusItem::new("", notice).with_style(theme.warning()));
        }
        let pager = Paragraph::new(build_status_line(items, "│")).style(theme.dim());

        frame.render_stateful_widget(table, layout.table, &mut self.table_state);
        frame.render_widget(pager, layout.pager);
    }
}

fn aligned(text: String, right: bool) -> Line<'static> {
    let line = Line::from(text);
    if right {
        line.alignment(Alignment::Right)
    } else {
        line
    }
}

/// Forward view callbacks to the grid event channel
fn attach_events<R: Record + 'static>(
    view: TableView<R>,
    name: &'static str,
    events: GridEventSender,
) -> TableView<R> {
    let selection_tx = events.clone();
    let page_tx = events.clone();
    let size_tx = events.clone();
    let sort_tx = events;

    view.on_selection_change(move |records| {
        let _ = selection_tx.send(GridEvent::SelectionChanged {
            dashboard: name,
            selected: records.len(),
        });
    })
    .on_page_change(move |page| {
        let _ = page_tx.send(GridEvent::PageChanged {
            dashboard: name,
            page,
        });
    })
    .on_page_size_change(move |page_size| {
        let _ = size_tx.send(GridEvent::PageSizeChanged {
            dashboard: name,
            page_size,
        });
    })
    .on_sort_change(move |sort| {
        let _ = sort_tx.send(GridEvent::SortChanged {
            dashboard: name,
            sort: sort.cloned(),
        });
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Column, Columns, SortState, Value};
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};
    use std::collections::BTreeMap;
    use std::time::Duration;
    use tokio::sync::mpsc;

    type Person = BTreeMap<String, Value>;

    fn record(n: usize) -> Person {
        let mut row = Person::new();
        row.insert("name".into(), format!("Person {:02}", n).into());
        row.insert("age".into(), Value::from(n));
        row
    }

    fn people_table(n: usize) -> (GridTable<Person>, mpsc::UnboundedReceiver<GridEvent>) {
        let columns = Columns::new(vec![
            Column::new("name", "Name").sortable().filterable(),
            Column::new("age", "Age").align_right(),
        ])
        .unwrap();
        let view = TableView::new(columns, (1..=n).map(record).collect());
        let options = TableOptions {
            page_size: 5,
            ..TableOptions::default()
        };
        let (tx, rx) = mpsc::unbounded_channel();
        (GridTable::new("People", view, options, tx), rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<GridEvent>) -> Vec<GridEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(table: &mut GridTable<Person>, text: &str) {
        for c in text.chars() {
            table.handle_input(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn paging_resets_cursor_and_emits_events() {
        let (mut table, mut rx) = people_table(12);
        table.handle_action(UserAction::RowDown);
        table.handle_action(UserAction::RowDown);
        table.handle_action(UserAction::NextPage);
        assert_eq!(table.view().pagination().page_index(), 2);
        assert_eq!(table.cursor_row().map(|r| r.index), Some(5));

        table.handle_action(UserAction::CyclePageSize);
        assert_eq!(table.view().pagination().page_size(), 10);
        assert_eq!(
            drain(&mut rx),
            vec![
                GridEvent::PageChanged { dashboard: "People", page: 2 },
                GridEvent::PageSizeChanged { dashboard: "People", page_size: 10 },
                GridEvent::PageChanged { dashboard: "People", page: 1 },
            ]
        );
    }

    #[test]
    fn sort_only_on_sortable_columns() {
        let (mut table, mut rx) = people_table(3);
        table.handle_action(UserAction::ColumnRight);
        table.handle_action(UserAction::CycleSort);
        assert_eq!(table.view().sort_state(), None);
        assert_eq!(table.notice(), Some("Age is not sortable"));

        table.handle_action(UserAction::ColumnLeft);
        table.handle_action(UserAction::CycleSort);
        table.handle_action(UserAction::CycleSort);
        assert_eq!(table.view().sort_state(), Some(&SortState::descending("name")));
        assert_eq!(
            table.current_record().map(|r| r.field("name")),
            Some(Value::from("Person 03"))
        );
        assert_eq!(drain(&mut rx).len(), 2);
    }

    #[test]
    fn selection_follows_cursor_and_select_all() {
        let (mut table, mut rx) = people_table(12);
        table.handle_action(UserAction::RowDown);
        table.handle_action(UserAction::ToggleRow);
        assert!(table.view().is_selected("1"));

        table.handle_action(UserAction::ToggleAll);
        assert_eq!(table.view().selected_count(), 5);
        table.handle_action(UserAction::ToggleAll);
        assert_eq!(table.view().selected_count(), 0);

        let counts: Vec<usize> = drain(&mut rx)
            .into_iter()
            .filter_map(|e| match e {
                GridEvent::SelectionChanged { selected, .. } => Some(selected),
                _ => None,
            })
            .collect();
        assert_eq!(counts, vec![1, 5, 0]);
    }

    #[test]
    fn search_is_debounced() {
        let (mut table, _rx) = people_table(12);
        table.handle_action(UserAction::EditSearch);
        assert!(table.is_editing());
        type_text(&mut table, "person 1");

        table.tick_at(Instant::now() - Duration::from_secs(1));
        assert_eq!(table.view().filtered_count(), 12);

        table.tick_at(Instant::now() + Duration::from_secs(1));
        assert_eq!(table.view().filtered_count(), 3);
        assert!(table.is_editing());

        table.handle_input(key(KeyCode::Backspace));
        table.handle_input(key(KeyCode::Esc));
        assert!(!table.is_editing());
        assert_eq!(table.view().filter_state().query, "person 1");
    }

    #[test]
    fn enter_applies_search_immediately() {
        let (mut table, _rx) = people_table(12);
        table.handle_action(UserAction::EditSearch);
        type_text(&mut table, "person 07");
        table.handle_input(key(KeyCode::Enter));
        assert_eq!(table.view().filtered_count(), 1);

        table.handle_action(UserAction::ClearFilters);
        assert_eq!(table.view().filtered_count(), 12);
    }

    #[test]
    fn column_filter_editing() {
        let (mut table, _rx) = people_table(12);
        table.handle_action(UserAction::EditColumnFilter);
        type_text(&mut table, "0");
        table.handle_input(key(KeyCode::Enter));
        assert_eq!(table.view().filter_state().column("name"), Some("0"));
        assert_eq!(table.view().filtered_count(), 10);

        table.handle_action(UserAction::ColumnRight);
        table.handle_action(UserAction::EditColumnFilter);
        assert!(!table.is_editing());
        assert_eq!(table.notice(), Some("Age is not filterable"));
    }

    #[test]
    fn details_require_a_row() {
        let (mut table, _rx) = people_table(0);
        assert_eq!(table.handle_action(UserAction::ShowDetails), ActionResult::Continue);
        assert!(table.details().is_none());

        let (mut table, _rx) = people_table(2);
        assert_eq!(
            table.handle_action(UserAction::ShowDetails),
            ActionResult::ShowDialog(DialogType::RecordDetails)
        );
        assert!(table.details().is_some());
    }

    #[test]
    fn renders_header_rows_and_pager() {
        let (mut table, _rx) = people_table(15);
        table.handle_action(UserAction::CycleSort);

        let mut terminal = Terminal::new(TestBackend::new(80, 14)).unwrap();
        let theme = Theme::default();
        terminal
            .draw(|frame| {
                let area = frame.area();
                table.render(frame, area, &theme);
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content.iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("Name ▲"));
        assert!(text.contains("Person 01"));
        assert!(text.contains("Showing 1-5 of 15"));
        assert!(text.contains("Page: 1/3"));
    }
}
