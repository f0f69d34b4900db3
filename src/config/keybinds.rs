//! Keyboard shortcut definitions

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::actions::UserAction;

/// Keyboard shortcut configuration
#[derive(Debug, Clone)]
pub struct KeyBindings {
    // Global
    pub quit: Vec<KeyBind>,
    pub help: Vec<KeyBind>,

    // Dashboard navigation
    pub next_tab: Vec<KeyBind>,
    pub prev_tab: Vec<KeyBind>,

    // Cursor (arrow keys primary, vi alternative)
    pub up: Vec<KeyBind>,
    pub down: Vec<KeyBind>,
    pub left: Vec<KeyBind>,
    pub right: Vec<KeyBind>,

    // Sorting and paging
    pub sort: Vec<KeyBind>,
    pub next_page: Vec<KeyBind>,
    pub prev_page: Vec<KeyBind>,
    pub first_page: Vec<KeyBind>,
    pub last_page: Vec<KeyBind>,
    pub page_size: Vec<KeyBind>,

    // Selection
    pub toggle_row: Vec<KeyBind>,
    pub toggle_all: Vec<KeyBind>,
    pub clear_selection: Vec<KeyBind>,

    // Filtering
    pub search: Vec<KeyBind>,
    pub column_filter: Vec<KeyBind>,
    pub clear_filters: Vec<KeyBind>,

    pub details: Vec<KeyBind>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let none = KeyModifiers::NONE;
        Self {
            // Global
            quit: vec![
                KeyBind::new(KeyCode::Char('q'), none),
                KeyBind::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            ],
            help: vec![
                KeyBind::new(KeyCode::Char('?'), none),
                KeyBind::new(KeyCode::F(1), none),
            ],

            // Dashboard navigation
            next_tab: vec![KeyBind::new(KeyCode::Tab, none)],
            prev_tab: vec![KeyBind::new(KeyCode::BackTab, KeyModifiers::SHIFT)],

            // Cursor
            up: vec![
                KeyBind::new(KeyCode::Up, none),
                KeyBind::new(KeyCode::Char('k'), none),
            ],
            down: vec![
                KeyBind::new(KeyCode::Down, none),
                KeyBind::new(KeyCode::Char('j'), none),
            ],
            left: vec![KeyBind::new(KeyCode::Left, none)],
            right: vec![KeyBind::new(KeyCode::Right, none)],

            // Sorting and paging
            sort: vec![KeyBind::new(KeyCode::Char('s'), none)],
            next_page: vec![
                KeyBind::new(KeyCode::PageDown, none),
                KeyBind::new(KeyCode::Char('n'), none),
            ],
            prev_page: vec![
                KeyBind::new(KeyCode::PageUp, none),
                KeyBind::new(KeyCode::Char('p'), none),
            ],
            first_page: vec![KeyBind::new(KeyCode::Home, none)],
            last_page: vec![KeyBind::new(KeyCode::End, none)],
            page_size: vec![KeyBind::new(KeyCode::Char('z'), none)],

            // Selection
            toggle_row: vec![KeyBind::new(KeyCode::Char(' '), none)],
            toggle_all: vec![KeyBind::new(KeyCode::Char('a'), none)],
            clear_selection: vec![KeyBind::new(KeyCode::Char('c'), none)],

            // Filtering
            search: vec![KeyBind::new(KeyCode::Char('/'), none)],
            column_filter: vec![KeyBind::new(KeyCode::Char('f'), none)],
            clear_filters: vec![KeyBind::new(KeyCode::Esc, none)],

            details: vec![KeyBind::new(KeyCode::Enter, none)],
        }
    }
}

impl KeyBindings {
    /// Map a key press to the action bound to it
    pub fn action_for(&self, event: &KeyEvent) -> Option<UserAction> {
        let table: [(&[KeyBind], UserAction); 21] = [
            (&self.quit, UserAction::Quit),
            (&self.help, UserAction::Help),
            (&self.next_tab, UserAction::NextTab),
            (&self.prev_tab, UserAction::PrevTab),
            (&self.up, UserAction::RowUp),
            (&self.down, UserAction::RowDown),
            (&self.left, UserAction::ColumnLeft),
            (&self.right, UserAction::ColumnRight),
            (&self.sort, UserAction::CycleSort),
            (&self.next_page, UserAction::NextPage),
            (&self.prev_page, UserAction::PrevPage),
            (&self.first_page, UserAction::FirstPage),
            (&self.last_page, UserAction::LastPage),
            (&self.page_size, UserAction::CyclePageSize),
            (&self.toggle_row, UserAction::ToggleRow),
            (&self.toggle_all, UserAction::ToggleAll),
            (&self.clear_selection, UserAction::ClearSelection),
            (&self.search, UserAction::EditSearch),
            (&self.column_filter, UserAction::EditColumnFilter),
            (&self.clear_filters, UserAction::ClearFilters),
            (&self.details, UserAction::ShowDetails),
        ];

        if let Some((_, action)) = table
            .iter()
            .find(|(binds, _)| binds.iter().any(|b| b.matches(event.code, event.modifiers)))
        {
            return Some(*action);
        }

        // Number keys jump straight to a dashboard
        match (event.code, event.modifiers) {
            (KeyCode::Char(c @ '1'..='9'), KeyModifiers::NONE) => {
                Some(UserAction::GoToTab(c as usize - '1' as usize))
            }
            _ => None,
        }
    }

    /// Key label and description pairs for the help overlay
    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        let entries: [(&[KeyBind], UserAction); 20] = [
            (&self.up, UserAction::RowUp),
            (&self.down, UserAction::RowDown),
            (&self.left, UserAction::ColumnLeft),
            (&self.right, UserAction::ColumnRight),
            (&self.sort, UserAction::CycleSort),
            (&self.next_page, UserAction::NextPage),
            (&self.prev_page, UserAction::PrevPage),
            (&self.first_page, UserAction::FirstPage),
            (&self.last_page, UserAction::LastPage),
            (&self.page_size, UserAction::CyclePageSize),
            (&self.toggle_row, UserAction::ToggleRow),
            (&self.toggle_all, UserAction::ToggleAll),
            (&self.clear_selection, UserAction::ClearSelection),
            (&self.search, UserAction::EditSearch),
            (&self.column_filter, UserAction::EditColumnFilter),
            (&self.clear_filters, UserAction::ClearFilters),
            (&self.details, UserAction::ShowDetails),
            (&self.next_tab, UserAction::NextTab),
            (&self.help, UserAction::Help),
            (&self.quit, UserAction::Quit),
        ];

        entries
            .iter()
            .map(|(binds, action)| {
                let keys = binds
                    .iter()
                    .map(KeyBind::label)
                    .collect::<Vec<_>>()
                    .join(" / ");
                (keys, action.describe())
            })
            .collect()
    }
}

/// A single key binding
#[derive(Debug, Clone)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Shift is ignored for printable characters since terminals report
    /// it inconsistently for symbols like `?`.
    pub fn matches(&self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        if self.code != code {
            return false;
        }
        match code {
            KeyCode::Char(_) => {
                modifiers.difference(KeyModifiers::SHIFT)
                    == self.modifiers.difference(KeyModifiers::SHIFT)
            }
            _ => self.modifiers == modifiers,
        }
    }

    pub fn label(&self) -> String {
        let key = match self.code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::F(n) => format!("F{}", n),
            KeyCode::Up => "↑".to_string(),
            KeyCode::Down => "↓".to_string(),
            KeyCode::Left => "←".to_string(),
            KeyCode::Right => "→".to_string(),
            KeyCode::PageUp => "PgUp".to_string(),
            KeyCode::PageDown => "PgDn".to_string(),
            KeyCode::BackTab => "Shift-Tab".to_string(),
            other => format!("{:?}", other),
        };
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            format!("Ctrl-{}", key)
        } else {
            key
        }
    }
}
