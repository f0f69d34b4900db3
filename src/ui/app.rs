//! Main TUI application

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::KeyCode,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame, Terminal,
};
use tokio::sync::broadcast;

use crate::app::actions::{ActionResult, DialogType, UserAction};
use crate::app::events::{is_interrupt, is_key, AppEvent, EventHandler};
use crate::app::state::UiUpdateSignal;
use crate::config::keybinds::KeyBindings;
use crate::ui::dialogs::record_details::RecordDetailsDialog;
use crate::ui::layout::{AppLayout, DialogLayout};
use crate::ui::tabs::Dashboard;
use crate::ui::theme::Theme;
use crate::ui::widgets::popup::Popup;

/// How long a status message stays in the status bar
const STATUS_TTL: Duration = Duration::from_secs(4);

/// Dashboards, dialogs and key handling, independent of the terminal
pub struct AppShell {
    tabs: Vec<Box<dyn Dashboard>>,
    keybinds: KeyBindings,
    current_tab: usize,
    show_help: bool,
    details: Option<RecordDetailsDialog>,
    status: Option<(String, Instant)>,
    should_quit: bool,
}

impl AppShell {
    pub fn new(tabs: Vec<Box<dyn Dashboard>>, keybinds: KeyBindings) -> Self {
        Self {
            tabs,
            keybinds,
            current_tab: 0,
            show_help: false,
            details: None,
            status: None,
            should_quit: false,
        }
    }

    pub fn current_tab(&self) -> usize {
        self.current_tab
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn showing_help(&self) -> bool {
        self.show_help
    }

    pub fn showing_details(&self) -> bool {
        self.details.is_some()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_ref().map(|(message, _)| message.as_str())
    }

    pub fn set_status(&mut self, message: String) {
        self.status = Some((message, Instant::now()));
    }

    pub fn handle_signal(&mut self, signal: UiUpdateSignal) {
        match signal {
            UiUpdateSignal::Status(message) => self.set_status(message),
            UiUpdateSignal::SettingsSaved => self.set_status("Page size saved".to_string()),
        }
    }

    /// Debounce timers and status expiry
    pub fn tick(&mut self) {
        if let Some(tab) = self.tabs.get_mut(self.current_tab) {
            tab.tick();
        }
        if let Some((_, since)) = &self.status {
            if since.elapsed() >= STATUS_TTL {
                self.status = None;
            }
        }
    }

    pub fn handle_key(&mut self, key: crossterm::event::KeyEvent) {
        if is_interrupt(&key) {
            self.should_quit = true;
            return;
        }

        if let Some(dialog) = &mut self.details {
            if dialog.handle_key(key) {
                self.details = None;
            }
            return;
        }

        if self.show_help {
            // Any key closes help
            self.show_help = false;
            return;
        }

        let Some(tab) = self.tabs.get_mut(self.current_tab) else {
            if is_key(&key, KeyCode::Char('q')) {
                self.should_quit = true;
            }
            return;
        };

        if tab.is_editing() {
            tab.handle_input(key);
            return;
        }

        let Some(action) = self.keybinds.action_for(&key) else {
            return;
        };

        match action {
            UserAction::NextTab => self.switch_tab(1),
            UserAction::PrevTab => self.switch_tab(-1),
            UserAction::GoToTab(index) => {
                if index < self.tabs.len() {
                    self.current_tab = index;
                }
            }
            action => match tab.handle_action(action) {
                ActionResult::Quit => self.should_quit = true,
                ActionResult::ShowDialog(DialogType::Help) => self.show_help = true,
                ActionResult::ShowDialog(DialogType::RecordDetails) => {
                    self.details = tab.details();
                }
                ActionResult::CloseDialog => self.details = None,
                ActionResult::Continue => {}
            },
        }
    }

    fn switch_tab(&mut self, delta: i32) {
        let len = self.tabs.len() as i32;
        if len > 0 {
            self.current_tab = (self.current_tab as i32 + delta).rem_euclid(len) as usize;
        }
    }

    pub fn render(&mut self, frame: &mut Frame, theme: &Theme) {
        let layout = AppLayout::new(frame.area());
        let current_tab = self.current_tab;

        // Tab bar
        let tab_titles: Vec<Line> = self
            .tabs
            .iter()
            .enumerate()
            .map(|(i, tab)| {
                let style = if i == current_tab {
                    theme.tab_active()
                } else {
                    theme.tab_inactive()
                };
                Line::from(Span::styled(format!(" {} {} ", i + 1, tab.title()), style))
            })
            .collect();

        let tabs = Tabs::new(tab_titles)
            .select(current_tab)
            .highlight_style(theme.tab_active())
            .divider("|");

        frame.render_widget(tabs, layout.tabs);

        // Content
        let summary = match self.tabs.get_mut(current_tab) {
            Some(tab) => {
                let content_block = Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.border())
                    .title(format!(" {} ", tab.title()));

                let inner = content_block.inner(layout.content);
                frame.render_widget(content_block, layout.content);
                tab.render(frame, inner, theme);
                tab.summary()
            }
            None => String::from("No data"),
        };

        // Status bar
        let mut spans = vec![Span::raw(" "), Span::styled(summary, theme.normal())];
        if let Some(status) = self.status() {
            spans.push(Span::raw(" │ "));
            spans.push(Span::styled(status.to_string(), theme.accent()));
        }
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled("?=help q=quit", theme.dim()));
        frame.render_widget(Paragraph::new(Line::from(spans)), layout.status);

        // Help overlay
        if self.show_help {
            render_help(frame, theme, &self.keybinds);
        }

        if let Some(dialog) = &self.details {
            dialog.render(frame, theme);
        }
    }
}

/// Main TUI application
pub struct TuiApp {
    shell: AppShell,
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_handler: EventHandler,
    ui_update_rx: broadcast::Receiver<UiUpdateSignal>,
    theme: Theme,
}

impl TuiApp {
    pub fn new(
        shell: AppShell,
        theme: Theme,
        ui_update_rx: broadcast::Receiver<UiUpdateSignal>,
    ) -> Result<Self> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            shell,
            terminal,
            event_handler: EventHandler::new(Duration::from_millis(50)),
            ui_update_rx,
            theme,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        tracing::info!("TUI started");

        while !self.shell.should_quit() {
            // Check for UI update signals
            loop {
                match self.ui_update_rx.try_recv() {
                    Ok(signal) => self.shell.handle_signal(signal),
                    Err(broadcast::error::TryRecvError::Lagged(n)) => {
                        tracing::warn!("Dropped {} UI updates", n);
                    }
                    Err(_) => break,
                }
            }

            self.shell.tick();

            // Draw UI
            let shell = &mut self.shell;
            let theme = &self.theme;
            self.terminal.draw(|frame| shell.render(frame, theme))?;

            // Handle input events
            match self.event_handler.next() {
                Some(AppEvent::Key(key)) => self.shell.handle_key(key),
                Some(AppEvent::Resize(_, _)) | Some(AppEvent::Tick) | None => {}
            }

            // Let the event manager task run
            tokio::task::yield_now().await;
        }

        tracing::info!("TUI stopped");
        Ok(())
    }
}

impl Drop for TuiApp {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

fn render_help(frame: &mut Frame, theme: &Theme, keybinds: &KeyBindings) {
    let entries = keybinds.help_entries();
    let height = entries.len() as u16 + 6;
    let area = DialogLayout::centered(frame.area(), 62, height).dialog;

    let key_width = entries
        .iter()
        .map(|(keys, _)| keys.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("  Consent Grid - Keyboard Shortcuts", theme.highlight())),
        Line::from(""),
    ];
    lines.extend(entries.into_iter().map(|(keys, description)| {
        Line::from(vec![
            Span::styled(format!("  {:<width$}  ", keys, width = key_width), theme.accent()),
            Span::styled(description, theme.normal()),
        ])
    }));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("  Press any key to close", theme.dim())));

    Popup::new("Help", lines)
        .with_style(theme.normal())
        .with_border_style(theme.border_focused())
        .render(frame, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::GridEvent;
    use crate::config::settings::TableOptions;
    use crate::models::fixtures;
    use crate::ui::tabs::{consents, inspections};
    use crossterm::event::{KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;
    use tokio::sync::mpsc;

    fn shell() -> (AppShell, mpsc::UnboundedReceiver<GridEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let consents_data = fixtures::consent_applications();
        let inspections_data = fixtures::inspections(&consents_data);
        let tabs: Vec<Box<dyn Dashboard>> = vec![
            Box::new(consents::dashboard(consents_data, TableOptions::default(), tx.clone()).unwrap()),
            Box::new(inspections::dashboard(inspections_data, TableOptions::default(), tx).unwrap()),
        ];
        (AppShell::new(tabs, KeyBindings::default()), rx)
    }

    fn press(shell: &mut AppShell, code: KeyCode) {
        shell.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn tabs_wrap_around() {
        let (mut shell, _rx) = shell();
        press(&mut shell, KeyCode::Tab);
        assert_eq!(shell.current_tab(), 1);
        press(&mut shell, KeyCode::Tab);
        assert_eq!(shell.current_tab(), 0);
        press(&mut shell, KeyCode::Char('2'));
        assert_eq!(shell.current_tab(), 1);
        press(&mut shell, KeyCode::Char('9'));
        assert_eq!(shell.current_tab(), 1);
    }

    #[test]
    fn typing_in_search_does_not_trigger_bindings() {
        let (mut shell, _rx) = shell();
        press(&mut shell, KeyCode::Char('/'));
        press(&mut shell, KeyCode::Char('q'));
        assert!(!shell.should_quit());
        press(&mut shell, KeyCode::Enter);
        press(&mut shell, KeyCode::Char('q'));
        assert!(shell.should_quit());
    }

    #[test]
    fn dialogs_capture_keys() {
        let (mut shell, mut rx) = shell();
        press(&mut shell, KeyCode::Char('?'));
        assert!(shell.showing_help());
        press(&mut shell, KeyCode::Char('n'));
        assert!(!shell.showing_help());
        assert!(rx.try_recv().is_err());

        press(&mut shell, KeyCode::Enter);
        assert!(shell.showing_details());
        press(&mut shell, KeyCode::Char(' '));
        press(&mut shell, KeyCode::Esc);
        assert!(!shell.showing_details());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn signals_set_status() {
        let (mut shell, _rx) = shell();
        shell.handle_signal(UiUpdateSignal::SettingsSaved);
        assert_eq!(shell.status(), Some("Page size saved"));
    }

    #[test]
    fn renders_tabs_and_status() {
        let (mut shell, _rx) = shell();
        let theme = Theme::default();
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| shell.render(frame, &theme)).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("1 Consents"));
        assert!(text.contains("2 Inspections"));
        assert!(text.contains("Consents: 42 of 42 records"));
    }
}
