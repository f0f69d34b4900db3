//! Grid event plumbing
//!
//! Table views report changes through callbacks. The shell turns those into
//! `GridEvent`s on an unbounded channel, and a background task records them
//! (logging, page size persistence) and signals the UI.

use std::path::PathBuf;

use tokio::sync::{broadcast, mpsc};

use crate::config::settings::Settings;
use crate::grid::SortState;

/// Changes reported by a dashboard's table view
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    SelectionChanged {
        dashboard: &'static str,
        selected: usize,
    },
    PageChanged {
        dashboard: &'static str,
        page: usize,
    },
    PageSizeChanged {
        dashboard: &'static str,
        page_size: usize,
    },
    SortChanged {
        dashboard: &'static str,
        sort: Option<SortState>,
    },
}

/// UI update signals
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdateSignal {
    Status(String),
    SettingsSaved,
}

pub type GridEventSender = mpsc::UnboundedSender<GridEvent>;

/// Writes page size changes back to the settings file
pub struct PageSizeStore {
    settings: Settings,
    path: Option<PathBuf>,
}

impl PageSizeStore {
    pub fn new(settings: Settings, path: Option<PathBuf>) -> Self {
        Self { settings, path }
    }

    /// Returns true when the settings file was written.
    pub fn record(&mut self, page_size: usize) -> bool {
        if !self.settings.remember_page_size || self.settings.page_size == page_size {
            return false;
        }
        self.settings.page_size = page_size;
        match self.settings.save(self.path.as_deref()) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to save page size: {:#}", e);
                false
            }
        }
    }
}

/// Run the grid event manager task
pub async fn run_event_manager(
    mut rx: mpsc::UnboundedReceiver<GridEvent>,
    ui_update_tx: broadcast::Sender<UiUpdateSignal>,
    mut store: PageSizeStore,
) {
    tracing::info!("Grid event manager started");

    while let Some(event) = rx.recv().await {
        tracing::debug!("Grid event: {:?}", event);
        match event {
            GridEvent::SelectionChanged {
                dashboard,
                selected,
            } => {
                let _ = ui_update_tx.send(UiUpdateSignal::Status(format!(
                    "{}: {} selected",
                    dashboard, selected
                )));
            }

            GridEvent::PageChanged { .. } => {}

            GridEvent::PageSizeChanged {
                dashboard,
                page_size,
            } => {
                tracing::info!("{} page size set to {}", dashboard, page_size);
                if store.record(page_size) {
                    let _ = ui_update_tx.send(UiUpdateSignal::SettingsSaved);
                }
            }

            GridEvent::SortChanged { dashboard, sort } => {
                let message = match sort {
                    Some(sort) => format!("{}: sorted by {}", dashboard, sort),
                    None => format!("{}: unsorted", dashboard),
                };
                let _ = ui_update_tx.send(UiUpdateSignal::Status(message));
            }
        }
    }

    tracing::info!("Grid event manager stopped");
}
