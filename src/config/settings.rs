//! Application settings

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::grid::{SelectScope, DEFAULT_PAGE_SIZE};

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Rows per page
    pub page_size: usize,

    /// Sizes offered when cycling the page size
    pub page_size_options: Vec<usize>,

    /// Select-all covers every filtered row instead of the visible page
    pub select_across_pages: bool,

    /// Delay before a typed search query is applied
    pub search_debounce_ms: u64,

    /// Write page size changes back to the config file
    pub remember_page_size: bool,

    /// Log level
    pub log_level: String,

    /// Log file path
    pub log_file: String,

    /// Theme name
    pub theme: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_size_options: vec![5, 10, 25, 50],
            select_across_pages: false,
            search_debounce_ms: 250,
            remember_page_size: true,
            log_level: "info".to_string(),
            log_file: Self::default_log_path().to_string_lossy().to_string(),
            theme: "default".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from file or create default
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let settings: Self = serde_json::from_str(&content)
                .with_context(|| format!("Invalid settings in {}", config_path.display()))?;
            Ok(settings.normalized())
        } else {
            tracing::debug!("No config at {}, using defaults", config_path.display());
            Ok(Self::default())
        }
    }

    /// Save settings to file
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path);

        // Create parent directory if needed
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        tracing::debug!("Saved settings to {}", config_path.display());
        Ok(())
    }

    /// Page sizes of 0 are corrected to 1 and the option list always
    /// contains the configured size.
    pub fn normalized(mut self) -> Self {
        self.page_size = self.page_size.max(1);
        self.page_size_options.retain(|&size| size > 0);
        if !self.page_size_options.contains(&self.page_size) {
            self.page_size_options.push(self.page_size);
        }
        self.page_size_options.sort_unstable();
        self.page_size_options.dedup();
        self
    }

    /// Table behaviour shared by every dashboard
    pub fn table_options(&self) -> TableOptions {
        TableOptions {
            page_size: self.page_size,
            page_size_options: self.page_size_options.clone(),
            select_scope: if self.select_across_pages {
                SelectScope::AcrossPages
            } else {
                SelectScope::CurrentPage
            },
            search_debounce: Duration::from_millis(self.search_debounce_ms),
        }
    }

    /// Get default config directory
    pub fn config_dir() -> PathBuf {
        ProjectDirs::from("com", "consent-grid", "consent-grid")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".config")
                    .join("consent-grid")
            })
    }

    /// Get default config file path
    pub fn default_config_path() -> PathBuf {
        Self::config_dir().join("config.json")
    }

    /// Get default log path
    pub fn default_log_path() -> PathBuf {
        Self::config_dir().join("consent-grid.log")
    }
}

/// Per-table settings handed to each dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct TableOptions {
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
    pub select_scope: SelectScope,
    pub search_debounce: Duration,
}

impl Default for TableOptions {
    fn default() -> Self {
        Settings::default().table_options()
    }
}

impl TableOptions {
    /// The option after `current`, wrapping around.
    pub fn next_page_size(&self, current: usize) -> usize {
        self.page_size_options
            .iter()
            .copied()
            .find(|&size| size > current)
            .or_else(|| self.page_size_options.first().copied())
            .unwrap_or(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let settings = Settings {
            page_size: 25,
            select_across_pages: true,
            ..Settings::default()
        };
        settings.save(Some(&path)).unwrap();

        let loaded = Settings::load(Some(&path)).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(loaded.table_options().select_scope, SelectScope::AcrossPages);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Settings::load(Some(&dir.path().join("absent.json"))).unwrap();
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"page_size": 0, "page_size_options": [50, 0, 5]}"#).unwrap();

        let loaded = Settings::load(Some(&path)).unwrap();
        assert_eq!(loaded.page_size, 1);
        assert_eq!(loaded.page_size_options, vec![1, 5, 50]);
        assert_eq!(loaded.search_debounce_ms, 250);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ nope").unwrap();
        assert!(Settings::load(Some(&path)).is_err());
    }

    #[test]
    fn page_size_cycles_through_options() {
        let options = Settings::default().table_options();
        assert_eq!(options.next_page_size(5), 10);
        assert_eq!(options.next_page_size(50), 5);
        assert_eq!(options.next_page_size(7), 10);
        assert_eq!(options.search_debounce, Duration::from_millis(250));
    }
}
