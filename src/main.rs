use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::sync::{broadcast, mpsc};
use tracing_subscriber::EnvFilter;

use consent_grid::app::query::{self, QueryArgs};
use consent_grid::app::state::{run_event_manager, PageSizeStore};
use consent_grid::config::{KeyBindings, Settings};
use consent_grid::models::{fixtures, load_records};
use consent_grid::ui::app::{AppShell, TuiApp};
use consent_grid::ui::tabs::{consents, inspections, records, Dashboard};
use consent_grid::ui::theme::Theme;

#[derive(Parser, Debug)]
#[command(name = "consent-grid")]
#[command(about = "Sortable, filterable, paginated tables for building consent data")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON file shown in an extra Records tab
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Rows per page
    #[arg(long)]
    page_size: Option<usize>,

    /// Select-all covers every filtered row
    #[arg(long)]
    select_across_pages: bool,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter, sort and page a JSON data file and print the result
    Query(QueryArgs),
}

fn init_logging(settings: &Settings) -> Result<()> {
    let path = PathBuf::from(&settings.log_file);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.as_str()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load settings
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(page_size) = cli.page_size {
        settings.page_size = page_size;
    }
    if cli.select_across_pages {
        settings.select_across_pages = true;
    }
    if let Some(log_file) = &cli.log_file {
        settings.log_file = log_file.to_string_lossy().to_string();
    }
    let settings = settings.normalized();

    init_logging(&settings)?;

    if let Some(Command::Query(args)) = &cli.command {
        println!("{}", query::execute(args, settings.page_size)?);
        return Ok(());
    }

    let options = settings.table_options();

    // Create channels for communication
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (ui_update_tx, ui_update_rx) = broadcast::channel(100);

    // Build dashboards
    let consent_data = fixtures::consent_applications();
    let inspection_data = fixtures::inspections(&consent_data);
    let mut tabs: Vec<Box<dyn Dashboard>> = vec![
        Box::new(consents::dashboard(consent_data, options.clone(), event_tx.clone())?),
        Box::new(inspections::dashboard(inspection_data, options.clone(), event_tx.clone())?),
    ];
    if let Some(path) = &cli.data {
        let data = load_records(path)?;
        tabs.push(Box::new(records::dashboard(data, options, event_tx)?));
    }

    // Start grid event manager
    let store = PageSizeStore::new(settings.clone(), cli.config.clone());
    let manager_handle = tokio::spawn(run_event_manager(event_rx, ui_update_tx, store));

    // Run TUI (blocks until user quits)
    let shell = AppShell::new(tabs, KeyBindings::default());
    let mut tui = TuiApp::new(shell, Theme::from_name(&settings.theme), ui_update_rx)?;
    let result = tui.run().await;
    drop(tui);

    manager_handle.abort();
    result
}
