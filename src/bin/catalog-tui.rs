//! Catalog Browser TUI Application
//!
//! A terminal user interface for browsing a product catalog.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event;
use tracing::{error, info};

use catalog_browser::display::PreferenceStore;
use catalog_browser::tui::{
    handle_event, process_state, render, restore_terminal, setup_terminal, TuiState,
};
use catalog_browser::{
    logging, App, CatalogClient, Config, DisplayModePersistence, JsonFileStore, MemoryStore,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Configuration problems are reported before the terminal is taken over.
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    let _log_guard = logging::init(&config.log_dir(), config.log_filter());
    info!(base_url = %config.service.base_url, "starting catalog browser");

    let client = CatalogClient::from_config(&config.service)?;
    let preferences: Box<dyn PreferenceStore> = match config.preferences_path() {
        Some(path) => Box::new(JsonFileStore::new(path)),
        None => Box::new(MemoryStore::new()),
    };
    let display = DisplayModePersistence::load(preferences);

    let mut app = App::new(Arc::new(client), display);
    app.load();
    let mut state = TuiState::new(app);

    // Setup terminal
    let mut terminal = setup_terminal()?;

    let result = run(&mut terminal, &mut state);

    // Restore terminal
    restore_terminal(&mut terminal)?;

    if let Err(e) = &result {
        error!(error = %e, "terminal loop failed");
    }
    info!("catalog browser exited");
    result
}

fn run(
    terminal: &mut ratatui::Terminal<ratatui::backend::CrosstermBackend<std::io::Stdout>>,
    state: &mut TuiState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Draw the UI
        terminal.draw(|f| render(f, state))?;

        // Commit any fetches that finished since the last frame
        process_state(state);

        if state.should_quit {
            return Ok(());
        }

        // Handle events with a timeout
        if event::poll(Duration::from_millis(100))? {
            handle_event(event::read()?, state);
        }
    }
}
