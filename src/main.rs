// src/main.rs
mod app;
mod catalog;
mod config;
mod forms;
mod input;
mod models;
mod network;
mod projection;
mod store;
mod theme;
mod ui;
mod utils;

use std::{fs::OpenOptions, path::PathBuf, sync::Mutex, time::Duration};
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::app::App;
use crate::catalog::Catalog;
use crate::config::Settings;
use crate::models::Tab;
use crate::network::MockBackend;
use crate::store::GistStore;
use crate::theme::Theme;

/// Browse, star, fork and favorite gists in the terminal.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Initial search query
    #[arg(short, long)]
    query: Option<String>,

    /// Initial tab: all, starred, forked or favorites
    #[arg(short, long)]
    tab: Option<String>,

    /// Additional config file, merged over the default locations
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Gist catalog JSON file, overrides `catalog_path`
    #[arg(long)]
    catalog: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::new(args.config.as_deref()).context("failed to load settings")?;
    init_tracing(&settings);
    match config::ensure_user_config() {
        Ok(Some(path)) => tracing::info!(path = %path.display(), "Created user config"),
        Ok(None) => {}
        Err(err) => tracing::warn!(%err, "Could not create user config"),
    }

    let initial_tab = match args.tab.as_deref() {
        Some(raw) => raw.parse::<Tab>().map_err(anyhow::Error::msg)?,
        None => Tab::All,
    };
    let catalog = match args.catalog.clone().or_else(|| settings.catalog_path()) {
        Some(path) => Catalog::from_path(&path)?,
        None => Catalog::builtin()?,
    };

    let store = GistStore::new(catalog).with_memberships_kept_on_logout(settings.keep_memberships_on_logout);
    let mut app = App::new(store);
    app.set_tab(initial_tab);
    if let Some(query) = args.query {
        app.set_query(query);
    }

    let rt = Runtime::new()?;
    let backend = MockBackend::new(Duration::from_millis(settings.simulated_delay_ms));

    terminal::enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = run(&mut terminal, &mut app, &rt, &backend);

    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    tracing::info!("Exiting");
    result
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, rt: &Runtime, backend: &MockBackend) -> Result<()> {
    let theme = Theme::default();
    let (tx, mut rx) = mpsc::unbounded_channel();

    loop {
        terminal.draw(|f| ui::render(f, app, &theme))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press && !input::handle_key(app, key_event)? {
                    break;
                }
            }
        }

        for request in app.take_requests() {
            tracing::debug!(request = request.name(), "Dispatching request");
            backend.dispatch(rt.handle(), request, tx.clone());
        }
        while let Ok(completion) = rx.try_recv() {
            app.apply_completion(completion);
        }
    }
    Ok(())
}

fn init_tracing(settings: &Settings) {
    // Without a log file, stay silent rather than drawing over the TUI.
    let Some(path) = settings.log_file() else {
        return;
    };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(env_filter)
                .init();
            tracing::info!(path = %path.display(), "Logging initialized");
        }
        Err(err) => eprintln!("gisttrack: cannot open log file {}: {err}", path.display()),
    }
}
