use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::io;
use std::path::Path;

mod app;
mod cli;
mod clipboard;
mod config;
mod controller;
mod dates;
mod error;
mod fs;
mod input;
mod models;
mod settings;
mod state;
#[cfg(test)]
mod test_support;
mod ui;

use app::App;
use config::Config;

/// Written to a data folder that has no config yet.
const DEFAULT_CONFIG: &str = include_str!("../data/config.yaml");

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let settings_path = settings::settings_path();
    let (settings, first_run, settings_warning) = match &settings_path {
        Some(path) => settings::check_first_run(path),
        None => (settings::Settings::default(), false, None),
    };

    let data_folder = settings::resolve_data_folder(cli.data_folder.as_deref(), &settings);
    std::fs::create_dir_all(&data_folder)
        .with_context(|| format!("creating data folder {}", data_folder.display()))?;

    init_logging(&data_folder, cli.verbose);
    log::info!("tuido starting, data folder {}", data_folder.display());
    if let Some(warning) = settings_warning {
        log::warn!("{}", warning);
    }

    let config_path = data_folder.join(fs::CONFIG_FILE);
    if !config_path.exists() {
        log::info!("Writing default config to {}", config_path.display());
        std::fs::write(&config_path, DEFAULT_CONFIG)
            .with_context(|| format!("writing {}", config_path.display()))?;
    }
    let config = Config::load(&config_path)?;

    let mut app = App::new(config, settings, &data_folder)?;

    if let Some(path) = state::state_path() {
        match state::load_state(&path) {
            Ok(saved) => state::apply_state(&mut app, saved),
            Err(e) => log::warn!("Ignoring saved UI state {}: {:#}", path.display(), e),
        }
    }
    if first_run {
        let settings_display = settings_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        app.dialog = Some(ui::dialogs::DialogType::welcome(
            &data_folder.display().to_string(),
            &settings_display,
        ));
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.shutdown();
    if let Some(path) = state::state_path() {
        if let Err(e) = state::save_state(&path, &state::extract_state(&app)) {
            log::warn!("Saving UI state failed: {:#}", e);
        }
    }
    log::info!("tuido stopped");

    if let Err(err) = res {
        log::error!("{:?}", err);
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// File logger in the data folder, like the rest of the app's files.
fn init_logging(data_folder: &Path, verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create(data_folder.join(fs::LOG_FILE)) {
        let _ = WriteLogger::init(level, log_config, log_file);
    }
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if !app.handle_key(key) {
                    return Ok(());
                }
            }
        }

        app.tick();
    }
}
