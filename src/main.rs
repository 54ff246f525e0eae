//! Tab strip TUI
//!
//! Drives the tab strip engine from a terminal, with a simulated page engine
//! behind the tabs and a few demo workspaces to switch between.

use std::fs::File;
use std::io;
use std::sync::Mutex;

use color_eyre::Result;
use eyre::WrapErr;
use tabstrip::app::{App, AppConfig};
use tabstrip::event::EventHandler;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Set up error handling
    color_eyre::install()?;

    let config = AppConfig::load()?;
    setup_logging(&config)?;

    setup_terminal()?;
    let result = run(config).await;
    restore_terminal()?;

    result
}

async fn run(config: AppConfig) -> Result<()> {
    let mut events = EventHandler::with_tick_rate(config.tick_rate());
    let mut app = App::new(config).await?;
    app.run_with_crossterm(&mut events).await
}

/// Log to a file; the terminal belongs to the UI.
fn setup_logging(config: &AppConfig) -> Result<()> {
    let file = File::create(&config.log_file)
        .wrap_err_with(|| format!("failed to create log file {}", config.log_file.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tabstrip=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

fn setup_terminal() -> Result<()> {
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(
        io::stdout(),
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableMouseCapture
    )?;

    Ok(())
}

fn restore_terminal() -> Result<()> {
    crossterm::execute!(
        io::stdout(),
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::event::DisableMouseCapture
    )?;
    crossterm::terminal::disable_raw_mode()?;

    Ok(())
}
