//! Portal TUI entrypoint: terminal setup, the event loop, and teardown.

use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use portal_tui::app::{App, AppState};
use portal_tui::config::Config;
use portal_tui::ui::{
    input::{handle_key, handle_mouse},
    render::render,
};

/// Event poll interval for the UI loop.
const POLL_INTERVAL_MS: u64 = 100;

/// Log file name, written to the cache directory.
const LOG_FILE: &str = "portal.log";

fn init_tracing(cache_dir: &Path) -> tracing_appender::non_blocking::WorkerGuard {
    let appender = tracing_appender::rolling::never(cache_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let config = match Config::load() {
        Ok(c) => c,
        Err(_) => Config::default(),
    };
    let cache_dir = config.cache_dir()?;
    std::fs::create_dir_all(&cache_dir)?;

    // The guard must stay alive for the duration of the program so
    // buffered log lines are flushed on exit.
    let _guard = init_tracing(&cache_dir);
    info!("Portal TUI starting");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = match App::with_config(config) {
        Ok(app) => app,
        Err(e) => {
            restore_terminal(&mut terminal)?;
            return Err(e);
        }
    };

    let result = run_app(&mut terminal, &mut app).await;

    restore_terminal(&mut terminal)?;

    if let Err(ref e) = result {
        warn!(error = %e, "Event loop exited with error");
        eprintln!("Error: {}", e);
    }
    info!("Portal TUI shutting down");

    result
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        if event::poll(Duration::from_millis(POLL_INTERVAL_MS))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        app.state = AppState::Quitting;
                    } else {
                        handle_key(app, key)?;
                    }
                }
                Event::Mouse(mouse) => {
                    handle_mouse(app, mouse);
                }
                _ => {}
            }
        }

        // Pick up completed background login attempts
        app.check_login_results();

        if app.state == AppState::Quitting {
            return Ok(());
        }
    }
}
