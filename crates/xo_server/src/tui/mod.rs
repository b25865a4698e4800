//! Terminal client for hot-seat play.

mod app;
mod input;
mod ui;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};
use xo_server::{GameRecorder, spawn_record};

use app::App;

/// How long to wait on unfinished recordings when the user quits.
const RECORD_GRACE: Duration = Duration::from_secs(5);

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Runs the terminal client, sending finished games to `recorder`.
pub async fn run_tui(recorder: Arc<dyn GameRecorder>) -> Result<()> {
    // Log to a file so tracing output does not corrupt the screen.
    let log_file = std::fs::File::create("xo_game_tui.log")?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();

    info!("Starting terminal client");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let res = run_app(&mut terminal, recorder).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    res
}

#[instrument(skip_all)]
async fn run_app(terminal: &mut Term, recorder: Arc<dyn GameRecorder>) -> Result<()> {
    let mut app = App::new();
    let mut pending: Vec<JoinHandle<()>> = Vec::new();

    while !app.should_quit() {
        terminal.draw(|f| ui::draw(f, &app))?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && let Some(summary) = app.handle_key(key.code)
        {
            pending.push(spawn_record(Arc::clone(&recorder), summary));
        }

        pending.retain(|handle| !handle.is_finished());
        tokio::task::yield_now().await;
    }

    for handle in pending {
        if tokio::time::timeout(RECORD_GRACE, handle).await.is_err() {
            warn!("Gave up waiting for a game result to be saved");
        }
    }

    Ok(())
}
