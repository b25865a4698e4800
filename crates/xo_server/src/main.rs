//! XO Game - unified CLI
//!
//! Serves the game history API, runs the terminal client, and prints
//! statistics from the local store.

#![warn(missing_docs)]

mod cli;
mod tui;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use xo_server::{
    AppState, GameRecorder, GameRepository, HttpRecorder, RepositoryRecorder, ServerConfig,
    router,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            db_path,
        } => {
            initialize_tracing();
            run_server(config, host, port, db_path).await
        }
        Command::Play { server_url, db_path } => run_play(server_url, db_path).await,
        Command::Stats { db_path } => {
            initialize_tracing();
            print_stats(db_path)
        }
        Command::History { db_path, limit } => {
            initialize_tracing();
            print_history(db_path, limit)
        }
    }
}

/// Logs to stderr so command output on stdout stays clean.
fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,xo_server=debug,xo_game=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Run the REST API server
#[instrument(skip_all)]
async fn run_server(
    config_path: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    db_path: Option<String>,
) -> Result<()> {
    let mut config = ServerConfig::load(config_path.as_deref())?;
    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }
    if let Some(db_path) = db_path {
        config = config.with_database_url(db_path);
    }

    let repository = GameRepository::new(config.database_url().clone())?;
    repository.run_migrations()?;
    info!(database = %config.database_url(), "Database ready");

    let app = router(AppState::new(repository, *config.recent_limit()));
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!(address = %config.bind_address(), "Server running");
    info!("Health check: http://{}/health", config.bind_address());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}

/// Run the terminal client
async fn run_play(server_url: Option<String>, db_path: String) -> Result<()> {
    let recorder: Arc<dyn GameRecorder> = match server_url {
        Some(url) => Arc::new(HttpRecorder::new(url)),
        None => {
            let repository = GameRepository::new(db_path)?;
            repository.run_migrations()?;
            Arc::new(RepositoryRecorder::new(repository))
        }
    };

    tui::run_tui(recorder).await
}

fn open_store(db_path: String) -> Result<GameRepository> {
    let repository = GameRepository::new(db_path)?;
    repository.run_migrations()?;
    Ok(repository)
}

#[instrument]
fn print_stats(db_path: String) -> Result<()> {
    let stats = open_store(db_path)?.stats()?;

    println!("Games played: {}", stats.total_games());
    println!("X wins:       {:>4} ({}%)", stats.x_wins(), stats.x_win_rate());
    println!("O wins:       {:>4} ({}%)", stats.o_wins(), stats.o_win_rate());
    println!("Draws:        {:>4} ({}%)", stats.draws(), stats.draw_rate());
    Ok(())
}

#[instrument]
fn print_history(db_path: String, limit: i64) -> Result<()> {
    let games = open_store(db_path)?.list_recent(limit)?;
    if games.is_empty() {
        println!("No games recorded yet.");
        return Ok(());
    }

    for game in games {
        let outcome = match game.winner() {
            xo_engine::Winner::Draw => "draw".to_string(),
            winner => format!("{} won", winner),
        };
        println!(
            "#{} {} - {}, {} moves, {:.1}s",
            game.id(),
            game.created_at().format("%Y-%m-%d %H:%M:%S"),
            outcome,
            game.moves().len(),
            *game.duration() as f64 / 1000.0
        );
        println!("{}\n", game.final_board().display());
    }
    Ok(())
}
