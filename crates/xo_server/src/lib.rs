//! Game store, REST API and recorders for finished tic-tac-toe games.
//!
//! # Architecture
//!
//! - **Engine** (`xo_engine`): pure game logic, no I/O
//! - **Recorder**: where finished-game summaries go (SQLite, HTTP, memory)
//! - **Store**: SQLite persistence and aggregate statistics
//! - **API**: axum routes over the store
//!
//! ```no_run
//! use xo_server::{AppState, GameRepository, ServerConfig, router};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServerConfig::load(None)?;
//! let repository = GameRepository::new(config.database_url().clone())?;
//! repository.run_migrations()?;
//!
//! let app = router(AppState::new(repository, *config.recent_limit()));
//! let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod api;
mod config;
mod db;
mod recorder;

pub use api::{ApiError, AppState, parse_body, parse_submission, router};
pub use config::{ConfigError, ServerConfig};
pub use db::{DbError, GameRepository, GameStats, StoredGame};
pub use recorder::{
    GameRecorder, HttpRecorder, MemoryRecorder, RecordError, RepositoryRecorder, spawn_record,
};
