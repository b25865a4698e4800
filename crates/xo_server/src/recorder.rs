//! Recording finished games.
//!
//! The engine never performs I/O. Callers hand each [`GameSummary`] to a
//! [`GameRecorder`], usually through [`spawn_record`] so a slow or failing
//! store cannot hold up play.

use async_trait::async_trait;
use derive_more::{Display, Error};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};
use xo_engine::GameSummary;

use crate::db::{DbError, GameRepository};

/// Failure to record a finished game.
#[derive(Debug, Clone, Display, Error)]
#[display("Record error: {} at {}:{}", message, file, line)]
pub struct RecordError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl RecordError {
    /// Creates a new record error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<DbError> for RecordError {
    #[track_caller]
    fn from(err: DbError) -> Self {
        Self::new(err.to_string())
    }
}

impl From<reqwest::Error> for RecordError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        Self::new(format!("HTTP error: {}", err))
    }
}

impl From<tokio::task::JoinError> for RecordError {
    #[track_caller]
    fn from(err: tokio::task::JoinError) -> Self {
        Self::new(format!("Record task failed: {}", err))
    }
}

/// Destination for finished-game summaries.
#[async_trait]
pub trait GameRecorder: Send + Sync {
    /// Persists one finished game.
    async fn record(&self, summary: &GameSummary) -> Result<(), RecordError>;
}

/// Records into the local SQLite store.
#[derive(Debug, Clone)]
pub struct RepositoryRecorder {
    repository: GameRepository,
}

impl RepositoryRecorder {
    /// Creates a recorder backed by `repository`.
    pub fn new(repository: GameRepository) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl GameRecorder for RepositoryRecorder {
    #[instrument(skip(self, summary), fields(winner = %summary.winner()))]
    async fn record(&self, summary: &GameSummary) -> Result<(), RecordError> {
        let repository = self.repository.clone();
        let summary = summary.clone();
        let stored = tokio::task::spawn_blocking(move || repository.record_game(&summary)).await??;
        debug!(game_id = stored.id(), "Recorded to local store");
        Ok(())
    }
}

/// Records by posting to a running game server's `/api/games`.
#[derive(Debug, Clone)]
pub struct HttpRecorder {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRecorder {
    /// Creates a recorder for the server at `base_url` (e.g. `http://localhost:8080`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// URL the summaries are posted to.
    pub fn endpoint(&self) -> String {
        format!("{}/api/games", self.base_url)
    }
}

#[async_trait]
impl GameRecorder for HttpRecorder {
    #[instrument(skip(self, summary), fields(url = %self.endpoint(), winner = %summary.winner()))]
    async fn record(&self, summary: &GameSummary) -> Result<(), RecordError> {
        let response = self
            .client
            .post(self.endpoint())
            .json(summary)
            .send()
            .await?
            .error_for_status()?;
        debug!(status = %response.status(), "Recorded to game server");
        Ok(())
    }
}

/// Keeps summaries in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecorder {
    records: Arc<Mutex<Vec<GameSummary>>>,
}

impl MemoryRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn records(&self) -> Vec<GameSummary> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl GameRecorder for MemoryRecorder {
    async fn record(&self, summary: &GameSummary) -> Result<(), RecordError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| RecordError::new("Memory recorder lock poisoned"))?;
        records.push(summary.clone());
        Ok(())
    }
}

/// Records `summary` on a background task.
///
/// Returns immediately. Failures are logged and dropped; the caller's game
/// state is already final by the time this runs.
#[instrument(skip(recorder, summary), fields(winner = %summary.winner()))]
pub fn spawn_record(recorder: Arc<dyn GameRecorder>, summary: GameSummary) -> JoinHandle<()> {
    tokio::spawn(async move {
        match recorder.record(&summary).await {
            Ok(()) => info!(winner = %summary.winner(), "Game result saved"),
            Err(e) => warn!(error = %e, "Failed to save game result"),
        }
    })
}
