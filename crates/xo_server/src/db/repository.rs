//! Database repository for finished games.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};
use xo_engine::{GameSummary, Winner};

use crate::db::models::{GameRow, NewGameRow};
use crate::db::{DbError, GameStats, StoredGame, schema};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database repository for recorded games.
///
/// Opens a short-lived SQLite connection per call, so a repository is cheap
/// to clone into request handlers and blocking tasks.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Creates a new repository for the database at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.trim().is_empty() {
            return Err(DbError::new("Database path is empty"));
        }
        info!(path = %db_path, "Creating GameRepository");
        Ok(Self { db_path })
    }

    /// Returns the database path.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))
    }

    /// Applies any pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the connection or a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migrations failed: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Records a finished game.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the summary cannot be encoded or the insert fails.
    #[instrument(skip(self, summary), fields(winner = %summary.winner(), moves = summary.moves().len()))]
    pub fn record_game(&self, summary: &GameSummary) -> Result<StoredGame, DbError> {
        debug!("Recording game");
        let row = NewGameRow::from_summary(summary)?;
        let mut conn = self.connection()?;

        let stored = diesel::insert_into(schema::games::table)
            .values(&row)
            .returning(GameRow::as_returning())
            .get_result(&mut conn)?;
        let stored = StoredGame::try_from(stored)?;

        info!(game_id = stored.id(), winner = %stored.winner(), "Game recorded");
        Ok(stored)
    }

    /// Lists the most recent games, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails or a row cannot be decoded.
    #[instrument(skip(self))]
    pub fn list_recent(&self, limit: i64) -> Result<Vec<StoredGame>, DbError> {
        debug!(limit, "Listing recent games");
        let mut conn = self.connection()?;

        let rows = schema::games::table
            .order((schema::games::created_at.desc(), schema::games::id.desc()))
            .limit(limit)
            .select(GameRow::as_select())
            .load::<GameRow>(&mut conn)?;

        let games = rows
            .into_iter()
            .map(StoredGame::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        info!(count = games.len(), "Recent games loaded");
        Ok(games)
    }

    /// Computes win/draw counts and rates over all games.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a query fails.
    #[instrument(skip(self))]
    pub fn stats(&self) -> Result<GameStats, DbError> {
        debug!("Computing game stats");
        let mut conn = self.connection()?;

        let total: i64 = schema::games::table.count().get_result(&mut conn)?;
        let mut count_for = |winner: Winner| -> Result<i64, DbError> {
            Ok(schema::games::table
                .filter(schema::games::winner.eq(winner.as_str()))
                .count()
                .get_result(&mut conn)?)
        };
        let x_wins = count_for(Winner::X)?;
        let o_wins = count_for(Winner::O)?;
        let draws = count_for(Winner::Draw)?;

        let stats = GameStats::from_counts(total, x_wins, o_wins, draws);
        info!(
            total = %total,
            x_wins = %x_wins,
            o_wins = %o_wins,
            draws = %draws,
            "Game stats computed"
        );
        Ok(stats)
    }
}
