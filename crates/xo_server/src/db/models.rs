//! Database models and domain types.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use serde::Serialize;
use tracing::instrument;
use xo_engine::{Board, GameSummary, MoveRecord, Winner};

use crate::db::{DbError, schema};

/// Finished game row as stored. JSON columns are still encoded.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = schema::games)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct GameRow {
    id: i32,
    winner: String,
    moves: String,
    final_board: String,
    duration: i64,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

/// Insertable row for recording a finished game.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::games)]
pub(crate) struct NewGameRow {
    winner: String,
    moves: String,
    final_board: String,
    duration: i64,
}

impl NewGameRow {
    /// Encodes a summary into column values.
    #[instrument(skip(summary), fields(winner = %summary.winner()))]
    pub(crate) fn from_summary(summary: &GameSummary) -> Result<Self, DbError> {
        let duration = i64::try_from(summary.duration())
            .map_err(|_| DbError::new(format!("Duration {} ms does not fit", summary.duration())))?;

        Ok(Self::new(
            summary.winner().as_str().to_string(),
            serde_json::to_string(summary.moves())?,
            serde_json::to_string(summary.final_board())?,
            duration,
        ))
    }
}

/// A finished game read back from the store.
///
/// Serializes with the same camelCase keys as the summary it was recorded
/// from, plus `id`, `createdAt` and `updatedAt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct StoredGame {
    id: i32,
    winner: Winner,
    moves: Vec<MoveRecord>,
    final_board: Board,
    duration: u64,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl StoredGame {
    /// Rebuilds the engine summary this game was recorded from.
    pub fn to_summary(&self) -> GameSummary {
        GameSummary::new(
            self.winner,
            self.moves.clone(),
            self.final_board.clone(),
            self.duration,
        )
    }
}

impl TryFrom<GameRow> for StoredGame {
    type Error = DbError;

    #[track_caller]
    fn try_from(row: GameRow) -> Result<Self, Self::Error> {
        let winner = row
            .winner
            .parse::<Winner>()
            .map_err(|_| DbError::new(format!("Invalid winner: '{}'", row.winner)))?;

        Ok(Self {
            id: row.id,
            winner,
            moves: serde_json::from_str(&row.moves)?,
            final_board: serde_json::from_str(&row.final_board)?,
            duration: u64::try_from(row.duration).unwrap_or(0),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Aggregate statistics over all recorded games.
///
/// Rates are whole percentages, rounded to nearest, and 0 when no games
/// have been played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    total_games: i64,
    x_wins: i64,
    o_wins: i64,
    draws: i64,
    x_win_rate: u32,
    o_win_rate: u32,
    draw_rate: u32,
}

impl GameStats {
    /// Builds statistics from raw counts.
    #[instrument]
    pub fn from_counts(total_games: i64, x_wins: i64, o_wins: i64, draws: i64) -> Self {
        Self {
            total_games,
            x_wins,
            o_wins,
            draws,
            x_win_rate: rate(x_wins, total_games),
            o_win_rate: rate(o_wins, total_games),
            draw_rate: rate(draws, total_games),
        }
    }
}

fn rate(count: i64, total: i64) -> u32 {
    if total <= 0 {
        0
    } else {
        ((count as f64 / total as f64) * 100.0).round() as u32
    }
}
