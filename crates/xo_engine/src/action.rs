//! Move records and move errors.
//!
//! Accepted moves are logged as [`MoveRecord`]s; rejected ones are reported
//! as a [`MoveError`] and leave the engine untouched.

use super::{Player, Position};
use serde::{Deserialize, Serialize};

/// A recorded move: who played where, and when.
///
/// Serializes as `{ "player": "X", "position": 4, "timestamp": 1700000000000 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRecord {
    /// The player making the move.
    pub player: Player,
    /// The position where the player placed their mark.
    pub position: Position,
    /// Wall-clock time of the move, milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl MoveRecord {
    /// Creates a new move record.
    pub fn new(player: Player, position: Position, timestamp: i64) -> Self {
        Self {
            player,
            position,
            timestamp,
        }
    }

    /// Returns the player making this move.
    pub fn player(&self) -> Player {
        self.player
    }

    /// Returns the position of this move.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Returns the move timestamp in milliseconds.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

impl std::fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.player, self.position.label())
    }
}

/// Why a move was rejected.
///
/// All variants are recoverable; the engine state is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The position is outside 0-8.
    #[display("Position {} is out of bounds (must be 0-8)", _0)]
    InvalidPosition(usize),

    /// The square at the position is already occupied.
    #[display("Square {} is already occupied", _0)]
    CellOccupied(Position),

    /// The game is already over.
    #[display("Game is already over")]
    GameOver,
}

impl std::error::Error for MoveError {}
