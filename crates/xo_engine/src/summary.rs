//! Finished-game summaries handed to recorders.

use super::{Board, MoveRecord, Player};
use serde::{Deserialize, Serialize};

/// Outcome of a finished game as stored and reported.
///
/// Serializes as `"X"`, `"O"` or `"draw"`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
pub enum Winner {
    /// Player X won.
    X,
    /// Player O won.
    O,
    /// Nobody won.
    #[serde(rename = "draw")]
    #[strum(serialize = "draw")]
    Draw,
}

impl Winner {
    /// Returns the stored string form (`"X"`, `"O"` or `"draw"`).
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl From<Player> for Winner {
    fn from(player: Player) -> Self {
        match player {
            Player::X => Winner::X,
            Player::O => Winner::O,
        }
    }
}

/// Record of a completed game.
///
/// Produced exactly once per terminal transition. The JSON shape is the
/// contract shared with the store and the REST API:
///
/// ```json
/// { "winner": "X", "moves": [...], "finalBoard": ["X", "", ...], "duration": 5230 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    winner: Winner,
    moves: Vec<MoveRecord>,
    final_board: Board,
    /// Milliseconds from game start to the final move.
    #[serde(default)]
    duration: u64,
}

impl GameSummary {
    /// Creates a summary from its parts.
    pub fn new(winner: Winner, moves: Vec<MoveRecord>, final_board: Board, duration: u64) -> Self {
        Self {
            winner,
            moves,
            final_board,
            duration,
        }
    }

    /// Returns the outcome.
    pub fn winner(&self) -> Winner {
        self.winner
    }

    /// Returns the moves in play order.
    pub fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    /// Returns the board as it stood after the last move.
    pub fn final_board(&self) -> &Board {
        &self.final_board
    }

    /// Returns the game duration in milliseconds.
    pub fn duration(&self) -> u64 {
        self.duration
    }
}
