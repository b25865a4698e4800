//! Status consistency: the status matches what the board shows.

use super::Invariant;
use crate::rules::{check_winner, is_full};
use crate::{GameEngine, GameStatus};

/// Invariant: exactly the status the board implies.
///
/// `Won(p)` iff `p` has a line; `Draw` iff the board is full with no line;
/// `InProgress` otherwise.
pub struct TerminalStatusInvariant;

impl Invariant<GameEngine> for TerminalStatusInvariant {
    fn holds(engine: &GameEngine) -> bool {
        let board = engine.board();
        match (engine.status(), check_winner(board)) {
            (GameStatus::Won(player), Some(winner)) => *player == winner,
            (GameStatus::Draw, None) => is_full(board),
            (GameStatus::InProgress, None) => !is_full(board),
            _ => false,
        }
    }

    fn description() -> &'static str {
        "Status agrees with board (won iff a line, draw iff full without one)"
    }
}
