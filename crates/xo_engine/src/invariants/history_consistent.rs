//! History consistency: the move log explains the board exactly.

use super::Invariant;
use crate::{GameEngine, Square};
use std::collections::HashSet;

/// Invariant: the move log and the board agree.
///
/// The log has one entry per occupied square, no position appears twice,
/// and every logged position holds the mark of the player who played it.
pub struct HistoryConsistentInvariant;

impl Invariant<GameEngine> for HistoryConsistentInvariant {
    fn holds(engine: &GameEngine) -> bool {
        let log = engine.move_log();
        let board = engine.board();

        if log.len() != board.occupied_count() {
            return false;
        }

        let mut seen = HashSet::new();
        log.iter().all(|record| {
            seen.insert(record.position)
                && board.get(record.position) == Square::Occupied(record.player)
        })
    }

    fn description() -> &'static str {
        "Move log has one entry per occupied square, matching its mark"
    }
}
