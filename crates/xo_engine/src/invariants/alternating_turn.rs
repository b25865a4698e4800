//! Alternating turn invariant: players alternate X, O, X, O, ...

use super::Invariant;
use crate::{GameEngine, Player};

/// Invariant: Players alternate turns.
///
/// Move history must show the X, O, X, O, ... pattern, starting with X.
/// While the game is in progress the player to move is X after an even
/// number of moves and O after an odd number. Once the game is over the
/// last mover stays current.
pub struct AlternatingTurnInvariant;

fn expected_mover(move_index: usize) -> Player {
    if move_index % 2 == 0 { Player::X } else { Player::O }
}

impl Invariant<GameEngine> for AlternatingTurnInvariant {
    fn holds(engine: &GameEngine) -> bool {
        let log = engine.move_log();

        let alternates = log
            .iter()
            .enumerate()
            .all(|(i, record)| record.player == expected_mover(i));
        if !alternates {
            return false;
        }

        if engine.status().is_terminal() {
            log.last()
                .is_some_and(|last| last.player == engine.current_player())
        } else {
            engine.current_player() == expected_mover(log.len())
        }
    }

    fn description() -> &'static str {
        "Players alternate turns (X, O, X, O, ...)"
    }
}
