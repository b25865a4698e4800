//! Tic-tac-toe game engine.
//!
//! A single owned [`GameEngine`] holds the board, the player to move, the
//! game status and the move log. Moves go through
//! [`GameEngine::apply_move`], which validates, places the mark and detects
//! wins and draws. When a game ends, the returned [`MoveResult`] carries a
//! [`GameSummary`] for whatever collaborator records finished games.
//!
//! ```
//! use xo_engine::{GameEngine, GameStatus, Player, Winner};
//!
//! let mut engine = GameEngine::new();
//! for position in [0, 1, 4, 2] {
//!     assert!(engine.apply_move(position).is_accepted());
//! }
//!
//! let result = engine.apply_move(8);
//! assert_eq!(result.status(), &GameStatus::Won(Player::X));
//! let summary = result.summary().expect("winning move produces a summary");
//! assert_eq!(summary.winner(), Winner::X);
//! assert_eq!(summary.moves().len(), 5);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod engine;
mod invariants;
mod position;
mod rules;
mod summary;
mod types;

pub use action::{MoveError, MoveRecord};
pub use engine::{GameEngine, GameStatus, MoveResult};
pub use invariants::{
    AlternatingTurnInvariant, EngineInvariants, HistoryConsistentInvariant, Invariant,
    InvariantSet, InvariantViolation, TerminalStatusInvariant,
};
pub use position::{Position, PositionOutOfRange};
pub use rules::{LINES, check_winner, is_draw, is_full};
pub use summary::{GameSummary, Winner};
pub use types::{Board, InvalidSquare, Player, Square};
