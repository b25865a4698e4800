//! The game state machine.

use super::rules::{check_winner, is_full};
use super::{Board, GameSummary, MoveError, MoveRecord, Player, Position, Square, Winner};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Current status of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress,
    /// Game ended in a win.
    Won(Player),
    /// Game ended in a draw.
    Draw,
}

impl GameStatus {
    /// True for `Won` and `Draw`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    /// The recorded outcome, or `None` while the game is in progress.
    pub fn winner(&self) -> Option<Winner> {
        match self {
            GameStatus::InProgress => None,
            GameStatus::Won(player) => Some(Winner::from(*player)),
            GameStatus::Draw => Some(Winner::Draw),
        }
    }
}

/// Result of [`GameEngine::apply_move`].
///
/// A rejected move carries its [`MoveError`]; the move that ends the game
/// carries the [`GameSummary`]. Every other accepted move carries neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    status: GameStatus,
    error: Option<MoveError>,
    summary: Option<GameSummary>,
}

impl MoveResult {
    fn accepted(status: GameStatus, summary: Option<GameSummary>) -> Self {
        Self {
            status,
            error: None,
            summary,
        }
    }

    fn rejected(status: GameStatus, error: MoveError) -> Self {
        Self {
            status,
            error: Some(error),
            summary: None,
        }
    }

    /// Whether the mark was placed.
    pub fn is_accepted(&self) -> bool {
        self.error.is_none()
    }

    /// Status after this call.
    pub fn status(&self) -> &GameStatus {
        &self.status
    }

    /// The rejection reason, if the move was rejected.
    pub fn error(&self) -> Option<MoveError> {
        self.error
    }

    /// The finished-game summary, present only on the call that ended the game.
    pub fn summary(&self) -> Option<&GameSummary> {
        self.summary.as_ref()
    }

    /// Takes the finished-game summary out of the result.
    pub fn into_summary(self) -> Option<GameSummary> {
        self.summary
    }

    /// Converts into a `Result` for callers that want to propagate rejections.
    pub fn into_result(self) -> Result<Option<GameSummary>, MoveError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.summary),
        }
    }
}

/// Tic-tac-toe game engine.
///
/// One owned instance per game. Not internally synchronized: callers that
/// serve several games keep one engine per game.
#[derive(Debug, Clone)]
pub struct GameEngine {
    pub(crate) board: Board,
    pub(crate) current_player: Player,
    pub(crate) status: GameStatus,
    pub(crate) move_log: Vec<MoveRecord>,
    started_at: Instant,
    /// Fixed when the game ends so every summary reports the same duration.
    final_duration: Option<u64>,
}

impl GameEngine {
    /// Creates a new game: empty board, X to move.
    #[instrument]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_player: Player::X,
            status: GameStatus::InProgress,
            move_log: Vec::new(),
            started_at: Instant::now(),
            final_duration: None,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player to move (the winner's mark once the game is won).
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Returns the game status.
    pub fn status(&self) -> &GameStatus {
        &self.status
    }

    /// Returns the accepted moves in play order.
    pub fn move_log(&self) -> &[MoveRecord] {
        &self.move_log
    }

    /// Positions still open for the player to move.
    pub fn valid_moves(&self) -> Vec<Position> {
        if self.status.is_terminal() {
            return Vec::new();
        }
        Position::valid_moves(&self.board)
    }

    /// Places the current player's mark at `position` (0-8).
    ///
    /// Rejections are checked in order: game over, position out of range,
    /// square occupied. A rejected move leaves the engine unchanged.
    #[instrument(skip(self), fields(player = ?self.current_player, moves = self.move_log.len()))]
    pub fn apply_move(&mut self, position: usize) -> MoveResult {
        match self.place(position) {
            Ok(summary) => MoveResult::accepted(self.status, summary),
            Err(err) => {
                warn!(error = %err, "Move rejected");
                MoveResult::rejected(self.status, err)
            }
        }
    }

    fn place(&mut self, index: usize) -> Result<Option<GameSummary>, MoveError> {
        if self.status.is_terminal() {
            return Err(MoveError::GameOver);
        }

        let position = Position::from_index(index).ok_or(MoveError::InvalidPosition(index))?;

        if !self.board.is_empty(position) {
            return Err(MoveError::CellOccupied(position));
        }

        let player = self.current_player;
        self.board.set(position, Square::Occupied(player));
        self.move_log.push(MoveRecord::new(
            player,
            position,
            chrono::Utc::now().timestamp_millis(),
        ));
        debug!(?position, ?player, "Mark placed");

        if let Some(winner) = check_winner(&self.board) {
            debug_assert_eq!(winner, player, "only the mover can complete a line");
            self.status = GameStatus::Won(winner);
        } else if is_full(&self.board) {
            self.status = GameStatus::Draw;
        } else {
            self.current_player = player.opponent();
        }

        if self.status.is_terminal() {
            let elapsed = self.started_at.elapsed().as_millis();
            self.final_duration = Some(u64::try_from(elapsed).unwrap_or(u64::MAX));
        }

        #[cfg(debug_assertions)]
        super::invariants::assert_invariants(self);

        let summary = self.summary();
        if let Some(summary) = &summary {
            info!(
                winner = %summary.winner(),
                moves = summary.moves().len(),
                duration_ms = summary.duration(),
                "Game finished"
            );
        }
        Ok(summary)
    }

    /// Builds the finished-game summary, or `None` while the game is in progress.
    ///
    /// Repeated calls on a finished game return the summary `apply_move` emitted.
    pub fn summary(&self) -> Option<GameSummary> {
        let winner = self.status.winner()?;
        Some(GameSummary::new(
            winner,
            self.move_log.clone(),
            self.board.clone(),
            self.final_duration.unwrap_or_default(),
        ))
    }

    /// Starts a new game on this engine.
    #[instrument(skip(self), fields(moves = self.move_log.len(), status = ?self.status))]
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.current_player = Player::X;
        self.status = GameStatus::InProgress;
        self.move_log.clear();
        self.started_at = Instant::now();
        self.final_duration = None;
        debug!("Engine reset");
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}
