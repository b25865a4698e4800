//! Terminal client state: one owned engine plus cursor and feedback.

use crossterm::event::KeyCode;
use tracing::{debug, info, instrument};
use xo_engine::{GameEngine, GameStatus, GameSummary, Position};

use super::input::{digit_position, move_cursor};

/// Hot-seat game state for the terminal client.
#[derive(Debug)]
pub struct App {
    engine: GameEngine,
    cursor: Position,
    message: Option<String>,
    should_quit: bool,
}

impl App {
    /// Creates a new app with a fresh game.
    pub fn new() -> Self {
        Self {
            engine: GameEngine::new(),
            cursor: Position::Center,
            message: None,
            should_quit: false,
        }
    }

    /// The game being played.
    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    /// Square under the cursor.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Feedback from the last rejected move, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Whether the user asked to quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Handles one key press.
    ///
    /// Returns the finished-game summary when this key ended the game.
    #[instrument(skip(self))]
    pub fn handle_key(&mut self, key: KeyCode) -> Option<GameSummary> {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => {
                info!("User quit");
                self.should_quit = true;
                None
            }
            KeyCode::Char('r') => {
                self.engine.reset();
                self.cursor = Position::Center;
                self.message = None;
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.place(self.cursor),
            KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down => {
                self.cursor = move_cursor(self.cursor, key);
                None
            }
            other => match digit_position(other) {
                Some(pos) => {
                    self.cursor = pos;
                    self.place(pos)
                }
                None => None,
            },
        }
    }

    fn place(&mut self, pos: Position) -> Option<GameSummary> {
        let result = self.engine.apply_move(pos.to_index());
        match result.error() {
            Some(err) => {
                debug!(error = %err, "Move rejected");
                self.message = Some(err.to_string());
            }
            None => self.message = None,
        }
        result.into_summary()
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Status text rendered from the engine's public state alone.
pub fn status_line(engine: &GameEngine) -> String {
    match engine.status() {
        GameStatus::InProgress => format!("Current player: {}", engine.current_player()),
        GameStatus::Won(player) => format!("Player {} wins!", player),
        GameStatus::Draw => "It's a draw!".to_string(),
    }
}
