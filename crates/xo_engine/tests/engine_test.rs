//! Tests for the game engine state machine.

use xo_engine::{
    Board, GameEngine, GameStatus, LINES, MoveError, Player, Position, Square, Winner,
};

/// Plays `positions` in order, asserting each one is accepted.
fn play(engine: &mut GameEngine, positions: &[usize]) {
    for &pos in positions {
        let result = engine.apply_move(pos);
        assert!(result.is_accepted(), "move {pos} rejected: {:?}", result.error());
    }
}

/// Two squares off `line` for O. O only plays twice, so it never completes a line.
fn filler_for(line: [Position; 3]) -> Vec<usize> {
    let taken: Vec<usize> = line.iter().map(|p| p.to_index()).collect();
    (0..9).filter(|i| !taken.contains(i)).take(2).collect()
}

#[test]
fn test_current_player_parity() {
    let mut engine = GameEngine::new();
    for (k, pos) in [4, 0, 8, 2, 1, 7].into_iter().enumerate() {
        let move_number = k + 1;
        let expected = if move_number % 2 == 1 { Player::X } else { Player::O };
        assert_eq!(engine.current_player(), expected, "before move {move_number}");
        assert!(engine.apply_move(pos).is_accepted());
    }
}

#[test]
fn test_every_line_wins_exactly_on_completing_move() {
    for line in LINES {
        let mut engine = GameEngine::new();
        let x_moves: Vec<usize> = line.iter().map(|p| p.to_index()).collect();
        let o_moves = filler_for(line);

        // X, O, X, O, then X completes the triple on move 5.
        let sequence = [x_moves[0], o_moves[0], x_moves[1], o_moves[1], x_moves[2]];
        for (k, &pos) in sequence.iter().enumerate() {
            let result = engine.apply_move(pos);
            assert!(result.is_accepted());
            if k < 4 {
                assert_eq!(result.status(), &GameStatus::InProgress, "line {line:?} move {k}");
                assert!(result.summary().is_none());
            } else {
                assert_eq!(result.status(), &GameStatus::Won(Player::X), "line {line:?}");
                assert_eq!(result.summary().map(|s| s.winner()), Some(Winner::X));
            }
        }
    }
}

#[test]
fn test_o_can_win() {
    let mut engine = GameEngine::new();
    play(&mut engine, &[0, 2, 1, 4, 8]);
    let result = engine.apply_move(6);
    assert_eq!(result.status(), &GameStatus::Won(Player::O));
    assert_eq!(result.summary().map(|s| s.winner()), Some(Winner::O));
}

#[test]
fn test_diagonal_scenario_summary() {
    let mut engine = GameEngine::new();
    play(&mut engine, &[0, 1, 4, 2]);
    let result = engine.apply_move(8);

    assert_eq!(result.status(), &GameStatus::Won(Player::X));
    let summary = result.into_summary().expect("summary on winning move");
    assert_eq!(summary.winner(), Winner::X);
    assert_eq!(summary.moves().len(), 5);

    let symbols: Vec<&str> = summary
        .final_board()
        .squares()
        .iter()
        .map(|s| s.symbol())
        .collect();
    assert_eq!(symbols, ["X", "O", "", "O", "X", "", "", "", "X"]);

    let players: Vec<Player> = summary.moves().iter().map(|m| m.player).collect();
    assert_eq!(players, [Player::X, Player::O, Player::X, Player::O, Player::X]);
}

#[test]
fn test_full_board_draw_scenario() {
    // Final board X,O,X / X,O,O / O,X,X reached with no line at any prefix.
    let mut engine = GameEngine::new();
    let sequence = [0, 1, 2, 4, 3, 5, 7, 6, 8];
    for (k, &pos) in sequence.iter().enumerate() {
        let result = engine.apply_move(pos);
        assert!(result.is_accepted());
        if k < 8 {
            assert_eq!(result.status(), &GameStatus::InProgress);
        } else {
            assert_eq!(result.status(), &GameStatus::Draw);
            let summary = result.summary().expect("summary on final move");
            assert_eq!(summary.winner(), Winner::Draw);
            assert_eq!(summary.moves().len(), 9);
        }
    }

    let symbols: Vec<&str> = engine.board().squares().iter().map(|s| s.symbol()).collect();
    assert_eq!(symbols, ["X", "O", "X", "X", "O", "O", "O", "X", "X"]);
}

#[test]
fn test_win_on_last_square_beats_draw() {
    // X fills the ninth square and completes the middle column at the same time.
    let mut engine = GameEngine::new();
    play(&mut engine, &[0, 2, 1, 3, 4, 6, 5, 8]);
    let result = engine.apply_move(7);
    assert!(engine.board().is_full());
    assert_eq!(result.status(), &GameStatus::Won(Player::X));
}

#[test]
fn test_moves_after_game_over_change_nothing() {
    let mut engine = GameEngine::new();
    play(&mut engine, &[0, 1, 4, 2, 8]);

    let board = engine.board().clone();
    let log = engine.move_log().to_vec();
    let status = *engine.status();

    for pos in [3, 0, 99] {
        let result = engine.apply_move(pos);
        assert_eq!(result.error(), Some(MoveError::GameOver));
        assert!(result.summary().is_none());
        assert_eq!(result.status(), &status);
    }

    assert_eq!(engine.board(), &board);
    assert_eq!(engine.move_log(), log.as_slice());
    assert_eq!(engine.status(), &status);
}

#[test]
fn test_occupied_cell_rejected_for_either_player() {
    let mut engine = GameEngine::new();
    engine.apply_move(4);

    // O tries X's square.
    let before = engine.board().clone();
    let result = engine.apply_move(4);
    assert_eq!(result.error(), Some(MoveError::CellOccupied(Position::Center)));
    assert_eq!(engine.current_player(), Player::O);
    assert_eq!(engine.board(), &before);

    engine.apply_move(0);

    // X tries O's square.
    let result = engine.apply_move(0);
    assert_eq!(result.error(), Some(MoveError::CellOccupied(Position::TopLeft)));
    assert_eq!(engine.current_player(), Player::X);
    assert_eq!(engine.move_log().len(), 2);
}

#[test]
fn test_duplicate_move_logged_once() {
    let mut engine = GameEngine::new();
    assert!(engine.apply_move(5).is_accepted());
    assert!(!engine.apply_move(5).is_accepted());
    assert_eq!(engine.move_log().len(), 1);
}

#[test]
fn test_invalid_position_leaves_state() {
    let mut engine = GameEngine::new();
    engine.apply_move(0);
    let result = engine.apply_move(9);
    assert_eq!(result.error(), Some(MoveError::InvalidPosition(9)));
    assert_eq!(engine.move_log().len(), 1);
    assert_eq!(engine.current_player(), Player::O);
}

#[test]
fn test_reset_restores_initial_state() {
    let mut engine = GameEngine::new();
    play(&mut engine, &[0, 1, 4, 2, 8]);
    assert!(engine.status().is_terminal());

    engine.reset();
    assert_eq!(engine.board(), &Board::new());
    assert_eq!(engine.current_player(), Player::X);
    assert_eq!(engine.status(), &GameStatus::InProgress);
    assert!(engine.move_log().is_empty());

    // The reused engine plays a fresh game.
    let result = engine.apply_move(0);
    assert!(result.is_accepted());
    assert_eq!(engine.board().get(Position::TopLeft), Square::Occupied(Player::X));
}

#[test]
fn test_reset_mid_game() {
    let mut engine = GameEngine::new();
    play(&mut engine, &[4, 0]);
    engine.reset();
    assert_eq!(engine.current_player(), Player::X);
    assert!(engine.move_log().is_empty());
    assert_eq!(engine.board().occupied_count(), 0);
}

#[test]
fn test_move_log_matches_board() {
    let mut engine = GameEngine::new();
    play(&mut engine, &[8, 6, 2]);
    engine.apply_move(2);
    engine.apply_move(11);
    assert_eq!(engine.move_log().len(), engine.board().occupied_count());

    let timestamps: Vec<i64> = engine.move_log().iter().map(|m| m.timestamp).collect();
    assert!(timestamps.windows(2).all(|w| w[0] <= w[1]));
}
