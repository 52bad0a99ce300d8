//! Fixture-driven position and game tests
//!
//! Loads positions and move sequences from `tests/data/positions.json` and
//! verifies for each one:
//! - Board text round trip
//! - Legal moves (in row-major order)
//! - Win detection and the winning line
//! - Game status
//! - Turn bookkeeping after move/unmove sequences

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use xox_core::{Board, Coord, GameState, GameStatus, Player};

#[derive(Debug, Deserialize)]
struct TestData {
    version: String,
    positions: Vec<Position>,
    games: Vec<Game>,
}

#[derive(Debug, Deserialize)]
struct Position {
    description: String,
    board: String,
    to_move: Player,
    last_move: Option<Coord>,
    win: bool,
    winning_line: Option<[Coord; 3]>,
    legal_moves: Vec<Coord>,
    status: GameStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Step {
    Move(Coord),
    Unmove(Coord),
}

#[derive(Debug, Deserialize)]
struct Game {
    description: String,
    size: u8,
    steps: Vec<Step>,
    final_board: String,
    turns_taken: u16,
    to_move: Player,
    win: bool,
    tie: bool,
}

fn load_test_data() -> TestData {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/positions.json");
    let file = File::open(&path).expect("Failed to open fixture file");
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).expect("Failed to parse JSON")
}

fn check_position(pos: &Position) -> Vec<String> {
    let mut errors: Vec<String> = Vec::new();

    let board: Board = match pos.board.parse() {
        Ok(board) => board,
        Err(e) => return vec![format!("board did not parse: {}", e)],
    };
    if board.to_text() != pos.board {
        errors.push(format!("Text mismatch: expected={}, got={}", pos.board, board.to_text()));
    }

    let game = match GameState::from_board(board, pos.to_move, pos.last_move) {
        Ok(game) => game,
        Err(e) => return vec![format!("position rejected: {}", e)],
    };

    if game.legal_moves() != pos.legal_moves {
        errors.push(format!(
            "Legal moves mismatch: expected={:?}, got={:?}",
            pos.legal_moves,
            game.legal_moves()
        ));
    }
    if game.is_win() != pos.win {
        errors.push(format!("Win mismatch: expected={}, got={}", pos.win, game.is_win()));
    }
    if game.winning_line() != pos.winning_line {
        errors.push(format!(
            "Winning line mismatch: expected={:?}, got={:?}",
            pos.winning_line,
            game.winning_line()
        ));
    }
    if game.status() != pos.status {
        errors.push(format!(
            "Status mismatch: expected={:?}, got={:?}",
            pos.status,
            game.status()
        ));
    }
    errors
}

fn check_game(expected: &Game) -> Vec<String> {
    let mut errors: Vec<String> = Vec::new();
    let mut game = GameState::new(expected.size).expect("fixture size is valid");

    for (i, step) in expected.steps.iter().enumerate() {
        let result = match step {
            Step::Move(coord) => game.make_move(*coord),
            Step::Unmove(coord) => game.unmake_move(*coord),
        };
        if let Err(e) = result {
            errors.push(format!("step {} ({:?}) failed: {}", i, step, e));
            return errors;
        }
        if game.turns_taken() as usize != game.board().occupied_count() {
            errors.push(format!(
                "step {}: turns_taken={} but {} tiles occupied",
                i,
                game.turns_taken(),
                game.board().occupied_count()
            ));
        }
    }

    if game.board().to_text() != expected.final_board {
        errors.push(format!(
            "Board mismatch: expected={}, got={}",
            expected.final_board,
            game.board().to_text()
        ));
    }
    if game.turns_taken() != expected.turns_taken {
        errors.push(format!(
            "Turns mismatch: expected={}, got={}",
            expected.turns_taken,
            game.turns_taken()
        ));
    }
    if game.current_player() != expected.to_move {
        errors.push(format!(
            "Player mismatch: expected={:?}, got={:?}",
            expected.to_move,
            game.current_player()
        ));
    }
    if game.is_win() != expected.win {
        errors.push(format!("Win mismatch: expected={}, got={}", expected.win, game.is_win()));
    }
    if game.is_tie() != expected.tie {
        errors.push(format!("Tie mismatch: expected={}, got={}", expected.tie, game.is_tie()));
    }
    errors
}

#[test]
fn test_fixture_positions() {
    let data = load_test_data();
    println!("Loaded {} positions (fixtures v{})", data.positions.len(), data.version);

    let mut failures: Vec<String> = Vec::new();
    for (i, pos) in data.positions.iter().enumerate() {
        let errors = check_position(pos);
        if !errors.is_empty() {
            failures.push(format!(
                "Position {} ({}): board={}\n  {}",
                i,
                pos.description,
                pos.board,
                errors.join("\n  ")
            ));
        }
    }

    for f in &failures {
        println!("\n{}", f);
    }
    assert!(failures.is_empty(), "{} fixture positions failed", failures.len());
}

#[test]
fn test_fixture_games() {
    let data = load_test_data();
    println!("Replaying {} games...", data.games.len());

    let mut failures: Vec<String> = Vec::new();
    for game in &data.games {
        let errors = check_game(game);
        if !errors.is_empty() {
            failures.push(format!("{}:\n  {}", game.description, errors.join("\n  ")));
        }
    }

    for f in &failures {
        println!("\n{}", f);
    }
    assert!(failures.is_empty(), "{} fixture games failed", failures.len());
}

/// Every fixture board survives a clone and a rollout untouched.
#[test]
fn test_fixture_rollouts_leave_position_intact() {
    let data = load_test_data();

    for pos in &data.positions {
        let board: Board = pos.board.parse().unwrap();
        let game = GameState::from_board(board, pos.to_move, pos.last_move).unwrap();
        let snapshot = game.clone();

        let value = xox_core::RolloutEvaluator::seeded(17)
            .rollout(&game, 25)
            .unwrap();

        assert!((-1.0..=1.0).contains(&value), "{}: value {}", pos.description, value);
        assert_eq!(game, snapshot, "{}: rollout changed the position", pos.description);
        if pos.win && !pos.legal_moves.is_empty() {
            assert_eq!(value, -1.0, "{}: already won against the player to move", pos.description);
        }
        if pos.legal_moves.is_empty() {
            // nothing left to play is scored as a tie, even after a winning move
            assert_eq!(value, 0.0, "{}: full board", pos.description);
        }
    }
}
