//! WASM bindings for xox-core
//!
//! Provides a JavaScript-friendly API for the game logic.

use wasm_bindgen::prelude::*;

use crate::{Board, Coord, GameState, GameStatus, Player, RolloutEvaluator};

fn js_error(err: crate::GameError) -> JsError {
    JsError::new(&err.to_string())
}

/// Player from its `repr(u8)` value: 1 for X, 2 for O.
fn player_from_u8(value: u8) -> crate::Result<Player> {
    match value {
        1 => Ok(Player::X),
        2 => Ok(Player::O),
        other => Err(crate::GameError::InvalidArgument(format!(
            "expected player 1 (X) or 2 (O), got {other}"
        ))),
    }
}

/// WASM-friendly wrapper around GameState
#[wasm_bindgen]
pub struct WasmGame {
    inner: GameState,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a new game on an empty size x size board
    #[wasm_bindgen(constructor)]
    pub fn new(size: u8) -> Result<WasmGame, JsError> {
        let inner = GameState::new(size).map_err(js_error)?;
        Ok(WasmGame { inner })
    }

    /// Create a game from board text ("X", "O", "_" per tile, row-major).
    /// `toMove` is 1 for X, 2 for O.
    #[wasm_bindgen(js_name = fromText)]
    pub fn from_text(repr: &str, to_move: u8) -> Result<WasmGame, JsError> {
        let board: Board = repr.parse().map_err(js_error)?;
        let player = player_from_u8(to_move).map_err(js_error)?;
        let inner = GameState::from_board(board, player, None).map_err(js_error)?;
        Ok(WasmGame { inner })
    }

    /// Get board text
    #[wasm_bindgen(js_name = toText)]
    pub fn to_text(&self) -> String {
        self.inner.board().to_text()
    }

    pub fn size(&self) -> u8 {
        self.inner.size()
    }

    /// Current player (1 = X or 2 = O)
    #[wasm_bindgen(js_name = currentPlayer)]
    pub fn current_player(&self) -> u8 {
        self.inner.current_player() as u8
    }

    #[wasm_bindgen(js_name = turnsTaken)]
    pub fn turns_taken(&self) -> u16 {
        self.inner.turns_taken()
    }

    /// Play at (x, y). Returns false if the tile is occupied or off the board.
    #[wasm_bindgen(js_name = makeMove)]
    pub fn make_move(&mut self, x: u8, y: u8) -> bool {
        self.inner.make_move(Coord::new(x, y)).is_ok()
    }

    /// Clear (x, y). Returns false if the tile is already empty.
    #[wasm_bindgen(js_name = unmakeMove)]
    pub fn unmake_move(&mut self, x: u8, y: u8) -> bool {
        self.inner.unmake_move(Coord::new(x, y)).is_ok()
    }

    #[wasm_bindgen(js_name = isWin)]
    pub fn is_win(&self) -> bool {
        self.inner.is_win()
    }

    #[wasm_bindgen(js_name = isTie)]
    pub fn is_tie(&self) -> bool {
        self.inner.is_tie()
    }

    /// Get winning line as array of coordinates [x, y, x, y, x, y]
    /// Returns empty array if the last move did not win
    #[wasm_bindgen(js_name = winningLine)]
    pub fn winning_line(&self) -> Vec<u8> {
        self.inner
            .winning_line()
            .map(|line| line.iter().flat_map(|c| [c.x, c.y]).collect())
            .unwrap_or_default()
    }

    /// Get legal moves as JS array of { x, y }
    #[wasm_bindgen(js_name = legalMoves)]
    pub fn legal_moves(&self) -> Result<JsValue, JsError> {
        let moves: Vec<Coord> = self.inner.legal_moves();
        serde_wasm_bindgen::to_value(&moves).map_err(|e| JsError::new(&e.to_string()))
    }

    /// Get game result: "ongoing", "x_wins", "o_wins", or "tie"
    pub fn result(&self) -> String {
        match self.inner.status() {
            GameStatus::InProgress => "ongoing".to_string(),
            GameStatus::Won(Player::X) => "x_wins".to_string(),
            GameStatus::Won(Player::O) => "o_wins".to_string(),
            GameStatus::Tie => "tie".to_string(),
        }
    }

    /// Estimate the position for the player to move, in [-1, 1]
    pub fn rollout(&self, iterations: u32, seed: u64) -> Result<f32, JsError> {
        RolloutEvaluator::seeded(seed)
            .rollout(&self.inner, iterations)
            .map_err(js_error)
    }

    /// Clone the game
    #[wasm_bindgen(js_name = clone)]
    pub fn clone_game(&self) -> WasmGame {
        WasmGame {
            inner: self.inner.clone(),
        }
    }
}
