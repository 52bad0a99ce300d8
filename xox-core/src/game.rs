//! Game state: board plus turn bookkeeping, move/unmove and win/tie checks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::{GameError, Result};
use crate::{Coord, Mark, Player};

/// Offsets `(dx, dy)` from the last move for every three-tile line that can
/// contain it.
const WIN_OFFSETS: [[(i8, i8); 3]; 12] = [
    // last move at one end, line extending outward
    [(0, 0), (0, 1), (0, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 0), (1, -1), (2, -2)],
    [(0, 0), (0, -1), (0, -2)],
    [(0, 0), (-1, -1), (-2, -2)],
    [(0, 0), (-1, 0), (-2, 0)],
    [(0, 0), (-1, 1), (-2, 2)],
    // last move in the middle
    [(-1, 0), (0, 0), (1, 0)],
    [(0, -1), (0, 0), (0, 1)],
    [(-1, 1), (0, 0), (1, -1)],
    [(-1, -1), (0, 0), (1, 1)],
];

/// Result of inspecting a position.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    /// The last move completed a line for this player.
    Won(Player),
    Tie,
}

/// A game in progress.
///
/// The board is only mutated through [`make_move`](GameState::make_move) and
/// [`unmake_move`](GameState::unmake_move), so `turns_taken` always equals
/// the number of marked tiles and no tile is claimed by both players.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct GameState {
    board: Board,
    turns_taken: u16,
    current_player: Player,
    last_move: Option<Coord>,
}

impl GameState {
    /// New game on an empty `size × size` board with X to move.
    pub fn new(size: u8) -> Result<GameState> {
        Ok(GameState {
            board: Board::new(size)?,
            turns_taken: 0,
            current_player: Player::X,
            last_move: None,
        })
    }

    /// Set up a position from an existing board.
    ///
    /// `turns_taken` is the number of marked tiles. The board must not have
    /// tiles claimed by both players, and `last_move`, when given, must point
    /// at a marked tile on the board.
    ///
    /// The mark on the `last_move` tile is not checked against
    /// `current_player`. In a position reached by play it belongs to the
    /// opponent. If it holds the current player's own mark instead, the two
    /// views of a win disagree: [`status`](GameState::status) credits the
    /// owner of that tile, while a playout scores the line as a loss for the
    /// player to move.
    pub fn from_board(
        board: Board,
        current_player: Player,
        last_move: Option<Coord>,
    ) -> Result<GameState> {
        if !board.is_consistent() {
            return Err(GameError::InvalidArgument(
                "board has tiles claimed by both players".to_string(),
            ));
        }
        let state = GameState {
            turns_taken: board.occupied_count() as u16,
            board,
            current_player,
            last_move,
        };
        if let Some(coord) = last_move {
            if state.tile(coord)?.is_empty() {
                return Err(GameError::InvalidArgument(format!(
                    "last move {coord} points at an empty tile"
                )));
            }
        }
        Ok(state)
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn size(&self) -> u8 {
        self.board.size()
    }

    #[inline]
    pub fn turns_taken(&self) -> u16 {
        self.turns_taken
    }

    #[inline]
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Most recent move. `None` before the first move and after an unmove.
    #[inline]
    pub fn last_move(&self) -> Option<Coord> {
        self.last_move
    }

    /// Empty tiles in row-major order.
    #[inline]
    pub fn legal_moves(&self) -> Vec<Coord> {
        self.board.legal_moves()
    }

    /// Mark at `coord`, rejecting coordinates outside the grid.
    fn tile(&self, coord: Coord) -> Result<Mark> {
        if !self.board.in_bounds(coord.x as i16, coord.y as i16) {
            return Err(GameError::IndexOutOfRange {
                index: coord.y as usize * self.size() as usize + coord.x as usize,
                len: self.board.tile_count(),
            });
        }
        self.board.get(coord.x, coord.y)
    }

    /// Place the current player's mark at `coord` and pass the turn.
    pub fn make_move(&mut self, coord: Coord) -> Result<()> {
        if !self.tile(coord)?.is_empty() {
            return Err(GameError::IllegalMove {
                x: coord.x,
                y: coord.y,
                reason: "tile is already occupied",
            });
        }
        self.board.set(coord.x, coord.y, self.current_player.into())?;
        self.turns_taken += 1;
        self.last_move = Some(coord);
        self.current_player = self.current_player.opponent();
        Ok(())
    }

    /// Clear the mark at `coord` and hand the turn back.
    ///
    /// The move made before the undone one is not remembered: the last move
    /// becomes `None`, so [`is_win`](GameState::is_win) reports false until
    /// the next [`make_move`](GameState::make_move).
    pub fn unmake_move(&mut self, coord: Coord) -> Result<()> {
        if self.tile(coord)?.is_empty() {
            return Err(GameError::IllegalMove {
                x: coord.x,
                y: coord.y,
                reason: "tile is already empty",
            });
        }
        self.board.set(coord.x, coord.y, Mark::Empty)?;
        self.turns_taken -= 1;
        self.last_move = None;
        self.current_player = self.current_player.opponent();
        Ok(())
    }

    /// Every tile has been played.
    #[inline]
    pub fn is_tie(&self) -> bool {
        self.turns_taken as usize == self.board.tile_count()
    }

    /// The last move is part of an `XOX` or `OXO` line.
    ///
    /// Only lines through the last move are examined, so a line completed
    /// earlier in the game is not reported.
    #[inline]
    pub fn is_win(&self) -> bool {
        self.winning_line().is_some()
    }

    /// First alternating line through the last move, if any.
    pub fn winning_line(&self) -> Option<[Coord; 3]> {
        let last = self.last_move?;

        'patterns: for pattern in &WIN_OFFSETS {
            let mut line = [last; 3];
            let mut previous = Mark::Empty;

            for (slot, &(dx, dy)) in line.iter_mut().zip(pattern) {
                let x = last.x as i16 + dx as i16;
                let y = last.y as i16 + dy as i16;
                if !self.board.in_bounds(x, y) {
                    continue 'patterns;
                }
                let mark = match self.board.get(x as u8, y as u8) {
                    Ok(mark) => mark,
                    Err(_) => continue 'patterns,
                };
                // two marks strictly alternating means XOX or OXO
                if mark.is_empty() || mark == previous {
                    continue 'patterns;
                }
                previous = mark;
                *slot = Coord::new(x as u8, y as u8);
            }
            return Some(line);
        }
        None
    }

    /// Win is checked before tie, so a board filled by a winning move is won.
    pub fn status(&self) -> GameStatus {
        if let Some(last) = self.last_move {
            if self.is_win() {
                let winner = self
                    .tile(last)
                    .ok()
                    .and_then(Mark::player)
                    .unwrap_or(self.current_player.opponent());
                return GameStatus::Won(winner);
            }
        }
        if self.is_tie() {
            GameStatus::Tie
        } else {
            GameStatus::InProgress
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)
    }
}
