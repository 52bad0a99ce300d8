//! XOX line game logic with bit-packed board representation.
//!
//! Two players take turns marking tiles of a `size × size` grid. The game is
//! won when a move completes a line of three adjacent tiles whose marks
//! strictly alternate (`X O X` or `O X O`), horizontally, vertically or
//! diagonally. It is a tie once every tile is marked.
//!
//! # Board Encoding
//!
//! ```text
//! One BitSet per player, size² bits each (row-major):
//!   player_one (X): bit i set  => tile i holds X
//!   player_two (O): bit i set  => tile i holds O
//!
//! Tile index = y * size + x, e.g. for size = 3:
//!   (0,0)=0  (1,0)=1  (2,0)=2
//!   (0,1)=3  (1,1)=4  (2,1)=5
//!   (0,2)=6  (1,2)=7  (2,2)=8
//!
//! Bit i lives in byte i / 8 at position i % 8 (LSB first).
//! ```
//!
//! # Text Forms
//!
//! ```text
//! BitSet: "0110..."   one '0'/'1' per bit, ascending index
//! Board:  "OX_XOX__O" one 'X'/'O'/'_' per tile, row-major
//! ```
//!
//! # Evaluation
//!
//! [`RolloutEvaluator`] estimates a position by cloning it, playing shuffled
//! legal moves to the end and averaging the outcomes (`+1` win, `0` tie,
//! `-1` loss for the player to move).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod bitset;
pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod rollout;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use bitset::BitSet;
pub use board::Board;
pub use config::RolloutConfig;
pub use error::{GameError, Result};
pub use game::{GameState, GameStatus};
pub use rollout::{random_play, rollout, summarize, Outcome, RolloutEvaluator, RolloutSummary};

/// Player identifier. X always moves first.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Player {
    X = 1,
    O = 2,
}

impl Player {
    /// Get the opponent player.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Character used for this player in the board text form.
    #[inline]
    pub fn symbol(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Player {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "X" | "x" => Ok(Player::X),
            "O" | "o" => Ok(Player::O),
            other => Err(GameError::InvalidArgument(format!(
                "expected player X or O, got {other:?}"
            ))),
        }
    }
}

/// Occupant of a tile.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Mark {
    #[default]
    Empty = 0,
    X = 1,
    O = 2,
}

impl Mark {
    /// The player owning this mark, `None` for an empty tile.
    #[inline]
    pub fn player(self) -> Option<Player> {
        match self {
            Mark::Empty => None,
            Mark::X => Some(Player::X),
            Mark::O => Some(Player::O),
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Mark::Empty
    }

    /// Character used in the board text form.
    #[inline]
    pub fn to_char(self) -> char {
        match self {
            Mark::Empty => '_',
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }

    /// Parse a board text character. Only `X`, `O` and `_` are accepted.
    #[inline]
    pub fn from_char(c: char) -> Option<Mark> {
        match c {
            'X' => Some(Mark::X),
            'O' => Some(Mark::O),
            '_' => Some(Mark::Empty),
            _ => None,
        }
    }
}

impl From<Player> for Mark {
    #[inline]
    fn from(player: Player) -> Mark {
        match player {
            Player::X => Mark::X,
            Player::O => Mark::O,
        }
    }
}

/// Tile coordinates on the board.
///
/// `x` is the column and `y` the row; the tile's linear index is
/// `y * size + x`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: u8,
    pub y: u8,
}

impl Coord {
    #[inline]
    pub const fn new(x: u8, y: u8) -> Coord {
        Coord { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Parses `"x,y"`, optionally wrapped in parentheses: `"(2,0)"`.
impl FromStr for Coord {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let inner = s
            .trim()
            .trim_start_matches('(')
            .trim_end_matches(')');
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != 2 {
            return Err(GameError::InvalidArgument(format!(
                "expected coordinates as x,y, got {s:?}"
            )));
        }
        let parse = |part: &str| {
            part.parse::<u8>().map_err(|e| {
                GameError::InvalidArgument(format!("bad coordinate {part:?}: {e}"))
            })
        };
        Ok(Coord::new(parse(parts[0])?, parse(parts[1])?))
    }
}
