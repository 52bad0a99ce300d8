//! Square board of tiles backed by one [`BitSet`] per player.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::bitset::BitSet;
use crate::error::{GameError, Result};
use crate::{Coord, Mark, Player};

/// Occupancy of a `size × size` grid.
///
/// The board knows nothing about turns. It also does not keep the two
/// players' bit sets disjoint: [`Board::set`] with a player mark never clears
/// the other player's bit. [`GameState`](crate::GameState) is the layer that
/// keeps a tile owned by at most one player.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Board {
    player_one: BitSet,
    player_two: BitSet,
    size: u8,
}

impl Board {
    /// Create an empty board with `size` tiles along each axis.
    pub fn new(size: u8) -> Result<Board> {
        if size == 0 {
            return Err(GameError::InvalidArgument(
                "board size cannot be 0".to_string(),
            ));
        }
        let tiles = size as usize * size as usize;
        Ok(Board {
            player_one: BitSet::new(tiles)?,
            player_two: BitSet::new(tiles)?,
            size,
        })
    }

    /// Create a board from its text form. `repr` must describe every tile.
    pub fn from_text(size: u8, repr: &str) -> Result<Board> {
        let mut board = Board::new(size)?;
        let len = repr.chars().count();
        if len != board.tile_count() {
            return Err(GameError::InvalidArgument(format!(
                "a {size}x{size} board needs {} tiles, got {len}",
                board.tile_count()
            )));
        }
        board.load_text(repr)?;
        Ok(board)
    }

    /// Tiles along one axis.
    #[inline]
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Total number of tiles (`size²`).
    #[inline]
    pub fn tile_count(&self) -> usize {
        self.size as usize * self.size as usize
    }

    /// The bit set holding `player`'s tiles.
    #[inline]
    pub fn bitset(&self, player: Player) -> &BitSet {
        match player {
            Player::X => &self.player_one,
            Player::O => &self.player_two,
        }
    }

    /// Linear index of `(x, y)`. Only the index itself is range checked, so
    /// an `x` past the last column addresses a tile of a later row.
    #[inline]
    fn index(&self, x: u8, y: u8) -> Result<usize> {
        let index = y as usize * self.size as usize + x as usize;
        if index >= self.tile_count() {
            return Err(GameError::IndexOutOfRange {
                index,
                len: self.tile_count(),
            });
        }
        Ok(index)
    }

    #[inline]
    fn mark_at(&self, index: usize) -> Result<Mark> {
        // X wins ties on a tile that both bit sets claim.
        if self.player_one.get(index)? {
            Ok(Mark::X)
        } else if self.player_two.get(index)? {
            Ok(Mark::O)
        } else {
            Ok(Mark::Empty)
        }
    }

    /// Mark on the tile at `(x, y)`. A tile set in both bit sets reads as X.
    pub fn get(&self, x: u8, y: u8) -> Result<Mark> {
        let index = self.index(x, y)?;
        self.mark_at(index)
    }

    /// Assign a tile. `Empty` clears both players' bits; a player mark sets
    /// only that player's bit.
    pub fn set(&mut self, x: u8, y: u8, mark: Mark) -> Result<()> {
        let index = self.index(x, y)?;
        self.set_index(index, mark)
    }

    fn set_index(&mut self, index: usize, mark: Mark) -> Result<()> {
        match mark {
            Mark::X => self.player_one.set(index),
            Mark::O => self.player_two.set(index),
            Mark::Empty => {
                self.player_one.clear(index)?;
                self.player_two.clear(index)
            }
        }
    }

    /// Check signed coordinates against the board bounds.
    #[inline]
    pub fn in_bounds(&self, x: i16, y: i16) -> bool {
        let size = self.size as i16;
        x >= 0 && y >= 0 && x < size && y < size
    }

    /// Tiles holding a mark. A dual-occupied tile counts once.
    pub fn occupied_count(&self) -> usize {
        self.player_one
            .as_bytes()
            .iter()
            .zip(self.player_two.as_bytes())
            .map(|(a, b)| (a | b).count_ones() as usize)
            .sum()
    }

    /// True if no tile is claimed by both players.
    pub fn is_consistent(&self) -> bool {
        self.player_one
            .as_bytes()
            .iter()
            .zip(self.player_two.as_bytes())
            .all(|(a, b)| a & b == 0)
    }

    /// All empty tiles in row-major order (`y` outer, `x` inner).
    pub fn legal_moves(&self) -> Vec<Coord> {
        let mut moves = Vec::with_capacity(self.tile_count() - self.occupied_count());
        for y in 0..self.size {
            for x in 0..self.size {
                let index = y as usize * self.size as usize + x as usize;
                if let Ok(Mark::Empty) = self.mark_at(index) {
                    moves.push(Coord::new(x, y));
                }
            }
        }
        moves
    }

    /// Shuffle `moves` in place.
    ///
    /// Position `i` is swapped with a position drawn from `i + 1..len`, never
    /// with itself. This is Sattolo's variant of Fisher-Yates: the result is
    /// always a single cycle through every element, so no element stays where
    /// it was and only cyclic permutations are produced.
    pub fn shuffle_moves<T, R: Rng + ?Sized>(moves: &mut [T], rng: &mut R) {
        let len = moves.len();
        if len < 2 {
            return;
        }
        for i in 0..len - 1 {
            let j = rng.random_range(i + 1..len);
            moves.swap(i, j);
        }
    }

    /// Text form: one `X`, `O` or `_` per tile, row-major.
    pub fn to_text(&self) -> String {
        (0..self.tile_count())
            .map(|i| self.mark_at(i).map_or('_', Mark::to_char))
            .collect()
    }

    /// Assign tiles from text form.
    ///
    /// Character `i` sets tile `i` to exactly that mark. Tiles past the end
    /// of `repr` are left alone. Nothing changes if the text is too long or
    /// holds a character other than `X`, `O` or `_`.
    pub fn load_text(&mut self, repr: &str) -> Result<()> {
        let marks = repr
            .chars()
            .map(|c| {
                Mark::from_char(c).ok_or_else(|| {
                    GameError::InvalidArgument(format!("unexpected tile character {c:?}"))
                })
            })
            .collect::<Result<Vec<Mark>>>()?;
        if marks.len() > self.tile_count() {
            return Err(GameError::IndexOutOfRange {
                index: self.tile_count(),
                len: self.tile_count(),
            });
        }
        for (i, mark) in marks.into_iter().enumerate() {
            self.set_index(i, Mark::Empty)?;
            self.set_index(i, mark)?;
        }
        Ok(())
    }
}

/// Grid dump: marks separated by spaces, one row per line.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.size as usize;
        for y in 0..size {
            for x in 0..size {
                if x > 0 {
                    f.write_str(" ")?;
                }
                let mark = self.mark_at(y * size + x).map_err(|_| fmt::Error)?;
                write!(f, "{}", mark.to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Builds a board from text form, taking the size from the text length,
/// which must be a perfect square.
impl FromStr for Board {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let len = s.chars().count();
        let size = (1..=u8::MAX)
            .find(|&n| n as usize * n as usize >= len)
            .filter(|&n| n as usize * n as usize == len)
            .ok_or_else(|| {
                GameError::InvalidArgument(format!(
                    "{len} tiles do not form a square board"
                ))
            })?;
        Board::from_text(size, s)
    }
}
