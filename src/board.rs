use crate::error::ReversiError;
use crate::types::{Cell, Coord, NUM_SQUARES, Player};

/// Reversi board state represented by two bitboards.
///
/// Bit `i` is the square with row-major index `i`, i.e. `(col, row) = (i % 8, i / 8)`.
/// Outside this crate the board is read-only; the only mutation after setup
/// goes through [`crate::moves::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    black: u64,
    white: u64,
}

impl Board {
    /// Creates the initial board:
    /// (3,3)=white, (4,3)=black, (3,4)=black, (4,4)=white.
    pub fn new() -> Self {
        Self {
            black: bit(28) | bit(35),
            white: bit(27) | bit(36),
        }
    }

    /// Builds a board from raw black/white masks. Overlapping bits are
    /// rejected since a square holds exactly one state.
    pub fn from_bitboards(black: u64, white: u64) -> Result<Self, ReversiError> {
        if black & white != 0 {
            return Err(ReversiError::InvariantViolation(
                "a square cannot hold both colors",
            ));
        }
        Ok(Self { black, white })
    }

    /// Reads the state at `(col, row)`.
    pub fn cell(&self, col: u8, row: u8) -> Result<Cell, ReversiError> {
        Coord::new(col, row).map(|at| self.cell_at(at))
    }

    pub fn cell_at(&self, at: Coord) -> Cell {
        let square = bit(at.index());
        if self.black & square != 0 {
            Cell::Black
        } else if self.white & square != 0 {
            Cell::White
        } else {
            Cell::Empty
        }
    }

    /// Returns `(black_count, white_count)`.
    pub fn count(&self) -> (u8, u8) {
        (self.black.count_ones() as u8, self.white.count_ones() as u8)
    }

    pub fn count_of(&self, player: Player) -> u8 {
        self.stones(player).count_ones() as u8
    }

    /// Returns the number of empty squares.
    pub fn empty_count(&self) -> u8 {
        let (black_count, white_count) = self.count();
        NUM_SQUARES as u8 - black_count - white_count
    }

    /// Converts board to `[u8; 64]` where 0=empty, 1=black, 2=white.
    pub fn to_array(&self) -> [u8; NUM_SQUARES] {
        let mut board = [0u8; NUM_SQUARES];
        for (pos, cell) in board.iter_mut().enumerate() {
            *cell = self.cell_at(Coord::from_index(pos)).to_u8();
        }
        board
    }

    pub(crate) fn stones(&self, player: Player) -> u64 {
        match player {
            Player::Black => self.black,
            Player::White => self.white,
        }
    }

    pub(crate) fn occupied(&self) -> u64 {
        self.black | self.white
    }

    /// Sets `at` and every square in `flips` to `player`.
    /// Callers are responsible for legality.
    pub(crate) fn set_stones(&mut self, at: Coord, flips: u64, player: Player) {
        let gained = bit(at.index()) | flips;
        match player {
            Player::Black => {
                self.black |= gained;
                self.white &= !gained;
            }
            Player::White => {
                self.white |= gained;
                self.black &= !gained;
            }
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn bit(pos: usize) -> u64 {
    if pos < NUM_SQUARES { 1u64 << pos } else { 0 }
}
