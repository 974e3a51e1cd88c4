use serde::Serialize;

use crate::error::ReversiError;

pub const BOARD_SIZE: usize = 8;
pub const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;

/// State of a single square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Black,
    White,
}

impl Cell {
    /// Wire encoding used by the JS side: 0=empty, 1=black, 2=white.
    pub fn to_u8(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Black => 1,
            Cell::White => 2,
        }
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        match player {
            Player::Black => Cell::Black,
            Player::White => Cell::White,
        }
    }
}

/// Side to move. Black always opens the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Black,
    White,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    pub fn to_u8(self) -> u8 {
        Cell::from(self).to_u8()
    }
}

/// A board coordinate, addressed as (column, row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Coord {
    pub col: u8,
    pub row: u8,
}

impl Coord {
    pub fn new(col: u8, row: u8) -> Result<Self, ReversiError> {
        if col as usize >= BOARD_SIZE || row as usize >= BOARD_SIZE {
            return Err(ReversiError::OutOfRange { col, row });
        }
        Ok(Self { col, row })
    }

    /// Row-major square index (0..64).
    pub fn index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    pub(crate) fn from_index(index: usize) -> Self {
        debug_assert!(index < NUM_SQUARES);
        Self {
            col: (index % BOARD_SIZE) as u8,
            row: (index / BOARD_SIZE) as u8,
        }
    }
}

/// A placement by a given player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub at: Coord,
    pub player: Player,
}

/// Public game state handed to the presentation layer after every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Row-major cells, 0=empty, 1=black, 2=white.
    pub board: Vec<u8>,
    /// `None` once the game is over.
    pub current_player: Option<Player>,
    pub is_terminal: bool,
    pub black_count: u8,
    pub white_count: u8,
    /// `true` while the automated side's move is scheduled but not yet played.
    pub cpu_pending: bool,
    pub last_move: Option<Coord>,
    /// Stones flipped by the last move. Empty before the first move.
    pub flipped: Vec<Coord>,
    /// Player skipped by the last transition, if any.
    pub passed: Option<Player>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Black,
    White,
    Draw,
}

/// Final result after game over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub winner: Winner,
    pub black_count: u8,
    pub white_count: u8,
}

impl GameResult {
    pub fn from_counts(black_count: u8, white_count: u8) -> Self {
        let winner = if black_count > white_count {
            Winner::Black
        } else if white_count > black_count {
            Winner::White
        } else {
            Winner::Draw
        };
        Self {
            winner,
            black_count,
            white_count,
        }
    }
}
