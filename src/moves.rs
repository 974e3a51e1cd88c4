//! Move generation and application.
//!
//! Capture sets are computed fresh from the board they are asked about and are
//! never cached: any mutation invalidates them.

use crate::board::{Board, bit};
use crate::error::ReversiError;
use crate::types::{BOARD_SIZE, Coord, Move, NUM_SQUARES, Player};

const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Opponent stones that flip when a given move is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaptureSet(u64);

impl CaptureSet {
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn contains(&self, at: Coord) -> bool {
        self.0 & bit(at.index()) != 0
    }

    /// Captured coordinates in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let idx = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            Some(Coord::from_index(idx))
        })
    }

    pub fn to_vec(&self) -> Vec<Coord> {
        self.iter().collect()
    }

    pub(crate) fn mask(&self) -> u64 {
        self.0
    }
}

/// Computes the stones `player` would capture by playing at `at`.
///
/// Each of the 8 rays contributes its run of opponent stones only if the run is
/// closed by one of `player`'s stones; rays ending on an empty square or the
/// edge contribute nothing. An occupied target yields an empty set.
pub fn capture_set(board: &Board, at: Coord, player: Player) -> CaptureSet {
    if board.occupied() & bit(at.index()) != 0 {
        return CaptureSet::default();
    }

    let me = board.stones(player);
    let opp = board.stones(player.opponent());
    let (row, col) = (at.row as i32, at.col as i32);
    let mut flips = 0u64;

    for (dr, dc) in DIRECTIONS {
        let mut r = row + dr;
        let mut c = col + dc;
        let mut line = 0u64;

        while in_bounds(r, c) {
            let square = bit(r as usize * BOARD_SIZE + c as usize);
            if opp & square != 0 {
                line |= square;
            } else if me & square != 0 {
                flips |= line;
                break;
            } else {
                break;
            }

            r += dr;
            c += dc;
        }
    }

    CaptureSet(flips)
}

/// Enumerates legal moves for `player` in row-major scan order
/// (row 0..7, and within a row column 0..7).
pub fn legal_moves(board: &Board, player: Player) -> Vec<Move> {
    let occupied = board.occupied();
    (0..NUM_SQUARES)
        .filter(|&pos| occupied & bit(pos) == 0)
        .map(Coord::from_index)
        .filter(|&at| !capture_set(board, at, player).is_empty())
        .map(|at| Move { at, player })
        .collect()
}

pub fn has_legal_move(board: &Board, player: Player) -> bool {
    let occupied = board.occupied();
    (0..NUM_SQUARES)
        .filter(|&pos| occupied & bit(pos) == 0)
        .any(|pos| !capture_set(board, Coord::from_index(pos), player).is_empty())
}

/// Plays `mv` on a copy of `board`, returning the new board and the stones it
/// flipped. The capture set is recomputed here rather than trusted from the
/// caller.
pub fn apply(board: &Board, mv: Move) -> Result<(Board, CaptureSet), ReversiError> {
    let illegal = ReversiError::IllegalMove {
        col: mv.at.col,
        row: mv.at.row,
    };
    if board.occupied() & bit(mv.at.index()) != 0 {
        return Err(illegal);
    }

    let flips = capture_set(board, mv.at, mv.player);
    if flips.is_empty() {
        return Err(illegal);
    }

    let mut next = *board;
    next.set_stones(mv.at, flips.mask(), mv.player);
    Ok((next, flips))
}

fn in_bounds(row: i32, col: i32) -> bool {
    (0..BOARD_SIZE as i32).contains(&row) && (0..BOARD_SIZE as i32).contains(&col)
}
