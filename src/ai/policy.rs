//! One-ply move selection for the automated side.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::ai::weights::POSITION_WEIGHTS;
use crate::board::Board;
use crate::error::ReversiError;
use crate::moves::capture_set;
use crate::types::Move;

/// CPU strength. Levels 1..=3 map to the variants in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "u8")]
pub enum Difficulty {
    /// Uniformly random legal move.
    Random,
    /// Largest capture set.
    Greedy,
    /// Positional weight plus twice the capture count.
    #[default]
    Positional,
}

impl Difficulty {
    pub fn level(self) -> u8 {
        match self {
            Difficulty::Random => 1,
            Difficulty::Greedy => 2,
            Difficulty::Positional => 3,
        }
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = ReversiError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(Difficulty::Random),
            2 => Ok(Difficulty::Greedy),
            3 => Ok(Difficulty::Positional),
            other => Err(ReversiError::InvalidDifficulty(other)),
        }
    }
}

pub trait MoveSelector: Send {
    /// Picks one move out of `legal`.
    /// Caller contract: `legal` is the non-empty legal move list for `board`,
    /// in row-major scan order.
    fn select_move(
        &mut self,
        board: &Board,
        legal: &[Move],
        difficulty: Difficulty,
    ) -> Result<Move, ReversiError>;
}

/// The stock selector: random, greedy-capture or positional depending on
/// difficulty.
#[derive(Debug, Clone)]
pub struct HeuristicSelector<R = StdRng> {
    rng: R,
}

impl HeuristicSelector<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for HeuristicSelector<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> HeuristicSelector<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: rand::Rng + Send> MoveSelector for HeuristicSelector<R> {
    fn select_move(
        &mut self,
        board: &Board,
        legal: &[Move],
        difficulty: Difficulty,
    ) -> Result<Move, ReversiError> {
        let selected = match difficulty {
            Difficulty::Random => legal.choose(&mut self.rng).copied(),
            Difficulty::Greedy => greedy_capture(board, legal),
            Difficulty::Positional => positional(board, legal),
        };
        selected.ok_or(ReversiError::InvariantViolation(
            "move selection requires at least one legal move",
        ))
    }
}

/// Move with the strictly largest capture set; earliest wins ties.
pub fn greedy_capture(board: &Board, legal: &[Move]) -> Option<Move> {
    first_best(legal, |mv| capture_set(board, mv.at, mv.player).len() as i32)
}

/// Move with the strictly largest `weight + 2 * captures`; earliest wins ties.
pub fn positional(board: &Board, legal: &[Move]) -> Option<Move> {
    first_best(legal, |mv| {
        let weight = POSITION_WEIGHTS[mv.at.row as usize][mv.at.col as usize];
        weight + 2 * capture_set(board, mv.at, mv.player).len() as i32
    })
}

fn first_best(legal: &[Move], score: impl Fn(&Move) -> i32) -> Option<Move> {
    let mut best: Option<(Move, i32)> = None;
    for mv in legal {
        let s = score(mv);
        if best.is_none_or(|(_, best_score)| s > best_score) {
            best = Some((*mv, s));
        }
    }
    best.map(|(mv, _)| mv)
}
