use crate::board::Board;
use crate::moves::has_legal_move;
use crate::types::Player;

/// Turn controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    AwaitingMove(Player),
    GameOver,
}

impl Turn {
    pub fn player(self) -> Option<Player> {
        match self {
            Turn::AwaitingMove(player) => Some(player),
            Turn::GameOver => None,
        }
    }
}

impl Default for Turn {
    fn default() -> Self {
        Turn::AwaitingMove(Player::Black)
    }
}

/// What follows a completed move. Exactly one branch applies to any board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The opponent has a move: normal alternation.
    Alternate(Player),
    /// The opponent has no move but the mover does: `skipped` passes.
    Pass { mover: Player, skipped: Player },
    /// Neither side can move.
    GameOver,
}

impl Transition {
    pub fn next_turn(self) -> Turn {
        match self {
            Transition::Alternate(player) => Turn::AwaitingMove(player),
            Transition::Pass { mover, .. } => Turn::AwaitingMove(mover),
            Transition::GameOver => Turn::GameOver,
        }
    }
}

/// Decides who moves next after `mover` has played onto `board`.
pub fn advance(board: &Board, mover: Player) -> Transition {
    let next = mover.opponent();
    if has_legal_move(board, next) {
        Transition::Alternate(next)
    } else if has_legal_move(board, mover) {
        Transition::Pass {
            mover,
            skipped: next,
        }
    } else {
        Transition::GameOver
    }
}
