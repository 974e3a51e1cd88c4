use thiserror::Error;

/// Errors reported by the game core.
///
/// Every variant except `InvariantViolation` is a recoverable rejection: the
/// session state is left untouched and the caller may try again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReversiError {
    #[error("coordinate ({col}, {row}) is outside the 8x8 board")]
    OutOfRange { col: u8, row: u8 },

    #[error("illegal move at ({col}, {row})")]
    IllegalMove { col: u8, row: u8 },

    #[error("it is not the player's turn")]
    NotYourTurn,

    #[error("game is already over")]
    GameOver,

    #[error("unknown difficulty level {0} (expected 1, 2 or 3)")]
    InvalidDifficulty(u8),

    #[error("invariant violated: {0}")]
    InvariantViolation(&'static str),
}
