use serde::Serialize;
use tracing::{debug, info, warn};
use web_time::Instant;

use crate::ai::{Difficulty, HeuristicSelector, MoveSelector};
use crate::board::Board;
use crate::config::SessionConfig;
use crate::error::ReversiError;
use crate::moves::{self, legal_moves};
use crate::turn::{self, Transition, Turn};
use crate::types::{Coord, GameResult, GameState, Move, Player};

/// One-shot notification for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Signal {
    /// `skipped` had no legal move; the other side moves again.
    Pass { skipped: Player },
    GameOver(GameResult),
}

/// Everything a single applied move changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub mover: Player,
    pub at: Coord,
    pub flipped: Vec<Coord>,
    pub turn: Turn,
    pub signal: Option<Signal>,
}

/// A single match between a human and the CPU.
///
/// The session owns the board and the turn state. Human moves enter through
/// [`GameSession::propose_move`]; CPU moves are scheduled after each transition
/// into the CPU's turn and played by [`GameSession::poll_cpu`] or
/// [`GameSession::run_cpu_move`].
pub struct GameSession {
    board: Board,
    turn: Turn,
    config: SessionConfig,
    cpu_due: Option<Instant>,
    last_move: Option<Coord>,
    flipped: Vec<Coord>,
    passed: Option<Player>,
    moves_played: [u32; 2],
    selector: Box<dyn MoveSelector>,
}

impl GameSession {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_selector(config, Box::new(HeuristicSelector::new()))
    }

    pub fn with_selector(config: SessionConfig, selector: Box<dyn MoveSelector>) -> Self {
        let mut session = Self {
            board: Board::new(),
            turn: Turn::default(),
            config,
            cpu_due: None,
            last_move: None,
            flipped: Vec::new(),
            passed: None,
            moves_played: [0; 2],
            selector,
        };
        session.schedule_cpu_if_needed();
        session
    }

    /// Starts a session from an arbitrary position. If `to_move` has no legal
    /// move the turn goes to the other side, or the game is over if neither
    /// can move.
    pub fn from_position(
        config: SessionConfig,
        selector: Box<dyn MoveSelector>,
        board: Board,
        to_move: Player,
    ) -> Self {
        let mut session = Self::with_selector(config, selector);
        session.board = board;
        session.turn = turn::advance(&board, to_move.opponent()).next_turn();
        session.schedule_cpu_if_needed();
        session
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_terminal(&self) -> bool {
        self.turn == Turn::GameOver
    }

    /// Number of moves `player` has played since the last reset.
    pub fn moves_played(&self, player: Player) -> u32 {
        self.moves_played[player_slot(player)]
    }

    pub fn state(&self) -> GameState {
        let (black_count, white_count) = self.board.count();
        GameState {
            board: self.board.to_array().to_vec(),
            current_player: self.turn.player(),
            is_terminal: self.is_terminal(),
            black_count,
            white_count,
            cpu_pending: self.cpu_due.is_some(),
            last_move: self.last_move,
            flipped: self.flipped.clone(),
            passed: self.passed,
        }
    }

    /// Final result, once the game is over.
    pub fn result(&self) -> Option<GameResult> {
        if !self.is_terminal() {
            return None;
        }
        let (black_count, white_count) = self.board.count();
        Some(GameResult::from_counts(black_count, white_count))
    }

    /// Legal squares for `player`, recomputed on every call.
    pub fn legal_moves(&self, player: Player) -> Vec<Coord> {
        legal_moves(&self.board, player)
            .into_iter()
            .map(|mv| mv.at)
            .collect()
    }

    /// The only entry point for human moves.
    pub fn propose_move(&mut self, col: u8, row: u8) -> Result<MoveOutcome, ReversiError> {
        if self.is_terminal() {
            return Err(ReversiError::GameOver);
        }
        let human = self.config.human_player();
        if self.turn != Turn::AwaitingMove(human) || self.cpu_due.is_some() {
            warn!(col, row, "move proposed outside the human turn");
            return Err(ReversiError::NotYourTurn);
        }

        let at = Coord::new(col, row)?;
        self.apply_move(Move { at, player: human })
            .inspect_err(|err| warn!(%err, "rejected human move"))
    }

    pub fn configure_difficulty(&mut self, level: u8) -> Result<(), ReversiError> {
        self.config.difficulty = Difficulty::try_from(level)?;
        debug!(level, "difficulty configured");
        Ok(())
    }

    /// Back to the initial layout with Black to move. Difficulty and side
    /// assignment are kept.
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.turn = Turn::default();
        self.last_move = None;
        self.flipped.clear();
        self.passed = None;
        self.moves_played = [0; 2];
        self.schedule_cpu_if_needed();
        info!("session reset");
    }

    /// When the pending CPU move becomes due, if one is pending.
    pub fn cpu_due(&self) -> Option<Instant> {
        self.cpu_due
    }

    /// Plays the pending CPU move if it is due at `now`.
    pub fn poll_cpu(&mut self, now: Instant) -> Option<Result<MoveOutcome, ReversiError>> {
        match self.cpu_due {
            Some(due) if due <= now => Some(self.run_cpu_move()),
            _ => None,
        }
    }

    /// Plays the CPU move now, ignoring the pacing delay.
    pub fn run_cpu_move(&mut self) -> Result<MoveOutcome, ReversiError> {
        if self.is_terminal() {
            return Err(ReversiError::GameOver);
        }
        let cpu = self.config.cpu_player;
        if self.turn != Turn::AwaitingMove(cpu) {
            return Err(ReversiError::NotYourTurn);
        }

        let legal = legal_moves(&self.board, cpu);
        if legal.is_empty() {
            return Err(ReversiError::InvariantViolation(
                "CPU turn reached without a legal move",
            ));
        }

        let selected = self
            .selector
            .select_move(&self.board, &legal, self.config.difficulty)?;
        if !legal.contains(&selected) {
            return Err(ReversiError::InvariantViolation(
                "CPU selected a move outside the legal list",
            ));
        }

        self.apply_move(selected)
    }

    fn apply_move(&mut self, mv: Move) -> Result<MoveOutcome, ReversiError> {
        let (board, flipped) = moves::apply(&self.board, mv)?;
        let flipped = flipped.to_vec();
        debug!(
            player = ?mv.player,
            col = mv.at.col,
            row = mv.at.row,
            flips = flipped.len(),
            "move applied"
        );

        let transition = turn::advance(&board, mv.player);
        self.board = board;
        self.turn = transition.next_turn();
        self.moves_played[player_slot(mv.player)] += 1;
        self.last_move = Some(mv.at);
        self.flipped = flipped.clone();
        self.passed = None;

        let signal = match transition {
            Transition::Alternate(_) => None,
            Transition::Pass { skipped, .. } => {
                info!(?skipped, "no legal move, turn passes");
                self.passed = Some(skipped);
                Some(Signal::Pass { skipped })
            }
            Transition::GameOver => {
                let (black_count, white_count) = self.board.count();
                let result = GameResult::from_counts(black_count, white_count);
                info!(black_count, white_count, winner = ?result.winner, "game over");
                Some(Signal::GameOver(result))
            }
        };
        self.schedule_cpu_if_needed();

        Ok(MoveOutcome {
            mover: mv.player,
            at: mv.at,
            flipped,
            turn: self.turn,
            signal,
        })
    }

    fn schedule_cpu_if_needed(&mut self) {
        if self.turn == Turn::AwaitingMove(self.config.cpu_player) {
            self.cpu_due = Some(Instant::now() + self.config.cpu_delay());
        } else {
            self.cpu_due = None;
        }
    }

    #[cfg(test)]
    fn set_board_for_test(&mut self, board: Board, turn: Turn) {
        self.board = board;
        self.turn = turn;
        self.last_move = None;
        self.flipped.clear();
        self.passed = None;
        self.schedule_cpu_if_needed();
    }
}

fn player_slot(player: Player) -> usize {
    match player {
        Player::Black => 0,
        Player::White => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cell, Winner};
    use web_time::Duration;

    const FULL_BOARD: u64 = u64::MAX;

    struct FixedMoveSelector {
        at: Coord,
    }

    impl MoveSelector for FixedMoveSelector {
        fn select_move(
            &mut self,
            _board: &Board,
            legal: &[Move],
            _difficulty: Difficulty,
        ) -> Result<Move, ReversiError> {
            Ok(Move {
                at: self.at,
                player: legal[0].player,
            })
        }
    }

    fn bit(col: u8, row: u8) -> u64 {
        1u64 << Coord::new(col, row).unwrap().index()
    }

    fn instant_config() -> SessionConfig {
        SessionConfig {
            cpu_delay_ms: 0,
            ..SessionConfig::default()
        }
    }

    fn session(config: SessionConfig) -> GameSession {
        GameSession::with_selector(config, Box::new(HeuristicSelector::seeded(3)))
    }

    #[test]
    fn initial_state_is_correct() {
        let game = session(SessionConfig::default());
        let state = game.state();

        assert_eq!(state.current_player, Some(Player::Black));
        assert_eq!(state.black_count, 2);
        assert_eq!(state.white_count, 2);
        assert!(!state.is_terminal);
        assert!(!state.cpu_pending);
        assert!(state.flipped.is_empty());
        assert_eq!(state.board[27], 2);
        assert_eq!(state.board[28], 1);
        assert_eq!(state.board[35], 1);
        assert_eq!(state.board[36], 2);
        assert_eq!(game.legal_moves(Player::Black).len(), 4);
    }

    #[test]
    fn t02_illegal_human_move_leaves_state_unchanged() {
        let mut game = session(SessionConfig::default());
        let before = game.state();

        assert_eq!(
            game.propose_move(0, 0).unwrap_err(),
            ReversiError::IllegalMove { col: 0, row: 0 }
        );
        assert_eq!(
            game.propose_move(3, 3).unwrap_err(),
            ReversiError::IllegalMove { col: 3, row: 3 }
        );
        assert_eq!(
            game.propose_move(9, 0).unwrap_err(),
            ReversiError::OutOfRange { col: 9, row: 0 }
        );
        assert_eq!(game.state(), before);
    }

    #[test]
    fn human_move_schedules_cpu_and_blocks_further_input() {
        let config = SessionConfig {
            cpu_delay_ms: 60_000,
            ..SessionConfig::default()
        };
        let mut game = session(config);

        let outcome = game.propose_move(3, 2).unwrap();
        assert_eq!(outcome.turn, Turn::AwaitingMove(Player::White));
        assert_eq!(outcome.flipped, vec![Coord::new(3, 3).unwrap()]);
        assert_eq!(outcome.signal, None);
        assert!(game.state().cpu_pending);

        let before = game.state();
        assert_eq!(game.propose_move(2, 2), Err(ReversiError::NotYourTurn));
        assert_eq!(game.state(), before);

        let due = game.cpu_due().unwrap();
        assert!(game.poll_cpu(due - Duration::from_millis(1)).is_none());

        let cpu = game.poll_cpu(due).unwrap().unwrap();
        assert_eq!(cpu.mover, Player::White);
        assert_eq!(game.turn(), Turn::AwaitingMove(Player::Black));
        assert!(game.cpu_due().is_none());
        assert_eq!(game.moves_played(Player::White), 1);
    }

    #[test]
    fn t03_white_without_moves_returns_control_to_black_with_pass() {
        let mut game = session(instant_config());
        // Black takes (0,0) capturing (1,0). Afterwards White's only stone is
        // (6,7) and the only empty square is (7,7), which only Black can use.
        let white = bit(1, 0) | bit(6, 7);
        let black = FULL_BOARD ^ bit(0, 0) ^ bit(7, 7) ^ white;
        game.set_board_for_test(
            Board::from_bitboards(black, white).unwrap(),
            Turn::AwaitingMove(Player::Black),
        );
        let white_moves_before = game.moves_played(Player::White);

        let outcome = game.propose_move(0, 0).unwrap();

        assert_eq!(
            outcome.signal,
            Some(Signal::Pass {
                skipped: Player::White
            })
        );
        assert_eq!(outcome.turn, Turn::AwaitingMove(Player::Black));
        assert_eq!(game.state().passed, Some(Player::White));
        assert!(!game.state().cpu_pending);
        assert_eq!(game.moves_played(Player::White), white_moves_before);
        assert_eq!(game.run_cpu_move(), Err(ReversiError::NotYourTurn));

        let last = game.propose_move(7, 7).unwrap();
        let result = GameResult::from_counts(64, 0);
        assert_eq!(last.signal, Some(Signal::GameOver(result)));
        assert_eq!(game.result(), Some(result));
        assert_eq!(game.result().map(|r| r.winner), Some(Winner::Black));
        assert_eq!(game.propose_move(0, 0), Err(ReversiError::GameOver));
    }

    #[test]
    fn cpu_keeps_moving_when_human_must_pass() {
        let mut game = GameSession::with_selector(
            instant_config(),
            Box::new(FixedMoveSelector {
                at: Coord::new(0, 0).unwrap(),
            }),
        );
        // Mirror of the pass board: after White takes (0,0), Black is stuck
        // and White still has (7,7).
        let black = bit(1, 0) | bit(6, 7);
        let white = FULL_BOARD ^ bit(0, 0) ^ bit(7, 7) ^ black;
        game.set_board_for_test(
            Board::from_bitboards(black, white).unwrap(),
            Turn::AwaitingMove(Player::White),
        );
        assert!(game.cpu_due().is_some());

        let outcome = game.run_cpu_move().unwrap();

        assert_eq!(
            outcome.signal,
            Some(Signal::Pass {
                skipped: Player::Black
            })
        );
        assert_eq!(game.turn(), Turn::AwaitingMove(Player::White));
        assert!(game.cpu_due().is_some());
        assert_eq!(game.propose_move(7, 7), Err(ReversiError::NotYourTurn));
    }

    #[test]
    fn t05_full_board_after_cpu_move_ends_game() {
        let mut game = GameSession::with_selector(
            instant_config(),
            Box::new(FixedMoveSelector {
                at: Coord::new(0, 0).unwrap(),
            }),
        );
        let black = bit(1, 0);
        let white = FULL_BOARD ^ bit(0, 0) ^ black;
        game.set_board_for_test(
            Board::from_bitboards(black, white).unwrap(),
            Turn::AwaitingMove(Player::White),
        );

        let outcome = game.run_cpu_move().unwrap();
        let state = game.state();

        assert_eq!(outcome.turn, Turn::GameOver);
        assert!(state.is_terminal);
        assert_eq!(state.current_player, None);
        assert_eq!(state.black_count, 0);
        assert_eq!(state.white_count, 64);
        assert_eq!(state.flipped, vec![Coord::new(1, 0).unwrap()]);
        assert!(!state.cpu_pending);
        assert_eq!(
            outcome.signal.map(|s| matches!(s, Signal::GameOver(r) if r.winner == Winner::White)),
            Some(true)
        );
    }

    #[test]
    fn selector_returning_illegal_move_is_rejected() {
        let mut game = GameSession::with_selector(
            instant_config(),
            Box::new(FixedMoveSelector {
                at: Coord::new(0, 0).unwrap(),
            }),
        );
        game.propose_move(3, 2).unwrap();
        let before = game.state();

        assert!(matches!(
            game.run_cpu_move(),
            Err(ReversiError::InvariantViolation(_))
        ));
        assert_eq!(game.state(), before);
    }

    #[test]
    fn difficulty_is_validated_and_reset_restores_opening() {
        let mut game = session(instant_config());
        assert_eq!(
            game.configure_difficulty(4),
            Err(ReversiError::InvalidDifficulty(4))
        );
        game.configure_difficulty(2).unwrap();
        assert_eq!(game.config().difficulty, Difficulty::Greedy);

        game.propose_move(3, 2).unwrap();
        game.run_cpu_move().unwrap();
        game.reset();

        let state = game.state();
        assert_eq!(state.current_player, Some(Player::Black));
        assert_eq!((state.black_count, state.white_count), (2, 2));
        assert_eq!(state.last_move, None);
        assert_eq!(game.board().cell(3, 3), Ok(Cell::White));
        assert_eq!(game.config().difficulty, Difficulty::Greedy);
        assert_eq!(game.moves_played(Player::Black), 0);
    }

    #[test]
    fn cpu_playing_black_is_scheduled_from_the_start() {
        let config = SessionConfig {
            cpu_player: Player::Black,
            ..instant_config()
        };
        let mut game = session(config);

        assert!(game.cpu_due().is_some());
        assert_eq!(game.propose_move(3, 2), Err(ReversiError::NotYourTurn));
        let outcome = game.run_cpu_move().unwrap();
        assert_eq!(outcome.mover, Player::Black);
        assert!(game.propose_move(0, 0).is_err());
    }
}
