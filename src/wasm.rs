//! JS-facing wrapper around [`GameSession`].
//!
//! The host redraws from `getState()` after every call. When the returned state
//! has `cpuPending` set, the host waits `cpuDelayMs()` and calls `runCpuMove()`.
//! Pass and game-over notifications are queued and handed out once by
//! `takeSignals()`.

use wasm_bindgen::prelude::*;

use crate::config::SessionConfig;
use crate::game::{GameSession, MoveOutcome, Signal};
use crate::types::Player;

#[wasm_bindgen]
pub struct WasmGame {
    session: GameSession,
    signals: Vec<Signal>,
}

#[wasm_bindgen]
impl WasmGame {
    /// `config` may be `undefined` or a partial `{ difficulty, cpuPlayer, cpuDelayMs }`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmGame, JsError> {
        console_error_panic_hook::set_once();

        let config: SessionConfig = if config.is_undefined() || config.is_null() {
            SessionConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };

        Ok(WasmGame {
            session: GameSession::new(config),
            signals: Vec::new(),
        })
    }

    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.session.state())?)
    }

    /// Plays a human move and returns the new state.
    #[wasm_bindgen(js_name = proposeMove)]
    pub fn propose_move(&mut self, col: u8, row: u8) -> Result<JsValue, JsError> {
        let outcome = self.session.propose_move(col, row)?;
        self.record(outcome);
        self.get_state()
    }

    /// Plays the pending CPU move and returns the new state.
    #[wasm_bindgen(js_name = runCpuMove)]
    pub fn run_cpu_move(&mut self) -> Result<JsValue, JsError> {
        let outcome = self.session.run_cpu_move()?;
        self.record(outcome);
        self.get_state()
    }

    /// `player` is 1 for black, 2 for white. Returns `[{ col, row }, ...]`.
    #[wasm_bindgen(js_name = legalMoves)]
    pub fn legal_moves(&self, player: u8) -> Result<JsValue, JsError> {
        let player = match player {
            1 => Player::Black,
            2 => Player::White,
            _ => return Err(JsError::new(&format!("invalid player value: {player}"))),
        };
        Ok(serde_wasm_bindgen::to_value(
            &self.session.legal_moves(player),
        )?)
    }

    #[wasm_bindgen(js_name = configureDifficulty)]
    pub fn configure_difficulty(&mut self, level: u8) -> Result<(), JsError> {
        self.session.configure_difficulty(level)?;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.session.reset();
        self.signals.clear();
    }

    #[wasm_bindgen(js_name = cpuDelayMs)]
    pub fn cpu_delay_ms(&self) -> u32 {
        u32::try_from(self.session.config().cpu_delay_ms).unwrap_or(u32::MAX)
    }

    #[wasm_bindgen(js_name = isCpuPending)]
    pub fn is_cpu_pending(&self) -> bool {
        self.session.cpu_due().is_some()
    }

    /// Drains queued notifications, e.g. `[{ kind: "pass", skipped: "white" }]`.
    #[wasm_bindgen(js_name = takeSignals)]
    pub fn take_signals(&mut self) -> Result<JsValue, JsError> {
        let signals = std::mem::take(&mut self.signals);
        Ok(serde_wasm_bindgen::to_value(&signals)?)
    }

    #[wasm_bindgen(js_name = getResult)]
    pub fn get_result(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.session.result())?)
    }
}

impl WasmGame {
    fn record(&mut self, outcome: MoveOutcome) {
        self.signals.extend(outcome.signal);
    }
}
