use wasm_bindgen::prelude::*;

pub mod ai;
pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod moves;
pub mod turn;
pub mod types;
pub mod wasm;

pub use config::SessionConfig;
pub use error::ReversiError;
pub use game::{GameSession, MoveOutcome, Signal};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
