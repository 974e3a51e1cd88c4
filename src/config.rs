use serde::Deserialize;
use web_time::Duration;

use crate::ai::Difficulty;
use crate::types::Player;

const DEFAULT_CPU_DELAY_MS: u64 = 500;

/// Session settings. Deserializable from a partial JS object; missing fields
/// take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    pub difficulty: Difficulty,
    /// Side played by the CPU. The other side is the human.
    pub cpu_player: Player,
    /// Pause before the CPU answers, for pacing only.
    pub cpu_delay_ms: u64,
}

impl SessionConfig {
    pub fn human_player(&self) -> Player {
        self.cpu_player.opponent()
    }

    pub fn cpu_delay(&self) -> Duration {
        Duration::from_millis(self.cpu_delay_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            cpu_player: Player::White,
            cpu_delay_ms: DEFAULT_CPU_DELAY_MS,
        }
    }
}
