use game_core::Config;
use serde::{Deserialize, Serialize};

use crate::NetError;

/// Session tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetConfig {
    /// Ticks to wait for the direct channel before falling back to the relay
    pub negotiation_timeout_ticks: u32,
    pub max_room_code_len: usize,
    /// Court rules, only the host's copy drives the ball
    pub game: Config,
    pub seed: u64,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            negotiation_timeout_ticks: 300, // ~5 s at 60 Hz
            max_room_code_len: 16,
            game: Config::flat_court(),
            seed: 12345,
        }
    }
}

impl NetConfig {
    pub fn validate(&self) -> Result<(), NetError> {
        self.game.validate()?;
        Ok(())
    }
}
