use game_core::ConfigError;
use proto::ProtoError;
use thiserror::Error;

use crate::SessionState;

#[derive(Debug, Error)]
pub enum NetError {
    #[error("invalid room code: {0:?}")]
    InvalidRoomCode(String),
    #[error("link error: {0}")]
    Link(String),
    #[error(transparent)]
    Proto(#[from] ProtoError),
    #[error("cannot {action} while {state:?}")]
    InvalidState {
        action: &'static str,
        state: SessionState,
    },
    #[error("link closed")]
    Closed,
    #[error(transparent)]
    Config(#[from] ConfigError),
}
