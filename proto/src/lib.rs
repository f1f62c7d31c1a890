//! Network protocol for the tennis court
//!
//! Uses postcard for compact binary serialization. Every decoded message is
//! validated before it is handed to the game, so a malformed payload never
//! reaches the simulation.

use postcard::{from_bytes, to_allocvec};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtoError {
    #[error("failed to decode message: {0}")]
    Decode(#[source] postcard::Error),
    #[error("failed to encode message: {0}")]
    Encode(#[source] postcard::Error),
    #[error("invalid message: {0}")]
    Invalid(&'static str),
}

/// Ball snapshot on the wire
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallState {
    pub pos: [f32; 3],
    pub vel: [f32; 3],
    pub in_play: bool,
}

impl BallState {
    fn validate(&self) -> Result<(), ProtoError> {
        if self.pos.iter().chain(&self.vel).all(|v| v.is_finite()) {
            Ok(())
        } else {
            Err(ProtoError::Invalid("non-finite ball coordinate"))
        }
    }
}

// ============================================================================
// Peer messages (direct channel, also carried through the relay)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PeerMsg {
    /// Lateral paddle position, side 0 = near, 1 = far
    PaddleMove { side: u8, x: f32 },

    /// Authoritative ball and score, score is [near, far]
    BallUpdate { ball: BallState, score: [u8; 2] },

    /// Ask the authority for a fresh BallUpdate
    RequestBallUpdate,

    /// Match finished, winner 0 = near, 1 = far
    GameOver { winner: u8 },
}

impl PeerMsg {
    pub fn validate(&self) -> Result<(), ProtoError> {
        match self {
            PeerMsg::PaddleMove { side, x } => {
                validate_side(*side)?;
                if !x.is_finite() {
                    return Err(ProtoError::Invalid("non-finite paddle coordinate"));
                }
                Ok(())
            }
            PeerMsg::BallUpdate { ball, .. } => ball.validate(),
            PeerMsg::RequestBallUpdate => Ok(()),
            PeerMsg::GameOver { winner } => validate_side(*winner),
        }
    }
}

fn validate_side(side: u8) -> Result<(), ProtoError> {
    if side <= 1 {
        Ok(())
    } else {
        Err(ProtoError::Invalid("side out of range"))
    }
}

// ============================================================================
// Signalling messages (client to relay)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SignalC2S {
    CreateRoom,
    JoinRoom { code: String },
    Ready,
    /// Opaque direct-channel negotiation payload for the other peer
    RelaySignal { payload: Vec<u8> },
    /// Game message to forward to the other peer
    Game(PeerMsg),
    RestartGame,
    LeaveRoom,
}

impl SignalC2S {
    pub fn validate(&self) -> Result<(), ProtoError> {
        match self {
            SignalC2S::Game(msg) => msg.validate(),
            SignalC2S::JoinRoom { code } if code.is_empty() => {
                Err(ProtoError::Invalid("empty room code"))
            }
            _ => Ok(()),
        }
    }
}

// ============================================================================
// Signalling messages (relay to client)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SignalS2C {
    RoomCreated { code: String },
    JoinOk { code: String },
    JoinError { reason: String },
    PeerJoined,
    PeerLeft,
    /// Both players are ready
    GameStart,
    RelaySignal { payload: Vec<u8> },
    Game(PeerMsg),
    RestartGame,
}

impl SignalS2C {
    pub fn validate(&self) -> Result<(), ProtoError> {
        match self {
            SignalS2C::Game(msg) => msg.validate(),
            _ => Ok(()),
        }
    }
}

// ============================================================================
// Serialization Helpers
// ============================================================================

macro_rules! wire_codec {
    ($($ty:ty),*) => {$(
        impl $ty {
            /// Serialize message to bytes
            pub fn to_bytes(&self) -> Result<Vec<u8>, ProtoError> {
                to_allocvec(self).map_err(ProtoError::Encode)
            }

            /// Deserialize and validate a message
            pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtoError> {
                let msg: Self = from_bytes(bytes).map_err(ProtoError::Decode)?;
                msg.validate()?;
                Ok(msg)
            }
        }
    )*};
}

wire_codec!(PeerMsg, SignalC2S, SignalS2C);
