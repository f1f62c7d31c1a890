//! Two-player sessions over a signalling relay with an optional direct channel
//!
//! A [`NetSession`] walks the room lifecycle (create or join, ready, play,
//! rematch, leave) and keeps one [`game_core::Match`] in step with the other
//! participant. The host simulates; the guest mirrors. Traffic goes through a
//! [`Transport`] that prefers a direct channel and drops to the relay for good
//! once that channel fails.
//!
//! The signalling server and the direct channel are traits, so the session
//! runs unchanged against [`loopback`] stand-ins or real sockets.

pub mod config;
pub mod error;
pub mod fsm;
pub mod link;
pub mod loopback;
pub mod room;
pub mod session;
pub mod snapshot;
pub mod transport;

pub use config::*;
pub use error::*;
pub use fsm::*;
pub use link::*;
pub use room::{generate_room_code, normalize_room_code, ROOM_CODE_LEN};
pub use session::*;
pub use transport::*;

#[cfg(test)]
mod tests;
