//! Seams to the networking collaborators
//!
//! The signalling server connection and the direct peer channel are owned
//! by the embedding application. The session only needs to push bytes into
//! them and poll what they produced.

use crate::NetError;

/// Connection to the signalling server, which doubles as the relay
pub trait SignalingLink {
    fn send_bytes(&self, bytes: &[u8]) -> Result<(), NetError>;
}

/// Something the direct channel reported since the last poll
#[derive(Debug, Clone, PartialEq)]
pub enum DirectEvent {
    /// Negotiation payload that must reach the other peer via the relay
    Signal(Vec<u8>),
    /// Channel is usable
    Open,
    Message(Vec<u8>),
    Error(String),
    Closed,
}

/// Low-latency peer channel
pub trait DirectLink {
    /// Begin negotiation; the initiator produces the first payload
    fn start(&mut self, initiator: bool) -> Result<(), NetError>;

    /// Feed a negotiation payload that arrived from the other peer
    fn accept_signal(&mut self, payload: &[u8]) -> Result<(), NetError>;

    fn send_bytes(&mut self, bytes: &[u8]) -> Result<(), NetError>;

    fn poll_events(&mut self) -> Vec<DirectEvent>;

    /// Release the channel; no events are produced afterwards
    fn close(&mut self);
}
