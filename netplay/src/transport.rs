//! Direct channel with permanent relay fallback
//!
//! Game messages go over the direct channel once it is open. Until then, and
//! for the rest of the session after any direct failure, they go through the
//! signalling relay instead.

use proto::{PeerMsg, SignalC2S};

use crate::{DirectEvent, DirectLink, NetError, SignalingLink};

/// Which side of the session this participant is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Simulation authority and direct-channel initiator
    Host,
    Guest,
}

impl Role {
    pub fn side(self) -> game_core::Side {
        match self {
            Role::Host => game_core::Side::Near,
            Role::Guest => game_core::Side::Far,
        }
    }

    pub fn is_initiator(self) -> bool {
        self == Role::Host
    }
}

/// Channel currently carrying game messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportStatus {
    /// Signalling only, no match running
    Relay,
    Negotiating,
    Direct,
    /// Direct channel failed, relay for the rest of the session
    Fallback,
    Closed,
}

impl TransportStatus {
    pub fn label(self) -> &'static str {
        match self {
            TransportStatus::Relay => "Relay",
            TransportStatus::Negotiating => "Connecting...",
            TransportStatus::Direct => "Direct (P2P)",
            TransportStatus::Fallback => "Relay (fallback)",
            TransportStatus::Closed => "Disconnected",
        }
    }

    /// CSS colour for the status badge
    pub fn color(self) -> &'static str {
        match self {
            TransportStatus::Relay => "#3498db",
            TransportStatus::Negotiating => "#f1c40f",
            TransportStatus::Direct => "#2ecc71",
            TransportStatus::Fallback => "#e67e22",
            TransportStatus::Closed => "#95a5a6",
        }
    }
}

pub struct Transport<S, D> {
    signaling: S,
    direct: D,
    status: TransportStatus,
    fallen_back: bool,
    negotiation_ticks: u32,
    timeout_ticks: u32,
}

impl<S: SignalingLink, D: DirectLink> Transport<S, D> {
    pub fn new(signaling: S, direct: D, timeout_ticks: u32) -> Self {
        Self {
            signaling,
            direct,
            status: TransportStatus::Relay,
            fallen_back: false,
            negotiation_ticks: 0,
            timeout_ticks,
        }
    }

    pub fn status(&self) -> TransportStatus {
        self.status
    }

    pub fn has_fallen_back(&self) -> bool {
        self.fallen_back
    }

    /// Send a message to the signalling server
    pub fn signal(&self, msg: &SignalC2S) -> Result<(), NetError> {
        let bytes = msg.to_bytes()?;
        self.signaling.send_bytes(&bytes)
    }

    /// Begin a match: negotiate the direct channel unless we already gave up on it
    pub fn start(&mut self, role: Role) {
        if self.fallen_back {
            self.status = TransportStatus::Fallback;
            log::info!("[TRANSPORT] Staying on relay after earlier fallback");
            return;
        }

        self.status = TransportStatus::Negotiating;
        self.negotiation_ticks = 0;
        if let Err(e) = self.direct.start(role.is_initiator()) {
            self.fall_back(&format!("start failed: {e}"));
        }
    }

    /// Negotiation payload relayed from the other peer
    pub fn accept_signal(&mut self, payload: &[u8]) {
        if self.status != TransportStatus::Negotiating {
            log::debug!("[TRANSPORT] Ignoring negotiation payload in {:?}", self.status);
            return;
        }
        if let Err(e) = self.direct.accept_signal(payload) {
            self.fall_back(&format!("negotiation failed: {e}"));
        }
    }

    /// Advance negotiation and collect messages from the direct channel
    pub fn tick(&mut self) -> Vec<PeerMsg> {
        let mut received = Vec::new();
        if !matches!(
            self.status,
            TransportStatus::Negotiating | TransportStatus::Direct
        ) {
            return received;
        }

        for event in self.direct.poll_events() {
            match event {
                DirectEvent::Signal(payload) => {
                    if let Err(e) = self.signal(&SignalC2S::RelaySignal { payload }) {
                        log::warn!("[TRANSPORT] Could not relay negotiation payload: {e}");
                    }
                }
                DirectEvent::Open => {
                    if self.status == TransportStatus::Negotiating {
                        log::info!("[TRANSPORT] Direct channel open");
                        self.status = TransportStatus::Direct;
                    }
                }
                DirectEvent::Message(bytes) => match PeerMsg::from_bytes(&bytes) {
                    Ok(msg) => received.push(msg),
                    Err(e) => log::warn!("[TRANSPORT] Dropping direct message: {e}"),
                },
                DirectEvent::Error(reason) => {
                    self.fall_back(&reason);
                    break;
                }
                DirectEvent::Closed => {
                    self.fall_back("direct channel closed");
                    break;
                }
            }
        }

        if self.status == TransportStatus::Negotiating {
            self.negotiation_ticks += 1;
            if self.negotiation_ticks >= self.timeout_ticks {
                self.fall_back("negotiation timed out");
            }
        }

        received
    }

    /// Deliver a game message over the best available channel
    pub fn send(&mut self, msg: &PeerMsg) -> Result<(), NetError> {
        match self.status {
            TransportStatus::Closed => Err(NetError::Closed),
            TransportStatus::Direct => {
                let bytes = msg.to_bytes()?;
                match self.direct.send_bytes(&bytes) {
                    Ok(()) => Ok(()),
                    Err(e) => {
                        self.fall_back(&format!("send failed: {e}"));
                        self.signal(&SignalC2S::Game(msg.clone()))
                    }
                }
            }
            TransportStatus::Relay | TransportStatus::Negotiating | TransportStatus::Fallback => {
                self.signal(&SignalC2S::Game(msg.clone()))
            }
        }
    }

    /// Stop emitting and release the direct channel
    pub fn close(&mut self) {
        if self.status != TransportStatus::Closed {
            log::info!("[TRANSPORT] Closing ({:?})", self.status);
        }
        self.direct.close();
        self.status = TransportStatus::Closed;
    }

    /// Forget the fallback decision, for a brand new room
    pub fn reset(&mut self) {
        self.direct.close();
        self.fallen_back = false;
        self.negotiation_ticks = 0;
        self.status = TransportStatus::Relay;
    }

    fn fall_back(&mut self, reason: &str) {
        log::warn!("[TRANSPORT] Direct channel unusable ({reason}), falling back to relay");
        self.direct.close();
        self.fallen_back = true;
        self.status = TransportStatus::Fallback;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{MockDirect, MockSignaling};

    fn transport() -> (Transport<MockSignaling, MockDirect>, MockSignaling, MockDirect) {
        let signaling = MockSignaling::new();
        let direct = MockDirect::new();
        let transport = Transport::new(signaling.clone(), direct.clone(), 10);
        (transport, signaling, direct)
    }

    fn paddle() -> PeerMsg {
        PeerMsg::PaddleMove { side: 0, x: 1.0 }
    }

    #[test]
    fn test_relays_while_negotiating() {
        let (mut t, signaling, direct) = transport();
        t.start(Role::Host);
        assert_eq!(t.status(), TransportStatus::Negotiating);
        assert_eq!(direct.started(), Some(true));

        t.send(&paddle()).unwrap();
        assert_eq!(signaling.game_messages().len(), 1);
        assert_eq!(direct.sent_count(), 0);
    }

    #[test]
    fn test_switches_to_direct_when_open() {
        let (mut t, signaling, direct) = transport();
        t.start(Role::Guest);
        direct.push_event(DirectEvent::Signal(b"answer".to_vec()));
        direct.push_event(DirectEvent::Open);
        t.tick();

        assert_eq!(t.status(), TransportStatus::Direct);
        assert_eq!(signaling.relay_signals(), vec![b"answer".to_vec()]);

        t.send(&paddle()).unwrap();
        assert_eq!(direct.sent_messages(), vec![paddle()]);
        assert!(signaling.game_messages().is_empty());
    }

    #[test]
    fn test_error_falls_back_permanently() {
        let (mut t, signaling, direct) = transport();
        t.start(Role::Host);
        direct.push_event(DirectEvent::Open);
        t.tick();
        direct.push_event(DirectEvent::Error("ice failed".into()));
        t.tick();

        assert_eq!(t.status(), TransportStatus::Fallback);
        assert!(t.has_fallen_back());
        assert!(direct.is_closed());

        // A late Open does not re-promote
        direct.push_event(DirectEvent::Open);
        t.tick();
        assert_eq!(t.status(), TransportStatus::Fallback);

        t.send(&paddle()).unwrap();
        assert_eq!(signaling.game_messages().len(), 1);

        // Nor does a new match
        t.close();
        t.start(Role::Host);
        assert_eq!(t.status(), TransportStatus::Fallback);
    }

    #[test]
    fn test_failed_send_falls_back_and_still_delivers() {
        let (mut t, signaling, direct) = transport();
        t.start(Role::Host);
        direct.push_event(DirectEvent::Open);
        t.tick();
        direct.fail_sends();

        t.send(&paddle()).unwrap();
        assert_eq!(t.status(), TransportStatus::Fallback);
        assert_eq!(signaling.game_messages(), vec![paddle()]);
    }

    #[test]
    fn test_reset_forgets_fallback() {
        let (mut t, _signaling, direct) = transport();
        t.start(Role::Host);
        direct.push_event(DirectEvent::Closed);
        t.tick();
        assert!(t.has_fallen_back());

        t.reset();
        assert!(!t.has_fallen_back());
        assert_eq!(t.status(), TransportStatus::Relay);
        t.start(Role::Host);
        assert_eq!(t.status(), TransportStatus::Negotiating);
    }

    #[test]
    fn test_negotiation_timeout() {
        let (mut t, _signaling, _direct) = transport();
        t.start(Role::Host);
        for _ in 0..9 {
            t.tick();
            assert_eq!(t.status(), TransportStatus::Negotiating);
        }
        t.tick();
        assert_eq!(t.status(), TransportStatus::Fallback);
    }

    #[test]
    fn test_malformed_direct_message_dropped() {
        let (mut t, _signaling, direct) = transport();
        t.start(Role::Host);
        direct.push_event(DirectEvent::Open);
        direct.push_event(DirectEvent::Message(vec![0xff, 0xff]));
        direct.push_event(DirectEvent::Message(paddle().to_bytes().unwrap()));

        let received = t.tick();
        assert_eq!(received, vec![paddle()]);
        assert_eq!(t.status(), TransportStatus::Direct);
    }

    #[test]
    fn test_closed_refuses_to_send() {
        let (mut t, _signaling, direct) = transport();
        t.start(Role::Host);
        t.close();
        assert!(direct.is_closed());
        assert!(matches!(t.send(&paddle()), Err(NetError::Closed)));
    }

    #[test]
    fn test_status_labels_differ() {
        let all = [
            TransportStatus::Relay,
            TransportStatus::Negotiating,
            TransportStatus::Direct,
            TransportStatus::Fallback,
            TransportStatus::Closed,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.label(), b.label());
                assert_ne!(a.color(), b.color());
            }
        }
    }
}
