use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use proto::{PeerMsg, SignalC2S};

use crate::{DirectEvent, DirectLink, NetError, SignalingLink};

/// Records everything sent to the signalling server
#[derive(Clone, Default)]
pub struct MockSignaling {
    pub sent_messages: Rc<RefCell<Vec<Vec<u8>>>>,
}

impl MockSignaling {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decoded(&self) -> Vec<SignalC2S> {
        self.sent_messages
            .borrow()
            .iter()
            .map(|bytes| SignalC2S::from_bytes(bytes).unwrap())
            .collect()
    }

    pub fn game_messages(&self) -> Vec<PeerMsg> {
        self.decoded()
            .into_iter()
            .filter_map(|msg| match msg {
                SignalC2S::Game(msg) => Some(msg),
                _ => None,
            })
            .collect()
    }

    pub fn relay_signals(&self) -> Vec<Vec<u8>> {
        self.decoded()
            .into_iter()
            .filter_map(|msg| match msg {
                SignalC2S::RelaySignal { payload } => Some(payload),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.sent_messages.borrow_mut().clear();
    }
}

impl SignalingLink for MockSignaling {
    fn send_bytes(&self, bytes: &[u8]) -> Result<(), NetError> {
        self.sent_messages.borrow_mut().push(bytes.to_vec());
        Ok(())
    }
}

#[derive(Default)]
struct MockDirectState {
    started: Option<bool>,
    events: VecDeque<DirectEvent>,
    accepted: Vec<Vec<u8>>,
    sent: Vec<Vec<u8>>,
    closed: bool,
    fail_sends: bool,
}

/// Scriptable direct channel: tests push the events it reports
#[derive(Clone, Default)]
pub struct MockDirect {
    state: Rc<RefCell<MockDirectState>>,
}

impl MockDirect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_event(&self, event: DirectEvent) {
        self.state.borrow_mut().events.push_back(event);
    }

    pub fn started(&self) -> Option<bool> {
        self.state.borrow().started
    }

    pub fn accepted(&self) -> Vec<Vec<u8>> {
        self.state.borrow().accepted.clone()
    }

    pub fn sent_count(&self) -> usize {
        self.state.borrow().sent.len()
    }

    pub fn sent_messages(&self) -> Vec<PeerMsg> {
        self.state
            .borrow()
            .sent
            .iter()
            .map(|bytes| PeerMsg::from_bytes(bytes).unwrap())
            .collect()
    }

    pub fn is_closed(&self) -> bool {
        self.state.borrow().closed
    }

    pub fn fail_sends(&self) {
        self.state.borrow_mut().fail_sends = true;
    }
}

impl DirectLink for MockDirect {
    fn start(&mut self, initiator: bool) -> Result<(), NetError> {
        let mut state = self.state.borrow_mut();
        state.started = Some(initiator);
        state.closed = false;
        Ok(())
    }

    fn accept_signal(&mut self, payload: &[u8]) -> Result<(), NetError> {
        self.state.borrow_mut().accepted.push(payload.to_vec());
        Ok(())
    }

    fn send_bytes(&mut self, bytes: &[u8]) -> Result<(), NetError> {
        let mut state = self.state.borrow_mut();
        if state.fail_sends {
            return Err(NetError::Link("mock send failure".into()));
        }
        state.sent.push(bytes.to_vec());
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<DirectEvent> {
        self.state.borrow_mut().events.drain(..).collect()
    }

    fn close(&mut self) {
        let mut state = self.state.borrow_mut();
        state.closed = true;
        state.events.clear();
    }
}
