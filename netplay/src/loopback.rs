//! In-memory collaborators
//!
//! [`RelayHub`] stands in for the signalling server and [`direct_pair`] for
//! the direct peer channel, so two sessions can play each other inside one
//! process. The direct pair can be told to fail during setup, break mid-match
//! or never answer.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use proto::{SignalC2S, SignalS2C};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::room::{generate_room_code, normalize_room_code, ROOM_CODE_LEN};
use crate::{DirectEvent, DirectLink, NetError, SignalingLink};

// ============================================================================
// Relay hub
// ============================================================================

#[derive(Default)]
struct ClientSlot {
    inbound: VecDeque<Vec<u8>>,
    room: Option<String>,
    connected: bool,
}

#[derive(Default)]
struct Room {
    members: [Option<usize>; 2], // host, guest
    ready: [bool; 2],
    started: bool,
}

impl Room {
    fn slot_of(&self, client: usize) -> Option<usize> {
        self.members.iter().position(|m| *m == Some(client))
    }

    fn other(&self, client: usize) -> Option<usize> {
        self.members.iter().flatten().copied().find(|m| *m != client)
    }
}

struct HubState {
    rng: StdRng,
    clients: Vec<ClientSlot>,
    rooms: HashMap<String, Room>,
    relayed_game_messages: usize,
}

impl HubState {
    fn send(&mut self, client: usize, msg: &SignalS2C) {
        match msg.to_bytes() {
            Ok(bytes) => {
                if let Some(slot) = self.clients.get_mut(client) {
                    if slot.connected {
                        slot.inbound.push_back(bytes);
                    }
                }
            }
            Err(e) => log::warn!("[HUB] Failed to encode {msg:?}: {e}"),
        }
    }

    fn room_of(&self, client: usize) -> Option<String> {
        self.clients.get(client).and_then(|slot| slot.room.clone())
    }

    fn handle(&mut self, client: usize, msg: SignalC2S) {
        match msg {
            SignalC2S::CreateRoom => {
                if self.room_of(client).is_some() {
                    log::warn!("[HUB] Client {client} already in a room");
                    return;
                }
                let code = loop {
                    let code = generate_room_code(&mut self.rng);
                    if !self.rooms.contains_key(&code) {
                        break code;
                    }
                };
                let room = Room {
                    members: [Some(client), None],
                    ..Room::default()
                };
                self.rooms.insert(code.clone(), room);
                self.clients[client].room = Some(code.clone());
                log::info!("[HUB] Room {code} created by client {client}");
                self.send(client, &SignalS2C::RoomCreated { code });
            }
            SignalC2S::JoinRoom { code } => {
                if self.room_of(client).is_some() {
                    let reason = "already in a room".to_string();
                    self.send(client, &SignalS2C::JoinError { reason });
                    return;
                }
                let code = match normalize_room_code(&code, ROOM_CODE_LEN) {
                    Ok(code) => code,
                    Err(_) => {
                        let reason = "invalid room code".to_string();
                        self.send(client, &SignalS2C::JoinError { reason });
                        return;
                    }
                };
                let joined = match self.rooms.get_mut(&code) {
                    None => Err("room not found"),
                    Some(room) if room.members[1].is_some() => Err("room is full"),
                    Some(room) => {
                        room.members[1] = Some(client);
                        Ok(room.members[0])
                    }
                };
                let host = match joined {
                    Ok(host) => host,
                    Err(reason) => {
                        let reason = reason.to_string();
                        self.send(client, &SignalS2C::JoinError { reason });
                        return;
                    }
                };
                self.clients[client].room = Some(code.clone());
                log::info!("[HUB] Client {client} joined room {code}");
                self.send(client, &SignalS2C::JoinOk { code });
                if let Some(host) = host {
                    self.send(host, &SignalS2C::PeerJoined);
                }
            }
            SignalC2S::Ready => {
                let Some(code) = self.room_of(client) else {
                    return;
                };
                let Some(room) = self.rooms.get_mut(&code) else {
                    return;
                };
                if let Some(slot) = room.slot_of(client) {
                    room.ready[slot] = true;
                }
                let full = room.members.iter().all(Option::is_some);
                if full && room.ready == [true, true] && !room.started {
                    room.started = true;
                    let members: Vec<usize> = room.members.iter().flatten().copied().collect();
                    log::info!("[HUB] Room {code} starting");
                    for member in members {
                        self.send(member, &SignalS2C::GameStart);
                    }
                }
            }
            SignalC2S::RelaySignal { payload } => {
                if let Some(other) = self.other_member(client) {
                    self.send(other, &SignalS2C::RelaySignal { payload });
                }
            }
            SignalC2S::Game(msg) => {
                if let Some(other) = self.other_member(client) {
                    self.relayed_game_messages += 1;
                    self.send(other, &SignalS2C::Game(msg));
                }
            }
            SignalC2S::RestartGame => {
                let Some(code) = self.room_of(client) else {
                    return;
                };
                let Some(room) = self.rooms.get_mut(&code) else {
                    return;
                };
                // A second restart request for the same rematch is dropped
                if !room.started {
                    return;
                }
                room.started = false;
                room.ready = [false, false];
                if let Some(other) = room.other(client) {
                    self.send(other, &SignalS2C::RestartGame);
                }
            }
            SignalC2S::LeaveRoom => self.leave(client),
        }
    }

    fn other_member(&self, client: usize) -> Option<usize> {
        let code = self.room_of(client)?;
        self.rooms.get(&code)?.other(client)
    }

    fn leave(&mut self, client: usize) {
        let Some(code) = self.room_of(client) else {
            return;
        };
        self.clients[client].room = None;

        let Some(room) = self.rooms.get_mut(&code) else {
            return;
        };
        if let Some(slot) = room.slot_of(client) {
            room.members[slot] = None;
        }
        room.ready = [false, false];
        room.started = false;

        let other = room.other(client);
        let empty = room.members.iter().all(Option::is_none);
        if empty {
            self.rooms.remove(&code);
        }
        log::info!("[HUB] Client {client} left room {code}");
        if let Some(other) = other {
            self.send(other, &SignalS2C::PeerLeft);
        }
    }
}

/// Signalling server and relay for any number of in-process clients
#[derive(Clone)]
pub struct RelayHub {
    state: Rc<RefCell<HubState>>,
}

impl RelayHub {
    pub fn new(seed: u64) -> Self {
        Self {
            state: Rc::new(RefCell::new(HubState {
                rng: StdRng::seed_from_u64(seed),
                clients: Vec::new(),
                rooms: HashMap::new(),
                relayed_game_messages: 0,
            })),
        }
    }

    /// Open a new client connection
    pub fn connect(&self) -> HubLink {
        let mut state = self.state.borrow_mut();
        state.clients.push(ClientSlot {
            connected: true,
            ..ClientSlot::default()
        });
        HubLink {
            state: Rc::clone(&self.state),
            id: state.clients.len() - 1,
        }
    }

    pub fn room_count(&self) -> usize {
        self.state.borrow().rooms.len()
    }

    /// Game messages forwarded so far
    pub fn relayed_game_messages(&self) -> usize {
        self.state.borrow().relayed_game_messages
    }
}

/// One client's connection to the [`RelayHub`]
#[derive(Clone)]
pub struct HubLink {
    state: Rc<RefCell<HubState>>,
    id: usize,
}

impl HubLink {
    /// Bytes the hub sent to this client since the last call
    pub fn take_inbound(&self) -> Vec<Vec<u8>> {
        let mut state = self.state.borrow_mut();
        match state.clients.get_mut(self.id) {
            Some(slot) => slot.inbound.drain(..).collect(),
            None => Vec::new(),
        }
    }

    /// Drop the connection as if the socket died
    pub fn disconnect(&self) {
        let mut state = self.state.borrow_mut();
        state.leave(self.id);
        if let Some(slot) = state.clients.get_mut(self.id) {
            slot.connected = false;
            slot.inbound.clear();
        }
    }
}

impl SignalingLink for HubLink {
    fn send_bytes(&self, bytes: &[u8]) -> Result<(), NetError> {
        let mut state = self.state.borrow_mut();
        let connected = state
            .clients
            .get(self.id)
            .map(|slot| slot.connected)
            .unwrap_or(false);
        if !connected {
            return Err(NetError::Closed);
        }

        match SignalC2S::from_bytes(bytes) {
            Ok(msg) => state.handle(self.id, msg),
            Err(e) => log::warn!("[HUB] Dropping message from client {}: {e}", self.id),
        }
        Ok(())
    }
}

// ============================================================================
// Direct channel pair
// ============================================================================

const OFFER: &[u8] = b"offer";
const ANSWER: &[u8] = b"answer";

/// Failure to inject into a [`direct_pair`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectFault {
    None,
    /// Negotiation errors out on both ends
    FailSetup,
    /// The responder never answers, so the initiator waits for its timeout
    Silent,
}

struct PairState {
    fault: DirectFault,
    open: [bool; 2],
    closed: [bool; 2],
    events: [VecDeque<DirectEvent>; 2],
    broken: bool,
    delivered: usize,
}

impl PairState {
    fn open_both(&mut self) {
        self.open = [true, true];
        for queue in &mut self.events {
            queue.push_back(DirectEvent::Open);
        }
    }
}

/// One end of an in-memory direct channel
pub struct LoopbackDirect {
    state: Rc<RefCell<PairState>>,
    end: usize,
}

/// Test handle for a [`direct_pair`]
#[derive(Clone)]
pub struct DirectControl {
    state: Rc<RefCell<PairState>>,
}

impl DirectControl {
    /// Fail the channel now; both ends see an error
    pub fn break_link(&self) {
        let mut state = self.state.borrow_mut();
        state.broken = true;
        state.open = [false, false];
        for queue in &mut state.events {
            queue.push_back(DirectEvent::Error("direct channel lost".into()));
        }
    }

    /// Messages carried end to end so far
    pub fn delivered(&self) -> usize {
        self.state.borrow().delivered
    }

    pub fn is_open(&self) -> bool {
        self.state.borrow().open == [true, true]
    }
}

/// Two connected ends plus a control handle; end 0 is meant for the host
pub fn direct_pair(fault: DirectFault) -> (LoopbackDirect, LoopbackDirect, DirectControl) {
    let state = Rc::new(RefCell::new(PairState {
        fault,
        open: [false, false],
        closed: [false, false],
        events: [VecDeque::new(), VecDeque::new()],
        broken: false,
        delivered: 0,
    }));
    (
        LoopbackDirect {
            state: Rc::clone(&state),
            end: 0,
        },
        LoopbackDirect {
            state: Rc::clone(&state),
            end: 1,
        },
        DirectControl { state },
    )
}

impl DirectLink for LoopbackDirect {
    fn start(&mut self, initiator: bool) -> Result<(), NetError> {
        let mut state = self.state.borrow_mut();
        let me = self.end;
        state.events[me].clear();
        state.open[me] = false;
        state.closed[me] = false;

        if state.broken || state.fault == DirectFault::FailSetup {
            state.events[me].push_back(DirectEvent::Error("negotiation failed".into()));
        } else if initiator {
            state.events[me].push_back(DirectEvent::Signal(OFFER.to_vec()));
        }
        Ok(())
    }

    fn accept_signal(&mut self, payload: &[u8]) -> Result<(), NetError> {
        let mut state = self.state.borrow_mut();
        let me = self.end;
        if state.closed[me] {
            return Err(NetError::Closed);
        }

        if payload == OFFER {
            if state.fault != DirectFault::Silent {
                state.events[me].push_back(DirectEvent::Signal(ANSWER.to_vec()));
            }
            Ok(())
        } else if payload == ANSWER {
            state.open_both();
            Ok(())
        } else {
            Err(NetError::Link("unknown negotiation payload".into()))
        }
    }

    fn send_bytes(&mut self, bytes: &[u8]) -> Result<(), NetError> {
        let mut state = self.state.borrow_mut();
        let me = self.end;
        let peer = 1 - me;
        if state.broken {
            return Err(NetError::Link("direct channel lost".into()));
        }
        if !state.open[me] || state.closed[me] {
            return Err(NetError::Closed);
        }
        if state.closed[peer] {
            return Err(NetError::Link("peer closed the channel".into()));
        }
        state.events[peer].push_back(DirectEvent::Message(bytes.to_vec()));
        state.delivered += 1;
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<DirectEvent> {
        let mut state = self.state.borrow_mut();
        if state.closed[self.end] {
            return Vec::new();
        }
        state.events[self.end].drain(..).collect()
    }

    fn close(&mut self) {
        let mut state = self.state.borrow_mut();
        let me = self.end;
        state.closed[me] = true;
        state.open[me] = false;
        state.events[me].clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proto::PeerMsg;

    fn decode(link: &HubLink) -> Vec<SignalS2C> {
        link.take_inbound()
            .iter()
            .map(|bytes| SignalS2C::from_bytes(bytes).unwrap())
            .collect()
    }

    fn send(link: &HubLink, msg: SignalC2S) {
        link.send_bytes(&msg.to_bytes().unwrap()).unwrap();
    }

    fn room_code(msgs: &[SignalS2C]) -> String {
        msgs.iter()
            .find_map(|m| match m {
                SignalS2C::RoomCreated { code } => Some(code.clone()),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_create_join_ready_start() {
        let hub = RelayHub::new(1);
        let host = hub.connect();
        let guest = hub.connect();

        send(&host, SignalC2S::CreateRoom);
        let code = room_code(&decode(&host));
        assert_eq!(hub.room_count(), 1);

        send(&guest, SignalC2S::JoinRoom { code: code.to_lowercase() });
        assert_eq!(decode(&guest), vec![SignalS2C::JoinOk { code: code.clone() }]);
        assert_eq!(decode(&host), vec![SignalS2C::PeerJoined]);

        send(&host, SignalC2S::Ready);
        assert!(decode(&guest).is_empty(), "Waits for both");
        send(&guest, SignalC2S::Ready);
        assert_eq!(decode(&host), vec![SignalS2C::GameStart]);
        assert_eq!(decode(&guest), vec![SignalS2C::GameStart]);
    }

    #[test]
    fn test_unknown_and_full_rooms() {
        let hub = RelayHub::new(2);
        let host = hub.connect();
        let guest = hub.connect();
        let third = hub.connect();

        send(&guest, SignalC2S::JoinRoom { code: "NOPE1".into() });
        assert!(matches!(decode(&guest)[0], SignalS2C::JoinError { .. }));

        send(&host, SignalC2S::CreateRoom);
        let code = room_code(&decode(&host));
        send(&guest, SignalC2S::JoinRoom { code: code.clone() });
        send(&third, SignalC2S::JoinRoom { code });
        assert_eq!(
            decode(&third),
            vec![SignalS2C::JoinError {
                reason: "room is full".into()
            }]
        );
    }

    #[test]
    fn test_cannot_join_while_in_a_room() {
        let hub = RelayHub::new(5);
        let host = hub.connect();
        let guest = hub.connect();
        send(&host, SignalC2S::CreateRoom);
        let code = room_code(&decode(&host));

        send(&host, SignalC2S::JoinRoom { code: code.clone() });
        assert_eq!(
            decode(&host),
            vec![SignalS2C::JoinError {
                reason: "already in a room".into()
            }]
        );

        // The guest slot is still free
        send(&guest, SignalC2S::JoinRoom { code: code.clone() });
        assert_eq!(decode(&guest), vec![SignalS2C::JoinOk { code }]);
    }

    #[test]
    fn test_relays_game_messages_to_other_member() {
        let hub = RelayHub::new(3);
        let host = hub.connect();
        let guest = hub.connect();
        send(&host, SignalC2S::CreateRoom);
        let code = room_code(&decode(&host));
        send(&guest, SignalC2S::JoinRoom { code });
        decode(&host);
        decode(&guest);

        let msg = PeerMsg::PaddleMove { side: 0, x: 1.0 };
        send(&host, SignalC2S::Game(msg.clone()));
        assert_eq!(decode(&guest), vec![SignalS2C::Game(msg)]);
        assert!(decode(&host).is_empty(), "Not echoed back");
        assert_eq!(hub.relayed_game_messages(), 1);
    }

    #[test]
    fn test_disconnect_notifies_peer() {
        let hub = RelayHub::new(4);
        let host = hub.connect();
        let guest = hub.connect();
        send(&host, SignalC2S::CreateRoom);
        let code = room_code(&decode(&host));
        send(&guest, SignalC2S::JoinRoom { code });
        decode(&host);

        guest.disconnect();
        assert_eq!(decode(&host), vec![SignalS2C::PeerLeft]);
        assert!(matches!(
            guest.send_bytes(&SignalC2S::Ready.to_bytes().unwrap()),
            Err(NetError::Closed)
        ));
    }

    #[test]
    fn test_direct_pair_negotiates() {
        let (mut a, mut b, control) = direct_pair(DirectFault::None);
        a.start(true).unwrap();
        b.start(false).unwrap();

        let offer = a.poll_events();
        assert_eq!(offer, vec![DirectEvent::Signal(OFFER.to_vec())]);
        b.accept_signal(OFFER).unwrap();
        assert_eq!(b.poll_events(), vec![DirectEvent::Signal(ANSWER.to_vec())]);
        a.accept_signal(ANSWER).unwrap();

        assert!(control.is_open());
        assert_eq!(a.poll_events(), vec![DirectEvent::Open]);
        assert_eq!(b.poll_events(), vec![DirectEvent::Open]);

        a.send_bytes(b"hi").unwrap();
        assert_eq!(b.poll_events(), vec![DirectEvent::Message(b"hi".to_vec())]);
        assert_eq!(control.delivered(), 1);
    }

    #[test]
    fn test_break_link_errors_both_ends() {
        let (mut a, mut b, control) = direct_pair(DirectFault::None);
        a.start(true).unwrap();
        b.start(false).unwrap();
        b.accept_signal(OFFER).unwrap();
        a.accept_signal(ANSWER).unwrap();
        a.poll_events();
        b.poll_events();

        control.break_link();
        assert!(matches!(a.poll_events()[0], DirectEvent::Error(_)));
        assert!(matches!(b.poll_events()[0], DirectEvent::Error(_)));
        assert!(a.send_bytes(b"x").is_err());
    }

    #[test]
    fn test_faults() {
        let (mut a, _b, _control) = direct_pair(DirectFault::FailSetup);
        a.start(true).unwrap();
        assert!(matches!(a.poll_events()[0], DirectEvent::Error(_)));

        let (mut a, mut b, control) = direct_pair(DirectFault::Silent);
        a.start(true).unwrap();
        b.start(false).unwrap();
        b.accept_signal(OFFER).unwrap();
        assert!(b.poll_events().is_empty(), "Silent responder never answers");
        assert!(!control.is_open());
    }
}
