//! Networked match session
//!
//! The host runs the ball and the score and streams them every tick; the
//! guest only moves its own paddle and applies whatever the host last sent.
//! Both sides send their own paddle every tick and overwrite the other one
//! from the latest message.

use std::collections::VecDeque;

use game_core::{FrameView, Match, Opponent, PaddleCommand, RemotePaddle, Score, ServeMode, Side};
use proto::{PeerMsg, SignalC2S, SignalS2C};

use crate::room::normalize_room_code;
use crate::snapshot::{ball_from_wire, ball_to_wire, score_from_wire, score_to_wire};
use crate::{
    DirectLink, NetConfig, NetError, Role, SessionAction, SessionFsm, SessionState,
    SignalingLink, Transport, TransportStatus,
};

/// How a match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Winner(Side),
    /// The other participant disconnected before a winner was decided
    OpponentLeft,
}

pub struct NetSession<S, D> {
    fsm: SessionFsm,
    config: NetConfig,
    transport: Transport<S, D>,
    game: Match,
    opponent: Opponent,
    role: Option<Role>,
    room: Option<String>,
    inbox: VecDeque<SignalS2C>,
    outcome: Option<Outcome>,
    last_error: Option<String>,
    peer_present: bool,
    ball_synced: bool,
}

impl<S: SignalingLink, D: DirectLink> NetSession<S, D> {
    pub fn new(signaling: S, direct: D, config: NetConfig) -> Result<Self, NetError> {
        config.validate()?;
        let transport = Transport::new(signaling, direct, config.negotiation_timeout_ticks);
        // Both serves are automatic: there is no serve message to relay a key press
        let game = Match::new(config.game.clone(), config.seed, [ServeMode::Auto; 2]);

        Ok(Self {
            fsm: SessionFsm::new(),
            config,
            transport,
            game,
            opponent: Opponent::Remote(RemotePaddle::new(Side::Far)),
            role: None,
            room: None,
            inbox: VecDeque::new(),
            outcome: None,
            last_error: None,
            peer_present: false,
            ball_synced: false,
        })
    }

    // ------------------------------------------------------------------
    // Local actions
    // ------------------------------------------------------------------

    pub fn create_room(&mut self) -> Result<(), NetError> {
        self.require(SessionState::Menu, "create a room")?;
        self.transport.signal(&SignalC2S::CreateRoom)?;
        self.role = Some(Role::Host);
        self.last_error = None;
        log::info!("[SESSION] Creating room as host");
        Ok(())
    }

    pub fn join_room(&mut self, code: &str) -> Result<(), NetError> {
        self.require(SessionState::Menu, "join a room")?;
        let code = normalize_room_code(code, self.config.max_room_code_len)?;
        self.transport.signal(&SignalC2S::JoinRoom { code: code.clone() })?;
        self.role = Some(Role::Guest);
        self.last_error = None;
        log::info!("[SESSION] Joining room {code} as guest");
        Ok(())
    }

    pub fn ready(&mut self) -> Result<(), NetError> {
        self.require(SessionState::Waiting, "get ready")?;
        self.transport.signal(&SignalC2S::Ready)
    }

    /// Rematch in the same room; both players have to be ready again
    pub fn restart(&mut self) -> Result<(), NetError> {
        self.require(SessionState::Ended, "restart")?;
        if !self.peer_present || self.outcome == Some(Outcome::OpponentLeft) {
            return Err(NetError::InvalidState {
                action: "restart without an opponent",
                state: self.state(),
            });
        }
        self.transport.signal(&SignalC2S::RestartGame)?;
        self.fsm.transition(SessionAction::Restart);
        self.prepare_rematch();
        Ok(())
    }

    pub fn leave(&mut self) -> Result<(), NetError> {
        let result = if self.fsm.in_room() || self.role.is_some() {
            self.transport.signal(&SignalC2S::LeaveRoom)
        } else {
            Ok(())
        };

        self.transport.reset();
        self.fsm.reset();
        self.role = None;
        self.room = None;
        self.inbox.clear();
        self.outcome = None;
        self.peer_present = false;
        self.ball_synced = false;
        log::info!("[SESSION] Left room");
        result
    }

    // ------------------------------------------------------------------
    // Inbound traffic
    // ------------------------------------------------------------------

    /// Queue raw bytes from the signalling server for the next tick
    pub fn receive_signal_bytes(&mut self, bytes: &[u8]) {
        match SignalS2C::from_bytes(bytes) {
            Ok(msg) => self.inbox.push_back(msg),
            Err(e) => log::warn!("[SESSION] Dropping signalling message: {e}"),
        }
    }

    /// Process queued traffic, then run one frame of `dt` seconds
    pub fn tick(&mut self, dt: f32, command: PaddleCommand) {
        while let Some(msg) = self.inbox.pop_front() {
            self.handle_signal(msg);
        }
        for msg in self.transport.tick() {
            self.handle_peer_msg(msg);
        }

        if !self.fsm.is_active() {
            return;
        }
        let Some(role) = self.role else {
            return;
        };
        let local = role.side();

        self.game.command(local, PaddleCommand::new(command.dir, false));
        self.opponent.drive(&mut self.game, dt);

        match role {
            Role::Host => {
                self.game.advance(dt);
                let paddle = self.paddle_msg(local);
                self.emit(&paddle);
                let ball = self.ball_msg();
                self.emit(&ball);

                if let Some(winner) = self.game.winner() {
                    self.emit(&PeerMsg::GameOver {
                        winner: winner.index(),
                    });
                    self.fsm.transition(SessionAction::GameOver);
                    self.finish(Outcome::Winner(winner));
                }
            }
            Role::Guest => {
                self.game.advance_paddles(dt);
                let paddle = self.paddle_msg(local);
                self.emit(&paddle);
            }
        }
    }

    fn handle_signal(&mut self, msg: SignalS2C) {
        match msg {
            SignalS2C::RoomCreated { code } => {
                if self.role == Some(Role::Host)
                    && self.fsm.transition(SessionAction::RoomCreated).success
                {
                    log::info!("[SESSION] Room {code} created");
                    self.room = Some(code);
                }
            }
            SignalS2C::JoinOk { code } => {
                if self.role == Some(Role::Guest)
                    && self.fsm.transition(SessionAction::Joined).success
                {
                    log::info!("[SESSION] Joined room {code}");
                    self.room = Some(code);
                    self.peer_present = true;
                }
            }
            SignalS2C::JoinError { reason } => {
                log::warn!("[SESSION] Join failed: {reason}");
                if self.fsm.state() == SessionState::Menu {
                    self.role = None;
                }
                self.last_error = Some(reason);
            }
            SignalS2C::PeerJoined => {
                if self.fsm.transition(SessionAction::PeerJoined).success {
                    self.peer_present = true;
                }
            }
            SignalS2C::PeerLeft => {
                self.peer_present = false;
                if self.fsm.transition(SessionAction::OpponentLeft).success {
                    self.finish(Outcome::OpponentLeft);
                }
            }
            SignalS2C::GameStart => {
                if self.fsm.transition(SessionAction::GameStart).success {
                    self.begin_match();
                }
            }
            SignalS2C::RelaySignal { payload } => self.transport.accept_signal(&payload),
            SignalS2C::Game(msg) => self.handle_peer_msg(msg),
            SignalS2C::RestartGame => {
                if self.fsm.transition(SessionAction::Restart).success {
                    self.prepare_rematch();
                }
            }
        }
    }

    fn handle_peer_msg(&mut self, msg: PeerMsg) {
        if !self.fsm.is_active() {
            log::debug!("[SESSION] Ignoring {msg:?} while {:?}", self.state());
            return;
        }
        let Some(role) = self.role else {
            return;
        };

        match msg {
            PeerMsg::PaddleMove { side, x } => {
                if Side::from_index(side) == Some(role.side().opponent()) {
                    self.opponent.receive(x);
                } else {
                    log::warn!("[SESSION] Dropping paddle update for our own side");
                }
            }
            PeerMsg::BallUpdate { ball, score } => {
                if role == Role::Guest {
                    self.game.set_ball(ball_from_wire(&ball));
                    self.game.score = score_from_wire(score);
                    self.ball_synced = true;
                } else {
                    log::warn!("[SESSION] Host ignores ball updates");
                }
            }
            PeerMsg::RequestBallUpdate => {
                if role == Role::Host {
                    let ball = self.ball_msg();
                    self.emit(&ball);
                }
            }
            PeerMsg::GameOver { winner } => {
                if role != Role::Guest {
                    return;
                }
                if let Some(winner) = Side::from_index(winner) {
                    self.fsm.transition(SessionAction::GameOver);
                    self.finish(Outcome::Winner(winner));
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Match lifecycle
    // ------------------------------------------------------------------

    fn begin_match(&mut self) {
        let Some(role) = self.role else {
            return;
        };
        self.game.reset(Side::Near);
        for side in Side::BOTH {
            self.game.set_paddle_x(side, 0.0);
        }
        self.opponent = Opponent::Remote(RemotePaddle::new(role.side().opponent()));
        self.outcome = None;
        self.ball_synced = false;
        self.transport.start(role);
        log::info!("[SESSION] Match started as {role:?}");

        if role == Role::Guest {
            self.emit(&PeerMsg::RequestBallUpdate);
        }
    }

    fn prepare_rematch(&mut self) {
        self.game.reset(Side::Near);
        self.outcome = None;
        self.ball_synced = false;
    }

    fn finish(&mut self, outcome: Outcome) {
        log::info!("[SESSION] Match over: {outcome:?}");
        self.outcome = Some(outcome);
        self.transport.close();
    }

    fn emit(&mut self, msg: &PeerMsg) {
        if let Err(e) = self.transport.send(msg) {
            log::warn!("[SESSION] Failed to send {msg:?}: {e}");
        }
    }

    fn paddle_msg(&self, side: Side) -> PeerMsg {
        PeerMsg::PaddleMove {
            side: side.index(),
            x: self.game.paddle_x(side),
        }
    }

    fn ball_msg(&self) -> PeerMsg {
        PeerMsg::BallUpdate {
            ball: ball_to_wire(&self.game.ball()),
            score: score_to_wire(&self.game.score),
        }
    }

    fn require(&self, state: SessionState, action: &'static str) -> Result<(), NetError> {
        if self.fsm.state() == state {
            Ok(())
        } else {
            Err(NetError::InvalidState {
                action,
                state: self.fsm.state(),
            })
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn state(&self) -> SessionState {
        self.fsm.state()
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn room_code(&self) -> Option<&str> {
        self.room.as_deref()
    }

    pub fn status(&self) -> TransportStatus {
        self.transport.status()
    }

    pub fn transport(&self) -> &Transport<S, D> {
        &self.transport
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Text for the end-of-match banner, from this participant's point of view
    pub fn outcome_message(&self) -> Option<String> {
        let local = self.role?.side();
        let message = match self.outcome? {
            Outcome::Winner(side) if side == local => "You win!".to_string(),
            Outcome::Winner(_) => "Opponent wins".to_string(),
            Outcome::OpponentLeft => "Opponent disconnected".to_string(),
        };
        Some(message)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Guest has applied at least one ball update this match
    pub fn ball_synced(&self) -> bool {
        self.ball_synced
    }

    pub fn score(&self) -> Score {
        self.game.score
    }

    pub fn game(&self) -> &Match {
        &self.game
    }

    pub fn frame(&self) -> FrameView {
        self.game.frame()
    }
}
