//! Session State Machine
//!
//! Tracks where a networked session is between the menu and a finished match.

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Menu,
    /// Host has a room code, nobody joined yet
    RoomCreated,
    /// Both in the room, waiting for both to be ready
    Waiting,
    Active,
    Ended,
}

/// Actions and signalling events that trigger transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    RoomCreated,
    Joined,
    PeerJoined,
    GameStart,
    GameOver,
    OpponentLeft,
    Restart,
    Leave,
}

/// Result of a state transition
#[derive(Debug, Clone, Copy)]
pub struct TransitionResult {
    pub success: bool,
    pub from_state: SessionState,
    pub to_state: SessionState,
    pub action: SessionAction,
}

/// Session Finite State Machine
#[derive(Debug, Clone)]
pub struct SessionFsm {
    state: SessionState,
}

impl SessionFsm {
    pub fn new() -> Self {
        Self {
            state: SessionState::Menu,
        }
    }

    /// Get current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Check if a transition is valid
    pub fn can_transition(&self, action: SessionAction) -> bool {
        self.get_next_state(action).is_some()
    }

    /// Attempt a transition
    pub fn transition(&mut self, action: SessionAction) -> TransitionResult {
        let from_state = self.state;

        if let Some(next_state) = self.get_next_state(action) {
            self.state = next_state;
            log::info!("[FSM] {from_state:?} --{action:?}--> {next_state:?}");
            TransitionResult {
                success: true,
                from_state,
                to_state: next_state,
                action,
            }
        } else {
            log::debug!("[FSM] Ignored {action:?} in {from_state:?}");
            TransitionResult {
                success: false,
                from_state,
                to_state: from_state,
                action,
            }
        }
    }

    /// Get next state for a given action (if valid)
    fn get_next_state(&self, action: SessionAction) -> Option<SessionState> {
        use SessionAction as A;
        use SessionState as S;

        match (self.state, action) {
            // From Menu
            (S::Menu, A::RoomCreated) => Some(S::RoomCreated),
            (S::Menu, A::Joined) => Some(S::Waiting),

            // From RoomCreated
            (S::RoomCreated, A::PeerJoined) => Some(S::Waiting),
            (S::RoomCreated, A::Leave) => Some(S::Menu),

            // From Waiting
            (S::Waiting, A::GameStart) => Some(S::Active),
            (S::Waiting, A::OpponentLeft) => Some(S::Ended),
            (S::Waiting, A::Leave) => Some(S::Menu),

            // From Active
            (S::Active, A::GameOver) => Some(S::Ended),
            (S::Active, A::OpponentLeft) => Some(S::Ended),
            (S::Active, A::Leave) => Some(S::Menu),

            // From Ended
            (S::Ended, A::Restart) => Some(S::Waiting),
            (S::Ended, A::Leave) => Some(S::Menu),

            // Invalid transition
            _ => None,
        }
    }

    /// Reset to Menu state
    pub fn reset(&mut self) {
        self.state = SessionState::Menu;
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// Check if inside a room
    pub fn in_room(&self) -> bool {
        !matches!(self.state, SessionState::Menu)
    }
}

impl Default for SessionFsm {
    fn default() -> Self {
        Self::new()
    }
}
