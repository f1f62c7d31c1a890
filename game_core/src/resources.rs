use crate::input::PaddleCommand;
use crate::Side;

/// Time resource for tracking simulation time
#[derive(Debug, Clone, Copy)]
pub struct Time {
    pub dt: f32,  // Delta time for this step
    pub now: f32, // Total elapsed time
}

impl Time {
    pub fn new(dt: f32, now: f32) -> Self {
        Self { dt, now }
    }
}

impl Default for Time {
    fn default() -> Self {
        Self {
            dt: 0.016,
            now: 0.0,
        }
    }
}

/// Game score tracking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub near: u8,
    pub far: u8,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, side: Side) {
        match side {
            Side::Near => self.near = self.near.saturating_add(1),
            Side::Far => self.far = self.far.saturating_add(1),
        }
    }

    pub fn get(&self, side: Side) -> u8 {
        match side {
            Side::Near => self.near,
            Side::Far => self.far,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn winner(&self, win_score: u8) -> Option<Side> {
        if self.near >= win_score {
            Some(Side::Near)
        } else if self.far >= win_score {
            Some(Side::Far)
        } else {
            None
        }
    }
}

/// Random number generator
pub struct GameRng(pub rand::rngs::StdRng);

impl GameRng {
    pub fn new(seed: u64) -> Self {
        use rand::SeedableRng;
        Self(rand::rngs::StdRng::seed_from_u64(seed))
    }

    /// Uniform sample in `[-spread, spread]`; zero when `spread` is zero
    pub fn symmetric(&mut self, spread: f32) -> f32 {
        use rand::Rng;
        if spread > 0.0 {
            self.0.gen_range(-spread..=spread)
        } else {
            0.0
        }
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(12345)
    }
}

/// Something that happened during a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Served(Side),
    PaddleHit(Side),
    WallBounce,
    /// The given side won the point
    Scored(Side),
}

/// Events that occurred during this frame
#[derive(Debug, Clone, Default)]
pub struct Events {
    list: Vec<GameEvent>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.list.push(event);
    }

    pub fn clear(&mut self) {
        self.list.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.list.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn paddle_hit(&self, side: Side) -> bool {
        self.list.contains(&GameEvent::PaddleHit(side))
    }

    pub fn wall_bounced(&self) -> bool {
        self.list.contains(&GameEvent::WallBounce)
    }

    /// Side that won a point this frame, if any
    pub fn scored(&self) -> Option<Side> {
        self.list.iter().find_map(|e| match e {
            GameEvent::Scored(side) => Some(*side),
            _ => None,
        })
    }
}

/// How a side puts the ball in play
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ServeMode {
    /// Waits for a serve command from that side
    Manual,
    /// Serves by itself once the serve delay runs out
    Auto,
}

/// Who serves next and the delay before an automatic serve
#[derive(Debug, Clone, Copy)]
pub struct ServeState {
    pub server: Side,
    pub timer: f32, // Time remaining before an automatic serve
    pub modes: [ServeMode; 2],
}

impl ServeState {
    pub fn new(server: Side, modes: [ServeMode; 2]) -> Self {
        Self {
            server,
            timer: 0.0,
            modes,
        }
    }

    pub fn mode(&self, side: Side) -> ServeMode {
        self.modes[side.index() as usize]
    }

    /// Hand the serve to `server` and restart the delay
    pub fn start_delay(&mut self, server: Side, delay: f32) {
        self.server = server;
        self.timer = delay;
    }

    pub fn update(&mut self, dt: f32) {
        if self.timer > 0.0 {
            self.timer = (self.timer - dt).max(0.0);
        }
    }

    pub fn can_auto_serve(&self) -> bool {
        self.mode(self.server) == ServeMode::Auto && self.timer <= 0.0
    }
}

/// Paddle commands queued for the next tick
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    pub commands: Vec<(Side, PaddleCommand)>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn push(&mut self, side: Side, command: PaddleCommand) {
        self.commands.push((side, command));
    }

    pub fn drain(&mut self) -> Vec<(Side, PaddleCommand)> {
        std::mem::take(&mut self.commands)
    }
}
