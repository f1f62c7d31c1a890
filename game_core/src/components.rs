use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Court end a paddle defends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Defends the -z end (human / host)
    Near,
    /// Defends the +z end (AI / guest)
    Far,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Near, Side::Far];

    pub fn opponent(self) -> Self {
        match self {
            Side::Near => Side::Far,
            Side::Far => Side::Near,
        }
    }

    /// Wire index: 0 = near, 1 = far
    pub fn index(self) -> u8 {
        match self {
            Side::Near => 0,
            Side::Far => 1,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Side::Near),
            1 => Some(Side::Far),
            _ => None,
        }
    }

    /// Sign of the z coordinate of this side's end
    pub fn z_sign(self) -> f32 {
        match self {
            Side::Near => -1.0,
            Side::Far => 1.0,
        }
    }
}

/// Paddle component - slides along the lateral (x) axis
#[derive(Debug, Clone, Copy)]
pub struct Paddle {
    pub side: Side,
    pub x: f32, // lateral position (clamped to court)
}

impl Paddle {
    pub fn new(side: Side, x: f32) -> Self {
        Self { side, x }
    }
}

/// Movement intent for paddle
#[derive(Debug, Clone, Copy, Default)]
pub struct PaddleIntent {
    pub dir: i8, // -1 = toward -x, 0 = stop, 1 = toward +x
}

impl PaddleIntent {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Ball component
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub pos: Vec3,
    pub vel: Vec3,
    pub in_play: bool,
}

impl Ball {
    /// A serve-pending ball at `pos`
    pub fn docked(pos: Vec3) -> Self {
        Self {
            pos,
            vel: Vec3::ZERO,
            in_play: false,
        }
    }

    /// Put the ball back in serve-pending state in front of the server
    pub fn dock(&mut self, pos: Vec3) {
        self.pos = pos;
        self.vel = Vec3::ZERO;
        self.in_play = false;
    }

    /// True when the longitudinal velocity points at `side`'s end
    pub fn moving_toward(&self, side: Side) -> bool {
        self.vel.z * side.z_sign() > 0.0
    }
}
