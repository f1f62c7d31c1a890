use serde::{Deserialize, Serialize};

use crate::ai::AiParams;
use crate::{ConfigError, Params, Side};

/// Game configuration
///
/// One configuration type drives both variants: the 3D single-player court
/// and the flat networked court only differ in ball height and match length.
/// Every field falls back to its [`Params`] default when deserialised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub court_half_width: f32,
    pub court_half_length: f32,
    pub ball_height: f32,
    pub paddle_offset: f32,
    pub paddle_half_width: f32,
    pub paddle_speed: f32,
    pub hit_band: f32,
    pub ball_speed_min: f32,
    pub ball_speed_serve: f32,
    pub ball_speed_max: f32,
    pub restitution: f32,
    pub max_spin_speed: f32,
    pub lateral_ratio: f32,
    pub lateral_drag: f32,
    pub wall_damping: f32,
    pub wall_jitter: f32,
    pub serve_spread: f32,
    pub serve_gap: f32,
    pub serve_delay: f32,
    /// `None` means the match never ends (single-player)
    pub win_score: Option<u8>,
    pub ai: AiParams,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            court_half_width: Params::COURT_HALF_WIDTH,
            court_half_length: Params::COURT_HALF_LENGTH,
            ball_height: 0.0,
            paddle_offset: Params::PADDLE_OFFSET,
            paddle_half_width: Params::PADDLE_HALF_WIDTH,
            paddle_speed: Params::PADDLE_SPEED,
            hit_band: Params::HIT_BAND,
            ball_speed_min: Params::BALL_SPEED_MIN,
            ball_speed_serve: Params::BALL_SPEED_SERVE,
            ball_speed_max: Params::BALL_SPEED_MAX,
            restitution: Params::RESTITUTION,
            max_spin_speed: Params::MAX_SPIN_SPEED,
            lateral_ratio: Params::LATERAL_RATIO,
            lateral_drag: Params::LATERAL_DRAG,
            wall_damping: Params::WALL_DAMPING,
            wall_jitter: Params::WALL_JITTER,
            serve_spread: Params::SERVE_SPREAD,
            serve_gap: Params::SERVE_GAP,
            serve_delay: Params::SERVE_DELAY,
            win_score: Some(Params::WIN_SCORE),
            ai: AiParams::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-player court: ball rides at table height, no match end
    pub fn arena_3d() -> Self {
        Self {
            ball_height: Params::TABLE_HEIGHT,
            win_score: None,
            ..Self::default()
        }
    }

    /// Networked court drawn in 2.5D: flat ball, first to `WIN_SCORE`
    pub fn flat_court() -> Self {
        Self::default()
    }

    /// Get Z position for paddle based on side
    pub fn paddle_z(&self, side: Side) -> f32 {
        side.z_sign() * self.paddle_offset
    }

    pub fn paddle_min(&self) -> f32 {
        -(self.court_half_width - self.paddle_half_width)
    }

    pub fn paddle_max(&self) -> f32 {
        self.court_half_width - self.paddle_half_width
    }

    /// Clamp paddle X to court bounds
    pub fn clamp_paddle_x(&self, x: f32) -> f32 {
        x.clamp(self.paddle_min(), self.paddle_max())
    }

    /// Cap on lateral ball speed
    pub fn lateral_speed_cap(&self) -> f32 {
        self.ball_speed_max * self.lateral_ratio
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("court_half_width", self.court_half_width),
            ("court_half_length", self.court_half_length),
            ("paddle_half_width", self.paddle_half_width),
            ("paddle_speed", self.paddle_speed),
            ("hit_band", self.hit_band),
            ("ball_speed_min", self.ball_speed_min),
            ("max_spin_speed", self.max_spin_speed),
            ("serve_gap", self.serve_gap),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        if !(self.restitution > 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "restitution",
                range: "(1, inf)",
                value: self.restitution,
            });
        }
        for (field, value) in [
            ("wall_damping", self.wall_damping),
            ("lateral_drag", self.lateral_drag),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return Err(ConfigError::OutOfRange {
                    field,
                    range: "(0, 1)",
                    value,
                });
            }
        }
        if !(self.lateral_ratio > 0.0 && self.lateral_ratio <= 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "lateral_ratio",
                range: "(0, 1]",
                value: self.lateral_ratio,
            });
        }
        for (field, value) in [
            ("wall_jitter", self.wall_jitter),
            ("serve_spread", self.serve_spread),
            ("serve_delay", self.serve_delay),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigError::OutOfRange {
                    field,
                    range: "[0, inf)",
                    value,
                });
            }
        }

        if self.paddle_half_width >= self.court_half_width {
            return Err(ConfigError::PaddleTooWide {
                hitbox: self.paddle_half_width,
                court: self.court_half_width,
            });
        }
        if self.paddle_offset + self.hit_band >= self.court_half_length {
            return Err(ConfigError::PaddleOutsideCourt {
                offset: self.paddle_offset,
                length: self.court_half_length,
            });
        }
        if self.ball_speed_min > self.ball_speed_max {
            return Err(ConfigError::SpeedRange {
                min: self.ball_speed_min,
                max: self.ball_speed_max,
            });
        }
        if self.ball_speed_serve < self.ball_speed_min || self.ball_speed_serve > self.ball_speed_max
        {
            return Err(ConfigError::ServeSpeed {
                serve: self.ball_speed_serve,
                min: self.ball_speed_min,
                max: self.ball_speed_max,
            });
        }

        let step = self.ball_speed_max * Params::FIXED_DT;
        if step >= 2.0 * self.hit_band {
            return Err(ConfigError::Tunneling {
                step,
                band: 2.0 * self.hit_band,
            });
        }

        if self.win_score == Some(0) {
            return Err(ConfigError::ZeroWinScore);
        }

        self.ai.validate()
    }
}
