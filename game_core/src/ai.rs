//! Scripted opponent for the single-player court
//!
//! Strategy:
//! 1. Ball coming at us: predict where it crosses our paddle line assuming
//!    straight-line motion (wall bounces are ignored on purpose).
//! 2. Ball going away: drift back toward the centre, leaning a little toward
//!    the ball.
//! 3. Smooth the target over ticks and chase it at a capped speed, with a
//!    deadzone so the paddle settles instead of jittering.

use serde::{Deserialize, Serialize};

use crate::{Ball, Config, ConfigError, Params, Side};

/// Tuning for the scripted opponent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiParams {
    /// Units per second
    pub speed: f32,
    /// EMA weight of the newest raw target, in (0, 1]
    pub smoothing: f32,
    /// Pull toward the ball while recentring, in [0, 1]
    pub recenter_bias: f32,
    pub deadzone: f32,
}

impl Default for AiParams {
    fn default() -> Self {
        Self {
            speed: Params::AI_SPEED,
            smoothing: Params::AI_SMOOTHING,
            recenter_bias: Params::AI_RECENTER_BIAS,
            deadzone: Params::AI_DEADZONE,
        }
    }
}

impl AiParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.speed > 0.0) {
            return Err(ConfigError::NotPositive {
                field: "ai.speed",
                value: self.speed,
            });
        }
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "ai.smoothing",
                range: "(0, 1]",
                value: self.smoothing,
            });
        }
        if !(0.0..=1.0).contains(&self.recenter_bias) {
            return Err(ConfigError::OutOfRange {
                field: "ai.recenter_bias",
                range: "[0, 1]",
                value: self.recenter_bias,
            });
        }
        if !(self.deadzone >= 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "ai.deadzone",
                range: "[0, inf)",
                value: self.deadzone,
            });
        }
        Ok(())
    }
}

/// Lateral coordinate where a ball moving toward `side` crosses its paddle
/// line, clamped to the paddle range. `None` if the ball is not coming.
pub fn intercept_x(ball: &Ball, side: Side, config: &Config) -> Option<f32> {
    if !ball.in_play || !ball.moving_toward(side) {
        return None;
    }

    let distance = (config.paddle_z(side) - ball.pos.z).abs();
    let time_to_reach = distance / ball.vel.z.abs();
    let predicted = ball.pos.x + ball.vel.x * time_to_reach;
    Some(config.clamp_paddle_x(predicted))
}

/// Predictive paddle controller
#[derive(Debug, Clone)]
pub struct AiController {
    side: Side,
    params: AiParams,
    smoothed: f32,
}

impl AiController {
    pub fn new(side: Side, params: AiParams) -> Self {
        Self {
            side,
            params,
            smoothed: 0.0,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn smoothed_target(&self) -> f32 {
        self.smoothed
    }

    /// Forget smoothing history, e.g. after a match reset
    pub fn reset(&mut self, x: f32) {
        self.smoothed = x;
    }

    /// Target before smoothing
    pub fn raw_target(&self, ball: &Ball, config: &Config) -> f32 {
        intercept_x(ball, self.side, config).unwrap_or_else(|| {
            let center = 0.0;
            center + (ball.pos.x - center) * self.params.recenter_bias
        })
    }

    /// Advance one tick and return the paddle's new lateral position
    pub fn update(&mut self, ball: &Ball, paddle_x: f32, config: &Config, dt: f32) -> f32 {
        let raw = self.raw_target(ball, config);
        self.smoothed += self.params.smoothing * (raw - self.smoothed);

        let diff = self.smoothed - paddle_x;
        if diff.abs() < self.params.deadzone {
            return config.clamp_paddle_x(paddle_x);
        }

        let max_step = self.params.speed * dt;
        config.clamp_paddle_x(paddle_x + diff.clamp(-max_step, max_step))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn incoming(pos: Vec3, vel: Vec3) -> Ball {
        Ball {
            pos,
            vel,
            in_play: true,
        }
    }

    #[test]
    fn test_raw_target_matches_linear_prediction() {
        let config = Config::new();
        let ai = AiController::new(Side::Far, AiParams::default());
        let ball = incoming(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.5, 0.0, 10.0));

        let distance = config.paddle_z(Side::Far) - ball.pos.z;
        let expected = (1.0f32 + 0.5 * (distance / 10.0))
            .clamp(config.paddle_min(), config.paddle_max());

        assert!((ai.raw_target(&ball, &config) - expected).abs() < 1e-5);
    }

    #[test]
    fn test_raw_target_clamped_to_court() {
        let config = Config::new();
        let ai = AiController::new(Side::Far, AiParams::default());
        let ball = incoming(Vec3::new(0.0, 0.0, -10.0), Vec3::new(11.0, 0.0, 8.0));

        assert_eq!(ai.raw_target(&ball, &config), config.paddle_max());
    }

    #[test]
    fn test_recenters_when_ball_moves_away() {
        let config = Config::new();
        let params = AiParams::default();
        let ai = AiController::new(Side::Far, params);
        let ball = incoming(Vec3::new(6.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -10.0));

        let target = ai.raw_target(&ball, &config);
        assert!((target - 6.0 * params.recenter_bias).abs() < 1e-5);
    }

    #[test]
    fn test_near_side_prediction_uses_its_own_line() {
        let config = Config::new();
        let ball = incoming(Vec3::new(0.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, -7.0));
        let x = intercept_x(&ball, Side::Near, &config).unwrap();
        assert!((x - (-1.0 * 14.0 / 7.0)).abs() < 1e-5);
        assert_eq!(intercept_x(&ball, Side::Far, &config), None);
    }

    #[test]
    fn test_speed_is_capped_per_tick() {
        let config = Config::new();
        let params = AiParams {
            smoothing: 1.0,
            ..AiParams::default()
        };
        let mut ai = AiController::new(Side::Far, params);
        let ball = incoming(Vec3::new(0.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 10.0));

        let dt = 1.0 / 60.0;
        let x = ai.update(&ball, 0.0, &config, dt);
        assert!((x - params.speed * dt).abs() < 1e-5);
    }

    #[test]
    fn test_deadzone_holds_still() {
        let config = Config::new();
        let mut ai = AiController::new(Side::Far, AiParams::default());
        let ball = Ball::docked(Vec3::new(0.0, 0.0, 13.0));
        ai.reset(0.0);

        let x = ai.update(&ball, 0.01, &config, 1.0 / 60.0);
        assert_eq!(x, 0.01, "Below the deadzone the paddle does not move");
    }

    #[test]
    fn test_smoothing_lags_the_raw_target() {
        let config = Config::new();
        let mut ai = AiController::new(Side::Far, AiParams::default());
        let ball = incoming(Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 10.0));

        ai.update(&ball, 0.0, &config, 1.0 / 60.0);
        let smoothed = ai.smoothed_target();
        assert!(smoothed > 0.0 && smoothed < 4.0);
    }

    #[test]
    fn test_validate_rejects_bad_smoothing() {
        let params = AiParams {
            smoothing: 0.0,
            ..AiParams::default()
        };
        assert!(params.validate().is_err());
        assert!(AiParams::default().validate().is_ok());
    }
}
