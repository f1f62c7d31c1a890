use thiserror::Error;

/// Rejected court configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must lie in {range}, got {value}")]
    OutOfRange {
        field: &'static str,
        range: &'static str,
        value: f32,
    },

    #[error("paddle hitbox half-width {hitbox} does not fit the court half-width {court}")]
    PaddleTooWide { hitbox: f32, court: f32 },

    #[error("paddles at |z| = {offset} sit outside the court half-length {length}")]
    PaddleOutsideCourt { offset: f32, length: f32 },

    #[error("minimum ball speed {min} exceeds maximum {max}")]
    SpeedRange { min: f32, max: f32 },

    #[error("serve speed {serve} lies outside [{min}, {max}]")]
    ServeSpeed { serve: f32, min: f32, max: f32 },

    #[error("ball travels {step} per tick, more than the paddle band depth {band}")]
    Tunneling { step: f32, band: f32 },

    #[error("win score must be at least 1")]
    ZeroWinScore,
}
