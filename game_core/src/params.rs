/// Game tuning parameters for the tennis court
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Court (x = lateral, z = longitudinal, centred on the origin)
    pub const COURT_HALF_WIDTH: f32 = 10.0;
    pub const COURT_HALF_LENGTH: f32 = 16.0;
    pub const TABLE_HEIGHT: f32 = 0.75; // ball height on the 3D court

    // Paddle
    pub const PADDLE_OFFSET: f32 = 14.0; // |z| of both paddles
    pub const PADDLE_HALF_WIDTH: f32 = 2.0; // hitbox half-width
    pub const PADDLE_SPEED: f32 = 18.0; // units per second
    pub const HIT_BAND: f32 = 0.5; // half depth of the paddle contact band

    // Ball
    pub const BALL_SPEED_MIN: f32 = 8.0;
    pub const BALL_SPEED_SERVE: f32 = 12.0;
    pub const BALL_SPEED_MAX: f32 = 15.0;
    pub const RESTITUTION: f32 = 1.08; // longitudinal speed-up per paddle hit
    pub const MAX_SPIN_SPEED: f32 = 9.0; // lateral speed at the paddle edge
    pub const LATERAL_RATIO: f32 = 0.75; // lateral cap = max speed * ratio
    pub const LATERAL_DRAG: f32 = 0.998; // per physics tick
    pub const WALL_DAMPING: f32 = 0.9;
    pub const WALL_JITTER: f32 = 0.3;
    pub const SERVE_SPREAD: f32 = 1.5;
    pub const SERVE_GAP: f32 = 1.0; // docked ball distance in front of the server

    // Serve
    pub const SERVE_DELAY: f32 = 1.0; // seconds before an automatic serve

    // Score
    pub const WIN_SCORE: u8 = 10;

    // Scripted opponent
    pub const AI_SPEED: f32 = 11.0;
    pub const AI_SMOOTHING: f32 = 0.15;
    pub const AI_RECENTER_BIAS: f32 = 0.2;
    pub const AI_DEADZONE: f32 = 0.05;

    // Physics
    pub const FIXED_DT: f32 = 0.0166; // ~60 Hz
    pub const MAX_DT: f32 = 0.1; // Clamp to prevent large jumps
}
