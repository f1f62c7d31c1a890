pub mod ai;
pub mod components;
pub mod config;
pub mod error;
pub mod game;
pub mod input;
pub mod local;
pub mod opponent;
pub mod params;
pub mod resources;
pub mod systems;
pub mod view;

pub use ai::{AiController, AiParams};
pub use components::*;
pub use config::*;
pub use error::*;
pub use game::*;
pub use input::*;
pub use local::*;
pub use opponent::*;
pub use params::*;
pub use resources::*;
pub use view::*;

use hecs::World;
use systems::*;

/// Run the deterministic court simulation for one frame
#[allow(clippy::too_many_arguments)]
pub fn step(
    world: &mut World,
    time: &mut Time,
    config: &Config,
    score: &mut Score,
    events: &mut Events,
    inputs: &mut InputQueue,
    rng: &mut GameRng,
    serve: &mut ServeState,
) {
    // Clamp dt to prevent large jumps
    let clamped_dt = time.dt.min(Params::MAX_DT);

    // Events cover the whole frame
    events.clear();

    // Fixed micro-steps for stable physics
    let mut remaining_dt = clamped_dt;
    let mut first = true;
    while remaining_dt > 0.0 {
        let step_dt = remaining_dt.min(Params::FIXED_DT);
        remaining_dt -= step_dt;

        let step_time = Time {
            dt: step_dt,
            now: time.now + (clamped_dt - remaining_dt),
        };

        // 0. Ingest inputs once per frame, intents persist across micro-steps
        let serve_requested = if first {
            ingest_inputs(world, inputs)
        } else {
            [false; 2]
        };
        first = false;
        update_serve(world, &step_time, config, serve, serve_requested, rng, events);

        // 1. Move paddles based on intents
        move_paddles(world, &step_time, config);

        // 2. Serve-pending ball follows the server
        pin_ball(world, config, serve);

        // 3. Move ball
        move_ball(world, &step_time);

        // 4-5. Paddles first, then side walls
        check_collisions(world, config, rng, events);

        // 6. Keep speed inside bounds
        normalize_speed(world, config);

        // 7. Ball left the court
        check_scoring(world, config, score, events, serve);
    }

    // Update time
    time.now += clamped_dt;
}

/// Paddle-only frame for a side that does not own the ball
pub fn step_paddles(world: &mut World, time: &mut Time, config: &Config, inputs: &mut InputQueue) {
    let clamped_dt = time.dt.min(Params::MAX_DT);
    ingest_inputs(world, inputs);

    let mut remaining_dt = clamped_dt;
    while remaining_dt > 0.0 {
        let step_dt = remaining_dt.min(Params::FIXED_DT);
        remaining_dt -= step_dt;
        move_paddles(world, &Time::new(step_dt, time.now), config);
    }

    time.now += clamped_dt;
}

/// Helper to create a paddle entity
pub fn create_paddle(world: &mut World, side: Side, x: f32) -> hecs::Entity {
    world.spawn((Paddle::new(side, x), PaddleIntent::new()))
}

/// Helper to create the ball entity
pub fn create_ball(world: &mut World, ball: Ball) -> hecs::Entity {
    world.spawn((ball,))
}

/// Lateral position of `side`'s paddle, if it exists
pub fn paddle_x(world: &World, side: Side) -> Option<f32> {
    world
        .query::<&Paddle>()
        .iter()
        .find(|(_e, p)| p.side == side)
        .map(|(_e, p)| p.x)
}
