use crate::{Ball, Config, Events, GameEvent, GameRng, Paddle, Side};
use hecs::World;

/// Check ball collisions with paddles, then with the side walls.
///
/// Both may fire in the same tick: a paddle hit rewrites the longitudinal
/// axis and spin, a wall bounce only the lateral axis afterwards.
pub fn check_collisions(world: &mut World, config: &Config, rng: &mut GameRng, events: &mut Events) {
    check_paddle_collisions(world, config, events);
    check_wall_collisions(world, config, rng, events);
}

/// Reflect the ball off a paddle whose contact band and hitbox it is inside
pub fn check_paddle_collisions(world: &mut World, config: &Config, events: &mut Events) {
    // Collect paddle data without holding borrows
    let paddles: Vec<(Side, f32)> = world
        .query::<&Paddle>()
        .iter()
        .map(|(_e, p)| (p.side, p.x))
        .collect();

    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        if !ball.in_play {
            continue;
        }

        for &(side, paddle_x) in &paddles {
            // Only bounce when travelling into the paddle
            if !ball.moving_toward(side) {
                continue;
            }

            let paddle_z = config.paddle_z(side);
            let depth = ball.pos.z - paddle_z;
            let offset = ball.pos.x - paddle_x;

            let in_band = depth >= -config.hit_band && depth < config.hit_band;
            let in_hitbox =
                offset >= -config.paddle_half_width && offset < config.paddle_half_width;
            if !(in_band && in_hitbox) {
                continue;
            }

            ball.vel.z = -ball.vel.z * config.restitution;

            // Linear english: contact offset in [-1, 1] sets lateral speed
            let english = (offset / config.paddle_half_width).clamp(-1.0, 1.0);
            ball.vel.x = english * config.max_spin_speed;

            // Push ball out to the court side of the band
            ball.pos.z = paddle_z - side.z_sign() * config.hit_band;

            events.push(GameEvent::PaddleHit(side));
            break;
        }
    }
}

/// Bounce the ball off the side walls with damping and a small random kick
pub fn check_wall_collisions(
    world: &mut World,
    config: &Config,
    rng: &mut GameRng,
    events: &mut Events,
) {
    let limit = config.court_half_width;

    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        if !ball.in_play || ball.pos.x.abs() <= limit {
            continue;
        }

        let outward = ball.pos.x.signum();
        if ball.vel.x * outward < 0.0 {
            // Already heading back in
            continue;
        }

        // Clamp position to prevent sticking
        ball.pos.x = outward * limit;

        let damped = ball.vel.x.abs() * config.wall_damping;
        let speed = (damped + rng.symmetric(config.wall_jitter)).max(0.0);
        ball.vel.x = -outward * speed;

        events.push(GameEvent::WallBounce);
    }
}
