use crate::{Ball, Config};
use hecs::World;

/// Hold ball speed inside its bounds and bleed off lateral speed.
///
/// Longitudinal speed is clamped to `[ball_speed_min, ball_speed_max]`,
/// lateral speed to `[0, ball_speed_max * lateral_ratio]`, then lateral
/// speed is multiplied by `lateral_drag`.
pub fn normalize_speed(world: &mut World, config: &Config) {
    let lateral_cap = config.lateral_speed_cap();

    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        if !ball.in_play {
            continue;
        }

        let longitudinal = ball
            .vel
            .z
            .abs()
            .clamp(config.ball_speed_min, config.ball_speed_max);
        ball.vel.z = longitudinal.copysign(ball.vel.z);

        ball.vel.x = ball.vel.x.clamp(-lateral_cap, lateral_cap) * config.lateral_drag;
    }
}
