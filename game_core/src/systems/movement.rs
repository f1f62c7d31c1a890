use crate::systems::serve::dock_position;
use crate::{paddle_x, Ball, Config, Paddle, PaddleIntent, ServeState, Time};
use hecs::World;

/// Apply paddle movement based on intents
pub fn move_paddles(world: &mut World, time: &Time, config: &Config) {
    for (_entity, (paddle, intent)) in world.query_mut::<(&mut Paddle, &PaddleIntent)>() {
        if intent.dir != 0 {
            paddle.x += intent.dir as f32 * config.paddle_speed * time.dt;
        }
        // Clamp to court bounds
        paddle.x = config.clamp_paddle_x(paddle.x);
    }
}

/// Keep a serve-pending ball docked in front of the serving paddle
pub fn pin_ball(world: &mut World, config: &Config, serve: &ServeState) {
    let Some(server_x) = paddle_x(world, serve.server) else {
        return;
    };

    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        if !ball.in_play {
            ball.dock(dock_position(config, serve.server, server_x));
        }
    }
}

/// Move ball based on velocity
pub fn move_ball(world: &mut World, time: &Time) {
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        if ball.in_play {
            ball.pos += ball.vel * time.dt;
        }
    }
}
