use crate::systems::serve::dock_position;
use crate::{paddle_x, Ball, Config, Events, GameEvent, Score, ServeState, Side};
use hecs::World;

/// Check if ball left the court past either end (scoring)
pub fn check_scoring(
    world: &mut World,
    config: &Config,
    score: &mut Score,
    events: &mut Events,
    serve: &mut ServeState,
) {
    let mut point = None;
    for (_entity, ball) in world.query::<&Ball>().iter() {
        if !ball.in_play {
            continue;
        }
        if ball.pos.z > config.court_half_length {
            // Past the far end
            point = Some(Side::Near);
        } else if ball.pos.z < -config.court_half_length {
            point = Some(Side::Far);
        }
    }

    let Some(winner) = point else {
        return;
    };

    score.increment(winner);
    events.push(GameEvent::Scored(winner));

    // The side that conceded serves next
    let server = winner.opponent();
    serve.start_delay(server, config.serve_delay);

    let server_x = paddle_x(world, server).unwrap_or(0.0);
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        ball.dock(dock_position(config, server, server_x));
    }
}
