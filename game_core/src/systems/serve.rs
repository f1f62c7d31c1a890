use glam::Vec3;
use hecs::World;

use crate::{Ball, Config, Events, GameEvent, GameRng, ServeMode, ServeState, Side, Time};

/// Where a serve-pending ball sits: level with the server's paddle,
/// `serve_gap` in front of it on the court side
pub fn dock_position(config: &Config, server: Side, paddle_x: f32) -> Vec3 {
    let z = server.z_sign() * (config.paddle_offset - config.serve_gap);
    Vec3::new(paddle_x, config.ball_height, z)
}

/// Launch the ball when the server asks to (manual) or its delay ran out (auto)
pub fn update_serve(
    world: &mut World,
    time: &Time,
    config: &Config,
    serve: &mut ServeState,
    serve_requested: [bool; 2],
    rng: &mut GameRng,
    events: &mut Events,
) {
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        if ball.in_play {
            continue;
        }

        serve.update(time.dt);

        let server = serve.server;
        let manual = serve.mode(server) == ServeMode::Manual
            && serve_requested[server.index() as usize];

        if manual || serve.can_auto_serve() {
            // Toward the opponent's end
            ball.vel = Vec3::new(
                rng.symmetric(config.serve_spread),
                0.0,
                -server.z_sign() * config.ball_speed_serve,
            );
            ball.in_play = true;
            events.push(GameEvent::Served(server));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_ball;

    fn setup(modes: [ServeMode; 2], server: Side) -> (World, Config, ServeState, GameRng, Events) {
        let mut world = World::new();
        let config = Config::new();
        create_ball(
            &mut world,
            Ball::docked(dock_position(&config, server, 0.0)),
        );
        let serve = ServeState::new(server, modes);
        (world, config, serve, GameRng::new(1), Events::new())
    }

    fn ball(world: &World) -> Ball {
        world
            .query::<&Ball>()
            .iter()
            .next()
            .map(|(_e, b)| *b)
            .unwrap()
    }

    #[test]
    fn test_manual_serve_waits_for_request() {
        let (mut world, config, mut serve, mut rng, mut events) =
            setup([ServeMode::Manual, ServeMode::Auto], Side::Near);
        let time = Time::new(0.016, 0.0);

        update_serve(&mut world, &time, &config, &mut serve, [false, false], &mut rng, &mut events);
        assert!(!ball(&world).in_play);

        // Request from the wrong side is ignored
        update_serve(&mut world, &time, &config, &mut serve, [false, true], &mut rng, &mut events);
        assert!(!ball(&world).in_play);

        update_serve(&mut world, &time, &config, &mut serve, [true, false], &mut rng, &mut events);
        let served = ball(&world);
        assert!(served.in_play);
        assert_eq!(served.vel.z, config.ball_speed_serve, "Near serves toward +z");
        assert!(served.vel.x.abs() <= config.serve_spread);
        assert!(events.iter().any(|e| *e == GameEvent::Served(Side::Near)));
    }

    #[test]
    fn test_auto_serve_after_delay() {
        let (mut world, config, mut serve, mut rng, mut events) =
            setup([ServeMode::Manual, ServeMode::Auto], Side::Far);
        serve.start_delay(Side::Far, 0.1);
        let time = Time::new(0.05, 0.0);

        update_serve(&mut world, &time, &config, &mut serve, [false, false], &mut rng, &mut events);
        assert!(!ball(&world).in_play);

        update_serve(&mut world, &time, &config, &mut serve, [false, false], &mut rng, &mut events);
        let served = ball(&world);
        assert!(served.in_play);
        assert_eq!(served.vel.z, -config.ball_speed_serve, "Far serves toward -z");
    }

    #[test]
    fn test_dock_position_in_front_of_paddle() {
        let config = Config::arena_3d();
        let near = dock_position(&config, Side::Near, 1.0);
        let far = dock_position(&config, Side::Far, -1.0);
        assert_eq!(near, Vec3::new(1.0, config.ball_height, -13.0));
        assert_eq!(far, Vec3::new(-1.0, config.ball_height, 13.0));
    }
}
