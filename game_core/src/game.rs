//! Match context
//!
//! Owns every piece of simulation state for one match so callers never touch
//! globals: the hecs world with the ball and both paddles plus the resources
//! the systems read and write.

use hecs::World;

use crate::systems::serve::dock_position;
use crate::{
    create_ball, create_paddle, step, step_paddles, Ball, Config, Events, GameEvent, GameRng,
    InputQueue, Paddle, PaddleCommand, Score, ServeMode, ServeState, Side, Time,
};

/// Everything needed to advance one match
pub struct Match {
    pub world: World,
    pub time: Time,
    pub config: Config,
    pub score: Score,
    pub events: Events,
    pub inputs: InputQueue,
    pub rng: GameRng,
    pub serve: ServeState,
}

impl Match {
    /// Fresh match with both paddles centred and the ball docked at `Near`
    pub fn new(config: Config, seed: u64, modes: [ServeMode; 2]) -> Self {
        let mut world = World::new();
        create_paddle(&mut world, Side::Near, 0.0);
        create_paddle(&mut world, Side::Far, 0.0);
        create_ball(
            &mut world,
            Ball::docked(dock_position(&config, Side::Near, 0.0)),
        );

        let mut serve = ServeState::new(Side::Near, modes);
        serve.start_delay(Side::Near, config.serve_delay);

        Self {
            world,
            time: Time::default(),
            config,
            score: Score::new(),
            events: Events::new(),
            inputs: InputQueue::new(),
            rng: GameRng::new(seed),
            serve,
        }
    }

    /// Queue a paddle command for the next frame
    pub fn command(&mut self, side: Side, command: PaddleCommand) {
        self.inputs.push(side, command);
    }

    /// Run one authoritative frame of `dt` seconds
    pub fn advance(&mut self, dt: f32) -> &Events {
        self.time.dt = dt;
        step(
            &mut self.world,
            &mut self.time,
            &self.config,
            &mut self.score,
            &mut self.events,
            &mut self.inputs,
            &mut self.rng,
            &mut self.serve,
        );
        &self.events
    }

    /// Move paddles only; the ball is left for a remote authority to set
    pub fn advance_paddles(&mut self, dt: f32) {
        self.time.dt = dt;
        self.events.clear();
        step_paddles(&mut self.world, &mut self.time, &self.config, &mut self.inputs);
    }

    pub fn ball(&self) -> Ball {
        self.world
            .query::<&Ball>()
            .iter()
            .next()
            .map(|(_e, ball)| *ball)
            .unwrap_or_else(|| Ball::docked(dock_position(&self.config, self.serve.server, 0.0)))
    }

    /// Overwrite the ball with a received snapshot
    pub fn set_ball(&mut self, ball: Ball) {
        for (_entity, current) in self.world.query_mut::<&mut Ball>() {
            *current = ball;
        }
    }

    pub fn paddle_x(&self, side: Side) -> f32 {
        crate::paddle_x(&self.world, side).unwrap_or(0.0)
    }

    /// Overwrite a paddle position, clamped to the court
    pub fn set_paddle_x(&mut self, side: Side, x: f32) {
        let x = self.config.clamp_paddle_x(x);
        for (_entity, paddle) in self.world.query_mut::<&mut Paddle>() {
            if paddle.side == side {
                paddle.x = x;
            }
        }
    }

    /// Zero the score and dock the ball for `server`
    pub fn reset(&mut self, server: Side) {
        self.score.reset();
        self.events.clear();
        self.inputs.clear();
        self.serve.start_delay(server, self.config.serve_delay);

        let dock = dock_position(&self.config, server, self.paddle_x(server));
        for (_entity, ball) in self.world.query_mut::<&mut Ball>() {
            ball.dock(dock);
        }
    }

    /// Winner once the configured threshold is reached
    pub fn winner(&self) -> Option<Side> {
        self.config
            .win_score
            .and_then(|threshold| self.score.winner(threshold))
    }

    /// Events of the last frame, oldest first
    pub fn events(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }
}
