use crate::{
    AiController, Config, ConfigError, FrameView, GameEvent, InputSampler, KeyBindings, KeyState,
    Match, Opponent, ServeMode, Side,
};

/// Single-player court: human at the near end against the scripted far paddle
pub struct LocalGame {
    pub game: Match,
    sampler: InputSampler,
    opponent: Opponent,
}

impl LocalGame {
    pub fn new(seed: u64) -> Self {
        Self::build(Config::arena_3d(), KeyBindings::default(), seed)
    }

    pub fn with_config(
        config: Config,
        bindings: KeyBindings,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, bindings, seed))
    }

    fn build(config: Config, bindings: KeyBindings, seed: u64) -> Self {
        let ai = AiController::new(Side::Far, config.ai);
        let game = Match::new(config, seed, [ServeMode::Manual, ServeMode::Auto]);
        log::info!("[LOCAL] Single-player match started (seed {seed})");

        Self {
            game,
            sampler: InputSampler::new(bindings),
            opponent: Opponent::Scripted(ai),
        }
    }

    /// Sample input, move the AI and advance one frame
    pub fn tick(&mut self, keys: &impl KeyState, dt: f32) -> FrameView {
        let command = self.sampler.sample(keys);
        self.game.command(Side::Near, command);
        self.opponent.drive(&mut self.game, dt);
        self.game.advance(dt);

        for event in self.game.events() {
            if let GameEvent::Scored(side) = event {
                log::info!(
                    "[LOCAL] Point to {:?}, score {}-{}",
                    side,
                    self.game.score.near,
                    self.game.score.far
                );
            }
        }

        self.game.frame()
    }

    pub fn events(&self) -> impl Iterator<Item = &GameEvent> {
        self.game.events()
    }
}
