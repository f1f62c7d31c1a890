use crate::{AiController, Match, Side};

/// Last paddle coordinate received from the other participant
#[derive(Debug, Clone, Copy)]
pub struct RemotePaddle {
    side: Side,
    latest: Option<f32>,
}

impl RemotePaddle {
    pub fn new(side: Side) -> Self {
        Self { side, latest: None }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Record a received position; later writes replace earlier ones
    pub fn receive(&mut self, x: f32) {
        self.latest = Some(x);
    }

    pub fn latest(&self) -> Option<f32> {
        self.latest
    }
}

/// Whoever drives the paddle the local player is not holding
#[derive(Debug, Clone)]
pub enum Opponent {
    Scripted(AiController),
    Remote(RemotePaddle),
}

impl Opponent {
    pub fn side(&self) -> Side {
        match self {
            Opponent::Scripted(ai) => ai.side(),
            Opponent::Remote(remote) => remote.side(),
        }
    }

    /// Record a position received from the network; scripted opponents ignore it
    pub fn receive(&mut self, x: f32) {
        if let Opponent::Remote(remote) = self {
            remote.receive(x);
        }
    }

    /// Move the opponent's paddle for this tick
    pub fn drive(&mut self, game: &mut Match, dt: f32) {
        match self {
            Opponent::Scripted(ai) => {
                let side = ai.side();
                let x = ai.update(&game.ball(), game.paddle_x(side), &game.config, dt);
                game.set_paddle_x(side, x);
            }
            Opponent::Remote(remote) => {
                if let Some(x) = remote.latest() {
                    game.set_paddle_x(remote.side(), x);
                }
            }
        }
    }
}
