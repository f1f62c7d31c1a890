//! Log-backed stand-ins for the renderer and sound

use game_core::{AudioAdapter, Camera, FrameView, GameEvent, RenderAdapter};

/// Logs a one-line picture of the court every `every` frames
pub struct LogRenderer {
    camera: Camera,
    every: u32,
    frames: u32,
}

impl LogRenderer {
    pub fn new(half_length: f32, every: u32) -> Self {
        Self {
            camera: Camera::behind_near(half_length, 16.0 / 9.0),
            every: every.max(1),
            frames: 0,
        }
    }
}

impl RenderAdapter for LogRenderer {
    fn draw(&mut self, frame: &FrameView) {
        self.frames += 1;
        if self.frames % self.every != 0 {
            return;
        }
        let screen = self.camera.project(frame.ball.pos);
        log::debug!(
            "[VIEW] ball ({:.1}, {:.1}) screen {:?} paddles {:.1} / {:.1} score {}-{}",
            frame.ball.pos.x,
            frame.ball.pos.z,
            screen.map(|p| (p.x, p.y)),
            frame.paddles[0],
            frame.paddles[1],
            frame.score.near,
            frame.score.far
        );
    }
}

/// Counts and logs sound cues
#[derive(Default)]
pub struct LogAudio {
    pub hits: u32,
    pub bounces: u32,
}

impl AudioAdapter for LogAudio {
    fn play(&mut self, event: &GameEvent) {
        match event {
            GameEvent::PaddleHit(_) => self.hits += 1,
            GameEvent::WallBounce => self.bounces += 1,
            GameEvent::Served(_) | GameEvent::Scored(_) => {}
        }
        log::debug!("[AUDIO] {event:?}");
    }
}

