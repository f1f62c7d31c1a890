//! What the rendering and audio collaborators consume
//!
//! Drawing and sound live outside this crate. The core hands them a
//! [`FrameView`] and the frame's [`GameEvent`]s; [`Camera`] is the 2.5D
//! projection helper for the flat networked court.

use glam::{Mat4, Vec2, Vec3};

use crate::{Ball, GameEvent, Match, Score, Side};

/// Snapshot of one frame for the render adapter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameView {
    pub ball: Ball,
    pub paddles: [f32; 2], // indexed by Side::index
    pub score: Score,
    pub server: Side,
    pub winner: Option<Side>,
}

impl FrameView {
    pub fn paddle(&self, side: Side) -> f32 {
        self.paddles[side.index() as usize]
    }
}

impl Match {
    /// Current state in the shape the renderer wants
    pub fn frame(&self) -> FrameView {
        FrameView {
            ball: self.ball(),
            paddles: [self.paddle_x(Side::Near), self.paddle_x(Side::Far)],
            score: self.score,
            server: self.serve.server,
            winner: self.winner(),
        }
    }
}

/// Draws a frame
pub trait RenderAdapter {
    fn draw(&mut self, frame: &FrameView);
}

/// Plays sound cues for gameplay events
pub trait AudioAdapter {
    fn play(&mut self, event: &GameEvent);
}

/// Perspective camera behind the near end, looking down the court
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub view: Mat4,
    pub projection: Mat4,
}

impl Camera {
    pub fn perspective(eye: Vec3, target: Vec3, fov_y: f32, aspect: f32) -> Self {
        let view = Mat4::look_at_rh(eye, target, Vec3::Y);
        let projection = Mat4::perspective_rh(fov_y, aspect, 0.1, 200.0);
        Self { view, projection }
    }

    /// Default 2.5D view of a court `half_length` deep
    pub fn behind_near(half_length: f32, aspect: f32) -> Self {
        let eye = Vec3::new(0.0, half_length * 0.9, -half_length * 1.6);
        Self::perspective(eye, Vec3::ZERO, 45f32.to_radians(), aspect)
    }

    /// Court point to normalised device coordinates, `None` behind the camera
    pub fn project(&self, point: Vec3) -> Option<Vec2> {
        let clip = self.projection * self.view * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        Some(Vec2::new(clip.x / clip.w, clip.y / clip.w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, ServeMode};

    #[test]
    fn test_frame_reflects_match() {
        let mut game = Match::new(Config::flat_court(), 3, [ServeMode::Auto; 2]);
        game.set_paddle_x(Side::Far, 2.0);
        let frame = game.frame();
        assert_eq!(frame.paddle(Side::Far), 2.0);
        assert_eq!(frame.paddle(Side::Near), 0.0);
        assert_eq!(frame.server, Side::Near);
        assert_eq!(frame.winner, None);
    }

    #[test]
    fn test_far_end_projects_above_near_end() {
        let camera = Camera::behind_near(16.0, 16.0 / 9.0);
        let near = camera.project(Vec3::new(0.0, 0.0, -14.0)).unwrap();
        let far = camera.project(Vec3::new(0.0, 0.0, 14.0)).unwrap();
        assert!(far.y > near.y, "Farther court points sit higher on screen");
    }

    #[test]
    fn test_far_objects_shrink() {
        let camera = Camera::behind_near(16.0, 1.0);
        let near_width = camera.project(Vec3::new(2.0, 0.0, -10.0)).unwrap().x
            - camera.project(Vec3::new(-2.0, 0.0, -10.0)).unwrap().x;
        let far_width = camera.project(Vec3::new(2.0, 0.0, 10.0)).unwrap().x
            - camera.project(Vec3::new(-2.0, 0.0, 10.0)).unwrap().x;
        assert!(far_width.abs() < near_width.abs());
    }

    #[test]
    fn test_point_behind_camera_is_culled() {
        let camera = Camera::behind_near(16.0, 1.0);
        assert_eq!(camera.project(Vec3::new(0.0, 14.4, -60.0)), None);
    }
}
