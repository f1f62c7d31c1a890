use game_core::{Ball, Score};
use glam::Vec3;
use proto::BallState;

pub fn ball_to_wire(ball: &Ball) -> BallState {
    BallState {
        pos: ball.pos.to_array(),
        vel: ball.vel.to_array(),
        in_play: ball.in_play,
    }
}

pub fn ball_from_wire(state: &BallState) -> Ball {
    Ball {
        pos: Vec3::from_array(state.pos),
        vel: Vec3::from_array(state.vel),
        in_play: state.in_play,
    }
}

/// [near, far]
pub fn score_to_wire(score: &Score) -> [u8; 2] {
    [score.near, score.far]
}

pub fn score_from_wire(score: [u8; 2]) -> Score {
    Score {
        near: score[0],
        far: score[1],
    }
}
