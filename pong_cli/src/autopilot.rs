use game_core::{FrameView, KeyboardState, PaddleCommand, Side};

/// Distance at which the paddle stops chasing
const DEADZONE: f32 = 0.3;

/// Chase the ball while it comes toward `side`, drift home otherwise,
/// and serve as soon as the ball is docked on our paddle
pub fn track(frame: &FrameView, side: Side) -> PaddleCommand {
    let ball = &frame.ball;
    let target = if !ball.in_play || ball.moving_toward(side) {
        ball.pos.x
    } else {
        0.0
    };

    let diff = target - frame.paddle(side);
    let dir = if diff.abs() <= DEADZONE {
        0
    } else if diff > 0.0 {
        1
    } else {
        -1
    };
    let serve = !ball.in_play && frame.server == side;
    PaddleCommand::new(dir, serve)
}

/// Hold the default keys that produce `command`
pub fn press(keys: &mut KeyboardState, command: PaddleCommand) {
    keys.clear();
    match command.dir {
        d if d < 0 => keys.press("ArrowLeft"),
        d if d > 0 => keys.press("ArrowRight"),
        _ => {}
    }
    if command.serve {
        keys.press(" ");
    }
}
