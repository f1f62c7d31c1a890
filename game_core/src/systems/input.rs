use hecs::World;

use crate::{InputQueue, Paddle, PaddleIntent};

/// Apply queued paddle commands to intents.
///
/// Returns which sides asked to serve, indexed by [`crate::Side::index`].
pub fn ingest_inputs(world: &mut World, inputs: &mut InputQueue) -> [bool; 2] {
    let mut serve_requested = [false; 2];

    for (side, command) in inputs.drain() {
        for (_entity, (paddle, intent)) in world.query_mut::<(&Paddle, &mut PaddleIntent)>() {
            if paddle.side == side {
                intent.dir = command.dir;
            }
        }
        if command.serve {
            serve_requested[side.index() as usize] = true;
        }
    }

    serve_requested
}
