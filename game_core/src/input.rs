//! Keyboard input sampling
//!
//! The UI layer keeps a live map of held keys; the sampler reads it once per
//! tick and turns it into a [`PaddleCommand`].

use std::collections::HashSet;

/// Live key state owned by the input collaborator
pub trait KeyState {
    fn is_down(&self, key: &str) -> bool;
}

/// Held-key set fed by key down / key up events
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<String>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: &str) {
        self.held.insert(key.to_string());
    }

    pub fn release(&mut self, key: &str) {
        self.held.remove(key);
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }
}

impl KeyState for KeyboardState {
    fn is_down(&self, key: &str) -> bool {
        self.held.contains(key)
    }
}

/// Paddle intent for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaddleCommand {
    pub dir: i8, // -1, 0 or 1
    pub serve: bool,
}

impl PaddleCommand {
    pub fn new(dir: i8, serve: bool) -> Self {
        Self {
            dir: dir.signum(),
            serve,
        }
    }
}

/// Key names mapped to paddle actions
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub serve: Vec<String>,
    /// Swap left/right, for a player viewing the court from the far end
    pub mirrored: bool,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: vec!["ArrowLeft".into(), "a".into(), "A".into()],
            right: vec!["ArrowRight".into(), "d".into(), "D".into()],
            serve: vec![" ".into(), "Enter".into()],
            mirrored: false,
        }
    }
}

impl KeyBindings {
    pub fn mirrored() -> Self {
        Self {
            mirrored: true,
            ..Self::default()
        }
    }
}

/// Converts held keys into paddle commands
#[derive(Debug, Clone, Default)]
pub struct InputSampler {
    bindings: KeyBindings,
}

impl InputSampler {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    pub fn sample(&self, keys: &impl KeyState) -> PaddleCommand {
        let any = |names: &[String]| names.iter().any(|k| keys.is_down(k));

        // Both directions held cancel out
        let mut dir = any(&self.bindings.right) as i8 - any(&self.bindings.left) as i8;
        if self.bindings.mirrored {
            dir = -dir;
        }

        PaddleCommand::new(dir, any(&self.bindings.serve))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_keys_is_idle() {
        let sampler = InputSampler::default();
        let keys = KeyboardState::new();
        assert_eq!(sampler.sample(&keys), PaddleCommand::default());
    }

    #[test]
    fn test_left_and_right() {
        let sampler = InputSampler::default();
        let mut keys = KeyboardState::new();

        keys.press("ArrowLeft");
        assert_eq!(sampler.sample(&keys).dir, -1);

        keys.release("ArrowLeft");
        keys.press("d");
        assert_eq!(sampler.sample(&keys).dir, 1);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let sampler = InputSampler::default();
        let mut keys = KeyboardState::new();
        keys.press("a");
        keys.press("ArrowRight");
        assert_eq!(sampler.sample(&keys).dir, 0);
    }

    #[test]
    fn test_mirrored_bindings_flip_direction() {
        let sampler = InputSampler::new(KeyBindings::mirrored());
        let mut keys = KeyboardState::new();
        keys.press("ArrowLeft");
        assert_eq!(sampler.sample(&keys).dir, 1);
    }

    #[test]
    fn test_serve_key() {
        let sampler = InputSampler::default();
        let mut keys = KeyboardState::new();
        keys.press(" ");
        let command = sampler.sample(&keys);
        assert!(command.serve);
        assert_eq!(command.dir, 0);
    }
}
