use bevy_ecs::prelude::Component;

/// Sprite drawn from the gameplay spritesheet. `frame` names a spritesheet
/// frame; the frame's size in world units is the sprite size.
#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct Sprite {
    pub frame: String,
}

impl Sprite {
    pub fn new(frame: impl Into<String>) -> Self {
        Self {
            frame: frame.into(),
        }
    }
}

/// Name of the numbered square frame `n` (1-based) of the demo spritesheet.
pub fn numbered_square(n: usize) -> String {
    format!("numbered_squares_{:02}", n)
}
