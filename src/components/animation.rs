use bevy_ecs::prelude::Component;

/// Looping frame animation.
///
/// Advances one frame every `frame_time` seconds of world time and wraps at
/// the end of `frames`.
#[derive(Debug, Clone, Component, PartialEq)]
pub struct Animation {
    /// Spritesheet frame names, in playback order.
    pub frames: Vec<String>,
    /// Seconds each frame stays visible.
    pub frame_time: f32,
    pub frame_index: usize,
    pub elapsed_time: f32,
}

impl Animation {
    pub fn new(frames: Vec<String>, fps: f32) -> Self {
        Self {
            frames,
            frame_time: 1.0 / fps,
            frame_index: 0,
            elapsed_time: 0.0,
        }
    }

    /// Name of the visible frame.
    pub fn current(&self) -> Option<&str> {
        self.frames.get(self.frame_index).map(String::as_str)
    }
}
