//! Simulated clock of the gameplay world.

use bevy_ecs::prelude::Resource;

/// Seconds simulated so far and the length of the latest step, both scaled
/// by `time_scale`.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
    pub time_scale: f32,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
        }
    }
}

impl WorldTime {
    /// Account for one fixed step of `step_secs` unscaled seconds.
    pub fn advance(&mut self, step_secs: f32) {
        self.delta = step_secs * self.time_scale;
        self.elapsed += self.delta;
    }
}
