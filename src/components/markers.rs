//! Marker components of the gameplay world.

use bevy_ecs::prelude::Component;

/// The pointer-controlled animated sprite.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Player;

/// One of the rotating numbered tiles; `index` is its position in `0..count`.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObjectTile {
    pub index: usize,
}
