use bevy_ecs::prelude::Resource;

/// Number of [`ObjectTile`](crate::components::markers::ObjectTile)s the
/// gameplay world should hold. Copied from the shared state every update.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ObjectCount(pub usize);
