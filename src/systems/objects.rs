//! Rotating numbered tiles.
//!
//! [`sync_objects`] keeps exactly [`ObjectCount`] tiles alive. When the count
//! changes every tile is rebuilt, because each tile's position depends on the
//! total.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::mapposition::MapPosition;
use crate::components::markers::ObjectTile;
use crate::components::rotation::Rotation;
use crate::components::sprite::{Sprite, numbered_square};
use crate::components::zindex::ZIndex;
use crate::resources::objectcount::ObjectCount;

/// Components of tile `index` out of `count`.
///
/// Tiles lie on the diagonal spanning roughly `-10..10`, each rotated 15
/// degrees more than the previous one and cycling through the 16 numbered
/// frames.
pub fn object_tile(index: usize, count: usize) -> (ObjectTile, MapPosition, Rotation, Sprite, ZIndex) {
    let coord = (index as f32 - (count / 2) as f32) / (count as f32 / 20.0);
    (
        ObjectTile { index },
        MapPosition::new(coord, coord),
        Rotation {
            degrees: ((index * 15) % 360) as f32,
        },
        Sprite::new(numbered_square(index % 16 + 1)),
        ZIndex(0),
    )
}

/// Rebuild the tiles when their number differs from [`ObjectCount`].
pub fn sync_objects(
    mut commands: Commands,
    count: Res<ObjectCount>,
    tiles: Query<Entity, With<ObjectTile>>,
) {
    let existing = tiles.iter().count();
    if existing == count.0 {
        return;
    }
    debug!("rebuilding object tiles: {} -> {}", existing, count.0);
    for entity in tiles.iter() {
        commands.entity(entity).despawn();
    }
    for index in 0..count.0 {
        commands.spawn(object_tile(index, count.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_tile_layout() {
        let (tile, pos, rot, sprite, _) = object_tile(0, 64);
        assert_eq!(tile.index, 0);
        assert_eq!(pos, MapPosition::new(-10.0, -10.0));
        assert_eq!(rot.degrees, 0.0);
        assert_eq!(sprite.frame, "numbered_squares_01");

        let (_, pos, rot, sprite, _) = object_tile(17, 64);
        assert!((pos.x - (-15.0 / 3.2)).abs() < 1e-5);
        assert_eq!(rot.degrees, 255.0);
        assert_eq!(sprite.frame, "numbered_squares_02");
    }

    #[test]
    fn test_sync_rebuilds_on_change() {
        let mut world = World::new();
        world.insert_resource(ObjectCount(64));
        let mut schedule = Schedule::default();
        schedule.add_systems(sync_objects);
        schedule.run(&mut world);

        let mut q = world.query::<&ObjectTile>();
        assert_eq!(q.iter(&world).count(), 64);

        world.resource_mut::<ObjectCount>().0 = 128;
        schedule.run(&mut world);
        assert_eq!(q.iter(&world).count(), 128);

        world.resource_mut::<ObjectCount>().0 = 0;
        schedule.run(&mut world);
        assert_eq!(q.iter(&world).count(), 0);
    }
}
