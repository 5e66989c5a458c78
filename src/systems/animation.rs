//! Frame animation system.
//!
//! [`animation`] advances every [`Animation`] by the world time delta and
//! copies the visible frame name into the entity's [`Sprite`].

use bevy_ecs::prelude::*;

use crate::components::animation::Animation;
use crate::components::sprite::Sprite;
use crate::resources::worldtime::WorldTime;

/// Advance animation playback and update the sprite frame.
pub fn animation(time: Res<WorldTime>, mut query: Query<(&mut Animation, &mut Sprite)>) {
    for (mut anim, mut sprite) in query.iter_mut() {
        if anim.frames.is_empty() || anim.frame_time <= 0.0 {
            continue;
        }
        anim.elapsed_time += time.delta;
        while anim.elapsed_time >= anim.frame_time {
            anim.elapsed_time -= anim.frame_time;
            anim.frame_index = (anim.frame_index + 1) % anim.frames.len();
        }
        if let Some(name) = anim.current() {
            if sprite.frame != name {
                sprite.frame = name.to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::sprite::numbered_square;

    fn frames() -> Vec<String> {
        (1..=4).map(numbered_square).collect()
    }

    fn world_with_delta(delta: f32) -> World {
        let mut world = World::new();
        world.insert_resource(WorldTime {
            delta,
            ..Default::default()
        });
        world
    }

    #[test]
    fn test_advances_and_wraps() {
        let mut world = world_with_delta(0.26);
        let entity = world
            .spawn((Animation::new(frames(), 10.0), Sprite::new(numbered_square(1))))
            .id();
        let mut schedule = Schedule::default();
        schedule.add_systems(animation);

        schedule.run(&mut world);
        let anim = world.get::<Animation>(entity).unwrap();
        assert_eq!(anim.frame_index, 2);
        assert_eq!(world.get::<Sprite>(entity).unwrap().frame, "numbered_squares_03");

        schedule.run(&mut world);
        assert_eq!(world.get::<Animation>(entity).unwrap().frame_index, 1);
    }

    #[test]
    fn test_empty_animation_is_left_alone() {
        let mut world = world_with_delta(1.0);
        let entity = world
            .spawn((Animation::new(Vec::new(), 10.0), Sprite::new("static")))
            .id();
        let mut schedule = Schedule::default();
        schedule.add_systems(animation);
        schedule.run(&mut world);
        assert_eq!(world.get::<Sprite>(entity).unwrap().frame, "static");
    }
}
