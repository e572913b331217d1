//! Simulation clock update.

use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Advance [`WorldTime`] by `dt` real seconds. Returns the scaled delta.
pub fn update_world_time(world: &mut World, dt: f32) -> f32 {
    let mut wt = world.get_resource_or_insert_with(WorldTime::default);
    let scaled_dt = dt.max(0.0) * wt.time_scale;
    wt.elapsed += scaled_dt;
    wt.delta = scaled_dt;
    wt.frame_count += 1;
    scaled_dt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_scale_applies_to_delta_and_elapsed() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default().with_time_scale(0.5));
        assert_eq!(update_world_time(&mut world, 1.0), 0.5);
        update_world_time(&mut world, 1.0);
        let wt = world.resource::<WorldTime>();
        assert_eq!(wt.elapsed, 1.0);
        assert_eq!(wt.frame_count, 2);
    }
}
