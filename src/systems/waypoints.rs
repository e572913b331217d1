//! Waypoint follower controller step.

use bevy_ecs::prelude::*;
use log::warn;

use crate::components::bounds::Bounds;
use crate::components::waypoints::WaypointFollower;
use crate::events::waypoints::{DestinationReached, DirectionChanged, WaypointArrived};
use crate::systems::scene::set_position;

/// Advance `entity` along its route and trigger the follower events.
///
/// Order per frame: [`DirectionChanged`] (if the direction changed), one
/// [`WaypointArrived`] per consumed waypoint, then [`DestinationReached`]
/// when the last one was consumed.
pub fn follow_waypoints(world: &mut World, entity: Entity, elapsed: f32) {
    let Some(position) = world.get::<Bounds>(entity).map(Bounds::position) else {
        return;
    };
    let step = {
        let Some(mut follower) = world.get_mut::<WaypointFollower>(entity) else {
            return;
        };
        if follower.reached_destination() {
            return;
        }
        follower.advance(position, elapsed)
    };
    if let Err(e) = set_position(world, entity, step.position) {
        warn!("waypoint follower could not move {:?}: {}", entity, e);
    }
    if let Some(direction) = step.direction_changed {
        world.trigger(DirectionChanged { entity, direction });
    }
    for waypoint in step.arrived {
        world.trigger(WaypointArrived { entity, waypoint });
    }
    if step.reached {
        world.trigger(DestinationReached { entity });
    }
}
