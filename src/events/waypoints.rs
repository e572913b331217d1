//! Waypoint follower notifications.

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::components::waypoints::Direction;

/// One waypoint was reached and consumed. Several may fire in one frame.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct WaypointArrived {
    pub entity: Entity,
    pub waypoint: Vec2,
}

/// The discretized movement direction changed.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionChanged {
    pub entity: Entity,
    pub direction: Direction,
}

/// The last waypoint of the route was consumed.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestinationReached {
    pub entity: Entity,
}
