//! Containment and movement notifications.
//!
//! [`NodeAdded`] and [`NodeRemoved`] are triggered when a structural change
//! is actually applied, which during a traversal pass means at the end of
//! the pass. [`PositionChanged`] is triggered by
//! [`set_position`](crate::systems::scene::set_position) and friends.
//!
//! # Example
//!
//! ```ignore
//! world.add_observer(|trigger: On<NodeRemoved>| {
//!     log::debug!("{:?} left {:?}", trigger.event().entity, trigger.event().parent);
//! });
//! ```

use bevy_ecs::prelude::*;
use glam::Vec2;

/// `entity` was attached under `parent`.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeAdded {
    pub entity: Entity,
    pub parent: Entity,
}

/// `entity` was detached from `parent`. Its own children are untouched.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRemoved {
    pub entity: Entity,
    pub parent: Entity,
}

/// The `x`/`y` of an entity's [`Bounds`](crate::components::bounds::Bounds) changed.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PositionChanged {
    pub entity: Entity,
    pub old: Vec2,
    pub new: Vec2,
}
