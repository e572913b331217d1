//! Y-sorted layering.
//!
//! Entities with a [`YSortLayer`] get their [`Layer`] recomputed from their
//! Y position every time it changes, so entities further down the screen
//! are drawn (and hit-tested) in front.

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;

use crate::components::bounds::Bounds;
use crate::components::layer::{Layer, YSortLayer};
use crate::events::scene::PositionChanged;

/// Observer: recompute the layer of a moved Y-sorted entity.
pub fn observe_y_sort(trigger: On<PositionChanged>, mut query: Query<(&YSortLayer, &mut Layer)>) {
    let event = trigger.event();
    if let Ok((ysort, mut layer)) = query.get_mut(event.entity) {
        layer.0 = ysort.layer_for(event.new.y);
    }
}

/// Recompute every Y-sorted layer from the current positions. Use after
/// building a scene, before anything has moved.
pub fn refresh_y_sort(world: &mut World) {
    let mut query = world.query::<(&YSortLayer, &Bounds, &mut Layer)>();
    for (ysort, bounds, mut layer) in query.iter_mut(world) {
        layer.0 = ysort.layer_for(bounds.0.y);
    }
}
