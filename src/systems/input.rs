//! Input collaborator adapter.

use bevy_ecs::prelude::*;

use crate::resources::input::{InputSnapshot, InputState};

/// Fold this frame's raw input into [`InputState`], creating it if needed.
pub fn apply_input(world: &mut World, snapshot: &InputSnapshot) {
    world
        .get_resource_or_insert_with(InputState::default)
        .apply(snapshot);
}
