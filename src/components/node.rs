//! Containment flags and the screen root marker.
//!
//! Every entity that takes part in the scene graph carries a [`SceneNode`].
//! The parent/children relation itself is the ECS hierarchy
//! ([`ChildOf`](bevy_ecs::hierarchy::ChildOf) on the child,
//! [`Children`](bevy_ecs::hierarchy::Children) on the parent), managed only
//! through [`crate::systems::scene`] so that the add/remove contract holds.

use bevy_ecs::prelude::Component;

use crate::components::tint::Color;

/// Lifecycle flags of a scene node.
///
/// - `active`: the node (and its subtree) takes part in the update pass.
/// - `visible`: the node (and its subtree) takes part in the render pass
///   and in hit testing.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneNode {
    pub active: bool,
    pub visible: bool,
}

impl Default for SceneNode {
    fn default() -> Self {
        Self {
            active: true,
            visible: true,
        }
    }
}

impl SceneNode {
    pub fn hidden() -> Self {
        Self {
            active: true,
            visible: false,
        }
    }

    pub fn inactive() -> Self {
        Self {
            active: false,
            visible: true,
        }
    }
}

/// Root of a traversal. Receives the engine's per-frame update and render.
#[derive(Component, Clone, Copy, Debug)]
pub struct Screen {
    /// Cleared to before any entity is drawn.
    pub background: Color,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            background: Color::CORNFLOWER,
        }
    }
}
