//! Error type shared by the scene graph, task and widget APIs.
//!
//! Every variant signals a programmer or configuration error. The engine
//! never retries on these; callers are expected to propagate them to the
//! host application. Recoverable conditions (such as an unreachable path
//! destination) are logged and handled in place instead.

use bevy_ecs::prelude::Entity;

/// Errors raised by scene composition and configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    /// The entity does not exist in the world.
    #[error("entity {0:?} does not exist")]
    MissingEntity(Entity),

    /// The child already has a parent and must be removed first.
    #[error("entity {child:?} is already attached to {parent:?}")]
    AlreadyParented { child: Entity, parent: Entity },

    /// Attempted to add a node to itself.
    #[error("entity {0:?} cannot be its own parent")]
    SelfParent(Entity),

    /// Attaching the child would make it an ancestor of itself.
    #[error("attaching {child:?} to {parent:?} would create a cycle")]
    CycleDetected { child: Entity, parent: Entity },

    /// The node has no parent to be removed from.
    #[error("entity {0:?} is not attached to a parent")]
    NotAttached(Entity),

    /// The node is attached, but not to the given parent.
    #[error("entity {child:?} is not a child of {parent:?}")]
    NotAChild { child: Entity, parent: Entity },

    /// A task group needs at least one sub-task.
    #[error("task group `{0}` has no tasks")]
    EmptyTaskGroup(String),

    /// A paged panel needs at least one page.
    #[error("paged panel has no pages")]
    EmptyPagedPanel,

    /// Requested page index does not exist.
    #[error("page {index} out of range (panel has {count} pages)")]
    PageOutOfRange { index: usize, count: usize },

    /// Read the next waypoint of a follower whose route is empty.
    #[error("waypoint route is empty")]
    NoWaypoints,

    /// The entity has no `Camera` component.
    #[error("entity {0:?} is not a camera")]
    NotACamera(Entity),

    /// A component the operation needs is missing from the entity.
    #[error("entity {entity:?} has no {component} component")]
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },

    /// Configuration file could not be read, parsed or written.
    #[error("config error: {0}")]
    Config(String),
}
