//! User-defined per-entity controllers and render hooks.
//!
//! Built-in controllers (tasks, waypoints, edge scroll, move-fade-remove)
//! are plain components. Anything else goes into [`Behaviours`]: an ordered
//! list of [`Controller`] trait objects run after the built-ins, in the
//! order they were attached. Any `FnMut(&mut World, Entity, f32)` closure
//! is a controller.
//!
//! [`RenderHook`] runs during the render pass, right before its entity is
//! drawn. It may change the scene (including removing nodes) through the
//! deferred API in [`crate::systems::scene`].

use std::fmt;

use bevy_ecs::prelude::*;

/// Per-frame behaviour attached to an entity.
pub trait Controller: Send + Sync {
    fn update(&mut self, world: &mut World, owner: Entity, elapsed: f32);

    /// Finished controllers are detached after their update.
    fn is_finished(&self) -> bool {
        false
    }
}

impl<F> Controller for F
where
    F: FnMut(&mut World, Entity, f32) + Send + Sync,
{
    fn update(&mut self, world: &mut World, owner: Entity, elapsed: f32) {
        self(world, owner, elapsed)
    }
}

/// Ordered custom controllers of one entity.
#[derive(Component, Default)]
pub struct Behaviours {
    pub(crate) list: Vec<Box<dyn Controller>>,
}

impl Behaviours {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, controller: impl Controller + 'static) -> Self {
        self.push(controller);
        self
    }

    pub fn push(&mut self, controller: impl Controller + 'static) {
        self.list.push(Box::new(controller));
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

impl fmt::Debug for Behaviours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Behaviours").field("len", &self.list.len()).finish()
    }
}

pub type RenderFn = Box<dyn FnMut(&mut World, Entity, f32) + Send + Sync>;

/// Callback invoked when the render pass reaches its entity.
#[derive(Component, Default)]
pub struct RenderHook {
    pub(crate) hook: Option<RenderFn>,
}

impl RenderHook {
    pub fn new(hook: impl FnMut(&mut World, Entity, f32) + Send + Sync + 'static) -> Self {
        Self {
            hook: Some(Box::new(hook)),
        }
    }
}

impl fmt::Debug for RenderHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderHook")
            .field("set", &self.hook.is_some())
            .finish()
    }
}
