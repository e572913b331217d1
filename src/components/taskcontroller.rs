//! Task chain runner component.
//!
//! A [`TaskController`] owns the head of a [`Task`] chain and steps it once
//! per frame during the update pass. When the head completes it is dropped
//! and its successor becomes current. With no task at all the controller
//! asks its factory (if any) for a fresh one, every frame until the factory
//! returns `Some`.
//!
//! The controller is taken out of its entity while it runs, so task actions
//! may freely use the world, including calling [`TaskController::set_task`],
//! [`TaskController::cancel`] or [`TaskController::set_factory`] on the same
//! entity. Those calls land on a placeholder and are merged back
//! afterwards; see [`crate::systems::tasks::run_task_controller`].
//!
//! # Example
//!
//! ```ignore
//! let patrol = TaskController::with_factory(|world, npc| {
//!     Some(Task::wait(1.0).then(Task::with_work("walk", MoveTo::new([goal]))))
//! });
//! world.entity_mut(npc).insert(patrol);
//! ```

use std::fmt;

use bevy_ecs::prelude::*;

use crate::components::task::Task;

/// Produces the next task when the controller is idle.
pub type TaskFactory = Box<dyn FnMut(&mut World, Entity) -> Option<Task> + Send + Sync>;

#[derive(Component, Default)]
pub struct TaskController {
    current: Option<Box<Task>>,
    factory: Option<TaskFactory>,
    /// Set by [`cancel`](Self::cancel) while the controller is running.
    cancelled: bool,
}

impl TaskController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_task(task: Task) -> Self {
        Self {
            current: Some(Box::new(task)),
            ..Self::default()
        }
    }

    pub fn with_factory(
        factory: impl FnMut(&mut World, Entity) -> Option<Task> + Send + Sync + 'static,
    ) -> Self {
        Self {
            factory: Some(Box::new(factory)),
            ..Self::default()
        }
    }

    pub fn current_task(&self) -> Option<&Task> {
        self.current.as_deref()
    }

    pub fn is_idle(&self) -> bool {
        self.current.is_none()
    }

    pub fn has_factory(&self) -> bool {
        self.factory.is_some()
    }

    /// Replace the whole chain. The replaced task is dropped without its
    /// complete actions running.
    pub fn set_task(&mut self, task: Task) {
        self.current = Some(Box::new(task));
        self.cancelled = false;
    }

    /// Drop the current chain. The factory, if any, is consulted next frame.
    pub fn cancel(&mut self) {
        self.current = None;
        self.cancelled = true;
    }

    pub fn set_factory(
        &mut self,
        factory: impl FnMut(&mut World, Entity) -> Option<Task> + Send + Sync + 'static,
    ) {
        self.factory = Some(Box::new(factory));
    }

    /// Run one frame for `owner`.
    pub fn step(&mut self, world: &mut World, owner: Entity, elapsed: f32) {
        if self.current.is_none() {
            if let Some(factory) = self.factory.as_mut() {
                self.current = factory(world, owner).map(Box::new);
            }
        }
        let Some(task) = self.current.as_mut() else {
            return;
        };
        task.update(world, owner, elapsed);
        if task.is_complete(world, owner) {
            task.complete(world, owner);
            self.current = task.take_next();
        }
    }

    /// Fold in changes that task actions made to the placeholder left in the
    /// entity while `self` was running.
    pub(crate) fn absorb(&mut self, during: TaskController) {
        if during.cancelled {
            self.current = None;
        }
        if during.current.is_some() {
            self.current = during.current;
        }
        if during.factory.is_some() {
            self.factory = during.factory;
        }
    }
}

impl fmt::Debug for TaskController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskController")
            .field("current", &self.current)
            .field("factory", &self.factory.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_advances_to_next_on_completion() {
        let mut world = World::new();
        let owner = world.spawn_empty().id();
        let mut ctl = TaskController::with_task(Task::new("a").then(Task::new("b")));
        ctl.step(&mut world, owner, 0.1);
        assert_eq!(ctl.current_task().unwrap().label(), "b");
        ctl.step(&mut world, owner, 0.1);
        assert!(ctl.is_idle());
    }

    #[test]
    fn factory_is_polled_until_it_yields() {
        let mut world = World::new();
        let owner = world.spawn_empty().id();
        let mut calls = 0;
        let mut ctl = TaskController::with_factory(move |_, _| {
            calls += 1;
            (calls >= 3).then(|| Task::wait(10.0))
        });
        ctl.step(&mut world, owner, 0.1);
        ctl.step(&mut world, owner, 0.1);
        assert!(ctl.is_idle());
        ctl.step(&mut world, owner, 0.1);
        assert_eq!(ctl.current_task().unwrap().label(), "wait");
    }

    #[test]
    fn absorb_prefers_changes_made_during_run() {
        let mut ctl = TaskController::with_task(Task::new("old"));
        let mut during = TaskController::new();
        during.set_task(Task::new("new"));
        ctl.absorb(during);
        assert_eq!(ctl.current_task().unwrap().label(), "new");

        let mut during = TaskController::new();
        during.cancel();
        ctl.absorb(during);
        assert!(ctl.is_idle());
    }
}
