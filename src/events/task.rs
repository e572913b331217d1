//! Task lifecycle notifications.
//!
//! Triggered by [`Task::start`](crate::components::task::Task::start) and
//! [`Task::complete`](crate::components::task::Task::complete) for every
//! task, including the sub-tasks of a group. `entity` is the task's owner.

use bevy_ecs::prelude::*;

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct TaskStarted {
    pub entity: Entity,
    pub label: String,
}

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct TaskCompleted {
    pub entity: Entity,
    pub label: String,
}
