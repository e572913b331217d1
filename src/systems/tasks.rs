//! Task controller driver and movement tasks.
//!
//! [`run_task_controller`] is the update-pass entry point for entities with a
//! [`TaskController`]. [`MoveTo`] and [`PathTo`] are task work items that
//! hand a route to the owner's [`WaypointFollower`] and complete once it
//! has been walked.

use std::sync::Arc;

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::warn;

use crate::components::bounds::Bounds;
use crate::components::task::{Task, TaskWork};
use crate::components::taskcontroller::TaskController;
use crate::components::waypoints::WaypointFollower;
use crate::pathfinding::Grid;

/// Step the task controller of `entity` by one frame.
///
/// The controller is moved out of the entity while it runs, so task actions
/// get unrestricted world access. Changes they make to the entity's
/// controller in the meantime are merged back afterwards.
pub fn run_task_controller(world: &mut World, entity: Entity, elapsed: f32) {
    let mut controller = {
        let Some(mut slot) = world.get_mut::<TaskController>(entity) else {
            return;
        };
        std::mem::take(&mut *slot)
    };
    controller.step(world, entity, elapsed);
    if let Some(mut slot) = world.get_mut::<TaskController>(entity) {
        let during = std::mem::replace(&mut *slot, controller);
        slot.absorb(during);
    }
}

fn install_route(world: &mut World, owner: Entity, route: Vec<Vec2>) {
    let Some(origin) = world.get::<Bounds>(owner).map(Bounds::position) else {
        warn!("{:?} cannot follow a route without Bounds", owner);
        return;
    };
    match world.get_mut::<WaypointFollower>(owner) {
        Some(mut follower) => follower.set_waypoints(origin, route),
        None => warn!("{:?} cannot follow a route without a WaypointFollower", owner),
    }
}

fn route_walked(world: &World, owner: Entity) -> bool {
    world
        .get::<WaypointFollower>(owner)
        .is_none_or(WaypointFollower::reached_destination)
}

/// Walk straight through a fixed list of points.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveTo {
    pub route: Vec<Vec2>,
}

impl MoveTo {
    pub fn new(route: impl IntoIterator<Item = Vec2>) -> Self {
        Self {
            route: route.into_iter().collect(),
        }
    }
}

impl TaskWork for MoveTo {
    fn start(&mut self, world: &mut World, owner: Entity) {
        install_route(world, owner, self.route.clone());
    }

    fn update(&mut self, _world: &mut World, _owner: Entity, _elapsed: f32) {}

    fn is_done(&self, world: &World, owner: Entity) -> bool {
        route_walked(world, owner)
    }
}

/// Walk to `goal` along a grid path computed when the task starts.
///
/// An unreachable goal is not an error: a warning is logged and an empty
/// route installed, so the task completes instead of stalling the chain.
#[derive(Debug, Clone)]
pub struct PathTo {
    pub goal: Vec2,
    pub grid: Arc<Grid>,
}

impl PathTo {
    pub fn new(goal: Vec2, grid: Arc<Grid>) -> Self {
        Self { goal, grid }
    }
}

impl TaskWork for PathTo {
    fn start(&mut self, world: &mut World, owner: Entity) {
        let Some(origin) = world.get::<Bounds>(owner).map(Bounds::position) else {
            warn!("{:?} cannot path without Bounds", owner);
            return;
        };
        let route = self.grid.find_world_path(origin, self.goal).unwrap_or_else(|| {
            warn!(
                "no path for {:?} from {:?} to {:?}, using an empty route",
                owner, origin, self.goal
            );
            Vec::new()
        });
        install_route(world, owner, route);
    }

    fn update(&mut self, _world: &mut World, _owner: Entity, _elapsed: f32) {}

    fn is_done(&self, world: &World, owner: Entity) -> bool {
        route_walked(world, owner)
    }
}

impl Task {
    /// Walk through `route` with the owner's [`WaypointFollower`].
    pub fn move_to(route: impl IntoIterator<Item = Vec2>) -> Task {
        Task::with_work("move_to", MoveTo::new(route))
    }

    /// Walk to `goal` along a path found on `grid`.
    pub fn path_to(goal: Vec2, grid: Arc<Grid>) -> Task {
        Task::with_work("path_to", PathTo::new(goal, grid))
    }
}
