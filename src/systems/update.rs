//! Update traversal.
//!
//! Visits active nodes depth-first from a screen. Each node runs its
//! controllers, then its children in insertion order (layers only matter for
//! render and hit test). Controllers run in a fixed order:
//!
//! 1. [`TaskController`](crate::components::taskcontroller::TaskController)
//! 2. [`WaypointFollower`](crate::components::waypoints::WaypointFollower)
//! 3. [`EdgeScroll`](crate::components::camera::EdgeScroll)
//! 4. [`MoveFadeRemove`](crate::components::fadeout::MoveFadeRemove)
//! 5. [`Behaviours`], in attach order
//!
//! so a parent's controllers always run before its children's.

use bevy_ecs::prelude::*;

use crate::components::behaviour::Behaviours;
use crate::resources::scenegraph::Pass;
use crate::systems::camera::edge_scroll;
use crate::systems::fadeout::move_fade_remove;
use crate::systems::scene::{begin_pass, children_of, end_pass, flush_pending, live_flags};
use crate::systems::tasks::run_task_controller;
use crate::systems::waypoints::follow_waypoints;

type ControllerStep = fn(&mut World, Entity, f32);

const CONTROLLERS: [ControllerStep; 5] = [
    run_task_controller,
    follow_waypoints,
    edge_scroll,
    move_fade_remove,
    run_behaviours,
];

/// Run one update pass over the tree rooted at `screen`.
pub fn update_screen(world: &mut World, screen: Entity, elapsed: f32) {
    flush_pending(world);
    begin_pass(world, Pass::Update);
    update_node(world, screen, elapsed);
    end_pass(world);
}

fn update_node(world: &mut World, entity: Entity, elapsed: f32) {
    if !live_flags(world, entity).is_some_and(|f| f.active) {
        return;
    }
    run_controllers(world, entity, elapsed);
    if live_flags(world, entity).is_none() {
        return;
    }
    for child in children_of(world, entity) {
        update_node(world, child, elapsed);
    }
}

/// Run every controller attached to `entity`, stopping early if one of them
/// removes it.
pub fn run_controllers(world: &mut World, entity: Entity, elapsed: f32) {
    for step in CONTROLLERS {
        if live_flags(world, entity).is_none() {
            break;
        }
        step(world, entity, elapsed);
    }
}

/// Run the custom controllers of `entity` and drop the finished ones.
pub fn run_behaviours(world: &mut World, entity: Entity, elapsed: f32) {
    let Some(mut list) = world
        .get_mut::<Behaviours>(entity)
        .map(|mut b| std::mem::take(&mut b.list))
    else {
        return;
    };
    for controller in list.iter_mut() {
        controller.update(world, entity, elapsed);
    }
    list.retain(|c| !c.is_finished());
    if let Some(mut slot) = world.get_mut::<Behaviours>(entity) {
        // Keep controllers attached while the list was out.
        let added = std::mem::take(&mut slot.list);
        list.extend(added);
        slot.list = list;
    }
}
