//! Scene composition API: spawning, containment and deferred mutation.
//!
//! The containment relation is the ECS hierarchy (`ChildOf` / `Children`).
//! These functions are the only supported way to change it, because they
//! enforce the one-parent rule and defer structural changes while a
//! traversal pass is running:
//!
//! - outside a pass, `add_child` / `remove` / `destroy` apply immediately
//!   and trigger [`NodeAdded`] / [`NodeRemoved`] right away;
//! - inside a pass, they are validated immediately (errors are returned at
//!   the call site) but queued in [`SceneGraph`] and applied in request
//!   order when the outermost pass ends. Removed nodes are skipped by the
//!   running traversal from the moment of the request.
//!
//! Removing a node never destroys it or its children. Use [`destroy`] to
//! dispose a node together with its subtree.
//!
//! # Related
//!
//! - [`crate::resources::scenegraph::SceneGraph`] – the deferred op queue
//! - [`crate::systems::update`] and [`crate::systems::render`] – the passes

use bevy_ecs::hierarchy::{ChildOf, Children};
use bevy_ecs::prelude::*;
use glam::Vec2;
use log::{debug, warn};

use crate::components::bounds::{Bounds, Rect};
use crate::components::camera::Camera;
use crate::components::layer::Layer;
use crate::components::node::{SceneNode, Screen};
use crate::components::tint::Color;
use crate::error::SceneError;
use crate::events::scene::{NodeAdded, NodeRemoved, PositionChanged};
use crate::resources::scenegraph::{Pass, PendingOp, SceneGraph};
use crate::resources::windowsize::WindowSize;

/// Spawn a traversal root covering the window.
pub fn spawn_screen(world: &mut World, background: Color) -> Entity {
    let rect = world
        .get_resource::<WindowSize>()
        .map(WindowSize::rect)
        .unwrap_or_default();
    let screen = world
        .spawn((SceneNode::default(), Screen { background }, Bounds(rect), Layer(0.0)))
        .id();
    debug!("spawned screen {:?}", screen);
    screen
}

/// Spawn a detached scene entity.
pub fn spawn_entity(world: &mut World, rect: Rect, layer: f32) -> Entity {
    world
        .spawn((SceneNode::default(), Bounds(rect), Layer(layer)))
        .id()
}

/// Spawn a detached camera showing `viewport`-sized views of `scroll`.
pub fn spawn_camera(world: &mut World, viewport: Rect, scroll: Rect, layer: f32) -> Entity {
    world
        .spawn((
            SceneNode::default(),
            Bounds(viewport),
            Layer(layer),
            Camera::new(viewport.w, viewport.h, scroll),
        ))
        .id()
}

pub(crate) fn ensure_exists(world: &World, entity: Entity) -> Result<(), SceneError> {
    if world.get_entity(entity).is_ok() {
        Ok(())
    } else {
        Err(SceneError::MissingEntity(entity))
    }
}

fn in_pass(world: &World) -> bool {
    world
        .get_resource::<SceneGraph>()
        .is_some_and(SceneGraph::in_pass)
}

fn queue(world: &mut World, op: PendingOp) {
    debug!("deferred {:?}", op);
    world
        .get_resource_or_insert_with(SceneGraph::default)
        .queue(op);
}

/// Parent of `child` once pending operations are applied.
pub fn parent_of(world: &World, child: Entity) -> Option<Entity> {
    if let Some(graph) = world.get_resource::<SceneGraph>() {
        if let Some(parent) = graph.pending_parent(child) {
            return Some(parent);
        }
        if graph.is_detaching(child) {
            return None;
        }
    }
    world.get::<ChildOf>(child).map(|c| c.parent())
}

/// Attached children in insertion order. Pending operations are not
/// reflected; see [`effective_children`].
pub fn children_of(world: &World, parent: Entity) -> Vec<Entity> {
    world
        .get::<Children>(parent)
        .map(|children| children.to_vec())
        .unwrap_or_default()
}

/// Children `parent` will have once pending operations are applied.
pub fn effective_children(world: &World, parent: Entity) -> Vec<Entity> {
    let mut out: Vec<Entity> = children_of(world, parent)
        .into_iter()
        .filter(|c| parent_of(world, *c) == Some(parent))
        .collect();
    if let Some(graph) = world.get_resource::<SceneGraph>() {
        for op in graph.pending() {
            if let PendingOp::Attach { parent: p, child } = *op {
                if p == parent && parent_of(world, child) == Some(parent) && !out.contains(&child) {
                    out.push(child);
                }
            }
        }
    }
    out
}

/// Children sorted by ascending [`Layer`]; equal layers keep insertion order.
pub fn children_by_layer(world: &World, parent: Entity) -> Vec<Entity> {
    let mut children = children_of(world, parent);
    let layer = |e: &Entity| world.get::<Layer>(*e).map_or(0.0, |l| l.0);
    children.sort_by(|a, b| layer(a).total_cmp(&layer(b)));
    children
}

/// Whether `entity` is scheduled for removal by the running pass.
pub fn is_detaching(world: &World, entity: Entity) -> bool {
    world
        .get_resource::<SceneGraph>()
        .is_some_and(|g| g.is_detaching(entity))
}

/// Attach `child` as the last child of `parent`.
///
/// Fails if `child` already has a parent; remove it first or use
/// [`reparent`].
pub fn add_child(world: &mut World, parent: Entity, child: Entity) -> Result<(), SceneError> {
    ensure_exists(world, parent)?;
    ensure_exists(world, child)?;
    if parent == child {
        return Err(SceneError::SelfParent(child));
    }
    if let Some(current) = parent_of(world, child) {
        return Err(SceneError::AlreadyParented {
            child,
            parent: current,
        });
    }
    let mut ancestor = Some(parent);
    while let Some(node) = ancestor {
        if node == child {
            return Err(SceneError::CycleDetected { child, parent });
        }
        ancestor = parent_of(world, node);
    }

    if in_pass(world) {
        queue(world, PendingOp::Attach { parent, child });
    } else {
        attach(world, parent, child);
    }
    Ok(())
}

/// Detach `child` from `parent`.
pub fn remove_child(world: &mut World, parent: Entity, child: Entity) -> Result<(), SceneError> {
    ensure_exists(world, child)?;
    if parent_of(world, child) != Some(parent) {
        return Err(SceneError::NotAChild { child, parent });
    }
    schedule_detach(world, child);
    Ok(())
}

/// Detach `child` from whatever parent it has. Returns that parent.
pub fn remove(world: &mut World, child: Entity) -> Result<Entity, SceneError> {
    ensure_exists(world, child)?;
    let parent = parent_of(world, child).ok_or(SceneError::NotAttached(child))?;
    schedule_detach(world, child);
    Ok(parent)
}

/// Detach every child of `parent`. Grandchildren stay with their parents.
/// Returns the detached children.
pub fn remove_all(world: &mut World, parent: Entity) -> Result<Vec<Entity>, SceneError> {
    ensure_exists(world, parent)?;
    let children = effective_children(world, parent);
    for child in &children {
        schedule_detach(world, *child);
    }
    Ok(children)
}

/// Move `child` under `new_parent`, detaching it from its current parent first.
pub fn reparent(world: &mut World, child: Entity, new_parent: Entity) -> Result<(), SceneError> {
    ensure_exists(world, new_parent)?;
    if parent_of(world, child).is_some() {
        remove(world, child)?;
    }
    add_child(world, new_parent, child)
}

/// Dispose `entity` and its whole subtree. A [`NodeRemoved`] is triggered
/// first if it was attached.
pub fn destroy(world: &mut World, entity: Entity) -> Result<(), SceneError> {
    ensure_exists(world, entity)?;
    if in_pass(world) {
        queue(world, PendingOp::Destroy { entity });
    } else {
        despawn_now(world, entity);
    }
    Ok(())
}

fn schedule_detach(world: &mut World, child: Entity) {
    if in_pass(world) {
        queue(world, PendingOp::Detach { child });
    } else {
        detach(world, child);
    }
}

fn attach(world: &mut World, parent: Entity, child: Entity) {
    world.entity_mut(child).insert(ChildOf(parent));
    world.flush();
    debug!("{:?} added to {:?}", child, parent);
    world.trigger(NodeAdded {
        entity: child,
        parent,
    });
}

fn detach(world: &mut World, child: Entity) {
    let Some(parent) = world.get::<ChildOf>(child).map(|c| c.parent()) else {
        return;
    };
    world.entity_mut(child).remove::<ChildOf>();
    world.flush();
    debug!("{:?} removed from {:?}", child, parent);
    world.trigger(NodeRemoved {
        entity: child,
        parent,
    });
}

fn despawn_now(world: &mut World, entity: Entity) {
    if world.get_entity(entity).is_err() {
        return;
    }
    if let Some(parent) = world.get::<ChildOf>(entity).map(|c| c.parent()) {
        world.trigger(NodeRemoved { entity, parent });
    }
    // The observer may already have disposed it.
    if world.get_entity(entity).is_ok() {
        world.despawn(entity);
        debug!("destroyed {:?}", entity);
    }
}

/// Apply queued operations in request order. Does nothing while a pass is
/// running. Returns the number of operations applied.
pub fn flush_pending(world: &mut World) -> usize {
    let ops = match world.get_resource_mut::<SceneGraph>() {
        Some(mut graph) if !graph.in_pass() && graph.has_pending() => graph.take_pending(),
        _ => return 0,
    };
    let count = ops.len();
    for op in ops {
        match op {
            PendingOp::Attach { parent, child } => {
                if world.get_entity(parent).is_err() || world.get_entity(child).is_err() {
                    warn!("dropping attach of {:?} to {:?}: entity no longer exists", child, parent);
                } else if let Some(current) = world.get::<ChildOf>(child).map(|c| c.parent()) {
                    warn!(
                        "dropping attach of {:?} to {:?}: already attached to {:?}",
                        child, parent, current
                    );
                } else {
                    attach(world, parent, child);
                }
            }
            PendingOp::Detach { child } => {
                if world.get_entity(child).is_ok() {
                    detach(world, child);
                }
            }
            PendingOp::Destroy { entity } => despawn_now(world, entity),
        }
    }
    count
}

/// Enter a traversal pass. Structural changes are deferred until the
/// matching outermost [`end_pass`].
pub fn begin_pass(world: &mut World, pass: Pass) {
    world
        .get_resource_or_insert_with(SceneGraph::default)
        .begin_pass(pass);
}

/// Leave a traversal pass, flushing the queue if it was the outermost one.
pub fn end_pass(world: &mut World) {
    let outermost = world
        .get_resource_mut::<SceneGraph>()
        .is_some_and(|mut graph| graph.end_pass());
    if outermost {
        flush_pending(world);
    }
}

/// Move `entity` to `position` and trigger [`PositionChanged`] if it moved.
pub fn set_position(world: &mut World, entity: Entity, position: Vec2) -> Result<(), SceneError> {
    let mut bounds = world
        .get_mut::<Bounds>(entity)
        .ok_or(SceneError::MissingComponent {
            entity,
            component: "Bounds",
        })?;
    let old = bounds.position();
    if old == position {
        return Ok(());
    }
    bounds.0.x = position.x;
    bounds.0.y = position.y;
    world.trigger(PositionChanged {
        entity,
        old,
        new: position,
    });
    Ok(())
}

pub fn translate(world: &mut World, entity: Entity, by: Vec2) -> Result<(), SceneError> {
    let position = world
        .get::<Bounds>(entity)
        .ok_or(SceneError::MissingComponent {
            entity,
            component: "Bounds",
        })?
        .position();
    set_position(world, entity, position + by)
}

/// Change the render/hit-test order key. Takes effect on the next traversal.
pub fn set_layer(world: &mut World, entity: Entity, layer: f32) -> Result<(), SceneError> {
    ensure_exists(world, entity)?;
    world.entity_mut(entity).insert(Layer(layer));
    Ok(())
}

pub fn set_visible(world: &mut World, entity: Entity, visible: bool) -> Result<(), SceneError> {
    let mut node = world
        .get_mut::<SceneNode>(entity)
        .ok_or(SceneError::MissingComponent {
            entity,
            component: "SceneNode",
        })?;
    node.visible = visible;
    Ok(())
}

pub fn set_active(world: &mut World, entity: Entity, active: bool) -> Result<(), SceneError> {
    let mut node = world
        .get_mut::<SceneNode>(entity)
        .ok_or(SceneError::MissingComponent {
            entity,
            component: "SceneNode",
        })?;
    node.active = active;
    Ok(())
}

/// Flags of a node the running traversal should still visit. `None` for
/// missing or detaching entities. Entities without [`SceneNode`] count as
/// active and visible.
pub(crate) fn live_flags(world: &World, entity: Entity) -> Option<SceneNode> {
    if world.get_entity(entity).is_err() || is_detaching(world, entity) {
        return None;
    }
    Some(world.get::<SceneNode>(entity).copied().unwrap_or_default())
}

/// Offset that the cameras above `entity` apply to its bounds on screen.
pub fn screen_offset(world: &World, entity: Entity) -> Vec2 {
    let mut offset = Vec2::ZERO;
    let mut ancestor = world.get::<ChildOf>(entity).map(|c| c.parent());
    while let Some(node) = ancestor {
        if let (Some(camera), Some(bounds)) = (world.get::<Camera>(node), world.get::<Bounds>(node)) {
            offset += bounds.position() - camera.view.position();
        }
        ancestor = world.get::<ChildOf>(node).map(|c| c.parent());
    }
    offset
}

/// Bounds of `entity` in screen coordinates.
pub fn screen_rect(world: &World, entity: Entity) -> Option<Rect> {
    let bounds = world.get::<Bounds>(entity)?;
    Some(bounds.0.offset(screen_offset(world, entity)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        let mut world = World::new();
        world.init_resource::<SceneGraph>();
        world
    }

    #[test]
    fn add_rejects_second_parent() {
        let mut world = world();
        let a = spawn_entity(&mut world, Rect::default(), 0.0);
        let b = spawn_entity(&mut world, Rect::default(), 0.0);
        let c = spawn_entity(&mut world, Rect::default(), 0.0);
        add_child(&mut world, a, c).unwrap();
        assert_eq!(
            add_child(&mut world, b, c),
            Err(SceneError::AlreadyParented { child: c, parent: a })
        );
    }

    #[test]
    fn add_rejects_cycles_and_self() {
        let mut world = world();
        let a = spawn_entity(&mut world, Rect::default(), 0.0);
        let b = spawn_entity(&mut world, Rect::default(), 0.0);
        add_child(&mut world, a, b).unwrap();
        assert_eq!(add_child(&mut world, a, a), Err(SceneError::SelfParent(a)));
        assert_eq!(
            add_child(&mut world, b, a),
            Err(SceneError::CycleDetected { child: a, parent: b })
        );
    }

    #[test]
    fn layer_order_is_stable() {
        let mut world = world();
        let root = spawn_entity(&mut world, Rect::default(), 0.0);
        let x = spawn_entity(&mut world, Rect::default(), 2.0);
        let y = spawn_entity(&mut world, Rect::default(), 1.0);
        let z = spawn_entity(&mut world, Rect::default(), 2.0);
        for e in [x, y, z] {
            add_child(&mut world, root, e).unwrap();
        }
        assert_eq!(children_by_layer(&world, root), vec![y, x, z]);
        assert_eq!(children_of(&world, root), vec![x, y, z]);
    }

    #[test]
    fn removal_inside_pass_is_deferred() {
        let mut world = world();
        let root = spawn_entity(&mut world, Rect::default(), 0.0);
        let child = spawn_entity(&mut world, Rect::default(), 0.0);
        add_child(&mut world, root, child).unwrap();

        begin_pass(&mut world, Pass::Update);
        assert_eq!(remove(&mut world, child), Ok(root));
        assert!(is_detaching(&world, child));
        assert_eq!(parent_of(&world, child), None);
        assert_eq!(children_of(&world, root), vec![child]);
        end_pass(&mut world);

        assert!(children_of(&world, root).is_empty());
        assert!(world.get::<ChildOf>(child).is_none());
    }

    #[test]
    fn screen_offset_accumulates_cameras() {
        let mut world = world();
        let cam = spawn_camera(
            &mut world,
            Rect::new(10.0, 20.0, 100.0, 100.0),
            Rect::new(0.0, 0.0, 1000.0, 1000.0),
            0.0,
        );
        world.get_mut::<Camera>(cam).unwrap().scroll_to(50.0, 0.0);
        let e = spawn_entity(&mut world, Rect::new(60.0, 5.0, 4.0, 4.0), 0.0);
        add_child(&mut world, cam, e).unwrap();
        assert_eq!(screen_rect(&world, e), Some(Rect::new(20.0, 25.0, 4.0, 4.0)));
    }
}
