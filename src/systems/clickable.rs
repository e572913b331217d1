//! Hit testing and pointer event dispatch.
//!
//! Hit testing walks the same order as rendering: siblings in ascending
//! layer order (lower is in front). Within one node, its children are
//! tested before the node itself, since they are drawn over it. The first
//! enabled [`Clickable`] whose on-screen bounds contain the point wins, and
//! only that entity sees the cursor this frame.

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::components::bounds::Bounds;
use crate::components::camera::Camera;
use crate::components::clickable::{ClickSignal, Clickable, PointerSample};
use crate::events::pointer::{DoubleClicked, LeftClicked, LeftPressed, MouseEntered, MouseExited};
use crate::resources::input::InputState;
use crate::resources::scenegraph::Pass;
use crate::resources::worldtime::WorldTime;
use crate::systems::scene::{begin_pass, children_by_layer, children_of, end_pass, live_flags};

/// Foreground-most enabled clickable under `point` in the tree rooted at `root`.
pub fn hit_test(world: &World, root: Entity, point: Vec2) -> Option<Entity> {
    find_hit(world, root, Vec2::ZERO, point)
}

fn find_hit(world: &World, entity: Entity, offset: Vec2, point: Vec2) -> Option<Entity> {
    if !live_flags(world, entity).is_some_and(|f| f.visible) {
        return None;
    }
    let rect = world.get::<Bounds>(entity).map(|b| b.0.offset(offset));

    let mut child_offset = offset;
    let mut descend = true;
    if let (Some(camera), Some(bounds)) = (world.get::<Camera>(entity), world.get::<Bounds>(entity)) {
        child_offset = offset + bounds.position() - camera.view.position();
        // Descendants are clipped to the viewport.
        descend = rect.is_some_and(|r| r.contains(point));
    }
    if descend {
        for child in children_by_layer(world, entity) {
            if let Some(hit) = find_hit(world, child, child_offset, point) {
                return Some(hit);
            }
        }
    }

    match (world.get::<Clickable>(entity), rect) {
        (Some(clickable), Some(rect)) if clickable.enabled && rect.contains(point) => Some(entity),
        _ => None,
    }
}

/// Every clickable in the tree rooted at `root`, hidden or inactive included.
fn clickables_under(world: &World, root: Entity) -> Vec<Entity> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(entity) = stack.pop() {
        if world.get::<Clickable>(entity).is_some() {
            out.push(entity);
        }
        stack.extend(children_of(world, entity));
    }
    out
}

/// Step the state machine of each clickable under `root` against this
/// frame's input and trigger the resulting pointer events. Returns the
/// entity under the cursor.
///
/// Clickables outside `root` keep their state until they are reachable again.
///
/// Structural changes made by observers are deferred until all events of
/// the frame have been dispatched.
pub fn update_clickables(world: &mut World, root: Entity) -> Option<Entity> {
    let (position, left, double_click_ms) = {
        let input = world.get_resource::<InputState>()?;
        (input.mouse.position, input.mouse.left, input.double_click_ms)
    };
    let now = world.get_resource::<WorldTime>().map_or(0.0, |t| t.elapsed);
    let hit = hit_test(world, root, position);

    let mut fired: Vec<(Entity, ClickSignal)> = Vec::new();
    for entity in clickables_under(world, root) {
        let Some(mut clickable) = world.get_mut::<Clickable>(entity) else {
            continue;
        };
        let sample = PointerSample {
            intersecting: hit == Some(entity),
            left_down: left.active,
            left_pressed: left.just_pressed,
            left_released: left.just_released,
            now,
            double_click_ms,
        };
        fired.extend(clickable.step(sample).into_iter().map(|s| (entity, s)));
    }
    // Exits before enters when the cursor moves from one clickable to another.
    fired.sort_by_key(|(_, signal)| *signal != ClickSignal::Exited);

    begin_pass(world, Pass::HitTest);
    for (entity, signal) in fired {
        match signal {
            ClickSignal::Entered => world.trigger(MouseEntered { entity }),
            ClickSignal::Exited => world.trigger(MouseExited { entity }),
            ClickSignal::Pressed => world.trigger(LeftPressed { entity }),
            ClickSignal::Clicked => world.trigger(LeftClicked { entity }),
            ClickSignal::DoubleClicked => world.trigger(DoubleClicked { entity }),
        }
    }
    end_pass(world);
    hit
}
