//! Camera controllers: edge/key scrolling and window fitting.

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::components::bounds::{Bounds, Rect};
use crate::components::camera::{Camera, EdgeScroll, FitWindow};
use crate::components::node::Screen;
use crate::error::SceneError;
use crate::events::window::WindowResized;
use crate::resources::input::{InputState, Key};
use crate::systems::scene::screen_rect;

/// Unit scroll direction on each axis (-1, 0 or 1) requested by the cursor
/// position relative to `viewport` and by held direction keys.
pub fn scroll_direction(scroll: &EdgeScroll, input: &InputState, viewport: Rect) -> Vec2 {
    let mut dir = Vec2::ZERO;
    if scroll.use_mouse {
        let m = input.mouse.position;
        if viewport.contains(m) {
            if m.x - viewport.x < scroll.threshold {
                dir.x -= 1.0;
            } else if viewport.right() - m.x < scroll.threshold {
                dir.x += 1.0;
            }
            if m.y - viewport.y < scroll.threshold {
                dir.y -= 1.0;
            } else if viewport.bottom() - m.y < scroll.threshold {
                dir.y += 1.0;
            }
        }
    }
    if scroll.use_keys {
        let held = |a: Key, b: Key| input.is_down(a) || input.is_down(b);
        if held(Key::Left, Key::A) {
            dir.x -= 1.0;
        }
        if held(Key::Right, Key::D) {
            dir.x += 1.0;
        }
        if held(Key::Up, Key::W) {
            dir.y -= 1.0;
        }
        if held(Key::Down, Key::S) {
            dir.y += 1.0;
        }
    }
    dir.clamp(Vec2::NEG_ONE, Vec2::ONE)
}

/// Scroll the camera on `entity` by `speed * elapsed` in the requested
/// direction, clamped to its scroll bounds.
pub fn edge_scroll(world: &mut World, entity: Entity, elapsed: f32) {
    let Some(scroll) = world.get::<EdgeScroll>(entity).copied() else {
        return;
    };
    let Some(viewport) = screen_rect(world, entity) else {
        return;
    };
    let Some(input) = world.get_resource::<InputState>() else {
        return;
    };
    let dir = scroll_direction(&scroll, input, viewport);
    if dir == Vec2::ZERO {
        return;
    }
    if let Some(mut camera) = world.get_mut::<Camera>(entity) {
        let delta = dir * scroll.speed * elapsed;
        camera.scroll_by(delta.x, delta.y);
    }
}

/// Resize the viewport of `camera` on screen and its view, keeping the
/// scroll position.
pub fn resize_camera(world: &mut World, camera: Entity, w: f32, h: f32) -> Result<(), SceneError> {
    let mut cam = world
        .get_mut::<Camera>(camera)
        .ok_or(SceneError::NotACamera(camera))?;
    cam.resize(w, h);
    if let Some(mut bounds) = world.get_mut::<Bounds>(camera) {
        bounds.0.w = w;
        bounds.0.h = h;
    }
    Ok(())
}

/// Observer: keep screens and [`FitWindow`] cameras sized to the window.
pub fn observe_window_resized(
    trigger: On<WindowResized>,
    mut cameras: Query<(&mut Camera, &mut Bounds), (With<FitWindow>, Without<Screen>)>,
    mut screens: Query<&mut Bounds, (With<Screen>, Without<Camera>)>,
) {
    let w = trigger.event().w as f32;
    let h = trigger.event().h as f32;
    for (mut camera, mut bounds) in cameras.iter_mut() {
        camera.resize(w, h);
        bounds.0.w = w;
        bounds.0.h = h;
    }
    for mut bounds in screens.iter_mut() {
        bounds.0 = Rect::new(0.0, 0.0, w, h);
    }
}
