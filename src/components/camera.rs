//! Viewport container component and camera controllers.
//!
//! A camera is an entity with [`Bounds`](super::bounds::Bounds) (where the
//! viewport sits on screen) and a [`Camera`] (which part of its world is
//! shown). Descendants are drawn offset by `bounds.xy - view.xy`.
//!
//! # Scroll clamp
//!
//! `view.x` is kept in `[min_x, max_x - view.w]` (same for Y). When the view
//! is at least as wide as the scroll range the clamp range is empty, so the
//! camera centres on the range instead: `view.x = (min_x + max_x - view.w) / 2`,
//! which with `min_x = 0` reads `-(view.w - max_x) / 2`.

use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::components::bounds::Rect;

/// World-space window into the camera's children plus scroll bounds.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub view: Rect,
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Camera {
    /// Camera with a `w`×`h` view at the origin, scrolling over `world`.
    pub fn new(w: f32, h: f32, world: Rect) -> Self {
        let mut cam = Self {
            view: Rect::new(world.x, world.y, w, h),
            min_x: world.x,
            max_x: world.right(),
            min_y: world.y,
            max_y: world.bottom(),
        };
        cam.clamp();
        cam
    }

    /// Camera that does not restrict scrolling.
    pub fn unbounded(w: f32, h: f32) -> Self {
        Self {
            view: Rect::new(0.0, 0.0, w, h),
            min_x: f32::NEG_INFINITY,
            max_x: f32::INFINITY,
            min_y: f32::NEG_INFINITY,
            max_y: f32::INFINITY,
        }
    }

    pub fn set_scroll_bounds(&mut self, world: Rect) {
        self.min_x = world.x;
        self.max_x = world.right();
        self.min_y = world.y;
        self.max_y = world.bottom();
        self.clamp();
    }

    /// Change the view size. The scroll position is kept (then re-clamped).
    pub fn resize(&mut self, w: f32, h: f32) {
        self.view.w = w;
        self.view.h = h;
        self.clamp();
    }

    /// Move the view back to the top-left corner of the scroll range.
    pub fn reset_scroll(&mut self) {
        self.view.x = if self.min_x.is_finite() { self.min_x } else { 0.0 };
        self.view.y = if self.min_y.is_finite() { self.min_y } else { 0.0 };
        self.clamp();
    }

    pub fn scroll_by(&mut self, dx: f32, dy: f32) {
        self.view.x += dx;
        self.view.y += dy;
        self.clamp();
    }

    pub fn scroll_to(&mut self, x: f32, y: f32) {
        self.view.x = x;
        self.view.y = y;
        self.clamp();
    }

    /// Put `point` in the middle of the view (subject to the clamp).
    pub fn center_on(&mut self, point: Vec2) {
        self.scroll_to(point.x - self.view.w * 0.5, point.y - self.view.h * 0.5);
    }

    pub fn clamp(&mut self) {
        self.view.x = clamp_axis(self.view.x, self.view.w, self.min_x, self.max_x);
        self.view.y = clamp_axis(self.view.y, self.view.h, self.min_y, self.max_y);
    }

    /// Convert a point in viewport-local coordinates to camera world space.
    pub fn viewport_to_world(&self, local: Vec2) -> Vec2 {
        local + self.view.position()
    }
}

fn clamp_axis(pos: f32, size: f32, min: f32, max: f32) -> f32 {
    if size >= max - min {
        (min + max - size) * 0.5
    } else {
        pos.clamp(min, max - size)
    }
}

/// Scrolls a camera when the cursor nears a viewport edge or a direction key
/// is held. Movement per frame is `speed * elapsed` on each axis.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct EdgeScroll {
    /// Distance in pixels from a viewport edge that triggers scrolling.
    pub threshold: f32,
    /// Scroll speed in world units per second.
    pub speed: f32,
    pub use_mouse: bool,
    pub use_keys: bool,
}

impl EdgeScroll {
    pub fn new(threshold: f32, speed: f32) -> Self {
        Self {
            threshold,
            speed,
            use_mouse: true,
            use_keys: true,
        }
    }

    pub fn keys_only(mut self) -> Self {
        self.use_mouse = false;
        self
    }

    pub fn mouse_only(mut self) -> Self {
        self.use_keys = false;
        self
    }
}

/// Marker: resize this camera's viewport to the window client size whenever
/// the window collaborator reports a resize.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct FitWindow;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_keeps_view_inside_bounds() {
        let mut cam = Camera::new(100.0, 50.0, Rect::new(0.0, 0.0, 400.0, 300.0));
        cam.scroll_to(-20.0, 500.0);
        assert_eq!(cam.view.x, 0.0);
        assert_eq!(cam.view.y, 250.0);
        cam.scroll_by(1000.0, -1000.0);
        assert_eq!(cam.view.x, 300.0);
        assert_eq!(cam.view.y, 0.0);
    }

    #[test]
    fn wide_view_is_centred_not_clamped() {
        let mut cam = Camera::new(500.0, 50.0, Rect::new(0.0, 0.0, 400.0, 300.0));
        cam.scroll_to(37.0, 0.0);
        assert_eq!(cam.view.x, -(500.0 - 400.0) / 2.0);
    }

    #[test]
    fn view_equal_to_range_sits_at_min() {
        let mut cam = Camera::new(400.0, 300.0, Rect::new(0.0, 0.0, 400.0, 300.0));
        cam.scroll_by(10.0, 10.0);
        assert_eq!(cam.view.x, 0.0);
        assert_eq!(cam.view.y, 0.0);
    }

    #[test]
    fn resize_preserves_scroll_position() {
        let mut cam = Camera::new(100.0, 100.0, Rect::new(0.0, 0.0, 1000.0, 1000.0));
        cam.scroll_to(200.0, 300.0);
        cam.resize(150.0, 120.0);
        assert_eq!(cam.view.x, 200.0);
        assert_eq!(cam.view.y, 300.0);
        assert_eq!(cam.view.w, 150.0);
        assert_eq!(cam.view.h, 120.0);
    }

    #[test]
    fn resize_reclamps_when_view_grows_past_edge() {
        let mut cam = Camera::new(100.0, 100.0, Rect::new(0.0, 0.0, 1000.0, 1000.0));
        cam.scroll_to(900.0, 0.0);
        cam.resize(200.0, 100.0);
        assert_eq!(cam.view.x, 800.0);
    }

    #[test]
    fn reset_scroll_returns_to_min() {
        let mut cam = Camera::new(100.0, 100.0, Rect::new(-50.0, -50.0, 1000.0, 1000.0));
        cam.scroll_to(300.0, 300.0);
        cam.reset_scroll();
        assert_eq!(cam.view.position(), Vec2::new(-50.0, -50.0));
    }

    #[test]
    fn unbounded_camera_never_clamps() {
        let mut cam = Camera::unbounded(100.0, 100.0);
        cam.scroll_to(-12345.0, 98765.0);
        assert_eq!(cam.view.position(), Vec2::new(-12345.0, 98765.0));
    }

    #[test]
    fn center_on_point() {
        let mut cam = Camera::new(100.0, 100.0, Rect::new(0.0, 0.0, 1000.0, 1000.0));
        cam.center_on(Vec2::new(500.0, 500.0));
        assert_eq!(cam.view.position(), Vec2::new(450.0, 450.0));
    }
}
