//! Window size resource.
//!
//! Mirrors the client area reported by the window collaborator. Changed
//! through [`Engine::resize`](crate::engine::Engine::resize), which also
//! triggers [`WindowResized`](crate::events::window::WindowResized).

use bevy_ecs::prelude::Resource;

use crate::components::bounds::Rect;

/// Current window client size in pixels.
#[derive(Resource, Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowSize {
    pub w: u32,
    pub h: u32,
}

impl WindowSize {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    /// Client area as a rectangle at the origin.
    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.w as f32, self.h as f32)
    }
}
