//! Render and hit-test ordering key.
//!
//! Lower [`Layer`] values are more foreground ("higher is deeper"). Children
//! are visited in ascending layer order, so the foreground is submitted first
//! and the render collaborator resolves overlap through the submitted depth.
//! Hit testing walks the same order and stops at the first hit, so the
//! foreground entity consumes the click. Ties keep insertion order.

use bevy_ecs::prelude::Component;

/// Sort key for render and hit-test traversal. Lower is in front.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Layer(pub f32);

/// Derives [`Layer`] from the entity's Y position every time it moves.
///
/// `layer = base - y * scale`, so entities lower on the screen are drawn in
/// front of the ones above them.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct YSortLayer {
    pub base: f32,
    pub scale: f32,
}

impl YSortLayer {
    pub fn new(base: f32, scale: f32) -> Self {
        Self { base, scale }
    }

    pub fn layer_for(&self, y: f32) -> f32 {
        self.base - y * self.scale
    }
}

impl Default for YSortLayer {
    fn default() -> Self {
        Self {
            base: 0.0,
            scale: 0.001,
        }
    }
}
