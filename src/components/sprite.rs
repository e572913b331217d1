//! Drawable components: textured quads and text runs.
//!
//! The core only decides what is drawn and in which order; the render
//! collaborator behind [`DrawSink`](crate::systems::render::DrawSink)
//! resolves texture and font keys.

use bevy_ecs::prelude::Component;

use crate::components::tint::Color;

/// Textured quad covering the entity's [`Bounds`](super::bounds::Bounds).
#[derive(Component, Clone, Debug, PartialEq)]
pub struct Sprite {
    pub tex_key: String,
    pub color: Color,
    /// Rotation in degrees around the quad's centre.
    pub rotation: f32,
}

impl Sprite {
    pub fn new(tex_key: impl Into<String>) -> Self {
        Self {
            tex_key: tex_key.into(),
            color: Color::WHITE,
            rotation: 0.0,
        }
    }

    /// Untextured quad filled with `color`.
    pub fn solid(color: Color) -> Self {
        Self {
            tex_key: String::new(),
            color,
            rotation: 0.0,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// Text run laid out at the entity's position.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct Label {
    pub text: String,
    pub font: String,
    pub font_size: f32,
    pub color: Color,
}

impl Label {
    pub fn new(text: impl Into<String>, font: impl Into<String>, font_size: f32) -> Self {
        Self {
            text: text.into(),
            font: font.into(),
            font_size,
            color: Color::WHITE,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}
