//! Render traversal and the draw submission interface.
//!
//! The core decides *what* is drawn and in *which order*; producing pixels
//! is the job of the render collaborator behind [`DrawSink`]. A render pass
//! walks the tree from a screen:
//!
//! 1. the screen submits [`DrawCommand::Clear`] with its background;
//! 2. each visible node runs its [`RenderHook`] (if any), then submits its
//!    [`Sprite`] quad and [`Label`] text, modulated by its [`Tint`];
//! 3. children are visited in ascending [`Layer`](crate::components::layer::Layer)
//!    order (stable, so equal layers keep insertion order);
//! 4. cameras push a clip of their viewport and offset their descendants by
//!    `bounds.xy - view.xy`.
//!
//! Every quad and text run carries `depth = layer`. Lower layers are in
//! front, so the collaborator resolves overlap with the depth rather than
//! relying on submission order.
//!
//! Nodes removed while the pass runs (for example by a render hook) are
//! skipped from that moment on and detached when the pass ends.

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::components::behaviour::RenderHook;
use crate::components::bounds::{Bounds, Rect};
use crate::components::camera::Camera;
use crate::components::layer::Layer;
use crate::components::node::Screen;
use crate::components::sprite::{Label, Sprite};
use crate::components::tint::{Color, Tint};
use crate::resources::scenegraph::Pass;
use crate::systems::scene::{begin_pass, children_by_layer, end_pass, flush_pending, live_flags};

/// One submission to the render collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Quad {
        entity: Entity,
        /// Empty for a solid quad.
        tex_key: String,
        rect: Rect,
        color: Color,
        /// Degrees around the quad's centre.
        rotation: f32,
        alpha: f32,
        depth: f32,
    },
    Text {
        entity: Entity,
        text: String,
        font: String,
        font_size: f32,
        position: Vec2,
        color: Color,
        alpha: f32,
        depth: f32,
    },
    /// Restrict drawing to `rect` until the matching `PopClip`.
    PushClip(Rect),
    PopClip,
}

impl DrawCommand {
    pub fn entity(&self) -> Option<Entity> {
        match self {
            DrawCommand::Quad { entity, .. } | DrawCommand::Text { entity, .. } => Some(*entity),
            _ => None,
        }
    }
}

/// Receiver of draw submissions.
pub trait DrawSink {
    fn submit(&mut self, command: DrawCommand);
}

/// Records submissions in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Entities that submitted something, in visit order, without repeats
    /// for consecutive submissions of the same entity.
    pub fn drawn_entities(&self) -> Vec<Entity> {
        let mut out: Vec<Entity> = Vec::new();
        for entity in self.commands.iter().filter_map(DrawCommand::entity) {
            if out.last() != Some(&entity) {
                out.push(entity);
            }
        }
        out
    }
}

impl DrawSink for DrawList {
    fn submit(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

/// Render the tree rooted at `screen`. Returns the number of nodes visited.
pub fn render_screen(
    world: &mut World,
    screen: Entity,
    elapsed: f32,
    sink: &mut dyn DrawSink,
) -> usize {
    flush_pending(world);
    begin_pass(world, Pass::Render);
    if let Some(root) = world.get::<Screen>(screen) {
        sink.submit(DrawCommand::Clear(root.background));
    }
    let visited = render_node(world, screen, Vec2::ZERO, elapsed, sink);
    end_pass(world);
    visited
}

fn is_visible(world: &World, entity: Entity) -> bool {
    live_flags(world, entity).is_some_and(|f| f.visible)
}

fn render_node(
    world: &mut World,
    entity: Entity,
    offset: Vec2,
    elapsed: f32,
    sink: &mut dyn DrawSink,
) -> usize {
    if !is_visible(world, entity) {
        return 0;
    }
    run_render_hook(world, entity, elapsed);
    // The hook may have hidden or removed its own node.
    if !is_visible(world, entity) {
        return 0;
    }
    submit_drawables(world, entity, offset, sink);

    let mut visited = 1;
    let camera = match (world.get::<Camera>(entity), world.get::<Bounds>(entity)) {
        (Some(camera), Some(bounds)) => Some((
            bounds.0.offset(offset),
            offset + bounds.position() - camera.view.position(),
        )),
        _ => None,
    };
    let child_offset = camera.map_or(offset, |(_, o)| o);
    if let Some((clip, _)) = camera {
        sink.submit(DrawCommand::PushClip(clip));
    }
    for child in children_by_layer(world, entity) {
        visited += render_node(world, child, child_offset, elapsed, sink);
    }
    if camera.is_some() {
        sink.submit(DrawCommand::PopClip);
    }
    visited
}

fn run_render_hook(world: &mut World, entity: Entity, elapsed: f32) {
    let Some(mut hook) = world
        .get_mut::<RenderHook>(entity)
        .and_then(|mut slot| slot.hook.take())
    else {
        return;
    };
    hook(world, entity, elapsed);
    if let Some(mut slot) = world.get_mut::<RenderHook>(entity) {
        // A hook installed by the callback itself wins.
        if slot.hook.is_none() {
            slot.hook = Some(hook);
        }
    }
}

fn submit_drawables(world: &World, entity: Entity, offset: Vec2, sink: &mut dyn DrawSink) {
    let Some(bounds) = world.get::<Bounds>(entity) else {
        return;
    };
    let rect = bounds.0.offset(offset);
    let depth = world.get::<Layer>(entity).map_or(0.0, |l| l.0);
    let tint = world.get::<Tint>(entity).copied().unwrap_or_default();

    if let Some(sprite) = world.get::<Sprite>(entity) {
        sink.submit(DrawCommand::Quad {
            entity,
            tex_key: sprite.tex_key.clone(),
            rect,
            color: sprite.color.multiply(tint.color),
            rotation: sprite.rotation,
            alpha: tint.alpha,
            depth,
        });
    }
    if let Some(label) = world.get::<Label>(entity) {
        sink.submit(DrawCommand::Text {
            entity,
            text: label.text.clone(),
            font: label.font.clone(),
            font_size: label.font_size,
            position: rect.position(),
            color: label.color.multiply(tint.color),
            alpha: tint.alpha,
            depth,
        });
    }
}
