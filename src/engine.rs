//! Frame driver.
//!
//! [`Engine`] owns the [`World`], the active screen and the per-frame
//! order of work:
//!
//! 1. advance [`WorldTime`]
//! 2. fold the input snapshot into [`InputState`]
//! 3. apply pending scene operations
//! 4. hit test and step clickables (pointer events fire here)
//! 5. recolour widget faces
//! 6. update pass over the active screen
//! 7. render pass into the caller's [`DrawSink`]
//!
//! Pending operations are flushed at the end of every pass, so everything
//! requested during a frame is applied before the next update begins.
//!
//! # Example
//!
//! ```ignore
//! let mut engine = Engine::new(EngineConfig::default());
//! let mut draws = DrawList::new();
//! loop {
//!     engine.frame(1.0 / 60.0, &window.poll_input(), &mut draws);
//!     window.present(&draws);
//!     draws.clear();
//! }
//! ```

use bevy_ecs::prelude::*;
use log::{debug, info};

use crate::components::node::Screen;
use crate::error::SceneError;
use crate::events::window::WindowResized;
use crate::resources::engineconfig::EngineConfig;
use crate::resources::input::{InputSnapshot, InputState};
use crate::resources::scenegraph::SceneGraph;
use crate::resources::windowsize::WindowSize;
use crate::resources::worldtime::WorldTime;
use crate::systems::camera::observe_window_resized;
use crate::systems::clickable::update_clickables;
use crate::systems::input::apply_input;
use crate::systems::render::{DrawSink, render_screen};
use crate::systems::scene::{flush_pending, spawn_screen};
use crate::systems::time::update_world_time;
use crate::systems::update::update_screen;
use crate::systems::widgets::{observe_button_click, observe_checkbox_click, update_button_faces};
use crate::systems::ysort::observe_y_sort;

/// Register the engine's global observers on `world`.
pub fn register_observers(world: &mut World) {
    world.add_observer(observe_y_sort);
    world.add_observer(observe_window_resized);
    world.add_observer(observe_button_click);
    world.add_observer(observe_checkbox_click);
    world.flush();
}

pub struct Engine {
    world: World,
    screen: Entity,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        world.insert_resource(SceneGraph::default());
        world.insert_resource(InputState::with_double_click(config.double_click_ms));
        world.insert_resource(WindowSize::new(config.window_width, config.window_height));
        register_observers(&mut world);
        let screen = spawn_screen(&mut world, config.background);
        info!(
            "engine ready: {}x{} window, screen {:?}",
            config.window_width, config.window_height, screen
        );
        world.insert_resource(config);
        Self { world, screen }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The screen receiving update and render.
    pub fn screen(&self) -> Entity {
        self.screen
    }

    /// Make `screen` the traversal root from the next frame on.
    pub fn set_screen(&mut self, screen: Entity) -> Result<(), SceneError> {
        if self.world.get::<Screen>(screen).is_none() {
            return Err(SceneError::MissingComponent {
                entity: screen,
                component: "Screen",
            });
        }
        debug!("active screen {:?} -> {:?}", self.screen, screen);
        self.screen = screen;
        Ok(())
    }

    /// Input, hit testing and the update pass for one frame of `dt` seconds.
    pub fn update(&mut self, dt: f32, input: &InputSnapshot) {
        let elapsed = update_world_time(&mut self.world, dt);
        apply_input(&mut self.world, input);
        flush_pending(&mut self.world);
        update_clickables(&mut self.world, self.screen);
        update_button_faces(&mut self.world);
        update_screen(&mut self.world, self.screen, elapsed);
    }

    /// Render the active screen into `sink`. Returns the number of nodes visited.
    pub fn render(&mut self, sink: &mut dyn DrawSink) -> usize {
        let elapsed = self.world.resource::<WorldTime>().delta;
        render_screen(&mut self.world, self.screen, elapsed, sink)
    }

    pub fn frame(&mut self, dt: f32, input: &InputSnapshot, sink: &mut dyn DrawSink) -> usize {
        self.update(dt, input);
        self.render(sink)
    }

    /// Window collaborator reported a new client size.
    pub fn resize(&mut self, w: u32, h: u32) {
        self.world.insert_resource(WindowSize::new(w, h));
        self.world.trigger(WindowResized { w, h });
        flush_pending(&mut self.world);
        debug!("window resized to {}x{}", w, h);
    }
}
