//! Strata: a 2D scene-graph engine core.
//!
//! Scenes are trees of ECS entities rooted at a screen. Each frame the
//! [`engine::Engine`] runs input and hit testing, an update pass that drives
//! controllers and cooperative task chains, and a render pass that submits
//! draw commands in layer order to a render collaborator.
//!
//! - [`components`] – data attached to scene entities
//! - [`events`] – notifications triggered on the world
//! - [`resources`] – shared state (input, time, config, deferred ops)
//! - [`systems`] – traversals, controllers and the composition API
//! - [`pathfinding`] – grid A* used by movement tasks

pub mod components;
pub mod engine;
pub mod error;
pub mod events;
pub mod pathfinding;
pub mod resources;
pub mod systems;
