//! Engine systems.
//!
//! Everything here operates on a `&mut World` (exclusive access) or is an
//! observer registered by [`crate::engine::register_observers`].
//!
//! Submodules overview
//! - [`camera`] – edge/key scrolling, camera resize, window fitting
//! - [`clickable`] – hit testing and pointer event dispatch
//! - [`fadeout`] – move-fade-remove controller step
//! - [`input`] – fold input snapshots into [`crate::resources::input::InputState`]
//! - [`render`] – render traversal and the draw submission interface
//! - [`scene`] – composition API, deferred add/remove, position helpers
//! - [`tasks`] – task controller driver and movement tasks
//! - [`time`] – advance the simulation clock
//! - [`update`] – update traversal and controller dispatch
//! - [`waypoints`] – waypoint follower step and events
//! - [`widgets`] – buttons, checkboxes and paged panels
//! - [`ysort`] – Y-position driven layering

pub mod camera;
pub mod clickable;
pub mod fadeout;
pub mod input;
pub mod render;
pub mod scene;
pub mod tasks;
pub mod time;
pub mod update;
pub mod waypoints;
pub mod widgets;
pub mod ysort;
