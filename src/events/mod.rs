//! Event types exchanged between the scene graph and its observers.
//!
//! All events are triggered on the world (`world.trigger(..)`) and carry the
//! entity they concern, so observers registered with `world.add_observer`
//! can filter on it.
//!
//! Submodules:
//! - [`audio`] – commands for the audio collaborator
//! - [`pointer`] – hover/press/click and widget notifications
//! - [`scene`] – node added/removed and position changes
//! - [`task`] – task started/completed
//! - [`waypoints`] – waypoint arrival, direction change, destination reached
//! - [`window`] – window resize from the window collaborator
pub mod audio;
pub mod pointer;
pub mod scene;
pub mod task;
pub mod waypoints;
pub mod window;
