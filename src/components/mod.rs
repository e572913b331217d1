//! ECS components for scene entities.
//!
//! Every scene entity carries a [`node::SceneNode`] and usually
//! [`bounds::Bounds`] plus [`layer::Layer`]. Everything else is a
//! capability: drawables, clickables, cameras and controllers are simply
//! attached when needed.
//!
//! Submodules overview:
//! - [`behaviour`] – custom controllers and render hooks
//! - [`bounds`] – rectangle type and the position/size component
//! - [`camera`] – scrolling viewport and its edge-scroll/fit-window controllers
//! - [`clickable`] – hover/press/click state machine
//! - [`fadeout`] – move, fade and remove controller
//! - [`layer`] – render/hit-test ordering key and Y-sorting
//! - [`node`] – active/visible flags and the screen root
//! - [`sprite`] – textured quads and text labels
//! - [`task`] – cooperative task state machine
//! - [`taskcontroller`] – runs a task chain on its entity
//! - [`tint`] – colour type and opacity modulation
//! - [`waypoints`] – waypoint follower controller
//! - [`widgets`] – button, checkbox and paged panel state

pub mod behaviour;
pub mod bounds;
pub mod camera;
pub mod clickable;
pub mod fadeout;
pub mod layer;
pub mod node;
pub mod sprite;
pub mod task;
pub mod taskcontroller;
pub mod tint;
pub mod waypoints;
pub mod widgets;
