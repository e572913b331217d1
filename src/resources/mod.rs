//! ECS resources shared by the engine's systems.
//!
//! Overview
//! - `audio` – channel bridge to the audio playback thread
//! - `engineconfig` – INI-backed engine settings
//! - `input` – per-frame pointer and keyboard state with edges
//! - `scenegraph` – deferred add/remove queue and traversal pass state
//! - `theme` – shared widget colours, font and click sound
//! - `windowsize` – current window client size
//! - `worldtime` – simulation time and delta
pub mod audio;
pub mod engineconfig;
pub mod input;
pub mod scenegraph;
pub mod theme;
pub mod windowsize;
pub mod worldtime;
