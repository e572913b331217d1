//! Window collaborator notifications.

use bevy_ecs::prelude::*;

/// The window client area changed size.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowResized {
    pub w: u32,
    pub h: u32,
}
