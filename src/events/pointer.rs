//! Pointer and widget notifications.
//!
//! Emitted by [`update_clickables`](crate::systems::clickable::update_clickables)
//! for the single foreground-most clickable under the cursor; hits are
//! consumed, never broadcast to entities underneath.

use bevy_ecs::prelude::*;

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEntered {
    pub entity: Entity,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseExited {
    pub entity: Entity,
}

/// Left button went down over the entity.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeftPressed {
    pub entity: Entity,
}

/// Left button was pressed and released over the entity.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeftClicked {
    pub entity: Entity,
}

/// Second click inside the double-click window. Follows a [`LeftClicked`].
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoubleClicked {
    pub entity: Entity,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckboxToggled {
    pub entity: Entity,
    pub checked: bool,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageChanged {
    pub entity: Entity,
    pub page: usize,
}
