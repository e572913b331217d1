//! Per-frame pointer and keyboard state.
//!
//! The input collaborator hands the engine an [`InputSnapshot`] (raw "what
//! is held right now") every frame. [`InputState::apply`] diffs it against
//! the previous frame to derive `just_pressed` / `just_released` edges, and
//! controllers read the resulting [`InputState`] resource.

use bevy_ecs::prelude::*;
use glam::Vec2;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Default double-click window in milliseconds.
pub const DEFAULT_DOUBLE_CLICK_MS: u32 = 500;

/// Keys the engine knows by name. Anything else travels as `Other(code)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    W,
    A,
    S,
    D,
    Space,
    Enter,
    Escape,
    Tab,
    Other(u32),
}

/// Button state with frame edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoolState {
    /// Held this frame.
    pub active: bool,
    /// Went down this frame.
    pub just_pressed: bool,
    /// Went up this frame.
    pub just_released: bool,
}

impl BoolState {
    pub fn advance(&mut self, down: bool) {
        self.just_pressed = down && !self.active;
        self.just_released = !down && self.active;
        self.active = down;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MouseState {
    /// Cursor position in window coordinates.
    pub position: Vec2,
    pub left: BoolState,
    pub right: BoolState,
    pub middle: BoolState,
    /// Wheel movement this frame.
    pub wheel: f32,
}

/// Raw input for one frame, as reported by the input collaborator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    pub mouse_position: Vec2,
    pub left_down: bool,
    pub right_down: bool,
    pub middle_down: bool,
    pub wheel: f32,
    pub keys_down: SmallVec<[Key; 8]>,
}

impl InputSnapshot {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            mouse_position: Vec2::new(x, y),
            ..Default::default()
        }
    }

    pub fn with_left(mut self, down: bool) -> Self {
        self.left_down = down;
        self
    }

    pub fn with_key(mut self, key: Key) -> Self {
        self.keys_down.push(key);
        self
    }
}

#[derive(Resource, Debug, Clone)]
pub struct InputState {
    pub mouse: MouseState,
    keys: FxHashMap<Key, BoolState>,
    /// Maximum delay between two clicks that still counts as a double click.
    pub double_click_ms: u32,
}

impl Default for InputState {
    fn default() -> Self {
        Self::with_double_click(DEFAULT_DOUBLE_CLICK_MS)
    }
}

impl InputState {
    pub fn with_double_click(double_click_ms: u32) -> Self {
        Self {
            mouse: MouseState::default(),
            keys: FxHashMap::default(),
            double_click_ms,
        }
    }

    pub fn key(&self, key: Key) -> BoolState {
        self.keys.get(&key).copied().unwrap_or_default()
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.key(key).active
    }

    pub fn was_pressed(&self, key: Key) -> bool {
        self.key(key).just_pressed
    }

    /// Advance one frame from `snapshot`.
    pub fn apply(&mut self, snapshot: &InputSnapshot) {
        self.mouse.position = snapshot.mouse_position;
        self.mouse.left.advance(snapshot.left_down);
        self.mouse.right.advance(snapshot.right_down);
        self.mouse.middle.advance(snapshot.middle_down);
        self.mouse.wheel = snapshot.wheel;

        for state in self.keys.values_mut() {
            state.advance(false);
        }
        for key in &snapshot.keys_down {
            let state = self.keys.entry(*key).or_default();
            // Undo the release applied above for keys still held.
            if state.just_released {
                *state = BoolState {
                    active: true,
                    ..Default::default()
                };
            } else {
                state.advance(true);
            }
        }
        self.keys.retain(|_, s| s.active || s.just_released);
    }
}
