//! Pointer interaction state machine.
//!
//! Each entity carrying a [`Clickable`] runs the Idle → Hovering → Pressed
//! lifecycle once per frame, driven by
//! [`update_clickables`](crate::systems::clickable::update_clickables). Only
//! the foreground-most clickable under the cursor sees `intersecting = true`;
//! everything below it behaves as if the cursor were elsewhere.

use bevy_ecs::prelude::Component;
use smallvec::SmallVec;

/// Pointer state of a clickable entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ClickState {
    #[default]
    Idle,
    Hovering,
    Pressed,
}

/// Notifications produced by one state machine step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickSignal {
    Entered,
    Exited,
    Pressed,
    Clicked,
    DoubleClicked,
}

/// Per-frame pointer input seen by one clickable.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerSample {
    /// This entity is the foreground-most hit under the cursor.
    pub intersecting: bool,
    pub left_down: bool,
    pub left_pressed: bool,
    pub left_released: bool,
    /// Current time in seconds.
    pub now: f32,
    /// Double-click window reported by the input collaborator.
    pub double_click_ms: u32,
}

#[derive(Component, Clone, Debug)]
pub struct Clickable {
    /// Disabled clickables neither hit-test nor change state.
    pub enabled: bool,
    state: ClickState,
    /// Cursor is over the entity while in `Pressed`.
    inside: bool,
    last_click: Option<f32>,
}

impl Default for Clickable {
    fn default() -> Self {
        Self {
            enabled: true,
            state: ClickState::Idle,
            inside: false,
            last_click: None,
        }
    }
}

impl Clickable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ClickState {
        self.state
    }

    pub fn is_hovered(&self) -> bool {
        match self.state {
            ClickState::Hovering => true,
            ClickState::Pressed => self.inside,
            ClickState::Idle => false,
        }
    }

    /// Drop back to `Idle` without emitting anything.
    pub fn reset(&mut self) {
        self.state = ClickState::Idle;
        self.inside = false;
    }

    /// Advance the state machine by one frame.
    pub fn step(&mut self, sample: PointerSample) -> SmallVec<[ClickSignal; 2]> {
        let mut out = SmallVec::new();
        if !self.enabled {
            self.reset();
            return out;
        }
        match self.state {
            ClickState::Idle => {
                if sample.intersecting {
                    self.state = ClickState::Hovering;
                    out.push(ClickSignal::Entered);
                    if sample.left_pressed {
                        self.state = ClickState::Pressed;
                        self.inside = true;
                        out.push(ClickSignal::Pressed);
                    }
                }
            }
            ClickState::Hovering => {
                if !sample.intersecting {
                    self.state = ClickState::Idle;
                    out.push(ClickSignal::Exited);
                } else if sample.left_pressed {
                    self.state = ClickState::Pressed;
                    self.inside = true;
                    out.push(ClickSignal::Pressed);
                }
            }
            ClickState::Pressed => {
                if sample.left_released {
                    if sample.intersecting {
                        self.state = ClickState::Hovering;
                        if !self.inside {
                            out.push(ClickSignal::Entered);
                        }
                        out.push(ClickSignal::Clicked);
                        let window = sample.double_click_ms as f32 / 1000.0;
                        match self.last_click {
                            Some(prev) if sample.now - prev <= window => {
                                out.push(ClickSignal::DoubleClicked);
                                self.last_click = None;
                            }
                            _ => self.last_click = Some(sample.now),
                        }
                    } else {
                        self.state = ClickState::Idle;
                    }
                    self.inside = false;
                } else if !sample.left_down {
                    // Release happened while we were not looking (e.g. hidden).
                    self.state = ClickState::Idle;
                    self.inside = false;
                } else if self.inside && !sample.intersecting {
                    self.inside = false;
                    out.push(ClickSignal::Exited);
                } else if !self.inside && sample.intersecting {
                    self.inside = true;
                    out.push(ClickSignal::Entered);
                }
            }
        }
        out
    }
}
