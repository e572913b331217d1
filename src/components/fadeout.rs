//! One-shot "move, fade, remove" controller.
//!
//! The owner slides in a cardinal direction at a constant speed while its
//! [`Tint`](super::tint::Tint) alpha ramps from 1 to 0 over `duration`
//! seconds. When the time is up the owner removes itself from its parent
//! (and is disposed when `dispose` is set). A finished controller does
//! nothing further.

use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::components::waypoints::Direction;

#[derive(Component, Clone, Debug, PartialEq)]
pub struct MoveFadeRemove {
    pub direction: Direction,
    /// Units per second.
    pub speed: f32,
    /// Seconds until removal.
    pub duration: f32,
    /// Despawn the owner (and its subtree) after removal.
    pub dispose: bool,
    elapsed: f32,
    finished: bool,
}

/// Outcome of one frame of [`MoveFadeRemove`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FadeStep {
    pub translation: Vec2,
    pub alpha: f32,
    pub done: bool,
}

impl MoveFadeRemove {
    pub fn new(direction: Direction, speed: f32, duration: f32) -> Self {
        Self {
            direction,
            speed,
            duration,
            dispose: true,
            elapsed: 0.0,
            finished: false,
        }
    }

    /// Remove the owner but keep it alive for reuse by the caller.
    pub fn keep_alive(mut self) -> Self {
        self.dispose = false;
        self
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance by `elapsed` seconds. Movement stops exactly at `duration`.
    pub fn step(&mut self, elapsed: f32) -> Option<FadeStep> {
        if self.finished {
            return None;
        }
        let dt = elapsed.max(0.0).min(self.duration - self.elapsed);
        self.elapsed += dt;
        let done = self.elapsed >= self.duration;
        if done {
            self.finished = true;
        }
        let alpha = if self.duration > 0.0 {
            (1.0 - self.elapsed / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Some(FadeStep {
            translation: self.direction.vector() * self.speed * dt,
            alpha,
            done,
        })
    }
}
