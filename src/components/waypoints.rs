//! Waypoint follower controller state.
//!
//! A [`WaypointFollower`] consumes a queue of target positions. Each frame
//! its owner advances by `speed * elapsed` along the vector to the current
//! waypoint; overshoot snaps to the waypoint and spends the remaining budget
//! on the next one, so several waypoints can be consumed in a single frame.
//!
//! The pure stepping logic lives here ([`WaypointFollower::advance`]); the
//! ECS side (moving [`Bounds`](super::bounds::Bounds) and triggering events)
//! is [`crate::systems::waypoints`].

use std::collections::VecDeque;

use bevy_ecs::prelude::Component;
use glam::Vec2;
use smallvec::SmallVec;

use crate::error::SceneError;

/// Distance under which a position counts as sitting on a waypoint.
pub const ARRIVE_EPSILON: f32 = 1e-4;

/// Discretized cardinal movement direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Dominant axis of `v`. Horizontal wins ties. `None` for a zero vector.
    pub fn from_vector(v: Vec2) -> Option<Direction> {
        if v.x == 0.0 && v.y == 0.0 {
            return None;
        }
        Some(if v.x.abs() >= v.y.abs() {
            if v.x > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if v.y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        })
    }

    /// Unit vector, Y pointing down.
    pub fn vector(&self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// Result of one [`WaypointFollower::advance`] call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FollowStep {
    pub position: Vec2,
    /// Waypoints consumed this frame, in order.
    pub arrived: SmallVec<[Vec2; 4]>,
    pub direction_changed: Option<Direction>,
    /// The final waypoint was consumed this frame.
    pub reached: bool,
}

#[derive(Component, Clone, Debug, PartialEq)]
pub struct WaypointFollower {
    /// Movement speed in units per second.
    pub speed: f32,
    waypoints: VecDeque<Vec2>,
    direction: Option<Direction>,
}

impl WaypointFollower {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            waypoints: VecDeque::new(),
            direction: None,
        }
    }

    /// Replace the route. Leading points equal to `origin` (the owner's
    /// current position) are dropped, so a route to where the owner already
    /// stands is reached immediately.
    pub fn set_waypoints(&mut self, origin: Vec2, points: impl IntoIterator<Item = Vec2>) {
        self.waypoints.clear();
        self.waypoints.extend(points);
        self.drop_reached(origin);
    }

    /// Append to the route. On an empty route this is exactly
    /// [`set_waypoints`](Self::set_waypoints).
    pub fn add_waypoints(&mut self, origin: Vec2, points: impl IntoIterator<Item = Vec2>) {
        if self.waypoints.is_empty() {
            self.set_waypoints(origin, points);
        } else {
            self.waypoints.extend(points);
        }
    }

    pub fn clear_waypoints(&mut self) {
        self.waypoints.clear();
    }

    pub fn reached_destination(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Waypoint currently being approached.
    ///
    /// Check [`reached_destination`](Self::reached_destination) first; an
    /// empty route is an error.
    pub fn next_waypoint(&self) -> Result<Vec2, SceneError> {
        self.waypoints.front().copied().ok_or(SceneError::NoWaypoints)
    }

    pub fn waypoints(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.waypoints.iter().copied()
    }

    pub fn remaining(&self) -> usize {
        self.waypoints.len()
    }

    /// Last discretized movement direction.
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    fn drop_reached(&mut self, origin: Vec2) {
        while let Some(front) = self.waypoints.front() {
            if front.distance(origin) <= ARRIVE_EPSILON {
                self.waypoints.pop_front();
            } else {
                break;
            }
        }
    }

    /// Move from `position` by this frame's budget.
    pub fn advance(&mut self, position: Vec2, elapsed: f32) -> FollowStep {
        let mut step = FollowStep {
            position,
            ..Default::default()
        };
        if self.waypoints.is_empty() {
            return step;
        }

        let mut budget = (self.speed * elapsed).max(0.0);
        let mut heading = Vec2::ZERO;
        while let Some(&target) = self.waypoints.front() {
            let delta = target - step.position;
            let dist = delta.length();
            if dist <= budget || dist <= ARRIVE_EPSILON {
                if dist > 0.0 {
                    heading = delta;
                }
                step.position = target;
                budget = (budget - dist).max(0.0);
                self.waypoints.pop_front();
                step.arrived.push(target);
                continue;
            }
            if budget > 0.0 {
                heading = delta;
                step.position += delta / dist * budget;
            }
            break;
        }

        if let Some(dir) = Direction::from_vector(heading) {
            if self.direction != Some(dir) {
                self.direction = Some(dir);
                step.direction_changed = Some(dir);
            }
        }
        step.reached = !step.arrived.is_empty() && self.waypoints.is_empty();
        step
    }
}
