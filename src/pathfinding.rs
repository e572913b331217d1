//! Grid pathfinding for movement tasks.
//!
//! A [`Grid`] is a walkability map laid over world space. [`Grid::find_path`]
//! runs A* over cells (4- or 8-connected, without cutting corners) and
//! [`Grid::find_world_path`] turns the result into waypoints for a
//! [`WaypointFollower`](crate::components::waypoints::WaypointFollower).
//!
//! Grids can be loaded from JSON:
//!
//! ```json
//! {
//!   "cell_size": 32.0,
//!   "origin": [0.0, 0.0],
//!   "diagonal": true,
//!   "rows": [
//!     "....#",
//!     ".##.#",
//!     "....."
//!   ]
//! }
//! ```
//!
//! `#` marks a blocked cell; any other character is walkable.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use arrayvec::ArrayVec;
use glam::{IVec2, Vec2};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::SceneError;

const BLOCKED: char = '#';

/// Serialized form of a [`Grid`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridDef {
    pub cell_size: f32,
    #[serde(default)]
    pub origin: [f32; 2],
    #[serde(default)]
    pub diagonal: bool,
    pub rows: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: i32,
    height: i32,
    cell_size: f32,
    origin: Vec2,
    diagonal: bool,
    walkable: Vec<bool>,
}

#[derive(Clone, Copy, Debug)]
struct Open {
    f: f32,
    g: f32,
    cell: IVec2,
}

impl PartialEq for Open {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Open {}

impl PartialOrd for Open {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Open {
    // Reversed on `f` so the max-heap pops the cheapest node; larger `g`
    // (closer to the goal) breaks ties.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| self.g.total_cmp(&other.g))
            .then_with(|| (other.cell.y, other.cell.x).cmp(&(self.cell.y, self.cell.x)))
    }
}

impl Grid {
    /// Fully walkable grid.
    pub fn open(width: i32, height: i32, cell_size: f32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            cell_size,
            origin: Vec2::ZERO,
            diagonal: false,
            walkable: vec![true; (width * height) as usize],
        }
    }

    pub fn with_diagonal(mut self, diagonal: bool) -> Self {
        self.diagonal = diagonal;
        self
    }

    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    pub fn from_def(def: &GridDef) -> Result<Self, SceneError> {
        if def.cell_size <= 0.0 {
            return Err(SceneError::Config(format!(
                "grid cell_size must be positive, got {}",
                def.cell_size
            )));
        }
        let height = def.rows.len() as i32;
        let width = def.rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as i32;
        let mut grid = Grid::open(width, height, def.cell_size)
            .with_diagonal(def.diagonal)
            .with_origin(Vec2::from(def.origin));
        for (y, row) in def.rows.iter().enumerate() {
            let mut x = 0;
            for c in row.chars() {
                grid.set_walkable(IVec2::new(x, y as i32), c != BLOCKED);
                x += 1;
            }
            // Short rows are padded with blocked cells.
            while x < width {
                grid.set_walkable(IVec2::new(x, y as i32), false);
                x += 1;
            }
        }
        Ok(grid)
    }

    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        let def: GridDef = serde_json::from_str(json)
            .map_err(|e| SceneError::Config(format!("invalid grid json: {}", e)))?;
        Self::from_def(&def)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn in_bounds(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    fn index(&self, cell: IVec2) -> Option<usize> {
        self.in_bounds(cell)
            .then(|| (cell.y * self.width + cell.x) as usize)
    }

    pub fn is_walkable(&self, cell: IVec2) -> bool {
        self.index(cell).is_some_and(|i| self.walkable[i])
    }

    pub fn set_walkable(&mut self, cell: IVec2, walkable: bool) {
        if let Some(i) = self.index(cell) {
            self.walkable[i] = walkable;
        }
    }

    pub fn world_to_cell(&self, point: Vec2) -> IVec2 {
        ((point - self.origin) / self.cell_size).floor().as_ivec2()
    }

    pub fn cell_center(&self, cell: IVec2) -> Vec2 {
        self.origin + (cell.as_vec2() + Vec2::splat(0.5)) * self.cell_size
    }

    fn neighbours(&self, cell: IVec2) -> ArrayVec<(IVec2, f32), 8> {
        const ORTHOGONAL: [IVec2; 4] = [IVec2::X, IVec2::NEG_X, IVec2::Y, IVec2::NEG_Y];
        const DIAGONAL: [IVec2; 4] = [
            IVec2::new(1, 1),
            IVec2::new(1, -1),
            IVec2::new(-1, 1),
            IVec2::new(-1, -1),
        ];
        let mut out = ArrayVec::new();
        for step in ORTHOGONAL {
            if self.is_walkable(cell + step) {
                out.push((cell + step, 1.0));
            }
        }
        if self.diagonal {
            for step in DIAGONAL {
                let corner_free = self.is_walkable(cell + IVec2::new(step.x, 0))
                    && self.is_walkable(cell + IVec2::new(0, step.y));
                if corner_free && self.is_walkable(cell + step) {
                    out.push((cell + step, std::f32::consts::SQRT_2));
                }
            }
        }
        out
    }

    fn heuristic(&self, a: IVec2, b: IVec2) -> f32 {
        let d = (a - b).abs();
        let (dx, dy) = (d.x as f32, d.y as f32);
        if self.diagonal {
            dx.max(dy) + (std::f32::consts::SQRT_2 - 1.0) * dx.min(dy)
        } else {
            dx + dy
        }
    }

    /// Cheapest cell path from `start` to `goal`, both included. `None` if
    /// either end is blocked or the goal is unreachable.
    pub fn find_path(&self, start: IVec2, goal: IVec2) -> Option<Vec<IVec2>> {
        if !self.is_walkable(start) || !self.is_walkable(goal) {
            return None;
        }
        let mut open = BinaryHeap::new();
        let mut came_from: FxHashMap<IVec2, IVec2> = FxHashMap::default();
        let mut g_score: FxHashMap<IVec2, f32> = FxHashMap::default();
        g_score.insert(start, 0.0);
        open.push(Open {
            f: self.heuristic(start, goal),
            g: 0.0,
            cell: start,
        });

        while let Some(Open { g, cell, .. }) = open.pop() {
            if cell == goal {
                let mut path = vec![cell];
                let mut cursor = cell;
                while let Some(prev) = came_from.get(&cursor) {
                    path.push(*prev);
                    cursor = *prev;
                }
                path.reverse();
                return Some(path);
            }
            if g > g_score.get(&cell).copied().unwrap_or(f32::INFINITY) {
                continue;
            }
            for (next, cost) in self.neighbours(cell) {
                let tentative = g + cost;
                if tentative < g_score.get(&next).copied().unwrap_or(f32::INFINITY) {
                    came_from.insert(next, cell);
                    g_score.insert(next, tentative);
                    open.push(Open {
                        f: tentative + self.heuristic(next, goal),
                        g: tentative,
                        cell: next,
                    });
                }
            }
        }
        None
    }

    /// Waypoints from `from` to `to` through cell centres, ending exactly at
    /// `to`. The start cell is not included.
    pub fn find_world_path(&self, from: Vec2, to: Vec2) -> Option<Vec<Vec2>> {
        let cells = self.find_path(self.world_to_cell(from), self.world_to_cell(to))?;
        let mut route: Vec<Vec2> = cells
            .iter()
            .skip(1)
            .map(|c| self.cell_center(*c))
            .collect();
        match route.last_mut() {
            Some(last) => *last = to,
            None => route.push(to),
        }
        Some(route)
    }
}
