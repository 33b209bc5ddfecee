//! Continuous movement between adjacent cells.

use std::time::Duration;

use glam::Vec2;
use maze_chase_core::{CellCoord, Direction, Grid};

/// Distance below which an entity counts as standing on its target.
const SETTLE_EPSILON: f32 = 1e-3;

/// Position of an entity gliding towards a target cell.
///
/// The position never overshoots: a step that would reach or pass the target
/// lands exactly on it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Motion {
    position: Vec2,
    target: CellCoord,
}

impl Motion {
    /// Creates a motion resting on `cell`.
    pub(crate) fn at(cell: CellCoord) -> Self {
        Self {
            position: cell_center(cell),
            target: cell,
        }
    }

    pub(crate) fn position(&self) -> Vec2 {
        self.position
    }

    pub(crate) fn target(&self) -> CellCoord {
        self.target
    }

    pub(crate) fn is_settled(&self) -> bool {
        self.position.distance(cell_center(self.target)) <= SETTLE_EPSILON
    }

    /// Cell nearest to the current position.
    pub(crate) fn occupied_cell(&self) -> CellCoord {
        let rounded = self.position.round().max(Vec2::ZERO);
        CellCoord::new(rounded.x as u32, rounded.y as u32)
    }

    /// Heading derived from the remaining movement vector.
    pub(crate) fn heading(&self) -> Option<Direction> {
        if self.is_settled() {
            return None;
        }
        let delta = cell_center(self.target) - self.position;
        let direction = if delta.x.abs() >= delta.y.abs() {
            if delta.x > 0.0 {
                Direction::East
            } else {
                Direction::West
            }
        } else if delta.y > 0.0 {
            Direction::South
        } else {
            Direction::North
        };
        Some(direction)
    }

    /// Moves towards the target at `speed` cells per second for `dt`.
    pub(crate) fn advance(&mut self, speed: f32, dt: Duration) {
        let target = cell_center(self.target);
        let to_target = target - self.position;
        let distance = to_target.length();
        if distance <= SETTLE_EPSILON {
            self.position = target;
            return;
        }

        let step = speed.max(0.0) * dt.as_secs_f32();
        if step + SETTLE_EPSILON >= distance {
            self.position = target;
        } else {
            self.position += to_target / distance * step;
        }
    }

    /// Accepts `next` as the new target when settled, one step away from the
    /// current target and on a path cell.
    pub(crate) fn retarget(&mut self, next: CellCoord, grid: &Grid) -> bool {
        if !self.is_settled()
            || Direction::between(self.target, next).is_none()
            || !grid.is_path(next)
        {
            return false;
        }
        self.position = cell_center(self.target);
        self.target = next;
        true
    }
}

fn cell_center(cell: CellCoord) -> Vec2 {
    Vec2::new(cell.column() as f32, cell.row() as f32)
}
