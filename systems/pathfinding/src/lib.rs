#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grid pathfinding over the 4-connected graph of maze path cells.
//!
//! [`PathFinder`] runs A* with a Manhattan heuristic and keeps its scratch
//! buffers alive between queries so monsters re-planning every half second do
//! not allocate. [`DistanceField`] is a breadth-first distance map from a
//! single origin, used for connectivity checks and diagnostics.

mod distance;

use std::{cmp::Reverse, collections::BinaryHeap};

use maze_chase_core::{CellCoord, Grid};

pub use distance::DistanceField;

const NO_PARENT: usize = usize::MAX;

/// Reusable A* search over a [`Grid`].
///
/// Ties between open nodes are broken by lower estimated total cost, then by
/// higher cost-so-far, then by insertion order. Neighbours are expanded north,
/// east, south, west. Together these make the returned route a pure function
/// of the grid and the endpoints.
#[derive(Debug, Default)]
pub struct PathFinder {
    g_score: Vec<u32>,
    parent: Vec<usize>,
    closed: Vec<bool>,
    open: BinaryHeap<Reverse<OpenNode>>,
}

/// Open-set entry ordered by `(f, Reverse(g), sequence)`.
type OpenNode = (u32, Reverse<u32>, u64, usize);

impl PathFinder {
    /// Creates a path finder with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes a shortest route from `start` to `goal`, both inclusive.
    ///
    /// Returns `[start]` when the endpoints coincide, when either endpoint is
    /// a wall or out of bounds, or when the goal is unreachable.
    pub fn find(&mut self, grid: &Grid, start: CellCoord, goal: CellCoord) -> Vec<CellCoord> {
        let stay = vec![start];
        if start == goal || !grid.is_path(start) || !grid.is_path(goal) {
            return stay;
        }
        let (Some(start_index), Some(goal_index)) = (grid.index(start), grid.index(goal)) else {
            return stay;
        };

        self.reset(grid.len());
        self.g_score[start_index] = 0;
        let mut sequence: u64 = 0;
        self.open.push(Reverse((
            start.manhattan_distance(goal),
            Reverse(0),
            sequence,
            start_index,
        )));

        while let Some(Reverse((_, Reverse(cost), _, index))) = self.open.pop() {
            if self.closed[index] {
                continue;
            }
            self.closed[index] = true;

            if index == goal_index {
                return self.reconstruct(grid, goal_index).unwrap_or(stay);
            }

            let Some(cell) = grid.cell_at(index) else {
                continue;
            };
            let next_cost = cost.saturating_add(1);
            for neighbor in grid.path_neighbors(cell) {
                let Some(neighbor_index) = grid.index(neighbor) else {
                    continue;
                };
                if self.closed[neighbor_index] || next_cost >= self.g_score[neighbor_index] {
                    continue;
                }

                self.g_score[neighbor_index] = next_cost;
                self.parent[neighbor_index] = index;
                sequence += 1;
                self.open.push(Reverse((
                    next_cost.saturating_add(neighbor.manhattan_distance(goal)),
                    Reverse(next_cost),
                    sequence,
                    neighbor_index,
                )));
            }
        }

        stay
    }

    fn reset(&mut self, cell_count: usize) {
        self.g_score.clear();
        self.g_score.resize(cell_count, u32::MAX);
        self.parent.clear();
        self.parent.resize(cell_count, NO_PARENT);
        self.closed.clear();
        self.closed.resize(cell_count, false);
        self.open.clear();
    }

    fn reconstruct(&self, grid: &Grid, goal_index: usize) -> Option<Vec<CellCoord>> {
        let mut route = Vec::new();
        let mut current = goal_index;
        loop {
            route.push(grid.cell_at(current)?);
            let parent = self.parent[current];
            if parent == NO_PARENT {
                break;
            }
            current = parent;
        }
        route.reverse();
        Some(route)
    }
}

/// Convenience wrapper that runs a one-off [`PathFinder`] query.
#[must_use]
pub fn shortest_path(grid: &Grid, start: CellCoord, goal: CellCoord) -> Vec<CellCoord> {
    PathFinder::new().find(grid, start, goal)
}
