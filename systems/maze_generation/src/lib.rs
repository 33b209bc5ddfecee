#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded maze generator producing braided perfect mazes.
//!
//! Generation runs in three passes over a grid that starts out solid:
//! a randomized depth-first carve over odd coordinates builds a spanning
//! tree of corridors, a braid pass knocks out a fraction of the walls that
//! separate two corridors, and a final pass picks the start, the exit and the
//! power-up spawn cells.

use maze_chase_core::{CellCoord, Direction, Grid, Maze, MazeError, Tile};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// Probability used by the braid pass when none is configured.
pub const DEFAULT_BRAID_CHANCE: f64 = 0.12;

/// Smallest width or height the generator accepts.
pub const MIN_DIMENSION: u32 = 5;

/// Errors reported before any carving starts.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GenerationError {
    /// Dimensions must be odd and at least [`MIN_DIMENSION`].
    #[error("maze dimensions must be odd and at least {MIN_DIMENSION} (received {columns}x{rows})")]
    InvalidDimensions {
        /// Requested width.
        columns: u32,
        /// Requested height.
        rows: u32,
    },
    /// Braid probability outside `0.0..=1.0` or not finite.
    #[error("braid chance must lie within 0.0..=1.0 (received {0})")]
    InvalidBraidChance(f64),
    /// The carved grid could not be assembled into a maze.
    #[error(transparent)]
    Maze(#[from] MazeError),
}

/// Deterministic maze generator backed by a seeded ChaCha stream.
#[derive(Clone, Debug)]
pub struct MazeGenerator {
    rng: ChaCha8Rng,
    braid_chance: f64,
}

impl MazeGenerator {
    /// Creates a generator whose output is fully determined by `seed`.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            braid_chance: DEFAULT_BRAID_CHANCE,
        }
    }

    /// Overrides the probability used by the braid pass.
    #[must_use]
    pub fn with_braid_chance(mut self, braid_chance: f64) -> Self {
        self.braid_chance = braid_chance;
        self
    }

    /// Generates a maze of `columns` by `rows` cells with up to
    /// `powerup_count` power-up spawn cells.
    ///
    /// The spawn count is clamped to the number of path cells other than the
    /// start and the exit.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidDimensions`] for even or undersized
    /// dimensions and [`GenerationError::InvalidBraidChance`] when the braid
    /// probability is not a probability.
    pub fn generate(
        &mut self,
        columns: u32,
        rows: u32,
        powerup_count: usize,
    ) -> Result<Maze, GenerationError> {
        if !dimension_is_valid(columns) || !dimension_is_valid(rows) {
            return Err(GenerationError::InvalidDimensions { columns, rows });
        }
        if !(0.0..=1.0).contains(&self.braid_chance) {
            return Err(GenerationError::InvalidBraidChance(self.braid_chance));
        }

        let mut grid = Grid::filled(columns, rows, Tile::Wall);
        self.carve(&mut grid);
        let opened = self.braid(&mut grid);

        let path_cells: Vec<CellCoord> = grid.path_cells().collect();
        let start = path_cells
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(CellCoord::new(1, 1));
        let exit = farthest_from(&path_cells, start);

        let candidates: Vec<CellCoord> = path_cells
            .iter()
            .copied()
            .filter(|&cell| cell != start && cell != exit)
            .collect();
        let spawns: Vec<CellCoord> = candidates
            .choose_multiple(&mut self.rng, powerup_count.min(candidates.len()))
            .copied()
            .collect();

        tracing::debug!(
            columns,
            rows,
            path_cells = path_cells.len(),
            braided_walls = opened,
            start = ?start,
            exit = ?exit,
            spawns = spawns.len(),
            "generated maze"
        );

        Ok(Maze::new(grid, start, exit, spawns)?)
    }

    /// Carves a perfect maze over odd coordinates using an explicit stack.
    fn carve(&mut self, grid: &mut Grid) {
        let origin = CellCoord::new(
            self.odd_coordinate(grid.columns()),
            self.odd_coordinate(grid.rows()),
        );
        let _ = grid.set(origin, Tile::Path);

        let mut stack = vec![Frame::new(origin, &mut self.rng)];
        while let Some(frame) = stack.last_mut() {
            let Some(direction) = frame.next_direction() else {
                let _ = stack.pop();
                continue;
            };
            let cell = frame.cell;

            let Some(target) = cell.offset(direction, 2) else {
                continue;
            };
            if !grid.is_interior(target) || grid.tile(target) != Some(Tile::Wall) {
                continue;
            }
            let Some(between) = cell.neighbor(direction) else {
                continue;
            };

            let _ = grid.set(between, Tile::Path);
            let _ = grid.set(target, Tile::Path);
            stack.push(Frame::new(target, &mut self.rng));
        }
    }

    /// Opens interior walls flanked by exactly two corridors. Returns the
    /// number of walls removed.
    fn braid(&mut self, grid: &mut Grid) -> usize {
        if self.braid_chance <= 0.0 {
            return 0;
        }

        let mut opened = 0;
        for row in 1..grid.rows() - 1 {
            for column in 1..grid.columns() - 1 {
                let cell = CellCoord::new(column, row);
                if grid.is_path(cell) || grid.path_neighbors(cell).count() != 2 {
                    continue;
                }
                if self.rng.gen_bool(self.braid_chance) {
                    let _ = grid.set(cell, Tile::Path);
                    opened += 1;
                }
            }
        }
        opened
    }

    fn odd_coordinate(&mut self, extent: u32) -> u32 {
        let slots = (extent - 1) / 2;
        2 * self.rng.gen_range(0..slots) + 1
    }
}

/// Depth-first carving frame: a cell and its shuffled exploration order.
#[derive(Debug)]
struct Frame {
    cell: CellCoord,
    directions: [Direction; 4],
    next: usize,
}

impl Frame {
    fn new(cell: CellCoord, rng: &mut ChaCha8Rng) -> Self {
        let mut directions = Direction::ALL;
        directions.shuffle(rng);
        Self {
            cell,
            directions,
            next: 0,
        }
    }

    fn next_direction(&mut self) -> Option<Direction> {
        let direction = self.directions.get(self.next).copied()?;
        self.next += 1;
        Some(direction)
    }
}

/// First cell in row-major order with the strictly greatest Manhattan
/// distance from `origin`.
fn farthest_from(cells: &[CellCoord], origin: CellCoord) -> CellCoord {
    let mut best = origin;
    let mut best_distance = 0;
    for &cell in cells {
        let distance = cell.manhattan_distance(origin);
        if distance > best_distance {
            best = cell;
            best_distance = distance;
        }
    }
    best
}

fn dimension_is_valid(value: u32) -> bool {
    value >= MIN_DIMENSION && value % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn farthest_prefers_first_in_scan_order() {
        let cells = [
            CellCoord::new(1, 1),
            CellCoord::new(3, 1),
            CellCoord::new(1, 3),
            CellCoord::new(3, 3),
        ];
        assert_eq!(
            farthest_from(&cells, CellCoord::new(1, 1)),
            CellCoord::new(3, 3)
        );
        assert_eq!(
            farthest_from(&cells[..3], CellCoord::new(1, 1)),
            CellCoord::new(3, 1)
        );
    }

    #[test]
    fn odd_coordinates_stay_interior() {
        let mut generator = MazeGenerator::from_seed(7);
        for _ in 0..200 {
            let value = generator.odd_coordinate(9);
            assert!(value % 2 == 1 && (1..=7).contains(&value));
        }
    }

    #[test]
    fn frames_yield_each_direction_once() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut frame = Frame::new(CellCoord::new(1, 1), &mut rng);
        let mut seen = Vec::new();
        while let Some(direction) = frame.next_direction() {
            seen.push(direction);
        }
        seen.sort_by_key(|direction| Direction::ALL.iter().position(|d| d == direction));
        assert_eq!(seen, Direction::ALL);
    }
}
