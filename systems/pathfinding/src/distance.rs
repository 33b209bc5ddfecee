//! Breadth-first distance map seeded from a single origin.

use std::collections::VecDeque;

use maze_chase_core::{CellCoord, Grid};

/// Dense step-distance grid from one origin over the maze's path cells.
///
/// Distances are stored row-major and are `None` for walls and for path cells
/// the origin cannot reach.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DistanceField {
    columns: u32,
    rows: u32,
    distances: Vec<Option<u32>>,
}

impl DistanceField {
    /// Runs a breadth-first search from `origin`.
    ///
    /// An origin on a wall or outside the grid yields a field where nothing is
    /// reachable.
    #[must_use]
    pub fn from_origin(grid: &Grid, origin: CellCoord) -> Self {
        let mut field = Self {
            columns: grid.columns(),
            rows: grid.rows(),
            distances: vec![None; grid.len()],
        };

        let Some(origin_index) = grid.index(origin).filter(|_| grid.is_path(origin)) else {
            return field;
        };
        field.distances[origin_index] = Some(0);

        let mut queue = VecDeque::from([(origin, 0_u32)]);
        while let Some((cell, distance)) = queue.pop_front() {
            let next_distance = distance.saturating_add(1);
            for neighbor in grid.path_neighbors(cell) {
                let Some(index) = grid.index(neighbor) else {
                    continue;
                };
                if field.distances[index].is_some() {
                    continue;
                }
                field.distances[index] = Some(next_distance);
                queue.push_back((neighbor, next_distance));
            }
        }

        field
    }

    /// Step distance from the origin to `cell`, if reachable.
    #[must_use]
    pub fn distance(&self, cell: CellCoord) -> Option<u32> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let columns = usize::try_from(self.columns).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        let index = row.checked_mul(columns)?.checked_add(column)?;
        self.distances.get(index).copied().flatten()
    }

    /// Number of cells reachable from the origin, the origin included.
    #[must_use]
    pub fn reachable_count(&self) -> usize {
        self.distances.iter().filter(|entry| entry.is_some()).count()
    }

    /// Reachable cell farthest from the origin; ties keep the first in
    /// row-major order.
    #[must_use]
    pub fn farthest(&self) -> Option<(CellCoord, u32)> {
        let columns = usize::try_from(self.columns).ok().filter(|&c| c > 0)?;
        let mut best: Option<(usize, u32)> = None;
        for (index, distance) in self.distances.iter().enumerate() {
            let Some(distance) = *distance else {
                continue;
            };
            if best.map_or(true, |(_, current)| distance > current) {
                best = Some((index, distance));
            }
        }
        let (index, distance) = best?;
        let column = u32::try_from(index % columns).ok()?;
        let row = u32::try_from(index / columns).ok()?;
        Some((CellCoord::new(column, row), distance))
    }
}
