//! Tile grid and maze layout shared by generation, pathfinding and the world.

use thiserror::Error;

use crate::{CellCoord, Direction};

/// Contents of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tile {
    /// Impassable cell.
    Wall,
    /// Traversable cell.
    Path,
}

/// Dense rectangular grid of tiles stored in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    columns: u32,
    rows: u32,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Creates a grid where every cell holds `tile`.
    #[must_use]
    pub fn filled(columns: u32, rows: u32, tile: Tile) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            tiles: vec![tile; capacity],
        }
    }

    /// Parses a grid from text rows where `#` marks a wall and any other
    /// character marks a path.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::EmptyGrid`] when no columns or rows are provided and
    /// [`MazeError::RaggedRows`] when rows differ in length.
    pub fn from_rows<S>(rows: &[S]) -> Result<Self, MazeError>
    where
        S: AsRef<str>,
    {
        let expected = rows.first().map_or(0, |row| row.as_ref().chars().count());
        if expected == 0 {
            return Err(MazeError::EmptyGrid);
        }

        let mut tiles = Vec::with_capacity(expected * rows.len());
        for (index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != expected {
                return Err(MazeError::RaggedRows {
                    row: index,
                    expected,
                    found,
                });
            }
            tiles.extend(row.chars().map(|symbol| match symbol {
                '#' => Tile::Wall,
                _ => Tile::Path,
            }));
        }

        let columns = u32::try_from(expected).map_err(|_| MazeError::EmptyGrid)?;
        let row_count = u32::try_from(rows.len()).map_err(|_| MazeError::EmptyGrid)?;
        Ok(Self {
            columns,
            rows: row_count,
            tiles,
        })
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Reports whether the grid holds no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Reports whether the cell lies within the grid bounds.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Reports whether the cell lies inside the outer border ring.
    #[must_use]
    pub const fn is_interior(&self, cell: CellCoord) -> bool {
        cell.column() > 0
            && cell.row() > 0
            && cell.column() + 1 < self.columns
            && cell.row() + 1 < self.rows
    }

    /// Tile stored at the cell, if the cell lies within the grid.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<Tile> {
        self.index(cell)
            .and_then(|index| self.tiles.get(index).copied())
    }

    /// Reports whether the cell is an in-bounds path cell.
    #[must_use]
    pub fn is_path(&self, cell: CellCoord) -> bool {
        self.tile(cell) == Some(Tile::Path)
    }

    /// Reports whether the cell is a wall. Cells outside the grid count as walls.
    #[must_use]
    pub fn is_wall(&self, cell: CellCoord) -> bool {
        !self.is_path(cell)
    }

    /// Overwrites the tile at `cell`, returning `false` when the cell is out of bounds.
    pub fn set(&mut self, cell: CellCoord, tile: Tile) -> bool {
        let Some(slot) = self.index(cell).and_then(|index| self.tiles.get_mut(index)) else {
            return false;
        };
        *slot = tile;
        true
    }

    /// Iterates over every cell coordinate in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let columns = self.columns;
        (0..self.rows)
            .flat_map(move |row| (0..columns).map(move |column| CellCoord::new(column, row)))
    }

    /// Iterates over all path cells in row-major order.
    pub fn path_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells().filter(move |cell| self.is_path(*cell))
    }

    /// Number of path cells in the grid.
    #[must_use]
    pub fn path_count(&self) -> usize {
        self.tiles.iter().filter(|tile| **tile == Tile::Path).count()
    }

    /// Orthogonal path neighbours of `cell`, in north, east, south, west order.
    pub fn path_neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| cell.neighbor(direction))
            .filter(move |neighbor| self.is_path(*neighbor))
    }

    /// Dense row-major index of the cell, if it lies within the grid.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Cell coordinate for a dense row-major index.
    #[must_use]
    pub fn cell_at(&self, index: usize) -> Option<CellCoord> {
        if index >= self.tiles.len() {
            return None;
        }
        let width = usize::try_from(self.columns).ok()?;
        let column = u32::try_from(index % width).ok()?;
        let row = u32::try_from(index / width).ok()?;
        Some(CellCoord::new(column, row))
    }
}

/// A playable maze: the grid plus its start, exit and power-up spawn cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    grid: Grid,
    start: CellCoord,
    exit: CellCoord,
    powerup_spawns: Vec<CellCoord>,
}

impl Maze {
    /// Assembles a maze after checking its layout invariants.
    ///
    /// # Errors
    ///
    /// Fails when start, exit or a spawn is not a path cell, when a spawn
    /// coincides with the start or exit, or when a spawn is listed twice.
    pub fn new(
        grid: Grid,
        start: CellCoord,
        exit: CellCoord,
        powerup_spawns: Vec<CellCoord>,
    ) -> Result<Self, MazeError> {
        if !grid.is_path(start) {
            return Err(MazeError::StartBlocked { cell: start });
        }
        if !grid.is_path(exit) {
            return Err(MazeError::ExitBlocked { cell: exit });
        }
        for (index, &spawn) in powerup_spawns.iter().enumerate() {
            if !grid.is_path(spawn) {
                return Err(MazeError::SpawnBlocked { cell: spawn });
            }
            if spawn == start || spawn == exit {
                return Err(MazeError::SpawnOnEndpoint { cell: spawn });
            }
            if powerup_spawns[..index].contains(&spawn) {
                return Err(MazeError::DuplicateSpawn { cell: spawn });
            }
        }

        Ok(Self {
            grid,
            start,
            exit,
            powerup_spawns,
        })
    }

    /// Underlying tile grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Cell where the player begins.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Cell the player must reach to win.
    #[must_use]
    pub const fn exit(&self) -> CellCoord {
        self.exit
    }

    /// Cells reserved for power-ups, in spawn order.
    #[must_use]
    pub fn powerup_spawns(&self) -> &[CellCoord] {
        &self.powerup_spawns
    }

    /// Reports whether an entity may stand on `cell`.
    #[must_use]
    pub fn is_valid_move(&self, cell: CellCoord) -> bool {
        self.grid.is_path(cell)
    }
}

/// Reasons a grid or maze layout may be rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    /// The text layout contained no cells.
    #[error("grid layout is empty")]
    EmptyGrid,
    /// A text row differed in length from the first row.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRows {
        /// Zero-based index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// The start cell is a wall or lies outside the grid.
    #[error("start cell {cell:?} is not a path cell")]
    StartBlocked {
        /// Rejected start cell.
        cell: CellCoord,
    },
    /// The exit cell is a wall or lies outside the grid.
    #[error("exit cell {cell:?} is not a path cell")]
    ExitBlocked {
        /// Rejected exit cell.
        cell: CellCoord,
    },
    /// A power-up spawn is a wall or lies outside the grid.
    #[error("power-up spawn {cell:?} is not a path cell")]
    SpawnBlocked {
        /// Rejected spawn cell.
        cell: CellCoord,
    },
    /// A power-up spawn sits on the start or exit.
    #[error("power-up spawn {cell:?} overlaps the start or exit")]
    SpawnOnEndpoint {
        /// Rejected spawn cell.
        cell: CellCoord,
    },
    /// A power-up spawn was listed more than once.
    #[error("power-up spawn {cell:?} is listed twice")]
    DuplicateSpawn {
        /// Repeated spawn cell.
        cell: CellCoord,
    },
}
