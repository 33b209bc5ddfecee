#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic placement of monsters and power-ups at session start.

use std::cmp::Reverse;

use maze_chase_core::{CellCoord, Maze, PowerUp, PowerUpKind};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

const POWERUP_KINDS: [PowerUpKind; 2] = [PowerUpKind::Speed, PowerUpKind::Shield];

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    monster_count: usize,
    min_spawn_distance: u32,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration for `monster_count` monsters placed at
    /// least `min_spawn_distance` cells (Manhattan) away from the start.
    #[must_use]
    pub const fn new(monster_count: usize, min_spawn_distance: u32, rng_seed: u64) -> Self {
        Self {
            monster_count,
            min_spawn_distance,
            rng_seed,
        }
    }
}

/// Entities placed into a freshly generated maze.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Placement {
    /// Spawn cell of each monster, in monster id order.
    pub monsters: Vec<CellCoord>,
    /// Power-ups in spawn order with alternating kinds.
    pub powerups: Vec<PowerUp>,
}

/// Seeded placement system.
#[derive(Debug)]
pub struct Spawning {
    monster_count: usize,
    min_spawn_distance: u32,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            monster_count: config.monster_count,
            min_spawn_distance: config.min_spawn_distance,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Places monsters and power-ups into `maze`.
    pub fn place(&mut self, maze: &Maze) -> Placement {
        let monsters = self.place_monsters(maze);
        let powerups = maze
            .powerup_spawns()
            .iter()
            .enumerate()
            .map(|(index, &cell)| PowerUp::new(cell, kind_for(index)))
            .collect();

        tracing::debug!(
            monsters = monsters.len(),
            powerups = maze.powerup_spawns().len(),
            "placed entities"
        );

        Placement { monsters, powerups }
    }

    /// Picks distinct monster cells far enough from the start.
    ///
    /// Cells at or beyond the minimum distance are drawn at random. When too
    /// few exist the remainder is filled with the farthest other cells, so the
    /// start cell is only ever left empty, never used.
    fn place_monsters(&mut self, maze: &Maze) -> Vec<CellCoord> {
        if self.monster_count == 0 {
            return Vec::new();
        }

        let start = maze.start();
        let (mut eligible, mut fallback): (Vec<CellCoord>, Vec<CellCoord>) = maze
            .grid()
            .path_cells()
            .filter(|&cell| cell != start)
            .partition(|cell| cell.manhattan_distance(start) >= self.min_spawn_distance);

        eligible.shuffle(&mut self.rng);
        let mut chosen: Vec<CellCoord> = eligible.into_iter().take(self.monster_count).collect();

        if chosen.len() < self.monster_count {
            tracing::debug!(
                requested = self.monster_count,
                eligible = chosen.len(),
                min_distance = self.min_spawn_distance,
                "falling back to farthest cells for monster spawns"
            );
            fallback.sort_by_key(|cell| Reverse(cell.manhattan_distance(start)));
            let missing = self.monster_count - chosen.len();
            chosen.extend(fallback.into_iter().take(missing));
        }

        chosen
    }
}

fn kind_for(index: usize) -> PowerUpKind {
    POWERUP_KINDS[index % POWERUP_KINDS.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_alternate_starting_with_speed() {
        let kinds: Vec<_> = (0..5).map(kind_for).collect();
        assert_eq!(
            kinds,
            vec![
                PowerUpKind::Speed,
                PowerUpKind::Shield,
                PowerUpKind::Speed,
                PowerUpKind::Shield,
                PowerUpKind::Speed,
            ]
        );
    }
}
