#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Chase engine.
//!
//! This crate defines the message surface that connects the session, the
//! authoritative world, and pure systems. The session submits [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to. Systems consume event streams, query immutable data such as the
//! [`Maze`], and respond exclusively with new command batches.

mod config;
mod maze;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use config::{
    ConfigError, GameConfig, MazeConfig, MonsterConfig, PlayerConfig, PowerUpConfig, ShieldEffect,
    StormConfig,
};
pub use maze::{Grid, Maze, MazeError, Tile};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Records the player's wish to step one cell in the given direction.
    ///
    /// The intent is consumed on the next tick and silently dropped when the
    /// player is still moving or the destination is a wall.
    MovePlayer {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Flips the pause flag while the session is still being played.
    TogglePause,
    /// Supplies a freshly planned route for a monster.
    RouteMonster {
        /// Identifier of the monster the route was planned for.
        monster: MonsterId,
        /// Cells from the monster's current cell to its goal, both inclusive.
        path: Vec<CellCoord>,
    },
    /// Freezes every monster for the provided duration.
    FreezeMonsters {
        /// Time the monsters remain frozen.
        duration: Duration,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a movement intent was accepted.
    PlayerMoved {
        /// Cell the player was settled on.
        from: CellCoord,
        /// Cell the player is now heading towards.
        to: CellCoord,
    },
    /// Reports that a monster's cooldown elapsed and it needs a new route.
    MonsterReadyToPlan {
        /// Identifier of the monster awaiting a route.
        monster: MonsterId,
        /// Cell the monster currently occupies.
        from: CellCoord,
        /// Cell the player currently occupies.
        goal: CellCoord,
    },
    /// Confirms that a monster accepted the next step of a route.
    MonsterRetargeted {
        /// Identifier of the monster.
        monster: MonsterId,
        /// Cell the monster was settled on.
        from: CellCoord,
        /// Next cell the monster is heading towards.
        to: CellCoord,
    },
    /// Announces that a monster became frozen.
    MonsterFrozen {
        /// Identifier of the frozen monster.
        monster: MonsterId,
        /// Time the monster remains frozen.
        duration: Duration,
    },
    /// Announces that a monster's freeze expired.
    MonsterThawed {
        /// Identifier of the monster that resumed pursuit.
        monster: MonsterId,
    },
    /// Reports contact between an active monster and the player.
    PlayerHit {
        /// Monster that touched the player.
        monster: MonsterId,
        /// Result of applying the damage contract.
        outcome: DamageOutcome,
    },
    /// Confirms that the player picked up a power-up.
    PowerUpCollected {
        /// Cell the power-up occupied.
        cell: CellCoord,
        /// Kind of the collected power-up.
        kind: PowerUpKind,
    },
    /// Announces a storm phase transition.
    StormPhaseChanged {
        /// Phase that became active.
        phase: StormPhase,
    },
    /// Announces that the session outcome changed.
    OutcomeChanged {
        /// Outcome that became active.
        outcome: Outcome,
    },
    /// Announces that the pause flag flipped.
    PauseToggled {
        /// Whether the simulation is now paused.
        paused: bool,
    },
}

/// Cardinal movement directions. Diagonal movement does not exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Every direction in clockwise order starting from north.
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Direction of a single orthogonal step between two cells, if they are adjacent.
    #[must_use]
    pub fn between(from: CellCoord, to: CellCoord) -> Option<Self> {
        let column_diff = from.column().abs_diff(to.column());
        let row_diff = from.row().abs_diff(to.row());

        if column_diff + row_diff != 1 {
            return None;
        }

        if column_diff == 1 {
            if to.column() > from.column() {
                Some(Self::East)
            } else {
                Some(Self::West)
            }
        } else if to.row() > from.row() {
            Some(Self::South)
        } else {
            Some(Self::North)
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Cell reached by taking `steps` cells in `direction`.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant.
    /// Upper bounds are the grid's concern.
    #[must_use]
    pub fn offset(self, direction: Direction, steps: u32) -> Option<Self> {
        let (column, row) = match direction {
            Direction::North => (Some(self.column), self.row.checked_sub(steps)),
            Direction::East => (self.column.checked_add(steps), Some(self.row)),
            Direction::South => (Some(self.column), self.row.checked_add(steps)),
            Direction::West => (self.column.checked_sub(steps), Some(self.row)),
        };
        Some(Self::new(column?, row?))
    }

    /// Orthogonal neighbour of the cell in `direction`.
    #[must_use]
    pub fn neighbor(self, direction: Direction) -> Option<Self> {
        self.offset(direction, 1)
    }
}

/// Unique identifier assigned to a monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonsterId(u32);

impl MonsterId {
    /// Creates a new monster identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Remaining hit points of the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Health(u32);

impl Health {
    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric hit point count.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether no hit points remain.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 == 0
    }

    /// Subtracts `damage`, stopping at zero.
    #[must_use]
    pub const fn saturating_sub(self, damage: u32) -> Self {
        Self(self.0.saturating_sub(damage))
    }
}

/// Result of applying contact damage to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DamageOutcome {
    /// An active shield absorbed the hit and was consumed.
    ShieldAbsorbed,
    /// The player is inside the post-hit grace period; nothing changed.
    Invulnerable,
    /// Health was reduced but remains above zero.
    Wounded {
        /// Health left after the hit.
        remaining: Health,
    },
    /// Health reached zero.
    Fatal,
}

impl DamageOutcome {
    /// Reports whether the hit reduced the player's health.
    #[must_use]
    pub const fn dealt_damage(&self) -> bool {
        matches!(self, Self::Wounded { .. } | Self::Fatal)
    }
}

/// Kinds of power-up that can be collected from the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Temporarily multiplies the player's movement speed.
    Speed,
    /// Shields the player or freezes the monsters, depending on configuration.
    Shield,
}

/// A one-shot power-up resting on a path cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PowerUp {
    cell: CellCoord,
    kind: PowerUpKind,
}

impl PowerUp {
    /// Creates a power-up of `kind` located at `cell`.
    #[must_use]
    pub const fn new(cell: CellCoord, kind: PowerUpKind) -> Self {
        Self { cell, kind }
    }

    /// Cell the power-up occupies.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Kind of the power-up.
    #[must_use]
    pub const fn kind(&self) -> PowerUpKind {
        self.kind
    }
}

/// Phase of the periodic visibility storm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StormPhase {
    /// Clear skies until the next storm warning.
    Calm {
        /// Time left until the storm arrives.
        time_to_next: Duration,
    },
    /// The storm is about to begin.
    Warning {
        /// Time left before the storm becomes active.
        remaining: Duration,
    },
    /// The storm reduces visibility.
    Active {
        /// Time left before the storm clears.
        remaining: Duration,
    },
}

impl StormPhase {
    /// Reports whether the storm currently reduces visibility.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    /// Time left in the current phase.
    #[must_use]
    pub const fn remaining(&self) -> Duration {
        match self {
            Self::Calm { time_to_next } => *time_to_next,
            Self::Warning { remaining } | Self::Active { remaining } => *remaining,
        }
    }
}

/// Outcome of a playthrough.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The session is still running.
    #[default]
    Playing,
    /// The player reached the exit.
    Won,
    /// The player's health was depleted.
    Lost,
}

impl Outcome {
    /// Reports whether the outcome is final.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Playing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn neighbor_stops_at_origin_edges() {
        let corner = CellCoord::new(0, 0);
        assert_eq!(corner.neighbor(Direction::North), None);
        assert_eq!(corner.neighbor(Direction::West), None);
        assert_eq!(corner.neighbor(Direction::East), Some(CellCoord::new(1, 0)));
        assert_eq!(corner.neighbor(Direction::South), Some(CellCoord::new(0, 1)));
        assert_eq!(
            CellCoord::new(3, 3).offset(Direction::North, 2),
            Some(CellCoord::new(3, 1))
        );
    }

    #[test]
    fn direction_between_neighbors() {
        let origin = CellCoord::new(3, 3);
        for direction in Direction::ALL {
            let neighbor = origin.neighbor(direction).expect("interior cell");
            assert_eq!(Direction::between(origin, neighbor), Some(direction));
        }
        assert_eq!(Direction::between(origin, origin), None);
        assert_eq!(Direction::between(origin, CellCoord::new(4, 4)), None);
    }

    #[test]
    fn health_saturates_at_zero() {
        let health = Health::new(30).saturating_sub(20);
        assert_eq!(health.get(), 10);
        assert!(health.saturating_sub(50).is_depleted());
    }

    #[test]
    fn storm_phase_reports_remaining_time() {
        let phase = StormPhase::Warning {
            remaining: Duration::from_secs(3),
        };
        assert_eq!(phase.remaining(), Duration::from_secs(3));
        assert!(!phase.is_active());
        assert!(StormPhase::Active {
            remaining: Duration::ZERO
        }
        .is_active());
    }

    #[test]
    fn only_playing_is_not_terminal() {
        assert!(!Outcome::Playing.is_terminal());
        assert!(Outcome::Won.is_terminal());
        assert!(Outcome::Lost.is_terminal());
    }
}
