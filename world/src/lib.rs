#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for Maze Chase.
//!
//! The world owns the maze, the player, the monsters, the remaining power-ups
//! and the storm cycle. It is mutated exclusively through [`apply`], which
//! executes one [`Command`] and appends the resulting [`Event`] values to the
//! caller's buffer. Read access goes through the [`query`] module.

mod monster;
mod motion;
mod player;
mod storm;

use std::time::Duration;

use maze_chase_core::{
    CellCoord, Command, ConfigError, DamageOutcome, Event, GameConfig, Maze, MonsterId, Outcome,
    PowerUp, PowerUpKind, ShieldEffect,
};
use thiserror::Error;

use monster::Monster;
use player::Player;
use storm::StormCycle;

/// Derived behaviour state of a monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MonsterState {
    /// Standing on its target cell, burning the re-planning cooldown.
    Settled,
    /// Gliding towards the next cell of its route.
    Moving,
    /// Immobile and harmless until the freeze expires.
    Frozen,
}

/// Entity placement used to populate a world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    /// Maze the session is played in. The player starts on its start cell.
    pub maze: Maze,
    /// Spawn cell of each monster; monster ids follow this order.
    pub monsters: Vec<CellCoord>,
    /// Power-ups initially resting in the maze.
    pub powerups: Vec<PowerUp>,
}

/// Reasons a world cannot be constructed.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum WorldError {
    /// The supplied configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// An entity was placed on a wall or outside the maze.
    #[error("{what} placed on blocked cell {cell:?}")]
    BlockedCell {
        /// Offending cell.
        cell: CellCoord,
        /// Kind of entity that was misplaced.
        what: &'static str,
    },
}

/// Represents the authoritative Maze Chase world state.
#[derive(Clone, Debug)]
pub struct World {
    config: GameConfig,
    maze: Maze,
    player: Player,
    monsters: Vec<Monster>,
    powerups: Vec<PowerUp>,
    storm: StormCycle,
    elapsed: Duration,
    outcome: Outcome,
    paused: bool,
}

impl World {
    /// Builds a world from an explicit layout.
    ///
    /// `seed` drives the storm cadence.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Config`] when `config` is invalid and
    /// [`WorldError::BlockedCell`] when a monster or power-up is not on a path
    /// cell.
    pub fn from_layout(config: GameConfig, layout: Layout, seed: u64) -> Result<Self, WorldError> {
        config.validate()?;

        let Layout {
            maze,
            monsters,
            powerups,
        } = layout;

        for &cell in &monsters {
            if !maze.is_valid_move(cell) {
                return Err(WorldError::BlockedCell {
                    cell,
                    what: "monster",
                });
            }
        }
        for powerup in &powerups {
            if !maze.is_valid_move(powerup.cell()) {
                return Err(WorldError::BlockedCell {
                    cell: powerup.cell(),
                    what: "power-up",
                });
            }
        }

        let monsters = (0_u32..)
            .zip(monsters)
            .map(|(id, cell)| {
                let index = usize::try_from(id).unwrap_or(usize::MAX);
                Monster::spawn(MonsterId::new(id), cell, config.monsters.speed_for(index))
            })
            .collect();

        Ok(Self {
            player: Player::spawn(maze.start(), config.player.max_health),
            storm: StormCycle::new(&config.storm, seed),
            monsters,
            powerups,
            maze,
            config,
            elapsed: Duration::ZERO,
            outcome: Outcome::Playing,
            paused: false,
        })
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if let Some((from, to)) = self.player.consume_intent(self.maze.grid()) {
            out_events.push(Event::PlayerMoved { from, to });
        }

        self.player.advance(dt, &self.config.player);

        self.update_monsters(dt, out_events);
        self.collect_powerups(out_events);

        if self.outcome == Outcome::Playing && self.player.occupied_cell() == self.maze.exit() {
            self.set_outcome(Outcome::Won, out_events);
        }

        self.storm.advance(dt, out_events);

        self.elapsed = self.elapsed.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });
        tracing::trace!(elapsed = ?self.elapsed, "world ticked");
    }

    fn update_monsters(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let move_delay = self.config.monsters.move_delay();
        let mut lost = false;
        for monster in &mut self.monsters {
            let goal = self.player.occupied_cell();
            monster.update(dt, move_delay, goal, out_events);

            if lost || monster.is_frozen() || monster.occupied_cell() != self.player.occupied_cell()
            {
                continue;
            }

            let outcome = self.player.take_damage(&self.config.player);
            out_events.push(Event::PlayerHit {
                monster: monster.id(),
                outcome,
            });
            lost = outcome == DamageOutcome::Fatal;
        }

        if lost {
            self.set_outcome(Outcome::Lost, out_events);
        }
    }

    fn collect_powerups(&mut self, out_events: &mut Vec<Event>) {
        let cell = self.player.occupied_cell();
        let Some(index) = self.powerups.iter().position(|powerup| powerup.cell() == cell) else {
            return;
        };
        let powerup = self.powerups.remove(index);

        let tuning = &self.config.powerups;
        match powerup.kind() {
            PowerUpKind::Speed => self.player.grant_speed_boost(tuning.speed_boost()),
            PowerUpKind::Shield => match tuning.shield_effect {
                ShieldEffect::FreezeMonsters => {
                    let duration = tuning.freeze();
                    for monster in &mut self.monsters {
                        monster.freeze(duration, out_events);
                    }
                }
                ShieldEffect::ShieldPlayer => self.player.grant_shield(tuning.shield()),
            },
        }

        tracing::debug!(?cell, kind = ?powerup.kind(), "power-up collected");
        out_events.push(Event::PowerUpCollected {
            cell,
            kind: powerup.kind(),
        });
    }

    fn set_outcome(&mut self, outcome: Outcome, out_events: &mut Vec<Event>) {
        if self.outcome == outcome {
            return;
        }
        self.outcome = outcome;
        tracing::info!(?outcome, elapsed = ?self.elapsed, "session outcome changed");
        out_events.push(Event::OutcomeChanged { outcome });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            if world.paused || world.outcome.is_terminal() {
                return;
            }
            world.tick(dt, out_events);
        }
        Command::MovePlayer { direction } => {
            if world.paused || world.outcome.is_terminal() {
                return;
            }
            world.player.queue_intent(direction);
        }
        Command::TogglePause => {
            if world.outcome.is_terminal() {
                return;
            }
            world.paused = !world.paused;
            out_events.push(Event::PauseToggled {
                paused: world.paused,
            });
        }
        Command::RouteMonster { monster, path } => {
            if world.outcome.is_terminal() {
                return;
            }
            let grid = world.maze.grid();
            if let Some(target) = world.monsters.iter_mut().find(|m| m.id() == monster) {
                target.follow_route(path, grid, out_events);
            }
        }
        Command::FreezeMonsters { duration } => {
            if world.outcome.is_terminal() {
                return;
            }
            for monster in &mut world.monsters {
                monster.freeze(duration, out_events);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use glam::Vec2;
    use maze_chase_core::{
        CellCoord, Direction, Health, Maze, MonsterId, Outcome, PowerUp, StormPhase,
    };

    use super::{MonsterState, World};

    /// Read-only view of the player.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct PlayerSnapshot {
        /// Continuous position in cell units.
        pub position: Vec2,
        /// Cell nearest to the position.
        pub cell: CellCoord,
        /// Direction of the last accepted step.
        pub facing: Direction,
        /// Current health.
        pub health: Health,
        /// Health at session start.
        pub max_health: Health,
        /// Step queued for the next tick, if any.
        pub pending_intent: Option<Direction>,
        /// Remaining speed boost, if active.
        pub speed_boost: Option<Duration>,
        /// Remaining shield lifetime, if active.
        pub shield: Option<Duration>,
        /// Remaining post-hit grace period, if active.
        pub invulnerable: Option<Duration>,
        /// Whether the player stands on its target cell.
        pub settled: bool,
    }

    /// Read-only view of one monster.
    #[derive(Clone, Debug, PartialEq)]
    pub struct MonsterSnapshot {
        /// Identifier of the monster.
        pub id: MonsterId,
        /// Continuous position in cell units.
        pub position: Vec2,
        /// Cell nearest to the position.
        pub cell: CellCoord,
        /// Derived behaviour state.
        pub state: MonsterState,
        /// Remaining freeze time, if frozen.
        pub freeze_remaining: Option<Duration>,
        /// Direction of travel while moving.
        pub heading: Option<Direction>,
        /// Most recently planned route, possibly stale.
        pub route: Vec<CellCoord>,
    }

    /// Everything a renderer needs to draw one frame.
    #[derive(Clone, Debug, PartialEq)]
    pub struct Snapshot<'a> {
        /// Maze layout including start, exit and spawn cells.
        pub maze: &'a Maze,
        /// Player view.
        pub player: PlayerSnapshot,
        /// Monster views in id order.
        pub monsters: Vec<MonsterSnapshot>,
        /// Power-ups that have not been collected.
        pub power_ups: &'a [PowerUp],
        /// Current storm phase.
        pub storm: StormPhase,
        /// Game time elapsed while playing.
        pub elapsed: Duration,
        /// Session outcome.
        pub outcome: Outcome,
        /// Whether the simulation is paused.
        pub paused: bool,
    }

    /// Captures a snapshot of the whole world.
    #[must_use]
    pub fn snapshot(world: &World) -> Snapshot<'_> {
        Snapshot {
            maze: &world.maze,
            player: player(world),
            monsters: monsters(world),
            power_ups: &world.powerups,
            storm: world.storm.phase(),
            elapsed: world.elapsed,
            outcome: world.outcome,
            paused: world.paused,
        }
    }

    /// Maze the world is played in.
    #[must_use]
    pub fn maze(world: &World) -> &Maze {
        &world.maze
    }

    /// Read-only view of the player.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        let player = &world.player;
        PlayerSnapshot {
            position: player.motion().position(),
            cell: player.occupied_cell(),
            facing: player.facing(),
            health: player.health(),
            max_health: player.max_health(),
            pending_intent: player.intent(),
            speed_boost: player.speed_boost(),
            shield: player.shield(),
            invulnerable: player.invulnerable(),
            settled: player.motion().is_settled(),
        }
    }

    /// Read-only views of every monster in id order.
    #[must_use]
    pub fn monsters(world: &World) -> Vec<MonsterSnapshot> {
        world
            .monsters
            .iter()
            .map(|monster| MonsterSnapshot {
                id: monster.id(),
                position: monster.motion().position(),
                cell: monster.occupied_cell(),
                state: monster.state(),
                freeze_remaining: monster.frozen(),
                heading: monster.motion().heading(),
                route: monster.route().to_vec(),
            })
            .collect()
    }

    /// Current session outcome.
    #[must_use]
    pub fn outcome(world: &World) -> Outcome {
        world.outcome
    }

    /// Current storm phase.
    #[must_use]
    pub fn storm(world: &World) -> StormPhase {
        world.storm.phase()
    }

    /// Reports whether the simulation is paused.
    #[must_use]
    pub fn is_paused(world: &World) -> bool {
        world.paused
    }
}
