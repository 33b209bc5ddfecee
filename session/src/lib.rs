#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game session orchestration.
//!
//! A [`GameSession`] generates a maze, places monsters and power-ups, and then
//! owns the resulting world. Each [`GameSession::update`] applies one tick and
//! pumps the pursuit system until it stops producing commands, so routes
//! requested during a tick are in place before the next one.

use std::time::Duration;

use maze_chase_core::{Command, ConfigError, Direction, Event, GameConfig, Outcome};
use maze_chase_system_maze_generation::{GenerationError, MazeGenerator};
use maze_chase_system_pursuit::Pursuit;
use maze_chase_system_spawning::{Config as SpawningConfig, Spawning};
use maze_chase_world::{self as world, query, Layout, World, WorldError};
use thiserror::Error;

const SPAWN_STREAM: u64 = 1;
const STORM_STREAM: u64 = 2;
const RESET_STREAM: u64 = 0x5EED_0000;

/// Reasons a session cannot be created or reset.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SessionError {
    /// The configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// The maze generator rejected its inputs.
    #[error("maze generation failed: {0}")]
    Generation(#[from] GenerationError),
    /// The world rejected the layout.
    #[error("world construction failed: {0}")]
    World(#[from] WorldError),
}

/// One playthrough: a world plus the systems that drive it.
#[derive(Debug)]
pub struct GameSession {
    config: GameConfig,
    seed: u64,
    resets: u64,
    world: World,
    pursuit: Pursuit,
    events: Vec<Event>,
    commands: Vec<Command>,
}

impl GameSession {
    /// Starts a session on a freshly generated maze.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the configuration is invalid.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, SessionError> {
        let world = generate_world(&config, seed)?;
        tracing::info!(seed, "session started");
        Ok(Self::with_world(config, seed, world))
    }

    /// Starts a session on an explicit layout.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::World`] when the configuration is invalid or
    /// the layout places entities on walls.
    pub fn from_layout(config: GameConfig, layout: Layout, seed: u64) -> Result<Self, SessionError> {
        let world = World::from_layout(config.clone(), layout, derive_seed(seed, STORM_STREAM))?;
        tracing::info!(seed, "session started from layout");
        Ok(Self::with_world(config, seed, world))
    }

    fn with_world(config: GameConfig, seed: u64, world: World) -> Self {
        Self {
            config,
            seed,
            resets: 0,
            world,
            pursuit: Pursuit::new(),
            events: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// Advances the simulation by `dt` and lets monsters re-plan.
    pub fn update(&mut self, dt: Duration) {
        self.events.clear();
        world::apply(&mut self.world, Command::Tick { dt }, &mut self.events);
        self.pump_systems();
    }

    /// Queues a one-cell step for the next tick.
    pub fn submit_move_intent(&mut self, direction: Direction) {
        self.events.clear();
        world::apply(
            &mut self.world,
            Command::MovePlayer { direction },
            &mut self.events,
        );
    }

    /// Pauses or resumes the simulation while the session is being played.
    pub fn toggle_pause(&mut self) {
        self.events.clear();
        world::apply(&mut self.world, Command::TogglePause, &mut self.events);
    }

    /// Discards the current world and starts over on a new maze.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the new world cannot be built; the
    /// current world is kept in that case.
    pub fn reset_session(&mut self) -> Result<(), SessionError> {
        let resets = self.resets.saturating_add(1);
        let seed = derive_seed(self.seed, RESET_STREAM.wrapping_add(resets));
        let world = generate_world(&self.config, seed)?;

        self.world = world;
        self.resets = resets;
        self.pursuit = Pursuit::new();
        self.events.clear();
        self.commands.clear();
        tracing::info!(seed, resets, "session reset");
        Ok(())
    }

    /// Captures everything a renderer needs for one frame.
    #[must_use]
    pub fn snapshot(&self) -> query::Snapshot<'_> {
        query::snapshot(&self.world)
    }

    /// Events produced by the most recent call.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Current outcome of the playthrough.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        query::outcome(&self.world)
    }

    /// Configuration the session was created with.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Number of completed resets.
    #[must_use]
    pub fn resets(&self) -> u64 {
        self.resets
    }

    fn pump_systems(&mut self) {
        let mut cursor = 0;
        while cursor < self.events.len() {
            let pending = self.events.len();
            self.pursuit.handle(
                &self.events[cursor..pending],
                query::maze(&self.world).grid(),
                &mut self.commands,
            );
            cursor = pending;

            for command in self.commands.drain(..) {
                world::apply(&mut self.world, command, &mut self.events);
            }
        }
    }
}

fn generate_world(config: &GameConfig, seed: u64) -> Result<World, SessionError> {
    config.validate()?;

    let maze = MazeGenerator::from_seed(seed)
        .with_braid_chance(config.maze.braid_chance)
        .generate(config.maze.columns, config.maze.rows, config.powerups.count)?;
    let placement = Spawning::new(SpawningConfig::new(
        config.monsters.count,
        config.monsters.min_spawn_distance,
        derive_seed(seed, SPAWN_STREAM),
    ))
    .place(&maze);

    let layout = Layout {
        maze,
        monsters: placement.monsters,
        powerups: placement.powerups,
    };
    Ok(World::from_layout(
        config.clone(),
        layout,
        derive_seed(seed, STORM_STREAM),
    )?)
}

/// Mixes a stream index into a base seed with one LCG step.
fn derive_seed(seed: u64, stream: u64) -> u64 {
    (seed ^ stream)
        .wrapping_mul(6_364_136_223_846_793_005)
        .wrapping_add(1_442_695_040_888_963_407)
}
