#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives Maze Chase sessions headlessly.

mod autopilot;

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use maze_chase_core::GameConfig;
use maze_chase_rendering::{
    render_text, Palette, RenderingBackend, Scene, TextBackend, VisionTuning,
};
use maze_chase_session::GameSession;
use maze_chase_system_pathfinding::DistanceField;
use tracing_subscriber::EnvFilter;

use crate::autopilot::Autopilot;

const DEFAULT_FILTER: &str = "maze_chase=info";

/// Maze Chase: escape the maze before the monsters catch you.
#[derive(Debug, Parser)]
#[command(name = "maze-chase", version, about)]
struct Cli {
    /// TOML file overriding the default game configuration.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Seed for maze generation and every other random decision.
    #[arg(long, global = true, default_value_t = 0)]
    seed: u64,
    #[command(subcommand)]
    command: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Plays a session with the autopilot steering towards the exit.
    Run {
        /// Maximum number of ticks to simulate.
        #[arg(long, default_value_t = 3_000)]
        ticks: u32,
        /// Length of one tick in milliseconds.
        #[arg(long, default_value_t = 100)]
        dt_ms: u64,
        /// Print a frame every N ticks; 0 prints only the final frame.
        #[arg(long, default_value_t = 0)]
        frame_every: u32,
    },
    /// Generates a maze and prints it with distance statistics.
    Inspect,
}

fn main() -> Result<()> {
    install_subscriber();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let session = GameSession::new(config, cli.seed)
        .with_context(|| format!("failed to start a session with seed {}", cli.seed))?;

    match cli.command {
        Mode::Run {
            ticks,
            dt_ms,
            frame_every,
        } => run(session, ticks, Duration::from_millis(dt_ms), frame_every),
        Mode::Inspect => {
            inspect(&session);
            Ok(())
        }
    }
}

fn install_subscriber() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration from {}", path.display()))?;
    let config: GameConfig = toml::from_str(&contents)
        .with_context(|| format!("failed to parse configuration in {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid configuration in {}", path.display()))?;
    Ok(config)
}

fn run(mut session: GameSession, ticks: u32, dt: Duration, frame_every: u32) -> Result<()> {
    let vision = VisionTuning::default();
    let palette = Palette::default();
    let mut backend = TextBackend::stdout();
    let mut autopilot = Autopilot::new();
    let mut simulated = 0;

    while simulated < ticks && !session.outcome().is_terminal() {
        autopilot.steer(&mut session);
        session.update(dt);
        simulated += 1;

        if frame_every > 0 && simulated % frame_every == 0 {
            let scene = Scene::from_snapshot(&session.snapshot(), &vision, &palette);
            backend.present(&scene)?;
        }
    }

    let scene = Scene::from_snapshot(&session.snapshot(), &vision, &palette);
    backend.present(&scene).context("failed to print the final frame")?;
    tracing::info!(
        ticks = simulated,
        outcome = ?session.outcome(),
        elapsed_secs = scene.elapsed.as_secs_f32(),
        "run finished"
    );
    println!("outcome: {:?} after {simulated} ticks", session.outcome());
    Ok(())
}

fn inspect(session: &GameSession) {
    let snapshot = session.snapshot();
    let maze = snapshot.maze;
    let grid = maze.grid();
    let field = DistanceField::from_origin(grid, maze.start());

    let scene = Scene::from_snapshot(&snapshot, &VisionTuning::default(), &Palette::default());
    print!("{}", render_text(&scene));
    println!("size: {}x{}", grid.columns(), grid.rows());
    println!("path cells: {}", grid.path_count());
    println!("reachable from start: {}", field.reachable_count());
    println!("start: {:?}", maze.start());
    println!("exit: {:?}", maze.exit());
    match field.distance(maze.exit()) {
        Some(steps) => println!("start to exit: {steps} steps"),
        None => println!("start to exit: unreachable"),
    }
    if let Some((cell, steps)) = field.farthest() {
        println!("farthest cell: {cell:?} at {steps} steps");
    }
    println!("monsters: {}", snapshot.monsters.len());
    println!("power-ups: {}", snapshot.power_ups.len());
}
