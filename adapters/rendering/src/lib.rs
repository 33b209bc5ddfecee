#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Maze Chase adapters.
//!
//! Adapters never read the world directly. They turn a session snapshot into
//! a [`Scene`], which carries everything needed to draw a frame, including the
//! storm-dependent visibility radius, and hand it to a [`RenderingBackend`].

mod text;

use std::{error::Error, fmt, time::Duration};

use anyhow::Result as AnyResult;
use glam::Vec2;
use maze_chase_core::{
    CellCoord, Direction, Health, MonsterId, Outcome, PowerUpKind, StormPhase, Tile,
};
use maze_chase_world::query::Snapshot;

pub use text::{render_text, TextBackend};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Colors assigned to each kind of scene element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Wall tiles.
    pub wall: Color,
    /// Path tiles.
    pub path: Color,
    /// Exit tile.
    pub exit: Color,
    /// Player body.
    pub player: Color,
    /// Active monsters. Frozen monsters are drawn lightened.
    pub monster: Color,
    /// Speed power-ups.
    pub speed_powerup: Color,
    /// Shield power-ups.
    pub shield_powerup: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            wall: Color::from_rgb_u8(0, 180, 255),
            path: Color::from_rgb_u8(15, 20, 35),
            exit: Color::from_rgb_u8(255, 100, 255),
            player: Color::from_rgb_u8(0, 255, 150),
            monster: Color::from_rgb_u8(255, 30, 60),
            speed_powerup: Color::from_rgb_u8(255, 220, 0),
            shield_powerup: Color::from_rgb_u8(100, 200, 255),
        }
    }
}

/// Amount frozen monsters are blended towards white.
const FROZEN_LIGHTEN: f32 = 0.6;

/// Visibility rules applied while building a scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisionTuning {
    storm_radius: f32,
}

impl VisionTuning {
    /// Creates vision tuning with the radius, in cells, visible around the
    /// player during an active storm.
    ///
    /// # Errors
    ///
    /// Returns [`RenderingError::InvalidVisionRadius`] when the radius is
    /// negative or not finite.
    pub fn new(storm_radius: f32) -> Result<Self, RenderingError> {
        if !storm_radius.is_finite() || storm_radius < 0.0 {
            return Err(RenderingError::InvalidVisionRadius { storm_radius });
        }
        Ok(Self { storm_radius })
    }

    /// Visibility radius for `storm`; `None` means the whole maze is visible.
    #[must_use]
    pub fn radius_for(&self, storm: StormPhase) -> Option<f32> {
        match storm {
            StormPhase::Calm { .. } | StormPhase::Warning { .. } => None,
            StormPhase::Active { .. } => Some(self.storm_radius),
        }
    }
}

impl Default for VisionTuning {
    fn default() -> Self {
        Self { storm_radius: 3.5 }
    }
}

/// Player descriptor positioned in cell units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerPresentation {
    /// Continuous position of the player.
    pub position: Vec2,
    /// Direction the player faces.
    pub facing: Direction,
    /// Current health.
    pub health: Health,
    /// Health at session start.
    pub max_health: Health,
    /// Whether a shield currently protects the player.
    pub shielded: bool,
    /// Whether a speed boost is active.
    pub boosted: bool,
    /// Fill color of the player's body.
    pub color: Color,
}

/// Monster descriptor positioned in cell units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonsterPresentation {
    /// Identifier of the monster.
    pub id: MonsterId,
    /// Continuous position of the monster.
    pub position: Vec2,
    /// Whether the monster is frozen.
    pub frozen: bool,
    /// Fill color of the monster's body.
    pub color: Color,
}

/// Power-up descriptor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerUpPresentation {
    /// Cell the power-up rests on.
    pub cell: CellCoord,
    /// Kind of the power-up.
    pub kind: PowerUpKind,
    /// Fill color of the power-up.
    pub color: Color,
}

/// Scene description consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Width of the maze in cells.
    pub columns: u32,
    /// Height of the maze in cells.
    pub rows: u32,
    /// Row-major maze tiles.
    pub tiles: Vec<Tile>,
    /// Exit cell.
    pub exit: CellCoord,
    /// Player descriptor.
    pub player: PlayerPresentation,
    /// Monster descriptors in id order.
    pub monsters: Vec<MonsterPresentation>,
    /// Uncollected power-ups.
    pub power_ups: Vec<PowerUpPresentation>,
    /// Current storm phase.
    pub storm: StormPhase,
    /// Radius visible around the player, `None` when unrestricted.
    pub vision_radius: Option<f32>,
    /// Session outcome.
    pub outcome: Outcome,
    /// Whether the simulation is paused.
    pub paused: bool,
    /// Game time elapsed while playing.
    pub elapsed: Duration,
}

impl Scene {
    /// Builds a scene from a session snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &Snapshot<'_>, vision: &VisionTuning, palette: &Palette) -> Self {
        let grid = snapshot.maze.grid();
        let tiles = grid
            .cells()
            .map(|cell| grid.tile(cell).unwrap_or(Tile::Wall))
            .collect();

        let player = PlayerPresentation {
            position: snapshot.player.position,
            facing: snapshot.player.facing,
            health: snapshot.player.health,
            max_health: snapshot.player.max_health,
            shielded: snapshot.player.shield.is_some(),
            boosted: snapshot.player.speed_boost.is_some(),
            color: palette.player,
        };

        let monsters = snapshot
            .monsters
            .iter()
            .map(|monster| {
                let frozen = monster.freeze_remaining.is_some();
                MonsterPresentation {
                    id: monster.id,
                    position: monster.position,
                    frozen,
                    color: if frozen {
                        palette.monster.lighten(FROZEN_LIGHTEN)
                    } else {
                        palette.monster
                    },
                }
            })
            .collect();

        let power_ups = snapshot
            .power_ups
            .iter()
            .map(|powerup| PowerUpPresentation {
                cell: powerup.cell(),
                kind: powerup.kind(),
                color: match powerup.kind() {
                    PowerUpKind::Speed => palette.speed_powerup,
                    PowerUpKind::Shield => palette.shield_powerup,
                },
            })
            .collect();

        Self {
            columns: grid.columns(),
            rows: grid.rows(),
            tiles,
            exit: snapshot.maze.exit(),
            player,
            monsters,
            power_ups,
            storm: snapshot.storm,
            vision_radius: vision.radius_for(snapshot.storm),
            outcome: snapshot.outcome,
            paused: snapshot.paused,
            elapsed: snapshot.elapsed,
        }
    }

    /// Tile at `cell`, treating out-of-bounds cells as walls.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Tile {
        self.index(cell)
            .and_then(|index| self.tiles.get(index).copied())
            .unwrap_or(Tile::Wall)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let columns = usize::try_from(self.columns).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        row.checked_mul(columns)?.checked_add(column)
    }

    /// Reports whether `cell` lies within the player's vision radius.
    #[must_use]
    pub fn is_visible(&self, cell: CellCoord) -> bool {
        let Some(radius) = self.vision_radius else {
            return true;
        };
        let center = Vec2::new(cell.column() as f32, cell.row() as f32);
        center.distance(self.player.position) <= radius
    }
}

/// Rendering backend capable of presenting Maze Chase scenes.
pub trait RenderingBackend {
    /// Presents one frame.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// The storm vision radius must be a finite, non-negative number of cells.
    InvalidVisionRadius {
        /// Provided radius that failed validation.
        storm_radius: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidVisionRadius { storm_radius } => {
                write!(
                    f,
                    "storm vision radius must be finite and non-negative (received {storm_radius})"
                )
            }
        }
    }
}

impl Error for RenderingError {}
