use std::{
    fmt::Write as _,
    io::{self, Write},
};

use anyhow::{Context, Result as AnyResult};
use glam::Vec2;
use maze_chase_core::{CellCoord, Outcome, PowerUpKind, StormPhase, Tile};

use crate::{RenderingBackend, Scene};

const WALL: char = '#';
const PATH: char = ' ';
const EXIT: char = 'E';
const PLAYER: char = '@';
const MONSTER: char = 'M';
const FROZEN_MONSTER: char = 'm';
const SPEED_POWERUP: char = '+';
const SHIELD_POWERUP: char = '*';
const HIDDEN: char = '~';

/// Draws `scene` as rows of characters followed by a status line.
///
/// Cells outside the storm vision radius are drawn as `~`. Monsters and
/// power-ups in those cells are hidden with them; the player never is.
#[must_use]
pub fn render_text(scene: &Scene) -> String {
    let columns = usize::try_from(scene.columns).unwrap_or(0);
    let rows = usize::try_from(scene.rows).unwrap_or(0);
    let mut glyphs = vec![vec![WALL; columns]; rows];

    for (row, line) in (0_u32..).zip(glyphs.iter_mut()) {
        for (column, glyph) in (0_u32..).zip(line.iter_mut()) {
            let cell = CellCoord::new(column, row);
            *glyph = if !scene.is_visible(cell) {
                HIDDEN
            } else if cell == scene.exit {
                EXIT
            } else {
                match scene.tile(cell) {
                    Tile::Wall => WALL,
                    Tile::Path => PATH,
                }
            };
        }
    }

    for powerup in &scene.power_ups {
        let glyph = match powerup.kind {
            PowerUpKind::Speed => SPEED_POWERUP,
            PowerUpKind::Shield => SHIELD_POWERUP,
        };
        place(&mut glyphs, scene, powerup.cell, glyph);
    }
    for monster in &scene.monsters {
        if let Some(cell) = nearest_cell(monster.position) {
            let glyph = if monster.frozen {
                FROZEN_MONSTER
            } else {
                MONSTER
            };
            place(&mut glyphs, scene, cell, glyph);
        }
    }
    if let Some(cell) = nearest_cell(scene.player.position) {
        if let Some(glyph) = glyph_mut(&mut glyphs, cell) {
            *glyph = PLAYER;
        }
    }

    let mut frame = String::with_capacity((columns + 1) * (rows + 1));
    for line in &glyphs {
        frame.extend(line.iter());
        frame.push('\n');
    }
    frame.push_str(&status_line(scene));
    frame.push('\n');
    frame
}

fn place(glyphs: &mut [Vec<char>], scene: &Scene, cell: CellCoord, glyph: char) {
    if !scene.is_visible(cell) {
        return;
    }
    if let Some(slot) = glyph_mut(glyphs, cell) {
        *slot = glyph;
    }
}

fn glyph_mut(glyphs: &mut [Vec<char>], cell: CellCoord) -> Option<&mut char> {
    let row = usize::try_from(cell.row()).ok()?;
    let column = usize::try_from(cell.column()).ok()?;
    glyphs.get_mut(row)?.get_mut(column)
}

fn nearest_cell(position: Vec2) -> Option<CellCoord> {
    let rounded = position.round();
    if !rounded.is_finite() || rounded.x < 0.0 || rounded.y < 0.0 {
        return None;
    }
    Some(CellCoord::new(rounded.x as u32, rounded.y as u32))
}

fn status_line(scene: &Scene) -> String {
    let mut status = format!(
        "t={:.1}s hp={}/{}",
        scene.elapsed.as_secs_f32(),
        scene.player.health.get(),
        scene.player.max_health.get()
    );
    if scene.player.shielded {
        status.push_str(" shield");
    }
    if scene.player.boosted {
        status.push_str(" boost");
    }
    let remaining = scene.storm.remaining().as_secs_f32();
    let _ = match scene.storm {
        StormPhase::Calm { .. } => Ok(()),
        StormPhase::Warning { .. } => write!(status, " storm in {remaining:.1}s"),
        StormPhase::Active { .. } => write!(status, " storm {remaining:.1}s left"),
    };
    match scene.outcome {
        Outcome::Playing => {}
        Outcome::Won => status.push_str(" ESCAPED"),
        Outcome::Lost => status.push_str(" CAUGHT"),
    }
    if scene.paused {
        status.push_str(" [paused]");
    }
    status
}

/// Backend that writes text frames to any [`Write`] sink.
#[derive(Debug)]
pub struct TextBackend<W = io::Stdout> {
    sink: W,
    frames: u64,
}

impl TextBackend<io::Stdout> {
    /// Creates a backend that prints frames to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TextBackend<W> {
    /// Creates a backend writing into `sink`.
    #[must_use]
    pub fn new(sink: W) -> Self {
        Self { sink, frames: 0 }
    }

    /// Number of frames presented so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Consumes the backend and returns its sink.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, scene: &Scene) -> AnyResult<()> {
        self.sink
            .write_all(render_text(scene).as_bytes())
            .and_then(|()| self.sink.flush())
            .with_context(|| format!("failed to present frame {}", self.frames))?;
        self.frames = self.frames.saturating_add(1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use maze_chase_core::{Direction, Health, MonsterId};

    use super::*;
    use crate::{Color, MonsterPresentation, PlayerPresentation, PowerUpPresentation};

    fn corridor_scene() -> Scene {
        let black = Color::from_rgb_u8(0, 0, 0);
        let row = |tiles: &str| {
            tiles
                .chars()
                .map(|glyph| if glyph == '#' { Tile::Wall } else { Tile::Path })
                .collect::<Vec<_>>()
        };
        let mut tiles = row("#######");
        tiles.extend(row("#.....#"));
        tiles.extend(row("#######"));

        Scene {
            columns: 7,
            rows: 3,
            tiles,
            exit: CellCoord::new(5, 1),
            player: PlayerPresentation {
                position: Vec2::new(1.0, 1.0),
                facing: Direction::East,
                health: Health::new(80),
                max_health: Health::new(100),
                shielded: false,
                boosted: true,
                color: black,
            },
            monsters: vec![MonsterPresentation {
                id: MonsterId::new(0),
                position: Vec2::new(3.1, 1.0),
                frozen: false,
                color: black,
            }],
            power_ups: vec![PowerUpPresentation {
                cell: CellCoord::new(2, 1),
                kind: PowerUpKind::Shield,
                color: black,
            }],
            storm: StormPhase::Calm {
                time_to_next: Duration::from_secs(20),
            },
            vision_radius: None,
            outcome: Outcome::Playing,
            paused: false,
            elapsed: Duration::from_millis(1_500),
        }
    }

    #[test]
    fn draws_every_entity_in_open_weather() {
        let frame = render_text(&corridor_scene());
        let lines: Vec<&str> = frame.lines().collect();
        assert_eq!(lines[0], "#######");
        assert_eq!(lines[1], "#@*M E#");
        assert_eq!(lines[2], "#######");
        assert_eq!(lines[3], "t=1.5s hp=80/100 boost");
    }

    #[test]
    fn active_storm_hides_distant_cells_and_monsters() {
        let mut scene = corridor_scene();
        scene.storm = StormPhase::Active {
            remaining: Duration::from_secs(4),
        };
        scene.vision_radius = Some(1.5);
        scene.monsters[0].frozen = true;

        let frame = render_text(&scene);
        let lines: Vec<&str> = frame.lines().collect();
        assert_eq!(lines[0], "###~~~~");
        assert_eq!(lines[1], "#@*~~~~");
        assert!(lines[3].ends_with("storm 4.0s left"));
    }

    #[test]
    fn status_counts_down_to_the_storm() {
        let mut scene = corridor_scene();
        scene.storm = StormPhase::Warning {
            remaining: Duration::from_millis(2_500),
        };

        let frame = render_text(&scene);
        assert_eq!(
            frame.lines().nth(3),
            Some("t=1.5s hp=80/100 boost storm in 2.5s")
        );
    }

    #[test]
    fn status_reports_terminal_and_paused_states() {
        let mut scene = corridor_scene();
        scene.outcome = Outcome::Lost;
        scene.paused = true;
        scene.monsters[0].frozen = true;

        let frame = render_text(&scene);
        assert!(frame.contains("#@*m E#"));
        assert!(frame.contains("CAUGHT [paused]"));
    }

    #[test]
    fn backend_writes_frames_to_sink() {
        let mut backend = TextBackend::new(Vec::new());
        backend.present(&corridor_scene()).expect("in-memory sink");
        backend.present(&corridor_scene()).expect("in-memory sink");
        assert_eq!(backend.frames(), 2);

        let output = String::from_utf8(backend.into_inner()).expect("utf-8 frames");
        assert_eq!(output.matches("#@*M E#").count(), 2);
    }
}
