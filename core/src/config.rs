//! Static tuning parameters consumed by the maze generator, world and session.
//!
//! Every section implements [`Default`] with the stock game balance, and the
//! whole tree deserialises from partial documents: missing fields fall back to
//! their defaults. Durations are expressed in seconds.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Aggregated configuration for one playthrough.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Maze dimensions and braiding.
    pub maze: MazeConfig,
    /// Player movement and damage tuning.
    pub player: PlayerConfig,
    /// Monster count, pacing and placement.
    pub monsters: MonsterConfig,
    /// Power-up count, durations and shield behaviour.
    pub powerups: PowerUpConfig,
    /// Storm cadence.
    pub storm: StormConfig,
}

impl GameConfig {
    /// Checks every section, rejecting values the simulation cannot honour.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.maze.validate()?;
        self.player.validate()?;
        self.monsters.validate()?;
        self.powerups.validate()?;
        self.storm.validate()
    }
}

/// Maze dimensions and braiding probability.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MazeConfig {
    /// Grid width in cells; must be odd and at least 5.
    pub columns: u32,
    /// Grid height in cells; must be odd and at least 5.
    pub rows: u32,
    /// Probability that an eligible wall is opened during braiding.
    pub braid_chance: f64,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            columns: 25,
            rows: 17,
            braid_chance: 0.12,
        }
    }
}

impl MazeConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !dimension_is_valid(self.columns) || !dimension_is_valid(self.rows) {
            return Err(ConfigError::InvalidDimensions {
                columns: self.columns,
                rows: self.rows,
            });
        }
        if !(0.0..=1.0).contains(&self.braid_chance) {
            return Err(ConfigError::InvalidProbability {
                field: "maze.braid_chance",
                value: self.braid_chance,
            });
        }
        Ok(())
    }
}

/// Player movement, health and damage tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerConfig {
    /// Movement speed in cells per second.
    pub base_speed: f32,
    /// Health at session start.
    pub max_health: u32,
    /// Health removed by a single monster hit.
    pub damage_per_hit: u32,
    /// Grace period after a hit during which further hits are ignored.
    pub invulnerability_secs: f32,
    /// Speed factor applied while a speed boost is active.
    pub speed_boost_multiplier: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            base_speed: 15.0,
            max_health: 100,
            damage_per_hit: 20,
            invulnerability_secs: 1.0,
            speed_boost_multiplier: 2.0,
        }
    }
}

impl PlayerConfig {
    /// Grace period after a hit.
    #[must_use]
    pub fn invulnerability(&self) -> Duration {
        seconds(self.invulnerability_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        positive("player.base_speed", self.base_speed)?;
        positive("player.speed_boost_multiplier", self.speed_boost_multiplier)?;
        non_negative("player.invulnerability_secs", self.invulnerability_secs)?;
        if self.max_health == 0 {
            return Err(ConfigError::Zero {
                field: "player.max_health",
            });
        }
        if self.damage_per_hit == 0 {
            return Err(ConfigError::Zero {
                field: "player.damage_per_hit",
            });
        }
        Ok(())
    }
}

/// Monster count, speed, re-planning cadence and placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonsterConfig {
    /// Number of monsters spawned at session start.
    pub count: usize,
    /// Movement speed in cells per second before the per-monster multiplier.
    pub base_speed: f32,
    /// Per-monster speed factors by spawn index; later monsters reuse the last entry.
    pub speed_multipliers: Vec<f32>,
    /// Minimum time between two route plans of the same monster.
    pub move_delay_secs: f32,
    /// Minimum Manhattan distance between a monster spawn and the player start.
    pub min_spawn_distance: u32,
}

impl Default for MonsterConfig {
    fn default() -> Self {
        Self {
            count: 2,
            base_speed: 3.0,
            speed_multipliers: vec![1.0, 0.8],
            move_delay_secs: 0.5,
            min_spawn_distance: 11,
        }
    }
}

impl MonsterConfig {
    /// Cooldown between two route plans.
    #[must_use]
    pub fn move_delay(&self) -> Duration {
        seconds(self.move_delay_secs)
    }

    /// Effective speed of the monster spawned at `index`.
    #[must_use]
    pub fn speed_for(&self, index: usize) -> f32 {
        let multiplier = self
            .speed_multipliers
            .get(index)
            .or_else(|| self.speed_multipliers.last())
            .copied()
            .unwrap_or(1.0);
        self.base_speed * multiplier
    }

    fn validate(&self) -> Result<(), ConfigError> {
        positive("monsters.base_speed", self.base_speed)?;
        non_negative("monsters.move_delay_secs", self.move_delay_secs)?;
        if self.speed_multipliers.is_empty() {
            return Err(ConfigError::EmptyMultipliers);
        }
        for &multiplier in &self.speed_multipliers {
            positive("monsters.speed_multipliers", multiplier)?;
        }
        Ok(())
    }
}

/// What collecting a shield power-up does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShieldEffect {
    /// Every monster is frozen for [`PowerUpConfig::freeze_secs`].
    #[default]
    FreezeMonsters,
    /// The player gains a shield that absorbs one hit or expires.
    ShieldPlayer,
}

/// Power-up count, durations and shield behaviour.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PowerUpConfig {
    /// Number of power-ups placed in the maze, clamped to the free path cells.
    pub count: usize,
    /// Duration of a speed boost.
    pub speed_boost_secs: f32,
    /// Lifetime of a player shield when it absorbs no hit.
    pub shield_secs: f32,
    /// Duration monsters stay frozen.
    pub freeze_secs: f32,
    /// Target of the shield power-up.
    pub shield_effect: ShieldEffect,
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        Self {
            count: 4,
            speed_boost_secs: 5.0,
            shield_secs: 5.0,
            freeze_secs: 5.0,
            shield_effect: ShieldEffect::FreezeMonsters,
        }
    }
}

impl PowerUpConfig {
    /// Duration of a speed boost.
    #[must_use]
    pub fn speed_boost(&self) -> Duration {
        seconds(self.speed_boost_secs)
    }

    /// Lifetime of a player shield.
    #[must_use]
    pub fn shield(&self) -> Duration {
        seconds(self.shield_secs)
    }

    /// Duration monsters stay frozen.
    #[must_use]
    pub fn freeze(&self) -> Duration {
        seconds(self.freeze_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        non_negative("powerups.speed_boost_secs", self.speed_boost_secs)?;
        non_negative("powerups.shield_secs", self.shield_secs)?;
        non_negative("powerups.freeze_secs", self.freeze_secs)
    }
}

/// Storm cadence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StormConfig {
    /// Shortest calm period between two storms.
    pub min_interval_secs: f32,
    /// Longest calm period between two storms.
    pub max_interval_secs: f32,
    /// Length of the warning phase; calm periods switch to warning once this much time is left.
    pub warning_secs: f32,
    /// Length of the active storm.
    pub duration_secs: f32,
}

impl Default for StormConfig {
    fn default() -> Self {
        Self {
            min_interval_secs: 8.0,
            max_interval_secs: 15.0,
            warning_secs: 3.0,
            duration_secs: 8.0,
        }
    }
}

impl StormConfig {
    /// Shortest calm period.
    #[must_use]
    pub fn min_interval(&self) -> Duration {
        seconds(self.min_interval_secs)
    }

    /// Longest calm period.
    #[must_use]
    pub fn max_interval(&self) -> Duration {
        seconds(self.max_interval_secs)
    }

    /// Length of the warning phase.
    #[must_use]
    pub fn warning(&self) -> Duration {
        seconds(self.warning_secs)
    }

    /// Length of the active storm.
    #[must_use]
    pub fn duration(&self) -> Duration {
        seconds(self.duration_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        non_negative("storm.min_interval_secs", self.min_interval_secs)?;
        non_negative("storm.max_interval_secs", self.max_interval_secs)?;
        non_negative("storm.warning_secs", self.warning_secs)?;
        non_negative("storm.duration_secs", self.duration_secs)?;
        if self.min_interval_secs > self.max_interval_secs {
            return Err(ConfigError::InvertedRange {
                field: "storm.min_interval_secs..storm.max_interval_secs",
                min: self.min_interval_secs,
                max: self.max_interval_secs,
            });
        }
        Ok(())
    }
}

/// Reasons a configuration is rejected before a session starts.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Maze dimensions must be odd and at least 5.
    #[error("maze dimensions must be odd and at least 5 (received {columns}x{rows})")]
    InvalidDimensions {
        /// Requested width.
        columns: u32,
        /// Requested height.
        rows: u32,
    },
    /// A probability lies outside `0.0..=1.0`.
    #[error("{field} must lie within 0.0..=1.0 (received {value})")]
    InvalidProbability {
        /// Offending field.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// A speed or factor is zero, negative or not finite.
    #[error("{field} must be positive and finite (received {value})")]
    NonPositive {
        /// Offending field.
        field: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// A duration is negative or not finite.
    #[error("{field} must be a finite, non-negative number of seconds (received {value})")]
    NegativeDuration {
        /// Offending field.
        field: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// The lower bound of a range exceeds the upper bound.
    #[error("{field} is inverted ({min} > {max})")]
    InvertedRange {
        /// Offending field pair.
        field: &'static str,
        /// Lower bound.
        min: f32,
        /// Upper bound.
        max: f32,
    },
    /// An integer quantity that must be positive is zero.
    #[error("{field} must be greater than zero")]
    Zero {
        /// Offending field.
        field: &'static str,
    },
    /// No per-monster speed multiplier was supplied.
    #[error("monsters.speed_multipliers must contain at least one entry")]
    EmptyMultipliers,
}

fn dimension_is_valid(value: u32) -> bool {
    value >= 5 && value % 2 == 1
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NegativeDuration { field, value })
    }
}

fn seconds(value: f32) -> Duration {
    Duration::try_from_secs_f32(value).unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn even_or_small_dimensions_are_rejected() {
        for (columns, rows) in [(24, 17), (25, 16), (3, 5), (5, 3), (0, 0)] {
            let mut config = GameConfig::default();
            config.maze.columns = columns;
            config.maze.rows = rows;
            assert_eq!(
                config.validate(),
                Err(ConfigError::InvalidDimensions { columns, rows })
            );
        }
    }

    #[test]
    fn negative_durations_are_rejected() {
        let mut config = GameConfig::default();
        config.powerups.freeze_secs = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NegativeDuration {
                field: "powerups.freeze_secs",
                ..
            })
        ));

        let mut config = GameConfig::default();
        config.monsters.move_delay_secs = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NegativeDuration { .. })
        ));
    }

    #[test]
    fn braid_chance_must_be_a_probability() {
        let mut config = GameConfig::default();
        config.maze.braid_chance = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidProbability { .. })
        ));
    }

    #[test]
    fn inverted_storm_interval_is_rejected() {
        let mut config = GameConfig::default();
        config.storm.min_interval_secs = 20.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedRange { .. })
        ));
    }

    #[test]
    fn zero_health_and_missing_multipliers_are_rejected() {
        let mut config = GameConfig::default();
        config.player.max_health = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::Zero {
                field: "player.max_health"
            })
        );

        let mut config = GameConfig::default();
        config.monsters.speed_multipliers.clear();
        assert_eq!(config.validate(), Err(ConfigError::EmptyMultipliers));
    }

    #[test]
    fn later_monsters_reuse_last_multiplier() {
        let monsters = MonsterConfig::default();
        assert!((monsters.speed_for(0) - 3.0).abs() < f32::EPSILON);
        assert!((monsters.speed_for(1) - 2.4).abs() < 1e-5);
        assert!((monsters.speed_for(7) - 2.4).abs() < 1e-5);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: GameConfig = toml::from_str(
            r#"
            [maze]
            columns = 9
            rows = 7

            [powerups]
            shield_effect = "shield_player"
            "#,
        )
        .expect("partial config parses");

        assert_eq!(config.maze.columns, 9);
        assert_eq!(config.maze.rows, 7);
        assert_eq!(config.maze.braid_chance, MazeConfig::default().braid_chance);
        assert_eq!(config.powerups.shield_effect, ShieldEffect::ShieldPlayer);
        assert_eq!(config.player, PlayerConfig::default());
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let parsed: Result<GameConfig, _> = toml::from_str("[maze]\nwidth = 9\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn duration_accessors_convert_seconds() {
        let storm = StormConfig::default();
        assert_eq!(storm.warning(), Duration::from_secs(3));
        assert_eq!(storm.duration(), Duration::from_secs(8));
        assert_eq!(MonsterConfig::default().move_delay(), Duration::from_millis(500));
    }
}
