//! Player state: motion, queued intent, health and timed effects.

use std::time::Duration;

use maze_chase_core::{CellCoord, DamageOutcome, Direction, Grid, Health, PlayerConfig};

use crate::motion::Motion;

#[derive(Clone, Debug)]
pub(crate) struct Player {
    motion: Motion,
    facing: Direction,
    health: Health,
    max_health: Health,
    intent: Option<Direction>,
    speed_boost: Option<Duration>,
    shield: Option<Duration>,
    invulnerable: Option<Duration>,
}

impl Player {
    pub(crate) fn spawn(cell: CellCoord, max_health: u32) -> Self {
        Self {
            motion: Motion::at(cell),
            facing: Direction::South,
            health: Health::new(max_health),
            max_health: Health::new(max_health),
            intent: None,
            speed_boost: None,
            shield: None,
            invulnerable: None,
        }
    }

    pub(crate) fn motion(&self) -> &Motion {
        &self.motion
    }

    pub(crate) fn facing(&self) -> Direction {
        self.facing
    }

    pub(crate) fn health(&self) -> Health {
        self.health
    }

    pub(crate) fn max_health(&self) -> Health {
        self.max_health
    }

    pub(crate) fn intent(&self) -> Option<Direction> {
        self.intent
    }

    pub(crate) fn speed_boost(&self) -> Option<Duration> {
        self.speed_boost
    }

    pub(crate) fn shield(&self) -> Option<Duration> {
        self.shield
    }

    pub(crate) fn invulnerable(&self) -> Option<Duration> {
        self.invulnerable
    }

    pub(crate) fn occupied_cell(&self) -> CellCoord {
        self.motion.occupied_cell()
    }

    /// Records a movement wish; the latest intent wins.
    pub(crate) fn queue_intent(&mut self, direction: Direction) {
        self.intent = Some(direction);
    }

    /// Consumes the pending intent, returning the accepted step.
    ///
    /// Intents issued while moving or towards a wall are dropped.
    pub(crate) fn consume_intent(&mut self, grid: &Grid) -> Option<(CellCoord, CellCoord)> {
        let direction = self.intent.take()?;
        let from = self.motion.target();
        let to = from.neighbor(direction)?;
        if !self.motion.retarget(to, grid) {
            return None;
        }
        self.facing = direction;
        Some((from, to))
    }

    /// Moves the player and counts down every timed effect.
    pub(crate) fn advance(&mut self, dt: Duration, config: &PlayerConfig) {
        let speed = if self.speed_boost.is_some() {
            config.base_speed * config.speed_boost_multiplier
        } else {
            config.base_speed
        };
        self.motion.advance(speed, dt);

        count_down(&mut self.speed_boost, dt);
        count_down(&mut self.shield, dt);
        count_down(&mut self.invulnerable, dt);
    }

    /// Applies one monster hit.
    pub(crate) fn take_damage(&mut self, config: &PlayerConfig) -> DamageOutcome {
        if self.shield.take().is_some() {
            self.start_grace(config);
            return DamageOutcome::ShieldAbsorbed;
        }
        if self.invulnerable.is_some() {
            return DamageOutcome::Invulnerable;
        }

        self.health = self.health.saturating_sub(config.damage_per_hit);
        if self.health.is_depleted() {
            return DamageOutcome::Fatal;
        }
        self.start_grace(config);
        DamageOutcome::Wounded {
            remaining: self.health,
        }
    }

    /// Starts or refreshes the speed boost.
    pub(crate) fn grant_speed_boost(&mut self, duration: Duration) {
        self.speed_boost = non_zero(duration);
    }

    /// Starts or refreshes the shield.
    pub(crate) fn grant_shield(&mut self, duration: Duration) {
        self.shield = non_zero(duration);
    }

    fn start_grace(&mut self, config: &PlayerConfig) {
        self.invulnerable = non_zero(config.invulnerability());
    }
}

fn count_down(timer: &mut Option<Duration>, dt: Duration) {
    *timer = timer.and_then(|remaining| non_zero(remaining.saturating_sub(dt)));
}

fn non_zero(duration: Duration) -> Option<Duration> {
    (!duration.is_zero()).then_some(duration)
}
