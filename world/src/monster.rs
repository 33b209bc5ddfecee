//! Monster state machine: freeze countdown, stepwise motion and re-planning cadence.

use std::time::Duration;

use maze_chase_core::{CellCoord, Event, Grid, MonsterId};

use crate::{motion::Motion, MonsterState};

#[derive(Clone, Debug)]
pub(crate) struct Monster {
    id: MonsterId,
    motion: Motion,
    speed: f32,
    frozen: Option<Duration>,
    move_cooldown: Duration,
    route: Vec<CellCoord>,
}

impl Monster {
    pub(crate) fn spawn(id: MonsterId, cell: CellCoord, speed: f32) -> Self {
        Self {
            id,
            motion: Motion::at(cell),
            speed,
            frozen: None,
            move_cooldown: Duration::ZERO,
            route: Vec::new(),
        }
    }

    pub(crate) fn id(&self) -> MonsterId {
        self.id
    }

    pub(crate) fn motion(&self) -> &Motion {
        &self.motion
    }

    pub(crate) fn frozen(&self) -> Option<Duration> {
        self.frozen
    }

    pub(crate) fn is_frozen(&self) -> bool {
        self.frozen.is_some()
    }

    pub(crate) fn route(&self) -> &[CellCoord] {
        &self.route
    }

    pub(crate) fn occupied_cell(&self) -> CellCoord {
        self.motion.occupied_cell()
    }

    pub(crate) fn state(&self) -> MonsterState {
        if self.is_frozen() {
            MonsterState::Frozen
        } else if self.motion.is_settled() {
            MonsterState::Settled
        } else {
            MonsterState::Moving
        }
    }

    /// Advances the monster by `dt`.
    ///
    /// A freeze that runs out thaws the monster and lets it act within the
    /// same tick. Settled monsters burn their cooldown and ask for a route
    /// towards `goal` once it is spent.
    pub(crate) fn update(
        &mut self,
        dt: Duration,
        move_delay: Duration,
        goal: CellCoord,
        out_events: &mut Vec<Event>,
    ) {
        if let Some(remaining) = self.frozen {
            let left = remaining.saturating_sub(dt);
            if !left.is_zero() {
                self.frozen = Some(left);
                return;
            }
            self.frozen = None;
            out_events.push(Event::MonsterThawed { monster: self.id });
        }

        if !self.motion.is_settled() {
            self.motion.advance(self.speed, dt);
            return;
        }

        self.move_cooldown = self.move_cooldown.saturating_sub(dt);
        if self.move_cooldown.is_zero() {
            self.move_cooldown = move_delay;
            out_events.push(Event::MonsterReadyToPlan {
                monster: self.id,
                from: self.motion.target(),
                goal,
            });
        }
    }

    /// Stores a planned route and heads for its second cell.
    pub(crate) fn follow_route(
        &mut self,
        route: Vec<CellCoord>,
        grid: &Grid,
        out_events: &mut Vec<Event>,
    ) {
        if self.is_frozen() {
            tracing::trace!(monster = self.id.get(), "ignored route while frozen");
            return;
        }

        let from = self.motion.target();
        let next = route.get(1).copied();
        self.route = route;

        let Some(next) = next else {
            return;
        };
        if self.motion.retarget(next, grid) {
            tracing::debug!(monster = self.id.get(), ?from, to = ?next, "monster retargeted");
            out_events.push(Event::MonsterRetargeted {
                monster: self.id,
                from,
                to: next,
            });
        }
    }

    /// Freezes the monster, replacing any freeze already in progress.
    pub(crate) fn freeze(&mut self, duration: Duration, out_events: &mut Vec<Event>) {
        if duration.is_zero() {
            return;
        }
        self.frozen = Some(duration);
        out_events.push(Event::MonsterFrozen {
            monster: self.id,
            duration,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(500);

    fn corridor() -> Grid {
        Grid::from_rows(&[".....", "....."]).expect("well-formed grid")
    }

    fn ready_events(events: &[Event]) -> usize {
        events
            .iter()
            .filter(|event| matches!(event, Event::MonsterReadyToPlan { .. }))
            .count()
    }

    #[test]
    fn plans_on_first_settled_tick_then_waits_for_cooldown() {
        let mut monster = Monster::spawn(MonsterId::new(0), CellCoord::new(4, 0), 3.0);
        let goal = CellCoord::new(0, 0);
        let mut events = Vec::new();

        monster.update(Duration::from_millis(100), DELAY, goal, &mut events);
        assert_eq!(ready_events(&events), 1);

        events.clear();
        for _ in 0..4 {
            monster.update(Duration::from_millis(100), DELAY, goal, &mut events);
        }
        assert_eq!(ready_events(&events), 0);

        monster.update(Duration::from_millis(100), DELAY, goal, &mut events);
        assert_eq!(ready_events(&events), 1);
    }

    #[test]
    fn follows_second_cell_of_route() {
        let mut monster = Monster::spawn(MonsterId::new(1), CellCoord::new(4, 0), 3.0);
        let mut events = Vec::new();
        monster.follow_route(
            vec![
                CellCoord::new(4, 0),
                CellCoord::new(3, 0),
                CellCoord::new(2, 0),
            ],
            &corridor(),
            &mut events,
        );
        assert_eq!(monster.motion().target(), CellCoord::new(3, 0));
        assert_eq!(monster.route().len(), 3);
        assert_eq!(monster.state(), MonsterState::Moving);
        assert_eq!(
            events,
            vec![Event::MonsterRetargeted {
                monster: MonsterId::new(1),
                from: CellCoord::new(4, 0),
                to: CellCoord::new(3, 0),
            }]
        );
    }

    #[test]
    fn single_cell_route_stays_put() {
        let mut monster = Monster::spawn(MonsterId::new(0), CellCoord::new(2, 1), 3.0);
        let mut events = Vec::new();
        monster.follow_route(vec![CellCoord::new(2, 1)], &corridor(), &mut events);
        assert!(events.is_empty());
        assert_eq!(monster.state(), MonsterState::Settled);
    }

    #[test]
    fn frozen_monster_thaws_and_acts_in_the_same_tick() {
        let mut monster = Monster::spawn(MonsterId::new(0), CellCoord::new(2, 1), 3.0);
        let mut events = Vec::new();
        monster.freeze(Duration::from_millis(300), &mut events);
        assert_eq!(monster.state(), MonsterState::Frozen);

        events.clear();
        monster.update(Duration::from_millis(200), DELAY, CellCoord::new(0, 0), &mut events);
        assert!(events.is_empty());
        assert_eq!(monster.frozen(), Some(Duration::from_millis(100)));

        monster.update(Duration::from_millis(200), DELAY, CellCoord::new(0, 0), &mut events);
        assert_eq!(
            events.first(),
            Some(&Event::MonsterThawed {
                monster: MonsterId::new(0)
            })
        );
        assert_eq!(ready_events(&events), 1);
        assert!(!monster.is_frozen());
    }

    #[test]
    fn frozen_monster_ignores_routes() {
        let mut monster = Monster::spawn(MonsterId::new(0), CellCoord::new(2, 1), 3.0);
        let mut events = Vec::new();
        monster.freeze(Duration::from_secs(5), &mut events);
        events.clear();
        monster.follow_route(
            vec![CellCoord::new(2, 1), CellCoord::new(1, 1)],
            &corridor(),
            &mut events,
        );
        assert!(events.is_empty());
        assert_eq!(monster.motion().target(), CellCoord::new(2, 1));
    }
}
