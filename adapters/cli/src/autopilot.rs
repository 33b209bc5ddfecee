use maze_chase_core::{CellCoord, Direction, Grid};
use maze_chase_session::GameSession;
use maze_chase_system_pathfinding::PathFinder;

/// Steers the player along the shortest route to the exit.
///
/// The route is re-planned from scratch every time the player settles, so
/// the autopilot never commits to more than one cell at a time.
#[derive(Debug, Default)]
pub(crate) struct Autopilot {
    finder: PathFinder,
}

impl Autopilot {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queues the next step for a settled player.
    pub(crate) fn steer(&mut self, session: &mut GameSession) {
        let direction = {
            let snapshot = session.snapshot();
            if !snapshot.player.settled || snapshot.outcome.is_terminal() {
                return;
            }
            self.next_step(
                snapshot.maze.grid(),
                snapshot.player.cell,
                snapshot.maze.exit(),
            )
        };
        if let Some(direction) = direction {
            session.submit_move_intent(direction);
        }
    }

    fn next_step(&mut self, grid: &Grid, from: CellCoord, exit: CellCoord) -> Option<Direction> {
        let route = self.finder.find(grid, from, exit);
        let next = *route.get(1)?;
        Direction::between(from, next)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use maze_chase_core::{GameConfig, Outcome};
    use maze_chase_system_pathfinding::shortest_path;

    use super::*;

    #[test]
    fn first_step_heads_towards_the_exit() {
        let grid = Grid::from_rows(&["#######", "#.#...#", "#...#.#", "#######"])
            .expect("well-formed grid");
        let mut autopilot = Autopilot::new();
        assert_eq!(
            autopilot.next_step(&grid, CellCoord::new(1, 1), CellCoord::new(5, 2)),
            Some(Direction::South)
        );
        assert_eq!(
            autopilot.next_step(&grid, CellCoord::new(5, 2), CellCoord::new(5, 2)),
            None
        );
    }

    #[test]
    fn walks_a_monster_free_maze_to_victory() {
        let mut config = GameConfig::default();
        config.monsters.count = 0;
        let mut session = GameSession::new(config, 21).expect("valid config");
        let mut autopilot = Autopilot::new();

        for _ in 0..5_000 {
            autopilot.steer(&mut session);
            session.update(Duration::from_millis(100));
            if session.outcome().is_terminal() {
                break;
            }
        }
        assert_eq!(session.outcome(), Outcome::Won);
    }

    #[test]
    fn queues_a_step_only_while_settled() {
        let mut config = GameConfig::default();
        config.monsters.count = 0;
        let mut session = GameSession::new(config, 4).expect("valid config");
        let mut autopilot = Autopilot::new();

        autopilot.steer(&mut session);
        let snapshot = session.snapshot();
        let queued = snapshot.player.pending_intent.expect("step queued at start");
        let route = shortest_path(
            snapshot.maze.grid(),
            snapshot.maze.start(),
            snapshot.maze.exit(),
        );
        assert_eq!(Direction::between(route[0], route[1]), Some(queued));

        session.update(Duration::from_millis(20));
        assert!(!session.snapshot().player.settled);
        assert_eq!(session.snapshot().player.pending_intent, None);

        autopilot.steer(&mut session);
        assert_eq!(session.snapshot().player.pending_intent, None);
    }
}
