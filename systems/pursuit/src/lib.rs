#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that answers monster re-planning requests with routes.

use maze_chase_core::{Command, Event, Grid};
use maze_chase_system_pathfinding::PathFinder;

/// Turns [`Event::MonsterReadyToPlan`] notifications into
/// [`Command::RouteMonster`] commands.
#[derive(Debug, Default)]
pub struct Pursuit {
    finder: PathFinder,
}

impl Pursuit {
    /// Creates a pursuit system with a fresh path finder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes world events and emits one route command per planning request.
    pub fn handle(&mut self, events: &[Event], grid: &Grid, out: &mut Vec<Command>) {
        for event in events {
            let Event::MonsterReadyToPlan {
                monster,
                from,
                goal,
            } = event
            else {
                continue;
            };

            let path = self.finder.find(grid, *from, *goal);
            tracing::trace!(
                monster = monster.get(),
                ?from,
                ?goal,
                steps = path.len().saturating_sub(1),
                "planned monster route"
            );
            out.push(Command::RouteMonster {
                monster: *monster,
                path,
            });
        }
    }
}
