use std::time::Duration;

use maze_chase_core::{CellCoord, Command, Event, GameConfig, Grid, Maze, MonsterId};
use maze_chase_system_pursuit::Pursuit;
use maze_chase_world::{self as world, query, Layout, World};

fn corridor_world(monster: CellCoord) -> World {
    let grid = Grid::from_rows(&["#########", "#.......#", "#########"]).expect("well-formed grid");
    let maze = Maze::new(grid, CellCoord::new(1, 1), CellCoord::new(7, 1), Vec::new())
        .expect("valid maze");
    World::from_layout(
        GameConfig::default(),
        Layout {
            maze,
            monsters: vec![monster],
            powerups: Vec::new(),
        },
        0,
    )
    .expect("valid layout")
}

#[test]
fn emits_route_for_each_planning_request() {
    let grid = Grid::from_rows(&["#####", "#...#", "#####"]).expect("well-formed grid");
    let events = [
        Event::TimeAdvanced {
            dt: Duration::from_millis(100),
        },
        Event::MonsterReadyToPlan {
            monster: MonsterId::new(3),
            from: CellCoord::new(3, 1),
            goal: CellCoord::new(1, 1),
        },
    ];

    let mut pursuit = Pursuit::new();
    let mut commands = Vec::new();
    pursuit.handle(&events, &grid, &mut commands);

    assert_eq!(
        commands,
        vec![Command::RouteMonster {
            monster: MonsterId::new(3),
            path: vec![
                CellCoord::new(3, 1),
                CellCoord::new(2, 1),
                CellCoord::new(1, 1)
            ],
        }]
    );
}

#[test]
fn unreachable_player_yields_a_stay_route() {
    let grid = Grid::from_rows(&["#####", "#.#.#", "#####"]).expect("well-formed grid");
    let mut commands = Vec::new();
    Pursuit::new().handle(
        &[Event::MonsterReadyToPlan {
            monster: MonsterId::new(0),
            from: CellCoord::new(3, 1),
            goal: CellCoord::new(1, 1),
        }],
        &grid,
        &mut commands,
    );
    assert_eq!(
        commands,
        vec![Command::RouteMonster {
            monster: MonsterId::new(0),
            path: vec![CellCoord::new(3, 1)],
        }]
    );
}

#[test]
fn monster_catches_a_stationary_player() {
    let mut world = corridor_world(CellCoord::new(7, 1));
    let mut pursuit = Pursuit::new();
    let mut caught = false;

    for _ in 0..200 {
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(100),
            },
            &mut events,
        );
        if events
            .iter()
            .any(|event| matches!(event, Event::PlayerHit { .. }))
        {
            caught = true;
            break;
        }

        let mut commands = Vec::new();
        pursuit.handle(&events, query::maze(&world).grid(), &mut commands);
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
    }

    assert!(caught, "monster never reached the player");
    assert_eq!(query::monsters(&world)[0].cell, CellCoord::new(1, 1));
}
