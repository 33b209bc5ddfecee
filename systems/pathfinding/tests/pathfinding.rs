use maze_chase_core::{CellCoord, Direction, Grid};
use maze_chase_system_pathfinding::{shortest_path, DistanceField, PathFinder};

fn grid(rows: &[&str]) -> Grid {
    Grid::from_rows(rows).expect("well-formed grid")
}

fn assert_contiguous(grid: &Grid, route: &[CellCoord]) {
    for cell in route {
        assert!(grid.is_path(*cell), "route crosses wall at {cell:?}");
    }
    for pair in route.windows(2) {
        assert!(
            Direction::between(pair[0], pair[1]).is_some(),
            "route jumps from {:?} to {:?}",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn straight_corridor_spans_manhattan_distance() {
    let grid = grid(&["#########", "#.......#", "#########"]);
    let start = CellCoord::new(1, 1);
    let goal = CellCoord::new(7, 1);
    let route = shortest_path(&grid, start, goal);
    assert_eq!(route.len(), start.manhattan_distance(goal) as usize + 1);
    assert_eq!(route.first(), Some(&start));
    assert_eq!(route.last(), Some(&goal));
    assert_contiguous(&grid, &route);
}

#[test]
fn route_length_matches_breadth_first_distance() {
    let layouts: [&[&str]; 3] = [
        &[
            "#########",
            "#...#...#",
            "#.#.#.#.#",
            "#.#...#.#",
            "#.#####.#",
            "#.......#",
            "#########",
        ],
        &[
            "###########",
            "#.........#",
            "#.###.###.#",
            "#.#.....#.#",
            "#.#.###.#.#",
            "#...#.....#",
            "###########",
        ],
        &["#######", "#.....#", "#.###.#", "#.....#", "#######"],
    ];

    let mut finder = PathFinder::new();
    for rows in layouts {
        let grid = grid(rows);
        let cells: Vec<CellCoord> = grid.path_cells().collect();
        for &start in &cells {
            let field = DistanceField::from_origin(&grid, start);
            for &goal in &cells {
                let route = finder.find(&grid, start, goal);
                let expected = field.distance(goal).expect("connected layout");
                assert_eq!(
                    route.len(),
                    expected as usize + 1,
                    "{start:?} -> {goal:?} is not shortest"
                );
                assert_eq!(route.first(), Some(&start));
                assert_eq!(route.last(), Some(&goal));
                assert_contiguous(&grid, &route);
            }
        }
    }
}

#[test]
fn unreachable_goal_stays_put() {
    let grid = grid(&["#######", "#..#..#", "#######"]);
    let start = CellCoord::new(1, 1);
    assert_eq!(shortest_path(&grid, start, CellCoord::new(5, 1)), vec![start]);
}

#[test]
fn start_equal_to_goal_is_a_single_cell() {
    let grid = grid(&["...", "..."]);
    let cell = CellCoord::new(1, 1);
    assert_eq!(shortest_path(&grid, cell, cell), vec![cell]);
}

#[test]
fn wall_or_out_of_bounds_endpoints_stay_put() {
    let grid = grid(&["#####", "#...#", "#####"]);
    let start = CellCoord::new(1, 1);
    assert_eq!(shortest_path(&grid, start, CellCoord::new(0, 0)), vec![start]);
    assert_eq!(shortest_path(&grid, start, CellCoord::new(40, 1)), vec![start]);

    let wall = CellCoord::new(2, 0);
    assert_eq!(shortest_path(&grid, wall, CellCoord::new(3, 1)), vec![wall]);
}

#[test]
fn braided_loop_picks_the_shorter_side() {
    let grid = grid(&[
        "#######",
        "#.....#",
        "#.###.#",
        "#.###.#",
        "#.....#",
        "#######",
    ]);
    let route = shortest_path(&grid, CellCoord::new(1, 1), CellCoord::new(5, 2));
    assert_eq!(route.len(), 6);
    assert_eq!(route[1], CellCoord::new(2, 1));
}
