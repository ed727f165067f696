use std::collections::{HashSet, LinkedList};

use day12::{Direction, Heuristic, Map, PathFinder, Position, SearchError, Strategy};

const EXAMPLE: &str = include_str!("../inputs.txt");
const WALLED: &str = include_str!("data/walled.txt");
const MAZE: &str = include_str!("data/maze.txt");

fn example_map() -> Map {
    EXAMPLE.parse().unwrap()
}

fn all_positions(map: &Map) -> Vec<Position> {
    (0..map.height())
        .flat_map(|y| (0..map.width()).map(move |x| Position::new(x, y)))
        .collect()
}

// Plain breadth-first search to check the A* answers against.
fn bfs_steps_n(map: &Map, from: &Position, to: &Position) -> Option<usize> {
    if !map.elevation(from).is_some_and(|elev| elev.is_passable()) {
        return None;
    }

    let mut search_positions = LinkedList::from([(0, *from)]);
    let mut searched_positions = HashSet::from([*from]);
    while let Some((cur_steps_n, cur_pos)) = search_positions.pop_front() {
        if cur_pos == *to {
            return Some(cur_steps_n);
        }

        for next_pos in map.next_positions(&cur_pos) {
            if searched_positions.insert(next_pos) {
                search_positions.push_back((cur_steps_n + 1, next_pos));
            }
        }
    }

    None
}

#[test]
fn fewest_steps_from_start_on_example() {
    let map = example_map();

    assert_eq!(
        map.fewest_steps_from_start(Heuristic::default()).unwrap(),
        Some(31)
    );
}

#[test]
fn fewest_steps_from_lowest_on_example() {
    let map = example_map();

    for strategy in [Strategy::Independent, Strategy::Reverse] {
        assert_eq!(
            map.fewest_steps_from_lowest(Heuristic::default(), strategy)
                .unwrap(),
            Some(29)
        );
    }
}

#[test]
fn every_heuristic_finds_same_answers() {
    let map = example_map();

    for heuristic in Heuristic::all() {
        assert_eq!(map.fewest_steps_from_start(*heuristic).unwrap(), Some(31));
        assert_eq!(
            map.fewest_steps_from_lowest(*heuristic, Strategy::Independent)
                .unwrap(),
            Some(29)
        );
    }
}

#[test]
fn found_path_is_walkable() {
    let map = example_map();
    let report = PathFinder::new(&map, Heuristic::default())
        .search(map.start_pos(), map.end_pos())
        .unwrap();
    let path = report.path().unwrap();

    assert_eq!(report.steps_n(), Some(path.len() - 1));
    assert_eq!(path.first(), Some(map.start_pos()));
    assert_eq!(path.last(), Some(map.end_pos()));
    for step in path.windows(2) {
        assert!(Direction::between(&step[0], &step[1]).is_some());
        assert!(map.can_step(&step[0], &step[1]));
    }
}

#[test]
fn search_is_deterministic() {
    let map = example_map();
    let finder = PathFinder::new(&map, Heuristic::default());
    let first = finder.search(map.start_pos(), map.end_pos()).unwrap();
    let second = finder.search(map.start_pos(), map.end_pos()).unwrap();

    assert_eq!(first.path(), second.path());
    assert_eq!(first.expanded_n(), second.expanded_n());
}

#[test]
fn start_at_goal_takes_no_steps() {
    let map = example_map();
    let report = PathFinder::new(&map, Heuristic::default())
        .search(map.end_pos(), map.end_pos())
        .unwrap();

    assert_eq!(report.steps_n(), Some(0));
    assert_eq!(report.path(), Some(&[*map.end_pos()][..]));
    assert_eq!(report.expanded_n(), 1);
}

#[test]
fn goal_out_of_climbing_reach_has_no_path() {
    let map = WALLED.parse::<Map>().unwrap();

    assert_eq!(
        map.fewest_steps_from_start(Heuristic::default()).unwrap(),
        None
    );
    for strategy in [Strategy::Independent, Strategy::Reverse] {
        assert_eq!(
            map.fewest_steps_from_lowest(Heuristic::default(), strategy)
                .unwrap(),
            None
        );
    }
}

#[test]
fn start_on_impassable_square_has_no_path() {
    let map = day12::map::parse_map("S#\n#E", true).unwrap();
    let finder = PathFinder::new(&map, Heuristic::default());

    let report = finder.search(&Position::new(1, 0), map.end_pos()).unwrap();
    assert_eq!(report.path(), None);
    assert_eq!(report.expanded_n(), 0);

    let report = finder.search(map.start_pos(), map.end_pos()).unwrap();
    assert_eq!(report.path(), None);
    assert_eq!(report.expanded_n(), 1);
}

#[test]
fn search_rejects_positions_outside_map() {
    let map = example_map();
    let finder = PathFinder::new(&map, Heuristic::default());
    let outside = Position::new(8, 0);

    assert_eq!(
        finder.search(&outside, map.end_pos()).unwrap_err(),
        SearchError::PositionOutsideMap(outside)
    );
    assert_eq!(
        finder.search(map.start_pos(), &outside).unwrap_err(),
        SearchError::PositionOutsideMap(outside)
    );
}

#[test]
fn search_never_expands_more_nodes_than_map_has() {
    for map in [example_map(), WALLED.parse::<Map>().unwrap()] {
        let finder = PathFinder::new(&map, Heuristic::default());
        for from in all_positions(&map) {
            let report = finder.search(&from, map.end_pos()).unwrap();
            assert!(report.expanded_n() <= map.cell_n());
        }
    }
}

#[test]
fn closed_squares_are_not_reopened_without_losing_shortest_paths() {
    let maps = [
        example_map(),
        WALLED.parse::<Map>().unwrap(),
        "SbcdefghijklmnopqrstuvwxyE".parse::<Map>().unwrap(),
        day12::map::parse_map(MAZE, true).unwrap(),
    ];

    for map in maps {
        for heuristic in Heuristic::all() {
            let finder = PathFinder::new(&map, *heuristic);
            for from in all_positions(&map) {
                let steps_n = finder.search(&from, map.end_pos()).unwrap().steps_n();
                assert_eq!(
                    steps_n,
                    bfs_steps_n(&map, &from, map.end_pos()),
                    "{:?} from {}",
                    heuristic,
                    from
                );
            }
        }
    }
}

#[test]
fn heuristics_never_exceed_manhattan_distance() {
    let from = Position::new(0, 0);
    let to = Position::new(3, 4);

    assert_eq!(Heuristic::Euclidean.estimate(&from, &to), 5.0);
    assert_eq!(Heuristic::Manhattan.estimate(&from, &to), 7.0);
    assert_eq!(Heuristic::Chebyshev.estimate(&from, &to), 4.0);
    let octile = 4.0 + 3.0 * (2f64.sqrt() - 1.0);
    assert!((Heuristic::Octile.estimate(&from, &to) - octile).abs() < 1e-9);
    for heuristic in Heuristic::all() {
        assert!(heuristic.estimate(&from, &to) <= 7.0);
        assert_eq!(heuristic.estimate(&to, &to), 0.0);
    }
}

#[test]
fn iteration_cap_error_is_distinct_from_no_path() {
    let err = SearchError::IterationCapExceeded(40);

    assert_ne!(err, SearchError::PositionOutsideMap(Position::new(0, 0)));
    assert!(err.to_string().contains("more than 40 node(s)"));
}
