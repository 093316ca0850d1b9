//! Named test scenarios: a grid plus a start and a goal corner.

use anyangle_core::{GridGraph, Point};
use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::ascii::{MapError, parse_map};
use crate::mapgen::{CellularAutomataRule, ClusterRule, MapGen};

/// A pathfinding problem.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scenario {
    pub name: String,
    pub grid: GridGraph,
    pub start: Point,
    pub goal: Point,
}

impl Scenario {
    /// Check that both endpoints are corners of `grid`.
    pub fn new(
        name: impl Into<String>,
        grid: GridGraph,
        start: Point,
        goal: Point,
    ) -> Result<Self, MapError> {
        for pos in [start, goal] {
            if !grid.is_valid_coordinate(pos) {
                return Err(MapError::OutOfBounds {
                    pos,
                    width: grid.width(),
                    height: grid.height(),
                });
            }
        }
        Ok(Self {
            name: name.into(),
            grid,
            start,
            goal,
        })
    }

    /// Parse a text map that carries both `S` and `G` markers.
    pub fn from_ascii(name: impl Into<String>, s: &str) -> Result<Self, MapError> {
        let map = parse_map(s)?;
        let start = map.start.ok_or(MapError::MissingMarker { marker: 'S' })?;
        let goal = map.goal.ok_or(MapError::MissingMarker { marker: 'G' })?;
        Self::new(name, map.grid, start, goal)
    }

    /// A `width × height` map of random blocked clusters, where each cell
    /// seeds a cluster with probability `1 / ratio`. The cells around both
    /// endpoints are kept free.
    pub fn seeded(
        name: impl Into<String>,
        seed: u64,
        width: i32,
        height: i32,
        ratio: u32,
        start: Point,
        goal: Point,
    ) -> Result<Self, MapError> {
        let mut mg = MapGen::with_grid(GridGraph::new(width, height), StdRng::seed_from_u64(seed));
        mg.clusters(&ClusterRule {
            ratio,
            ..ClusterRule::default()
        });
        mg.clear_around(start);
        mg.clear_around(goal);
        Self::new(name, mg.grid, start, goal)
    }

    /// A `width × height` cellular automata cave.
    pub fn cave(
        name: impl Into<String>,
        seed: u64,
        width: i32,
        height: i32,
        start: Point,
        goal: Point,
    ) -> Result<Self, MapError> {
        let mut mg = MapGen::with_grid(GridGraph::new(width, height), StdRng::seed_from_u64(seed));
        mg.cellular_automata_cave(0.45, &[CellularAutomataRule::default()]);
        mg.clear_around(start);
        mg.clear_around(goal);
        Self::new(name, mg.grid, start, goal)
    }
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

/// A wall hanging from the top border; the way round is under it.
const WALL: &str = "
..#..
..#..
S.#.G
..#..
..#..
.....
.....
";

/// Pockets that trap a search that bends in open space.
const POCKETS: &str = "
..........
.####.###.
.#......#.
.#.####.#.
S#.#..#.#.
.#.#G.#...
.#.##.###.
.#........
.########.
..........
";

/// A corridor maze with long sight lines.
const CORRIDORS: &str = "
S.......#.....
.######.#.###.
.#......#...#.
.#.########.#.
.#.#......#.#.
...#.####.#...
####.#..#.####
.....#G.#.....
.#####..#####.
..............
.#.#.#..#.#.#.
..............
";

/// Names accepted by [`by_name`], in catalogue order.
pub const NAMES: &[&str] = &[
    "wall",
    "pockets",
    "corridors",
    "seeded",
    "maze1",
    "maze2",
    "maze3",
    "maze4",
    "strict-detour",
    "strict-short",
    "cave",
];

/// Build a scenario from the catalogue.
pub fn by_name(name: &str) -> Option<Result<Scenario, MapError>> {
    let p = Point::new;
    let scenario = match name {
        "wall" => Scenario::from_ascii(name, WALL),
        "pockets" => Scenario::from_ascii(name, POCKETS),
        "corridors" => Scenario::from_ascii(name, CORRIDORS),
        "seeded" => Scenario::seeded(name, 12311, 60, 60, 7, p(12, 40), p(52, 34)),
        "maze1" => Scenario::seeded(name, 53, 15, 15, 9, p(0, 0), p(10, 14)),
        "maze2" => Scenario::seeded(name, 565_315_494, 15, 15, 9, p(1, 2), p(1, 13)),
        "maze3" => Scenario::seeded(name, 98_783_479, 40, 40, 7, p(1, 4), p(18, 18)),
        "maze4" => Scenario::seeded(name, 410_889_275, 15, 15, 7, p(0, 1), p(10, 12)),
        "strict-detour" => {
            Scenario::seeded(name, 1_155_797_147, 47, 32, 38, p(46, 30), p(20, 1))
        }
        "strict-short" => Scenario::seeded(name, 1_155_849_806, 11, 13, 40, p(7, 12), p(9, 0)),
        "cave" => Scenario::cave(name, 7, 40, 30, p(2, 2), p(37, 27)),
        _ => return None,
    };
    if let Ok(s) = &scenario {
        debug!(
            "scenario {}: {}x{}, {} -> {}",
            s.name,
            s.grid.width(),
            s.grid.height(),
            s.start,
            s.goal
        );
    }
    Some(scenario)
}

/// Every scenario of the catalogue.
pub fn all() -> Result<Vec<Scenario>, MapError> {
    NAMES
        .iter()
        .filter_map(|name| by_name(name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_builds() {
        let all = all().unwrap();
        assert_eq!(all.len(), NAMES.len());
        for s in &all {
            assert!(s.grid.is_valid_coordinate(s.start), "{}", s.name);
            assert!(s.grid.is_valid_coordinate(s.goal), "{}", s.name);
        }
    }

    #[test]
    fn unknown_name() {
        assert!(by_name("nope").is_none());
    }

    #[test]
    fn wall_scenario_layout() {
        let s = by_name("wall").unwrap().unwrap();
        assert_eq!(s.grid.size(), Point::new(5, 7));
        assert_eq!(s.grid.blocked_count(), 5);
        assert_eq!(s.start, Point::new(0, 2));
        assert_eq!(s.goal, Point::new(4, 2));
    }

    #[test]
    fn seeded_scenarios_are_reproducible() {
        let a = by_name("maze1").unwrap().unwrap();
        let b = by_name("maze1").unwrap().unwrap();
        assert_eq!(a, b);
        assert!(a.grid.blocked_count() > 0);
    }

    #[test]
    fn missing_marker() {
        assert_eq!(
            Scenario::from_ascii("x", "S..\n..."),
            Err(MapError::MissingMarker { marker: 'G' })
        );
    }

    #[test]
    fn endpoint_out_of_bounds() {
        let err = Scenario::new("x", GridGraph::new(3, 3), Point::new(0, 0), Point::new(4, 0));
        assert_eq!(
            err,
            Err(MapError::OutOfBounds {
                pos: Point::new(4, 0),
                width: 3,
                height: 3
            })
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let s = by_name("wall").unwrap().unwrap();
        let json = serde_json::to_string(&s).unwrap();
        let back: Scenario = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }
}
