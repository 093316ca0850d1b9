use anyangle_core::{GridGraph, Point};
use anyangle_maps::{ClusterRule, MapGen, Scenario, scenarios};
use anyangle_paths::{
    EdgeKind, GridOracle, RelaxationStrategy, SearchEngine, SearchOutcome, SnapshotItem,
    SubgoalGraph, is_collinear, path_length,
};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

const EPS: f32 = 1e-3;

fn random_map(seed: u64, w: i32, h: i32) -> GridGraph {
    let mut mg = MapGen::with_grid(GridGraph::new(w, h), StdRng::seed_from_u64(seed));
    mg.clusters(&ClusterRule {
        ratio: 6,
        max_extent: 3,
    });
    mg.grid
}

fn random_corner(rng: &mut StdRng, grid: &GridGraph) -> Point {
    Point::new(
        rng.random_range(0..=grid.width()),
        rng.random_range(0..=grid.height()),
    )
}

/// Endpoints, visibility between waypoints, reported cost, lower bound.
fn check_path<S: RelaxationStrategy>(
    engine: &SearchEngine<S>,
    grid: &GridGraph,
    start: Point,
    goal: Point,
    outcome: SearchOutcome,
) {
    let Some(cost) = outcome.cost() else {
        assert_eq!(engine.path(), None);
        return;
    };
    let path = engine.path().expect("found search has a path");
    assert_eq!(path.first(), Some(&start));
    assert_eq!(path.last(), Some(&goal));
    for w in path.windows(2) {
        assert!(
            grid.line_of_sight(w[0], w[1]),
            "{} -> {}: segment {} -> {} is blocked",
            start,
            goal,
            w[0],
            w[1]
        );
    }
    assert!((path_length(path) - cost).abs() < EPS);
    assert_eq!(engine.path_length(), Some(path_length(path)));
    assert_eq!(engine.hop_count(), path.len());
    assert!(cost + EPS >= start.euclidean(goal));
    assert!(cost <= engine.target_distance() + EPS);
}

/// No interior waypoint can be dropped for a visible shortcut. The one
/// exception is a collinear waypoint at an outer corner: dropping it keeps
/// the length, and subgoal search never merges such a corner away.
fn check_no_removable_waypoint(grid: &GridGraph, path: &[Point]) {
    for w in path.windows(3) {
        let (a, b, c) = (w[0], w[1], w[2]);
        if grid.line_of_sight(a, c) {
            assert!(
                is_collinear(a, b, c) && grid.is_outer_corner(b),
                "{b} can be dropped from {path:?}"
            );
        }
    }
}

#[test]
fn catalogue_paths_are_valid() {
    for s in scenarios::all().unwrap() {
        let Scenario {
            grid, start, goal, ..
        } = &s;
        let mut theta = SearchEngine::theta_star(grid);
        let mut strict = SearchEngine::strict_theta_star(grid);
        let mut subgoal = SearchEngine::subgoal(grid);

        let a = theta.compute_path(*start, *goal);
        let b = strict.compute_path(*start, *goal);
        let c = subgoal.compute_path(*start, *goal);
        check_path(&theta, grid, *start, *goal, a);
        check_path(&strict, grid, *start, *goal, b);
        check_path(&subgoal, grid, *start, *goal, c);

        assert_eq!(a.is_found(), b.is_found(), "{}", s.name);
        assert_eq!(a.is_found(), c.is_found(), "{}", s.name);
    }
}

#[test]
fn hand_drawn_scenarios_are_reachable() {
    for name in ["wall", "pockets", "corridors"] {
        let s = scenarios::by_name(name).unwrap().unwrap();
        let mut e = SearchEngine::strict_theta_star(&s.grid);
        assert!(e.compute_path(s.start, s.goal).is_found(), "{name}");
    }
}

#[test]
fn random_maps_agree_on_reachability() {
    let mut rng = StdRng::seed_from_u64(2024);
    for seed in 0..12 {
        let grid = random_map(seed, 24, 18);
        let mut strict = SearchEngine::strict_theta_star(&grid);
        let mut theta = SearchEngine::theta_star(&grid);
        let mut subgoal = SearchEngine::subgoal(&grid);
        for _ in 0..10 {
            let (s, g) = (random_corner(&mut rng, &grid), random_corner(&mut rng, &grid));
            let a = strict.compute_path(s, g);
            let b = theta.compute_path(s, g);
            let c = subgoal.compute_path(s, g);
            check_path(&strict, &grid, s, g, a);
            check_path(&theta, &grid, s, g, b);
            check_path(&subgoal, &grid, s, g, c);
            assert_eq!(a.is_found(), b.is_found(), "seed {seed}: {s} -> {g}");
            assert_eq!(a.is_found(), c.is_found(), "seed {seed}: {s} -> {g}");
        }
    }
}

// Plain Theta* keeps whatever bends its parent chain produced, so it is not
// held to the waypoint rule.
#[test]
fn strict_and_subgoal_paths_have_no_removable_waypoint() {
    let mut rng = StdRng::seed_from_u64(11);
    for seed in 100..140 {
        let grid = random_map(seed, 24, 18);
        let mut strict = SearchEngine::strict_theta_star(&grid);
        let mut subgoal = SearchEngine::subgoal(&grid);
        for _ in 0..10 {
            let (s, g) = (random_corner(&mut rng, &grid), random_corner(&mut rng, &grid));
            if strict.compute_path(s, g).is_found() {
                check_no_removable_waypoint(&grid, strict.path().unwrap());
            }
            if subgoal.compute_path(s, g).is_found() {
                check_no_removable_waypoint(&grid, subgoal.path().unwrap());
            }
        }
    }
}

#[test]
fn enclosed_target_is_unreachable() {
    let mut grid = GridGraph::new(7, 7);
    grid.fill(anyangle_core::Range::new(2, 2, 5, 5), true);
    let (start, goal) = (Point::new(0, 0), Point::new(3, 3));

    let mut strict = SearchEngine::strict_theta_star(&grid);
    assert_eq!(strict.compute_path(start, goal), SearchOutcome::Unreachable);
    assert!(strict.target_distance().is_infinite());
    assert_eq!(strict.path(), None);

    let mut subgoal = SearchEngine::subgoal(&grid);
    assert_eq!(subgoal.compute_path(start, goal), SearchOutcome::Unreachable);
    assert!(subgoal.target_distance().is_infinite());
    assert_eq!(subgoal.path(), None);
    assert!(!subgoal.strategy().graph().is_augmented());
}

#[test]
fn repeated_queries_are_identical() {
    let s = scenarios::by_name("maze3").unwrap().unwrap();
    let mut e = SearchEngine::strict_theta_star(&s.grid);
    let first = e.compute_path(s.start, s.goal);
    let path = e.path().map(<[Point]>::to_vec);
    assert_eq!(e.path().map(<[Point]>::to_vec), path);
    let second = e.compute_path(s.start, s.goal);
    assert_eq!(first, second);
    assert_eq!(e.path().map(<[Point]>::to_vec), path);
}

#[test]
fn reused_subgoal_engine_matches_fresh_engines() {
    let grid = random_map(77, 30, 30);
    let mut rng = StdRng::seed_from_u64(5);
    let queries: Vec<_> = (0..15)
        .map(|_| (random_corner(&mut rng, &grid), random_corner(&mut rng, &grid)))
        .collect();

    let pristine = SubgoalGraph::build(&grid);
    let mut reused = SearchEngine::subgoal(&grid);
    for &(s, g) in &queries {
        let out = reused.compute_path(s, g);
        let mut fresh = SearchEngine::subgoal(&grid);
        assert_eq!(out, fresh.compute_path(s, g), "{s} -> {g}");
        assert_eq!(reused.path(), fresh.path());
        assert_eq!(reused.strategy().graph(), &pristine);
    }
}

#[test]
fn search_memory_invariants_hold() {
    let s = scenarios::by_name("seeded").unwrap().unwrap();
    let mut e = SearchEngine::strict_theta_star(&s.grid);
    e.compute_path(s.start, s.goal);
    let m = e.memory();
    assert!(e.stats().repairs <= e.stats().expansions);
    for v in 0..m.len() {
        if m.distance(v).is_infinite() {
            assert!(!m.parent(v).is_some());
            assert!(!m.is_visited(v));
        }
        if m.is_visited(v) {
            assert!(!m.parent(v).is_provisional());
        }
    }
}

#[test]
fn snapshot_count_follows_interval() {
    let s = scenarios::by_name("corridors").unwrap().unwrap();
    let mut e = SearchEngine::strict_theta_star(&s.grid);
    e.start_recording();
    let out = e.compute_path(s.start, s.goal);
    assert!(out.is_found());
    let settles = e.stats().expansions - 1;
    let expected = settles.div_ceil(e.config().record_interval + 1) + 1;
    assert_eq!(e.snapshots().len(), expected);

    let last = e.take_snapshots().pop().unwrap();
    let best: Vec<_> = last
        .iter()
        .filter_map(|item| match item {
            SnapshotItem::Edge {
                to,
                kind: EdgeKind::BestPath,
                ..
            } => Some(*to),
            _ => None,
        })
        .collect();
    assert!(best.contains(&s.goal));
    assert!(e.snapshots().is_empty());

    e.stop_recording();
    e.compute_path(s.start, s.goal);
    assert!(e.snapshots().is_empty());
}

#[test]
fn theta_star_cost_matches_search_distance() {
    let s = scenarios::by_name("maze1").unwrap().unwrap();
    let mut e = SearchEngine::theta_star(&s.grid);
    if let SearchOutcome::Found { cost } = e.compute_path(s.start, s.goal) {
        assert!((cost - e.target_distance()).abs() < EPS);
    }
}

#[test]
fn oracle_trait_matches_grid() {
    let grid = random_map(3, 10, 8);
    let oracle: &dyn GridOracle = &grid;
    for p in grid.corners() {
        let i = oracle.to_index(p).unwrap();
        assert_eq!(oracle.from_index(i), p);
        assert_eq!(oracle.is_outer_corner(p), grid.is_outer_corner(p));
    }
    assert_eq!(oracle.vertex_count(), 11 * 9);
    assert_eq!(oracle.to_index(Point::new(11, 0)), None);
}
