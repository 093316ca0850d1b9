//! Random obstacle layouts.
//!
//! Provides two generators:
//! - **Clusters**: each cell has a 1-in-`ratio` chance of seeding a small
//!   rectangle of blocked cells.
//! - **Cellular automata caves**: random walls smoothed with neighbourhood
//!   counting rules.
//!
//! Both are deterministic for a given RNG state, so seeded generators
//! reproduce the same map.

use anyangle_core::{GridGraph, Point, Range};
use log::debug;
use rand::{Rng, RngExt};

/// Parameters of [`MapGen::clusters`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClusterRule {
    /// A cell seeds a cluster with probability `1 / ratio`.
    pub ratio: u32,
    /// Largest width and height of a cluster, in cells.
    pub max_extent: i32,
}

impl Default for ClusterRule {
    fn default() -> Self {
        Self {
            ratio: 7,
            max_extent: 3,
        }
    }
}

/// A rule for one iteration of cellular automata smoothing.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellularAutomataRule {
    /// A cell with at least this many blocked cells among its 8 neighbours
    /// becomes blocked.
    pub w_cutoff1: i32,
    /// A cell with at most this many blocked cells within Chebyshev
    /// distance 2 becomes blocked too, which breaks up wide open areas.
    pub w_cutoff2: i32,
    /// Whether cells outside the grid count as blocked.
    pub walls_out_of_range: bool,
    /// How many times to apply this rule.
    pub reps: usize,
}

impl Default for CellularAutomataRule {
    fn default() -> Self {
        Self {
            w_cutoff1: 5,
            w_cutoff2: 2,
            walls_out_of_range: true,
            reps: 4,
        }
    }
}

/// Map generator writing into a [`GridGraph`].
pub struct MapGen<R: Rng> {
    pub rng: R,
    pub grid: GridGraph,
}

impl<R: Rng> MapGen<R> {
    pub fn with_grid(grid: GridGraph, rng: R) -> Self {
        Self { rng, grid }
    }

    /// Scatter rectangular clusters of blocked cells.
    ///
    /// Returns the number of blocked cells afterwards.
    pub fn clusters(&mut self, rule: &ClusterRule) -> usize {
        let ratio = rule.ratio.max(1);
        let extent = rule.max_extent.max(1);
        let cells = self.grid.cells();
        let mut seeded = 0;
        for p in cells {
            if self.rng.random_range(0..ratio) != 0 {
                continue;
            }
            let w = self.rng.random_range(1..=extent);
            let h = self.rng.random_range(1..=extent);
            let r = Range::new(p.x, p.y, p.x + w, p.y + h).intersect(cells);
            self.grid.fill(r, true);
            seeded += 1;
        }
        let blocked = self.grid.blocked_count();
        debug!(
            "clusters: {seeded} seeded, {blocked}/{} cells blocked",
            cells.len()
        );
        blocked
    }

    /// Generate a cave using cellular automata.
    ///
    /// 1. Block each cell with probability `wall_init_pct`.
    /// 2. Apply each rule in `rules` for its number of repetitions.
    ///
    /// Returns the number of free cells in the final grid.
    pub fn cellular_automata_cave(
        &mut self,
        wall_init_pct: f64,
        rules: &[CellularAutomataRule],
    ) -> usize {
        let cells = self.grid.cells();
        for p in cells {
            let r: f64 = self.rng.random();
            self.grid.set_blocked(p, r < wall_init_pct);
        }

        let mut next = self.grid.clone();
        for rule in rules {
            for _ in 0..rule.reps {
                for p in cells {
                    let walls1 = self.count_walls_ring(p, 1, rule.walls_out_of_range);
                    let walls2 = self.count_walls_ring(p, 2, rule.walls_out_of_range);
                    next.set_blocked(p, walls1 >= rule.w_cutoff1 || walls2 <= rule.w_cutoff2);
                }
                std::mem::swap(&mut self.grid, &mut next);
            }
        }

        let free = cells.len() - self.grid.blocked_count();
        debug!("cave: {free}/{} cells free", cells.len());
        free
    }

    /// Free the cells around corner `p`, so that a path can leave it.
    pub fn clear_around(&mut self, p: Point) {
        self.grid
            .fill(Range::new(p.x - 1, p.y - 1, p.x + 1, p.y + 1), false);
    }

    /// Count blocked cells within Chebyshev distance `radius` of `center`,
    /// excluding the center.
    fn count_walls_ring(&self, center: Point, radius: i32, walls_out_of_range: bool) -> i32 {
        let cells = self.grid.cells();
        let mut count = 0;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let p = center.shift(dx, dy);
                let blocked = if cells.contains(p) {
                    self.grid.is_blocked(p)
                } else {
                    walls_out_of_range
                };
                if blocked {
                    count += 1;
                }
            }
        }
        count
    }
}
