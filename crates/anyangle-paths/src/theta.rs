//! Theta* and Strict Theta* on the full corner grid.

use anyangle_core::Point;

use crate::engine::{SearchConfig, SearchEngine};
use crate::memory::{Parent, SearchMemory, VertexId};
use crate::traits::{GridOracle, RelaxationStrategy};

/// Every corner of the grid as a vertex, expanded through its eight
/// neighbours.
struct Corners<'g, G: ?Sized> {
    grid: &'g G,
    target: Point,
}

impl<'g, G: GridOracle + ?Sized> Corners<'g, G> {
    fn new(grid: &'g G) -> Self {
        Self {
            grid,
            target: Point::ZERO,
        }
    }

    fn begin(&mut self, from: Point, to: Point) -> Option<(VertexId, VertexId)> {
        let source = self.grid.to_index(from)?;
        let target = self.grid.to_index(to)?;
        self.target = to;
        Some((source, target))
    }

    #[inline]
    fn point(&self, v: VertexId) -> Point {
        self.grid.from_index(v)
    }

    #[inline]
    fn cost(&self, a: VertexId, b: VertexId) -> f32 {
        self.grid.distance(self.point(a), self.point(b))
    }

    #[inline]
    fn sees(&self, a: VertexId, b: VertexId) -> bool {
        self.grid.line_of_sight(self.point(a), self.point(b))
    }

    fn neighbors(
        &self,
        u: VertexId,
        mut keep: impl FnMut(VertexId) -> bool,
        buf: &mut Vec<VertexId>,
    ) {
        let p = self.point(u);
        for n in p.neighbors_8() {
            let Some(v) = self.grid.to_index(n) else {
                continue;
            };
            if keep(v) && self.grid.neighbour_line_of_sight(p, n) {
                buf.push(v);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Theta*
// ---------------------------------------------------------------------------

/// Plain Theta*: take the grandparent whenever it sees the new vertex.
pub struct ThetaStar<'g, G: ?Sized> {
    corners: Corners<'g, G>,
}

impl<'g, G: GridOracle + ?Sized> ThetaStar<'g, G> {
    pub fn new(grid: &'g G) -> Self {
        Self {
            corners: Corners::new(grid),
        }
    }
}

impl<G: GridOracle + ?Sized> RelaxationStrategy for ThetaStar<'_, G> {
    fn name(&self) -> &'static str {
        "theta*"
    }

    fn begin(&mut self, from: Point, to: Point) -> Option<(VertexId, VertexId)> {
        self.corners.begin(from, to)
    }

    fn vertex_count(&self) -> usize {
        self.corners.grid.vertex_count()
    }

    fn point(&self, v: VertexId) -> Point {
        self.corners.point(v)
    }

    fn heuristic(&self, v: VertexId, weight: f32) -> f32 {
        weight * self.corners.grid.distance(self.point(v), self.corners.target)
    }

    fn distance(&self, a: Point, b: Point) -> f32 {
        self.corners.grid.distance(a, b)
    }

    fn line_of_sight(&self, from: Point, to: Point) -> bool {
        self.corners.grid.line_of_sight(from, to)
    }

    fn neighbors(&self, _memory: &SearchMemory, u: VertexId, buf: &mut Vec<VertexId>) {
        self.corners.neighbors(u, |_| true, buf);
    }

    fn relax(&self, memory: &mut SearchMemory, u: VertexId, v: VertexId) -> bool {
        let from = match memory.parent(u).vertex() {
            Some(p) if self.corners.sees(p, v) => p,
            _ => u,
        };
        let cost = memory.distance(from) + self.corners.cost(from, v);
        if cost < memory.distance(v) {
            memory.update(v, cost, Parent::Confirmed(from));
            true
        } else {
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Strict Theta*
// ---------------------------------------------------------------------------

/// Tuning of [`StrictThetaStar`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrictThetaConfig {
    /// Added to the distance of a vertex reached through a non-taut edge.
    pub buffer_penalty: f32,
    /// Heuristic of the target vertex itself, regardless of the weight.
    pub goal_heuristic: f32,
}

impl Default for StrictThetaConfig {
    fn default() -> Self {
        Self {
            buffer_penalty: 1.0,
            goal_heuristic: 1.1,
        }
    }
}

/// Theta* that only commits taut edges.
///
/// A relaxation that would create a bend around nothing is recorded as a
/// provisional parent with [`StrictThetaConfig::buffer_penalty`] added, so
/// taut alternatives found later win. Expansion skips a neighbour that
/// already shares the current vertex's parent: the parent reaches it at
/// least as cheaply.
pub struct StrictThetaStar<'g, G: ?Sized> {
    corners: Corners<'g, G>,
    config: StrictThetaConfig,
    target: VertexId,
}

impl<'g, G: GridOracle + ?Sized> StrictThetaStar<'g, G> {
    pub fn new(grid: &'g G) -> Self {
        Self::with_config(grid, StrictThetaConfig::default())
    }

    pub fn with_config(grid: &'g G, config: StrictThetaConfig) -> Self {
        Self {
            corners: Corners::new(grid),
            config,
            target: VertexId::MAX,
        }
    }

    pub fn config(&self) -> &StrictThetaConfig {
        &self.config
    }

    /// Whether `parent(u) → u → v` is taut. A vertex without a parent
    /// cannot bend.
    fn is_taut(&self, memory: &SearchMemory, v: VertexId, u: VertexId) -> bool {
        match memory.parent(u).vertex() {
            None => true,
            Some(p) => self.corners.grid.is_taut(
                self.corners.point(v),
                self.corners.point(u),
                self.corners.point(p),
            ),
        }
    }

    /// Try the parent of `u` as a taut, visible parent of `v`.
    fn try_locate_taut_parent(
        &self,
        memory: &mut SearchMemory,
        v: VertexId,
        u: VertexId,
    ) -> bool {
        let Some(p) = memory.parent(u).vertex() else {
            return false;
        };
        if !self.is_taut(memory, v, p) || !self.corners.sees(v, p) {
            return false;
        }
        let cost = memory.distance(p) + self.corners.cost(p, v);
        memory.update(v, cost, Parent::Confirmed(p));
        true
    }

    /// Commit `from` as the parent of `v` if the edge is taut, or find a taut
    /// ancestor. Otherwise return the buffered cost for a provisional parent.
    fn try_parent(
        &self,
        memory: &mut SearchMemory,
        from: VertexId,
        v: VertexId,
        cost: f32,
    ) -> Result<(), f32> {
        if self.is_taut(memory, v, from) {
            memory.update(v, cost, Parent::Confirmed(from));
            return Ok(());
        }
        if self.try_locate_taut_parent(memory, v, from) {
            return Ok(());
        }
        Err(cost + self.config.buffer_penalty)
    }
}

impl<G: GridOracle + ?Sized> RelaxationStrategy for StrictThetaStar<'_, G> {
    fn name(&self) -> &'static str {
        "strict theta*"
    }

    fn begin(&mut self, from: Point, to: Point) -> Option<(VertexId, VertexId)> {
        let (source, target) = self.corners.begin(from, to)?;
        self.target = target;
        Some((source, target))
    }

    fn vertex_count(&self) -> usize {
        self.corners.grid.vertex_count()
    }

    fn point(&self, v: VertexId) -> Point {
        self.corners.point(v)
    }

    fn heuristic(&self, v: VertexId, weight: f32) -> f32 {
        if v == self.target {
            return self.config.goal_heuristic;
        }
        weight * self.corners.grid.distance(self.point(v), self.corners.target)
    }

    fn distance(&self, a: Point, b: Point) -> f32 {
        self.corners.grid.distance(a, b)
    }

    fn line_of_sight(&self, from: Point, to: Point) -> bool {
        self.corners.grid.line_of_sight(from, to)
    }

    fn neighbors(&self, memory: &SearchMemory, u: VertexId, buf: &mut Vec<VertexId>) {
        let parent = memory.parent(u);
        self.corners.neighbors(
            u,
            |v| !(parent.is_some() && memory.parent(v) == parent),
            buf,
        );
    }

    fn relax(&self, memory: &mut SearchMemory, u: VertexId, v: VertexId) -> bool {
        let mut provisional: Option<(f32, VertexId)> = None;

        if let Some(p) = memory.parent(u).vertex() {
            if self.corners.sees(p, v) {
                let cost = memory.distance(p) + self.corners.cost(p, v);
                if cost >= memory.distance(v) {
                    return false;
                }
                match self.try_parent(memory, p, v, cost) {
                    Ok(()) => return true,
                    Err(buffered) if buffered < memory.distance(v) => {
                        provisional = Some((buffered, p));
                    }
                    Err(_) => {}
                }
            }
        }

        let cost = memory.distance(u) + self.corners.cost(u, v);
        if cost < memory.distance(v) {
            match self.try_parent(memory, u, v, cost) {
                Ok(()) => return true,
                Err(buffered)
                    if buffered < memory.distance(v)
                        && provisional.is_none_or(|(best, _)| buffered < best) =>
                {
                    provisional = Some((buffered, u));
                }
                Err(_) => {}
            }
        }

        match provisional {
            Some((cost, p)) => {
                memory.update(v, cost, Parent::Provisional(p));
                true
            }
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Engine constructors
// ---------------------------------------------------------------------------

impl<'g, G: GridOracle + ?Sized> SearchEngine<ThetaStar<'g, G>> {
    /// Theta* with the default configuration.
    pub fn theta_star(grid: &'g G) -> Self {
        SearchEngine::new(ThetaStar::new(grid), SearchConfig::default())
    }
}

impl<'g, G: GridOracle + ?Sized> SearchEngine<StrictThetaStar<'g, G>> {
    /// Strict Theta* with post-smoothing on.
    pub fn strict_theta_star(grid: &'g G) -> Self {
        SearchEngine::new(
            StrictThetaStar::new(grid),
            SearchConfig {
                post_smooth: true,
                ..SearchConfig::default()
            },
        )
    }
}
