//! Subgoal graphs and recursive Strict Theta* over them.
//!
//! Shortest any-angle paths only bend at outer corners of obstacles. A
//! subgoal graph keeps just those corners, connected whenever they see each
//! other, and is built once per map. A query temporarily adds its start and
//! end to the graph, searches the sparse graph, then rolls the additions
//! back.

use std::collections::HashMap;

use anyangle_core::Point;
use log::debug;

use crate::engine::{SearchConfig, SearchEngine};
use crate::memory::{Parent, SearchMemory, VertexId};
use crate::taut::is_collinear;
use crate::trace::{EdgeKind, Snapshot, SnapshotItem};
use crate::traits::{GridOracle, RelaxationStrategy};

// ---------------------------------------------------------------------------
// SubgoalGraph
// ---------------------------------------------------------------------------

/// Visibility graph over the outer corners of a grid.
///
/// Vertices `0..base_len()` are the subgoals; a query may append up to two
/// more (its start and end) until [`restore_original_graph`] is called.
///
/// [`restore_original_graph`]: SubgoalGraph::restore_original_graph
#[derive(Debug, Clone, PartialEq)]
pub struct SubgoalGraph {
    points: Vec<Point>,
    neighbours: Vec<Vec<VertexId>>,
    has_edge_to_goal: Vec<bool>,
    index: HashMap<Point, VertexId>,
    base_len: usize,
    start: Option<VertexId>,
    end: Option<VertexId>,
    flagged: Vec<VertexId>,
}

impl SubgoalGraph {
    /// Collect every outer corner of `grid` and connect each visible pair.
    ///
    /// Runs one line-of-sight test per pair of subgoals, so building takes
    /// quadratic time in their number; build once per map and reuse.
    pub fn build<G: GridOracle + ?Sized>(grid: &G) -> Self {
        let size = grid.size();
        let mut points = Vec::new();
        for y in 0..=size.y {
            for x in 0..=size.x {
                let p = Point::new(x, y);
                if grid.is_outer_corner(p) {
                    points.push(p);
                }
            }
        }

        let mut neighbours = vec![Vec::new(); points.len()];
        for i in 0..points.len() {
            for j in i + 1..points.len() {
                if grid.line_of_sight(points[i], points[j]) {
                    neighbours[i].push(j);
                    neighbours[j].push(i);
                }
            }
        }

        let index = points.iter().enumerate().map(|(i, &p)| (p, i)).collect();
        let graph = Self {
            has_edge_to_goal: vec![false; points.len()],
            base_len: points.len(),
            points,
            neighbours,
            index,
            start: None,
            end: None,
            flagged: Vec::new(),
        };
        debug!(
            "subgoal graph: {} subgoals, {} edges",
            graph.base_len,
            graph.edge_count()
        );
        graph
    }

    /// Vertices currently in the graph, including a query's start and end.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of subgoals.
    pub fn base_len(&self) -> usize {
        self.base_len
    }

    /// Undirected edges between subgoals.
    pub fn edge_count(&self) -> usize {
        self.neighbours[..self.base_len]
            .iter()
            .map(Vec::len)
            .sum::<usize>()
            / 2
    }

    pub fn point(&self, v: VertexId) -> Point {
        self.points[v]
    }

    pub fn neighbours(&self, v: VertexId) -> &[VertexId] {
        &self.neighbours[v]
    }

    /// Whether `v` sees the current query's end.
    pub fn has_edge_to_goal(&self, v: VertexId) -> bool {
        self.has_edge_to_goal[v]
    }

    /// Vertex of a subgoal corner.
    pub fn index_of(&self, p: Point) -> Option<VertexId> {
        self.index.get(&p).copied()
    }

    pub fn subgoals(&self) -> &[Point] {
        &self.points[..self.base_len]
    }

    pub fn is_augmented(&self) -> bool {
        self.start.is_some()
    }

    /// Add a query's endpoints.
    ///
    /// An endpoint that is already a subgoal is reused. A new start gets an
    /// edge to every subgoal it sees. A new end gets no edges; instead every
    /// subgoal that sees it is flagged with
    /// [`has_edge_to_goal`](Self::has_edge_to_goal).
    pub fn add_start_and_end<G: GridOracle + ?Sized>(
        &mut self,
        grid: &G,
        start: Point,
        end: Point,
    ) -> (VertexId, VertexId) {
        debug_assert!(!self.is_augmented(), "subgoal graph augmented twice");

        let s = match self.index_of(start) {
            Some(s) => s,
            None => {
                let visible = (0..self.base_len)
                    .filter(|&v| grid.line_of_sight(start, self.points[v]))
                    .collect();
                self.push(start, visible)
            }
        };
        let e = match self.index_of(end) {
            Some(e) => e,
            None if end == start => s,
            None => self.push(end, Vec::new()),
        };

        for v in 0..self.base_len {
            if v != e && grid.line_of_sight(self.points[v], end) {
                self.has_edge_to_goal[v] = true;
                self.flagged.push(v);
            }
        }
        self.start = Some(s);
        self.end = Some(e);
        (s, e)
    }

    fn push(&mut self, p: Point, neighbours: Vec<VertexId>) -> VertexId {
        let v = self.points.len();
        self.points.push(p);
        self.neighbours.push(neighbours);
        self.has_edge_to_goal.push(false);
        v
    }

    /// Drop whatever [`add_start_and_end`](Self::add_start_and_end) added.
    pub fn restore_original_graph(&mut self) {
        for v in self.flagged.drain(..) {
            self.has_edge_to_goal[v] = false;
        }
        self.points.truncate(self.base_len);
        self.neighbours.truncate(self.base_len);
        self.has_edge_to_goal.truncate(self.base_len);
        self.start = None;
        self.end = None;
    }

    /// Every edge of the graph as a snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.neighbours
            .iter()
            .enumerate()
            .flat_map(|(v, ns)| {
                ns.iter().map(move |&n| SnapshotItem::Edge {
                    from: self.points[v],
                    to: self.points[n],
                    kind: EdgeKind::SubgoalGraph,
                })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// SubgoalSearch
// ---------------------------------------------------------------------------

/// Tuning of [`SubgoalSearch`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubgoalConfig {
    /// Added to the distance of a vertex reached through a non-taut edge.
    pub penalty: f32,
}

impl Default for SubgoalConfig {
    fn default() -> Self {
        Self { penalty: 0.42 }
    }
}

/// Recursive Strict Theta* on a [`SubgoalGraph`].
///
/// Queries whose endpoints see each other are answered directly and never
/// touch the graph.
pub struct SubgoalSearch<'g, G: ?Sized> {
    grid: &'g G,
    graph: SubgoalGraph,
    config: SubgoalConfig,
    target: Point,
    target_id: VertexId,
}

impl<'g, G: GridOracle + ?Sized> SubgoalSearch<'g, G> {
    /// Build the subgoal graph of `grid`.
    pub fn new(grid: &'g G) -> Self {
        Self::with_graph(grid, SubgoalGraph::build(grid), SubgoalConfig::default())
    }

    /// Search a prebuilt graph. `graph` must have been built from `grid`.
    pub fn with_graph(grid: &'g G, graph: SubgoalGraph, config: SubgoalConfig) -> Self {
        Self {
            grid,
            graph,
            config,
            target: Point::ZERO,
            target_id: VertexId::MAX,
        }
    }

    pub fn graph(&self) -> &SubgoalGraph {
        &self.graph
    }

    pub fn config(&self) -> &SubgoalConfig {
        &self.config
    }

    fn is_taut(&self, memory: &SearchMemory, v: VertexId, u: VertexId) -> bool {
        match memory.parent(u).vertex() {
            None => true,
            Some(p) => self
                .grid
                .is_taut(self.graph.point(v), self.graph.point(u), self.graph.point(p)),
        }
    }

    /// Whether `v` can hang directly off `u`'s parent: `u` lies on the
    /// straight segment and does not wrap an obstacle.
    fn is_mergeable_with_parent(&self, memory: &SearchMemory, u: VertexId, v: VertexId) -> bool {
        let Some(p) = memory.parent(u).vertex() else {
            return false;
        };
        let pu = self.graph.point(u);
        !self.grid.is_outer_corner(pu)
            && is_collinear(self.graph.point(p), pu, self.graph.point(v))
    }

    fn relax_through(
        &self,
        memory: &mut SearchMemory,
        u: VertexId,
        v: VertexId,
        provisional: bool,
    ) -> bool {
        let mut cost = memory.distance(u)
            + self
                .grid
                .distance(self.graph.point(u), self.graph.point(v));
        let parent = if provisional {
            cost += self.config.penalty;
            Parent::Provisional(u)
        } else if self.is_mergeable_with_parent(memory, u, v) {
            memory.parent(u)
        } else {
            Parent::Confirmed(u)
        };
        if cost < memory.distance(v) {
            memory.update(v, cost, parent);
            true
        } else {
            false
        }
    }
}

impl<G: GridOracle + ?Sized> RelaxationStrategy for SubgoalSearch<'_, G> {
    fn name(&self) -> &'static str {
        "subgoal"
    }

    fn begin(&mut self, from: Point, to: Point) -> Option<(VertexId, VertexId)> {
        if !self.grid.is_valid_coordinate(from) || !self.grid.is_valid_coordinate(to) {
            return None;
        }
        let (s, e) = self.graph.add_start_and_end(self.grid, from, to);
        self.target = to;
        self.target_id = e;
        Some((s, e))
    }

    fn end(&mut self) {
        self.graph.restore_original_graph();
    }

    fn vertex_count(&self) -> usize {
        self.graph.len()
    }

    fn point(&self, v: VertexId) -> Point {
        self.graph.point(v)
    }

    fn heuristic(&self, v: VertexId, weight: f32) -> f32 {
        weight * self.grid.distance(self.graph.point(v), self.target)
    }

    fn distance(&self, a: Point, b: Point) -> f32 {
        self.grid.distance(a, b)
    }

    fn line_of_sight(&self, from: Point, to: Point) -> bool {
        self.grid.line_of_sight(from, to)
    }

    fn direct_path(&self, from: Point, to: Point) -> bool {
        self.grid.is_valid_coordinate(from)
            && self.grid.is_valid_coordinate(to)
            && self.grid.line_of_sight(from, to)
    }

    fn neighbors(&self, _memory: &SearchMemory, u: VertexId, buf: &mut Vec<VertexId>) {
        buf.extend_from_slice(self.graph.neighbours(u));
        if u != self.target_id && self.graph.has_edge_to_goal(u) {
            buf.push(self.target_id);
        }
    }

    /// Climb from `u` towards the root while the bend at the current vertex
    /// is not taut and its parent still sees `v`.
    fn relax(&self, memory: &mut SearchMemory, u: VertexId, v: VertexId) -> bool {
        let mut u = u;
        loop {
            let parent = match memory.parent(u).vertex() {
                Some(p) if !self.is_taut(memory, v, u) => p,
                _ => return self.relax_through(memory, u, v, false),
            };
            if self
                .grid
                .line_of_sight(self.graph.point(parent), self.graph.point(v))
            {
                u = parent;
            } else {
                return self.relax_through(memory, u, v, true);
            }
        }
    }

    fn overview(&self) -> Option<Snapshot> {
        Some(self.graph.snapshot())
    }
}

impl<'g, G: GridOracle + ?Sized> SearchEngine<SubgoalSearch<'g, G>> {
    /// Subgoal search over a freshly built graph of `grid`.
    pub fn subgoal(grid: &'g G) -> Self {
        SearchEngine::new(SubgoalSearch::new(grid), SearchConfig::default())
    }
}
