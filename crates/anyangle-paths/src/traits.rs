use anyangle_core::{GridGraph, Point};

use crate::memory::{SearchMemory, VertexId};
use crate::trace::Snapshot;

// ---------------------------------------------------------------------------
// GridOracle
// ---------------------------------------------------------------------------

/// Grid queries used by the searches.
///
/// Vertices are cell corners. Cells outside the grid are blocked. The
/// required methods are the ones whose answer depends on the obstacle layout;
/// the rest derive from [`size`](GridOracle::size).
pub trait GridOracle {
    /// Grid size in cells (width, height).
    fn size(&self) -> Point;

    /// Whether the cell `cell` is blocked. Must return true outside the grid.
    fn is_blocked(&self, cell: Point) -> bool;

    /// Whether the straight segment between two corners is unobstructed.
    fn line_of_sight(&self, from: Point, to: Point) -> bool;

    /// Line of sight restricted to a single orthogonal or diagonal step.
    fn neighbour_line_of_sight(&self, from: Point, to: Point) -> bool;

    /// Whether `p` is a convex corner of an obstacle that a shortest path may
    /// bend around.
    fn is_outer_corner(&self, p: Point) -> bool;

    /// Whether `p` is a corner of the grid.
    fn is_valid_coordinate(&self, p: Point) -> bool {
        let size = self.size();
        p.x >= 0 && p.y >= 0 && p.x <= size.x && p.y <= size.y
    }

    /// Euclidean distance between two corners.
    fn distance(&self, a: Point, b: Point) -> f32 {
        a.euclidean(b)
    }

    /// Number of corners.
    fn vertex_count(&self) -> usize {
        let size = self.size();
        (size.x as usize + 1) * (size.y as usize + 1)
    }

    /// Dense index of a corner, `None` outside the grid.
    fn to_index(&self, p: Point) -> Option<VertexId> {
        if !self.is_valid_coordinate(p) {
            return None;
        }
        Some(p.y as usize * (self.size().x as usize + 1) + p.x as usize)
    }

    /// Corner of a dense index.
    fn from_index(&self, idx: VertexId) -> Point {
        let w = self.size().x as usize + 1;
        Point::new((idx % w) as i32, (idx / w) as i32)
    }

    /// Whether `p → u → v` is locally shortest. See [`crate::is_taut`].
    fn is_taut(&self, v: Point, u: Point, p: Point) -> bool {
        crate::taut::is_taut(self, v, u, p)
    }
}

impl GridOracle for GridGraph {
    fn size(&self) -> Point {
        GridGraph::size(self)
    }

    fn is_blocked(&self, cell: Point) -> bool {
        GridGraph::is_blocked(self, cell)
    }

    fn line_of_sight(&self, from: Point, to: Point) -> bool {
        GridGraph::line_of_sight(self, from, to)
    }

    fn neighbour_line_of_sight(&self, from: Point, to: Point) -> bool {
        GridGraph::neighbour_line_of_sight(self, from, to)
    }

    fn is_outer_corner(&self, p: Point) -> bool {
        GridGraph::is_outer_corner(self, p)
    }

    fn is_valid_coordinate(&self, p: Point) -> bool {
        GridGraph::is_valid_coordinate(self, p)
    }

    fn distance(&self, a: Point, b: Point) -> f32 {
        GridGraph::distance(self, a, b)
    }

    fn vertex_count(&self) -> usize {
        GridGraph::vertex_count(self)
    }

    fn to_index(&self, p: Point) -> Option<VertexId> {
        GridGraph::to_index(self, p)
    }

    fn from_index(&self, idx: VertexId) -> Point {
        GridGraph::from_index(self, idx)
    }
}

// ---------------------------------------------------------------------------
// RelaxationStrategy
// ---------------------------------------------------------------------------

/// One member of the Theta* family, as seen by the [`SearchEngine`].
///
/// The engine owns the loop (pop, repair, settle, expand); the strategy owns
/// the vertex set, the expansion rule and the relaxation rule.
///
/// [`SearchEngine`]: crate::SearchEngine
pub trait RelaxationStrategy {
    /// Short name used in log lines.
    fn name(&self) -> &'static str;

    /// Prepare a query and map its endpoints to vertex ids.
    ///
    /// Returns `None` if either endpoint is not a vertex of this strategy.
    /// Every accepted `begin` is followed by exactly one [`end`](Self::end).
    fn begin(&mut self, from: Point, to: Point) -> Option<(VertexId, VertexId)>;

    /// Undo whatever [`begin`](Self::begin) changed.
    fn end(&mut self) {}

    /// Number of vertex ids in use for the current query.
    fn vertex_count(&self) -> usize;

    /// Corner of a vertex id.
    fn point(&self, v: VertexId) -> Point;

    /// Heuristic key component for `v`, already scaled by `weight`.
    fn heuristic(&self, v: VertexId, weight: f32) -> f32;

    /// Euclidean distance between two corners.
    fn distance(&self, a: Point, b: Point) -> f32;

    /// Line of sight between two corners.
    fn line_of_sight(&self, from: Point, to: Point) -> bool;

    /// Whether the query can be answered by the straight segment alone,
    /// without touching any search state.
    fn direct_path(&self, _from: Point, _to: Point) -> bool {
        false
    }

    /// Append the successors of the settled vertex `u` into `buf`. The engine
    /// clears `buf` and skips settled vertices itself.
    fn neighbors(&self, memory: &SearchMemory, u: VertexId, buf: &mut Vec<VertexId>);

    /// Try to improve `v` through `u` (or one of its ancestors). Returns true
    /// if `v`'s distance decreased.
    fn relax(&self, memory: &mut SearchMemory, u: VertexId, v: VertexId) -> bool;

    /// A picture of the static search structure, recorded once per query
    /// when tracing is on.
    fn overview(&self) -> Option<Snapshot> {
        None
    }
}
