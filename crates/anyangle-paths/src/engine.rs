use std::collections::HashSet;

use anyangle_core::Point;
use log::{debug, trace, warn};

use crate::memory::{Parent, SearchMemory, VertexId};
use crate::path::{path_length, smooth_path};
use crate::queue::IndirectHeap;
use crate::trace::{EdgeKind, Instrumentation, Snapshot, SnapshotItem, SnapshotRecorder};
use crate::traits::RelaxationStrategy;

/// Settle events skipped between two recorded snapshots.
pub const DEFAULT_RECORD_INTERVAL: usize = 15;

/// Knobs shared by every strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchConfig {
    /// Multiplier on the distance-to-target heuristic. Zero turns the search
    /// into Dijkstra.
    pub heuristic_weight: f32,
    /// Stop after settling this many vertices.
    pub max_expansions: Option<usize>,
    /// Straighten the extracted path with line-of-sight checks.
    pub post_smooth: bool,
    /// Settle events skipped between two snapshots while recording.
    pub record_interval: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            heuristic_weight: 1.0,
            max_expansions: None,
            post_smooth: false,
            record_interval: DEFAULT_RECORD_INTERVAL,
        }
    }
}

/// How a query ended.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchOutcome {
    /// A path was found; `cost` is its Euclidean length.
    Found { cost: f32 },
    /// The open list ran dry, or an endpoint was not a valid corner.
    Unreachable,
    /// [`SearchConfig::max_expansions`] was hit first.
    Aborted,
}

impl SearchOutcome {
    pub fn is_found(self) -> bool {
        matches!(self, SearchOutcome::Found { .. })
    }

    pub fn cost(self) -> Option<f32> {
        match self {
            SearchOutcome::Found { cost } => Some(cost),
            _ => None,
        }
    }
}

/// Counters for the last query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStats {
    /// Vertices settled.
    pub expansions: usize,
    /// Successful relaxations.
    pub relaxations: usize,
    /// Provisional parents confirmed on settlement.
    pub repairs: usize,
}

// ---------------------------------------------------------------------------
// SearchEngine
// ---------------------------------------------------------------------------

/// Best-first search loop shared by the Theta* family.
///
/// The engine owns the search memory, the open list and the strategy, so
/// repeated queries on one engine reuse every buffer. Results stay available
/// until the next [`compute_path`](Self::compute_path).
pub struct SearchEngine<S> {
    strategy: S,
    config: SearchConfig,
    memory: SearchMemory,
    queue: IndirectHeap,
    nbuf: Vec<VertexId>,
    recorder: SnapshotRecorder,
    outcome: Option<SearchOutcome>,
    path: Option<Vec<Point>>,
    distance: f32,
    stats: SearchStats,
}

impl<S: RelaxationStrategy> SearchEngine<S> {
    pub fn new(strategy: S, config: SearchConfig) -> Self {
        Self {
            strategy,
            memory: SearchMemory::new(),
            queue: IndirectHeap::new(),
            nbuf: Vec::with_capacity(8),
            recorder: SnapshotRecorder::new(config.record_interval),
            config,
            outcome: None,
            path: None,
            distance: f32::INFINITY,
            stats: SearchStats::default(),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn strategy_mut(&mut self) -> &mut S {
        &mut self.strategy
    }

    /// Search state of the last query, for inspection.
    pub fn memory(&self) -> &SearchMemory {
        &self.memory
    }

    /// Find a path from corner `from` to corner `to`, recording snapshots if
    /// [`start_recording`](Self::start_recording) was called.
    pub fn compute_path(&mut self, from: Point, to: Point) -> SearchOutcome {
        let mut recorder = std::mem::take(&mut self.recorder);
        let outcome = self.compute_path_with(from, to, &mut recorder);
        self.recorder = recorder;
        outcome
    }

    /// Like [`compute_path`](Self::compute_path) but reports to `sink`
    /// instead of the built-in recorder.
    pub fn compute_path_with<I: Instrumentation + ?Sized>(
        &mut self,
        from: Point,
        to: Point,
        sink: &mut I,
    ) -> SearchOutcome {
        self.path = None;
        self.distance = f32::INFINITY;
        self.stats = SearchStats::default();

        let outcome = if self.strategy.direct_path(from, to) {
            let path = if from == to { vec![from] } else { vec![from, to] };
            self.distance = self.strategy.distance(from, to);
            let cost = path_length(&path);
            self.path = Some(path);
            SearchOutcome::Found { cost }
        } else if let Some((source, target)) = self.strategy.begin(from, to) {
            let outcome = self.run(source, target, sink);
            self.strategy.end();
            outcome
        } else {
            warn!(
                "{}: rejected query {from} -> {to}: not a corner of the grid",
                self.strategy.name()
            );
            SearchOutcome::Unreachable
        };

        debug!(
            "{}: {from} -> {to}: {outcome:?} ({} expansions, {} relaxations, {} repairs)",
            self.strategy.name(),
            self.stats.expansions,
            self.stats.relaxations,
            self.stats.repairs,
        );
        self.outcome = Some(outcome);
        outcome
    }

    fn run<I: Instrumentation + ?Sized>(
        &mut self,
        source: VertexId,
        target: VertexId,
        sink: &mut I,
    ) -> SearchOutcome {
        let n = self.strategy.vertex_count();
        self.memory.reset(n);
        self.queue.reset(n);

        let weight = self.config.heuristic_weight;
        self.memory.set_distance(source, 0.0);
        self.queue
            .decrease_key(source, self.strategy.heuristic(source, weight));

        sink.on_start(&|| self.strategy.overview());

        let mut nbuf = std::mem::take(&mut self.nbuf);
        let mut outcome = SearchOutcome::Unreachable;

        while let Some(current) = self.queue.pop_min() {
            if self
                .config
                .max_expansions
                .is_some_and(|max| self.stats.expansions >= max)
            {
                outcome = SearchOutcome::Aborted;
                break;
            }

            self.repair(current);
            self.memory.set_visited(current);
            self.stats.expansions += 1;

            if current == target {
                outcome = SearchOutcome::Found { cost: 0.0 };
                break;
            }
            if self.memory.distance(current).is_infinite() {
                break;
            }

            nbuf.clear();
            self.strategy.neighbors(&self.memory, current, &mut nbuf);
            for &next in &nbuf {
                if self.memory.is_visited(next) {
                    continue;
                }
                if self.strategy.relax(&mut self.memory, current, next) {
                    self.stats.relaxations += 1;
                    let key = self.memory.distance(next) + self.strategy.heuristic(next, weight);
                    self.queue.decrease_key(next, key);
                }
            }

            sink.on_settle(self.strategy.point(current), &|| {
                capture(&self.strategy, &self.memory, &self.queue, target)
            });
        }
        self.nbuf = nbuf;

        sink.on_finish(&|| capture(&self.strategy, &self.memory, &self.queue, target));

        self.distance = self.memory.distance(target);
        if outcome.is_found() {
            let path = self.extract_path(target);
            outcome = SearchOutcome::Found {
                cost: path_length(&path),
            };
            self.path = Some(path);
        }
        outcome
    }

    /// Confirm a provisional parent before `v` is settled.
    fn repair(&mut self, v: VertexId) {
        let strategy = &self.strategy;
        let to = strategy.point(v);
        if self
            .memory
            .confirm(v, |p| strategy.distance(strategy.point(p), to))
        {
            self.stats.repairs += 1;
            trace!("{}: confirmed parent of {to}", strategy.name());
        }
    }

    fn extract_path(&self, target: VertexId) -> Vec<Point> {
        let mut path = Vec::new();
        let mut v = Some(target);
        while let Some(cur) = v {
            path.push(self.strategy.point(cur));
            v = self.memory.parent(cur).vertex();
        }
        path.reverse();
        if self.config.post_smooth {
            path = smooth_path(&path, |a, b| self.strategy.line_of_sight(a, b));
        }
        path
    }

    /// How the last query ended, if any ran.
    pub fn outcome(&self) -> Option<SearchOutcome> {
        self.outcome
    }

    /// Waypoints of the last path found, source first.
    pub fn path(&self) -> Option<&[Point]> {
        self.path.as_deref()
    }

    /// Euclidean length of the last path found.
    pub fn path_length(&self) -> Option<f32> {
        self.path.as_deref().map(path_length)
    }

    /// Number of waypoints in the last path, 0 if none.
    pub fn hop_count(&self) -> usize {
        self.path.as_ref().map_or(0, Vec::len)
    }

    /// Search distance recorded for the target: the settled distance after a
    /// successful search, infinity if the target was never reached, and the
    /// best tentative distance after an aborted search.
    pub fn target_distance(&self) -> f32 {
        self.distance
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    // -----------------------------------------------------------------------
    // Recording
    // -----------------------------------------------------------------------

    pub fn start_recording(&mut self) {
        self.recorder.start();
    }

    pub fn stop_recording(&mut self) {
        self.recorder.stop();
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_recording()
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        self.recorder.snapshots()
    }

    pub fn take_snapshots(&mut self) -> Vec<Snapshot> {
        self.recorder.take()
    }
}

/// The search tree as edges, with the current best path to `target`
/// highlighted, followed by the open list.
fn capture<S: RelaxationStrategy>(
    strategy: &S,
    memory: &SearchMemory,
    queue: &IndirectHeap,
    target: VertexId,
) -> Snapshot {
    let mut best = HashSet::new();
    if matches!(memory.parent(target), Parent::Confirmed(_)) {
        let mut v = Some(target);
        while let Some(cur) = v {
            best.insert(cur);
            v = memory.parent(cur).vertex();
        }
    }

    let mut snapshot = Snapshot::new();
    for v in 0..memory.len() {
        let Some(p) = memory.parent(v).vertex() else {
            continue;
        };
        let kind = if best.contains(&v) {
            EdgeKind::BestPath
        } else {
            EdgeKind::Search
        };
        snapshot.push(SnapshotItem::Edge {
            from: strategy.point(p),
            to: strategy.point(v),
            kind,
        });
    }
    snapshot.extend(queue.iter().map(|v| SnapshotItem::Vertex(strategy.point(v))));
    snapshot
}
