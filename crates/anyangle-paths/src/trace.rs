//! Search snapshots for visualisers.
//!
//! The engine calls an [`Instrumentation`] sink at the start of a query, on
//! every settled vertex and at termination. Snapshots are built lazily: the
//! sink receives a closure and only pays for a capture when it keeps one.

use anyangle_core::Point;

/// What an edge in a snapshot stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgeKind {
    /// A parent pointer in the search tree.
    Search,
    /// A parent pointer on the current best path to the target.
    BestPath,
    /// An edge of the static subgoal graph.
    SubgoalGraph,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SnapshotItem {
    Edge { from: Point, to: Point, kind: EdgeKind },
    /// A vertex waiting in the open list.
    Vertex(Point),
}

/// One frame of a search trace.
pub type Snapshot = Vec<SnapshotItem>;

/// Receives search events. All methods default to doing nothing.
pub trait Instrumentation {
    /// A query is starting. `overview` renders the static search structure,
    /// if the strategy has one.
    fn on_start(&mut self, _overview: &dyn Fn() -> Option<Snapshot>) {}

    /// `vertex` was just settled.
    fn on_settle(&mut self, _vertex: Point, _capture: &dyn Fn() -> Snapshot) {}

    /// The search loop has stopped.
    fn on_finish(&mut self, _capture: &dyn Fn() -> Snapshot) {}
}

/// Sink that ignores everything.
impl Instrumentation for () {}

// ---------------------------------------------------------------------------
// SnapshotRecorder
// ---------------------------------------------------------------------------

/// Keeps every `interval + 1`-th settle event as a snapshot, plus the final
/// state of each query.
///
/// The recorder is off until [`start`](Self::start) is called. The countdown
/// carries over between queries.
#[derive(Debug, Clone, Default)]
pub struct SnapshotRecorder {
    recording: bool,
    interval: usize,
    countdown: usize,
    snapshots: Vec<Snapshot>,
}

impl SnapshotRecorder {
    /// A stopped recorder that skips `interval` events between snapshots.
    pub fn new(interval: usize) -> Self {
        Self {
            interval,
            ..Self::default()
        }
    }

    pub fn start(&mut self) {
        self.recording = true;
    }

    pub fn stop(&mut self) {
        self.recording = false;
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn interval(&self) -> usize {
        self.interval
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Hand over the recorded snapshots, leaving the recorder empty.
    pub fn take(&mut self) -> Vec<Snapshot> {
        std::mem::take(&mut self.snapshots)
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.countdown = 0;
    }

    fn keep(&mut self, snapshot: Snapshot) {
        self.snapshots.push(snapshot);
        self.countdown = self.interval;
    }

    fn tick(&mut self, capture: &dyn Fn() -> Snapshot) {
        if !self.recording {
            return;
        }
        if self.countdown > 0 {
            self.countdown -= 1;
            return;
        }
        self.keep(capture());
    }
}

impl Instrumentation for SnapshotRecorder {
    fn on_start(&mut self, overview: &dyn Fn() -> Option<Snapshot>) {
        if !self.recording {
            return;
        }
        if let Some(snapshot) = overview() {
            self.keep(snapshot);
        }
    }

    fn on_settle(&mut self, _vertex: Point, capture: &dyn Fn() -> Snapshot) {
        self.tick(capture);
    }

    fn on_finish(&mut self, capture: &dyn Fn() -> Snapshot) {
        if self.recording {
            self.keep(capture());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(n: i32) -> Snapshot {
        vec![SnapshotItem::Vertex(Point::new(n, 0))]
    }

    #[test]
    fn stopped_recorder_keeps_nothing() {
        let mut r = SnapshotRecorder::new(2);
        r.on_start(&|| Some(frame(0)));
        r.on_settle(Point::ZERO, &|| frame(1));
        r.on_finish(&|| frame(2));
        assert!(r.snapshots().is_empty());
    }

    #[test]
    fn keeps_first_settle_then_every_interval_plus_one() {
        let mut r = SnapshotRecorder::new(2);
        r.start();
        for i in 0..7 {
            r.on_settle(Point::ZERO, &|| frame(i));
        }
        // events 0, 3, 6
        let kept: Vec<_> = r.snapshots().iter().map(|s| s[0]).collect();
        assert_eq!(kept, vec![frame(0)[0], frame(3)[0], frame(6)[0]]);
    }

    #[test]
    fn overview_counts_as_a_snapshot() {
        let mut r = SnapshotRecorder::new(1);
        r.start();
        r.on_start(&|| Some(frame(9)));
        r.on_settle(Point::ZERO, &|| frame(0));
        r.on_settle(Point::ZERO, &|| frame(1));
        assert_eq!(r.snapshots(), &[frame(9), frame(1)]);
    }

    #[test]
    fn finish_always_records() {
        let mut r = SnapshotRecorder::new(15);
        r.start();
        r.on_settle(Point::ZERO, &|| frame(0));
        r.on_settle(Point::ZERO, &|| frame(1));
        r.on_finish(&|| frame(2));
        assert_eq!(r.snapshots().len(), 2);
        assert_eq!(r.take(), vec![frame(0), frame(2)]);
        assert!(r.snapshots().is_empty());
    }

    #[test]
    fn stop_pauses_recording() {
        let mut r = SnapshotRecorder::new(0);
        r.start();
        r.on_settle(Point::ZERO, &|| frame(0));
        r.stop();
        r.on_settle(Point::ZERO, &|| frame(1));
        assert_eq!(r.snapshots().len(), 1);
    }

    #[test]
    fn capture_is_lazy() {
        use std::cell::Cell;
        let calls = Cell::new(0);
        let mut r = SnapshotRecorder::new(3);
        r.start();
        for _ in 0..4 {
            r.on_settle(Point::ZERO, &|| {
                calls.set(calls.get() + 1);
                frame(0)
            });
        }
        assert_eq!(calls.get(), 1);
    }
}
