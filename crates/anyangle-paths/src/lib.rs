//! Any-angle pathfinding on grids.
//!
//! Paths run between grid corners and may bend only at corners, but their
//! segments can have any slope. This crate provides the Theta* family of
//! searches over a [`GridOracle`]:
//!
//! - **Theta\*** ([`ThetaStar`]): A* whose relaxation reaches back to the
//!   grandparent whenever it is visible.
//! - **Strict Theta\*** ([`StrictThetaStar`]): prefers taut parents, records
//!   non-taut candidates as provisional with a buffer penalty, and repairs
//!   them only when they are settled.
//! - **Subgoal graph search** ([`SubgoalSearch`]): recursive Strict Theta*
//!   over a sparse, precomputed graph of outer corners.
//!
//! All searches run through [`SearchEngine`], which owns the reusable
//! [`SearchMemory`] and [`IndirectHeap`] so that repeated queries on the same
//! map allocate nothing after warm-up.
//!
//! # Composition
//!
//! | Piece | Role |
//! |---|---|
//! | [`GridOracle`] | blocked cells, line of sight, distance, outer corners |
//! | [`RelaxationStrategy`] | vertex set, expansion, heuristic, `relax(u, v)` |
//! | [`Instrumentation`] | optional snapshot sink for visualisers |

mod engine;
mod memory;
mod path;
mod queue;
mod subgoal;
mod taut;
mod theta;
mod trace;
mod traits;

pub use engine::{SearchConfig, SearchEngine, SearchOutcome, SearchStats};
pub use memory::{Parent, SearchMemory, VertexId};
pub use path::{path_length, smooth_path};
pub use queue::IndirectHeap;
pub use subgoal::{SubgoalConfig, SubgoalGraph, SubgoalSearch};
pub use taut::{is_collinear, is_taut};
pub use theta::{StrictThetaConfig, StrictThetaStar, ThetaStar};
pub use trace::{EdgeKind, Instrumentation, Snapshot, SnapshotItem, SnapshotRecorder};
pub use traits::{GridOracle, RelaxationStrategy};
