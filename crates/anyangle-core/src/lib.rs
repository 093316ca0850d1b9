//! **anyangle-core**: geometry and grid types for any-angle pathfinding.
//!
//! This crate provides the foundational types used across the *anyangle*
//! workspace: integer grid-corner points, half-open ranges, and the
//! [`GridGraph`] holding which cells are blocked together with the
//! visibility primitives (line of sight, outer corners, Euclidean distance)
//! that the searches in `anyangle-paths` are built on.
//!
//! # Coordinates
//!
//! A grid of `width × height` cells has `(width + 1) × (height + 1)` corner
//! points. Cell `(x, y)` is the unit square whose top-left corner is the
//! point `(x, y)`. Paths always run between corners.

pub mod geom;
pub mod grid;

pub use geom::{Point, Range};
pub use grid::GridGraph;
