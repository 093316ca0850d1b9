//! Maps for any-angle pathfinding: seeded generators, ASCII import and
//! rendering, and a catalogue of named test scenarios.

pub mod ascii;
pub mod mapgen;
pub mod scenarios;

pub use ascii::{MapError, ParsedMap, parse_map, render};
pub use mapgen::{CellularAutomataRule, ClusterRule, MapGen};
pub use scenarios::Scenario;
