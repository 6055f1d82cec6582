//! **roomgrid-paths** — distance fields, flow fields and pathfinding across
//! multiroom tile grids.
//!
//! This crate provides the search engines that operate on the value types
//! from `roomgrid-core`:
//!
//! - **BFS** uniform-cost distance maps ([`bfs_distance_map`])
//! - **Dijkstra** weighted distance maps ([`dijkstra_distance_map`])
//! - **A\*** point-to-point and multi-goal search ([`astar_path`]), with
//!   binary-heap and bucketed open-list variants
//! - **Jump Point Search** for uniform-cost terrain ([`jps_path`])
//! - **Flow fields** derived from distance maps ([`to_flow_field`],
//!   [`to_mono_flow_field`])
//! - **Path reconstruction** by steepest descent ([`path_to_origin`])
//!
//! Most callers go through the [`query`] facade ([`distance_map`],
//! [`path`]), which validates inputs, wires the caller's
//! [`CostProvider`] through a per-query [`RoomCache`], and reports budget
//! exhaustion via the `incomplete` flag instead of errors.
//!
//! # Cost semantics
//!
//! Cost-matrix cells of `0` mean "use the default cost" (1); `255` is the
//! impassable sentinel and is treated as infinite. Diagonal steps cost the
//! same as orthogonal steps. A diagonal step is rejected only when both
//! orthogonal cells forming the corner are impassable, identically in every
//! engine.

mod astar;
mod bfs;
mod dijkstra;
mod engine;
mod flow;
mod jps;
mod limits;
mod path;
mod provider;
pub mod query;

pub use astar::{AstarOptions, Frontier, astar_path};
pub use bfs::bfs_distance_map;
pub use dijkstra::dijkstra_distance_map;
pub use flow::{to_flow_field, to_mono_flow_field};
pub use jps::jps_path;
pub use limits::SearchLimits;
pub use path::{ReconstructError, path_to_origin, path_via_mono};
pub use provider::{CostProvider, RoomCache};
pub use query::{
    DistanceMapResult, GoalSpec, MapAlgorithm, PathAlgorithm, PathResult, QueryError,
    distance_map, path,
};
