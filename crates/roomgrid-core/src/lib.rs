//! **roomgrid-core** — value types for multiroom tile-grid pathfinding.
//!
//! A world is an infinite plane of 50×50 tile *rooms*, each addressed by a
//! signed room coordinate with a `W12N3`-style name. This crate provides the
//! foundational types used across the *roomgrid* ecosystem: compass
//! directions, the position codec, per-room cost matrices, and the distance
//! and flow fields produced and consumed by the search engines in
//! `roomgrid-paths`.

pub mod cost_matrix;
pub mod direction;
pub mod distance_field;
pub mod flow_field;
pub mod position;
pub mod room;

pub use cost_matrix::{CostMatrix, IMPASSABLE, Terrain, TerrainCosts};
pub use direction::Direction;
pub use distance_field::{DistanceField, MultiroomDistanceField, UNREACHED};
pub use flow_field::{FlowField, MonoFlowField, MultiroomFlowField, MultiroomMonoFlowField};
pub use position::Pos;
pub use room::{RoomCoord, RoomNameError};

/// Side length of a room, in tiles.
pub const ROOM_SIZE: u8 = 50;

/// Number of tiles in a room.
pub const ROOM_AREA: usize = (ROOM_SIZE as usize) * (ROOM_SIZE as usize);
