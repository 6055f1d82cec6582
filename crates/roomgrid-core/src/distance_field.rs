//! Distance fields produced by the search engines.

use std::collections::{HashMap, HashSet};

use crate::position::Pos;
use crate::room::RoomCoord;
use crate::{ROOM_AREA, ROOM_SIZE};

/// Sentinel distance for cells no search has reached.
pub const UNREACHED: u32 = u32::MAX;

/// Best-known distances for one room, indexed like a
/// [`CostMatrix`](crate::CostMatrix) (x-major).
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceField {
    values: Vec<u32>,
}

impl DistanceField {
    /// All cells [`UNREACHED`].
    pub fn new() -> Self {
        Self {
            values: vec![UNREACHED; ROOM_AREA],
        }
    }

    /// Distance at `(x, y)`. Panics on out-of-range coordinates.
    #[inline]
    pub fn get(&self, x: u8, y: u8) -> u32 {
        assert!(x < ROOM_SIZE && y < ROOM_SIZE, "tile ({x},{y}) out of range");
        self.values[x as usize * ROOM_SIZE as usize + y as usize]
    }

    /// Set the distance at `(x, y)`. Panics on out-of-range coordinates.
    #[inline]
    pub fn set(&mut self, x: u8, y: u8, value: u32) {
        assert!(x < ROOM_SIZE && y < ROOM_SIZE, "tile ({x},{y}) out of range");
        self.values[x as usize * ROOM_SIZE as usize + y as usize] = value;
    }

    /// Distance by linear index.
    #[inline]
    pub fn get_linear(&self, index: usize) -> u32 {
        self.values[index]
    }

    /// Set the distance by linear index.
    #[inline]
    pub fn set_linear(&mut self, index: usize, value: u32) {
        self.values[index] = value;
    }

    /// Iterate over `((x, y), distance)` for every tile.
    pub fn enumerate(&self) -> impl Iterator<Item = ((u8, u8), u32)> + '_ {
        self.values.iter().enumerate().map(|(i, &v)| {
            let x = (i / ROOM_SIZE as usize) as u8;
            let y = (i % ROOM_SIZE as usize) as u8;
            ((x, y), v)
        })
    }
}

impl Default for DistanceField {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DistanceField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reached = self.values.iter().filter(|&&v| v != UNREACHED).count();
        write!(f, "DistanceField({reached} cells reached)")
    }
}

/// Distances across multiple rooms: one [`DistanceField`] per visited room,
/// plus the set of rooms the search enumerated but could not (fully)
/// explore because a limit tripped.
///
/// Grows monotonically during a query — rooms are added on first visit and
/// never removed.
#[derive(Clone, Debug, Default)]
pub struct MultiroomDistanceField {
    maps: HashMap<RoomCoord, DistanceField>,
    truncated: HashSet<RoomCoord>,
}

impl MultiroomDistanceField {
    /// An empty field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Distance at a position, [`UNREACHED`] for rooms never visited.
    pub fn get(&self, pos: Pos) -> u32 {
        self.maps
            .get(&pos.room())
            .map(|map| map.get_linear(pos.linear()))
            .unwrap_or(UNREACHED)
    }

    /// Set the distance at a position, creating the room's field on first
    /// touch.
    pub fn set(&mut self, pos: Pos, value: u32) {
        self.room_mut(pos.room()).set_linear(pos.linear(), value);
    }

    /// The field for one room, if the room was visited.
    pub fn room(&self, room: RoomCoord) -> Option<&DistanceField> {
        self.maps.get(&room)
    }

    /// The field for one room, created on demand.
    pub fn room_mut(&mut self, room: RoomCoord) -> &mut DistanceField {
        self.maps.entry(room).or_default()
    }

    /// Whether the room has a field.
    pub fn contains_room(&self, room: RoomCoord) -> bool {
        self.maps.contains_key(&room)
    }

    /// Rooms with a field, in no particular order.
    pub fn rooms(&self) -> impl Iterator<Item = RoomCoord> + '_ {
        self.maps.keys().copied()
    }

    /// Number of rooms with a field.
    pub fn room_count(&self) -> usize {
        self.maps.len()
    }

    /// Record that a room was reached by the search frontier but not
    /// explored, so callers and path reconstruction can detect partial
    /// results.
    pub fn mark_truncated(&mut self, room: RoomCoord) {
        self.truncated.insert(room);
    }

    /// Whether the given room was truncated.
    pub fn is_truncated(&self, room: RoomCoord) -> bool {
        self.truncated.contains(&room)
    }

    /// Rooms the search enumerated but did not explore.
    pub fn truncated_rooms(&self) -> impl Iterator<Item = RoomCoord> + '_ {
        self.truncated.iter().copied()
    }
}
