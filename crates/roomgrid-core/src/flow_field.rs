//! Flow fields derived from distance fields.
//!
//! A [`FlowField`] stores, per tile, the full set of outbound directions
//! that descend the source distance field, as a bitmask in canonical
//! direction order. A [`MonoFlowField`] keeps exactly one direction per
//! tile. Both are read-only once derived and independent of the source
//! field's lifetime.

use std::collections::HashMap;

use crate::direction::Direction;
use crate::position::Pos;
use crate::room::RoomCoord;
use crate::{ROOM_AREA, ROOM_SIZE};

#[inline]
fn linear(x: u8, y: u8) -> usize {
    assert!(x < ROOM_SIZE && y < ROOM_SIZE, "tile ({x},{y}) out of range");
    x as usize * ROOM_SIZE as usize + y as usize
}

/// Per-room flow field: each tile holds a bitmask of viable outbound
/// directions (bit *n* = `Direction::ALL[n]`).
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowField {
    masks: Vec<u8>,
}

impl FlowField {
    /// All tiles empty (no viable direction).
    pub fn new() -> Self {
        Self {
            masks: vec![0; ROOM_AREA],
        }
    }

    /// The direction bitmask at `(x, y)`.
    #[inline]
    pub fn get(&self, x: u8, y: u8) -> u8 {
        self.masks[linear(x, y)]
    }

    /// Replace the bitmask at `(x, y)`.
    #[inline]
    pub fn set(&mut self, x: u8, y: u8, mask: u8) {
        self.masks[linear(x, y)] = mask;
    }

    /// Add one direction to the tile's mask.
    #[inline]
    pub fn add(&mut self, x: u8, y: u8, dir: Direction) {
        self.masks[linear(x, y)] |= dir.bit();
    }

    /// Whether the tile lists `dir`.
    #[inline]
    pub fn has(&self, x: u8, y: u8, dir: Direction) -> bool {
        self.get(x, y) & dir.bit() != 0
    }

    /// The directions listed at `(x, y)`, in canonical order.
    pub fn directions(&self, x: u8, y: u8) -> impl Iterator<Item = Direction> + '_ {
        let mask = self.get(x, y);
        Direction::ALL
            .into_iter()
            .filter(move |d| mask & d.bit() != 0)
    }
}

impl Default for FlowField {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FlowField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let set = self.masks.iter().filter(|&&m| m != 0).count();
        write!(f, "FlowField({set} tiles set)")
    }
}

/// Per-room mono flow field: at most one direction per tile.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonoFlowField {
    // 0 = none, 1..=8 = canonical direction index + 1.
    dirs: Vec<u8>,
}

impl MonoFlowField {
    /// All tiles unset.
    pub fn new() -> Self {
        Self {
            dirs: vec![0; ROOM_AREA],
        }
    }

    /// The direction at `(x, y)`, if any.
    #[inline]
    pub fn get(&self, x: u8, y: u8) -> Option<Direction> {
        match self.dirs[linear(x, y)] {
            0 => None,
            n => Some(Direction::from_index(n as usize - 1)),
        }
    }

    /// Set or clear the direction at `(x, y)`.
    #[inline]
    pub fn set(&mut self, x: u8, y: u8, dir: Option<Direction>) {
        self.dirs[linear(x, y)] = match dir {
            None => 0,
            Some(d) => d.index() as u8 + 1,
        };
    }
}

impl Default for MonoFlowField {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MonoFlowField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let set = self.dirs.iter().filter(|&&d| d != 0).count();
        write!(f, "MonoFlowField({set} tiles set)")
    }
}

impl PartialEq for MonoFlowField {
    fn eq(&self, other: &Self) -> bool {
        self.dirs == other.dirs
    }
}

impl Eq for MonoFlowField {}

/// A [`FlowField`] per room.
#[derive(Clone, Debug, Default)]
pub struct MultiroomFlowField {
    maps: HashMap<RoomCoord, FlowField>,
}

impl MultiroomFlowField {
    /// An empty field.
    pub fn new() -> Self {
        Self::default()
    }

    /// The direction bitmask at a position; `0` for unvisited rooms.
    pub fn get(&self, pos: Pos) -> u8 {
        self.maps
            .get(&pos.room())
            .map(|f| f.get(pos.x(), pos.y()))
            .unwrap_or(0)
    }

    /// The directions listed at a position, in canonical order.
    pub fn directions(&self, pos: Pos) -> Vec<Direction> {
        let mask = self.get(pos);
        Direction::ALL
            .into_iter()
            .filter(|d| mask & d.bit() != 0)
            .collect()
    }

    /// The field for one room, created on demand.
    pub fn room_mut(&mut self, room: RoomCoord) -> &mut FlowField {
        self.maps.entry(room).or_default()
    }

    /// The field for one room, if present.
    pub fn room(&self, room: RoomCoord) -> Option<&FlowField> {
        self.maps.get(&room)
    }

    /// Rooms with a field.
    pub fn rooms(&self) -> impl Iterator<Item = RoomCoord> + '_ {
        self.maps.keys().copied()
    }
}

/// A [`MonoFlowField`] per room.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MultiroomMonoFlowField {
    maps: HashMap<RoomCoord, MonoFlowField>,
}

impl MultiroomMonoFlowField {
    /// An empty field.
    pub fn new() -> Self {
        Self::default()
    }

    /// The direction at a position, `None` for unvisited rooms and origins.
    pub fn get(&self, pos: Pos) -> Option<Direction> {
        self.maps
            .get(&pos.room())
            .and_then(|f| f.get(pos.x(), pos.y()))
    }

    /// The field for one room, created on demand.
    pub fn room_mut(&mut self, room: RoomCoord) -> &mut MonoFlowField {
        self.maps.entry(room).or_default()
    }

    /// The field for one room, if present.
    pub fn room(&self, room: RoomCoord) -> Option<&MonoFlowField> {
        self.maps.get(&room)
    }

    /// Rooms with a field.
    pub fn rooms(&self) -> impl Iterator<Item = RoomCoord> + '_ {
        self.maps.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmask_round_trip() {
        let mut field = FlowField::new();
        field.add(10, 10, Direction::N);
        field.add(10, 10, Direction::SW);
        assert!(field.has(10, 10, Direction::N));
        assert!(field.has(10, 10, Direction::SW));
        assert!(!field.has(10, 10, Direction::E));
        let dirs: Vec<_> = field.directions(10, 10).collect();
        assert_eq!(dirs, vec![Direction::N, Direction::SW]);
    }

    #[test]
    fn mono_round_trip() {
        let mut field = MonoFlowField::new();
        assert_eq!(field.get(5, 5), None);
        for d in Direction::ALL {
            field.set(5, 5, Some(d));
            assert_eq!(field.get(5, 5), Some(d));
        }
        field.set(5, 5, None);
        assert_eq!(field.get(5, 5), None);
    }

    #[test]
    fn debug_reports_set_tiles() {
        let mut field = MonoFlowField::new();
        field.set(1, 1, Some(Direction::N));
        assert_eq!(format!("{field:?}"), "MonoFlowField(1 tiles set)");

        let mut flow = MultiroomFlowField::new();
        flow.room_mut("E0S0".parse().unwrap()).add(2, 2, Direction::SE);
        assert!(format!("{flow:?}").contains("FlowField(1 tiles set)"));
    }

    #[test]
    fn multiroom_defaults() {
        let field = MultiroomFlowField::new();
        let pos = Pos::new("E0S0".parse().unwrap(), 1, 1);
        assert_eq!(field.get(pos), 0);

        let mono = MultiroomMonoFlowField::new();
        assert_eq!(mono.get(pos), None);
    }
}
