//! The position codec: one tile in the infinite room plane.

use std::fmt;

use crate::direction::Direction;
use crate::room::RoomCoord;
use crate::{ROOM_AREA, ROOM_SIZE};

const MAX_TILE: i32 = ROOM_SIZE as i32 - 1;

/// A tile position: a room coordinate plus a local tile coordinate in
/// `0..50` on each axis.
///
/// Local coordinates are always in bounds; the constructor rejects anything
/// else. Positions pack losslessly into a `u64` key suitable for hash maps.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pos {
    room: RoomCoord,
    x: u8,
    y: u8,
}

impl Pos {
    /// Create a position. Panics if `x` or `y` is outside `0..50`
    /// (a caller contract violation, never silently wrapped).
    pub fn new(room: RoomCoord, x: u8, y: u8) -> Self {
        assert!(x < ROOM_SIZE, "tile x {x} out of range");
        assert!(y < ROOM_SIZE, "tile y {y} out of range");
        Self { room, x, y }
    }

    /// The room this tile belongs to.
    #[inline]
    pub fn room(self) -> RoomCoord {
        self.room
    }

    /// Local x coordinate, `0..50`.
    #[inline]
    pub fn x(self) -> u8 {
        self.x
    }

    /// Local y coordinate, `0..50`.
    #[inline]
    pub fn y(self) -> u8 {
        self.y
    }

    /// Linear index of the local tile, x-major: `x * 50 + y`.
    #[inline]
    pub fn linear(self) -> usize {
        self.x as usize * ROOM_SIZE as usize + self.y as usize
    }

    /// Pack into a `u64` key: room key in the high 32 bits, linear tile
    /// index in the low bits. A total bijection over the valid domain.
    #[inline]
    pub fn packed(self) -> u64 {
        ((self.room.packed() as u64) << 32) | self.linear() as u64
    }

    /// Inverse of [`packed`](Self::packed).
    pub fn from_packed(key: u64) -> Self {
        let linear = (key & 0xffff_ffff) as usize;
        debug_assert!(linear < ROOM_AREA, "corrupt position key {key:#x}");
        Self {
            room: RoomCoord::from_packed((key >> 32) as u32),
            x: (linear / ROOM_SIZE as usize) as u8,
            y: (linear % ROOM_SIZE as usize) as u8,
        }
    }

    /// Global tile x, in a common 50-tiles-per-room coordinate space.
    #[inline]
    pub fn global_x(self) -> i64 {
        self.room.x as i64 * ROOM_SIZE as i64 + self.x as i64
    }

    /// Global tile y.
    #[inline]
    pub fn global_y(self) -> i64 {
        self.room.y as i64 * ROOM_SIZE as i64 + self.y as i64
    }

    /// Chebyshev distance in tiles, computed across room boundaries.
    pub fn chebyshev_distance(self, other: Pos) -> u32 {
        let dx = self.global_x().abs_diff(other.global_x());
        let dy = self.global_y().abs_diff(other.global_y());
        dx.max(dy) as u32
    }

    /// Whether `other` is one step away (including diagonals).
    #[inline]
    pub fn is_adjacent(self, other: Pos) -> bool {
        self.chebyshev_distance(other) == 1
    }

    /// Whether `other` is within `range` tiles (Chebyshev).
    #[inline]
    pub fn in_range(self, other: Pos, range: u32) -> bool {
        self.chebyshev_distance(other) <= range
    }

    /// Whether this tile lies on a room border.
    #[inline]
    pub fn on_room_edge(self) -> bool {
        self.x == 0 || self.x == ROOM_SIZE - 1 || self.y == 0 || self.y == ROOM_SIZE - 1
    }

    /// Move one tile in `dir`, handling room transitions.
    ///
    /// Cardinal moves off a room border enter the adjacent room with the
    /// edge tiles mapped 1:1 (exit `x = 49` becomes entry `x = 0`, and so
    /// on). Diagonal moves may only leave a room at the exact corner, where
    /// they enter the diagonal neighbor's corner tile; a diagonal that
    /// would cross a border anywhere else is blocked.
    ///
    /// Returns `None` for blocked moves and for room coordinates that would
    /// leave the packable range.
    pub fn step(self, dir: Direction) -> Option<Pos> {
        let (dx, dy) = dir.delta();
        let nx = self.x as i32 + dx;
        let ny = self.y as i32 + dy;

        let crosses_x = !(0..=MAX_TILE).contains(&nx);
        let crosses_y = !(0..=MAX_TILE).contains(&ny);

        if !crosses_x && !crosses_y {
            return Some(Pos {
                room: self.room,
                x: nx as u8,
                y: ny as u8,
            });
        }

        if dir.is_diagonal() && !(crosses_x && crosses_y) {
            // Only the exact corner admits a diagonal room transition.
            return None;
        }

        let room = self.room.offset(
            if crosses_x { dx } else { 0 },
            if crosses_y { dy } else { 0 },
        )?;
        Some(Pos {
            room,
            x: nx.rem_euclid(ROOM_SIZE as i32) as u8,
            y: ny.rem_euclid(ROOM_SIZE as i32) as u8,
        })
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{} {}]", self.x, self.y, self.room)
    }
}
