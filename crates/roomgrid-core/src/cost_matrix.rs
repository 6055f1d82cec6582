//! Per-room movement-cost grids.

use std::ops::{Index, IndexMut};

use crate::{ROOM_AREA, ROOM_SIZE};

/// Cost value meaning "never traverse". Search engines treat it as infinite,
/// not as a large finite weight.
pub const IMPASSABLE: u8 = 255;

/// Terrain classification of a single tile, as supplied by the host world.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Terrain {
    Plain,
    Swamp,
    Wall,
}

/// Movement costs assigned to each terrain kind when building a matrix.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerrainCosts {
    pub plain: u8,
    pub swamp: u8,
    pub wall: u8,
}

impl Default for TerrainCosts {
    fn default() -> Self {
        Self {
            plain: 1,
            swamp: 5,
            wall: IMPASSABLE,
        }
    }
}

/// A 50×50 grid of per-tile movement costs for one room.
///
/// `0` means "unset, use default"; [`IMPASSABLE`] means the tile can never
/// be traversed. Storage is x-major: linear index `x * 50 + y`.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostMatrix {
    #[cfg_attr(feature = "serde", serde(with = "serde_bytes_array"))]
    bits: [u8; ROOM_AREA],
}

impl CostMatrix {
    /// All cells unset (`0`).
    pub fn new() -> Self {
        Self {
            bits: [0; ROOM_AREA],
        }
    }

    /// All cells filled with `value`.
    pub fn new_with_value(value: u8) -> Self {
        Self {
            bits: [value; ROOM_AREA],
        }
    }

    /// Build a matrix from a terrain lookup in a single pass over the room.
    pub fn from_terrain(lookup: impl Fn(u8, u8) -> Terrain, costs: TerrainCosts) -> Self {
        let mut matrix = Self::new();
        for x in 0..ROOM_SIZE {
            for y in 0..ROOM_SIZE {
                let cost = match lookup(x, y) {
                    Terrain::Plain => costs.plain,
                    Terrain::Swamp => costs.swamp,
                    Terrain::Wall => costs.wall,
                };
                matrix.set(x, y, cost);
            }
        }
        matrix
    }

    /// Cost at `(x, y)`. Panics on out-of-range coordinates.
    #[inline]
    pub fn get(&self, x: u8, y: u8) -> u8 {
        assert!(x < ROOM_SIZE && y < ROOM_SIZE, "tile ({x},{y}) out of range");
        self.bits[x as usize * ROOM_SIZE as usize + y as usize]
    }

    /// Set the cost at `(x, y)`. Panics on out-of-range coordinates.
    #[inline]
    pub fn set(&mut self, x: u8, y: u8, value: u8) {
        assert!(x < ROOM_SIZE && y < ROOM_SIZE, "tile ({x},{y}) out of range");
        self.bits[x as usize * ROOM_SIZE as usize + y as usize] = value;
    }

    /// Cost by linear index, no bounds re-check beyond the slice's own.
    #[inline]
    pub fn get_linear(&self, index: usize) -> u8 {
        self.bits[index]
    }

    /// Overlay another matrix onto this one. Overlay cells of `0` defer to
    /// the base; nonzero cells replace it. Lets callers layer obstruction
    /// costs over raw terrain.
    pub fn merge(&mut self, overlay: &CostMatrix) {
        for (base, &over) in self.bits.iter_mut().zip(overlay.bits.iter()) {
            if over != 0 {
                *base = over;
            }
        }
    }
}

impl Default for CostMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<usize> for CostMatrix {
    type Output = u8;

    fn index(&self, index: usize) -> &u8 {
        &self.bits[index]
    }
}

impl IndexMut<usize> for CostMatrix {
    fn index_mut(&mut self, index: usize) -> &mut u8 {
        &mut self.bits[index]
    }
}

impl std::fmt::Debug for CostMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let set = self.bits.iter().filter(|&&c| c != 0).count();
        write!(f, "CostMatrix({set} cells set)")
    }
}

// Serde for the fixed-size cost array: serialize as a plain byte sequence.
#[cfg(feature = "serde")]
mod serde_bytes_array {
    use super::ROOM_AREA;

    pub fn serialize<S: serde::Serializer>(
        bits: &[u8; ROOM_AREA],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serde::Serialize::serialize(bits.as_slice(), serializer)
    }

    pub fn deserialize<'de, D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<[u8; ROOM_AREA], D::Error> {
        let vec: Vec<u8> = serde::Deserialize::deserialize(deserializer)?;
        vec.try_into()
            .map_err(|_| serde::de::Error::custom("cost matrix must have 2500 cells"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_set_round_trip() {
        let mut m = CostMatrix::new();
        assert_eq!(m.get(25, 25), 0);
        m.set(25, 25, 7);
        assert_eq!(m.get(25, 25), 7);
        m.set(0, 49, IMPASSABLE);
        assert_eq!(m.get(0, 49), IMPASSABLE);
        assert_eq!(m.get_linear(49), IMPASSABLE);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn rejects_out_of_range_get() {
        let m = CostMatrix::new();
        let _ = m.get(50, 0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn rejects_out_of_range_set() {
        let mut m = CostMatrix::new();
        m.set(0, 50, 1);
    }

    #[test]
    fn from_terrain_fills_every_cell() {
        let m = CostMatrix::from_terrain(
            |x, _| if x == 0 { Terrain::Wall } else { Terrain::Swamp },
            TerrainCosts::default(),
        );
        assert_eq!(m.get(0, 10), IMPASSABLE);
        assert_eq!(m.get(1, 10), 5);
        assert_eq!(m.get(49, 49), 5);
    }

    #[test]
    fn merge_zero_defers_to_base() {
        let mut base = CostMatrix::new_with_value(2);
        let mut overlay = CostMatrix::new();
        overlay.set(10, 10, 50);
        base.merge(&overlay);
        assert_eq!(base.get(10, 10), 50);
        assert_eq!(base.get(10, 11), 2);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let mut m = CostMatrix::new();
        m.set(3, 4, 9);
        let json = serde_json::to_string(&m).unwrap();
        let back: CostMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(3, 4), 9);
        assert_eq!(back.get(0, 0), 0);
    }
}
