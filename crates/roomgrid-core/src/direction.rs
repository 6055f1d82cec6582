//! The eight compass directions.
//!
//! The canonical clockwise order `N, NE, E, SE, S, SW, W, NW` is load-bearing:
//! it fixes the bit assignment in [`FlowField`](crate::FlowField) masks and
//! the tie-break order used when deriving a
//! [`MonoFlowField`](crate::MonoFlowField).

use std::fmt;

/// A compass direction on the grid. `N` points toward decreasing y,
/// `E` toward increasing x.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Direction {
    N = 0,
    NE = 1,
    E = 2,
    SE = 3,
    S = 4,
    SW = 5,
    W = 6,
    NW = 7,
}

impl Direction {
    /// All eight directions in canonical clockwise order.
    pub const ALL: [Direction; 8] = [
        Direction::N,
        Direction::NE,
        Direction::E,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::W,
        Direction::NW,
    ];

    /// The `(dx, dy)` tile offset of one step in this direction.
    #[inline]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::N => (0, -1),
            Direction::NE => (1, -1),
            Direction::E => (1, 0),
            Direction::SE => (1, 1),
            Direction::S => (0, 1),
            Direction::SW => (-1, 1),
            Direction::W => (-1, 0),
            Direction::NW => (-1, -1),
        }
    }

    /// Whether this direction moves along both axes.
    #[inline]
    pub const fn is_diagonal(self) -> bool {
        matches!(
            self,
            Direction::NE | Direction::SE | Direction::SW | Direction::NW
        )
    }

    /// Position in the canonical order, `0..8`.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`index`](Self::index). Panics on values outside `0..8`.
    #[inline]
    pub fn from_index(i: usize) -> Direction {
        Direction::ALL[i]
    }

    /// Single-direction bitmask, `1 << index`, as stored in flow fields.
    #[inline]
    pub const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Rotate by `n` steps of 45°. Positive is clockwise.
    #[inline]
    pub fn rotate(self, n: i8) -> Direction {
        Direction::ALL[(self as i8 + n).rem_euclid(8) as usize]
    }

    /// The opposite direction.
    #[inline]
    pub fn opposite(self) -> Direction {
        self.rotate(4)
    }

    /// Direction from one tile offset, or `None` for `(0, 0)` or non-unit
    /// offsets.
    pub fn from_delta(dx: i32, dy: i32) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|d| d.delta() == (dx, dy))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::N => "N",
            Direction::NE => "NE",
            Direction::E => "E",
            Direction::SE => "SE",
            Direction::S => "S",
            Direction::SW => "SW",
            Direction::W => "W",
            Direction::NW => "NW",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_order_matches_indices() {
        for (i, d) in Direction::ALL.into_iter().enumerate() {
            assert_eq!(d.index(), i);
            assert_eq!(Direction::from_index(i), d);
            assert_eq!(d.bit(), 1 << i);
        }
    }

    #[test]
    fn rotation_wraps() {
        assert_eq!(Direction::N.rotate(1), Direction::NE);
        assert_eq!(Direction::N.rotate(-1), Direction::NW);
        assert_eq!(Direction::NW.rotate(2), Direction::NE);
        assert_eq!(Direction::SE.rotate(8), Direction::SE);
        assert_eq!(Direction::E.opposite(), Direction::W);
        assert_eq!(Direction::SW.opposite(), Direction::NE);
    }

    #[test]
    fn delta_round_trip() {
        for d in Direction::ALL {
            let (dx, dy) = d.delta();
            assert_eq!(Direction::from_delta(dx, dy), Some(d));
        }
        assert_eq!(Direction::from_delta(0, 0), None);
        assert_eq!(Direction::from_delta(2, 0), None);
    }

    #[test]
    fn diagonals() {
        assert!(Direction::NE.is_diagonal());
        assert!(!Direction::N.is_diagonal());
        let diagonal_count = Direction::ALL.iter().filter(|d| d.is_diagonal()).count();
        assert_eq!(diagonal_count, 4);
    }
}
