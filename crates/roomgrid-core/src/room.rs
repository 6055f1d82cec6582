//! Signed room coordinates and the `[WE]\d+[NS]\d+` naming grammar.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error returned when a room name does not match the
/// `[WE]\d+[NS]\d+` grammar or falls outside the packable coordinate range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid room name `{name}`")]
pub struct RoomNameError {
    name: String,
}

impl RoomNameError {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
        }
    }

    /// The offending input.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A room's location in the world plane.
///
/// The naming convention maps `E{n}` to `x = n`, `W{n}` to `x = -n-1`,
/// `S{n}` to `y = n` and `N{n}` to `y = -n-1`, so `E0S0` is the room at
/// the origin and `W0N0` its diagonal neighbor at `(-1, -1)`.
///
/// Coordinates are kept within `i16` range so a `RoomCoord` packs losslessly
/// into a `u32` (and a full tile position into a `u64`).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoomCoord {
    pub x: i32,
    pub y: i32,
}

impl RoomCoord {
    /// Create a new room coordinate. Panics if either axis falls outside
    /// `i16` range (a caller contract violation).
    pub fn new(x: i32, y: i32) -> Self {
        assert!(
            x >= i16::MIN as i32 && x <= i16::MAX as i32,
            "room x {x} out of range"
        );
        assert!(
            y >= i16::MIN as i32 && y <= i16::MAX as i32,
            "room y {y} out of range"
        );
        Self { x, y }
    }

    /// Pack into a `u32` key. Invertible via [`from_packed`](Self::from_packed).
    #[inline]
    pub fn packed(self) -> u32 {
        ((self.x as i16 as u16 as u32) << 16) | (self.y as i16 as u16 as u32)
    }

    /// Inverse of [`packed`](Self::packed).
    #[inline]
    pub fn from_packed(key: u32) -> Self {
        Self {
            x: (key >> 16) as u16 as i16 as i32,
            y: key as u16 as i16 as i32,
        }
    }

    /// The room shifted by `(dx, dy)` rooms, or `None` if the result leaves
    /// the packable coordinate range.
    pub fn offset(self, dx: i32, dy: i32) -> Option<RoomCoord> {
        let x = self.x + dx;
        let y = self.y + dy;
        if x < i16::MIN as i32 || x > i16::MAX as i32 || y < i16::MIN as i32 || y > i16::MAX as i32
        {
            return None;
        }
        Some(Self { x, y })
    }

    /// Chebyshev distance to another room, in rooms.
    #[inline]
    pub fn chebyshev_distance(self, other: RoomCoord) -> u32 {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        dx.max(dy)
    }

    /// The room name, e.g. `E3S7` or `W0N12`.
    pub fn name(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RoomCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (ew, xn) = if self.x >= 0 {
            ('E', self.x)
        } else {
            ('W', -self.x - 1)
        };
        let (ns, yn) = if self.y >= 0 {
            ('S', self.y)
        } else {
            ('N', -self.y - 1)
        };
        write!(f, "{ew}{xn}{ns}{yn}")
    }
}

impl FromStr for RoomCoord {
    type Err = RoomNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || RoomNameError::new(s);
        let mut chars = s.chars();

        let ew = chars.next().ok_or_else(err)?;
        if ew != 'E' && ew != 'W' {
            return Err(err());
        }

        let rest = chars.as_str();
        let split = rest
            .find(|c| c == 'N' || c == 'S')
            .filter(|&i| i > 0)
            .ok_or_else(err)?;
        let (x_digits, rest) = rest.split_at(split);
        let ns = rest.chars().next().ok_or_else(err)?;
        let y_digits = &rest[1..];

        if y_digits.is_empty()
            || !x_digits.bytes().all(|b| b.is_ascii_digit())
            || !y_digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(err());
        }

        let xn: i32 = x_digits.parse().map_err(|_| err())?;
        let yn: i32 = y_digits.parse().map_err(|_| err())?;

        let x = if ew == 'E' { xn } else { -xn - 1 };
        let y = if ns == 'S' { yn } else { -yn - 1 };

        if x < i16::MIN as i32 || x > i16::MAX as i32 || y < i16::MIN as i32 || y > i16::MAX as i32
        {
            return Err(err());
        }

        Ok(Self { x, y })
    }
}
