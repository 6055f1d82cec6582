//! Search budgets.

/// Budgets that bound a single search.
///
/// Exceeding any configured limit stops the search and marks the result
/// incomplete; it is never an error. Queries through the
/// [`query`](crate::query) facade must set at least one limit, since a
/// multiroom flood with no bound would explore every room the provider
/// admits.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchLimits {
    /// Maximum node expansions.
    pub max_ops: Option<usize>,
    /// Maximum tiles assigned a distance.
    pub max_tiles: Option<usize>,
    /// Maximum distinct traversable rooms entered.
    pub max_rooms: Option<usize>,
    /// Maximum Chebyshev room distance from the nearest start room.
    pub max_room_distance: Option<u32>,
    /// Maximum accumulated path cost.
    pub max_path_length: Option<usize>,
}

impl SearchLimits {
    /// No limits set. Rejected by the query facade; usable directly with
    /// the engines when the caller bounds exploration some other way.
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether every limit is unset.
    pub fn is_unbounded(&self) -> bool {
        self.max_ops.is_none()
            && self.max_tiles.is_none()
            && self.max_rooms.is_none()
            && self.max_room_distance.is_none()
            && self.max_path_length.is_none()
    }

    /// Set `max_ops`.
    pub fn with_max_ops(mut self, n: usize) -> Self {
        self.max_ops = Some(n);
        self
    }

    /// Set `max_tiles`.
    pub fn with_max_tiles(mut self, n: usize) -> Self {
        self.max_tiles = Some(n);
        self
    }

    /// Set `max_rooms`.
    pub fn with_max_rooms(mut self, n: usize) -> Self {
        self.max_rooms = Some(n);
        self
    }

    /// Set `max_room_distance`.
    pub fn with_max_room_distance(mut self, n: u32) -> Self {
        self.max_room_distance = Some(n);
        self
    }

    /// Set `max_path_length`.
    pub fn with_max_path_length(mut self, n: usize) -> Self {
        self.max_path_length = Some(n);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_detection() {
        assert!(SearchLimits::none().is_unbounded());
        assert!(!SearchLimits::none().with_max_ops(100).is_unbounded());
        assert!(!SearchLimits::none().with_max_room_distance(1).is_unbounded());
    }

    #[test]
    fn builder_sets_fields() {
        let limits = SearchLimits::none()
            .with_max_ops(10)
            .with_max_tiles(20)
            .with_max_rooms(3)
            .with_max_room_distance(2)
            .with_max_path_length(99);
        assert_eq!(limits.max_ops, Some(10));
        assert_eq!(limits.max_tiles, Some(20));
        assert_eq!(limits.max_rooms, Some(3));
        assert_eq!(limits.max_room_distance, Some(2));
        assert_eq!(limits.max_path_length, Some(99));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let limits = SearchLimits::none()
            .with_max_ops(10)
            .with_max_room_distance(2);
        let json = serde_json::to_string(&limits).unwrap();
        let back: SearchLimits = serde_json::from_str(&json).unwrap();
        assert_eq!(back, limits);
    }
}
