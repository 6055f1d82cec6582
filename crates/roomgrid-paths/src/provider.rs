//! The cost-provider boundary and its per-query memoization.

use std::collections::HashMap;

use roomgrid_core::{CostMatrix, RoomCoord};

/// Supplies the cost matrix for a room on demand.
///
/// Returning `None` marks the room as not traversable at all — the engines
/// treat it exactly like an all-impassable matrix, never like "unset, use
/// zero cost".
///
/// Implemented for any `Fn(RoomCoord) -> Option<CostMatrix>`.
pub trait CostProvider {
    /// The cost matrix for `room`, or `None` if the room cannot be entered.
    fn cost_matrix(&self, room: RoomCoord) -> Option<CostMatrix>;
}

impl<F> CostProvider for F
where
    F: Fn(RoomCoord) -> Option<CostMatrix>,
{
    fn cost_matrix(&self, room: RoomCoord) -> Option<CostMatrix> {
        self(room)
    }
}

/// Per-query memoization of a [`CostProvider`].
///
/// The provider is invoked at most once per distinct room; repeated lookups
/// (including "room is not traversable" results) come from the cache. The
/// cache lives for one query. A caller may keep one alive across queries as
/// an opt-in optimization, but entries are append-only and never
/// invalidated, so that reuse is the caller's responsibility.
pub struct RoomCache<'a, P: CostProvider + ?Sized> {
    provider: &'a P,
    rooms: HashMap<RoomCoord, Option<CostMatrix>>,
}

impl<'a, P: CostProvider + ?Sized> RoomCache<'a, P> {
    /// Wrap a provider.
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            rooms: HashMap::new(),
        }
    }

    /// The matrix for `room`, fetching it from the provider on first use.
    pub fn get(&mut self, room: RoomCoord) -> Option<&CostMatrix> {
        let provider = self.provider;
        self.rooms
            .entry(room)
            .or_insert_with(|| provider.cost_matrix(room))
            .as_ref()
    }

    /// Whether `room` has already been fetched.
    pub fn contains(&self, room: RoomCoord) -> bool {
        self.rooms.contains_key(&room)
    }

    /// Number of rooms fetched so far (traversable or not).
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Whether no rooms have been fetched.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
