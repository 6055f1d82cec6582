//! Shared search machinery: room admission, cost lookups, step validation
//! and budget accounting.
//!
//! Every engine goes through [`SearchContext`] so the cost semantics, the
//! diagonal corner rule and the limit checks are enforced identically
//! regardless of which algorithm the caller picked.

use std::collections::HashSet;

use roomgrid_core::{Direction, IMPASSABLE, MultiroomDistanceField, Pos, RoomCoord};

use crate::limits::SearchLimits;
use crate::provider::{CostProvider, RoomCache};

/// Effective cost of a cell whose matrix value is `0` (unset).
pub(crate) const DEFAULT_COST: u32 = 1;

/// Per-query search state shared by all engines.
pub(crate) struct SearchContext<'a, P: CostProvider> {
    cache: RoomCache<'a, P>,
    limits: SearchLimits,
    start_rooms: Vec<RoomCoord>,
    entered: HashSet<RoomCoord>,
    /// The distance field under construction.
    pub field: MultiroomDistanceField,
    /// Node expansions consumed so far.
    pub ops: usize,
    tiles: usize,
    /// Set when the ops or tile budget ran out and the search stopped early.
    pub budget_exhausted: bool,
}

impl<'a, P: CostProvider> SearchContext<'a, P> {
    pub(crate) fn new(provider: &'a P, limits: SearchLimits, starts: &[Pos]) -> Self {
        Self {
            cache: RoomCache::new(provider),
            limits,
            start_rooms: starts.iter().map(|p| p.room()).collect(),
            entered: HashSet::new(),
            field: MultiroomDistanceField::new(),
            ops: 0,
            tiles: 0,
            budget_exhausted: false,
        }
    }

    /// Whether the search may enter `room`.
    ///
    /// Rooms the provider declines are simply not traversable — an
    /// environment condition, never truncation. Only traversable rooms
    /// that a limit blocks are recorded as truncated on the field, so the
    /// provider is consulted first.
    pub(crate) fn room_admitted(&mut self, room: RoomCoord) -> bool {
        if self.entered.contains(&room) {
            return true;
        }
        if self.cache.get(room).is_none() {
            return false;
        }
        if let Some(max_dist) = self.limits.max_room_distance {
            let dist = self
                .start_rooms
                .iter()
                .map(|s| s.chebyshev_distance(room))
                .min()
                .unwrap_or(0);
            if dist > max_dist {
                self.field.mark_truncated(room);
                return false;
            }
        }
        if let Some(max_rooms) = self.limits.max_rooms {
            if self.entered.len() >= max_rooms {
                self.field.mark_truncated(room);
                return false;
            }
        }
        self.entered.insert(room);
        true
    }

    /// Effective cost of entering `pos`, or `None` if the cell or its room
    /// is impassable. Matrix values of `0` fall back to [`DEFAULT_COST`];
    /// the impassable sentinel is treated as infinite.
    pub(crate) fn cost_at(&mut self, pos: Pos) -> Option<u32> {
        if !self.room_admitted(pos.room()) {
            return None;
        }
        let cost = self.cache.get(pos.room())?.get_linear(pos.linear());
        match cost {
            IMPASSABLE => None,
            0 => Some(DEFAULT_COST),
            c => Some(c as u32),
        }
    }

    /// Whether `pos` can be occupied at all.
    pub(crate) fn passable(&mut self, pos: Pos) -> bool {
        self.cost_at(pos).is_some()
    }

    /// Validate one step out of `from` and return the target cell with its
    /// entry cost.
    ///
    /// Applies the shared corner rule: a diagonal step is rejected when
    /// both orthogonal cells forming the corner are impassable.
    pub(crate) fn step(&mut self, from: Pos, dir: Direction) -> Option<(Pos, u32)> {
        let to = from.step(dir)?;
        let cost = self.cost_at(to)?;
        if dir.is_diagonal() && !self.corner_open(from, dir) {
            return None;
        }
        Some((to, cost))
    }

    fn corner_open(&mut self, from: Pos, dir: Direction) -> bool {
        let (dx, dy) = dir.delta();
        let along_x = Direction::from_delta(dx, 0).expect("diagonal has an x component");
        let along_y = Direction::from_delta(0, dy).expect("diagonal has a y component");
        let x_blocked = from.step(along_x).is_none_or(|p| !self.passable(p));
        let y_blocked = from.step(along_y).is_none_or(|p| !self.passable(p));
        !(x_blocked && y_blocked)
    }

    /// Count one node expansion. Returns `false` once the ops budget is
    /// spent; the engine must stop expanding.
    pub(crate) fn count_op(&mut self) -> bool {
        self.ops += 1;
        if let Some(max_ops) = self.limits.max_ops {
            if self.ops >= max_ops {
                log::debug!("search stopped: ops budget ({max_ops}) exhausted");
                self.budget_exhausted = true;
                return false;
            }
        }
        true
    }

    /// Count one freshly reached tile. Returns `false` once the tile
    /// budget is spent.
    pub(crate) fn count_tile(&mut self) -> bool {
        self.tiles += 1;
        if let Some(max_tiles) = self.limits.max_tiles {
            if self.tiles >= max_tiles {
                log::debug!("search stopped: tile budget ({max_tiles}) exhausted");
                self.budget_exhausted = true;
                return false;
            }
        }
        true
    }

    /// Whether an accumulated cost is still inside the path-length ceiling.
    pub(crate) fn within_cost(&self, g: u32) -> bool {
        self.limits
            .max_path_length
            .is_none_or(|max| g as usize <= max)
    }
}
