//! Multiroom Dijkstra flood fill.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use roomgrid_core::{Direction, Pos, UNREACHED};

use crate::engine::SearchContext;
use crate::limits::SearchLimits;
use crate::provider::CostProvider;
use crate::query::DistanceMapResult;

/// Heap entry ordered so the smallest accumulated cost pops first. Ties
/// break on the packed position for deterministic expansion order.
#[derive(Copy, Clone, PartialEq, Eq)]
struct HeapEntry {
    g: u32,
    pos: Pos,
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .g
            .cmp(&self.g)
            .then_with(|| other.pos.packed().cmp(&self.pos.packed()))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compute a multi-source Dijkstra distance map.
///
/// Cost-matrix weights are honored, so distances are accumulated entry
/// costs rather than step counts. On an all-default matrix this agrees
/// with [`bfs_distance_map`](crate::bfs_distance_map) on every reached
/// cell.
pub fn dijkstra_distance_map<P: CostProvider>(
    starts: &[Pos],
    provider: &P,
    limits: SearchLimits,
) -> DistanceMapResult {
    let (ctx, _) = dijkstra_flood(starts, None, false, provider, limits);
    let incomplete = ctx.budget_exhausted || ctx.field.truncated_rooms().next().is_some();
    DistanceMapResult {
        field: ctx.field,
        ops: ctx.ops,
        incomplete,
    }
}

/// The flood shared by [`dijkstra_distance_map`] and the Dijkstra-backed
/// path query. Goal handling matches [`bfs_flood`](crate::bfs::bfs_flood):
/// the flood stops once a goal is settled (`need_all = false`) or once all
/// of them are (`need_all = true`).
pub(crate) fn dijkstra_flood<'a, P: CostProvider>(
    starts: &[Pos],
    goals: Option<&[Pos]>,
    need_all: bool,
    provider: &'a P,
    limits: SearchLimits,
) -> (SearchContext<'a, P>, Vec<Pos>) {
    let mut ctx = SearchContext::new(provider, limits, starts);
    let mut open: BinaryHeap<HeapEntry> = BinaryHeap::new();
    let mut remaining: HashSet<Pos> = goals.map(|g| g.iter().copied().collect()).unwrap_or_default();
    let mut reached = Vec::new();

    for &start in starts {
        if ctx.field.get(start) != UNREACHED || !ctx.passable(start) {
            continue;
        }
        ctx.field.set(start, 0);
        open.push(HeapEntry { g: 0, pos: start });
        if !ctx.count_tile() {
            return (ctx, reached);
        }
    }

    'search: while let Some(HeapEntry { g, pos }) = open.pop() {
        // Stale entry from a later relaxation of the same cell.
        if g > ctx.field.get(pos) {
            continue;
        }

        if remaining.remove(&pos) {
            reached.push(pos);
            if !need_all || remaining.is_empty() {
                break;
            }
        }

        if !ctx.count_op() {
            break;
        }

        for dir in Direction::ALL {
            let Some((next, cost)) = ctx.step(pos, dir) else {
                continue;
            };
            let next_g = g + cost;
            let known = ctx.field.get(next);
            if next_g >= known {
                continue;
            }
            if !ctx.within_cost(next_g) {
                continue;
            }
            if known == UNREACHED && !ctx.count_tile() {
                ctx.field.set(next, next_g);
                break 'search;
            }
            ctx.field.set(next, next_g);
            open.push(HeapEntry { g: next_g, pos: next });
        }
    }

    (ctx, reached)
}
