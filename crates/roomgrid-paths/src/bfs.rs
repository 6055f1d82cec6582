//! Multiroom breadth-first flood fill.

use std::collections::{HashSet, VecDeque};

use roomgrid_core::{Direction, Pos, UNREACHED};

use crate::engine::SearchContext;
use crate::limits::SearchLimits;
use crate::provider::CostProvider;
use crate::query::DistanceMapResult;

/// Compute a multi-source BFS distance map.
///
/// Every step costs 1 regardless of the cost-matrix value, so this is the
/// right engine when the matrix is effectively binary
/// (passable/impassable). Cells are visited in strict distance order via a
/// FIFO frontier. Starts inside impassable cells are skipped.
pub fn bfs_distance_map<P: CostProvider>(
    starts: &[Pos],
    provider: &P,
    limits: SearchLimits,
) -> DistanceMapResult {
    let (ctx, _) = bfs_flood(starts, None, false, provider, limits);
    let incomplete = ctx.budget_exhausted || ctx.field.truncated_rooms().next().is_some();
    DistanceMapResult {
        field: ctx.field,
        ops: ctx.ops,
        incomplete,
    }
}

/// The flood shared by [`bfs_distance_map`] and the BFS-backed path query.
///
/// With `goals` set, the flood stops once a goal is dequeued (`need_all =
/// false`) or once every goal has been dequeued (`need_all = true`).
/// Returns the context and the goals reached, in the order they were
/// reached.
pub(crate) fn bfs_flood<'a, P: CostProvider>(
    starts: &[Pos],
    goals: Option<&[Pos]>,
    need_all: bool,
    provider: &'a P,
    limits: SearchLimits,
) -> (SearchContext<'a, P>, Vec<Pos>) {
    let mut ctx = SearchContext::new(provider, limits, starts);
    let mut queue: VecDeque<Pos> = VecDeque::new();
    let mut remaining: HashSet<Pos> = goals.map(|g| g.iter().copied().collect()).unwrap_or_default();
    let mut reached = Vec::new();

    for &start in starts {
        if ctx.field.get(start) != UNREACHED || !ctx.passable(start) {
            continue;
        }
        ctx.field.set(start, 0);
        queue.push_back(start);
        if !ctx.count_tile() {
            return (ctx, reached);
        }
    }

    'search: while let Some(current) = queue.pop_front() {
        let dist = ctx.field.get(current);

        if remaining.remove(&current) {
            reached.push(current);
            if !need_all || remaining.is_empty() {
                break;
            }
        }

        if !ctx.count_op() {
            break;
        }

        for dir in Direction::ALL {
            let Some((next, _)) = ctx.step(current, dir) else {
                continue;
            };
            if ctx.field.get(next) != UNREACHED {
                continue;
            }
            let next_dist = dist + 1;
            if !ctx.within_cost(next_dist) {
                continue;
            }
            ctx.field.set(next, next_dist);
            queue.push_back(next);
            if !ctx.count_tile() {
                break 'search;
            }
        }
    }

    (ctx, reached)
}
