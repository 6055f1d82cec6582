//! Jump Point Search over multiroom grids.
//!
//! A* whose successor step scans straight rays instead of expanding every
//! neighbor, so open terrain generates far fewer nodes. A ray stops (and
//! yields a jump point) at:
//!
//! - the goal,
//! - a cell with a forced neighbor (a wall makes a detour locally optimal),
//! - a room border tile, so room transitions are always explicit nodes,
//! - a change in terrain cost, which degrades the scan toward plain A*
//!   instead of producing wrong costs on non-uniform terrain.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use roomgrid_core::{Direction, Pos};

use crate::engine::SearchContext;
use crate::limits::SearchLimits;
use crate::provider::CostProvider;
use crate::query::PathResult;

#[derive(Copy, Clone)]
struct Node {
    g: u32,
    parent: Option<Pos>,
}

#[derive(Copy, Clone, PartialEq, Eq)]
struct OpenEntry {
    f: u32,
    g: u32,
    pos: Pos,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap on f, preferring deeper nodes on ties.
        other
            .f
            .cmp(&self.f)
            .then_with(|| self.g.cmp(&other.g))
            .then_with(|| other.pos.packed().cmp(&self.pos.packed()))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn dir_of(dx: i32, dy: i32) -> Direction {
    Direction::from_delta(dx, dy).expect("unit king-move delta")
}

/// Find a path from `start` to `goal` with Jump Point Search.
///
/// Single start, single goal; the [`query`](crate::query) facade rejects
/// other goal shapes for this engine. Semantics (cost model, corner rule,
/// room transitions, budgets) match [`astar_path`](crate::astar_path); on
/// uniform terrain the returned cost is the same, though the tiles visited
/// may differ.
pub fn jps_path<P: CostProvider>(
    start: Pos,
    goal: Pos,
    provider: &P,
    limits: SearchLimits,
) -> PathResult {
    let mut ctx = SearchContext::new(provider, limits, &[start]);

    if !ctx.passable(start) || !ctx.passable(goal) {
        return PathResult {
            path: Vec::new(),
            cost: 0,
            ops: ctx.ops,
            incomplete: true,
        };
    }
    if start == goal {
        return PathResult {
            path: vec![start],
            cost: 0,
            ops: ctx.ops,
            incomplete: false,
        };
    }

    let mut nodes: HashMap<Pos, Node> = HashMap::new();
    let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();
    nodes.insert(start, Node { g: 0, parent: None });
    open.push(OpenEntry {
        f: start.chebyshev_distance(goal),
        g: 0,
        pos: start,
    });

    let mut best: Option<(u32, Pos)> = None;
    let mut found = false;
    // Set when the path-length ceiling pruned a jump, so a dry frontier
    // means "cut short", not "no path".
    let mut length_limited = false;

    while let Some(OpenEntry { g, pos, .. }) = open.pop() {
        let node = nodes[&pos];
        if g != node.g {
            continue;
        }
        if pos == goal {
            found = true;
            break;
        }
        if !ctx.count_op() {
            break;
        }

        let h_here = pos.chebyshev_distance(goal);
        if best.is_none_or(|(best_h, _)| h_here < best_h) {
            best = Some((h_here, pos));
        }

        for dir in successor_dirs(&mut ctx, pos, node.parent) {
            let Some((jp, ray_cost)) = jump(&mut ctx, pos, dir, goal) else {
                continue;
            };
            let next_g = node.g + ray_cost;
            if !ctx.within_cost(next_g) {
                length_limited = true;
                continue;
            }
            match nodes.get_mut(&jp) {
                Some(existing) => {
                    if next_g >= existing.g {
                        continue;
                    }
                    existing.g = next_g;
                    existing.parent = Some(pos);
                }
                None => {
                    nodes.insert(
                        jp,
                        Node {
                            g: next_g,
                            parent: Some(pos),
                        },
                    );
                    if !ctx.count_tile() {
                        return partial(&ctx, &nodes, best, length_limited);
                    }
                }
            }
            open.push(OpenEntry {
                f: next_g + jp.chebyshev_distance(goal),
                g: next_g,
                pos: jp,
            });
        }
    }

    if found {
        PathResult {
            path: interpolate(&nodes, goal),
            cost: nodes[&goal].g,
            ops: ctx.ops,
            incomplete: false,
        }
    } else {
        partial(&ctx, &nodes, best, length_limited)
    }
}

fn partial<P: CostProvider>(
    ctx: &SearchContext<'_, P>,
    nodes: &HashMap<Pos, Node>,
    best: Option<(u32, Pos)>,
    length_limited: bool,
) -> PathResult {
    // A partial path is only meaningful when a limit cut the search short;
    // a frontier that ran dry means no path exists at all.
    let limited = ctx.budget_exhausted || length_limited;
    let (path, cost) = match best {
        Some((_, pos)) if limited => (interpolate(nodes, pos), nodes[&pos].g),
        _ => (Vec::new(), 0),
    };
    PathResult {
        path,
        cost,
        ops: ctx.ops,
        incomplete: true,
    }
}

/// Directions worth scanning out of `pos`, pruned by the direction of
/// arrival. Room border tiles are expanded in every direction, since the
/// usual pruning argument does not survive a room transition.
fn successor_dirs<P: CostProvider>(
    ctx: &mut SearchContext<'_, P>,
    pos: Pos,
    parent: Option<Pos>,
) -> Vec<Direction> {
    let Some(par) = parent else {
        return Direction::ALL.to_vec();
    };
    if pos.on_room_edge() {
        return Direction::ALL.to_vec();
    }

    let dx = (pos.global_x() - par.global_x()).signum() as i32;
    let dy = (pos.global_y() - par.global_y()).signum() as i32;
    let dir = dir_of(dx, dy);

    let mut blocked = |d: Direction| -> bool {
        pos.step(d).is_none_or(|p| !ctx.passable(p))
    };

    let mut dirs = Vec::with_capacity(5);
    if dir.is_diagonal() {
        // Natural successors: both components, then the diagonal itself.
        dirs.push(dir_of(dx, 0));
        dirs.push(dir_of(0, dy));
        dirs.push(dir);
        if blocked(dir_of(-dx, 0)) {
            dirs.push(dir_of(-dx, dy));
        }
        if blocked(dir_of(0, -dy)) {
            dirs.push(dir_of(dx, -dy));
        }
    } else {
        dirs.push(dir);
        if blocked(dir.rotate(2)) {
            dirs.push(dir.rotate(1));
        }
        if blocked(dir.rotate(-2)) {
            dirs.push(dir.rotate(-1));
        }
    }
    dirs
}

/// Scan a straight ray from `from` in `dir` and return the first jump
/// point with the accumulated cost to reach it, or `None` if the ray dies
/// against a wall or the room plane's edge.
fn jump<P: CostProvider>(
    ctx: &mut SearchContext<'_, P>,
    from: Pos,
    dir: Direction,
    goal: Pos,
) -> Option<(Pos, u32)> {
    let (first, ray_cost) = ctx.step(from, dir)?;
    let mut cur = first;
    let mut total = ray_cost;

    loop {
        if cur == goal || cur.on_room_edge() {
            return Some((cur, total));
        }

        if dir.is_diagonal() {
            if forced_diagonal(ctx, cur, dir) {
                return Some((cur, total));
            }
            let (dx, dy) = dir.delta();
            // A diagonal ray is a jump point if either component ray finds
            // one.
            if jump(ctx, cur, dir_of(dx, 0), goal).is_some()
                || jump(ctx, cur, dir_of(0, dy), goal).is_some()
            {
                return Some((cur, total));
            }
        } else if forced_cardinal(ctx, cur, dir) {
            return Some((cur, total));
        }

        let (next, cost) = ctx.step(cur, dir)?;
        total += cost;
        if cost != ray_cost {
            // Terrain cost changed under the ray: make the next cell a
            // node so A* re-evaluates from there.
            return Some((next, total));
        }
        cur = next;
    }
}

fn forced_diagonal<P: CostProvider>(
    ctx: &mut SearchContext<'_, P>,
    pos: Pos,
    dir: Direction,
) -> bool {
    let (dx, dy) = dir.delta();
    let mut blocked = |d: Direction| pos.step(d).is_none_or(|p| !ctx.passable(p));
    (blocked(dir_of(-dx, 0)) && !blocked(dir_of(-dx, dy)))
        || (blocked(dir_of(0, -dy)) && !blocked(dir_of(dx, -dy)))
}

fn forced_cardinal<P: CostProvider>(
    ctx: &mut SearchContext<'_, P>,
    pos: Pos,
    dir: Direction,
) -> bool {
    let mut blocked = |d: Direction| pos.step(d).is_none_or(|p| !ctx.passable(p));
    (blocked(dir.rotate(2)) && !blocked(dir.rotate(1)))
        || (blocked(dir.rotate(-2)) && !blocked(dir.rotate(-1)))
}

/// Expand the jump-point chain into a tile-by-tile path. Every segment
/// between consecutive jump points is a straight king-move ray, so simple
/// signum stepping recovers the exact tiles.
fn interpolate(nodes: &HashMap<Pos, Node>, end: Pos) -> Vec<Pos> {
    let mut waypoints = vec![end];
    let mut cur = end;
    while let Some(parent) = nodes[&cur].parent {
        waypoints.push(parent);
        cur = parent;
    }
    waypoints.reverse();

    let mut path = vec![waypoints[0]];
    for pair in waypoints.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let mut cur = from;
        while cur != to {
            let dx = (to.global_x() - cur.global_x()).signum() as i32;
            let dy = (to.global_y() - cur.global_y()).signum() as i32;
            match cur.step(dir_of(dx, dy)) {
                Some(next) => cur = next,
                // Parent chains only link reachable cells; bail rather
                // than loop if that ever breaks.
                None => break,
            }
            path.push(cur);
        }
    }
    path
}
