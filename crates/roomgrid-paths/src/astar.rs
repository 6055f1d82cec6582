//! Multiroom A* search.
//!
//! - multi-source, multi-goal (any-of or all-of)
//! - Chebyshev heuristic scaled by a configurable weight
//! - two open-list implementations behind [`Frontier`]: a binary heap and
//!   a bucketed numeric frontier indexed by f-score
//! - lazy deletion: superseded open entries are skipped when popped
//! - when a limit cuts the search short, returns the partial path to the
//!   expanded node closest to a goal by heuristic

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use roomgrid_core::{Direction, Pos};

use crate::engine::SearchContext;
use crate::limits::SearchLimits;
use crate::provider::CostProvider;
use crate::query::PathResult;

/// Open-list flavor for [`astar_path`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Frontier {
    /// A binary heap keyed on f-score. The safe default for any cost range.
    #[default]
    Heap,
    /// Buckets indexed by f-score, LIFO within a bucket. Constant-time
    /// push/pop, but allocates one bucket per distinct f-score, so it suits
    /// searches whose total cost stays small.
    Buckets,
}

/// Tuning knobs for [`astar_path`].
#[derive(Copy, Clone, Debug)]
pub struct AstarOptions {
    /// Open-list implementation.
    pub frontier: Frontier,
    /// Multiplier applied to the Chebyshev heuristic. `1.0` is admissible
    /// and yields optimal paths; larger values trade optimality for fewer
    /// expansions.
    pub heuristic_weight: f64,
    /// When `true`, the search keeps going until every goal has been
    /// reached (all-of); otherwise the first goal reached ends it (any-of).
    pub need_all: bool,
}

impl Default for AstarOptions {
    fn default() -> Self {
        Self {
            frontier: Frontier::Heap,
            heuristic_weight: 1.0,
            need_all: false,
        }
    }
}

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
        // Min-heap on f; ties prefer the deeper node (larger g), which
        // matters a lot under the Chebyshev heuristic's large tie plateaus.
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

enum OpenList {
    Heap(BinaryHeap<OpenEntry>),
    Buckets {
        buckets: Vec<Vec<(u32, Pos)>>,
        cursor: usize,
    },
}

impl OpenList {
    fn new(frontier: Frontier) -> Self {
        match frontier {
            Frontier::Heap => OpenList::Heap(BinaryHeap::new()),
            Frontier::Buckets => OpenList::Buckets {
                buckets: Vec::new(),
                cursor: 0,
            },
        }
    }

    fn push(&mut self, f: u32, g: u32, pos: Pos) {
        match self {
            OpenList::Heap(heap) => heap.push(OpenEntry { f, g, pos }),
            OpenList::Buckets { buckets, cursor } => {
                let idx = f as usize;
                if idx >= buckets.len() {
                    buckets.resize_with(idx + 1, Vec::new);
                }
                buckets[idx].push((g, pos));
                // A weighted heuristic can produce entries below the
                // cursor; move it back so they are not skipped.
                if idx < *cursor {
                    *cursor = idx;
                }
            }
        }
    }

    fn pop(&mut self) -> Option<(u32, Pos)> {
        match self {
            OpenList::Heap(heap) => heap.pop().map(|e| (e.g, e.pos)),
            OpenList::Buckets { buckets, cursor } => {
                while *cursor < buckets.len() {
                    if let Some(entry) = buckets[*cursor].pop() {
                        return Some(entry);
                    }
                    *cursor += 1;
                }
                None
            }
        }
    }
}

/// Find a path from any of `starts` to the goal set.
///
/// Starts inside impassable cells are skipped. When a limit stops the
/// search before a goal is reached, the result is marked incomplete and
/// carries the partial path to the most promising expanded node; `cost`
/// is that node's accumulated cost. When the frontier runs dry instead
/// (no path exists), the result is incomplete with an empty path.
pub fn astar_path<P: CostProvider>(
    starts: &[Pos],
    goals: &[Pos],
    options: AstarOptions,
    provider: &P,
    limits: SearchLimits,
) -> PathResult {
    let mut ctx = SearchContext::new(provider, limits, starts);
    let mut nodes: HashMap<Pos, Node> = HashMap::new();
    let mut open = OpenList::new(options.frontier);
    let mut remaining: Vec<Pos> = goals.to_vec();
    let weight = options.heuristic_weight;

    let h = |remaining: &[Pos], pos: Pos| -> u32 {
        let dist = remaining
            .iter()
            .map(|g| pos.chebyshev_distance(*g))
            .min()
            .unwrap_or(0);
        (dist as f64 * weight).round() as u32
    };

    for &start in starts {
        if nodes.contains_key(&start) || !ctx.passable(start) {
            continue;
        }
        nodes.insert(start, Node { g: 0, parent: None });
        open.push(h(&remaining, start), 0, start);
        if !ctx.count_tile() {
            return partial_result(&ctx, &nodes, None, false);
        }
    }

    // The expanded node closest to a goal, kept for partial results.
    let mut best: Option<(u32, Pos)> = None;
    let mut terminus: Option<Pos> = None;
    // Set when the path-length ceiling pruned a step, so a dry frontier
    // means "cut short", not "no path".
    let mut length_limited = false;

    while let Some((entry_g, pos)) = open.pop() {
        let node = nodes[&pos];
        if entry_g != node.g {
            continue; // superseded by a cheaper route
        }

        if let Some(idx) = remaining.iter().position(|g| *g == pos) {
            remaining.swap_remove(idx);
            terminus = Some(pos);
            if !options.need_all || remaining.is_empty() {
                break;
            }
        }

        if !ctx.count_op() {
            break;
        }

        let h_here = h(&remaining, pos);
        if best.is_none_or(|(best_h, _)| h_here < best_h) {
            best = Some((h_here, pos));
        }

        for dir in Direction::ALL {
            let Some((next, cost)) = ctx.step(pos, dir) else {
                continue;
            };
            let next_g = node.g + cost;
            if !ctx.within_cost(next_g) {
                length_limited = true;
                continue;
            }
            match nodes.get_mut(&next) {
                Some(existing) => {
                    if next_g >= existing.g {
                        continue;
                    }
                    existing.g = next_g;
                    existing.parent = Some(pos);
                }
                None => {
                    nodes.insert(
                        next,
                        Node {
                            g: next_g,
                            parent: Some(pos),
                        },
                    );
                    if !ctx.count_tile() {
                        return finish(
                            &ctx,
                            &nodes,
                            terminus,
                            &remaining,
                            options.need_all,
                            length_limited,
                            best,
                        );
                    }
                }
            }
            open.push(next_g + h(&remaining, next), next_g, next);
        }
    }

    finish(
        &ctx,
        &nodes,
        terminus,
        &remaining,
        options.need_all,
        length_limited,
        best,
    )
}

fn finish<P: CostProvider>(
    ctx: &SearchContext<'_, P>,
    nodes: &HashMap<Pos, Node>,
    terminus: Option<Pos>,
    remaining: &[Pos],
    need_all: bool,
    length_limited: bool,
    best: Option<(u32, Pos)>,
) -> PathResult {
    match terminus {
        // Any-of searches are complete once one goal is settled; all-of
        // searches that stall still report the path to the last goal
        // reached, flagged incomplete.
        Some(end) => PathResult {
            path: rebuild(nodes, end),
            cost: nodes[&end].g,
            ops: ctx.ops,
            incomplete: need_all && !remaining.is_empty(),
        },
        None => partial_result(ctx, nodes, best, length_limited),
    }
}

fn partial_result<P: CostProvider>(
    ctx: &SearchContext<'_, P>,
    nodes: &HashMap<Pos, Node>,
    best: Option<(u32, Pos)>,
    length_limited: bool,
) -> PathResult {
    // A partial path is only meaningful when a limit cut the search short;
    // a frontier that ran dry means no path exists at all.
    let limited = ctx.budget_exhausted || length_limited;
    let (path, cost) = match best {
        Some((_, pos)) if limited => (rebuild(nodes, pos), nodes[&pos].g),
        _ => (Vec::new(), 0),
    };
    PathResult {
        path,
        cost,
        ops: ctx.ops,
        incomplete: true,
    }
}

fn rebuild(nodes: &HashMap<Pos, Node>, end: Pos) -> Vec<Pos> {
    let mut path = vec![end];
    let mut cur = end;
    while let Some(parent) = nodes[&cur].parent {
        path.push(parent);
        cur = parent;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomgrid_core::{CostMatrix, IMPASSABLE, RoomCoord};

    fn pos(name: &str, x: u8, y: u8) -> Pos {
        Pos::new(name.parse().unwrap(), x, y)
    }

    fn open_world() -> impl Fn(RoomCoord) -> Option<CostMatrix> {
        |_| Some(CostMatrix::new())
    }

    fn bounded() -> SearchLimits {
        SearchLimits::none().with_max_ops(100_000)
    }

    fn assert_contiguous(path: &[Pos]) {
        for pair in path.windows(2) {
            assert!(
                pair[0].is_adjacent(pair[1]),
                "non-adjacent step {:?} -> {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn straight_line_in_one_room() {
        let provider = open_world();
        let result = astar_path(
            &[pos("E0S0", 25, 25)],
            &[pos("E0S0", 30, 25)],
            AstarOptions::default(),
            &provider,
            bounded(),
        );
        assert!(!result.incomplete);
        assert_eq!(result.cost, 5);
        assert_eq!(result.path.len(), 6);
        assert_contiguous(&result.path);
    }

    #[test]
    fn adjacent_goal_costs_one() {
        let provider = open_world();
        let result = astar_path(
            &[pos("E0S0", 25, 25)],
            &[pos("E0S0", 26, 25)],
            AstarOptions::default(),
            &provider,
            bounded(),
        );
        assert!(!result.incomplete);
        assert_eq!(result.cost, 1);
        assert_eq!(result.path, vec![pos("E0S0", 25, 25), pos("E0S0", 26, 25)]);
    }

    #[test]
    fn start_equals_goal() {
        let provider = open_world();
        let result = astar_path(
            &[pos("E0S0", 10, 10)],
            &[pos("E0S0", 10, 10)],
            AstarOptions::default(),
            &provider,
            bounded(),
        );
        assert!(!result.incomplete);
        assert_eq!(result.cost, 0);
        assert_eq!(result.path, vec![pos("E0S0", 10, 10)]);
    }

    #[test]
    fn crosses_rooms_diagonally_at_corners() {
        let provider = open_world();
        let result = astar_path(
            &[pos("W1N1", 25, 25)],
            &[pos("W2N2", 25, 25)],
            AstarOptions::default(),
            &provider,
            bounded(),
        );
        assert!(!result.incomplete);
        assert_contiguous(&result.path);
        // Optimal cost equals the global Chebyshev distance on open terrain.
        assert_eq!(
            result.cost,
            pos("W1N1", 25, 25).chebyshev_distance(pos("W2N2", 25, 25))
        );
        let rooms: std::collections::HashSet<_> = result.path.iter().map(|p| p.room()).collect();
        assert!(rooms.contains(&"W1N1".parse().unwrap()));
        assert!(rooms.contains(&"W2N2".parse().unwrap()));
    }

    #[test]
    fn walks_around_walls() {
        let mut m = CostMatrix::new();
        for y in 0..40 {
            m.set(25, y, IMPASSABLE);
        }
        let home: RoomCoord = "E0S0".parse().unwrap();
        let provider = move |room: RoomCoord| if room == home { Some(m.clone()) } else { None };
        let result = astar_path(
            &[pos("E0S0", 20, 10)],
            &[pos("E0S0", 30, 10)],
            AstarOptions::default(),
            &provider,
            bounded(),
        );
        assert!(!result.incomplete);
        assert_contiguous(&result.path);
        assert!(result.path.iter().all(|p| p.x() != 25 || p.y() >= 40));
        assert!(result.cost > 10);
    }

    #[test]
    fn blocked_goal_is_incomplete_not_an_error() {
        let mut m = CostMatrix::new();
        // Box in the goal.
        for (x, y) in [(29, 9), (30, 9), (31, 9), (29, 10), (31, 10), (29, 11), (30, 11), (31, 11)]
        {
            m.set(x, y, IMPASSABLE);
        }
        let home: RoomCoord = "E0S0".parse().unwrap();
        let provider = move |room: RoomCoord| if room == home { Some(m.clone()) } else { None };
        let result = astar_path(
            &[pos("E0S0", 10, 10)],
            &[pos("E0S0", 30, 10)],
            AstarOptions::default(),
            &provider,
            bounded(),
        );
        assert!(result.incomplete);
        // No limit tripped: there simply is no path, so none is reported.
        assert!(result.path.is_empty());
        assert_eq!(result.cost, 0);
    }

    #[test]
    fn impassable_goal_yields_empty_path() {
        let mut m = CostMatrix::new();
        m.set(30, 10, IMPASSABLE);
        let home: RoomCoord = "E0S0".parse().unwrap();
        let provider = move |room: RoomCoord| if room == home { Some(m.clone()) } else { None };
        let result = astar_path(
            &[pos("E0S0", 10, 10)],
            &[pos("E0S0", 30, 10)],
            AstarOptions::default(),
            &provider,
            bounded(),
        );
        assert!(result.incomplete);
        assert!(result.path.is_empty());
        assert_eq!(result.cost, 0);
    }

    #[test]
    fn any_of_picks_nearest_goal() {
        let provider = open_world();
        let result = astar_path(
            &[pos("E0S0", 10, 10)],
            &[pos("E0S0", 40, 40), pos("E0S0", 12, 10)],
            AstarOptions::default(),
            &provider,
            bounded(),
        );
        assert!(!result.incomplete);
        assert_eq!(result.cost, 2);
        assert_eq!(result.path.last(), Some(&pos("E0S0", 12, 10)));
    }

    #[test]
    fn all_of_visits_every_goal() {
        let provider = open_world();
        let result = astar_path(
            &[pos("E0S0", 10, 10)],
            &[pos("E0S0", 15, 10), pos("E0S0", 20, 10)],
            AstarOptions {
                need_all: true,
                ..AstarOptions::default()
            },
            &provider,
            bounded(),
        );
        assert!(!result.incomplete);
        // Terminus is the goal settled last; with both on a line that is
        // the farther one.
        assert_eq!(result.path.last(), Some(&pos("E0S0", 20, 10)));
    }

    #[test]
    fn frontiers_agree_on_cost() {
        let mut m = CostMatrix::new();
        for y in 5..45 {
            m.set(25, y, IMPASSABLE);
        }
        let home: RoomCoord = "E0S0".parse().unwrap();
        let provider = move |room: RoomCoord| if room == home { Some(m.clone()) } else { None };
        let start = [pos("E0S0", 20, 25)];
        let goal = [pos("E0S0", 30, 25)];
        let heap = astar_path(&start, &goal, AstarOptions::default(), &provider, bounded());
        let buckets = astar_path(
            &start,
            &goal,
            AstarOptions {
                frontier: Frontier::Buckets,
                ..AstarOptions::default()
            },
            &provider,
            bounded(),
        );
        assert!(!heap.incomplete);
        assert!(!buckets.incomplete);
        assert_eq!(heap.cost, buckets.cost);
        assert_contiguous(&buckets.path);
    }

    #[test]
    fn ops_budget_yields_partial_path() {
        let provider = open_world();
        let result = astar_path(
            &[pos("E0S0", 25, 25)],
            &[pos("E0S0", 45, 25)],
            AstarOptions::default(),
            &provider,
            SearchLimits::none().with_max_ops(5),
        );
        assert!(result.incomplete);
        assert!(result.ops <= 5);
        // Partial path starts at the start and heads toward the goal.
        assert_eq!(result.path.first(), Some(&pos("E0S0", 25, 25)));
        assert_contiguous(&result.path);
    }

    #[test]
    fn path_length_ceiling_yields_partial_path() {
        let provider = open_world();
        let result = astar_path(
            &[pos("E0S0", 25, 25)],
            &[pos("E0S0", 45, 25)],
            AstarOptions::default(),
            &provider,
            SearchLimits::none().with_max_path_length(5),
        );
        assert!(result.incomplete);
        assert!(!result.path.is_empty());
        assert!(result.cost <= 5);
        assert_contiguous(&result.path);
    }

    #[test]
    fn weighted_heuristic_still_reaches_goal() {
        let provider = open_world();
        let result = astar_path(
            &[pos("E0S0", 5, 5)],
            &[pos("E0S0", 45, 45)],
            AstarOptions {
                heuristic_weight: 2.5,
                ..AstarOptions::default()
            },
            &provider,
            bounded(),
        );
        assert!(!result.incomplete);
        assert_eq!(result.path.last(), Some(&pos("E0S0", 45, 45)));
        assert_contiguous(&result.path);
    }
}
