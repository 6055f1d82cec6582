//! The high-level query facade.
//!
//! Validates inputs once, dispatches to the chosen engine, and normalizes
//! the outcome: environmental conditions (budget exhaustion, unreachable
//! goals) come back as results with `incomplete` set, contract violations
//! (no starts, no goals, unbounded limits, a goal shape an engine cannot
//! take) fail fast as [`QueryError`]s, and internal inconsistencies from
//! path reconstruction surface as their own variant rather than being
//! silently absorbed.

use roomgrid_core::{MultiroomDistanceField, Pos};

use crate::astar::{AstarOptions, Frontier, astar_path};
use crate::bfs::{bfs_distance_map, bfs_flood};
use crate::dijkstra::{dijkstra_distance_map, dijkstra_flood};
use crate::jps::jps_path;
use crate::limits::SearchLimits;
use crate::path::{ReconstructError, path_to_origin};
use crate::provider::CostProvider;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Outcome of a distance-map query.
#[derive(Clone, Debug)]
pub struct DistanceMapResult {
    /// Best-known distances for every room the search explored.
    pub field: MultiroomDistanceField,
    /// Node expansions consumed.
    pub ops: usize,
    /// `true` when a budget stopped the search before the frontier was
    /// exhausted; the field is still valid, just partial.
    pub incomplete: bool,
}

/// Outcome of a path query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathResult {
    /// Tile-by-tile path including both endpoints; empty when nothing was
    /// reachable at all.
    pub path: Vec<Pos>,
    /// Accumulated cost of the path (step count for BFS).
    pub cost: u32,
    /// Node expansions consumed.
    pub ops: usize,
    /// `true` when the goal condition was not met; the path then leads to
    /// the most promising tile reached instead.
    pub incomplete: bool,
}

// ---------------------------------------------------------------------------
// Query shapes
// ---------------------------------------------------------------------------

/// What a path query is trying to reach.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GoalSpec {
    /// One goal tile.
    Single(Pos),
    /// Reaching any one of these tiles completes the query.
    AnyOf(Vec<Pos>),
    /// The query is complete only once every tile has been reached; the
    /// returned path leads to the goal reached last.
    AllOf(Vec<Pos>),
}

impl GoalSpec {
    /// The goal tiles, regardless of shape.
    pub fn positions(&self) -> &[Pos] {
        match self {
            GoalSpec::Single(p) => std::slice::from_ref(p),
            GoalSpec::AnyOf(v) | GoalSpec::AllOf(v) => v,
        }
    }

    /// Whether every goal must be reached.
    pub fn requires_all(&self) -> bool {
        matches!(self, GoalSpec::AllOf(_))
    }
}

/// Engine selection for [`distance_map`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MapAlgorithm {
    /// Uniform step costs, strict distance order.
    #[default]
    Bfs,
    /// Honors cost-matrix weights.
    Dijkstra,
}

/// Engine selection for [`path`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PathAlgorithm {
    /// Flood with uniform step costs, then descend.
    Bfs,
    /// Flood with weighted costs, then descend.
    Dijkstra,
    /// Goal-directed search; the default.
    AStar {
        /// Open-list implementation.
        frontier: Frontier,
        /// Chebyshev heuristic multiplier; `1.0` keeps paths optimal.
        heuristic_weight: f64,
    },
    /// Jump Point Search. Single start and single goal only.
    Jps,
}

impl Default for PathAlgorithm {
    fn default() -> Self {
        PathAlgorithm::AStar {
            frontier: Frontier::Heap,
            heuristic_weight: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Contract violations and internal failures.
///
/// Never used for "the goal happens to be unreachable" — that is an
/// ordinary incomplete result.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// No start positions were given.
    #[error("at least one start position is required")]
    EmptyStarts,
    /// The goal list was empty.
    #[error("at least one goal position is required")]
    EmptyGoals,
    /// Every limit was `None`; a multiroom flood must be bounded.
    #[error("unbounded query: set at least one search limit")]
    Unbounded,
    /// The chosen engine cannot take this start/goal shape.
    #[error("jump point search requires a single start and a single goal")]
    UnsupportedShape,
    /// Path reconstruction found the engine's own output inconsistent.
    #[error(transparent)]
    Inconsistent(#[from] ReconstructError),
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

fn validate(starts: &[Pos], limits: &SearchLimits) -> Result<(), QueryError> {
    if starts.is_empty() {
        return Err(QueryError::EmptyStarts);
    }
    if limits.is_unbounded() {
        return Err(QueryError::Unbounded);
    }
    Ok(())
}

/// Compute a distance map from `starts` over everything the limits admit.
pub fn distance_map<P: CostProvider>(
    starts: &[Pos],
    provider: &P,
    limits: SearchLimits,
    algorithm: MapAlgorithm,
) -> Result<DistanceMapResult, QueryError> {
    validate(starts, &limits)?;
    Ok(match algorithm {
        MapAlgorithm::Bfs => bfs_distance_map(starts, provider, limits),
        MapAlgorithm::Dijkstra => dijkstra_distance_map(starts, provider, limits),
    })
}

/// Find a path from any of `starts` to `goals`.
pub fn path<P: CostProvider>(
    starts: &[Pos],
    goals: &GoalSpec,
    provider: &P,
    limits: SearchLimits,
    algorithm: PathAlgorithm,
) -> Result<PathResult, QueryError> {
    validate(starts, &limits)?;
    if goals.positions().is_empty() {
        return Err(QueryError::EmptyGoals);
    }

    match algorithm {
        PathAlgorithm::AStar {
            frontier,
            heuristic_weight,
        } => Ok(astar_path(
            starts,
            goals.positions(),
            AstarOptions {
                frontier,
                heuristic_weight,
                need_all: goals.requires_all(),
            },
            provider,
            limits,
        )),
        PathAlgorithm::Jps => match (starts, goals) {
            (&[start], GoalSpec::Single(goal)) => Ok(jps_path(start, *goal, provider, limits)),
            _ => Err(QueryError::UnsupportedShape),
        },
        PathAlgorithm::Bfs => {
            let (ctx, reached) = bfs_flood(
                starts,
                Some(goals.positions()),
                goals.requires_all(),
                provider,
                limits,
            );
            descend(ctx.field, ctx.ops, reached, goals)
        }
        PathAlgorithm::Dijkstra => {
            let (ctx, reached) = dijkstra_flood(
                starts,
                Some(goals.positions()),
                goals.requires_all(),
                provider,
                limits,
            );
            descend(ctx.field, ctx.ops, reached, goals)
        }
    }
}

/// Turn a goal-directed flood into a path by steepest descent back to the
/// nearest start.
fn descend(
    field: MultiroomDistanceField,
    ops: usize,
    reached: Vec<Pos>,
    goals: &GoalSpec,
) -> Result<PathResult, QueryError> {
    let Some(&terminus) = reached.last() else {
        return Ok(PathResult {
            path: Vec::new(),
            cost: 0,
            ops,
            incomplete: true,
        });
    };

    let unique_goals = {
        let mut v = goals.positions().to_vec();
        v.sort_unstable();
        v.dedup();
        v.len()
    };
    let incomplete = goals.requires_all() && reached.len() < unique_goals;

    let cost = field.get(terminus);
    let mut path = path_to_origin(&field, terminus)?;
    path.reverse();
    Ok(PathResult {
        path,
        cost,
        ops,
        incomplete,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomgrid_core::{CostMatrix, IMPASSABLE, RoomCoord, UNREACHED};

    fn pos(name: &str, x: u8, y: u8) -> Pos {
        Pos::new(name.parse().unwrap(), x, y)
    }

    fn open_world() -> impl Fn(RoomCoord) -> Option<CostMatrix> {
        |_| Some(CostMatrix::new())
    }

    fn single_room(matrix: CostMatrix) -> impl Fn(RoomCoord) -> Option<CostMatrix> {
        let home: RoomCoord = "E0S0".parse().unwrap();
        move |room| if room == home { Some(matrix.clone()) } else { None }
    }

    fn bounded() -> SearchLimits {
        SearchLimits::none().with_max_ops(100_000)
    }

    #[test]
    fn contract_violations_fail_fast() {
        let provider = open_world();
        assert_eq!(
            distance_map(&[], &provider, bounded(), MapAlgorithm::Bfs).unwrap_err(),
            QueryError::EmptyStarts
        );
        assert_eq!(
            distance_map(
                &[pos("E0S0", 1, 1)],
                &provider,
                SearchLimits::none(),
                MapAlgorithm::Bfs
            )
            .unwrap_err(),
            QueryError::Unbounded
        );
        assert_eq!(
            path(
                &[pos("E0S0", 1, 1)],
                &GoalSpec::AnyOf(Vec::new()),
                &provider,
                bounded(),
                PathAlgorithm::default()
            )
            .unwrap_err(),
            QueryError::EmptyGoals
        );
    }

    #[test]
    fn jps_rejects_multi_goal_shapes() {
        let provider = open_world();
        let err = path(
            &[pos("E0S0", 1, 1)],
            &GoalSpec::AnyOf(vec![pos("E0S0", 5, 5), pos("E0S0", 9, 9)]),
            &provider,
            bounded(),
            PathAlgorithm::Jps,
        )
        .unwrap_err();
        assert_eq!(err, QueryError::UnsupportedShape);
    }

    #[test]
    fn adjacent_tiles_cost_one_step() {
        let provider = single_room(CostMatrix::new());
        let result = path(
            &[pos("E0S0", 25, 25)],
            &GoalSpec::Single(pos("E0S0", 26, 25)),
            &provider,
            bounded(),
            PathAlgorithm::default(),
        )
        .unwrap();
        assert!(!result.incomplete);
        assert_eq!(result.cost, 1);
        assert_eq!(result.path, vec![pos("E0S0", 25, 25), pos("E0S0", 26, 25)]);
    }

    #[test]
    fn crosses_between_diagonal_rooms() {
        let provider = open_world();
        let start = pos("W1N1", 25, 25);
        let goal = pos("W2N2", 25, 25);
        for algorithm in [
            PathAlgorithm::default(),
            PathAlgorithm::Jps,
            PathAlgorithm::Bfs,
            PathAlgorithm::Dijkstra,
        ] {
            let result = path(
                &[start],
                &GoalSpec::Single(goal),
                &provider,
                bounded(),
                algorithm,
            )
            .unwrap();
            assert!(!result.incomplete, "{algorithm:?} incomplete");
            assert_eq!(result.cost, 50, "{algorithm:?} cost");
            assert_eq!(result.path.first(), Some(&start));
            assert_eq!(result.path.last(), Some(&goal));
            for pair in result.path.windows(2) {
                assert!(pair[0].is_adjacent(pair[1]), "{algorithm:?} path broken");
            }
        }
    }

    #[test]
    fn walled_in_goal_is_incomplete_not_an_error() {
        let mut m = CostMatrix::new();
        for (x, y) in [(29, 9), (30, 9), (31, 9), (29, 10), (31, 10), (29, 11), (30, 11), (31, 11)]
        {
            m.set(x, y, IMPASSABLE);
        }
        let provider = single_room(m);
        let result = path(
            &[pos("E0S0", 10, 10)],
            &GoalSpec::Single(pos("E0S0", 30, 10)),
            &provider,
            bounded(),
            PathAlgorithm::Bfs,
        )
        .unwrap();
        assert!(result.incomplete);
        assert!(result.path.is_empty());
        assert_eq!(result.cost, 0);
    }

    #[test]
    fn bfs_and_dijkstra_paths_agree_on_uniform_cost() {
        let provider = single_room(CostMatrix::new());
        let start = [pos("E0S0", 5, 5)];
        let goal = GoalSpec::Single(pos("E0S0", 44, 30));
        let bfs = path(&start, &goal, &provider, bounded(), PathAlgorithm::Bfs).unwrap();
        let dijkstra =
            path(&start, &goal, &provider, bounded(), PathAlgorithm::Dijkstra).unwrap();
        assert_eq!(bfs.cost, dijkstra.cost);
        assert_eq!(bfs.path.len(), dijkstra.path.len());
    }

    #[test]
    fn all_of_goals_flag_partial_success() {
        let mut m = CostMatrix::new();
        // Second goal is boxed in.
        for (x, y) in [(39, 39), (40, 39), (41, 39), (39, 40), (41, 40), (39, 41), (40, 41), (41, 41)]
        {
            m.set(x, y, IMPASSABLE);
        }
        let provider = single_room(m);
        let result = path(
            &[pos("E0S0", 10, 10)],
            &GoalSpec::AllOf(vec![pos("E0S0", 20, 10), pos("E0S0", 40, 40)]),
            &provider,
            bounded(),
            PathAlgorithm::Dijkstra,
        )
        .unwrap();
        assert!(result.incomplete);
        // Still leads to the goal that was reachable.
        assert_eq!(result.path.last(), Some(&pos("E0S0", 20, 10)));
    }

    #[test]
    fn mono_flow_walk_through_a_corridor_room() {
        use crate::flow::to_mono_flow_field;
        use crate::path::path_via_mono;

        // W2N1 is an L-shaped corridor linking W1N1 to W2N2; W1N2 is solid
        // and the shared corner is fully walled, so every route funnels
        // through the corridor.
        let mut corridor = CostMatrix::new_with_value(IMPASSABLE);
        for i in 0..50 {
            corridor.set(i, 25, 0);
            corridor.set(25, i, 0);
        }
        let provider = move |room: RoomCoord| match room.to_string().as_str() {
            "W1N1" | "W2N2" => Some(CostMatrix::new()),
            "W2N1" => Some(corridor.clone()),
            "W1N2" => Some(CostMatrix::new_with_value(IMPASSABLE)),
            _ => None,
        };

        let source = pos("W2N2", 25, 25);
        let start = pos("W1N1", 25, 25);
        let map = distance_map(&[source], &provider, bounded(), MapAlgorithm::Bfs).unwrap();
        assert!(!map.incomplete);
        // 25 west, 1 crossing, 23 west, 1 corner cut at the junction,
        // 24 north, 1 crossing, 24 north.
        assert_eq!(map.field.get(start), 99);

        let mono = to_mono_flow_field(&map.field);
        let walked = path_via_mono(&mono, start).unwrap();
        assert_eq!(walked.len(), 100);
        assert_eq!(walked.first(), Some(&start));
        assert_eq!(walked.last(), Some(&source));
        let corridor_room: RoomCoord = "W2N1".parse().unwrap();
        assert!(walked.iter().any(|p| p.room() == corridor_room));
        for pair in walked.windows(2) {
            assert!(pair[0].is_adjacent(pair[1]));
        }
    }

    #[test]
    fn larger_budgets_reach_supersets() {
        let provider = open_world();
        let starts = [pos("E0S0", 25, 25)];
        let small = distance_map(
            &starts,
            &provider,
            SearchLimits::none().with_max_ops(100),
            MapAlgorithm::Bfs,
        )
        .unwrap();
        let large = distance_map(
            &starts,
            &provider,
            SearchLimits::none().with_max_ops(1_000),
            MapAlgorithm::Bfs,
        )
        .unwrap();
        let room: RoomCoord = "E0S0".parse().unwrap();
        let small_room = small.field.room(room).unwrap();
        let large_room = large.field.room(room).unwrap();
        for ((x, y), dist) in small_room.enumerate() {
            if dist != UNREACHED {
                assert_eq!(large_room.get(x, y), dist, "regressed at ({x},{y})");
            }
        }
    }
}
