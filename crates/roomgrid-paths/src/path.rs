//! Path reconstruction by steepest descent.

use roomgrid_core::{Direction, MultiroomDistanceField, MultiroomMonoFlowField, Pos, UNREACHED};

use std::collections::HashSet;

use crate::flow::corner_open;

/// Reconstruction failures.
///
/// [`Unreachable`](ReconstructError::Unreachable) is an ordinary outcome
/// (the tile was never reached); the other variants mean the field or flow
/// handed in is internally inconsistent and should never occur for maps
/// produced by this crate's engines.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReconstructError {
    /// The starting tile has no distance; no path exists in this field.
    #[error("no path: {0} was not reached by the distance map")]
    Unreachable(Pos),
    /// A tile with a nonzero distance has no descending neighbor.
    #[error("inconsistent distance map: no descent from {pos} at distance {distance}")]
    Stuck {
        /// Where the descent stalled.
        pos: Pos,
        /// The distance recorded there.
        distance: u32,
    },
    /// Following the flow revisited a tile.
    #[error("inconsistent flow field: cycle through {0}")]
    Cycle(Pos),
    /// A flow direction pointed off the addressable room plane.
    #[error("inconsistent flow field: direction at {0} leaves the plane")]
    OffPlane(Pos),
}

/// Walk a distance field downhill from `from` to a zero-distance origin.
///
/// Each step moves to the adjacent tile with the smallest distance, ties
/// broken in canonical direction order, so the result is deterministic for
/// a given field. The returned path runs from `from` to the origin,
/// inclusive. Distances strictly decrease along it, which also bounds the
/// walk; a tile with no strictly smaller neighbor is reported as
/// [`ReconstructError::Stuck`].
pub fn path_to_origin(
    field: &MultiroomDistanceField,
    from: Pos,
) -> Result<Vec<Pos>, ReconstructError> {
    let mut dist = field.get(from);
    if dist == UNREACHED {
        return Err(ReconstructError::Unreachable(from));
    }

    let mut path = vec![from];
    let mut cur = from;
    while dist > 0 {
        let mut best: Option<(u32, Pos)> = None;
        for dir in Direction::ALL {
            let Some(next) = cur.step(dir) else { continue };
            if !corner_open(field, cur, dir) {
                continue;
            }
            let next_dist = field.get(next);
            if next_dist < dist && best.is_none_or(|(d, _)| next_dist < d) {
                best = Some((next_dist, next));
            }
        }
        let Some((next_dist, next)) = best else {
            log::warn!("distance map inconsistent: no descent from {cur} at {dist}");
            return Err(ReconstructError::Stuck {
                pos: cur,
                distance: dist,
            });
        };
        path.push(next);
        cur = next;
        dist = next_dist;
    }
    Ok(path)
}

/// Follow a mono flow field from `from` until a tile without a direction.
///
/// Terminating tiles are origins by construction, but a hand-built or
/// corrupted flow can loop; revisiting any tile is reported as
/// [`ReconstructError::Cycle`].
pub fn path_via_mono(
    flow: &MultiroomMonoFlowField,
    from: Pos,
) -> Result<Vec<Pos>, ReconstructError> {
    let mut path = vec![from];
    let mut visited: HashSet<Pos> = HashSet::from([from]);
    let mut cur = from;
    while let Some(dir) = flow.get(cur) {
        let Some(next) = cur.step(dir) else {
            log::warn!("flow field inconsistent: {dir} at {cur} leaves the plane");
            return Err(ReconstructError::OffPlane(cur));
        };
        if !visited.insert(next) {
            log::warn!("flow field inconsistent: cycle through {next}");
            return Err(ReconstructError::Cycle(next));
        }
        path.push(next);
        cur = next;
    }
    Ok(path)
}
