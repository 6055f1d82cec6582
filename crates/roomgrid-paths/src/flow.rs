//! Flow fields derived from distance maps.
//!
//! Derivation only consults the distance map, not the cost matrices: a
//! direction qualifies when the neighbor's distance is strictly smaller.
//! Unreached cells stand in for walls when applying the diagonal corner
//! rule, which is sound because a fully walled corner leaves both
//! orthogonal cells unreached from the relevant side.

use roomgrid_core::{
    Direction, MultiroomDistanceField, MultiroomFlowField, MultiroomMonoFlowField, Pos, ROOM_SIZE,
    UNREACHED,
};

pub(crate) fn corner_open(field: &MultiroomDistanceField, pos: Pos, dir: Direction) -> bool {
    if !dir.is_diagonal() {
        return true;
    }
    let (dx, dy) = dir.delta();
    let reached = |d: Option<Direction>| -> bool {
        d.and_then(|d| pos.step(d))
            .is_some_and(|p| field.get(p) != UNREACHED)
    };
    reached(Direction::from_delta(dx, 0)) || reached(Direction::from_delta(0, dy))
}

fn for_each_reached(field: &MultiroomDistanceField, mut f: impl FnMut(Pos, u32)) {
    for room in field.rooms() {
        for x in 0..ROOM_SIZE {
            for y in 0..ROOM_SIZE {
                let pos = Pos::new(room, x, y);
                let dist = field.get(pos);
                if dist != UNREACHED {
                    f(pos, dist);
                }
            }
        }
    }
}

/// Derive the full flow field: each reached tile gets a direction bit for
/// every step that strictly decreases distance, so callers can pick among
/// equally good moves (e.g. for traffic spreading).
pub fn to_flow_field(field: &MultiroomDistanceField) -> MultiroomFlowField {
    let mut flow = MultiroomFlowField::new();
    for_each_reached(field, |pos, dist| {
        for dir in Direction::ALL {
            let Some(next) = pos.step(dir) else { continue };
            if field.get(next) < dist && corner_open(field, pos, dir) {
                flow.room_mut(pos.room()).add(pos.x(), pos.y(), dir);
            }
        }
    });
    flow
}

/// Derive the mono flow field: one canonical direction per reached tile,
/// the first direction in N, NE, E, SE, S, SW, W, NW order whose neighbor
/// has the minimal distance. Deterministic for a given distance map.
pub fn to_mono_flow_field(field: &MultiroomDistanceField) -> MultiroomMonoFlowField {
    let mut flow = MultiroomMonoFlowField::new();
    for_each_reached(field, |pos, dist| {
        let mut best: Option<(u32, Direction)> = None;
        for dir in Direction::ALL {
            let Some(next) = pos.step(dir) else { continue };
            if !corner_open(field, pos, dir) {
                continue;
            }
            let next_dist = field.get(next);
            if next_dist < dist && best.is_none_or(|(d, _)| next_dist < d) {
                best = Some((next_dist, dir));
            }
        }
        if let Some((_, dir)) = best {
            flow.room_mut(pos.room()).set(pos.x(), pos.y(), Some(dir));
        }
    });
    flow
}
