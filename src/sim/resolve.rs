//! Collision response
//!
//! Reduces the candidate boundaries a body collected to one binding value
//! per side, then snaps the proposed motion so the body sits just inside
//! each honored boundary.

use glam::DVec2;

use super::collision::{CollisionRecord, Side, SideMap};

/// Pick the binding boundary for a side.
///
/// Floors and left walls push in +direction, so the highest/rightmost one
/// is the most restrictive; ceilings and right walls take the minimum.
pub fn pick(side: Side, candidates: &[f64]) -> Option<f64> {
    let values = candidates.iter().copied();
    match side {
        Side::Floor | Side::LeftWall => values.reduce(f64::max),
        Side::Ceiling | Side::RightWall => values.reduce(f64::min),
    }
}

/// A record reduced to one value per side
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolved {
    pub sides: SideMap<Option<f64>>,
    pub objects_on_top: Vec<u32>,
    pub objects_below: Vec<u32>,
}

pub fn reduce(record: &CollisionRecord) -> Resolved {
    let mut sides = SideMap::default();
    for side in Side::ALL {
        sides[side] = pick(side, record.candidates(side));
    }
    Resolved {
        sides,
        objects_on_top: record.objects_on_top.clone(),
        objects_below: record.objects_below.clone(),
    }
}

/// What a honored wall does to horizontal velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallResponse {
    Stop,
    /// Bounce back, keeping speed (wandering enemies turn around)
    Reverse,
}

/// Proposed state for one body this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub pos: DVec2,
    pub vel: DVec2,
}

/// Snap `motion` against the resolved sides and return the sides that were
/// honored.
///
/// A side only counts when the velocity along its axis would deepen the
/// overlap (with `error_margin` as a dead zone). Vertical goes first,
/// ceiling before floor; then horizontal, left wall before right.
pub fn snap(
    motion: &mut Motion,
    size: DVec2,
    sides: &SideMap<Option<f64>>,
    error_margin: f64,
    wall: WallResponse,
) -> SideMap<Option<f64>> {
    let mut honored = SideMap::default();

    let vertical = [
        (Side::Ceiling, motion.vel.y > -error_margin),
        (Side::Floor, motion.vel.y < error_margin),
    ];
    if let Some((side, at)) = first_honored(sides, vertical) {
        apply(motion, size, side, at, error_margin, wall);
        honored[side] = Some(at);
    }

    let horizontal = [
        (Side::LeftWall, motion.vel.x < error_margin),
        (Side::RightWall, motion.vel.x > -error_margin),
    ];
    if let Some((side, at)) = first_honored(sides, horizontal) {
        apply(motion, size, side, at, error_margin, wall);
        honored[side] = Some(at);
    }

    honored
}

fn first_honored(sides: &SideMap<Option<f64>>, order: [(Side, bool); 2]) -> Option<(Side, f64)> {
    order
        .into_iter()
        .find_map(|(side, approaching)| sides[side].filter(|_| approaching).map(|at| (side, at)))
}

fn apply(motion: &mut Motion, size: DVec2, side: Side, at: f64, error_margin: f64, wall: WallResponse) {
    let axis = side.axis();
    motion.pos[axis] = at + (size[axis] / 2.0 - error_margin) * side.push_direction();
    if axis == 0 && wall == WallResponse::Reverse {
        motion.vel.x = -motion.vel.x;
    } else {
        motion.vel[axis] = 0.0;
    }
}
