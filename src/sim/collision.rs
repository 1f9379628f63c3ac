//! Collision detection between axis-aligned boxes
//!
//! The tricky part of a platformer: deciding *which face* of a reference
//! box a moving box ran into. Overlap depth on each axis decides between
//! floor/ceiling and wall; the sign of the center delta picks which one.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use super::body::Collider;

/// Face of a reference body that a moving body is resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Floor,
    Ceiling,
    LeftWall,
    RightWall,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Floor, Side::Ceiling, Side::LeftWall, Side::RightWall];

    /// 0 for x, 1 for y
    pub fn axis(self) -> usize {
        match self {
            Side::Floor | Side::Ceiling => 1,
            Side::LeftWall | Side::RightWall => 0,
        }
    }

    /// Direction the boundary pushes the body: +1 for floor/left wall
    pub fn push_direction(self) -> f64 {
        match self {
            Side::Floor | Side::LeftWall => 1.0,
            Side::Ceiling | Side::RightWall => -1.0,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// One value per side, indexed by [`Side`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideMap<T>([T; 4]);

impl<T: Default> Default for SideMap<T> {
    fn default() -> Self {
        Self(Default::default())
    }
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;
    fn index(&self, side: Side) -> &T {
        &self.0[side.index()]
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut T {
        &mut self.0[side.index()]
    }
}

impl<T> SideMap<T> {
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        Side::ALL.into_iter().zip(self.0.iter())
    }
}

/// How an overlap should be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectMode {
    /// Plain blocking contact
    Normal,
    /// Player vs enemy: someone dies
    Combat,
    /// Player vs player: stand on each other instead of bumping heads
    Stacked,
}

/// Classified overlap between a reference and a moving body
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collision {
    /// Blocking face at coordinate `at`. `object_below` marks a stacked
    /// floor whose owner is not falling away, so it can carry the mover.
    Boundary { side: Side, at: f64, object_below: bool },
    /// The reference is resting on top of the moving body
    ObjectOnTop,
    /// Combat: the moving body stomped the reference
    ReferenceKilled,
    /// Combat: the moving body ran into the reference
    MovingKilled,
}

/// Vertical overlap below this multiple of horizontal overlap counts as
/// floor/ceiling. Bodies land far more often than they wall-slide.
pub const VERTICAL_BIAS: f64 = 3.0;

/// Classify the overlap of `moving` against `reference`, if any
pub fn detect<R, M>(reference: &R, moving: &M, mode: DetectMode, error_margin: f64) -> Option<Collision>
where
    R: Collider + ?Sized,
    M: Collider + ?Sized,
{
    let half = (moving.size() + reference.size()) / 2.0;
    let delta = moving.position() - reference.position();

    let horizontal_overlap = half.x - delta.x.abs();
    let vertical_overlap = half.y - delta.y.abs();
    if horizontal_overlap <= 0.0 || vertical_overlap <= 0.0 {
        return None;
    }

    if mode == DetectMode::Combat {
        return Some(if vertical_overlap < horizontal_overlap && delta.y > 0.0 {
            Collision::ReferenceKilled
        } else {
            Collision::MovingKilled
        });
    }

    let ref_pos = reference.position();
    let ref_half = reference.half_size();

    let collision = if vertical_overlap < VERTICAL_BIAS * horizontal_overlap {
        if delta.y > 0.0 {
            Collision::Boundary {
                side: Side::Floor,
                at: ref_pos.y + ref_half.y,
                object_below: mode == DetectMode::Stacked && reference.velocity().y > -error_margin,
            }
        } else if mode == DetectMode::Stacked {
            Collision::ObjectOnTop
        } else {
            Collision::Boundary {
                side: Side::Ceiling,
                at: ref_pos.y - ref_half.y,
                object_below: false,
            }
        }
    } else if delta.x > 0.0 {
        Collision::Boundary {
            side: Side::LeftWall,
            at: ref_pos.x + ref_half.x,
            object_below: false,
        }
    } else {
        Collision::Boundary {
            side: Side::RightWall,
            at: ref_pos.x - ref_half.x,
            object_below: false,
        }
    };
    Some(collision)
}

/// All movement contacts one body picked up this tick, before reduction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionRecord {
    candidates: SideMap<Vec<f64>>,
    /// Ids of bodies resting on top of the mover
    pub objects_on_top: Vec<u32>,
    /// Ids of bodies supporting the mover from below
    pub objects_below: Vec<u32>,
}

impl CollisionRecord {
    pub fn push(&mut self, side: Side, at: f64) {
        self.candidates[side].push(at);
    }

    /// Merge one detected collision; `reference_id` names the reference
    /// body when it can take part in stacking
    pub fn add(&mut self, reference_id: Option<u32>, collision: Collision) {
        match collision {
            Collision::Boundary {
                side,
                at,
                object_below,
            } => {
                self.push(side, at);
                if let (true, Some(id)) = (object_below, reference_id) {
                    self.objects_below.push(id);
                }
            }
            Collision::ObjectOnTop => self.objects_on_top.extend(reference_id),
            Collision::ReferenceKilled | Collision::MovingKilled => {
                unreachable!("combat outcomes are not movement contacts")
            }
        }
    }

    pub fn candidates(&self, side: Side) -> &[f64] {
        &self.candidates[side]
    }

    pub fn is_empty(&self) -> bool {
        Side::ALL.iter().all(|s| self.candidates[*s].is_empty())
            && self.objects_on_top.is_empty()
            && self.objects_below.is_empty()
    }
}

/// Detect `moving` against every reference and collect the results
pub fn detect_all<'a, C, M>(
    references: impl IntoIterator<Item = (Option<u32>, &'a C)>,
    moving: &M,
    mode: DetectMode,
    error_margin: f64,
    record: &mut CollisionRecord,
) where
    C: Collider + 'a,
    M: Collider + ?Sized,
{
    for (id, reference) in references {
        if let Some(collision) = detect(reference, moving, mode, error_margin) {
            record.add(id, collision);
        }
    }
}

/// Resolved contacts a body carries into its next update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contacts {
    pub sides: SideMap<Option<f64>>,
    pub objects_on_top: Vec<u32>,
}

impl Contacts {
    pub fn get(&self, side: Side) -> Option<f64> {
        self.sides[side]
    }

    pub fn on_floor(&self) -> bool {
        self.sides[Side::Floor].is_some()
    }
}
