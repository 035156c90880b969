use nalgebra::point;

use crate::{Axis, Octant, Point, Real, Vector};

use super::Aabc;

/// Axis-Aligned Bounding Box
///
/// Similar to [`parry3d::bounding_volume::Aabb`], which it converts to and from; this one carries
/// the half-open containment rules used while partitioning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub mins: Point,
    pub maxs: Point,
}

/// Which faces of an [Aabb] count as part of it.
///
/// Boxes are half-open (`[mins, maxs)`) along every axis, except that an axis flagged here is
/// closed at `maxs` as well. The root of a tree is closed on every axis, and so is any node
/// touching the root's upper faces, so every point of the root lies in exactly one leaf.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClosedMax(pub [bool; 3]);

impl ClosedMax {
    pub const ALL: Self = Self([true; 3]);

    #[inline]
    pub fn on(self, axis: Axis) -> bool {
        self.0[axis.index()]
    }
}

impl Aabb {
    #[inline]
    pub fn new(mins: Point, maxs: Point) -> Self {
        Self { mins, maxs }
    }

    /// A box containing nothing, to be grown with [Self::expand_to].
    pub fn new_invalid() -> Self {
        Self {
            mins: point![Real::MAX, Real::MAX, Real::MAX],
            maxs: point![Real::MIN, Real::MIN, Real::MIN],
        }
    }

    /// The smallest box containing every point in `points`; `None` if there are none.
    pub fn from_points<'p>(points: impl IntoIterator<Item = &'p Point>) -> Option<Self> {
        let mut res = Self::new_invalid();
        let mut any = false;
        for p in points {
            res.expand_to(p);
            any = true;
        }
        any.then_some(res)
    }

    /// Grow `self` such that it contains `p`.
    #[inline]
    pub fn expand_to(&mut self, p: &Point) {
        self.mins = self.mins.inf(p);
        self.maxs = self.maxs.sup(p);
    }

    /// Closed containment: every face counts.
    #[inline]
    pub fn contains(&self, p: &Point) -> bool {
        let Self { mins: i, maxs: a } = self;
        (p.x >= i.x && p.y >= i.y && p.z >= i.z) && (p.x <= a.x && p.y <= a.y && p.z <= a.z)
    }

    /// Half-open containment; see [ClosedMax].
    pub fn contains_half_open(&self, p: &Point, closed: ClosedMax) -> bool {
        Axis::ALL.into_iter().all(|axis| {
            let a = axis.index();
            p[a] >= self.mins[a]
                && (p[a] < self.maxs[a] || (closed.on(axis) && p[a] <= self.maxs[a]))
        })
    }

    /// Whether the closed box `other` overlaps `self` under half-open rules for `self`.
    pub fn overlaps_half_open(&self, other: &Aabb, closed: ClosedMax) -> bool {
        Axis::ALL.into_iter().all(|axis| {
            let a = axis.index();
            other.maxs[a] >= self.mins[a]
                && (other.mins[a] < self.maxs[a]
                    || (closed.on(axis) && other.mins[a] <= self.maxs[a]))
        })
    }

    /// Determine the center of `self`.
    #[inline]
    pub fn center(&self) -> Point {
        nalgebra::center(&self.mins, &self.maxs)
    }

    #[inline]
    pub fn extents(&self) -> Vector {
        self.maxs - self.mins
    }

    #[inline]
    pub fn half_extents(&self) -> Vector {
        self.extents() / 2.0
    }

    #[inline]
    pub fn volume(&self) -> Real {
        let e = self.extents();
        e.x * e.y * e.z
    }

    /// Determine the [Octant] of `p`.
    ///
    /// This still works even if `p` ∉ `self`: the result is given as if taking the octant of `p`
    /// within an infinitely-large bounding box sharing a center with `self`. Points on a
    /// dividing plane belong to the upper octant.
    #[inline]
    pub fn octant_of(&self, p: &Point) -> Octant {
        let c = self.center();
        Octant::new(p.x >= c.x, p.y >= c.y, p.z >= c.z)
    }

    /// Construct an [Aabb] such that the result is an octant of `self`.
    pub fn child(&self, oct: Octant) -> Self {
        let Self { mins: i, maxs: a } = self;
        let c = self.center();
        let (x0, x1) = if oct.i() { (c.x, a.x) } else { (i.x, c.x) };
        let (y0, y1) = if oct.j() { (c.y, a.y) } else { (i.y, c.y) };
        let (z0, z1) = if oct.k() { (c.z, a.z) } else { (i.z, c.z) };
        Self {
            mins: point![x0, y0, z0],
            maxs: point![x1, y1, z1],
        }
    }

    /// The eight corners of `self`, in the vertex order of a VTK / Abaqus hexahedron.
    pub fn corners(&self) -> [Point; 8] {
        let Self { mins: i, maxs: a } = self;
        [
            point![i.x, i.y, i.z],
            point![a.x, i.y, i.z],
            point![a.x, a.y, i.z],
            point![i.x, a.y, i.z],
            point![i.x, i.y, a.z],
            point![a.x, i.y, a.z],
            point![a.x, a.y, a.z],
            point![i.x, a.y, a.z],
        ]
    }
}

impl From<parry3d::bounding_volume::Aabb> for Aabb {
    fn from(p: parry3d::bounding_volume::Aabb) -> Self {
        Self {
            mins: p.mins,
            maxs: p.maxs,
        }
    }
}

impl From<Aabb> for parry3d::bounding_volume::Aabb {
    fn from(e: Aabb) -> Self {
        Self {
            mins: e.mins,
            maxs: e.maxs,
        }
    }
}

impl From<Aabc> for Aabb {
    fn from(cube: Aabc) -> Self {
        Self {
            mins: cube.origin,
            maxs: cube.maxs(),
        }
    }
}
