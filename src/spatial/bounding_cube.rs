use nalgebra::point;

use crate::{Octant, Point, Real};

use super::Aabb;

/// Axis-Aligned Bounding Cube
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabc {
    pub origin: Point,
    pub length: Real,
}

impl Aabc {
    pub fn new(origin: Point, length: Real) -> Self {
        Self { origin, length }
    }

    /// The cube sharing a center with `bb`, with sides as long as the longest side of `bb` plus
    /// `margin` times that length on either end.
    ///
    /// A box with no extent at all gets a cube of side 1, so the result is never degenerate.
    pub fn around(bb: &Aabb, margin: Real) -> Self {
        let longest = bb.extents().max();
        let length = if longest > 0.0 {
            longest * (1.0 + 2.0 * margin)
        } else {
            1.0
        };
        let l2 = length / 2.0;
        let c = bb.center();
        Self {
            origin: point![c.x - l2, c.y - l2, c.z - l2],
            length,
        }
    }

    pub fn maxs(&self) -> Point {
        point![
            self.origin.x + self.length,
            self.origin.y + self.length,
            self.origin.z + self.length
        ]
    }

    /// Determine whether a point `p` lies within `self`.
    pub fn contains(&self, p: &Point) -> bool {
        let Self {
            length: l,
            origin: o,
        } = &self;
        (p.x >= o.x && p.x < (o.x + *l))
            && (p.y >= o.y && (p.y < (o.y + *l)))
            && (p.z >= o.z && (p.z < (o.z + *l)))
    }

    /// Determine the center point of `self`.
    pub fn center(&self) -> Point {
        let l2 = self.length / 2.0;
        Point::new(self.origin.x + l2, self.origin.y + l2, self.origin.z + l2)
    }

    /// The side length of a cell `level` subdivisions below `self`.
    pub fn cell_length(&self, level: u32) -> Real {
        self.length / (1u64 << level) as Real
    }

    /// Given an [Octant] `oct`, construct an [Aabc] `n` such that `n` is the `oct`th octant of `self`
    pub fn child(&self, oct: Octant) -> Self {
        let l2 = self.length / 2.0;
        let o = &self.origin;
        Self {
            origin: point![
                if oct.i() { o.x + l2 } else { o.x },
                if oct.j() { o.y + l2 } else { o.y },
                if oct.k() { o.z + l2 } else { o.z }
            ],
            length: l2,
        }
    }
}
