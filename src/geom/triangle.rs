use parry3d::{
    math::Isometry,
    query::{Ray, RayCast},
    shape::{Cuboid, Triangle},
};

use crate::{spatial::Aabb, Point, Vector};

/// Find the point of triangle `tri` closest to `p`.
///
/// Works on the barycentric coordinates of `p`'s projection onto the triangle's plane; if the
/// projection falls outside the triangle, it's clamped to the nearest edge or vertex. Degenerate
/// triangles resolve to one of their vertices or edges.
///
/// Follows "Real-Time Collision Detection" (Ericson), §5.1.5.
pub fn closest_point_on_triangle(tri: &[Point; 3], p: &Point) -> Point {
    let [a, b, c] = tri;
    let ab = b - a;
    let ac = c - a;

    // vertex region outside A
    let ap = p - a;
    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return *a;
    }

    // vertex region outside B
    let bp = p - b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return *b;
    }

    // edge region of AB
    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return a + ab * v;
    }

    // vertex region outside C
    let cp = p - c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return *c;
    }

    // edge region of AC
    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return a + ac * w;
    }

    // edge region of BC
    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return b + (c - b) * w;
    }

    // face region
    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    a + ab * v + ac * w
}

/// The arithmetic mean of a triangle's vertices.
#[inline]
pub fn triangle_centroid(tri: &[Point; 3]) -> Point {
    Point::from((tri[0].coords + tri[1].coords + tri[2].coords) / 3.0)
}

/// The unit normal of a triangle, following its winding; `None` if it's degenerate.
pub fn triangle_normal(tri: &[Point; 3]) -> Option<Vector> {
    Triangle::new(tri[0], tri[1], tri[2])
        .normal()
        .map(|n| n.into_inner())
}

/// Whether the segment `a`-`b` touches the closed box `bb`.
pub fn segment_crosses_box(a: &Point, b: &Point, bb: &Aabb) -> bool {
    let bb: parry3d::bounding_volume::Aabb = (*bb).into();
    let ray = Ray::new(*a, b - a);
    bb.cast_local_ray(&ray, 1.0, true).is_some()
}

/// Whether triangle `tri` overlaps the closed box `bb`.
pub fn triangle_overlaps_box(tri: &[Point; 3], bb: &Aabb) -> bool {
    // work in the box's frame so both shapes sit at the identity
    let c = bb.center();
    let local = Triangle::new(
        Point::from(tri[0] - c),
        Point::from(tri[1] - c),
        Point::from(tri[2] - c),
    );
    let cuboid = Cuboid::new(bb.half_extents());
    let id = Isometry::identity();
    parry3d::query::intersection_test(&id, &cuboid, &id, &local).unwrap_or_else(|e| {
        tracing::warn!(?e, "unsupported triangle/box overlap query; assuming overlap");
        true
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::point;
    use parry3d::query::PointQuery;

    fn right_triangle() -> [Point; 3] {
        [
            point![0.0, 0.0, 0.0],
            point![1.0, 0.0, 0.0],
            point![0.0, 1.0, 0.0],
        ]
    }

    fn close(a: &Point, b: &Point) -> bool {
        (a - b).norm() < 1e-5
    }

    #[test]
    fn projects_above_face() {
        let p = closest_point_on_triangle(&right_triangle(), &point![0.25, 0.25, 1.0]);
        assert!(close(&p, &point![0.25, 0.25, 0.0]));
    }

    #[test]
    fn clamps_to_hypotenuse() {
        let p = closest_point_on_triangle(&right_triangle(), &point![0.5, 0.5, 5.0]);
        assert!(close(&p, &point![0.5, 0.5, 0.0]));
        let p = closest_point_on_triangle(&right_triangle(), &point![1.0, 1.0, 5.0]);
        assert!(close(&p, &point![0.5, 0.5, 0.0]));
    }

    #[test]
    fn clamps_to_vertices_and_edges() {
        let tri = right_triangle();
        assert!(close(
            &closest_point_on_triangle(&tri, &point![-1.0, -1.0, 0.0]),
            &tri[0]
        ));
        assert!(close(
            &closest_point_on_triangle(&tri, &point![3.0, -0.5, 2.0]),
            &tri[1]
        ));
        assert!(close(
            &closest_point_on_triangle(&tri, &point![-0.5, 4.0, 0.0]),
            &tri[2]
        ));
        assert!(close(
            &closest_point_on_triangle(&tri, &point![0.5, -2.0, 0.0]),
            &point![0.5, 0.0, 0.0]
        ));
        assert!(close(
            &closest_point_on_triangle(&tri, &point![-2.0, 0.5, 1.0]),
            &point![0.0, 0.5, 0.0]
        ));
    }

    #[test]
    fn agrees_with_parry() {
        let tri = [
            point![0.2, -0.3, 0.1],
            point![1.5, 0.4, -0.2],
            point![-0.1, 1.1, 0.7],
        ];
        let shape = Triangle::new(tri[0], tri[1], tri[2]);
        for q in [
            point![0.0, 0.0, 0.0],
            point![2.0, 2.0, 2.0],
            point![-1.0, 0.5, 0.3],
            point![0.5, 0.4, -3.0],
            point![0.6, 0.3, 0.2],
        ] {
            let ours = closest_point_on_triangle(&tri, &q);
            let theirs = shape.project_local_point(&q, true).point;
            assert!(close(&ours, &theirs), "{q:?}: {ours:?} != {theirs:?}");
        }
    }

    #[test]
    fn centroid_and_normal() {
        let tri = right_triangle();
        assert!(close(
            &triangle_centroid(&tri),
            &point![1.0 / 3.0, 1.0 / 3.0, 0.0]
        ));
        let n = triangle_normal(&tri).unwrap();
        assert!((n - nalgebra::vector![0.0, 0.0, 1.0]).norm() < 1e-6);
        let flat = [tri[0], tri[0], tri[1]];
        assert!(triangle_normal(&flat).is_none());
    }

    #[test]
    fn box_queries() {
        let bb = Aabb::new(point![0.0, 0.0, 0.0], point![1.0, 1.0, 1.0]);
        assert!(segment_crosses_box(
            &point![-1.0, 0.5, 0.5],
            &point![2.0, 0.5, 0.5],
            &bb
        ));
        assert!(segment_crosses_box(
            &point![0.5, 0.5, 0.5],
            &point![0.6, 0.5, 0.5],
            &bb
        ));
        assert!(!segment_crosses_box(
            &point![-1.0, 2.0, 0.5],
            &point![2.0, 2.0, 0.5],
            &bb
        ));
        assert!(!segment_crosses_box(
            &point![-1.0, 0.5, 0.5],
            &point![-0.5, 0.5, 0.5],
            &bb
        ));

        // a big triangle slicing through the middle, with every edge outside the box
        let slab = [
            point![-10.0, -10.0, 0.5],
            point![10.0, -10.0, 0.5],
            point![0.0, 10.0, 0.5],
        ];
        assert!(triangle_overlaps_box(&slab, &bb));
        let above = [
            point![-10.0, -10.0, 1.5],
            point![10.0, -10.0, 1.5],
            point![0.0, 10.0, 1.5],
        ];
        assert!(!triangle_overlaps_box(&above, &bb));
    }
}
