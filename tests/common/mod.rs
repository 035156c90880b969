#![allow(dead_code)]

use nalgebra::point;
use octofem::{Real, TriMesh};

/// The closed surface of the box between `lo` and `hi`, wound outward.
pub fn cuboid(lo: [Real; 3], hi: [Real; 3]) -> TriMesh {
    let corner = |i: usize| {
        point![
            if i & 4 != 0 { hi[0] } else { lo[0] },
            if i & 2 != 0 { hi[1] } else { lo[1] },
            if i & 1 != 0 { hi[2] } else { lo[2] }
        ]
    };
    TriMesh::new(
        (0..8).map(corner).collect(),
        vec![
            [0, 1, 3],
            [0, 3, 2],
            [4, 6, 7],
            [4, 7, 5],
            [0, 4, 5],
            [0, 5, 1],
            [2, 3, 7],
            [2, 7, 6],
            [0, 2, 6],
            [0, 6, 4],
            [1, 5, 7],
            [1, 7, 3],
        ],
    )
    .unwrap()
}

pub fn unit_cube() -> TriMesh {
    cuboid([0.0; 3], [1.0; 3])
}

/// A closed octahedron of "radius" `r` around `c`.
pub fn octahedron(c: [Real; 3], r: Real) -> TriMesh {
    TriMesh::new(
        vec![
            point![c[0] + r, c[1], c[2]],
            point![c[0] - r, c[1], c[2]],
            point![c[0], c[1] + r, c[2]],
            point![c[0], c[1] - r, c[2]],
            point![c[0], c[1], c[2] + r],
            point![c[0], c[1], c[2] - r],
        ],
        vec![
            [0, 2, 4],
            [2, 1, 4],
            [1, 3, 4],
            [3, 0, 4],
            [2, 0, 5],
            [1, 2, 5],
            [3, 1, 5],
            [0, 3, 5],
        ],
    )
    .unwrap()
}
