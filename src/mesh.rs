//! The surface mesh contract consumed by [Octree](crate::Octree) construction.
//!
//! Anything that can enumerate vertex positions and triangles can be voxelized; [TriMesh] is a
//! plain indexed implementation, and with the `obj` feature it can be loaded from Wavefront
//! files.

use crate::{spatial::Aabb, triangle_normal, Error, Point, Vector};

/// Identifies a vertex within a [SurfaceMesh].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub u32);

/// Identifies a triangular face within a [SurfaceMesh].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub u32);

/// Read-only access to a closed triangulated surface.
///
/// Ids are dense: `0..vertex_count()` and `0..face_count()`.
pub trait SurfaceMesh {
    fn vertex_count(&self) -> usize;
    fn face_count(&self) -> usize;

    /// Position of a vertex.
    ///
    /// # Panics
    /// * `v` ∉ `0..self.vertex_count()`
    fn position(&self, v: VertexId) -> Point;

    /// The three vertices of a face, in winding order.
    ///
    /// # Panics
    /// * `f` ∉ `0..self.face_count()`
    fn face(&self, f: FaceId) -> [VertexId; 3];

    fn vertices(&self) -> Box<dyn Iterator<Item = VertexId> + '_> {
        Box::new((0..self.vertex_count() as u32).map(VertexId))
    }

    fn faces(&self) -> Box<dyn Iterator<Item = FaceId> + '_> {
        Box::new((0..self.face_count() as u32).map(FaceId))
    }

    /// Vertex positions of a face.
    fn triangle(&self, f: FaceId) -> [Point; 3] {
        self.face(f).map(|v| self.position(v))
    }

    /// Unit normal of a face, following its winding; `None` for degenerate faces.
    fn face_normal(&self, f: FaceId) -> Option<Vector> {
        triangle_normal(&self.triangle(f))
    }

    /// Bounding box of a single face.
    fn face_bounds(&self, f: FaceId) -> Aabb {
        let tri = self.triangle(f);
        let mut res = Aabb::new(tri[0], tri[0]);
        res.expand_to(&tri[1]);
        res.expand_to(&tri[2]);
        res
    }

    /// Bounding box of every vertex; `None` for a mesh without vertices.
    fn bounding_box(&self) -> Option<Aabb> {
        let mut res = Aabb::new_invalid();
        let mut any = false;
        for v in self.vertices() {
            res.expand_to(&self.position(v));
            any = true;
        }
        any.then_some(res)
    }
}

/// An indexed triangle mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriMesh {
    positions: Vec<Point>,
    faces: Vec<[VertexId; 3]>,
}

impl TriMesh {
    /// Construct a mesh from positions and triangles given as indices into `positions`.
    ///
    /// # Errors
    /// * [Error::VertexOutOfRange] if any face references a missing vertex.
    /// * [Error::FaceOutOfRange] if there are too many faces to be given 32-bit ids.
    pub fn new(positions: Vec<Point>, triangles: Vec<[u32; 3]>) -> Result<Self, Error> {
        if u32::try_from(triangles.len()).is_err() {
            return Err(Error::FaceOutOfRange(triangles.len()));
        }
        for (face, tri) in triangles.iter().enumerate() {
            if let Some(&vertex) = tri.iter().find(|&&v| v as usize >= positions.len()) {
                return Err(Error::VertexOutOfRange {
                    face: face as u32,
                    vertex,
                    count: positions.len(),
                });
            }
        }
        Ok(Self {
            positions,
            faces: triangles.into_iter().map(|t| t.map(VertexId)).collect(),
        })
    }

    /// A mesh with no vertices and no faces.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load every object in a Wavefront OBJ file into a single mesh, triangulating polygons.
    #[cfg(feature = "obj")]
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load_obj(path: impl AsRef<std::path::Path>) -> Result<Self, Error> {
        let (models, _) = tobj::load_obj(
            path.as_ref(),
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )?;
        let mut positions = Vec::new();
        let mut triangles = Vec::new();
        for model in models {
            let base = positions.len() as u32;
            positions.extend(
                model
                    .mesh
                    .positions
                    .chunks_exact(3)
                    .map(|c| Point::new(c[0], c[1], c[2])),
            );
            triangles.extend(
                model
                    .mesh
                    .indices
                    .chunks_exact(3)
                    .map(|c| [base + c[0], base + c[1], base + c[2]]),
            );
            tracing::debug!(name = %model.name, "loaded OBJ model");
        }
        tracing::debug!(
            vertices = positions.len(),
            faces = triangles.len(),
            "loaded OBJ file"
        );
        Self::new(positions, triangles)
    }
}

impl SurfaceMesh for TriMesh {
    #[inline]
    fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    fn face_count(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    fn position(&self, v: VertexId) -> Point {
        self.positions[v.0 as usize]
    }

    #[inline]
    fn face(&self, f: FaceId) -> [VertexId; 3] {
        self.faces[f.0 as usize]
    }
}
