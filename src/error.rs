use crate::{mesh::VertexId, NodeIndex, Real, MAX_LEVEL};

/// Errors related to [Octrees](crate::Octree) and the meshes they're built from.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Attempted to access node at index {0}, which is unoccupied.")]
    InvalidIndex(NodeIndex),
    #[error("Attempted to perform a leaf-specific operation on a non-leaf node at index {0}.")]
    NotALeaf(NodeIndex),
    #[error("Requested subdivision level {} exceeds the maximum of {}.", .0, MAX_LEVEL)]
    LevelTooDeep(u32),
    #[error("Root cube margin must be a finite, non-negative fraction; got {0}.")]
    InvalidMargin(Real),
    #[error("Vertex label {0:?} cannot be assigned; expected one of 'I', 'S', 'O'.")]
    InvalidVertexLabel(char),
    #[error("Vertex {0:?} is not referenced by this node.")]
    VertexNotFound(VertexId),
    #[error("Face {face} references vertex {vertex}, but the mesh only has {count} vertices.")]
    VertexOutOfRange { face: u32, vertex: u32, count: usize },
    #[error("Mesh has {0} faces, which cannot be indexed by a 32-bit face id.")]
    FaceOutOfRange(usize),
    #[cfg(feature = "obj")]
    #[error(transparent)]
    Obj(#[from] tobj::LoadError),
}
