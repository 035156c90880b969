//! Octree voxelization of closed triangulated surfaces, for use as a front-end to hexahedral
//! finite-element meshing.
//!
//! The pipeline is:
//!
//! 1. [partition](Octree::partition) the bounding cube of a [SurfaceMesh] down to a fixed depth,
//!    handing each mesh vertex and face to the leaves that contain it;
//! 2. [classify](Octree::classify) every leaf carrying faces as [CellLabel::Boundary] or
//!    [CellLabel::BoundarySpecial];
//! 3. [seed](Octree::label_boundary_neighbors) the leaves on the outside of the root cube as
//!    [CellLabel::Exterior] and [flood fill](Octree::flood_fill) that label through every leaf
//!    reachable without crossing the surface, leaving the rest [CellLabel::Interior].
//!
//! [Octree::voxelize] runs all of it. The [export] module turns a labelled tree into files.
#![cfg_attr(not(debug_assertions), warn(missing_docs))]

pub mod error;
pub mod export;
mod geom;
pub mod mesh;
pub mod spatial;
mod tree;

pub use error::Error;
pub use geom::*;
pub use mesh::{FaceId, SurfaceMesh, TriMesh, VertexId};
pub use tree::*;

/// Scalar type used for all geometry.
pub use parry3d::math::Real;

/// A point in the space of the input mesh.
pub type Point = nalgebra::Point3<Real>;

/// A vector in the space of the input mesh.
pub type Vector = nalgebra::Vector3<Real>;

/// Index type of nodes within an [Octree].
pub type NodeIndex = u32;
