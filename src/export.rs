//! Writers turning a labelled [Octree](crate::Octree) into files for other tools.
//!
//! Exporters only read the tree. Each writes to any [Write](std::io::Write), with `save_*` /
//! `append_*` conveniences for paths.

mod inp;
pub use inp::*;
mod vtk;
pub use vtk::*;

use crate::FaceId;

/// Errors raised while exporting.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Face {face:?} does not exist; the mesh has {count} faces.")]
    UnknownFace { face: FaceId, count: usize },
    #[error(transparent)]
    Tree(#[from] crate::Error),
}
