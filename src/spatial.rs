//! Axis-aligned volumes used to give [Octree](crate::Octree) nodes a place in 3D space.

mod bounding_box;
pub use bounding_box::*;
mod bounding_cube;
pub use bounding_cube::*;
