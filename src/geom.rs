//! Geometric primitives shared by the rest of the crate.

mod octant;
pub use octant::*;
mod triangle;
pub use triangle::*;
