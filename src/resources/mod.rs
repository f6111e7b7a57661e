//! Resource management
//!
//! Vertices, meshes, and the mega mesh buffer that merges them.

mod mega_mesh;
mod mesh;
mod vertex;

pub use mega_mesh::*;
pub use mesh::*;
pub use vertex::*;
