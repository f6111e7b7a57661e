//! # Mega Mesh
//!
//! Merges many small meshes into one shared vertex buffer and one shared index
//! buffer, deduplicating vertices across meshes, and stores mesh geometry as a
//! declaration file plus a binary vertex blob.
//!
//! ## Overview
//!
//! - [`MegaMeshBuffer`] - Deduplicating aggregator with per-mesh draw offsets
//! - [`mesh_file`] - Writing and loading `.smeshdecl` / `.smesh` pairs
//! - [`backend`] - Traits a GPU backend implements, plus a headless [`DummyBackend`]
//!
//! ## Example
//!
//! ```ignore
//! use megamesh::{DummyBackend, MegaMeshBuffer};
//! use megamesh::mesh_file::load_mesh_files;
//!
//! let mut backend = DummyBackend::new();
//! let mut mega = MegaMeshBuffer::new();
//! let handles: Vec<_> = load_mesh_files("assets/props.smeshdecl")?
//!     .into_meshes()
//!     .iter()
//!     .map(|mesh| mega.add_mesh(mesh))
//!     .collect();
//! mega.create_buffer(&mut backend)?;
//!
//! mega.bind(&mut backend);
//! for handle in handles {
//!     mega.draw(&mut backend, handle, 0, 1)?;
//! }
//! mega.destroy_buffer(&mut backend);
//! ```

pub mod backend;
pub mod mesh_file;
pub mod resources;

pub use backend::{BackendError, BufferBackend, CommandRecorder, DummyBackend};
pub use mesh_file::{load_mesh_files, write_mesh_files, MeshDeclData, MeshFileError};
pub use resources::{
    DedupStrategy, MegaMeshBuffer, MegaMeshConfig, MegaMeshError, Mesh, MeshOffset,
    MeshOffsetHandle, Vertex,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the library version.
pub fn init() {
    log::info!("Mega Mesh v{} initialized", VERSION);
}
