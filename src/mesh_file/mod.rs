//! Two-file mesh assets.
//!
//! An asset is stored as a declaration file (`<name>.smeshdecl`, RON text)
//! next to a binary blob (`<name>.smesh`). The blob is the vertices of every
//! mesh concatenated into one run of fixed-size [`Vertex`] records; the
//! declaration names the asset and records which slice of that run belongs to
//! each mesh.
//!
//! ```text
//! (
//!     name: "props",
//!     meshCount: 2,
//!     meshes: [
//!         (vertexStartOffset: "0", vertexEndOffset: "6", baseMeshScale: (1.0, 1.0, 1.0)),
//!         (vertexStartOffset: "6", vertexEndOffset: "42", baseMeshScale: (2.0, 2.0, 2.0)),
//!     ],
//!     vertexCount: 42,
//!     binaryDataPath: "assets/props.smesh",
//! )
//! ```
//!
//! # Base scale
//!
//! Each entry carries the base scale its mesh was written with. Loading
//! reports it through [`MeshDeclData::mesh_offsets`] but the rebuilt
//! [`Mesh`]es keep the default scale.
//!
//! # Example
//!
//! ```ignore
//! use megamesh::mesh_file::{load_mesh_files, write_mesh_files};
//!
//! let paths = write_mesh_files("assets", "props", &meshes)?;
//! let meshes = load_mesh_files(&paths.declaration)?.into_meshes();
//! ```

mod decl;
mod error;
#[cfg(test)]
mod tests;

pub use decl::MeshDeclOffset;
pub use error::MeshFileError;

use std::path::{Path, PathBuf};

use ron::ser::PrettyConfig;

use crate::resources::{Mesh, Vertex};
use decl::MeshDecl;

/// Extension of the declaration file
pub const DECL_EXTENSION: &str = ".smeshdecl";
/// Extension of the binary vertex blob
pub const DATA_EXTENSION: &str = ".smesh";

/// Options for writing mesh files
#[derive(Debug, Clone)]
pub struct MeshFileConfig {
    /// Write the declaration as indented, multi-line RON
    pub pretty: bool,
}

impl Default for MeshFileConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Paths of a written file pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshFilePaths {
    pub declaration: PathBuf,
    pub binary: PathBuf,
}

/// Contents of a loaded asset.
#[derive(Debug, Clone)]
pub struct MeshDeclData {
    pub name: String,
    /// `meshCount` as declared, which may disagree with `mesh_offsets.len()`
    pub mesh_count: usize,
    pub vertex_count: usize,
    /// Blob location after resolution against the declaration's directory
    pub binary_blob_path: PathBuf,
    pub mesh_offsets: Vec<MeshDeclOffset>,
    /// One mesh per entry of `mesh_offsets`, in the same order
    pub meshes: Vec<Mesh>,
}

impl MeshDeclData {
    pub fn into_meshes(self) -> Vec<Mesh> {
        self.meshes
    }
}

fn file_path(dir: &Path, asset_name: &str, extension: &str) -> PathBuf {
    dir.join(format!("{asset_name}{extension}"))
}

/// Write `meshes` as `dir/asset_name.smeshdecl` and `dir/asset_name.smesh`.
pub fn write_mesh_files(
    dir: impl AsRef<Path>,
    asset_name: &str,
    meshes: &[Mesh],
) -> Result<MeshFilePaths, MeshFileError> {
    write_mesh_files_with(&MeshFileConfig::default(), dir, asset_name, meshes)
}

/// Write `meshes` with explicit options.
///
/// The declaration is written before the blob. If writing the blob fails the
/// declaration is left in place.
pub fn write_mesh_files_with(
    config: &MeshFileConfig,
    dir: impl AsRef<Path>,
    asset_name: &str,
    meshes: &[Mesh],
) -> Result<MeshFilePaths, MeshFileError> {
    let dir = dir.as_ref();
    let paths = MeshFilePaths {
        declaration: file_path(dir, asset_name, DECL_EXTENSION),
        binary: file_path(dir, asset_name, DATA_EXTENSION),
    };

    let mut vertices: Vec<Vertex> = Vec::with_capacity(meshes.iter().map(Mesh::vertex_count).sum());
    let mut entries = Vec::with_capacity(meshes.len());
    for mesh in meshes {
        let start = vertices.len();
        vertices.extend_from_slice(&mesh.vertices);
        entries.push(MeshDeclOffset {
            vertex_start_offset: start,
            vertex_end_offset: vertices.len(),
            base_mesh_scale: mesh.base_scale,
        });
    }

    let decl = MeshDecl {
        name: asset_name.to_string(),
        mesh_count: meshes.len(),
        meshes: Some(entries),
        vertex_count: vertices.len(),
        binary_data_path: paths.binary.to_string_lossy().into_owned(),
    };

    let text = if config.pretty {
        ron::ser::to_string_pretty(&decl, PrettyConfig::default())
    } else {
        ron::to_string(&decl)
    }
    .map_err(|e| MeshFileError::format(&paths.declaration, e.to_string()))?;

    std::fs::write(&paths.declaration, text)
        .map_err(|e| MeshFileError::io(&paths.declaration, e))?;
    std::fs::write(&paths.binary, bytemuck::cast_slice::<Vertex, u8>(&vertices))
        .map_err(|e| MeshFileError::io(&paths.binary, e))?;

    log::info!(
        "Wrote mesh asset '{}' ({} meshes, {} vertices) to {}",
        asset_name,
        meshes.len(),
        vertices.len(),
        paths.declaration.display()
    );

    Ok(paths)
}

/// Load an asset from its declaration file.
///
/// Failures are logged before they are returned.
pub fn load_mesh_files(decl_path: impl AsRef<Path>) -> Result<MeshDeclData, MeshFileError> {
    let decl_path = decl_path.as_ref();
    load(decl_path).map_err(|e| {
        log::error!("Failed to load mesh asset: {e}");
        e
    })
}

fn load(decl_path: &Path) -> Result<MeshDeclData, MeshFileError> {
    let text = std::fs::read_to_string(decl_path).map_err(|e| MeshFileError::io(decl_path, e))?;
    let decl: MeshDecl =
        ron::from_str(&text).map_err(|e| MeshFileError::format(decl_path, e.to_string()))?;

    let listed = decl.meshes.as_ref().map_or(0, Vec::len);
    if decl.mesh_count != listed {
        log::warn!(
            "{}: meshCount is {} but {} meshes are listed",
            decl_path.display(),
            decl.mesh_count,
            listed
        );
    }

    for (i, entry) in decl.meshes.iter().flatten().enumerate() {
        if entry.vertex_start_offset > entry.vertex_end_offset
            || entry.vertex_end_offset > decl.vertex_count
        {
            return Err(MeshFileError::format(
                decl_path,
                format!(
                    "mesh {i} spans vertices {}..{} outside of {} declared vertices",
                    entry.vertex_start_offset, entry.vertex_end_offset, decl.vertex_count
                ),
            ));
        }
    }

    let binary_blob_path = resolve_blob_path(decl_path, &decl.binary_data_path);

    let (mesh_offsets, meshes) = match decl.meshes {
        None => (Vec::new(), Vec::new()),
        Some(entries) => {
            let vertices = read_vertices(&binary_blob_path, decl.vertex_count)?;
            let meshes = entries
                .iter()
                .map(|entry| Mesh::from_vertices(vertices[entry.vertex_range()].to_vec()))
                .collect();
            (entries, meshes)
        }
    };

    log::info!(
        "Loaded mesh asset '{}' ({} meshes, {} vertices) from {}",
        decl.name,
        meshes.len(),
        decl.vertex_count,
        decl_path.display()
    );

    Ok(MeshDeclData {
        name: decl.name,
        mesh_count: decl.mesh_count,
        vertex_count: decl.vertex_count,
        binary_blob_path,
        mesh_offsets,
        meshes,
    })
}

/// Relative blob paths are tried as written first, then by file name next to
/// the declaration.
fn resolve_blob_path(decl_path: &Path, written: &str) -> PathBuf {
    let written = PathBuf::from(written);
    if written.is_absolute() || written.exists() {
        return written;
    }

    let sibling = match (decl_path.parent(), written.file_name()) {
        (Some(dir), Some(file_name)) => dir.join(file_name),
        _ => return written,
    };
    if sibling.exists() {
        log::debug!(
            "{} not found, using {}",
            written.display(),
            sibling.display()
        );
        sibling
    } else {
        written
    }
}

fn read_vertices(path: &Path, vertex_count: usize) -> Result<Vec<Vertex>, MeshFileError> {
    let bytes = std::fs::read(path).map_err(|e| MeshFileError::io(path, e))?;

    let expected = vertex_count
        .checked_mul(Vertex::SIZE)
        .ok_or_else(|| MeshFileError::format(path, format!("vertex count {vertex_count} is too large")))?;
    if bytes.len() < expected {
        return Err(MeshFileError::format(
            path,
            format!(
                "holds {} bytes but {} vertices need {}",
                bytes.len(),
                vertex_count,
                expected
            ),
        ));
    }
    if bytes.len() > expected {
        log::warn!(
            "{}: ignoring {} bytes past the declared vertices",
            path.display(),
            bytes.len() - expected
        );
    }

    Ok(bytes[..expected]
        .chunks_exact(Vertex::SIZE)
        .map(bytemuck::pod_read_unaligned)
        .collect())
}
