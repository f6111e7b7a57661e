//! Mega mesh buffer
//!
//! Merges many meshes into one shared vertex buffer and one shared index
//! buffer. Vertices equal under [`Vertex`]'s `PartialEq` are stored once; each
//! added mesh keeps a [`MeshOffset`] into the index array so it can still be
//! drawn on its own.
//!
//! The CPU arrays and the GPU copy are kept apart. Every mutation marks the
//! buffer dirty, and only [`MegaMeshBuffer::create_buffer`] uploads (all of
//! it, every time) and clears the flag. Binding and drawing never check the
//! flag: after a mutation they keep rendering the last upload until the
//! caller rebuilds.

use std::collections::HashMap;

use thiserror::Error;

use crate::backend::traits::*;
use crate::backend::types::*;

use super::mesh::Mesh;
use super::vertex::{Vertex, VertexKey};

/// How incoming vertices are matched against the ones already stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupStrategy {
    /// Compare each incoming vertex with every stored vertex
    LinearScan,
    /// Look vertices up through a hash of the compared fields
    #[default]
    Hashed,
}

/// Configuration for a mega mesh buffer
#[derive(Debug, Clone)]
pub struct MegaMeshConfig {
    pub dedup: DedupStrategy,
    /// Prefix for GPU buffer labels
    pub label: String,
}

impl Default for MegaMeshConfig {
    fn default() -> Self {
        Self {
            dedup: DedupStrategy::Hashed,
            label: "mega mesh".to_string(),
        }
    }
}

/// Errors from drawing or rebuilding a mega mesh buffer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MegaMeshError {
    #[error("invalid offset handle {handle} (buffer holds {count} meshes)")]
    InvalidOffsetHandle { handle: u32, count: usize },
    #[error("mesh {handle} reads indices {start}..{end} but only {uploaded} are uploaded; rebuild first")]
    StaleOffset {
        handle: u32,
        start: u32,
        end: u32,
        uploaded: u32,
    },
    #[error("instance range {start}+{count} does not fit in u32")]
    InvalidInstanceRange { start: u32, count: u32 },
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Range of the shared index array drawn for one mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeshOffset {
    pub index_start: u32,
    pub index_count: u32,
}

impl MeshOffset {
    pub fn index_range(&self) -> std::ops::Range<u32> {
        self.index_start..self.index_start + self.index_count
    }
}

/// Handle returned by [`MegaMeshBuffer::add_mesh`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshOffsetHandle(pub(crate) u32);

impl MeshOffsetHandle {
    /// Position of the mesh's offset in [`MegaMeshBuffer::mesh_offsets`]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// GPU buffers of the last upload
#[derive(Debug)]
pub struct GpuMegaMesh {
    pub vertex_buffer: BufferHandle,
    pub index_buffer: BufferHandle,
    pub vertex_count: u32,
    pub index_count: u32,
}

impl GpuMegaMesh {
    fn release<B: BufferBackend>(self, backend: &mut B) {
        backend.destroy_buffer(self.index_buffer);
        backend.destroy_buffer(self.vertex_buffer);
    }
}

/// Deduplicated geometry of many meshes in one vertex/index buffer pair.
///
/// Access must be serialized by the owner; nothing here is synchronized.
///
/// # Example
///
/// ```ignore
/// let mut mega = MegaMeshBuffer::new();
/// let quad = mega.add_mesh(&Mesh::quad(Vec4::ONE));
/// mega.create_buffer(&mut backend)?;
///
/// // inside an open render pass
/// mega.bind(&mut pass);
/// mega.draw(&mut pass, quad, 0, 1)?;
/// ```
#[derive(Debug)]
pub struct MegaMeshBuffer {
    config: MegaMeshConfig,
    is_dirty: bool,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    mesh_offsets: Vec<MeshOffset>,
    // Only filled for DedupStrategy::Hashed
    lookup: HashMap<VertexKey, u32>,
    gpu: Option<GpuMegaMesh>,
}

impl Default for MegaMeshBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl MegaMeshBuffer {
    pub fn new() -> Self {
        Self::with_config(MegaMeshConfig::default())
    }

    pub fn with_config(config: MegaMeshConfig) -> Self {
        Self {
            config,
            is_dirty: false,
            vertices: Vec::new(),
            indices: Vec::new(),
            mesh_offsets: Vec::new(),
            lookup: HashMap::new(),
            gpu: None,
        }
    }

    pub fn config(&self) -> &MegaMeshConfig {
        &self.config
    }

    /// Append a mesh, reusing stored vertices equal to its own.
    ///
    /// When an incoming vertex equals a stored one, the stored vertex wins and
    /// the incoming normal is dropped.
    ///
    /// Indices and offsets are `u32`, so the buffer holds at most `u32::MAX`
    /// indices in total. Adding past that cap is a caller error.
    pub fn add_mesh(&mut self, mesh: &Mesh) -> MeshOffsetHandle {
        let handle = MeshOffsetHandle(self.mesh_offsets.len() as u32);
        let index_start = self.indices.len() as u32;

        self.indices.reserve(mesh.vertices.len());
        for vertex in &mesh.vertices {
            let index = self.find_or_insert(vertex);
            self.indices.push(index);
        }

        self.mesh_offsets.push(MeshOffset {
            index_start,
            index_count: mesh.vertices.len() as u32,
        });
        self.is_dirty = true;

        log::trace!(
            "{}: added mesh {} ({} vertices, {} stored)",
            self.config.label,
            handle.0,
            mesh.vertices.len(),
            self.vertices.len()
        );

        handle
    }

    fn find_or_insert(&mut self, vertex: &Vertex) -> u32 {
        match self.config.dedup {
            DedupStrategy::LinearScan => {
                if let Some(found) = self.vertices.iter().position(|v| v == vertex) {
                    return found as u32;
                }
                self.push_vertex(*vertex)
            }
            DedupStrategy::Hashed => {
                let Some(key) = vertex.dedup_key() else {
                    // NaN never compares equal, so the vertex is always new
                    return self.push_vertex(*vertex);
                };
                if let Some(&found) = self.lookup.get(&key) {
                    return found;
                }
                let index = self.push_vertex(*vertex);
                self.lookup.insert(key, index);
                index
            }
        }
    }

    fn push_vertex(&mut self, vertex: Vertex) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        index
    }

    /// Remove all meshes. GPU buffers are kept until the next rebuild.
    pub fn clear_meshes(&mut self) {
        self.mesh_offsets.clear();
        self.indices.clear();
        self.vertices.clear();
        self.lookup.clear();
        self.is_dirty = true;
    }

    /// Upload the whole vertex and index arrays if anything changed since the
    /// last upload. The previous buffers are released first.
    ///
    /// On failure nothing stays uploaded and the buffer remains dirty.
    pub fn create_buffer<B: BufferBackend>(&mut self, backend: &mut B) -> Result<(), MegaMeshError> {
        if !self.is_dirty {
            return Ok(());
        }

        self.destroy_buffer(backend);

        if self.vertices.is_empty() {
            log::debug!("{}: nothing to upload", self.config.label);
            self.is_dirty = false;
            return Ok(());
        }

        let vertex_data: &[u8] = bytemuck::cast_slice(&self.vertices);
        let vertex_buffer = backend.create_buffer_init(
            &BufferDescriptor {
                label: Some(format!("{} vertices", self.config.label)),
                size: vertex_data.len() as u64,
                usage: BufferUsage::VERTEX,
                element_size: Vertex::SIZE as u64,
            },
            vertex_data,
        )?;

        let index_data: &[u8] = bytemuck::cast_slice(&self.indices);
        let index_buffer = match backend.create_buffer_init(
            &BufferDescriptor {
                label: Some(format!("{} indices", self.config.label)),
                size: index_data.len() as u64,
                usage: BufferUsage::INDEX,
                element_size: IndexFormat::Uint32.size(),
            },
            index_data,
        ) {
            Ok(buffer) => buffer,
            Err(e) => {
                backend.destroy_buffer(vertex_buffer);
                return Err(e.into());
            }
        };

        self.gpu = Some(GpuMegaMesh {
            vertex_buffer,
            index_buffer,
            vertex_count: self.vertices.len() as u32,
            index_count: self.indices.len() as u32,
        });
        self.is_dirty = false;

        log::debug!(
            "{}: uploaded {} vertices, {} indices for {} meshes",
            self.config.label,
            self.vertices.len(),
            self.indices.len(),
            self.mesh_offsets.len()
        );
        Ok(())
    }

    /// Release the GPU buffers, if any. Safe to call repeatedly.
    pub fn destroy_buffer<B: BufferBackend>(&mut self, backend: &mut B) {
        if let Some(gpu) = self.gpu.take() {
            gpu.release(backend);
        }
    }

    /// Attach the vertex buffer at slot 0 and the index buffer to an open pass.
    pub fn bind<R: CommandRecorder>(&self, recorder: &mut R) {
        let Some(gpu) = &self.gpu else {
            return;
        };
        recorder.set_vertex_buffer(0, gpu.vertex_buffer, 0);
        recorder.set_index_buffer(gpu.index_buffer, 0, IndexFormat::Uint32);
    }

    /// Draw one mesh's index range, `instance_count` times from `instance_start`.
    pub fn draw<R: CommandRecorder>(
        &self,
        recorder: &mut R,
        handle: MeshOffsetHandle,
        instance_start: u32,
        instance_count: u32,
    ) -> Result<(), MegaMeshError> {
        let Some(gpu) = &self.gpu else {
            return Ok(());
        };

        let offset = self.mesh_offset(handle)?;
        let instances_end = instance_start.checked_add(instance_count).ok_or(
            MegaMeshError::InvalidInstanceRange {
                start: instance_start,
                count: instance_count,
            },
        )?;
        let range = offset.index_range();
        if range.end > gpu.index_count {
            return Err(MegaMeshError::StaleOffset {
                handle: handle.0,
                start: range.start,
                end: range.end,
                uploaded: gpu.index_count,
            });
        }

        recorder.draw_indexed(range, 0, instance_start..instances_end);
        Ok(())
    }

    /// Look up the offset recorded for `handle`.
    pub fn mesh_offset(&self, handle: MeshOffsetHandle) -> Result<MeshOffset, MegaMeshError> {
        self.mesh_offsets
            .get(handle.index())
            .copied()
            .ok_or(MegaMeshError::InvalidOffsetHandle {
                handle: handle.0,
                count: self.mesh_offsets.len(),
            })
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn mesh_offsets(&self) -> &[MeshOffset] {
        &self.mesh_offsets
    }

    pub fn mesh_count(&self) -> usize {
        self.mesh_offsets.len()
    }

    /// Whether the CPU arrays changed since the last upload
    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    /// Whether GPU buffers are currently held
    pub fn is_uploaded(&self) -> bool {
        self.gpu.is_some()
    }

    pub fn gpu_buffers(&self) -> Option<&GpuMegaMesh> {
        self.gpu.as_ref()
    }
}

impl Drop for MegaMeshBuffer {
    fn drop(&mut self) {
        if self.gpu.is_some() {
            log::warn!(
                "{}: dropped while holding GPU buffers; call destroy_buffer() first",
                self.config.label
            );
        }
    }
}
