//! Dummy GPU backend for testing and development.
//!
//! This backend doesn't perform actual GPU operations. It keeps a copy of every
//! live buffer and records the commands issued against it, so callers can
//! check what would have reached the GPU.

use std::collections::HashMap;
use std::ops::Range;

use super::traits::*;
use super::types::*;

/// A command recorded by [`DummyBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCommand {
    SetVertexBuffer {
        slot: u32,
        buffer: BufferHandle,
        offset: u64,
    },
    SetIndexBuffer {
        buffer: BufferHandle,
        offset: u64,
        format: IndexFormat,
    },
    DrawIndexed {
        indices: Range<u32>,
        base_vertex: i32,
        instances: Range<u32>,
    },
}

/// A live buffer held by the dummy backend.
#[derive(Debug, Clone)]
pub struct DummyBuffer {
    pub descriptor: BufferDescriptor,
    pub data: Vec<u8>,
}

/// Dummy GPU backend.
#[derive(Debug)]
pub struct DummyBackend {
    buffers: HashMap<u64, DummyBuffer>,
    next_buffer_id: u64,
    commands: Vec<RecordedCommand>,
    memory_budget: Option<u64>,
    created_count: usize,
    destroyed_count: usize,
}

impl Default for DummyBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DummyBackend {
    /// Create a new dummy backend.
    pub fn new() -> Self {
        Self {
            buffers: HashMap::new(),
            next_buffer_id: 1,
            commands: Vec::new(),
            memory_budget: None,
            created_count: 0,
            destroyed_count: 0,
        }
    }

    /// Limit the total bytes of live buffers; allocations past it fail with
    /// [`BackendError::OutOfMemory`].
    pub fn with_memory_budget(mut self, bytes: u64) -> Self {
        self.memory_budget = Some(bytes);
        self
    }

    /// Get the backend name.
    pub fn name(&self) -> &'static str {
        "Dummy"
    }

    /// Look up a live buffer.
    pub fn buffer(&self, handle: BufferHandle) -> Option<&DummyBuffer> {
        self.buffers.get(&handle.0)
    }

    /// Number of buffers currently alive.
    pub fn live_buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Total bytes held by live buffers.
    pub fn live_bytes(&self) -> u64 {
        self.buffers.values().map(|b| b.data.len() as u64).sum()
    }

    /// Number of successful buffer creations since the backend was made.
    pub fn created_count(&self) -> usize {
        self.created_count
    }

    /// Number of buffer destructions since the backend was made.
    pub fn destroyed_count(&self) -> usize {
        self.destroyed_count
    }

    /// Commands recorded so far.
    pub fn commands(&self) -> &[RecordedCommand] {
        &self.commands
    }

    /// Drain the recorded commands.
    pub fn take_commands(&mut self) -> Vec<RecordedCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl BufferBackend for DummyBackend {
    fn create_buffer_init(
        &mut self,
        desc: &BufferDescriptor,
        data: &[u8],
    ) -> BackendResult<BufferHandle> {
        if data.len() as u64 != desc.size {
            return Err(BackendError::BufferCreationFailed(format!(
                "{:?}: descriptor size {} does not match {} bytes of data",
                desc.label,
                desc.size,
                data.len()
            )));
        }
        if let Some(budget) = self.memory_budget {
            if self.live_bytes() + desc.size > budget {
                log::trace!(
                    "DummyBackend: buffer {:?} ({} bytes) exceeds budget of {} bytes",
                    desc.label,
                    desc.size,
                    budget
                );
                return Err(BackendError::OutOfMemory);
            }
        }

        let id = self.next_buffer_id;
        self.next_buffer_id += 1;
        log::trace!(
            "DummyBackend: creating buffer {} {:?} (size: {})",
            id,
            desc.label,
            desc.size
        );
        self.buffers.insert(
            id,
            DummyBuffer {
                descriptor: desc.clone(),
                data: data.to_vec(),
            },
        );
        self.created_count += 1;

        Ok(BufferHandle(id))
    }

    fn destroy_buffer(&mut self, buffer: BufferHandle) {
        if self.buffers.remove(&buffer.0).is_some() {
            log::trace!("DummyBackend: destroying buffer {}", buffer.0);
            self.destroyed_count += 1;
        } else {
            log::warn!("DummyBackend: destroy of unknown buffer {}", buffer.0);
        }
    }
}

impl CommandRecorder for DummyBackend {
    fn set_vertex_buffer(&mut self, slot: u32, buffer: BufferHandle, offset: u64) {
        self.commands.push(RecordedCommand::SetVertexBuffer {
            slot,
            buffer,
            offset,
        });
    }

    fn set_index_buffer(&mut self, buffer: BufferHandle, offset: u64, format: IndexFormat) {
        self.commands.push(RecordedCommand::SetIndexBuffer {
            buffer,
            offset,
            format,
        });
    }

    fn draw_indexed(&mut self, indices: Range<u32>, base_vertex: i32, instances: Range<u32>) {
        self.commands.push(RecordedCommand::DrawIndexed {
            indices,
            base_vertex,
            instances,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex_desc(size: u64) -> BufferDescriptor {
        BufferDescriptor {
            label: Some("test".into()),
            size,
            usage: BufferUsage::VERTEX,
            element_size: 4,
        }
    }

    #[test]
    fn test_create_and_destroy() {
        let mut backend = DummyBackend::new();
        let handle = backend.create_buffer_init(&vertex_desc(8), &[1; 8]).unwrap();
        assert_eq!(backend.live_buffer_count(), 1);
        assert_eq!(backend.buffer(handle).unwrap().data, vec![1; 8]);

        backend.destroy_buffer(handle);
        assert_eq!(backend.live_buffer_count(), 0);
        assert_eq!(backend.destroyed_count(), 1);
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let mut backend = DummyBackend::new();
        let result = backend.create_buffer_init(&vertex_desc(16), &[0; 8]);
        assert!(matches!(result, Err(BackendError::BufferCreationFailed(_))));
        assert_eq!(backend.created_count(), 0);
    }

    #[test]
    fn test_memory_budget() {
        let mut backend = DummyBackend::new().with_memory_budget(12);
        backend.create_buffer_init(&vertex_desc(8), &[0; 8]).unwrap();
        let result = backend.create_buffer_init(&vertex_desc(8), &[0; 8]);
        assert_eq!(result, Err(BackendError::OutOfMemory));
    }

    #[test]
    fn test_commands_recorded() {
        let mut backend = DummyBackend::new();
        let handle = backend.create_buffer_init(&vertex_desc(4), &[0; 4]).unwrap();
        backend.set_vertex_buffer(0, handle, 0);
        backend.draw_indexed(3..5, 0, 0..1);

        let commands = backend.take_commands();
        assert_eq!(commands.len(), 2);
        assert_eq!(
            commands[1],
            RecordedCommand::DrawIndexed {
                indices: 3..5,
                base_vertex: 0,
                instances: 0..1
            }
        );
        assert!(backend.commands().is_empty());
    }
}
