//! Common types shared between backends

/// Buffer usage flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferUsage(u32);

impl BufferUsage {
    pub const INDEX: Self = Self(1 << 4);
    pub const VERTEX: Self = Self(1 << 5);

    pub fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn bits(&self) -> u32 {
        self.0
    }
}

impl std::ops::BitOr for BufferUsage {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

/// Buffer descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferDescriptor {
    pub label: Option<String>,
    pub size: u64,
    pub usage: BufferUsage,
    /// Size of one element (vertex stride or index width)
    pub element_size: u64,
}

impl BufferDescriptor {
    /// Number of elements the buffer holds
    pub fn element_count(&self) -> u64 {
        if self.element_size == 0 {
            0
        } else {
            self.size / self.element_size
        }
    }
}

/// Index format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFormat {
    Uint32,
}

impl IndexFormat {
    /// Size in bytes of each index
    pub fn size(&self) -> u64 {
        match self {
            IndexFormat::Uint32 => 4,
        }
    }
}

/// Vertex attribute format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexFormat {
    Float32x2,
    Float32x3,
    Float32x4,
}

impl VertexFormat {
    pub fn size(&self) -> u64 {
        match self {
            VertexFormat::Float32x2 => 8,
            VertexFormat::Float32x3 => 12,
            VertexFormat::Float32x4 => 16,
        }
    }
}

/// Vertex attribute description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub format: VertexFormat,
    pub offset: u64,
    pub name: &'static str,
}

/// Vertex buffer layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexBufferLayout {
    pub array_stride: u64,
    pub attributes: Vec<VertexAttribute>,
}

impl VertexBufferLayout {
    /// Find an attribute by its shader name
    pub fn attribute(&self, name: &str) -> Option<&VertexAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_usage_flags() {
        let usage = BufferUsage::VERTEX | BufferUsage::INDEX;
        assert!(usage.contains(BufferUsage::VERTEX));
        assert!(usage.contains(BufferUsage::INDEX));
        assert!(!BufferUsage::VERTEX.contains(BufferUsage::INDEX));
        assert_eq!(usage.bits(), BufferUsage::VERTEX.bits() | BufferUsage::INDEX.bits());
    }

    #[test]
    fn test_element_count() {
        let desc = BufferDescriptor {
            label: None,
            size: 48 * 5,
            usage: BufferUsage::VERTEX,
            element_size: 48,
        };
        assert_eq!(desc.element_count(), 5);

        let empty = BufferDescriptor {
            element_size: 0,
            ..desc
        };
        assert_eq!(empty.element_count(), 0);
    }

    #[test]
    fn test_index_format_size() {
        assert_eq!(IndexFormat::Uint32.size(), 4);
    }
}
