//! Vertex type and the equality used to merge vertices

use crate::backend::types::{VertexAttribute, VertexBufferLayout, VertexFormat};
use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3, Vec4};

/// Standard vertex with position, normal, texture coordinates and color.
///
/// Two vertices compare equal when their position, color and texture
/// coordinates are equal. The normal takes no part in the comparison, so
/// vertices that differ only in their normal are merged by
/// [`MegaMeshBuffer`](crate::resources::MegaMeshBuffer).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coords: Vec2,
    pub color: Vec4,
}

impl Vertex {
    /// Size in bytes of one vertex record, in buffers and in `.smesh` blobs.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    pub fn new(position: Vec3, normal: Vec3, tex_coords: Vec2, color: Vec4) -> Self {
        Self {
            position,
            normal,
            tex_coords,
            color,
        }
    }

    /// Attribute layout in field order, packed without padding.
    pub fn layout() -> VertexBufferLayout {
        let fields = [
            ("position", VertexFormat::Float32x3),
            ("normal", VertexFormat::Float32x3),
            ("tex_coords", VertexFormat::Float32x2),
            ("color", VertexFormat::Float32x4),
        ];

        let mut offset = 0;
        let mut attributes = Vec::with_capacity(fields.len());
        for (location, (name, format)) in fields.into_iter().enumerate() {
            attributes.push(VertexAttribute {
                location: location as u32,
                format,
                offset,
                name,
            });
            offset += format.size();
        }

        VertexBufferLayout {
            array_stride: Self::SIZE as u64,
            attributes,
        }
    }

    /// Hashable key agreeing with `==`.
    ///
    /// `-0.0` is folded onto `0.0`. Returns `None` if a compared component is
    /// NaN, since such a vertex is equal to nothing.
    pub fn dedup_key(&self) -> Option<VertexKey> {
        let fields = [
            self.position.x,
            self.position.y,
            self.position.z,
            self.color.x,
            self.color.y,
            self.color.z,
            self.color.w,
            self.tex_coords.x,
            self.tex_coords.y,
        ];

        let mut bits = [0u32; 9];
        for (slot, value) in bits.iter_mut().zip(fields) {
            if value.is_nan() {
                return None;
            }
            *slot = if value == 0.0 { 0 } else { value.to_bits() };
        }
        Some(VertexKey(bits))
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
            && self.color == other.color
            && self.tex_coords == other.tex_coords
    }
}

/// Bit-level key over the fields compared by `Vertex`'s `PartialEq`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexKey([u32; 9]);

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(position: Vec3, normal: Vec3) -> Vertex {
        Vertex::new(position, normal, Vec2::new(0.5, 0.5), Vec4::ONE)
    }

    #[test]
    fn test_vertex_size() {
        assert_eq!(Vertex::SIZE, 48);
        assert_eq!(Vertex::layout().array_stride, 48);
    }

    #[test]
    fn test_layout_offsets_match_fields() {
        let layout = Vertex::layout();
        assert_eq!(layout.attribute("position").unwrap().offset, 0);
        assert_eq!(layout.attribute("normal").unwrap().offset, 12);
        assert_eq!(layout.attribute("tex_coords").unwrap().offset, 24);
        assert_eq!(layout.attribute("color").unwrap().offset, 32);
        assert_eq!(layout.attribute("color").unwrap().location, 3);

        let packed: u64 = layout.attributes.iter().map(|a| a.format.size()).sum();
        assert_eq!(packed, layout.array_stride);
    }

    #[test]
    fn test_equality_ignores_normal() {
        let a = vertex(Vec3::X, Vec3::Y);
        let b = vertex(Vec3::X, Vec3::Z);
        assert_eq!(a, b);
        assert_eq!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn test_equality_checks_color_and_uv() {
        let a = vertex(Vec3::X, Vec3::Y);

        let mut recolored = a;
        recolored.color = Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert_ne!(a, recolored);
        assert_ne!(a.dedup_key(), recolored.dedup_key());

        let mut remapped = a;
        remapped.tex_coords = Vec2::ZERO;
        assert_ne!(a, remapped);
        assert_ne!(a.dedup_key(), remapped.dedup_key());
    }

    #[test]
    fn test_signed_zero_is_one_key() {
        let a = vertex(Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
        let b = vertex(Vec3::new(-0.0, 1.0, 0.0), Vec3::Y);
        assert_eq!(a, b);
        assert_eq!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn test_nan_has_no_key() {
        let a = vertex(Vec3::new(f32::NAN, 0.0, 0.0), Vec3::Y);
        assert_ne!(a, a);
        assert!(a.dedup_key().is_none());

        // NaN in the ignored normal still merges
        let b = vertex(Vec3::ZERO, Vec3::splat(f32::NAN));
        assert!(b.dedup_key().is_some());
    }
}
