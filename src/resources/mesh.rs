//! Mesh data structures and generation

use super::vertex::Vertex;
use glam::{Vec2, Vec3, Vec4};

/// An ordered list of vertices forming a non-indexed triangle list
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub base_scale: Vec3,
}

impl Default for Mesh {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            base_scale: Vec3::ONE,
        }
    }
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vertices(vertices: Vec<Vertex>) -> Self {
        Self {
            vertices,
            ..Self::default()
        }
    }

    pub fn with_base_scale(mut self, base_scale: Vec3) -> Self {
        self.base_scale = base_scale;
        self
    }

    pub fn push(&mut self, vertex: Vertex) {
        self.vertices.push(vertex);
    }

    /// Calculate vertex count
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get vertex data as bytes
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Create a unit quad on the XY plane facing +Z
    pub fn quad(color: Vec4) -> Self {
        let corners = [
            (Vec3::new(-0.5, -0.5, 0.0), Vec2::new(0.0, 1.0)),
            (Vec3::new(0.5, -0.5, 0.0), Vec2::new(1.0, 1.0)),
            (Vec3::new(0.5, 0.5, 0.0), Vec2::new(1.0, 0.0)),
            (Vec3::new(-0.5, 0.5, 0.0), Vec2::new(0.0, 0.0)),
        ];

        let mut mesh = Mesh::new();
        for corner in [0, 1, 2, 0, 2, 3] {
            let (position, uv) = corners[corner];
            mesh.push(Vertex::new(position, Vec3::Z, uv, color));
        }
        mesh
    }

    /// Create a unit cube centered at origin
    pub fn cube(color: Vec4) -> Self {
        // Four corners per face, counter-clockwise
        let faces = [
            // Front face
            (
                Vec3::Z,
                [
                    (Vec3::new(-0.5, -0.5, 0.5), Vec2::new(0.0, 1.0)),
                    (Vec3::new(0.5, -0.5, 0.5), Vec2::new(1.0, 1.0)),
                    (Vec3::new(0.5, 0.5, 0.5), Vec2::new(1.0, 0.0)),
                    (Vec3::new(-0.5, 0.5, 0.5), Vec2::new(0.0, 0.0)),
                ],
            ),
            // Back face
            (
                -Vec3::Z,
                [
                    (Vec3::new(0.5, -0.5, -0.5), Vec2::new(0.0, 1.0)),
                    (Vec3::new(-0.5, -0.5, -0.5), Vec2::new(1.0, 1.0)),
                    (Vec3::new(-0.5, 0.5, -0.5), Vec2::new(1.0, 0.0)),
                    (Vec3::new(0.5, 0.5, -0.5), Vec2::new(0.0, 0.0)),
                ],
            ),
            // Right face
            (
                Vec3::X,
                [
                    (Vec3::new(0.5, -0.5, 0.5), Vec2::new(0.0, 1.0)),
                    (Vec3::new(0.5, -0.5, -0.5), Vec2::new(1.0, 1.0)),
                    (Vec3::new(0.5, 0.5, -0.5), Vec2::new(1.0, 0.0)),
                    (Vec3::new(0.5, 0.5, 0.5), Vec2::new(0.0, 0.0)),
                ],
            ),
            // Left face
            (
                -Vec3::X,
                [
                    (Vec3::new(-0.5, -0.5, -0.5), Vec2::new(0.0, 1.0)),
                    (Vec3::new(-0.5, -0.5, 0.5), Vec2::new(1.0, 1.0)),
                    (Vec3::new(-0.5, 0.5, 0.5), Vec2::new(1.0, 0.0)),
                    (Vec3::new(-0.5, 0.5, -0.5), Vec2::new(0.0, 0.0)),
                ],
            ),
            // Top face
            (
                Vec3::Y,
                [
                    (Vec3::new(-0.5, 0.5, 0.5), Vec2::new(0.0, 1.0)),
                    (Vec3::new(0.5, 0.5, 0.5), Vec2::new(1.0, 1.0)),
                    (Vec3::new(0.5, 0.5, -0.5), Vec2::new(1.0, 0.0)),
                    (Vec3::new(-0.5, 0.5, -0.5), Vec2::new(0.0, 0.0)),
                ],
            ),
            // Bottom face
            (
                -Vec3::Y,
                [
                    (Vec3::new(-0.5, -0.5, -0.5), Vec2::new(0.0, 1.0)),
                    (Vec3::new(0.5, -0.5, -0.5), Vec2::new(1.0, 1.0)),
                    (Vec3::new(0.5, -0.5, 0.5), Vec2::new(1.0, 0.0)),
                    (Vec3::new(-0.5, -0.5, 0.5), Vec2::new(0.0, 0.0)),
                ],
            ),
        ];

        let mut mesh = Mesh::new();
        for (normal, corners) in faces {
            // Two triangles per face
            for corner in [0, 1, 2, 0, 2, 3] {
                let (position, uv) = corners[corner];
                mesh.push(Vertex::new(position, normal, uv, color));
            }
        }
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_scale() {
        assert_eq!(Mesh::new().base_scale, Vec3::ONE);
        assert_eq!(Mesh::from_vertices(Vec::new()).base_scale, Vec3::ONE);
    }

    #[test]
    fn test_generators() {
        let quad = Mesh::quad(Vec4::ONE);
        assert_eq!(quad.vertex_count(), 6);
        assert_eq!(quad.vertices[0], quad.vertices[3]);

        let cube = Mesh::cube(Vec4::ONE);
        assert_eq!(cube.vertex_count(), 36);
        assert_eq!(cube.vertex_bytes().len(), 36 * Vertex::SIZE);
    }
}
