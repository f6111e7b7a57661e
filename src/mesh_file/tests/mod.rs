use glam::{Vec2, Vec3, Vec4};

use crate::resources::{Mesh, Vertex};


/// A triangle whose vertices carry distinct normals.
fn triangle(offset: f32) -> Mesh {
    let normals = [Vec3::X, Vec3::Y, Vec3::Z];
    let positions = [
        Vec3::new(offset, 0.0, 0.0),
        Vec3::new(offset + 1.0, 0.0, 0.0),
        Vec3::new(offset, 1.0, 0.0),
    ];
    let mut mesh = Mesh::new();
    for (i, (position, normal)) in positions.into_iter().zip(normals).enumerate() {
        mesh.push(Vertex::new(
            position,
            normal,
            Vec2::new(i as f32 * 0.5, 1.0),
            Vec4::new(1.0, 0.5, 0.25, 1.0),
        ));
    }
    mesh
}

/// Compare every field, including the normal that `==` skips.
fn assert_same_vertices(actual: &[Vertex], expected: &[Vertex]) {
    assert_eq!(actual.len(), expected.len(), "vertex count mismatch");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert_eq!(
            bytemuck::bytes_of(a),
            bytemuck::bytes_of(e),
            "vertex {i} differs: {a:?} vs {e:?}"
        );
    }
}
