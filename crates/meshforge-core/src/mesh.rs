//! Triangle mesh payloads
//!
//! Meshes arrive from the document's geometry kernel or from a provider's
//! rewrite step; once attached to a geometry unit they are shared read-only
//! via `Arc` and never mutated in place.

use crate::bounds::Aabb;
use crate::hash::Fnv1a32;
use glam::{Vec2, Vec3};

/// A vertex with position, normal, and UV coordinates
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            uv: uv.to_array(),
        }
    }
}

/// A triangle mesh
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Calculate face normals and smooth them
    pub fn recalculate_normals(&mut self) {
        for v in &mut self.vertices {
            v.normal = [0.0, 0.0, 0.0];
        }

        // Accumulate face normals; a trailing partial triangle is ignored
        for tri in self.indices.chunks_exact(3) {
            let i0 = tri[0] as usize;
            let i1 = tri[1] as usize;
            let i2 = tri[2] as usize;

            let p0 = Vec3::from_array(self.vertices[i0].position);
            let p1 = Vec3::from_array(self.vertices[i1].position);
            let p2 = Vec3::from_array(self.vertices[i2].position);

            let face_normal = (p1 - p0).cross(p2 - p0);

            for &i in &[i0, i1, i2] {
                self.vertices[i].normal[0] += face_normal.x;
                self.vertices[i].normal[1] += face_normal.y;
                self.vertices[i].normal[2] += face_normal.z;
            }
        }

        for v in &mut self.vertices {
            let n = Vec3::from_array(v.normal);
            v.normal = n.normalize_or_zero().to_array();
        }
    }

    /// Local-space bounding box over all vertices
    pub fn bounding_box(&self) -> Aabb {
        let mut bbox = Aabb::empty();
        for v in &self.vertices {
            bbox = bbox.union_point(Vec3::from_array(v.position));
        }
        bbox
    }

    /// Hash of the mesh bytes
    ///
    /// Used by the display cache to verify that geometry units sharing a
    /// cache key really wrap byte-identical payloads. Not the running
    /// pipeline hash.
    pub fn content_hash(&self) -> u32 {
        let mut h = Fnv1a32::new();
        h.write_bytes(bytemuck::cast_slice(&self.vertices));
        h.write_bytes(bytemuck::cast_slice(&self.indices));
        h.finish()
    }
}

/// Build a unit quad in the XY plane, for tests and trivial sources
pub fn unit_quad() -> Mesh {
    let n = Vec3::Z;
    Mesh {
        vertices: vec![
            Vertex::new(Vec3::new(-0.5, -0.5, 0.0), n, Vec2::new(0.0, 0.0)),
            Vertex::new(Vec3::new(0.5, -0.5, 0.0), n, Vec2::new(1.0, 0.0)),
            Vertex::new(Vec3::new(0.5, 0.5, 0.0), n, Vec2::new(1.0, 1.0)),
            Vertex::new(Vec3::new(-0.5, 0.5, 0.0), n, Vec2::new(0.0, 1.0)),
        ],
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_counts() {
        let quad = unit_quad();
        assert_eq!(quad.vertex_count(), 4);
        assert_eq!(quad.triangle_count(), 2);
    }

    #[test]
    fn test_bounding_box() {
        let bbox = unit_quad().bounding_box();
        assert_relative_eq!(bbox.size().x, 1.0);
        assert_relative_eq!(bbox.size().y, 1.0);
        assert_relative_eq!(bbox.size().z, 0.0);
    }

    #[test]
    fn test_recalculate_normals_flat_quad() {
        let mut quad = unit_quad();
        for v in &mut quad.vertices {
            v.normal = [0.0, 1.0, 0.0];
        }
        quad.recalculate_normals();
        for v in &quad.vertices {
            assert_relative_eq!(v.normal[2], 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_recalculate_normals_ignores_partial_triangle() {
        let mut quad = unit_quad();
        quad.indices.push(1);
        quad.recalculate_normals();
        for v in &quad.vertices {
            assert_relative_eq!(v.normal[2], 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_content_hash_tracks_bytes() {
        let a = unit_quad();
        let mut b = unit_quad();
        assert_eq!(a.content_hash(), b.content_hash());
        b.vertices[0].position[0] += 0.25;
        assert_ne!(a.content_hash(), b.content_hash());
    }
}
