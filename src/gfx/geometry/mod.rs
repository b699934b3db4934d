//! # Procedural and File-Backed Geometry
//!
//! Mesh data in the flat, non-indexed layout the renderer uploads: every
//! triangle lists its three vertices explicitly, and the position, UV and
//! normal arrays run in parallel.
//!
//! ## Sources
//!
//! - **Cube**: fixed 36-vertex unit cube spanning `[0, 1]` on every axis
//! - **Sphere**: unit UV sphere on a 20x20 (polar x azimuth) grid
//! - **Mesh file**: `v` / `vn` / `f a//n b//n c//n` text, see [`obj`]
//!
//! ## Usage
//!
//! ```rust
//! use kennel::gfx::geometry::{generate_cube, generate_sphere};
//!
//! let cube = generate_cube();
//! assert_eq!(cube.vertex_count(), 36);
//!
//! let sphere = generate_sphere();
//! assert_eq!(sphere.triangle_count(), 800);
//! ```

pub mod obj;
pub mod primitives;

pub use obj::parse_mesh;
pub use primitives::*;

/// Vertex arrays ready for upload, one entry per emitted vertex
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions (x, y, z)
    pub positions: Vec<[f32; 3]>,
    /// Texture coordinates (u, v), absent for meshes without UV data
    pub uvs: Option<Vec<[f32; 2]>>,
    /// Normal vectors (x, y, z)
    pub normals: Option<Vec<[f32; 3]>>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Checks that every present array matches the position count and that
    /// the vertices form whole triangles.
    pub fn is_consistent(&self) -> bool {
        let count = self.positions.len();
        count % 3 == 0
            && self.uvs.as_ref().map_or(true, |uvs| uvs.len() == count)
            && self.normals.as_ref().map_or(true, |n| n.len() == count)
    }

    /// Positions flattened for buffer upload
    pub fn position_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn uv_floats(&self) -> Option<&[f32]> {
        self.uvs.as_deref().map(bytemuck::cast_slice)
    }

    pub fn normal_floats(&self) -> Option<&[f32]> {
        self.normals.as_deref().map(bytemuck::cast_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consistency_catches_mismatched_normals() {
        let mesh = MeshData {
            positions: vec![[0.0; 3]; 3],
            uvs: None,
            normals: Some(vec![[0.0, 1.0, 0.0]; 2]),
        };
        assert!(!mesh.is_consistent());
    }

    #[test]
    fn test_flattened_views() {
        let mesh = MeshData {
            positions: vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]],
            uvs: Some(vec![[0.5, 0.25]; 3]),
            normals: None,
        };
        assert_eq!(mesh.position_floats().len(), 9);
        assert_eq!(mesh.position_floats()[3], 4.0);
        assert_eq!(mesh.uv_floats().map(<[f32]>::len), Some(6));
        assert!(mesh.normal_floats().is_none());
        assert_eq!(mesh.triangle_count(), 1);
    }
}
