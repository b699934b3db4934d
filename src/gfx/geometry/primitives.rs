//! # Primitive Shape Generation
//!
//! Fully unrolled triangle lists for the two built-in shapes. Both are pure
//! and deterministic; the renderer generates each once and reuses it.

use super::MeshData;
use std::f32::consts::PI;

/// Polar steps of the sphere grid
pub const SPHERE_POLAR_STEPS: u32 = 20;
/// Azimuth steps of the sphere grid
pub const SPHERE_AZIMUTH_STEPS: u32 = 20;

#[rustfmt::skip]
const CUBE_POSITIONS: [[f32; 3]; 36] = [
    // Front face
    [0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 0.0, 0.0],
    [0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0],
    // Top face
    [0.0, 1.0, 0.0], [0.0, 1.0, 1.0], [1.0, 1.0, 1.0],
    [0.0, 1.0, 0.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0],
    // Right face
    [1.0, 0.0, 0.0], [1.0, 1.0, 1.0], [1.0, 0.0, 1.0],
    [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0],
    // Bottom face
    [1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 1.0],
    [1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 1.0],
    // Back face
    [0.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0],
    [0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0],
    // Left face
    [0.0, 0.0, 0.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0],
];

#[rustfmt::skip]
const CUBE_UVS: [[f32; 2]; 36] = [
    // Front face
    [0.0, 0.0], [1.0, 1.0], [1.0, 0.0],
    [0.0, 0.0], [0.0, 1.0], [1.0, 1.0],
    // Top face
    [0.0, 1.0], [0.0, 0.0], [1.0, 0.0],
    [0.0, 1.0], [1.0, 0.0], [1.0, 1.0],
    // Right face
    [1.0, 0.0], [0.0, 1.0], [0.0, 0.0],
    [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
    // Bottom face
    [1.0, 0.0], [0.0, 1.0], [0.0, 0.0],
    [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
    // Back face
    [1.0, 0.0], [0.0, 1.0], [1.0, 1.0],
    [1.0, 0.0], [0.0, 0.0], [0.0, 1.0],
    // Left face
    [1.0, 0.0], [0.0, 1.0], [1.0, 1.0],
    [1.0, 0.0], [0.0, 0.0], [0.0, 1.0],
];

/// Face order matches [`CUBE_POSITIONS`]: front, top, right, bottom, back, left
pub const CUBE_FACE_NORMALS: [[f32; 3]; 6] = [
    [0.0, 0.0, -1.0],
    [0.0, 1.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, -1.0, 0.0],
    [0.0, 0.0, 1.0],
    [-1.0, 0.0, 0.0],
];

/// Generate the unit cube spanning `[0, 1]` on all axes
///
/// 12 triangles with no index buffer. Each face's six vertices share one
/// axis-aligned normal, and the per-face UV layout keeps textured faces
/// (sky, floor) upright.
pub fn generate_cube() -> MeshData {
    let normals = CUBE_FACE_NORMALS
        .iter()
        .flat_map(|normal| std::iter::repeat(*normal).take(6))
        .collect();

    MeshData {
        positions: CUBE_POSITIONS.to_vec(),
        uvs: Some(CUBE_UVS.to_vec()),
        normals: Some(normals),
    }
}

/// Generate the unit UV sphere centered at the origin
///
/// The polar angle `t` sweeps `[0, π)` and the azimuth `r` sweeps `[0, 2π)`
/// in [`SPHERE_POLAR_STEPS`] x [`SPHERE_AZIMUTH_STEPS`] cells. Each cell with
/// corners `p1 = (t, r)`, `p2 = (t + dt, r)`, `p3 = (t, r + dr)` and
/// `p4 = (t + dt, r + dr)` emits the triangles `(p1, p2, p4)` and
/// `(p1, p4, p3)`. UVs are `(t / π, r / 2π)`.
pub fn generate_sphere() -> MeshData {
    generate_sphere_with_steps(SPHERE_POLAR_STEPS, SPHERE_AZIMUTH_STEPS)
}

/// [`generate_sphere`] at an arbitrary resolution
///
/// Normals are the normalized corner positions, so they stay correct when
/// the sphere is later scaled non-uniformly through the normal matrix.
pub fn generate_sphere_with_steps(polar_steps: u32, azimuth_steps: u32) -> MeshData {
    let polar_steps = polar_steps.max(2);
    let azimuth_steps = azimuth_steps.max(3);
    let dt = PI / polar_steps as f32;
    let dr = 2.0 * PI / azimuth_steps as f32;

    let capacity = (polar_steps * azimuth_steps * 6) as usize;
    let mut positions = Vec::with_capacity(capacity);
    let mut uvs = Vec::with_capacity(capacity);

    for i in 0..polar_steps {
        let t = i as f32 * dt;
        for j in 0..azimuth_steps {
            let r = j as f32 * dr;

            let p1 = (t, r);
            let p2 = (t + dt, r);
            let p3 = (t, r + dr);
            let p4 = (t + dt, r + dr);

            for (polar, azimuth) in [p1, p2, p4, p1, p4, p3] {
                positions.push(spherical_point(polar, azimuth));
                uvs.push([polar / PI, azimuth / (2.0 * PI)]);
            }
        }
    }

    let normals = positions.iter().map(|p| normalize(*p)).collect();

    MeshData {
        positions,
        uvs: Some(uvs),
        normals: Some(normals),
    }
}

fn spherical_point(polar: f32, azimuth: f32) -> [f32; 3] {
    [
        polar.sin() * azimuth.cos(),
        polar.sin() * azimuth.sin(),
        polar.cos(),
    ]
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let length = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if length > 0.0 {
        [v[0] / length, v[1] / length, v[2] / length]
    } else {
        [0.0, 0.0, 1.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_generation() {
        let cube = generate_cube();
        assert_eq!(cube.vertex_count(), 36);
        assert_eq!(cube.uvs.as_ref().unwrap().len(), 36);
        assert_eq!(cube.normals.as_ref().unwrap().len(), 36);
        assert_eq!(cube.triangle_count(), 12);
        assert!(cube.is_consistent());
    }

    #[test]
    fn test_cube_faces_share_canonical_normals() {
        let cube = generate_cube();
        let normals = cube.normals.unwrap();
        for (face, chunk) in normals.chunks(6).enumerate() {
            let expected = CUBE_FACE_NORMALS[face];
            assert!(chunk.iter().all(|n| *n == expected), "face {face}");
        }

        // Every vertex of a face lies on the plane its normal points out of
        for (face, chunk) in cube.positions.chunks(6).enumerate() {
            let normal = CUBE_FACE_NORMALS[face];
            let axis = normal.iter().position(|c| *c != 0.0).unwrap();
            let plane = if normal[axis] > 0.0 { 1.0 } else { 0.0 };
            assert!(chunk.iter().all(|p| p[axis] == plane), "face {face}");
        }
    }

    #[test]
    fn test_cube_front_face_uv_orientation() {
        let cube = generate_cube();
        let uvs = cube.uvs.unwrap();
        // The front face maps x to u and y to v
        for (p, uv) in cube.positions[..6].iter().zip(&uvs[..6]) {
            assert_eq!([p[0], p[1]], *uv);
        }
    }

    #[test]
    fn test_sphere_vertex_count() {
        let sphere = generate_sphere();
        assert_eq!(sphere.vertex_count(), 2 * 20 * 20 * 3);
        assert_eq!(sphere.vertex_count(), 2400);
        assert!(sphere.is_consistent());
    }

    #[test]
    fn test_sphere_points_on_unit_sphere() {
        let sphere = generate_sphere();
        for p in &sphere.positions {
            let length = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert!((length - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_sphere_first_cell_winding_and_uvs() {
        let sphere = generate_sphere();
        let uvs = sphere.uvs.as_ref().unwrap();
        let dt = PI / SPHERE_POLAR_STEPS as f32;
        let dr = 2.0 * PI / SPHERE_AZIMUTH_STEPS as f32;

        // (p1, p2, p4) then (p1, p4, p3)
        let expected = [
            [0.0, 0.0],
            [dt / PI, 0.0],
            [dt / PI, dr / (2.0 * PI)],
            [0.0, 0.0],
            [dt / PI, dr / (2.0 * PI)],
            [0.0, dr / (2.0 * PI)],
        ];
        for (uv, want) in uvs[..6].iter().zip(expected) {
            assert!((uv[0] - want[0]).abs() < 1e-6 && (uv[1] - want[1]).abs() < 1e-6);
        }
    }

    #[test]
    fn test_sphere_normals_are_unit_length() {
        let sphere = generate_sphere_with_steps(8, 6);
        assert_eq!(sphere.vertex_count(), 8 * 6 * 6);
        for (p, n) in sphere.positions.iter().zip(sphere.normals.unwrap()) {
            let length = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert!((length - 1.0).abs() < 1e-5);
            assert!((p[0] - n[0]).abs() < 1e-5);
        }
    }
}
