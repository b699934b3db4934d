//! Affine transform helpers on top of cgmath
//!
//! Matrices compose right-to-left: `parent * translate * rotate * scale`
//! applied to a model-space point scales first and applies the parent last.

use cgmath::{Deg, InnerSpace, Matrix, Matrix4, SquareMatrix, Vector3};

/// Inverse-transpose of `model`, used to carry normals into world space
///
/// A singular model matrix (a zero scale axis) has no meaningful normal
/// transform; identity is returned so the draw still lights uniformly.
pub fn normal_matrix(model: &Matrix4<f32>) -> Matrix4<f32> {
    match model.invert() {
        Some(inverse) => inverse.transpose(),
        None => Matrix4::identity(),
    }
}

/// Rotation of `degrees` around an arbitrary (not necessarily unit) axis
pub fn rotation(degrees: f32, axis: Vector3<f32>) -> Matrix4<f32> {
    if axis.magnitude2() == 0.0 {
        return Matrix4::identity();
    }
    Matrix4::from_axis_angle(axis.normalize(), Deg(degrees))
}

pub fn translation(offset: [f32; 3]) -> Matrix4<f32> {
    Matrix4::from_translation(offset.into())
}

pub fn scale(factors: [f32; 3]) -> Matrix4<f32> {
    Matrix4::from_nonuniform_scale(factors[0], factors[1], factors[2])
}

/// Column-major array layout expected by the shader uniforms
pub fn to_columns(matrix: &Matrix4<f32>) -> [[f32; 4]; 4] {
    (*matrix).into()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::Rng;

    pub(crate) fn assert_matrix_eq(a: &Matrix4<f32>, b: &Matrix4<f32>, epsilon: f32) {
        let (a, b) = (to_columns(a), to_columns(b));
        for column in 0..4 {
            for row in 0..4 {
                assert!(
                    (a[column][row] - b[column][row]).abs() < epsilon,
                    "mismatch at [{column}][{row}]: {a:?} vs {b:?}"
                );
            }
        }
    }

    #[test]
    fn test_pure_rotation_normal_matrix_is_itself() {
        let model = rotation(37.0, Vector3::new(1.0, 2.0, 0.5));
        assert_matrix_eq(&normal_matrix(&model), &model, 1e-5);
    }

    #[test]
    fn test_normal_matrix_of_nonuniform_scale() {
        let model = scale([2.0, 4.0, 0.5]);
        assert_matrix_eq(&normal_matrix(&model), &scale([0.5, 0.25, 2.0]), 1e-6);
    }

    #[test]
    fn test_normal_matrix_matches_inverse_transpose() {
        let mut rng = rand::rng();
        for _ in 0..32 {
            let model = translation([
                rng.random_range(-5.0..5.0),
                rng.random_range(-5.0..5.0),
                rng.random_range(-5.0..5.0),
            ]) * rotation(
                rng.random_range(-180.0..180.0),
                Vector3::new(rng.random_range(0.1..1.0), rng.random_range(-1.0..1.0), 0.3),
            ) * scale([
                rng.random_range(0.1..3.0),
                rng.random_range(0.1..3.0),
                rng.random_range(0.1..3.0),
            ]);

            let normal = normal_matrix(&model);
            // N^T * M = I  <=>  N = (M^-1)^T
            assert_matrix_eq(&(normal.transpose() * model), &Matrix4::identity(), 1e-4);
        }
    }

    #[test]
    fn test_singular_model_falls_back_to_identity() {
        let model = scale([1.0, 0.0, 1.0]);
        assert_matrix_eq(&normal_matrix(&model), &Matrix4::identity(), 1e-6);
    }

    #[test]
    fn test_composition_applies_scale_first() {
        use cgmath::Vector4;
        let m = translation([1.0, 0.0, 0.0]) * rotation(90.0, Vector3::unit_z()) * scale([2.0, 1.0, 1.0]);
        let p = m * Vector4::new(1.0, 0.0, 0.0, 1.0);
        // scale -> (2,0,0), rotate -> (0,2,0), translate -> (1,2,0)
        assert!((p.x - 1.0).abs() < 1e-5 && (p.y - 2.0).abs() < 1e-5 && p.z.abs() < 1e-5);
    }
}
