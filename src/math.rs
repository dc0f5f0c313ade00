//! 3-D math helpers on top of glam.
//!
//! Covers the pieces glam has no direct equivalent for: uniform sampling on
//! the unit sphere, an arccos-free rotation taking one unit vector onto
//! another, and the 2-D affine readout used to hand a 3-D spin to a 2-D
//! scene graph.

use glam::{Mat3, Vec3};
use rand::Rng;

/// Minimum squared cross-product norm treated as a usable rotation axis.
const AXIS_EPSILON: f32 = 1e-12;

/// Sample a uniformly distributed point on the unit sphere.
///
/// Rejection-samples the unit ball and rescales, which is bias-free (no
/// pole clustering the naive lat/long parameterization would give).
pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.gen::<f32>() * 2.0 - 1.0,
            rng.gen::<f32>() * 2.0 - 1.0,
            rng.gen::<f32>() * 2.0 - 1.0,
        );
        let norm_sq = v.length_squared();
        if norm_sq <= 1.0 && norm_sq > AXIS_EPSILON {
            return v / norm_sq.sqrt();
        }
    }
}

/// Rotation about a unit axis by an angle (right-hand rule).
pub fn rotation_from_axis_angle(axis: Vec3, angle: f32) -> Mat3 {
    Mat3::from_axis_angle(axis, angle)
}

/// Rotation taking the unit vector `from` onto the unit vector `to`.
///
/// Arccos-free: cos comes from the dot product, sin from the cross-product
/// norm, fed straight into Rodrigues' formula. Parallel and antiparallel
/// inputs leave the axis undefined; those return identity instead of
/// dividing by a zero norm.
pub fn rotation_between(from: Vec3, to: Vec3) -> Mat3 {
    let cross = from.cross(to);
    let sin = cross.length();
    if sin * sin < AXIS_EPSILON {
        return Mat3::IDENTITY;
    }
    let cos = from.dot(to);
    let axis = cross / sin;

    rodrigues(axis, cos, sin)
}

/// Rodrigues' rotation matrix from a unit axis and precomputed cos/sin.
fn rodrigues(axis: Vec3, cos: f32, sin: f32) -> Mat3 {
    let (x, y, z) = (axis.x, axis.y, axis.z);
    let k = 1.0 - cos;

    // Columns of the row-major axis-angle matrix
    Mat3::from_cols(
        Vec3::new(cos + x * x * k, y * x * k + z * sin, z * x * k - y * sin),
        Vec3::new(x * y * k - z * sin, cos + y * y * k, z * y * k + x * sin),
        Vec3::new(x * z * k + y * sin, y * z * k - x * sin, cos + z * z * k),
    )
}

/// 2-D affine parameters a scene graph consumes for one sprite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteTransform {
    pub scale_x: f32,
    pub scale_y: f32,
    pub skew_x: f32,
    pub skew_y: f32,
}

/// Read a 2-D scale/skew approximation off a 3×3 linear transform.
///
/// Projects the linear part onto a 2×2 affine decomposition, discarding the
/// third row and column. Not a camera projection, but the readout expected
/// by sprite transforms.
pub fn decompose_2d(m: &Mat3) -> SpriteTransform {
    let d00 = m.x_axis.x;
    let d10 = m.x_axis.y;
    let d01 = m.y_axis.x;
    let d11 = m.y_axis.y;

    SpriteTransform {
        scale_x: (d00 * d00 + d10 * d10).sqrt(),
        scale_y: (d01 * d01 + d11 * d11).sqrt(),
        skew_y: d10.atan2(d00),
        skew_x: -(-d01).atan2(d11),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f32::consts::PI;

    fn assert_mat_near(a: Mat3, b: Mat3, tol: f32) {
        for col in 0..3 {
            for row in 0..3 {
                let (va, vb) = (a.col(col)[row], b.col(col)[row]);
                assert!(
                    (va - vb).abs() < tol,
                    "matrices differ at ({row},{col}): {va} vs {vb}"
                );
            }
        }
    }

    #[test]
    fn test_random_unit_vector_norm() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_random_unit_vector_no_pole_bias() {
        let mut rng = StdRng::seed_from_u64(42);
        let n = 20_000;
        let mut sum = Vec3::ZERO;
        let mut abs_sum = Vec3::ZERO;
        for _ in 0..n {
            let v = random_unit_vector(&mut rng);
            sum += v;
            abs_sum += v.abs();
        }
        let mean = sum / n as f32;
        let abs_mean = abs_sum / n as f32;

        // Uniform on the sphere: component means ~0, E[|component|] = 0.5
        // identically for every axis
        assert!(mean.length() < 0.02, "directional bias: {mean:?}");
        for (axis, m) in [("x", abs_mean.x), ("y", abs_mean.y), ("z", abs_mean.z)] {
            assert!((m - 0.5).abs() < 0.02, "pole bias on {axis}: {m}");
        }
    }

    #[test]
    fn test_axis_angle_rotation_is_orthogonal() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let axis = random_unit_vector(&mut rng);
            let angle = rng.gen::<f32>() * 2.0 * PI;
            let m = rotation_from_axis_angle(axis, angle);

            assert_mat_near(m * m.transpose(), Mat3::IDENTITY, 1e-5);
            assert!((m.determinant() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_rotation_between_maps_from_onto_to() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let from = random_unit_vector(&mut rng);
            let to = random_unit_vector(&mut rng);
            let rotated = rotation_between(from, to) * from;
            assert!((rotated - to).length() < 1e-4, "{rotated:?} != {to:?}");
        }
    }

    #[test]
    fn test_rotation_between_same_vector_is_identity() {
        let u = Vec3::new(0.0, 1.0, 0.0);
        assert_mat_near(rotation_between(u, u), Mat3::IDENTITY, 1e-6);
    }

    #[test]
    fn test_rotation_between_antiparallel_does_not_nan() {
        let u = Vec3::new(0.0, 0.0, 1.0);
        let m = rotation_between(u, -u);
        for col in 0..3 {
            for row in 0..3 {
                assert!(m.col(col)[row].is_finite());
            }
        }
        // Degenerate guard falls back to identity
        assert_mat_near(m, Mat3::IDENTITY, 1e-6);
    }

    #[test]
    fn test_rodrigues_matches_glam_axis_angle() {
        let mut rng = StdRng::seed_from_u64(23);
        for _ in 0..50 {
            let axis = random_unit_vector(&mut rng);
            let angle = rng.gen::<f32>() * 2.0 * PI;
            let ours = rodrigues(axis, angle.cos(), angle.sin());
            assert_mat_near(ours, Mat3::from_axis_angle(axis, angle), 1e-5);
        }
    }

    #[test]
    fn test_decompose_2d_pure_z_rotation() {
        let angle = 0.3_f32;
        let t = decompose_2d(&Mat3::from_rotation_z(angle));

        assert!((t.scale_x - 1.0).abs() < 1e-6);
        assert!((t.scale_y - 1.0).abs() < 1e-6);
        // Pure rotation reads out as skew_y = angle, skew_x = -angle
        assert!((t.skew_y - angle).abs() < 1e-6);
        assert!((t.skew_x + angle).abs() < 1e-6);
    }

    #[test]
    fn test_decompose_2d_uniform_scale() {
        let t = decompose_2d(&(Mat3::IDENTITY * 2.5));

        assert!((t.scale_x - 2.5).abs() < 1e-6);
        assert!((t.scale_y - 2.5).abs() < 1e-6);
        assert!(t.skew_x.abs() < 1e-6);
        assert!(t.skew_y.abs() < 1e-6);
    }
}
