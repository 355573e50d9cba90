//! Vector and Matrix Math
//!
//! Thin layer over [`glam`] that fixes the conventions the rest of the toolkit
//! relies on:
//!
//! - Matrices are stored column-major (`glam::Mat4`), addressed here as
//!   `at(m, row, col)`.
//! - Points are **row vectors**: a point `p` is transformed as `p * M`, so
//!   translations live in row 3 and a chain `A * B` applies `A` first.
//! - The vertex shaders multiply `vec4(position, 1.0) * model * view * projection`,
//!   which is the same convention on the GPU side.

use glam::{Mat4, Vec4};

pub use glam::{Vec2 as Vec2f, Vec3 as Vec3f};

/// 4×4 float matrix, column-major storage.
pub type Mat4f = Mat4;

/// Angles recovered from a rotation matrix by [`euler_from_rotation`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EulerAngles {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

// ============================================================================
// Vectors
// ============================================================================

#[inline]
#[must_use]
pub fn add(a: Vec3f, b: Vec3f) -> Vec3f {
    a + b
}

#[inline]
#[must_use]
pub fn sub(a: Vec3f, b: Vec3f) -> Vec3f {
    a - b
}

/// Component-wise product.
#[inline]
#[must_use]
pub fn mul(a: Vec3f, b: Vec3f) -> Vec3f {
    a * b
}

#[inline]
#[must_use]
pub fn cross(a: Vec3f, b: Vec3f) -> Vec3f {
    a.cross(b)
}

/// Divides by the magnitude. A zero vector yields NaN components.
#[inline]
#[must_use]
pub fn normalize(a: Vec3f) -> Vec3f {
    a / a.length()
}

// ============================================================================
// Matrices
// ============================================================================

/// Element at `row`, `col`.
#[inline]
#[must_use]
pub fn at(m: &Mat4f, row: usize, col: usize) -> f32 {
    m.col(col)[row]
}

#[inline]
#[must_use]
pub fn identity() -> Mat4f {
    Mat4::IDENTITY
}

#[must_use]
pub fn scale(x: f32, y: f32, z: f32) -> Mat4f {
    Mat4::from_diagonal(Vec4::new(x, y, z, 1.0))
}

#[must_use]
pub fn translate(x: f32, y: f32, z: f32) -> Mat4f {
    Mat4::from_cols(
        Vec4::new(1.0, 0.0, 0.0, x),
        Vec4::new(0.0, 1.0, 0.0, y),
        Vec4::new(0.0, 0.0, 1.0, z),
        Vec4::W,
    )
}

#[must_use]
pub fn rotate_x(angle: f32) -> Mat4f {
    let (s, c) = angle.sin_cos();
    Mat4::from_cols(
        Vec4::X,
        Vec4::new(0.0, c, -s, 0.0),
        Vec4::new(0.0, s, c, 0.0),
        Vec4::W,
    )
}

#[must_use]
pub fn rotate_y(angle: f32) -> Mat4f {
    let (s, c) = angle.sin_cos();
    Mat4::from_cols(
        Vec4::new(c, 0.0, s, 0.0),
        Vec4::Y,
        Vec4::new(-s, 0.0, c, 0.0),
        Vec4::W,
    )
}

#[must_use]
pub fn rotate_z(angle: f32) -> Mat4f {
    let (s, c) = angle.sin_cos();
    Mat4::from_cols(
        Vec4::new(c, -s, 0.0, 0.0),
        Vec4::new(s, c, 0.0, 0.0),
        Vec4::Z,
        Vec4::W,
    )
}

/// Standard 4×4 product `a * b`.
#[inline]
#[must_use]
pub fn multiply(a: Mat4f, b: Mat4f) -> Mat4f {
    a * b
}

/// Composes a model matrix by right-multiplying the identity with
/// `rotate_x`, `rotate_y`, `rotate_z`, `scale` and `translate`, in that order.
///
/// The order is part of the contract: a point is rotated, then scaled, then
/// translated.
#[must_use]
pub fn model_matrix(translation: Vec3f, scale_factors: Vec3f, rotation: Vec3f) -> Mat4f {
    let mut ret = identity();
    ret = multiply(ret, rotate_x(rotation.x));
    ret = multiply(ret, rotate_y(rotation.y));
    ret = multiply(ret, rotate_z(rotation.z));
    ret = multiply(ret, scale(scale_factors.x, scale_factors.y, scale_factors.z));
    ret = multiply(ret, translate(translation.x, translation.y, translation.z));
    ret
}

/// Transforms `vec` as a point: upper 3×3 block plus the translation row.
/// The homogeneous column is ignored, there is no perspective divide.
#[must_use]
pub fn transform_point(vec: Vec3f, mat: &Mat4f) -> Vec3f {
    let p = vec.extend(1.0);
    Vec3f::new(mat.x_axis.dot(p), mat.y_axis.dot(p), mat.z_axis.dot(p))
}

/// Recovers pitch/yaw/roll from a pure rotation matrix.
///
/// Lossy and gimbal-lock prone. `roll` is `atan2(m01, m01)` and so only ever
/// takes the values `±π/4`, `±3π/4` or `0`; only `yaw` has a consumer.
#[must_use]
pub fn euler_from_rotation(m: &Mat4f) -> EulerAngles {
    let m12 = at(m, 1, 2);
    let m22 = at(m, 2, 2);
    let m02 = at(m, 0, 2);
    let m01 = at(m, 0, 1);

    let sign = if m22 > 0.0 { 1.0 } else { -1.0 };

    EulerAngles {
        pitch: m12.atan2(m22),
        yaw: (-m02).atan2(sign * m12.hypot(m22)),
        roll: m01.atan2(m01),
    }
}

/// Right-handed perspective projection for row-vector points (`w' = -z`),
/// mapping depth into the OpenGL `[-1, 1]` clip range.
#[must_use]
pub fn perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Mat4f {
    let f = (fov / 2.0).tan();
    let depth = near - far;

    Mat4::from_cols_array(&[
        1.0 / (f * aspect), 0.0, 0.0, 0.0,
        0.0, 1.0 / f, 0.0, 0.0,
        0.0, 0.0, (near + far) / depth, 2.0 * near * far / depth,
        0.0, 0.0, -1.0, 0.0,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 1e-5;

    fn vec3_approx(a: Vec3f, b: Vec3f) -> bool {
        (a - b).abs().max_element() < EPSILON
    }

    #[test]
    fn translate_stores_offset_in_row_three() {
        let m = translate(1.0, 2.0, 3.0);
        assert_eq!(at(&m, 3, 0), 1.0);
        assert_eq!(at(&m, 3, 1), 2.0);
        assert_eq!(at(&m, 3, 2), 3.0);
        assert_eq!(m.to_cols_array()[3], 1.0);
    }

    #[test]
    fn rotate_z_quarter_turn_maps_x_to_y() {
        let p = transform_point(Vec3f::X, &rotate_z(FRAC_PI_2));
        assert!(vec3_approx(p, Vec3f::Y));
    }

    #[test]
    fn rotate_x_quarter_turn_maps_y_to_z() {
        let p = transform_point(Vec3f::Y, &rotate_x(FRAC_PI_2));
        assert!(vec3_approx(p, Vec3f::Z));
    }

    #[test]
    fn rotate_y_quarter_turn_maps_z_to_x() {
        let p = transform_point(Vec3f::Z, &rotate_y(FRAC_PI_2));
        assert!(vec3_approx(p, Vec3f::X));
    }

    #[test]
    fn multiply_applies_left_operand_first() {
        let m = multiply(scale(2.0, 2.0, 2.0), translate(1.0, 0.0, 0.0));
        assert!(vec3_approx(transform_point(Vec3f::X, &m), Vec3f::new(3.0, 0.0, 0.0)));

        let m = multiply(translate(1.0, 0.0, 0.0), scale(2.0, 2.0, 2.0));
        assert!(vec3_approx(transform_point(Vec3f::X, &m), Vec3f::new(4.0, 0.0, 0.0)));
    }

    #[test]
    fn normalize_zero_vector_is_not_finite() {
        assert!(!normalize(Vec3f::ZERO).is_finite());
    }

    #[test]
    fn cross_of_axes() {
        assert!(vec3_approx(cross(Vec3f::X, Vec3f::Y), Vec3f::Z));
    }

    #[test]
    fn euler_recovers_yaw_and_pitch() {
        let yaw = euler_from_rotation(&rotate_y(0.3));
        assert!((yaw.yaw - 0.3).abs() < EPSILON);
        assert!(yaw.pitch.abs() < EPSILON);

        let pitch = euler_from_rotation(&rotate_x(0.4));
        assert!((pitch.pitch - 0.4).abs() < EPSILON);
        assert!(pitch.yaw.abs() < EPSILON);
    }

    #[test]
    fn euler_roll_keeps_the_degenerate_formula() {
        let angles = euler_from_rotation(&rotate_z(0.5));
        let m01 = at(&rotate_z(0.5), 0, 1);
        assert_eq!(angles.roll, m01.atan2(m01));
        assert!((angles.roll - std::f32::consts::FRAC_PI_4).abs() < EPSILON);
    }

    #[test]
    fn perspective_maps_near_plane_to_minus_one() {
        let p = perspective(FRAC_PI_2, 1.0, 1.0, 10.0);
        let clip = Vec4::new(0.0, 0.0, -1.0, 1.0);
        let out = Vec4::new(
            p.x_axis.dot(clip),
            p.y_axis.dot(clip),
            p.z_axis.dot(clip),
            p.w_axis.dot(clip),
        );
        assert!((out.z / out.w + 1.0).abs() < EPSILON);
    }
}
