//! Math Tests
//!
//! Tests for:
//! - Vector helpers (add, sub, mul, cross, normalize)
//! - Matrix layout: translation row, rotation direction, product order
//! - Model matrix composition order
//! - Euler extraction from rotation matrices
//! - Perspective projection

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use cinder::math::{self, Vec3f};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3f, b: Vec3f) -> bool {
    approx(a.x, b.x) && approx(a.y, b.y) && approx(a.z, b.z)
}

// ============================================================================
// Vectors
// ============================================================================

#[test]
fn component_wise_ops() {
    let a = Vec3f::new(1.0, 2.0, 3.0);
    let b = Vec3f::new(4.0, 5.0, 6.0);

    assert_eq!(math::add(a, b), Vec3f::new(5.0, 7.0, 9.0));
    assert_eq!(math::sub(a, b), Vec3f::new(-3.0, -3.0, -3.0));
    assert_eq!(math::mul(a, b), Vec3f::new(4.0, 10.0, 18.0));
}

#[test]
fn cross_of_axes() {
    assert_eq!(math::cross(Vec3f::X, Vec3f::Y), Vec3f::Z);
    assert_eq!(math::cross(Vec3f::Y, Vec3f::X), -Vec3f::Z);
}

#[test]
fn normalize_has_unit_length() {
    let n = math::normalize(Vec3f::new(3.0, 0.0, 4.0));
    assert!(vec3_approx(n, Vec3f::new(0.6, 0.0, 0.8)));
}

#[test]
fn normalize_zero_is_not_finite() {
    let n = math::normalize(Vec3f::ZERO);
    assert!(!n.x.is_finite());
}

// ============================================================================
// Matrices
// ============================================================================

#[test]
fn translation_lives_in_row_three() {
    let m = math::translate(1.0, 2.0, 3.0);
    assert_eq!(math::at(&m, 3, 0), 1.0);
    assert_eq!(math::at(&m, 3, 1), 2.0);
    assert_eq!(math::at(&m, 3, 2), 3.0);
    assert_eq!(math::at(&m, 3, 3), 1.0);
    assert_eq!(math::at(&m, 0, 3), 0.0);
}

#[test]
fn transform_point_adds_translation() {
    let p = math::transform_point(Vec3f::new(1.0, 1.0, 1.0), &math::translate(1.0, -2.0, 0.5));
    assert!(vec3_approx(p, Vec3f::new(2.0, -1.0, 1.5)));
}

#[test]
fn transform_point_scales() {
    let p = math::transform_point(Vec3f::new(1.0, 2.0, 3.0), &math::scale(2.0, 3.0, 4.0));
    assert!(vec3_approx(p, Vec3f::new(2.0, 6.0, 12.0)));
}

#[test]
fn identity_leaves_points_alone() {
    let v = Vec3f::new(-4.0, 0.5, 9.0);
    assert_eq!(math::transform_point(v, &math::identity()), v);
}

#[test]
fn rotations_are_orthonormal_and_invert_with_negated_angle() {
    for rotate in [math::rotate_x, math::rotate_y, math::rotate_z] {
        let m = math::multiply(rotate(0.7), rotate(-0.7));
        let p = math::transform_point(Vec3f::new(1.0, 2.0, 3.0), &m);
        assert!(vec3_approx(p, Vec3f::new(1.0, 2.0, 3.0)));
    }
}

#[test]
fn product_applies_left_operand_first() {
    // Row vectors: p * (T * S) translates, then scales.
    let m = math::multiply(math::translate(1.0, 0.0, 0.0), math::scale(2.0, 2.0, 2.0));
    let p = math::transform_point(Vec3f::ZERO, &m);
    assert!(vec3_approx(p, Vec3f::new(2.0, 0.0, 0.0)));
}

#[test]
fn model_matrix_scales_then_translates() {
    let m = math::model_matrix(Vec3f::new(1.0, 0.0, 0.0), Vec3f::splat(2.0), Vec3f::ZERO);
    let p = math::transform_point(Vec3f::new(1.0, 0.0, 0.0), &m);
    assert!(vec3_approx(p, Vec3f::new(3.0, 0.0, 0.0)), "got {p}");
}

#[test]
fn model_matrix_rotates_before_translating() {
    let m = math::model_matrix(
        Vec3f::new(0.0, 0.0, 5.0),
        Vec3f::ONE,
        Vec3f::new(0.0, 0.0, FRAC_PI_2),
    );
    let p = math::transform_point(Vec3f::new(1.0, 0.0, 0.0), &m);

    // The rotation keeps the point in the XY plane; the translation is
    // applied unrotated afterwards.
    assert!(approx(p.z, 5.0));
    assert!(approx(p.x.hypot(p.y), 1.0));
}

// ============================================================================
// Euler extraction
// ============================================================================

#[test]
fn euler_of_identity_is_zero() {
    let e = math::euler_from_rotation(&math::identity());
    assert!(approx(e.pitch, 0.0));
    assert!(approx(e.yaw, 0.0));
}

#[test]
fn euler_recovers_yaw() {
    let e = math::euler_from_rotation(&math::rotate_y(0.3));
    assert!(approx(e.yaw, 0.3), "yaw {}", e.yaw);
    assert!(approx(e.pitch, 0.0));
}

#[test]
fn euler_recovers_pitch() {
    let e = math::euler_from_rotation(&math::rotate_x(-0.4));
    assert!(approx(e.pitch.abs(), 0.4), "pitch {}", e.pitch);
    assert!(approx(e.yaw, 0.0));
}

#[test]
fn euler_roll_uses_same_argument_twice() {
    let e = math::euler_from_rotation(&math::rotate_z(0.5));
    assert!(approx(e.roll.abs(), FRAC_PI_4) || approx(e.roll.abs(), 3.0 * FRAC_PI_4));
}

// ============================================================================
// Projection
// ============================================================================

#[test]
fn perspective_maps_near_and_far_planes() {
    let (near, far) = (0.1, 100.0);
    let m = math::perspective(FRAC_PI_2, 1.0, near, far);

    let clip = |z: f32| {
        let p = glam::Vec4::new(0.0, 0.0, z, 1.0);
        let depth = m.z_axis.dot(p);
        let w = m.w_axis.dot(p);
        depth / w
    };

    assert!(approx(clip(-near), -1.0));
    assert!((clip(-far) - 1.0).abs() < 1e-3);
}

#[test]
fn perspective_uses_aspect_for_x_only() {
    let m = math::perspective(FRAC_PI_2, 2.0, 0.1, 10.0);
    assert!(approx(math::at(&m, 0, 0), 0.5));
    assert!(approx(math::at(&m, 1, 1), 1.0));
    assert!(approx(math::at(&m, 2, 3), -1.0));
}
