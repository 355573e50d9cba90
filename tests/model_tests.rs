//! Model Assembly Tests
//!
//! Tests for:
//! - Default material substitution and mesh-to-material mapping
//! - Assembly validation
//! - Local and transformed bounding boxes
//! - Transform accumulation
//! - Release

use cinder::errors::CinderError;
use std::f32::consts::FRAC_PI_2;

use cinder::math::{self, Vec3f};
use cinder::{ContextSettings, HeadlessBackend, Material, Mesh, Model, RenderContext};

const EPSILON: f32 = 1e-5;

fn approx(a: Vec3f, b: Vec3f) -> bool {
    (a - b).abs().max_element() < EPSILON
}

fn context() -> RenderContext<HeadlessBackend> {
    let _ = env_logger::builder().is_test(true).try_init();
    RenderContext::new(HeadlessBackend::new(), ContextSettings::default())
}

/// Single triangle spanning `lo..hi` on every axis.
fn span_mesh(ctx: &mut RenderContext<HeadlessBackend>, lo: f32, hi: f32) -> Mesh {
    ctx.create_mesh(&[lo, lo, lo, hi, lo, lo, lo, hi, hi], None, None, None)
        .unwrap()
}

// ============================================================================
// Assembly
// ============================================================================

#[test]
fn model_without_materials_gets_default() {
    let mut ctx = context();
    let meshes = vec![span_mesh(&mut ctx, 0.0, 1.0), span_mesh(&mut ctx, 0.0, 1.0)];
    let model = ctx.create_model(meshes, None, None).unwrap();

    assert_eq!(model.materials().len(), 1);
    assert_eq!(model.mesh_to_material(), &[0, 0]);

    let material = &model.materials()[0];
    let checkerboard = ctx.default_texture().unwrap();
    assert_eq!(material.diffuse_texture.as_ref(), Some(&checkerboard));
    assert_eq!(material.shader.id(), ctx.default_shader().unwrap().id());
    assert!(material.flat_color);
}

#[test]
fn empty_material_list_counts_as_none() {
    let mut ctx = context();
    let meshes = vec![span_mesh(&mut ctx, 0.0, 1.0)];
    let model = ctx.create_model(meshes, Some(Vec::new()), None).unwrap();
    assert_eq!(model.materials().len(), 1);
}

#[test]
fn materials_without_mapping_use_first() {
    let mut ctx = context();
    let shader = ctx.default_shader().unwrap();
    let materials = vec![Material::new(shader.clone()), Material::new(shader)];
    let meshes = vec![span_mesh(&mut ctx, 0.0, 1.0), span_mesh(&mut ctx, 0.0, 1.0)];

    let model = ctx.create_model(meshes, Some(materials), None).unwrap();
    assert_eq!(model.materials().len(), 2);
    assert_eq!(model.mesh_to_material(), &[0, 0]);
}

#[test]
fn explicit_mapping_is_kept() {
    let mut ctx = context();
    let shader = ctx.default_shader().unwrap();
    let mut red = Material::new(shader.clone());
    red.diffuse_color = Vec3f::new(1.0, 0.0, 0.0);
    let materials = vec![Material::new(shader), red];
    let meshes = vec![span_mesh(&mut ctx, 0.0, 1.0), span_mesh(&mut ctx, 0.0, 1.0)];

    let model = ctx
        .create_model(meshes, Some(materials), Some(vec![1, 0]))
        .unwrap();
    assert_eq!(
        model.material_for(0).unwrap().diffuse_color,
        Vec3f::new(1.0, 0.0, 0.0)
    );
    assert_eq!(model.material_for(1).unwrap().diffuse_color, Vec3f::ZERO);
    assert!(model.material_for(2).is_none());
}

#[test]
fn out_of_range_mapping_is_rejected() {
    let mut ctx = context();
    let shader = ctx.default_shader().unwrap();
    let meshes = vec![span_mesh(&mut ctx, 0.0, 1.0)];

    let err = ctx
        .create_model(meshes, Some(vec![Material::new(shader)]), Some(vec![3]))
        .unwrap_err();
    assert!(matches!(err, CinderError::InvalidModel(_)));
}

#[test]
fn mapping_length_must_match() {
    let mut ctx = context();
    let shader = ctx.default_shader().unwrap();
    let meshes = vec![span_mesh(&mut ctx, 0.0, 1.0)];

    let err = Model::new(meshes, vec![Material::new(shader)], vec![0, 0]).unwrap_err();
    assert!(matches!(err, CinderError::InvalidModel(_)));
}

#[test]
fn empty_model_is_rejected() {
    let mut ctx = context();
    let err = ctx.create_model(Vec::new(), None, None).unwrap_err();
    assert!(matches!(err, CinderError::InvalidModel(_)));
}

#[test]
fn fresh_model_sits_at_origin() {
    let mut ctx = context();
    let meshes = vec![span_mesh(&mut ctx, 0.0, 1.0)];
    let model = ctx.create_model(meshes, None, None).unwrap();

    assert_eq!(model.position(), Vec3f::ZERO);
    assert_eq!(model.rotation(), Vec3f::ZERO);
    assert_eq!(model.scale(), Vec3f::ONE);
    assert_eq!(model.name(), "");
}

// ============================================================================
// Bounding boxes
// ============================================================================

#[test]
fn bounding_box_covers_every_mesh() {
    let mut ctx = context();
    let meshes = vec![span_mesh(&mut ctx, 0.0, 1.0), span_mesh(&mut ctx, 2.0, 3.0)];
    let model = ctx.create_model(meshes, None, None).unwrap();

    let bb = model.local_bounding_box();
    assert_eq!(bb.min, Vec3f::ZERO);
    assert_eq!(bb.max, Vec3f::splat(3.0));
    assert_eq!(bb.size(), Vec3f::splat(3.0));
    assert_eq!(bb.center(), Vec3f::splat(1.5));
}

#[test]
fn bounding_box_is_not_anchored_at_origin() {
    let mut ctx = context();
    let meshes = vec![span_mesh(&mut ctx, 2.0, 3.0)];
    let model = ctx.create_model(meshes, None, None).unwrap();

    assert_eq!(model.local_bounding_box().min, Vec3f::splat(2.0));
}

#[test]
fn bounding_box_follows_translation_and_scale() {
    let mut ctx = context();
    let meshes = vec![span_mesh(&mut ctx, -1.0, 1.0)];
    let mut model = ctx.create_model(meshes, None, None).unwrap();

    model.set_scale(Vec3f::splat(2.0));
    model.set_position(Vec3f::new(10.0, 0.0, 0.0));

    let bb = model.bounding_box();
    assert!(approx(bb.min, Vec3f::new(8.0, -2.0, -2.0)));
    assert!(approx(bb.max, Vec3f::new(12.0, 2.0, 2.0)));
    assert_eq!(model.local_bounding_box().max, Vec3f::ONE);
}

#[test]
fn rotated_bounding_box_transforms_corners_only() {
    let mut ctx = context();
    let meshes = vec![span_mesh(&mut ctx, 1.0, 2.0)];
    let mut model = ctx.create_model(meshes, None, None).unwrap();

    model.set_rotation(Vec3f::new(0.0, 0.0, FRAC_PI_2));
    let matrix = model.model_matrix();
    let local = model.local_bounding_box();
    let bb = model.bounding_box();

    assert_eq!(bb.min, math::transform_point(local.min, &matrix));
    assert_eq!(bb.max, math::transform_point(local.max, &matrix));

    // x' = -y: the corners swap order on X
    assert!(approx(bb.min, Vec3f::new(-1.0, 1.0, 1.0)));
    assert!(approx(bb.max, Vec3f::new(-2.0, 2.0, 2.0)));
    assert!(bb.min.x > bb.max.x);
}

#[test]
fn empty_mesh_does_not_widen_bounds() {
    let mut ctx = context();
    let empty = ctx.create_mesh(&[], None, None, None).unwrap();
    let meshes = vec![empty, span_mesh(&mut ctx, 2.0, 3.0)];
    let model = ctx.create_model(meshes, None, None).unwrap();

    let bb = model.local_bounding_box();
    assert_eq!(bb.min, Vec3f::splat(2.0));
    assert_eq!(bb.max, Vec3f::splat(3.0));
    assert_eq!(model.meshes()[0].vertex_count(), 0);
}

// ============================================================================
// Transform
// ============================================================================

#[test]
fn transform_operations_accumulate() {
    let mut ctx = context();
    let meshes = vec![span_mesh(&mut ctx, 0.0, 1.0)];
    let mut model = ctx.create_model(meshes, None, None).unwrap();

    model.translate_by(Vec3f::new(1.0, 0.0, 0.0));
    model.translate_by(Vec3f::new(0.0, 2.0, 0.0));
    assert_eq!(model.position(), Vec3f::new(1.0, 2.0, 0.0));

    model.rotate(Vec3f::new(0.0, 0.5, 0.0));
    model.rotate(Vec3f::new(0.0, 0.25, 0.0));
    assert!(approx(model.rotation(), Vec3f::new(0.0, 0.75, 0.0)));

    model.scale_by(Vec3f::splat(2.0));
    model.scale_by(Vec3f::new(1.0, 3.0, 1.0));
    assert_eq!(model.scale(), Vec3f::new(2.0, 6.0, 2.0));

    model.set_rotation(Vec3f::ZERO);
    assert_eq!(model.rotation(), Vec3f::ZERO);
}

#[test]
fn model_matrix_matches_transform() {
    let mut ctx = context();
    let meshes = vec![span_mesh(&mut ctx, 0.0, 1.0)];
    let mut model = ctx.create_model(meshes, None, None).unwrap();
    model.set_position(Vec3f::new(1.0, 0.0, 0.0));
    model.set_scale(Vec3f::splat(2.0));

    let moved = cinder::math::transform_point(Vec3f::new(1.0, 0.0, 0.0), &model.model_matrix());
    assert!(approx(moved, Vec3f::new(3.0, 0.0, 0.0)));
}

// ============================================================================
// Release
// ============================================================================

#[test]
fn release_frees_meshes_but_not_defaults() {
    let mut ctx = context();
    let meshes = vec![span_mesh(&mut ctx, 0.0, 1.0), span_mesh(&mut ctx, 0.0, 1.0)];
    let model = ctx.create_model(meshes, None, None).unwrap();

    // default program + checkerboard texture
    let defaults = 2;
    assert_eq!(ctx.gpu().live_objects(), defaults + 4);

    model.release(ctx.gpu_mut());
    assert_eq!(ctx.gpu().live_objects(), defaults);

    let gpu = ctx.shutdown();
    assert_eq!(gpu.live_objects(), 0);
}
