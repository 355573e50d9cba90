//! Immediate-mode draw submission.
//!
//! Every call issues its GPU commands right away against the context's
//! backend; nothing is queued, sorted or batched. State that persists between
//! calls (fill mode, view and projection) lives on [`RenderContext`].

use crate::context::RenderContext;
use crate::errors::{CinderError, Result};
use crate::gpu::{GpuBackend, PolygonMode};
use crate::math::{self, Mat4f, Vec3f};
use crate::resources::{Material, Mesh, Model, UniformSlot};

/// Diffuse color of bounding box wireframes.
pub const BOUNDING_BOX_COLOR: Vec3f = Vec3f::new(1.0, 0.0, 0.0);

/// Camera matrices uploaded with every mesh.
#[derive(Debug, Clone, Copy)]
struct FrameMatrices {
    view: Mat4f,
    projection: Mat4f,
}

impl<B: GpuBackend> RenderContext<B> {
    /// Clears color and depth to the configured clear color.
    pub fn start_render(&mut self) -> Result<()> {
        self.gpu.clear(self.settings.clear_color)
    }

    /// Presents the frame and picks up the surface's current size.
    pub fn end_render(&mut self, surface: &mut dyn crate::app::WindowSurface) -> Result<()> {
        surface.present()?;
        self.window_size = surface.size();
        self.frame_count += 1;
        Ok(())
    }

    /// Switches between filled and wireframe polygons for every later draw.
    pub fn set_fill(&mut self, fill: bool) -> Result<()> {
        self.fill = fill;
        self.gpu.set_polygon_mode(if fill {
            PolygonMode::Fill
        } else {
            PolygonMode::Line
        })
    }

    #[inline]
    #[must_use]
    pub fn fill(&self) -> bool {
        self.fill
    }

    /// Draws every mesh of `model` with its material under the model's
    /// current transform.
    pub fn draw(&mut self, model: &Model) -> Result<()> {
        let frame = FrameMatrices {
            view: self.view_matrix,
            projection: self.projection_matrix,
        };

        for (index, mesh) in model.meshes().iter().enumerate() {
            let material = model.material_for(index).ok_or_else(|| {
                CinderError::InvalidModel(format!("mesh {index} has no material"))
            })?;
            draw_mesh(&mut self.gpu, mesh, material, &model.model_matrix(), frame)?;
        }

        Ok(())
    }

    /// Draws the model's local bounding box as a red wireframe.
    ///
    /// The unit cube is scaled to the box size and then given the model's
    /// position, scale and rotation. It stays centered on the model origin
    /// rather than on the box center. The fill mode is restored afterwards.
    pub fn draw_bounding_box(&mut self, model: &Model) -> Result<()> {
        let mut material = self.default_material()?;
        material.diffuse_texture = None;
        material.diffuse_color = BOUNDING_BOX_COLOR;

        self.ensure_cube_mesh()?;

        let size = model.local_bounding_box().size();
        let matrix = math::model_matrix(model.position(), size * model.scale(), model.rotation());
        let frame = FrameMatrices {
            view: self.view_matrix,
            projection: self.projection_matrix,
        };

        let previous = self.fill;
        self.set_fill(false)?;

        let drawn = match &self.cube_mesh {
            Some(cube) => draw_mesh(&mut self.gpu, cube, &material, &matrix, frame),
            None => Err(CinderError::ResourceCreation {
                resource: "vertex array",
                reason: "bounding box cube missing".to_string(),
            }),
        };

        self.set_fill(previous)?;
        drawn
    }
}

fn draw_mesh<B: GpuBackend + ?Sized>(
    gpu: &mut B,
    mesh: &Mesh,
    material: &Material,
    model_matrix: &Mat4f,
    frame: FrameMatrices,
) -> Result<()> {
    let shader = &material.shader;
    gpu.use_program(shader.id())?;

    for (slot, matrix) in [
        (UniformSlot::Model, model_matrix),
        (UniformSlot::View, &frame.view),
        (UniformSlot::Projection, &frame.projection),
    ] {
        if let Some(location) = shader.uniform(slot) {
            gpu.set_uniform_mat4(location, matrix)?;
        }
    }

    match (
        &material.diffuse_texture,
        shader.uniform(UniformSlot::DiffuseTexture),
    ) {
        (Some(texture), Some(sampler)) => {
            if let Some(provided) = shader.uniform(UniformSlot::DiffuseTextureProvided) {
                gpu.set_uniform_i32(provided, 1)?;
            }
            gpu.set_uniform_i32(sampler, 0)?;
            gpu.bind_texture(0, texture.id())?;
        }
        _ => {
            if let Some(provided) = shader.uniform(UniformSlot::DiffuseTextureProvided) {
                gpu.set_uniform_i32(provided, 0)?;
            }
            if let Some(color) = shader.uniform(UniformSlot::DiffuseColor) {
                gpu.set_uniform_vec3(color, material.diffuse_color)?;
            }
        }
    }

    match mesh.index_count() {
        Some(count) => gpu.draw_elements(mesh.vertex_array(), count),
        None => gpu.draw_arrays(mesh.vertex_array(), mesh.vertex_count()),
    }
}
