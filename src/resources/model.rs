//! Model assembly and bounding volume.
//!
//! A [`Model`] groups meshes with the materials they are drawn with and a
//! single rigid transform. Its local bounding box is computed once, when the
//! model is assembled; geometry never changes afterwards.

use crate::errors::{CinderError, Result};
use crate::gpu::GpuBackend;
use crate::math::{self, Mat4f, Vec3f};
use crate::resources::material::Material;
use crate::resources::mesh::Mesh;

// ============================================================================
// BoundingBox
// ============================================================================

/// Axis-aligned box given by its two extreme corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3f,
    pub max: Vec3f,
}

impl BoundingBox {
    /// Extents of a flat `xyz` position array, seeded by its first vertex.
    /// `None` when the array holds no complete vertex.
    #[must_use]
    pub fn from_positions(positions: &[f32]) -> Option<Self> {
        let mut points = positions
            .chunks_exact(3)
            .map(|p| Vec3f::new(p[0], p[1], p[2]));

        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));

        Some(Self { min, max })
    }

    #[must_use]
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    #[inline]
    #[must_use]
    pub fn size(&self) -> Vec3f {
        self.max - self.min
    }

    #[inline]
    #[must_use]
    pub fn center(&self) -> Vec3f {
        (self.min + self.max) * 0.5
    }
}

// ============================================================================
// Model
// ============================================================================

/// Meshes, their materials and a position/rotation/scale transform.
#[derive(Debug)]
pub struct Model {
    name: String,
    meshes: Vec<Mesh>,
    materials: Vec<Material>,
    mesh_to_material: Vec<usize>,

    position: Vec3f,
    /// Euler angles in radians, applied X then Y then Z.
    rotation: Vec3f,
    scale: Vec3f,

    bounding_box: BoundingBox,
}

impl Model {
    /// Assembles a model at the origin with unit scale.
    ///
    /// `mesh_to_material` must hold one in-range material index per mesh.
    pub fn new(
        meshes: Vec<Mesh>,
        materials: Vec<Material>,
        mesh_to_material: Vec<usize>,
    ) -> Result<Self> {
        if meshes.is_empty() {
            return Err(CinderError::InvalidModel(
                "a model needs at least one mesh".to_string(),
            ));
        }
        if mesh_to_material.len() != meshes.len() {
            return Err(CinderError::InvalidModel(format!(
                "{} meshes but {} material mappings",
                meshes.len(),
                mesh_to_material.len()
            )));
        }
        if let Some((mesh, &index)) = mesh_to_material
            .iter()
            .enumerate()
            .find(|(_, index)| **index >= materials.len())
        {
            return Err(CinderError::InvalidModel(format!(
                "mesh {mesh} maps to material {index}, only {} materials",
                materials.len()
            )));
        }

        let bounding_box = meshes
            .iter()
            .filter_map(|mesh| BoundingBox::from_positions(mesh.vertices()))
            .reduce(|acc, bb| acc.union(&bb))
            .ok_or_else(|| CinderError::InvalidModel("meshes hold no vertices".to_string()))?;

        log::info!(
            "Model assembled: {} meshes, {} materials",
            meshes.len(),
            materials.len()
        );

        Ok(Self {
            name: String::new(),
            meshes,
            materials,
            mesh_to_material,
            position: Vec3f::ZERO,
            rotation: Vec3f::ZERO,
            scale: Vec3f::ONE,
            bounding_box,
        })
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    #[must_use]
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    #[must_use]
    pub fn materials_mut(&mut self) -> &mut [Material] {
        &mut self.materials
    }

    #[must_use]
    pub fn mesh_to_material(&self) -> &[usize] {
        &self.mesh_to_material
    }

    /// Material drawn with mesh `mesh`.
    #[must_use]
    pub fn material_for(&self, mesh: usize) -> Option<&Material> {
        self.materials.get(*self.mesh_to_material.get(mesh)?)
    }

    // --- Transform -----------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec3f {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn rotation(&self) -> Vec3f {
        self.rotation
    }

    #[inline]
    #[must_use]
    pub fn scale(&self) -> Vec3f {
        self.scale
    }

    pub fn set_position(&mut self, position: Vec3f) {
        self.position = position;
    }

    /// Adds `offset` to the position.
    pub fn translate_by(&mut self, offset: Vec3f) {
        self.position += offset;
    }

    pub fn set_rotation(&mut self, rotation: Vec3f) {
        self.rotation = rotation;
    }

    /// Adds `angles` (radians) to the rotation.
    pub fn rotate(&mut self, angles: Vec3f) {
        self.rotation += angles;
    }

    pub fn set_scale(&mut self, scale: Vec3f) {
        self.scale = scale;
    }

    /// Multiplies the scale component-wise.
    pub fn scale_by(&mut self, factors: Vec3f) {
        self.scale *= factors;
    }

    #[must_use]
    pub fn model_matrix(&self) -> Mat4f {
        math::model_matrix(self.position, self.scale, self.rotation)
    }

    // --- Bounds --------------------------------------------------------------

    /// Bounds in model space, as assembled.
    #[must_use]
    pub fn local_bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    /// Bounds under the current transform.
    ///
    /// Only the stored min and max corners are transformed, so the result is
    /// exact for translation and positive scale and only approximate once the
    /// model is rotated. A rotated box can come back with `min` above `max`
    /// on some axis.
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        let matrix = self.model_matrix();
        BoundingBox {
            min: math::transform_point(self.bounding_box.min, &matrix),
            max: math::transform_point(self.bounding_box.max, &matrix),
        }
    }

    /// Frees every mesh. Materials are left alone, they may share the
    /// context's cached defaults.
    pub fn release<B: GpuBackend + ?Sized>(self, gpu: &mut B) {
        for mesh in self.meshes {
            mesh.release(gpu);
        }
    }
}
