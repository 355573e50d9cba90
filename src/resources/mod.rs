//! GPU object model.
//!
//! - [`Mesh`]: triangle geometry uploaded to vertex/index buffers
//! - [`Texture`]: 2D images with mip chains
//! - [`ShaderProgram`]: linked programs with a resolved uniform table
//! - [`Material`]: shader, texture slots and surface colors
//! - [`Model`]: meshes, materials, transform and bounding box
//!
//! Nothing here owns a backend. Every constructor takes the [`GpuBackend`]
//! it records into, and every object is freed with an explicit `release`.
//!
//! [`GpuBackend`]: crate::gpu::GpuBackend

pub mod material;
pub mod mesh;
pub mod model;
pub mod primitives;
pub mod shader;
pub mod texture;

pub use material::Material;
pub use mesh::Mesh;
pub use model::{BoundingBox, Model};
pub use shader::{ShaderProgram, ShaderProgramBuilder, UniformSlot};
pub use texture::{Texture, TextureKind};
