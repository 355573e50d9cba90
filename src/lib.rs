#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

//! Immediate-mode 3D rendering toolkit.
//!
//! Meshes, textures, shader programs and materials are thin wrappers over GPU
//! objects created through a [`GpuBackend`]. Models group them with a
//! transform and are drawn one call at a time through a [`RenderContext`].
//! Wavefront OBJ files import straight into models.

pub mod app;
pub mod assets;
pub mod context;
pub mod errors;
pub mod gpu;
pub mod math;
pub mod renderer;
pub mod resources;
pub mod scene;
pub mod settings;

pub use context::RenderContext;
pub use errors::{CinderError, Result};
pub use gpu::{GpuBackend, HeadlessBackend};
#[cfg(not(target_arch = "wasm32"))]
pub use gpu::GlowBackend;
pub use resources::{BoundingBox, Material, Mesh, Model, ShaderProgram, ShaderProgramBuilder, Texture};
pub use scene::Camera;
pub use settings::{CameraSettings, ContextSettings};
