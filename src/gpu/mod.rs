//! GPU Command Surface
//!
//! Everything the object model needs from a graphics API is expressed through
//! [`GpuBackend`]: object creation, static uploads, program linking, uniform
//! lookup, state changes and draw submission.
//!
//! Two implementations ship with the crate:
//!
//! | Backend | Use case |
//! |---------|----------|
//! | [`GlowBackend`] | OpenGL 3.3 core through `glow`, owned by the caller's GL context |
//! | [`HeadlessBackend`] | No GPU; allocates handles and records every command |
//!
//! Handles are opaque non-zero ids. A zero id never escapes a backend, so an
//! absent attribute is always `None`.

#[cfg(not(target_arch = "wasm32"))]
pub mod glow_backend;
pub mod headless;

#[cfg(not(target_arch = "wasm32"))]
pub use glow_backend::GlowBackend;
pub use headless::{GpuCommand, HeadlessBackend};

use std::num::NonZeroU32;

use crate::errors::Result;
use crate::math::{Mat4f, Vec3f};

macro_rules! gpu_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(pub NonZeroU32);

        impl $name {
            #[inline]
            #[must_use]
            pub fn get(self) -> u32 {
                self.0.get()
            }
        }
    };
}

gpu_handle!(
    /// Vertex layout object.
    VertexArrayId
);
gpu_handle!(
    /// Vertex or index buffer.
    BufferId
);
gpu_handle!(
    /// 2D image.
    TextureId
);
gpu_handle!(
    /// Compiled shader stage.
    ShaderId
);
gpu_handle!(
    /// Linked program.
    ProgramId
);

/// Resolved uniform location inside one program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// Fixed vertex attribute slots shared by every mesh and shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeSlot {
    Position = 0,
    Uv = 1,
    Normal = 2,
}

impl AttributeSlot {
    #[must_use]
    pub const fn location(self) -> u32 {
        self as u32
    }

    /// Shader input name the slot is bound to at link time.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            AttributeSlot::Position => "position",
            AttributeSlot::Uv => "uv",
            AttributeSlot::Normal => "normal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    Vertex,
    Index,
}

/// Unsized pixel layouts accepted for 2D uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Red,
    Rg,
    Rgb,
    Rgba,
}

impl PixelFormat {
    /// Maps an image channel count to its pixel layout.
    pub fn from_channels(channels: u8) -> Result<Self> {
        match channels {
            1 => Ok(PixelFormat::Red),
            2 => Ok(PixelFormat::Rg),
            3 => Ok(PixelFormat::Rgb),
            4 => Ok(PixelFormat::Rgba),
            other => Err(crate::errors::CinderError::UnsupportedFormat(format!(
                "{other} image channels"
            ))),
        }
    }

    #[must_use]
    pub const fn channels(self) -> usize {
        match self {
            PixelFormat::Red => 1,
            PixelFormat::Rg => 2,
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterMode {
    Nearest,
    Linear,
    LinearMipmapLinear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapMode {
    Repeat,
    ClampToEdge,
}

/// Sampling state applied to a texture object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SamplerParams {
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
    pub min_filter: FilterMode,
    pub mag_filter: FilterMode,
}

impl Default for SamplerParams {
    fn default() -> Self {
        Self {
            wrap_s: WrapMode::Repeat,
            wrap_t: WrapMode::Repeat,
            min_filter: FilterMode::LinearMipmapLinear,
            mag_filter: FilterMode::Linear,
        }
    }
}

/// Level-0 image handed to [`GpuBackend::upload_texture_2d`].
#[derive(Debug, Clone, Copy)]
pub struct TextureImage<'a> {
    pub width: u32,
    pub height: u32,
    pub internal_format: PixelFormat,
    pub format: PixelFormat,
    pub data: &'a [u8],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolygonMode {
    Fill,
    Line,
}

/// The command surface the object model is written against.
///
/// Every method runs synchronously on the calling thread against the single
/// context the backend was created for. Failures are reported, never
/// swallowed: creation methods fail with `ResourceCreation`, commands that
/// leave an error flag behind fail with `Gpu`.
pub trait GpuBackend {
    // --- Buffers & vertex layout -------------------------------------------

    fn create_vertex_array(&mut self) -> Result<VertexArrayId>;

    fn bind_vertex_array(&mut self, vao: Option<VertexArrayId>) -> Result<()>;

    fn create_buffer(&mut self) -> Result<BufferId>;

    /// Binds `buffer` to `target` and uploads `data` once as static storage.
    fn upload_buffer(&mut self, target: BufferTarget, buffer: BufferId, data: &[u8]) -> Result<()>;

    /// Points `slot` at the currently bound vertex buffer (tightly packed
    /// floats, `components` per vertex) and enables it.
    fn enable_vertex_attribute(&mut self, slot: AttributeSlot, components: u32) -> Result<()>;

    // --- Shaders -------------------------------------------------------------

    /// Compiles one stage. A failed compile returns `ShaderCompile` with the
    /// driver log and leaves no stage object behind.
    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> Result<ShaderId>;

    fn create_program(&mut self) -> Result<ProgramId>;

    fn attach_shader(&mut self, program: ProgramId, shader: ShaderId) -> Result<()>;

    fn bind_attribute_location(&mut self, program: ProgramId, slot: AttributeSlot) -> Result<()>;

    /// Links `program`. A failed link returns `ProgramLink` with the driver log.
    fn link_program(&mut self, program: ProgramId) -> Result<()>;

    /// `None` when the linked program has no active uniform called `name`.
    fn uniform_location(&mut self, program: ProgramId, name: &str) -> Option<UniformLocation>;

    fn delete_shader(&mut self, shader: ShaderId) -> Result<()>;

    // --- Textures ------------------------------------------------------------

    fn create_texture(&mut self) -> Result<TextureId>;

    /// Uploads mip level 0 and regenerates the mip chain.
    fn upload_texture_2d(&mut self, texture: TextureId, image: &TextureImage<'_>) -> Result<()>;

    fn set_sampler_params(&mut self, texture: TextureId, params: &SamplerParams) -> Result<()>;

    // --- Draw state ----------------------------------------------------------

    fn use_program(&mut self, program: ProgramId) -> Result<()>;

    fn set_uniform_mat4(&mut self, location: UniformLocation, value: &Mat4f) -> Result<()>;

    fn set_uniform_i32(&mut self, location: UniformLocation, value: i32) -> Result<()>;

    fn set_uniform_vec3(&mut self, location: UniformLocation, value: Vec3f) -> Result<()>;

    fn bind_texture(&mut self, unit: u32, texture: TextureId) -> Result<()>;

    fn set_polygon_mode(&mut self, mode: PolygonMode) -> Result<()>;

    fn clear(&mut self, color: [f32; 4]) -> Result<()>;

    /// Non-indexed triangle list over `vertex_count` vertices.
    fn draw_arrays(&mut self, vao: VertexArrayId, vertex_count: usize) -> Result<()>;

    /// Indexed triangle list over `index_count` `u32` indices.
    fn draw_elements(&mut self, vao: VertexArrayId, index_count: usize) -> Result<()>;

    // --- Release -------------------------------------------------------------

    fn delete_buffer(&mut self, buffer: BufferId);

    fn delete_vertex_array(&mut self, vao: VertexArrayId);

    fn delete_texture(&mut self, texture: TextureId);

    fn delete_program(&mut self, program: ProgramId);
}
