//! Shader programs and their builder.
//!
//! A [`ShaderProgram`] resolves the closed set of [`UniformSlot`]s once, at
//! link time. Draw submission indexes that table directly; a slot the program
//! does not declare stays `None` and is skipped.

use rust_embed::RustEmbed;

use crate::errors::{CinderError, Result};
use crate::gpu::{AttributeSlot, GpuBackend, ProgramId, ShaderId, ShaderStage, UniformLocation};

#[derive(RustEmbed)]
#[folder = "src/resources/shaders"]
struct ShaderAssets;

/// Uniforms the toolkit knows how to feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformSlot {
    Model,
    View,
    Projection,
    DiffuseColor,
    DiffuseTexture,
    DiffuseTextureProvided,
}

impl UniformSlot {
    pub const COUNT: usize = 6;

    pub const ALL: [UniformSlot; Self::COUNT] = [
        UniformSlot::Model,
        UniformSlot::View,
        UniformSlot::Projection,
        UniformSlot::DiffuseColor,
        UniformSlot::DiffuseTexture,
        UniformSlot::DiffuseTextureProvided,
    ];

    /// GLSL identifier looked up at link time.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            UniformSlot::Model => "model",
            UniformSlot::View => "view",
            UniformSlot::Projection => "projection",
            UniformSlot::DiffuseColor => "diffuse_color",
            UniformSlot::DiffuseTexture => "diffuse_tex",
            UniformSlot::DiffuseTextureProvided => "diffuse_tex_provided",
        }
    }
}

/// Attributes bound by name before linking. Normals use a fixed location in
/// the mesh layout but are not bound by name.
const BOUND_ATTRIBUTES: [AttributeSlot; 2] = [AttributeSlot::Position, AttributeSlot::Uv];

/// A linked program and its resolved uniform table.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderProgram {
    id: ProgramId,
    uniform_locations: [Option<UniformLocation>; UniformSlot::COUNT],
}

impl ShaderProgram {
    #[inline]
    #[must_use]
    pub fn id(&self) -> ProgramId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn uniform(&self, slot: UniformSlot) -> Option<UniformLocation> {
        self.uniform_locations[slot as usize]
    }

    #[must_use]
    pub fn has_uniform(&self, slot: UniformSlot) -> bool {
        self.uniform(slot).is_some()
    }

    /// Builds the program from the two embedded GLSL sources.
    pub fn embedded_default<B: GpuBackend + ?Sized>(gpu: &mut B) -> Result<Self> {
        let mut builder = ShaderProgramBuilder::new();
        builder.add_shader(gpu, &embedded_source("vert.glsl")?, ShaderStage::Vertex)?;
        builder.add_shader(gpu, &embedded_source("frag.glsl")?, ShaderStage::Fragment)?;
        builder.build(gpu)
    }

    /// Frees the GPU program. Other clones of this program become dangling.
    pub fn release<B: GpuBackend + ?Sized>(self, gpu: &mut B) {
        gpu.delete_program(self.id);
    }
}

fn embedded_source(name: &str) -> Result<String> {
    let file = ShaderAssets::get(name).ok_or_else(|| CinderError::FileNotFound(name.to_string()))?;
    String::from_utf8(file.data.into_owned())
        .map_err(|e| CinderError::UnsupportedFormat(format!("{name} is not UTF-8: {e}")))
}

/// Accumulates compiled stages, then links them into a [`ShaderProgram`].
#[derive(Debug, Default)]
pub struct ShaderProgramBuilder {
    shaders: Vec<ShaderId>,
}

impl ShaderProgramBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles one stage. The driver log is reported at `error` level before
    /// the failure is returned.
    pub fn add_shader<B: GpuBackend + ?Sized>(
        &mut self,
        gpu: &mut B,
        source: &str,
        stage: ShaderStage,
    ) -> Result<&mut Self> {
        let shader = gpu.compile_shader(stage, source).inspect_err(|err| {
            if let CinderError::ShaderCompile { log, .. } = err {
                log::error!("Shader compilation error: {log}");
            }
        })?;
        self.shaders.push(shader);
        Ok(self)
    }

    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.shaders.len()
    }

    /// Links every added stage, binds `position`/`uv`, resolves the uniform
    /// table and deletes the now redundant stage objects.
    pub fn build<B: GpuBackend + ?Sized>(self, gpu: &mut B) -> Result<ShaderProgram> {
        let id = gpu.create_program()?;

        for &shader in &self.shaders {
            gpu.attach_shader(id, shader)?;
        }

        for slot in BOUND_ATTRIBUTES {
            gpu.bind_attribute_location(id, slot)?;
        }

        gpu.link_program(id).inspect_err(|err| {
            if let CinderError::ProgramLink(log) = err {
                log::error!("Shader program linking error: {log}");
            }
        })?;

        let mut uniform_locations = [None; UniformSlot::COUNT];
        for slot in UniformSlot::ALL {
            uniform_locations[slot as usize] = gpu.uniform_location(id, slot.name());
            if uniform_locations[slot as usize].is_none() {
                log::debug!("Uniform `{}` not present in program {}", slot.name(), id.get());
            }
        }

        for shader in self.shaders {
            gpu.delete_shader(shader)?;
        }

        Ok(ShaderProgram {
            id,
            uniform_locations,
        })
    }
}
