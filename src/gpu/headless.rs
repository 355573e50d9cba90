//! Headless backend.
//!
//! Hands out handles from counters, keeps a CPU copy of everything uploaded and
//! appends every state change or draw to a command log. Shader "compilation"
//! only checks that a stage declares `main` and collects its `uniform`
//! declarations, which is enough for uniform lookup to behave like a driver:
//! names that no attached stage declares resolve to `None`.
//!
//! Tests use it to assert on the exact command stream; tools use it to run the
//! import pipeline without a window.

use std::collections::{HashMap, HashSet};
use std::num::NonZeroU32;

use super::{
    AttributeSlot, BufferId, BufferTarget, GpuBackend, PixelFormat, PolygonMode, ProgramId,
    SamplerParams, ShaderId, ShaderStage, TextureId, TextureImage, UniformLocation, VertexArrayId,
};
use crate::errors::{CinderError, Result};
use crate::math::{Mat4f, Vec3f};

/// One recorded command.
#[derive(Debug, Clone, PartialEq)]
pub enum GpuCommand {
    BindVertexArray(Option<VertexArrayId>),
    UploadBuffer {
        target: BufferTarget,
        buffer: BufferId,
        bytes: usize,
    },
    EnableAttribute {
        slot: AttributeSlot,
        components: u32,
    },
    BindAttributeLocation {
        program: ProgramId,
        slot: AttributeSlot,
    },
    DeleteShader(ShaderId),
    UploadTexture {
        texture: TextureId,
        width: u32,
        height: u32,
    },
    SetSampler {
        texture: TextureId,
        params: SamplerParams,
    },
    UseProgram(ProgramId),
    SetUniformMat4 {
        location: UniformLocation,
        value: Mat4f,
    },
    SetUniformI32 {
        location: UniformLocation,
        value: i32,
    },
    SetUniformVec3 {
        location: UniformLocation,
        value: Vec3f,
    },
    BindTexture {
        unit: u32,
        texture: TextureId,
    },
    SetPolygonMode(PolygonMode),
    Clear([f32; 4]),
    DrawArrays {
        vao: VertexArrayId,
        vertex_count: usize,
    },
    DrawElements {
        vao: VertexArrayId,
        index_count: usize,
    },
}

#[derive(Debug, Clone)]
pub struct HeadlessShader {
    pub stage: ShaderStage,
    pub uniforms: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessProgram {
    pub stages: Vec<ShaderId>,
    pub linked: bool,
    /// Uniform names in location order.
    pub uniforms: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct HeadlessTexture {
    pub width: u32,
    pub height: u32,
    pub internal_format: PixelFormat,
    pub format: PixelFormat,
    pub data: Vec<u8>,
    pub params: Option<SamplerParams>,
}

#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_id: u32,
    /// Name of a creation that should fail once, see [`HeadlessBackend::fail_next`].
    pending_failure: Option<&'static str>,

    pub commands: Vec<GpuCommand>,
    pub vertex_arrays: HashSet<VertexArrayId>,
    pub buffers: HashMap<BufferId, Vec<u8>>,
    pub shaders: HashMap<ShaderId, HeadlessShader>,
    pub programs: HashMap<ProgramId, HeadlessProgram>,
    pub textures: HashMap<TextureId, HeadlessTexture>,
    pub polygon_mode: Option<PolygonMode>,
}

impl HeadlessBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next creation of `resource` ("vertex array", "buffer",
    /// "shader", "program" or "texture") return an invalid handle.
    pub fn fail_next(&mut self, resource: &'static str) {
        self.pending_failure = Some(resource);
    }

    /// Draw commands only, in submission order.
    pub fn draw_calls(&self) -> impl Iterator<Item = &GpuCommand> {
        self.commands.iter().filter(|cmd| {
            matches!(
                cmd,
                GpuCommand::DrawArrays { .. } | GpuCommand::DrawElements { .. }
            )
        })
    }

    /// Name behind a location handed out for `program`.
    #[must_use]
    pub fn uniform_name(&self, program: ProgramId, location: UniformLocation) -> Option<&str> {
        self.programs
            .get(&program)?
            .uniforms
            .get(location.0 as usize)
            .map(String::as_str)
    }

    /// Number of GPU objects still alive.
    #[must_use]
    pub fn live_objects(&self) -> usize {
        self.vertex_arrays.len()
            + self.buffers.len()
            + self.shaders.len()
            + self.programs.len()
            + self.textures.len()
    }

    fn allocate(&mut self, resource: &'static str) -> Result<NonZeroU32> {
        if self.pending_failure == Some(resource) {
            self.pending_failure = None;
            return Err(CinderError::ResourceCreation {
                resource,
                reason: "backend returned handle 0".to_string(),
            });
        }
        self.next_id += 1;
        NonZeroU32::new(self.next_id).ok_or_else(|| CinderError::ResourceCreation {
            resource,
            reason: "handle space exhausted".to_string(),
        })
    }
}

/// Collects `uniform <type> <name>;` declarations.
fn declared_uniforms(source: &str) -> Vec<String> {
    source
        .lines()
        .map(str::trim)
        .filter_map(|line| line.strip_prefix("uniform "))
        .filter_map(|decl| decl.split_whitespace().last())
        .map(|name| {
            let name = name.trim_end_matches(';');
            name.split('[').next().unwrap_or(name).to_string()
        })
        .collect()
}

impl GpuBackend for HeadlessBackend {
    fn create_vertex_array(&mut self) -> Result<VertexArrayId> {
        let id = VertexArrayId(self.allocate("vertex array")?);
        self.vertex_arrays.insert(id);
        Ok(id)
    }

    fn bind_vertex_array(&mut self, vao: Option<VertexArrayId>) -> Result<()> {
        self.commands.push(GpuCommand::BindVertexArray(vao));
        Ok(())
    }

    fn create_buffer(&mut self) -> Result<BufferId> {
        let id = BufferId(self.allocate("buffer")?);
        self.buffers.insert(id, Vec::new());
        Ok(id)
    }

    fn upload_buffer(&mut self, target: BufferTarget, buffer: BufferId, data: &[u8]) -> Result<()> {
        let storage = self.buffers.get_mut(&buffer).ok_or(CinderError::Gpu {
            op: "buffer_data",
            code: 0x0502,
        })?;
        storage.clear();
        storage.extend_from_slice(data);
        self.commands.push(GpuCommand::UploadBuffer {
            target,
            buffer,
            bytes: data.len(),
        });
        Ok(())
    }

    fn enable_vertex_attribute(&mut self, slot: AttributeSlot, components: u32) -> Result<()> {
        self.commands
            .push(GpuCommand::EnableAttribute { slot, components });
        Ok(())
    }

    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> Result<ShaderId> {
        if !source.contains("void main") {
            return Err(CinderError::ShaderCompile {
                stage,
                log: "0:1(1): error: no entry point `main` defined".to_string(),
            });
        }
        let id = ShaderId(self.allocate("shader")?);
        self.shaders.insert(
            id,
            HeadlessShader {
                stage,
                uniforms: declared_uniforms(source),
            },
        );
        Ok(id)
    }

    fn create_program(&mut self) -> Result<ProgramId> {
        let id = ProgramId(self.allocate("program")?);
        self.programs.insert(id, HeadlessProgram::default());
        Ok(id)
    }

    fn attach_shader(&mut self, program: ProgramId, shader: ShaderId) -> Result<()> {
        let prg = self.programs.get_mut(&program).ok_or(CinderError::Gpu {
            op: "attach_shader",
            code: 0x0501,
        })?;
        prg.stages.push(shader);
        Ok(())
    }

    fn bind_attribute_location(&mut self, program: ProgramId, slot: AttributeSlot) -> Result<()> {
        self.commands
            .push(GpuCommand::BindAttributeLocation { program, slot });
        Ok(())
    }

    fn link_program(&mut self, program: ProgramId) -> Result<()> {
        let stages = self
            .programs
            .get(&program)
            .map(|prg| prg.stages.clone())
            .unwrap_or_default();

        let has_stage = |wanted: ShaderStage| {
            stages
                .iter()
                .filter_map(|id| self.shaders.get(id))
                .any(|shader| shader.stage == wanted)
        };
        if !has_stage(ShaderStage::Vertex) || !has_stage(ShaderStage::Fragment) {
            return Err(CinderError::ProgramLink(
                "error: program needs a vertex and a fragment stage".to_string(),
            ));
        }

        let mut uniforms: Vec<String> = Vec::new();
        for shader in stages.iter().filter_map(|id| self.shaders.get(id)) {
            for name in &shader.uniforms {
                if !uniforms.contains(name) {
                    uniforms.push(name.clone());
                }
            }
        }

        if let Some(prg) = self.programs.get_mut(&program) {
            prg.linked = true;
            prg.uniforms = uniforms;
        }
        Ok(())
    }

    fn uniform_location(&mut self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        let prg = self.programs.get(&program)?;
        if !prg.linked {
            return None;
        }
        prg.uniforms
            .iter()
            .position(|uniform| uniform == name)
            .map(|index| UniformLocation(index as u32))
    }

    fn delete_shader(&mut self, shader: ShaderId) -> Result<()> {
        self.shaders.remove(&shader);
        self.commands.push(GpuCommand::DeleteShader(shader));
        Ok(())
    }

    fn create_texture(&mut self) -> Result<TextureId> {
        Ok(TextureId(self.allocate("texture")?))
    }

    fn upload_texture_2d(&mut self, texture: TextureId, image: &TextureImage<'_>) -> Result<()> {
        self.textures.insert(
            texture,
            HeadlessTexture {
                width: image.width,
                height: image.height,
                internal_format: image.internal_format,
                format: image.format,
                data: image.data.to_vec(),
                params: None,
            },
        );
        self.commands.push(GpuCommand::UploadTexture {
            texture,
            width: image.width,
            height: image.height,
        });
        Ok(())
    }

    fn set_sampler_params(&mut self, texture: TextureId, params: &SamplerParams) -> Result<()> {
        let tex = self.textures.get_mut(&texture).ok_or(CinderError::Gpu {
            op: "tex_parameter",
            code: 0x0502,
        })?;
        tex.params = Some(*params);
        self.commands.push(GpuCommand::SetSampler {
            texture,
            params: *params,
        });
        Ok(())
    }

    fn use_program(&mut self, program: ProgramId) -> Result<()> {
        self.commands.push(GpuCommand::UseProgram(program));
        Ok(())
    }

    fn set_uniform_mat4(&mut self, location: UniformLocation, value: &Mat4f) -> Result<()> {
        self.commands.push(GpuCommand::SetUniformMat4 {
            location,
            value: *value,
        });
        Ok(())
    }

    fn set_uniform_i32(&mut self, location: UniformLocation, value: i32) -> Result<()> {
        self.commands
            .push(GpuCommand::SetUniformI32 { location, value });
        Ok(())
    }

    fn set_uniform_vec3(&mut self, location: UniformLocation, value: Vec3f) -> Result<()> {
        self.commands
            .push(GpuCommand::SetUniformVec3 { location, value });
        Ok(())
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureId) -> Result<()> {
        self.commands.push(GpuCommand::BindTexture { unit, texture });
        Ok(())
    }

    fn set_polygon_mode(&mut self, mode: PolygonMode) -> Result<()> {
        self.polygon_mode = Some(mode);
        self.commands.push(GpuCommand::SetPolygonMode(mode));
        Ok(())
    }

    fn clear(&mut self, color: [f32; 4]) -> Result<()> {
        self.commands.push(GpuCommand::Clear(color));
        Ok(())
    }

    fn draw_arrays(&mut self, vao: VertexArrayId, vertex_count: usize) -> Result<()> {
        self.commands
            .push(GpuCommand::DrawArrays { vao, vertex_count });
        Ok(())
    }

    fn draw_elements(&mut self, vao: VertexArrayId, index_count: usize) -> Result<()> {
        self.commands
            .push(GpuCommand::DrawElements { vao, index_count });
        Ok(())
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        self.buffers.remove(&buffer);
    }

    fn delete_vertex_array(&mut self, vao: VertexArrayId) {
        self.vertex_arrays.remove(&vao);
    }

    fn delete_texture(&mut self, texture: TextureId) {
        self.textures.remove(&texture);
    }

    fn delete_program(&mut self, program: ProgramId) {
        self.programs.remove(&program);
    }
}
