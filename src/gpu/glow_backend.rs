//! OpenGL 3.3 core backend built on `glow`.
//!
//! The backend does not create a window or a context; the caller loads the
//! function pointers of an already-current context and hands the resulting
//! `glow::Context` over. Every command is followed by an error-flag check so a
//! failing call surfaces as [`CinderError::Gpu`] at the point it happened.

use glow::HasContext;

use super::{
    AttributeSlot, BufferId, BufferTarget, FilterMode, GpuBackend, PixelFormat, PolygonMode,
    ProgramId, SamplerParams, ShaderId, ShaderStage, TextureId, TextureImage, UniformLocation,
    VertexArrayId, WrapMode,
};
use crate::errors::{CinderError, Result};
use crate::math::{Mat4f, Vec3f};

pub struct GlowBackend {
    gl: glow::Context,
}

impl GlowBackend {
    /// Wraps a loaded context. Enables depth testing, which the toolkit
    /// assumes for every frame.
    pub fn new(gl: glow::Context) -> Result<Self> {
        let backend = Self { gl };
        unsafe {
            backend.gl.enable(glow::DEPTH_TEST);
        }
        backend.check("enable(DEPTH_TEST)")?;
        Ok(backend)
    }

    #[inline]
    #[must_use]
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    /// Gives the context back, e.g. to tear it down.
    #[must_use]
    pub fn into_inner(self) -> glow::Context {
        self.gl
    }

    fn check(&self, op: &'static str) -> Result<()> {
        let code = unsafe { self.gl.get_error() };
        if code == glow::NO_ERROR {
            Ok(())
        } else {
            Err(CinderError::Gpu { op, code })
        }
    }
}

fn creation_error(resource: &'static str) -> impl FnOnce(String) -> CinderError {
    move |reason| CinderError::ResourceCreation { resource, reason }
}

const fn buffer_target(target: BufferTarget) -> u32 {
    match target {
        BufferTarget::Vertex => glow::ARRAY_BUFFER,
        BufferTarget::Index => glow::ELEMENT_ARRAY_BUFFER,
    }
}

const fn pixel_format(format: PixelFormat) -> u32 {
    match format {
        PixelFormat::Red => glow::RED,
        PixelFormat::Rg => glow::RG,
        PixelFormat::Rgb => glow::RGB,
        PixelFormat::Rgba => glow::RGBA,
    }
}

const fn filter_mode(filter: FilterMode) -> i32 {
    let value = match filter {
        FilterMode::Nearest => glow::NEAREST,
        FilterMode::Linear => glow::LINEAR,
        FilterMode::LinearMipmapLinear => glow::LINEAR_MIPMAP_LINEAR,
    };
    value as i32
}

const fn wrap_mode(wrap: WrapMode) -> i32 {
    let value = match wrap {
        WrapMode::Repeat => glow::REPEAT,
        WrapMode::ClampToEdge => glow::CLAMP_TO_EDGE,
    };
    value as i32
}

const fn shader_type(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

#[inline]
fn program(id: ProgramId) -> glow::NativeProgram {
    glow::NativeProgram(id.0)
}

#[inline]
fn texture(id: TextureId) -> glow::NativeTexture {
    glow::NativeTexture(id.0)
}

#[inline]
fn uniform(location: UniformLocation) -> glow::NativeUniformLocation {
    glow::NativeUniformLocation(location.0)
}

impl GpuBackend for GlowBackend {
    fn create_vertex_array(&mut self) -> Result<VertexArrayId> {
        let vao = unsafe { self.gl.create_vertex_array() }.map_err(creation_error("vertex array"))?;
        Ok(VertexArrayId(vao.0))
    }

    fn bind_vertex_array(&mut self, vao: Option<VertexArrayId>) -> Result<()> {
        unsafe {
            self.gl
                .bind_vertex_array(vao.map(|id| glow::NativeVertexArray(id.0)));
        }
        self.check("bind_vertex_array")
    }

    fn create_buffer(&mut self) -> Result<BufferId> {
        let buffer = unsafe { self.gl.create_buffer() }.map_err(creation_error("buffer"))?;
        Ok(BufferId(buffer.0))
    }

    fn upload_buffer(&mut self, target: BufferTarget, buffer: BufferId, data: &[u8]) -> Result<()> {
        let target = buffer_target(target);
        unsafe {
            self.gl.bind_buffer(target, Some(glow::NativeBuffer(buffer.0)));
        }
        self.check("bind_buffer")?;

        unsafe {
            self.gl.buffer_data_u8_slice(target, data, glow::STATIC_DRAW);
        }
        self.check("buffer_data")
    }

    fn enable_vertex_attribute(&mut self, slot: AttributeSlot, components: u32) -> Result<()> {
        let stride = (components as usize * std::mem::size_of::<f32>()) as i32;
        unsafe {
            self.gl.vertex_attrib_pointer_f32(
                slot.location(),
                components as i32,
                glow::FLOAT,
                false,
                stride,
                0,
            );
        }
        self.check("vertex_attrib_pointer")?;

        unsafe {
            self.gl.enable_vertex_attrib_array(slot.location());
        }
        self.check("enable_vertex_attrib_array")
    }

    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> Result<ShaderId> {
        let shader = unsafe { self.gl.create_shader(shader_type(stage)) }
            .map_err(creation_error("shader"))?;

        unsafe {
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
        }
        self.check("compile_shader")?;

        if !unsafe { self.gl.get_shader_compile_status(shader) } {
            let log = unsafe { self.gl.get_shader_info_log(shader) };
            unsafe {
                self.gl.delete_shader(shader);
            }
            return Err(CinderError::ShaderCompile { stage, log });
        }

        Ok(ShaderId(shader.0))
    }

    fn create_program(&mut self) -> Result<ProgramId> {
        let prg = unsafe { self.gl.create_program() }.map_err(creation_error("program"))?;
        Ok(ProgramId(prg.0))
    }

    fn attach_shader(&mut self, prg: ProgramId, shader: ShaderId) -> Result<()> {
        unsafe {
            self.gl
                .attach_shader(program(prg), glow::NativeShader(shader.0));
        }
        self.check("attach_shader")
    }

    fn bind_attribute_location(&mut self, prg: ProgramId, slot: AttributeSlot) -> Result<()> {
        unsafe {
            self.gl
                .bind_attrib_location(program(prg), slot.location(), slot.name());
        }
        self.check("bind_attrib_location")
    }

    fn link_program(&mut self, prg: ProgramId) -> Result<()> {
        unsafe {
            self.gl.link_program(program(prg));
        }
        self.check("link_program")?;

        if unsafe { self.gl.get_program_link_status(program(prg)) } {
            Ok(())
        } else {
            let log = unsafe { self.gl.get_program_info_log(program(prg)) };
            Err(CinderError::ProgramLink(log))
        }
    }

    fn uniform_location(&mut self, prg: ProgramId, name: &str) -> Option<UniformLocation> {
        unsafe { self.gl.get_uniform_location(program(prg), name) }
            .map(|location| UniformLocation(location.0))
    }

    fn delete_shader(&mut self, shader: ShaderId) -> Result<()> {
        unsafe {
            self.gl.delete_shader(glow::NativeShader(shader.0));
        }
        self.check("delete_shader")
    }

    fn create_texture(&mut self) -> Result<TextureId> {
        let tex = unsafe { self.gl.create_texture() }.map_err(creation_error("texture"))?;
        Ok(TextureId(tex.0))
    }

    fn upload_texture_2d(&mut self, tex: TextureId, image: &TextureImage<'_>) -> Result<()> {
        unsafe {
            self.gl.bind_texture(glow::TEXTURE_2D, Some(texture(tex)));
        }
        self.check("bind_texture")?;

        unsafe {
            self.gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                pixel_format(image.internal_format) as i32,
                image.width as i32,
                image.height as i32,
                0,
                pixel_format(image.format),
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(image.data)),
            );
        }
        self.check("tex_image_2d")?;

        unsafe {
            self.gl.generate_mipmap(glow::TEXTURE_2D);
        }
        self.check("generate_mipmap")
    }

    fn set_sampler_params(&mut self, tex: TextureId, params: &SamplerParams) -> Result<()> {
        unsafe {
            self.gl.bind_texture(glow::TEXTURE_2D, Some(texture(tex)));
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, wrap_mode(params.wrap_s));
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, wrap_mode(params.wrap_t));
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                filter_mode(params.min_filter),
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                filter_mode(params.mag_filter),
            );
        }
        self.check("tex_parameter")
    }

    fn use_program(&mut self, prg: ProgramId) -> Result<()> {
        unsafe {
            self.gl.use_program(Some(program(prg)));
        }
        self.check("use_program")
    }

    fn set_uniform_mat4(&mut self, location: UniformLocation, value: &Mat4f) -> Result<()> {
        unsafe {
            self.gl.uniform_matrix_4_f32_slice(
                Some(&uniform(location)),
                false,
                &value.to_cols_array(),
            );
        }
        self.check("uniform_matrix_4fv")
    }

    fn set_uniform_i32(&mut self, location: UniformLocation, value: i32) -> Result<()> {
        unsafe {
            self.gl.uniform_1_i32(Some(&uniform(location)), value);
        }
        self.check("uniform_1i")
    }

    fn set_uniform_vec3(&mut self, location: UniformLocation, value: Vec3f) -> Result<()> {
        unsafe {
            self.gl
                .uniform_3_f32(Some(&uniform(location)), value.x, value.y, value.z);
        }
        self.check("uniform_3f")
    }

    fn bind_texture(&mut self, unit: u32, tex: TextureId) -> Result<()> {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(texture(tex)));
        }
        self.check("bind_texture")
    }

    fn set_polygon_mode(&mut self, mode: PolygonMode) -> Result<()> {
        let mode = match mode {
            PolygonMode::Fill => glow::FILL,
            PolygonMode::Line => glow::LINE,
        };
        unsafe {
            self.gl.polygon_mode(glow::FRONT_AND_BACK, mode);
        }
        self.check("polygon_mode")
    }

    fn clear(&mut self, color: [f32; 4]) -> Result<()> {
        unsafe {
            self.gl.clear_color(color[0], color[1], color[2], color[3]);
            self.gl
                .clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
        self.check("clear")
    }

    fn draw_arrays(&mut self, vao: VertexArrayId, vertex_count: usize) -> Result<()> {
        self.bind_vertex_array(Some(vao))?;
        unsafe {
            self.gl.draw_arrays(glow::TRIANGLES, 0, vertex_count as i32);
        }
        self.check("draw_arrays")
    }

    fn draw_elements(&mut self, vao: VertexArrayId, index_count: usize) -> Result<()> {
        self.bind_vertex_array(Some(vao))?;
        unsafe {
            self.gl
                .draw_elements(glow::TRIANGLES, index_count as i32, glow::UNSIGNED_INT, 0);
        }
        self.check("draw_elements")
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        unsafe {
            self.gl.delete_buffer(glow::NativeBuffer(buffer.0));
        }
    }

    fn delete_vertex_array(&mut self, vao: VertexArrayId) {
        unsafe {
            self.gl.delete_vertex_array(glow::NativeVertexArray(vao.0));
        }
    }

    fn delete_texture(&mut self, tex: TextureId) {
        unsafe {
            self.gl.delete_texture(texture(tex));
        }
    }

    fn delete_program(&mut self, prg: ProgramId) {
        unsafe {
            self.gl.delete_program(program(prg));
        }
    }
}
