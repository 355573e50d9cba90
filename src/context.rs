//! Render Context
//!
//! [`RenderContext`] is the single owner of everything that outlives one draw
//! call: the GPU backend, the file reader and image decoder used by loaders,
//! the current view and projection matrices, the polygon fill mode, the input
//! state and the lazily built defaults (shader, checkerboard texture, unit
//! cube).
//!
//! # Lifecycle
//!
//! 1. Create with [`RenderContext::new`] around a backend bound to the current
//!    GL context
//! 2. Load or assemble models, create a [`Camera`]
//! 3. Per frame: inject input, [`Camera::update_fps`],
//!    [`start_render`](RenderContext::start_render), draw,
//!    [`end_render`](RenderContext::end_render)
//! 4. Release models, then [`RenderContext::shutdown`] to free the defaults
//!    and get the backend back
//!
//! ```rust,ignore
//! use cinder::{GlowBackend, RenderContext, settings::ContextSettings};
//!
//! let mut ctx = RenderContext::new(GlowBackend::new(gl)?, ContextSettings::default());
//! let model = ctx.load_obj("assets/teapot.obj")?;
//!
//! while !surface.should_close() {
//!     ctx.start_render()?;
//!     ctx.draw(&model)?;
//!     ctx.end_render(&mut surface)?;
//! }
//!
//! model.release(ctx.gpu_mut());
//! let backend = ctx.shutdown();
//! ```
//!
//! [`Camera`]: crate::scene::camera::Camera
//! [`Camera::update_fps`]: crate::scene::camera::Camera::update_fps

use crate::app::input::Input;
use crate::assets::image::{ImageCrateDecoder, ImageDecoder};
use crate::assets::io::{FileReader, FsFileReader};
use crate::assets::loaders::obj::ObjImport;
use crate::errors::Result;
use crate::gpu::GpuBackend;
use crate::math::{self, Mat4f};
use crate::resources::primitives::{UNIT_CUBE_INDICES, unit_cube_positions};
use crate::resources::{Material, Mesh, Model, ShaderProgram, Texture};
use crate::settings::ContextSettings;

pub struct RenderContext<B: GpuBackend> {
    pub(crate) gpu: B,
    reader: Box<dyn FileReader>,
    decoder: Box<dyn ImageDecoder>,
    pub(crate) settings: ContextSettings,

    pub(crate) window_size: (u32, u32),
    pub(crate) fill: bool,
    pub(crate) view_matrix: Mat4f,
    pub(crate) projection_matrix: Mat4f,
    pub(crate) input: Input,
    pub(crate) frame_count: u64,

    // Built on first use, freed by `shutdown`.
    default_shader: Option<ShaderProgram>,
    default_texture: Option<Texture>,
    pub(crate) cube_mesh: Option<Mesh>,
}

impl<B: GpuBackend> RenderContext<B> {
    /// Wraps `gpu`. Files are read from the working directory until another
    /// reader is installed.
    #[must_use]
    pub fn new(gpu: B, settings: ContextSettings) -> Self {
        let window_size = (settings.window_width, settings.window_height);
        log::info!("Render context created ({}x{})", window_size.0, window_size.1);

        Self {
            gpu,
            reader: Box::new(FsFileReader::new()),
            decoder: Box::new(ImageCrateDecoder),
            settings,
            window_size,
            fill: true,
            view_matrix: math::identity(),
            projection_matrix: math::identity(),
            input: Input::new(),
            frame_count: 0,
            default_shader: None,
            default_texture: None,
            cube_mesh: None,
        }
    }

    #[must_use]
    pub fn with_file_reader(mut self, reader: impl FileReader + 'static) -> Self {
        self.set_file_reader(reader);
        self
    }

    /// Routes every subsequent file read through `reader`.
    pub fn set_file_reader(&mut self, reader: impl FileReader + 'static) {
        self.reader = Box::new(reader);
    }

    /// Restores the filesystem reader.
    pub fn reset_file_reader(&mut self) {
        self.reader = Box::new(FsFileReader::new());
    }

    pub fn set_image_decoder(&mut self, decoder: impl ImageDecoder + 'static) {
        self.decoder = Box::new(decoder);
    }

    // === Accessors ===

    #[inline]
    #[must_use]
    pub fn gpu(&self) -> &B {
        &self.gpu
    }

    #[inline]
    #[must_use]
    pub fn gpu_mut(&mut self) -> &mut B {
        &mut self.gpu
    }

    #[must_use]
    pub fn settings(&self) -> &ContextSettings {
        &self.settings
    }

    #[inline]
    #[must_use]
    pub fn input(&self) -> &Input {
        &self.input
    }

    #[inline]
    #[must_use]
    pub fn input_mut(&mut self) -> &mut Input {
        &mut self.input
    }

    /// Drawable size in pixels as `(width, height)`.
    #[inline]
    #[must_use]
    pub fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    /// Overrides the drawable size until the next presented frame.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
    }

    #[inline]
    #[must_use]
    pub fn view_matrix(&self) -> Mat4f {
        self.view_matrix
    }

    pub fn set_view_matrix(&mut self, view: Mat4f) {
        self.view_matrix = view;
    }

    #[inline]
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4f {
        self.projection_matrix
    }

    pub fn set_projection_matrix(&mut self, projection: Mat4f) {
        self.projection_matrix = projection;
    }

    /// Number of frames presented through [`end_render`](Self::end_render).
    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    // === Defaults ===

    /// The built-in program, compiled on first use.
    pub fn default_shader(&mut self) -> Result<ShaderProgram> {
        if let Some(shader) = &self.default_shader {
            return Ok(shader.clone());
        }

        log::info!("Building default shader program");
        let shader = ShaderProgram::embedded_default(&mut self.gpu)?;
        self.default_shader = Some(shader.clone());
        Ok(shader)
    }

    /// The magenta checkerboard, uploaded on first use.
    pub fn default_texture(&mut self) -> Result<Texture> {
        if let Some(texture) = &self.default_texture {
            return Ok(texture.clone());
        }

        log::info!("Building default texture");
        let texture = Texture::checkerboard(&mut self.gpu)?;
        self.default_texture = Some(texture.clone());
        Ok(texture)
    }

    /// Default shader with the checkerboard as diffuse texture. A new value
    /// every call; the GPU objects behind it are shared.
    pub fn default_material(&mut self) -> Result<Material> {
        let mut material = Material::new(self.default_shader()?);
        material.diffuse_texture = Some(self.default_texture()?);
        material.flat_color = true;
        Ok(material)
    }

    pub(crate) fn ensure_cube_mesh(&mut self) -> Result<()> {
        if self.cube_mesh.is_none() {
            self.cube_mesh = Some(Mesh::create(
                &mut self.gpu,
                &unit_cube_positions(),
                Some(UNIT_CUBE_INDICES.as_slice()),
                None,
                None,
            )?);
        }
        Ok(())
    }

    // === Object creation ===

    /// Uploads a mesh through this context's backend.
    pub fn create_mesh(
        &mut self,
        vertices: &[f32],
        indices: Option<&[u32]>,
        normals: Option<&[f32]>,
        uvs: Option<&[f32]>,
    ) -> Result<Mesh> {
        Mesh::create(&mut self.gpu, vertices, indices, normals, uvs)
    }

    /// Assembles a model.
    ///
    /// Without materials the model gets one default material. Without a
    /// mapping every mesh uses material 0.
    pub fn create_model(
        &mut self,
        meshes: Vec<Mesh>,
        materials: Option<Vec<Material>>,
        mesh_to_material: Option<Vec<usize>>,
    ) -> Result<Model> {
        match materials {
            Some(materials) if !materials.is_empty() => {
                let mapping = mesh_to_material.unwrap_or_else(|| vec![0; meshes.len()]);
                Model::new(meshes, materials, mapping)
            }
            _ => {
                let mapping = vec![0; meshes.len()];
                Model::new(meshes, vec![self.default_material()?], mapping)
            }
        }
    }

    /// Loads a 2D texture through the installed reader and decoder.
    pub fn load_texture(&mut self, path: &str) -> Result<Texture> {
        Texture::from_file(&mut self.gpu, self.reader.as_ref(), self.decoder.as_ref(), path)
    }

    /// Imports a Wavefront OBJ file and its material libraries as a model.
    pub fn load_obj(&mut self, path: &str) -> Result<Model> {
        let shader = self.default_shader()?;
        let fallback = self.default_material()?;

        ObjImport {
            gpu: &mut self.gpu,
            reader: self.reader.as_ref(),
            decoder: self.decoder.as_ref(),
            shader: &shader,
            fallback,
        }
        .load(path)
    }

    // === Teardown ===

    /// Frees the cached defaults and hands the backend back. Models must be
    /// released by their owners first.
    pub fn shutdown(mut self) -> B {
        if let Some(mesh) = self.cube_mesh.take() {
            mesh.release(&mut self.gpu);
        }
        if let Some(texture) = self.default_texture.take() {
            texture.release(&mut self.gpu);
        }
        if let Some(shader) = self.default_shader.take() {
            shader.release(&mut self.gpu);
        }

        log::info!("Render context shut down after {} frames", self.frame_count);
        self.gpu
    }
}
