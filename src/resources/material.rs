use crate::math::Vec3f;
use crate::resources::shader::ShaderProgram;
use crate::resources::texture::Texture;

/// Shading parameters for one or more meshes.
///
/// Only `shader`, `diffuse_texture` and `diffuse_color` reach the GPU during
/// draw submission. The remaining fields are carried from the source asset so
/// callers with their own shaders can use them.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub shader: ShaderProgram,

    // Texture slots
    pub ambient_texture: Option<Texture>,
    pub diffuse_texture: Option<Texture>,
    pub specular_texture: Option<Texture>,
    pub specular_highlight_texture: Option<Texture>,
    pub bump_texture: Option<Texture>,
    pub displacement_texture: Option<Texture>,
    pub alpha_texture: Option<Texture>,

    // Colors
    pub ambient_color: Vec3f,
    pub diffuse_color: Vec3f,
    pub specular_color: Vec3f,
    pub transmittance_color: Vec3f,
    pub emission_color: Vec3f,

    pub specular_exponent: f32,
    pub index_of_refraction: f32,
    pub opacity: f32,

    /// Shade with the material colors rather than lighting. Set on the
    /// default material and on every imported one.
    pub flat_color: bool,
}

impl Material {
    /// A material with no textures, black colors and neutral scalars.
    #[must_use]
    pub fn new(shader: ShaderProgram) -> Self {
        Self {
            shader,
            ambient_texture: None,
            diffuse_texture: None,
            specular_texture: None,
            specular_highlight_texture: None,
            bump_texture: None,
            displacement_texture: None,
            alpha_texture: None,
            ambient_color: Vec3f::ZERO,
            diffuse_color: Vec3f::ZERO,
            specular_color: Vec3f::ZERO,
            transmittance_color: Vec3f::ZERO,
            emission_color: Vec3f::ZERO,
            specular_exponent: 0.0,
            index_of_refraction: 1.0,
            opacity: 1.0,
            flat_color: false,
        }
    }

    /// Textures in slot order: ambient, diffuse, specular, specular highlight,
    /// bump, displacement, alpha.
    pub fn textures(&self) -> impl Iterator<Item = &Texture> {
        [
            &self.ambient_texture,
            &self.diffuse_texture,
            &self.specular_texture,
            &self.specular_highlight_texture,
            &self.bump_texture,
            &self.displacement_texture,
            &self.alpha_texture,
        ]
        .into_iter()
        .flatten()
    }
}
