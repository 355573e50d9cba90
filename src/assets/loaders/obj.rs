//! OBJ import pipeline.
//!
//! Turns an [`ObjDocument`] into a [`Model`]:
//!
//! 1. normalize the vertex pool in place, relative to its own extents
//! 2. unweld every triangle corner into flat, non-indexed attribute arrays
//! 3. build one mesh per shape from its slice of those arrays
//! 4. pick each mesh's material from its first triangle, appending a single
//!    fallback material when any shape has none
//! 5. convert MTL records into materials, loading their textures

use crate::assets::image::ImageDecoder;
use crate::assets::io::FileReader;
use crate::assets::loaders::obj_parser::{self, MtlMaterial, ObjDocument, directory_prefix};
use crate::errors::{CinderError, Result};
use crate::gpu::GpuBackend;
use crate::math::Vec3f;
use crate::resources::model::BoundingBox;
use crate::resources::{Material, Mesh, Model, ShaderProgram, Texture};

/// Everything the pipeline needs besides the document itself.
pub struct ObjImport<'a, B: GpuBackend + ?Sized> {
    pub gpu: &'a mut B,
    pub reader: &'a dyn FileReader,
    pub decoder: &'a dyn ImageDecoder,
    /// Program assigned to every imported material.
    pub shader: &'a ShaderProgram,
    /// Appended when some shape references no material.
    pub fallback: Material,
}

impl<B: GpuBackend + ?Sized> ObjImport<'_, B> {
    /// Parses `path` and assembles the model.
    pub fn load(self, path: &str) -> Result<Model> {
        log::info!("Loading file {path}");
        let doc = obj_parser::parse_obj(path, self.reader)?;
        self.build(path, doc)
    }

    /// Assembles a model from an already parsed document. `path` anchors
    /// relative texture references.
    pub fn build(self, path: &str, mut doc: ObjDocument) -> Result<Model> {
        if doc.shapes.is_empty() {
            return Err(CinderError::InvalidModel(format!("{path} has no faces")));
        }

        if let Some(extents) = BoundingBox::from_positions(&doc.positions) {
            normalize_vertices(&mut doc.positions, &extents);
        }

        let unwelded = Unwelded::from_document(&doc);

        let mut meshes = Vec::with_capacity(doc.shapes.len());
        let mut mesh_to_material = Vec::with_capacity(doc.shapes.len());
        let mut needs_fallback = false;

        for shape in &doc.shapes {
            let corners = shape.face_offset * 3..(shape.face_offset + shape.face_count) * 3;

            let mesh = Mesh::create(
                &mut *self.gpu,
                &unwelded.positions[corners.start * 3..corners.end * 3],
                None,
                unwelded
                    .normals
                    .as_deref()
                    .map(|n| &n[corners.start * 3..corners.end * 3]),
                unwelded
                    .uvs
                    .as_deref()
                    .map(|uv| &uv[corners.start * 2..corners.end * 2]),
            )?;
            meshes.push(mesh);

            let material = doc.material_ids[shape.face_offset].unwrap_or_else(|| {
                needs_fallback = true;
                doc.materials.len()
            });
            mesh_to_material.push(material);
        }

        let mut materials = Vec::with_capacity(doc.materials.len() + 1);
        for record in &doc.materials {
            materials.push(convert_material(
                &mut *self.gpu,
                self.reader,
                self.decoder,
                self.shader,
                path,
                record,
            )?);
        }
        if needs_fallback {
            materials.push(self.fallback);
        }

        Ok(Model::new(meshes, materials, mesh_to_material)?.with_name(path))
    }
}

/// Recenters and rescales an `xyz` position pool in place:
/// `v' = (v - size / 2 - min) / x_size` on every axis.
///
/// Every axis is divided by the X extent, which keeps proportions. A pool
/// that is flat along X divides by zero.
pub fn normalize_vertices(positions: &mut [f32], extents: &BoundingBox) {
    let size = extents.size();
    let offset = size / 2.0 + extents.min;

    for v in positions.chunks_exact_mut(3) {
        let p = (Vec3f::new(v[0], v[1], v[2]) - offset) / size.x;
        v.copy_from_slice(&p.to_array());
    }
}

/// Resolves a texture reference from an MTL file.
///
/// - a bare file name is used as-is
/// - a path whose directory part contains no `..` is used as-is
/// - otherwise it is prefixed with the asset's directory
#[must_use]
pub fn resolve_texture_path(asset_path: &str, texture_path: &str) -> String {
    let Some(dir_end) = texture_path.rfind('/') else {
        return texture_path.to_string();
    };

    if !texture_path[..dir_end].contains("..") {
        return texture_path.to_string();
    }

    format!("{}{texture_path}", directory_prefix(asset_path))
}

/// Per-corner attribute arrays, one entry per triangle corner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Unwelded {
    pub positions: Vec<f32>,
    /// Present when the document has any texture coordinates.
    pub uvs: Option<Vec<f32>>,
    /// Present when the document has any normals.
    pub normals: Option<Vec<f32>>,
}

impl Unwelded {
    /// A corner without a texture coordinate or normal gets zeros.
    #[must_use]
    pub fn from_document(doc: &ObjDocument) -> Self {
        let corner_count = doc.corners.len();
        let mut positions = Vec::with_capacity(corner_count * 3);
        let mut uvs = (!doc.texcoords.is_empty()).then(|| Vec::with_capacity(corner_count * 2));
        let mut normals = (!doc.normals.is_empty()).then(|| Vec::with_capacity(corner_count * 3));

        for corner in &doc.corners {
            let p = corner.position * 3;
            positions.extend_from_slice(&doc.positions[p..p + 3]);

            if let Some(uvs) = &mut uvs {
                match corner.texcoord {
                    Some(t) => uvs.extend_from_slice(&doc.texcoords[t * 2..t * 2 + 2]),
                    None => uvs.extend_from_slice(&[0.0; 2]),
                }
            }

            if let Some(normals) = &mut normals {
                match corner.normal {
                    Some(n) => normals.extend_from_slice(&doc.normals[n * 3..n * 3 + 3]),
                    None => normals.extend_from_slice(&[0.0; 3]),
                }
            }
        }

        Self {
            positions,
            uvs,
            normals,
        }
    }
}

fn convert_material<B: GpuBackend + ?Sized>(
    gpu: &mut B,
    reader: &dyn FileReader,
    decoder: &dyn ImageDecoder,
    shader: &ShaderProgram,
    asset_path: &str,
    record: &MtlMaterial,
) -> Result<Material> {
    let mut load = |texture: Option<&str>| -> Result<Option<Texture>> {
        texture
            .map(|name| {
                let resolved = resolve_texture_path(asset_path, name);
                log::debug!("Material `{}` texture {name} -> {resolved}", record.name);
                Texture::from_file(&mut *gpu, reader, decoder, &resolved)
            })
            .transpose()
    };

    let mut material = Material::new(shader.clone());

    material.ambient_texture = load(record.ambient_texture.as_deref())?;
    material.diffuse_texture = load(record.diffuse_texture.as_deref())?;
    material.specular_texture = load(record.specular_texture.as_deref())?;
    material.specular_highlight_texture = load(record.specular_highlight_texture.as_deref())?;
    material.bump_texture = load(record.bump_texture.as_deref())?;
    material.displacement_texture = load(record.displacement_texture.as_deref())?;
    material.alpha_texture = load(record.alpha_texture.as_deref())?;

    material.ambient_color = Vec3f::from_array(record.ambient);
    material.diffuse_color = Vec3f::from_array(record.diffuse);
    material.specular_color = Vec3f::from_array(record.specular);
    material.transmittance_color = Vec3f::from_array(record.transmittance);
    material.emission_color = Vec3f::from_array(record.emission);

    material.specular_exponent = record.shininess;
    material.index_of_refraction = record.ior;
    material.opacity = record.dissolve;
    material.flat_color = true;

    Ok(material)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_texture_name_is_kept() {
        assert_eq!(resolve_texture_path("assets/model.obj", "tex.png"), "tex.png");
    }

    #[test]
    fn plain_directory_is_kept() {
        assert_eq!(
            resolve_texture_path("assets/model.obj", "textures/tex.png"),
            "textures/tex.png"
        );
    }

    #[test]
    fn parent_directory_is_joined() {
        assert_eq!(
            resolve_texture_path("assets/obj/model.obj", "../tex/a.png"),
            "assets/obj/../tex/a.png"
        );
        assert_eq!(resolve_texture_path("model.obj", "../tex/a.png"), "../tex/a.png");
    }

    #[test]
    fn dots_in_file_name_do_not_count() {
        assert_eq!(resolve_texture_path("a/m.obj", "dir/x..png"), "dir/x..png");
    }

    #[test]
    fn normalize_centers_and_divides_by_x_extent() {
        let mut positions = vec![0.0, 0.0, 0.0, 2.0, 4.0, 6.0];
        let extents = BoundingBox::from_positions(&positions).unwrap();
        normalize_vertices(&mut positions, &extents);

        assert_eq!(positions, vec![-0.5, -1.0, -1.5, 0.5, 1.0, 1.5]);
    }
}
