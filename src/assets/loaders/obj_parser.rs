//! Wavefront OBJ / MTL reading on top of `tobj`.
//!
//! Produces a flat [`ObjDocument`]: shared attribute pools, one
//! [`FaceCorner`] per triangle corner (polygons are fan-triangulated), a
//! material id per triangle and contiguous [`ObjShape`] runs split at `o` and
//! `g` statements. Both the OBJ bytes and every `mtllib` library go through
//! the same [`FileReader`], libraries relative to the OBJ file's directory.

use std::borrow::Cow;
use std::path::Path;

use crate::assets::io::FileReader;
use crate::errors::{CinderError, Result};

/// One triangle corner, as 0-based indices into the attribute pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceCorner {
    pub position: usize,
    pub texcoord: Option<usize>,
    pub normal: Option<usize>,
}

/// A contiguous run of triangles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjShape {
    pub name: String,
    /// First triangle of the run.
    pub face_offset: usize,
    /// Number of triangles in the run.
    pub face_count: usize,
}

/// Material record from an MTL library.
#[derive(Debug, Clone, PartialEq)]
pub struct MtlMaterial {
    pub name: String,

    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub transmittance: [f32; 3],
    pub emission: [f32; 3],
    pub shininess: f32,
    pub ior: f32,
    pub dissolve: f32,
    pub illum: i32,

    pub ambient_texture: Option<String>,
    pub diffuse_texture: Option<String>,
    pub specular_texture: Option<String>,
    pub specular_highlight_texture: Option<String>,
    pub bump_texture: Option<String>,
    pub displacement_texture: Option<String>,
    pub alpha_texture: Option<String>,
}

impl MtlMaterial {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ambient: [0.0; 3],
            diffuse: [0.0; 3],
            specular: [0.0; 3],
            transmittance: [0.0; 3],
            emission: [0.0; 3],
            shininess: 1.0,
            ior: 1.0,
            dissolve: 1.0,
            illum: 0,
            ambient_texture: None,
            diffuse_texture: None,
            specular_texture: None,
            specular_highlight_texture: None,
            bump_texture: None,
            displacement_texture: None,
            alpha_texture: None,
        }
    }
}

impl From<tobj::Material> for MtlMaterial {
    fn from(material: tobj::Material) -> Self {
        let extra = |key: &str| material.unknown_param.get(key).map(|value| value.trim());
        let extra_triple = |key: &str| extra(key).and_then(parse_triple);

        let dissolve = material.dissolve.unwrap_or_else(|| {
            extra("Tr")
                .and_then(|tr| tr.parse::<f32>().ok())
                .map_or(1.0, |tr| 1.0 - tr)
        });

        Self {
            ambient: material.ambient.unwrap_or([0.0; 3]),
            diffuse: material.diffuse.unwrap_or([0.0; 3]),
            specular: material.specular.unwrap_or([0.0; 3]),
            transmittance: extra_triple("Kt")
                .or_else(|| extra_triple("Tf"))
                .unwrap_or([0.0; 3]),
            emission: extra_triple("Ke").unwrap_or([0.0; 3]),
            shininess: material.shininess.unwrap_or(1.0),
            ior: material.optical_density.unwrap_or(1.0),
            dissolve,
            illum: material.illumination_model.map_or(0, i32::from),
            specular_highlight_texture: material.shininess_texture.clone(),
            bump_texture: material
                .normal_texture
                .clone()
                .or_else(|| extra("bump").map(str::to_string))
                .or_else(|| extra("map_bump").map(str::to_string)),
            displacement_texture: extra("disp").map(str::to_string),
            alpha_texture: material.dissolve_texture.clone(),
            ambient_texture: material.ambient_texture.clone(),
            diffuse_texture: material.diffuse_texture.clone(),
            specular_texture: material.specular_texture.clone(),
            name: material.name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjDocument {
    /// `xyz` per pooled vertex.
    pub positions: Vec<f32>,
    /// `uv` per pooled texture coordinate.
    pub texcoords: Vec<f32>,
    /// `xyz` per pooled normal.
    pub normals: Vec<f32>,
    /// Three corners per triangle.
    pub corners: Vec<FaceCorner>,
    /// Material per triangle, `None` when no `usemtl` applies.
    pub material_ids: Vec<Option<usize>>,
    pub shapes: Vec<ObjShape>,
    pub materials: Vec<MtlMaterial>,
}

impl ObjDocument {
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    #[must_use]
    pub fn texcoord_count(&self) -> usize {
        self.texcoords.len() / 2
    }

    #[inline]
    #[must_use]
    pub fn normal_count(&self) -> usize {
        self.normals.len() / 3
    }

    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.material_ids.len()
    }

    /// Appends one `tobj` model. Its pools are compacted per model, so they
    /// land after the current ones and its indices are offset to match.
    fn push_model(&mut self, model: tobj::Model, material_count: usize) {
        let mesh = model.mesh;
        let base_position = self.vertex_count();
        let base_texcoord = self.texcoord_count();
        let base_normal = self.normal_count();

        // Corners without a `vt` or `vn` leave holes in the index lists;
        // a model only keeps an attribute that every corner carries.
        let corner_count = mesh.indices.len();
        let has_texcoords =
            !mesh.texcoords.is_empty() && mesh.texcoord_indices.len() == corner_count;
        let has_normals = !mesh.normals.is_empty() && mesh.normal_indices.len() == corner_count;

        let face_offset = self.face_count();
        let face_count = corner_count / 3;
        let material = mesh.material_id.filter(|&id| id < material_count);

        for corner in 0..face_count * 3 {
            self.corners.push(FaceCorner {
                position: base_position + mesh.indices[corner] as usize,
                texcoord: has_texcoords
                    .then(|| base_texcoord + mesh.texcoord_indices[corner] as usize),
                normal: has_normals.then(|| base_normal + mesh.normal_indices[corner] as usize),
            });
        }
        self.material_ids.extend(std::iter::repeat_n(material, face_count));

        self.positions.extend_from_slice(&mesh.positions);
        if has_texcoords {
            self.texcoords.extend_from_slice(&mesh.texcoords);
        }
        if has_normals {
            self.normals.extend_from_slice(&mesh.normals);
        }

        // A `usemtl` switch inside an object splits it into several models
        // with the same name; they stay one shape.
        match self.shapes.last_mut() {
            Some(last)
                if last.name == model.name && last.face_offset + last.face_count == face_offset =>
            {
                last.face_count += face_count;
            }
            _ => self.shapes.push(ObjShape {
                name: model.name,
                face_offset,
                face_count,
            }),
        }
    }
}

/// Directory part of `path` including the trailing `/`, or `""`.
#[must_use]
pub fn directory_prefix(path: &str) -> &str {
    path.rfind('/').map_or("", |end| &path[..=end])
}

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: false,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

fn parse_error(path: &str, err: tobj::LoadError) -> CinderError {
    CinderError::AssetParse {
        path: path.to_string(),
        reason: err.to_string(),
    }
}

/// Reads and parses the OBJ file at `path` and every material library it
/// references. A library that is missing or malformed is skipped with a
/// warning and its `usemtl` references resolve to no material.
pub fn parse_obj(path: &str, reader: &dyn FileReader) -> Result<ObjDocument> {
    let bytes = reader
        .read(path)
        .ok_or_else(|| CinderError::FileNotFound(path.to_string()))?;
    let text = String::from_utf8_lossy(&bytes);
    let source = pad_texcoords(&text);

    let dir = directory_prefix(path);
    let load_library = |library: &Path| {
        let mtl_path = format!("{dir}{}", library.to_string_lossy());
        match reader.read(&mtl_path) {
            Some(bytes) => tobj::load_mtl_buf(&mut bytes.as_slice()),
            None => {
                log::warn!("Material library {mtl_path} not found, skipping");
                Err(tobj::LoadError::OpenFileFailed)
            }
        }
    };

    let (models, materials) =
        tobj::load_obj_buf(&mut source.as_bytes(), &load_options(), load_library)
            .map_err(|err| parse_error(path, err))?;

    let materials = materials.unwrap_or_else(|err| {
        log::warn!("{path}: material libraries dropped: {err}");
        Vec::new()
    });

    let mut doc = ObjDocument::default();
    for model in models {
        if model.mesh.indices.is_empty() {
            continue;
        }
        doc.push_model(model, materials.len());
    }
    doc.materials = materials.into_iter().map(MtlMaterial::from).collect();

    log::debug!(
        "Parsed {path}: {} vertices, {} uvs, {} normals, {} triangles, {} shapes, {} materials",
        doc.vertex_count(),
        doc.texcoord_count(),
        doc.normal_count(),
        doc.face_count(),
        doc.shapes.len(),
        doc.materials.len()
    );

    Ok(doc)
}

/// Parses an MTL library on its own.
pub fn parse_mtl(path: &str, source: &str) -> Result<Vec<MtlMaterial>> {
    let (materials, _) =
        tobj::load_mtl_buf(&mut source.as_bytes()).map_err(|err| parse_error(path, err))?;
    Ok(materials.into_iter().map(MtlMaterial::from).collect())
}

/// `tobj` wants two components per `vt`; a lone `u` gets `v = 0`.
fn pad_texcoords(source: &str) -> Cow<'_, str> {
    let lone_u = |line: &str| {
        let mut tokens = line.split_whitespace();
        tokens.next() == Some("vt") && tokens.count() == 1
    };

    if !source.lines().any(lone_u) {
        return Cow::Borrowed(source);
    }

    let mut padded = String::with_capacity(source.len() + 16);
    for line in source.lines() {
        padded.push_str(line);
        if lone_u(line) {
            padded.push_str(" 0");
        }
        padded.push('\n');
    }
    Cow::Owned(padded)
}

fn parse_triple(value: &str) -> Option<[f32; 3]> {
    let mut numbers = value.split_whitespace().map(str::parse::<f32>);
    let x = numbers.next()?.ok()?;
    // A single value applies to all three channels.
    match (numbers.next(), numbers.next()) {
        (Some(y), Some(z)) => Some([x, y.ok()?, z.ok()?]),
        _ => Some([x; 3]),
    }
}
