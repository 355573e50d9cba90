use crate::errors::{CinderError, Result};
use crate::gpu::{AttributeSlot, BufferId, BufferTarget, GpuBackend, VertexArrayId};

/// GPU-resident triangle geometry.
///
/// Keeps a CPU copy of every array it was created from. Attribute counts are
/// independent of each other; an attribute that was not supplied has neither
/// data nor a buffer.
#[derive(Debug)]
pub struct Mesh {
    vertices: Vec<f32>,
    indices: Option<Vec<u32>>,
    normals: Option<Vec<f32>>,
    uvs: Option<Vec<f32>>,

    vao: VertexArrayId,
    vertex_buffer: BufferId,
    index_buffer: Option<BufferId>,
    normal_buffer: Option<BufferId>,
    uv_buffer: Option<BufferId>,
}

fn check_stride(name: &str, data: &[f32], stride: usize) -> Result<()> {
    if data.len() % stride == 0 {
        Ok(())
    } else {
        Err(CinderError::InvalidMesh(format!(
            "{name} array length {} is not a multiple of {stride}",
            data.len()
        )))
    }
}

impl Mesh {
    /// Copies the given arrays and uploads them as static buffers.
    ///
    /// `vertices` and `normals` hold three floats per element, `uvs` two.
    /// Position is always bound to [`AttributeSlot::Position`]; UVs and
    /// normals are bound only when present. An empty `vertices` gives a
    /// zero-vertex mesh.
    pub fn create<B: GpuBackend + ?Sized>(
        gpu: &mut B,
        vertices: &[f32],
        indices: Option<&[u32]>,
        normals: Option<&[f32]>,
        uvs: Option<&[f32]>,
    ) -> Result<Self> {
        check_stride("vertex", vertices, 3)?;
        if let Some(normals) = normals {
            check_stride("normal", normals, 3)?;
        }
        if let Some(uvs) = uvs {
            check_stride("uv", uvs, 2)?;
        }

        let vertices = vertices.to_vec();
        let indices = indices.map(<[u32]>::to_vec);
        let normals = normals.map(<[f32]>::to_vec);
        let uvs = uvs.map(<[f32]>::to_vec);

        log::info!("Mesh loaded:");
        log::info!("\tnumber of vertices: {}", vertices.len() / 3);
        if let Some(indices) = &indices {
            log::info!("\tnumber of indices: {}", indices.len());
        }
        if let Some(normals) = &normals {
            log::info!("\tnumber of normals: {}", normals.len() / 3);
        }
        if let Some(uvs) = &uvs {
            log::info!("\tnumber of uvs: {}", uvs.len() / 2);
        }

        let vao = gpu.create_vertex_array()?;
        gpu.bind_vertex_array(Some(vao))?;

        let vertex_buffer = gpu.create_buffer()?;
        let index_buffer = indices.as_ref().map(|_| gpu.create_buffer()).transpose()?;
        let normal_buffer = normals.as_ref().map(|_| gpu.create_buffer()).transpose()?;
        let uv_buffer = uvs.as_ref().map(|_| gpu.create_buffer()).transpose()?;

        gpu.upload_buffer(
            BufferTarget::Vertex,
            vertex_buffer,
            bytemuck::cast_slice(&vertices),
        )?;
        gpu.enable_vertex_attribute(AttributeSlot::Position, 3)?;

        if let (Some(buffer), Some(indices)) = (index_buffer, &indices) {
            gpu.upload_buffer(BufferTarget::Index, buffer, bytemuck::cast_slice(indices))?;
        }

        if let (Some(buffer), Some(uvs)) = (uv_buffer, &uvs) {
            gpu.upload_buffer(BufferTarget::Vertex, buffer, bytemuck::cast_slice(uvs))?;
            gpu.enable_vertex_attribute(AttributeSlot::Uv, 2)?;
        }

        if let (Some(buffer), Some(normals)) = (normal_buffer, &normals) {
            gpu.upload_buffer(BufferTarget::Vertex, buffer, bytemuck::cast_slice(normals))?;
            gpu.enable_vertex_attribute(AttributeSlot::Normal, 3)?;
        }

        gpu.bind_vertex_array(None)?;

        Ok(Self {
            vertices,
            indices,
            normals,
            uvs,
            vao,
            vertex_buffer,
            index_buffer,
            normal_buffer,
            uv_buffer,
        })
    }

    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    #[inline]
    #[must_use]
    pub fn index_count(&self) -> Option<usize> {
        self.indices.as_ref().map(Vec::len)
    }

    #[inline]
    #[must_use]
    pub fn normal_count(&self) -> Option<usize> {
        self.normals.as_ref().map(|n| n.len() / 3)
    }

    #[inline]
    #[must_use]
    pub fn uv_count(&self) -> Option<usize> {
        self.uvs.as_ref().map(|uv| uv.len() / 2)
    }

    #[must_use]
    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    #[must_use]
    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    #[must_use]
    pub fn normals(&self) -> Option<&[f32]> {
        self.normals.as_deref()
    }

    #[must_use]
    pub fn uvs(&self) -> Option<&[f32]> {
        self.uvs.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn vertex_array(&self) -> VertexArrayId {
        self.vao
    }

    #[must_use]
    pub fn vertex_buffer(&self) -> BufferId {
        self.vertex_buffer
    }

    #[must_use]
    pub fn index_buffer(&self) -> Option<BufferId> {
        self.index_buffer
    }

    #[must_use]
    pub fn normal_buffer(&self) -> Option<BufferId> {
        self.normal_buffer
    }

    #[must_use]
    pub fn uv_buffer(&self) -> Option<BufferId> {
        self.uv_buffer
    }

    /// Frees the vertex array and every buffer.
    pub fn release<B: GpuBackend + ?Sized>(self, gpu: &mut B) {
        for buffer in [
            Some(self.vertex_buffer),
            self.index_buffer,
            self.normal_buffer,
            self.uv_buffer,
        ]
        .into_iter()
        .flatten()
        {
            gpu.delete_buffer(buffer);
        }
        gpu.delete_vertex_array(self.vao);
    }
}
