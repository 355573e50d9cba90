use crate::assets::image::ImageDecoder;
use crate::assets::io::FileReader;
use crate::errors::{CinderError, Result};
use crate::gpu::{FilterMode, GpuBackend, PixelFormat, SamplerParams, TextureId, TextureImage};

/// Side length of the procedural fallback texture.
pub const DEFAULT_TEXTURE_SIZE: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    D2,
}

/// A GPU image plus the sampling state it was created with.
///
/// Cheap to clone: clones share the same GPU object, which is how the cached
/// default texture ends up in many materials.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    id: TextureId,
    kind: TextureKind,
    width: u32,
    height: u32,
    sampler: SamplerParams,
}

impl Texture {
    /// Uploads `data` as mip level 0, generates the mip chain and applies the
    /// default sampler (repeat, trilinear minification, linear magnification).
    pub fn create_2d<B: GpuBackend + ?Sized>(
        gpu: &mut B,
        data: &[u8],
        width: u32,
        height: u32,
        internal_format: PixelFormat,
        format: PixelFormat,
    ) -> Result<Self> {
        let expected = width as usize * height as usize * format.channels();
        if data.len() < expected {
            return Err(CinderError::UnsupportedFormat(format!(
                "{width}x{height} {format:?} image needs {expected} bytes, got {}",
                data.len()
            )));
        }

        let id = gpu.create_texture()?;
        gpu.upload_texture_2d(
            id,
            &TextureImage {
                width,
                height,
                internal_format,
                format,
                data,
            },
        )?;

        let sampler = SamplerParams::default();
        gpu.set_sampler_params(id, &sampler)?;

        Ok(Self {
            id,
            kind: TextureKind::D2,
            width,
            height,
            sampler,
        })
    }

    /// Reads and decodes an image file, picking the pixel layout from its
    /// channel count.
    pub fn from_file<B: GpuBackend + ?Sized>(
        gpu: &mut B,
        reader: &dyn FileReader,
        decoder: &dyn ImageDecoder,
        path: &str,
    ) -> Result<Self> {
        log::info!("Loading file {path}");
        let Some(bytes) = reader.read(path) else {
            log::error!("File {path} not found");
            return Err(CinderError::FileNotFound(path.to_string()));
        };

        let image = decoder.decode(&bytes)?;
        let format = PixelFormat::from_channels(image.channels)?;

        Self::create_2d(gpu, &image.data, image.width, image.height, format, format)
    }

    /// 32×32 magenta/black checkerboard with nearest magnification.
    pub fn checkerboard<B: GpuBackend + ?Sized>(gpu: &mut B) -> Result<Self> {
        let data = checkerboard_pixels();
        let size = DEFAULT_TEXTURE_SIZE as u32;
        let mut tex = Self::create_2d(gpu, &data, size, size, PixelFormat::Rgba, PixelFormat::Rgba)?;

        tex.sampler.mag_filter = FilterMode::Nearest;
        gpu.set_sampler_params(tex.id, &tex.sampler)?;

        Ok(tex)
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> TextureId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> TextureKind {
        self.kind
    }

    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[must_use]
    pub fn sampler(&self) -> &SamplerParams {
        &self.sampler
    }

    /// Frees the GPU image. Other clones of this texture become dangling.
    pub fn release<B: GpuBackend + ?Sized>(self, gpu: &mut B) {
        gpu.delete_texture(self.id);
    }
}

/// RGBA pixels of the fallback texture: magenta where `(x + y % 2) % 2 == 0`,
/// black (alpha 0) elsewhere.
#[must_use]
pub fn checkerboard_pixels() -> Vec<u8> {
    let mut data = vec![0u8; DEFAULT_TEXTURE_SIZE * DEFAULT_TEXTURE_SIZE * 4];

    for y in 0..DEFAULT_TEXTURE_SIZE {
        for x in 0..DEFAULT_TEXTURE_SIZE {
            if (x + y % 2) % 2 == 0 {
                let i = (x + y * DEFAULT_TEXTURE_SIZE) * 4;
                data[i] = 0xff;
                data[i + 1] = 0x00;
                data[i + 2] = 0xff;
            }
        }
    }

    data
}
