use crate::errors::Result;

/// Tightly packed 8-bit pixels, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// 1 to 4 interleaved channels per pixel.
    pub channels: u8,
}

/// Turns encoded file bytes into raw pixels.
pub trait ImageDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage>;
}

/// Decoder backed by the `image` crate. Keeps the source's channel count and
/// narrows deeper formats to 8 bits per channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateDecoder;

impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage> {
        let img = image::load_from_memory(bytes)?;
        let (width, height) = (img.width(), img.height());
        let channels = img.color().channel_count();

        let data = match channels {
            1 => img.into_luma8().into_raw(),
            2 => img.into_luma_alpha8().into_raw(),
            3 => img.into_rgb8().into_raw(),
            _ => img.into_rgba8().into_raw(),
        };

        Ok(DecodedImage {
            data,
            width,
            height,
            channels: channels.min(4),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode_png(img: image::DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn keeps_rgb_channel_count() {
        let img = image::RgbImage::from_pixel(3, 2, image::Rgb([10, 20, 30]));
        let decoded = ImageCrateDecoder
            .decode(&encode_png(image::DynamicImage::ImageRgb8(img)))
            .unwrap();

        assert_eq!(decoded.channels, 3);
        assert_eq!((decoded.width, decoded.height), (3, 2));
        assert_eq!(decoded.data.len(), 3 * 2 * 3);
        assert_eq!(&decoded.data[0..3], &[10, 20, 30]);
    }

    #[test]
    fn keeps_gray_channel_count() {
        let img = image::GrayImage::from_pixel(4, 4, image::Luma([7]));
        let decoded = ImageCrateDecoder
            .decode(&encode_png(image::DynamicImage::ImageLuma8(img)))
            .unwrap();

        assert_eq!(decoded.channels, 1);
        assert_eq!(decoded.data, vec![7; 16]);
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(ImageCrateDecoder.decode(b"not an image").is_err());
    }
}
