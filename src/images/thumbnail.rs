//! Decode, resize, and JPEG re-encode of uploaded images.

use std::io::Cursor;

use foodie_core::{Error, Result};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};

use crate::config::ThumbnailConfig;

/// JPEG bytes for an upload and its thumbnail.
#[derive(Debug, Clone)]
pub struct Rendered {
    /// The original image, re-encoded as JPEG at its own size.
    pub original: Vec<u8>,
    /// The image resized to exactly the configured width and height.
    pub thumbnail: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Decode `data` and produce the JPEG original plus a fixed-size thumbnail.
///
/// The thumbnail is stretched to `size` exactly; aspect ratio is not kept.
pub fn render(data: &[u8], size: ThumbnailConfig) -> Result<Rendered> {
    if size.width == 0 || size.height == 0 {
        return Err(Error::validation(format!(
            "thumbnail size must be non-zero, got {}x{}",
            size.width, size.height
        )));
    }

    let img = image::load_from_memory(data)
        .map_err(|e| Error::Image(format!("Failed to decode image data: {e}")))?;

    let thumbnail = img.resize_exact(size.width, size.height, FilterType::Lanczos3);

    Ok(Rendered {
        original: encode_jpeg(&img)?,
        thumbnail: encode_jpeg(&thumbnail)?,
        width: img.width(),
        height: img.height(),
    })
}

/// Encode as baseline JPEG. Alpha is dropped since JPEG cannot carry it.
pub fn encode_jpeg(img: &DynamicImage) -> Result<Vec<u8>> {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut buf = Cursor::new(Vec::new());
    rgb.write_to(&mut buf, ImageFormat::Jpeg)
        .map_err(|e| Error::Image(format!("Failed to encode image as JPEG: {e}")))?;
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 200, 30, 128]));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn thumbnail_matches_configured_size() {
        let rendered = render(&png(300, 120), ThumbnailConfig { width: 50, height: 40 }).unwrap();

        assert_eq!((rendered.width, rendered.height), (300, 120));
        let thumb = image::load_from_memory(&rendered.thumbnail).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (50, 40));
    }

    #[test]
    fn both_outputs_are_jpeg() {
        let rendered = render(&png(20, 20), ThumbnailConfig::default()).unwrap();
        assert_eq!(image::guess_format(&rendered.original).unwrap(), ImageFormat::Jpeg);
        assert_eq!(image::guess_format(&rendered.thumbnail).unwrap(), ImageFormat::Jpeg);

        let original = image::load_from_memory(&rendered.original).unwrap();
        assert_eq!((original.width(), original.height()), (20, 20));
    }

    #[test]
    fn upscales_small_images() {
        let rendered = render(&png(4, 4), ThumbnailConfig { width: 32, height: 16 }).unwrap();
        let thumb = image::load_from_memory(&rendered.thumbnail).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (32, 16));
    }

    #[test]
    fn garbage_is_an_image_error() {
        let err = render(b"not an image", ThumbnailConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Image(_)));
    }

    #[test]
    fn zero_size_is_rejected() {
        let err = render(&png(4, 4), ThumbnailConfig { width: 0, height: 16 }).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
