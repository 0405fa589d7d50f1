//! Single-page bitmaps handed to OCR

use crate::error::IngestError;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// Minimum upscale factor for rendered PDF pages
pub const MIN_RENDER_SCALE: f32 = 2.0;

/// Where a raster came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RasterSource {
    /// Uploaded image, decoded as-is
    Upload(ImageFormat),
    /// Rendered page of a PDF (1-indexed)
    PdfPage { page: u32, scale: f32 },
}

/// Normalized bitmap for one page of one document
#[derive(Debug, Clone)]
pub struct RasterImage {
    image: DynamicImage,
    source: RasterSource,
}

impl RasterImage {
    pub fn new(image: DynamicImage, source: RasterSource) -> Self {
        Self { image, source }
    }

    /// Decode an uploaded raster without altering its pixels
    pub fn decode(bytes: &[u8], format: ImageFormat) -> Result<Self, IngestError> {
        let image = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| IngestError::MalformedDocument(e.to_string()))?;
        Ok(Self::new(image, RasterSource::Upload(format)))
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn source(&self) -> RasterSource {
        self.source
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// PNG encoding of the bitmap, for engines that read encoded images from memory
    pub fn to_png(&self) -> Result<Vec<u8>, image::ImageError> {
        let mut buf = Cursor::new(Vec::new());
        self.image.write_to(&mut buf, ImageFormat::Png)?;
        Ok(buf.into_inner())
    }

    pub fn into_image(self) -> DynamicImage {
        self.image
    }
}

/// Renders one PDF page to a bitmap.
///
/// Implementations are constructed by the caller and injected into the
/// [`Normalizer`](crate::Normalizer); nothing here is a global.
pub trait PdfRasterizer: Send + Sync {
    /// Render `page` (1-indexed, already range-checked) at `scale` times its size in points
    fn render_page(&self, pdf: &[u8], page: u32, scale: f32) -> Result<DynamicImage, IngestError>;
}

/// Map a declared MIME type to a supported raster format
pub fn raster_format(mime: &str) -> Option<ImageFormat> {
    match mime {
        "image/png" => Some(ImageFormat::Png),
        "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(ImageFormat::Jpeg),
        "image/webp" => Some(ImageFormat::WebP),
        "image/gif" => Some(ImageFormat::Gif),
        "image/bmp" | "image/x-bmp" => Some(ImageFormat::Bmp),
        "image/tiff" => Some(ImageFormat::Tiff),
        _ => None,
    }
}
