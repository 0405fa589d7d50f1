//! Upload normalization
//!
//! Turns an uploaded file (raster image or multi-page PDF) into one bitmap for
//! the selected page. PDFs are range-checked with lopdf before any rendering
//! happens, so an out-of-range request never reaches the rasterizer.

use crate::error::IngestError;
use crate::metadata::{self, DocumentMetadata};
use crate::raster::{raster_format, PdfRasterizer, RasterImage, RasterSource, MIN_RENDER_SCALE};
use std::sync::Arc;
use tracing::debug;

/// Normalized page ready for OCR
#[derive(Debug, Clone)]
pub struct NormalizedPage {
    pub raster: RasterImage,
    pub metadata: DocumentMetadata,
}

/// Converts uploads into single-page rasters
#[derive(Clone)]
pub struct Normalizer {
    rasterizer: Option<Arc<dyn PdfRasterizer>>,
    render_scale: f32,
}

impl Normalizer {
    /// Normalizer that accepts raster uploads only
    pub fn images_only() -> Self {
        Self {
            rasterizer: None,
            render_scale: MIN_RENDER_SCALE,
        }
    }

    pub fn new(rasterizer: Arc<dyn PdfRasterizer>) -> Self {
        Self {
            rasterizer: Some(rasterizer),
            render_scale: MIN_RENDER_SCALE,
        }
    }

    /// Set the PDF upscale factor. Values below [`MIN_RENDER_SCALE`] are raised to it.
    pub fn with_render_scale(mut self, scale: f32) -> Self {
        self.render_scale = if scale.is_finite() {
            scale.max(MIN_RENDER_SCALE)
        } else {
            MIN_RENDER_SCALE
        };
        self
    }

    pub fn render_scale(&self) -> f32 {
        self.render_scale
    }

    /// Normalize an upload to the raster for `page_number` (1-indexed, default 1)
    pub fn normalize(
        &self,
        bytes: &[u8],
        mime_type: &str,
        page_number: Option<u32>,
    ) -> Result<NormalizedPage, IngestError> {
        if bytes.is_empty() {
            return Err(IngestError::InvalidFileEmpty);
        }

        let mime = essence(mime_type);
        if is_pdf(&mime) {
            return self.normalize_pdf(bytes, page_number.unwrap_or(1));
        }

        let format =
            raster_format(&mime).ok_or_else(|| IngestError::UnsupportedFormat(mime.clone()))?;
        let raster = RasterImage::decode(bytes, format)?;
        debug!(
            "Decoded {} upload ({}x{})",
            mime,
            raster.width(),
            raster.height()
        );

        Ok(NormalizedPage {
            raster,
            metadata: DocumentMetadata {
                page_count: 1,
                modified_at: None,
            },
        })
    }

    fn normalize_pdf(&self, bytes: &[u8], page: u32) -> Result<NormalizedPage, IngestError> {
        let doc = metadata::load(bytes)?;
        let metadata = metadata::read_metadata(&doc);

        if page == 0 || page > metadata.page_count {
            return Err(IngestError::PageOutOfRange {
                requested: page,
                page_count: metadata.page_count,
            });
        }

        let rasterizer = self
            .rasterizer
            .as_ref()
            .ok_or_else(|| IngestError::RenderFailed("no PDF rasterizer configured".into()))?;

        let image = rasterizer.render_page(bytes, page, self.render_scale)?;
        debug!(
            "Rendered PDF page {}/{} at {}x ({}x{})",
            page,
            metadata.page_count,
            self.render_scale,
            image.width(),
            image.height()
        );

        Ok(NormalizedPage {
            raster: RasterImage::new(
                image,
                RasterSource::PdfPage {
                    page,
                    scale: self.render_scale,
                },
            ),
            metadata,
        })
    }
}

impl std::fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Normalizer")
            .field("pdf_support", &self.rasterizer.is_some())
            .field("render_scale", &self.render_scale)
            .finish()
    }
}

/// Lowercased MIME type without parameters
fn essence(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

fn is_pdf(mime: &str) -> bool {
    matches!(mime, "application/pdf" | "application/x-pdf")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_test_pdf, png_bytes, RecordingRasterizer};
    use image::ImageFormat;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_file_fails_first() {
        let normalizer = Normalizer::images_only();
        let err = normalizer.normalize(&[], "application/zip", None).unwrap_err();
        assert_eq!(err, IngestError::InvalidFileEmpty);
    }

    #[test]
    fn test_unsupported_format() {
        let normalizer = Normalizer::images_only();
        let err = normalizer
            .normalize(b"PK\x03\x04", "application/zip", None)
            .unwrap_err();
        assert_eq!(err, IngestError::UnsupportedFormat("application/zip".into()));
    }

    #[test]
    fn test_raster_passes_through() {
        let normalizer = Normalizer::images_only();
        let page = normalizer
            .normalize(&png_bytes(64, 48), "IMAGE/PNG; charset=binary", Some(3))
            .unwrap();
        assert_eq!(page.raster.width(), 64);
        assert_eq!(page.raster.height(), 48);
        assert_eq!(page.raster.source(), RasterSource::Upload(ImageFormat::Png));
        assert_eq!(page.metadata.page_count, 1);
    }

    #[test]
    fn test_pdf_page_out_of_range() {
        let rasterizer = Arc::new(RecordingRasterizer::default());
        let normalizer = Normalizer::new(rasterizer.clone());
        let err = normalizer
            .normalize(&create_test_pdf(3, None), "application/pdf", Some(5))
            .unwrap_err();
        assert_eq!(
            err,
            IngestError::PageOutOfRange {
                requested: 5,
                page_count: 3
            }
        );
        assert!(rasterizer.calls().is_empty());
    }

    #[test]
    fn test_pdf_page_zero_is_out_of_range() {
        let normalizer = Normalizer::new(Arc::new(RecordingRasterizer::default()));
        let err = normalizer
            .normalize(&create_test_pdf(2, None), "application/pdf", Some(0))
            .unwrap_err();
        assert!(matches!(err, IngestError::PageOutOfRange { requested: 0, .. }));
    }

    #[test]
    fn test_pdf_renders_requested_page_upscaled() {
        let rasterizer = Arc::new(RecordingRasterizer::default());
        let normalizer = Normalizer::new(rasterizer.clone()).with_render_scale(1.0);
        let page = normalizer
            .normalize(
                &create_test_pdf(3, Some("D:20240101000000Z")),
                "application/pdf",
                Some(2),
            )
            .unwrap();

        assert_eq!(rasterizer.calls(), vec![(2, 2.0)]);
        assert_eq!(
            page.raster.source(),
            RasterSource::PdfPage { page: 2, scale: 2.0 }
        );
        assert_eq!(page.metadata.page_count, 3);
        assert!(page.metadata.modified_at.is_some());
    }

    #[test]
    fn test_pdf_defaults_to_first_page() {
        let rasterizer = Arc::new(RecordingRasterizer::default());
        let normalizer = Normalizer::new(rasterizer.clone()).with_render_scale(3.0);
        normalizer
            .normalize(&create_test_pdf(1, None), "application/pdf", None)
            .unwrap();
        assert_eq!(rasterizer.calls(), vec![(1, 3.0)]);
    }

    #[test]
    fn test_pdf_without_rasterizer() {
        let normalizer = Normalizer::images_only();
        let err = normalizer
            .normalize(&create_test_pdf(1, None), "application/pdf", None)
            .unwrap_err();
        assert!(matches!(err, IngestError::RenderFailed(_)));
    }

    #[test]
    fn test_malformed_pdf() {
        let normalizer = Normalizer::new(Arc::new(RecordingRasterizer::default()));
        let err = normalizer
            .normalize(b"definitely not a pdf", "application/pdf", None)
            .unwrap_err();
        assert!(matches!(err, IngestError::MalformedDocument(_)));
    }
}
