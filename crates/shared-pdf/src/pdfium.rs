//! PDF rasterizer backed by pdfium
//!
//! The pdfium library is bound for each render instead of held in a global,
//! which keeps the rasterizer `Send + Sync`. pdfium-render still serializes
//! every pdfium call behind its own global lock, so concurrent analyses render
//! one page at a time.

use crate::error::IngestError;
use crate::raster::PdfRasterizer;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct PdfiumRasterizer {
    /// Directory holding the pdfium shared library; system library otherwise
    library_dir: Option<PathBuf>,
}

impl PdfiumRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_library_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            library_dir: Some(dir.into()),
        }
    }

    fn bind(&self) -> Result<Pdfium, IngestError> {
        let bindings = match &self.library_dir {
            Some(dir) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
                .or_else(|_| Pdfium::bind_to_system_library()),
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| IngestError::RenderFailed(format!("Failed to bind pdfium: {}", e)))?;
        Ok(Pdfium::new(bindings))
    }
}

impl PdfRasterizer for PdfiumRasterizer {
    fn render_page(&self, pdf: &[u8], page: u32, scale: f32) -> Result<DynamicImage, IngestError> {
        let pdfium = self.bind()?;
        let document = pdfium
            .load_pdf_from_byte_slice(pdf, None)
            .map_err(|e| IngestError::MalformedDocument(e.to_string()))?;

        let index = u16::try_from(page.saturating_sub(1))
            .map_err(|_| IngestError::RenderFailed(format!("page {} is not addressable", page)))?;
        let pdf_page = document
            .pages()
            .get(index)
            .map_err(|e| IngestError::RenderFailed(e.to_string()))?;

        // PDF points are 72 per inch; scale multiplies the native page size
        let width = (pdf_page.width().value * scale) as i32;
        let height = (pdf_page.height().value * scale) as i32;

        let bitmap = pdf_page
            .render_with_config(
                &PdfRenderConfig::new()
                    .set_target_width(width)
                    .set_target_height(height)
                    .render_form_data(true)
                    .render_annotations(true),
            )
            .map_err(|e| IngestError::RenderFailed(e.to_string()))?;

        Ok(bitmap.as_image())
    }
}
