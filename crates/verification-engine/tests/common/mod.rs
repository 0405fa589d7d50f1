//! Shared fixtures for verification-engine integration tests
#![allow(dead_code)]

use image::DynamicImage;
use shared_pdf::{IngestError, Normalizer, PdfRasterizer, RasterImage};
use shared_types::ExtractionResult;
use std::sync::Arc;
use std::time::Duration;
use verification_engine::{OcrEngine, OcrError, Pipeline, Policy};

pub use shared_pdf::test_support::{create_test_pdf, png_bytes, RecordingRasterizer};

pub const TAX_SAMPLE: &str = "Assessment Number: TA-2023-001, Property Value RM 250,000, \
Tax Amount RM 1,200, Assessment Date 01/01/2023";

/// OCR engine that "reads" a fixed text at a fixed confidence
pub struct ScriptedEngine {
    pub text: String,
    pub confidence: f32,
}

impl ScriptedEngine {
    pub fn new(text: &str, confidence: f32) -> Arc<Self> {
        Arc::new(Self {
            text: text.to_string(),
            confidence,
        })
    }
}

impl OcrEngine for ScriptedEngine {
    fn name(&self) -> &str {
        "scripted"
    }

    fn recognize(
        &self,
        _image: &RasterImage,
        progress: &dyn Fn(u8),
    ) -> Result<ExtractionResult, OcrError> {
        progress(50);
        Ok(ExtractionResult::from_text(&self.text, self.confidence))
    }
}

/// OCR engine that always fails
pub struct BrokenEngine;

impl OcrEngine for BrokenEngine {
    fn name(&self) -> &str {
        "broken"
    }

    fn recognize(
        &self,
        _image: &RasterImage,
        _progress: &dyn Fn(u8),
    ) -> Result<ExtractionResult, OcrError> {
        Err(OcrError::EngineUnavailable("tessdata missing".into()))
    }
}

/// Rasterizer that holds its thread for `delay` before returning a blank page
pub struct SlowRasterizer {
    pub delay: Duration,
}

impl PdfRasterizer for SlowRasterizer {
    fn render_page(&self, _pdf: &[u8], _page: u32, scale: f32) -> Result<DynamicImage, IngestError> {
        std::thread::sleep(self.delay);
        Ok(DynamicImage::new_rgb8(
            (61.2 * scale) as u32,
            (79.2 * scale) as u32,
        ))
    }
}

pub fn pipeline_with(engine: Arc<dyn OcrEngine>) -> Pipeline {
    Pipeline::new(
        Normalizer::new(Arc::new(RecordingRasterizer::default())),
        engine,
        Policy::default(),
    )
}
