//! Tesseract OCR via leptess

use super::{OcrEngine, OcrError};
use leptess::{capi, LepTess, Variable};
use shared_pdf::RasterImage;
use shared_types::{BoundingBox, ExtractionResult, OcrLine, OcrWord};
use std::path::PathBuf;
use tracing::debug;

/// Default page segmentation mode: fully automatic, no OSD
pub const DEFAULT_PSM: u32 = 3;

#[derive(Debug, Clone)]
pub struct TesseractEngine {
    language: String,
    datapath: Option<PathBuf>,
    psm: u32,
}

impl TesseractEngine {
    /// Check that Tesseract starts with the given language data
    pub fn new(language: &str, datapath: Option<PathBuf>) -> Result<Self, OcrError> {
        let engine = Self {
            language: language.to_string(),
            datapath,
            psm: DEFAULT_PSM,
        };
        engine.init()?;
        Ok(engine)
    }

    pub fn with_psm(mut self, psm: u32) -> Self {
        self.psm = psm;
        self
    }

    fn init(&self) -> Result<LepTess, OcrError> {
        let datapath = self
            .datapath
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned());
        LepTess::new(datapath.as_deref(), &self.language).map_err(|e| {
            OcrError::EngineUnavailable(format!(
                "Failed to initialize Tesseract with language '{}': {}",
                self.language, e
            ))
        })
    }
}

fn to_bbox(x: i32, y: i32, w: i32, h: i32) -> BoundingBox {
    BoundingBox {
        x: x.max(0) as u32,
        y: y.max(0) as u32,
        width: w.max(0) as u32,
        height: h.max(0) as u32,
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn recognize(
        &self,
        image: &RasterImage,
        progress: &dyn Fn(u8),
    ) -> Result<ExtractionResult, OcrError> {
        let mut lt = self.init()?;
        lt.set_variable(Variable::TesseditPagesegMode, &self.psm.to_string())
            .map_err(|e| OcrError::EngineUnavailable(format!("Failed to set PSM: {}", e)))?;

        // leptess decodes encoded image data, not raw pixels
        let png = image
            .to_png()
            .map_err(|e| OcrError::RecognitionFailed(format!("Failed to encode page: {}", e)))?;
        lt.set_image_from_mem(&png)
            .map_err(|e| OcrError::RecognitionFailed(format!("Failed to load page: {}", e)))?;
        progress(10);

        let text = lt
            .get_utf8_text()
            .map_err(|e| OcrError::RecognitionFailed(format!("Invalid UTF-8 from Tesseract: {}", e)))?;
        let confidence = lt.mean_text_conf() as f32;
        progress(60);

        let mut words = Vec::new();
        if let Some(boxes) = lt.get_component_boxes(capi::TessPageIteratorLevel_RIL_WORD, true) {
            for bbox in &boxes {
                let geom = bbox.get_geometry();
                lt.set_rectangle(geom.x, geom.y, geom.w, geom.h);
                let word = lt.get_utf8_text().unwrap_or_default().trim().to_string();
                if word.is_empty() {
                    continue;
                }
                words.push(OcrWord {
                    text: word,
                    confidence: lt.mean_text_conf() as f32,
                    bbox: to_bbox(geom.x, geom.y, geom.w, geom.h),
                });
            }
        }
        progress(85);

        let mut lines = Vec::new();
        if let Some(boxes) = lt.get_component_boxes(capi::TessPageIteratorLevel_RIL_TEXTLINE, true)
        {
            for bbox in &boxes {
                let geom = bbox.get_geometry();
                lt.set_rectangle(geom.x, geom.y, geom.w, geom.h);
                let line = lt.get_utf8_text().unwrap_or_default().trim().to_string();
                if line.is_empty() {
                    continue;
                }
                lines.push(OcrLine {
                    text: line,
                    confidence: lt.mean_text_conf() as f32,
                });
            }
        }

        debug!(
            chars = text.len(),
            confidence,
            words = words.len(),
            lines = lines.len(),
            "tesseract finished"
        );

        Ok(ExtractionResult {
            text,
            confidence: confidence.clamp(0.0, 100.0),
            words,
            lines,
        })
    }
}
