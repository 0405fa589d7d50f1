//! Text extraction stage
//!
//! OCR engines are synchronous and slow, so the [`TextExtractor`] runs them on
//! tokio's blocking pool behind a semaphore and a timeout. Any failure turns
//! into a degraded placeholder result; this stage never fails the pipeline.

#[cfg(feature = "tesseract")]
pub mod tesseract;

#[cfg(feature = "tesseract")]
pub use tesseract::TesseractEngine;

use crate::policy::OcrPolicy;
use shared_pdf::RasterImage;
use shared_types::{clamp_confidence, ExtractionResult};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Progress callback, called with a percentage in 0-100
pub type ProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OcrError {
    #[error("OCR engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("Text recognition failed: {0}")]
    RecognitionFailed(String),

    #[error("OCR timed out after {0}ms")]
    Timeout(u64),

    #[error("OCR worker panicked: {0}")]
    WorkerPanicked(String),
}

/// A text recognition backend
pub trait OcrEngine: Send + Sync {
    fn name(&self) -> &str;

    /// Recognize text on one page. Called on a blocking thread.
    fn recognize(
        &self,
        image: &RasterImage,
        progress: &dyn Fn(u8),
    ) -> Result<ExtractionResult, OcrError>;
}

/// Bounded, time-limited OCR over an injected engine
#[derive(Clone)]
pub struct TextExtractor {
    engine: Arc<dyn OcrEngine>,
    permits: Arc<Semaphore>,
    timeout_ms: u64,
    degraded_confidence: f32,
}

impl TextExtractor {
    pub fn new(engine: Arc<dyn OcrEngine>, policy: &OcrPolicy) -> Self {
        Self {
            engine,
            permits: Arc::new(Semaphore::new(policy.max_concurrent.max(1))),
            timeout_ms: policy.timeout_ms.max(1),
            degraded_confidence: policy.degraded_confidence,
        }
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    /// Run OCR, falling back to a degraded result on any failure
    pub async fn extract(&self, image: RasterImage, progress: Option<ProgressFn>) -> ExtractionResult {
        match self.try_extract(image, progress).await {
            Ok(result) => result,
            Err(e) => {
                warn!(engine = self.engine.name(), error = %e, "OCR failed, using degraded result");
                self.degraded(&e)
            }
        }
    }

    /// Run OCR and surface the failure instead of degrading
    pub async fn try_extract(
        &self,
        image: RasterImage,
        progress: Option<ProgressFn>,
    ) -> Result<ExtractionResult, OcrError> {
        // One deadline covers both the wait for a worker slot and the run
        let deadline = Instant::now() + Duration::from_millis(self.timeout_ms);

        let permit = match tokio::time::timeout_at(
            deadline,
            Arc::clone(&self.permits).acquire_owned(),
        )
        .await
        {
            Ok(Ok(permit)) => permit,
            Ok(Err(_closed)) => {
                return Err(OcrError::EngineUnavailable("OCR worker pool closed".into()))
            }
            Err(_elapsed) => return Err(OcrError::Timeout(self.timeout_ms)),
        };
        let engine = Arc::clone(&self.engine);

        debug!(
            engine = engine.name(),
            width = image.width(),
            height = image.height(),
            "starting OCR"
        );

        // The permit and the raster move into the worker, so a job abandoned by
        // the timeout still holds its slot until the engine returns.
        let task = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let report = |percent: u8| {
                if let Some(progress) = &progress {
                    progress(percent.min(100));
                }
            };
            report(0);
            let result = engine.recognize(&image, &report);
            if result.is_ok() {
                report(100);
            }
            result
        });

        match tokio::time::timeout_at(deadline, task).await {
            Ok(Ok(result)) => result.map(|mut extraction| {
                extraction.confidence = clamp_confidence(extraction.confidence);
                extraction
            }),
            Ok(Err(join_error)) => Err(OcrError::WorkerPanicked(join_error.to_string())),
            Err(_elapsed) => Err(OcrError::Timeout(self.timeout_ms)),
        }
    }

    fn degraded(&self, error: &OcrError) -> ExtractionResult {
        ExtractionResult::from_text(
            &format!("[OCR unavailable: {}]", error),
            self.degraded_confidence,
        )
    }
}

impl std::fmt::Debug for TextExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextExtractor")
            .field("engine", &self.engine.name())
            .field("available_permits", &self.permits.available_permits())
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}
