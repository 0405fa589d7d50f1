//! Property document verification
//!
//! Turns an uploaded property document (land title, building permit, tax
//! assessment or insurance certificate) into scores, findings and a decision
//! a human reviewer can act on.
//!
//! ```text
//! upload -> Normalizer -> TextExtractor -> extract_fields -> Scorer
//!                                                         -> CrossReference -> decide
//! ```
//!
//! [`Pipeline`] wires the stages together and never fails: any stage error is
//! mapped to a conservative fallback report.

pub mod cross_reference;
pub mod decision;
pub mod error;
pub mod extractors;
pub mod ocr;
pub mod patterns;
pub mod pipeline;
pub mod policy;
pub mod schema;
pub mod scoring;

pub use cross_reference::{normalize_name, CrossReference, CrossReferenceInput, FraudSignal};
pub use decision::{decide, final_recommendation, risk_level, DecisionRule};
pub use error::PipelineError;
pub use extractors::{extract_fields, ExtractedRecord};
#[cfg(feature = "tesseract")]
pub use ocr::TesseractEngine;
pub use ocr::{OcrEngine, OcrError, ProgressFn, TextExtractor};
pub use pipeline::{BatchJob, Pipeline};
pub use policy::{Policy, PolicyError};
pub use schema::{DocumentTypeSchema, ScoreWeights};
pub use scoring::{ScoreCard, Scorer, Scores};
