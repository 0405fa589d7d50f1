pub mod report;
pub mod types;

pub use report::{AnalysisReport, AnalysisResult, FraudResult, RiskLevel, VerificationStatus};
pub use types::{
    clamp_confidence, BoundingBox, DocumentInput, DocumentType, ExtractionResult, KeyFieldMap,
    ListingRecord, OcrLine, OcrWord,
};
