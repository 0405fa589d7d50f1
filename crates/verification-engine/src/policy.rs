//! Scoring policy
//!
//! Every weight, delta and threshold the scorer and decision engine use lives
//! here. Defaults are the production numbers; a TOML file can override any
//! subset of them:
//!
//! ```toml
//! [fraud]
//! unauthorized_issuer = 40
//!
//! [ocr]
//! timeout_ms = 30000
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Failed to read policy file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse policy TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid policy: {0}")]
    Invalid(String),
}

/// Complete scoring and decision policy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    pub authenticity: AuthenticityPolicy,
    pub fraud: FraudPolicy,
    pub confidence: ConfidenceWeights,
    pub decision: DecisionThresholds,
    pub risk_buckets: RiskBuckets,
    pub checks: CheckPolicy,
    pub ocr: OcrPolicy,
    pub ingest: IngestPolicy,
}

impl Policy {
    /// Load and validate a policy from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PolicyError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| PolicyError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_str(&content)
    }

    /// Parse and validate a policy from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, PolicyError> {
        let policy: Policy = toml::from_str(s)?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        let b = &self.risk_buckets;
        if !(b.medium_from <= b.high_from && b.high_from <= b.critical_from) {
            return Err(PolicyError::Invalid(format!(
                "risk bucket thresholds must be ascending (got {}, {}, {})",
                b.medium_from, b.high_from, b.critical_from
            )));
        }

        let c = &self.confidence;
        if [c.authenticity, c.completeness, c.fraud_inverse]
            .iter()
            .any(|w| !w.is_finite() || *w < 0.0)
        {
            return Err(PolicyError::Invalid(
                "confidence weights must be non-negative".into(),
            ));
        }

        if self.ocr.timeout_ms == 0 {
            return Err(PolicyError::Invalid("ocr.timeout_ms must be positive".into()));
        }
        if self.ocr.max_concurrent == 0 {
            return Err(PolicyError::Invalid(
                "ocr.max_concurrent must be at least 1".into(),
            ));
        }
        if !(0.0..=100.0).contains(&self.ocr.degraded_confidence) {
            return Err(PolicyError::Invalid(
                "ocr.degraded_confidence must be within 0-100".into(),
            ));
        }
        if self.checks.value_discrepancy_ratio < 0.0 {
            return Err(PolicyError::Invalid(
                "checks.value_discrepancy_ratio must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

/// Adjustments applied to the authenticity base score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthenticityPolicy {
    pub base: i32,
    pub digital_signature: i32,
    pub official_stamp: i32,
    pub consistent_formatting: i32,
    pub suspicious_patterns: i32,
    pub inconsistent_data: i32,
}

impl Default for AuthenticityPolicy {
    fn default() -> Self {
        Self {
            base: 80,
            digital_signature: 10,
            official_stamp: 5,
            consistent_formatting: 5,
            suspicious_patterns: -20,
            inconsistent_data: -15,
        }
    }
}

/// Deltas added to the fraud-risk base score per present indicator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FraudPolicy {
    pub base: i32,
    pub suspicious_ownership: i32,
    pub recent_transfer: i32,
    pub unrealistic_value: i32,
    pub expired_document: i32,
    pub unauthorized_issuer: i32,
    pub inconsistent_data: i32,
    pub mismatched_address: i32,
}

impl Default for FraudPolicy {
    fn default() -> Self {
        Self {
            base: 20,
            suspicious_ownership: 30,
            recent_transfer: 20,
            unrealistic_value: 25,
            expired_document: 15,
            unauthorized_issuer: 35,
            inconsistent_data: 20,
            mismatched_address: 25,
        }
    }
}

/// Weights for the overall confidence score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceWeights {
    pub authenticity: f64,
    pub completeness: f64,
    /// Applied to `100 - fraud_risk`
    pub fraud_inverse: f64,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            authenticity: 0.4,
            completeness: 0.3,
            fraud_inverse: 0.3,
        }
    }
}

/// Thresholds for the verification decision, checked in priority order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionThresholds {
    /// Fraud risk strictly above this rejects
    pub reject_fraud_above: u8,
    /// Authenticity strictly below this needs review
    pub min_authenticity: u8,
    /// Completeness strictly below this needs review
    pub min_completeness: u8,
    /// Confidence strictly below this needs review
    pub min_confidence: u8,
    /// Fraud risk strictly above this needs review
    pub review_fraud_above: u8,
    /// Risk score strictly above this requires manual review
    pub manual_review_above: u8,
}

impl Default for DecisionThresholds {
    fn default() -> Self {
        Self {
            reject_fraud_above: 70,
            min_authenticity: 50,
            min_completeness: 60,
            min_confidence: 70,
            review_fraud_above: 40,
            manual_review_above: 70,
        }
    }
}

/// Lower bounds (inclusive) of each risk bucket above `low`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskBuckets {
    pub medium_from: u8,
    pub high_from: u8,
    pub critical_from: u8,
}

impl Default for RiskBuckets {
    fn default() -> Self {
        Self {
            medium_from: 20,
            high_from: 40,
            critical_from: 70,
        }
    }
}

/// Thresholds for the issue/recommendation checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckPolicy {
    pub max_document_age_days: i64,
    pub property_value_ceiling: f64,
    pub low_ocr_confidence: f32,
    pub moderate_ocr_confidence: f32,
    pub min_keyword_hits: usize,
    pub min_text_length: usize,
    /// Relative difference between declared value and listing price
    pub value_discrepancy_ratio: f64,
    pub recent_modification_days: i64,
}

impl Default for CheckPolicy {
    fn default() -> Self {
        Self {
            max_document_age_days: 365,
            property_value_ceiling: 10_000_000.0,
            low_ocr_confidence: 60.0,
            moderate_ocr_confidence: 80.0,
            min_keyword_hits: 2,
            min_text_length: 100,
            value_discrepancy_ratio: 0.5,
            recent_modification_days: 7,
        }
    }
}

/// OCR worker limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrPolicy {
    pub timeout_ms: u64,
    pub max_concurrent: usize,
    /// Confidence reported for the placeholder result when OCR fails
    pub degraded_confidence: f32,
}

impl Default for OcrPolicy {
    fn default() -> Self {
        Self {
            timeout_ms: 60_000,
            max_concurrent: 4,
            degraded_confidence: 50.0,
        }
    }
}

/// Upload normalization settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestPolicy {
    /// PDF upscale factor; never below 2.0
    pub render_scale: f32,
}

impl Default for IngestPolicy {
    fn default() -> Self {
        Self {
            render_scale: shared_pdf::MIN_RENDER_SCALE,
        }
    }
}
