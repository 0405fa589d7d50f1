//! Heuristic scoring
//!
//! Scores are deterministic functions of the declared fields, the extracted
//! record and the [`Policy`]. Every score is clamped into 0-100.

pub mod authenticity;
pub mod completeness;
pub mod findings;
pub mod flags;
pub mod fraud;

pub use authenticity::authenticity_score;
pub use completeness::{completeness, Completeness, UNKNOWN_TYPE_COMPLETENESS};
pub use findings::{collect_findings, Findings};
pub use flags::{is_truthy, AuthenticityFlag, FraudFlag};
pub use fraud::{fraud_risk_score, present_fraud_flags};

use crate::extractors::ExtractedRecord;
use crate::policy::{ConfidenceWeights, Policy};
use crate::schema::{DocumentTypeSchema, ScoreWeights};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::debug;

pub(crate) fn clamp_score(value: i64) -> u8 {
    value.clamp(0, 100) as u8
}

pub(crate) fn round_score(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

/// The four decision scores plus the informational weighted blend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scores {
    pub authenticity: u8,
    pub completeness: u8,
    pub fraud_risk: u8,
    pub confidence: u8,
    pub weighted_score: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCard {
    pub scores: Scores,
    pub findings: Findings,
}

pub fn confidence_score(
    authenticity: u8,
    completeness: u8,
    fraud_risk: u8,
    weights: &ConfidenceWeights,
) -> u8 {
    round_score(
        authenticity as f64 * weights.authenticity
            + completeness as f64 * weights.completeness
            + (100 - fraud_risk) as f64 * weights.fraud_inverse,
    )
}

pub fn weighted_score(
    authenticity: u8,
    completeness: u8,
    fraud_risk: u8,
    weights: &ScoreWeights,
) -> u8 {
    let total = weights.authenticity + weights.completeness + weights.fraud_risk;
    if total <= 0.0 {
        return 0;
    }
    round_score(
        (authenticity as f64 * weights.authenticity
            + completeness as f64 * weights.completeness
            + (100 - fraud_risk) as f64 * weights.fraud_risk)
            / total,
    )
}

/// Scores documents against one policy
pub struct Scorer<'a> {
    policy: &'a Policy,
}

impl<'a> Scorer<'a> {
    pub fn new(policy: &'a Policy) -> Self {
        Self { policy }
    }

    pub fn score(
        &self,
        declared: &BTreeMap<String, String>,
        record: &ExtractedRecord,
        schema: &DocumentTypeSchema,
        now: DateTime<Utc>,
    ) -> ScoreCard {
        let authenticity = authenticity_score(declared, &self.policy.authenticity);
        let Completeness {
            score: completeness,
            missing,
        } = completeness(schema.required_fields, &record.key_fields, declared);
        let fraud_risk = fraud_risk_score(declared, &self.policy.fraud);
        let confidence =
            confidence_score(authenticity, completeness, fraud_risk, &self.policy.confidence);
        let weighted = weighted_score(authenticity, completeness, fraud_risk, &schema.weights);

        debug!(
            authenticity,
            completeness,
            fraud_risk,
            confidence,
            weighted_score = weighted,
            missing = missing.len(),
            "scored document"
        );

        let findings = collect_findings(
            &missing,
            declared,
            record,
            schema,
            &self.policy.checks,
            now,
        );

        ScoreCard {
            scores: Scores {
                authenticity,
                completeness,
                fraud_risk,
                confidence,
                weighted_score: weighted,
            },
            findings,
        }
    }
}
