//! Verification report types handed to the human reviewer

use crate::types::{ExtractionResult, KeyFieldMap};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Final disposition of a document for one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Approved,
    Rejected,
    NeedsReview,
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VerificationStatus::Approved => "approved",
            VerificationStatus::Rejected => "rejected",
            VerificationStatus::NeedsReview => "needs_review",
        };
        f.write_str(label)
    }
}

/// Coarse bucket derived from the numeric fraud risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        };
        f.write_str(label)
    }
}

/// Heuristic scores and findings for a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub authenticity: u8,
    pub completeness: u8,
    pub fraud_risk: u8,
    pub confidence: u8,
    /// Schema-weighted blend of the scores, informational only
    pub weighted_score: u8,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
    pub verification_status: VerificationStatus,
}

/// Fraud view of the same run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FraudResult {
    pub risk_level: RiskLevel,
    pub risk_score: u8,
    pub fraud_indicators: Vec<String>,
    pub recommendations: Vec<String>,
    pub requires_manual_review: bool,
}

/// Top-level pipeline output. Always structurally complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub extracted_text: ExtractionResult,
    pub key_fields: KeyFieldMap,
    pub analysis: AnalysisResult,
    pub fraud: FraudResult,
    pub final_recommendation: String,
}

impl AnalysisReport {
    /// Generate a text report for reviewers
    pub fn to_text(&self) -> String {
        let mut output = String::new();

        output.push_str("Document Verification Report\n");
        output.push_str(&"=".repeat(60));
        output.push_str("\n\n");

        output.push_str(&format!(
            "Status: {}\n",
            self.analysis.verification_status
        ));
        output.push_str(&format!(
            "Risk: {} ({}/100){}\n",
            self.fraud.risk_level,
            self.fraud.risk_score,
            if self.fraud.requires_manual_review {
                " - manual review required"
            } else {
                ""
            }
        ));
        output.push_str(&format!(
            "Scores: authenticity {}, completeness {}, fraud risk {}, confidence {}\n",
            self.analysis.authenticity,
            self.analysis.completeness,
            self.analysis.fraud_risk,
            self.analysis.confidence
        ));
        output.push_str(&format!(
            "OCR confidence: {:.0}%\n\n",
            self.extracted_text.confidence
        ));

        if !self.key_fields.is_empty() {
            output.push_str("Extracted Fields:\n");
            output.push_str(&"-".repeat(40));
            output.push('\n');
            for (name, value) in &self.key_fields {
                output.push_str(&format!("  {}: {}\n", name, value));
            }
            output.push('\n');
        }

        let sections = [
            ("Issues", &self.analysis.issues),
            ("Fraud Indicators", &self.fraud.fraud_indicators),
            ("Recommendations", &self.analysis.recommendations),
            ("Fraud Recommendations", &self.fraud.recommendations),
        ];
        for (title, items) in sections {
            if items.is_empty() {
                continue;
            }
            output.push_str(&format!("{}:\n", title));
            output.push_str(&"-".repeat(40));
            output.push('\n');
            for (i, item) in items.iter().enumerate() {
                output.push_str(&format!("{}. {}\n", i + 1, item));
            }
            output.push('\n');
        }

        output.push_str(&format!("Recommendation: {}\n", self.final_recommendation));
        output
    }
}
