//! Verification decision and risk bucketing

use crate::policy::{DecisionThresholds, RiskBuckets};
use crate::scoring::Scores;
use shared_types::{RiskLevel, VerificationStatus};
use std::fmt;

pub const APPROVED_RECOMMENDATION: &str = "Document approved - verification checks passed";
pub const REJECTED_RECOMMENDATION: &str = "Document rejected - manual review required";
pub const REVIEW_RECOMMENDATION: &str = "Document requires manual review";

/// Which decision rule produced the status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionRule {
    FraudRiskReject,
    LowAuthenticityOrCompleteness,
    LowConfidence,
    ElevatedFraudRisk,
    AllChecksPassed,
}

impl fmt::Display for DecisionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DecisionRule::FraudRiskReject => "fraud_risk_reject",
            DecisionRule::LowAuthenticityOrCompleteness => "low_authenticity_or_completeness",
            DecisionRule::LowConfidence => "low_confidence",
            DecisionRule::ElevatedFraudRisk => "elevated_fraud_risk",
            DecisionRule::AllChecksPassed => "all_checks_passed",
        };
        f.write_str(label)
    }
}

pub fn risk_level(score: u8, buckets: &RiskBuckets) -> RiskLevel {
    if score < buckets.medium_from {
        RiskLevel::Low
    } else if score < buckets.high_from {
        RiskLevel::Medium
    } else if score < buckets.critical_from {
        RiskLevel::High
    } else {
        RiskLevel::Critical
    }
}

/// Apply the decision rules in priority order
pub fn decide(scores: &Scores, thresholds: &DecisionThresholds) -> (VerificationStatus, DecisionRule) {
    if scores.fraud_risk > thresholds.reject_fraud_above {
        (VerificationStatus::Rejected, DecisionRule::FraudRiskReject)
    } else if scores.authenticity < thresholds.min_authenticity
        || scores.completeness < thresholds.min_completeness
    {
        (
            VerificationStatus::NeedsReview,
            DecisionRule::LowAuthenticityOrCompleteness,
        )
    } else if scores.confidence < thresholds.min_confidence {
        (VerificationStatus::NeedsReview, DecisionRule::LowConfidence)
    } else if scores.fraud_risk > thresholds.review_fraud_above {
        (VerificationStatus::NeedsReview, DecisionRule::ElevatedFraudRisk)
    } else {
        (VerificationStatus::Approved, DecisionRule::AllChecksPassed)
    }
}

pub fn requires_manual_review(risk_score: u8, thresholds: &DecisionThresholds) -> bool {
    risk_score > thresholds.manual_review_above
}

pub fn final_recommendation(status: VerificationStatus, risk: RiskLevel) -> &'static str {
    match (status, risk) {
        (VerificationStatus::Approved, RiskLevel::Low) => APPROVED_RECOMMENDATION,
        (VerificationStatus::Rejected, _) | (_, RiskLevel::Critical) => REJECTED_RECOMMENDATION,
        _ => REVIEW_RECOMMENDATION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(authenticity: u8, completeness: u8, fraud_risk: u8, confidence: u8) -> Scores {
        Scores {
            authenticity,
            completeness,
            fraud_risk,
            confidence,
            weighted_score: 0,
        }
    }

    #[test]
    fn test_risk_buckets() {
        let buckets = RiskBuckets::default();
        let cases = [
            (0, RiskLevel::Low),
            (19, RiskLevel::Low),
            (20, RiskLevel::Medium),
            (39, RiskLevel::Medium),
            (40, RiskLevel::High),
            (69, RiskLevel::High),
            (70, RiskLevel::Critical),
            (100, RiskLevel::Critical),
        ];
        for (score, expected) in cases {
            assert_eq!(risk_level(score, &buckets), expected, "score {score}");
        }
    }

    #[test]
    fn test_fraud_rejection_boundary() {
        let t = DecisionThresholds::default();
        assert_eq!(
            decide(&scores(100, 100, 71, 100), &t),
            (VerificationStatus::Rejected, DecisionRule::FraudRiskReject)
        );
        assert_eq!(
            decide(&scores(100, 100, 70, 100), &t).0,
            VerificationStatus::NeedsReview
        );
    }

    #[test]
    fn test_review_boundaries() {
        let t = DecisionThresholds::default();
        assert_eq!(
            decide(&scores(49, 100, 20, 90), &t).1,
            DecisionRule::LowAuthenticityOrCompleteness
        );
        assert_eq!(decide(&scores(50, 100, 20, 90), &t).0, VerificationStatus::Approved);
        assert_eq!(
            decide(&scores(90, 59, 20, 90), &t).1,
            DecisionRule::LowAuthenticityOrCompleteness
        );
        assert_eq!(decide(&scores(90, 60, 20, 90), &t).0, VerificationStatus::Approved);
        assert_eq!(decide(&scores(90, 90, 20, 69), &t).1, DecisionRule::LowConfidence);
        assert_eq!(decide(&scores(90, 90, 20, 70), &t).0, VerificationStatus::Approved);
        assert_eq!(
            decide(&scores(90, 90, 41, 90), &t).1,
            DecisionRule::ElevatedFraudRisk
        );
        assert_eq!(decide(&scores(90, 90, 40, 90), &t).0, VerificationStatus::Approved);
    }

    #[test]
    fn test_manual_review_threshold() {
        let t = DecisionThresholds::default();
        assert!(!requires_manual_review(70, &t));
        assert!(requires_manual_review(71, &t));
    }

    #[test]
    fn test_final_recommendation() {
        assert_eq!(
            final_recommendation(VerificationStatus::Approved, RiskLevel::Low),
            APPROVED_RECOMMENDATION
        );
        assert_eq!(
            final_recommendation(VerificationStatus::Approved, RiskLevel::Medium),
            REVIEW_RECOMMENDATION
        );
        assert_eq!(
            final_recommendation(VerificationStatus::Rejected, RiskLevel::Critical),
            REJECTED_RECOMMENDATION
        );
        assert_eq!(
            final_recommendation(VerificationStatus::NeedsReview, RiskLevel::Critical),
            REJECTED_RECOMMENDATION
        );
        assert_eq!(
            final_recommendation(VerificationStatus::NeedsReview, RiskLevel::High),
            REVIEW_RECOMMENDATION
        );
    }
}
