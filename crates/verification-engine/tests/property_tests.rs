//! Property-based tests for scoring and decision invariants

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use shared_types::{DocumentType, KeyFieldMap, RiskLevel, VerificationStatus};
use std::collections::BTreeMap;
use verification_engine::decision::requires_manual_review;
use verification_engine::policy::{ConfidenceWeights, DecisionThresholds, RiskBuckets};
use verification_engine::scoring::{completeness, confidence_score, UNKNOWN_TYPE_COMPLETENESS};
use verification_engine::{
    decide, risk_level, DocumentTypeSchema, ExtractedRecord, Policy, Scorer, Scores,
};

const FLAG_KEYS: &[&str] = &[
    "hasDigitalSignature",
    "hasOfficialStamp",
    "consistentFormatting",
    "suspiciousPatterns",
    "inconsistentData",
    "suspiciousOwnership",
    "recentTransfer",
    "unrealisticValue",
    "expiredDocument",
    "unauthorizedIssuer",
    "mismatchedAddress",
];

fn flag_value() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("true".to_string()),
        Just("yes".to_string()),
        Just("false".to_string()),
        Just("".to_string()),
        "[a-z0-9 ]{0,8}",
    ]
}

fn declared_flags() -> impl Strategy<Value = BTreeMap<String, String>> {
    proptest::collection::vec(flag_value(), FLAG_KEYS.len()).prop_map(|values| {
        FLAG_KEYS
            .iter()
            .zip(values)
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    })
}

fn document_type() -> impl Strategy<Value = DocumentType> {
    prop_oneof![
        Just(DocumentType::LandTitle),
        Just(DocumentType::BuildingPermit),
        Just(DocumentType::TaxAssessment),
        Just(DocumentType::InsuranceCertificate),
        "[a-z]{3,12}".prop_map(DocumentType::Other),
    ]
}

fn scores() -> impl Strategy<Value = Scores> {
    (0u8..=100, 0u8..=100, 0u8..=100, 0u8..=100).prop_map(|(a, c, f, conf)| Scores {
        authenticity: a,
        completeness: c,
        fraud_risk: f,
        confidence: conf,
        weighted_score: 0,
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // ============================================================
    // Score ranges
    // ============================================================

    #[test]
    fn scores_stay_within_bounds(
        declared in declared_flags(),
        doc_type in document_type(),
        text in "[a-zA-Z0-9 :,.\n]{0,200}",
        ocr_confidence in 0.0f32..=100.0,
    ) {
        let policy = Policy::default();
        let record = ExtractedRecord {
            document_type: doc_type.clone(),
            key_fields: KeyFieldMap::new(),
            normalized_text: text.to_lowercase(),
            ocr_confidence,
        };
        let schema = DocumentTypeSchema::for_type(&doc_type);
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        let card = Scorer::new(&policy).score(&declared, &record, &schema, now);

        for score in [
            card.scores.authenticity,
            card.scores.completeness,
            card.scores.fraud_risk,
            card.scores.confidence,
            card.scores.weighted_score,
        ] {
            prop_assert!(score <= 100);
        }
        prop_assert_eq!(
            card.scores.confidence,
            confidence_score(
                card.scores.authenticity,
                card.scores.completeness,
                card.scores.fraud_risk,
                &policy.confidence,
            )
        );
    }

    // ============================================================
    // Completeness
    // ============================================================

    #[test]
    fn completeness_is_rounded_percentage(
        doc_type in document_type(),
        present_mask in proptest::collection::vec(any::<bool>(), 4),
    ) {
        let schema = DocumentTypeSchema::for_type(&doc_type);
        let key_fields: KeyFieldMap = schema
            .required_fields
            .iter()
            .zip(present_mask.iter())
            .filter(|(_, present)| **present)
            .map(|(field, _)| (field.to_string(), "x".to_string()))
            .collect();

        let result = completeness(schema.required_fields, &key_fields, &BTreeMap::new());

        if schema.required_fields.is_empty() {
            prop_assert_eq!(result.score, UNKNOWN_TYPE_COMPLETENESS);
        } else {
            let present = key_fields.len() as f64;
            let expected = (100.0 * present / schema.required_fields.len() as f64).round() as u8;
            prop_assert_eq!(result.score, expected);
            prop_assert_eq!(
                result.missing.len(),
                schema.required_fields.len() - key_fields.len()
            );
        }
    }

    #[test]
    fn confidence_matches_formula(a in 0u8..=100, c in 0u8..=100, f in 0u8..=100) {
        let expected = (a as f64 * 0.4 + c as f64 * 0.3 + (100 - f) as f64 * 0.3).round() as u8;
        prop_assert_eq!(confidence_score(a, c, f, &ConfidenceWeights::default()), expected);
    }

    // ============================================================
    // Decision
    // ============================================================

    #[test]
    fn decision_is_priority_ordered(s in scores()) {
        let t = DecisionThresholds::default();
        let (status, _) = decide(&s, &t);

        let expected = if s.fraud_risk > 70 {
            VerificationStatus::Rejected
        } else if s.authenticity < 50
            || s.completeness < 60
            || s.confidence < 70
            || s.fraud_risk > 40
        {
            VerificationStatus::NeedsReview
        } else {
            VerificationStatus::Approved
        };
        prop_assert_eq!(status, expected);
    }

    #[test]
    fn manual_review_iff_above_70(score in 0u8..=100) {
        prop_assert_eq!(
            requires_manual_review(score, &DecisionThresholds::default()),
            score > 70
        );
    }

    #[test]
    fn risk_level_is_monotonic(a in 0u8..=100, b in 0u8..=100) {
        let buckets = RiskBuckets::default();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(risk_level(low, &buckets) <= risk_level(high, &buckets));
        if high >= 70 {
            prop_assert_eq!(risk_level(high, &buckets), RiskLevel::Critical);
        }
    }
}
