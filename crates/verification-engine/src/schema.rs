//! Per-document-type verification schema

use crate::patterns::{
    BUILDING_PERMIT_KEYWORDS, INSURANCE_KEYWORDS, LAND_TITLE_KEYWORDS, TAX_ASSESSMENT_KEYWORDS,
};
use crate::scoring::flags::FraudFlag;
use shared_types::DocumentType;

/// Relative weight of each score in the schema-weighted blend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub completeness: f64,
    pub authenticity: f64,
    pub fraud_risk: f64,
}

/// What a complete, trustworthy document of one type looks like
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentTypeSchema {
    pub required_fields: &'static [&'static str],
    /// Fraud checks a reviewer is expected to have answered for this type
    pub fraud_indicator_keys: &'static [FraudFlag],
    pub expected_keywords: &'static [&'static str],
    pub weights: ScoreWeights,
}

impl DocumentTypeSchema {
    /// Schema for types without a definition: nothing required, equal weights
    pub fn neutral() -> Self {
        Self {
            required_fields: &[],
            fraud_indicator_keys: &[],
            expected_keywords: &[],
            weights: ScoreWeights {
                completeness: 1.0,
                authenticity: 1.0,
                fraud_risk: 1.0,
            },
        }
    }

    pub fn for_type(doc_type: &DocumentType) -> Self {
        match doc_type {
            DocumentType::LandTitle => Self {
                required_fields: &["titleNumber", "ownerName", "propertyAddress", "lotNumber"],
                fraud_indicator_keys: &[
                    FraudFlag::SuspiciousOwnership,
                    FraudFlag::RecentTransfer,
                    FraudFlag::MismatchedAddress,
                ],
                expected_keywords: LAND_TITLE_KEYWORDS,
                weights: ScoreWeights {
                    completeness: 0.3,
                    authenticity: 0.4,
                    fraud_risk: 0.3,
                },
            },
            DocumentType::BuildingPermit => Self {
                required_fields: &[
                    "permitNumber",
                    "issueDate",
                    "propertyAddress",
                    "issuingAuthority",
                ],
                fraud_indicator_keys: &[
                    FraudFlag::UnauthorizedIssuer,
                    FraudFlag::ExpiredDocument,
                    FraudFlag::MismatchedAddress,
                ],
                expected_keywords: BUILDING_PERMIT_KEYWORDS,
                weights: ScoreWeights {
                    completeness: 0.4,
                    authenticity: 0.4,
                    fraud_risk: 0.2,
                },
            },
            DocumentType::TaxAssessment => Self {
                required_fields: &["assessmentNumber", "propertyValue", "taxAmount", "assessmentDate"],
                fraud_indicator_keys: &[FraudFlag::UnrealisticValue, FraudFlag::InconsistentData],
                expected_keywords: TAX_ASSESSMENT_KEYWORDS,
                weights: ScoreWeights {
                    completeness: 0.4,
                    authenticity: 0.3,
                    fraud_risk: 0.3,
                },
            },
            DocumentType::InsuranceCertificate => Self {
                required_fields: &["policyNumber", "insuredName", "coverageAmount", "expiryDate"],
                fraud_indicator_keys: &[FraudFlag::ExpiredDocument, FraudFlag::UnauthorizedIssuer],
                expected_keywords: INSURANCE_KEYWORDS,
                weights: ScoreWeights {
                    completeness: 0.4,
                    authenticity: 0.3,
                    fraud_risk: 0.3,
                },
            },
            DocumentType::Other(_) => Self::neutral(),
        }
    }

    pub fn has_required_fields(&self) -> bool {
        !self.required_fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::field_patterns;

    #[test]
    fn test_required_fields_have_patterns() {
        for doc_type in DocumentType::KNOWN {
            let schema = DocumentTypeSchema::for_type(&doc_type);
            let patterns = field_patterns(&doc_type);
            for field in schema.required_fields {
                assert!(
                    patterns.iter().any(|p| p.field == *field),
                    "{} has no pattern for required field {}",
                    doc_type,
                    field
                );
            }
        }
    }

    #[test]
    fn test_unknown_type_gets_neutral_schema() {
        let schema = DocumentTypeSchema::for_type(&DocumentType::Other("survey-plan".into()));
        assert_eq!(schema, DocumentTypeSchema::neutral());
        assert!(!schema.has_required_fields());
    }

    #[test]
    fn test_known_types_need_two_keywords_available() {
        for doc_type in DocumentType::KNOWN {
            assert!(DocumentTypeSchema::for_type(&doc_type).expected_keywords.len() >= 2);
        }
    }
}
