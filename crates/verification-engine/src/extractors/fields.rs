//! Labeled key-field extraction from OCR text

use crate::patterns::field_patterns;
use serde::Serialize;
use shared_types::{DocumentType, ExtractionResult, KeyFieldMap};
use tracing::debug;

/// Typed output of field extraction, consumed by scoring and cross-reference
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedRecord {
    pub document_type: DocumentType,
    pub key_fields: KeyFieldMap,
    /// Case-folded OCR text the patterns ran against
    pub normalized_text: String,
    pub ocr_confidence: f32,
}

impl ExtractedRecord {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.key_fields.get(name).map(String::as_str)
    }
}

/// Build the extracted record for one OCR result
pub fn extract_fields(extraction: &ExtractionResult, doc_type: &DocumentType) -> ExtractedRecord {
    let normalized_text = extraction.text.to_lowercase();
    let key_fields = extract_key_fields(&normalized_text, doc_type);

    debug!(
        document_type = %doc_type,
        found = key_fields.len(),
        "extracted key fields"
    );

    ExtractedRecord {
        document_type: doc_type.clone(),
        key_fields,
        normalized_text,
        ocr_confidence: extraction.confidence,
    }
}

/// Apply the type's field patterns to case-folded text; first match per field wins
pub fn extract_key_fields(text_lower: &str, doc_type: &DocumentType) -> KeyFieldMap {
    let mut fields = KeyFieldMap::new();

    for pattern in field_patterns(doc_type) {
        let value = pattern
            .regex
            .captures(text_lower)
            .and_then(|caps| caps.get(1))
            .map(|m| clean_value(m.as_str()))
            .filter(|v| !v.is_empty());

        if let Some(value) = value {
            fields.insert(pattern.field.to_string(), value);
        }
    }

    fields
}

fn clean_value(raw: &str) -> String {
    raw.trim()
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ':' | '-') || c.is_whitespace())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fields(pairs: &[(&str, &str)]) -> KeyFieldMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_tax_assessment_sample() {
        let extraction = ExtractionResult::from_text(
            "Assessment Number: TA-2023-001, Property Value RM 250,000, Tax Amount RM 1,200, Assessment Date 01/01/2023",
            91.0,
        );
        let record = extract_fields(&extraction, &DocumentType::TaxAssessment);

        assert_eq!(
            record.key_fields,
            fields(&[
                ("assessmentNumber", "ta-2023-001"),
                ("propertyValue", "250,000"),
                ("taxAmount", "1,200"),
                ("assessmentDate", "01/01/2023"),
            ])
        );
        assert_eq!(record.ocr_confidence, 91.0);
        assert!(record.normalized_text.starts_with("assessment number"));
    }

    #[test]
    fn test_land_title() {
        let text = "LAND TITLE\n\
                    Title No: GRN-12345\n\
                    Registered Owner: Jane Tan\n\
                    Property Address: 12 Jalan Bukit, Kuala Lumpur\n\
                    Lot No. 4471\n\
                    Date of Registration: 15/06/2019";
        let key_fields = extract_key_fields(&text.to_lowercase(), &DocumentType::LandTitle);

        assert_eq!(
            key_fields,
            fields(&[
                ("titleNumber", "grn-12345"),
                ("ownerName", "jane tan"),
                ("propertyAddress", "12 jalan bukit, kuala lumpur"),
                ("lotNumber", "4471"),
                ("registrationDate", "15/06/2019"),
            ])
        );
    }

    #[test]
    fn test_building_permit() {
        let text = "building permit\n\
                    permit no: bp/2024/0098\n\
                    issue date: 2024-02-10\n\
                    site address: 8 harbour road\n\
                    issued by: city planning council\n\
                    valid until 2025-02-10";
        let key_fields = extract_key_fields(text, &DocumentType::BuildingPermit);

        assert_eq!(key_fields.get("permitNumber").unwrap(), "bp/2024/0098");
        assert_eq!(key_fields.get("issueDate").unwrap(), "2024-02-10");
        assert_eq!(key_fields.get("propertyAddress").unwrap(), "8 harbour road");
        assert_eq!(
            key_fields.get("issuingAuthority").unwrap(),
            "city planning council"
        );
        assert_eq!(key_fields.get("expiryDate").unwrap(), "2025-02-10");
    }

    #[test]
    fn test_insurance_certificate_ignores_sum_insured_as_name() {
        let text = "certificate of insurance\n\
                    policy number: pol-88-231\n\
                    sum insured: $450,000\n\
                    insured name: harbour holdings ltd\n\
                    expiry date: 31/12/2025";
        let key_fields = extract_key_fields(text, &DocumentType::InsuranceCertificate);

        assert_eq!(key_fields.get("policyNumber").unwrap(), "pol-88-231");
        assert_eq!(key_fields.get("coverageAmount").unwrap(), "450,000");
        assert_eq!(key_fields.get("insuredName").unwrap(), "harbour holdings ltd");
        assert_eq!(key_fields.get("expiryDate").unwrap(), "31/12/2025");
    }

    #[test]
    fn test_first_match_wins() {
        let text = "permit no: first-1\npermit no: second-2";
        let key_fields = extract_key_fields(text, &DocumentType::BuildingPermit);
        assert_eq!(key_fields.get("permitNumber").unwrap(), "first-1");
    }

    #[test]
    fn test_no_match_means_absent() {
        let key_fields = extract_key_fields("nothing useful here", &DocumentType::LandTitle);
        assert!(key_fields.is_empty());
    }

    #[test]
    fn test_unknown_type_extracts_nothing() {
        let extraction = ExtractionResult::from_text("Title No: T-1", 80.0);
        let record = extract_fields(&extraction, &DocumentType::Other("survey".into()));
        assert!(record.key_fields.is_empty());
        assert_eq!(record.field("titleNumber"), None);
    }

    #[test]
    fn test_clean_value_strips_trailing_punctuation() {
        assert_eq!(clean_value("  jane tan. "), "jane tan");
        assert_eq!(clean_value("12 main st;,"), "12 main st");
    }
}
