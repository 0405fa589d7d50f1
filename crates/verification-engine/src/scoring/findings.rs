//! Issues and recommendations raised alongside the scores

use crate::extractors::{parse_amount, parse_date, ExtractedRecord};
use crate::patterns::count_keywords;
use crate::policy::CheckPolicy;
use crate::schema::DocumentTypeSchema;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Ordered issue and recommendation lists for one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Findings {
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

impl Findings {
    fn push(&mut self, issue: String, recommendation: impl Into<String>) {
        self.issues.push(issue);
        self.recommendations.push(recommendation.into());
    }
}

/// Declared value first, extracted value second
fn field_value<'a>(
    name: &str,
    declared: &'a BTreeMap<String, String>,
    record: &'a ExtractedRecord,
) -> Option<&'a str> {
    declared
        .get(name)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .or_else(|| record.field(name))
}

pub fn collect_findings(
    missing: &[&'static str],
    declared: &BTreeMap<String, String>,
    record: &ExtractedRecord,
    schema: &DocumentTypeSchema,
    checks: &CheckPolicy,
    now: DateTime<Utc>,
) -> Findings {
    let mut findings = Findings::default();

    for field in missing {
        findings.push(
            format!("Missing required field: {}", field),
            format!("Ensure {} is clearly visible in the document", field),
        );
    }

    if let Some(issued) = field_value("issueDate", declared, record).and_then(parse_date) {
        let age_days = (now.date_naive() - issued).num_days();
        if age_days > checks.max_document_age_days {
            findings.push(
                format!(
                    "Document is outdated (issued {}, {} days ago)",
                    issued, age_days
                ),
                "Request a current version of the document from the issuer",
            );
        }
    }

    if let Some(value) = field_value("propertyValue", declared, record).and_then(parse_amount) {
        if value > checks.property_value_ceiling {
            findings.push(
                format!(
                    "Property value {:.0} is unusually high - verify independently",
                    value
                ),
                "Obtain an independent valuation of the property",
            );
        }
    }

    let ocr_confidence = record.ocr_confidence;
    if ocr_confidence < checks.low_ocr_confidence {
        findings.push(
            format!(
                "Low OCR confidence ({:.0}%) - image may be unclear",
                ocr_confidence
            ),
            "Upload a clearer, higher-resolution scan of the document",
        );
    } else if ocr_confidence < checks.moderate_ocr_confidence {
        findings.push(
            format!("Moderate OCR confidence ({:.0}%)", ocr_confidence),
            "Check extracted fields against the original document",
        );
    }

    if !schema.expected_keywords.is_empty() {
        let hits = count_keywords(&record.normalized_text, schema.expected_keywords);
        if hits < checks.min_keyword_hits {
            findings.push(
                format!(
                    "Document content may not match selected type ({})",
                    record.document_type.label()
                ),
                "Confirm the document type selected at upload",
            );
        }
    }

    if record.normalized_text.trim().chars().count() < checks.min_text_length {
        findings.push(
            "Insufficient visible content in document".to_string(),
            "Upload a complete page with all text visible",
        );
    }

    for flag in schema.fraud_indicator_keys {
        if !flag.is_declared(declared) {
            findings.recommendations.push(format!(
                "Confirm the {} check for this {}",
                flag.key(),
                record.document_type.label()
            ));
        }
    }

    findings
}
