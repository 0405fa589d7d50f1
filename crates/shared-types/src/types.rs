use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Fields pulled out of a document, keyed by camelCase field name.
///
/// Ordered so that serialized reports are stable between runs.
pub type KeyFieldMap = BTreeMap<String, String>;

/// Kind of property document submitted for verification
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DocumentType {
    LandTitle,
    BuildingPermit,
    TaxAssessment,
    InsuranceCertificate,
    /// Any type the marketplace sends that has no schema here
    Other(String),
}

impl DocumentType {
    pub const KNOWN: [DocumentType; 4] = [
        DocumentType::LandTitle,
        DocumentType::BuildingPermit,
        DocumentType::TaxAssessment,
        DocumentType::InsuranceCertificate,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            DocumentType::LandTitle => "land-title",
            DocumentType::BuildingPermit => "building-permit",
            DocumentType::TaxAssessment => "tax-assessment",
            DocumentType::InsuranceCertificate => "insurance-certificate",
            DocumentType::Other(name) => name,
        }
    }

    /// Human-readable label used in issue text
    pub fn label(&self) -> &str {
        match self {
            DocumentType::LandTitle => "land title",
            DocumentType::BuildingPermit => "building permit",
            DocumentType::TaxAssessment => "tax assessment",
            DocumentType::InsuranceCertificate => "insurance certificate",
            DocumentType::Other(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, DocumentType::Other(_))
    }
}

impl From<&str> for DocumentType {
    fn from(value: &str) -> Self {
        let normalized = value.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "land-title" | "title-deed" => DocumentType::LandTitle,
            "building-permit" => DocumentType::BuildingPermit,
            "tax-assessment" => DocumentType::TaxAssessment,
            "insurance-certificate" => DocumentType::InsuranceCertificate,
            _ => DocumentType::Other(value.trim().to_string()),
        }
    }
}

impl From<String> for DocumentType {
    fn from(value: String) -> Self {
        DocumentType::from(value.as_str())
    }
}

impl From<DocumentType> for String {
    fn from(value: DocumentType) -> Self {
        value.as_str().to_string()
    }
}

impl FromStr for DocumentType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(DocumentType::from(s))
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One uploaded document plus what the uploader typed in about it
#[derive(Clone)]
pub struct DocumentInput {
    pub document_type: DocumentType,
    /// Manually entered metadata, including boolean check flags
    pub declared_fields: BTreeMap<String, String>,
    pub file_bytes: Vec<u8>,
    pub mime_type: String,
    /// 1-indexed page to analyze; `None` means the first page
    pub page_number: Option<u32>,
    /// File modification time reported by the uploader, when known
    pub last_modified: Option<DateTime<Utc>>,
}

impl DocumentInput {
    pub fn new(document_type: DocumentType, file_bytes: Vec<u8>, mime_type: &str) -> Self {
        Self {
            document_type,
            declared_fields: BTreeMap::new(),
            file_bytes,
            mime_type: mime_type.to_string(),
            page_number: None,
            last_modified: None,
        }
    }

    pub fn with_field(mut self, key: &str, value: &str) -> Self {
        self.declared_fields
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_page(mut self, page_number: u32) -> Self {
        self.page_number = Some(page_number);
        self
    }

    pub fn with_last_modified(mut self, at: DateTime<Utc>) -> Self {
        self.last_modified = Some(at);
        self
    }

    /// Declared value for `key`, ignoring blank entries
    pub fn declared(&self, key: &str) -> Option<&str> {
        self.declared_fields
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

impl fmt::Debug for DocumentInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentInput")
            .field("document_type", &self.document_type)
            .field("declared_fields", &self.declared_fields)
            .field("file_len", &self.file_bytes.len())
            .field("mime_type", &self.mime_type)
            .field("page_number", &self.page_number)
            .field("last_modified", &self.last_modified)
            .finish()
    }
}

/// Listing the document was uploaded against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    pub agent_name: String,
    pub price: f64,
}

/// Pixel rectangle of a recognized word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrWord {
    pub text: String,
    /// 0-100
    pub confidence: f32,
    pub bbox: BoundingBox,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrLine {
    pub text: String,
    /// 0-100
    pub confidence: f32,
}

/// Output of the OCR stage
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub text: String,
    /// Engine-reported mean confidence, 0-100
    pub confidence: f32,
    pub words: Vec<OcrWord>,
    pub lines: Vec<OcrLine>,
}

/// Confidence in 0-100; NaN and infinities count as no confidence
pub fn clamp_confidence(confidence: f32) -> f32 {
    if confidence.is_finite() {
        confidence.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

impl ExtractionResult {
    pub fn from_text(text: &str, confidence: f32) -> Self {
        Self {
            text: text.to_string(),
            confidence: clamp_confidence(confidence),
            words: Vec::new(),
            lines: Vec::new(),
        }
    }
}
