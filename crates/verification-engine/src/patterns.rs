//! Keyword lists and labeled field patterns per document type
//!
//! Patterns run against case-folded OCR text. Each one is a label (with the
//! usual punctuation and abbreviation variants) followed by a capture group for
//! the value.

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::DocumentType;

/// Keywords expected somewhere in a land title
pub const LAND_TITLE_KEYWORDS: &[&str] = &[
    "title",
    "land",
    "owner",
    "lot",
    "registr",
    "deed",
    "proprietor",
];

/// Keywords expected somewhere in a building permit
pub const BUILDING_PERMIT_KEYWORDS: &[&str] = &[
    "permit",
    "building",
    "construction",
    "authority",
    "approved",
    "council",
];

/// Keywords expected somewhere in a tax assessment
pub const TAX_ASSESSMENT_KEYWORDS: &[&str] =
    &["assessment", "tax", "property", "valuation", "rate"];

/// Keywords expected somewhere in an insurance certificate
pub const INSURANCE_KEYWORDS: &[&str] = &[
    "insurance",
    "policy",
    "coverage",
    "insured",
    "premium",
    "certificate",
];

// Value fragments shared by the field patterns
const ID: &str = r"([a-z0-9](?:[a-z0-9\-/.]*[a-z0-9])?)";
const AMOUNT: &str = r"(?:rm|s\$|\$|usd|myr|£|€)?\s*(\d+(?:,\d{3})*(?:\.\d+)?)";
const DATE: &str = r"(\d{4}-\d{2}-\d{2}|\d{1,2}[/\-.]\d{1,2}[/\-.]\d{2,4})";
const NAME: &str = r"([a-z][a-z .'\-]*)";
const ADDRESS: &str = r"([a-z0-9][^\n;]*)";
const AUTHORITY: &str = r"([a-z][a-z0-9 .&'\-]*)";
const NUMBER_LABEL: &str = r"(?:no\b\.?|number|num\b|#)";
const SEP: &str = r"\s*[:\-]?\s*";

/// Labeled pattern for one target field
#[derive(Debug)]
pub struct FieldPattern {
    pub field: &'static str,
    pub regex: Regex,
}

fn pattern(field: &'static str, label: &str, value: &str) -> FieldPattern {
    FieldPattern {
        field,
        regex: Regex::new(&format!(r"(?m){}{}{}", label, SEP, value))
            .expect("field patterns are static and must compile"),
    }
}

fn owner_name() -> FieldPattern {
    pattern(
        "ownerName",
        r"\b(?:registered\s+)?(?:owner|proprietor)(?:'s)?(?:\s+name)?\s*[:\-]",
        NAME,
    )
}

fn property_address() -> FieldPattern {
    pattern(
        "propertyAddress",
        r"\b(?:property\s+|site\s+)?address\s*[:\-]",
        ADDRESS,
    )
}

fn issue_date() -> FieldPattern {
    pattern(
        "issueDate",
        r"\b(?:date\s+of\s+issue|issue\s+date|issued\s+on|date\s+issued)",
        DATE,
    )
}

fn expiry_date() -> FieldPattern {
    pattern(
        "expiryDate",
        r"\b(?:expiry\s+date|expiration\s+date|date\s+of\s+expiry|valid\s+until|expires(?:\s+on)?)",
        DATE,
    )
}

lazy_static! {
    static ref LAND_TITLE_PATTERNS: Vec<FieldPattern> = vec![
        pattern(
            "titleNumber",
            &format!(r"\b(?:title|grant|deed)\s*{}", NUMBER_LABEL),
            ID,
        ),
        owner_name(),
        property_address(),
        pattern(
            "lotNumber",
            &format!(r"\blot(?:\s*{})?", NUMBER_LABEL),
            r"(\d[a-z0-9\-/]*)",
        ),
        pattern(
            "registrationDate",
            r"\b(?:date\s+of\s+registration|registration\s+date|registered\s+on)",
            DATE,
        ),
        pattern(
            "propertyValue",
            r"\b(?:property\s+value|market\s+value|consideration)",
            AMOUNT,
        ),
    ];

    static ref BUILDING_PERMIT_PATTERNS: Vec<FieldPattern> = vec![
        pattern("permitNumber", &format!(r"\bpermit\s*{}", NUMBER_LABEL), ID),
        issue_date(),
        property_address(),
        pattern(
            "issuingAuthority",
            r"\b(?:issuing\s+authority|issued\s+by|local\s+authority)",
            AUTHORITY,
        ),
        expiry_date(),
    ];

    static ref TAX_ASSESSMENT_PATTERNS: Vec<FieldPattern> = vec![
        pattern(
            "assessmentNumber",
            &format!(r"\bassessment\s*{}", NUMBER_LABEL),
            ID,
        ),
        pattern(
            "propertyValue",
            r"\b(?:property\s+value|annual\s+value|assessed\s+value)",
            AMOUNT,
        ),
        pattern(
            "taxAmount",
            r"\b(?:tax\s+amount|amount\s+of\s+tax|tax\s+payable|tax\s+due)",
            AMOUNT,
        ),
        pattern(
            "assessmentDate",
            r"\b(?:assessment\s+date|date\s+of\s+assessment)",
            DATE,
        ),
        owner_name(),
        property_address(),
    ];

    static ref INSURANCE_PATTERNS: Vec<FieldPattern> = vec![
        pattern("policyNumber", &format!(r"\bpolicy\s*{}", NUMBER_LABEL), ID),
        // Anchored so that "sum insured:" is not read as the insured's name
        pattern(
            "insuredName",
            r"(?:^|[,;.])\s*(?:name\s+of\s+(?:the\s+)?insured|insured(?:\s+name)?|policy\s*holder(?:\s+name)?)\s*[:\-]",
            NAME,
        ),
        pattern(
            "coverageAmount",
            r"\b(?:coverage\s+amount|sum\s+insured|amount\s+insured|limit\s+of\s+liability|coverage)",
            AMOUNT,
        ),
        expiry_date(),
        issue_date(),
    ];
}

/// Ordered field patterns for a document type; unknown types have none
pub fn field_patterns(doc_type: &DocumentType) -> &'static [FieldPattern] {
    match doc_type {
        DocumentType::LandTitle => LAND_TITLE_PATTERNS.as_slice(),
        DocumentType::BuildingPermit => BUILDING_PERMIT_PATTERNS.as_slice(),
        DocumentType::TaxAssessment => TAX_ASSESSMENT_PATTERNS.as_slice(),
        DocumentType::InsuranceCertificate => INSURANCE_PATTERNS.as_slice(),
        DocumentType::Other(_) => &[],
    }
}

/// Count how many of `keywords` occur in already case-folded text
pub fn count_keywords(text_lower: &str, keywords: &[&str]) -> usize {
    keywords
        .iter()
        .filter(|keyword| text_lower.contains(*keyword))
        .count()
}
