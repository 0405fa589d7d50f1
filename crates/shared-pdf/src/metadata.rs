//! PDF document metadata read with lopdf

use crate::error::IngestError;
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use lopdf::{Document, Object};

/// Metadata gathered while normalizing an upload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentMetadata {
    pub page_count: u32,
    /// `ModDate` from the PDF Info dictionary, when present and parseable
    pub modified_at: Option<DateTime<Utc>>,
}

pub(crate) fn load(bytes: &[u8]) -> Result<Document, IngestError> {
    Document::load_mem(bytes).map_err(|e| IngestError::MalformedDocument(e.to_string()))
}

/// Read page count and modification date from a parsed document
pub fn read_metadata(doc: &Document) -> DocumentMetadata {
    DocumentMetadata {
        page_count: doc.get_pages().len() as u32,
        modified_at: info_string(doc, b"ModDate").and_then(|raw| parse_pdf_date(&raw)),
    }
}

fn info_string(doc: &Document, key: &[u8]) -> Option<String> {
    let info = match doc.trailer.get(b"Info").ok()? {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    let dict = info.as_dict().ok()?;
    match dict.get(key).ok()? {
        Object::String(bytes, _) => Some(String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    }
}

/// Parse a PDF date string (`D:YYYYMMDDHHmmSSOHH'mm'`).
///
/// Everything after the year is optional; a missing offset means UTC.
pub fn parse_pdf_date(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    let s = s.strip_prefix("D:").unwrap_or(s);

    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.len() < 4 {
        return None;
    }
    let field = |start: usize, len: usize, default: u32| -> Option<u32> {
        match digits.get(start..start + len) {
            Some(part) => part.parse().ok(),
            None => Some(default),
        }
    };

    let year: i32 = digits[0..4].parse().ok()?;
    let month = field(4, 2, 1)?;
    let day = field(6, 2, 1)?;
    let hour = field(8, 2, 0)?;
    let minute = field(10, 2, 0)?;
    let second = field(12, 2, 0)?;

    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
    let offset = parse_offset(&s[digits.len()..])?;
    let local = offset.from_local_datetime(&naive).single()?;
    Some(local.with_timezone(&Utc))
}

fn parse_offset(rest: &str) -> Option<FixedOffset> {
    let mut chars = rest.chars();
    let sign = match chars.next() {
        None | Some('Z') => return FixedOffset::east_opt(0),
        Some('+') => 1,
        Some('-') => -1,
        Some(_) => return None,
    };
    let digits: String = chars.filter(|c| c.is_ascii_digit()).collect();
    let hours: i32 = digits.get(0..2)?.parse().ok()?;
    let minutes: i32 = digits.get(2..4).and_then(|m| m.parse().ok()).unwrap_or(0);
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
